//! Schema provider trait for telemetry sources

use crate::types::{FieldInfo, SnapshotSchema};

/// Schema access shared by every telemetry source.
///
/// Lets adapter code inspect the record layout of a reader or a live
/// connection without caring which one it has.
pub trait SchemaProvider {
    /// Get the field schema for this telemetry source.
    fn get_schema(&self) -> &SnapshotSchema;

    /// Check if a field exists in the schema.
    fn has_field(&self, name: &str) -> bool {
        self.get_schema().has_field(name)
    }

    /// Get field information for a field name.
    fn get_field_info(&self, name: &str) -> Option<&FieldInfo> {
        self.get_schema().get_field(name)
    }

    /// Get all field names in record order.
    fn get_field_names(&self) -> Vec<&'static str> {
        self.get_schema().fields_by_offset().into_iter().map(|info| info.name).collect()
    }
}
