//! Field metadata and the name-indexed snapshot schema

use serde::Serialize;
use std::collections::HashMap;

use super::FieldType;
use crate::{Result, TelemetryError};

/// Inclusive plausibility range published for a field.
///
/// `max` is `None` for fields that are only bounded below (`RANGE 0.. ?`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldRange {
    pub min: f32,
    pub max: Option<f32>,
}

impl FieldRange {
    pub const fn between(min: f32, max: f32) -> Self {
        Self { min, max: Some(max) }
    }

    pub const fn at_least(min: f32) -> Self {
        Self { min, max: None }
    }

    /// Whether `value` lies inside the range. NaN never does.
    pub fn contains(&self, value: f32) -> bool {
        if value.is_nan() || value < self.min {
            return false;
        }
        self.max.is_none_or(|max| value <= max)
    }
}

/// Static description of one field of the record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldInfo {
    /// Field name as it appears in the C header (`mSpeed`)
    pub name: &'static str,
    /// Element type
    pub field_type: FieldType,
    /// Byte offset from the start of the record
    pub offset: usize,
    /// Number of elements (1 for scalars)
    pub count: usize,
    /// Unit of measurement, empty for unitless fields
    pub unit: &'static str,
    /// Published range, if any
    pub range: Option<FieldRange>,
    /// Value meaning "not available yet"
    pub unset: Option<f32>,
    pub description: &'static str,
}

impl FieldInfo {
    /// Total size of the field in bytes.
    pub const fn size(&self) -> usize {
        self.field_type.size() * self.count
    }

    /// Offset one past the last byte of the field.
    pub const fn end(&self) -> usize {
        self.offset + self.size()
    }

    /// Whether `value` equals this field's unset sentinel.
    pub fn is_unset(&self, value: f32) -> bool {
        self.unset.is_some_and(|unset| unset == value)
    }
}

/// Schema describing every field of one record version (O(1) lookup by name).
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotSchema {
    /// Record version this schema describes
    pub version: u32,
    /// Map of field names to their metadata
    pub fields: HashMap<&'static str, FieldInfo>,
    /// Total size of the record in bytes
    pub record_size: usize,
}

impl SnapshotSchema {
    /// Build a schema from a field table, validating it.
    pub fn new(version: u32, fields: &[FieldInfo], record_size: usize) -> Result<Self> {
        let schema = Self {
            version,
            fields: fields.iter().map(|info| (info.name, *info)).collect(),
            record_size,
        };
        if schema.fields.len() != fields.len() {
            return Err(TelemetryError::schema_validation_error("duplicate field name"));
        }
        schema.validate()?;
        Ok(schema)
    }

    /// Schema of the compiled-in record version.
    pub fn current() -> Self {
        Self {
            version: crate::schema::SHARED_MEMORY_VERSION,
            fields: crate::schema::FIELDS.iter().map(|info| (info.name, *info)).collect(),
            record_size: crate::schema::SNAPSHOT_SIZE,
        }
    }

    /// Validate the schema for consistency.
    pub fn validate(&self) -> Result<()> {
        for (name, info) in &self.fields {
            if info.count == 0 {
                return Err(TelemetryError::schema_validation_error(format!(
                    "field '{}' has count of 0",
                    name
                )));
            }

            if info.name != *name {
                return Err(TelemetryError::schema_validation_error(format!(
                    "field map key '{}' doesn't match info name '{}'",
                    name, info.name
                )));
            }

            if info.field_type != FieldType::Char && info.offset % 4 != 0 {
                return Err(TelemetryError::schema_validation_error(format!(
                    "field '{}' at offset {} is not 4-byte aligned",
                    name, info.offset
                )));
            }

            if info.end() > self.record_size {
                return Err(TelemetryError::Memory { offset: info.offset, source: None });
            }
        }

        Ok(())
    }

    /// Get field info by name (O(1) lookup).
    pub fn get_field(&self, name: &str) -> Option<&FieldInfo> {
        self.fields.get(name)
    }

    /// Check if a field exists.
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Get the number of fields.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Fields in record order.
    pub fn fields_by_offset(&self) -> Vec<&FieldInfo> {
        let mut fields: Vec<_> = self.fields.values().collect();
        fields.sort_by_key(|info| info.offset);
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FIELDS, SHARED_MEMORY_VERSION, SNAPSHOT_SIZE};

    #[test]
    fn new_accepts_the_compiled_in_catalog() {
        let schema = SnapshotSchema::new(SHARED_MEMORY_VERSION, &FIELDS[..], SNAPSHOT_SIZE).unwrap();
        assert_eq!(schema.field_count(), FIELDS.len());
        assert_eq!(schema.fields_by_offset()[0].name, "mVersion");
    }

    #[test]
    fn new_rejects_duplicate_names() {
        let mut fields: Vec<FieldInfo> = FIELDS[..3].to_vec();
        fields.push(FIELDS[0]);

        let error = SnapshotSchema::new(SHARED_MEMORY_VERSION, &fields, SNAPSHOT_SIZE).unwrap_err();
        assert!(matches!(error, TelemetryError::SchemaValidation { .. }));
    }

    #[test]
    fn new_rejects_fields_past_the_record_end() {
        let last = *FIELDS.iter().max_by_key(|info| info.end()).unwrap();

        let error = SnapshotSchema::new(SHARED_MEMORY_VERSION, &FIELDS[..], last.end() - 1).unwrap_err();
        assert!(matches!(error, TelemetryError::Memory { offset, .. } if offset == last.offset));
    }

    #[test]
    fn ranges_exclude_nan_and_respect_open_upper_bounds() {
        assert!(FieldRange::at_least(0.0).contains(1.0e9));
        assert!(!FieldRange::between(0.0, 1.0).contains(1.5));
        assert!(!FieldRange::at_least(0.0).contains(f32::NAN));
    }
}
