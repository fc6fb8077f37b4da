//! Frame adapter trait for type-safe telemetry extraction

use crate::types::{FramePacket, SnapshotSchema};

use super::AdapterValidation;

/// Dual-phase frame adapter trait providing subscribe-time validation and per-frame extraction.
///
/// `validate_schema()` runs once per subscription, `adapt()` runs for every
/// snapshot using the pre-computed extraction plan.
pub trait FrameAdapter: Sized {
    /// Validate the adapter against the record schema.
    ///
    /// This method:
    /// - Checks that all required fields exist in the schema
    /// - Validates type compatibility between adapter and record
    /// - Builds the extraction plan used by `adapt()`
    ///
    /// Called once per subscription, so lookups by name are acceptable here.
    fn validate_schema(schema: &SnapshotSchema) -> crate::Result<AdapterValidation>;

    /// Extract data from one snapshot using the pre-validated plan.
    ///
    /// Runs once per observed snapshot; must not fail. Fields that cannot be
    /// read fall back to defaults.
    fn adapt(packet: &FramePacket, validation: &AdapterValidation) -> Self;
}
