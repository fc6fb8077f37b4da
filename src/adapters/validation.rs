//! Validation types and field extraction strategies for adapters

use std::collections::HashMap;

use crate::types::{FieldInfo, FramePacket, SnapshotSchema, VarData};
use crate::{Result, TelemetryError};

/// Pre-computed extraction plan built during subscribe-time validation.
///
/// Holds the resolved [`FieldInfo`] of every field an adapter reads so the
/// per-frame path never consults the schema.
#[derive(Debug, Clone)]
pub struct AdapterValidation {
    /// Ordered list of field extraction operations
    pub extraction_plan: Vec<FieldExtraction>,
    /// Fast lookup from field name to extraction index
    index_map: HashMap<String, usize>,
}

impl AdapterValidation {
    /// Create a new validation plan with the given extraction operations.
    pub fn new(extraction_plan: Vec<FieldExtraction>) -> Self {
        let index_map = extraction_plan
            .iter()
            .enumerate()
            .filter_map(|(index, extraction)| {
                extraction.field_name().map(|name| (name.to_string(), index))
            })
            .collect();

        Self { extraction_plan, index_map }
    }

    /// Plan requiring every field in `names`, failing on the first missing one.
    pub fn require_all(schema: &SnapshotSchema, names: &[&str]) -> Result<Self> {
        let plan = names
            .iter()
            .map(|name| FieldExtraction::required(schema, name))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(plan))
    }

    /// Get the number of fields that will be extracted.
    pub fn field_count(&self) -> usize {
        self.extraction_plan.len()
    }

    /// Check if the validation plan contains any required fields.
    pub fn has_required_fields(&self) -> bool {
        self.extraction_plan.iter().any(FieldExtraction::is_required)
    }

    /// Lookup the extraction index for a field name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index_map.get(name).copied()
    }

    /// Read a field through the plan, `None` if it is missing or unreadable.
    pub fn fetch<T: VarData>(&self, packet: &FramePacket, name: &str) -> Option<T> {
        let info = self
            .index_of(name)
            .and_then(|index| self.extraction_plan.get(index))
            .and_then(FieldExtraction::field_info)
            .or_else(|| packet.schema.get_field(name))?;

        T::from_bytes(packet.data(), info).ok()
    }

    /// Read a field through the plan, falling back to `T::default()`.
    pub fn fetch_or_default<T>(&self, packet: &FramePacket, name: &str) -> T
    where
        T: VarData + Default,
    {
        self.fetch(packet, name).unwrap_or_default()
    }
}

/// Extraction strategy for a single adapter field.
#[derive(Debug, Clone)]
pub enum FieldExtraction {
    /// Field that must exist in the schema; validation fails if missing.
    Required {
        /// Field name in the record schema
        name: String,
        /// Field metadata from the schema
        info: FieldInfo,
    },

    /// Field that may or may not exist in the schema.
    Optional {
        /// Field name in the record schema
        name: String,
        /// Field metadata if present
        info: Option<FieldInfo>,
    },

    /// Adapter field with no record counterpart (application-managed).
    Skipped,
}

impl FieldExtraction {
    /// Resolve a required field, reporting it by name when absent.
    pub fn required(schema: &SnapshotSchema, name: &str) -> Result<Self> {
        let info = schema
            .get_field(name)
            .copied()
            .ok_or_else(|| TelemetryError::FieldNotFound { field: name.to_string() })?;
        Ok(FieldExtraction::Required { name: name.to_string(), info })
    }

    /// Resolve an optional field.
    pub fn optional(schema: &SnapshotSchema, name: &str) -> Self {
        FieldExtraction::Optional { name: name.to_string(), info: schema.get_field(name).copied() }
    }

    /// Get the record field name if this extraction involves one.
    pub fn field_name(&self) -> Option<&str> {
        match self {
            FieldExtraction::Required { name, .. } | FieldExtraction::Optional { name, .. } => {
                Some(name)
            }
            FieldExtraction::Skipped => None,
        }
    }

    /// Check if this field extraction requires the field to exist in the schema.
    pub fn is_required(&self) -> bool {
        matches!(self, FieldExtraction::Required { .. })
    }

    /// Get the field info if available.
    pub fn field_info(&self) -> Option<&FieldInfo> {
        match self {
            FieldExtraction::Required { info, .. } => Some(info),
            FieldExtraction::Optional { info, .. } => info.as_ref(),
            FieldExtraction::Skipped => None,
        }
    }
}
