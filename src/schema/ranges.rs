//! Consumer-side plausibility checks against the published field ranges.
//!
//! The producer is not required to clamp anything, so a reader that wants to
//! validate does it here. Values are never modified; unset sentinels are
//! accepted even when they fall outside the range.

use serde::Serialize;

use super::{FIELDS, SharedMemory, read_value};
use crate::types::{FieldRange, Value};

/// A field element outside its published range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RangeViolation {
    /// Header name of the field
    pub field: &'static str,
    /// Element index for array fields
    pub index: Option<usize>,
    pub value: f32,
    pub range: FieldRange,
}

/// Check every ranged field of `record`. An empty result means all in range.
pub fn check_ranges(record: &SharedMemory) -> Vec<RangeViolation> {
    let data = record.as_bytes();
    let mut violations = Vec::new();

    for info in FIELDS {
        let Some(range) = info.range else { continue };
        let Ok(value) = read_value(data, info) else { continue };

        let mut check = |index: Option<usize>, element: &Value| {
            let Some(number) = element.as_f64() else { return };
            let number = number as f32;
            if info.is_unset(number) || range.contains(number) {
                return;
            }
            violations.push(RangeViolation { field: info.name, index, value: number, range });
        };

        match &value {
            Value::Array(elements) => {
                for (i, element) in elements.iter().enumerate() {
                    check(Some(i), element);
                }
            }
            scalar => check(None, scalar),
        }
    }

    violations
}

impl SharedMemory {
    /// See [`check_ranges`].
    pub fn range_violations(&self) -> Vec<RangeViolation> {
        check_ranges(self)
    }
}
