//! Field element types and the dynamic value representation

use serde::{Deserialize, Serialize};

/// Element type of a record field.
///
/// Every numeric element is 4 bytes. Strings are arrays of `Char`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum FieldType {
    /// 32-bit unsigned integer (`unsigned int`), also used for enums and flags
    UInt32,
    /// 32-bit signed integer (`int`)
    Int32,
    /// 32-bit floating point (`float`)
    Float32,
    /// Single byte of a `char` buffer
    Char,
}

impl FieldType {
    /// Size in bytes of one element.
    pub const fn size(&self) -> usize {
        match self {
            FieldType::UInt32 | FieldType::Int32 | FieldType::Float32 => 4,
            FieldType::Char => 1,
        }
    }
}

/// Runtime value of any record field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum Value {
    UInt32(u32),
    Int32(i32),
    Float32(f32),
    Text(String),
    Array(Vec<Value>),
}

impl Value {
    /// Numeric view of a scalar value.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::UInt32(v) => Some(f64::from(*v)),
            Value::Int32(v) => Some(f64::from(*v)),
            Value::Float32(v) => Some(f64::from(*v)),
            Value::Text(_) | Value::Array(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(values) => Some(values),
            _ => None,
        }
    }
}
