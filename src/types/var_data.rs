//! Typed field extraction from raw record bytes

use super::{
    CarFlags, CrashState, FieldInfo, FieldType, FixedString, GameState, PerTyre, STRING_LENGTH_MAX,
    Sector, SessionState, TYRE_MAX, Terrain, TyreFlags, VEC_MAX, Vec3,
};
use crate::{Result, TelemetryError};

/// Trait for types that can be parsed from a record at a [`FieldInfo`].
///
/// Reads are native-endian and bounds checked; the field's declared type and
/// element count must match the requested Rust type.
pub trait VarData: Sized {
    /// Parse this type from `data` at the field's offset.
    fn from_bytes(data: &[u8], info: &FieldInfo) -> Result<Self>;
}

/// A value stored in exactly one 4-byte element.
pub trait FieldWord: Copy {
    /// Element type this value is stored as.
    const FIELD_TYPE: FieldType;

    fn from_word(raw: u32) -> Self;
}

fn check_shape(info: &FieldInfo, expected: FieldType, count: usize) -> Result<()> {
    if info.field_type != expected || info.count != count {
        return Err(TelemetryError::TypeConversion {
            details: format!(
                "Field '{}' is {:?}[{}], requested {:?}[{}]",
                info.name, info.field_type, info.count, expected, count
            ),
        });
    }
    Ok(())
}

fn word_at(data: &[u8], offset: usize) -> Result<u32> {
    let bytes = data
        .get(offset..offset + 4)
        .ok_or(TelemetryError::Memory { offset, source: None })?;

    Ok(u32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

fn words_at<const N: usize, T: FieldWord>(data: &[u8], info: &FieldInfo) -> Result<[T; N]> {
    check_shape(info, T::FIELD_TYPE, N)?;
    let mut values = [T::from_word(0); N];
    for (i, value) in values.iter_mut().enumerate() {
        *value = T::from_word(word_at(data, info.offset + i * 4)?);
    }
    Ok(values)
}

macro_rules! field_word {
    ($($ty:ty => $field_type:ident, |$raw:ident| $decode:expr;)*) => {
        $(
            impl FieldWord for $ty {
                const FIELD_TYPE: FieldType = FieldType::$field_type;

                fn from_word($raw: u32) -> Self {
                    $decode
                }
            }

            impl VarData for $ty {
                fn from_bytes(data: &[u8], info: &FieldInfo) -> Result<Self> {
                    let [value] = words_at::<1, $ty>(data, info)?;
                    Ok(value)
                }
            }
        )*
    };
}

field_word! {
    u32 => UInt32, |raw| raw;
    i32 => Int32, |raw| raw as i32;
    f32 => Float32, |raw| f32::from_bits(raw);
    CarFlags => UInt32, |raw| CarFlags::from_raw(raw);
    TyreFlags => UInt32, |raw| TyreFlags::from_raw(raw);
    GameState => UInt32, |raw| GameState::from_raw(raw);
    SessionState => UInt32, |raw| SessionState::from_raw(raw);
    Sector => UInt32, |raw| Sector::from_raw(raw);
    CrashState => UInt32, |raw| CrashState::from_raw(raw);
    Terrain => UInt32, |raw| Terrain::from_raw(raw);
}

impl<T: FieldWord> VarData for PerTyre<T> {
    fn from_bytes(data: &[u8], info: &FieldInfo) -> Result<Self> {
        Ok(PerTyre(words_at::<TYRE_MAX, T>(data, info)?))
    }
}

impl VarData for Vec3 {
    fn from_bytes(data: &[u8], info: &FieldInfo) -> Result<Self> {
        Ok(Vec3::from_array(words_at::<VEC_MAX, f32>(data, info)?))
    }
}

impl VarData for FixedString {
    fn from_bytes(data: &[u8], info: &FieldInfo) -> Result<Self> {
        check_shape(info, FieldType::Char, STRING_LENGTH_MAX)?;
        let bytes = data
            .get(info.offset..info.offset + STRING_LENGTH_MAX)
            .ok_or(TelemetryError::Memory { offset: info.offset, source: None })?;

        let mut raw = [0u8; STRING_LENGTH_MAX];
        raw.copy_from_slice(bytes);
        Ok(FixedString::from_raw(raw))
    }
}

impl VarData for String {
    fn from_bytes(data: &[u8], info: &FieldInfo) -> Result<Self> {
        Ok(FixedString::from_bytes(data, info)?.to_string_lossy().into_owned())
    }
}
