//! Bounded 256-byte string buffer used for the identity fields

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;

/// Maximum length of every string buffer in the record, including the NUL.
pub const STRING_LENGTH_MAX: usize = 256;

/// A `char[STRING_LENGTH_MAX]` buffer.
///
/// The text ends at the first NUL byte. A buffer with no NUL is read as the
/// full 256 bytes and never beyond. Writers always leave room for a
/// terminator, so text longer than 255 bytes is truncated on store.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FixedString([u8; STRING_LENGTH_MAX]);

impl FixedString {
    /// An empty (all-NUL) buffer.
    pub const EMPTY: FixedString = FixedString([0; STRING_LENGTH_MAX]);

    /// Wrap a raw buffer exactly as read from the record.
    pub const fn from_raw(raw: [u8; STRING_LENGTH_MAX]) -> Self {
        Self(raw)
    }

    /// Store `text`, truncating on a UTF-8 boundary to at most 255 bytes.
    pub fn from_str_truncated(text: &str) -> Self {
        let mut buffer = Self::EMPTY;
        buffer.set(text);
        buffer
    }

    /// Replace the contents with `text`, truncated and NUL terminated.
    pub fn set(&mut self, text: &str) {
        let mut end = text.len().min(STRING_LENGTH_MAX - 1);
        while !text.is_char_boundary(end) {
            end -= 1;
        }

        self.0 = [0; STRING_LENGTH_MAX];
        self.0[..end].copy_from_slice(&text.as_bytes()[..end]);
    }

    /// Bytes up to (not including) the first NUL, or all 256 bytes.
    pub fn as_bytes(&self) -> &[u8] {
        let len = self.0.iter().position(|&b| b == 0).unwrap_or(STRING_LENGTH_MAX);
        &self.0[..len]
    }

    /// Whether the buffer contains a NUL terminator.
    pub fn is_terminated(&self) -> bool {
        self.0.contains(&0)
    }

    pub fn is_empty(&self) -> bool {
        self.0[0] == 0
    }

    /// Text content. Invalid UTF-8 is replaced rather than rejected.
    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.as_bytes())
    }

    /// Text content when it is valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(self.as_bytes()).ok()
    }

    /// The full underlying buffer, including bytes after the terminator.
    pub const fn raw(&self) -> &[u8; STRING_LENGTH_MAX] {
        &self.0
    }
}

impl Default for FixedString {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl fmt::Debug for FixedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FixedString({:?})", self.to_string_lossy())
    }
}

impl fmt::Display for FixedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}

impl From<&str> for FixedString {
    fn from(text: &str) -> Self {
        Self::from_str_truncated(text)
    }
}

impl Serialize for FixedString {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string_lossy())
    }
}

impl<'de> Deserialize<'de> for FixedString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = Cow::<'de, str>::deserialize(deserializer)?;
        Ok(Self::from_str_truncated(&text))
    }
}
