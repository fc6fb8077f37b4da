//! Record Header Parsing
//!
//! The first three words of the record identify what a consumer is looking
//! at before it commits to decoding the rest:
//!
//! ```c
//! unsigned int mVersion;       // layout version (3)
//! unsigned int mGameState;     // enum (Type#1)
//! unsigned int mSessionState;  // enum (Type#2)
//! ```
//!
//! Readers parse the header first and refuse to decode anything else when the
//! version does not match [`SHARED_MEMORY_VERSION`].

use crate::types::{GameState, SessionState};
use crate::{Result, TelemetryError};
use std::mem;
use tracing::{debug, trace};

use super::SHARED_MEMORY_VERSION;

/// Leading words of the record, matching the C layout.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotHeader {
    /// Layout version
    pub version: u32,
    /// Raw `mGameState`
    pub game_state: u32,
    /// Raw `mSessionState`
    pub session_state: u32,
}

/// Size of the header in bytes.
pub const HEADER_SIZE: usize = mem::size_of::<SnapshotHeader>();

impl SnapshotHeader {
    /// Parse the header from raw record bytes without validating it.
    pub fn parse(memory: &[u8]) -> Result<Self> {
        trace!(memory_len = memory.len(), "Parsing snapshot header");

        if memory.len() < HEADER_SIZE {
            return Err(TelemetryError::Memory { offset: memory.len(), source: None });
        }

        // Safety: length validated above, read_unaligned because the buffer
        // carries no alignment guarantee.
        let header = unsafe { std::ptr::read_unaligned(memory.as_ptr() as *const SnapshotHeader) };
        Ok(header)
    }

    /// Build the header from the first words of a segment.
    pub const fn from_words(version: u32, game_state: u32, session_state: u32) -> Self {
        Self { version, game_state, session_state }
    }

    /// Check the version against the compiled-in layout.
    pub fn validate(&self) -> Result<()> {
        if self.version != SHARED_MEMORY_VERSION {
            debug!(
                found = self.version,
                expected = SHARED_MEMORY_VERSION,
                "Rejecting record with unsupported version"
            );
            return Err(TelemetryError::unsupported_version(self.version));
        }
        Ok(())
    }

    pub const fn game_state(&self) -> GameState {
        GameState::from_raw(self.game_state)
    }

    pub const fn session_state(&self) -> SessionState {
        SessionState::from_raw(self.session_state)
    }

    /// Whether the producer has written the record at all.
    ///
    /// A mapping that exists but still reads all zeroes has version 0.
    pub const fn is_initialized(&self) -> bool {
        self.version != 0
    }
}
