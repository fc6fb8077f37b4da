//! Frame packet types for stream-based architecture

use std::sync::Arc;
use std::time::Instant;

use super::SnapshotSchema;
use crate::schema::SharedMemory;

/// Whether a snapshot copy is known to be internally consistent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum ReadConsistency {
    /// Two consecutive copies were identical
    Stable,
    /// The producer may have been mid-update; fields can mix two frames
    PossiblyTorn,
}

impl ReadConsistency {
    pub const fn is_stable(self) -> bool {
        matches!(self, ReadConsistency::Stable)
    }
}

/// One snapshot copied out of the segment.
///
/// This is the fundamental data unit that flows through the system.
/// All other data (adaptations, session changes) is derived from this.
#[derive(Debug, Clone)]
pub struct FramePacket {
    /// Copied record (shared between subscribers)
    pub snapshot: Arc<SharedMemory>,

    /// Count of distinct snapshots observed by this consumer
    pub sequence: u64,

    /// Result of the double-read check for this copy
    pub consistency: ReadConsistency,

    /// When the copy was taken
    pub captured_at: Instant,

    /// Field schema for dynamic access
    pub schema: Arc<SnapshotSchema>,
}

impl FramePacket {
    /// Create a new frame packet
    pub fn new(
        snapshot: SharedMemory,
        sequence: u64,
        consistency: ReadConsistency,
        schema: Arc<SnapshotSchema>,
    ) -> Self {
        Self {
            snapshot: Arc::new(snapshot),
            sequence,
            consistency,
            captured_at: Instant::now(),
            schema,
        }
    }

    /// Raw record bytes.
    pub fn data(&self) -> &[u8] {
        self.snapshot.as_bytes()
    }
}
