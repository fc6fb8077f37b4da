//! Producer half of the synchronization contract

use tracing::{debug, info, trace};

use crate::schema::{SNAPSHOT_WORDS, SharedMemory};
use crate::segment::{self, SegmentMemory};
use crate::{Result, TelemetryError};

/// The single writer of a segment.
///
/// Not `Clone`: one writer per segment handle is enforced in-process. Across
/// processes a single producer is assumed. Every publish overwrites the whole
/// record and never waits for readers.
#[derive(Debug)]
pub struct SnapshotWriter<S: SegmentMemory> {
    segment: S,
    current: SharedMemory,
    frames_published: u64,
}

impl<S: SegmentMemory> SnapshotWriter<S> {
    /// Take over `segment` and write a fresh unset record into it.
    pub fn initialize(segment: S) -> Result<Self> {
        let mut writer = Self::checked(segment, SharedMemory::default())?;
        writer.store();
        info!(segment = writer.segment.name(), "Initialized telemetry record");
        Ok(writer)
    }

    /// Take over `segment` keeping whatever record it already holds.
    pub fn attach(segment: S) -> Result<Self> {
        segment::check_capacity(&segment)?;
        let current = SharedMemory::from_words(segment::load_words(segment.words()));
        debug!(
            segment = segment.name(),
            version = current.version,
            "Attached writer to existing record"
        );
        Self::checked(segment, current)
    }

    fn checked(segment: S, current: SharedMemory) -> Result<Self> {
        segment::check_capacity(&segment)?;
        if !segment.is_writable() {
            return Err(TelemetryError::segment_error(segment.name(), "write", None));
        }
        Ok(Self { segment, current, frames_published: 0 })
    }

    /// Overwrite the shared record with `snapshot`.
    pub fn publish(&mut self, snapshot: &SharedMemory) {
        self.current = *snapshot;
        self.store();
    }

    /// Modify the last published record in place and publish the result.
    pub fn update<F>(&mut self, f: F)
    where
        F: FnOnce(&mut SharedMemory),
    {
        f(&mut self.current);
        self.store();
    }

    fn store(&mut self) {
        let words: [u32; SNAPSHOT_WORDS] = self.current.to_words();
        segment::store_words(self.segment.words(), &words);
        self.frames_published += 1;
        trace!(frame = self.frames_published, "Published snapshot");
    }

    /// Number of publishes since this writer was created.
    pub fn frames_published(&self) -> u64 {
        self.frames_published
    }

    /// The record as last published by this writer.
    pub fn current(&self) -> &SharedMemory {
        &self.current
    }

    pub fn segment(&self) -> &S {
        &self.segment
    }

    /// Give the segment back. The record stays as last published.
    pub fn into_segment(self) -> S {
        self.segment
    }
}
