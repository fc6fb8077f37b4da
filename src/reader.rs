//! Consumer half of the synchronization contract

use std::sync::Arc;

use tracing::{trace, warn};

use crate::adapters::{FrameAdapter, SchemaProvider};
use crate::schema::{SharedMemory, SnapshotHeader};
use crate::segment::{self, SegmentMemory};
use crate::types::{FramePacket, ReadConsistency, SnapshotSchema};
use crate::Result;

/// Lock-free reader of a segment. Any number may read concurrently.
///
/// Every read is a whole-record copy. Nothing prevents the producer from
/// overwriting the record during the copy, so a plain [`read`](Self::read)
/// may mix fields of two frames; [`read_consistent`](Self::read_consistent)
/// narrows that window.
#[derive(Debug)]
pub struct SnapshotReader<S: SegmentMemory> {
    segment: S,
    schema: Arc<SnapshotSchema>,
}

impl<S: SegmentMemory> SnapshotReader<S> {
    /// Wrap `segment`, checking it can hold a record.
    pub fn new(segment: S) -> Result<Self> {
        segment::check_capacity(&segment)?;
        Ok(Self { segment, schema: Arc::new(SnapshotSchema::current()) })
    }

    /// Current `mVersion` of the record.
    pub fn version(&self) -> u32 {
        segment::load_version(self.segment.words())
    }

    /// The leading words of the record, without validation.
    pub fn header(&self) -> SnapshotHeader {
        let words = self.segment.words();
        let load = |i: usize| words[i].load(std::sync::atomic::Ordering::Acquire);
        SnapshotHeader::from_words(load(0), load(1), load(2))
    }

    /// Copy the record, refusing any version other than the compiled-in one.
    ///
    /// The version is checked before the copy and again on the copy, so a
    /// torn read straddling a version change still fails closed.
    pub fn read(&self) -> Result<SharedMemory> {
        SnapshotHeader::from_words(self.version(), 0, 0).validate()?;
        let snapshot = self.read_unchecked();
        SnapshotHeader::from_words(snapshot.version, 0, 0).validate()?;
        Ok(snapshot)
    }

    /// Copy the record without looking at the version.
    pub fn read_unchecked(&self) -> SharedMemory {
        SharedMemory::from_words(segment::load_words(self.segment.words()))
    }

    /// Copy the record until two consecutive copies are identical.
    ///
    /// Makes at most `max_attempts` comparisons (at least one). When no two
    /// consecutive copies match the last copy is returned as
    /// [`ReadConsistency::PossiblyTorn`].
    pub fn read_consistent(&self, max_attempts: u32) -> Result<(SharedMemory, ReadConsistency)> {
        let mut previous = self.read()?.to_words();

        for attempt in 0..max_attempts.max(1) {
            let current = self.read()?.to_words();
            if current == previous {
                trace!(attempt, "Consistent snapshot");
                return Ok((SharedMemory::from_words(current), ReadConsistency::Stable));
            }
            previous = current;
        }

        warn!(max_attempts, segment = self.segment.name(), "Snapshot may be torn");
        Ok((SharedMemory::from_words(previous), ReadConsistency::PossiblyTorn))
    }

    /// Read and decode the record through a [`FrameAdapter`].
    pub fn read_frame<T: FrameAdapter>(&self) -> Result<T> {
        let validation = T::validate_schema(&self.schema)?;
        let snapshot = self.read()?;
        let packet =
            FramePacket::new(snapshot, 0, ReadConsistency::PossiblyTorn, Arc::clone(&self.schema));
        Ok(T::adapt(&packet, &validation))
    }

    /// Shared handle to the field schema.
    pub fn schema(&self) -> Arc<SnapshotSchema> {
        Arc::clone(&self.schema)
    }

    pub fn segment(&self) -> &S {
        &self.segment
    }
}

impl<S: SegmentMemory> SchemaProvider for SnapshotReader<S> {
    fn get_schema(&self) -> &SnapshotSchema {
        &self.schema
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::TelemetryFrame;
    use crate::producer::SnapshotWriter;
    use crate::segment::HeapSegment;
    use crate::types::{GameState, SessionState};
    use crate::TelemetryError;

    fn pair() -> (SnapshotWriter<Arc<HeapSegment>>, SnapshotReader<Arc<HeapSegment>>) {
        let segment = Arc::new(HeapSegment::new());
        let writer = SnapshotWriter::initialize(Arc::clone(&segment)).unwrap();
        let reader = SnapshotReader::new(segment).unwrap();
        (writer, reader)
    }

    #[test]
    fn zeroed_segment_is_rejected() {
        let reader = SnapshotReader::new(HeapSegment::new()).unwrap();
        assert_eq!(reader.version(), 0);
        assert!(!reader.header().is_initialized());
        assert!(matches!(reader.read(), Err(TelemetryError::Version { found: 0, .. })));
    }

    #[test]
    fn reads_what_the_writer_published() {
        let (mut writer, reader) = pair();
        writer.update(|record| {
            record.set_game_state(GameState::InGamePlaying);
            record.set_session_state(SessionState::Qualify);
            record.speed = 33.0;
        });

        let snapshot = reader.read().unwrap();
        assert_eq!(snapshot, *writer.current());
        assert_eq!(reader.header().session_state(), SessionState::Qualify);
    }

    #[test]
    fn version_mismatch_fails_closed() {
        let (mut writer, reader) = pair();
        writer.update(|record| {
            record.version = 4;
            record.speed = 10.0;
        });

        assert!(matches!(
            reader.read(),
            Err(TelemetryError::Version { expected: 3, found: 4 })
        ));
        assert!(reader.read_consistent(3).is_err());
        assert!(reader.read_frame::<TelemetryFrame>().is_err());
        // The raw copy is still available to callers that opt out of the check.
        assert_eq!(reader.read_unchecked().speed, 10.0);
    }

    #[test]
    fn unchanged_segment_reads_are_stable_and_identical() {
        let (_writer, reader) = pair();

        let (first, consistency) = reader.read_consistent(3).unwrap();
        let second = reader.read().unwrap();

        assert_eq!(consistency, ReadConsistency::Stable);
        assert_eq!(first.as_bytes(), second.as_bytes());
    }

    #[test]
    fn read_frame_decodes_through_adapter() {
        let (mut writer, reader) = pair();
        writer.update(|record| record.gear = -1);

        let frame: TelemetryFrame = reader.read_frame().unwrap();
        assert_eq!(frame.car.gear, -1);
    }

    #[test]
    fn concurrent_reads_never_see_a_foreign_version() {
        let segment = Arc::new(HeapSegment::new());
        let mut writer = SnapshotWriter::initialize(Arc::clone(&segment)).unwrap();
        let reader = SnapshotReader::new(Arc::clone(&segment)).unwrap();

        let handle = std::thread::spawn(move || {
            for i in 0..2_000u32 {
                writer.update(|record| {
                    record.laps_completed = i;
                    record.current_lap = i + 1;
                });
            }
        });

        for _ in 0..2_000 {
            let (snapshot, _) = reader.read_consistent(3).unwrap();
            assert_eq!(snapshot.version, 3);
        }
        handle.join().unwrap();

        let last = reader.read().unwrap();
        assert_eq!(last.current_lap, last.laps_completed + 1);
    }
}
