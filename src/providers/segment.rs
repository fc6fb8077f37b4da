//! Polling provider over any segment

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info, trace, warn};

use crate::config::ConnectionConfig;
use crate::provider::Provider;
use crate::reader::SnapshotReader;
use crate::schema::SNAPSHOT_WORDS;
use crate::segment::SegmentMemory;
use crate::types::{FramePacket, SnapshotSchema, poll_hz};
use crate::Result;

/// Polls a segment and yields each snapshot that differs from the last.
///
/// Snapshots are compared word for word, so a record holding NaN still
/// compares equal to itself. A record whose version is zero has not been
/// initialized by a producer yet and is waited on, not rejected; any other
/// version mismatch is returned as an error.
pub struct SegmentProvider<S: SegmentMemory + 'static> {
    reader: SnapshotReader<S>,
    poll_interval: Duration,
    stale_after: Duration,
    consistent_read_attempts: u32,
    last_words: Option<[u32; SNAPSHOT_WORDS]>,
    sequence: u64,
    last_change: Instant,
    stale_reported: bool,
    waiting_reported: bool,
}

impl<S: SegmentMemory + 'static> SegmentProvider<S> {
    pub fn new(segment: S, config: &ConnectionConfig) -> Result<Self> {
        let reader = SnapshotReader::new(segment)?;
        info!(
            segment = reader.segment().name(),
            poll_interval_ms = config.poll_interval_ms,
            "Polling shared memory segment"
        );

        Ok(Self {
            reader,
            poll_interval: config.poll_interval(),
            stale_after: config.stale_after(),
            consistent_read_attempts: config.consistent_read_attempts,
            last_words: None,
            sequence: 0,
            last_change: Instant::now(),
            stale_reported: false,
            waiting_reported: false,
        })
    }

    pub fn schema(&self) -> Arc<SnapshotSchema> {
        self.reader.schema()
    }

    /// Distinct snapshots yielded so far.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    fn note_unchanged(&mut self) {
        if !self.stale_reported && self.last_change.elapsed() >= self.stale_after {
            warn!(
                segment = self.reader.segment().name(),
                quiet_for = ?self.last_change.elapsed(),
                "Record has not changed; producer may have stopped"
            );
            self.stale_reported = true;
        }
    }
}

#[async_trait::async_trait]
impl<S: SegmentMemory + 'static> Provider for SegmentProvider<S> {
    async fn next_frame(&mut self) -> Result<Option<FramePacket>> {
        loop {
            if self.reader.version() == 0 {
                if !self.waiting_reported {
                    info!("Waiting for the producer to initialize the record...");
                    self.waiting_reported = true;
                }
                tokio::time::sleep(self.poll_interval).await;
                continue;
            }

            let (snapshot, consistency) =
                self.reader.read_consistent(self.consistent_read_attempts)?;
            let words = snapshot.to_words();

            if self.last_words.as_ref() != Some(&words) {
                if self.stale_reported {
                    info!("Record updates resumed");
                    self.stale_reported = false;
                }
                if self.waiting_reported && self.sequence == 0 {
                    self.waiting_reported = false;
                    debug!("Producer initialized the record");
                }

                self.last_words = Some(words);
                self.last_change = Instant::now();
                self.sequence += 1;
                trace!(sequence = self.sequence, ?consistency, "New snapshot");

                return Ok(Some(FramePacket::new(
                    snapshot,
                    self.sequence,
                    consistency,
                    self.reader.schema(),
                )));
            }

            self.note_unchanged();
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    fn tick_rate(&self) -> f64 {
        poll_hz(self.poll_interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::producer::SnapshotWriter;
    use crate::segment::HeapSegment;
    use crate::types::ReadConsistency;
    use crate::TelemetryError;

    fn config() -> ConnectionConfig {
        ConnectionConfig::default().with_poll_interval(Duration::from_millis(5))
    }

    #[tokio::test]
    async fn yields_only_distinct_snapshots() {
        let segment = Arc::new(HeapSegment::new());
        let mut writer = SnapshotWriter::initialize(Arc::clone(&segment)).unwrap();
        let mut provider = SegmentProvider::new(Arc::clone(&segment), &config()).unwrap();

        let first = provider.next_frame().await.unwrap().unwrap();
        assert_eq!(first.sequence, 1);
        assert_eq!(first.consistency, ReadConsistency::Stable);

        writer.update(|record| record.speed = 12.0);
        let second = provider.next_frame().await.unwrap().unwrap();
        assert_eq!(second.sequence, 2);
        assert_eq!(second.snapshot.speed, 12.0);

        let unchanged =
            tokio::time::timeout(Duration::from_millis(40), provider.next_frame()).await;
        assert!(unchanged.is_err(), "identical record must not be yielded again");
    }

    #[tokio::test]
    async fn nan_fields_do_not_repeat_frames() {
        let segment = Arc::new(HeapSegment::new());
        let mut writer = SnapshotWriter::initialize(Arc::clone(&segment)).unwrap();
        writer.update(|record| record.steering = f32::NAN);
        let mut provider = SegmentProvider::new(segment, &config()).unwrap();

        provider.next_frame().await.unwrap().unwrap();
        let again = tokio::time::timeout(Duration::from_millis(40), provider.next_frame()).await;
        assert!(again.is_err());
    }

    #[tokio::test]
    async fn waits_for_an_uninitialized_record() {
        let segment = Arc::new(HeapSegment::new());
        let mut provider = SegmentProvider::new(Arc::clone(&segment), &config()).unwrap();

        let waiting = tokio::time::timeout(Duration::from_millis(30), provider.next_frame()).await;
        assert!(waiting.is_err());

        let _writer = SnapshotWriter::initialize(segment).unwrap();
        let packet = provider.next_frame().await.unwrap().unwrap();
        assert_eq!(packet.sequence, 1);
        assert_eq!(provider.sequence(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn quiet_record_warns_once_then_rearms() {
        let segment = Arc::new(HeapSegment::new());
        let mut writer = SnapshotWriter::initialize(Arc::clone(&segment)).unwrap();
        let config = config().with_stale_after(Duration::from_millis(50));
        let mut provider = SegmentProvider::new(segment, &config).unwrap();

        provider.next_frame().await.unwrap().unwrap();
        assert!(!provider.stale_reported);

        let quiet = tokio::time::timeout(Duration::from_millis(100), provider.next_frame()).await;
        assert!(quiet.is_err());
        assert!(provider.stale_reported);

        writer.update(|record| record.rpm = 4000.0);
        let resumed = provider.next_frame().await.unwrap().unwrap();
        assert_eq!(resumed.sequence, 2);
        assert!(!provider.stale_reported);

        let short = tokio::time::timeout(Duration::from_millis(20), provider.next_frame()).await;
        assert!(short.is_err());
        assert!(!provider.stale_reported);

        let long = tokio::time::timeout(Duration::from_millis(100), provider.next_frame()).await;
        assert!(long.is_err());
        assert!(provider.stale_reported);
    }

    #[tokio::test(start_paused = true)]
    async fn waiting_for_the_producer_is_not_staleness() {
        let segment = Arc::new(HeapSegment::new());
        let config = config().with_stale_after(Duration::from_millis(50));
        let mut provider = SegmentProvider::new(segment, &config).unwrap();

        let waiting = tokio::time::timeout(Duration::from_millis(200), provider.next_frame()).await;
        assert!(waiting.is_err());
        assert!(provider.waiting_reported);
        assert!(!provider.stale_reported);
    }

    #[tokio::test]
    async fn foreign_version_is_an_error() {
        let segment = Arc::new(HeapSegment::new());
        let mut writer = SnapshotWriter::initialize(Arc::clone(&segment)).unwrap();
        writer.update(|record| record.version = 2);
        let mut provider = SegmentProvider::new(segment, &config()).unwrap();

        let error = provider.next_frame().await.unwrap_err();
        assert!(matches!(error, TelemetryError::Version { expected: 3, found: 2 }));
        assert!(!error.is_retryable());
    }

    #[test]
    fn tick_rate_follows_poll_interval() {
        let provider = SegmentProvider::new(HeapSegment::new(), &config()).unwrap();
        assert!((provider.tick_rate() - 200.0).abs() < 1e-9);
    }
}
