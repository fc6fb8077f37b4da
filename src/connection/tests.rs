//! Integration tests for the connection layer
//!
//! A heap segment and an in-process writer stand in for the simulator.

use super::*;
use crate::adapters::{AdapterValidation, FieldExtraction, FrameAdapter, TelemetryFrame};
use crate::config::ConnectionConfig;
use crate::producer::SnapshotWriter;
use crate::segment::HeapSegment;
use crate::types::{FramePacket, GameState, SessionState, SnapshotSchema, UpdateRate};
use crate::{Result, TelemetryError};
use futures::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Debug)]
struct SimpleFrame {
    speed: f32,
}

impl FrameAdapter for SimpleFrame {
    fn validate_schema(schema: &SnapshotSchema) -> Result<AdapterValidation> {
        Ok(AdapterValidation::new(vec![FieldExtraction::required(schema, "mSpeed")?]))
    }

    fn adapt(packet: &FramePacket, validation: &AdapterValidation) -> Self {
        SimpleFrame { speed: validation.fetch_or_default(packet, "mSpeed") }
    }
}

struct NeedsBoost;

impl FrameAdapter for NeedsBoost {
    fn validate_schema(schema: &SnapshotSchema) -> Result<AdapterValidation> {
        Ok(AdapterValidation::new(vec![FieldExtraction::required(schema, "mBoostPressure")?]))
    }

    fn adapt(_packet: &FramePacket, _validation: &AdapterValidation) -> Self {
        NeedsBoost
    }
}

fn config() -> ConnectionConfig {
    ConnectionConfig::default().with_poll_interval(Duration::from_millis(2))
}

async fn live_pair() -> (SnapshotWriter<Arc<HeapSegment>>, Connection) {
    let _ = tracing_subscriber::fmt::try_init();
    let segment = Arc::new(HeapSegment::new());
    let writer = SnapshotWriter::initialize(Arc::clone(&segment)).unwrap();
    let connection = Connection::attach(segment, &config()).await.unwrap();
    (writer, connection)
}

#[tokio::test]
async fn subscription_sees_published_frames() {
    let (mut writer, connection) = live_pair().await;
    let mut frames = Box::pin(connection.subscribe::<SimpleFrame>(UpdateRate::Native).unwrap());

    let first = tokio::time::timeout(Duration::from_secs(1), frames.next()).await.unwrap().unwrap();
    assert_eq!(first.speed, 0.0);

    writer.update(|record| record.speed = 45.5);
    let frame = tokio::time::timeout(Duration::from_secs(1), async {
        loop {
            match frames.next().await {
                Some(frame) if frame.speed == 45.5 => return frame,
                Some(_) => continue,
                None => panic!("stream ended"),
            }
        }
    })
    .await
    .expect("published frame not observed");

    info!(speed = frame.speed, "Observed published frame");
}

#[tokio::test]
async fn full_frame_decodes_typed_values() {
    let (mut writer, connection) = live_pair().await;
    writer.update(|record| {
        record.set_game_state(GameState::InGamePlaying);
        record.set_session_state(SessionState::Race);
        record.gear = 3;
    });

    let mut frames = Box::pin(connection.subscribe::<TelemetryFrame>(UpdateRate::Native).unwrap());
    let frame = tokio::time::timeout(Duration::from_secs(1), frames.next()).await.unwrap().unwrap();

    assert_eq!(frame.game_state, GameState::InGamePlaying);
    assert_eq!(frame.session_state, SessionState::Race);
    assert_eq!(frame.car.gear, 3);
}

#[tokio::test]
async fn missing_field_fails_at_subscribe_time() {
    let (_writer, connection) = live_pair().await;
    let result = connection.subscribe::<NeedsBoost>(UpdateRate::Native);
    assert!(matches!(result, Err(TelemetryError::FieldNotFound { .. })));
}

#[tokio::test]
async fn subscription_waits_for_producer() {
    let _ = tracing_subscriber::fmt::try_init();
    let segment = Arc::new(HeapSegment::new());
    let connection = Connection::attach(Arc::clone(&segment), &config()).await.unwrap();
    let mut frames = Box::pin(connection.subscribe::<SimpleFrame>(UpdateRate::Native).unwrap());

    let early = tokio::time::timeout(Duration::from_millis(30), frames.next()).await;
    assert!(early.is_err(), "no frame before the producer initializes");
    assert!(connection.latest().is_none());

    let mut writer = SnapshotWriter::initialize(segment).unwrap();
    writer.update(|record| record.speed = 7.0);

    let frame = tokio::time::timeout(Duration::from_secs(1), async {
        loop {
            match frames.next().await {
                Some(frame) if frame.speed == 7.0 => return frame,
                Some(_) => continue,
                None => panic!("stream ended"),
            }
        }
    })
    .await
    .unwrap();
    assert_eq!(frame.speed, 7.0);
    assert!(connection.latest().is_some());
}

#[tokio::test]
async fn session_updates_follow_identity_changes() {
    let (mut writer, connection) = live_pair().await;
    let mut sessions = Box::pin(connection.session_updates());

    let initial =
        tokio::time::timeout(Duration::from_secs(1), sessions.next()).await.unwrap().unwrap();
    assert_eq!(initial.game_state, GameState::Exited);

    writer.update(|record| {
        record.set_game_state(GameState::InGamePlaying);
        record.set_track_name("Oulton Park");
    });

    let session = tokio::time::timeout(Duration::from_secs(1), async {
        loop {
            match sessions.next().await {
                Some(session) if session.track_name == "Oulton Park" => return session,
                Some(_) => continue,
                None => panic!("session stream ended"),
            }
        }
    })
    .await
    .unwrap();

    assert!(session.is_active());
    assert_eq!(
        connection.current_session().map(|s| s.track_name.clone()).as_deref(),
        Some("Oulton Park")
    );
}

#[tokio::test]
async fn version_change_ends_subscriptions() {
    let (mut writer, connection) = live_pair().await;
    let mut frames = Box::pin(connection.subscribe::<SimpleFrame>(UpdateRate::Native).unwrap());
    tokio::time::timeout(Duration::from_secs(1), frames.next()).await.unwrap().unwrap();

    writer.update(|record| record.version = 4);

    let ended = tokio::time::timeout(Duration::from_secs(1), async {
        while frames.next().await.is_some() {}
    })
    .await;
    assert!(ended.is_ok(), "stream must end once the record version is unsupported");

    let stopped = tokio::time::timeout(Duration::from_secs(1), async {
        while connection.is_running() {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    })
    .await;
    assert!(stopped.is_ok());
    assert!(connection.latest().is_none());
}

#[tokio::test]
async fn throttled_subscription_delivers_latest() {
    let (mut writer, connection) = live_pair().await;
    let mut frames = Box::pin(connection.subscribe::<SimpleFrame>(UpdateRate::Max(10)).unwrap());
    tokio::time::timeout(Duration::from_secs(1), frames.next()).await.unwrap().unwrap();

    for speed in 1..=20 {
        writer.update(|record| record.speed = speed as f32);
        tokio::time::sleep(Duration::from_millis(3)).await;
    }

    let frame = tokio::time::timeout(Duration::from_secs(1), async {
        loop {
            match frames.next().await {
                Some(frame) if frame.speed == 20.0 => return frame,
                Some(_) => continue,
                None => panic!("stream ended"),
            }
        }
    })
    .await
    .unwrap();
    assert_eq!(frame.speed, 20.0);
}

#[tokio::test]
async fn native_rate_above_poll_rate_is_not_throttled() {
    let (_writer, connection) = live_pair().await;
    assert!((connection.source_hz() - 500.0).abs() < 1e-9);
    assert!(!UpdateRate::Max(1000).needs_throttle(connection.source_hz()));
    assert!(UpdateRate::Max(60).needs_throttle(connection.source_hz()));
}

#[tokio::test]
async fn drop_stops_the_driver() {
    let (_writer, connection) = live_pair().await;
    let mut frames = Box::pin(connection.subscribe::<SimpleFrame>(UpdateRate::Native).unwrap());
    tokio::time::timeout(Duration::from_secs(1), frames.next()).await.unwrap().unwrap();

    drop(connection);

    let ended = tokio::time::timeout(Duration::from_secs(1), async {
        while frames.next().await.is_some() {}
    })
    .await;
    assert!(ended.is_ok());
}
