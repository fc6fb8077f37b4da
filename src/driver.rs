//! Driver spawns and manages the polling task

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};

use super::provider::Provider;
use super::types::FramePacket;
use crate::session::SessionInfo;

/// Result of spawning driver tasks
pub struct DriverChannels {
    /// Receiver for telemetry frames
    pub frames: watch::Receiver<Option<Arc<FramePacket>>>,
    /// Receiver for session info updates
    pub sessions: watch::Receiver<Option<Arc<SessionInfo>>>,
    /// Cancellation token for graceful shutdown
    pub cancel: CancellationToken,
}

/// Driver spawns and manages the frame reader task
///
/// The task owns the Provider, publishes every snapshot on a watch channel and
/// publishes a new [`SessionInfo`] whenever the session identity changes.
pub struct Driver;

impl Driver {
    /// Spawn the frame reader for `provider`
    ///
    /// Retryable provider errors are retried with exponential backoff until
    /// `max_errors` consecutive failures; any other error ends the stream.
    pub fn spawn<P>(provider: P, max_errors: u32) -> DriverChannels
    where
        P: Provider,
    {
        let (frame_tx, frame_rx) = watch::channel(None);
        let (session_tx, session_rx) = watch::channel(None);
        let cancel = CancellationToken::new();
        let cancel_frame = cancel.clone();

        tokio::spawn(async move {
            Self::frame_reader_task(provider, max_errors, frame_tx, session_tx, cancel_frame)
                .await;
        });

        DriverChannels { frames: frame_rx, sessions: session_rx, cancel }
    }

    async fn frame_reader_task<P>(
        mut provider: P,
        max_errors: u32,
        frame_tx: watch::Sender<Option<Arc<FramePacket>>>,
        session_tx: watch::Sender<Option<Arc<SessionInfo>>>,
        cancel: CancellationToken,
    ) where
        P: Provider,
    {
        info!("Frame reader task started");
        let mut frame_count = 0u64;
        let mut error_count = 0u32;
        let mut session: Option<Arc<SessionInfo>> = None;

        loop {
            let result = tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Frame reader cancelled");
                    break;
                }
                result = provider.next_frame() => result,
            };

            match result {
                Ok(Some(packet)) => {
                    frame_count += 1;
                    error_count = 0;
                    trace!(sequence = packet.sequence, "Frame {}", frame_count);

                    let changed = session.as_ref().is_none_or(|s| !s.matches(&packet.snapshot));
                    if changed {
                        let next = Arc::new(SessionInfo::from_snapshot(
                            &packet.snapshot,
                            packet.sequence,
                        ));
                        debug!(
                            game_state = next.game_state.label(),
                            session_state = next.session_state.label(),
                            track = %next.track_name,
                            car = %next.car_name,
                            "Session changed"
                        );
                        session = Some(Arc::clone(&next));
                        let _ = session_tx.send(Some(next));
                    }

                    if frame_tx.send(Some(Arc::new(packet))).is_err() {
                        debug!("Frame receiver dropped, shutting down");
                        break;
                    }
                }
                Ok(None) => {
                    info!("Provider stream ended after {} frames", frame_count);
                    break;
                }
                Err(e) if !e.is_retryable() => {
                    error!("Provider failed: {}", e);
                    break;
                }
                Err(e) => {
                    error_count += 1;
                    warn!("Provider error ({}/{}): {}", error_count, max_errors, e);

                    if error_count >= max_errors {
                        error!("Too many provider errors, shutting down");
                        break;
                    }

                    // 50ms, 100ms, 200ms, ... capped at 1.6s
                    let backoff = Duration::from_millis(50 * (1 << error_count.min(5)));
                    tokio::select! {
                        _ = cancel.cancelled() => break,
                        _ = tokio::time::sleep(backoff) => {}
                    }
                }
            }
        }

        let _ = frame_tx.send(None);
        let _ = session_tx.send(None);
        info!("Frame reader task ended (processed {} frames)", frame_count);
    }
}
