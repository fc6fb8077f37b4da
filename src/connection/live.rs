//! Connection over a polled segment

use std::sync::Arc;

use futures::{Stream, StreamExt};
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::adapters::{FrameAdapter, SchemaProvider};
use crate::config::ConnectionConfig;
use crate::driver::Driver;
use crate::provider::Provider;
use crate::providers::SegmentProvider;
use crate::segment::SegmentMemory;
use crate::session::SessionInfo;
use crate::stream::ThrottleExt;
use crate::types::{FramePacket, SnapshotSchema, UpdateRate};
use crate::Result;

/// Polling connection to a telemetry segment
pub struct Connection {
    /// Frame watch receiver
    frames: watch::Receiver<Option<Arc<FramePacket>>>,

    /// Session watch receiver
    sessions: watch::Receiver<Option<Arc<SessionInfo>>>,

    /// Field schema
    schema: Arc<SnapshotSchema>,

    /// Polling frequency
    source_hz: f64,

    /// Cancellation token for stopping the driver
    cancel: CancellationToken,
}

impl Connection {
    /// Start polling `segment`.
    ///
    /// Succeeds as soon as the segment is large enough to hold a record; the
    /// streams wait until a producer has initialized it.
    pub async fn attach<S>(segment: S, config: &ConnectionConfig) -> Result<Self>
    where
        S: SegmentMemory + 'static,
    {
        let name = segment.name().to_string();
        let provider = SegmentProvider::new(segment, config)?;
        let schema = provider.schema();
        let connection = Self::with_provider(provider, schema, config.max_errors);

        info!(segment = %name, source_hz = connection.source_hz, "Connection established");
        Ok(connection)
    }

    /// Start a driver over any provider.
    ///
    /// Must be called within a tokio runtime.
    pub fn with_provider<P: Provider>(
        provider: P,
        schema: Arc<SnapshotSchema>,
        max_errors: u32,
    ) -> Self {
        let source_hz = provider.tick_rate();
        let channels = Driver::spawn(provider, max_errors);

        Self {
            frames: channels.frames,
            sessions: channels.sessions,
            schema,
            source_hz,
            cancel: channels.cancel,
        }
    }

    /// Subscribe to telemetry frames
    ///
    /// The adapter is validated once, here. The stream skips the wait for a
    /// producer and ends when the driver stops. Throttled subscriptions need
    /// a tokio runtime when created.
    pub fn subscribe<T>(&self, rate: UpdateRate) -> Result<impl Stream<Item = T> + 'static>
    where
        T: FrameAdapter + Send + 'static,
    {
        let validation = T::validate_schema(&self.schema)?;

        // Leading None means "no producer yet"; a None after frames means the driver stopped
        let frames = WatchStream::new(self.frames.clone())
            .skip_while(|opt| {
                let is_none = opt.is_none();
                async move { is_none }
            })
            .take_while(|opt| {
                let is_some = opt.is_some();
                async move { is_some }
            })
            .filter_map(|opt| async move { opt });

        let stream = match rate.throttle_interval(self.source_hz) {
            None => frames.map(move |packet| T::adapt(&packet, &validation)).boxed(),
            Some(interval) => frames
                .throttle(interval)
                .map(move |packet| T::adapt(&packet, &validation))
                .boxed(),
        };
        Ok(stream)
    }

    /// Get session updates as a stream
    ///
    /// Emits the current session immediately (if any), then each change.
    pub fn session_updates(&self) -> impl Stream<Item = Arc<SessionInfo>> + 'static {
        WatchStream::new(self.sessions.clone()).filter_map(|opt| async move { opt })
    }

    /// Get current session info (if any)
    pub fn current_session(&self) -> Option<Arc<SessionInfo>> {
        self.sessions.borrow().clone()
    }

    /// Most recent snapshot observed, if the driver has seen one and is still running.
    pub fn latest(&self) -> Option<Arc<FramePacket>> {
        self.frames.borrow().clone()
    }

    /// Whether the driver task is still polling.
    pub fn is_running(&self) -> bool {
        !self.cancel.is_cancelled() && self.frames.has_changed().is_ok()
    }

    /// Get the polling frequency
    pub fn source_hz(&self) -> f64 {
        self.source_hz
    }

    /// Get the field schema
    pub fn schema(&self) -> &SnapshotSchema {
        &self.schema
    }
}

impl SchemaProvider for Connection {
    fn get_schema(&self) -> &SnapshotSchema {
        &self.schema
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        debug!("Dropping connection");
        self.cancel.cancel();
    }
}
