//! Provider trait for data sources

use super::types::FramePacket;
use crate::Result;

/// Trait for telemetry data sources
///
/// Providers own their timing. A polling provider sleeps between reads; an
/// in-process producer could instead wake on every publish.
#[async_trait::async_trait]
pub trait Provider: Send + 'static {
    /// Get the next distinct snapshot
    ///
    /// Returns:
    /// - `Ok(Some(packet))` - A snapshot that differs from the previous one
    /// - `Ok(None)` - Source ended (normal termination)
    /// - `Err(e)` - Read failed; the driver retries only if `e.is_retryable()`
    async fn next_frame(&mut self) -> Result<Option<FramePacket>>;

    /// Get the polling rate in Hz
    ///
    /// The record carries no tick rate of its own, so this is the fastest rate
    /// at which the provider can observe changes.
    fn tick_rate(&self) -> f64;
}
