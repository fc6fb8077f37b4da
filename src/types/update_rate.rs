//! Update rate control for telemetry streams

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Update rate for telemetry streams
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum UpdateRate {
    /// Every distinct snapshot the poller observes
    Native,

    /// Throttled to maximum Hz.
    /// If the requested rate is at or above the polling rate, Native is used
    Max(u32),
}

impl UpdateRate {
    /// Normalize rate against the polling frequency.
    /// `Max(0)` is treated as Native.
    pub fn normalize(self, source_hz: f64) -> Self {
        match self {
            UpdateRate::Native | UpdateRate::Max(0) => UpdateRate::Native,
            UpdateRate::Max(hz) if f64::from(hz) >= source_hz => UpdateRate::Native,
            UpdateRate::Max(hz) => UpdateRate::Max(hz),
        }
    }

    /// Check if throttling is needed
    pub fn needs_throttle(self, source_hz: f64) -> bool {
        matches!(self.normalize(source_hz), UpdateRate::Max(_))
    }

    /// Get throttle interval if needed
    pub fn throttle_interval(self, source_hz: f64) -> Option<Duration> {
        match self.normalize(source_hz) {
            UpdateRate::Native => None,
            UpdateRate::Max(hz) => Some(Duration::from_secs_f64(1.0 / f64::from(hz))),
        }
    }
}

/// Polling frequency for a given interval.
pub(crate) fn poll_hz(interval: Duration) -> f64 {
    if interval.is_zero() { f64::INFINITY } else { 1.0 / interval.as_secs_f64() }
}
