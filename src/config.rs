//! Connection configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Name of the file mapping the simulator publishes its record in.
pub const DEFAULT_SEGMENT_NAME: &str = "$pcars$";

/// Settings for a polling [`Connection`](crate::Connection).
///
/// Deserializes from any serde format; missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Segment to open (`$pcars$` for the simulator)
    pub segment_name: String,
    /// How often the segment is polled
    pub poll_interval_ms: u64,
    /// Quiet period after which an unchanged record is logged as stale
    pub stale_after_ms: u64,
    /// Consecutive retryable errors tolerated before the connection stops
    pub max_errors: u32,
    /// Comparisons made by each double-read before accepting a possibly torn copy
    pub consistent_read_attempts: u32,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            segment_name: DEFAULT_SEGMENT_NAME.to_string(),
            poll_interval_ms: 10,
            stale_after_ms: 5000,
            max_errors: 10,
            consistent_read_attempts: 3,
        }
    }
}

impl ConnectionConfig {
    pub fn with_segment_name(mut self, name: impl Into<String>) -> Self {
        self.segment_name = name.into();
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval_ms = interval.as_millis().try_into().unwrap_or(u64::MAX);
        self
    }

    pub fn with_stale_after(mut self, quiet: Duration) -> Self {
        self.stale_after_ms = quiet.as_millis().try_into().unwrap_or(u64::MAX);
        self
    }

    pub fn with_max_errors(mut self, max_errors: u32) -> Self {
        self.max_errors = max_errors;
        self
    }

    pub fn with_consistent_read_attempts(mut self, attempts: u32) -> Self {
        self.consistent_read_attempts = attempts;
        self
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn stale_after(&self) -> Duration {
        Duration::from_millis(self.stale_after_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_the_simulator_mapping() {
        let config = ConnectionConfig::default();
        assert_eq!(config.segment_name, "$pcars$");
        assert_eq!(config.poll_interval(), Duration::from_millis(10));
        assert_eq!(config.stale_after(), Duration::from_secs(5));
        assert_eq!(config.max_errors, 10);
        assert_eq!(config.consistent_read_attempts, 3);
    }

    #[test]
    fn builder_overrides_fields() {
        let config = ConnectionConfig::default()
            .with_segment_name("bench")
            .with_poll_interval(Duration::from_millis(50))
            .with_stale_after(Duration::from_secs(1))
            .with_max_errors(2)
            .with_consistent_read_attempts(1);

        assert_eq!(config.segment_name, "bench");
        assert_eq!(config.poll_interval_ms, 50);
        assert_eq!(config.stale_after_ms, 1000);
        assert_eq!(config.max_errors, 2);
        assert_eq!(config.consistent_read_attempts, 1);
    }

    #[test]
    fn serde_fills_missing_keys_with_defaults() {
        fn assert_serde<T: Serialize + for<'de> Deserialize<'de>>() {}
        assert_serde::<ConnectionConfig>();

        let config: ConnectionConfig =
            serde::de::Deserialize::deserialize(serde::de::value::MapDeserializer::<
                _,
                serde::de::value::Error,
            >::new(
                [("poll_interval_ms", 25u64)].into_iter()
            ))
            .unwrap();
        assert_eq!(config.poll_interval_ms, 25);
        assert_eq!(config.segment_name, "$pcars$");
    }
}
