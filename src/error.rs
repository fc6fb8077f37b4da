//! Error types for shared memory telemetry access.
//!
//! All errors implement the `std::error::Error` trait and carry structured
//! context for debugging and recovery guidance.
//!
//! ## Error Categories
//!
//! - **Connection Errors**: No producer segment to attach to
//! - **Version Errors**: The record was written by an incompatible build
//! - **Memory Errors**: Short buffers or out-of-bounds field offsets
//! - **Segment Errors**: Creating or opening a shared memory segment failed
//! - **Type Conversion Errors**: A field was read as the wrong type
//! - **Windows API Errors**: Platform-specific Windows operation failures
//!
//! Torn reads are not errors. A record caught mid-update is an accepted
//! steady-state condition of the contract and is reported through
//! [`ReadConsistency`](crate::ReadConsistency) instead.
//!
//! ## Recovery and Retry
//!
//! ```rust
//! use pcars_shm::TelemetryError;
//!
//! let error = TelemetryError::connection_failed("simulator not running");
//! if error.is_retryable() {
//!     for suggestion in error.recovery_suggestions() {
//!         println!("  - {}", suggestion);
//!     }
//! }
//! ```

use std::time::Duration;
use thiserror::Error;

#[cfg(windows)]
use windows_core as core;

/// Result type alias for telemetry operations.
pub type Result<T, E = TelemetryError> = std::result::Result<T, E>;

/// Main error type for telemetry operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum TelemetryError {
    #[error("Failed to connect to telemetry segment: {reason}")]
    Connection {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Unsupported shared memory version: expected {expected}, found {found}")]
    Version { expected: u32, found: u32 },

    #[error("Memory access out of bounds at offset {offset:#x}")]
    Memory {
        offset: usize,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Shared memory segment '{name}' {operation} failed")]
    Segment {
        name: String,
        operation: &'static str,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Operation timed out after {duration:?}")]
    Timeout { duration: Duration },

    #[error("Field '{field}' not found in shared memory schema")]
    FieldNotFound { field: String },

    #[error("Type conversion error: {details}")]
    TypeConversion { details: String },

    #[error("{feature} is only available on {required_platform}")]
    UnsupportedPlatform { feature: String, required_platform: String },

    #[error("Windows API error: {operation}")]
    #[cfg(windows)]
    WindowsApi {
        operation: String,
        #[source]
        source: core::Error,
    },

    #[error("Schema validation failed: {reason}")]
    SchemaValidation { reason: String },
}

impl TelemetryError {
    /// Returns whether this error is potentially recoverable through retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            TelemetryError::Connection { .. } => true,
            TelemetryError::Timeout { .. } => true,
            TelemetryError::Segment { .. } => true,
            TelemetryError::Memory { .. } => false,
            TelemetryError::Version { .. } => false,
            TelemetryError::FieldNotFound { .. } => false,
            TelemetryError::TypeConversion { .. } => false,
            TelemetryError::UnsupportedPlatform { .. } => false,
            #[cfg(windows)]
            TelemetryError::WindowsApi { .. } => true,
            TelemetryError::SchemaValidation { .. } => false,
        }
    }

    /// Returns suggested recovery actions for this error.
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            TelemetryError::Connection { .. } => vec![
                "Ensure the simulator is running",
                "Enable shared memory output in the simulator options",
                "Check the configured segment name",
            ],
            TelemetryError::Version { .. } => vec![
                "Update the simulator or this library to a matching contract version",
                "Do not decode fields of an unsupported record layout",
            ],
            TelemetryError::Memory { .. } => vec![
                "Check the buffer holds a complete snapshot",
                "Verify the segment is still mapped",
            ],
            TelemetryError::Segment { .. } => vec![
                "Check the segment name is not already in use",
                "Check permissions for creating shared memory",
                "Restart the producer process",
            ],
            TelemetryError::Timeout { .. } => vec![
                "Increase timeout duration",
                "Verify the producer is still publishing",
            ],
            TelemetryError::FieldNotFound { .. } => vec![
                "Check field name spelling (names match the C header, e.g. mSpeed)",
                "Use optional field access patterns",
            ],
            TelemetryError::TypeConversion { .. } => vec![
                "Check the field's declared type in the schema",
                "Use the matching VarData implementation",
            ],
            TelemetryError::UnsupportedPlatform { .. } => vec![
                "Use the portable shared segment on this platform",
                "Check documentation for platform requirements",
            ],
            #[cfg(windows)]
            TelemetryError::WindowsApi { .. } => vec![
                "Check Windows API permissions",
                "Verify the simulator created its file mapping",
            ],
            TelemetryError::SchemaValidation { .. } => vec![
                "Check that the field catalog matches the record layout",
                "Verify data structure integrity",
            ],
        }
    }

    /// Helper constructor for connection errors.
    pub fn connection_failed(reason: impl Into<String>) -> Self {
        TelemetryError::Connection { reason: reason.into(), source: None }
    }

    /// Helper constructor for connection errors with source.
    pub fn connection_failed_with_source(
        reason: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        TelemetryError::Connection { reason: reason.into(), source: Some(source) }
    }

    /// Helper constructor for memory access errors.
    pub fn memory_access_error(offset: usize) -> Self {
        TelemetryError::Memory { offset, source: None }
    }

    /// Helper constructor for version mismatches against the compiled-in contract.
    pub fn unsupported_version(found: u32) -> Self {
        TelemetryError::Version { expected: crate::schema::SHARED_MEMORY_VERSION, found }
    }

    /// Helper constructor for segment errors.
    pub fn segment_error(
        name: impl Into<String>,
        operation: &'static str,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        TelemetryError::Segment { name: name.into(), operation, source }
    }

    /// Helper constructor for Windows API errors.
    #[cfg(windows)]
    pub fn windows_api_error(operation: impl Into<String>, source: core::Error) -> Self {
        TelemetryError::WindowsApi { operation: operation.into(), source }
    }

    /// Helper constructor for schema validation errors.
    pub fn schema_validation_error(reason: impl Into<String>) -> Self {
        TelemetryError::SchemaValidation { reason: reason.into() }
    }

    /// Helper constructor for unsupported platform errors.
    pub fn unsupported_platform(
        feature: impl Into<String>,
        required_platform: impl Into<String>,
    ) -> Self {
        TelemetryError::UnsupportedPlatform {
            feature: feature.into(),
            required_platform: required_platform.into(),
        }
    }
}

#[cfg(windows)]
impl From<core::Error> for TelemetryError {
    fn from(err: core::Error) -> Self {
        TelemetryError::WindowsApi {
            operation: "Unknown Windows operation".to_string(),
            source: err,
        }
    }
}
