//! Type-safe Rust bindings for the Project CARS shared memory telemetry record.
//!
//! The simulator overwrites one fixed-layout record (version 3, 1504 bytes)
//! in a named shared memory segment every frame. Any number of consumers copy
//! it out without locking, so a snapshot may occasionally mix two frames.
//!
//! # Features
//!
//! - **Exact layout**: [`SharedMemory`] is `repr(C)` with every offset asserted at compile time
//! - **Fail closed**: records of any other version are rejected before decoding
//! - **Typed decode**: [`TelemetryFrame`] or your own [`FrameAdapter`]
//! - **Producer side**: [`SnapshotWriter`] publishes records for tests and tools
//! - **Async polling**: [`Connection`] streams distinct snapshots and session changes
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use pcars_shm::{Pcars, TelemetryFrame, UpdateRate};
//! use futures::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> pcars_shm::Result<()> {
//!     let connection = Pcars::connect().await?;
//!     let mut frames = Box::pin(connection.subscribe::<TelemetryFrame>(UpdateRate::Max(30))?);
//!
//!     while let Some(frame) = frames.next().await {
//!         println!("{:.1} m/s in gear {}", frame.car.speed, frame.car.gear);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Synchronous access
//!
//! ```rust
//! use pcars_shm::{HeapSegment, SnapshotReader, SnapshotWriter};
//! use std::sync::Arc;
//!
//! let segment = Arc::new(HeapSegment::new());
//! let mut writer = SnapshotWriter::initialize(Arc::clone(&segment))?;
//! writer.update(|record| record.speed = 45.5);
//!
//! let reader = SnapshotReader::new(segment)?;
//! assert_eq!(reader.read()?.speed, 45.5);
//! # Ok::<(), pcars_shm::TelemetryError>(())
//! ```

// Core types and error handling
pub mod adapters;
pub mod config;
mod error;
pub mod session;
pub mod types;

// Record layout and memory access
pub mod producer;
pub mod reader;
pub mod schema;
pub mod segment;

// Stream-based telemetry architecture
pub mod connection;
pub mod driver;
pub mod provider;
pub mod providers;
pub mod stream;

// Platform-specific modules
#[cfg(windows)]
pub mod windows;

// Core exports
pub use adapters::*;
pub use error::*;
pub use types::*;

pub use config::ConnectionConfig;
pub use connection::Connection;
pub use producer::SnapshotWriter;
pub use reader::SnapshotReader;
pub use schema::{SHARED_MEMORY_VERSION, SNAPSHOT_SIZE, SharedMemory};
pub use segment::{HeapSegment, SegmentMemory, SharedSegment};
pub use session::SessionInfo;

#[cfg(windows)]
pub use self::windows::MappedSegment;

/// Entry point for connecting to a running simulator.
///
/// Opens the configured segment the way the platform publishes it: the
/// simulator's own file mapping on Windows, a [`SharedSegment`] elsewhere.
///
/// # Example
///
/// ```rust,no_run
/// use pcars_shm::{ConnectionConfig, Pcars};
///
/// # #[tokio::main]
/// # async fn main() -> pcars_shm::Result<()> {
/// let connection = Pcars::connect_with(
///     ConnectionConfig::default().with_segment_name("$pcars$"),
/// )
/// .await?;
/// # Ok(())
/// # }
/// ```
pub struct Pcars;

impl Pcars {
    /// Connect to the simulator's `$pcars$` segment with default settings.
    ///
    /// # Errors
    ///
    /// Returns [`TelemetryError::Connection`] if the segment does not exist
    /// (the simulator is not running or shared memory output is disabled).
    pub async fn connect() -> Result<Connection> {
        Self::connect_with(ConnectionConfig::default()).await
    }

    /// Connect using `config`.
    pub async fn connect_with(config: ConnectionConfig) -> Result<Connection> {
        tracing::info!(segment = %config.segment_name, "Connecting to shared memory telemetry");

        #[cfg(windows)]
        let segment = crate::windows::MappedSegment::open(&config.segment_name)?;
        #[cfg(not(windows))]
        let segment = SharedSegment::open(&config.segment_name)?;

        Connection::attach(segment, &config).await
    }
}
