//! Record Layout & Versioning
//!
//! This module defines the version 3 shared memory record and everything
//! needed to interpret it safely.
//!
//! # Architecture
//!
//! - [`SnapshotHeader`] covers the leading words; a reader checks the version
//!   there before touching anything else
//! - [`SharedMemory`] is the complete `repr(C)` record, size and offsets
//!   asserted at compile time
//! - [`FIELDS`] is the field catalog with units, ranges and unset sentinels
//! - [`check_ranges`] validates a snapshot against the catalog
//!
//! # Versioning
//!
//! Appending fields is non-breaking. Inserting, removing, reordering or
//! resizing any field changes the layout and bumps [`SHARED_MEMORY_VERSION`].

pub mod fields;
pub mod header;
mod ranges;
mod shared_memory;

pub use fields::{FIELDS, field, read_value};
pub use header::{HEADER_SIZE, SnapshotHeader};
pub use ranges::{RangeViolation, check_ranges};
pub use shared_memory::SharedMemory;

pub use crate::types::{STRING_LENGTH_MAX, TYRE_MAX, VEC_MAX};

/// Layout version written to `mVersion` by this contract
pub const SHARED_MEMORY_VERSION: u32 = 3;

/// Size of one record in bytes
pub const SNAPSHOT_SIZE: usize = 1504;

/// Size of one record in 32-bit words
pub const SNAPSHOT_WORDS: usize = SNAPSHOT_SIZE / 4;
