//! The simulator's own shared memory mapping
//!
//! The simulator publishes its record in a named Windows file mapping,
//! `$pcars$`. This module maps it directly with the Win32 API, the same way
//! any native consumer does.
//!
//! # Usage
//!
//! ```rust,ignore
//! use pcars_shm::windows::MappedSegment;
//! use pcars_shm::SnapshotReader;
//!
//! let segment = MappedSegment::open("$pcars$")?;
//! let reader = SnapshotReader::new(segment)?;
//! let snapshot = reader.read()?;
//! println!("{} at {:.1} m/s", snapshot.car_name, snapshot.speed);
//! ```

mod mapping;

pub use mapping::MappedSegment;
