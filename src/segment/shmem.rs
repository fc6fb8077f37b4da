//! Named cross-process segment backed by the `shared_memory` crate

use std::sync::atomic::AtomicU32;

use shared_memory::{Shmem, ShmemConf};
use tracing::{debug, info};

use super::SegmentMemory;
use crate::schema::{SNAPSHOT_SIZE, SNAPSHOT_WORDS};
use crate::{Result, TelemetryError};

/// A record in OS shared memory, addressable by name from other processes.
///
/// The creating side owns the segment and removes it on drop; openers only
/// map it.
pub struct SharedSegment {
    shmem: Shmem,
}

// SAFETY: the mapping stays valid for the life of `Shmem` and is only
// accessed through atomics.
unsafe impl Send for SharedSegment {}
unsafe impl Sync for SharedSegment {}

impl SharedSegment {
    /// Create a new zero-initialized segment named `os_id`.
    pub fn create(os_id: &str) -> Result<Self> {
        let shmem = ShmemConf::new()
            .size(SNAPSHOT_SIZE)
            .os_id(os_id)
            .create()
            .map_err(|e| TelemetryError::segment_error(os_id, "create", Some(Box::new(e))))?;

        info!(os_id = shmem.get_os_id(), size = SNAPSHOT_SIZE, "Created shared segment");
        Ok(Self { shmem })
    }

    /// Create a segment with an OS-generated unique name.
    pub fn create_unique() -> Result<Self> {
        let shmem = ShmemConf::new()
            .size(SNAPSHOT_SIZE)
            .create()
            .map_err(|e| TelemetryError::segment_error("<unique>", "create", Some(Box::new(e))))?;

        info!(os_id = shmem.get_os_id(), size = SNAPSHOT_SIZE, "Created shared segment");
        Ok(Self { shmem })
    }

    /// Map an existing segment created by another process.
    pub fn open(os_id: &str) -> Result<Self> {
        let shmem = ShmemConf::new().os_id(os_id).open().map_err(|e| {
            TelemetryError::connection_failed_with_source(
                format!("shared segment '{}' is not available", os_id),
                Box::new(e),
            )
        })?;

        if shmem.len() < SNAPSHOT_SIZE {
            return Err(TelemetryError::memory_access_error(shmem.len()));
        }

        debug!(os_id, len = shmem.len(), "Opened shared segment");
        Ok(Self { shmem })
    }

    /// Name other processes pass to [`SharedSegment::open`].
    pub fn os_id(&self) -> &str {
        self.shmem.get_os_id()
    }

    pub fn is_owner(&self) -> bool {
        self.shmem.is_owner()
    }
}

impl SegmentMemory for SharedSegment {
    fn words(&self) -> &[AtomicU32] {
        // SAFETY: the mapping is page aligned, at least SNAPSHOT_SIZE bytes
        // (checked on open, requested on create) and lives as long as `self`.
        unsafe {
            std::slice::from_raw_parts(self.shmem.as_ptr().cast::<AtomicU32>(), SNAPSHOT_WORDS)
        }
    }

    fn name(&self) -> &str {
        self.os_id()
    }
}

impl std::fmt::Debug for SharedSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedSegment")
            .field("os_id", &self.os_id())
            .field("len", &self.shmem.len())
            .field("owner", &self.is_owner())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::Ordering;

    fn unique_name(tag: &str) -> String {
        format!("pcars_shm_test_{}_{}", tag, std::process::id())
    }

    #[test]
    fn created_segment_can_be_opened_by_name() {
        let name = unique_name("open");
        let created = SharedSegment::create(&name).unwrap();
        created.words()[0].store(3, Ordering::Relaxed);

        let opened = SharedSegment::open(created.os_id()).unwrap();
        assert_eq!(opened.words()[0].load(Ordering::Relaxed), 3);
        assert!(created.is_owner());
        assert!(!opened.is_owner());
    }

    #[test]
    fn opening_a_missing_segment_is_a_connection_error() {
        let result = SharedSegment::open(&unique_name("missing"));
        assert!(matches!(result, Err(TelemetryError::Connection { .. })));
    }

    #[test]
    fn creating_twice_fails() {
        let name = unique_name("twice");
        let _first = SharedSegment::create(&name).unwrap();
        let second = SharedSegment::create(&name);
        assert!(matches!(second, Err(TelemetryError::Segment { operation: "create", .. })));
    }
}
