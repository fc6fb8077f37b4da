//! Win32 file mapping segment

use crate::schema::{SNAPSHOT_SIZE, SNAPSHOT_WORDS};
use crate::segment::SegmentMemory;
use crate::{Result, TelemetryError};
use std::ptr::NonNull;
use std::sync::atomic::AtomicU32;
use tracing::{debug, info, trace};
use windows::Win32::Foundation::{CloseHandle, HANDLE, INVALID_HANDLE_VALUE};
use windows::Win32::System::Memory::{
    CreateFileMappingW, FILE_MAP_READ, FILE_MAP_WRITE, MEMORY_MAPPED_VIEW_ADDRESS, MapViewOfFile,
    OpenFileMappingW, PAGE_READWRITE, UnmapViewOfFile,
};
use windows::core::PCWSTR;

/// A view of a named Windows file mapping holding one record.
pub struct MappedSegment {
    name: String,
    mapping: HANDLE,
    base: NonNull<u8>,
    writable: bool,
}

impl MappedSegment {
    /// Map an existing mapping read-only, as a consumer.
    pub fn open(name: &str) -> Result<Self> {
        trace!(name, "Opening file mapping");

        let mapping = unsafe {
            let wide_name = wide_string(name);
            OpenFileMappingW(FILE_MAP_READ.0, false, PCWSTR::from_raw(wide_name.as_ptr()))
                .map_err(|e| {
                    TelemetryError::connection_failed_with_source(
                        format!("file mapping '{}' is not available", name),
                        Box::new(e),
                    )
                })?
        };

        let segment = Self::map_view(name, mapping, false)?;
        debug!(name, "Opened file mapping read-only");
        Ok(segment)
    }

    /// Create (or reuse) a mapping and map it read-write, as a producer.
    pub fn create(name: &str) -> Result<Self> {
        let mapping = unsafe {
            let wide_name = wide_string(name);
            CreateFileMappingW(
                INVALID_HANDLE_VALUE,
                None,
                PAGE_READWRITE,
                0,
                SNAPSHOT_SIZE as u32,
                PCWSTR::from_raw(wide_name.as_ptr()),
            )
            .map_err(|e| TelemetryError::windows_api_error("CreateFileMappingW", e))?
        };

        let segment = Self::map_view(name, mapping, true)?;
        info!(name, size = SNAPSHOT_SIZE, "Created file mapping");
        Ok(segment)
    }

    fn map_view(name: &str, mapping: HANDLE, writable: bool) -> Result<Self> {
        let access = if writable { FILE_MAP_READ | FILE_MAP_WRITE } else { FILE_MAP_READ };

        let base = unsafe {
            let view = MapViewOfFile(mapping, access, 0, 0, SNAPSHOT_SIZE);
            NonNull::new(view.Value as *mut u8)
        };

        match base {
            Some(base) => Ok(Self { name: name.to_string(), mapping, base, writable }),
            None => {
                let win_err = windows::core::Error::from_thread();
                unsafe {
                    let _ = CloseHandle(mapping);
                }
                Err(TelemetryError::windows_api_error("MapViewOfFile", win_err))
            }
        }
    }
}

impl SegmentMemory for MappedSegment {
    fn words(&self) -> &[AtomicU32] {
        // SAFETY: the view is page aligned, SNAPSHOT_SIZE bytes long and
        // unmapped only on drop.
        unsafe { std::slice::from_raw_parts(self.base.as_ptr().cast::<AtomicU32>(), SNAPSHOT_WORDS) }
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn is_writable(&self) -> bool {
        self.writable
    }
}

impl Drop for MappedSegment {
    fn drop(&mut self) {
        unsafe {
            let addr = MEMORY_MAPPED_VIEW_ADDRESS { Value: self.base.as_ptr() as *mut _ };
            let _ = UnmapViewOfFile(addr);
            let _ = CloseHandle(self.mapping);
        }
    }
}

// SAFETY: the struct only holds a mapping handle and a view pointer, and the
// view is accessed exclusively through atomics.
unsafe impl Send for MappedSegment {}
unsafe impl Sync for MappedSegment {}

impl std::fmt::Debug for MappedSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MappedSegment")
            .field("name", &self.name)
            .field("writable", &self.writable)
            .finish()
    }
}

/// Convert string to null-terminated wide string for Windows APIs
fn wide_string(s: &str) -> Vec<u16> {
    use std::ffi::OsStr;
    use std::os::windows::ffi::OsStrExt;
    OsStr::new(s).encode_wide().chain(std::iter::once(0)).collect()
}

#[cfg(all(test, windows))]
mod tests {
    use super::*;
    use std::sync::atomic::Ordering;

    fn unique_name(tag: &str) -> String {
        format!("Local\\pcars_shm_test_{}_{}", tag, std::process::id())
    }

    #[test]
    fn created_mapping_is_visible_to_readers() {
        let name = unique_name("visible");
        let producer = MappedSegment::create(&name).unwrap();
        producer.words()[0].store(3, Ordering::Relaxed);

        let consumer = MappedSegment::open(&name).unwrap();
        assert!(!consumer.is_writable());
        assert_eq!(consumer.words()[0].load(Ordering::Relaxed), 3);
    }

    #[test]
    fn missing_mapping_is_a_retryable_connection_error() {
        let error = MappedSegment::open(&unique_name("missing")).unwrap_err();
        assert!(matches!(error, TelemetryError::Connection { .. }));
        assert!(error.is_retryable());
    }

    #[test]
    #[ignore = "simulator_required"]
    fn opens_live_simulator_mapping() {
        let segment = MappedSegment::open("$pcars$").expect("Simulator mapping not found");
        assert_eq!(segment.words()[0].load(Ordering::Relaxed), crate::SHARED_MEMORY_VERSION);
    }
}
