//! Memory hosting the telemetry record.
//!
//! A segment is an explicit, externally owned resource: the producer and every
//! consumer are handed one instead of reaching for a process-wide global.
//! All access goes through 32-bit atomic words. Every field of the record is
//! exactly one word or an array of whole words, so a concurrent update can
//! tear a snapshot only between fields, never inside one.
//!
//! Implementations:
//! - [`HeapSegment`]: in-process, for tests and same-process producers
//! - [`SharedSegment`]: named cross-process segment on every platform
//! - `windows::MappedSegment`: the simulator's own file mapping (Windows only)

mod heap;
mod shmem;

pub use heap::HeapSegment;
pub use shmem::SharedSegment;

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering, fence};

use crate::schema::SNAPSHOT_WORDS;
use crate::{Result, TelemetryError};

/// Memory holding one record as [`SNAPSHOT_WORDS`](crate::schema::SNAPSHOT_WORDS) words.
pub trait SegmentMemory: Send + Sync {
    /// The record's words. Must be at least `SNAPSHOT_WORDS` long.
    fn words(&self) -> &[AtomicU32];

    /// Name used in logs and errors.
    fn name(&self) -> &str;

    /// Whether the mapping permits stores. Read-only views must never be written.
    fn is_writable(&self) -> bool {
        true
    }
}

impl<T: SegmentMemory + ?Sized> SegmentMemory for Arc<T> {
    fn words(&self) -> &[AtomicU32] {
        (**self).words()
    }

    fn name(&self) -> &str {
        (**self).name()
    }

    fn is_writable(&self) -> bool {
        (**self).is_writable()
    }
}

impl<T: SegmentMemory + ?Sized> SegmentMemory for Box<T> {
    fn words(&self) -> &[AtomicU32] {
        (**self).words()
    }

    fn name(&self) -> &str {
        (**self).name()
    }

    fn is_writable(&self) -> bool {
        (**self).is_writable()
    }
}

/// Fail unless `segment` can hold a whole record.
pub(crate) fn check_capacity<S: SegmentMemory + ?Sized>(segment: &S) -> Result<()> {
    let len = segment.words().len();
    if len < SNAPSHOT_WORDS {
        return Err(TelemetryError::memory_access_error(len * 4));
    }
    Ok(())
}

/// Overwrite the record word by word.
///
/// The release fence orders this frame after every earlier one: a reader that
/// observes any word of it also observes all previous frames completely.
pub(crate) fn store_words(words: &[AtomicU32], values: &[u32; SNAPSHOT_WORDS]) {
    fence(Ordering::Release);
    for (word, value) in words.iter().zip(values) {
        word.store(*value, Ordering::Relaxed);
    }
}

/// Copy the record word by word. Fields may come from different frames.
pub(crate) fn load_words(words: &[AtomicU32]) -> [u32; SNAPSHOT_WORDS] {
    let mut values = [0u32; SNAPSHOT_WORDS];
    for (value, word) in values.iter_mut().zip(words) {
        *value = word.load(Ordering::Relaxed);
    }
    fence(Ordering::Acquire);
    values
}

/// First word of the record.
pub(crate) fn load_version(words: &[AtomicU32]) -> u32 {
    words.first().map_or(0, |word| word.load(Ordering::Acquire))
}
