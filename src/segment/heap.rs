//! In-process segment

use std::sync::atomic::AtomicU32;

use super::SegmentMemory;
use crate::schema::SNAPSHOT_WORDS;

/// A zero-initialized record living on the heap.
///
/// Share it between a writer and readers with `Arc<HeapSegment>`.
#[derive(Debug)]
pub struct HeapSegment {
    words: Box<[AtomicU32]>,
}

impl HeapSegment {
    pub fn new() -> Self {
        Self { words: (0..SNAPSHOT_WORDS).map(|_| AtomicU32::new(0)).collect() }
    }
}

impl Default for HeapSegment {
    fn default() -> Self {
        Self::new()
    }
}

impl SegmentMemory for HeapSegment {
    fn words(&self) -> &[AtomicU32] {
        &self.words
    }

    fn name(&self) -> &str {
        "heap"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::Ordering;

    #[test]
    fn new_segment_is_zeroed_and_sized() {
        let segment = HeapSegment::new();
        assert_eq!(segment.words().len(), SNAPSHOT_WORDS);
        assert!(segment.words().iter().all(|w| w.load(Ordering::Relaxed) == 0));
        assert!(segment.is_writable());
    }

    #[test]
    fn arc_shares_the_same_words() {
        let segment = Arc::new(HeapSegment::new());
        let other = Arc::clone(&segment);

        segment.words()[0].store(3, Ordering::Relaxed);
        assert_eq!(other.words()[0].load(Ordering::Relaxed), 3);
    }
}
