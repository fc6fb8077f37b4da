//! Concrete [`Provider`](crate::provider::Provider) implementations.

mod segment;

pub use segment::SegmentProvider;
