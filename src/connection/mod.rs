//! Async polling connection.
//!
//! A [`Connection`] owns one driver task that polls a segment, and hands out
//! any number of typed subscriptions over the snapshots it observes.

mod live;

pub use live::Connection;

#[cfg(test)]
mod tests;
