//! Worker side of the MapReduce runtime.
//!
//! A worker is a sequential loop: register, then keep asking the
//! coordinator for work until it is told the job is done.

pub mod core;
pub mod map;
pub mod reduce;

#[cfg(test)]
pub(crate) mod test_store;
