//! Coordinator side of the MapReduce runtime.
//!
//! Workers pull tasks over gRPC; the coordinator never pushes. A task moves
//! from its phase's pool into a lease when granted, and leaves the lease
//! either on a completion report or, after the lease timeout, back into the
//! pool.

pub mod core;
pub mod driver;
pub mod lease;
pub mod scheduler;
pub mod task_pool;
pub mod worker_registry;
