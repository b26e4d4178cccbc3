//! Synchronization primitives
//!
//! Exclusive-access atomics, the spin mutex built on them and the blocking
//! mutex built on that. [`sched_mutex`] wraps a mutex owned by the scheduler
//! instead.

pub mod atomic;
pub mod guard;
pub mod mutex;
pub mod sched_mutex;
pub mod spin;
pub mod strategy;
