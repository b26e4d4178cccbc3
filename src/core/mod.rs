//! Core runtime modules
//!
//! Configuration, errors, critical sections, interrupt bookkeeping, the
//! scheduler seam, the task wrapper and tick management.

pub mod config;
pub mod critical;
pub mod cs_cell;
pub mod error;
pub mod isr;
pub mod sched;
pub mod task;
pub mod time;
pub mod types;
