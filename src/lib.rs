//! Concurrency core of a Cortex-M firmware runtime
//!
//! Provides:
//! - Exclusive-access (LDREX/STREX) atomic operations on 8/16/32-bit words
//! - A non-blocking spin mutex and a blocking mutex with pluggable
//!   wait/wake strategies
//! - Deferred rescheduling for interrupt handlers
//! - A task wrapper over an external preemptive scheduler

#![no_std]
#![deny(unsafe_op_in_unsafe_fn)]

// ============ Modules ============

pub mod log;
mod lang_items;

pub mod core;
pub mod sync;
pub mod port;

// ============ Re-exports ============

pub use self::core::config;
pub use self::core::config::*;
pub use self::core::critical;
pub use self::core::error;
pub use self::core::error::{OsError, OsResult};
pub use self::core::isr;
pub use self::core::isr::{enter_isr, leave_isr};
pub use self::core::sched;
pub use self::core::sched::Scheduler;
pub use self::core::task;
pub use self::core::task::{Callable, Task, TaskAttrs};
pub use self::core::time;
pub use self::core::types;
pub use self::core::types::*;

pub use sync::atomic::AtomicCell;
pub use sync::guard::ScopedLock;
pub use sync::mutex::{Mutex, SpinMutex, WfeMutex, WfiMutex};
pub use sync::sched_mutex::SchedMutex;
pub use sync::spin::SpinLock;
