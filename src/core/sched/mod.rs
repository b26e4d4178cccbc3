//! External scheduler interface
//!
//! Task creation, suspension and resumption belong to the scheduler the
//! firmware links against. This module only states what the task wrapper
//! needs from it, plus the small helpers the rest of the firmware calls.

use crate::error::{OsError, OsResult};
use crate::task::TaskAttrs;
use crate::types::{OsTick, SchedulerMutexId, SchedulerTaskId};

/// Task entry point function type
pub type OsTaskFn = fn(*mut ()) -> !;

/// Contract with the external preemptive scheduler
pub trait Scheduler: Sync {
    /// Register a task that runs `entry(arg)`
    ///
    /// Fails with [`OsError::TaskNoMoreTcb`](crate::OsError::TaskNoMoreTcb)
    /// when the scheduler is out of task slots.
    fn create(&self, entry: OsTaskFn, arg: *mut (), attrs: &TaskAttrs) -> OsResult<SchedulerTaskId>;

    /// Remove a task from scheduling. Suspending the calling task blocks
    /// until it is resumed.
    fn suspend(&self, id: SchedulerTaskId);

    /// Reinstate a suspended task (task context)
    fn resume(&self, id: SchedulerTaskId);

    /// Reinstate a suspended task (interrupt context)
    ///
    /// Returns `true` if a context switch is warranted at handler exit.
    fn resume_from_isr(&self, id: SchedulerTaskId) -> bool;

    /// Deferred yield, valid only in an interrupt epilogue
    fn yield_from_isr(&self);

    /// Check if the caller runs in handler mode
    fn is_isr_context(&self) -> bool {
        crate::critical::is_isr_context()
    }

    /// Current tick (task context)
    fn tick(&self) -> OsTick;

    /// Current tick (interrupt context)
    fn tick_from_isr(&self) -> OsTick {
        self.tick()
    }

    /// Block the calling task for `ticks`
    fn delay(&self, ticks: OsTick);

    /// Give up the processor to another ready task
    fn yield_now(&self);

    /// Start multitasking. Never returns.
    fn start(&self) -> !;

    // ============ Mutex objects (optional) ============

    /// Allocate a mutex object
    ///
    /// Schedulers without mutexes keep the default, which makes every
    /// [`SchedMutex`](crate::sync::sched_mutex::SchedMutex) unusable.
    fn mutex_create(&self) -> OsResult<SchedulerMutexId> {
        Err(OsError::ObjType)
    }

    /// Take a mutex (task context)
    ///
    /// With `block` the calling task waits until the mutex is free;
    /// otherwise this is a single attempt. Returns `true` if taken.
    fn mutex_take(&self, _id: SchedulerMutexId, _block: bool) -> bool {
        false
    }

    /// Give a mutex back (task context)
    fn mutex_give(&self, _id: SchedulerMutexId) {}

    /// Give a mutex back (interrupt context)
    ///
    /// Returns `true` if a woken waiter warrants a context switch at handler
    /// exit.
    fn mutex_give_from_isr(&self, _id: SchedulerMutexId) -> bool {
        false
    }
}

/// Current tick, choosing the interrupt-safe variant when needed
#[inline]
pub fn current_tick<S: Scheduler + ?Sized>(sched: &S) -> OsTick {
    if sched.is_isr_context() {
        sched.tick_from_isr()
    } else {
        sched.tick()
    }
}

/// Suspend execution of the current task for `ticks`
#[inline]
pub fn task_wait<S: Scheduler + ?Sized>(sched: &S, ticks: OsTick) {
    sched.delay(ticks);
}

/// Cause the current task to yield the processor
#[inline]
pub fn task_yield<S: Scheduler + ?Sized>(sched: &S) {
    sched.yield_now();
}

/// Start the scheduler
///
/// Only returns if the scheduler itself crashed, which it does not by
/// contract.
pub fn start<S: Scheduler + ?Sized>(sched: &S) -> ! {
    crate::info!("Starting scheduler");
    sched.start()
}
