//! Interrupt-context bookkeeping
//!
//! Interrupt handlers must not perform a full context switch in the middle of
//! the handler. A resume issued from handler mode only records that a
//! reschedule is wanted; the handler epilogue then triggers the scheduler's
//! deferred yield once.
//!
//! ```ignore
//! #[interrupt]
//! fn USART1() {
//!     cm3rt::isr::enter_isr();
//!     RX_TASK.resume().ok();
//!     cm3rt::isr::leave_isr(&SCHED);
//! }
//! ```

use crate::sched::Scheduler;
use crate::sync::atomic::AtomicCell;

/// Reschedule request flag shared by all interrupt handlers
///
/// A boolean, not a counter: any number of requests between
/// [`enter`](Self::enter) and [`leave`](Self::leave) collapse into one yield.
pub struct IsrContext {
    need_resched: AtomicCell<u8>,
}

/// The process-wide tracker
pub static ISR_CONTEXT: IsrContext = IsrContext::new();

impl IsrContext {
    pub const fn new() -> Self {
        Self {
            need_resched: AtomicCell::new(0),
        }
    }

    /// Handler prologue: forget any stale request
    #[inline]
    pub fn enter(&self) {
        self.need_resched.store(0);
    }

    /// Ask for a reschedule at handler exit
    #[inline]
    pub fn request_reschedule(&self) {
        self.need_resched.store(1);
    }

    #[inline]
    pub fn needs_reschedule(&self) -> bool {
        self.need_resched.load() != 0
    }

    /// Handler epilogue: yield if a reschedule was requested
    ///
    /// Returns `true` if the deferred yield was triggered.
    #[inline]
    pub fn leave<S: Scheduler + ?Sized>(&self, sched: &S) -> bool {
        if self.need_resched.get_and_set(0) != 0 {
            sched.yield_from_isr();
            return true;
        }
        false
    }
}

impl Default for IsrContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Inform the runtime that an ISR is starting
///
/// Call at the very start of every handler that may resume tasks.
#[inline]
pub fn enter_isr() {
    ISR_CONTEXT.enter();
}

/// Inform the runtime that an ISR is finishing
///
/// Call at the very end of every handler that called [`enter_isr`].
#[inline]
pub fn leave_isr<S: Scheduler + ?Sized>(sched: &S) -> bool {
    ISR_CONTEXT.leave(sched)
}

/// Record that the running handler made a higher priority task ready
#[inline]
pub fn set_need_resched() {
    ISR_CONTEXT.request_reschedule();
}

/// RAII bracket around a handler body
///
/// Calls [`enter_isr`] on construction and [`leave_isr`] on drop.
pub struct IsrScope<'a, S: Scheduler + ?Sized> {
    sched: &'a S,
}

impl<'a, S: Scheduler + ?Sized> IsrScope<'a, S> {
    #[inline]
    pub fn enter(sched: &'a S) -> Self {
        enter_isr();
        Self { sched }
    }
}

impl<S: Scheduler + ?Sized> Drop for IsrScope<'_, S> {
    #[inline]
    fn drop(&mut self) {
        leave_isr(self.sched);
    }
}

/// Run a handler body inside an [`IsrScope`]
#[inline]
pub fn scope<S, F, R>(sched: &S, f: F) -> R
where
    S: Scheduler + ?Sized,
    F: FnOnce() -> R,
{
    let _scope = IsrScope::enter(sched);
    f()
}
