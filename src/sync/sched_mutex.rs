//! Mutex owned by the scheduler
//!
//! Unlike [`Mutex`](crate::sync::mutex::Mutex), a waiting task is parked by
//! the scheduler rather than spinning. The scheduler object is allocated on
//! first use, so a `SchedMutex` can live in a `static`:
//!
//! ```ignore
//! static SCHED: MyScheduler = MyScheduler::new();
//! static UART_LOCK: SchedMutex<MyScheduler> = SchedMutex::new(&SCHED);
//!
//! fn report() {
//!     let _guard = UART_LOCK.scoped();
//!     // ...
//! }
//! ```
//!
//! Interrupt handlers may only release it. Giving the mutex from an ISR can
//! wake a waiter; the resulting context switch is deferred to
//! [`leave_isr`](crate::isr::leave_isr).

use crate::core::cs_cell::CsCell;
use crate::critical::critical_section;
use crate::error::{OsError, OsResult};
use crate::isr;
use crate::sched::Scheduler;
use crate::sync::guard::{BlockingLockable, Lockable, ScopedLock};
use crate::types::SchedulerMutexId;

pub struct SchedMutex<S: Scheduler + 'static> {
    sched: &'static S,
    handle: CsCell<Option<SchedulerMutexId>>,
}

impl<S: Scheduler + 'static> SchedMutex<S> {
    pub const fn new(sched: &'static S) -> Self {
        Self {
            sched,
            handle: CsCell::new(None),
        }
    }

    /// Allocate the scheduler object now instead of on first lock
    ///
    /// # Returns
    /// * `Ok(id)` - Handle of the (possibly already existing) object
    /// * `Err(OsError::ObjType)` - Scheduler has no mutex support
    pub fn init(&self) -> OsResult<SchedulerMutexId> {
        critical_section(|cs| {
            if let Some(id) = self.handle.get(cs) {
                return Ok(id);
            }
            let id = self.sched.mutex_create()?;
            self.handle.set(cs, Some(id));
            Ok(id)
        })
    }

    #[inline]
    pub fn id(&self) -> Option<SchedulerMutexId> {
        critical_section(|cs| self.handle.get(cs))
    }

    /// Take the mutex, parking the calling task while it is held elsewhere
    ///
    /// Blocking is impossible in an interrupt handler; calling this from one
    /// halts the system, as does a scheduler without mutex support.
    pub fn lock(&self) {
        if self.sched.is_isr_context() {
            fatal(OsError::PendIsr);
        }
        let id = match self.init() {
            Ok(id) => id,
            Err(err) => fatal(err),
        };
        while !self.sched.mutex_take(id, true) {}
    }

    /// Single attempt to take the mutex
    ///
    /// Always `false` from an interrupt handler.
    pub fn try_lock(&self) -> bool {
        if self.sched.is_isr_context() {
            return false;
        }
        match self.init() {
            Ok(id) => self.sched.mutex_take(id, false),
            Err(_) => false,
        }
    }

    /// Give the mutex back
    ///
    /// From an interrupt handler a woken waiter only marks the handler as
    /// needing a reschedule.
    pub fn unlock(&self) {
        let Some(id) = self.id() else {
            return;
        };
        if self.sched.is_isr_context() {
            if self.sched.mutex_give_from_isr(id) {
                isr::set_need_resched();
            }
        } else {
            self.sched.mutex_give(id);
        }
    }

    /// Take the mutex for the lifetime of the returned guard
    #[inline]
    pub fn scoped(&self) -> ScopedLock<'_, Self> {
        ScopedLock::new(self)
    }
}

impl<S: Scheduler + 'static> Lockable for SchedMutex<S> {
    #[inline]
    fn try_lock(&self) -> bool {
        SchedMutex::try_lock(self)
    }

    #[inline]
    fn unlock(&self) {
        SchedMutex::unlock(self)
    }
}

impl<S: Scheduler + 'static> BlockingLockable for SchedMutex<S> {
    #[inline]
    fn lock(&self) {
        SchedMutex::lock(self)
    }
}

#[cold]
fn fatal(err: OsError) -> ! {
    crate::error!("mutex lock failed: {}", err);
    panic!("mutex lock failed: {:?}", err);
}
