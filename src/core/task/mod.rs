//! Task wrapper
//!
//! Associates a callable with a task slot of the external scheduler. The
//! scheduler runs a trampoline that calls the callable once and then
//! suspends the task, so a callable that returns simply parks its task until
//! the next [`resume`](Task::resume) or [`move_to_task`](Task::move_to_task).
//!
//! Tasks are statically declared and never destroyed:
//!
//! ```ignore
//! static SCHED: MyScheduler = MyScheduler::new();
//! static LED: Task<MyScheduler> = Task::new(&SCHED);
//! static WORKER: Task<MyScheduler> = Task::new(&SCHED);
//!
//! fn blink() {
//!     loop {
//!         toggle_led();
//!         cm3rt::sched::task_wait(&SCHED, 500);
//!     }
//! }
//!
//! // In main:
//! LED.spawn(Callable::Fn(blink));
//! WORKER.spawn_suspended();
//! cm3rt::sched::start(&SCHED);
//! ```

mod callable;

pub use callable::Callable;

use crate::config::{CFG_PRIO_MAX, CFG_STK_SIZE_MIN, CFG_TASK_PRIO_DEFAULT, CFG_TASK_STK_SIZE_DEFAULT};
use crate::core::cs_cell::CsCell;
use crate::critical::critical_section;
use crate::error::{OsError, OsResult};
use crate::isr;
use crate::sched::Scheduler;
use crate::types::{OsPrio, SchedulerTaskId, TaskState};

/// Parameters handed to the scheduler at registration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskAttrs {
    pub name: &'static str,
    pub prio: OsPrio,
    /// Stack size in words
    pub stack_words: usize,
}

impl TaskAttrs {
    pub const fn new(name: &'static str, prio: OsPrio, stack_words: usize) -> Self {
        Self { name, prio, stack_words }
    }

    fn validate(&self) -> OsResult<()> {
        if self.stack_words < CFG_STK_SIZE_MIN {
            return Err(OsError::StkSizeInvalid);
        }
        if self.prio as usize >= CFG_PRIO_MAX {
            return Err(OsError::PrioInvalid);
        }
        Ok(())
    }
}

impl Default for TaskAttrs {
    fn default() -> Self {
        DEFAULT_ATTRS
    }
}

const DEFAULT_ATTRS: TaskAttrs = TaskAttrs::new("", CFG_TASK_PRIO_DEFAULT, CFG_TASK_STK_SIZE_DEFAULT);

/// A unit of code running in its own scheduler task
pub struct Task<S: Scheduler + 'static> {
    sched: &'static S,
    attrs: TaskAttrs,
    func: CsCell<Option<Callable>>,
    id: CsCell<Option<SchedulerTaskId>>,
    state: CsCell<TaskState>,
}

impl<S: Scheduler + 'static> Task<S> {
    /// Declare a task with default attributes
    pub const fn new(sched: &'static S) -> Self {
        Self::with_attrs(sched, DEFAULT_ATTRS)
    }

    /// Declare a task with explicit attributes
    pub const fn with_attrs(sched: &'static S, attrs: TaskAttrs) -> Self {
        Self {
            sched,
            attrs,
            func: CsCell::new(None),
            id: CsCell::new(None),
            state: CsCell::new(TaskState::Unregistered),
        }
    }

    /// Register the task and start running `f`
    ///
    /// Registration failure is fatal: the error is logged and the system
    /// halts through the panic handler.
    pub fn spawn(&'static self, f: Callable) {
        if let Err(err) = self.try_spawn(Some(f)) {
            fatal(self.attrs.name, err);
        }
    }

    /// Register the task without code; it stays suspended until
    /// [`move_to_task`](Self::move_to_task)
    pub fn spawn_suspended(&'static self) {
        if let Err(err) = self.try_spawn(None) {
            fatal(self.attrs.name, err);
        }
    }

    /// Register the task with the scheduler
    ///
    /// Without a callable the task is suspended right after registration.
    ///
    /// # Returns
    /// * `Ok(id)` - Identifier issued by the scheduler
    /// * `Err(OsError::TaskCreateIsr)` - Called from an interrupt handler
    /// * `Err(OsError::TaskRegistered)` - This task was already registered
    /// * `Err(OsError::TaskNoMoreTcb)` - Scheduler has no free slot
    pub fn try_spawn(&'static self, f: Option<Callable>) -> OsResult<SchedulerTaskId> {
        if self.sched.is_isr_context() {
            return Err(OsError::TaskCreateIsr);
        }
        self.attrs.validate()?;

        let start_suspended = f.is_none();

        // The id must be stored before the new task can run its trampoline.
        let id = critical_section(|cs| {
            if self.id.get(cs).is_some() {
                return Err(OsError::TaskRegistered);
            }
            self.func.replace(cs, f);

            let arg = self as *const Self as *mut ();
            match self.sched.create(Self::trampoline, arg, &self.attrs) {
                Ok(id) => {
                    self.id.set(cs, Some(id));
                    self.state.set(cs, TaskState::Ready);
                    Ok(id)
                }
                Err(err) => {
                    self.func.replace(cs, None);
                    Err(err)
                }
            }
        })?;

        crate::debug!("task {} registered as {}", self.attrs.name, id.raw());

        if start_suspended {
            self.suspend()?;
        }
        Ok(id)
    }

    /// Replace the callable and run it
    ///
    /// Suspends the task, swaps in `f`, resumes. The caller must make sure
    /// the task is not in the middle of its previous callable elsewhere.
    pub fn move_to_task(&self, f: Callable) -> OsResult<()> {
        self.suspend()?;
        critical_section(|cs| {
            self.func.replace(cs, Some(f));
        });
        crate::trace!("task {} got new code", self.attrs.name);
        self.resume()
    }

    /// Remove the task from scheduling, keeping its state
    pub fn suspend(&self) -> OsResult<()> {
        let id = self.id().ok_or(OsError::TaskNotRegistered)?;
        critical_section(|cs| self.state.set(cs, TaskState::Suspended));
        self.sched.suspend(id);
        Ok(())
    }

    /// Reinstate the task for scheduling
    ///
    /// From an interrupt handler the context switch is deferred to
    /// [`leave_isr`](crate::isr::leave_isr).
    pub fn resume(&self) -> OsResult<()> {
        let id = self.id().ok_or(OsError::TaskNotRegistered)?;
        critical_section(|cs| self.state.set(cs, TaskState::Ready));
        if self.sched.is_isr_context() {
            if self.sched.resume_from_isr(id) {
                isr::set_need_resched();
            }
        } else {
            self.sched.resume(id);
        }
        Ok(())
    }

    /// One trampoline iteration: run the callable once, then suspend
    ///
    /// The callable is taken out of its slot while it runs; it goes back
    /// only if no new callable was installed in the meantime.
    ///
    /// # Returns
    /// * `Err(OsError::TaskNotRegistered)` - Nothing to run; the task has no
    ///   scheduler slot to park in
    pub fn step(&self) -> OsResult<()> {
        if !self.is_registered() {
            return Err(OsError::TaskNotRegistered);
        }
        let taken = critical_section(|cs| self.func.replace(cs, None));
        if let Some(mut f) = taken {
            f.call();
            critical_section(|cs| {
                let slot = self.func.borrow(cs);
                if slot.is_none() {
                    *slot = Some(f);
                }
            });
        }
        self.suspend()
    }

    /// Scheduler identifier, once registered
    #[inline]
    pub fn id(&self) -> Option<SchedulerTaskId> {
        critical_section(|cs| self.id.get(cs))
    }

    /// Last transition requested through this wrapper
    ///
    /// Advisory only. The scheduler owns the real state: a resume from an
    /// interrupt that lands between `step` marking the task suspended and
    /// the scheduler parking it reads `Ready` here while the task sleeps
    /// until the next resume.
    #[inline]
    pub fn state(&self) -> TaskState {
        critical_section(|cs| self.state.get(cs))
    }

    #[inline]
    pub fn is_registered(&self) -> bool {
        self.id().is_some()
    }

    #[inline]
    pub fn attrs(&self) -> &TaskAttrs {
        &self.attrs
    }

    fn trampoline(arg: *mut ()) -> ! {
        let task = unsafe { &*(arg as *const Self) };
        loop {
            // Registered before the scheduler could start this entry
            let _ = task.step();
        }
    }
}

#[cold]
fn fatal(name: &'static str, err: OsError) -> ! {
    crate::error!("task {} registration failed: {}", name, err);
    panic!("task {} registration failed: {:?}", name, err);
}
