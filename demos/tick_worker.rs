//! Tick Worker Example - a task resumed from an interrupt handler
//!
//! `Solo` is the smallest scheduler that satisfies the contract: one task
//! slot, no context switching. The worker task runs its callable, parks in
//! `suspend`, and the SysTick handler resumes it once a second through the
//! deferred reschedule path.

#![no_std]
#![no_main]

use cortex_m::peripheral::syst::SystClkSource;
use cortex_m_rt::{entry, exception};
use cm3rt::sched::OsTaskFn;
use cm3rt::time::{self, TickSource, SYS_TICK};
use cm3rt::{
    isr, AtomicCell, Callable, OsError, OsResult, OsTick, Scheduler, SchedulerTaskId, Task,
    TaskAttrs, CFG_CPU_CLOCK_HZ, CFG_TICK_RATE_HZ,
};

struct Solo {
    entry: AtomicCell<u32>,
    arg: AtomicCell<u32>,
    ready: AtomicCell<u8>,
}

impl Solo {
    const fn new() -> Self {
        Self {
            entry: AtomicCell::new(0),
            arg: AtomicCell::new(0),
            ready: AtomicCell::new(0),
        }
    }
}

impl Scheduler for Solo {
    fn create(&self, entry: OsTaskFn, arg: *mut (), _attrs: &TaskAttrs) -> OsResult<SchedulerTaskId> {
        if !self.entry.compare_and_set(0, entry as usize as u32) {
            return Err(OsError::TaskNoMoreTcb);
        }
        self.arg.store(arg as usize as u32);
        self.ready.store(1);
        Ok(SchedulerTaskId::new(0))
    }

    fn suspend(&self, _id: SchedulerTaskId) {
        self.ready.store(0);
        if !self.is_isr_context() {
            while self.ready.load() == 0 {
                cortex_m::asm::wfi();
            }
        }
    }

    fn resume(&self, _id: SchedulerTaskId) {
        self.ready.store(1);
    }

    fn resume_from_isr(&self, _id: SchedulerTaskId) -> bool {
        self.ready.get_and_set(1) == 0
    }

    fn yield_from_isr(&self) {
        cortex_m::asm::sev();
    }

    fn tick(&self) -> OsTick {
        SYS_TICK.now()
    }

    fn delay(&self, ticks: OsTick) {
        time::delay(&SYS_TICK, ticks);
    }

    fn yield_now(&self) {}

    fn start(&self) -> ! {
        let entry = self.entry.load();
        if entry == 0 {
            cm3rt::port::halt();
        }
        let entry: OsTaskFn = unsafe { core::mem::transmute(entry as usize) };
        entry(self.arg.load() as usize as *mut ())
    }
}

static SCHED: Solo = Solo::new();
static WORKER: Task<Solo> = Task::with_attrs(&SCHED, TaskAttrs::new("worker", 2, 256));
static RUNS: AtomicCell<u32> = AtomicCell::new(0);

fn work() {
    let n = RUNS.fetch_inc() + 1;
    cm3rt::info!("worker run #{} at tick {}", n, cm3rt::sched::current_tick(&SCHED));
}

#[exception]
fn SysTick() {
    isr::scope(&SCHED, || {
        if SYS_TICK.increment() % CFG_TICK_RATE_HZ == 0 {
            WORKER.resume().ok();
        }
    });
}

#[entry]
fn main() -> ! {
    let mut p = cortex_m::Peripherals::take().unwrap();
    p.SYST.set_reload(time::systick_reload(CFG_CPU_CLOCK_HZ, CFG_TICK_RATE_HZ));
    p.SYST.clear_current();
    p.SYST.set_clock_source(SystClkSource::Core);
    p.SYST.enable_interrupt();
    p.SYST.enable_counter();

    WORKER.spawn(Callable::Fn(work));
    cm3rt::sched::start(&SCHED)
}
