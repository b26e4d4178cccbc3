//! Recording scheduler used by the host tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::thread;
use std::vec::Vec;

use cm3rt::sched::OsTaskFn;
use cm3rt::{OsError, OsResult, OsTick, Scheduler, SchedulerMutexId, SchedulerTaskId, TaskAttrs};

/// Everything the scheduler was asked to do, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Create(u32),
    Suspend(u32),
    Resume(u32),
    ResumeFromIsr(u32),
    YieldFromIsr,
    TickFromIsr,
    MutexCreate(u32),
    MutexTake(u32),
    MutexGive(u32),
    MutexGiveFromIsr(u32),
}

pub struct Slot {
    pub entry: OsTaskFn,
    pub arg: usize,
    pub attrs: TaskAttrs,
    pub suspended: bool,
}

pub struct MockMutex {
    pub held: bool,
    /// Tasks reported as blocked on it; a give wakes one
    pub waiters: u32,
}

pub struct MockState {
    pub slots: Vec<Slot>,
    pub mutexes: Vec<MockMutex>,
    pub events: Vec<Event>,
}

pub struct MockScheduler {
    capacity: usize,
    state: Mutex<MockState>,
    in_isr: AtomicBool,
    preempt_on_isr_resume: AtomicBool,
    ticks: AtomicU32,
}

impl MockScheduler {
    pub const fn new(capacity: usize) -> Self {
        Self {
            capacity,
            state: Mutex::new(MockState {
                slots: Vec::new(),
                mutexes: Vec::new(),
                events: Vec::new(),
            }),
            in_isr: AtomicBool::new(false),
            preempt_on_isr_resume: AtomicBool::new(true),
            ticks: AtomicU32::new(0),
        }
    }

    pub fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn events(&self) -> Vec<Event> {
        self.state().events.clone()
    }

    pub fn clear_events(&self) {
        self.state().events.clear();
    }

    pub fn is_suspended(&self, id: SchedulerTaskId) -> bool {
        self.state().slots[id.raw() as usize].suspended
    }

    pub fn set_isr(&self, in_isr: bool) {
        self.in_isr.store(in_isr, Ordering::SeqCst);
    }

    pub fn set_preempt_on_isr_resume(&self, preempt: bool) {
        self.preempt_on_isr_resume.store(preempt, Ordering::SeqCst);
    }

    pub fn set_ticks(&self, ticks: OsTick) {
        self.ticks.store(ticks, Ordering::SeqCst);
    }

    pub fn is_held(&self, id: SchedulerMutexId) -> bool {
        self.state().mutexes[id.raw() as usize].held
    }

    /// Pretend a task is parked waiting for `id`
    pub fn add_waiter(&self, id: SchedulerMutexId) {
        self.state().mutexes[id.raw() as usize].waiters += 1;
    }

    pub fn yields(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| **e == Event::YieldFromIsr)
            .count()
    }
}

impl Scheduler for MockScheduler {
    fn create(&self, entry: OsTaskFn, arg: *mut (), attrs: &TaskAttrs) -> OsResult<SchedulerTaskId> {
        let mut state = self.state();
        if state.slots.len() >= self.capacity {
            return Err(OsError::TaskNoMoreTcb);
        }
        let id = state.slots.len() as u32;
        state.slots.push(Slot {
            entry,
            arg: arg as usize,
            attrs: *attrs,
            suspended: false,
        });
        state.events.push(Event::Create(id));
        Ok(SchedulerTaskId::new(id))
    }

    fn suspend(&self, id: SchedulerTaskId) {
        let mut state = self.state();
        state.slots[id.raw() as usize].suspended = true;
        state.events.push(Event::Suspend(id.raw()));
    }

    fn resume(&self, id: SchedulerTaskId) {
        let mut state = self.state();
        state.slots[id.raw() as usize].suspended = false;
        state.events.push(Event::Resume(id.raw()));
    }

    fn resume_from_isr(&self, id: SchedulerTaskId) -> bool {
        let mut state = self.state();
        let slot = &mut state.slots[id.raw() as usize];
        let was_suspended = slot.suspended;
        slot.suspended = false;
        state.events.push(Event::ResumeFromIsr(id.raw()));
        was_suspended && self.preempt_on_isr_resume.load(Ordering::SeqCst)
    }

    fn yield_from_isr(&self) {
        self.state().events.push(Event::YieldFromIsr);
    }

    fn is_isr_context(&self) -> bool {
        self.in_isr.load(Ordering::SeqCst)
    }

    fn tick(&self) -> OsTick {
        self.ticks.load(Ordering::SeqCst)
    }

    fn tick_from_isr(&self) -> OsTick {
        self.state().events.push(Event::TickFromIsr);
        self.ticks.load(Ordering::SeqCst)
    }

    fn delay(&self, ticks: OsTick) {
        self.ticks.fetch_add(ticks, Ordering::SeqCst);
    }

    fn yield_now(&self) {}

    fn start(&self) -> ! {
        panic!("the mock scheduler cannot run tasks");
    }

    fn mutex_create(&self) -> OsResult<SchedulerMutexId> {
        let mut state = self.state();
        let id = state.mutexes.len() as u32;
        state.mutexes.push(MockMutex {
            held: false,
            waiters: 0,
        });
        state.events.push(Event::MutexCreate(id));
        Ok(SchedulerMutexId::new(id))
    }

    fn mutex_take(&self, id: SchedulerMutexId, block: bool) -> bool {
        loop {
            {
                let mut state = self.state();
                let mutex = &mut state.mutexes[id.raw() as usize];
                if !mutex.held {
                    mutex.held = true;
                    state.events.push(Event::MutexTake(id.raw()));
                    return true;
                }
            }
            if !block {
                return false;
            }
            thread::yield_now();
        }
    }

    fn mutex_give(&self, id: SchedulerMutexId) {
        let mut state = self.state();
        let mutex = &mut state.mutexes[id.raw() as usize];
        mutex.held = false;
        mutex.waiters = mutex.waiters.saturating_sub(1);
        state.events.push(Event::MutexGive(id.raw()));
    }

    fn mutex_give_from_isr(&self, id: SchedulerMutexId) -> bool {
        let mut state = self.state();
        let mutex = &mut state.mutexes[id.raw() as usize];
        mutex.held = false;
        let woke = mutex.waiters > 0;
        mutex.waiters = mutex.waiters.saturating_sub(1);
        state.events.push(Event::MutexGiveFromIsr(id.raw()));
        woke && self.preempt_on_isr_resume.load(Ordering::SeqCst)
    }
}

/// A scheduler that provides no mutex objects
pub struct BareScheduler;

impl Scheduler for BareScheduler {
    fn create(&self, _entry: OsTaskFn, _arg: *mut (), _attrs: &TaskAttrs) -> OsResult<SchedulerTaskId> {
        Err(OsError::TaskNoMoreTcb)
    }

    fn suspend(&self, _id: SchedulerTaskId) {}

    fn resume(&self, _id: SchedulerTaskId) {}

    fn resume_from_isr(&self, _id: SchedulerTaskId) -> bool {
        false
    }

    fn yield_from_isr(&self) {}

    fn is_isr_context(&self) -> bool {
        false
    }

    fn tick(&self) -> OsTick {
        0
    }

    fn delay(&self, _ticks: OsTick) {}

    fn yield_now(&self) {}

    fn start(&self) -> ! {
        panic!("the bare scheduler cannot run tasks");
    }
}

/// Serialises tests that touch the process-wide ISR flag
pub static ISR_FLAG_LOCK: Mutex<()> = Mutex::new(());

pub fn isr_flag_lock() -> MutexGuard<'static, ()> {
    ISR_FLAG_LOCK.lock().unwrap_or_else(|e| e.into_inner())
}
