//! Scheduler-owned mutex against the recording scheduler

mod common;

use std::cell::UnsafeCell;
use std::thread;

use cm3rt::isr::{self, ISR_CONTEXT};
use cm3rt::sync::guard::{BlockingLockable, Lockable};
use cm3rt::{Callable, OsError, SchedMutex, ScopedLock, Task};
use common::{isr_flag_lock, BareScheduler, Event, MockScheduler};

#[test]
fn test_object_created_on_first_use() {
    static SCHED: MockScheduler = MockScheduler::new(0);
    static LOCK: SchedMutex<MockScheduler> = SchedMutex::new(&SCHED);

    assert_eq!(LOCK.id(), None);
    assert!(LOCK.try_lock());
    let id = LOCK.id().unwrap();
    assert!(SCHED.is_held(id));

    // Later calls reuse the same object
    assert_eq!(LOCK.init(), Ok(id));
    assert!(!LOCK.try_lock());
    LOCK.unlock();
    assert!(!SCHED.is_held(id));
    assert!(LOCK.try_lock());
    LOCK.unlock();

    assert_eq!(
        SCHED.events(),
        vec![
            Event::MutexCreate(0),
            Event::MutexTake(0),
            Event::MutexGive(0),
            Event::MutexTake(0),
            Event::MutexGive(0),
        ]
    );
}

#[test]
fn test_unlock_before_first_use_is_noop() {
    static SCHED: MockScheduler = MockScheduler::new(0);
    static LOCK: SchedMutex<MockScheduler> = SchedMutex::new(&SCHED);

    LOCK.unlock();
    assert_eq!(LOCK.id(), None);
    assert!(SCHED.events().is_empty());
}

#[test]
fn test_try_lock_from_isr_refused() {
    static SCHED: MockScheduler = MockScheduler::new(0);
    static LOCK: SchedMutex<MockScheduler> = SchedMutex::new(&SCHED);

    SCHED.set_isr(true);
    assert!(!LOCK.try_lock());
    SCHED.set_isr(false);

    // Nothing was taken, or even created
    assert!(SCHED.events().is_empty());
    assert!(LOCK.try_lock());
}

#[test]
#[should_panic(expected = "mutex lock failed: PendIsr")]
fn test_lock_from_isr_is_fatal() {
    static SCHED: MockScheduler = MockScheduler::new(0);
    static LOCK: SchedMutex<MockScheduler> = SchedMutex::new(&SCHED);

    SCHED.set_isr(true);
    LOCK.lock();
}

#[test]
fn test_scheduler_without_mutexes() {
    static SCHED: BareScheduler = BareScheduler;
    static LOCK: SchedMutex<BareScheduler> = SchedMutex::new(&SCHED);

    assert_eq!(LOCK.init(), Err(OsError::ObjType));
    assert!(!LOCK.try_lock());
    assert_eq!(LOCK.id(), None);
}

#[test]
#[should_panic(expected = "mutex lock failed: ObjType")]
fn test_lock_without_scheduler_support_is_fatal() {
    static SCHED: BareScheduler = BareScheduler;
    static LOCK: SchedMutex<BareScheduler> = SchedMutex::new(&SCHED);

    LOCK.lock();
}

#[test]
fn test_unlock_from_isr_defers_reschedule() {
    let _guard = isr_flag_lock();
    static SCHED: MockScheduler = MockScheduler::new(0);
    static LOCK: SchedMutex<MockScheduler> = SchedMutex::new(&SCHED);

    LOCK.lock();
    let id = LOCK.id().unwrap();
    SCHED.add_waiter(id);

    SCHED.set_isr(true);
    isr::enter_isr();
    LOCK.unlock();
    assert!(ISR_CONTEXT.needs_reschedule());
    assert_eq!(SCHED.yields(), 0);
    assert!(isr::leave_isr(&SCHED));
    SCHED.set_isr(false);

    assert!(!SCHED.is_held(id));
    assert_eq!(SCHED.yields(), 1);
    assert!(SCHED.events().contains(&Event::MutexGiveFromIsr(0)));
    assert!(!SCHED.events().contains(&Event::MutexGive(0)));
}

#[test]
fn test_unlock_from_isr_without_waiter() {
    let _guard = isr_flag_lock();
    static SCHED: MockScheduler = MockScheduler::new(0);
    static LOCK: SchedMutex<MockScheduler> = SchedMutex::new(&SCHED);

    LOCK.lock();

    SCHED.set_isr(true);
    isr::enter_isr();
    LOCK.unlock();
    assert!(!ISR_CONTEXT.needs_reschedule());
    assert!(!isr::leave_isr(&SCHED));
    SCHED.set_isr(false);

    assert_eq!(SCHED.yields(), 0);
}

#[test]
fn test_isr_unlock_and_resume_coalesce() {
    let _guard = isr_flag_lock();
    static SCHED: MockScheduler = MockScheduler::new(1);
    static FIRST: SchedMutex<MockScheduler> = SchedMutex::new(&SCHED);
    static SECOND: SchedMutex<MockScheduler> = SchedMutex::new(&SCHED);
    static TASK: Task<MockScheduler> = Task::new(&SCHED);

    fn idle() {}

    TASK.spawn(Callable::Fn(idle));
    TASK.suspend().unwrap();
    FIRST.lock();
    SECOND.lock();
    SCHED.add_waiter(FIRST.id().unwrap());
    SCHED.add_waiter(SECOND.id().unwrap());

    SCHED.set_isr(true);
    isr::scope(&SCHED, || {
        FIRST.unlock();
        SECOND.unlock();
        TASK.resume().unwrap();
    });
    SCHED.set_isr(false);

    assert_eq!(SCHED.yields(), 1);
}

#[test]
fn test_guards_release_scheduler_mutex() {
    static SCHED: MockScheduler = MockScheduler::new(0);
    static LOCK: SchedMutex<MockScheduler> = SchedMutex::new(&SCHED);

    {
        let _held = LOCK.scoped();
        assert!(!LOCK.try_lock());
    }
    assert!(ScopedLock::try_new(&LOCK).is_some());

    let dyn_lock: &dyn BlockingLockable = &LOCK;
    {
        let _held = ScopedLock::new(dyn_lock);
        assert!(!Lockable::try_lock(&LOCK));
    }
    assert!(!SCHED.is_held(LOCK.id().unwrap()));
}

#[test]
fn test_mutual_exclusion_between_threads() {
    struct Counter(UnsafeCell<u64>);
    unsafe impl Sync for Counter {}

    static SCHED: MockScheduler = MockScheduler::new(0);
    static LOCK: SchedMutex<MockScheduler> = SchedMutex::new(&SCHED);
    static COUNT: Counter = Counter(UnsafeCell::new(0));
    const THREADS: u64 = 4;
    const PER_THREAD: u64 = 2_000;

    thread::scope(|s| {
        for _ in 0..THREADS {
            s.spawn(|| {
                for _ in 0..PER_THREAD {
                    let _held = LOCK.scoped();
                    unsafe {
                        let p = COUNT.0.get();
                        p.write_volatile(p.read_volatile() + 1);
                    }
                }
            });
        }
    });

    assert_eq!(unsafe { *COUNT.0.get() }, THREADS * PER_THREAD);
}
