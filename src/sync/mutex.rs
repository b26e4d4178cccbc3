//! Blocking mutex
//!
//! A [`SpinLock`] plus a compile-time wait strategy and wake strategy. The
//! same implementation serves busy-spinning, interrupt-wait and event-wait
//! callers with no dynamic dispatch.
//!
//! `lock()` must only be called from task context. There is no timeout, no
//! deadlock detection and no fairness among waiters.

use core::marker::PhantomData;

use crate::sync::guard::{BlockingLockable, Lockable, ScopedLock};
use crate::sync::spin::SpinLock;
use crate::sync::strategy::{NoWake, PendSv, Sev, Spin, WaitStrategy, WakeStrategy, Wfe, Wfi};

/// Mutex with pluggable wait/wake
///
/// # Example
/// ```ignore
/// static BUS: Mutex<Wfe, Sev> = Mutex::new();
///
/// fn send(frame: &[u8]) {
///     let _guard = BUS.scoped();
///     // exclusive access to the bus until `_guard` drops
/// }
/// ```
pub struct Mutex<W: WaitStrategy = Spin, N: WakeStrategy = NoWake> {
    raw: SpinLock,
    _strategy: PhantomData<fn() -> (W, N)>,
}

/// Busy-spinning mutex
pub type SpinMutex = Mutex<Spin, NoWake>;

/// Mutex that sleeps in WFE and wakes with SEV
pub type WfeMutex = Mutex<Wfe, Sev>;

/// Mutex that sleeps in WFI and wakes by pending PendSV
pub type WfiMutex = Mutex<Wfi, PendSv>;

impl<W: WaitStrategy, N: WakeStrategy> Mutex<W, N> {
    /// Create an unlocked mutex
    pub const fn new() -> Self {
        Self {
            raw: SpinLock::new(),
            _strategy: PhantomData,
        }
    }

    #[inline]
    pub fn try_lock(&self) -> bool {
        self.raw.try_lock()
    }

    /// Acquire the mutex, calling `W::wait()` after every failed attempt
    #[inline]
    pub fn lock(&self) {
        while !self.raw.try_lock() {
            W::wait();
        }
    }

    /// Acquire the mutex within `attempts` tries
    ///
    /// Diagnostic variant of [`lock`](Self::lock) for starvation tests.
    /// Returns `false` if every attempt failed.
    pub fn lock_bounded(&self, attempts: u32) -> bool {
        for attempt in 0..attempts {
            if self.raw.try_lock() {
                return true;
            }
            if attempt + 1 < attempts {
                W::wait();
            }
        }
        false
    }

    /// Release the mutex, then wake waiters
    #[inline]
    pub fn unlock(&self) {
        self.raw.unlock();
        N::wake();
    }

    #[inline]
    pub fn is_locked(&self) -> bool {
        self.raw.is_locked()
    }

    /// Acquire and return a guard that unlocks on drop
    #[inline]
    pub fn scoped(&self) -> ScopedLock<'_, Self> {
        ScopedLock::new(self)
    }

    /// Run `f` with the mutex held
    #[inline]
    pub fn with<R>(&self, f: impl FnOnce() -> R) -> R {
        let _guard = self.scoped();
        f()
    }
}

impl<W: WaitStrategy, N: WakeStrategy> Default for Mutex<W, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: WaitStrategy, N: WakeStrategy> Lockable for Mutex<W, N> {
    #[inline]
    fn try_lock(&self) -> bool {
        Mutex::try_lock(self)
    }

    #[inline]
    fn unlock(&self) {
        Mutex::unlock(self)
    }
}

impl<W: WaitStrategy, N: WakeStrategy> BlockingLockable for Mutex<W, N> {
    #[inline]
    fn lock(&self) {
        Mutex::lock(self)
    }
}
