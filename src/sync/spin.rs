//! Processor based spin mutex
//!
//! Built only from the exclusive-access primitives. This layer has no notion
//! of other threads to yield to, so it only offers non-blocking operations;
//! see [`Mutex`](crate::sync::mutex::Mutex) for a lock that can wait.

use crate::port;
use crate::sync::atomic::AtomicCell;
use crate::sync::guard::Lockable;
use crate::types::LockState;

/// One-byte lock flag
pub struct SpinLock {
    value: AtomicCell<u8>,
}

impl SpinLock {
    /// Create an unlocked mutex
    pub const fn new() -> Self {
        Self {
            value: AtomicCell::new(LockState::Unlocked as u8),
        }
    }

    /// Try to obtain the lock
    ///
    /// Returns `true` only if the exclusive store committed and the value it
    /// replaced was `Unlocked`. A lost race or an already held lock returns
    /// `false`; in the latter case the store rewrote `Locked` over `Locked`.
    #[inline]
    pub fn try_lock(&self) -> bool {
        let mut old = LockState::Locked as u8;
        if self.value.try_get_and_set(LockState::Locked as u8, &mut old) {
            port::dmb();
            return old == LockState::Unlocked as u8;
        }
        false
    }

    /// Release the lock
    ///
    /// Unconditional: the caller is not checked against the holder. Unlocking
    /// a lock held by someone else breaks mutual exclusion.
    #[inline]
    pub fn unlock(&self) {
        self.value.store(LockState::Unlocked as u8);
    }

    /// Snapshot of the current state
    #[inline]
    pub fn state(&self) -> LockState {
        if self.value.load() == LockState::Unlocked as u8 {
            LockState::Unlocked
        } else {
            LockState::Locked
        }
    }

    #[inline]
    pub fn is_locked(&self) -> bool {
        self.state() == LockState::Locked
    }
}

impl Default for SpinLock {
    fn default() -> Self {
        Self::new()
    }
}

impl Lockable for SpinLock {
    #[inline]
    fn try_lock(&self) -> bool {
        SpinLock::try_lock(self)
    }

    #[inline]
    fn unlock(&self) {
        SpinLock::unlock(self)
    }
}
