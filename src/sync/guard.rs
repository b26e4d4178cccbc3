//! Scoped lock acquisition
//!
//! Locks in this crate do not own the data they protect, so critical
//! sections are bracketed by hand. [`ScopedLock`] makes sure the closing
//! `unlock()` runs on every exit path, early returns and `?` included.

/// A lock that can be tried and released
pub trait Lockable {
    fn try_lock(&self) -> bool;
    fn unlock(&self);
}

/// A lock that can also wait for availability
pub trait BlockingLockable: Lockable {
    fn lock(&self);
}

/// Holds a lock until dropped
#[must_use = "the lock is released as soon as the guard is dropped"]
pub struct ScopedLock<'a, L: Lockable + ?Sized> {
    lock: &'a L,
}

impl<'a, L: BlockingLockable + ?Sized> ScopedLock<'a, L> {
    /// Acquire `lock`, waiting as long as it takes
    #[inline]
    pub fn new(lock: &'a L) -> Self {
        lock.lock();
        Self { lock }
    }
}

impl<'a, L: Lockable + ?Sized> ScopedLock<'a, L> {
    /// Acquire `lock` only if it is free right now
    #[inline]
    pub fn try_new(lock: &'a L) -> Option<Self> {
        if lock.try_lock() {
            Some(Self { lock })
        } else {
            None
        }
    }

    /// Release before the end of scope
    #[inline]
    pub fn unlock(self) {
        drop(self);
    }
}

impl<L: Lockable + ?Sized> Drop for ScopedLock<'_, L> {
    #[inline]
    fn drop(&mut self) {
        self.lock.unlock();
    }
}
