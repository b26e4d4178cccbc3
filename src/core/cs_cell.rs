//! Critical section protected cell
//!
//! Zero-overhead wrapper for data that must be accessed within critical sections.

use core::cell::UnsafeCell;
use crate::critical::CriticalSection;

/// A cell that can only be accessed within a critical section.
pub struct CsCell<T>(UnsafeCell<T>);

unsafe impl<T: Send> Sync for CsCell<T> {}

impl<T> CsCell<T> {
    #[inline(always)]
    pub const fn new(value: T) -> Self {
        Self(UnsafeCell::new(value))
    }

    /// Borrow the inner value for the duration of the critical section
    #[inline(always)]
    pub fn borrow<'cs>(&'cs self, _cs: &'cs CriticalSection) -> &'cs mut T {
        unsafe { &mut *self.0.get() }
    }

    /// Swap in `value`, returning the old content
    #[inline(always)]
    pub fn replace(&self, cs: &CriticalSection, value: T) -> T {
        core::mem::replace(self.borrow(cs), value)
    }
}

impl<T: Copy> CsCell<T> {
    #[inline(always)]
    pub fn get(&self, cs: &CriticalSection) -> T {
        *self.borrow(cs)
    }

    #[inline(always)]
    pub fn set(&self, cs: &CriticalSection, value: T) {
        *self.borrow(cs) = value;
    }
}
