//! Exclusive-access atomic primitives
//!
//! Every read-modify-write here is the same loop: exclusive load, data
//! memory barrier, compute, exclusive store, and start over if the store lost
//! its reservation. The loops are lock-free but not wait-free; a failed store
//! is always transient (contention), never permanent.
//!
//! # Example
//! ```ignore
//! static HITS: AtomicCell<u32> = AtomicCell::new(0);
//!
//! let before = HITS.fetch_inc();
//! assert_eq!(HITS.load(), before + 1);
//! ```

use core::cell::UnsafeCell;

use crate::port;

mod sealed {
    pub trait Sealed {}
    impl Sealed for u8 {}
    impl Sealed for u16 {}
    impl Sealed for u32 {}
}

/// A word width the processor has an exclusive load/store pair for
///
/// # Safety
/// `load_exclusive`/`store_exclusive` must form a matching pair for the
/// width of `Self`. Implemented for `u8`, `u16` and `u32` only.
pub unsafe trait Exclusive: Copy + Eq + sealed::Sealed {
    const ONE: Self;

    fn wrapping_add(self, rhs: Self) -> Self;
    fn wrapping_sub(self, rhs: Self) -> Self;

    /// Exclusive load of `*ptr`
    unsafe fn load_exclusive(ptr: *mut Self) -> Self;

    /// Exclusive store of `value` to `*ptr`; `reserved` is what the paired
    /// load returned. Returns `true` if the store committed.
    unsafe fn store_exclusive(ptr: *mut Self, reserved: Self, value: Self) -> bool;

    unsafe fn load(ptr: *mut Self) -> Self;
    unsafe fn store(ptr: *mut Self, value: Self);
}

macro_rules! impl_exclusive {
    ($t:ty, $ldrex:path, $strex:path) => {
        unsafe impl Exclusive for $t {
            const ONE: Self = 1;

            #[inline(always)]
            fn wrapping_add(self, rhs: Self) -> Self {
                <$t>::wrapping_add(self, rhs)
            }

            #[inline(always)]
            fn wrapping_sub(self, rhs: Self) -> Self {
                <$t>::wrapping_sub(self, rhs)
            }

            #[inline(always)]
            unsafe fn load_exclusive(ptr: *mut Self) -> Self {
                unsafe { $ldrex(ptr) }
            }

            #[inline(always)]
            unsafe fn store_exclusive(ptr: *mut Self, reserved: Self, value: Self) -> bool {
                unsafe { $strex(ptr, reserved, value) }
            }

            #[inline(always)]
            unsafe fn load(ptr: *mut Self) -> Self {
                unsafe { port::load(ptr) }
            }

            #[inline(always)]
            unsafe fn store(ptr: *mut Self, value: Self) {
                unsafe { port::store(ptr, value) }
            }
        }
    };
}

impl_exclusive!(u8, port::ldrex_u8, port::strex_u8);
impl_exclusive!(u16, port::ldrex_u16, port::strex_u16);
impl_exclusive!(u32, port::ldrex_u32, port::strex_u32);

/// A byte, half-word or word only ever modified through exclusive access
#[repr(transparent)]
pub struct AtomicCell<T: Exclusive> {
    value: UnsafeCell<T>,
}

unsafe impl<T: Exclusive> Sync for AtomicCell<T> {}
unsafe impl<T: Exclusive> Send for AtomicCell<T> {}

impl<T: Exclusive> AtomicCell<T> {
    #[inline(always)]
    pub const fn new(value: T) -> Self {
        Self {
            value: UnsafeCell::new(value),
        }
    }

    /// Get a raw pointer
    #[inline(always)]
    pub const fn as_ptr(&self) -> *mut T {
        self.value.get()
    }

    /// Read the current value
    #[inline(always)]
    pub fn load(&self) -> T {
        unsafe { T::load(self.as_ptr()) }
    }

    /// Overwrite the value without a reservation
    ///
    /// Any exclusive sequence in flight on this location loses its
    /// reservation and retries.
    #[inline(always)]
    pub fn store(&self, value: T) {
        port::dmb();
        unsafe { T::store(self.as_ptr(), value) }
        port::dmb();
    }

    /// Apply `f` atomically, returning the value it was applied to
    ///
    /// `f` runs between the exclusive load and store, and may run several
    /// times under contention. It must be a pure function of its argument:
    /// any exclusive access inside it (another `AtomicCell` operation, a lock)
    /// clears the monitor, so the store never commits and the loop spins
    /// forever.
    #[inline]
    pub fn fetch_update<F>(&self, mut f: F) -> T
    where
        F: FnMut(T) -> T,
    {
        let ptr = self.as_ptr();
        loop {
            let old = unsafe { T::load_exclusive(ptr) };
            port::dmb();
            if unsafe { T::store_exclusive(ptr, old, f(old)) } {
                return old;
            }
        }
    }

    /// Store `new`, returning the previous value
    #[inline]
    pub fn get_and_set(&self, new: T) -> T {
        self.fetch_update(|_| new)
    }

    /// Add `n` (wrapping), returning the previous value
    #[inline]
    pub fn fetch_add(&self, n: T) -> T {
        self.fetch_update(|v| v.wrapping_add(n))
    }

    /// Subtract `n` (wrapping), returning the previous value
    #[inline]
    pub fn fetch_sub(&self, n: T) -> T {
        self.fetch_update(|v| v.wrapping_sub(n))
    }

    #[inline]
    pub fn fetch_inc(&self) -> T {
        self.fetch_add(T::ONE)
    }

    #[inline]
    pub fn fetch_dec(&self) -> T {
        self.fetch_sub(T::ONE)
    }

    /// Single attempt to store `new`
    ///
    /// The value read by the exclusive load is written to `old` whether or
    /// not the store commits. Returns `true` only if nothing else wrote the
    /// location between that load and the store.
    #[inline]
    pub fn try_get_and_set(&self, new: T, old: &mut T) -> bool {
        let ptr = self.as_ptr();
        *old = unsafe { T::load_exclusive(ptr) };
        port::dmb();
        unsafe { T::store_exclusive(ptr, *old, new) }
    }

    /// Store `new` if the location holds `expected`
    ///
    /// Retries lost reservations; gives up only when the loaded value is not
    /// `expected`.
    #[inline]
    pub fn compare_and_set(&self, expected: T, new: T) -> bool {
        let ptr = self.as_ptr();
        loop {
            let current = unsafe { T::load_exclusive(ptr) };
            port::dmb();
            if current != expected {
                port::clrex();
                return false;
            }
            if unsafe { T::store_exclusive(ptr, current, new) } {
                return true;
            }
        }
    }
}
