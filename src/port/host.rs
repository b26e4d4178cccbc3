//! Host port used for testing
//!
//! The exclusive monitor is emulated: a store only commits if the location
//! still holds the value its paired load reserved. This detects a changed
//! value, not an intervening write: writes that put back the reserved value
//! before the store (A-B-A) go unnoticed, where real hardware would fail the
//! store. Every operation in `sync::atomic` stays correct under that weaker
//! rule.

use core::sync::atomic::{fence, AtomicU16, AtomicU32, AtomicU8, Ordering};

macro_rules! exclusive_ops {
    ($load:ident, $store:ident, $t:ty, $atomic:ty) => {
        #[inline(always)]
        pub unsafe fn $load(ptr: *mut $t) -> $t {
            unsafe { <$atomic>::from_ptr(ptr) }.load(Ordering::Acquire)
        }

        #[inline(always)]
        pub unsafe fn $store(ptr: *mut $t, reserved: $t, value: $t) -> bool {
            unsafe { <$atomic>::from_ptr(ptr) }
                .compare_exchange(reserved, value, Ordering::AcqRel, Ordering::Relaxed)
                .is_ok()
        }
    };
}

exclusive_ops!(ldrex_u8, strex_u8, u8, AtomicU8);
exclusive_ops!(ldrex_u16, strex_u16, u16, AtomicU16);
exclusive_ops!(ldrex_u32, strex_u32, u32, AtomicU32);

#[inline(always)]
pub fn clrex() {}

/// Plain access goes through the same atomics so host threads never race.
pub unsafe trait HostWord: Copy {
    unsafe fn host_load(ptr: *mut Self) -> Self;
    unsafe fn host_store(ptr: *mut Self, value: Self);
}

macro_rules! host_word {
    ($t:ty, $atomic:ty) => {
        unsafe impl HostWord for $t {
            #[inline(always)]
            unsafe fn host_load(ptr: *mut Self) -> Self {
                unsafe { <$atomic>::from_ptr(ptr) }.load(Ordering::Acquire)
            }

            #[inline(always)]
            unsafe fn host_store(ptr: *mut Self, value: Self) {
                unsafe { <$atomic>::from_ptr(ptr) }.store(value, Ordering::Release)
            }
        }
    };
}

host_word!(u8, AtomicU8);
host_word!(u16, AtomicU16);
host_word!(u32, AtomicU32);

#[inline(always)]
pub unsafe fn load<T: HostWord>(ptr: *mut T) -> T {
    unsafe { T::host_load(ptr) }
}

#[inline(always)]
pub unsafe fn store<T: HostWord>(ptr: *mut T, value: T) {
    unsafe { T::host_store(ptr, value) }
}

#[inline(always)]
pub fn dmb() {
    fence(Ordering::SeqCst);
}

#[inline(always)]
pub fn dsb() {
    fence(Ordering::SeqCst);
}

// No interrupts or events on the host: waiting degrades to a spin hint and
// waking is a no-op.

#[inline(always)]
pub fn wait_for_interrupt() {
    core::hint::spin_loop();
}

#[inline(always)]
pub fn wait_for_event() {
    core::hint::spin_loop();
}

#[inline(always)]
pub fn send_event() {}

#[inline(always)]
pub fn pend_sv() {}

#[inline(always)]
pub fn pend_irq(irq: u16) {
    let _ = irq;
}

#[inline(always)]
pub fn is_isr_context() -> bool {
    false
}

pub fn systick_init(reload: u32) {
    let _ = reload;
}

pub fn halt() -> ! {
    panic!("halt");
}
