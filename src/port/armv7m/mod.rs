//! ARMv7-M port
//!
//! LDREX/STREX based exclusive access plus the handful of system control
//! operations the wait/wake strategies map onto.

use core::arch::asm;

use cortex_m::interrupt::InterruptNumber;
use cortex_m::peripheral::scb::VectActive;
use cortex_m::peripheral::syst::SystClkSource;
use cortex_m::peripheral::{NVIC, SCB};

macro_rules! exclusive_ops {
    ($load:ident, $store:ident, $t:ty, $ldrex:literal, $strex:literal) => {
        /// Exclusive load; opens the local monitor on `ptr`.
        #[inline(always)]
        pub unsafe fn $load(ptr: *mut $t) -> $t {
            let value: u32;
            unsafe {
                asm!(
                    concat!($ldrex, " {value}, [{ptr}]"),
                    ptr = in(reg) ptr,
                    value = out(reg) value,
                    options(nostack, preserves_flags),
                );
            }
            value as $t
        }

        /// Exclusive store. Returns `true` if the store committed.
        ///
        /// The monitor tracks the reservation, so `_reserved` is unused here.
        #[inline(always)]
        pub unsafe fn $store(ptr: *mut $t, _reserved: $t, value: $t) -> bool {
            let status: u32;
            unsafe {
                asm!(
                    concat!($strex, " {status}, {value}, [{ptr}]"),
                    status = out(reg) status,
                    value = in(reg) value as u32,
                    ptr = in(reg) ptr,
                    options(nostack, preserves_flags),
                );
            }
            status == 0
        }
    };
}

exclusive_ops!(ldrex_u8, strex_u8, u8, "ldrexb", "strexb");
exclusive_ops!(ldrex_u16, strex_u16, u16, "ldrexh", "strexh");
exclusive_ops!(ldrex_u32, strex_u32, u32, "ldrex", "strex");

/// Drop any outstanding exclusive reservation
#[inline(always)]
pub fn clrex() {
    unsafe { asm!("clrex", options(nomem, nostack, preserves_flags)) };
}

/// Plain single-copy-atomic read
#[inline(always)]
pub unsafe fn load<T: Copy>(ptr: *mut T) -> T {
    unsafe { core::ptr::read_volatile(ptr) }
}

/// Plain single-copy-atomic write
#[inline(always)]
pub unsafe fn store<T: Copy>(ptr: *mut T, value: T) {
    unsafe { core::ptr::write_volatile(ptr, value) }
}

/// Data memory barrier
#[inline(always)]
pub fn dmb() {
    cortex_m::asm::dmb();
}

/// Data synchronization barrier
#[inline(always)]
pub fn dsb() {
    cortex_m::asm::dsb();
}

#[inline(always)]
pub fn wait_for_interrupt() {
    cortex_m::asm::wfi();
}

#[inline(always)]
pub fn wait_for_event() {
    cortex_m::asm::wfe();
}

#[inline(always)]
pub fn send_event() {
    cortex_m::asm::sev();
}

/// Raise the PendSV software interrupt
#[inline(always)]
pub fn pend_sv() {
    SCB::set_pendsv();
}

/// Raw NVIC line number
#[derive(Clone, Copy)]
struct IrqLine(u16);

unsafe impl InterruptNumber for IrqLine {
    #[inline(always)]
    fn number(self) -> u16 {
        self.0
    }
}

/// Set the pending bit of an NVIC interrupt line
#[inline(always)]
pub fn pend_irq(irq: u16) {
    NVIC::pend(IrqLine(irq));
}

/// Check if currently executing in handler mode
#[inline]
pub fn is_isr_context() -> bool {
    SCB::vect_active() != VectActive::ThreadMode
}

/// Initialize SysTick for the crate tick counter
///
/// # Arguments
/// * `reload` - Value loaded into SYST_RVR, one less than the period in
///   core cycles. Only the low 24 bits exist in hardware.
///
/// # Example
/// For 16MHz clock with 1000Hz tick rate: reload = 16_000_000 / 1000 - 1 = 15_999
pub fn systick_init(reload: u32) {
    debug_assert!(reload < 1 << 24);
    let mut p = unsafe { cortex_m::Peripherals::steal() };

    p.SYST.set_reload(reload);
    p.SYST.clear_current();
    p.SYST.set_clock_source(SystClkSource::Core);
    p.SYST.enable_interrupt();
    p.SYST.enable_counter();
}

/// Park the core for good
#[inline(always)]
pub fn halt() -> ! {
    loop {
        cortex_m::asm::udf();
    }
}
