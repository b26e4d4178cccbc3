//! Wait and wake strategies for [`Mutex`](crate::sync::mutex::Mutex)
//!
//! A waiter calls [`WaitStrategy::wait`] once per failed attempt; the holder
//! calls [`WakeStrategy::wake`] on every unlock. Each mutex instance has to
//! pair a wait with a wake that can end it:
//!
//! | wait    | compatible wake                      |
//! |---------|--------------------------------------|
//! | `Spin`  | anything, including `NoWake`         |
//! | `Wfe`   | `Sev`, or any interrupt              |
//! | `Wfi`   | `PendSv`, `PendIrq<N>` (enabled line) |

use crate::port;

/// How a blocked caller waits before retrying
pub trait WaitStrategy {
    fn wait();
}

/// How an unlock wakes the waiters
pub trait WakeStrategy {
    fn wake();
}

/// Busy spin
pub struct Spin;

impl WaitStrategy for Spin {
    #[inline(always)]
    fn wait() {
        core::hint::spin_loop();
    }
}

/// Sleep until the next interrupt
pub struct Wfi;

impl WaitStrategy for Wfi {
    #[inline(always)]
    fn wait() {
        port::wait_for_interrupt();
    }
}

/// Sleep until the next event
pub struct Wfe;

impl WaitStrategy for Wfe {
    #[inline(always)]
    fn wait() {
        port::wait_for_event();
    }
}

/// Nothing to wake
pub struct NoWake;

impl WakeStrategy for NoWake {
    #[inline(always)]
    fn wake() {}
}

/// Raise the PendSV software interrupt
pub struct PendSv;

impl WakeStrategy for PendSv {
    #[inline(always)]
    fn wake() {
        port::pend_sv();
    }
}

/// Pend NVIC line `IRQ`
pub struct PendIrq<const IRQ: u16>;

impl<const IRQ: u16> WakeStrategy for PendIrq<IRQ> {
    #[inline(always)]
    fn wake() {
        port::pend_irq(IRQ);
    }
}

/// Signal an event to every core waiting in WFE
pub struct Sev;

impl WakeStrategy for Sev {
    #[inline(always)]
    fn wake() {
        port::dsb();
        port::send_event();
    }
}
