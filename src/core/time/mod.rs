//! Time management module
//!
//! A free-running tick counter for coarse delays and timestamps. The
//! counter is only ever written by the tick interrupt and wraps at
//! `u32::MAX`; all arithmetic on it is wrapping.

use crate::config::CFG_TICK_RATE_HZ;
use crate::sync::atomic::AtomicCell;
use crate::types::OsTick;

/// Anything that can report the current tick
pub trait TickSource {
    fn now(&self) -> OsTick;
}

/// Tick counter fed by a periodic interrupt
pub struct TickCounter {
    ticks: AtomicCell<OsTick>,
}

/// Process-wide tick counter
///
/// Incremented by the `SysTick` exception when the `systick` feature is on;
/// otherwise the application calls [`TickCounter::increment`] from its own
/// tick handler.
pub static SYS_TICK: TickCounter = TickCounter::new();

impl TickCounter {
    pub const fn new() -> Self {
        Self {
            ticks: AtomicCell::new(0),
        }
    }

    /// Advance by one tick, returning the new count
    #[inline]
    pub fn increment(&self) -> OsTick {
        self.ticks.fetch_inc().wrapping_add(1)
    }

    #[inline]
    pub fn reset(&self) {
        self.ticks.store(0);
    }
}

impl Default for TickCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl TickSource for TickCounter {
    #[inline]
    fn now(&self) -> OsTick {
        self.ticks.load()
    }
}

/// Ticks elapsed since `since`, across counter wrap
#[inline]
pub fn elapsed<T: TickSource + ?Sized>(source: &T, since: OsTick) -> OsTick {
    source.now().wrapping_sub(since)
}

/// Busy-wait for `ticks`
///
/// For use before the scheduler runs or where a task delay is not possible.
/// Returns immediately for `ticks == 0`.
pub fn delay<T: TickSource + ?Sized>(source: &T, ticks: OsTick) {
    let start = source.now();
    while elapsed(source, start) < ticks {
        core::hint::spin_loop();
    }
}

/// Convert milliseconds to ticks, rounding up
#[inline]
pub const fn ms_to_ticks(ms: u32) -> OsTick {
    let ticks = (ms as u64 * CFG_TICK_RATE_HZ as u64).div_ceil(1000);
    if ticks > OsTick::MAX as u64 {
        OsTick::MAX
    } else {
        ticks as OsTick
    }
}

/// Largest SysTick reload value (24-bit counter)
pub const SYSTICK_RELOAD_MAX: u32 = (1 << 24) - 1;

/// SysTick reload for a `tick_hz` tick from a `cpu_hz` core clock
///
/// Clamped to what the counter can hold: a clock slower than the tick rate
/// gives the shortest period, a clock too fast for 24 bits the longest.
#[inline]
pub const fn systick_reload(cpu_hz: u32, tick_hz: u32) -> u32 {
    if tick_hz == 0 {
        return SYSTICK_RELOAD_MAX;
    }
    let cycles = cpu_hz / tick_hz;
    if cycles == 0 {
        0
    } else if cycles - 1 > SYSTICK_RELOAD_MAX {
        SYSTICK_RELOAD_MAX
    } else {
        cycles - 1
    }
}

/// Start SysTick at [`CFG_TICK_RATE_HZ`] from a core clock of `cpu_hz`
pub fn systick_start(cpu_hz: u32) {
    SYS_TICK.reset();
    crate::port::systick_init(systick_reload(cpu_hz, CFG_TICK_RATE_HZ));
}

/// SysTick interrupt handler
#[cfg(all(target_arch = "arm", feature = "systick"))]
#[cortex_m_rt::exception]
fn SysTick() {
    SYS_TICK.increment();
}
