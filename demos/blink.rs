//! Blink Example - two contexts sharing a counter through a blocking mutex
//!
//! No scheduler: `main` and the SysTick handler (crate `systick` feature)
//! are the only execution contexts.

#![no_std]
#![no_main]

use cortex_m_rt::entry;
use cm3rt::time::{self, TickSource, SYS_TICK};
use cm3rt::{AtomicCell, ScopedLock, WfeMutex, CFG_CPU_CLOCK_HZ};

static BLINKS: AtomicCell<u32> = AtomicCell::new(0);
static LED_LOCK: WfeMutex = WfeMutex::new();

fn toggle_led() {
    let _guard = ScopedLock::new(&LED_LOCK);
    let n = BLINKS.fetch_inc() + 1;
    cm3rt::info!("LED toggle #{} at tick {}", n, SYS_TICK.now());
}

#[entry]
fn main() -> ! {
    time::systick_start(CFG_CPU_CLOCK_HZ);
    cm3rt::info!("Blink demo");

    loop {
        toggle_led();
        time::delay(&SYS_TICK, time::ms_to_ticks(500));
    }
}
