//! Compile-time configuration
//!
//! These constants control defaults handed to the external scheduler and the
//! tick bookkeeping.

/// System tick rate in Hz
pub const CFG_TICK_RATE_HZ: u32 = 1000;

/// Core clock feeding SysTick
pub const CFG_CPU_CLOCK_HZ: u32 = 16_000_000;

/// Number of priority levels the scheduler is assumed to accept
pub const CFG_PRIO_MAX: usize = 32;

/// Priority given to tasks created without explicit attributes
pub const CFG_TASK_PRIO_DEFAULT: u8 = 2;

/// Stack size (words) requested for tasks created without explicit attributes
pub const CFG_TASK_STK_SIZE_DEFAULT: usize = 128;

/// Minimum task stack size
pub const CFG_STK_SIZE_MIN: usize = 64;
