//! Port layer - CPU-specific primitives
//!
//! Everything the concurrency core needs from the processor lives here:
//! exclusive load/store pairs, memory barriers, the low-power wait
//! instructions and the interrupt-pending registers used to wake waiters.
//!
//! ARMv7-M (Cortex-M3/M4/M7) gets the real instructions. Every other target
//! gets a host implementation so the algorithms above can be unit tested.

#[cfg(target_arch = "arm")]
pub mod armv7m;

#[cfg(target_arch = "arm")]
pub use armv7m::*;

#[cfg(not(target_arch = "arm"))]
pub mod host;

#[cfg(not(target_arch = "arm"))]
pub use host::*;
