//! Core type definitions
//!
//! These types provide strong typing for the runtime primitives.

/// Task priority as understood by the external scheduler
pub type OsPrio = u8;

/// Tick counter type
pub type OsTick = u32;

/// Stack element type
pub type OsStkElement = u32;

/// Spin lock flag values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum LockState {
    /// Lock is held
    Locked = 0,
    /// Lock is free
    Unlocked = 1,
}

/// Task wrapper state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum TaskState {
    /// Not known to the scheduler yet
    Unregistered = 0,
    /// Eligible for scheduling (running or ready)
    Ready = 1,
    /// Removed from scheduling until resumed
    Suspended = 2,
}

/// Opaque task identifier issued by the external scheduler
///
/// An index into the scheduler's own registry; its meaning is up to the
/// scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct SchedulerTaskId(u32);

impl SchedulerTaskId {
    #[inline(always)]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[inline(always)]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Handle of a mutex object owned by the scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct SchedulerMutexId(u32);

impl SchedulerMutexId {
    #[inline(always)]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[inline(always)]
    pub const fn raw(self) -> u32 {
        self.0
    }
}
