//! Error types
//!
//! Uses Rust's Result pattern instead of C-style error pointers. Lock
//! contention is not an error: `try_lock` reports it as `false`.

/// Runtime error type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u16)]
pub enum OsError {
    /// Task wrapper already registered
    TaskRegistered = 24001,

    /// Scheduler does not provide this kind of object
    ObjType = 24004,

    /// Scheduler is not running
    OsNotRunning = 24201,

    /// Blocking wait attempted from an interrupt handler
    PendIsr = 25006,

    /// Invalid priority
    PrioInvalid = 25203,

    /// Invalid stack size
    StkSizeInvalid = 28208,

    /// Cannot create task from ISR
    TaskCreateIsr = 29002,

    /// Scheduler has no room for another task
    TaskNoMoreTcb = 29008,

    /// Task wrapper was never registered with the scheduler
    TaskNotRegistered = 29010,
}

/// Result type alias for runtime operations
pub type OsResult<T> = Result<T, OsError>;

impl OsError {
    /// Stable numeric code
    #[inline]
    pub const fn code(self) -> u16 {
        self as u16
    }

    /// Whether there is no way to continue after this error
    #[inline]
    pub const fn is_fatal(self) -> bool {
        matches!(self, OsError::TaskNoMoreTcb)
    }
}
