//! Scheduler error types.

/// Result type for scheduler operations.
pub type Result<T> = core::result::Result<T, SchedError>;

/// Scheduler operation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedError {
    /// A required argument was missing or malformed.
    InvalidArgument,
    /// Allocation failed or the registry is at its task limit.
    ResourceExhausted,
    /// No registered task has the requested id.
    NotFound,
    /// The worker has been asked to stop; nothing will consume the request.
    NotRunning,
}

impl SchedError {
    /// Negative errno equivalent, for firmware glue that expects C statuses.
    pub fn errno(&self) -> i32 {
        match self {
            SchedError::InvalidArgument => -22, // EINVAL
            SchedError::ResourceExhausted => -12, // ENOMEM
            SchedError::NotFound => -17, // EEXIST
            SchedError::NotRunning => -3, // ESRCH
        }
    }
}

impl core::fmt::Display for SchedError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match self {
            SchedError::InvalidArgument => write!(f, "invalid argument"),
            SchedError::ResourceExhausted => write!(f, "resource exhausted"),
            SchedError::NotFound => write!(f, "task not found"),
            SchedError::NotRunning => write!(f, "worker not running"),
        }
    }
}

impl From<alloc::collections::TryReserveError> for SchedError {
    fn from(_: alloc::collections::TryReserveError) -> Self {
        SchedError::ResourceExhausted
    }
}
