/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 */

use super::types::{Pid, SemId};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Interrupted system call [LINUX-COMPAT]
pub const EINTR: i32 = 4;
/// No child processes [LINUX-COMPAT]
pub const ECHILD: i32 = 10;
/// Device or resource busy [LINUX-COMPAT]
pub const EBUSY: i32 = 16;
/// Invalid argument [LINUX-COMPAT]
pub const EINVAL: i32 = 22;
/// No space left [LINUX-COMPAT]
pub const ENOSPC: i32 = 28;

/// Errors returned by the scheduling core to its callers
///
/// None of these are fatal to the kernel. Broken internal invariants are
/// not represented here; they panic.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum PmError {
    #[error("Invalid argument: {0}")]
    #[diagnostic(
        code(pm::invalid_argument),
        help("Check identifiers, commands and user pointers passed to the call.")
    )]
    InvalidArgument(String),

    #[error("Resource exhausted: {0}")]
    #[diagnostic(
        code(pm::resource_exhausted),
        help("The fixed-size table is full. Release entries or raise the table size.")
    )]
    ResourceExhausted(String),

    #[error("Process {0} has no children to wait for")]
    #[diagnostic(code(pm::no_children))]
    NoChildren(Pid),

    #[error("Semaphore {0} still has waiting processes")]
    #[diagnostic(
        code(pm::busy),
        help("Wake the waiters before removing the semaphore.")
    )]
    Busy(SemId),

    #[error("Wait of process {0} interrupted by a signal")]
    #[diagnostic(code(pm::interrupted))]
    Interrupted(Pid),
}

impl PmError {
    /// Negative errno value handed back across the syscall boundary
    pub fn errno(&self) -> i32 {
        match self {
            PmError::InvalidArgument(_) => -EINVAL,
            PmError::ResourceExhausted(_) => -ENOSPC,
            PmError::NoChildren(_) => -ECHILD,
            PmError::Busy(_) => -EBUSY,
            PmError::Interrupted(_) => -EINTR,
        }
    }

    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        PmError::InvalidArgument(msg.into())
    }

    pub(crate) fn exhausted(msg: impl Into<String>) -> Self {
        PmError::ResourceExhausted(msg.into())
    }
}

/// Result type for scheduling core operations
pub type PmResult<T> = std::result::Result<T, PmError>;
