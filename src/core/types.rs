/*!
 * Core Types
 * Common types used across the scheduling core
 */

use serde::{Deserialize, Serialize};

/// Process identifier: the slot index in the process table
pub type Pid = usize;

/// Scheduling priority (lower value = more urgent)
pub type Priority = i32;

/// Clock ticks since boot
pub type Ticks = u64;

/// Index into the semaphore table
pub type SemId = usize;

/// External semaphore key supplied by user space
pub type SemKey = u32;

/// Address in the caller's address space
pub type UserAddr = usize;

/// Exit code recorded for a terminated process
pub type ExitStatus = i32;

/// Outcome of an operation that may suspend the caller
///
/// `Blocked` means the caller was parked and another process has been
/// dispatched; the caller observes the rest of the operation only once it
/// runs again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[must_use = "a blocked caller must not continue as if the operation completed"]
pub enum Completion<T> {
    Ready(T),
    Blocked,
}

impl<T> Completion<T> {
    /// True when the caller was suspended
    #[inline]
    pub fn is_blocked(&self) -> bool {
        matches!(self, Completion::Blocked)
    }

    /// Value produced by a completed call
    pub fn ready(self) -> Option<T> {
        match self {
            Completion::Ready(value) => Some(value),
            Completion::Blocked => None,
        }
    }
}

/// Privilege level the CPU was in when a clock tick arrived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CpuMode {
    User,
    Kernel,
}
