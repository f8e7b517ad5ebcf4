/*!
 * Process Types
 * Process descriptor and lifecycle states
 */

use crate::core::limits::{IDLE, PRIO_USER};
use crate::core::types::{ExitStatus, Pid, Priority, Ticks};
use crate::sync::ChainId;
use serde::{Deserialize, Serialize};

/// Lifecycle state of a process slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessState {
    /// Slot not in use
    #[default]
    Free,
    Ready,
    Running,
    /// Blocked or sleeping
    Stopped,
    /// Terminated, exit status not yet collected
    Zombie,
}

/// Process descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Process {
    pub state: ProcessState,
    pub priority: Priority,
    /// Aging credit while waiting, remaining quantum while running
    pub counter: u32,
    /// Absolute deadline in ticks, 0 when disarmed
    pub alarm: Ticks,
    pub father: Pid,
    /// Children not yet reaped (live or zombie)
    pub nchildren: u32,
    /// Exit code, meaningful once the process is a zombie
    pub status: ExitStatus,
    pub utime: Ticks,
    pub ktime: Ticks,
}

impl Default for Process {
    fn default() -> Self {
        Self {
            state: ProcessState::Free,
            priority: PRIO_USER,
            counter: 0,
            alarm: 0,
            father: IDLE,
            nchildren: 0,
            status: 0,
            utime: 0,
            ktime: 0,
        }
    }
}

impl Process {
    /// Slot holds a process in any state
    #[inline(always)]
    pub fn is_valid(&self) -> bool {
        self.state != ProcessState::Free
    }

    #[inline(always)]
    pub fn is_ready(&self) -> bool {
        self.state == ProcessState::Ready
    }

    /// Total CPU time consumed
    #[inline(always)]
    pub fn cpu_time(&self) -> Ticks {
        self.utime + self.ktime
    }
}

/// Read-only snapshot of one process
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessInfo {
    pub pid: Pid,
    #[serde(flatten)]
    pub process: Process,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waiting_on: Option<ChainId>,
}
