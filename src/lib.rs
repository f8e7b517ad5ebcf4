/*!
 * Process Management Core Library
 *
 * Single-CPU process scheduling and blocking synchronization: the process
 * table, the dispatcher and its policies, wait chains, counting semaphores
 * and child wait/reap. Hardware-facing pieces are reached through the
 * traits in [`hal`].
 */

pub mod core;
pub mod hal;
pub mod ipc;
pub mod kernel;
pub mod monitoring;
pub mod process;
pub mod scheduler;
pub mod signals;
pub mod sync;
pub mod syscalls;

// Re-exports
pub use crate::core::errors::{PmError, PmResult};
pub use crate::core::types::{Completion, CpuMode, ExitStatus, Pid, Priority, SemId, SemKey, Ticks};
pub use crate::core::KernelConfig;
pub use ipc::{SemCommand, Semaphore};
pub use kernel::{Kernel, KernelBuilder};
pub use monitoring::init_tracing;
pub use process::{Process, ProcessInfo, ProcessState};
pub use scheduler::{SchedulerStats, SchedulingPolicy};
pub use signals::Signal;
pub use sync::ChainId;
pub use syscalls::Reaped;
