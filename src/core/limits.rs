/*!
 * System Limits and Constants
 *
 * Table sizes, priority bounds and scheduling constants in one place.
 * Values marked [LINUX-COMPAT] follow the Linux numbering.
 */

use super::types::{Pid, Priority};

// =============================================================================
// PROCESS TABLE
// =============================================================================

/// Default number of process slots, IDLE included
pub const PROC_MAX: usize = 64;

/// Slot reserved for the IDLE process
pub const IDLE: Pid = 0;

/// First slot available to ordinary processes
pub const FIRST_PROC: Pid = 1;

// =============================================================================
// PRIORITIES
// =============================================================================

/// Most urgent priority a process can be given
pub const PRIO_MIN: Priority = -100;

/// Least urgent priority a process can be given
pub const PRIO_MAX: Priority = 40;

/// Priority every process is given when it is dispatched
pub const PRIO_USER: Priority = 40;

// =============================================================================
// SCHEDULING
// =============================================================================

/// Clock ticks a process may run before it is preempted
pub const PROC_QUANTUM: u32 = 50;

/// Offset used to turn a priority into lottery tickets
pub const LOTTERY_BASE: Priority = 60;

/// Priority span worth one lottery ticket
pub const LOTTERY_STEP: Priority = 20;

/// Fewest tickets a READY process holds
pub const LOTTERY_MIN_TICKETS: u32 = 1;

/// Most tickets a READY process holds
pub const LOTTERY_MAX_TICKETS: u32 = 8;

/// Default kernel RNG seed
pub const DEFAULT_RNG_SEED: u64 = 0x5eed_cafe;

// =============================================================================
// SEMAPHORES
// =============================================================================

/// Default number of semaphore slots
pub const SEM_MAX: usize = 64;

/// Remove the semaphore [LINUX-COMPAT]
pub const IPC_RMID: i32 = 0;

/// Read the semaphore counter [LINUX-COMPAT]
pub const GETVAL: i32 = 12;

/// Overwrite the semaphore counter [LINUX-COMPAT]
pub const SETVAL: i32 = 16;
