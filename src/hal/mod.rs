/*!
 * Hardware Abstraction
 *
 * Contracts for everything the scheduling core consumes but does not own:
 * context switching, signal marking, user memory checks, the kernel random
 * source, interrupt masking and the tick clock.
 *
 * Collaborators are called while the kernel state lock is held and must not
 * call back into [`crate::Kernel`].
 */

mod host;
mod irq;

pub use host::{HostMemory, InterruptLine, KernelRng, RecordingSwitcher, TickClock};
pub use irq::{IrqGuard, IrqMask};

use crate::core::types::{ExitStatus, Pid, Ticks, UserAddr};
use crate::signals::Signal;

/// Saves the outgoing execution context and restores the incoming one
pub trait ContextSwitch: Send + Sync {
    /// Only called when `to` differs from `from`
    fn switch_to(&self, from: Pid, to: Pid);
}

/// Pending-signal bookkeeping owned by the signal subsystem
pub trait SignalPort: Send + Sync {
    /// Mark `signal` pending for `pid`
    fn send(&self, pid: Pid, signal: Signal);

    /// Dequeue the lowest-numbered signal pending for `pid`
    fn pending(&self, pid: Pid) -> Option<Signal>;

    /// Forget everything pending for `pid` once its slot is freed
    fn clear(&self, pid: Pid);
}

/// Access to the calling process's address space
pub trait UserMemory: Send + Sync {
    /// `count` objects of `size` bytes starting at `addr` are writable
    fn is_writable(&self, addr: UserAddr, size: usize, count: usize) -> bool;

    /// Store an exit status at a location already checked writable
    fn write_status(&self, addr: UserAddr, status: ExitStatus);
}

/// Uniform random source used by the random and lottery policies
pub trait RandomSource: Send + Sync {
    fn next_u32(&self) -> u32;
}

/// Raw interrupt mask control
pub trait InterruptControl: Send + Sync {
    fn disable(&self);
    fn enable(&self);
}

/// Monotonic tick counter
pub trait Clock: Send + Sync {
    fn now(&self) -> Ticks;
}
