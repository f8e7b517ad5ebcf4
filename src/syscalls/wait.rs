/*!
 * Wait
 *
 * `wait` collects the exit status of a terminated child. A caller with live
 * children but no zombie sleeps on the child-wait chain; once it runs again
 * it continues through [`Kernel::wait_resume`], which looks at the signal
 * that woke it: SIGCHLD rescans the children, anything else ends the wait.
 */

use crate::core::errors::{PmError, PmResult};
use crate::core::limits::{IDLE, PRIO_USER};
use crate::core::types::{Completion, ExitStatus, Pid, UserAddr};
use crate::kernel::{Kernel, KernelState};
use crate::monitoring::SyscallSpan;
use crate::signals::Signal;
use crate::sync::ChainId;
use log::debug;
use serde::{Deserialize, Serialize};
use std::mem::size_of;

/// A child collected by `wait`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaped {
    pub pid: Pid,
    pub status: ExitStatus,
}

impl Kernel {
    /// Wait for a child of the calling process to terminate
    ///
    /// When `status` is given, the child's exit status is stored there.
    pub fn wait(&self, status: Option<UserAddr>) -> PmResult<Completion<Reaped>> {
        let _irq = self.irq.mask();
        let mut st = self.state.lock();
        let span = SyscallSpan::new("wait", st.current);

        let result = self
            .check_status_addr(status)
            .and_then(|_| self.reap_or_block(&mut st, status));
        span.record_outcome(&result);
        result
    }

    /// Continue a `wait` that returned [`Completion::Blocked`]
    ///
    /// Must be called by the waiter once it holds the CPU again.
    pub fn wait_resume(&self, status: Option<UserAddr>) -> PmResult<Completion<Reaped>> {
        let _irq = self.irq.mask();
        let mut st = self.state.lock();
        let pid = st.current;
        let span = SyscallSpan::new("wait_resume", pid);

        let result = match self.hal.signals.pending(pid) {
            Some(Signal::SIGCHLD) => self.reap_or_block(&mut st, status),
            other => {
                debug!("Wait of process {} interrupted by {:?}", pid, other);
                Err(PmError::Interrupted(pid))
            }
        };
        span.record_outcome(&result);
        result
    }

    fn check_status_addr(&self, status: Option<UserAddr>) -> PmResult<()> {
        match status {
            Some(addr) if !self.hal.memory.is_writable(addr, size_of::<ExitStatus>(), 1) => Err(
                PmError::invalid(format!("status pointer {:#x} not writable", addr)),
            ),
            _ => Ok(()),
        }
    }

    /// Reap the first zombie child, or park the caller on the child-wait chain
    fn reap_or_block(
        &self,
        st: &mut KernelState,
        status: Option<UserAddr>,
    ) -> PmResult<Completion<Reaped>> {
        let pid = st.current;
        if st.procs[pid].nchildren == 0 {
            return Err(PmError::NoChildren(pid));
        }

        let zombie = st.procs.zombie_children(pid).next();
        if let Some(child) = zombie {
            let exit_status = st.procs[child].status;
            if let Some(addr) = status {
                self.hal.memory.write_status(addr, exit_status);
            }
            self.bury(st, child);
            debug!("Process {} reaped child {} (status {})", pid, child, exit_status);
            return Ok(Completion::Ready(Reaped {
                pid: child,
                status: exit_status,
            }));
        }

        if pid == IDLE {
            return Err(PmError::invalid("IDLE cannot block in wait"));
        }
        self.sleep_locked(st, ChainId::ChildWait, PRIO_USER);
        Ok(Completion::Blocked)
    }
}

#[cfg(test)]
mod tests {
    use super::Reaped;
    use crate::core::limits::PRIO_USER;
    use crate::core::types::Completion;
    use crate::core::{KernelConfig, PmError};
    use crate::hal::HostMemory;
    use crate::Kernel;
    use std::sync::Arc;

    #[test]
    fn test_wait_without_children() {
        let k = Kernel::new(KernelConfig::deterministic()).unwrap();
        k.spawn(PRIO_USER).unwrap();
        k.yield_cpu();
        assert!(matches!(k.wait(None), Err(PmError::NoChildren(1))));
    }

    #[test]
    fn test_wait_rejects_unmapped_status() {
        let k = Kernel::new(KernelConfig::deterministic()).unwrap();
        assert!(matches!(k.wait(Some(0x1000)), Err(PmError::InvalidArgument(_))));
    }

    #[test]
    fn test_wait_reaps_zombie_immediately() {
        let memory = Arc::new(HostMemory::new());
        memory.map(0x1000..0x2000);
        let k = Kernel::builder()
            .with_config(KernelConfig::deterministic())
            .with_memory(memory.clone())
            .build()
            .unwrap();

        let parent = k.spawn(PRIO_USER).unwrap();
        k.yield_cpu();
        let child = k.spawn(PRIO_USER).unwrap();
        k.yield_cpu();
        assert_eq!(k.current(), child);
        k.exit(7).unwrap();
        assert_eq!(k.current(), parent);

        let reaped = k.wait(Some(0x1000)).unwrap();
        assert_eq!(reaped, Completion::Ready(Reaped { pid: child, status: 7 }));
        assert_eq!(memory.read(0x1000), Some(7));
        assert_eq!(k.process(parent).unwrap().process.nchildren, 0);
        assert!(k.process(child).is_none());
    }
}
