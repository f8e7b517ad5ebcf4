/*!
 * Sleep / Wakeup
 * Block the calling process on a wait chain and release whole chains
 */

use super::ChainId;
use crate::core::limits::IDLE;
use crate::core::types::{Pid, Priority};
use crate::kernel::{Kernel, KernelState};
use crate::process::ProcessState;
use log::trace;

impl Kernel {
    /// Block the calling process on `chain` at `priority` and give up the CPU
    ///
    /// Returns the process dispatched in its place. The sleeper runs again
    /// only after a [`Kernel::wakeup`] of the chain (or a resume) readies it.
    ///
    /// # Panics
    /// If called from IDLE, which must never block.
    pub fn sleep(&self, chain: ChainId, priority: Priority) -> Pid {
        let _irq = self.irq.mask();
        let mut st = self.state.lock();
        self.sleep_locked(&mut st, chain, priority)
    }

    /// Make every process on `chain` READY and empty the chain
    ///
    /// Returns how many processes were woken.
    pub fn wakeup(&self, chain: ChainId) -> usize {
        let _irq = self.irq.mask();
        let mut st = self.state.lock();
        self.wakeup_locked(&mut st, chain)
    }

    pub(crate) fn sleep_locked(
        &self,
        st: &mut KernelState,
        chain: ChainId,
        priority: Priority,
    ) -> Pid {
        let pid = st.current;
        assert_ne!(pid, IDLE, "IDLE attempted to sleep on {}", chain);

        st.procs[pid].priority = priority;
        if let Some(previous) = st.chains.enqueue(chain, pid) {
            trace!("Process {} moved from {} to {}", pid, previous, chain);
        }
        st.procs[pid].state = ProcessState::Stopped;
        trace!("Process {} sleeping on {} at priority {}", pid, chain, priority);
        self.dispatch(st)
    }

    pub(crate) fn wakeup_locked(&self, st: &mut KernelState, chain: ChainId) -> usize {
        let woken = st.chains.drain(chain);
        for &pid in &woken {
            st.procs.sched(pid);
        }
        if !woken.is_empty() {
            trace!("Woke {} process(es) on {}", woken.len(), chain);
            self.stats.add_wakeups(woken.len() as u64);
        }
        woken.len()
    }
}
