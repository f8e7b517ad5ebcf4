/*!
 * Semaphore Operations
 * semget / semctl / semop entry points
 */

use super::types::SemCommand;
use crate::core::errors::{PmError, PmResult};
use crate::core::limits::IDLE;
use crate::core::types::{Completion, SemId, SemKey};
use crate::kernel::Kernel;
use crate::sync::ChainId;
use log::{debug, info};

impl Kernel {
    /// Index of the semaphore registered under `key`, creating it if needed
    ///
    /// New semaphores start with a counter of zero.
    pub fn semget(&self, key: SemKey) -> PmResult<SemId> {
        let _irq = self.irq.mask();
        let mut st = self.state.lock();

        if let Some(id) = st.sems.lookup(key) {
            return Ok(id);
        }
        let id = st
            .sems
            .allocate(key)
            .ok_or_else(|| PmError::exhausted("semaphore table full"))?;
        debug!("Semaphore {} created for key {:#x}", id, key);
        Ok(id)
    }

    /// Control operation on a semaphore
    ///
    /// `GETVAL` returns the counter, `SETVAL` stores `val` and `IPC_RMID`
    /// frees the entry; the latter two return 0.
    pub fn semctl(&self, id: SemId, cmd: i32, val: i32) -> PmResult<i32> {
        let _irq = self.irq.mask();
        let mut st = self.state.lock();

        st.sems.get(id)?;
        match SemCommand::try_from(cmd)? {
            SemCommand::GetVal => Ok(st.sems.get(id)?.counter),
            SemCommand::SetVal => {
                st.sems.get_mut(id)?.counter = val;
                Ok(0)
            }
            SemCommand::Remove => {
                if !st.chains.is_empty(ChainId::Semaphore(id)) {
                    return Err(PmError::Busy(id));
                }
                st.sems.invalidate(id);
                info!("Semaphore {} removed", id);
                Ok(0)
            }
        }
    }

    /// Up (`op > 0`) or down (`op < 0`) a semaphore by one unit
    ///
    /// An up wakes every process blocked on the semaphore. A down that takes
    /// the counter negative blocks the caller at its current priority and
    /// returns [`Completion::Blocked`]; the caller owns a unit once it runs
    /// again.
    pub fn semop(&self, id: SemId, op: i32) -> PmResult<Completion<()>> {
        if op == 0 {
            return Err(PmError::invalid("semop with zero delta"));
        }

        let _irq = self.irq.mask();
        let mut st = self.state.lock();
        let chain = ChainId::Semaphore(id);

        if op > 0 {
            st.sems.get_mut(id)?.counter += 1;
            self.wakeup_locked(&mut st, chain);
            return Ok(Completion::Ready(()));
        }

        let counter = st.sems.get(id)?.counter;
        if counter <= 0 && st.current == IDLE {
            return Err(PmError::invalid("IDLE cannot block on a semaphore"));
        }

        st.sems.get_mut(id)?.counter -= 1;
        if counter > 0 {
            return Ok(Completion::Ready(()));
        }

        let priority = st.procs[st.current].priority;
        self.sleep_locked(&mut st, chain, priority);
        Ok(Completion::Blocked)
    }
}
