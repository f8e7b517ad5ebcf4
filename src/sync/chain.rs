/*!
 * Wait Chains
 *
 * Blocked processes grouped by the resource they wait on. Chains hold slot
 * ids only; the process descriptors stay in the process table.
 */

use crate::core::types::{Pid, SemId};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a wait chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ChainId {
    /// Waiters on one semaphore entry
    Semaphore(SemId),
    /// Parents blocked in `wait`
    ChildWait,
    /// Chain owned by some other kernel component
    Named(u32),
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainId::Semaphore(id) => write!(f, "semaphore:{}", id),
            ChainId::ChildWait => f.write_str("child-wait"),
            ChainId::Named(id) => write!(f, "named:{}", id),
        }
    }
}

/// All wait chains in the kernel
///
/// A process is on at most one chain: [`WaitChains::enqueue`] moves it off
/// whatever chain it was on before.
#[derive(Debug, Default)]
pub struct WaitChains {
    chains: AHashMap<ChainId, Vec<Pid>>,
    membership: AHashMap<Pid, ChainId>,
}

impl WaitChains {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put `pid` on `chain`, returning the chain it was taken off, if any
    pub fn enqueue(&mut self, chain: ChainId, pid: Pid) -> Option<ChainId> {
        let previous = self.remove(pid);
        self.chains.entry(chain).or_default().push(pid);
        self.membership.insert(pid, chain);
        previous
    }

    /// Take `pid` off its chain
    pub fn remove(&mut self, pid: Pid) -> Option<ChainId> {
        let chain = self.membership.remove(&pid)?;
        if let Some(waiters) = self.chains.get_mut(&chain) {
            waiters.retain(|&p| p != pid);
            if waiters.is_empty() {
                self.chains.remove(&chain);
            }
        }
        Some(chain)
    }

    /// Empty `chain`, returning its members in enqueue order
    pub fn drain(&mut self, chain: ChainId) -> Vec<Pid> {
        let waiters = self.chains.remove(&chain).unwrap_or_default();
        for pid in &waiters {
            self.membership.remove(pid);
        }
        waiters
    }

    pub fn chain_of(&self, pid: Pid) -> Option<ChainId> {
        self.membership.get(&pid).copied()
    }

    pub fn waiters(&self, chain: ChainId) -> &[Pid] {
        self.chains.get(&chain).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self, chain: ChainId) -> bool {
        self.waiters(chain).is_empty()
    }

    pub fn len(&self, chain: ChainId) -> usize {
        self.waiters(chain).len()
    }
}
