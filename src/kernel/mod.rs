/*!
 * Kernel State
 *
 * The process table, wait chains and semaphore table behind one lock, plus
 * the collaborators the core calls out to. Every public operation masks
 * interrupts first and then takes the state lock, so a critical section
 * covers the whole check-and-mutate sequence of the call.
 */

mod builder;

pub use builder::KernelBuilder;

use crate::core::errors::{PmError, PmResult};
use crate::core::limits::IDLE;
use crate::core::types::{Pid, SemId};
use crate::core::KernelConfig;
use crate::hal::{Clock, ContextSwitch, IrqMask, RandomSource, SignalPort, UserMemory};
use crate::ipc::{Semaphore, SemaphoreTable};
use crate::process::{ProcessInfo, ProcessTable};
use crate::scheduler::{AtomicSchedulerStats, SchedulerStats, SchedulingPolicy};
use crate::sync::{ChainId, WaitChains};
use parking_lot::Mutex;
use std::sync::Arc;

/// Shared mutable state of the scheduling core
pub(crate) struct KernelState {
    pub procs: ProcessTable,
    pub chains: WaitChains,
    pub sems: SemaphoreTable,
    pub policy: SchedulingPolicy,
    pub quantum: u32,
    /// Process holding the CPU
    pub current: Pid,
    /// Process that held the CPU before the last dispatch
    pub last: Pid,
}

impl KernelState {
    fn new(config: &KernelConfig) -> Self {
        Self {
            procs: ProcessTable::new(config.proc_max),
            chains: WaitChains::new(),
            sems: SemaphoreTable::new(config.sem_max),
            policy: config.policy,
            quantum: config.quantum,
            current: IDLE,
            last: IDLE,
        }
    }

    /// Slot id of a process that exists
    pub fn check_pid(&self, pid: Pid) -> PmResult<Pid> {
        self.procs
            .valid(pid)
            .map(|_| pid)
            .ok_or_else(|| PmError::invalid(format!("process {}", pid)))
    }

    pub fn info(&self, pid: Pid) -> Option<ProcessInfo> {
        self.procs.valid(pid).map(|p| ProcessInfo {
            pid,
            process: p.clone(),
            waiting_on: self.chains.chain_of(pid),
        })
    }
}

/// External collaborators
pub(crate) struct Hal {
    pub switcher: Arc<dyn ContextSwitch>,
    pub signals: Arc<dyn SignalPort>,
    pub memory: Arc<dyn UserMemory>,
    pub rng: Arc<dyn RandomSource>,
    pub clock: Arc<dyn Clock>,
}

/// Scheduling and blocking-synchronization core for one CPU
pub struct Kernel {
    pub(crate) state: Mutex<KernelState>,
    pub(crate) hal: Hal,
    pub(crate) irq: IrqMask,
    pub(crate) stats: AtomicSchedulerStats,
}

impl Kernel {
    pub fn builder() -> KernelBuilder {
        KernelBuilder::new()
    }

    /// Kernel with host collaborators and the given configuration
    pub fn new(config: KernelConfig) -> PmResult<Self> {
        KernelBuilder::new().with_config(config).build()
    }

    /// Process holding the CPU
    pub fn current(&self) -> Pid {
        self.state.lock().current
    }

    /// Process that held the CPU before the last dispatch
    pub fn last(&self) -> Pid {
        self.state.lock().last
    }

    pub fn process(&self, pid: Pid) -> Option<ProcessInfo> {
        self.state.lock().info(pid)
    }

    /// Every valid process, IDLE first
    pub fn snapshot(&self) -> Vec<ProcessInfo> {
        let st = self.state.lock();
        (0..st.procs.capacity())
            .filter_map(|pid| st.info(pid))
            .collect()
    }

    pub fn ready_count(&self) -> usize {
        self.state.lock().procs.ready_count()
    }

    /// Processes currently blocked on `chain`
    pub fn waiters(&self, chain: ChainId) -> Vec<Pid> {
        self.state.lock().chains.waiters(chain).to_vec()
    }

    pub fn semaphore(&self, id: SemId) -> Option<Semaphore> {
        self.state.lock().sems.get(id).ok().copied()
    }

    pub fn policy(&self) -> SchedulingPolicy {
        self.state.lock().policy
    }

    /// Switch the policy used from the next dispatch on
    pub fn set_policy(&self, policy: SchedulingPolicy) {
        let mut st = self.state.lock();
        if st.policy != policy {
            log::info!("Changing scheduler policy from {} to {}", st.policy, policy);
            st.policy = policy;
        }
    }

    pub fn stats(&self) -> SchedulerStats {
        let st = self.state.lock();
        self.stats.snapshot(st.policy, st.quantum)
    }
}
