/*!
 * Lock-Free Scheduler Statistics
 * Atomic counters updated on the dispatch path
 */

use super::policy::SchedulingPolicy;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Snapshot of dispatcher activity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerStats {
    pub policy: SchedulingPolicy,
    pub quantum: u32,
    /// Completed dispatch passes
    pub dispatches: u64,
    /// Dispatches that picked a different process
    pub context_switches: u64,
    /// Dispatches forced by quantum expiry
    pub preemptions: u64,
    /// Alarms that expired and raised SIGALRM
    pub alarms_fired: u64,
    /// Processes moved back to READY by `wakeup` or `resume`
    pub wakeups: u64,
}

/// Atomic scheduler statistics
///
/// # Performance
/// - Cache-line aligned to prevent false sharing
/// - Relaxed ordering; a snapshot may mix values from neighbouring dispatches
#[repr(C, align(64))]
#[derive(Debug, Default)]
pub struct AtomicSchedulerStats {
    dispatches: AtomicU64,
    context_switches: AtomicU64,
    preemptions: AtomicU64,
    alarms_fired: AtomicU64,
    wakeups: AtomicU64,
}

impl AtomicSchedulerStats {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline(always)]
    pub fn inc_dispatches(&self) {
        self.dispatches.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn inc_context_switches(&self) {
        self.context_switches.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn inc_preemptions(&self) {
        self.preemptions.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn inc_alarms(&self) {
        self.alarms_fired.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn add_wakeups(&self, n: u64) {
        self.wakeups.fetch_add(n, Ordering::Relaxed);
    }

    /// Get snapshot of current stats
    #[inline]
    pub fn snapshot(&self, policy: SchedulingPolicy, quantum: u32) -> SchedulerStats {
        SchedulerStats {
            policy,
            quantum,
            dispatches: self.dispatches.load(Ordering::Relaxed),
            context_switches: self.context_switches.load(Ordering::Relaxed),
            preemptions: self.preemptions.load(Ordering::Relaxed),
            alarms_fired: self.alarms_fired.load(Ordering::Relaxed),
            wakeups: self.wakeups.load(Ordering::Relaxed),
        }
    }
}
