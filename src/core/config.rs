/*!
 * Kernel Configuration
 *
 * Boot-time parameters for the scheduling core, with environment overrides
 */

use super::errors::{PmError, PmResult};
use super::limits::{DEFAULT_RNG_SEED, FIRST_PROC, PROC_MAX, PROC_QUANTUM, SEM_MAX};
use crate::scheduler::SchedulingPolicy;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Environment variable selecting the scheduling policy
pub const ENV_POLICY: &str = "PM_POLICY";
/// Environment variable overriding the time quantum
pub const ENV_QUANTUM: &str = "PM_QUANTUM";
/// Environment variable overriding the process table size
pub const ENV_PROC_MAX: &str = "PM_PROC_MAX";
/// Environment variable overriding the semaphore table size
pub const ENV_SEM_MAX: &str = "PM_SEM_MAX";
/// Environment variable seeding the kernel RNG
pub const ENV_RNG_SEED: &str = "PM_RNG_SEED";

/// Scheduling core configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelConfig {
    /// Policy used by the dispatcher
    pub policy: SchedulingPolicy,
    /// Ticks granted to a process when it is dispatched
    pub quantum: u32,
    /// Process table slots, IDLE included
    pub proc_max: usize,
    /// Semaphore table slots
    pub sem_max: usize,
    /// Seed for the default kernel RNG
    pub rng_seed: u64,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            policy: SchedulingPolicy::default(),
            quantum: PROC_QUANTUM,
            proc_max: PROC_MAX,
            sem_max: SEM_MAX,
            rng_seed: DEFAULT_RNG_SEED,
        }
    }
}

impl KernelConfig {
    /// Small tables and round-robin, handy for deterministic scenarios
    pub fn deterministic() -> Self {
        Self {
            policy: SchedulingPolicy::RoundRobin,
            proc_max: 16,
            sem_max: 8,
            ..Self::default()
        }
    }

    pub fn with_policy(mut self, policy: SchedulingPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_quantum(mut self, quantum: u32) -> Self {
        self.quantum = quantum;
        self
    }

    /// Defaults overlaid with the `PM_*` environment variables
    pub fn from_env() -> PmResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with values from `lookup`
    pub fn from_lookup<F>(lookup: F) -> PmResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(policy) = lookup(ENV_POLICY) {
            config.policy = policy.parse()?;
        }
        if let Some(quantum) = lookup(ENV_QUANTUM) {
            config.quantum = parse_var(ENV_QUANTUM, &quantum)?;
        }
        if let Some(proc_max) = lookup(ENV_PROC_MAX) {
            config.proc_max = parse_var(ENV_PROC_MAX, &proc_max)?;
        }
        if let Some(sem_max) = lookup(ENV_SEM_MAX) {
            config.sem_max = parse_var(ENV_SEM_MAX, &sem_max)?;
        }
        if let Some(seed) = lookup(ENV_RNG_SEED) {
            config.rng_seed = parse_var(ENV_RNG_SEED, &seed)?;
        }
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the kernel cannot boot with
    pub fn validate(&self) -> PmResult<()> {
        if self.quantum == 0 {
            return Err(PmError::invalid("quantum must be at least one tick"));
        }
        if self.proc_max <= FIRST_PROC {
            return Err(PmError::invalid(format!(
                "process table of {} slots leaves no room beside IDLE",
                self.proc_max
            )));
        }
        if self.sem_max == 0 {
            return Err(PmError::invalid("semaphore table must have at least one slot"));
        }
        Ok(())
    }
}

fn parse_var<T: FromStr>(key: &str, value: &str) -> PmResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| PmError::invalid(format!("{}={}", key, value)))
}
