/*!
 * Kernel Builder
 * Builder pattern for Kernel construction
 */

use super::{Hal, Kernel, KernelState};
use crate::core::errors::PmResult;
use crate::core::KernelConfig;
use crate::hal::{
    Clock, ContextSwitch, HostMemory, InterruptControl, InterruptLine, IrqMask, KernelRng,
    RandomSource, RecordingSwitcher, SignalPort, TickClock, UserMemory,
};
use crate::scheduler::AtomicSchedulerStats;
use crate::signals::SignalQueue;
use log::info;
use parking_lot::Mutex;
use std::sync::Arc;

/// Builder for Kernel
///
/// Collaborators left unset fall back to the host implementations.
#[derive(Default)]
pub struct KernelBuilder {
    config: KernelConfig,
    switcher: Option<Arc<dyn ContextSwitch>>,
    signals: Option<Arc<dyn SignalPort>>,
    memory: Option<Arc<dyn UserMemory>>,
    rng: Option<Arc<dyn RandomSource>>,
    interrupts: Option<Arc<dyn InterruptControl>>,
    clock: Option<Arc<dyn Clock>>,
}

impl KernelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: KernelConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_switcher(mut self, switcher: Arc<dyn ContextSwitch>) -> Self {
        self.switcher = Some(switcher);
        self
    }

    pub fn with_signals(mut self, signals: Arc<dyn SignalPort>) -> Self {
        self.signals = Some(signals);
        self
    }

    pub fn with_memory(mut self, memory: Arc<dyn UserMemory>) -> Self {
        self.memory = Some(memory);
        self
    }

    pub fn with_rng(mut self, rng: Arc<dyn RandomSource>) -> Self {
        self.rng = Some(rng);
        self
    }

    pub fn with_interrupts(mut self, interrupts: Arc<dyn InterruptControl>) -> Self {
        self.interrupts = Some(interrupts);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Build the Kernel with IDLE running
    pub fn build(self) -> PmResult<Kernel> {
        self.config.validate()?;

        let mut features = Vec::new();
        if self.switcher.is_some() {
            features.push("switcher");
        }
        if self.signals.is_some() {
            features.push("signals");
        }
        if self.memory.is_some() {
            features.push("memory");
        }
        if self.rng.is_some() {
            features.push("rng");
        }
        if self.interrupts.is_some() {
            features.push("interrupts");
        }
        if self.clock.is_some() {
            features.push("clock");
        }

        let seed = self.config.rng_seed;
        let hal = Hal {
            switcher: self
                .switcher
                .unwrap_or_else(|| Arc::new(RecordingSwitcher::new())),
            signals: self.signals.unwrap_or_else(|| Arc::new(SignalQueue::new())),
            memory: self.memory.unwrap_or_else(|| Arc::new(HostMemory::new())),
            rng: self.rng.unwrap_or_else(|| Arc::new(KernelRng::new(seed))),
            clock: self.clock.unwrap_or_else(|| Arc::new(TickClock::new())),
        };
        let interrupts = self
            .interrupts
            .unwrap_or_else(|| Arc::new(InterruptLine::new()));

        info!(
            "Kernel initialized: policy={}, quantum={}, proc_max={}, sem_max={}, custom collaborators=[{}]",
            self.config.policy,
            self.config.quantum,
            self.config.proc_max,
            self.config.sem_max,
            features.join(", ")
        );

        Ok(Kernel {
            state: Mutex::new(KernelState::new(&self.config)),
            hal,
            irq: IrqMask::new(interrupts),
            stats: AtomicSchedulerStats::new(),
        })
    }
}
