/*!
 * Host Collaborators
 * In-process implementations used when the core runs hosted or under test
 */

use super::{Clock, ContextSwitch, InterruptControl, RandomSource, UserMemory};
use crate::core::types::{ExitStatus, Pid, Ticks, UserAddr};
use ahash::AHashMap;
use log::trace;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::ops::Range;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Context switcher that records every switch
#[derive(Debug, Default)]
pub struct RecordingSwitcher {
    switches: Mutex<Vec<(Pid, Pid)>>,
}

impl RecordingSwitcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switches performed so far, oldest first
    pub fn switches(&self) -> Vec<(Pid, Pid)> {
        self.switches.lock().clone()
    }
}

impl ContextSwitch for RecordingSwitcher {
    fn switch_to(&self, from: Pid, to: Pid) {
        trace!("Context switch {} -> {}", from, to);
        self.switches.lock().push((from, to));
    }
}

/// Flat user memory with explicitly mapped writable ranges
#[derive(Debug, Default)]
pub struct HostMemory {
    writable: Mutex<Vec<Range<UserAddr>>>,
    cells: Mutex<AHashMap<UserAddr, ExitStatus>>,
}

impl HostMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `range` writable
    pub fn map(&self, range: Range<UserAddr>) {
        self.writable.lock().push(range);
    }

    /// Status last stored at `addr`
    pub fn read(&self, addr: UserAddr) -> Option<ExitStatus> {
        self.cells.lock().get(&addr).copied()
    }
}

impl UserMemory for HostMemory {
    fn is_writable(&self, addr: UserAddr, size: usize, count: usize) -> bool {
        let end = match size.checked_mul(count).and_then(|len| addr.checked_add(len)) {
            Some(end) => end,
            None => return false,
        };
        self.writable
            .lock()
            .iter()
            .any(|r| r.start <= addr && end <= r.end)
    }

    fn write_status(&self, addr: UserAddr, status: ExitStatus) {
        self.cells.lock().insert(addr, status);
    }
}

/// Seeded kernel random source
pub struct KernelRng {
    inner: Mutex<StdRng>,
}

impl KernelRng {
    pub fn new(seed: u64) -> Self {
        Self {
            inner: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for KernelRng {
    fn next_u32(&self) -> u32 {
        self.inner.lock().gen()
    }
}

/// Simulated interrupt line
#[derive(Debug, Default)]
pub struct InterruptLine {
    masked: AtomicBool,
    disables: AtomicU64,
}

impl InterruptLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_masked(&self) -> bool {
        self.masked.load(Ordering::Acquire)
    }

    /// Times interrupts went from enabled to disabled
    pub fn disable_count(&self) -> u64 {
        self.disables.load(Ordering::Relaxed)
    }
}

impl InterruptControl for InterruptLine {
    fn disable(&self) {
        self.masked.store(true, Ordering::Release);
        self.disables.fetch_add(1, Ordering::Relaxed);
    }

    fn enable(&self) {
        self.masked.store(false, Ordering::Release);
    }
}

/// Manually advanced tick counter
#[derive(Debug, Default)]
pub struct TickClock {
    ticks: AtomicU64,
}

impl TickClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by `n` ticks and return the new time
    pub fn advance(&self, n: Ticks) -> Ticks {
        self.ticks.fetch_add(n, Ordering::AcqRel) + n
    }
}

impl Clock for TickClock {
    fn now(&self) -> Ticks {
        self.ticks.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_memory_bounds() {
        let memory = HostMemory::new();
        assert!(!memory.is_writable(0x1000, 4, 1));

        memory.map(0x1000..0x1010);
        assert!(memory.is_writable(0x1000, 4, 4));
        assert!(!memory.is_writable(0x100c, 4, 2));
        assert!(!memory.is_writable(usize::MAX - 1, 4, 1));

        memory.write_status(0x1004, -3);
        assert_eq!(memory.read(0x1004), Some(-3));
    }

    #[test]
    fn test_kernel_rng_is_reproducible() {
        let a = KernelRng::new(7);
        let b = KernelRng::new(7);
        let xs: Vec<u32> = (0..8).map(|_| a.next_u32()).collect();
        let ys: Vec<u32> = (0..8).map(|_| b.next_u32()).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn test_tick_clock_advances() {
        let clock = TickClock::new();
        assert_eq!(clock.now(), 0);
        assert_eq!(clock.advance(5), 5);
        assert_eq!(clock.now(), 5);
    }
}
