/*!
 * Pending Signal Queue
 * Per-process pending bitmask implementing the signal port
 */

use super::types::Signal;
use crate::core::types::Pid;
use crate::hal::SignalPort;
use ahash::AHashMap;
use log::debug;
use parking_lot::Mutex;

/// Pending signals, one bit per signal number
#[derive(Debug, Default)]
pub struct SignalQueue {
    pending: Mutex<AHashMap<Pid, u64>>,
}

impl SignalQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `signal` is pending for `pid`, without dequeuing it
    pub fn is_pending(&self, pid: Pid, signal: Signal) -> bool {
        self.pending
            .lock()
            .get(&pid)
            .is_some_and(|mask| mask & (1 << signal.number()) != 0)
    }
}

impl SignalPort for SignalQueue {
    fn send(&self, pid: Pid, signal: Signal) {
        debug!("Signal {} pending for process {}", signal, pid);
        *self.pending.lock().entry(pid).or_insert(0) |= 1 << signal.number();
    }

    fn pending(&self, pid: Pid) -> Option<Signal> {
        let mut pending = self.pending.lock();
        let mask = pending.get_mut(&pid)?;

        while *mask != 0 {
            let bit = mask.trailing_zeros();
            *mask &= !(1 << bit);
            if let Ok(signal) = Signal::from_number(bit) {
                return Some(signal);
            }
        }
        None
    }

    fn clear(&self, pid: Pid) {
        self.pending.lock().remove(&pid);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_dequeues_lowest_first() {
        let queue = SignalQueue::new();
        queue.send(3, Signal::SIGCHLD);
        queue.send(3, Signal::SIGALRM);

        assert!(queue.is_pending(3, Signal::SIGCHLD));
        assert_eq!(queue.pending(3), Some(Signal::SIGALRM));
        assert_eq!(queue.pending(3), Some(Signal::SIGCHLD));
        assert_eq!(queue.pending(3), None);
        assert_eq!(queue.pending(4), None);
    }

    #[test]
    fn test_clear_drops_all_pending() {
        let queue = SignalQueue::new();
        queue.send(2, Signal::SIGUSR1);
        queue.send(2, Signal::SIGCHLD);
        queue.clear(2);
        assert!(!queue.is_pending(2, Signal::SIGCHLD));
        assert_eq!(queue.pending(2), None);
    }

    #[test]
    fn test_duplicate_sends_collapse() {
        let queue = SignalQueue::new();
        queue.send(1, Signal::SIGCHLD);
        queue.send(1, Signal::SIGCHLD);
        assert_eq!(queue.pending(1), Some(Signal::SIGCHLD));
        assert_eq!(queue.pending(1), None);
    }
}
