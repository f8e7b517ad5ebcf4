/*!
 * Process Lifecycle
 * Creation, stop/resume, termination, signals and alarms
 */

use crate::core::errors::{PmError, PmResult};
use crate::core::limits::{IDLE, PRIO_MAX, PRIO_MIN};
use crate::core::types::{ExitStatus, Pid, Priority, Ticks};
use crate::kernel::{Kernel, KernelState};
use crate::process::ProcessState;
use crate::signals::Signal;
use crate::sync::ChainId;
use log::{debug, info, warn};

impl Kernel {
    /// Make a process READY and clear its aging counter
    ///
    /// A process blocked on a wait chain is taken off it.
    pub fn sched(&self, pid: Pid) -> PmResult<()> {
        let _irq = self.irq.mask();
        let mut st = self.state.lock();
        st.check_pid(pid)?;
        if let Some(chain) = st.chains.remove(pid) {
            debug!("Process {} scheduled off {}", pid, chain);
        }
        st.procs.sched(pid);
        Ok(())
    }

    /// Stop the calling process and give up the CPU
    ///
    /// The father gets SIGCHLD. Returns the process dispatched in its place.
    pub fn stop(&self) -> PmResult<Pid> {
        let _irq = self.irq.mask();
        let mut st = self.state.lock();

        let pid = st.current;
        if pid == IDLE {
            return Err(PmError::invalid("IDLE cannot be stopped"));
        }

        st.procs[pid].state = ProcessState::Stopped;
        let father = st.procs[pid].father;
        debug!("Process {} stopped", pid);
        self.deliver(&mut st, father, Signal::SIGCHLD);
        Ok(self.dispatch(&mut st))
    }

    /// Put a STOPPED process back on the ready set
    ///
    /// No effect on processes in any other state.
    pub fn resume(&self, pid: Pid) -> PmResult<()> {
        let _irq = self.irq.mask();
        let mut st = self.state.lock();
        st.check_pid(pid)?;

        if st.procs[pid].state == ProcessState::Stopped {
            if let Some(chain) = st.chains.remove(pid) {
                debug!("Process {} resumed off {}", pid, chain);
            }
            st.procs.sched(pid);
            self.stats.add_wakeups(1);
        }
        Ok(())
    }

    /// Create a READY child of the calling process
    pub fn spawn(&self, priority: Priority) -> PmResult<Pid> {
        if !(PRIO_MIN..=PRIO_MAX).contains(&priority) {
            return Err(PmError::invalid(format!(
                "priority {} outside {}..={}",
                priority, PRIO_MIN, PRIO_MAX
            )));
        }

        let _irq = self.irq.mask();
        let mut st = self.state.lock();
        let father = st.current;
        st.procs
            .spawn(father, priority)
            .ok_or_else(|| PmError::exhausted("process table full"))
    }

    /// Terminate the calling process with `status`
    ///
    /// Live children are handed to IDLE and terminated children are freed.
    /// A process whose father is IDLE is freed at once; otherwise it stays a
    /// zombie until its father reaps it. Returns the process dispatched in
    /// its place.
    pub fn exit(&self, status: ExitStatus) -> PmResult<Pid> {
        let _irq = self.irq.mask();
        let mut st = self.state.lock();

        let pid = st.current;
        if pid == IDLE {
            return Err(PmError::invalid("IDLE cannot exit"));
        }

        for child in st.procs.live_children(pid) {
            st.procs.reparent(child, IDLE);
        }
        let zombies: Vec<Pid> = st.procs.zombie_children(pid).collect();
        for child in zombies {
            self.bury(&mut st, child);
        }

        st.chains.remove(pid);
        let p = &mut st.procs[pid];
        p.state = ProcessState::Zombie;
        p.status = status;
        p.alarm = 0;
        let father = p.father;
        info!("Process {} exited with status {}", pid, status);

        if father == IDLE {
            self.bury(&mut st, pid);
        } else {
            self.deliver(&mut st, father, Signal::SIGCHLD);
        }
        Ok(self.dispatch(&mut st))
    }

    /// Send `signal` to a process
    ///
    /// A process parked in `wait` is woken so it can observe the signal.
    pub fn kill(&self, pid: Pid, signal: Signal) -> PmResult<()> {
        let _irq = self.irq.mask();
        let mut st = self.state.lock();
        st.check_pid(pid)?;
        self.deliver(&mut st, pid, signal);
        Ok(())
    }

    /// Arm an alarm `ticks` from now for the calling process, 0 disarms
    ///
    /// Returns the ticks that were left on the previous alarm.
    pub fn alarm(&self, ticks: Ticks) -> Ticks {
        let _irq = self.irq.mask();
        let mut st = self.state.lock();
        let now = self.hal.clock.now();

        let current = st.current;
        let p = &mut st.procs[current];
        let remaining = if p.alarm == 0 {
            0
        } else {
            p.alarm.saturating_sub(now)
        };
        p.alarm = if ticks == 0 { 0 } else { now.saturating_add(ticks) };
        remaining
    }

    /// Free a terminated process's slot along with its pending signals
    pub(crate) fn bury(&self, st: &mut KernelState, pid: Pid) {
        st.procs.bury(pid);
        self.hal.signals.clear(pid);
    }

    /// Mark `signal` pending and pull the target out of an interruptible wait
    pub(crate) fn deliver(&self, st: &mut KernelState, pid: Pid, signal: Signal) {
        if st.procs.valid(pid).is_none() {
            warn!("Dropping {} for missing process {}", signal, pid);
            return;
        }

        self.hal.signals.send(pid, signal);
        if st.chains.chain_of(pid) == Some(ChainId::ChildWait) {
            st.chains.remove(pid);
            st.procs.sched(pid);
            self.stats.add_wakeups(1);
            debug!("Process {} woken from wait by {}", pid, signal);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::core::limits::{IDLE, PRIO_USER};
    use crate::core::{KernelConfig, PmError};
    use crate::hal::TickClock;
    use crate::process::ProcessState;
    use crate::signals::{Signal, SignalQueue};
    use crate::Kernel;
    use std::sync::Arc;

    fn kernel() -> Kernel {
        Kernel::new(KernelConfig::deterministic()).unwrap()
    }

    #[test]
    fn test_spawn_rejects_out_of_range_priority() {
        let k = kernel();
        assert!(matches!(k.spawn(41), Err(PmError::InvalidArgument(_))));
        assert!(matches!(k.spawn(-101), Err(PmError::InvalidArgument(_))));
    }

    #[test]
    fn test_spawn_fails_when_table_full() {
        let k = Kernel::new(KernelConfig {
            proc_max: 3,
            ..KernelConfig::deterministic()
        })
        .unwrap();
        k.spawn(PRIO_USER).unwrap();
        k.spawn(PRIO_USER).unwrap();
        assert!(matches!(k.spawn(PRIO_USER), Err(PmError::ResourceExhausted(_))));
    }

    #[test]
    fn test_idle_cannot_stop_or_exit() {
        let k = kernel();
        assert!(matches!(k.stop(), Err(PmError::InvalidArgument(_))));
        assert!(matches!(k.exit(0), Err(PmError::InvalidArgument(_))));
    }

    #[test]
    fn test_resume_ignores_non_stopped() {
        let k = kernel();
        let pid = k.spawn(10).unwrap();
        k.yield_cpu();
        k.resume(pid).unwrap();
        assert_eq!(k.process(pid).unwrap().process.state, ProcessState::Running);
    }

    #[test]
    fn test_orphan_exit_frees_slot() {
        let k = kernel();
        let pid = k.spawn(PRIO_USER).unwrap();
        assert_eq!(k.yield_cpu(), pid);
        assert_eq!(k.exit(3).unwrap(), IDLE);
        assert!(k.process(pid).is_none());
        assert_eq!(k.process(IDLE).unwrap().process.nchildren, 0);
    }

    #[test]
    fn test_exit_hands_children_to_idle() {
        let k = kernel();
        let parent = k.spawn(PRIO_USER).unwrap();
        k.yield_cpu();
        let child = k.spawn(PRIO_USER).unwrap();
        k.exit(0).unwrap();

        let info = k.process(child).unwrap();
        assert_eq!(info.process.father, IDLE);
        assert!(k.process(parent).is_none());
        assert_eq!(k.process(IDLE).unwrap().process.nchildren, 1);
    }

    #[test]
    fn test_kill_marks_signal_pending() {
        let signals = Arc::new(SignalQueue::new());
        let k = Kernel::builder()
            .with_config(KernelConfig::deterministic())
            .with_signals(signals.clone())
            .build()
            .unwrap();
        let pid = k.spawn(PRIO_USER).unwrap();
        k.kill(pid, Signal::SIGUSR1).unwrap();
        assert!(signals.is_pending(pid, Signal::SIGUSR1));
        assert!(k.kill(40, Signal::SIGUSR1).is_err());
    }

    #[test]
    fn test_alarm_returns_remaining_ticks() {
        let clock = Arc::new(TickClock::new());
        let k = Kernel::builder()
            .with_config(KernelConfig::deterministic())
            .with_clock(clock.clone())
            .build()
            .unwrap();
        k.spawn(PRIO_USER).unwrap();
        k.yield_cpu();

        assert_eq!(k.alarm(10), 0);
        clock.advance(4);
        assert_eq!(k.alarm(0), 6);
        assert_eq!(k.alarm(5), 0);
    }

    #[test]
    fn test_alarm_far_in_the_future_saturates() {
        let clock = Arc::new(TickClock::new());
        let k = Kernel::builder()
            .with_config(KernelConfig::deterministic())
            .with_clock(clock.clone())
            .build()
            .unwrap();
        k.spawn(PRIO_USER).unwrap();
        k.yield_cpu();
        clock.advance(10);

        assert_eq!(k.alarm(u64::MAX), 0);
        assert_eq!(k.alarm(0), u64::MAX - 10);
    }

    #[test]
    fn test_reused_slot_starts_without_stale_signals() {
        let signals = Arc::new(SignalQueue::new());
        let k = Kernel::builder()
            .with_config(KernelConfig::deterministic())
            .with_signals(signals.clone())
            .build()
            .unwrap();
        let pid = k.spawn(PRIO_USER).unwrap();
        k.kill(pid, Signal::SIGUSR1).unwrap();
        assert_eq!(k.yield_cpu(), pid);
        k.exit(0).unwrap();

        assert_eq!(k.spawn(PRIO_USER).unwrap(), pid);
        assert!(!signals.is_pending(pid, Signal::SIGUSR1));
    }
}
