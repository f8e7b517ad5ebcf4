/*!
 * Dispatcher
 * Rescheduling point: re-admit the caller, fire alarms, pick and commit
 */

use crate::core::limits::{IDLE, PRIO_USER};
use crate::core::types::{CpuMode, Pid};
use crate::kernel::{Kernel, KernelState};
use crate::process::ProcessState;
use crate::signals::Signal;
use log::{debug, trace};

impl Kernel {
    /// Give up the CPU and run whatever the active policy picks
    ///
    /// Returns the process now holding the CPU, which may be the caller.
    pub fn yield_cpu(&self) -> Pid {
        let _irq = self.irq.mask();
        let mut st = self.state.lock();
        self.dispatch(&mut st)
    }

    /// Clock interrupt: charge the tick and preempt on quantum expiry
    ///
    /// Returns the newly dispatched process when the tick caused a dispatch.
    pub fn timer_tick(&self, mode: CpuMode) -> Option<Pid> {
        let _irq = self.irq.mask();
        let mut st = self.state.lock();

        let current = st.current;
        let p = &mut st.procs[current];
        match mode {
            CpuMode::User => p.utime += 1,
            CpuMode::Kernel => p.ktime += 1,
        }
        p.counter = p.counter.saturating_sub(1);

        if current == IDLE || p.counter == 0 {
            self.stats.inc_preemptions();
            Some(self.dispatch(&mut st))
        } else {
            None
        }
    }

    /// One dispatch pass over locked state
    ///
    /// # Panics
    /// If IDLE is not valid or the policy returns a process that is not
    /// READY; both mean the table is corrupt.
    pub(crate) fn dispatch(&self, st: &mut KernelState) -> Pid {
        let outgoing = st.current;
        if st.procs[outgoing].state == ProcessState::Running {
            st.procs.sched(outgoing);
        }
        st.last = outgoing;

        self.expire_alarms(st);

        let selection = st
            .policy
            .select(&st.procs, outgoing, self.hal.rng.as_ref());
        for pid in selection.aged.into_iter().filter(|&pid| pid != IDLE) {
            let p = &mut st.procs[pid];
            p.counter = p.counter.saturating_add(1);
        }

        let next = selection.next;
        assert!(st.procs[IDLE].is_valid(), "IDLE process slot is not valid");
        assert!(
            next == IDLE || st.procs[next].is_ready(),
            "policy {} selected process {} in state {:?}",
            st.policy,
            next,
            st.procs[next].state
        );

        let quantum = st.quantum;
        let p = &mut st.procs[next];
        p.priority = PRIO_USER;
        p.state = ProcessState::Running;
        p.counter = quantum;
        st.current = next;
        debug_assert_eq!(st.procs.running_count(), 1, "more than one RUNNING process");
        self.stats.inc_dispatches();

        if next != outgoing {
            trace!("Dispatch {} -> {} ({})", outgoing, next, st.policy);
            self.stats.inc_context_switches();
            self.hal.switcher.switch_to(outgoing, next);
        }
        next
    }

    /// Raise SIGALRM for every armed alarm whose deadline has passed
    fn expire_alarms(&self, st: &mut KernelState) {
        let now = self.hal.clock.now();
        let expired: Vec<Pid> = st
            .procs
            .iter()
            .filter(|(_, p)| p.is_valid() && p.alarm != 0 && p.alarm < now)
            .map(|(pid, _)| pid)
            .collect();

        for pid in expired {
            debug!("Alarm of process {} expired at tick {}", pid, now);
            st.procs[pid].alarm = 0;
            self.stats.inc_alarms();
            self.deliver(st, pid, Signal::SIGALRM);
        }
    }
}
