/*!
 * Process Table
 * Fixed-capacity arena of process descriptors indexed by slot
 */

use super::types::{Process, ProcessState};
use crate::core::limits::{FIRST_PROC, IDLE};
use crate::core::types::{Pid, Priority};
use log::debug;
use std::ops::{Index, IndexMut};

/// Process table
///
/// Slot [`IDLE`] is always valid; ordinary processes live in
/// `FIRST_PROC..capacity`. Every scan walks slots in ascending order.
#[derive(Debug, Clone)]
pub struct ProcessTable {
    slots: Vec<Process>,
}

impl ProcessTable {
    /// Create a table with `capacity` slots, IDLE running in slot 0
    ///
    /// # Panics
    /// If `capacity` leaves no room for a process besides IDLE.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > FIRST_PROC, "process table needs room beyond IDLE");
        let mut slots = vec![Process::default(); capacity];
        slots[IDLE].state = ProcessState::Running;
        Self { slots }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn get(&self, pid: Pid) -> Option<&Process> {
        self.slots.get(pid)
    }

    pub fn get_mut(&mut self, pid: Pid) -> Option<&mut Process> {
        self.slots.get_mut(pid)
    }

    /// The slot if it holds a process
    pub fn valid(&self, pid: Pid) -> Option<&Process> {
        self.get(pid).filter(|p| p.is_valid())
    }

    /// Ordinary process slots in table order (IDLE excluded)
    pub fn iter(&self) -> impl Iterator<Item = (Pid, &Process)> + '_ {
        self.slots.iter().enumerate().skip(FIRST_PROC)
    }

    /// READY processes in table order (IDLE excluded)
    pub fn ready(&self) -> impl Iterator<Item = (Pid, &Process)> + '_ {
        self.iter().filter(|(_, p)| p.is_ready())
    }

    pub fn ready_count(&self) -> usize {
        self.ready().count()
    }

    /// Children of `father` that have terminated, in table order
    pub fn zombie_children(&self, father: Pid) -> impl Iterator<Item = Pid> + '_ {
        self.iter()
            .filter(move |(_, p)| p.state == ProcessState::Zombie && p.father == father)
            .map(|(pid, _)| pid)
    }

    /// Live (non-zombie) children of `father`
    pub fn live_children(&self, father: Pid) -> Vec<Pid> {
        self.iter()
            .filter(|(_, p)| p.is_valid() && p.state != ProcessState::Zombie && p.father == father)
            .map(|(pid, _)| pid)
            .collect()
    }

    /// Canonical entry into READY: state READY, aging counter cleared
    pub fn sched(&mut self, pid: Pid) {
        let p = &mut self.slots[pid];
        p.state = ProcessState::Ready;
        p.counter = 0;
    }

    /// Place a new READY child of `father` in the lowest free slot
    ///
    /// Returns `None` when the table is full.
    pub fn spawn(&mut self, father: Pid, priority: Priority) -> Option<Pid> {
        let pid = self.iter().find(|(_, p)| !p.is_valid()).map(|(pid, _)| pid)?;

        self.slots[pid] = Process {
            priority,
            father,
            ..Process::default()
        };
        self.sched(pid);
        self.slots[father].nchildren += 1;

        debug!("Process {} created (father: {}, priority: {})", pid, father, priority);
        Some(pid)
    }

    /// Free a slot and drop it from its father's child count
    pub fn bury(&mut self, pid: Pid) {
        debug_assert_ne!(pid, IDLE, "IDLE cannot be buried");
        let father = self.slots[pid].father;
        self.slots[pid] = Process::default();

        let parent = &mut self.slots[father];
        parent.nchildren = parent.nchildren.saturating_sub(1);
        debug!("Process {} buried (father: {})", pid, father);
    }

    /// Move a child under a new father, keeping both child counts right
    pub fn reparent(&mut self, pid: Pid, father: Pid) {
        let old = self.slots[pid].father;
        self.slots[old].nchildren = self.slots[old].nchildren.saturating_sub(1);
        self.slots[pid].father = father;
        self.slots[father].nchildren += 1;
    }

    /// Number of processes in RUNNING state, IDLE included
    pub fn running_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|p| p.state == ProcessState::Running)
            .count()
    }
}

impl Index<Pid> for ProcessTable {
    type Output = Process;

    fn index(&self, pid: Pid) -> &Process {
        &self.slots[pid]
    }
}

impl IndexMut<Pid> for ProcessTable {
    fn index_mut(&mut self, pid: Pid) -> &mut Process {
        &mut self.slots[pid]
    }
}
