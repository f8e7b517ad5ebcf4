/*!
 * Policy Implementations
 *
 * Each policy scans the table once in slot order and returns a [`Selection`].
 * Nothing here mutates the table; aging is handed back to the dispatcher.
 */

use super::policy::Selection;
use crate::core::limits::{
    FIRST_PROC, IDLE, LOTTERY_BASE, LOTTERY_MAX_TICKETS, LOTTERY_MIN_TICKETS, LOTTERY_STEP,
};
use crate::core::types::{Pid, Priority};
use crate::hal::RandomSource;
use crate::process::{Process, ProcessTable};

/// Next READY slot strictly after `current`, wrapping round but never back to `current`
pub fn round_robin(table: &ProcessTable, current: Pid) -> Selection {
    let after = (current + 1)..table.capacity();
    let before = FIRST_PROC..current.min(table.capacity());

    let next = after
        .chain(before)
        .find(|&pid| table[pid].is_ready())
        .unwrap_or(IDLE);

    Selection::new(next, Vec::new())
}

/// Uniform draw among READY processes; every READY process ages
pub fn random(table: &ProcessTable, rng: &dyn RandomSource) -> Selection {
    let aged: Vec<Pid> = table.ready().map(|(pid, _)| pid).collect();
    if aged.is_empty() {
        return Selection::new(IDLE, aged);
    }

    let draw = rng.next_u32() as usize % aged.len();
    Selection::new(aged[draw], aged)
}

/// Lottery tickets held by a process of the given priority
#[inline]
pub fn weight(priority: Priority) -> u32 {
    let tickets = LOTTERY_BASE.saturating_sub(priority) / LOTTERY_STEP;
    tickets.clamp(LOTTERY_MIN_TICKETS as Priority, LOTTERY_MAX_TICKETS as Priority) as u32
}

/// Priority-weighted ticket draw; every READY process ages
pub fn lottery(table: &ProcessTable, rng: &dyn RandomSource) -> Selection {
    let mut aged = Vec::new();
    let mut tickets: u32 = 0;
    for (pid, p) in table.ready() {
        tickets += weight(p.priority);
        aged.push(pid);
    }

    if tickets == 0 {
        return Selection::new(IDLE, aged);
    }

    let draw = rng.next_u32() % tickets + 1;
    let mut sum = 0;
    let next = aged
        .iter()
        .copied()
        .find(|&pid| {
            sum += weight(table[pid].priority);
            sum >= draw
        })
        .unwrap_or(IDLE);

    Selection::new(next, aged)
}

/// Most urgent priority wins, least CPU time breaks ties
pub fn priority(table: &ProcessTable) -> Selection {
    displacing_scan(table, |p, best| {
        p.priority < best.priority
            || (p.priority == best.priority && p.cpu_time() <= best.cpu_time())
    })
}

/// Process with the strictly highest aging counter wins
pub fn aging(table: &ProcessTable) -> Selection {
    displacing_scan(table, |p, best| p.counter > best.counter)
}

/// Candidate scan shared by `priority` and `aging`
///
/// The candidate that gets displaced ages at that moment; a process that
/// fails to displace ages on the spot. The first READY process becomes the
/// candidate for free, so every loser ages exactly once and IDLE never does.
fn displacing_scan<F>(table: &ProcessTable, displaces: F) -> Selection
where
    F: Fn(&Process, &Process) -> bool,
{
    let mut best: Option<Pid> = None;
    let mut aged = Vec::new();

    for (pid, p) in table.ready() {
        match best {
            None => best = Some(pid),
            Some(candidate) if displaces(p, &table[candidate]) => {
                aged.push(candidate);
                best = Some(pid);
            }
            Some(_) => aged.push(pid),
        }
    }

    Selection::new(best.unwrap_or(IDLE), aged)
}
