/*!
 * Semaphore Tests
 * Blocking down, waking up and removal through the kernel
 */

use pm_core::core::limits::{GETVAL, IPC_RMID, SETVAL};
use pm_core::{ChainId, Completion, Kernel, KernelConfig, PmError, ProcessState};
use pretty_assertions::assert_eq;

fn kernel() -> Kernel {
    Kernel::new(KernelConfig::deterministic()).unwrap()
}

#[test]
fn test_down_blocks_and_up_wakes_caller() {
    let k = kernel();
    let a = k.spawn(10).unwrap();
    let b = k.spawn(0).unwrap();
    let sem = k.semget(0xabc).unwrap();
    assert_eq!(k.yield_cpu(), a);

    assert_eq!(k.semop(sem, -1).unwrap(), Completion::Blocked);
    assert_eq!(k.current(), b);
    assert_eq!(k.semctl(sem, GETVAL, 0).unwrap(), -1);

    let info = k.process(a).unwrap();
    assert_eq!(info.process.state, ProcessState::Stopped);
    assert_eq!(info.process.priority, 40);
    assert_eq!(info.waiting_on, Some(ChainId::Semaphore(sem)));
    assert_eq!(k.waiters(ChainId::Semaphore(sem)), vec![a]);

    assert_eq!(k.semop(sem, 1).unwrap(), Completion::Ready(()));
    assert_eq!(k.semctl(sem, GETVAL, 0).unwrap(), 0);
    assert_eq!(k.process(a).unwrap().process.state, ProcessState::Ready);
    assert_eq!(k.process(b).unwrap().process.state, ProcessState::Running);
    assert!(k.waiters(ChainId::Semaphore(sem)).is_empty());
    assert_eq!(k.stats().wakeups, 1);
}

#[test]
fn test_down_with_units_available_does_not_block() {
    let k = kernel();
    let a = k.spawn(0).unwrap();
    let sem = k.semget(1).unwrap();
    k.semctl(sem, SETVAL, 2).unwrap();
    k.yield_cpu();

    assert_eq!(k.semop(sem, -1).unwrap(), Completion::Ready(()));
    assert_eq!(k.semop(sem, -1).unwrap(), Completion::Ready(()));
    assert_eq!(k.current(), a);
    assert_eq!(k.semctl(sem, GETVAL, 0).unwrap(), 0);
}

#[test]
fn test_up_wakes_every_waiter() {
    let k = kernel();
    let pids: Vec<_> = (0..3).map(|_| k.spawn(0).unwrap()).collect();
    let sem = k.semget(9).unwrap();
    k.yield_cpu();

    assert!(k.semop(sem, -1).unwrap().is_blocked());
    assert!(k.semop(sem, -1).unwrap().is_blocked());
    assert_eq!(k.current(), pids[2]);
    assert_eq!(k.semctl(sem, GETVAL, 0).unwrap(), -2);

    k.semop(sem, 1).unwrap();
    assert_eq!(k.semctl(sem, GETVAL, 0).unwrap(), -1);
    for pid in &pids[..2] {
        assert_eq!(k.process(*pid).unwrap().process.state, ProcessState::Ready);
    }
}

#[test]
fn test_remove_busy_until_waiters_leave() {
    let k = kernel();
    let a = k.spawn(0).unwrap();
    k.spawn(0).unwrap();
    let sem = k.semget(77).unwrap();
    k.yield_cpu();
    assert_eq!(k.current(), a);

    k.semop(sem, -1).unwrap();
    assert_eq!(k.semctl(sem, IPC_RMID, 0), Err(PmError::Busy(sem)));
    assert_eq!(PmError::Busy(sem).errno(), -16);

    k.semop(sem, 1).unwrap();
    assert_eq!(k.semctl(sem, IPC_RMID, 0).unwrap(), 0);
    assert!(k.semaphore(sem).is_none());
    assert!(matches!(k.semop(sem, 1), Err(PmError::InvalidArgument(_))));
}

#[test]
fn test_removed_entry_is_reused() {
    let k = kernel();
    let first = k.semget(1).unwrap();
    k.semctl(first, IPC_RMID, 0).unwrap();
    assert_eq!(k.semget(2).unwrap(), first);
    assert_eq!(k.semaphore(first).unwrap().key, 2);
}
