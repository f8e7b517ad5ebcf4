/*!
 * Invariant Tests
 * Property-based checks over random operation sequences
 */

use pm_core::{ChainId, CpuMode, Kernel, KernelConfig, ProcessState, SchedulingPolicy, Signal};
use proptest::prelude::*;

const IDLE: usize = 0;

#[derive(Debug, Clone)]
enum Op {
    Spawn(i32),
    Yield,
    Tick(bool),
    Stop,
    Resume(usize),
    Sleep(u32, i32),
    Wakeup(u32),
    SemUp,
    SemDown,
    Exit(i32),
    Wait,
    Kill(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (-100i32..=40).prop_map(Op::Spawn),
        Just(Op::Yield),
        any::<bool>().prop_map(Op::Tick),
        Just(Op::Stop),
        (0usize..12).prop_map(Op::Resume),
        ((0u32..3), (-100i32..=40)).prop_map(|(c, p)| Op::Sleep(c, p)),
        (0u32..3).prop_map(Op::Wakeup),
        Just(Op::SemUp),
        Just(Op::SemDown),
        (0i32..4).prop_map(Op::Exit),
        Just(Op::Wait),
        (0usize..12).prop_map(Op::Kill),
    ]
}

fn policy_strategy() -> impl Strategy<Value = SchedulingPolicy> {
    prop::sample::select(SchedulingPolicy::ALL.to_vec())
}

fn apply(k: &Kernel, sem: usize, op: &Op) {
    let idle = k.current() == IDLE;
    match *op {
        Op::Spawn(priority) => {
            let _ = k.spawn(priority);
        }
        Op::Yield => {
            k.yield_cpu();
        }
        Op::Tick(user) => {
            k.timer_tick(if user { CpuMode::User } else { CpuMode::Kernel });
        }
        Op::Stop => {
            let _ = k.stop();
        }
        Op::Resume(pid) => {
            let _ = k.resume(pid);
        }
        Op::Sleep(chain, priority) if !idle => {
            k.sleep(ChainId::Named(chain), priority);
        }
        Op::Wakeup(chain) => {
            k.wakeup(ChainId::Named(chain));
        }
        Op::SemUp => {
            let _ = k.semop(sem, 1);
        }
        Op::SemDown => {
            let _ = k.semop(sem, -1);
        }
        Op::Exit(status) => {
            let _ = k.exit(status);
        }
        Op::Wait => {
            let _ = k.wait(None);
        }
        Op::Kill(pid) => {
            let _ = k.kill(pid, Signal::SIGUSR1);
        }
        Op::Sleep(..) => {}
    }
}

/// Exactly one RUNNING process, and it is the one holding the CPU
fn assert_single_running(k: &Kernel) -> Result<(), TestCaseError> {
    let running: Vec<usize> = k
        .snapshot()
        .iter()
        .filter(|info| info.process.state == ProcessState::Running)
        .map(|info| info.pid)
        .collect();
    prop_assert_eq!(running, vec![k.current()]);
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_single_running_after_every_op(
        policy in policy_strategy(),
        seed in any::<u64>(),
        ops in prop::collection::vec(op_strategy(), 1..80),
    ) {
        let config = KernelConfig {
            policy,
            rng_seed: seed,
            quantum: 3,
            ..KernelConfig::deterministic()
        };
        let k = Kernel::new(config).unwrap();
        let sem = k.semget(1).unwrap();

        for op in &ops {
            apply(&k, sem, op);
            assert_single_running(&k)?;

            for info in k.snapshot() {
                if info.waiting_on.is_some() {
                    prop_assert_eq!(info.process.state, ProcessState::Stopped);
                }
                prop_assert!(info.pid == IDLE || info.process.counter <= 3 + ops.len() as u32);
            }
        }
    }

    #[test]
    fn prop_sched_makes_ready_with_zero_counter(
        policy in policy_strategy(),
        ops in prop::collection::vec(op_strategy(), 0..40),
        pick in any::<prop::sample::Index>(),
    ) {
        let k = Kernel::new(KernelConfig::deterministic().with_policy(policy)).unwrap();
        let sem = k.semget(1).unwrap();
        for op in &ops {
            apply(&k, sem, op);
        }

        let pids: Vec<usize> = k.snapshot().iter().map(|info| info.pid).collect();
        let pid = pids[pick.index(pids.len())];
        k.sched(pid).unwrap();

        let p = k.process(pid).unwrap().process;
        prop_assert_eq!(p.state, ProcessState::Ready);
        prop_assert_eq!(p.counter, 0);
    }
}
