/*!
 * Scheduler Simulator - Main Entry Point
 *
 * Boots the scheduling core from environment configuration and drives it
 * with simulated clock ticks:
 * - a few CPU-bound workers of different priority
 * - a producer/consumer pair on a semaphore
 * - a parent waiting on a short-lived child
 *
 * Final scheduler statistics and the process table are printed as JSON.
 */

use anyhow::{Context, Result};
use pm_core::hal::TickClock;
use pm_core::{
    init_tracing, Completion, CpuMode, Kernel, KernelConfig, Pid, SemKey, SchedulingPolicy,
};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

const SIM_TICKS: u64 = 2_000;
const SEM_KEY: SemKey = 0x5e4a;
const WORKER_PRIORITIES: [i32; 3] = [-40, 0, 40];

/// What each simulated process does when it holds the CPU
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Worker,
    Producer,
    Consumer,
    Parent,
    Child,
}

fn main() -> Result<()> {
    init_tracing();

    let config = KernelConfig::from_env().context("invalid PM_* environment")?;
    info!(
        policy = %config.policy,
        quantum = config.quantum,
        "Scheduler simulator starting"
    );

    let clock = Arc::new(TickClock::new());
    let kernel = Kernel::builder()
        .with_config(config)
        .with_clock(clock.clone())
        .build()
        .context("failed to build kernel")?;

    let mut roles: Vec<(Pid, Role)> = Vec::new();
    for priority in WORKER_PRIORITIES {
        roles.push((kernel.spawn(priority)?, Role::Worker));
    }
    roles.push((kernel.spawn(0)?, Role::Producer));
    roles.push((kernel.spawn(0)?, Role::Consumer));
    roles.push((kernel.spawn(0)?, Role::Parent));
    let sem = kernel.semget(SEM_KEY)?;

    let role_of = |roles: &[(Pid, Role)], pid: Pid| {
        roles.iter().find(|(p, _)| *p == pid).map(|(_, role)| *role)
    };

    let mut waiting = false;
    let mut spawned_child = false;
    for tick in 0..SIM_TICKS {
        clock.advance(1);
        let current = kernel.current();

        match role_of(&roles, current) {
            Some(Role::Producer) if tick % 7 == 0 => {
                let _ = kernel.semop(sem, 1)?;
            }
            Some(Role::Consumer) if tick % 5 == 0 => {
                if kernel.semop(sem, -1)?.is_blocked() {
                    continue;
                }
            }
            Some(Role::Parent) if !spawned_child => {
                let child = kernel.spawn(0)?;
                roles.push((child, Role::Child));
                kernel.alarm(100);
                spawned_child = true;
            }
            Some(Role::Parent) => {
                let outcome = if waiting {
                    kernel.wait_resume(None)
                } else {
                    kernel.wait(None)
                };
                match outcome {
                    Ok(Completion::Blocked) => {
                        waiting = true;
                        continue;
                    }
                    Ok(Completion::Ready(reaped)) => {
                        info!(child = reaped.pid, status = reaped.status, "Child reaped");
                        waiting = false;
                        kernel.exit(0)?;
                        continue;
                    }
                    Err(e) => {
                        info!(error = %e, "Wait ended without a child");
                        waiting = false;
                    }
                }
            }
            Some(Role::Child) if tick > 300 => {
                kernel.exit(42)?;
                continue;
            }
            _ => {}
        }

        let mode = if tick % 3 == 0 {
            CpuMode::Kernel
        } else {
            CpuMode::User
        };
        kernel.timer_tick(mode);
    }

    let report = json!({
        "policy": kernel.policy(),
        "ticks": SIM_TICKS,
        "stats": kernel.stats(),
        "processes": kernel.snapshot(),
        "semaphore": kernel.semaphore(sem),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    if kernel.policy() != SchedulingPolicy::RoundRobin {
        info!("Set PM_POLICY=round_robin for a deterministic run");
    }
    Ok(())
}
