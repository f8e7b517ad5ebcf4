/*!
 * Dispatch Benchmarks
 *
 * Cost of one policy selection and of a full yield per policy
 */

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pm_core::hal::KernelRng;
use pm_core::process::ProcessTable;
use pm_core::{Kernel, KernelConfig, SchedulingPolicy};

const READY: usize = 48;

fn populated_table() -> ProcessTable {
    let mut table = ProcessTable::new(64);
    for i in 0..READY {
        table.spawn(0, -100 + (i as i32 * 3) % 140).unwrap();
    }
    table
}

fn bench_select(c: &mut Criterion) {
    let mut group = c.benchmark_group("select");
    let table = populated_table();
    let rng = KernelRng::new(7);

    for policy in SchedulingPolicy::ALL {
        group.bench_with_input(BenchmarkId::from_parameter(policy), &policy, |b, policy| {
            b.iter(|| black_box(policy.select(black_box(&table), 5, &rng)));
        });
    }
    group.finish();
}

fn bench_yield(c: &mut Criterion) {
    let mut group = c.benchmark_group("yield");

    for policy in SchedulingPolicy::ALL {
        let kernel = Kernel::new(KernelConfig::default().with_policy(policy)).unwrap();
        for i in 0..READY {
            kernel.spawn(-100 + (i as i32 * 3) % 140).unwrap();
        }

        group.bench_with_input(BenchmarkId::from_parameter(policy), &kernel, |b, kernel| {
            b.iter(|| black_box(kernel.yield_cpu()));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_select, bench_yield);
criterion_main!(benches);
