/*!
 * Scheduling Benchmarks
 * Cost of a scheduling decision per policy, and of full contended runs
 */

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use sched_sim::simulation::ProcessSpec;
use sched_sim::{Policy, Scheduler, SchedulerOps, SimConfig, Simulation, SimulationState, Workload};

fn bench_schedule(c: &mut Criterion) {
    let mut group = c.benchmark_group("schedule");

    for &len in &[16usize, 256] {
        group.throughput(Throughput::Elements(1));
        for policy in [Policy::RoundRobin, Policy::Srtf, Policy::Priority] {
            let scheduler = Scheduler::new(policy);
            let mut state = SimulationState::new(&SimConfig::default().with_policy(policy));
            for i in 0..len {
                let _ = state.spawn(u32::MAX, (i % 100) as u32);
            }

            group.bench_with_input(
                BenchmarkId::new(policy.as_str(), len),
                &len,
                |b, _| {
                    b.iter(|| black_box(scheduler.schedule(&mut state)));
                },
            );
        }
    }

    group.finish();
}

fn contended_workload(processes: usize) -> Workload {
    Workload::new(
        (0..processes)
            .map(|i| {
                ProcessSpec::new((i / 4) as u64, 8, (i * 7 % 100) as u32)
                    .with_demand(i % 3, 1, 4)
            })
            .collect(),
    )
}

fn bench_full_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_run");
    let workload = contended_workload(64);

    for policy in Policy::ALL {
        group.bench_function(policy.as_str(), |b| {
            b.iter(|| {
                let config = SimConfig::default()
                    .with_policy(policy)
                    .with_invariant_checks(false);
                Simulation::new(config, black_box(workload.clone()))
                    .and_then(Simulation::run)
                    .map(|report| report.ticks)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_schedule, bench_full_run);
criterion_main!(benches);
