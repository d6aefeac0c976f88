//! Benchmarks for window planning.
//!
//! Run with: cargo bench -p windrow-core

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use windrow_core::{MeasureModel, PrefixSums, WindowPlanner};

// ============================================================================
// Window planning
// ============================================================================

fn bench_plan_uniform(c: &mut Criterion) {
    let mut group = c.benchmark_group("window/plan_uniform");

    for count in [1_000usize, 100_000, 1_000_000] {
        let model = MeasureModel::new(20.0);
        let mut planner = WindowPlanner::new();
        let offset = count as f32 * 11.0;

        group.bench_with_input(BenchmarkId::from_parameter(count), &(), |b, _| {
            b.iter(|| {
                let window = planner.plan(offset, 600.0, count, &model, 2.0);
                black_box((window.first, window.origin, window.len()));
            })
        });
    }

    group.finish();
}

fn bench_plan_overrides(c: &mut Criterion) {
    let mut group = c.benchmark_group("window/plan_overrides");

    for count in [1_000usize, 100_000] {
        let mut model = MeasureModel::new(20.0);
        for index in (0..count).step_by(97) {
            model.set_override(index, 48.0);
        }
        let mut planner = WindowPlanner::new();
        let offset = model.aggregate(count, 2.0) / 2.0;

        // First plan pays for the prefix build; steady state reuses it.
        planner.plan(offset, 600.0, count, &model, 2.0);

        group.bench_with_input(BenchmarkId::new("steady", count), &(), |b, _| {
            b.iter(|| {
                let window = planner.plan(offset, 600.0, count, &model, 2.0);
                black_box((window.first, window.origin, window.len()));
            })
        });
    }

    group.finish();
}

fn bench_prefix_rebuild(c: &mut Criterion) {
    let mut group = c.benchmark_group("window/prefix_rebuild");

    for count in [1_000usize, 100_000] {
        let strides: Vec<f32> = (0..count).map(|i| (i % 37) as f32 + 2.0).collect();

        group.bench_with_input(BenchmarkId::from_parameter(count), &strides, |b, strides| {
            b.iter(|| {
                let sums = PrefixSums::from_values(strides);
                black_box(sums.total());
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_plan_uniform,
    bench_plan_overrides,
    bench_prefix_rebuild
);
criterion_main!(benches);
