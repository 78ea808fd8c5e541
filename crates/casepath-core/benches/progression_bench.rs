//! # Progression Benchmarks
//!
//! Performance benchmarks for casepath-core journey evaluation.
//!
//! Run with: `cargo bench -p casepath-core`

use casepath_core::{
    JourneyEvaluator, SkillCategory, SkillScore, Stage, StageResult, compute_overall_progress,
    compute_skill_practice_targets,
};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

/// A ledger of `size` results cycling through every stage, passing every other one.
fn create_ledger(size: usize) -> Vec<StageResult> {
    (0..size)
        .map(|i| {
            let stage = Stage::ALL[i % Stage::ALL.len()];
            let skills = SkillCategory::ALL
                .iter()
                .enumerate()
                .map(|(j, category)| SkillScore {
                    category: *category,
                    score: ((i * 7 + j * 13) % 101) as u8,
                })
                .collect();
            StageResult::new(stage, i % 2 == 0, skills, "").expect("result")
        })
        .collect()
}

// =============================================================================
// BENCHMARKS
// =============================================================================

fn bench_overview(c: &mut Criterion) {
    let mut group = c.benchmark_group("journey_overview");
    let evaluator = JourneyEvaluator::default();

    for size in [10, 100, 1000].iter() {
        let ledger = create_ledger(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &ledger, |b, ledger| {
            b.iter(|| black_box(evaluator.overview(ledger, Some(Stage::Case2))));
        });
    }

    group.finish();
}

fn bench_overall_progress(c: &mut Criterion) {
    let mut group = c.benchmark_group("overall_progress");

    for size in [10, 100, 1000].iter() {
        let ledger = create_ledger(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &ledger, |b, ledger| {
            b.iter(|| black_box(compute_overall_progress(ledger, Stage::ALL.len())));
        });
    }

    group.finish();
}

fn bench_practice_targets(c: &mut Criterion) {
    let ledger = create_ledger(1);
    c.bench_function("practice_targets", |b| {
        b.iter(|| black_box(compute_skill_practice_targets(&ledger[0], 3)));
    });
}

criterion_group!(
    benches,
    bench_overview,
    bench_overall_progress,
    bench_practice_targets
);
criterion_main!(benches);
