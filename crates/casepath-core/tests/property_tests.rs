//! # Property-Based Tests
//!
//! Invariants of the progression engine checked with proptest.

use casepath_core::{
    JourneyEvaluator, PreparationArea, PreparationProgress, SkillCategory, SkillScore, Stage,
    StageCatalog, StageResult, StageStatus, compute_overall_progress,
    compute_skill_practice_targets, compute_stage_status,
};
use proptest::collection::vec;
use proptest::prelude::*;

// =============================================================================
// STRATEGIES
// =============================================================================

fn stage() -> impl Strategy<Value = Stage> {
    (0usize..Stage::ALL.len()).prop_map(|i| Stage::ALL[i])
}

fn outcome() -> impl Strategy<Value = StageResult> {
    (stage(), any::<bool>()).prop_map(|(stage, passed)| StageResult::outcome(stage, passed))
}

/// A result scoring a random subset of categories.
fn scored_result() -> impl Strategy<Value = StageResult> {
    (
        stage(),
        any::<bool>(),
        vec(proptest::option::of(0u8..=100), SkillCategory::ALL.len()),
    )
        .prop_map(|(stage, passed, scores)| {
            let skills = SkillCategory::ALL
                .iter()
                .zip(scores)
                .filter_map(|(category, score)| score.map(|s| SkillScore {
                    category: *category,
                    score: s,
                }))
                .collect();
            StageResult::new(stage, passed, skills, "").expect("valid result")
        })
}

fn area() -> impl Strategy<Value = PreparationArea> {
    (0usize..PreparationArea::ALL.len()).prop_map(|i| PreparationArea::ALL[i])
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// Every stage gets exactly one status, and Completed matches a passing result.
    #[test]
    fn status_is_completed_iff_passed(
        results in vec(outcome(), 0..20),
        current in proptest::option::of(stage()),
    ) {
        let catalog = StageCatalog::standard();
        for stage in Stage::ALL {
            let status = compute_stage_status(&catalog, stage, &results, current);
            let passed = results.iter().any(|r| r.stage() == stage && r.passed());
            prop_assert_eq!(status == StageStatus::Completed, passed);
            if !passed && current == Some(stage) {
                prop_assert_eq!(status, StageStatus::Current);
            }
        }
    }

    /// The first catalog stage is never Locked.
    #[test]
    fn first_stage_never_locked(
        results in vec(outcome(), 0..20),
        current in proptest::option::of(stage()),
    ) {
        let catalog = StageCatalog::standard();
        let first = Stage::PersonalExperience;
        prop_assert_ne!(
            compute_stage_status(&catalog, first, &results, current),
            StageStatus::Locked
        );
    }

    /// Insertion order of the ledger never changes a status.
    #[test]
    fn status_ignores_ledger_order(
        results in vec(outcome(), 0..20),
        current in proptest::option::of(stage()),
    ) {
        let evaluator = JourneyEvaluator::default();
        let mut reversed = results.clone();
        reversed.reverse();
        prop_assert_eq!(
            evaluator.statuses(&results, current),
            evaluator.statuses(&reversed, current)
        );
    }

    /// Appending results never lowers overall progress, and it stays in range.
    #[test]
    fn progress_is_monotonic_and_bounded(
        results in vec(outcome(), 0..30),
        catalog_size in 0usize..8,
    ) {
        let mut previous = 0u8;
        for end in 0..=results.len() {
            let percent = compute_overall_progress(&results[..end], catalog_size);
            prop_assert!(percent <= 100);
            prop_assert!(percent >= previous);
            previous = percent;
        }
    }

    /// Recording the same passing result twice changes nothing.
    #[test]
    fn repeated_pass_is_idempotent(
        results in vec(outcome(), 0..20),
        stage in stage(),
        current in proptest::option::of(stage()),
    ) {
        let evaluator = JourneyEvaluator::default();
        let mut once = results.clone();
        once.push(StageResult::outcome(stage, true));
        let mut twice = once.clone();
        twice.push(StageResult::outcome(stage, true));

        prop_assert_eq!(evaluator.statuses(&once, current), evaluator.statuses(&twice, current));
        prop_assert_eq!(evaluator.progress(&once), evaluator.progress(&twice));
    }

    /// Practice targets: min(k, n) entries, ascending, ties in declaration order.
    #[test]
    fn practice_targets_are_sorted(result in scored_result(), k in 0usize..8) {
        let before = result.clone();
        let targets = compute_skill_practice_targets(&result, k);

        prop_assert_eq!(targets.len(), k.min(result.skills().len()));
        prop_assert_eq!(&result, &before);

        for pair in targets.windows(2) {
            let a = (result.score_for(pair[0]), pair[0].ordinal());
            let b = (result.score_for(pair[1]), pair[1].ordinal());
            prop_assert!(a < b);
        }

        // Nothing left out scores lower than the last target.
        if let Some(last) = targets.last() {
            let last_score = result.score_for(*last).unwrap_or(0);
            for skill in result.skills() {
                if !targets.contains(&skill.category) {
                    prop_assert!(skill.score >= last_score);
                }
            }
        }
    }

    /// Preparation areas stay capped no matter how much practice is logged.
    #[test]
    fn preparation_is_capped(steps in vec((area(), 0u8..=100), 0..40)) {
        let mut progress = PreparationProgress::new();
        for (area, increment) in steps {
            progress.advance(area, increment);
            prop_assert!(progress.area_percent(area) <= 100);
        }
        prop_assert!(progress.overall_percent() <= 100);
    }
}
