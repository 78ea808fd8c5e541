//! # Progression Evaluator
//!
//! Pure functions from (catalog, results, current-stage pointer) to stage
//! statuses and completion figures.
//!
//! ## Status precedence
//!
//! | Status | Condition |
//! |--------|-----------|
//! | Completed | a passing result exists for the stage |
//! | Current | the stage is the caller's current pointer |
//! | Unlocked | first catalog stage, or the predecessor is Completed |
//! | Locked | none of the above |
//!
//! Nothing here is stored. Every call recomputes from its inputs, so two calls
//! with the same inputs always agree. Callers rendering several views should
//! evaluate them against one snapshot of the results.

use crate::catalog::{StageCatalog, status_description, status_hint};
use crate::primitives::COMPLETED_STAGE_RECOMMENDATIONS;
use crate::{SkillCategory, SkillScore, Stage, StageResult, StageStatus};
use serde::Serialize;
use std::collections::BTreeSet;

// =============================================================================
// EVALUATOR FUNCTIONS
// =============================================================================

/// Whether any passing result exists for `stage`.
#[must_use]
pub fn is_stage_passed(results: &[StageResult], stage: Stage) -> bool {
    results.iter().any(|r| r.stage() == stage && r.passed())
}

/// Derive the status of one stage.
///
/// A stage outside `catalog` has no predecessor chain, so it can only be
/// Completed, Current or Locked.
#[must_use]
pub fn compute_stage_status(
    catalog: &StageCatalog,
    stage: Stage,
    results: &[StageResult],
    current: Option<Stage>,
) -> StageStatus {
    if is_stage_passed(results, stage) {
        return StageStatus::Completed;
    }
    if current == Some(stage) {
        return StageStatus::Current;
    }

    let is_first = catalog.first() == Some(stage);
    let predecessor_passed = catalog
        .predecessor(stage)
        .is_some_and(|prev| is_stage_passed(results, prev));

    if is_first || predecessor_passed {
        StageStatus::Unlocked
    } else {
        StageStatus::Locked
    }
}

/// Completion percentage, 0..=100, rounded down.
///
/// Each stage counts once no matter how many passing attempts it has.
#[must_use]
pub fn compute_overall_progress(results: &[StageResult], catalog_size: usize) -> u8 {
    if catalog_size == 0 {
        return 0;
    }
    let passed = results
        .iter()
        .filter(|r| r.passed())
        .map(StageResult::stage)
        .collect::<BTreeSet<_>>()
        .len()
        .min(catalog_size);

    ((passed as u64).saturating_mul(100) / (catalog_size as u64)) as u8
}

/// The `k` weakest skills of a result, weakest first.
///
/// Ties keep `SkillCategory` declaration order. Returns `min(k, skills)`
/// entries and leaves `result` untouched.
#[must_use]
pub fn compute_skill_practice_targets(result: &StageResult, k: usize) -> Vec<SkillCategory> {
    let mut ranked: Vec<SkillScore> = result.skills().to_vec();
    ranked.sort_by_key(|s| (s.score, s.category.ordinal()));
    ranked.into_iter().take(k).map(|s| s.category).collect()
}

// =============================================================================
// JOURNEY VIEWS
// =============================================================================

/// Everything a timeline node needs to render one stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageView {
    pub stage: Stage,
    pub name: &'static str,
    pub status: StageStatus,
    pub label: &'static str,
    pub description: &'static str,
    pub hint: &'static str,
    /// Latest passing result when completed, otherwise the latest attempt.
    pub result: Option<StageResult>,
    /// Weakest skills of the passing result. Empty unless completed.
    pub recommended_practice: Vec<SkillCategory>,
}

/// Whole-journey summary for one snapshot of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JourneyOverview {
    pub stages: Vec<StageView>,
    pub current: Option<Stage>,
    pub completed: usize,
    pub total: usize,
    pub percent: u8,
    pub message: String,
    pub next_stage: Option<Stage>,
    pub is_complete: bool,
}

// =============================================================================
// JOURNEY EVALUATOR
// =============================================================================

/// Journey Evaluator - binds the pure functions to one catalog.
#[derive(Debug, Clone, Default)]
pub struct JourneyEvaluator {
    catalog: StageCatalog,
}

impl JourneyEvaluator {
    #[must_use]
    pub fn new(catalog: StageCatalog) -> Self {
        Self { catalog }
    }

    #[must_use]
    pub fn catalog(&self) -> &StageCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn status(
        &self,
        stage: Stage,
        results: &[StageResult],
        current: Option<Stage>,
    ) -> StageStatus {
        compute_stage_status(&self.catalog, stage, results, current)
    }

    /// Status of every catalog stage, in catalog order.
    #[must_use]
    pub fn statuses(
        &self,
        results: &[StageResult],
        current: Option<Stage>,
    ) -> Vec<(Stage, StageStatus)> {
        self.catalog
            .stages()
            .iter()
            .map(|stage| (*stage, self.status(*stage, results, current)))
            .collect()
    }

    /// Number of catalog stages with a passing result.
    #[must_use]
    pub fn completed_count(&self, results: &[StageResult]) -> usize {
        self.catalog
            .stages()
            .iter()
            .filter(|stage| is_stage_passed(results, **stage))
            .count()
    }

    /// Completion percentage counting only stages in this catalog.
    #[must_use]
    pub fn progress(&self, results: &[StageResult]) -> u8 {
        let in_catalog: Vec<StageResult> = results
            .iter()
            .filter(|r| self.catalog.contains(r.stage()))
            .cloned()
            .collect();
        compute_overall_progress(&in_catalog, self.catalog.len())
    }

    /// First catalog stage without a passing result.
    ///
    /// A suggestion for callers advancing their current pointer. `None` once
    /// every stage has been passed.
    #[must_use]
    pub fn next_unfinished(&self, results: &[StageResult]) -> Option<Stage> {
        self.catalog
            .stages()
            .iter()
            .copied()
            .find(|stage| !is_stage_passed(results, *stage))
    }

    /// Build the view for one stage.
    #[must_use]
    pub fn stage_view(
        &self,
        stage: Stage,
        results: &[StageResult],
        current: Option<Stage>,
    ) -> StageView {
        let status = self.status(stage, results, current);

        let latest_passing = results
            .iter()
            .rev()
            .find(|r| r.stage() == stage && r.passed());
        let latest_attempt = results.iter().rev().find(|r| r.stage() == stage);

        let recommended_practice = latest_passing
            .map(|r| compute_skill_practice_targets(r, COMPLETED_STAGE_RECOMMENDATIONS))
            .unwrap_or_default();

        StageView {
            stage,
            name: stage.name(),
            status,
            label: status.label(),
            description: status_description(stage, status),
            hint: status_hint(status),
            result: latest_passing.or(latest_attempt).cloned(),
            recommended_practice,
        }
    }

    /// Build the full journey overview from one snapshot.
    #[must_use]
    pub fn overview(&self, results: &[StageResult], current: Option<Stage>) -> JourneyOverview {
        let stages: Vec<StageView> = self
            .catalog
            .stages()
            .iter()
            .map(|stage| self.stage_view(*stage, results, current))
            .collect();

        let completed = self.completed_count(results);
        let total = self.catalog.len();
        let next_stage = self.next_unfinished(results);

        JourneyOverview {
            stages,
            current,
            completed,
            total,
            percent: self.progress(results),
            message: progress_message(completed, total),
            next_stage,
            is_complete: next_stage.is_none(),
        }
    }
}

/// Encouragement line shown under the progress bar.
#[must_use]
pub fn progress_message(completed: usize, total: usize) -> String {
    if completed == 0 {
        "Start your journey by completing your first case!".to_string()
    } else {
        format!(
            "You've completed {} out of {} stages. Keep pushing forward!",
            completed, total
        )
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn scored(stage: Stage, passed: bool, scores: [u8; 5]) -> StageResult {
        let skills = SkillCategory::ALL
            .iter()
            .zip(scores)
            .map(|(c, s)| SkillScore::new(*c, s).expect("score"))
            .collect();
        StageResult::new(stage, passed, skills, "feedback").expect("result")
    }

    fn abc() -> StageCatalog {
        StageCatalog::from_stages(vec![Stage::PersonalExperience, Stage::Case1, Stage::Case2])
            .expect("catalog")
    }

    #[test]
    fn completed_beats_current() {
        let results = vec![StageResult::outcome(Stage::Case1, true)];
        let status = compute_stage_status(
            &StageCatalog::standard(),
            Stage::Case1,
            &results,
            Some(Stage::Case1),
        );
        assert_eq!(status, StageStatus::Completed);
    }

    #[test]
    fn current_beats_unlocked() {
        let results = vec![StageResult::outcome(Stage::PersonalExperience, true)];
        let status = compute_stage_status(
            &StageCatalog::standard(),
            Stage::Case1,
            &results,
            Some(Stage::Case1),
        );
        assert_eq!(status, StageStatus::Current);
    }

    #[test]
    fn current_can_sit_on_a_locked_stage() {
        let status =
            compute_stage_status(&StageCatalog::standard(), Stage::Case3, &[], Some(Stage::Case3));
        assert_eq!(status, StageStatus::Current);
    }

    #[test]
    fn failed_predecessor_keeps_stage_locked() {
        let results = vec![StageResult::outcome(Stage::PersonalExperience, false)];
        let catalog = StageCatalog::standard();
        assert_eq!(
            compute_stage_status(&catalog, Stage::Case1, &results, None),
            StageStatus::Locked
        );
        assert_eq!(
            compute_stage_status(&catalog, Stage::PersonalExperience, &results, None),
            StageStatus::Unlocked
        );
    }

    #[test]
    fn pass_after_fail_completes_stage() {
        let results = vec![
            StageResult::outcome(Stage::PersonalExperience, false),
            StageResult::outcome(Stage::PersonalExperience, true),
        ];
        assert_eq!(
            compute_stage_status(&StageCatalog::standard(), Stage::PersonalExperience, &results, None),
            StageStatus::Completed
        );
    }

    #[test]
    fn scenario_first_passed_second_current() {
        let evaluator = JourneyEvaluator::new(abc());
        let results = vec![StageResult::outcome(Stage::PersonalExperience, true)];
        let statuses = evaluator.statuses(&results, Some(Stage::Case1));

        assert_eq!(
            statuses,
            vec![
                (Stage::PersonalExperience, StageStatus::Completed),
                (Stage::Case1, StageStatus::Current),
                (Stage::Case2, StageStatus::Locked),
            ]
        );
        assert_eq!(evaluator.progress(&results), 33);
    }

    #[test]
    fn scenario_no_results_no_current() {
        let evaluator = JourneyEvaluator::new(abc());
        let statuses = evaluator.statuses(&[], None);

        assert_eq!(
            statuses,
            vec![
                (Stage::PersonalExperience, StageStatus::Unlocked),
                (Stage::Case1, StageStatus::Locked),
                (Stage::Case2, StageStatus::Locked),
            ]
        );
        assert_eq!(evaluator.progress(&[]), 0);
    }

    #[test]
    fn progress_counts_each_stage_once() {
        let results = vec![
            StageResult::outcome(Stage::Case1, true),
            StageResult::outcome(Stage::Case1, true),
            StageResult::outcome(Stage::Case2, false),
        ];
        assert_eq!(compute_overall_progress(&results, 5), 20);
    }

    #[test]
    fn progress_of_empty_catalog_is_zero() {
        let results = vec![StageResult::outcome(Stage::Case1, true)];
        assert_eq!(compute_overall_progress(&results, 0), 0);
    }

    #[test]
    fn progress_caps_at_100() {
        let results: Vec<_> = Stage::ALL
            .iter()
            .map(|s| StageResult::outcome(*s, true))
            .collect();
        assert_eq!(compute_overall_progress(&results, 2), 100);
    }

    #[test]
    fn practice_targets_break_ties_by_declaration() {
        let result = scored(Stage::Case1, true, [80, 40, 40, 90, 60]);
        let targets = compute_skill_practice_targets(&result, 3);
        assert_eq!(
            targets,
            vec![
                SkillCategory::QuantitativeAnalysis,
                SkillCategory::BusinessAcumen,
                SkillCategory::Creativity,
            ]
        );
    }

    #[test]
    fn practice_targets_ignore_input_order() {
        let skills = vec![
            SkillScore::new(SkillCategory::Creativity, 10).expect("score"),
            SkillScore::new(SkillCategory::ProblemStructuring, 10).expect("score"),
        ];
        let result = StageResult::new(Stage::Case1, false, skills, "").expect("result");
        assert_eq!(
            compute_skill_practice_targets(&result, 5),
            vec![SkillCategory::ProblemStructuring, SkillCategory::Creativity]
        );
        // input untouched
        assert_eq!(result.skills()[0].category, SkillCategory::Creativity);
    }

    #[test]
    fn practice_targets_with_zero_k() {
        let result = scored(Stage::Case1, true, [1, 2, 3, 4, 5]);
        assert!(compute_skill_practice_targets(&result, 0).is_empty());
    }

    #[test]
    fn overview_recommends_for_completed_stages_only() {
        let evaluator = JourneyEvaluator::default();
        let results = vec![
            scored(Stage::PersonalExperience, true, [70, 90, 50, 80, 60]),
            scored(Stage::Case1, false, [10, 10, 10, 10, 10]),
        ];
        let overview = evaluator.overview(&results, Some(Stage::Case1));

        let first = &overview.stages[0];
        assert_eq!(first.status, StageStatus::Completed);
        assert_eq!(
            first.recommended_practice,
            vec![SkillCategory::BusinessAcumen, SkillCategory::Creativity]
        );

        let second = &overview.stages[1];
        assert_eq!(second.status, StageStatus::Current);
        assert!(second.recommended_practice.is_empty());
        assert!(second.result.as_ref().is_some_and(|r| !r.passed()));

        assert_eq!(overview.completed, 1);
        assert_eq!(overview.percent, 20);
        assert_eq!(overview.next_stage, Some(Stage::Case1));
        assert!(!overview.is_complete);
        assert_eq!(
            overview.message,
            "You've completed 1 out of 5 stages. Keep pushing forward!"
        );
    }

    #[test]
    fn overview_of_finished_journey() {
        let evaluator = JourneyEvaluator::default();
        let results: Vec<_> = Stage::ALL
            .iter()
            .map(|s| StageResult::outcome(*s, true))
            .collect();
        let overview = evaluator.overview(&results, None);
        assert!(overview.is_complete);
        assert_eq!(overview.percent, 100);
        assert_eq!(overview.next_stage, None);
    }

    #[test]
    fn progress_ignores_stages_outside_catalog() {
        let evaluator = JourneyEvaluator::new(abc());
        let results = vec![StageResult::outcome(Stage::FinalRound, true)];
        assert_eq!(evaluator.progress(&results), 0);
        assert_eq!(evaluator.completed_count(&results), 0);
    }

    #[test]
    fn empty_message() {
        assert_eq!(
            progress_message(0, 5),
            "Start your journey by completing your first case!"
        );
    }
}
