//! # Journey Scenarios
//!
//! End-to-end walks through a candidate's journey, including storage
//! round-trips through both backends.

use casepath_core::{
    CasepathError, JourneyEvaluator, PreparationArea, ProgressStore, RotatingTip, SessionId,
    SessionRecord, SkillCategory, SkillScore, Stage, StageCatalog, StageResult, StageStatus,
    compute_predecessor, focused_improvement, snapshot_from_bytes, snapshot_to_bytes,
};
use tempfile::tempdir;

fn three_stage_evaluator() -> JourneyEvaluator {
    let catalog =
        StageCatalog::from_stages(vec![Stage::PersonalExperience, Stage::Case1, Stage::Case2])
            .expect("catalog");
    JourneyEvaluator::new(catalog)
}

fn scores(values: [u8; 5]) -> Vec<SkillScore> {
    SkillCategory::ALL
        .iter()
        .zip(values)
        .map(|(category, score)| SkillScore::new(*category, score).expect("score"))
        .collect()
}

// =============================================================================
// THREE-STAGE CATALOG
// =============================================================================

mod three_stage_catalog {
    use super::*;

    #[test]
    fn first_pass_with_second_current() {
        let evaluator = three_stage_evaluator();
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
    fn fresh_journey() {
        let evaluator = three_stage_evaluator();
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

        let overview = evaluator.overview(&[], None);
        assert_eq!(
            overview.message,
            "Start your journey by completing your first case!"
        );
        assert_eq!(overview.next_stage, Some(Stage::PersonalExperience));
    }

    #[test]
    fn evaluation_is_repeatable() {
        let evaluator = three_stage_evaluator();
        let results = vec![
            StageResult::outcome(Stage::PersonalExperience, true),
            StageResult::outcome(Stage::Case1, false),
        ];
        let first = evaluator.overview(&results, Some(Stage::Case1));
        let second = evaluator.overview(&results, Some(Stage::Case1));
        assert_eq!(first, second);
    }
}

// =============================================================================
// FULL JOURNEY
// =============================================================================

mod full_journey {
    use super::*;

    #[test]
    fn walk_every_stage() {
        let evaluator = JourneyEvaluator::default();
        let mut record = SessionRecord::new(SessionId::new("candidate-1").expect("id"));

        let mut expected_completed = 0;
        for stage in Stage::ALL {
            assert_eq!(evaluator.next_unfinished(record.results()), Some(stage));
            record
                .set_current(evaluator.catalog(), Some(stage))
                .expect("set current");
            assert_eq!(
                evaluator.status(stage, record.results(), record.current_stage),
                StageStatus::Current
            );

            // A failed attempt keeps the stage current; the retake completes it.
            record
                .record_result(StageResult::outcome(stage, false))
                .expect("record");
            record
                .record_result(
                    StageResult::new(stage, true, scores([70, 60, 80, 90, 50]), "Solid")
                        .expect("result"),
                )
                .expect("record");
            expected_completed += 1;

            let overview = record.overview(&evaluator);
            assert_eq!(overview.completed, expected_completed);
            if let Some(next) = stage.next() {
                assert_eq!(
                    evaluator.status(next, record.results(), record.current_stage),
                    StageStatus::Unlocked
                );
            }
        }

        let overview = record.overview(&evaluator);
        assert!(overview.is_complete);
        assert_eq!(overview.percent, 100);
        assert_eq!(
            overview.message,
            "You've completed 5 out of 5 stages. Keep pushing forward!"
        );
        for view in &overview.stages {
            assert_eq!(view.status, StageStatus::Completed);
            assert_eq!(
                view.recommended_practice,
                vec![SkillCategory::Creativity, SkillCategory::QuantitativeAnalysis]
            );
        }
    }

    #[test]
    fn predecessors_follow_catalog_order() {
        assert_eq!(compute_predecessor(Stage::PersonalExperience), None);
        assert_eq!(compute_predecessor(Stage::FinalRound), Some(Stage::Case3));
    }

    #[test]
    fn seeded_tips_are_reproducible() {
        let result =
            StageResult::new(Stage::Case1, false, scores([10, 20, 30, 40, 50]), "").expect("result");
        let first = focused_improvement(&result, 3, &RotatingTip::new(7));
        let second = focused_improvement(&result, 3, &RotatingTip::new(7));
        assert_eq!(first, second);
        assert_eq!(first.targets.len(), 3);
    }
}

// =============================================================================
// STORAGE
// =============================================================================

mod storage {
    use super::*;

    fn sample_record(id: &str) -> SessionRecord {
        let mut record = SessionRecord::new(SessionId::new(id).expect("id"));
        record
            .record_result(
                StageResult::with_improvement_areas(
                    Stage::PersonalExperience,
                    true,
                    scores([55, 65, 75, 85, 95]),
                    "Clear story",
                    vec!["Improve your mental math skills".to_string()],
                )
                .expect("result"),
            )
            .expect("record");
        record.current_stage = Some(Stage::Case1);
        let _ = record
            .preparation_mut(Stage::Case1)
            .answer_quiz(PreparationArea::MentalMath, "12");
        record
    }

    #[test]
    fn redb_store_survives_reopen() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("casepath.redb");
        let record = sample_record("alice");

        {
            let mut store = ProgressStore::with_redb(&path).expect("open");
            assert!(store.is_persistent());
            store.save(&record).expect("save");
        }

        let store = ProgressStore::with_redb(&path).expect("reopen");
        let loaded = store
            .load(&record.session_id)
            .expect("load")
            .expect("present");
        assert_eq!(loaded, record);

        let evaluator = JourneyEvaluator::default();
        assert_eq!(
            loaded.overview(&evaluator),
            record.overview(&evaluator),
            "statuses must not depend on the backend"
        );
    }

    #[test]
    fn file_snapshot_roundtrip() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("casepath.dat");

        let mut store = ProgressStore::new();
        store.save(&sample_record("alice")).expect("save");
        store.save(&sample_record("bob")).expect("save");

        let bytes = snapshot_to_bytes(&store.snapshot().expect("snapshot")).expect("encode");
        std::fs::write(&path, &bytes).expect("write");

        let restored = snapshot_from_bytes(&std::fs::read(&path).expect("read")).expect("decode");
        let rebuilt = ProgressStore::from_snapshot(restored).expect("rebuild");
        assert_eq!(
            rebuilt.snapshot().expect("snapshot"),
            store.snapshot().expect("snapshot")
        );
    }

    #[test]
    fn corrupted_snapshot_rejected() {
        let mut bytes = snapshot_to_bytes(&[sample_record("alice")]).expect("encode");
        bytes[4] = 99;
        assert!(matches!(
            snapshot_from_bytes(&bytes),
            Err(CasepathError::DeserializationError(_))
        ));
    }
}
