//! # Stage Catalog
//!
//! The ordered list of stages a journey walks through, plus the display copy
//! for each stage.
//!
//! The standard catalog holds all five stages in prerequisite order. Custom
//! catalogs are ordered, duplicate-free subsets used by tracks that skip a
//! round.

use crate::{CasepathError, Stage, StageStatus};
use serde::Serialize;

// =============================================================================
// STAGE CATALOG
// =============================================================================

/// Ordered, immutable list of stages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageCatalog {
    stages: Vec<Stage>,
}

impl Default for StageCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl StageCatalog {
    /// All five stages in prerequisite order.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            stages: Stage::ALL.to_vec(),
        }
    }

    /// Build a custom catalog.
    ///
    /// Rejects empty lists and repeated stages.
    pub fn from_stages(stages: Vec<Stage>) -> Result<Self, CasepathError> {
        if stages.is_empty() {
            return Err(CasepathError::InvalidCatalog(
                "catalog must contain at least one stage".to_string(),
            ));
        }
        for (i, stage) in stages.iter().enumerate() {
            if stages[..i].contains(stage) {
                return Err(CasepathError::InvalidCatalog(format!(
                    "stage {} appears more than once",
                    stage.as_str()
                )));
            }
        }
        Ok(Self { stages })
    }

    #[must_use]
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    #[must_use]
    pub fn first(&self) -> Option<Stage> {
        self.stages.first().copied()
    }

    #[must_use]
    pub fn contains(&self, stage: Stage) -> bool {
        self.stages.contains(&stage)
    }

    #[must_use]
    pub fn position(&self, stage: Stage) -> Option<usize> {
        self.stages.iter().position(|s| *s == stage)
    }

    /// Stage immediately before `stage` in this catalog.
    ///
    /// `None` for the first stage and for stages outside the catalog.
    #[must_use]
    pub fn predecessor(&self, stage: Stage) -> Option<Stage> {
        match self.position(stage) {
            Some(index) if index > 0 => self.stages.get(index - 1).copied(),
            _ => None,
        }
    }

    /// Reject a stage that is not part of this catalog.
    pub fn require(&self, stage: Stage) -> Result<Stage, CasepathError> {
        if self.contains(stage) {
            Ok(stage)
        } else {
            Err(CasepathError::UnknownStage(stage.as_str().to_string()))
        }
    }

    /// Parse a wire identifier and check membership.
    pub fn parse_stage(&self, raw: &str) -> Result<Stage, CasepathError> {
        self.require(raw.parse()?)
    }

    /// Display metadata for every stage, in catalog order.
    #[must_use]
    pub fn infos(&self) -> Vec<StageInfo> {
        self.stages.iter().map(|s| StageInfo::of(*s)).collect()
    }
}

/// Predecessor of `stage` in the standard catalog.
#[must_use]
pub fn compute_predecessor(stage: Stage) -> Option<Stage> {
    stage.previous()
}

// =============================================================================
// STAGE INFO
// =============================================================================

/// Static display copy for a stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageInfo {
    pub stage: Stage,
    pub name: &'static str,
    /// What the stage asks of the candidate.
    pub summary: &'static str,
}

impl StageInfo {
    #[must_use]
    pub fn of(stage: Stage) -> Self {
        Self {
            stage,
            name: stage.name(),
            summary: stage_summary(stage),
        }
    }
}

fn stage_summary(stage: Stage) -> &'static str {
    match stage {
        Stage::PersonalExperience => {
            "Share your relevant experiences and demonstrate your communication skills."
        }
        Stage::Case1 => "Tackle a business problem and showcase your problem-solving abilities.",
        Stage::Case2 => "Analyze a complex scenario and provide strategic recommendations.",
        Stage::Case3 => {
            "Dive deep into a specific industry challenge and present your insights."
        }
        Stage::FinalRound => {
            "Demonstrate your overall consulting readiness in this final assessment."
        }
    }
}

/// Dialog description for a stage in a given status.
#[must_use]
pub fn status_description(stage: Stage, status: StageStatus) -> &'static str {
    match status {
        StageStatus::Completed => "Great job! You've successfully completed this stage.",
        StageStatus::Current => "This is your current challenge. Good luck!",
        StageStatus::Unlocked => "You've unlocked this stage. Are you ready for the challenge?",
        StageStatus::Locked if stage.is_final() => {
            "The final challenge awaits. Complete previous stages to unlock."
        }
        StageStatus::Locked => "Complete previous stages to unlock this challenge.",
    }
}

/// Hover hint for a stage in a given status.
#[must_use]
pub fn status_hint(status: StageStatus) -> &'static str {
    match status {
        StageStatus::Completed => "Click to review your performance and key learnings",
        StageStatus::Current => "Click to continue your current case or review progress",
        StageStatus::Unlocked => "Click to start this case and continue your journey",
        StageStatus::Locked => "Complete previous stages to unlock this challenge",
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_catalog_has_five_stages_in_order() {
        let catalog = StageCatalog::standard();
        assert_eq!(catalog.len(), 5);
        assert_eq!(catalog.first(), Some(Stage::PersonalExperience));
        assert_eq!(catalog.stages(), &Stage::ALL);
    }

    #[test]
    fn predecessor_of_first_is_none() {
        let catalog = StageCatalog::standard();
        assert_eq!(catalog.predecessor(Stage::PersonalExperience), None);
        assert_eq!(compute_predecessor(Stage::PersonalExperience), None);
    }

    #[test]
    fn predecessor_is_unique_prior_entry() {
        let catalog = StageCatalog::standard();
        for window in Stage::ALL.windows(2) {
            assert_eq!(catalog.predecessor(window[1]), Some(window[0]));
            assert_eq!(compute_predecessor(window[1]), Some(window[0]));
        }
    }

    #[test]
    fn custom_catalog_chains_its_own_order() {
        let catalog =
            StageCatalog::from_stages(vec![Stage::Case1, Stage::FinalRound]).expect("catalog");
        assert_eq!(catalog.predecessor(Stage::FinalRound), Some(Stage::Case1));
        assert_eq!(catalog.predecessor(Stage::Case1), None);
        assert_eq!(catalog.predecessor(Stage::Case2), None);
    }

    #[test]
    fn custom_catalog_rejects_duplicates_and_empty() {
        assert!(StageCatalog::from_stages(vec![]).is_err());
        assert!(StageCatalog::from_stages(vec![Stage::Case1, Stage::Case1]).is_err());
    }

    #[test]
    fn parse_stage_checks_membership() {
        let catalog =
            StageCatalog::from_stages(vec![Stage::PersonalExperience, Stage::Case1]).expect("catalog");
        assert_eq!(catalog.parse_stage("case_1").expect("parse"), Stage::Case1);
        assert!(catalog.parse_stage("final_round").is_err());
        assert!(catalog.parse_stage("bogus").is_err());
    }

    #[test]
    fn locked_final_round_has_its_own_description() {
        assert_ne!(
            status_description(Stage::FinalRound, StageStatus::Locked),
            status_description(Stage::Case2, StageStatus::Locked)
        );
    }
}
