//! # Core Type Definitions
//!
//! This module contains all core types for the Casepath journey engine:
//! - Stage and skill identifiers (`Stage`, `SkillCategory`, `CompanyPath`)
//! - Grading output (`SkillScore`, `StageResult`)
//! - Derived display state (`StageStatus`)
//! - Session identity (`SessionId`)
//! - Error types (`CasepathError`)
//!
//! ## Determinism Guarantees
//!
//! All types in this module:
//! - Use integer arithmetic only (no floating-point)
//! - Implement `Ord` where they key a `BTreeMap`/`BTreeSet`
//! - Parse from their wire names and reject anything else

use crate::primitives::{
    MAX_FEEDBACK_LENGTH, MAX_IMPROVEMENT_AREA_LENGTH, MAX_IMPROVEMENT_AREAS, MAX_SESSION_ID_LENGTH,
    MAX_SKILL_SCORE,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// =============================================================================
// STAGE
// =============================================================================

/// One phase of the interview sequence.
///
/// Declaration order is the prerequisite chain: each stage unlocks once the
/// stage before it has been passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Stage {
    #[serde(rename = "personal_experience")]
    PersonalExperience,
    #[serde(rename = "case_1")]
    Case1,
    #[serde(rename = "case_2")]
    Case2,
    #[serde(rename = "case_3")]
    Case3,
    #[serde(rename = "final_round")]
    FinalRound,
}

impl Stage {
    /// Every stage, in prerequisite order.
    pub const ALL: [Stage; 5] = [
        Stage::PersonalExperience,
        Stage::Case1,
        Stage::Case2,
        Stage::Case3,
        Stage::FinalRound,
    ];

    /// Wire identifier.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::PersonalExperience => "personal_experience",
            Stage::Case1 => "case_1",
            Stage::Case2 => "case_2",
            Stage::Case3 => "case_3",
            Stage::FinalRound => "final_round",
        }
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Stage::PersonalExperience => "Personal Experience",
            Stage::Case1 => "First Round",
            Stage::Case2 => "Second Round",
            Stage::Case3 => "Third Round",
            Stage::FinalRound => "Final Round",
        }
    }

    /// Get the previous stage in the standard order, if any.
    #[must_use]
    pub fn previous(&self) -> Option<Stage> {
        match self {
            Stage::PersonalExperience => None,
            Stage::Case1 => Some(Stage::PersonalExperience),
            Stage::Case2 => Some(Stage::Case1),
            Stage::Case3 => Some(Stage::Case2),
            Stage::FinalRound => Some(Stage::Case3),
        }
    }

    /// Get the next stage in the standard order, if any.
    #[must_use]
    pub fn next(&self) -> Option<Stage> {
        match self {
            Stage::PersonalExperience => Some(Stage::Case1),
            Stage::Case1 => Some(Stage::Case2),
            Stage::Case2 => Some(Stage::Case3),
            Stage::Case3 => Some(Stage::FinalRound),
            Stage::FinalRound => None,
        }
    }

    /// Check if this is the final round.
    #[must_use]
    pub fn is_final(&self) -> bool {
        matches!(self, Stage::FinalRound)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Stage {
    type Err = CasepathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Stage::ALL
            .into_iter()
            .find(|stage| stage.as_str() == s)
            .ok_or_else(|| CasepathError::UnknownStage(s.to_string()))
    }
}

// =============================================================================
// SKILL CATEGORY
// =============================================================================

/// One of the five evaluated competency dimensions.
///
/// Declaration order breaks ties when ranking practice targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillCategory {
    ProblemStructuring,
    QuantitativeAnalysis,
    BusinessAcumen,
    Communication,
    Creativity,
}

impl SkillCategory {
    /// Every category, in declaration order.
    pub const ALL: [SkillCategory; 5] = [
        SkillCategory::ProblemStructuring,
        SkillCategory::QuantitativeAnalysis,
        SkillCategory::BusinessAcumen,
        SkillCategory::Communication,
        SkillCategory::Creativity,
    ];

    /// Wire identifier.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            SkillCategory::ProblemStructuring => "problem_structuring",
            SkillCategory::QuantitativeAnalysis => "quantitative_analysis",
            SkillCategory::BusinessAcumen => "business_acumen",
            SkillCategory::Communication => "communication",
            SkillCategory::Creativity => "creativity",
        }
    }

    /// Position in declaration order.
    #[must_use]
    pub fn ordinal(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for SkillCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SkillCategory {
    type Err = CasepathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SkillCategory::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| CasepathError::UnknownSkill(s.to_string()))
    }
}

// =============================================================================
// COMPANY PATH
// =============================================================================

/// The firm a candidate is preparing for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompanyPath {
    Mckinsey,
    Bcg,
    Bain,
    General,
}

impl CompanyPath {
    pub const ALL: [CompanyPath; 4] = [
        CompanyPath::Mckinsey,
        CompanyPath::Bcg,
        CompanyPath::Bain,
        CompanyPath::General,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            CompanyPath::Mckinsey => "mckinsey",
            CompanyPath::Bcg => "bcg",
            CompanyPath::Bain => "bain",
            CompanyPath::General => "general",
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            CompanyPath::Mckinsey => "McKinsey",
            CompanyPath::Bcg => "BCG",
            CompanyPath::Bain => "Bain",
            CompanyPath::General => "General",
        }
    }
}

impl fmt::Display for CompanyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CompanyPath {
    type Err = CasepathError;

    /// Accepts wire names and display names, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        CompanyPath::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(needle) || c.name().eq_ignore_ascii_case(needle))
            .ok_or_else(|| CasepathError::UnknownCompany(s.to_string()))
    }
}

// =============================================================================
// SKILL SCORE
// =============================================================================

/// A single skill measurement, 0..=100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillScore {
    pub category: SkillCategory,
    pub score: u8,
}

impl SkillScore {
    /// Create a score, rejecting values above `MAX_SKILL_SCORE`.
    pub fn new(category: SkillCategory, score: u8) -> Result<Self, CasepathError> {
        let skill = Self { category, score };
        skill.validate()?;
        Ok(skill)
    }

    pub fn validate(&self) -> Result<(), CasepathError> {
        if self.score > MAX_SKILL_SCORE {
            return Err(CasepathError::InvalidScore {
                category: self.category,
                score: self.score,
            });
        }
        Ok(())
    }
}

// =============================================================================
// STAGE RESULT
// =============================================================================

/// The graded outcome of one attempt at a stage.
///
/// Produced by an external grader. Fields are private so a result cannot
/// change after it has been validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageResult {
    stage: Stage,
    passed: bool,
    skills: Vec<SkillScore>,
    feedback: String,
    #[serde(default)]
    improvement_areas: Vec<String>,
}

impl StageResult {
    /// Create a validated result.
    pub fn new(
        stage: Stage,
        passed: bool,
        skills: Vec<SkillScore>,
        feedback: impl Into<String>,
    ) -> Result<Self, CasepathError> {
        Self::with_improvement_areas(stage, passed, skills, feedback, Vec::new())
    }

    /// Create a validated result carrying the grader's improvement notes.
    pub fn with_improvement_areas(
        stage: Stage,
        passed: bool,
        skills: Vec<SkillScore>,
        feedback: impl Into<String>,
        improvement_areas: Vec<String>,
    ) -> Result<Self, CasepathError> {
        let result = Self {
            stage,
            passed,
            skills,
            feedback: feedback.into(),
            improvement_areas,
        };
        result.validate()?;
        Ok(result)
    }

    /// A result with no skill scores or feedback.
    #[must_use]
    pub fn outcome(stage: Stage, passed: bool) -> Self {
        Self {
            stage,
            passed,
            skills: Vec::new(),
            feedback: String::new(),
            improvement_areas: Vec::new(),
        }
    }

    /// Check every construction invariant.
    ///
    /// Deserialized results skip the constructors, so storage and API
    /// boundaries call this before accepting one.
    pub fn validate(&self) -> Result<(), CasepathError> {
        let mut seen = BTreeSet::new();
        for skill in &self.skills {
            skill.validate()?;
            if !seen.insert(skill.category) {
                return Err(CasepathError::DuplicateSkill(skill.category));
            }
        }

        if self.feedback.len() > MAX_FEEDBACK_LENGTH {
            return Err(CasepathError::InvalidInput(format!(
                "Feedback length {} exceeds maximum {} bytes",
                self.feedback.len(),
                MAX_FEEDBACK_LENGTH
            )));
        }

        if self.improvement_areas.len() > MAX_IMPROVEMENT_AREAS {
            return Err(CasepathError::InvalidInput(format!(
                "Improvement area count {} exceeds maximum {}",
                self.improvement_areas.len(),
                MAX_IMPROVEMENT_AREAS
            )));
        }
        if let Some(area) = self
            .improvement_areas
            .iter()
            .find(|a| a.len() > MAX_IMPROVEMENT_AREA_LENGTH)
        {
            return Err(CasepathError::InvalidInput(format!(
                "Improvement area length {} exceeds maximum {} bytes",
                area.len(),
                MAX_IMPROVEMENT_AREA_LENGTH
            )));
        }

        Ok(())
    }

    #[must_use]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    #[must_use]
    pub fn passed(&self) -> bool {
        self.passed
    }

    #[must_use]
    pub fn skills(&self) -> &[SkillScore] {
        &self.skills
    }

    #[must_use]
    pub fn feedback(&self) -> &str {
        &self.feedback
    }

    #[must_use]
    pub fn improvement_areas(&self) -> &[String] {
        &self.improvement_areas
    }

    /// Score for one category, if the grader assessed it.
    #[must_use]
    pub fn score_for(&self, category: SkillCategory) -> Option<u8> {
        self.skills
            .iter()
            .find(|s| s.category == category)
            .map(|s| s.score)
    }
}

// =============================================================================
// STAGE STATUS
// =============================================================================

/// Derived display state of a stage. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    Locked,
    Unlocked,
    Current,
    Completed,
}

impl StageStatus {
    /// Short label shown under a timeline node.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            StageStatus::Locked => "Locked",
            StageStatus::Unlocked => "Unlocked",
            StageStatus::Current => "In Progress",
            StageStatus::Completed => "Completed",
        }
    }

    /// Whether the candidate may open the stage.
    #[must_use]
    pub fn is_accessible(&self) -> bool {
        !matches!(self, StageStatus::Locked)
    }
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// SESSION ID
// =============================================================================

/// Identifier under which a candidate's progress is stored.
///
/// 1..=`MAX_SESSION_ID_LENGTH` bytes of ASCII alphanumerics, `-` or `_`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Result<Self, CasepathError> {
        let id = id.into();
        let valid_chars = id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
        if id.is_empty() || id.len() > MAX_SESSION_ID_LENGTH || !valid_chars {
            return Err(CasepathError::InvalidSessionId(id));
        }
        Ok(Self(id))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SessionId {
    type Error = CasepathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SessionId> for String {
    fn from(id: SessionId) -> Self {
        id.0
    }
}

impl FromStr for SessionId {
    type Err = CasepathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the Casepath system.
///
/// The progression evaluator itself is total and never returns these; they
/// come from boundary validation and storage.
#[derive(Debug, Error)]
pub enum CasepathError {
    #[error("Unknown stage: {0}")]
    UnknownStage(String),

    #[error("Unknown skill category: {0}")]
    UnknownSkill(String),

    #[error("Unknown preparation area: {0}")]
    UnknownArea(String),

    #[error("Unknown checklist item: {0}")]
    UnknownChecklistItem(String),

    #[error("Unknown company path: {0}")]
    UnknownCompany(String),

    #[error("Score {score} for {category} exceeds 100")]
    InvalidScore { category: SkillCategory, score: u8 },

    #[error("Skill {0} scored more than once")]
    DuplicateSkill(SkillCategory),

    #[error("Invalid session id: {0:?}")]
    InvalidSessionId(String),

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Invalid stage catalog: {0}")]
    InvalidCatalog(String),

    #[error("Ledger is full ({0} results)")]
    LedgerFull(usize),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    #[error("I/O error: {0}")]
    IoError(String),
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_wire_names_roundtrip() {
        for stage in Stage::ALL {
            assert_eq!(stage.as_str().parse::<Stage>().expect("parse"), stage);
        }
        assert!("case_4".parse::<Stage>().is_err());
    }

    #[test]
    fn previous_and_next_are_inverse() {
        for stage in Stage::ALL {
            if let Some(next) = stage.next() {
                assert_eq!(next.previous(), Some(stage));
            }
        }
        assert_eq!(Stage::PersonalExperience.previous(), None);
        assert!(Stage::FinalRound.is_final());
    }

    #[test]
    fn skill_ordinals_follow_declaration() {
        let ordinals: Vec<_> = SkillCategory::ALL.iter().map(|c| c.ordinal()).collect();
        assert_eq!(ordinals, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn skill_score_rejects_over_100() {
        assert!(SkillScore::new(SkillCategory::Creativity, 100).is_ok());
        assert!(SkillScore::new(SkillCategory::Creativity, 101).is_err());
    }

    #[test]
    fn stage_result_rejects_duplicate_skills() {
        let skills = vec![
            SkillScore::new(SkillCategory::Communication, 50).expect("score"),
            SkillScore::new(SkillCategory::Communication, 60).expect("score"),
        ];
        let result = StageResult::new(Stage::Case1, true, skills, "");
        assert!(matches!(
            result,
            Err(CasepathError::DuplicateSkill(SkillCategory::Communication))
        ));
    }

    #[test]
    fn stage_result_rejects_oversized_feedback() {
        let feedback = "x".repeat(MAX_FEEDBACK_LENGTH + 1);
        assert!(StageResult::new(Stage::Case1, true, vec![], feedback).is_err());
    }

    #[test]
    fn company_path_parses_display_and_wire_names() {
        assert_eq!("McKinsey".parse::<CompanyPath>().expect("parse"), CompanyPath::Mckinsey);
        assert_eq!("bcg".parse::<CompanyPath>().expect("parse"), CompanyPath::Bcg);
        assert!("Deloitte".parse::<CompanyPath>().is_err());
    }

    #[test]
    fn session_id_validation() {
        assert!(SessionId::new("candidate-42_a").is_ok());
        assert!(SessionId::new("").is_err());
        assert!(SessionId::new("../etc").is_err());
        assert!(SessionId::new("a".repeat(MAX_SESSION_ID_LENGTH + 1)).is_err());
    }

    #[test]
    fn status_labels() {
        assert_eq!(StageStatus::Current.label(), "In Progress");
        assert!(!StageStatus::Locked.is_accessible());
        assert!(StageStatus::Unlocked.is_accessible());
    }
}
