//! # API Request/Response Types
//!
//! This module defines the JSON structures for the HTTP API.

use casepath_core::preparation::AreaContent;
use casepath_core::{
    CasepathError, ChecklistItem, CompanyPath, EXPERT_TIPS, FocusedImprovement, JourneyOverview, PreparationArea,
    PreparationChecklist, PreparationProgress, QuizOutcome, ScoreBreakdown, SkillCategory, SkillProfile, SkillScore,
    Stage, StageInfo, StageResult, StageStatus, StageView,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// CATALOG RESPONSE
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageInfoJson {
    pub stage: Stage,
    pub name: String,
    pub summary: String,
}

impl From<StageInfo> for StageInfoJson {
    fn from(info: StageInfo) -> Self {
        Self {
            stage: info.stage,
            name: info.name.to_string(),
            summary: info.summary.to_string(),
        }
    }
}

/// Stage catalog response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogResponse {
    pub success: bool,
    pub stages: Vec<StageInfoJson>,
}

// =============================================================================
// SKILL RESPONSES
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillJson {
    pub category: SkillCategory,
    pub name: String,
    pub description: String,
    pub tips: Vec<String>,
}

impl From<SkillProfile> for SkillJson {
    fn from(profile: SkillProfile) -> Self {
        Self {
            category: profile.category,
            name: profile.name.to_string(),
            description: profile.description.to_string(),
            tips: profile.tips.iter().map(|t| (*t).to_string()).collect(),
        }
    }
}

/// Skill catalog response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillsResponse {
    pub success: bool,
    pub skills: Vec<SkillJson>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricJson {
    pub name: String,
    pub description: String,
    pub score: u8,
}

/// Query string for `GET /skills/{category}/breakdown`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BreakdownQuery {
    /// Overall score to show next to the metrics.
    pub score: Option<u8>,
}

/// Score breakdown response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakdownResponse {
    pub success: bool,
    pub category: Option<SkillCategory>,
    pub title: Option<String>,
    pub overall: Option<u8>,
    pub metrics: Vec<MetricJson>,
    pub methodology: Option<String>,
    pub error: Option<String>,
}

impl BreakdownResponse {
    pub fn success(breakdown: &ScoreBreakdown) -> Self {
        Self {
            success: true,
            category: Some(breakdown.category),
            title: Some(breakdown.title.to_string()),
            overall: Some(breakdown.overall),
            metrics: breakdown
                .metrics
                .iter()
                .map(|m| MetricJson {
                    name: m.name.to_string(),
                    description: m.description.to_string(),
                    score: m.score,
                })
                .collect(),
            methodology: Some(breakdown.methodology.to_string()),
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            category: None,
            title: None,
            overall: None,
            metrics: vec![],
            methodology: None,
            error: Some(msg.into()),
        }
    }
}

// =============================================================================
// JOURNEY RESPONSE
// =============================================================================

/// One scored skill in JSON form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillScoreJson {
    pub category: String,
    pub score: u8,
}

/// A recorded result as shown to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultJson {
    pub passed: bool,
    pub skills: Vec<SkillScoreJson>,
    pub feedback: String,
    pub improvement_areas: Vec<String>,
}

impl From<&StageResult> for ResultJson {
    fn from(result: &StageResult) -> Self {
        Self {
            passed: result.passed(),
            skills: result
                .skills()
                .iter()
                .map(|s| SkillScoreJson {
                    category: s.category.as_str().to_string(),
                    score: s.score,
                })
                .collect(),
            feedback: result.feedback().to_string(),
            improvement_areas: result.improvement_areas().to_vec(),
        }
    }
}

/// One node of the journey timeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageViewJson {
    pub stage: Stage,
    pub name: String,
    pub status: StageStatus,
    pub label: String,
    pub description: String,
    pub hint: String,
    pub result: Option<ResultJson>,
    pub recommended_practice: Vec<SkillCategory>,
}

impl From<&StageView> for StageViewJson {
    fn from(view: &StageView) -> Self {
        Self {
            stage: view.stage,
            name: view.name.to_string(),
            status: view.status,
            label: view.label.to_string(),
            description: view.description.to_string(),
            hint: view.hint.to_string(),
            result: view.result.as_ref().map(ResultJson::from),
            recommended_practice: view.recommended_practice.clone(),
        }
    }
}

/// Whole-journey response, also returned after every session mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JourneyResponse {
    pub success: bool,
    pub session_id: Option<String>,
    pub company: Option<CompanyPath>,
    pub current_stage: Option<Stage>,
    pub completed: usize,
    pub total: usize,
    pub percent: u8,
    pub message: Option<String>,
    pub next_stage: Option<Stage>,
    pub is_complete: bool,
    pub stages: Vec<StageViewJson>,
    pub error: Option<String>,
}

impl JourneyResponse {
    pub fn success(
        session_id: &str,
        company: Option<CompanyPath>,
        overview: &JourneyOverview,
    ) -> Self {
        Self {
            success: true,
            session_id: Some(session_id.to_string()),
            company,
            current_stage: overview.current,
            completed: overview.completed,
            total: overview.total,
            percent: overview.percent,
            message: Some(overview.message.clone()),
            next_stage: overview.next_stage,
            is_complete: overview.is_complete,
            stages: overview.stages.iter().map(StageViewJson::from).collect(),
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            session_id: None,
            company: None,
            current_stage: None,
            completed: 0,
            total: 0,
            percent: 0,
            message: None,
            next_stage: None,
            is_complete: false,
            stages: vec![],
            error: Some(msg.into()),
        }
    }
}

/// Single-stage response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageResponse {
    pub success: bool,
    pub view: Option<StageViewJson>,
    pub attempts: usize,
    pub error: Option<String>,
}

impl StageResponse {
    pub fn success(view: &StageView, attempts: usize) -> Self {
        Self {
            success: true,
            view: Some(StageViewJson::from(view)),
            attempts,
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            view: None,
            attempts: 0,
            error: Some(msg.into()),
        }
    }
}

/// Session listing response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionsResponse {
    pub success: bool,
    pub sessions: Vec<String>,
    pub error: Option<String>,
}

/// Session deletion response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub error: Option<String>,
}

// =============================================================================
// SESSION MUTATION REQUESTS
// =============================================================================

/// Record a graded stage result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordResultRequest {
    pub stage: String,
    pub passed: bool,
    #[serde(default)]
    pub skills: Vec<SkillScoreJson>,
    #[serde(default)]
    pub feedback: String,
    #[serde(default)]
    pub improvement_areas: Vec<String>,
}

impl RecordResultRequest {
    /// Convert to a StageResult, validating fields.
    ///
    /// Unknown stage or category names, scores above 100 and duplicate
    /// categories are rejected here, before anything reaches the ledger.
    pub fn to_result(&self) -> Result<StageResult, CasepathError> {
        let stage = Stage::from_str(&self.stage)?;
        let skills = self
            .skills
            .iter()
            .map(|s| SkillScore::new(SkillCategory::from_str(&s.category)?, s.score))
            .collect::<Result<Vec<_>, _>>()?;

        StageResult::with_improvement_areas(
            stage,
            self.passed,
            skills,
            self.feedback.clone(),
            self.improvement_areas.clone(),
        )
    }
}

/// Set or clear the externally designated current stage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SetCurrentRequest {
    pub stage: Option<String>,
}

/// Choose the company track.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetCompanyRequest {
    pub company: String,
}

// =============================================================================
// PRACTICE TARGETS
// =============================================================================

/// Query string for `GET /sessions/{id}/targets`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetsQuery {
    pub k: Option<usize>,
    /// Restrict to the latest result of this stage.
    pub stage: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PracticeTargetJson {
    pub category: SkillCategory,
    pub name: String,
    pub score: Option<u8>,
    pub tip: String,
}

/// Focused-improvement response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetsResponse {
    pub success: bool,
    /// Stage of the result the targets came from. `None` when nothing is recorded yet.
    pub stage: Option<Stage>,
    pub passed: Option<bool>,
    pub targets: Vec<PracticeTargetJson>,
    pub error: Option<String>,
}

impl TargetsResponse {
    pub fn success(plan: &FocusedImprovement) -> Self {
        Self {
            success: true,
            stage: Some(plan.stage),
            passed: Some(plan.passed),
            targets: plan
                .targets
                .iter()
                .map(|t| PracticeTargetJson {
                    category: t.category,
                    name: t.name.to_string(),
                    score: t.score,
                    tip: t.tip.clone(),
                })
                .collect(),
            error: None,
        }
    }

    pub fn empty() -> Self {
        Self {
            success: true,
            stage: None,
            passed: None,
            targets: vec![],
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            stage: None,
            passed: None,
            targets: vec![],
            error: Some(msg.into()),
        }
    }
}

// =============================================================================
// PREPARATION
// =============================================================================

/// One preparation area with its content and the candidate's progress.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AreaJson {
    pub area: PreparationArea,
    pub title: String,
    pub text: String,
    pub percent: u8,
    pub quiz_question: String,
    pub quiz_options: Vec<String>,
    pub quiz_passed: bool,
    pub exercise_instruction: String,
    pub exercise_hint: String,
    pub exercise_completed: bool,
}

impl AreaJson {
    fn new(content: &AreaContent, progress: &PreparationProgress) -> Self {
        Self {
            area: content.area,
            title: content.title.to_string(),
            text: content.text.to_string(),
            percent: progress.area_percent(content.area),
            quiz_question: content.quiz.question.to_string(),
            quiz_options: content
                .quiz
                .options
                .iter()
                .map(|o| (*o).to_string())
                .collect(),
            quiz_passed: progress.quiz_passed(content.area),
            exercise_instruction: content.exercise.instruction.to_string(),
            exercise_hint: content.exercise.hint.to_string(),
            exercise_completed: progress.exercise_completed(content.area),
        }
    }
}

/// Preparation state for one stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreparationResponse {
    pub success: bool,
    pub stage: Option<Stage>,
    pub overall_percent: u8,
    pub ready: bool,
    pub start_label: Option<String>,
    pub areas: Vec<AreaJson>,
    pub error: Option<String>,
}

impl PreparationResponse {
    pub fn success(stage: Stage, progress: &PreparationProgress) -> Self {
        Self {
            success: true,
            stage: Some(stage),
            overall_percent: progress.overall_percent(),
            ready: progress.is_ready(),
            start_label: Some(progress.start_label()),
            areas: PreparationArea::ALL
                .iter()
                .map(|area| AreaJson::new(&area.content(), progress))
                .collect(),
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            stage: None,
            overall_percent: 0,
            ready: false,
            start_label: None,
            areas: vec![],
            error: Some(msg.into()),
        }
    }
}

/// Answer an area's quiz.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizRequest {
    pub area: String,
    pub answer: String,
}

/// Quiz grading response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizResponse {
    pub success: bool,
    pub correct: bool,
    pub feedback: Option<String>,
    pub awarded: u8,
    pub area_percent: u8,
    pub overall_percent: u8,
    pub error: Option<String>,
}

impl QuizResponse {
    pub fn success(outcome: QuizOutcome, overall_percent: u8) -> Self {
        Self {
            success: true,
            correct: outcome.correct,
            feedback: Some(outcome.feedback),
            awarded: outcome.awarded,
            area_percent: outcome.area_percent,
            overall_percent,
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            correct: false,
            feedback: None,
            awarded: 0,
            area_percent: 0,
            overall_percent: 0,
            error: Some(msg.into()),
        }
    }
}

/// Mark an area's exercise done.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseRequest {
    pub area: String,
}

/// Exercise completion response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseResponse {
    pub success: bool,
    pub awarded: u8,
    pub area_percent: u8,
    pub overall_percent: u8,
    pub error: Option<String>,
}

impl ExerciseResponse {
    pub fn success(awarded: u8, area_percent: u8, overall_percent: u8) -> Self {
        Self {
            success: true,
            awarded,
            area_percent,
            overall_percent,
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            awarded: 0,
            area_percent: 0,
            overall_percent: 0,
            error: Some(msg.into()),
        }
    }
}

// =============================================================================
// CHECKLIST
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChecklistItemJson {
    pub item: ChecklistItem,
    pub label: String,
    pub checked: bool,
}

/// Check, uncheck or (with `checked` omitted) flip one item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChecklistRequest {
    pub item: String,
    #[serde(default)]
    pub checked: Option<bool>,
}

/// Checklist state for one stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChecklistResponse {
    pub success: bool,
    pub stage: Option<Stage>,
    pub items: Vec<ChecklistItemJson>,
    pub percent: u8,
    pub ready: bool,
    pub start_label: Option<String>,
    pub tips: Vec<String>,
    pub error: Option<String>,
}

impl ChecklistResponse {
    pub fn success(stage: Stage, checklist: &PreparationChecklist) -> Self {
        Self {
            success: true,
            stage: Some(stage),
            items: ChecklistItem::ALL
                .iter()
                .map(|item| ChecklistItemJson {
                    item: *item,
                    label: item.label().to_string(),
                    checked: checklist.is_checked(*item),
                })
                .collect(),
            percent: checklist.percent(),
            ready: checklist.is_ready(),
            start_label: Some(checklist.start_label()),
            tips: EXPERT_TIPS.iter().map(|t| (*t).to_string()).collect(),
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            stage: None,
            items: vec![],
            percent: 0,
            ready: false,
            start_label: None,
            tips: vec![],
            error: Some(msg.into()),
        }
    }
}

// =============================================================================
// EXPORT RESPONSE
// =============================================================================

/// Export response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportResponse {
    pub success: bool,
    pub data: Option<String>, // Base64 encoded
    pub size: usize,
    pub error: Option<String>,
}

impl ExportResponse {
    pub fn success(data: &[u8]) -> Self {
        Self {
            success: true,
            data: Some(base64::Engine::encode(
                &base64::engine::general_purpose::STANDARD,
                data,
            )),
            size: data.len(),
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            size: 0,
            error: Some(msg.into()),
        }
    }
}
