//! # casepath-core
//!
//! The deterministic progression engine for Casepath, a consulting case
//! interview coach.
//!
//! This crate decides, for a fixed sequence of interview stages and a
//! candidate's accumulated results, which stages are locked, unlocked,
//! current or completed, how far through the journey the candidate is, and
//! which skills they should practice next.
//!
//! ## Architectural Constraints
//!
//! - Evaluation is pure: results in, statuses out. No hidden state.
//! - Deterministic: BTreeMap only, no floats, no randomness.
//! - No async, no network dependencies. File and HTTP surfaces live in the app.

// =============================================================================
// MODULES
// =============================================================================

pub mod catalog;
pub mod checklist;
pub mod formats;
pub mod ledger;
pub mod preparation;
pub mod primitives;
pub mod progression;
pub mod session;
pub mod skills;
pub mod storage;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    CasepathError, CompanyPath, SessionId, SkillCategory, SkillScore, Stage, StageResult,
    StageStatus,
};

// =============================================================================
// RE-EXPORTS: Progression Engine
// =============================================================================

pub use catalog::{StageCatalog, StageInfo, compute_predecessor};
pub use ledger::ProgressLedger;
pub use progression::{
    JourneyEvaluator, JourneyOverview, StageView, compute_overall_progress,
    compute_skill_practice_targets, compute_stage_status,
};
pub use skills::{
    FirstTip, FocusedImprovement, PracticeTarget, RotatingTip, ScoreBreakdown, SkillProfile,
    TipSelector, focused_improvement, improvement_tip,
};

// =============================================================================
// RE-EXPORTS: Preparation & Storage
// =============================================================================

pub use checklist::{ChecklistItem, EXPERT_TIPS, PreparationChecklist};
pub use preparation::{PreparationArea, PreparationProgress, QuizOutcome};
pub use session::{ProgressStore, SessionRecord, StorageBackend};
pub use storage::RedbStore;

// =============================================================================
// RE-EXPORTS: Formats (from formats module)
// =============================================================================

pub use formats::{
    MAX_PERSISTENCE_PAYLOAD_SIZE, PersistenceHeader, record_from_bytes, record_to_bytes, snapshot_from_bytes,
    snapshot_to_bytes,
};
