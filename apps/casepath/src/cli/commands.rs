//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use super::{Context, ExportFormat};
use crate::api::{self, AppState};
use crate::config::Backend;
use crate::store::{MAX_IMPORT_FILE_SIZE, flush_store, open_store, validate_file_size};
use casepath_core::{
    CasepathError, ChecklistItem, CompanyPath, EXPERT_TIPS, JourneyOverview, PreparationArea,
    PreparationChecklist, ProgressStore, SessionRecord, SkillCategory, SkillProfile, SkillScore,
    StageResult, record_from_bytes, record_to_bytes, skills::score_breakdown,
};
use serde::Serialize;
use std::path::{Path, PathBuf};

// =============================================================================
// PATH VALIDATION
// =============================================================================

/// Validate an input file path.
///
/// Canonicalizes the path to resolve symlinks and "..", then ensures it
/// names an existing regular file.
fn validate_file_path(path: &Path) -> Result<PathBuf, CasepathError> {
    let canonical = path.canonicalize().map_err(|e| {
        CasepathError::IoError(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(CasepathError::IoError(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

/// Validate an output path: the parent directory must exist.
fn validate_output_path(path: &Path) -> Result<PathBuf, CasepathError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let canonical_parent = parent.canonicalize().map_err(|e| {
        CasepathError::IoError(format!(
            "Invalid output directory '{}': {}",
            parent.display(),
            e
        ))
    })?;

    let filename = path.file_name().ok_or_else(|| {
        CasepathError::IoError(format!("Invalid output filename: {}", path.display()))
    })?;

    Ok(canonical_parent.join(filename))
}

// =============================================================================
// HELPERS
// =============================================================================

fn print_json<T: Serialize>(value: &T) -> Result<(), CasepathError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| CasepathError::SerializationError(e.to_string()))?;
    println!("{}", text);
    Ok(())
}

/// Load the context session, apply `change`, save and flush.
fn update_session<T>(
    ctx: &Context,
    change: impl FnOnce(&mut SessionRecord) -> Result<T, CasepathError>,
) -> Result<(SessionRecord, T), CasepathError> {
    let mut store = open_store(&ctx.db_path, ctx.backend)?;
    let mut record = store.load_or_default(&ctx.session)?;
    let value = change(&mut record)?;
    store.save(&record)?;
    flush_store(&store, &ctx.db_path)?;
    Ok((record, value))
}

fn load_session(ctx: &Context) -> Result<SessionRecord, CasepathError> {
    open_store(&ctx.db_path, ctx.backend)?.load_or_default(&ctx.session)
}

/// Parse `category=score`.
fn parse_score(raw: &str) -> Result<SkillScore, CasepathError> {
    let (category, score) = raw.split_once('=').ok_or_else(|| {
        CasepathError::InvalidInput(format!("Expected category=score, got '{}'", raw))
    })?;
    let category: SkillCategory = category.trim().parse()?;
    let score: u8 = score.trim().parse().map_err(|_| {
        CasepathError::InvalidInput(format!("Score for {} is not a number: '{}'", category, score))
    })?;
    SkillScore::new(category, score)
}

fn print_overview(record: &SessionRecord, overview: &JourneyOverview, detailed: bool) {
    println!("Journey: {}", record.session_id);
    if let Some(company) = record.company {
        println!("Company: {}", company.name());
    }
    println!(
        "Progress: {}/{} stages ({}%)",
        overview.completed, overview.total, overview.percent
    );
    println!("{}", overview.message);
    println!();

    for view in &overview.stages {
        let marker = if overview.current == Some(view.stage) {
            ">"
        } else {
            " "
        };
        println!("{} [{:<11}] {}", marker, view.label, view.name);
        if detailed {
            println!("      {}", view.description);
            println!("      {}", view.hint);
            if let Some(result) = &view.result {
                for skill in result.skills() {
                    println!("      {:<24} {:>3}", skill.category.as_str(), skill.score);
                }
            }
            if !view.recommended_practice.is_empty() {
                let names: Vec<&str> = view
                    .recommended_practice
                    .iter()
                    .map(|c| c.as_str())
                    .collect();
                println!("      Practice next: {}", names.join(", "));
            }
        }
    }

    println!();
    match overview.next_stage {
        Some(stage) if !overview.is_complete => println!("Next up: {}", stage.name()),
        _ => println!("Every stage passed."),
    }
}

// =============================================================================
// SERVER COMMAND
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_server(
    ctx: &Context,
    host: Option<String>,
    port: Option<u16>,
) -> Result<(), CasepathError> {
    let host = host.unwrap_or_else(|| ctx.config.server.host.clone());
    let port = port.unwrap_or(ctx.config.server.port);
    let store = open_store(&ctx.db_path, ctx.backend)?;

    println!("Casepath Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Host:     {}", host);
    println!("  Port:     {}", port);
    println!("  Backend:  {}", ctx.backend.as_str());
    println!("  Database: {:?}", ctx.db_path);
    println!("  Stages:   {}", ctx.coach.catalog().len());
    println!();
    println!("Endpoints:");
    println!("  GET  /health                        - Health check");
    println!("  GET  /catalog                       - Stage sequence");
    println!("  GET  /sessions/{{id}}/journey         - Journey overview");
    println!("  POST /sessions/{{id}}/results         - Record a stage result");
    println!("  GET  /sessions/{{id}}/targets         - Skills to practice");
    println!("  GET  /sessions/{{id}}/preparation/... - Preparation areas");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    let mut state = AppState::new(store).with_coach(ctx.coach.clone());
    if ctx.backend == Backend::File {
        state = state.with_snapshot_path(ctx.db_path.clone());
    }

    let addr = format!("{}:{}", host, port);
    api::run_server(&addr, state).await
}

// =============================================================================
// INIT COMMAND
// =============================================================================

/// Initialize a new empty database.
pub fn cmd_init(ctx: &Context, force: bool) -> Result<(), CasepathError> {
    if ctx.db_path.exists() {
        if !force {
            return Err(CasepathError::InvalidInput(
                "Database already exists. Use --force to overwrite.".to_string(),
            ));
        }
        std::fs::remove_file(&ctx.db_path)
            .map_err(|e| CasepathError::IoError(format!("Remove db: {}", e)))?;
    }

    match ctx.backend {
        Backend::Redb => {
            let _store = ProgressStore::with_redb(&ctx.db_path)?;
            println!("Initialized new redb database at {:?}", ctx.db_path);
        }
        Backend::File => {
            flush_store(&ProgressStore::new(), &ctx.db_path)?;
            println!("Initialized new file database at {:?}", ctx.db_path);
        }
    }

    Ok(())
}

// =============================================================================
// JOURNEY COMMAND
// =============================================================================

/// Show stage statuses and overall progress.
pub fn cmd_journey(ctx: &Context, detailed: bool) -> Result<(), CasepathError> {
    let record = load_session(ctx)?;
    let overview = record.overview(ctx.coach.evaluator());

    if ctx.json_mode {
        return print_json(&serde_json::json!({
            "session_id": record.session_id,
            "company": record.company,
            "journey": overview,
        }));
    }

    print_overview(&record, &overview, detailed);
    Ok(())
}

// =============================================================================
// RECORD COMMAND
// =============================================================================

/// Record a graded stage result and show what to practice next.
pub fn cmd_record(
    ctx: &Context,
    stage: &str,
    passed: bool,
    scores: &[String],
    feedback: String,
    improvements: Vec<String>,
) -> Result<(), CasepathError> {
    let stage = ctx.coach.catalog().parse_stage(stage)?;
    let skills = scores
        .iter()
        .map(|raw| parse_score(raw))
        .collect::<Result<Vec<_>, _>>()?;
    let result =
        StageResult::with_improvement_areas(stage, passed, skills, feedback, improvements)?;
    let focus = ctx.coach.focus(&result, None)?;

    let (record, ()) = update_session(ctx, |record| record.record_result(result))?;
    let overview = record.overview(ctx.coach.evaluator());
    tracing::info!(
        "Recorded {} ({}) for session {}",
        stage,
        if passed { "passed" } else { "not passed" },
        record.session_id
    );

    if ctx.json_mode {
        return print_json(&serde_json::json!({
            "recorded": stage,
            "passed": passed,
            "attempts": record.ledger.attempts(stage),
            "percent": overview.percent,
            "message": overview.message,
            "focus": focus,
        }));
    }

    println!(
        "Recorded {} as {} (attempt {})",
        stage.name(),
        if passed { "passed" } else { "not passed" },
        record.ledger.attempts(stage)
    );
    println!("{}", overview.message);
    if !focus.targets.is_empty() {
        println!();
        println!("Focus next on:");
        for target in &focus.targets {
            match target.score {
                Some(score) => println!("  {} ({}): {}", target.name, score, target.tip),
                None => println!("  {}: {}", target.name, target.tip),
            }
        }
    }
    Ok(())
}

// =============================================================================
// CURRENT COMMAND
// =============================================================================

/// Show, set or clear the externally designated current stage.
pub fn cmd_current(ctx: &Context, stage: Option<&str>, clear: bool) -> Result<(), CasepathError> {
    let record = match (stage, clear) {
        (Some(raw), _) => {
            let stage = ctx.coach.catalog().parse_stage(raw)?;
            let catalog = ctx.coach.catalog();
            update_session(ctx, |record| record.set_current(catalog, Some(stage)))?.0
        }
        (None, true) => {
            let catalog = ctx.coach.catalog();
            update_session(ctx, |record| record.set_current(catalog, None))?.0
        }
        (None, false) => load_session(ctx)?,
    };

    if ctx.json_mode {
        return print_json(&serde_json::json!({
            "session_id": record.session_id,
            "current_stage": record.current_stage,
        }));
    }

    match record.current_stage {
        Some(stage) => println!("Current stage: {}", stage.name()),
        None => println!("No current stage set"),
    }
    Ok(())
}

// =============================================================================
// COMPANY COMMAND
// =============================================================================

/// Choose a company track.
pub fn cmd_company(ctx: &Context, company: &str) -> Result<(), CasepathError> {
    let company: CompanyPath = company.parse()?;
    let (record, ()) = update_session(ctx, |record| {
        record.company = Some(company);
        Ok(())
    })?;

    if ctx.json_mode {
        return print_json(&serde_json::json!({
            "session_id": record.session_id,
            "company": company,
        }));
    }

    println!("Company track set to {}", company.name());
    Ok(())
}

// =============================================================================
// TARGETS COMMAND
// =============================================================================

/// Show the weakest skills of the latest result with tips.
pub fn cmd_targets(
    ctx: &Context,
    stage: Option<&str>,
    k: Option<usize>,
) -> Result<(), CasepathError> {
    let record = load_session(ctx)?;
    let latest = match stage {
        Some(raw) => {
            let stage = ctx.coach.catalog().parse_stage(raw)?;
            record.ledger.latest_for(stage)
        }
        None => record.ledger.latest(),
    };

    let Some(result) = latest else {
        if ctx.json_mode {
            return print_json(&serde_json::json!({ "targets": [] }));
        }
        println!("No results recorded yet.");
        return Ok(());
    };

    let focus = ctx.coach.focus(result, k)?;
    if ctx.json_mode {
        return print_json(&focus);
    }

    println!(
        "Based on {} ({}):",
        focus.stage.name(),
        if focus.passed { "passed" } else { "not passed" }
    );
    if focus.targets.is_empty() {
        println!("  No skill scores on this result.");
    }
    for (rank, target) in focus.targets.iter().enumerate() {
        let score = target
            .score
            .map_or_else(|| "-".to_string(), |s| s.to_string());
        println!("  {}. {:<24} {:>3}  {}", rank + 1, target.name, score, target.tip);
    }
    Ok(())
}

// =============================================================================
// PREPARE COMMAND
// =============================================================================

/// Show preparation areas, or answer a quiz / finish an exercise.
pub fn cmd_prepare(
    ctx: &Context,
    stage: &str,
    area: Option<&str>,
    answer: Option<&str>,
    exercise: bool,
) -> Result<(), CasepathError> {
    let stage = ctx.coach.catalog().parse_stage(stage)?;
    let area = area.map(str::parse::<PreparationArea>).transpose()?;

    match (area, answer) {
        (Some(area), Some(answer)) => {
            let (record, outcome) = update_session(ctx, |record| {
                Ok(record.preparation_mut(stage).answer_quiz(area, answer))
            })?;
            if ctx.json_mode {
                return print_json(&serde_json::json!({
                    "stage": stage,
                    "area": area,
                    "outcome": outcome,
                    "overall_percent": record.preparation_for(stage).overall_percent(),
                }));
            }
            println!("{}", outcome.feedback);
            println!("{}: {}%", area.title(), outcome.area_percent);
            return Ok(());
        }
        (Some(area), None) if exercise => {
            let (record, awarded) = update_session(ctx, |record| {
                Ok(record.preparation_mut(stage).complete_exercise(area))
            })?;
            let progress = record.preparation_for(stage);
            if ctx.json_mode {
                return print_json(&serde_json::json!({
                    "stage": stage,
                    "area": area,
                    "awarded": awarded,
                    "area_percent": progress.area_percent(area),
                    "overall_percent": progress.overall_percent(),
                }));
            }
            if awarded == 0 {
                println!("Exercise for {} was already completed.", area.title());
            } else {
                println!("Exercise completed: +{}%", awarded);
            }
            println!("{}: {}%", area.title(), progress.area_percent(area));
            return Ok(());
        }
        _ => {}
    }

    let progress = load_session(ctx)?.preparation_for(stage);
    let areas: Vec<PreparationArea> = match area {
        Some(area) => vec![area],
        None => PreparationArea::ALL.to_vec(),
    };

    if ctx.json_mode {
        let areas: Vec<_> = areas
            .iter()
            .map(|a| {
                serde_json::json!({
                    "area": a,
                    "content": a.content(),
                    "percent": progress.area_percent(*a),
                    "quiz_passed": progress.quiz_passed(*a),
                    "exercise_completed": progress.exercise_completed(*a),
                })
            })
            .collect();
        return print_json(&serde_json::json!({
            "stage": stage,
            "overall_percent": progress.overall_percent(),
            "ready": progress.is_ready(),
            "areas": areas,
        }));
    }

    println!(
        "Preparing for {}: {}% overall",
        stage.name(),
        progress.overall_percent()
    );
    for a in areas {
        let content = a.content();
        println!();
        println!("{} ({}%)", content.title, progress.area_percent(a));
        if area.is_some() {
            println!("  {}", content.text);
            println!();
            println!("  Quiz: {}", content.quiz.question);
            for option in content.quiz.options {
                println!("    - {}", option);
            }
            println!("  Exercise: {}", content.exercise.instruction);
            println!("  Hint: {}", content.exercise.hint);
        } else {
            println!(
                "  quiz: {}  exercise: {}",
                if progress.quiz_passed(a) { "done" } else { "open" },
                if progress.exercise_completed(a) { "done" } else { "open" }
            );
        }
    }
    println!();
    println!("{}", progress.start_label());
    Ok(())
}

// =============================================================================
// CHECKLIST COMMAND
// =============================================================================

/// Item names from `checklist --check/--uncheck/--toggle`.
#[derive(Debug, Default)]
pub struct ChecklistEdits {
    pub check: Vec<String>,
    pub uncheck: Vec<String>,
    pub toggle: Vec<String>,
}

impl ChecklistEdits {
    fn is_empty(&self) -> bool {
        self.check.is_empty() && self.uncheck.is_empty() && self.toggle.is_empty()
    }

    /// Apply checks, then unchecks, then toggles. Nothing changes if any name is unknown.
    fn apply(&self, checklist: &mut PreparationChecklist) -> Result<(), CasepathError> {
        let parse = |names: &[String]| -> Result<Vec<ChecklistItem>, CasepathError> {
            names.iter().map(|n| n.trim().parse()).collect()
        };
        let (check, uncheck, toggle) =
            (parse(&self.check)?, parse(&self.uncheck)?, parse(&self.toggle)?);

        for item in check {
            checklist.set(item, true);
        }
        for item in uncheck {
            checklist.set(item, false);
        }
        for item in toggle {
            checklist.toggle(item);
        }
        Ok(())
    }
}

/// Show the checklist for a stage, applying any edits first.
pub fn cmd_checklist(
    ctx: &Context,
    stage: &str,
    edits: &ChecklistEdits,
    tips: bool,
) -> Result<(), CasepathError> {
    let stage = ctx.coach.catalog().parse_stage(stage)?;
    let checklist = if edits.is_empty() {
        load_session(ctx)?.checklist_for(stage)
    } else {
        let (_, checklist) = update_session(ctx, |record| {
            let checklist = record.checklist_mut(stage);
            edits.apply(checklist)?;
            Ok(checklist.clone())
        })?;
        tracing::debug!(stage = stage.as_str(), percent = checklist.percent(), "Checklist updated");
        checklist
    };

    if ctx.json_mode {
        let tip_list: &[&str] = if tips { &EXPERT_TIPS } else { &[] };
        let items: Vec<_> = ChecklistItem::ALL
            .iter()
            .map(|item| {
                serde_json::json!({
                    "item": item,
                    "label": item.label(),
                    "checked": checklist.is_checked(*item),
                })
            })
            .collect();
        return print_json(&serde_json::json!({
            "stage": stage,
            "items": items,
            "percent": checklist.percent(),
            "ready": checklist.is_ready(),
            "start_label": checklist.start_label(),
            "tips": tip_list,
        }));
    }

    println!("Preparing for {}: {}% Complete", stage.name(), checklist.percent());
    for item in ChecklistItem::ALL {
        let mark = if checklist.is_checked(item) { "x" } else { " " };
        println!("  [{}] {:<21} {}", mark, item.as_str(), item.label());
    }
    if tips {
        println!();
        println!("Expert tips:");
        for tip in EXPERT_TIPS {
            println!("  - {}", tip);
        }
    }
    println!();
    println!("{}", checklist.start_label());
    Ok(())
}

// =============================================================================
// SKILLS COMMAND
// =============================================================================

/// Describe every skill category, or break one down.
pub fn cmd_skills(
    ctx: &Context,
    category: Option<&str>,
    score: Option<u8>,
) -> Result<(), CasepathError> {
    let Some(raw) = category else {
        let profiles = SkillProfile::all();
        if ctx.json_mode {
            return print_json(&profiles);
        }
        for profile in profiles {
            println!("{} ({})", profile.name, profile.category);
            println!("  {}", profile.description);
            for tip in profile.tips {
                println!("  - {}", tip);
            }
            println!();
        }
        return Ok(());
    };

    let category: SkillCategory = raw.parse()?;
    let score = score.unwrap_or(0);
    if score > 100 {
        return Err(CasepathError::InvalidScore { category, score });
    }
    let breakdown = score_breakdown(category, score);

    if ctx.json_mode {
        return print_json(&breakdown);
    }

    println!("{}: {}/100", breakdown.title, breakdown.overall);
    for metric in &breakdown.metrics {
        println!("  {:<28} {:>3}  {}", metric.name, metric.score, metric.description);
    }
    println!();
    println!("{}", breakdown.methodology);
    Ok(())
}

// =============================================================================
// SESSIONS COMMAND
// =============================================================================

/// List stored sessions.
pub fn cmd_sessions(ctx: &Context) -> Result<(), CasepathError> {
    let store = open_store(&ctx.db_path, ctx.backend)?;
    let ids = store.session_ids()?;

    if ctx.json_mode {
        return print_json(&serde_json::json!({ "sessions": ids }));
    }

    if ids.is_empty() {
        println!("No sessions stored.");
    }
    for id in ids {
        println!("{}", id);
    }
    Ok(())
}

// =============================================================================
// EXPORT COMMAND
// =============================================================================

/// Export the context session to a file.
pub fn cmd_export(ctx: &Context, output: &Path, format: ExportFormat) -> Result<(), CasepathError> {
    let validated_output = validate_output_path(output)?;
    let record = open_store(&ctx.db_path, ctx.backend)?.require(&ctx.session)?;

    let data = match format {
        ExportFormat::Binary => record_to_bytes(&record)?,
        ExportFormat::Json => serde_json::to_vec_pretty(&record)
            .map_err(|e| CasepathError::SerializationError(e.to_string()))?,
    };

    std::fs::write(&validated_output, &data)
        .map_err(|e| CasepathError::IoError(format!("Write file: {}", e)))?;

    println!("Exported {} bytes to {:?}", data.len(), validated_output);
    Ok(())
}

// =============================================================================
// IMPORT COMMAND
// =============================================================================

/// Import a binary session record, replacing any session with the same id.
pub fn cmd_import(ctx: &Context, input: &Path) -> Result<(), CasepathError> {
    let validated_path = validate_file_path(input)?;
    validate_file_size(&validated_path, MAX_IMPORT_FILE_SIZE)?;

    let data = std::fs::read(&validated_path)
        .map_err(|e| CasepathError::IoError(format!("Read file: {}", e)))?;
    let record = record_from_bytes(&data)?;

    let mut store = open_store(&ctx.db_path, ctx.backend)?;
    store.save(&record)?;
    flush_store(&store, &ctx.db_path)?;

    println!(
        "Imported session {}: {} results",
        record.session_id,
        record.ledger.len()
    );
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use casepath_core::Stage;

    #[test]
    fn parse_score_accepts_category_pairs() {
        let score = parse_score("creativity = 75").expect("parse");
        assert_eq!(score.category, SkillCategory::Creativity);
        assert_eq!(score.score, 75);
    }

    #[test]
    fn parse_score_rejects_malformed_input() {
        assert!(parse_score("creativity").is_err());
        assert!(parse_score("creativity=high").is_err());
        assert!(parse_score("charisma=50").is_err());
        assert!(parse_score("creativity=101").is_err());
    }

    fn file_context(dir: &Path) -> Context {
        Context {
            db_path: dir.join("casepath.dat"),
            backend: Backend::File,
            coach: crate::config::Coach::default(),
            session: casepath_core::SessionId::new("cli").expect("id"),
            json_mode: true,
            verbose: false,
            config: crate::config::CasepathConfig::default(),
        }
    }

    fn names(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn checklist_edits_apply_in_order() {
        let mut checklist = PreparationChecklist::new();
        let edits = ChecklistEdits {
            check: names(&["frameworks", "mental_math"]),
            uncheck: names(&["frameworks"]),
            toggle: names(&["industry_trends"]),
        };
        edits.apply(&mut checklist).expect("apply");

        assert!(!checklist.is_checked(ChecklistItem::Frameworks));
        assert!(checklist.is_checked(ChecklistItem::MentalMath));
        assert!(checklist.is_checked(ChecklistItem::IndustryTrends));
        assert_eq!(checklist.percent(), 50);
    }

    #[test]
    fn checklist_edits_reject_unknown_item_atomically() {
        let mut checklist = PreparationChecklist::new();
        let edits = ChecklistEdits {
            check: names(&["frameworks"]),
            toggle: names(&["networking"]),
            ..ChecklistEdits::default()
        };
        assert!(edits.apply(&mut checklist).is_err());
        assert_eq!(checklist.checked_count(), 0);
    }

    #[test]
    fn checklist_command_persists_and_unchecks() {
        let dir = tempfile::tempdir().expect("tempdir");
        let ctx = file_context(dir.path());

        let all = ChecklistEdits {
            check: ChecklistItem::ALL.iter().map(|i| i.as_str().to_string()).collect(),
            ..ChecklistEdits::default()
        };
        cmd_checklist(&ctx, "case_1", &all, false).expect("check all");
        assert!(load_session(&ctx).expect("load").checklist_for(Stage::Case1).is_ready());

        let undo = ChecklistEdits {
            uncheck: names(&["mental_math"]),
            ..ChecklistEdits::default()
        };
        cmd_checklist(&ctx, "case_1", &undo, true).expect("uncheck");
        let checklist = load_session(&ctx).expect("load").checklist_for(Stage::Case1);
        assert_eq!(checklist.percent(), 75);
        assert!(!checklist.is_ready());

        assert!(cmd_checklist(&ctx, "case_9", &undo, false).is_err());
    }

    #[test]
    fn output_path_requires_existing_parent() {
        assert!(validate_output_path(Path::new("/definitely/not/here/out.bin")).is_err());
        assert!(validate_output_path(Path::new("out.bin")).is_ok());
    }

    #[test]
    fn file_path_must_be_regular_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(validate_file_path(dir.path()).is_err());
        let file = dir.path().join("record.bin");
        std::fs::write(&file, b"x").expect("write");
        assert!(validate_file_path(&file).is_ok());
    }
}
