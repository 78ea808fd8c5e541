//! # API Endpoint Handlers
//!
//! This module implements the actual HTTP endpoint handlers.
//!
//! Every journey response is built from one record loaded under a single
//! lock acquisition. Mutations load, apply and save while holding the
//! write lock.

use super::{
    AppState,
    types::{
        BreakdownQuery, BreakdownResponse, CatalogResponse, ChecklistRequest, ChecklistResponse,
        DeleteResponse, ExerciseRequest,
        ExerciseResponse, ExportResponse, HealthResponse, JourneyResponse, PreparationResponse,
        QuizRequest, QuizResponse, RecordResultRequest, SessionsResponse, SetCompanyRequest,
        SetCurrentRequest, SkillJson, SkillsResponse, StageInfoJson, StageResponse,
        TargetsQuery, TargetsResponse,
    },
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use casepath_core::{
    CasepathError, ChecklistItem, CompanyPath, PreparationArea, SessionId, SessionRecord, SkillCategory,
    SkillProfile, Stage, record_to_bytes, skills::score_breakdown,
    primitives::MAX_SKILL_SCORE,
};
use std::str::FromStr;

// =============================================================================
// ERROR MAPPING
// =============================================================================

/// HTTP status for a core error.
fn error_status(error: &CasepathError) -> StatusCode {
    match error {
        CasepathError::SessionNotFound(_) => StatusCode::NOT_FOUND,
        CasepathError::IoError(_)
        | CasepathError::SerializationError(_)
        | CasepathError::DeserializationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::BAD_REQUEST,
    }
}

/// Log server-side failures; client mistakes only at debug.
fn log_error(context: &str, error: &CasepathError) {
    if error_status(error).is_server_error() {
        tracing::error!("{} failed: {}", context, error);
    } else {
        tracing::debug!("{} rejected: {}", context, error);
    }
}

// =============================================================================
// RECORD ACCESS
// =============================================================================

/// Load one record (or a fresh one) under a single read lock.
async fn read_record(state: &AppState, raw_id: &str) -> Result<SessionRecord, CasepathError> {
    let id = SessionId::new(raw_id)?;
    let store = state.store.read().await;
    store.load_or_default(&id)
}

/// Load, mutate and save one record under a single write lock.
///
/// A failed snapshot write leaves the store as it was before the call.
async fn update_record<T>(
    state: &AppState,
    raw_id: &str,
    apply: impl FnOnce(&mut SessionRecord) -> Result<T, CasepathError>,
) -> Result<(SessionRecord, T), CasepathError> {
    let id = SessionId::new(raw_id)?;
    let mut store = state.store.write().await;
    let previous = store.load(&id)?;
    let mut record = previous
        .clone()
        .unwrap_or_else(|| SessionRecord::new(id.clone()));
    let value = apply(&mut record)?;
    store.save(&record)?;
    state.persist(&mut store, &id, previous)?;
    Ok((record, value))
}

fn journey_of(state: &AppState, record: &SessionRecord) -> JourneyResponse {
    let overview = record.overview(state.coach.evaluator());
    JourneyResponse::success(record.session_id.as_str(), record.company, &overview)
}

fn journey_result(
    state: &AppState,
    context: &str,
    result: Result<SessionRecord, CasepathError>,
) -> (StatusCode, Json<JourneyResponse>) {
    match result {
        Ok(record) => (StatusCode::OK, Json(journey_of(state, &record))),
        Err(e) => {
            log_error(context, &e);
            (error_status(&e), Json(JourneyResponse::error(e.to_string())))
        }
    }
}

// =============================================================================
// STATIC CATALOG HANDLERS
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

/// Stage sequence served by this instance.
pub async fn catalog_handler(State(state): State<AppState>) -> impl IntoResponse {
    let response = CatalogResponse {
        success: true,
        stages: state
            .coach
            .catalog()
            .infos()
            .into_iter()
            .map(StageInfoJson::from)
            .collect(),
    };
    (StatusCode::OK, Json(response))
}

/// All skill categories.
pub async fn skills_handler() -> impl IntoResponse {
    let response = SkillsResponse {
        success: true,
        skills: SkillProfile::all().into_iter().map(SkillJson::from).collect(),
    };
    (StatusCode::OK, Json(response))
}

/// Breakdown of one category around an optional overall score.
pub async fn breakdown_handler(
    Path(category): Path<String>,
    Query(query): Query<BreakdownQuery>,
) -> impl IntoResponse {
    let category = match SkillCategory::from_str(&category) {
        Ok(c) => c,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(BreakdownResponse::error(e.to_string())),
            );
        }
    };

    let overall = query.score.unwrap_or(0);
    if overall > MAX_SKILL_SCORE {
        let e = CasepathError::InvalidScore {
            category,
            score: overall,
        };
        return (
            StatusCode::BAD_REQUEST,
            Json(BreakdownResponse::error(e.to_string())),
        );
    }

    let breakdown = score_breakdown(category, overall);
    (StatusCode::OK, Json(BreakdownResponse::success(&breakdown)))
}

// =============================================================================
// SESSION HANDLERS
// =============================================================================

/// Stored session ids.
pub async fn list_sessions_handler(State(state): State<AppState>) -> impl IntoResponse {
    let store = state.store.read().await;
    match store.session_ids() {
        Ok(ids) => (
            StatusCode::OK,
            Json(SessionsResponse {
                success: true,
                sessions: ids.into_iter().map(String::from).collect(),
                error: None,
            }),
        ),
        Err(e) => {
            log_error("List sessions", &e);
            (
                error_status(&e),
                Json(SessionsResponse {
                    success: false,
                    sessions: vec![],
                    error: Some(e.to_string()),
                }),
            )
        }
    }
}

/// Forget a session entirely.
pub async fn delete_session_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let result = async {
        let id = SessionId::new(id)?;
        let mut store = state.store.write().await;
        let Some(previous) = store.load(&id)? else {
            return Err(CasepathError::SessionNotFound(id.to_string()));
        };
        store.remove(&id)?;
        state.persist(&mut store, &id, Some(previous))?;
        tracing::info!("Deleted session {}", id);
        Ok::<(), CasepathError>(())
    }
    .await;

    match result {
        Ok(()) => (
            StatusCode::OK,
            Json(DeleteResponse {
                success: true,
                error: None,
            }),
        ),
        Err(e) => {
            log_error("Delete session", &e);
            (
                error_status(&e),
                Json(DeleteResponse {
                    success: false,
                    error: Some(e.to_string()),
                }),
            )
        }
    }
}

/// Statuses, progress and message for a session. Unknown sessions start fresh.
pub async fn journey_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let result = read_record(&state, &id).await;
    journey_result(&state, "Journey", result)
}

/// Append a graded result.
pub async fn record_result_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<RecordResultRequest>,
) -> impl IntoResponse {
    let result = match request.to_result() {
        Ok(r) => r,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(JourneyResponse::error(format!("Invalid result: {}", e))),
            );
        }
    };

    let catalog = state.coach.catalog().clone();
    let updated = update_record(&state, &id, |record| {
        catalog.require(result.stage())?;
        let stage = result.stage();
        let passed = result.passed();
        record.record_result(result)?;
        tracing::info!(
            session = %record.session_id,
            stage = stage.as_str(),
            passed,
            "Recorded stage result"
        );
        Ok(())
    })
    .await
    .map(|(record, ())| record);

    journey_result(&state, "Record result", updated)
}

/// Set or clear the current stage.
pub async fn set_current_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<SetCurrentRequest>,
) -> impl IntoResponse {
    let catalog = state.coach.catalog().clone();
    let updated = update_record(&state, &id, |record| {
        let stage = request
            .stage
            .as_deref()
            .map(|raw| catalog.parse_stage(raw))
            .transpose()?;
        record.set_current(&catalog, stage)
    })
    .await
    .map(|(record, ())| record);

    journey_result(&state, "Set current stage", updated)
}

/// Choose the company track.
pub async fn set_company_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<SetCompanyRequest>,
) -> impl IntoResponse {
    let updated = update_record(&state, &id, |record| {
        record.company = Some(CompanyPath::from_str(&request.company)?);
        Ok(())
    })
    .await
    .map(|(record, ())| record);

    journey_result(&state, "Set company", updated)
}

/// One stage of a session's journey.
pub async fn stage_handler(
    State(state): State<AppState>,
    Path((id, stage)): Path<(String, String)>,
) -> impl IntoResponse {
    let result = async {
        let stage = state.coach.catalog().parse_stage(&stage)?;
        let record = read_record(&state, &id).await?;
        let evaluator = state.coach.evaluator();
        let view = evaluator.stage_view(stage, record.results(), record.current_stage);
        Ok::<_, CasepathError>(StageResponse::success(
            &view,
            record.ledger.attempts(stage),
        ))
    }
    .await;

    match result {
        Ok(response) => (StatusCode::OK, Json(response)),
        Err(e) => {
            log_error("Stage view", &e);
            (error_status(&e), Json(StageResponse::error(e.to_string())))
        }
    }
}

/// Focused improvement for the latest result (optionally of one stage).
pub async fn targets_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<TargetsQuery>,
) -> impl IntoResponse {
    let result = async {
        let stage = query
            .stage
            .as_deref()
            .map(|raw| state.coach.catalog().parse_stage(raw))
            .transpose()?;
        let record = read_record(&state, &id).await?;
        let latest = match stage {
            Some(stage) => record.ledger.latest_for(stage),
            None => record.ledger.latest(),
        };
        match latest {
            Some(result) => Ok(TargetsResponse::success(
                &state.coach.focus(result, query.k)?,
            )),
            None => Ok::<_, CasepathError>(TargetsResponse::empty()),
        }
    }
    .await;

    match result {
        Ok(response) => (StatusCode::OK, Json(response)),
        Err(e) => {
            log_error("Practice targets", &e);
            (error_status(&e), Json(TargetsResponse::error(e.to_string())))
        }
    }
}

// =============================================================================
// PREPARATION HANDLERS
// =============================================================================

/// Preparation areas and progress for one stage.
pub async fn preparation_handler(
    State(state): State<AppState>,
    Path((id, stage)): Path<(String, String)>,
) -> impl IntoResponse {
    let result = async {
        let stage = state.coach.catalog().parse_stage(&stage)?;
        let record = read_record(&state, &id).await?;
        Ok::<_, CasepathError>(PreparationResponse::success(
            stage,
            &record.preparation_for(stage),
        ))
    }
    .await;

    match result {
        Ok(response) => (StatusCode::OK, Json(response)),
        Err(e) => {
            log_error("Preparation", &e);
            (
                error_status(&e),
                Json(PreparationResponse::error(e.to_string())),
            )
        }
    }
}

fn parse_stage_and_area(
    state: &AppState,
    stage: &str,
    area: &str,
) -> Result<(Stage, PreparationArea), CasepathError> {
    Ok((
        state.coach.catalog().parse_stage(stage)?,
        PreparationArea::from_str(area)?,
    ))
}

/// Grade a quiz answer.
pub async fn quiz_handler(
    State(state): State<AppState>,
    Path((id, stage)): Path<(String, String)>,
    Json(request): Json<QuizRequest>,
) -> impl IntoResponse {
    let result = async {
        let (stage, area) = parse_stage_and_area(&state, &stage, &request.area)?;
        let (_, response) = update_record(&state, &id, |record| {
            let progress = record.preparation_mut(stage);
            let outcome = progress.answer_quiz(area, &request.answer);
            Ok(QuizResponse::success(outcome, progress.overall_percent()))
        })
        .await?;
        Ok::<_, CasepathError>(response)
    }
    .await;

    match result {
        Ok(response) => (StatusCode::OK, Json(response)),
        Err(e) => {
            log_error("Quiz", &e);
            (error_status(&e), Json(QuizResponse::error(e.to_string())))
        }
    }
}

/// Mark an exercise as completed.
pub async fn exercise_handler(
    State(state): State<AppState>,
    Path((id, stage)): Path<(String, String)>,
    Json(request): Json<ExerciseRequest>,
) -> impl IntoResponse {
    let result = async {
        let (stage, area) = parse_stage_and_area(&state, &stage, &request.area)?;
        let (_, response) = update_record(&state, &id, |record| {
            let progress = record.preparation_mut(stage);
            let awarded = progress.complete_exercise(area);
            Ok(ExerciseResponse::success(
                awarded,
                progress.area_percent(area),
                progress.overall_percent(),
            ))
        })
        .await?;
        Ok::<_, CasepathError>(response)
    }
    .await;

    match result {
        Ok(response) => (StatusCode::OK, Json(response)),
        Err(e) => {
            log_error("Exercise", &e);
            (error_status(&e), Json(ExerciseResponse::error(e.to_string())))
        }
    }
}

// =============================================================================
// CHECKLIST HANDLERS
// =============================================================================

fn checklist_result(
    context: &str,
    result: Result<ChecklistResponse, CasepathError>,
) -> (StatusCode, Json<ChecklistResponse>) {
    match result {
        Ok(response) => (StatusCode::OK, Json(response)),
        Err(e) => {
            log_error(context, &e);
            (error_status(&e), Json(ChecklistResponse::error(e.to_string())))
        }
    }
}

/// Checklist and expert tips for one stage.
pub async fn checklist_handler(
    State(state): State<AppState>,
    Path((id, stage)): Path<(String, String)>,
) -> impl IntoResponse {
    let result = async {
        let stage = state.coach.catalog().parse_stage(&stage)?;
        let record = read_record(&state, &id).await?;
        Ok::<_, CasepathError>(ChecklistResponse::success(
            stage,
            &record.checklist_for(stage),
        ))
    }
    .await;
    checklist_result("Checklist", result)
}

/// Check, uncheck or flip one checklist item.
pub async fn update_checklist_handler(
    State(state): State<AppState>,
    Path((id, stage)): Path<(String, String)>,
    Json(request): Json<ChecklistRequest>,
) -> impl IntoResponse {
    let result = async {
        let stage = state.coach.catalog().parse_stage(&stage)?;
        let item = ChecklistItem::from_str(&request.item)?;
        let (_, response) = update_record(&state, &id, |record| {
            let checklist = record.checklist_mut(stage);
            match request.checked {
                Some(checked) => {
                    checklist.set(item, checked);
                }
                None => {
                    checklist.toggle(item);
                }
            }
            Ok(ChecklistResponse::success(stage, checklist))
        })
        .await?;
        Ok::<_, CasepathError>(response)
    }
    .await;
    checklist_result("Update checklist", result)
}

// =============================================================================
// EXPORT HANDLER
// =============================================================================

/// Export one session record in the binary persistence format.
pub async fn export_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let result = async {
        let id = SessionId::new(id)?;
        let store = state.store.read().await;
        let record = store.require(&id)?;
        Ok::<_, CasepathError>(record_to_bytes(&record)?)
    }
    .await;

    match result {
        Ok(data) => (StatusCode::OK, Json(ExportResponse::success(&data))),
        Err(e) => {
            log_error("Export", &e);
            (error_status(&e), Json(ExportResponse::error(e.to_string())))
        }
    }
}
