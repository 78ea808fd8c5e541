//! # Casepath HTTP API Module
//!
//! This module implements the HTTP REST API server using axum.
//!
//! ## Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /catalog` - Stage sequence with display copy
//! - `GET /skills` - Skill categories with descriptions and tips
//! - `GET /skills/{category}/breakdown` - Metric breakdown for a category
//! - `GET /sessions` - Stored session ids
//! - `GET /sessions/{id}/journey` - Statuses, progress and message
//! - `DELETE /sessions/{id}` - Forget a session
//! - `POST /sessions/{id}/results` - Record a graded stage result
//! - `PUT /sessions/{id}/current` - Set or clear the current stage
//! - `PUT /sessions/{id}/company` - Choose a company track
//! - `GET /sessions/{id}/stages/{stage}` - One stage view
//! - `GET /sessions/{id}/targets` - Focused improvement for the latest result
//! - `GET /sessions/{id}/preparation/{stage}` - Preparation areas and progress
//! - `POST /sessions/{id}/preparation/{stage}/quiz` - Answer an area quiz
//! - `POST /sessions/{id}/preparation/{stage}/exercise` - Complete an area exercise
//! - `GET /sessions/{id}/checklist/{stage}` - Preparation checklist and expert tips
//! - `PUT /sessions/{id}/checklist/{stage}` - Check, uncheck or flip a checklist item
//! - `POST /sessions/{id}/export` - Export a session record (base64)
//!
//! ## Security Configuration (Environment Variables)
//!
//! - `CASEPATH_CORS_ORIGINS`: Comma-separated list of allowed origins, or "*" for all (default: localhost only)
//! - `CASEPATH_RATE_LIMIT`: Requests per second (default: 100, 0 to disable)
//! - `CASEPATH_API_KEY`: If set, requires Bearer token authentication

mod auth;
mod handlers;
mod middleware;
mod types;

// Re-exports for external use
pub use auth::get_api_key_from_env;
pub use middleware::{create_rate_limiter, get_rate_limit_from_env};
pub use types::{
    AreaJson, BreakdownQuery, BreakdownResponse, CatalogResponse, ChecklistItemJson,
    ChecklistRequest, ChecklistResponse, DeleteResponse,
    ExerciseRequest, ExerciseResponse, ExportResponse, HealthResponse, JourneyResponse,
    MetricJson, PracticeTargetJson, PreparationResponse, QuizRequest, QuizResponse,
    RecordResultRequest, ResultJson, SessionsResponse, SetCompanyRequest, SetCurrentRequest,
    SkillJson, SkillScoreJson, SkillsResponse, StageInfoJson, StageResponse, StageViewJson,
    TargetsQuery, TargetsResponse,
};

use crate::config::Coach;
use crate::store::flush_store;
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{get, post, put},
};
use casepath_core::{CasepathError, ProgressStore, SessionId, SessionRecord};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state containing the progress store.
#[derive(Clone)]
pub struct AppState {
    /// Every session record, behind one lock so journeys are never torn.
    pub store: Arc<RwLock<ProgressStore>>,
    /// Catalog and coaching preferences.
    pub coach: Arc<Coach>,
    /// Snapshot file rewritten after each change (file backend only).
    pub snapshot_path: Option<Arc<PathBuf>>,
}

impl AppState {
    /// Create new app state with a store and default coaching.
    #[must_use]
    pub fn new(store: ProgressStore) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            coach: Arc::new(Coach::default()),
            snapshot_path: None,
        }
    }

    #[must_use]
    pub fn with_coach(mut self, coach: Coach) -> Self {
        self.coach = Arc::new(coach);
        self
    }

    #[must_use]
    pub fn with_snapshot_path(mut self, path: PathBuf) -> Self {
        self.snapshot_path = Some(Arc::new(path));
        self
    }

    /// Flush the store if it is snapshot-backed. Call while holding the write lock.
    ///
    /// `previous` is the record for `id` before the change being flushed. If the
    /// snapshot cannot be written it is put back, so memory never holds a change
    /// the disk does not.
    fn persist(
        &self,
        store: &mut ProgressStore,
        id: &SessionId,
        previous: Option<SessionRecord>,
    ) -> Result<(), CasepathError> {
        let Some(path) = &self.snapshot_path else {
            return Ok(());
        };
        let Err(e) = flush_store(store, path) else {
            return Ok(());
        };

        let restored = match previous {
            Some(record) => store.save(&record),
            None => store.remove(id).map(|_| ()),
        };
        if let Err(undo) = restored {
            tracing::error!(session = %id, error = %undo, "rollback after failed flush failed");
        } else {
            tracing::warn!(session = %id, error = %e, "snapshot write failed, change rolled back");
        }
        Err(e)
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

const LOCAL_ORIGINS: [&str; 4] = [
    "http://localhost:3000",
    "http://localhost:8080",
    "http://127.0.0.1:3000",
    "http://127.0.0.1:8080",
];

/// Parse a comma-separated origin list, skipping entries that are not valid header values.
fn parse_origins(list: &str) -> Vec<HeaderValue> {
    list.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin, error = %e, "CORS: ignoring invalid origin");
                None
            }
        })
        .collect()
}

/// CORS from `CASEPATH_CORS_ORIGINS`: `*` is permissive, a list is used as given,
/// and anything else (unset or nothing valid) falls back to the local dev origins.
fn build_cors_layer() -> CorsLayer {
    let configured = std::env::var("CASEPATH_CORS_ORIGINS").ok();
    if configured.as_deref() == Some("*") {
        tracing::warn!("CORS: every origin allowed; do not run this way in production");
        return CorsLayer::permissive();
    }

    let mut origins = configured.as_deref().map(parse_origins).unwrap_or_default();
    if origins.is_empty() {
        origins = LOCAL_ORIGINS
            .iter()
            .filter_map(|o| o.parse::<HeaderValue>().ok())
            .collect();
        tracing::info!("CORS: local origins only");
    } else {
        tracing::info!(count = origins.len(), "CORS: configured origins");
    }

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. Tracing - logs all requests
/// 2. CORS - handles preflight requests
/// 3. Rate Limiting - protects against floods (if enabled)
/// 4. Authentication - validates API key (if configured)
pub fn create_router(state: AppState) -> Router {
    let cors = build_cors_layer();

    let rate_limit = get_rate_limit_from_env();
    let rate_limiter = if rate_limit > 0 {
        tracing::info!("Rate limiting enabled: {} requests/second", rate_limit);
        Some(create_rate_limiter(rate_limit))
    } else {
        tracing::info!("Rate limiting disabled");
        None
    };

    let has_auth = get_api_key_from_env().is_some();
    if has_auth {
        tracing::info!("API key authentication enabled");
    } else {
        tracing::warn!(
            "API key authentication DISABLED - all endpoints are publicly accessible! \
             Set CASEPATH_API_KEY environment variable to enable authentication."
        );
    }

    let mut router = Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/catalog", get(handlers::catalog_handler))
        .route("/skills", get(handlers::skills_handler))
        .route(
            "/skills/{category}/breakdown",
            get(handlers::breakdown_handler),
        )
        .route("/sessions", get(handlers::list_sessions_handler))
        .route(
            "/sessions/{id}",
            axum::routing::delete(handlers::delete_session_handler),
        )
        .route("/sessions/{id}/journey", get(handlers::journey_handler))
        .route(
            "/sessions/{id}/results",
            post(handlers::record_result_handler),
        )
        .route("/sessions/{id}/current", put(handlers::set_current_handler))
        .route("/sessions/{id}/company", put(handlers::set_company_handler))
        .route(
            "/sessions/{id}/stages/{stage}",
            get(handlers::stage_handler),
        )
        .route("/sessions/{id}/targets", get(handlers::targets_handler))
        .route(
            "/sessions/{id}/preparation/{stage}",
            get(handlers::preparation_handler),
        )
        .route(
            "/sessions/{id}/preparation/{stage}/quiz",
            post(handlers::quiz_handler),
        )
        .route(
            "/sessions/{id}/preparation/{stage}/exercise",
            post(handlers::exercise_handler),
        )
        .route(
            "/sessions/{id}/checklist/{stage}",
            get(handlers::checklist_handler).put(handlers::update_checklist_handler),
        )
        .route("/sessions/{id}/export", post(handlers::export_handler));

    // Apply authentication middleware (innermost - runs last on request)
    if has_auth {
        router = router.layer(axum_middleware::from_fn(auth::api_key_auth_middleware));
    }

    if let Some(limiter) = rate_limiter {
        router = router.layer(axum_middleware::from_fn_with_state(
            limiter,
            middleware::rate_limit_middleware,
        ));
    }

    router
        .layer(axum::extract::DefaultBodyLimit::max(2 * 1024 * 1024))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Start the HTTP server.
pub async fn run_server(addr: &str, state: AppState) -> Result<(), CasepathError> {
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| CasepathError::IoError(format!("Bind failed: {}", e)))?;

    tracing::info!("Casepath HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| CasepathError::IoError(format!("Server error: {}", e)))
}

/// Resolve on Ctrl+C so in-flight requests finish before exit.
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => {
            tracing::error!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_list_skips_blanks_and_garbage() {
        let origins = parse_origins(" https://coach.example , ,bad\norigin,http://localhost:5173");
        assert_eq!(origins.len(), 2);
        assert_eq!(origins[0], "https://coach.example");
    }
}
