//! # Middleware Module
//!
//! Rate limiting for the Casepath HTTP API.
//!
//! - `CASEPATH_RATE_LIMIT`: Requests per second (default: 100, 0 disables)

use axum::{
    Json,
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};
use std::num::NonZeroU32;
use std::sync::Arc;

const DEFAULT_RATE_LIMIT: u32 = 100;

/// Global rate limiter type alias.
pub type GlobalRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Create a new global rate limiter. Zero falls back to the default rate.
pub fn create_rate_limiter(requests_per_second: u32) -> GlobalRateLimiter {
    let rps = NonZeroU32::new(requests_per_second)
        .or(NonZeroU32::new(DEFAULT_RATE_LIMIT))
        .unwrap_or(NonZeroU32::MIN);
    Arc::new(RateLimiter::direct(Quota::per_second(rps)))
}

/// Requests per second from `CASEPATH_RATE_LIMIT`, or 100 if unset.
///
/// Unparsable values are logged and fall back to the default.
pub fn get_rate_limit_from_env() -> u32 {
    match std::env::var("CASEPATH_RATE_LIMIT") {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(
                "CASEPATH_RATE_LIMIT={:?} is not a number, using {}",
                raw,
                DEFAULT_RATE_LIMIT
            );
            DEFAULT_RATE_LIMIT
        }),
        Err(_) => DEFAULT_RATE_LIMIT,
    }
}

/// Error body shared by the middleware layers, shaped like handler errors.
pub(super) fn reject(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(serde_json::json!({ "success": false, "error": message })),
    )
        .into_response()
}

/// Rejects with 429 once the global limiter runs dry.
pub async fn rate_limit_middleware(
    State(limiter): State<GlobalRateLimiter>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, Response> {
    if limiter.check().is_err() {
        tracing::warn!(path = %request.uri().path(), "Rate limit exceeded");
        return Err(reject(StatusCode::TOO_MANY_REQUESTS, "Too many requests"));
    }
    Ok(next.run(request).await)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limiter_allows_first_request() {
        let limiter = create_rate_limiter(50);
        assert!(limiter.check().is_ok());
    }

    #[test]
    fn zero_rate_uses_default() {
        let limiter = create_rate_limiter(0);
        assert!(limiter.check().is_ok());
    }

    #[test]
    fn limiter_exhausts_burst() {
        let limiter = create_rate_limiter(1);
        assert!(limiter.check().is_ok());
        assert!(limiter.check().is_err());
    }
}
