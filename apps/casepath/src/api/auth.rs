//! # Authentication Module
//!
//! API key authentication for the Casepath HTTP API.
//!
//! ## Configuration
//!
//! - `CASEPATH_API_KEY`: If set, all requests (except /health) require this key
//!
//! Send the key in the Authorization header:
//! ```text
//! Authorization: Bearer <your-api-key>
//! ```

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    middleware::Next,
    response::Response,
};
use subtle::ConstantTimeEq;

use super::middleware::reject;

/// Get API key from environment variable.
///
/// Returns `Some(key)` if `CASEPATH_API_KEY` is set and non-empty,
/// `None` otherwise (disabling authentication).
pub fn get_api_key_from_env() -> Option<String> {
    std::env::var("CASEPATH_API_KEY")
        .ok()
        .filter(|k| !k.is_empty())
}

/// Compare two keys in constant time over the longer of the two lengths.
fn keys_match(provided: &[u8], expected: &[u8]) -> bool {
    let max_len = provided.len().max(expected.len());
    let mut padded_provided = vec![0u8; max_len];
    let mut padded_expected = vec![0u8; max_len];
    padded_provided[..provided.len()].copy_from_slice(provided);
    padded_expected[..expected.len()].copy_from_slice(expected);

    let bytes_match: bool = padded_provided.ct_eq(&padded_expected).into();
    bytes_match && provided.len() == expected.len()
}

/// Key carried by a request, with or without the `Bearer ` prefix.
fn presented_key(request: &Request<Body>) -> Option<&str> {
    let value = request
        .headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?;
    Some(value.strip_prefix("Bearer ").unwrap_or(value))
}

/// API key authentication middleware.
///
/// `/health` is always allowed. Every other endpoint requires
/// `Authorization: Bearer <key>` (or the raw key) when a key is configured.
pub async fn api_key_auth_middleware(
    request: Request<Body>,
    next: Next,
) -> Result<Response, Response> {
    let expected = match get_api_key_from_env() {
        Some(key) if request.uri().path() != "/health" => key,
        _ => return Ok(next.run(request).await),
    };

    let verdict =
        presented_key(&request).map(|key| keys_match(key.as_bytes(), expected.as_bytes()));
    let reason = match verdict {
        Some(true) => return Ok(next.run(request).await),
        Some(false) => "invalid_api_key",
        None => "missing_authorization_header",
    };

    tracing::warn!(
        event = "auth_failure",
        reason,
        path = %request.uri().path(),
        "Rejected unauthenticated request"
    );
    Err(reject(StatusCode::UNAUTHORIZED, "Unauthorized"))
}

// =============================================================================
// TESTS
// =============================================================================
