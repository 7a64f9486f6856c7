//! Capability checks run before protected handlers.
//!
//! Protected routes get two layers: [`authenticate`] validates the bearer
//! token and stores the caller in the request extensions, then
//! [`rate_limit`] charges that caller one request against the policy.

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::{debug, warn};

use super::error::{insert_rate_limit_headers, ApiError};
use super::state::AppState;
use crate::ratelimit::ClientId;

/// The authenticated caller of a request.
#[derive(Debug, Clone)]
pub struct Caller(pub ClientId);

/// Reject requests whose `Authorization` header is not the configured token.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let caller = match state.auth.verify(header) {
        Ok(credential) => ClientId::new(credential),
        Err(err) => {
            warn!(
                method = %request.method(),
                path = %request.uri().path(),
                "Rejected request with invalid token"
            );
            return err.into_response();
        }
    };

    request.extensions_mut().insert(Caller(caller));
    next.run(request).await
}

/// Admit or deny the authenticated caller and report the counters.
///
/// Must run after [`authenticate`].
pub async fn rate_limit(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let Some(Caller(client)) = request.extensions().get::<Caller>().cloned() else {
        return ApiError::Unauthorized.into_response();
    };

    let decision = state
        .limiter
        .check_and_record(client.as_str(), &state.policy, state.clock.now());

    if !decision.allowed {
        debug!(
            client = %client,
            reset_after = decision.reset_after_secs(),
            "Request denied by rate limiter"
        );
        return ApiError::RateLimitExceeded(decision).into_response();
    }

    let mut response = next.run(request).await;
    insert_rate_limit_headers(response.headers_mut(), &decision);
    response
}
