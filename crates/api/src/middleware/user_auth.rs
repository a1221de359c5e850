//! User JWT authentication middleware.
//!
//! Verifies the Bearer token on protected routes and stores the caller in
//! request extensions for the [`crate::extractors::UserAuth`] extractor.

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use shared::jwt::TokenKeys;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::trace_id::RequestSpan;

/// Caller identity taken from a verified access token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub jti: String,
}

impl AuthenticatedUser {
    /// Reads and verifies the Bearer token in `headers`.
    pub fn from_headers(keys: &TokenKeys, headers: &HeaderMap) -> Result<Self, ApiError> {
        let auth_header = headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            ApiError::Unauthorized("Invalid Authorization header format".to_string())
        })?;

        let claims = keys.verify(token)?;
        Ok(Self {
            user_id: claims.user_id()?,
            jti: claims.jti,
        })
    }
}

/// Middleware that rejects requests without a valid access token.
pub async fn require_user_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    match AuthenticatedUser::from_headers(&state.token_keys, req.headers()) {
        Ok(user) => {
            if let Some(span) = req.extensions().get::<RequestSpan>() {
                span.record_user(user.user_id);
            }
            req.extensions_mut().insert(user);
            next.run(req).await
        }
        Err(e) => {
            tracing::debug!(error = %e, "Rejected unauthenticated request");
            e.into_response()
        }
    }
}
