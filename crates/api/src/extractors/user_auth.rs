//! User JWT authentication extractor.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::user_auth::AuthenticatedUser;

/// Authenticated caller.
///
/// Taken from request extensions when [`crate::middleware::require_user_auth`]
/// already ran, otherwise verified from the Bearer token directly.
#[derive(Debug, Clone)]
pub struct UserAuth {
    /// User ID from the JWT subject claim.
    pub user_id: Uuid,
    /// JWT ID (jti) for session tracking.
    pub jti: String,
}

impl From<AuthenticatedUser> for UserAuth {
    fn from(user: AuthenticatedUser) -> Self {
        Self {
            user_id: user.user_id,
            jti: user.jti,
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for UserAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthenticatedUser>() {
            return Ok(user.clone().into());
        }

        AuthenticatedUser::from_headers(&state.token_keys, &parts.headers).map(Into::into)
    }
}
