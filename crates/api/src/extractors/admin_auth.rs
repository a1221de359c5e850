//! Administrator extractor.
//!
//! Tokens carry no role claim; administrator rights are read from the users
//! store on every request so a demotion takes effect immediately.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use domain::models::PortalUser;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::user_auth::UserAuth;

#[derive(Debug, Clone)]
pub struct AdminAuth {
    pub user: PortalUser,
}

#[async_trait]
impl FromRequestParts<AppState> for AdminAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth = UserAuth::from_request_parts(parts, state).await?;

        match state.stores.users.find_by_id(auth.user_id).await? {
            Some(user) if user.is_admin() => Ok(AdminAuth { user }),
            Some(_) => Err(ApiError::Forbidden(
                "Administrator role required".to_string(),
            )),
            None => {
                tracing::warn!(user_id = %auth.user_id, "Token subject has no user record");
                Err(ApiError::Forbidden(
                    "Administrator role required".to_string(),
                ))
            }
        }
    }
}
