//! Feature gate middleware.
//!
//! Routes that belong to a portal feature are wrapped with a guard that
//! consults the feature gate on every request. A disabled feature answers 404
//! with the administrator's message; lookups that fail let the request
//! through.

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use domain::models::{FeatureCheck, FeatureName};
use serde_json::json;

use crate::app::AppState;
use crate::middleware::metrics::record_feature_check;

/// Response returned in place of a disabled feature's routes.
pub fn feature_disabled_response(check: &FeatureCheck) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "feature_disabled",
            "feature": check.feature_name,
            "message": check.disabled_message,
        })),
    )
        .into_response()
}

async fn guard(state: &AppState, feature: FeatureName, req: Request<Body>, next: Next) -> Response {
    let check = state.features.check_feature(feature).await;
    record_feature_check(feature.as_str(), check.is_enabled);

    if !check.is_enabled {
        tracing::debug!(feature = %feature, "Request blocked by disabled feature");
        return feature_disabled_response(&check);
    }
    next.run(req).await
}

/// Middleware that checks if the gamification feature is enabled.
pub async fn require_gamification(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    guard(&state, FeatureName::Gamification, req, next).await
}
