//! Feature settings endpoint handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use domain::models::{
    FeatureCheck, FeatureName, FeatureSetting, FeatureSettingsResponse,
    HeaderNavigationResponse, UpdateFeatureSettingRequest,
};
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::AdminAuth;

/// List every known feature with its current state.
///
/// GET /api/feature-settings
pub async fn list_feature_settings(
    State(state): State<AppState>,
) -> Result<Json<FeatureSettingsResponse>, ApiError> {
    let features = state.features.list().await?;
    Ok(Json(FeatureSettingsResponse { features }))
}

/// Features shown in the header navigation.
///
/// GET /api/feature-settings/header
pub async fn header_navigation(State(state): State<AppState>) -> Json<HeaderNavigationResponse> {
    Json(HeaderNavigationResponse {
        features: state.features.header().await,
    })
}

/// Whether a feature is enabled. Never fails: unknown names and lookup
/// errors answer enabled.
///
/// GET /api/feature-settings/check/:name
pub async fn check_feature(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Json<FeatureCheck> {
    Json(state.features.check(&name).await)
}

/// Update a feature, creating its row on first edit.
///
/// PUT /api/feature-settings/:name
pub async fn update_feature_setting(
    State(state): State<AppState>,
    admin: AdminAuth,
    Path(name): Path<String>,
    Json(request): Json<UpdateFeatureSettingRequest>,
) -> Result<Json<FeatureSetting>, ApiError> {
    let feature = FeatureName::parse(&name)
        .ok_or_else(|| ApiError::NotFound(format!("Unknown feature '{}'", name)))?;
    request.validate()?;

    let setting = state
        .features
        .update(feature, &request, admin.user.id)
        .await?;

    tracing::info!(
        feature = %feature,
        is_enabled = setting.is_enabled,
        show_in_header = setting.show_in_header,
        updated_by = %admin.user.id,
        "Feature setting updated"
    );

    Ok(Json(setting))
}
