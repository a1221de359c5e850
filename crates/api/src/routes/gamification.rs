//! Gamification endpoint handlers: ranking, periods and the points ledger.
//!
//! Every route here sits behind the `gamification` feature guard.

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{NaiveDate, Utc};
use domain::models::{
    AwardPointsRequest, GamificationPeriod, LedgerPageResponse, LedgerQuery, PeriodsResponse,
    PointsLedgerEntry, PointsSummaryResponse, RankingPeriod, RankingQuery, RankingResponse,
    UpdatePeriodRequest,
};
use shared::pagination::{clamp_page_size, decode_cursor};
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{AdminAuth, UserAuth};
use crate::middleware::metrics::record_points_awarded;

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Parses an optional period name; absent means cycle.
fn parse_period(raw: Option<&str>) -> Result<RankingPeriod, ApiError> {
    match raw {
        None => Ok(RankingPeriod::default()),
        Some(name) => RankingPeriod::parse(name).ok_or_else(|| {
            ApiError::Validation(format!(
                "Invalid period '{}'; expected 'cycle' or 'annual'",
                name
            ))
        }),
    }
}

fn query_error(rejection: QueryRejection) -> ApiError {
    ApiError::Validation(rejection.body_text())
}

/// Top users by points in a period.
///
/// GET /api/gamification/ranking?period=cycle|annual&categoryId=<uuid>
pub async fn get_ranking(
    State(state): State<AppState>,
    _auth: UserAuth,
    query: Result<Query<RankingQuery>, QueryRejection>,
) -> Result<Json<RankingResponse>, ApiError> {
    let Query(query) = query.map_err(query_error)?;
    let period = parse_period(query.period.as_deref())?;

    let ranking = state
        .ranking
        .ranking(period, query.category_id, today())
        .await?;
    Ok(Json(ranking))
}

/// Both period windows with their progress.
///
/// GET /api/gamification/periods
pub async fn get_periods(
    State(state): State<AppState>,
    _auth: UserAuth,
) -> Result<Json<PeriodsResponse>, ApiError> {
    Ok(Json(state.periods.describe(today()).await?))
}

/// Set a period window.
///
/// PUT /api/gamification/periods/:period
pub async fn update_period(
    State(state): State<AppState>,
    admin: AdminAuth,
    Path(period): Path<String>,
    Json(request): Json<UpdatePeriodRequest>,
) -> Result<Json<GamificationPeriod>, ApiError> {
    let period = parse_period(Some(&period))?;

    let updated = state.periods.update(period, &request, admin.user.id).await?;
    tracing::info!(
        period = %period,
        starts_on = %updated.window.starts_on,
        ends_on = %updated.window.ends_on,
        updated_by = %admin.user.id,
        "Ranking period updated"
    );
    Ok(Json(updated))
}

/// Append a ledger entry for a user.
///
/// POST /api/gamification/points
pub async fn award_points(
    State(state): State<AppState>,
    admin: AdminAuth,
    Json(request): Json<AwardPointsRequest>,
) -> Result<(StatusCode, Json<PointsLedgerEntry>), ApiError> {
    request.validate()?;

    let entry = state.points.award(request, admin.user.id).await?;
    record_points_awarded(entry.entry_type.as_str(), entry.points);
    Ok((StatusCode::CREATED, Json(entry)))
}

/// The caller's own ledger, newest first.
///
/// GET /api/gamification/points/me?period=&cursor=&limit=
pub async fn my_ledger(
    State(state): State<AppState>,
    auth: UserAuth,
    query: Result<Query<LedgerQuery>, QueryRejection>,
) -> Result<Json<LedgerPageResponse>, ApiError> {
    let Query(query) = query.map_err(query_error)?;
    let period = parse_period(query.period.as_deref())?;
    let before = query.cursor.as_deref().map(decode_cursor).transpose()?;
    let limit = clamp_page_size(
        query
            .limit
            .or(Some(state.config.gamification.ledger_page_size)),
    );

    let page = state
        .points
        .ledger_page(auth.user_id, period, before, limit, today())
        .await?;
    Ok(Json(page))
}

/// The caller's totals and positions for both periods.
///
/// GET /api/gamification/points/me/summary
pub async fn my_summary(
    State(state): State<AppState>,
    auth: UserAuth,
) -> Result<Json<PointsSummaryResponse>, ApiError> {
    Ok(Json(state.points.summary(auth.user_id, today()).await?))
}
