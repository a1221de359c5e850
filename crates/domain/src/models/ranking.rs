//! Ranking models.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::period::{PeriodWindow, RankingPeriod};

/// Most rows a ranking ever returns.
pub const RANKING_LIMIT: usize = 20;

/// One user's position in a ranking. Derived per request, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingRow {
    pub user_id: Uuid,
    pub user_name: String,
    pub total_points: i64,
    /// 1-based position.
    pub position: u32,
}

/// A user's summed points before positions are assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserTotal {
    pub user_id: Uuid,
    pub user_name: String,
    pub total_points: i64,
}

/// Query string for `GET /api/gamification/ranking`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingQuery {
    pub period: Option<String>,
    pub category_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingResponse {
    pub period: RankingPeriod,
    pub window: PeriodWindow,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Uuid>,
    pub rows: Vec<RankingRow>,
}
