//! Points ledger domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::period::{PeriodWindow, RankingPeriod};

/// Review state of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointsEntryType {
    Provisional,
    #[default]
    Approved,
    Rejected,
}

impl PointsEntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PointsEntryType::Provisional => "provisional",
            PointsEntryType::Approved => "approved",
            PointsEntryType::Rejected => "rejected",
        }
    }

    /// Whether entries of this type contribute to totals and rankings.
    pub fn is_counted(&self) -> bool {
        !matches!(self, PointsEntryType::Rejected)
    }
}

impl std::fmt::Display for PointsEntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable ledger record of points awarded to or deducted from a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointsLedgerEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub points: i32,
    pub description: String,
    #[serde(rename = "type")]
    pub entry_type: PointsEntryType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl PointsLedgerEntry {
    /// Whether this entry counts toward totals in `window`, optionally
    /// restricted to one category.
    pub fn counts_in(&self, window: &PeriodWindow, category_id: Option<Uuid>) -> bool {
        self.entry_type.is_counted()
            && window.contains(self.created_at)
            && category_id.map_or(true, |c| self.category_id == Some(c))
    }
}

/// Data needed to append a ledger entry.
#[derive(Debug, Clone)]
pub struct NewLedgerEntry {
    pub user_id: Uuid,
    pub points: i32,
    pub description: String,
    pub entry_type: PointsEntryType,
    pub category_id: Option<Uuid>,
    pub created_by: Option<Uuid>,
}

/// Request body for `POST /api/gamification/points`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AwardPointsRequest {
    pub user_id: Uuid,

    #[validate(custom(function = "shared::validation::validate_points"))]
    pub points: i32,

    #[validate(
        length(min = 1, max = 500, message = "Description must be 1-500 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub description: String,

    #[serde(rename = "type", default)]
    pub entry_type: PointsEntryType,

    pub category_id: Option<Uuid>,
}

impl AwardPointsRequest {
    pub fn into_new_entry(self, created_by: Uuid) -> NewLedgerEntry {
        NewLedgerEntry {
            user_id: self.user_id,
            points: self.points,
            description: self.description,
            entry_type: self.entry_type,
            category_id: self.category_id,
            created_by: Some(created_by),
        }
    }
}

/// Query string for `GET /api/gamification/points/me`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerQuery {
    pub period: Option<String>,
    pub cursor: Option<String>,
    pub limit: Option<u32>,
}

/// A page of the caller's own ledger.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerPageResponse {
    pub period: RankingPeriod,
    pub entries: Vec<PointsLedgerEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

/// Totals for one period in a user's points summary.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodTotal {
    pub period: RankingPeriod,
    pub window: PeriodWindow,
    pub total_points: i64,
    /// Position in the ranking, when inside the published top list.
    pub position: Option<u32>,
}

/// Response for `GET /api/gamification/points/me/summary`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PointsSummaryResponse {
    pub user_id: Uuid,
    pub periods: Vec<PeriodTotal>,
}
