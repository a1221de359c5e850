//! Ranking period models.
//!
//! A period is a date range, inclusive on both ends, interpreted in UTC. Ledger
//! entries fall inside a window when created in
//! `[starts_on 00:00, ends_on + 1 day 00:00)`.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::DomainError;

/// The two ranking periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankingPeriod {
    #[default]
    Cycle,
    Annual,
}

impl RankingPeriod {
    pub const ALL: [RankingPeriod; 2] = [RankingPeriod::Cycle, RankingPeriod::Annual];

    pub fn as_str(&self) -> &'static str {
        match self {
            RankingPeriod::Cycle => "cycle",
            RankingPeriod::Annual => "annual",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "cycle" => Some(RankingPeriod::Cycle),
            "annual" => Some(RankingPeriod::Annual),
            _ => None,
        }
    }

    /// Calendar window used when no window has been configured: the
    /// quarter (cycle) or year (annual) containing `today`.
    pub fn default_window(&self, today: NaiveDate) -> PeriodWindow {
        let year = today.year();
        let (start, end) = match self {
            RankingPeriod::Annual => (
                NaiveDate::from_ymd_opt(year, 1, 1),
                NaiveDate::from_ymd_opt(year, 12, 31),
            ),
            RankingPeriod::Cycle => {
                let first_month = (today.month0() / 3) * 3 + 1;
                let start = NaiveDate::from_ymd_opt(year, first_month, 1);
                let end = start
                    .and_then(|s| s.checked_add_months(chrono::Months::new(3)))
                    .and_then(|next| next.pred_opt());
                (start, end)
            }
        };

        match (start, end) {
            (Some(starts_on), Some(ends_on)) => PeriodWindow { starts_on, ends_on },
            // Only reachable at the edges of chrono's date range
            _ => PeriodWindow {
                starts_on: today,
                ends_on: today,
            },
        }
    }
}

impl std::fmt::Display for RankingPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive date range a period covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodWindow {
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
}

impl PeriodWindow {
    pub fn from_dates(starts_on: NaiveDate, ends_on: NaiveDate) -> Result<Self, DomainError> {
        if starts_on > ends_on {
            return Err(DomainError::Validation(
                "startsOn must not be after endsOn".to_string(),
            ));
        }
        Ok(Self { starts_on, ends_on })
    }

    /// First instant inside the window.
    pub fn start(&self) -> DateTime<Utc> {
        self.starts_on.and_time(chrono::NaiveTime::MIN).and_utc()
    }

    /// First instant after the window.
    pub fn end_exclusive(&self) -> DateTime<Utc> {
        (self.ends_on.and_time(chrono::NaiveTime::MIN) + Duration::days(1)).and_utc()
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start() && at < self.end_exclusive()
    }

    /// Number of calendar days covered, at least 1.
    pub fn total_days(&self) -> i64 {
        (self.ends_on - self.starts_on).num_days() + 1
    }

    /// Progress through the window as of `today`.
    ///
    /// Days elapsed counts `today` as elapsed and is clamped to the window, so
    /// progress is 0 before the window starts and 100 once it has ended.
    pub fn progress(&self, today: NaiveDate) -> PeriodProgress {
        let days_total = self.total_days();
        let days_elapsed = ((today - self.starts_on).num_days() + 1).clamp(0, days_total);
        let percent = (days_elapsed as f64 / days_total as f64) * 100.0;

        PeriodProgress {
            days_total,
            days_elapsed,
            days_remaining: days_total - days_elapsed,
            percent_complete: (percent * 10.0).round() / 10.0,
        }
    }
}

/// How far a period has advanced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodProgress {
    pub days_total: i64,
    pub days_elapsed: i64,
    pub days_remaining: i64,
    pub percent_complete: f64,
}

/// Stored configuration for a ranking period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GamificationPeriod {
    pub period: RankingPeriod,
    #[serde(flatten)]
    pub window: PeriodWindow,
    pub updated_by: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for `PUT /api/gamification/periods/:period`. Date order is
/// checked by [`PeriodWindow::from_dates`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePeriodRequest {
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
}

/// One entry of `GET /api/gamification/periods`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodInfo {
    pub period: RankingPeriod,
    #[serde(flatten)]
    pub window: PeriodWindow,
    /// False when the window comes from calendar defaults.
    pub configured: bool,
    pub progress: PeriodProgress,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodsResponse {
    pub periods: Vec<PeriodInfo>,
}
