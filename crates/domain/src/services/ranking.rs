//! Points ranking.
//!
//! A ranking sums each user's counted ledger entries inside a period window,
//! orders users by total (highest first, ties by user id ascending) and keeps
//! at most [`RANKING_LIMIT`] rows with 1-based positions.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::errors::DomainError;
use crate::models::{
    PeriodWindow, PointsLedgerEntry, RankingPeriod, RankingResponse, RankingRow, UserTotal,
    RANKING_LIMIT,
};
use crate::services::periods::PeriodService;
use crate::services::store::PointsLedgerStore;

/// Sums counted entries per user.
pub fn sum_counted<'a, I>(
    entries: I,
    window: &PeriodWindow,
    category_id: Option<Uuid>,
) -> BTreeMap<Uuid, i64>
where
    I: IntoIterator<Item = &'a PointsLedgerEntry>,
{
    let mut totals = BTreeMap::new();
    for entry in entries {
        if entry.counts_in(window, category_id) {
            *totals.entry(entry.user_id).or_insert(0) += i64::from(entry.points);
        }
    }
    totals
}

/// Sorts totals into ranking order.
pub fn order_totals(totals: &mut [UserTotal]) {
    totals.sort_by(|a, b| {
        b.total_points
            .cmp(&a.total_points)
            .then_with(|| a.user_id.cmp(&b.user_id))
    });
}

/// Orders, truncates and numbers totals. Never returns more than
/// [`RANKING_LIMIT`] rows.
pub fn assign_positions(mut totals: Vec<UserTotal>, limit: usize) -> Vec<RankingRow> {
    order_totals(&mut totals);
    totals
        .into_iter()
        .take(limit.min(RANKING_LIMIT))
        .zip(1u32..)
        .map(|(total, position)| RankingRow {
            user_id: total.user_id,
            user_name: total.user_name,
            total_points: total.total_points,
            position,
        })
        .collect()
}

#[derive(Clone)]
pub struct RankingService {
    ledger: Arc<dyn PointsLedgerStore>,
    periods: PeriodService,
    limit: usize,
}

impl RankingService {
    /// `limit` is capped at [`RANKING_LIMIT`].
    pub fn new(ledger: Arc<dyn PointsLedgerStore>, periods: PeriodService, limit: usize) -> Self {
        Self {
            ledger,
            periods,
            limit: limit.clamp(1, RANKING_LIMIT),
        }
    }

    pub async fn ranking(
        &self,
        period: RankingPeriod,
        category_id: Option<Uuid>,
        today: NaiveDate,
    ) -> Result<RankingResponse, DomainError> {
        let (window, _) = self.periods.window(period, today).await?;
        let rows = self.rows(&window, category_id).await?;

        Ok(RankingResponse {
            period,
            window,
            category_id,
            rows,
        })
    }

    /// Ranking rows for an already resolved window.
    pub async fn rows(
        &self,
        window: &PeriodWindow,
        category_id: Option<Uuid>,
    ) -> Result<Vec<RankingRow>, DomainError> {
        let totals = self
            .ledger
            .top_totals(window, category_id, self.limit)
            .await?;
        Ok(assign_positions(totals, self.limit))
    }
}
