//! Points awarding and per-user ledger views.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use shared::pagination::encode_cursor;
use tracing::info;
use uuid::Uuid;

use crate::errors::DomainError;
use crate::models::{
    AwardPointsRequest, LedgerPageResponse, PeriodTotal, PointsLedgerEntry, PointsSummaryResponse,
    RankingPeriod,
};
use crate::services::periods::PeriodService;
use crate::services::ranking::RankingService;
use crate::services::store::{PointsLedgerStore, UserStore};

/// A decoded ledger cursor: the last entry of the previous page.
pub type LedgerCursor = (DateTime<Utc>, Uuid);

#[derive(Clone)]
pub struct PointsService {
    ledger: Arc<dyn PointsLedgerStore>,
    users: Arc<dyn UserStore>,
    periods: PeriodService,
    ranking: RankingService,
}

impl PointsService {
    pub fn new(
        ledger: Arc<dyn PointsLedgerStore>,
        users: Arc<dyn UserStore>,
        periods: PeriodService,
        ranking: RankingService,
    ) -> Self {
        Self {
            ledger,
            users,
            periods,
            ranking,
        }
    }

    /// Appends a ledger entry for an existing user.
    pub async fn award(
        &self,
        request: AwardPointsRequest,
        actor: Uuid,
    ) -> Result<PointsLedgerEntry, DomainError> {
        if self.users.find_by_id(request.user_id).await?.is_none() {
            return Err(DomainError::NotFound(format!(
                "User {} not found",
                request.user_id
            )));
        }

        let entry = self.ledger.append(request.into_new_entry(actor)).await?;
        info!(
            entry_id = %entry.id,
            user_id = %entry.user_id,
            points = entry.points,
            entry_type = %entry.entry_type,
            "Points awarded"
        );
        Ok(entry)
    }

    /// One page of `user_id`'s entries in `period`, newest first.
    ///
    /// A full page carries a cursor pointing at its last entry.
    pub async fn ledger_page(
        &self,
        user_id: Uuid,
        period: RankingPeriod,
        before: Option<LedgerCursor>,
        limit: u32,
        today: NaiveDate,
    ) -> Result<LedgerPageResponse, DomainError> {
        let (window, _) = self.periods.window(period, today).await?;
        let entries = self
            .ledger
            .list_for_user(user_id, &window, before, limit)
            .await?;

        let next_cursor = if entries.len() as u32 == limit {
            entries.last().map(|e| encode_cursor(e.created_at, e.id))
        } else {
            None
        };

        Ok(LedgerPageResponse {
            period,
            entries,
            next_cursor,
        })
    }

    /// Totals and ranking positions of `user_id` for every period.
    pub async fn summary(
        &self,
        user_id: Uuid,
        today: NaiveDate,
    ) -> Result<PointsSummaryResponse, DomainError> {
        let mut periods = Vec::with_capacity(RankingPeriod::ALL.len());
        for period in RankingPeriod::ALL {
            let (window, _) = self.periods.window(period, today).await?;
            let total_points = self.ledger.total_for_user(user_id, &window, None).await?;
            let position = self
                .ranking
                .rows(&window, None)
                .await?
                .into_iter()
                .find(|row| row.user_id == user_id)
                .map(|row| row.position);

            periods.push(PeriodTotal {
                period,
                window,
                total_points,
                position,
            });
        }

        Ok(PointsSummaryResponse { user_id, periods })
    }
}
