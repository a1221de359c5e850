//! Resolution of ranking period windows.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::errors::DomainError;
use crate::models::{
    GamificationPeriod, PeriodInfo, PeriodWindow, PeriodsResponse, RankingPeriod,
    UpdatePeriodRequest,
};
use crate::services::store::PeriodStore;

#[derive(Clone)]
pub struct PeriodService {
    store: Arc<dyn PeriodStore>,
}

impl PeriodService {
    pub fn new(store: Arc<dyn PeriodStore>) -> Self {
        Self { store }
    }

    /// Window for `period`, and whether it was configured or defaulted.
    pub async fn window(
        &self,
        period: RankingPeriod,
        today: NaiveDate,
    ) -> Result<(PeriodWindow, bool), DomainError> {
        Ok(match self.store.find(period).await? {
            Some(stored) => (stored.window, true),
            None => (period.default_window(today), false),
        })
    }

    /// Both periods with their progress as of `today`.
    pub async fn describe(&self, today: NaiveDate) -> Result<PeriodsResponse, DomainError> {
        let mut periods = Vec::with_capacity(RankingPeriod::ALL.len());
        for period in RankingPeriod::ALL {
            let (window, configured) = self.window(period, today).await?;
            periods.push(PeriodInfo {
                period,
                window,
                configured,
                progress: window.progress(today),
            });
        }
        Ok(PeriodsResponse { periods })
    }

    pub async fn update(
        &self,
        period: RankingPeriod,
        request: &UpdatePeriodRequest,
        actor: Uuid,
    ) -> Result<GamificationPeriod, DomainError> {
        let window = PeriodWindow::from_dates(request.starts_on, request.ends_on)?;
        self.store
            .upsert(&GamificationPeriod {
                period,
                window,
                updated_by: Some(actor),
                updated_at: Utc::now(),
            })
            .await
    }
}
