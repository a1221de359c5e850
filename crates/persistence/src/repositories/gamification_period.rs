//! Gamification period repository.

use async_trait::async_trait;
use domain::errors::DomainError;
use domain::models::{GamificationPeriod, RankingPeriod};
use domain::services::PeriodStore;
use sqlx::PgPool;

use crate::entities::{GamificationPeriodEntity, RankingPeriodDb};
use crate::metrics::QueryTimer;

/// Repository for the gamification_periods table.
#[derive(Clone)]
pub struct GamificationPeriodRepository {
    pool: PgPool,
}

impl GamificationPeriodRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PeriodStore for GamificationPeriodRepository {
    async fn find(&self, period: RankingPeriod) -> Result<Option<GamificationPeriod>, DomainError> {
        let timer = QueryTimer::new("find_gamification_period");
        let result = sqlx::query_as::<_, GamificationPeriodEntity>(
            r#"
            SELECT period, starts_on, ends_on, updated_by, updated_at
            FROM gamification_periods
            WHERE period = $1
            "#,
        )
        .bind(RankingPeriodDb::from(period))
        .fetch_optional(&self.pool)
        .await;
        timer.record();

        Ok(result?.map(Into::into))
    }

    async fn upsert(&self, period: &GamificationPeriod) -> Result<GamificationPeriod, DomainError> {
        let timer = QueryTimer::new("upsert_gamification_period");
        let result = sqlx::query_as::<_, GamificationPeriodEntity>(
            r#"
            INSERT INTO gamification_periods (period, starts_on, ends_on, updated_by, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (period) DO UPDATE SET
                starts_on = EXCLUDED.starts_on,
                ends_on = EXCLUDED.ends_on,
                updated_by = EXCLUDED.updated_by,
                updated_at = EXCLUDED.updated_at
            RETURNING period, starts_on, ends_on, updated_by, updated_at
            "#,
        )
        .bind(RankingPeriodDb::from(period.period))
        .bind(period.window.starts_on)
        .bind(period.window.ends_on)
        .bind(period.updated_by)
        .bind(period.updated_at)
        .fetch_one(&self.pool)
        .await;
        timer.record();

        Ok(result?.into())
    }
}
