//! Gamification period entity (database row mapping).

use chrono::{DateTime, NaiveDate, Utc};
use domain::models::{GamificationPeriod, PeriodWindow, RankingPeriod};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for ranking periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "ranking_period", rename_all = "lowercase")]
pub enum RankingPeriodDb {
    Cycle,
    Annual,
}

impl From<RankingPeriod> for RankingPeriodDb {
    fn from(period: RankingPeriod) -> Self {
        match period {
            RankingPeriod::Cycle => RankingPeriodDb::Cycle,
            RankingPeriod::Annual => RankingPeriodDb::Annual,
        }
    }
}

impl From<RankingPeriodDb> for RankingPeriod {
    fn from(db: RankingPeriodDb) -> Self {
        match db {
            RankingPeriodDb::Cycle => RankingPeriod::Cycle,
            RankingPeriodDb::Annual => RankingPeriod::Annual,
        }
    }
}

/// Database row mapping for the gamification_periods table.
#[derive(Debug, Clone, FromRow)]
pub struct GamificationPeriodEntity {
    pub period: RankingPeriodDb,
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
    pub updated_by: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
}

impl From<GamificationPeriodEntity> for GamificationPeriod {
    fn from(entity: GamificationPeriodEntity) -> Self {
        // The table's CHECK keeps starts_on <= ends_on
        Self {
            period: entity.period.into(),
            window: PeriodWindow {
                starts_on: entity.starts_on,
                ends_on: entity.ends_on,
            },
            updated_by: entity.updated_by,
            updated_at: entity.updated_at,
        }
    }
}
