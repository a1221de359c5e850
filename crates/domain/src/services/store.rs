//! Storage traits the services depend on.
//!
//! PostgreSQL repositories implement these in the persistence crate, as does
//! the in-memory store used for local runs and API tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::DomainError;
use crate::models::{
    FeatureName, FeatureSetting, GamificationPeriod, NewLedgerEntry, PeriodWindow,
    PointsLedgerEntry, PortalUser, RankingPeriod, UpdateFeatureSettingRequest, UserTotal,
};

/// Persisted feature settings.
#[async_trait]
pub trait FeatureSettingStore: Send + Sync {
    async fn find(&self, name: FeatureName) -> Result<Option<FeatureSetting>, DomainError>;

    async fn list(&self) -> Result<Vec<FeatureSetting>, DomainError>;

    /// Merges an edit into the stored row in one step, starting from
    /// [`FeatureSetting::defaults`] when no row exists. Fields absent from
    /// `request` keep their stored value even under concurrent edits.
    async fn apply_update(
        &self,
        feature: FeatureName,
        request: &UpdateFeatureSettingRequest,
        actor: Uuid,
        at: DateTime<Utc>,
    ) -> Result<FeatureSetting, DomainError>;
}

/// Append-only points ledger.
#[async_trait]
pub trait PointsLedgerStore: Send + Sync {
    async fn append(&self, entry: NewLedgerEntry) -> Result<PointsLedgerEntry, DomainError>;

    /// Entries of `user_id` created inside `window`, newest first
    /// (`created_at` desc, `id` desc), strictly after `before` in that order.
    async fn list_for_user(
        &self,
        user_id: Uuid,
        window: &PeriodWindow,
        before: Option<(DateTime<Utc>, Uuid)>,
        limit: u32,
    ) -> Result<Vec<PointsLedgerEntry>, DomainError>;

    /// Sum of counted entries of `user_id` inside `window`.
    async fn total_for_user(
        &self,
        user_id: Uuid,
        window: &PeriodWindow,
        category_id: Option<Uuid>,
    ) -> Result<i64, DomainError>;

    /// Per-user sums of counted entries inside `window`, highest first, ties
    /// by user id ascending, at most `limit` rows.
    async fn top_totals(
        &self,
        window: &PeriodWindow,
        category_id: Option<Uuid>,
        limit: usize,
    ) -> Result<Vec<UserTotal>, DomainError>;
}

/// Configured ranking period windows.
#[async_trait]
pub trait PeriodStore: Send + Sync {
    async fn find(&self, period: RankingPeriod) -> Result<Option<GamificationPeriod>, DomainError>;

    async fn upsert(&self, period: &GamificationPeriod) -> Result<GamificationPeriod, DomainError>;
}

/// Read access to portal users.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<PortalUser>, DomainError>;
}
