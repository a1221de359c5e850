//! In-memory store.
//!
//! Implements every store trait over maps guarded by `tokio::sync::RwLock`.
//! Used when no database URL is configured and by the API tests. Ordering and
//! filtering follow the SQL in [`crate::repositories`].

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use domain::errors::DomainError;
use domain::models::{
    FeatureName, FeatureSetting, GamificationPeriod, NewLedgerEntry, PeriodWindow,
    PointsLedgerEntry, PortalUser, RankingPeriod, UpdateFeatureSettingRequest, UserTotal,
};
use domain::services::{
    order_totals, sum_counted, FeatureSettingStore, PeriodStore, PointsLedgerStore, UserStore,
};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
pub struct InMemoryStore {
    features: RwLock<HashMap<FeatureName, FeatureSetting>>,
    ledger: RwLock<Vec<PointsLedgerEntry>>,
    periods: RwLock<HashMap<RankingPeriod, GamificationPeriod>>,
    users: RwLock<HashMap<Uuid, PortalUser>>,
    unavailable: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_user(&self, user: PortalUser) {
        self.users.write().await.insert(user.id, user);
    }

    /// Appends an entry with an explicit creation time.
    pub async fn insert_entry(&self, entry: PointsLedgerEntry) {
        self.ledger.write().await.push(entry);
    }

    /// Makes every store call fail until switched back, simulating an outage.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn ensure_available(&self) -> Result<(), DomainError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DomainError::Storage("In-memory store unavailable".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl FeatureSettingStore for InMemoryStore {
    async fn find(&self, name: FeatureName) -> Result<Option<FeatureSetting>, DomainError> {
        self.ensure_available()?;
        Ok(self.features.read().await.get(&name).cloned())
    }

    async fn list(&self) -> Result<Vec<FeatureSetting>, DomainError> {
        self.ensure_available()?;
        let mut settings: Vec<_> = self.features.read().await.values().cloned().collect();
        settings.sort_by_key(|s| s.feature_name.as_str());
        Ok(settings)
    }

    async fn apply_update(
        &self,
        feature: FeatureName,
        request: &UpdateFeatureSettingRequest,
        actor: Uuid,
        at: DateTime<Utc>,
    ) -> Result<FeatureSetting, DomainError> {
        self.ensure_available()?;
        let mut features = self.features.write().await;
        let current = features
            .get(&feature)
            .cloned()
            .unwrap_or_else(|| FeatureSetting::defaults(feature));
        let updated = current.apply(request, actor, at);
        features.insert(feature, updated.clone());
        Ok(updated)
    }
}

#[async_trait]
impl PointsLedgerStore for InMemoryStore {
    async fn append(&self, entry: NewLedgerEntry) -> Result<PointsLedgerEntry, DomainError> {
        self.ensure_available()?;
        let stored = PointsLedgerEntry {
            id: Uuid::new_v4(),
            user_id: entry.user_id,
            points: entry.points,
            description: entry.description,
            entry_type: entry.entry_type,
            category_id: entry.category_id,
            created_by: entry.created_by,
            // Same precision as TIMESTAMPTZ, so cursors round-trip
            created_at: Utc::now().trunc_subsecs(6),
        };
        self.ledger.write().await.push(stored.clone());
        Ok(stored)
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        window: &PeriodWindow,
        before: Option<(DateTime<Utc>, Uuid)>,
        limit: u32,
    ) -> Result<Vec<PointsLedgerEntry>, DomainError> {
        self.ensure_available()?;
        let mut entries: Vec<_> = self
            .ledger
            .read()
            .await
            .iter()
            .filter(|e| e.user_id == user_id && window.contains(e.created_at))
            .filter(|e| before.map_or(true, |cursor| (e.created_at, e.id) < cursor))
            .cloned()
            .collect();

        entries.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        entries.truncate(limit as usize);
        Ok(entries)
    }

    async fn total_for_user(
        &self,
        user_id: Uuid,
        window: &PeriodWindow,
        category_id: Option<Uuid>,
    ) -> Result<i64, DomainError> {
        self.ensure_available()?;
        let ledger = self.ledger.read().await;
        let total = ledger
            .iter()
            .filter(|e| e.user_id == user_id && e.counts_in(window, category_id))
            .map(|e| i64::from(e.points))
            .sum();
        Ok(total)
    }

    async fn top_totals(
        &self,
        window: &PeriodWindow,
        category_id: Option<Uuid>,
        limit: usize,
    ) -> Result<Vec<UserTotal>, DomainError> {
        self.ensure_available()?;
        let sums = {
            let ledger = self.ledger.read().await;
            sum_counted(ledger.iter(), window, category_id)
        };

        // Inner join semantics: entries of unknown users are left out
        let users = self.users.read().await;
        let mut totals: Vec<_> = sums
            .into_iter()
            .filter_map(|(user_id, total_points)| {
                users.get(&user_id).map(|user| UserTotal {
                    user_id,
                    user_name: user.display_name.clone(),
                    total_points,
                })
            })
            .collect();

        order_totals(&mut totals);
        totals.truncate(limit);
        Ok(totals)
    }
}

#[async_trait]
impl PeriodStore for InMemoryStore {
    async fn find(&self, period: RankingPeriod) -> Result<Option<GamificationPeriod>, DomainError> {
        self.ensure_available()?;
        Ok(self.periods.read().await.get(&period).cloned())
    }

    async fn upsert(&self, period: &GamificationPeriod) -> Result<GamificationPeriod, DomainError> {
        self.ensure_available()?;
        self.periods
            .write()
            .await
            .insert(period.period, period.clone());
        Ok(period.clone())
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<PortalUser>, DomainError> {
        self.ensure_available()?;
        Ok(self.users.read().await.get(&id).cloned())
    }
}
