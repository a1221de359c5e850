//! Persistence layer for the portal backend.
//!
//! This crate contains:
//! - Database connection management
//! - Entity definitions (database row mappings)
//! - PostgreSQL repositories implementing the domain store traits
//! - An in-memory store implementing the same traits

pub mod db;
pub mod entities;
pub mod memory;
pub mod metrics;
pub mod repositories;

use std::sync::Arc;

use domain::services::{FeatureSettingStore, PeriodStore, PointsLedgerStore, UserStore};
use sqlx::PgPool;

use crate::memory::InMemoryStore;
use crate::repositories::{
    FeatureSettingRepository, GamificationPeriodRepository, PointsLedgerRepository,
    UserRepository,
};

/// The stores a running service is wired with.
#[derive(Clone)]
pub struct Stores {
    pub features: Arc<dyn FeatureSettingStore>,
    pub ledger: Arc<dyn PointsLedgerStore>,
    pub periods: Arc<dyn PeriodStore>,
    pub users: Arc<dyn UserStore>,
    /// Present when backed by PostgreSQL; used by readiness and pool metrics.
    pub pool: Option<PgPool>,
}

impl Stores {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            features: Arc::new(FeatureSettingRepository::new(pool.clone())),
            ledger: Arc::new(PointsLedgerRepository::new(pool.clone())),
            periods: Arc::new(GamificationPeriodRepository::new(pool.clone())),
            users: Arc::new(UserRepository::new(pool.clone())),
            pool: Some(pool),
        }
    }

    pub fn in_memory(store: Arc<InMemoryStore>) -> Self {
        Self {
            features: store.clone(),
            ledger: store.clone(),
            periods: store.clone(),
            users: store,
            pool: None,
        }
    }
}
