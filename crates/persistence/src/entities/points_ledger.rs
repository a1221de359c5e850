//! Points ledger entities (database row mappings).

use chrono::{DateTime, Utc};
use domain::models::{PointsEntryType, PointsLedgerEntry, UserTotal};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for ledger entry review state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "points_entry_type", rename_all = "lowercase")]
pub enum PointsEntryTypeDb {
    Provisional,
    Approved,
    Rejected,
}

impl From<PointsEntryTypeDb> for PointsEntryType {
    fn from(db: PointsEntryTypeDb) -> Self {
        match db {
            PointsEntryTypeDb::Provisional => PointsEntryType::Provisional,
            PointsEntryTypeDb::Approved => PointsEntryType::Approved,
            PointsEntryTypeDb::Rejected => PointsEntryType::Rejected,
        }
    }
}

impl From<PointsEntryType> for PointsEntryTypeDb {
    fn from(entry_type: PointsEntryType) -> Self {
        match entry_type {
            PointsEntryType::Provisional => PointsEntryTypeDb::Provisional,
            PointsEntryType::Approved => PointsEntryTypeDb::Approved,
            PointsEntryType::Rejected => PointsEntryTypeDb::Rejected,
        }
    }
}

/// Database row mapping for the points_ledger table.
#[derive(Debug, Clone, FromRow)]
pub struct PointsLedgerEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub points: i32,
    pub description: String,
    pub entry_type: PointsEntryTypeDb,
    pub category_id: Option<Uuid>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<PointsLedgerEntity> for PointsLedgerEntry {
    fn from(entity: PointsLedgerEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            points: entity.points,
            description: entity.description,
            entry_type: entity.entry_type.into(),
            category_id: entity.category_id,
            created_by: entity.created_by,
            created_at: entity.created_at,
        }
    }
}

/// Aggregated ranking row: one user's summed points.
#[derive(Debug, Clone, FromRow)]
pub struct UserTotalEntity {
    pub user_id: Uuid,
    pub user_name: String,
    pub total_points: i64,
}

impl From<UserTotalEntity> for UserTotal {
    fn from(entity: UserTotalEntity) -> Self {
        Self {
            user_id: entity.user_id,
            user_name: entity.user_name,
            total_points: entity.total_points,
        }
    }
}
