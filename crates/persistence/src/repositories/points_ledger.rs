//! Points ledger repository.
//!
//! The ledger is append-only. Totals and rankings are aggregated in SQL and
//! exclude rejected entries.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::errors::DomainError;
use domain::models::{NewLedgerEntry, PeriodWindow, PointsLedgerEntry, UserTotal};
use domain::services::PointsLedgerStore;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{PointsEntryTypeDb, PointsLedgerEntity, UserTotalEntity};
use crate::metrics::QueryTimer;

/// Repository for the points_ledger table.
#[derive(Clone)]
pub struct PointsLedgerRepository {
    pool: PgPool,
}

impl PointsLedgerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PointsLedgerStore for PointsLedgerRepository {
    async fn append(&self, entry: NewLedgerEntry) -> Result<PointsLedgerEntry, DomainError> {
        let timer = QueryTimer::new("append_points_entry");
        let result = sqlx::query_as::<_, PointsLedgerEntity>(
            r#"
            INSERT INTO points_ledger (user_id, points, description, entry_type, category_id, created_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, points, description, entry_type, category_id, created_by, created_at
            "#,
        )
        .bind(entry.user_id)
        .bind(entry.points)
        .bind(&entry.description)
        .bind(PointsEntryTypeDb::from(entry.entry_type))
        .bind(entry.category_id)
        .bind(entry.created_by)
        .fetch_one(&self.pool)
        .await;
        timer.record();

        Ok(result?.into())
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        window: &PeriodWindow,
        before: Option<(DateTime<Utc>, Uuid)>,
        limit: u32,
    ) -> Result<Vec<PointsLedgerEntry>, DomainError> {
        let timer = QueryTimer::new("list_points_entries_for_user");
        let result = sqlx::query_as::<_, PointsLedgerEntity>(
            r#"
            SELECT id, user_id, points, description, entry_type, category_id, created_by, created_at
            FROM points_ledger
            WHERE user_id = $1
              AND created_at >= $2
              AND created_at < $3
              AND ($4::TIMESTAMPTZ IS NULL OR (created_at, id) < ($4, $5))
            ORDER BY created_at DESC, id DESC
            LIMIT $6
            "#,
        )
        .bind(user_id)
        .bind(window.start())
        .bind(window.end_exclusive())
        .bind(before.map(|(at, _)| at))
        .bind(before.map(|(_, id)| id))
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await;
        timer.record();

        Ok(result?.into_iter().map(Into::into).collect())
    }

    async fn total_for_user(
        &self,
        user_id: Uuid,
        window: &PeriodWindow,
        category_id: Option<Uuid>,
    ) -> Result<i64, DomainError> {
        let timer = QueryTimer::new("total_points_for_user");
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COALESCE(SUM(points), 0)::BIGINT
            FROM points_ledger
            WHERE user_id = $1
              AND entry_type <> 'rejected'
              AND created_at >= $2
              AND created_at < $3
              AND ($4::UUID IS NULL OR category_id = $4)
            "#,
        )
        .bind(user_id)
        .bind(window.start())
        .bind(window.end_exclusive())
        .bind(category_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();

        Ok(result?)
    }

    async fn top_totals(
        &self,
        window: &PeriodWindow,
        category_id: Option<Uuid>,
        limit: usize,
    ) -> Result<Vec<UserTotal>, DomainError> {
        let timer = QueryTimer::new("ranking_top_totals");
        let result = sqlx::query_as::<_, UserTotalEntity>(
            r#"
            SELECT l.user_id, u.display_name AS user_name, SUM(l.points)::BIGINT AS total_points
            FROM points_ledger l
            JOIN users u ON u.id = l.user_id
            WHERE l.entry_type <> 'rejected'
              AND l.created_at >= $1
              AND l.created_at < $2
              AND ($3::UUID IS NULL OR l.category_id = $3)
            GROUP BY l.user_id, u.display_name
            ORDER BY total_points DESC, l.user_id ASC
            LIMIT $4
            "#,
        )
        .bind(window.start())
        .bind(window.end_exclusive())
        .bind(category_id)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await;
        timer.record();

        Ok(result?.into_iter().map(Into::into).collect())
    }
}
