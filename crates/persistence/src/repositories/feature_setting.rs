//! Feature setting repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::errors::DomainError;
use domain::models::{FeatureName, FeatureSetting, UpdateFeatureSettingRequest};
use domain::services::FeatureSettingStore;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::FeatureSettingEntity;
use crate::metrics::QueryTimer;

/// Repository for the feature_settings table.
#[derive(Clone)]
pub struct FeatureSettingRepository {
    pool: PgPool,
}

impl FeatureSettingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FeatureSettingStore for FeatureSettingRepository {
    async fn find(&self, name: FeatureName) -> Result<Option<FeatureSetting>, DomainError> {
        let timer = QueryTimer::new("find_feature_setting");
        let result = sqlx::query_as::<_, FeatureSettingEntity>(
            r#"
            SELECT feature_name, is_enabled, show_in_header, disabled_message,
                   last_updated_by, updated_at
            FROM feature_settings
            WHERE feature_name = $1
            "#,
        )
        .bind(name.as_str())
        .fetch_optional(&self.pool)
        .await;
        timer.record();

        result?.map(FeatureSetting::try_from).transpose()
    }

    async fn list(&self) -> Result<Vec<FeatureSetting>, DomainError> {
        let timer = QueryTimer::new("list_feature_settings");
        let result = sqlx::query_as::<_, FeatureSettingEntity>(
            r#"
            SELECT feature_name, is_enabled, show_in_header, disabled_message,
                   last_updated_by, updated_at
            FROM feature_settings
            ORDER BY feature_name
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();

        result?.into_iter().map(FeatureSetting::try_from).collect()
    }

    async fn apply_update(
        &self,
        feature: FeatureName,
        request: &UpdateFeatureSettingRequest,
        actor: Uuid,
        at: DateTime<Utc>,
    ) -> Result<FeatureSetting, DomainError> {
        let defaults = FeatureSetting::defaults(feature);
        let timer = QueryTimer::new("update_feature_setting");
        // Absent fields resolve against the row being updated, under its lock
        let result = sqlx::query_as::<_, FeatureSettingEntity>(
            r#"
            INSERT INTO feature_settings
                (feature_name, is_enabled, show_in_header, disabled_message, last_updated_by, updated_at)
            VALUES ($1, COALESCE($2, $7), COALESCE($3, $8), COALESCE($4, $9), $5, $6)
            ON CONFLICT (feature_name) DO UPDATE SET
                is_enabled = COALESCE($2, feature_settings.is_enabled),
                show_in_header = COALESCE($3, feature_settings.show_in_header),
                disabled_message = COALESCE($4, feature_settings.disabled_message),
                last_updated_by = EXCLUDED.last_updated_by,
                updated_at = EXCLUDED.updated_at
            RETURNING feature_name, is_enabled, show_in_header, disabled_message,
                      last_updated_by, updated_at
            "#,
        )
        .bind(feature.as_str())
        .bind(request.is_enabled)
        .bind(request.show_in_header)
        .bind(request.disabled_message.as_deref())
        .bind(actor)
        .bind(at)
        .bind(defaults.is_enabled)
        .bind(defaults.show_in_header)
        .bind(&defaults.disabled_message)
        .fetch_one(&self.pool)
        .await;
        timer.record();

        FeatureSetting::try_from(result?)
    }
}
