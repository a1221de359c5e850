//! Feature setting entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::errors::DomainError;
use domain::models::{FeatureName, FeatureSetting};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the feature_settings table.
#[derive(Debug, Clone, FromRow)]
pub struct FeatureSettingEntity {
    pub feature_name: String,
    pub is_enabled: bool,
    pub show_in_header: bool,
    pub disabled_message: String,
    pub last_updated_by: Option<Uuid>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<FeatureSettingEntity> for FeatureSetting {
    type Error = DomainError;

    fn try_from(entity: FeatureSettingEntity) -> Result<Self, Self::Error> {
        let feature_name = FeatureName::parse(&entity.feature_name).ok_or_else(|| {
            DomainError::Storage(format!("Unknown feature name '{}'", entity.feature_name))
        })?;

        Ok(Self {
            feature_name,
            is_enabled: entity.is_enabled,
            show_in_header: entity.show_in_header,
            disabled_message: entity.disabled_message,
            last_updated_by: entity.last_updated_by,
            updated_at: entity.updated_at,
        })
    }
}
