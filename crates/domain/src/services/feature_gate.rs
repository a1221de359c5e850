//! Feature gate.
//!
//! Answers whether a named feature may be used. Reads fail open: a missing
//! row, an unknown name or a store failure all resolve to "enabled", so a
//! storage outage never hides portal functionality.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::errors::DomainError;
use crate::models::{FeatureCheck, FeatureName, FeatureSetting, UpdateFeatureSettingRequest};
use crate::services::store::FeatureSettingStore;

#[derive(Clone)]
pub struct FeatureGate {
    store: Arc<dyn FeatureSettingStore>,
}

impl FeatureGate {
    pub fn new(store: Arc<dyn FeatureSettingStore>) -> Self {
        Self { store }
    }

    /// Resolves a feature by its requested name.
    pub async fn check(&self, name: &str) -> FeatureCheck {
        let Some(feature) = FeatureName::parse(name) else {
            debug!(feature = %name, "Unknown feature name, treating as enabled");
            return FeatureCheck::open(name);
        };
        self.check_feature(feature).await
    }

    /// Resolves a known feature.
    pub async fn check_feature(&self, feature: FeatureName) -> FeatureCheck {
        match self.store.find(feature).await {
            Ok(Some(setting)) => FeatureCheck::from(&setting),
            Ok(None) => FeatureCheck::open(feature.as_str()),
            Err(e) => {
                warn!(feature = %feature, error = %e, "Feature lookup failed, failing open");
                FeatureCheck::open(feature.as_str())
            }
        }
    }

    /// Every known feature in catalog order, stored state over defaults.
    pub async fn list(&self) -> Result<Vec<FeatureSetting>, DomainError> {
        let stored = self.store.list().await?;
        Ok(merge_with_defaults(stored))
    }

    /// Features to show in the header navigation.
    pub async fn header(&self) -> Vec<FeatureName> {
        let settings = match self.store.list().await {
            Ok(stored) => merge_with_defaults(stored),
            Err(e) => {
                warn!(error = %e, "Feature listing failed, showing every feature");
                return FeatureName::ALL.to_vec();
            }
        };

        settings
            .into_iter()
            .filter(|s| s.is_enabled && s.show_in_header)
            .map(|s| s.feature_name)
            .collect()
    }

    /// Applies an administrator edit, creating the row on first edit.
    pub async fn update(
        &self,
        feature: FeatureName,
        request: &UpdateFeatureSettingRequest,
        actor: Uuid,
    ) -> Result<FeatureSetting, DomainError> {
        self.store
            .apply_update(feature, request, actor, Utc::now())
            .await
    }
}

/// One setting per known feature, in catalog order.
fn merge_with_defaults(stored: Vec<FeatureSetting>) -> Vec<FeatureSetting> {
    FeatureName::ALL
        .into_iter()
        .map(|name| {
            stored
                .iter()
                .find(|s| s.feature_name == name)
                .cloned()
                .unwrap_or_else(|| FeatureSetting::defaults(name))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DEFAULT_DISABLED_MESSAGE;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MapStore {
        rows: Mutex<HashMap<FeatureName, FeatureSetting>>,
    }

    #[async_trait]
    impl FeatureSettingStore for MapStore {
        async fn find(&self, name: FeatureName) -> Result<Option<FeatureSetting>, DomainError> {
            Ok(self.rows.lock().unwrap().get(&name).cloned())
        }

        async fn list(&self) -> Result<Vec<FeatureSetting>, DomainError> {
            Ok(self.rows.lock().unwrap().values().cloned().collect())
        }

        async fn apply_update(
            &self,
            feature: FeatureName,
            request: &UpdateFeatureSettingRequest,
            actor: Uuid,
            at: chrono::DateTime<Utc>,
        ) -> Result<FeatureSetting, DomainError> {
            let mut rows = self.rows.lock().unwrap();
            let current = rows
                .get(&feature)
                .cloned()
                .unwrap_or_else(|| FeatureSetting::defaults(feature));
            let updated = current.apply(request, actor, at);
            rows.insert(feature, updated.clone());
            Ok(updated)
        }
    }

    struct BrokenStore;

    #[async_trait]
    impl FeatureSettingStore for BrokenStore {
        async fn find(&self, _: FeatureName) -> Result<Option<FeatureSetting>, DomainError> {
            Err(DomainError::Storage("connection refused".into()))
        }

        async fn list(&self) -> Result<Vec<FeatureSetting>, DomainError> {
            Err(DomainError::Storage("connection refused".into()))
        }

        async fn apply_update(
            &self,
            _: FeatureName,
            _: &UpdateFeatureSettingRequest,
            _: Uuid,
            _: chrono::DateTime<Utc>,
        ) -> Result<FeatureSetting, DomainError> {
            Err(DomainError::Storage("connection refused".into()))
        }
    }

    fn gate() -> FeatureGate {
        FeatureGate::new(Arc::new(MapStore::default()))
    }

    fn disable(message: &str) -> UpdateFeatureSettingRequest {
        UpdateFeatureSettingRequest {
            is_enabled: Some(false),
            show_in_header: None,
            disabled_message: Some(message.to_string()),
        }
    }

    #[tokio::test]
    async fn test_missing_rows_are_enabled() {
        let gate = gate();
        for name in FeatureName::ALL {
            let check = gate.check(name.as_str()).await;
            assert!(check.is_enabled, "{} should default to enabled", name);
            assert_eq!(check.disabled_message, DEFAULT_DISABLED_MESSAGE);
        }
    }

    #[tokio::test]
    async fn test_unknown_name_is_enabled() {
        let check = gate().check("time_travel").await;
        assert!(check.is_enabled);
        assert_eq!(check.feature_name, "time_travel");
    }

    #[tokio::test]
    async fn test_store_failure_fails_open() {
        let gate = FeatureGate::new(Arc::new(BrokenStore));
        assert!(gate.check("gamification").await.is_enabled);
        assert_eq!(gate.header().await, FeatureName::ALL.to_vec());
        assert!(gate.list().await.is_err());
    }

    #[tokio::test]
    async fn test_update_then_check_returns_message_verbatim() {
        let gate = gate();
        let actor = Uuid::new_v4();

        let saved = gate
            .update(FeatureName::Gamification, &disable("Ranking paused until March"), actor)
            .await
            .unwrap();
        assert_eq!(saved.last_updated_by, Some(actor));
        assert!(saved.updated_at.is_some());

        let check = gate.check("gamification").await;
        assert!(!check.is_enabled);
        assert_eq!(check.disabled_message, "Ranking paused until March");
    }

    #[tokio::test]
    async fn test_first_edit_starts_from_defaults() {
        let gate = gate();
        let request = UpdateFeatureSettingRequest {
            show_in_header: Some(false),
            ..Default::default()
        };

        let saved = gate
            .update(FeatureName::Surveys, &request, Uuid::new_v4())
            .await
            .unwrap();

        assert!(saved.is_enabled);
        assert!(!saved.show_in_header);
        assert_eq!(saved.disabled_message, DEFAULT_DISABLED_MESSAGE);
    }

    #[tokio::test]
    async fn test_list_covers_catalog_in_order() {
        let gate = gate();
        gate.update(FeatureName::Trails, &disable("Soon"), Uuid::new_v4())
            .await
            .unwrap();

        let list = gate.list().await.unwrap();
        let names: Vec<_> = list.iter().map(|s| s.feature_name).collect();
        assert_eq!(names, FeatureName::ALL.to_vec());

        let trails = list
            .iter()
            .find(|s| s.feature_name == FeatureName::Trails)
            .unwrap();
        assert!(!trails.is_enabled);
    }

    #[tokio::test]
    async fn test_header_hides_disabled_and_hidden() {
        let gate = gate();
        gate.update(FeatureName::AiChat, &disable("Off"), Uuid::new_v4())
            .await
            .unwrap();
        gate.update(
            FeatureName::Dashboard,
            &UpdateFeatureSettingRequest {
                show_in_header: Some(false),
                ..Default::default()
            },
            Uuid::new_v4(),
        )
        .await
        .unwrap();

        let header = gate.header().await;
        assert!(!header.contains(&FeatureName::AiChat));
        assert!(!header.contains(&FeatureName::Dashboard));
        assert!(header.contains(&FeatureName::Community));
        assert_eq!(header.len(), FeatureName::ALL.len() - 2);
    }

    #[tokio::test]
    async fn test_update_propagates_store_error() {
        let gate = FeatureGate::new(Arc::new(BrokenStore));
        let result = gate
            .update(FeatureName::Materials, &disable("x"), Uuid::new_v4())
            .await;
        assert!(matches!(result, Err(DomainError::Storage(_))));
    }
}
