//! Feature setting domain models.
//!
//! A feature setting is the persisted state of one named portal feature. The
//! set of feature names is fixed and shared with the web client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Message shown in place of a disabled page when none was configured.
pub const DEFAULT_DISABLED_MESSAGE: &str = "This feature is temporarily unavailable.";

/// Portal features that can be toggled by administrators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureName {
    Dashboard,
    Community,
    Materials,
    Gamification,
    AiChat,
    Trails,
    Surveys,
}

impl FeatureName {
    /// Every known feature, in navigation order.
    pub const ALL: [FeatureName; 7] = [
        FeatureName::Dashboard,
        FeatureName::Community,
        FeatureName::Materials,
        FeatureName::Gamification,
        FeatureName::AiChat,
        FeatureName::Trails,
        FeatureName::Surveys,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureName::Dashboard => "dashboard",
            FeatureName::Community => "community",
            FeatureName::Materials => "materials",
            FeatureName::Gamification => "gamification",
            FeatureName::AiChat => "ai_chat",
            FeatureName::Trails => "trails",
            FeatureName::Surveys => "surveys",
        }
    }

    /// Parses a stored or requested feature name. Unknown names yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|name| name.as_str() == s)
    }
}

impl std::fmt::Display for FeatureName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted state of a feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureSetting {
    pub feature_name: FeatureName,
    pub is_enabled: bool,
    pub show_in_header: bool,
    pub disabled_message: String,
    pub last_updated_by: Option<Uuid>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl FeatureSetting {
    /// State of a feature that has never been edited.
    pub fn defaults(feature_name: FeatureName) -> Self {
        Self {
            feature_name,
            is_enabled: true,
            show_in_header: true,
            disabled_message: DEFAULT_DISABLED_MESSAGE.to_string(),
            last_updated_by: None,
            updated_at: None,
        }
    }

    /// Applies an administrator edit. Fields absent from the request keep
    /// their current value.
    pub fn apply(
        mut self,
        request: &UpdateFeatureSettingRequest,
        actor: Uuid,
        now: DateTime<Utc>,
    ) -> Self {
        if let Some(enabled) = request.is_enabled {
            self.is_enabled = enabled;
        }
        if let Some(show) = request.show_in_header {
            self.show_in_header = show;
        }
        if let Some(message) = &request.disabled_message {
            self.disabled_message = message.clone();
        }
        self.last_updated_by = Some(actor);
        self.updated_at = Some(now);
        self
    }
}

/// Result of checking whether a feature may be used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureCheck {
    /// Name as requested; may be a name outside the known set.
    pub feature_name: String,
    pub is_enabled: bool,
    pub disabled_message: String,
}

impl FeatureCheck {
    /// Fail-open answer used for missing rows, unknown names and store errors.
    pub fn open(feature_name: impl Into<String>) -> Self {
        Self {
            feature_name: feature_name.into(),
            is_enabled: true,
            disabled_message: DEFAULT_DISABLED_MESSAGE.to_string(),
        }
    }
}

impl From<&FeatureSetting> for FeatureCheck {
    fn from(setting: &FeatureSetting) -> Self {
        Self {
            feature_name: setting.feature_name.to_string(),
            is_enabled: setting.is_enabled,
            disabled_message: setting.disabled_message.clone(),
        }
    }
}

/// Request body for `PUT /api/feature-settings/:name`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFeatureSettingRequest {
    pub is_enabled: Option<bool>,

    pub show_in_header: Option<bool>,

    #[validate(
        length(max = 500, message = "Disabled message must be at most 500 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub disabled_message: Option<String>,
}

/// Response for listing all feature settings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureSettingsResponse {
    pub features: Vec<FeatureSetting>,
}

/// Features that belong in the portal header navigation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderNavigationResponse {
    pub features: Vec<FeatureName>,
}
