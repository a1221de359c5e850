//! Domain models for the portal backend.

pub mod feature_setting;
pub mod period;
pub mod points;
pub mod ranking;
pub mod user;

pub use feature_setting::{
    FeatureCheck, FeatureName, FeatureSetting, FeatureSettingsResponse, HeaderNavigationResponse,
    UpdateFeatureSettingRequest, DEFAULT_DISABLED_MESSAGE,
};
pub use period::{
    GamificationPeriod, PeriodInfo, PeriodProgress, PeriodWindow, PeriodsResponse, RankingPeriod,
    UpdatePeriodRequest,
};
pub use points::{
    AwardPointsRequest, LedgerPageResponse, LedgerQuery, NewLedgerEntry, PeriodTotal,
    PointsEntryType, PointsLedgerEntry, PointsSummaryResponse,
};
pub use ranking::{RankingQuery, RankingResponse, RankingRow, UserTotal, RANKING_LIMIT};
pub use user::{PortalUser, UserRole};
