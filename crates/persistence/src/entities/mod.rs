//! Database entity definitions.
//!
//! Entities map directly to database rows and convert into domain models.

pub mod feature_setting;
pub mod gamification_period;
pub mod points_ledger;
pub mod user;

pub use feature_setting::FeatureSettingEntity;
pub use gamification_period::{GamificationPeriodEntity, RankingPeriodDb};
pub use points_ledger::{PointsEntryTypeDb, PointsLedgerEntity, UserTotalEntity};
pub use user::{UserEntity, UserRoleDb};
