//! PostgreSQL implementations of the domain store traits.

pub mod feature_setting;
pub mod gamification_period;
pub mod points_ledger;
pub mod user;

pub use feature_setting::FeatureSettingRepository;
pub use gamification_period::GamificationPeriodRepository;
pub use points_ledger::PointsLedgerRepository;
pub use user::UserRepository;
