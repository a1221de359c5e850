//! Domain services for the portal backend.
//!
//! Services hold the business rules and reach storage only through the
//! traits in [`store`].

pub mod feature_gate;
pub mod periods;
pub mod points;
pub mod ranking;
pub mod store;

pub use feature_gate::FeatureGate;
pub use periods::PeriodService;
pub use points::{LedgerCursor, PointsService};
pub use ranking::{assign_positions, order_totals, sum_counted, RankingService};
pub use store::{FeatureSettingStore, PeriodStore, PointsLedgerStore, UserStore};
