//! HTTP middleware components.

pub mod features;
pub mod logging;
pub mod metrics;
pub mod trace_id;
pub mod user_auth;

pub use features::{feature_disabled_response, require_gamification};
pub use logging::init_logging;
pub use metrics::{init_metrics, metrics_handler, metrics_middleware};
pub use trace_id::{trace_id, RequestId, RequestSpan, REQUEST_ID_HEADER};
pub use user_auth::{require_user_auth, AuthenticatedUser};
