//! Custom Axum extractors.

pub mod admin_auth;
pub mod user_auth;

pub use admin_auth::AdminAuth;
pub use user_auth::UserAuth;
