//! HTTP route handlers.

pub mod feature_settings;
pub mod gamification;
pub mod health;
