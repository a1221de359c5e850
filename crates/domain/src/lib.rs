//! Domain layer for the portal backend.
//!
//! This crate contains:
//! - Domain models (feature settings, points ledger, periods, users)
//! - Store traits implemented by the persistence layer
//! - Business logic services (feature gate, ranking, period windows)
//! - Domain error types

pub mod errors;
pub mod models;
pub mod services;
