//! Shared utilities and common types for the portal backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Access token verification (JWT)
//! - Cursor pagination helpers
//! - Common validation logic

pub mod jwt;
pub mod pagination;
pub mod validation;
