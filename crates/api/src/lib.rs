//! HTTP API for the portal backend: feature settings and gamification.

pub mod app;
pub mod config;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod routes;
