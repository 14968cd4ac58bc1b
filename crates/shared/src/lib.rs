//! Shared types, errors, and configuration for Balans.
//!
//! This crate provides common types used across all other crates:
//! - Integer minor-unit money type
//! - Typed IDs for type-safe entity references
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
