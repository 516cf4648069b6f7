//! Shared types, errors, and configuration for Paybook.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Money helpers with decimal precision and the posting tolerance
//! - Application-wide error types
//! - Configuration management
//! - Tracing subscriber setup for binaries

pub mod config;
pub mod error;
pub mod telemetry;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
