//! Shared types, errors, and configuration for Paysettle.
//!
//! This crate provides common types used across all other crates:
//! - Money and currency types with decimal precision
//! - Typed IDs for type-safe ledger record references
//! - The caller-facing error type
//! - Configuration management
//! - Tracing subscriber setup

pub mod config;
pub mod error;
pub mod telemetry;
pub mod types;

pub use config::{AppConfig, LedgerConfig, LogFormat, LoggingConfig, PayrollConfig};
pub use error::{AppError, AppResult};
