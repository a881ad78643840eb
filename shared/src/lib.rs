//! Shared utilities and common types for the Tiki auth service
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types and layered loading
//! - Phone number normalization, validation and masking

pub mod config;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, DatabaseConfig, Environment, LogFormat, LoggingConfig, OtpConfig, ServerConfig,
    SmsConfig,
};
pub use utils::phone;
