//! Phone OTP service module
//!
//! This module provides the complete OTP workflow:
//! - Code generation from a cryptographically secure source
//! - Sliding-window rate limiting per phone number
//! - Persistence before SMS delivery, with a delivery timeout
//! - Attempt-limited, purpose-scoped verification
//! - Retention cleanup, on demand or as a background task

mod cleanup;
mod clock;
mod config;
mod generator;
mod message;
mod service;
mod traits;

#[cfg(test)]
mod tests;

pub use cleanup::OtpCleanupTask;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{OtpCleanupConfig, OtpServiceConfig};
pub use generator::{FixedOtpGenerator, OtpGenerator, SecureOtpGenerator, MAX_CODE, MIN_CODE};
pub use message::{otp_message, BRAND};
pub use service::OtpService;
pub use traits::SmsGateway;
