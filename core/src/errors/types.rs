//! OTP-specific error types

use thiserror::Error;

/// Issuance failures surfaced to callers
///
/// Verification never produces one of these: a failed verification is a
/// plain `false`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OtpError {
    #[error("Invalid phone number format")]
    InvalidPhoneFormat,

    #[error("Too many OTP requests. Please try again after {window_minutes} minutes.")]
    RateLimitExceeded { window_minutes: i64 },

    #[error("Failed to send OTP: {reason}")]
    DeliveryFailed { reason: String },
}

impl OtpError {
    /// Stable machine-readable code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            OtpError::InvalidPhoneFormat => "INVALID_PHONE_FORMAT",
            OtpError::RateLimitExceeded { .. } => "RATE_LIMIT_EXCEEDED",
            OtpError::DeliveryFailed { .. } => "DELIVERY_FAILED",
        }
    }
}
