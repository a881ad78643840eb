//! Tests for domain error formatting and conversion

use crate::errors::{DomainError, OtpError};

#[test]
fn test_rate_limit_message_states_window() {
    let error = OtpError::RateLimitExceeded { window_minutes: 10 };
    assert_eq!(
        error.to_string(),
        "Too many OTP requests. Please try again after 10 minutes."
    );
    assert_eq!(error.code(), "RATE_LIMIT_EXCEEDED");
}

#[test]
fn test_otp_error_converts_transparently() {
    let error: DomainError = OtpError::InvalidPhoneFormat.into();

    assert!(matches!(error, DomainError::Otp(OtpError::InvalidPhoneFormat)));
    assert_eq!(error.to_string(), "Invalid phone number format");
}

#[test]
fn test_delivery_failure_keeps_reason() {
    let error: DomainError = OtpError::DeliveryFailed {
        reason: "provider timeout".to_string(),
    }
    .into();

    assert_eq!(error.to_string(), "Failed to send OTP: provider timeout");
}

#[test]
fn test_internal_error_message() {
    let error = DomainError::Internal {
        message: "connection refused".to_string(),
    };
    assert_eq!(error.to_string(), "Internal error: connection refused");
}
