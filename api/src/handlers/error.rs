//! Mapping from domain and request errors to HTTP responses

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use std::collections::HashMap;
use validator::ValidationErrors;

use tk_core::errors::{DomainError, OtpError};

use crate::dto::ErrorResponse;

/// Message for every negative verification result
pub const INVALID_OTP_MESSAGE: &str = "Invalid or expired OTP code";

/// Error returned by the OTP handlers
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Request body failed field validation
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// Request body could not be parsed
    #[error("Invalid request body: {0}")]
    InvalidPayload(String),

    /// Wrong code, expired, exhausted, already used or unknown phone
    #[error("{}", INVALID_OTP_MESSAGE)]
    InvalidOtp,

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl ApiError {
    /// Stable error code for clients
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::InvalidPayload(_) => "INVALID_REQUEST",
            ApiError::InvalidOtp => "INVALID_OTP",
            ApiError::Domain(DomainError::Otp(otp_error)) => otp_error.code(),
            ApiError::Domain(DomainError::Validation { .. }) => "VALIDATION_ERROR",
            ApiError::Domain(DomainError::Internal { .. }) => "INTERNAL_ERROR",
        }
    }

    /// Message safe to show to the caller
    ///
    /// Delivery and store failures are logged with their detail and answered
    /// with a generic message.
    pub fn client_message(&self) -> String {
        match self {
            ApiError::Validation(_) => "Invalid request data".to_string(),
            ApiError::InvalidPayload(detail) => format!("Invalid request body: {}", detail),
            ApiError::InvalidOtp => INVALID_OTP_MESSAGE.to_string(),
            ApiError::Domain(DomainError::Otp(OtpError::DeliveryFailed { .. })) => {
                "Failed to send OTP. Please try again later.".to_string()
            }
            ApiError::Domain(DomainError::Otp(otp_error)) => otp_error.to_string(),
            ApiError::Domain(DomainError::Validation { message }) => message.clone(),
            ApiError::Domain(DomainError::Internal { .. }) => "Internal server error".to_string(),
        }
    }

    fn field_details(&self) -> Option<HashMap<String, Vec<String>>> {
        match self {
            ApiError::Validation(errors) => Some(
                errors
                    .field_errors()
                    .into_iter()
                    .map(|(field, errors)| {
                        let messages = errors
                            .iter()
                            .map(|e| {
                                e.message
                                    .as_ref()
                                    .map(|m| m.to_string())
                                    .unwrap_or_else(|| e.code.to_string())
                            })
                            .collect();
                        (field.to_string(), messages)
                    })
                    .collect(),
            ),
            _ => None,
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::InvalidPayload(_) | ApiError::InvalidOtp => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Domain(DomainError::Otp(OtpError::InvalidPhoneFormat)) => StatusCode::BAD_REQUEST,
            ApiError::Domain(DomainError::Otp(OtpError::RateLimitExceeded { .. })) => {
                StatusCode::TOO_MANY_REQUESTS
            }
            ApiError::Domain(DomainError::Otp(OtpError::DeliveryFailed { .. })) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ApiError::Domain(DomainError::Validation { .. }) => StatusCode::BAD_REQUEST,
            ApiError::Domain(DomainError::Internal { .. }) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, status = status.as_u16(), "Request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }

        let mut body = ErrorResponse::new(self.error_code(), self.client_message());
        if let Some(details) = self.field_details() {
            body = body.with_details(details);
        }
        HttpResponse::build(status).json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ApiError::InvalidOtp, StatusCode::BAD_REQUEST),
            (
                ApiError::Domain(OtpError::InvalidPhoneFormat.into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::Domain(OtpError::RateLimitExceeded { window_minutes: 10 }.into()),
                StatusCode::TOO_MANY_REQUESTS,
            ),
            (
                ApiError::Domain(
                    OtpError::DeliveryFailed {
                        reason: "gateway down".to_string(),
                    }
                    .into(),
                ),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                ApiError::Domain(DomainError::Internal {
                    message: "connection reset".to_string(),
                }),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.status_code(), expected, "{:?}", error);
        }
    }

    #[test]
    fn test_rate_limit_message_names_window() {
        let error = ApiError::Domain(OtpError::RateLimitExceeded { window_minutes: 10 }.into());
        assert_eq!(error.error_code(), "RATE_LIMIT_EXCEEDED");
        assert_eq!(
            error.client_message(),
            "Too many OTP requests. Please try again after 10 minutes."
        );
    }

    #[test]
    fn test_internal_detail_is_not_exposed() {
        let delivery = ApiError::Domain(
            OtpError::DeliveryFailed {
                reason: "Twilio code 21211".to_string(),
            }
            .into(),
        );
        assert!(!delivery.client_message().contains("21211"));

        let internal = ApiError::Domain(DomainError::Internal {
            message: "Failed to save OTP record: deadlock".to_string(),
        });
        assert_eq!(internal.client_message(), "Internal server error");
    }
}
