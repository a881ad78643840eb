//! Traits for SMS delivery integration

use async_trait::async_trait;

use crate::domain::entities::otp_record::OtpPurpose;

/// Delivers an OTP to a phone number
#[async_trait]
pub trait SmsGateway: Send + Sync {
    /// Send `code` for `purpose` to `phone`
    ///
    /// Returns the provider message id on success and a human-readable
    /// reason on failure.
    async fn send_otp(&self, phone: &str, code: &str, purpose: OtpPurpose) -> Result<String, String>;
}
