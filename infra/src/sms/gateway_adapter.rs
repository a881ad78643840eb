//! SMS Gateway Adapter
//!
//! Implements the core `SmsGateway` on top of any infrastructure
//! `SmsService`: converts the normalized phone to E.164 and renders the
//! purpose-specific message.

use async_trait::async_trait;
use std::sync::Arc;
use tk_core::domain::entities::otp_record::{OtpPurpose, DEFAULT_EXPIRATION_MINUTES};
use tk_core::services::{otp_message, SmsGateway};
use tk_shared::phone::mask_phone_number;

use super::sms_service::{to_e164, SmsService};

/// Adapter that implements the core SmsGateway for an SMS provider
pub struct SmsGatewayAdapter {
    inner: Arc<dyn SmsService>,
    default_country_code: String,
    validity_minutes: i64,
}

impl SmsGatewayAdapter {
    /// Create a new adapter
    ///
    /// # Arguments
    ///
    /// * `inner` - Provider used for delivery
    /// * `default_country_code` - Calling code for numbers with a trunk `0`
    pub fn new(inner: Arc<dyn SmsService>, default_country_code: impl Into<String>) -> Self {
        Self {
            inner,
            default_country_code: default_country_code.into(),
            validity_minutes: DEFAULT_EXPIRATION_MINUTES,
        }
    }

    /// Set the validity stated in the message
    pub fn with_validity_minutes(mut self, minutes: i64) -> Self {
        self.validity_minutes = minutes;
        self
    }

    /// Name of the wrapped provider
    pub fn provider_name(&self) -> &str {
        self.inner.provider_name()
    }
}

#[async_trait]
impl SmsGateway for SmsGatewayAdapter {
    async fn send_otp(&self, phone: &str, code: &str, purpose: OtpPurpose) -> Result<String, String> {
        let recipient = to_e164(phone, &self.default_country_code).ok_or_else(|| {
            format!(
                "Cannot convert {} to E.164 with country code {}",
                mask_phone_number(phone),
                self.default_country_code
            )
        })?;

        let message = otp_message(code, purpose, self.validity_minutes);

        self.inner
            .send_sms(&recipient, &message)
            .await
            .map_err(|e| e.to_string())
    }
}
