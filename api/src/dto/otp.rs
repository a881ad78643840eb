use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use tk_core::domain::entities::otp_record::{OtpPurpose, OtpRecord};
use tk_shared::phone::mask_phone_number;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendOtpRequest {
    /// Digits only, national or international form
    /// Examples: "0901234567", "84901234567"
    #[validate(regex(
        path = "tk_shared::phone::PHONE_DIGITS_REGEX",
        message = "Phone number must be 10-15 digits"
    ))]
    pub phone: String,

    /// REGISTER, LOGIN, VERIFY or RESET
    pub purpose: OtpPurpose,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerifyOtpRequest {
    #[validate(regex(
        path = "tk_shared::phone::PHONE_DIGITS_REGEX",
        message = "Phone number must be 10-15 digits"
    ))]
    pub phone: String,

    /// 6-digit verification code
    #[validate(length(equal = 6, message = "OTP code must be 6 digits"))]
    pub otp_code: String,

    pub purpose: OtpPurpose,
}

/// Success body for issue, resend and verify
///
/// Never carries the code itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpResponse {
    pub success: bool,
    pub message: String,
    /// Masked phone number (e.g. 090****67)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining_attempts: Option<i32>,
}

impl OtpResponse {
    /// Response for a freshly issued record
    pub fn issued(record: &OtpRecord, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            phone: Some(mask_phone_number(&record.phone)),
            expires_at: Some(record.expires_at),
            remaining_attempts: Some(record.remaining_attempts()),
        }
    }

    /// Response for a successful verification
    pub fn verified(phone: &str) -> Self {
        Self {
            success: true,
            message: "OTP verified successfully".to_string(),
            phone: Some(mask_phone_number(phone)),
            expires_at: None,
            remaining_attempts: None,
        }
    }
}
