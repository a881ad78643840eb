//! SMS Service Interface
//!
//! Defines the trait for SMS provider implementations and the phone number
//! helpers they share.

use async_trait::async_trait;
use phonenumber::{country, metadata::DATABASE, Mode, PhoneNumber};

use crate::InfrastructureError;

/// Maximum message length accepted by providers
pub const MAX_MESSAGE_LENGTH: usize = 1600;

/// SMS service trait for sending text messages
///
/// Implementations include:
/// - Twilio SMS API
/// - Mock implementation for development
#[async_trait]
pub trait SmsService: Send + Sync {
    /// Send an SMS message to a phone number
    ///
    /// # Arguments
    ///
    /// * `phone_number` - The recipient's phone number (E.164 format)
    /// * `message` - The message content to send
    ///
    /// # Returns
    ///
    /// * `Ok(message_id)` - Unique identifier for the sent message
    /// * `Err(InfrastructureError)` - If sending fails
    async fn send_sms(&self, phone_number: &str, message: &str) -> Result<String, InfrastructureError>;

    /// Get the service provider name
    fn provider_name(&self) -> &str;
}

/// Validate an E.164 phone number
///
/// The number must carry a leading '+' and be a valid number for the
/// region its country code belongs to.
pub fn is_valid_phone_number(phone: &str) -> bool {
    phone.starts_with('+')
        && phone
            .parse::<PhoneNumber>()
            .map(|parsed| phonenumber::is_valid(&parsed))
            .unwrap_or(false)
}

/// Convert a normalized national or international number to E.164
///
/// Numbers without a leading '+' are first read as national numbers of the
/// region owning `country_code`, then as international numbers missing the
/// '+'. The first reading that yields a valid number wins.
///
/// # Example
///
/// ```ignore
/// assert_eq!(to_e164("0901234567", "84").as_deref(), Some("+84901234567"));
/// assert_eq!(to_e164("2025550123", "1").as_deref(), Some("+12025550123"));
/// ```
pub fn to_e164(phone: &str, country_code: &str) -> Option<String> {
    let phone = phone.trim();

    let parsed = if phone.starts_with('+') {
        phone.parse::<PhoneNumber>().ok().filter(phonenumber::is_valid)
    } else {
        default_region(country_code)
            .and_then(|region| phonenumber::parse(Some(region), phone).ok())
            .filter(phonenumber::is_valid)
            .or_else(|| {
                format!("+{}", phone)
                    .parse::<PhoneNumber>()
                    .ok()
                    .filter(phonenumber::is_valid)
            })
    };

    parsed.map(|number| number.format().mode(Mode::E164).to_string())
}

/// Main region for a calling code such as "84" or "+1"
fn default_region(country_code: &str) -> Option<country::Id> {
    let code: u16 = country_code.trim().trim_start_matches('+').parse().ok()?;
    DATABASE.region(&code)?.first()?.parse().ok()
}
