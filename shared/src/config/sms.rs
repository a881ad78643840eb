//! SMS provider configuration

use serde::{Deserialize, Serialize};

/// SMS service configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SmsConfig {
    /// SMS service provider ("mock" or "twilio")
    pub provider: String,
    /// API account identifier (Twilio account SID)
    pub api_key: String,
    /// API secret/token
    pub api_secret: String,
    /// Sender phone number in E.164 format
    pub from_number: String,
    /// Country calling code used to turn national numbers into E.164 (e.g., "84")
    pub default_country_code: String,
    /// Maximum provider retries for transient failures
    pub max_retries: u32,
    /// Initial retry delay in milliseconds
    pub retry_delay_ms: u64,
    /// Timeout for a single provider request in seconds
    pub request_timeout_secs: u64,
}

impl Default for SmsConfig {
    fn default() -> Self {
        Self {
            provider: "mock".to_string(),
            api_key: String::new(),
            api_secret: String::new(),
            from_number: "+10000000000".to_string(),
            default_country_code: "84".to_string(),
            max_retries: 3,
            retry_delay_ms: 500,
            request_timeout_secs: 5,
        }
    }
}

impl SmsConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            provider: std::env::var("SMS_PROVIDER").unwrap_or(defaults.provider),
            api_key: std::env::var("SMS_API_KEY").unwrap_or_default(),
            api_secret: std::env::var("SMS_API_SECRET").unwrap_or_default(),
            from_number: std::env::var("SMS_FROM_NUMBER").unwrap_or(defaults.from_number),
            default_country_code: std::env::var("SMS_DEFAULT_COUNTRY_CODE")
                .unwrap_or(defaults.default_country_code),
            max_retries: std::env::var("SMS_MAX_RETRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_retries),
            retry_delay_ms: std::env::var("SMS_RETRY_DELAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.retry_delay_ms),
            request_timeout_secs: std::env::var("SMS_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.request_timeout_secs),
        }
    }

    /// Whether the mock provider is selected
    pub fn is_mock(&self) -> bool {
        self.provider.eq_ignore_ascii_case("mock")
    }
}
