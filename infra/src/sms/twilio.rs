//! Twilio SMS Service Implementation
//!
//! Sends SMS through the Twilio Messages REST API using `reqwest`.
//!
//! ## Features
//!
//! - E.164 recipient validation
//! - Retry with exponential backoff on 429, 5xx and transport errors
//! - Per-request timeout
//! - Phone number masking in logs

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use tk_shared::config::SmsConfig;
use tk_shared::phone::mask_phone_number;
use tracing::{debug, error, info, warn};

use crate::{
    sms::sms_service::{is_valid_phone_number, SmsService, MAX_MESSAGE_LENGTH},
    InfrastructureError,
};

/// Default Twilio API base URL
pub const TWILIO_API_BASE: &str = "https://api.twilio.com";

/// Twilio SMS service configuration
#[derive(Debug, Clone)]
pub struct TwilioConfig {
    /// Twilio Account SID
    pub account_sid: String,
    /// Twilio Auth Token
    pub auth_token: String,
    /// From phone number (must be a Twilio phone number)
    pub from_number: String,
    /// Maximum attempts for a single message
    pub max_retries: u32,
    /// Initial retry delay in milliseconds
    pub retry_delay_ms: u64,
    /// Timeout for API requests in seconds
    pub request_timeout_secs: u64,
    /// API base URL
    pub api_base: String,
}

impl TwilioConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self, InfrastructureError> {
        let account_sid = std::env::var("TWILIO_ACCOUNT_SID")
            .map_err(|_| InfrastructureError::Config("TWILIO_ACCOUNT_SID not set".to_string()))?;
        let auth_token = std::env::var("TWILIO_AUTH_TOKEN")
            .map_err(|_| InfrastructureError::Config("TWILIO_AUTH_TOKEN not set".to_string()))?;
        let from_number = std::env::var("TWILIO_FROM_NUMBER")
            .map_err(|_| InfrastructureError::Config("TWILIO_FROM_NUMBER not set".to_string()))?;

        let config = Self {
            account_sid,
            auth_token,
            from_number,
            max_retries: std::env::var("TWILIO_MAX_RETRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3),
            retry_delay_ms: std::env::var("TWILIO_RETRY_DELAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1000),
            request_timeout_secs: std::env::var("TWILIO_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            api_base: TWILIO_API_BASE.to_string(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check credentials are present and the sender is E.164
    pub fn validate(&self) -> Result<(), InfrastructureError> {
        if self.account_sid.is_empty() || self.auth_token.is_empty() {
            return Err(InfrastructureError::Config(
                "Twilio account SID and auth token are required".to_string(),
            ));
        }
        if !self.from_number.starts_with('+') {
            return Err(InfrastructureError::Config(
                "Twilio from number must be in E.164 format (starting with '+')".to_string(),
            ));
        }
        Ok(())
    }

    /// Messages resource URL for this account
    pub fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.api_base.trim_end_matches('/'),
            self.account_sid
        )
    }
}

impl From<&SmsConfig> for TwilioConfig {
    fn from(config: &SmsConfig) -> Self {
        Self {
            account_sid: config.api_key.clone(),
            auth_token: config.api_secret.clone(),
            from_number: config.from_number.clone(),
            max_retries: config.max_retries,
            retry_delay_ms: config.retry_delay_ms,
            request_timeout_secs: config.request_timeout_secs,
            api_base: TWILIO_API_BASE.to_string(),
        }
    }
}

/// Successful Messages API response (only the fields we use)
#[derive(Debug, Deserialize)]
struct TwilioMessageResponse {
    sid: String,
}

/// Twilio error payload
#[derive(Debug, Deserialize)]
struct TwilioErrorResponse {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: Option<String>,
}

/// Twilio SMS service implementation
pub struct TwilioSmsService {
    client: reqwest::Client,
    config: TwilioConfig,
}

impl TwilioSmsService {
    /// Create a new Twilio SMS service
    pub fn new(config: TwilioConfig) -> Result<Self, InfrastructureError> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        info!(
            "Twilio SMS service initialized with from number: {}",
            mask_phone_number(&config.from_number)
        );

        Ok(Self { client, config })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self, InfrastructureError> {
        Self::new(TwilioConfig::from_env()?)
    }

    /// Whether a response status is worth retrying
    pub fn is_retryable_status(status: StatusCode) -> bool {
        status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
    }

    /// Send a single request to the Messages API
    async fn send_once(&self, to: &str, message: &str) -> Result<String, SendFailure> {
        let response = self
            .client
            .post(self.config.messages_url())
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&[
                ("To", to),
                ("From", self.config.from_number.as_str()),
                ("Body", message),
            ])
            .send()
            .await
            .map_err(|e| SendFailure::Retryable(format!("request failed: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            let body: TwilioMessageResponse = response
                .json()
                .await
                .map_err(|e| SendFailure::Fatal(format!("invalid Twilio response: {}", e)))?;
            return Ok(body.sid);
        }

        let detail = match response.json::<TwilioErrorResponse>().await {
            Ok(TwilioErrorResponse {
                code: Some(code),
                message: Some(message),
            }) => format!("{} (Twilio code {}): {}", status, code, message),
            Ok(TwilioErrorResponse {
                message: Some(message),
                ..
            }) => format!("{}: {}", status, message),
            _ => status.to_string(),
        };

        if Self::is_retryable_status(status) {
            Err(SendFailure::Retryable(detail))
        } else {
            Err(SendFailure::Fatal(detail))
        }
    }

    /// Send SMS with retry logic
    async fn send_with_retry(&self, to: &str, message: &str) -> Result<String, InfrastructureError> {
        let max_attempts = self.config.max_retries.max(1);
        let mut attempts = 0;
        let mut delay = Duration::from_millis(self.config.retry_delay_ms);

        loop {
            attempts += 1;

            debug!(
                "Sending SMS attempt {}/{} to {}",
                attempts,
                max_attempts,
                mask_phone_number(to)
            );

            match self.send_once(to, message).await {
                Ok(sid) => {
                    info!(
                        "SMS sent successfully to {} with SID: {}",
                        mask_phone_number(to),
                        sid
                    );
                    return Ok(sid);
                }
                Err(SendFailure::Fatal(detail)) => {
                    error!("Twilio rejected SMS request: {}", detail);
                    return Err(InfrastructureError::Sms(format!("Invalid request: {}", detail)));
                }
                Err(SendFailure::Retryable(detail)) => {
                    error!(
                        "Failed to send SMS (attempt {}/{}): {}",
                        attempts, max_attempts, detail
                    );

                    if attempts >= max_attempts {
                        return Err(InfrastructureError::Sms(format!(
                            "Failed to send SMS after {} attempts: {}",
                            max_attempts, detail
                        )));
                    }

                    warn!("Retrying SMS send after {:?}", delay);
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                }
            }
        }
    }
}

/// Classified failure of one request
enum SendFailure {
    Retryable(String),
    Fatal(String),
}

#[async_trait]
impl SmsService for TwilioSmsService {
    async fn send_sms(&self, phone_number: &str, message: &str) -> Result<String, InfrastructureError> {
        if !is_valid_phone_number(phone_number) {
            return Err(InfrastructureError::Sms(format!(
                "Invalid phone number format: {}",
                mask_phone_number(phone_number)
            )));
        }

        if message.len() > MAX_MESSAGE_LENGTH {
            return Err(InfrastructureError::Sms(format!(
                "Message exceeds maximum length of {} characters",
                MAX_MESSAGE_LENGTH
            )));
        }

        info!(
            "Sending SMS to {} via Twilio (message length: {} chars)",
            mask_phone_number(phone_number),
            message.len()
        );

        self.send_with_retry(phone_number, message).await
    }

    fn provider_name(&self) -> &str {
        "Twilio"
    }
}
