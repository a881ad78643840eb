//! Configuration for the OTP service

use chrono::Duration;
use tk_shared::config::OtpConfig;

use crate::domain::entities::otp_record::DEFAULT_EXPIRATION_MINUTES;
use crate::errors::DomainError;

/// Policy values used by `OtpService`
#[derive(Debug, Clone)]
pub struct OtpServiceConfig {
    /// How long an issued code stays verifiable
    pub code_ttl: Duration,
    /// Trailing window over which issuances are counted
    pub rate_limit_window: Duration,
    /// Max issuances per phone inside the window
    pub max_otp_per_window: u64,
    /// Records older than this are deleted by cleanup
    pub retention: Duration,
    /// Delivery calls slower than this fail
    pub delivery_timeout: std::time::Duration,
}

impl Default for OtpServiceConfig {
    fn default() -> Self {
        Self {
            code_ttl: Duration::minutes(DEFAULT_EXPIRATION_MINUTES),
            rate_limit_window: Duration::minutes(10),
            max_otp_per_window: 3,
            retention: Duration::hours(24),
            delivery_timeout: std::time::Duration::from_secs(10),
        }
    }
}

impl TryFrom<&OtpConfig> for OtpServiceConfig {
    type Error = DomainError;

    fn try_from(config: &OtpConfig) -> Result<Self, Self::Error> {
        config
            .validate()
            .map_err(|message| DomainError::Validation { message })?;

        Ok(Self {
            code_ttl: minutes("code_ttl_minutes", config.code_ttl_minutes)?,
            rate_limit_window: minutes(
                "rate_limit_window_minutes",
                config.rate_limit_window_minutes,
            )?,
            max_otp_per_window: config.max_otp_per_window,
            retention: Duration::try_hours(config.retention_hours)
                .ok_or_else(|| out_of_range("retention_hours"))?,
            delivery_timeout: std::time::Duration::from_secs(config.delivery_timeout_seconds),
        })
    }
}

fn minutes(field: &str, value: i64) -> Result<Duration, DomainError> {
    Duration::try_minutes(value).ok_or_else(|| out_of_range(field))
}

fn out_of_range(field: &str) -> DomainError {
    DomainError::Validation {
        message: format!("{} is out of range", field),
    }
}

/// Configuration for the background cleanup task
#[derive(Debug, Clone)]
pub struct OtpCleanupConfig {
    /// How often to run cleanup (in seconds)
    pub interval_seconds: u64,
    /// Whether to run cleanup at all
    pub enabled: bool,
}

impl Default for OtpCleanupConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 3600,
            enabled: true,
        }
    }
}

impl From<&OtpConfig> for OtpCleanupConfig {
    fn from(config: &OtpConfig) -> Self {
        Self {
            interval_seconds: config.cleanup_interval_seconds,
            enabled: config.cleanup_enabled,
        }
    }
}
