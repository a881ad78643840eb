//! OTP issuance, rate limiting and retention configuration

use serde::{Deserialize, Serialize};

/// Phone OTP configuration
///
/// The attempt cap (3) and the code length (6) are domain constants in
/// `tk_core` and are not read from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct OtpConfig {
    /// Minutes a freshly issued code stays valid
    pub code_ttl_minutes: i64,

    /// Trailing window over which issuances are counted, in minutes
    pub rate_limit_window_minutes: i64,

    /// Max issuances per phone inside the window
    pub max_otp_per_window: u64,

    /// Records older than this are removed by cleanup, in hours
    pub retention_hours: i64,

    /// How often the cleanup task runs, in seconds
    pub cleanup_interval_seconds: u64,

    /// Whether the background cleanup task is started
    pub cleanup_enabled: bool,

    /// Delivery calls exceeding this are treated as failed, in seconds
    pub delivery_timeout_seconds: u64,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            code_ttl_minutes: 5,
            rate_limit_window_minutes: 10,
            max_otp_per_window: 3,
            retention_hours: 24,
            cleanup_interval_seconds: 3600,
            cleanup_enabled: true,
            delivery_timeout_seconds: 10,
        }
    }
}

impl OtpConfig {
    /// Create from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            code_ttl_minutes: env_or("OTP_CODE_TTL_MINUTES", defaults.code_ttl_minutes),
            rate_limit_window_minutes: env_or(
                "OTP_RATE_LIMIT_WINDOW_MINUTES",
                defaults.rate_limit_window_minutes,
            ),
            max_otp_per_window: env_or("OTP_MAX_PER_WINDOW", defaults.max_otp_per_window),
            retention_hours: env_or("OTP_RETENTION_HOURS", defaults.retention_hours),
            cleanup_interval_seconds: env_or(
                "OTP_CLEANUP_INTERVAL_SECONDS",
                defaults.cleanup_interval_seconds,
            ),
            cleanup_enabled: env_or("OTP_CLEANUP_ENABLED", defaults.cleanup_enabled),
            delivery_timeout_seconds: env_or(
                "OTP_DELIVERY_TIMEOUT_SECONDS",
                defaults.delivery_timeout_seconds,
            ),
        }
    }
}

impl OtpConfig {
    /// Check that every window and limit is positive and within bounds
    ///
    /// Retention must outlive both the code TTL and the rate-limit window,
    /// otherwise cleanup would drop records that still count.
    pub fn validate(&self) -> Result<(), String> {
        check_range("code_ttl_minutes", self.code_ttl_minutes, 1, MAX_WINDOW_MINUTES)?;
        check_range(
            "rate_limit_window_minutes",
            self.rate_limit_window_minutes,
            1,
            MAX_WINDOW_MINUTES,
        )?;
        check_range("max_otp_per_window", self.max_otp_per_window, 1, MAX_OTP_PER_WINDOW)?;
        check_range("retention_hours", self.retention_hours, 1, MAX_RETENTION_HOURS)?;
        check_range(
            "cleanup_interval_seconds",
            self.cleanup_interval_seconds,
            1,
            MAX_CLEANUP_INTERVAL_SECONDS,
        )?;
        check_range(
            "delivery_timeout_seconds",
            self.delivery_timeout_seconds,
            1,
            MAX_DELIVERY_TIMEOUT_SECONDS,
        )?;

        let retention_minutes = self.retention_hours * 60;
        if retention_minutes < self.code_ttl_minutes.max(self.rate_limit_window_minutes) {
            return Err(
                "retention_hours must cover code_ttl_minutes and rate_limit_window_minutes"
                    .to_string(),
            );
        }

        Ok(())
    }
}

/// One day
const MAX_WINDOW_MINUTES: i64 = 24 * 60;
const MAX_OTP_PER_WINDOW: u64 = 1000;
/// One year
const MAX_RETENTION_HOURS: i64 = 365 * 24;
const MAX_CLEANUP_INTERVAL_SECONDS: u64 = 24 * 60 * 60;
const MAX_DELIVERY_TIMEOUT_SECONDS: u64 = 300;

fn check_range<T>(field: &str, value: T, min: T, max: T) -> Result<(), String>
where
    T: PartialOrd + std::fmt::Display,
{
    if value < min || value > max {
        return Err(format!(
            "{} must be between {} and {}, got {}",
            field, min, max, value
        ));
    }
    Ok(())
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_policy() {
        let config = OtpConfig::default();
        assert_eq!(config.code_ttl_minutes, 5);
        assert_eq!(config.rate_limit_window_minutes, 10);
        assert_eq!(config.max_otp_per_window, 3);
        assert_eq!(config.retention_hours, 24);
        assert!(config.cleanup_enabled);
    }

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(OtpConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_negative_rate_limit_window_is_rejected() {
        let config = OtpConfig {
            rate_limit_window_minutes: -10,
            ..OtpConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.contains("rate_limit_window_minutes"));
    }

    #[test]
    fn test_zero_limits_are_rejected() {
        let defaults = OtpConfig::default();
        let configs = [
            OtpConfig {
                code_ttl_minutes: 0,
                ..defaults.clone()
            },
            OtpConfig {
                max_otp_per_window: 0,
                ..defaults.clone()
            },
            OtpConfig {
                cleanup_interval_seconds: 0,
                ..defaults.clone()
            },
            OtpConfig {
                delivery_timeout_seconds: 0,
                ..defaults
            },
        ];
        for config in configs {
            assert!(config.validate().is_err(), "{:?}", config);
        }
    }

    #[test]
    fn test_huge_durations_are_rejected() {
        let config = OtpConfig {
            code_ttl_minutes: i64::MAX,
            ..OtpConfig::default()
        };
        assert!(config.validate().unwrap_err().contains("code_ttl_minutes"));

        let config = OtpConfig {
            retention_hours: i64::MAX / 2,
            ..OtpConfig::default()
        };
        assert!(config.validate().unwrap_err().contains("retention_hours"));
    }

    #[test]
    fn test_retention_shorter_than_rate_window_is_rejected() {
        let config = OtpConfig {
            rate_limit_window_minutes: 120,
            retention_hours: 1,
            ..OtpConfig::default()
        };
        assert!(config.validate().unwrap_err().contains("retention_hours must cover"));
    }

    #[test]
    fn test_partial_deserialization_uses_defaults() {
        let config: OtpConfig = serde_json::from_str(r#"{"max_otp_per_window": 5}"#).unwrap();
        assert_eq!(config.max_otp_per_window, 5);
        assert_eq!(config.code_ttl_minutes, 5);
        assert_eq!(config.delivery_timeout_seconds, 10);
    }
}
