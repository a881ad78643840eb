//! Configuration module with business-specific sub-modules
//!
//! - `database` - MySQL connection pool configuration
//! - `environment` - Environment detection and logging configuration
//! - `otp` - OTP validity, rate limiting, retention and delivery timeout
//! - `server` - HTTP server and CORS configuration
//! - `sms` - SMS provider selection and credentials

pub mod database;
pub mod environment;
pub mod otp;
pub mod server;
pub mod sms;

use serde::{Deserialize, Serialize};

pub use database::DatabaseConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use otp::OtpConfig;
pub use server::ServerConfig;
pub use sms::SmsConfig;

/// Prefix for layered environment overrides, e.g. `APP__OTP__MAX_OTP_PER_WINDOW=5`
pub const ENV_PREFIX: &str = "APP";

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// OTP policy configuration
    pub otp: OtpConfig,

    /// SMS provider configuration
    pub sms: SmsConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Build configuration from the flat environment variables only
    pub fn from_env() -> Self {
        let environment = Environment::from_env();
        Self {
            environment,
            server: ServerConfig::from_env(),
            database: DatabaseConfig::from_env(),
            otp: OtpConfig::from_env(),
            sms: SmsConfig::from_env(),
            logging: LoggingConfig::for_environment(environment),
        }
    }

    /// Load configuration in layers
    ///
    /// 1. `.env` file (if present) and the flat variables read by `from_env`
    /// 2. `config/<environment>.toml` (optional)
    /// 3. `APP__SECTION__KEY` environment overrides
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let base = Self::from_env();
        let file = base.environment.config_file().to_string();

        let loaded: Self = config::Config::builder()
            .add_source(config::Config::try_from(&base)?)
            .add_source(config::File::with_name(&file).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("server.allowed_origins"),
            )
            .build()?
            .try_deserialize()?;

        loaded.validate()?;
        Ok(loaded)
    }

    /// Reject settings the services cannot run with
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        self.otp
            .validate()
            .map_err(|message| config::ConfigError::Message(format!("otp: {}", message)))
    }
}
