//! Tracing subscriber setup

use tk_shared::config::{LogFormat, LoggingConfig};
use tracing_subscriber::EnvFilter;

/// Build the filter from `RUST_LOG`, falling back to the configured level
pub fn env_filter(config: &LoggingConfig) -> Result<EnvFilter, tracing_subscriber::filter::ParseError> {
    EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.level))
}

/// Install the global subscriber in the configured format
pub fn init_tracing(config: &LoggingConfig) -> anyhow::Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(config)?)
        .with_ansi(config.colored)
        .with_file(config.source_location)
        .with_line_number(config.source_location)
        .with_target(true);

    let installed = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
    };

    installed.map_err(anyhow::Error::msg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tk_shared::config::Environment;

    #[test]
    fn test_invalid_level_is_rejected() {
        let config = LoggingConfig {
            level: "tk_core=loud".to_string(),
            ..LoggingConfig::for_environment(Environment::Production)
        };
        if std::env::var("RUST_LOG").is_err() {
            assert!(env_filter(&config).is_err());
        }
    }

    #[test]
    fn test_directive_level_is_accepted() {
        let config = LoggingConfig {
            level: "info,tk_core=debug".to_string(),
            ..LoggingConfig::for_environment(Environment::Development)
        };
        assert!(env_filter(&config).is_ok());
    }
}
