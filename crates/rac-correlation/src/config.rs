//! Configuration types and loading logic.

use figment::providers::{Env, Format, Toml};
use figment::Figment;
use rac_tracing::TracingConfig;
use serde::Deserialize;
use tracing::Level;

use crate::error::Error;
use crate::middleware::CorrelationSettings;

/// Top-level service configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub correlation: CorrelationConfig,
    #[serde(default)]
    pub tracing: TracingConfig,
}

/// Server listen configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen_address")]
    pub listen_address: String,
}

/// Correlation id middleware configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CorrelationConfig {
    /// Level of the per-request diagnostic lines ("trace" through "error").
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Echo the correlation id back in the `RacCorrelationId` response header.
    #[serde(default)]
    pub echo_response_header: bool,
}

fn default_listen_address() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: default_listen_address(),
        }
    }
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            echo_response_header: false,
        }
    }
}

impl CorrelationConfig {
    /// Validate into the settings the middleware runs with.
    pub fn settings(&self) -> Result<CorrelationSettings, Error> {
        let log_level: Level = self
            .log_level
            .trim()
            .parse()
            .map_err(|_| Error::InvalidLogLevel(self.log_level.clone()))?;

        Ok(CorrelationSettings {
            log_level,
            echo_response_header: self.echo_response_header,
        })
    }
}

impl AppConfig {
    /// Load configuration from TOML file and environment variables.
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (RAC_ prefix, __ for nesting)
    /// 2. TOML config file (optional; a missing file is skipped)
    /// 3. Defaults
    pub fn load(config_path: &str) -> Result<Self, Error> {
        let config: AppConfig = Figment::new()
            .merge(Toml::file(config_path))
            .merge(Env::prefixed("RAC_").split("__"))
            .extract()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use figment::Jail;

    use super::*;

    #[test]
    fn test_defaults_without_file() {
        Jail::expect_with(|_jail| {
            let config = AppConfig::load("missing.toml").unwrap();

            assert_eq!(config.server.listen_address, "0.0.0.0:8080");
            assert_eq!(config.correlation.log_level, "info");
            assert!(!config.correlation.echo_response_header);
            assert_eq!(config.tracing.log_level, "info");
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "rac-correlation.toml",
                r#"
                [server]
                listen_address = "127.0.0.1:9000"

                [correlation]
                log_level = "debug"
                echo_response_header = false
                "#,
            )?;
            jail.set_env("RAC_CORRELATION__ECHO_RESPONSE_HEADER", "true");

            let config = AppConfig::load("rac-correlation.toml").unwrap();
            assert_eq!(config.server.listen_address, "127.0.0.1:9000");
            assert_eq!(config.correlation.log_level, "debug");
            assert!(config.correlation.echo_response_header);

            let settings = config.correlation.settings().unwrap();
            assert_eq!(settings.log_level, Level::DEBUG);
            assert!(settings.echo_response_header);
            Ok(())
        });
    }

    #[test]
    fn test_settings_parse_levels() {
        for (raw, level) in [
            ("trace", Level::TRACE),
            ("DEBUG", Level::DEBUG),
            (" info ", Level::INFO),
            ("warn", Level::WARN),
            ("error", Level::ERROR),
        ] {
            let config = CorrelationConfig {
                log_level: raw.to_string(),
                echo_response_header: false,
            };
            assert_eq!(config.settings().unwrap().log_level, level);
        }
    }

    #[test]
    fn test_settings_reject_unknown_level() {
        let config = CorrelationConfig {
            log_level: "loud".to_string(),
            echo_response_header: false,
        };

        let err = config.settings().unwrap_err();
        assert!(matches!(err, Error::InvalidLogLevel(ref raw) if raw == "loud"));
    }
}
