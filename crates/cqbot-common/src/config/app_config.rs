//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file if present).

use serde::Deserialize;
use std::env;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub gateway: GatewayConfig,
    pub command: CommandConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// Chat gateway connection configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// WebSocket endpoint of the gateway (`ws://` or `wss://`)
    #[serde(default = "default_gateway_url")]
    pub url: String,
    /// Capacity of the outbound frame queue
    #[serde(default = "default_outbound_buffer")]
    pub outbound_buffer: usize,
}

impl GatewayConfig {
    /// Create a gateway configuration for the given URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            outbound_buffer: default_outbound_buffer(),
        }
    }

    /// Check that the URL uses a WebSocket scheme
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.url.starts_with("ws://") || self.url.starts_with("wss://") {
            Ok(())
        } else {
            Err(ConfigError::InvalidValue(
                "CQBOT_GATEWAY_URL",
                format!("expected a ws:// or wss:// URL, got {:?}", self.url),
            ))
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self::new(default_gateway_url())
    }
}

/// Text command configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CommandConfig {
    /// Prefix that marks a chat message as a command line
    #[serde(default = "default_command_prefix")]
    pub prefix: String,
}

impl CommandConfig {
    /// Check that the prefix is not empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.prefix.is_empty() {
            Err(ConfigError::InvalidValue(
                "CQBOT_COMMAND_PREFIX",
                "prefix must not be empty".to_string(),
            ))
        } else {
            Ok(())
        }
    }
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self {
            prefix: default_command_prefix(),
        }
    }
}

// Default value functions
fn default_app_name() -> String {
    "cqbot".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_gateway_url() -> String {
    "ws://localhost:3333".to_string()
}

fn default_outbound_buffer() -> usize {
    100
}

fn default_command_prefix() -> String {
    ".".to_string()
}

impl AppConfig {
    /// Build a configuration from a gateway URL and a command prefix
    ///
    /// # Errors
    /// Returns an error if either value is invalid
    pub fn new(url: impl Into<String>, prefix: impl Into<String>) -> Result<Self, ConfigError> {
        let config = Self {
            app: AppSettings {
                name: default_app_name(),
                env: default_env(),
            },
            gateway: GatewayConfig::new(url),
            command: CommandConfig {
                prefix: prefix.into(),
            },
        };
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if a variable is present but invalid
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let env_value = match env::var("APP_ENV") {
            Ok(s) => Environment::parse(&s).ok_or(ConfigError::InvalidValue("APP_ENV", s))?,
            Err(_) => default_env(),
        };

        let outbound_buffer = match env::var("CQBOT_OUTBOUND_BUFFER") {
            Ok(s) => s
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(ConfigError::InvalidValue("CQBOT_OUTBOUND_BUFFER", s))?,
            Err(_) => default_outbound_buffer(),
        };

        let config = Self {
            app: AppSettings {
                name: env::var("APP_NAME").unwrap_or_else(|_| default_app_name()),
                env: env_value,
            },
            gateway: GatewayConfig {
                url: env::var("CQBOT_GATEWAY_URL").unwrap_or_else(|_| default_gateway_url()),
                outbound_buffer,
            },
            command: CommandConfig {
                prefix: env::var("CQBOT_COMMAND_PREFIX")
                    .unwrap_or_else(|_| default_command_prefix()),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate every section
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.gateway.validate()?;
        self.command.validate()
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_is_production() {
        assert!(!Environment::Development.is_production());
        assert!(!Environment::Staging.is_production());
        assert!(Environment::Production.is_production());
    }

    #[test]
    fn test_environment_parse() {
        assert_eq!(Environment::parse("PRODUCTION"), Some(Environment::Production));
        assert_eq!(Environment::parse("staging"), Some(Environment::Staging));
        assert_eq!(Environment::parse("qa"), None);
    }

    #[test]
    fn test_default_values() {
        assert_eq!(default_app_name(), "cqbot");
        assert_eq!(default_gateway_url(), "ws://localhost:3333");
        assert_eq!(default_command_prefix(), ".");
        assert_eq!(default_outbound_buffer(), 100);
    }

    #[test]
    fn test_new_validates_url() {
        assert!(AppConfig::new("ws://127.0.0.1:6700", "/").is_ok());
        assert!(AppConfig::new("wss://bot.example.com/ws", ".").is_ok());

        let err = AppConfig::new("http://127.0.0.1:6700", ".").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue("CQBOT_GATEWAY_URL", _)));
    }

    #[test]
    fn test_new_rejects_empty_prefix() {
        let err = AppConfig::new("ws://127.0.0.1:6700", "").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue("CQBOT_COMMAND_PREFIX", _)));
    }
}
