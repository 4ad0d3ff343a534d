//! Configuration management for fleetledger
//!
//! This module handles loading, validation, and management of
//! fleetledger configuration from YAML files.

pub mod error;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use error::{ConfigError, ConfigResult};

// ==================== Configuration Types ====================

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,
    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
    /// Minutes an unused browser session is kept
    #[serde(default = "default_session_idle_minutes")]
    pub session_idle_minutes: u64,
    /// Upper bound on live sessions; the least recently used one is dropped
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            session_idle_minutes: default_session_idle_minutes(),
            max_sessions: default_max_sessions(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8082
}

fn default_session_idle_minutes() -> u64 {
    60
}

fn default_max_sessions() -> usize {
    1000
}

/// Accounting and money display settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountingConfig {
    /// Currency code shown next to amounts
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Number of decimal places
    #[serde(default = "default_decimal_places")]
    pub decimal_places: u32,
    /// Thousands separator
    #[serde(default = "default_thousands_sep")]
    pub thousands_separator: String,
    /// Optional YAML chart of accounts replacing the built-in seed
    #[serde(default)]
    pub chart_seed: Option<PathBuf>,
}

impl Default for AccountingConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            decimal_places: default_decimal_places(),
            thousands_separator: default_thousands_sep(),
            chart_seed: None,
        }
    }
}

fn default_currency() -> String {
    "AED".to_string()
}

fn default_decimal_places() -> u32 {
    2
}

fn default_thousands_sep() -> String {
    ",".to_string()
}

/// Interface language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Ar,
}

impl Default for Language {
    fn default() -> Self {
        Language::En
    }
}

impl std::str::FromStr for Language {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "en" | "english" => Ok(Language::En),
            "ar" | "arabic" => Ok(Language::Ar),
            _ => Err(format!("Invalid language: {}", s)),
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Language::En => write!(f, "en"),
            Language::Ar => write!(f, "ar"),
        }
    }
}

/// Colour theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    /// Follow the browser's colour scheme
    System,
}

impl Default for Theme {
    fn default() -> Self {
        Theme::System
    }
}

impl std::str::FromStr for Theme {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            "system" => Ok(Theme::System),
            _ => Err(format!("Invalid theme: {}", s)),
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
            Theme::System => write!(f, "system"),
        }
    }
}

/// Startup UI preferences
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UiConfig {
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub theme: Theme,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Accounting settings
    #[serde(default)]
    pub accounting: AccountingConfig,
    /// UI preferences applied at startup
    #[serde(default)]
    pub ui: UiConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::IoError)?;
        Self::from_yaml(&content)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(content: &str) -> ConfigResult<Self> {
        let config: Config = serde_yaml::from_str(content).map_err(|e| ConfigError::InvalidYaml {
            message: e.to_string(),
        })?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> ConfigResult<()> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                reason: "Port must be greater than 0".to_string(),
            });
        }

        if self.server.max_sessions == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.max_sessions".to_string(),
                reason: "At least one session must be allowed".to_string(),
            });
        }

        if self.accounting.currency.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "accounting.currency".to_string(),
            });
        }

        if self.accounting.decimal_places > 10 {
            return Err(ConfigError::InvalidValue {
                field: "accounting.decimal_places".to_string(),
                reason: "Decimal places must be between 0 and 10".to_string(),
            });
        }

        if !LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "logging.level".to_string(),
                reason: format!("Log level must be one of: {}", LOG_LEVELS.join(", ")),
            });
        }

        Ok(())
    }

    /// Generate a default configuration file
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }

    /// Address the HTTP server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_yaml() {
        let config = Config::from_yaml("{}").unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8082);
        assert_eq!(config.server.session_idle_minutes, 60);
        assert_eq!(config.server.max_sessions, 1000);
        assert_eq!(config.accounting.currency, "AED");
        assert_eq!(config.accounting.decimal_places, 2);
        assert_eq!(config.ui.language, Language::En);
        assert_eq!(config.ui.theme, Theme::System);
        assert_eq!(config.logging.level, "info");
        assert!(config.accounting.chart_seed.is_none());
    }

    #[test]
    fn test_default_matches_yaml_defaults() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.bind_address(), "0.0.0.0:8082");
    }

    #[test]
    fn test_default_template_parses() {
        let config = Config::from_yaml(Config::generate_default()).unwrap();
        assert_eq!(config.server.port, 8082);
        assert_eq!(config.accounting.currency, "AED");
    }

    #[test]
    fn test_partial_yaml() {
        let yaml = "server:\n  port: 9000\nui:\n  language: ar\n  theme: dark\n";
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.ui.language, Language::Ar);
        assert_eq!(config.ui.theme, Theme::Dark);
    }

    #[test]
    fn test_invalid_port() {
        let err = Config::from_yaml("server:\n  port: 0\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { ref field, .. } if field == "server.port"
        ));
    }

    #[test]
    fn test_zero_max_sessions() {
        let err = Config::from_yaml("server:\n  max_sessions: 0\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { ref field, .. } if field == "server.max_sessions"
        ));
    }

    #[test]
    fn test_invalid_log_level() {
        let err = Config::from_yaml("logging:\n  level: loud\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { ref field, .. } if field == "logging.level"
        ));
    }

    #[test]
    fn test_invalid_decimal_places() {
        let err = Config::from_yaml("accounting:\n  decimal_places: 11\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_blank_currency() {
        let err = Config::from_yaml("accounting:\n  currency: \" \"\n").unwrap_err();
        assert!(matches!(err, ConfigError::MissingField { .. }));
    }

    #[test]
    fn test_malformed_yaml() {
        let err = Config::from_yaml("server: [").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidYaml { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Path::new("/nonexistent/fleetledger.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
    }

    #[test]
    fn test_language_and_theme_parsing() {
        assert_eq!("AR".parse::<Language>().unwrap(), Language::Ar);
        assert_eq!("english".parse::<Language>().unwrap(), Language::En);
        assert!("fr".parse::<Language>().is_err());
        assert_eq!("Dark".parse::<Theme>().unwrap(), Theme::Dark);
        assert_eq!(Theme::System.to_string(), "system");
        assert!("sepia".parse::<Theme>().is_err());
    }
}
