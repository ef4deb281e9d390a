//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `homepanel.toml` in the working directory (or the path in
//! `HOMEPANEL_CONFIG`). Every field has a sensible default so the file is
//! optional. Environment variables take precedence over file values.

use serde::Deserialize;

use homepanel_app::config::EngineConfig;
use homepanel_domain::action_log::Actor;

const DEFAULT_PATH: &str = "homepanel.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Console settings.
    pub console: ConsoleConfig,
    /// Devices, scenes and action log settings.
    pub engine: EngineConfig,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Console configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Text written before each command.
    pub prompt: String,
    /// Whether `set` logs when neither `--log` nor `--no-log` is given.
    pub log_set_value: bool,
    /// Capacity of the change notification channel.
    pub change_buffer: usize,
}

impl Config {
    /// Load configuration from the config file (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("HOMEPANEL_CONFIG").unwrap_or_else(|_| DEFAULT_PATH.to_string());
        let mut config = Self::from_file(&path)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup("HOMEPANEL_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = lookup("RUST_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = lookup("HOMEPANEL_LOG_MAX_ENTRIES") {
            if let Ok(max) = val.parse() {
                self.engine.log.max_entries = Some(max);
            }
        }
        if let Some(val) = lookup("HOMEPANEL_ACTOR") {
            self.engine.actor = Actor::new(val);
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.console.prompt.trim().is_empty() {
            return Err(ConfigError::Validation("prompt must not be empty".to_string()));
        }
        if self.console.change_buffer == 0 {
            return Err(ConfigError::Validation(
                "change_buffer must be non-zero".to_string(),
            ));
        }
        if self.engine.actor.as_str().trim().is_empty() {
            return Err(ConfigError::Validation("actor must not be empty".to_string()));
        }
        self.engine
            .log
            .retention()
            .map_err(|err| ConfigError::Validation(err.to_string()))?;
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "warn,homepanel=info,homepanel_app=info".to_string(),
        }
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            prompt: "homepanel> ".to_string(),
            log_set_value: false,
            change_buffer: 64,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
