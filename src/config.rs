//! Configuration module for loading and parsing TOML configuration files.
//!
//! Every section is optional; missing values fall back to defaults. After the
//! file is read, environment variables override individual values so that a
//! deployment can run without any file at all.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

/// Minimum length of a plausible bot token; 20 characters or fewer is
/// rejected.
const MIN_TOKEN_LEN: usize = 21;

/// Configuration error types.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse TOML configuration.
    #[error("failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    /// Invalid configuration value.
    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Order persistence configuration.
    pub storage: StorageConfig,
    /// Notifier configuration.
    pub notifier: NotifierConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port number to listen on.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

/// Where open orders are kept.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StorageMode {
    /// Process memory only.
    Memory,
    /// A JSON file rewritten on every change.
    #[default]
    File,
}

/// Order persistence configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Persistence mode.
    pub mode: StorageMode,
    /// Order file, used in file mode.
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            mode: StorageMode::File,
            path: PathBuf::from("data/orders.json"),
        }
    }
}

/// How the bot receives button presses and commands.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotifierMode {
    /// No bot at all.
    #[default]
    Disabled,
    /// Outbound notifications plus a `getUpdates` long-poll loop.
    Polling,
    /// Outbound notifications plus an inbound webhook route.
    Webhook,
}

/// Notifier configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NotifierConfig {
    /// Transport mode.
    pub mode: NotifierMode,
    /// Bot token.
    pub bot_token: Option<String>,
    /// Chat that receives notifications.
    pub chat_id: Option<String>,
    /// Bot API base URL.
    pub api_base_url: String,
    /// Timeout for a single API call in seconds.
    pub timeout_secs: u64,
    /// Long-poll timeout in seconds (polling mode).
    pub poll_timeout_secs: u64,
    /// Public base URL registered as webhook (webhook mode).
    pub webhook_url: Option<String>,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            mode: NotifierMode::Disabled,
            bot_token: None,
            chat_id: None,
            api_base_url: "https://api.telegram.org".to_string(),
            timeout_secs: 10,
            poll_timeout_secs: 30,
            webhook_url: None,
        }
    }
}

/// Bot credentials that passed the plausibility checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotCredentials {
    /// Bot token.
    pub bot_token: String,
    /// Chat that receives notifications.
    pub chat_id: String,
}

impl NotifierConfig {
    /// Returns the credentials if the notifier is enabled and they look
    /// usable. A missing, short, or literally `disabled` token counts as no
    /// token.
    #[must_use]
    pub fn credentials(&self) -> Option<BotCredentials> {
        if self.mode == NotifierMode::Disabled {
            return None;
        }

        let token = self.bot_token.as_deref().map(str::trim).unwrap_or_default();
        let chat_id = self.chat_id.as_deref().map(str::trim).unwrap_or_default();

        if token.len() < MIN_TOKEN_LEN || token.eq_ignore_ascii_case("disabled") {
            warn!("No valid bot token configured, notifications disabled");
            return None;
        }
        if chat_id.is_empty() {
            warn!("No chat id configured, notifications disabled");
            return None;
        }

        Some(BotCredentials {
            bot_token: token.to_string(),
            chat_id: chat_id.to_string(),
        })
    }

    /// Timeout for a single API call.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Long-poll timeout.
    #[must_use]
    pub fn poll_timeout(&self) -> Duration {
        Duration::from_secs(self.poll_timeout_secs)
    }
}

impl Config {
    /// Loads configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file.
    ///
    /// # Errors
    /// Returns error if file cannot be read or parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Arguments
    /// * `content` - TOML content as string.
    ///
    /// # Errors
    /// Returns error if content cannot be parsed.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Builds the runtime configuration: the file named by `CONFIG_PATH`
    /// (or `config.toml` if present), then environment overrides.
    ///
    /// # Errors
    /// Returns error if a configured file cannot be loaded, an override
    /// cannot be parsed, or the result is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = match std::env::var("CONFIG_PATH") {
            Ok(path) => Self::load(path)?,
            Err(_) if Path::new("config.toml").exists() => Self::load("config.toml")?,
            Err(_) => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Applies overrides looked up by environment variable name.
    fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| ConfigError::InvalidValue(format!("PORT is not a port: {}", port)))?;
        }
        if let Some(mode) = lookup("STORAGE_MODE") {
            self.storage.mode = parse_enum("STORAGE_MODE", &mode)?;
        }
        if let Some(path) = lookup("ORDERS_FILE") {
            self.storage.path = PathBuf::from(path);
        }
        if let Some(mode) = lookup("NOTIFIER_MODE") {
            self.notifier.mode = parse_enum("NOTIFIER_MODE", &mode)?;
        }
        if let Some(token) = lookup("TELEGRAM_BOT_TOKEN") {
            self.notifier.bot_token = Some(token);
            // A token alone enables outbound notifications.
            if lookup("NOTIFIER_MODE").is_none() && self.notifier.mode == NotifierMode::Disabled {
                self.notifier.mode = NotifierMode::Polling;
            }
        }
        if let Some(chat_id) = lookup("TELEGRAM_CHAT_ID") {
            self.notifier.chat_id = Some(chat_id);
        }
        if let Some(url) = lookup("TELEGRAM_WEBHOOK_URL") {
            self.notifier.webhook_url = Some(url);
        }
        Ok(())
    }

    /// Validates the configuration values.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue(
                "server port must be non-zero".to_string(),
            ));
        }
        if self.storage.mode == StorageMode::File && self.storage.path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue(
                "storage path cannot be empty in file mode".to_string(),
            ));
        }
        if self.notifier.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "notifier timeout_secs must be positive".to_string(),
            ));
        }
        if self.notifier.mode == NotifierMode::Polling && self.notifier.poll_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "notifier poll_timeout_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Parses a snake_case enum value the same way the TOML file does.
fn parse_enum<T: serde::de::DeserializeOwned>(key: &str, value: &str) -> Result<T, ConfigError> {
    let normalized = value.trim().to_ascii_lowercase();
    T::deserialize(serde::de::value::StrDeserializer::<serde::de::value::Error>::new(
        &normalized,
    ))
    .map_err(|_| ConfigError::InvalidValue(format!("{} has unknown value: {}", key, value)))
}
