use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fs, path::PathBuf, time::Duration};

use crate::model::MessageVariant;

/// Environment variable that points at an alternative config file.
pub const CONFIG_PATH_ENV: &str = "WEATHER_BOT_CONFIG";

/// Where the forecast is for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Human-readable name used in message headers.
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Default for Location {
    fn default() -> Self {
        Self {
            name: "Normal, IL".to_string(),
            latitude: 40.5142,
            longitude: -88.9906,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    pub base_url: String,
    /// The forecast API rejects requests without an identifying User-Agent.
    pub user_agent: String,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.weather.gov".to_string(),
            user_agent: concat!("weather-bot/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: 10 }
    }
}

/// Which destination form is deployed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DestinationKind {
    #[default]
    Telegram,
    Webhook,
}

impl DestinationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DestinationKind::Telegram => "telegram",
            DestinationKind::Webhook => "webhook",
        }
    }
}

impl std::fmt::Display for DestinationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeliveryConfig {
    pub kind: DestinationKind,
    pub telegram_api: String,
    /// Logical parameter name holding the bot token.
    pub token_parameter: String,
    /// Logical parameter name holding the chat id.
    pub chat_id_parameter: String,
    /// Environment variable holding the webhook URL.
    pub webhook_url_env: String,
    /// Chat gets only the nearest period, whatever the trigger asks for.
    pub single_period: bool,
}

impl DeliveryConfig {
    /// Variant actually rendered for a requested one; the webhook only takes a single period.
    pub fn variant_for(&self, requested: MessageVariant) -> MessageVariant {
        match self.kind {
            DestinationKind::Webhook => MessageVariant::Current,
            DestinationKind::Telegram if self.single_period => MessageVariant::Nearest,
            DestinationKind::Telegram => requested,
        }
    }
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            kind: DestinationKind::Telegram,
            telegram_api: "https://api.telegram.org".to_string(),
            token_parameter: "/weather-bot/telegram-token".to_string(),
            chat_id_parameter: "/weather-bot/telegram-chat-id".to_string(),
            webhook_url_env: "HA_WEBHOOK_URL".to_string(),
            single_period: false,
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// [location]
/// name = "Normal, IL"
/// latitude = 40.5142
/// longitude = -88.9906
///
/// [delivery]
/// kind = "telegram"
///
/// [parameters]
/// "/weather-bot/telegram-chat-id" = "123456"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub location: Location,
    pub forecast: ForecastConfig,
    pub http: HttpConfig,
    pub delivery: DeliveryConfig,

    /// Local stand-in for a secret store, keyed by logical parameter name.
    pub parameters: HashMap<String, String>,
}

impl Config {
    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(contents)?;
        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file. `WEATHER_BOT_CONFIG` wins over the platform default.
    pub fn config_file_path() -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }

        let dirs = ProjectDirs::from("dev", "weather-bot", "weather-bot")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Per-request timeout. Never zero, so a misconfigured value can't mean "wait forever".
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_secs.max(1))
    }

    /// Set or replace a locally stored parameter value.
    pub fn upsert_parameter(&mut self, name: &str, value: String) {
        self.parameters.insert(name.to_string(), value);
    }
}
