use std::fmt;
use std::time::Duration;

use garde::Validate;
use serde::Deserialize;

use crate::services::poller::PollSettings;

const DEFAULT_ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";
const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";
const SECONDS_IN_DAY: i64 = 86_400;

/// Log output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AppConfig {
    /// OAuth token for the Practicum homework API
    #[garde(skip)]
    pub practicum_token: Option<String>,

    /// Telegram bot token
    #[garde(skip)]
    pub telegram_token: Option<String>,

    /// Telegram chat that receives notifications
    #[garde(skip)]
    pub telegram_chat_id: Option<String>,

    /// Homework statuses endpoint
    #[serde(default = "default_endpoint")]
    #[garde(length(min = 1))]
    pub practicum_endpoint: String,

    /// Telegram Bot API base URL
    #[serde(default = "default_telegram_api_url")]
    #[garde(length(min = 1))]
    pub telegram_api_url: String,

    /// Pause between poll iterations, in seconds
    #[serde(default = "default_retry_period_secs")]
    #[garde(range(min = 1, max = 86_400))]
    pub retry_period_secs: u64,

    /// How far back the `from_date` cursor reaches, in days
    #[serde(default = "default_lookback_days")]
    #[garde(range(min = 1, max = 365))]
    pub lookback_days: i64,

    /// Per-request timeout for both HTTP collaborators, in seconds
    #[serde(default = "default_request_timeout_secs")]
    #[garde(range(min = 1, max = 300))]
    pub request_timeout_secs: u64,

    #[serde(default)]
    #[garde(skip)]
    pub log_format: LogFormat,

    /// Prometheus scrape listener address (e.g., "0.0.0.0:9000"). Disabled when unset.
    #[serde(default)]
    #[garde(skip)]
    pub metrics_addr: Option<String>,
}

/// The three secrets the bot cannot run without.
#[derive(Clone)]
pub struct Credentials {
    pub practicum_token: String,
    pub telegram_token: String,
    pub telegram_chat_id: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("practicum_token", &"<redacted>")
            .field("telegram_token", &"<redacted>")
            .field("telegram_chat_id", &self.telegram_chat_id)
            .finish()
    }
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_telegram_api_url() -> String {
    DEFAULT_TELEGRAM_API_URL.to_string()
}

fn default_retry_period_secs() -> u64 {
    600
}

fn default_lookback_days() -> i64 {
    30
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::checked(envy::from_env()?)
    }

    /// Build from explicit key/value pairs instead of the process environment.
    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Self::checked(envy::from_iter(vars)?)
    }

    fn checked(config: Self) -> Result<Self, ConfigError> {
        config
            .validate()
            .map_err(|report| ConfigError::Invalid(report.to_string()))?;
        Ok(config)
    }

    /// Collect the required secrets, reporting every one that is absent or blank.
    pub fn credentials(&self) -> Result<Credentials, ConfigError> {
        let required = [
            ("PRACTICUM_TOKEN", &self.practicum_token),
            ("TELEGRAM_TOKEN", &self.telegram_token),
            ("TELEGRAM_CHAT_ID", &self.telegram_chat_id),
        ];

        let missing: Vec<&'static str> = required
            .iter()
            .filter(|(_, value)| value.as_deref().map_or(true, |v| v.trim().is_empty()))
            .map(|(name, _)| *name)
            .collect();

        if !missing.is_empty() {
            return Err(ConfigError::MissingVariables(missing));
        }

        let [practicum, telegram, chat_id] =
            required.map(|(_, value)| value.as_deref().unwrap_or_default().trim().to_string());

        Ok(Credentials {
            practicum_token: practicum,
            telegram_token: telegram,
            telegram_chat_id: chat_id,
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Loop settings anchored at `now` (unix seconds). The cursor stays fixed for the run.
    pub fn poll_settings(&self, now: i64) -> PollSettings {
        PollSettings {
            from_date: now - self.lookback_days * SECONDS_IN_DAY,
            retry_period: Duration::from_secs(self.retry_period_secs),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read configuration from environment: {0}")]
    Env(#[from] envy::Error),

    #[error("Missing required environment variables: {}", .0.join(", "))]
    MissingVariables(Vec<&'static str>),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
