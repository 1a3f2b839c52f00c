//! Configuration System
//!
//! Loads configuration from a TOML file with environment variable overrides.
//! Every field has a default, so an empty file (or no file) is valid.

use chrono::FixedOffset;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::chart::{TitleStyle, DEFAULT_CHART_NAME};
use crate::fetcher::DEFAULT_STATS_URL;
use crate::phrases::Phrasebook;
use crate::reconciler::DisplayZone;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub endpoint: EndpointConfig,

    #[serde(default)]
    pub polling: PollingConfig,

    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub phrases: Phrasebook,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Stats endpoint configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EndpointConfig {
    #[serde(default = "default_url")]
    pub url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
}

fn default_url() -> String {
    DEFAULT_STATS_URL.to_string()
}

fn default_request_timeout() -> u64 {
    10_000
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            request_timeout_ms: default_request_timeout(),
        }
    }
}

impl EndpointConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Polling cadence configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_interval")]
    pub interval_ms: u64,

    #[serde(default = "default_notice_expiry")]
    pub notice_expiry_ms: u64,
}

fn default_interval() -> u64 {
    30_000
}

fn default_notice_expiry() -> u64 {
    5000
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval(),
            notice_expiry_ms: default_notice_expiry(),
        }
    }
}

impl PollingConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn notice_expiry(&self) -> Duration {
        Duration::from_millis(self.notice_expiry_ms)
    }
}

/// How values are presented
#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_chart_name")]
    pub chart_name: String,

    #[serde(default = "default_chart_title_font_size")]
    pub chart_title_font_size: u32,

    /// Fixed offset for the last-updated label; the host's zone if unset
    pub utc_offset_minutes: Option<i32>,
}

fn default_chart_name() -> String {
    DEFAULT_CHART_NAME.to_string()
}

fn default_chart_title_font_size() -> u32 {
    14
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            chart_name: default_chart_name(),
            chart_title_font_size: default_chart_title_font_size(),
            utc_offset_minutes: None,
        }
    }
}

impl DisplayConfig {
    /// Zone timestamps are rendered in
    pub fn display_zone(&self) -> DisplayZone {
        self.utc_offset_minutes
            .and_then(|minutes| FixedOffset::east_opt(minutes.saturating_mul(60)))
            .map(DisplayZone::Fixed)
            .unwrap_or(DisplayZone::Local)
    }

    pub fn title_style(&self) -> TitleStyle {
        TitleStyle {
            display: true,
            font_size: self.chart_title_font_size,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let (config, source) = Self::discover();
        source.log();
        config
    }

    /// Load from default locations or environment without logging.
    ///
    /// The returned [`ConfigSource`] can be logged once a subscriber is
    /// installed.
    pub fn discover() -> (Self, ConfigSource) {
        let config_paths: Vec<PathBuf> = [
            dirs::config_dir().map(|p| p.join("dashboard-sync").join("config.toml")),
            Some(PathBuf::from("/etc/dashboard-sync/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ]
        .into_iter()
        .flatten()
        .collect();

        Self::discover_in(&config_paths)
    }

    fn discover_in(paths: &[PathBuf]) -> (Self, ConfigSource) {
        let mut source = ConfigSource::default();

        for path in paths {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        source.path = Some(path.clone());
                        return (config, source);
                    }
                    Err(e) => source.skipped.push((path.clone(), e)),
                }
            }
        }

        (Self::from_env(), source)
    }

    /// Reject settings the runtime cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let durations = [
            ("endpoint.request_timeout_ms", self.endpoint.request_timeout_ms),
            ("polling.interval_ms", self.polling.interval_ms),
            ("polling.notice_expiry_ms", self.polling.notice_expiry_ms),
        ];

        for (field, value) in durations {
            if value == 0 {
                return Err(ConfigError::Invalid {
                    field: field.to_string(),
                    error: "must be greater than zero".to_string(),
                });
            }
        }

        Ok(())
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("DASHBOARD_STATS_URL") {
            self.endpoint.url = url;
        }
        if let Some(ms) = env_parse("DASHBOARD_REQUEST_TIMEOUT_MS") {
            self.endpoint.request_timeout_ms = ms;
        }
        if let Some(ms) = env_parse("DASHBOARD_POLL_INTERVAL_MS") {
            self.polling.interval_ms = ms;
        }
        if let Some(minutes) = env_parse("DASHBOARD_UTC_OFFSET_MINUTES") {
            self.display.utc_offset_minutes = Some(minutes);
        }
        if let Ok(level) = std::env::var("DASHBOARD_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("DASHBOARD_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring invalid {}={:?}", key, raw);
            None
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Invalid config value {field}: {error}")]
    Invalid { field: String, error: String },
}

/// Where [`Config::discover`] found its settings
#[derive(Debug, Default)]
pub struct ConfigSource {
    /// File the config came from; `None` means defaults plus environment
    pub path: Option<PathBuf>,
    /// Candidate files that exist but failed to load
    pub skipped: Vec<(PathBuf, ConfigError)>,
}

impl ConfigSource {
    /// Source for a config loaded from an explicit path
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            skipped: Vec::new(),
        }
    }

    pub fn log(&self) {
        for (path, e) in &self.skipped {
            tracing::warn!("Failed to load config from {:?}: {}", path, e);
        }
        match &self.path {
            Some(path) => tracing::info!("Loaded config from {:?}", path),
            None => tracing::info!("Using default config with environment overrides"),
        }
    }
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Dashboard stats sync configuration
#
# Environment variables override these settings:
# - DASHBOARD_STATS_URL
# - DASHBOARD_REQUEST_TIMEOUT_MS
# - DASHBOARD_POLL_INTERVAL_MS
# - DASHBOARD_UTC_OFFSET_MINUTES
# - DASHBOARD_LOG_LEVEL
# - DASHBOARD_LOG_FORMAT

[endpoint]
# Stats summary endpoint
url = "http://localhost:5000/api/stats"

# Per-request timeout (ms)
request_timeout_ms = 10000

[polling]
# Time between polls (ms)
interval_ms = 30000

# How long an error notice stays visible (ms)
notice_expiry_ms = 5000

[display]
# Name the page registers its channel chart under
chart_name = "channelsChart"

# Chart title font size (px)
chart_title_font_size = 14

# Offset for the last-updated label in minutes east of UTC
# (defaults to the host's local offset)
# utc_offset_minutes = 120

[phrases]
network_subtitle = "Мережева статистика"
own_subtitle = "Статистика ваших каналів"
network_chart_title = "Мережеве співвідношення"
own_chart_title = "Ваші канали"
last_updated_prefix = "Останнє оновлення: "
fetch_error = "Помилка завантаження статистики. Спробуйте пізніше."

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
