//! Configuration loading for cronwatch.
//!
//! Loads `config.toml` with per-field defaults. Every section uses
//! `#[serde(default)]` so a minimal or empty config file is valid, and a
//! missing file at the default location means "all defaults".

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use crate::flavor::Flavor;

/// Top-level cronwatch configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CronwatchConfig {
    /// How far back (minutes) the journal is queried.
    #[serde(default = "default_window_minutes")]
    pub window_minutes: u32,

    /// Flavor used when the CLI does not pick one.
    #[serde(default)]
    pub flavor: Flavor,

    /// Notification destination.
    #[serde(default)]
    pub webhook: WebhookConfig,

    /// Log source fallbacks.
    #[serde(default)]
    pub sources: SourcesConfig,

    /// Optional file logging.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for CronwatchConfig {
    fn default() -> Self {
        Self {
            window_minutes: default_window_minutes(),
            flavor: Flavor::default(),
            webhook: WebhookConfig::default(),
            sources: SourcesConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Webhook delivery settings.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookConfig {
    /// Destination URL. Empty means reports are built but not sent.
    #[serde(default)]
    pub url: String,

    /// Upper bound on the single outbound request.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Where log lines come from when the journal is unavailable.
#[derive(Debug, Clone, Deserialize)]
pub struct SourcesConfig {
    /// Lines kept from the end of each fallback file.
    #[serde(default = "default_tail_lines")]
    pub tail_lines: usize,

    /// Files tailed by the cron flavor when the journal query fails.
    #[serde(default = "default_cron_fallback_logs")]
    pub cron_fallback_logs: Vec<PathBuf>,

    /// File tailed by the fcron flavor in addition to the journal.
    #[serde(default = "default_fcron_fallback_log")]
    pub fcron_fallback_log: PathBuf,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            tail_lines: default_tail_lines(),
            cron_fallback_logs: default_cron_fallback_logs(),
            fcron_fallback_log: default_fcron_fallback_log(),
        }
    }
}

/// File logging settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    /// Directory for daily-rotated JSON logs. Stderr only when unset.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl CronwatchConfig {
    /// Validate that configuration values are within sane bounds.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.window_minutes >= 1, "window_minutes must be >= 1");
        anyhow::ensure!(
            self.webhook.timeout_secs >= 1,
            "webhook.timeout_secs must be >= 1"
        );
        anyhow::ensure!(
            self.sources.tail_lines >= 1,
            "sources.tail_lines must be >= 1"
        );
        if !self.webhook.url.is_empty() {
            let parsed = url::Url::parse(&self.webhook.url)
                .with_context(|| format!("webhook.url is not a valid URL: {}", self.webhook.url))?;
            anyhow::ensure!(
                parsed.scheme() == "https" || parsed.scheme() == "http",
                "webhook.url must use http or https"
            );
        }
        Ok(())
    }

    /// Apply command-line / environment overrides on top of file values.
    pub fn with_overrides(
        mut self,
        webhook_url: Option<String>,
        window_minutes: Option<u32>,
    ) -> Self {
        if let Some(url) = webhook_url {
            self.webhook.url = url;
        }
        if let Some(minutes) = window_minutes {
            self.window_minutes = minutes;
        }
        self
    }
}

/// Load configuration from a TOML file.
///
/// Values are not validated here; callers apply overrides first and then
/// call [`CronwatchConfig::validate`].
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_config(path: &Path) -> anyhow::Result<CronwatchConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read cronwatch config at {}", path.display()))?;
    let config: CronwatchConfig = toml::from_str(&contents)
        .with_context(|| format!("failed to parse cronwatch config at {}", path.display()))?;
    Ok(config)
}

/// Load the config from an explicit path, or from the default location if
/// it exists, or fall back to defaults.
///
/// # Errors
///
/// Returns an error if an existing file is unreadable or malformed.
pub fn load_config_or_default(explicit: Option<&Path>) -> anyhow::Result<CronwatchConfig> {
    if let Some(path) = explicit {
        return load_config(path);
    }
    match default_config_path() {
        Some(path) if path.exists() => load_config(&path),
        _ => Ok(CronwatchConfig::default()),
    }
}

/// Default config location (`~/.config/cronwatch/config.toml` on Linux).
pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "cronwatch")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

// Default value functions for serde.

fn default_window_minutes() -> u32 {
    10
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_tail_lines() -> usize {
    500
}

fn default_cron_fallback_logs() -> Vec<PathBuf> {
    ["/var/log/syslog", "/var/log/cron", "/var/log/fcron.log"]
        .into_iter()
        .map(PathBuf::from)
        .collect()
}

fn default_fcron_fallback_log() -> PathBuf {
    PathBuf::from("/var/log/fcron.log")
}
