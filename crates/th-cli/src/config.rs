//! Configuration loading for the Trail Herald CLI.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Webhook destination URL. Empty means unconfigured: events are
    /// still processed and rendered, delivery is logged and skipped.
    #[serde(default)]
    pub webhook_url: String,

    /// Domain marker an actor must contain to be notified about.
    #[serde(default = "default_notify_domain")]
    pub notify_domain: String,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_notify_domain() -> String {
    "@xyz.com".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            webhook_url: String::new(),
            notify_domain: default_notify_domain(),
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Applies environment variable overrides.
    ///
    /// `SLACK_WEBHOOK_URL` and `NOTIFY_DOMAIN` take precedence over file
    /// values, matching how the webhook was originally provisioned.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("SLACK_WEBHOOK_URL") {
            self.webhook_url = url;
        }
        if let Ok(domain) = std::env::var("NOTIFY_DOMAIN") {
            self.notify_domain = domain;
        }
    }

    /// Creates a copy with secrets redacted.
    ///
    /// Webhook URLs embed a secret token, so the whole URL is masked.
    pub fn redact_secrets(&self) -> Self {
        let mut config = self.clone();
        if !config.webhook_url.is_empty() {
            config.webhook_url = "***REDACTED***".to_string();
        }
        config
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to use JSON format.
    #[serde(default)]
    pub json_format: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json_format: false,
        }
    }
}
