//! Configuration validation for Trail Herald.

use crate::config::AppConfig;
use colored::Colorize;

/// Result of configuration validation.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Critical errors.
    pub errors: Vec<String>,
    /// Warnings that should be addressed but don't prevent running.
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// Creates a new empty validation result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an error to the result.
    pub fn add_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    /// Adds a warning to the result.
    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Returns true if there are any errors.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns true if there are any warnings.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Prints the validation result to the console.
    pub fn print(&self) {
        if !self.warnings.is_empty() {
            println!();
            println!("{}", "Configuration Warnings:".yellow().bold());
            for warning in &self.warnings {
                println!("  {} {}", "⚠".yellow(), warning);
            }
        }

        if !self.errors.is_empty() {
            println!();
            println!("{}", "Configuration Errors:".red().bold());
            for error in &self.errors {
                println!("  {} {}", "✗".red(), error);
            }
        }

        if self.errors.is_empty() && self.warnings.is_empty() {
            println!("  {} Configuration OK", "✓".green());
        }
    }
}

/// Validates application configuration.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates the application configuration.
    pub fn validate(config: &AppConfig) -> ValidationResult {
        let mut result = ValidationResult::new();

        Self::validate_webhook_url(config, &mut result);
        Self::validate_notify_domain(config, &mut result);

        result
    }

    fn validate_webhook_url(config: &AppConfig, result: &mut ValidationResult) {
        if config.webhook_url.is_empty() {
            result.add_warning(
                "No webhook URL configured (webhook_url or SLACK_WEBHOOK_URL). \
                 Events will be processed but notifications will be logged and dropped.",
            );
            return;
        }

        if !config.webhook_url.starts_with("https://") {
            result.add_error(format!(
                "Webhook URL must use https: {}",
                config.webhook_url
            ));
        }
    }

    fn validate_notify_domain(config: &AppConfig, result: &mut ValidationResult) {
        if config.notify_domain.is_empty() {
            result.add_warning(
                "notify_domain is empty; the notification filter will match every actor.",
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_webhook_is_a_warning_not_an_error() {
        let config = AppConfig::default();
        let result = ConfigValidator::validate(&config);
        assert!(!result.has_errors());
        assert!(result.has_warnings());
    }

    #[test]
    fn test_non_https_webhook_is_an_error() {
        let config = AppConfig {
            webhook_url: "http://hooks.slack.com/services/x".to_string(),
            ..Default::default()
        };
        let result = ConfigValidator::validate(&config);
        assert!(result.has_errors());
    }

    #[test]
    fn test_valid_config_passes() {
        let config = AppConfig {
            webhook_url: "https://hooks.slack.com/services/T000/B000/XXXX".to_string(),
            ..Default::default()
        };
        let result = ConfigValidator::validate(&config);
        assert!(!result.has_errors());
        assert!(!result.has_warnings());
    }

    #[test]
    fn test_empty_domain_warns() {
        let config = AppConfig {
            webhook_url: "https://hooks.slack.com/services/T000/B000/XXXX".to_string(),
            notify_domain: String::new(),
            ..Default::default()
        };
        let result = ConfigValidator::validate(&config);
        assert!(!result.has_errors());
        assert!(result.has_warnings());
    }
}
