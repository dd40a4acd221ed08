// SPDX-FileCopyrightText: 2026 Kansel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as webhook URL shape, channel naming, and retry bounds.

use crate::diagnostic::ConfigError;
use crate::model::KanselConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &KanselConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.agent.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "agent.log_level must be one of {}, got `{}`",
                LOG_LEVELS.join(", "),
                config.agent.log_level
            ),
        });
    }

    if let Some(url) = &config.slack.webhook_url {
        if url.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: "slack.webhook_url must not be empty when set".to_string(),
            });
        } else if !url.starts_with("https://") {
            errors.push(ConfigError::Validation {
                message: format!("slack.webhook_url must use https, got `{url}`"),
            });
        }
    }

    if !config.slack.channel.starts_with('#') {
        errors.push(ConfigError::Validation {
            message: format!(
                "slack.channel must start with `#`, got `{}`",
                config.slack.channel
            ),
        });
    }

    if config.anthropic.model.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "anthropic.model must not be empty".to_string(),
        });
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if config.pipeline.max_retries < 1 {
        errors.push(ConfigError::Validation {
            message: format!(
                "pipeline.max_retries must be at least 1, got {}",
                config.pipeline.max_retries
            ),
        });
    }

    if config.pipeline.fallback_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "pipeline.fallback_timeout_secs must be at least 1".to_string(),
        });
    }

    if config.pipeline.worker_interval_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "pipeline.worker_interval_secs must be at least 1".to_string(),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let config = KanselConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn empty_database_path_fails_validation() {
        let mut config = KanselConfig::default();
        config.storage.database_path = "".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("database_path"))
        ));
    }

    #[test]
    fn http_webhook_fails_validation() {
        let mut config = KanselConfig::default();
        config.slack.webhook_url = Some("http://hooks.slack.com/x".to_string());
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("https"))
        ));
    }

    #[test]
    fn zero_max_retries_fails_validation() {
        let mut config = KanselConfig::default();
        config.pipeline.max_retries = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("max_retries"))
        ));
    }

    #[test]
    fn all_errors_are_collected() {
        let mut config = KanselConfig::default();
        config.agent.log_level = "loud".to_string();
        config.slack.channel = "triage".to_string();
        config.storage.database_path = " ".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn valid_custom_config_passes() {
        let mut config = KanselConfig::default();
        config.slack.webhook_url = Some("https://hooks.slack.com/services/T0/B0/x".to_string());
        config.slack.channel = "#triage".to_string();
        config.anthropic.api_key = Some("sk-ant-test".to_string());
        config.storage.database_path = "/tmp/kansel.db".to_string();
        assert!(validate_config(&config).is_ok());
    }
}
