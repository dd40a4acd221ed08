// SPDX-FileCopyrightText: 2026 Kansel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Kansel triage service.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Kansel configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct KanselConfig {
    /// Service identity and logging settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Slack review-channel delivery settings.
    #[serde(default)]
    pub slack: SlackConfig,

    /// Anthropic API settings for the LLM fallback.
    #[serde(default)]
    pub anthropic: AnthropicConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Pipeline and retry-worker settings.
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

/// Service identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the service instance.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_agent_name() -> String {
    "kansel".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Slack delivery configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SlackConfig {
    /// Incoming webhook URL. `None` disables delivery (drafts still persist).
    #[serde(default)]
    pub webhook_url: Option<String>,

    /// Channel review messages are posted to.
    #[serde(default = "default_channel")]
    pub channel: String,

    /// Base URL for ticket links included in review messages.
    /// The ticket id is appended to this base.
    #[serde(default)]
    pub ticket_url_base: Option<String>,
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            channel: default_channel(),
            ticket_url_base: None,
        }
    }
}

fn default_channel() -> String {
    "#cancellation-review".to_string()
}

/// Anthropic API configuration for the fallback extractor.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AnthropicConfig {
    /// Anthropic API key. `None` disables the LLM fallback; ambiguous
    /// emails then go through the deterministic path only.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model to use for fallback extraction.
    #[serde(default = "default_model")]
    pub model: String,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
        }
    }
}

fn default_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("kansel").join("kansel.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("kansel.db"))
        .to_string_lossy()
        .into_owned()
}

/// Pipeline and retry-worker configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    /// Delivery attempts before a queued Slack message is marked failed.
    #[serde(default = "default_max_retries")]
    pub max_retries: i64,

    /// Base retry delay in seconds. Doubled per prior attempt for
    /// transient failures.
    #[serde(default = "default_retry_delay_secs")]
    pub default_delay_secs: u64,

    /// Seconds between retry-worker passes over the queue.
    #[serde(default = "default_worker_interval_secs")]
    pub worker_interval_secs: u64,

    /// Wall-clock budget in seconds for one LLM fallback extraction.
    #[serde(default = "default_fallback_timeout_secs")]
    pub fallback_timeout_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            default_delay_secs: default_retry_delay_secs(),
            worker_interval_secs: default_worker_interval_secs(),
            fallback_timeout_secs: default_fallback_timeout_secs(),
        }
    }
}

fn default_max_retries() -> i64 {
    5
}

fn default_retry_delay_secs() -> u64 {
    60
}

fn default_worker_interval_secs() -> u64 {
    30
}

fn default_fallback_timeout_secs() -> u64 {
    30
}
