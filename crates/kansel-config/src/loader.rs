// SPDX-FileCopyrightText: 2026 Kansel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./kansel.toml` > `~/.config/kansel/kansel.toml` > `/etc/kansel/kansel.toml`
//! with environment variable overrides via `KANSEL_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::KanselConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/kansel/kansel.toml` (system-wide)
/// 3. `~/.config/kansel/kansel.toml` (user XDG config)
/// 4. `./kansel.toml` (local directory)
/// 5. `KANSEL_*` environment variables
pub fn load_config() -> Result<KanselConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<KanselConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(KanselConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<KanselConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(KanselConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(KanselConfig::default()))
        .merge(Toml::file("/etc/kansel/kansel.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("kansel/kansel.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("kansel.toml"))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names. `KANSEL_SLACK_WEBHOOK_URL` must map to
/// `slack.webhook_url`, not `slack.webhook.url`.
fn env_provider() -> Env {
    Env::prefixed("KANSEL_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: KANSEL_SLACK_WEBHOOK_URL -> "slack_webhook_url"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("agent_", "agent.", 1)
            .replacen("slack_", "slack.", 1)
            .replacen("anthropic_", "anthropic.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("pipeline_", "pipeline.", 1);
        mapped.into()
    })
}
