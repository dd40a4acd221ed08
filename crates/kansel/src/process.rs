// SPDX-FileCopyrightText: 2026 Kansel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `kansel process` command implementation.
//!
//! One-shot pipeline run on a local file for manual triage: the file is
//! either a JSON webhook payload or a plain-text email body.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use kansel_config::KanselConfig;
use kansel_core::{InboundEmail, KanselError};
use kansel_llm::AnthropicExtractor;
use kansel_pipeline::{InboundPayload, Pipeline, PipelineSettings, normalize};
use kansel_slack::SlackClient;
use kansel_storage::SqliteStorage;

/// Run the `kansel process` command on one local email file.
pub async fn run_process(config: &KanselConfig, file: &Path) -> Result<(), KanselError> {
    let webhook_url = config.slack.webhook_url.clone().ok_or_else(|| {
        KanselError::Config("slack.webhook_url is required for processing".to_string())
    })?;

    let content = tokio::fs::read_to_string(file)
        .await
        .map_err(|e| KanselError::Validation(format!("cannot read {}: {e}", file.display())))?;
    let email = parse_input(&content)?;

    let storage = Arc::new(SqliteStorage::open(&config.storage.database_path).await?);
    let delivery = Arc::new(SlackClient::new(webhook_url)?);
    let fallback = match &config.anthropic.api_key {
        Some(api_key) => Some(Arc::new(AnthropicExtractor::new(
            api_key,
            config.anthropic.model.clone(),
        )?)),
        None => None,
    };

    let pipeline = Pipeline::new(
        storage,
        delivery,
        fallback,
        PipelineSettings {
            channel: config.slack.channel.clone(),
            ticket_url_base: config.slack.ticket_url_base.clone(),
            fallback_timeout: Duration::from_secs(config.pipeline.fallback_timeout_secs),
            context_snippets: Vec::new(),
        },
    );

    let outcome = pipeline.process_email(email).await;
    println!(
        "{}",
        serde_json::to_string_pretty(&outcome)
            .map_err(|e| KanselError::Internal(format!("failed to encode outcome: {e}")))?
    );

    // The Slack dispatch runs detached; wait for it before exit.
    pipeline.drain_dispatches().await;
    Ok(())
}

/// Accept either a JSON webhook payload or a bare text body.
fn parse_input(content: &str) -> Result<InboundEmail, KanselError> {
    if content.trim_start().starts_with('{') {
        let payload: InboundPayload = serde_json::from_str(content)
            .map_err(|e| KanselError::Validation(format!("invalid JSON payload: {e}")))?;
        return normalize(payload);
    }
    normalize(InboundPayload {
        source: Some("cli".to_string()),
        body: Some(content.to_string()),
        ..Default::default()
    })
}
