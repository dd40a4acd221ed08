// SPDX-FileCopyrightText: 2026 Kansel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `kansel worker` command implementation.
//!
//! Periodic retry-queue processing loop with ctrl-c shutdown. Each tick runs
//! one pass over everything currently due.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};

use kansel_config::KanselConfig;
use kansel_core::KanselError;
use kansel_slack::{RetryConfig, RetryWorker, SlackClient};
use kansel_storage::SqliteStorage;

/// Run the `kansel worker` command until interrupted.
pub async fn run_worker(config: &KanselConfig) -> Result<(), KanselError> {
    let webhook_url = config.slack.webhook_url.clone().ok_or_else(|| {
        KanselError::Config("slack.webhook_url is required for the worker".to_string())
    })?;

    let storage = Arc::new(SqliteStorage::open(&config.storage.database_path).await?);
    let delivery = Arc::new(SlackClient::new(webhook_url)?);
    let worker = RetryWorker::new(
        Arc::clone(&storage),
        delivery,
        RetryConfig {
            max_retries: config.pipeline.max_retries,
            default_delay_secs: config.pipeline.default_delay_secs,
        },
    );

    let mut interval =
        tokio::time::interval(Duration::from_secs(config.pipeline.worker_interval_secs));
    info!(
        interval_secs = config.pipeline.worker_interval_secs,
        "retry worker started"
    );

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown signal received, stopping worker");
                break;
            }
            _ = interval.tick() => {
                match worker.process().await {
                    Ok(0) => {}
                    Ok(attempted) => info!(attempted, "retry pass completed"),
                    Err(e) => error!(error = %e, "retry pass failed"),
                }
            }
        }
    }

    storage.close().await?;
    Ok(())
}
