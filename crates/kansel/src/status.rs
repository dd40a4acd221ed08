// SPDX-FileCopyrightText: 2026 Kansel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `kansel status` command implementation.
//!
//! Prints retry-queue counts by status for operational monitoring.

use kansel_config::KanselConfig;
use kansel_core::KanselError;
use kansel_core::traits::Storage;
use kansel_storage::SqliteStorage;

/// Run the `kansel status` command.
///
/// If `--json` is passed, outputs structured JSON for scripting.
pub async fn run_status(config: &KanselConfig, json: bool) -> Result<(), KanselError> {
    let storage = SqliteStorage::open(&config.storage.database_path).await?;
    let stats = storage.retry_queue_stats().await?;
    storage.close().await?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&stats)
                .map_err(|e| KanselError::Internal(format!("failed to encode stats: {e}")))?
        );
    } else {
        println!("Slack retry queue ({})", config.storage.database_path);
        println!("  pending:    {}", stats.pending);
        println!("  processing: {}", stats.processing);
        println!("  succeeded:  {}", stats.succeeded);
        println!("  failed:     {}", stats.failed);
    }
    Ok(())
}
