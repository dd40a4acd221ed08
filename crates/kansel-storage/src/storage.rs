// SPDX-FileCopyrightText: 2026 Kansel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the `Storage` trait.

use async_trait::async_trait;
use tracing::debug;

use kansel_core::traits::Storage;
use kansel_core::{
    Draft, HumanReview, KanselError, NewRetryItem, QueueStats, SlackRetryItem, Ticket,
};

use crate::database::Database;
use crate::queries;

/// SQLite-backed storage.
///
/// Wraps a [`Database`] handle and delegates all query operations to the
/// typed query modules.
pub struct SqliteStorage {
    db: Database,
}

impl SqliteStorage {
    /// Open the database at `path`, running migrations if needed.
    pub async fn open(path: &str) -> Result<Self, KanselError> {
        let db = Database::open(path).await?;
        debug!(path, "SQLite storage initialized");
        Ok(Self { db })
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Checkpoint the WAL; call on shutdown.
    pub async fn close(&self) -> Result<(), KanselError> {
        self.db.close().await
    }
}

#[async_trait]
impl Storage for SqliteStorage {
    async fn create_ticket(&self, ticket: &Ticket) -> Result<(), KanselError> {
        queries::tickets::create_ticket(&self.db, ticket).await
    }

    async fn create_draft(&self, draft: &Draft) -> Result<(), KanselError> {
        queries::drafts::create_draft(&self.db, draft).await
    }

    async fn create_human_review(&self, review: &HumanReview) -> Result<(), KanselError> {
        queries::reviews::create_human_review(&self.db, review).await
    }

    async fn get_ticket(&self, id: &str) -> Result<Option<Ticket>, KanselError> {
        queries::tickets::get_ticket(&self.db, id).await
    }

    async fn get_draft(&self, id: &str) -> Result<Option<Draft>, KanselError> {
        queries::drafts::get_draft(&self.db, id).await
    }

    async fn enqueue_retry(&self, item: &NewRetryItem) -> Result<i64, KanselError> {
        queries::retry_queue::enqueue(&self.db, item).await
    }

    async fn due_retry_items(
        &self,
        max_retries: i64,
    ) -> Result<Vec<SlackRetryItem>, KanselError> {
        queries::retry_queue::due_items(&self.db, max_retries).await
    }

    async fn claim_retry_item(&self, id: i64) -> Result<Option<SlackRetryItem>, KanselError> {
        queries::retry_queue::claim(&self.db, id).await
    }

    async fn reschedule_retry_item(
        &self,
        id: i64,
        next_retry_at: &str,
        last_error: &str,
    ) -> Result<(), KanselError> {
        queries::retry_queue::reschedule(&self.db, id, next_retry_at, last_error).await
    }

    async fn complete_retry_item(&self, id: i64) -> Result<(), KanselError> {
        queries::retry_queue::complete(&self.db, id).await
    }

    async fn fail_retry_item(&self, id: i64, last_error: &str) -> Result<(), KanselError> {
        queries::retry_queue::fail(&self.db, id, last_error).await
    }

    async fn retry_queue_stats(&self) -> Result<QueueStats, KanselError> {
        queries::retry_queue::stats(&self.db).await
    }
}
