// SPDX-FileCopyrightText: 2026 Kansel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence collaborator trait.
//!
//! The core calls these as opaque async operations; connection management,
//! schemas, and transactions live behind the implementation. All mutations
//! are single-row inserts/updates; no multi-row transactions are required by
//! the pipeline, and no compensating rollback is attempted (a created ticket
//! survives a failed draft insert).

use async_trait::async_trait;

use crate::error::KanselError;
use crate::types::{
    Draft, HumanReview, NewRetryItem, QueueStats, SlackRetryItem, Ticket,
};

/// Storage operations consumed by the pipeline, review handling, and the
/// Slack retry queue.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn create_ticket(&self, ticket: &Ticket) -> Result<(), KanselError>;

    async fn create_draft(&self, draft: &Draft) -> Result<(), KanselError>;

    async fn create_human_review(&self, review: &HumanReview) -> Result<(), KanselError>;

    async fn get_ticket(&self, id: &str) -> Result<Option<Ticket>, KanselError>;

    async fn get_draft(&self, id: &str) -> Result<Option<Draft>, KanselError>;

    // --- Retry queue operations ---

    /// Insert a new item with status=pending, retry_count=0, next_retry_at=now.
    /// Returns the generated queue id.
    async fn enqueue_retry(&self, item: &NewRetryItem) -> Result<i64, KanselError>;

    /// Items with status=pending, next_retry_at in the past, and
    /// retry_count < max_retries, oldest first.
    async fn due_retry_items(&self, max_retries: i64) -> Result<Vec<SlackRetryItem>, KanselError>;

    /// Atomic conditional pending -> processing transition. Returns `None`
    /// when the item is missing or already claimed; at-most-one worker holds
    /// a claim at a time.
    async fn claim_retry_item(&self, id: i64) -> Result<Option<SlackRetryItem>, KanselError>;

    /// Failed attempt: increment retry_count, set next_retry_at and
    /// last_error, status back to pending.
    async fn reschedule_retry_item(
        &self,
        id: i64,
        next_retry_at: &str,
        last_error: &str,
    ) -> Result<(), KanselError>;

    /// Successful delivery: status -> succeeded.
    async fn complete_retry_item(&self, id: i64) -> Result<(), KanselError>;

    /// Terminal failure after max retries: status -> failed, retry_count
    /// incremented one final time.
    async fn fail_retry_item(&self, id: i64, last_error: &str) -> Result<(), KanselError>;

    /// Aggregate counts by status for operational monitoring.
    async fn retry_queue_stats(&self) -> Result<QueueStats, KanselError>;
}
