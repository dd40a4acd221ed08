// SPDX-FileCopyrightText: 2026 Kansel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Retry-queue worker.
//!
//! One `process()` pass: load due items, claim each atomically, attempt
//! delivery, and map the outcome onto the item's next state. Rate limits
//! reschedule with the channel-provided delay; transient failures back off
//! exponentially; the retry budget is terminal.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use kansel_core::traits::{Delivery, Storage};
use kansel_core::{
    DeliveryError, KanselError, QueueStats, ReviewRequest, SlackRetryItem,
};

/// Scheduling knobs for the worker.
#[derive(Debug, Clone, Copy)]
pub struct RetryConfig {
    /// Attempts before an item is marked failed for good.
    pub max_retries: i64,
    /// Base delay in seconds; doubled per prior attempt for transient errors
    /// and used as the floor for rate-limit delays.
    pub default_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            default_delay_secs: 60,
        }
    }
}

/// Drains the persistent Slack retry queue.
pub struct RetryWorker<S, D> {
    storage: Arc<S>,
    delivery: Arc<D>,
    config: RetryConfig,
}

impl<S: Storage, D: Delivery> RetryWorker<S, D> {
    pub fn new(storage: Arc<S>, delivery: Arc<D>, config: RetryConfig) -> Self {
        Self {
            storage,
            delivery,
            config,
        }
    }

    /// One pass over everything currently due. Returns the number of items
    /// attempted. Storage errors abort the pass; delivery failures do not.
    pub async fn process(&self) -> Result<usize, KanselError> {
        let due = self.storage.due_retry_items(self.config.max_retries).await?;
        let mut attempted = 0;
        for item in due {
            // Another worker may have claimed it since the select.
            let Some(item) = self.storage.claim_retry_item(item.id).await? else {
                continue;
            };
            attempted += 1;
            self.attempt(item).await?;
        }
        Ok(attempted)
    }

    /// Counts by status for operational monitoring.
    pub async fn stats(&self) -> Result<QueueStats, KanselError> {
        self.storage.retry_queue_stats().await
    }

    async fn attempt(&self, item: SlackRetryItem) -> Result<(), KanselError> {
        let request = match review_request(&item) {
            Ok(request) => request,
            Err(e) => {
                // Undeliverable payload: no retry will fix it.
                warn!(id = item.id, error = %e, "retry item payload invalid");
                return self
                    .storage
                    .fail_retry_item(item.id, &format!("invalid payload: {e}"))
                    .await;
            }
        };

        match self.delivery.post_review(&request).await {
            Ok(()) => {
                info!(id = item.id, ticket_id = %item.ticket_id, "retry delivery succeeded");
                self.storage.complete_retry_item(item.id).await
            }
            Err(DeliveryError::RateLimited { retry_after }) => {
                let delay = retry_after
                    .unwrap_or(self.config.default_delay_secs)
                    .max(self.config.default_delay_secs);
                self.reschedule_or_fail(&item, delay, "Slack rate limited")
                    .await
            }
            Err(DeliveryError::Transient(message)) => {
                let exponent = u32::try_from(item.retry_count).unwrap_or(u32::MAX).min(16);
                let delay = self
                    .config
                    .default_delay_secs
                    .saturating_mul(2u64.saturating_pow(exponent));
                self.reschedule_or_fail(&item, delay, &message).await
            }
            Err(DeliveryError::Fatal(message)) => {
                // A failed attempt like any other, just without a special
                // delay; the retry budget still bounds it.
                self.reschedule_or_fail(&item, self.config.default_delay_secs, &message)
                    .await
            }
        }
    }

    async fn reschedule_or_fail(
        &self,
        item: &SlackRetryItem,
        delay_secs: u64,
        last_error: &str,
    ) -> Result<(), KanselError> {
        if item.retry_count + 1 >= self.config.max_retries {
            warn!(
                id = item.id,
                ticket_id = %item.ticket_id,
                retry_count = item.retry_count,
                "retry budget exhausted, marking failed"
            );
            return self.storage.fail_retry_item(item.id, last_error).await;
        }
        let next_retry_at = (Utc::now() + chrono::Duration::seconds(delay_secs as i64))
            .format("%Y-%m-%dT%H:%M:%S%.3fZ")
            .to_string();
        warn!(
            id = item.id,
            delay_secs,
            error = last_error,
            "delivery failed, rescheduled"
        );
        self.storage
            .reschedule_retry_item(item.id, &next_retry_at, last_error)
            .await
    }
}

/// Rebuild the delivery payload from a persisted queue row.
fn review_request(item: &SlackRetryItem) -> Result<ReviewRequest, KanselError> {
    let confidence: f64 = item
        .confidence
        .parse()
        .map_err(|e| KanselError::Validation(format!("bad confidence value: {e}")))?;
    let extraction = serde_json::from_str(&item.extraction_json)
        .map_err(|e| KanselError::Validation(format!("bad extraction payload: {e}")))?;
    Ok(ReviewRequest {
        ticket_id: item.ticket_id.clone(),
        draft_id: item.draft_id.clone(),
        channel: item.channel.clone(),
        original_email: item.original_email.clone(),
        subject: item.subject.clone(),
        body: item.body.clone(),
        draft_text: item.draft_text.clone(),
        confidence,
        extraction,
        ticket_url: item.ticket_url.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use kansel_core::{ExtractionResult, Language, NewRetryItem};
    use kansel_storage::SqliteStorage;
    use kansel_test_utils::MockDelivery;
    use tempfile::tempdir;

    async fn setup() -> (Arc<SqliteStorage>, Arc<MockDelivery>, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("queue.db");
        let storage = Arc::new(SqliteStorage::open(path.to_str().unwrap()).await.unwrap());
        (storage, Arc::new(MockDelivery::new()), dir)
    }

    fn worker(
        storage: &Arc<SqliteStorage>,
        delivery: &Arc<MockDelivery>,
        max_retries: i64,
    ) -> RetryWorker<SqliteStorage, MockDelivery> {
        RetryWorker::new(
            Arc::clone(storage),
            Arc::clone(delivery),
            RetryConfig {
                max_retries,
                default_delay_secs: 60,
            },
        )
    }

    fn sample_item() -> NewRetryItem {
        let extraction = ExtractionResult::non_cancellation(Language::No);
        NewRetryItem {
            ticket_id: "t-1".to_string(),
            draft_id: "d-1".to_string(),
            channel: "#cancellations".to_string(),
            original_email: "[email] masked body".to_string(),
            subject: None,
            body: None,
            draft_text: "Hei,".to_string(),
            confidence: "0.92".to_string(),
            extraction_json: serde_json::to_string(&extraction).unwrap(),
            ticket_url: None,
            last_error: Some("initial failure".to_string()),
        }
    }

    #[tokio::test]
    async fn successful_delivery_completes_item() {
        let (storage, delivery, _dir) = setup().await;
        let id = storage.enqueue_retry(&sample_item()).await.unwrap();

        let worker = worker(&storage, &delivery, 5);
        let attempted = worker.process().await.unwrap();
        assert_eq!(attempted, 1);
        assert_eq!(delivery.post_count().await, 1);

        let stats = worker.stats().await.unwrap();
        assert_eq!(stats.succeeded, 1);
        assert!(storage.claim_retry_item(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn transient_failure_reschedules_with_backoff() {
        let (storage, delivery, _dir) = setup().await;
        let id = storage.enqueue_retry(&sample_item()).await.unwrap();
        delivery
            .push_outcome(Err(DeliveryError::Transient("503".to_string())))
            .await;

        let worker = worker(&storage, &delivery, 5);
        worker.process().await.unwrap();

        // Rescheduled into the future: nothing due on the next pass.
        assert_eq!(worker.process().await.unwrap(), 0);

        let item = storage.claim_retry_item(id).await.unwrap().unwrap();
        assert_eq!(item.retry_count, 1);
        assert_eq!(item.last_error.as_deref(), Some("503"));
    }

    #[tokio::test]
    async fn rate_limit_uses_provided_delay() {
        let (storage, delivery, _dir) = setup().await;
        let id = storage.enqueue_retry(&sample_item()).await.unwrap();
        delivery
            .push_outcome(Err(DeliveryError::RateLimited {
                retry_after: Some(300),
            }))
            .await;

        let worker = worker(&storage, &delivery, 5);
        worker.process().await.unwrap();

        let item = storage.claim_retry_item(id).await.unwrap().unwrap();
        assert_eq!(item.last_error.as_deref(), Some("Slack rate limited"));
        // Due at least 300 seconds out.
        let due = chrono::DateTime::parse_from_rfc3339(&item.next_retry_at).unwrap();
        let delta = due.signed_duration_since(Utc::now()).num_seconds();
        assert!(delta > 250, "delta was {delta}");
    }

    #[tokio::test]
    async fn rate_limit_hint_wins_over_smaller_base_delay() {
        let (storage, delivery, _dir) = setup().await;
        let id = storage.enqueue_retry(&sample_item()).await.unwrap();
        delivery
            .push_outcome(Err(DeliveryError::RateLimited {
                retry_after: Some(42),
            }))
            .await;

        let worker = RetryWorker::new(
            Arc::clone(&storage),
            Arc::clone(&delivery),
            RetryConfig {
                max_retries: 5,
                default_delay_secs: 10,
            },
        );
        worker.process().await.unwrap();

        let item = storage.claim_retry_item(id).await.unwrap().unwrap();
        assert_eq!(item.retry_count, 1);
        let due = chrono::DateTime::parse_from_rfc3339(&item.next_retry_at).unwrap();
        let delta = due.signed_duration_since(Utc::now()).num_seconds();
        assert!((35..=42).contains(&delta), "delta was {delta}");
    }

    #[tokio::test]
    async fn retry_budget_exhaustion_is_terminal() {
        let (storage, delivery, _dir) = setup().await;
        let id = storage.enqueue_retry(&sample_item()).await.unwrap();
        delivery
            .push_outcome(Err(DeliveryError::Transient("boom".to_string())))
            .await;

        // max_retries = 1: the first failed attempt exhausts the budget.
        let worker = worker(&storage, &delivery, 1);
        worker.process().await.unwrap();

        let stats = worker.stats().await.unwrap();
        assert_eq!(stats.failed, 1);
        assert!(storage.claim_retry_item(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn invalid_payload_fails_without_delivery() {
        let (storage, delivery, _dir) = setup().await;
        let mut item = sample_item();
        item.extraction_json = "not json".to_string();
        storage.enqueue_retry(&item).await.unwrap();

        let worker = worker(&storage, &delivery, 5);
        worker.process().await.unwrap();

        assert_eq!(delivery.post_count().await, 0);
        assert_eq!(worker.stats().await.unwrap().failed, 1);
    }

    #[tokio::test]
    async fn monotonic_retry_count_across_failures() {
        let (storage, delivery, _dir) = setup().await;
        let id = storage.enqueue_retry(&sample_item()).await.unwrap();

        let worker = worker(&storage, &delivery, 10);
        let mut last_count = -1;
        for _ in 0..3 {
            delivery
                .push_outcome(Err(DeliveryError::Transient("again".to_string())))
                .await;
            // Pull the item back to due-now so the pass picks it up.
            let claimed = storage.claim_retry_item(id).await.unwrap();
            if let Some(item) = claimed {
                storage
                    .reschedule_retry_item(id, "2020-01-01T00:00:00.000Z", "manual")
                    .await
                    .unwrap();
                assert!(item.retry_count > last_count);
                last_count = item.retry_count;
            }
            worker.process().await.unwrap();
        }

        let final_item = storage.claim_retry_item(id).await.unwrap().unwrap();
        assert!(final_item.retry_count > last_count);
    }
}
