// SPDX-FileCopyrightText: 2026 Kansel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted delivery mock.

use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::Mutex;

use kansel_core::traits::Delivery;
use kansel_core::{DeliveryError, ReviewRequest};

/// A `Delivery` implementation that replays queued outcomes.
///
/// Outcomes are consumed FIFO; once the queue is empty every further post
/// succeeds. All posted requests are recorded for assertions.
#[derive(Default)]
pub struct MockDelivery {
    outcomes: Mutex<VecDeque<Result<(), DeliveryError>>>,
    posts: Mutex<Vec<ReviewRequest>>,
}

impl MockDelivery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the outcome for the next unanswered post.
    pub async fn push_outcome(&self, outcome: Result<(), DeliveryError>) {
        self.outcomes.lock().await.push_back(outcome);
    }

    /// Everything posted so far, in order.
    pub async fn posts(&self) -> Vec<ReviewRequest> {
        self.posts.lock().await.clone()
    }

    pub async fn post_count(&self) -> usize {
        self.posts.lock().await.len()
    }
}

#[async_trait]
impl Delivery for MockDelivery {
    async fn post_review(&self, request: &ReviewRequest) -> Result<(), DeliveryError> {
        self.posts.lock().await.push(request.clone());
        self.outcomes.lock().await.pop_front().unwrap_or(Ok(()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kansel_core::{ExtractionResult, Language};

    fn sample_request() -> ReviewRequest {
        ReviewRequest {
            ticket_id: "t-1".to_string(),
            draft_id: "d-1".to_string(),
            channel: "#cancellations".to_string(),
            original_email: "[email] masked".to_string(),
            subject: None,
            body: None,
            draft_text: "Hei,".to_string(),
            confidence: 0.9,
            extraction: ExtractionResult::non_cancellation(Language::No),
            ticket_url: None,
        }
    }

    #[tokio::test]
    async fn replays_outcomes_in_order_then_defaults_to_ok() {
        let mock = MockDelivery::new();
        mock.push_outcome(Err(DeliveryError::Transient("boom".to_string())))
            .await;
        mock.push_outcome(Err(DeliveryError::RateLimited {
            retry_after: Some(30),
        }))
        .await;

        let request = sample_request();
        assert!(matches!(
            mock.post_review(&request).await,
            Err(DeliveryError::Transient(_))
        ));
        assert!(matches!(
            mock.post_review(&request).await,
            Err(DeliveryError::RateLimited {
                retry_after: Some(30)
            })
        ));
        assert!(mock.post_review(&request).await.is_ok());
        assert_eq!(mock.post_count().await, 3);
    }
}
