// SPDX-FileCopyrightText: 2026 Kansel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Delivery collaborator trait (the human-review notification channel).

use async_trait::async_trait;

use crate::error::DeliveryError;
use crate::types::ReviewRequest;

/// Posts one draft-review message to the notification channel.
///
/// Failures are classified by [`DeliveryError`] so the retry queue can pick
/// the right rescheduling policy. A failed post never fails the originating
/// request; the caller enqueues and moves on.
#[async_trait]
pub trait Delivery: Send + Sync {
    async fn post_review(&self, request: &ReviewRequest) -> Result<(), DeliveryError>;
}
