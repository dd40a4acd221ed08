// SPDX-FileCopyrightText: 2026 Kansel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Kansel cancellation-triage pipeline.
//!
//! Provides the error type, domain types, and collaborator traits used
//! throughout the workspace. The extraction, drafting, storage, and delivery
//! crates all build on the definitions here.

pub mod error;
pub mod traits;
pub mod types;

pub use error::{DeliveryError, KanselError};
pub use traits::{Delivery, LlmFallback, Storage};
pub use types::{
    CancellationReason, ConfidenceFactors, Draft, EdgeCase, ExtractionResult, HumanReview,
    InboundEmail, Language, NewRetryItem, ProcessOutcome, ProcessRoute, QueueStats,
    RetryStatus, ReviewDecision, ReviewPriority, ReviewRequest, SlackRetryItem, Ticket,
    Urgency,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kansel_error_has_all_variants() {
        let _config = KanselError::Config("test".into());
        let _validation = KanselError::Validation("missing field".into());
        let _storage = KanselError::Storage {
            source: Box::new(std::io::Error::other("test")),
        };
        let _delivery = KanselError::Delivery {
            message: "test".into(),
            source: None,
        };
        let _fallback = KanselError::Fallback {
            message: "test".into(),
            source: None,
        };
        let _pii = KanselError::PiiLeak("email pattern".into());
        let _timeout = KanselError::Timeout {
            duration: std::time::Duration::from_secs(30),
        };
        let _internal = KanselError::Internal("test".into());
    }

    #[test]
    fn delivery_error_messages_are_distinguishing() {
        let rate_limited = DeliveryError::RateLimited { retry_after: Some(42) };
        assert!(rate_limited.to_string().contains("rate limited"));
        let transient = DeliveryError::Transient("connection reset".into());
        assert!(transient.to_string().contains("transient"));
        let fatal = DeliveryError::Fatal("invalid channel".into());
        assert!(fatal.to_string().contains("permanent"));
    }
}
