// SPDX-FileCopyrightText: 2026 Kansel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Kansel triage pipeline.

use thiserror::Error;

/// The primary error type used across all Kansel crates and collaborator traits.
#[derive(Debug, Error)]
pub enum KanselError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Invalid inbound input (missing required fields). Never retried, never
    /// partially persisted.
    #[error("validation error: {0}")]
    Validation(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Delivery channel errors that escaped the retry queue (queue bookkeeping
    /// itself failing, not a failed post).
    #[error("delivery error: {message}")]
    Delivery {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// LLM fallback errors (API failure, quota, auth). The message carries a
    /// distinguishing substring ("timed out", "rate limit", "quota",
    /// "authentication") that callers map to retry policy.
    #[error("fallback error: {message}")]
    Fallback {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Unmasked PII detected in a payload destined for an external read path.
    /// Fatal for that payload; the payload is never emitted.
    #[error("unmasked PII in outbound payload: {0}")]
    PiiLeak(String),

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Errors returned by the delivery collaborator for a single post attempt.
///
/// The retry queue maps these onto its scheduling policy: `RateLimited`
/// reschedules with the channel-provided delay, `Transient` with exponential
/// backoff, and `Fatal` counts as a failed attempt without a special delay.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The channel returned HTTP 429. `retry_after` is seconds, when provided.
    #[error("rate limited by delivery channel")]
    RateLimited { retry_after: Option<u64> },

    /// Network-level or 5xx failure worth retrying.
    #[error("transient delivery failure: {0}")]
    Transient(String),

    /// Non-retryable failure (bad payload, auth, unknown channel).
    #[error("permanent delivery failure: {0}")]
    Fatal(String),
}
