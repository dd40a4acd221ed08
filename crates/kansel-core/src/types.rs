// SPDX-FileCopyrightText: 2026 Kansel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the Kansel workspace.
//!
//! These are the persisted entities (tickets, drafts, reviews, retry items)
//! and the transient extraction record that flows from the classifier to the
//! drafter, scorer, and delivery payload.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Why the customer wants to cancel.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CancellationReason {
    Moving,
    PaymentIssue,
    Other,
    Unknown,
}

/// Detected language of the inbound email. Norwegian is the business default
/// when detection is ambiguous.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Language {
    No,
    En,
    Sv,
}

/// Recognized non-standard situations requiring a distinct reply branch.
///
/// Detection is priority-ordered; see `kansel-extract::edge_case`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EdgeCase {
    None,
    NoAppAccess,
    CorporateAccount,
    FutureMoveDate,
    AlreadyCanceled,
    SameieConcern,
    PaymentDispute,
}

impl EdgeCase {
    /// Edge cases that have a dedicated reply template.
    pub fn is_templated(&self) -> bool {
        matches!(
            self,
            EdgeCase::NoAppAccess
                | EdgeCase::SameieConcern
                | EdgeCase::FutureMoveDate
                | EdgeCase::AlreadyCanceled
        )
    }
}

/// How urgently the customer wants the cancellation handled.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Immediate,
    Future,
    Unclear,
}

/// The three boolean sub-signals used as scoring inputs and review hints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfidenceFactors {
    /// Cancellation phrase is unambiguous and not hedged.
    pub clear_intent: bool,
    /// Required fields (reason, and date when moving) are present.
    pub complete_information: bool,
    /// No edge case detected.
    pub standard_case: bool,
}

impl ConfidenceFactors {
    /// True when all three factors hold; gates the pure template route.
    pub fn is_standard(&self) -> bool {
        self.clear_intent && self.complete_information && self.standard_case
    }
}

/// Structured intent extracted from one inbound email.
///
/// Transient: attached to a Ticket/Draft at creation time and serialized into
/// the Slack payload, but not persisted as its own row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub is_cancellation: bool,
    pub reason: CancellationReason,
    pub move_date: Option<NaiveDate>,
    pub language: Language,
    pub edge_case: EdgeCase,
    pub has_payment_issue: bool,
    pub payment_concerns: Vec<String>,
    pub urgency: Urgency,
    pub customer_concerns: Vec<String>,
    pub policy_risks: Vec<String>,
    pub confidence_factors: ConfidenceFactors,
}

impl ExtractionResult {
    /// The fixed non-cancellation result: everything absent or unknown.
    pub fn non_cancellation(language: Language) -> Self {
        Self {
            is_cancellation: false,
            reason: CancellationReason::Unknown,
            move_date: None,
            language,
            edge_case: EdgeCase::None,
            has_payment_issue: false,
            payment_concerns: Vec::new(),
            urgency: Urgency::Unclear,
            customer_concerns: Vec::new(),
            policy_risks: Vec::new(),
            confidence_factors: ConfidenceFactors::default(),
        }
    }
}

/// Review-prioritization bands derived from the confidence score.
///
/// Advisory policy constants, not hard gates: every draft still goes to a
/// human reviewer regardless of band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ReviewPriority {
    AutoApprove,
    High,
    Medium,
    Low,
    Manual,
}

impl ReviewPriority {
    pub fn from_score(score: f64) -> Self {
        if score >= 0.95 {
            ReviewPriority::AutoApprove
        } else if score >= 0.85 {
            ReviewPriority::High
        } else if score >= 0.70 {
            ReviewPriority::Medium
        } else if score >= 0.50 {
            ReviewPriority::Low
        } else {
            ReviewPriority::Manual
        }
    }
}

/// One inbound cancellation-candidate email. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: String,
    /// Free-text origin tag from the webhook collaborator.
    pub source: String,
    /// Masked customer email address.
    pub customer_email: String,
    /// Masked raw email body.
    pub raw_email: String,
    pub reason: CancellationReason,
    pub move_date: Option<NaiveDate>,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
}

/// One generated reply candidate, owned by exactly one ticket. Immutable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Draft {
    pub id: String,
    pub ticket_id: String,
    pub language: Language,
    pub draft_text: String,
    /// Confidence in [0,1], stored as a decimal string.
    pub confidence: String,
    /// Generating model identifier, e.g. "template-fallback" or an LLM model id.
    pub model: String,
    pub created_at: String,
}

/// A human decision on a draft.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ReviewDecision {
    Approve,
    Edit,
    Reject,
}

/// One completed human review of a draft. Created exactly once per review
/// action; immutable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HumanReview {
    pub id: String,
    pub ticket_id: String,
    pub draft_id: String,
    pub decision: ReviewDecision,
    /// The text that will be sent, possibly edited by the reviewer.
    pub final_text: String,
    /// Set when the edited text was cut at the edit-modal length cap.
    pub truncated: bool,
    pub reviewer_id: String,
    pub created_at: String,
}

/// Lifecycle states of a Slack retry-queue item.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RetryStatus {
    Pending,
    Processing,
    Succeeded,
    Failed,
}

/// One pending or failed Slack delivery attempt.
///
/// References a ticket/draft pair for bookkeeping but does not own them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlackRetryItem {
    pub id: i64,
    pub ticket_id: String,
    pub draft_id: String,
    pub channel: String,
    /// Masked original email.
    pub original_email: String,
    pub subject: Option<String>,
    pub body: Option<String>,
    pub draft_text: String,
    pub confidence: String,
    /// Serialized [`ExtractionResult`].
    pub extraction_json: String,
    pub ticket_url: Option<String>,
    pub retry_count: i64,
    /// RFC 3339; the item is due once this is in the past.
    pub next_retry_at: String,
    pub last_error: Option<String>,
    pub status: RetryStatus,
    pub created_at: String,
    pub updated_at: String,
}

/// Insert shape for a new retry-queue item (status and counters are set by
/// the storage layer: pending, retry_count = 0, next_retry_at = now).
#[derive(Debug, Clone, PartialEq)]
pub struct NewRetryItem {
    pub ticket_id: String,
    pub draft_id: String,
    pub channel: String,
    pub original_email: String,
    pub subject: Option<String>,
    pub body: Option<String>,
    pub draft_text: String,
    pub confidence: String,
    pub extraction_json: String,
    pub ticket_url: Option<String>,
    pub last_error: Option<String>,
}

/// Aggregate retry-queue counts for operational monitoring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueStats {
    pub pending: i64,
    pub processing: i64,
    pub succeeded: i64,
    pub failed: i64,
}

/// The payload handed to the delivery collaborator for one review message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRequest {
    pub ticket_id: String,
    pub draft_id: String,
    pub channel: String,
    /// Masked original email body.
    pub original_email: String,
    pub subject: Option<String>,
    pub body: Option<String>,
    pub draft_text: String,
    pub confidence: f64,
    pub extraction: ExtractionResult,
    pub ticket_url: Option<String>,
}

impl ReviewRequest {
    /// Build the retry-queue insert shape for a failed post.
    pub fn to_retry_item(&self, last_error: &str) -> NewRetryItem {
        NewRetryItem {
            ticket_id: self.ticket_id.clone(),
            draft_id: self.draft_id.clone(),
            channel: self.channel.clone(),
            original_email: self.original_email.clone(),
            subject: self.subject.clone(),
            body: self.body.clone(),
            draft_text: self.draft_text.clone(),
            confidence: format!("{:.2}", self.confidence),
            extraction_json: serde_json::to_string(&self.extraction)
                .unwrap_or_else(|_| "{}".to_string()),
            ticket_url: self.ticket_url.clone(),
            last_error: Some(last_error.to_string()),
        }
    }
}

/// One normalized inbound email, after webhook-body normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundEmail {
    pub source: String,
    pub customer_email: String,
    pub subject: Option<String>,
    pub raw_email: String,
}

/// Which path produced (or failed to produce) the outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProcessRoute {
    Template,
    LlmFallback,
    NoAction,
    Error,
}

/// Result of one `process_email` pipeline run. Errors are absorbed into this
/// shape; the pipeline never propagates them to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessOutcome {
    pub success: bool,
    pub ticket_id: Option<String>,
    pub draft_id: Option<String>,
    pub draft_text: Option<String>,
    pub confidence: f64,
    pub route: ProcessRoute,
    pub extraction: Option<ExtractionResult>,
    pub error: Option<String>,
}

impl ProcessOutcome {
    /// Successful run that created nothing (non-cancellation gating).
    pub fn no_action(extraction: ExtractionResult) -> Self {
        Self {
            success: true,
            ticket_id: None,
            draft_id: None,
            draft_text: None,
            confidence: 0.0,
            route: ProcessRoute::NoAction,
            extraction: Some(extraction),
            error: None,
        }
    }

    /// Failed run; the message is the only thing surfaced to the caller.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            ticket_id: None,
            draft_id: None,
            draft_text: None,
            confidence: 0.0,
            route: ProcessRoute::Error,
            extraction: None,
            error: Some(message.into()),
        }
    }
}
