// SPDX-FileCopyrightText: 2026 Kansel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Human review state machine.
//!
//! A draft is born pending and moves to exactly one terminal state:
//! approved, edited, or rejected. One [`ReviewAction`] produces exactly one
//! persisted [`HumanReview`]; the draft row itself is never mutated.

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use kansel_core::traits::Storage;
use kansel_core::{HumanReview, KanselError, ReviewDecision};

/// Length cap for edited reply text, matching the review modal's input limit.
pub const MAX_FINAL_TEXT_CHARS: usize = 3000;

/// One reviewer decision on one draft.
#[derive(Debug, Clone)]
pub struct ReviewAction {
    pub ticket_id: String,
    pub draft_id: String,
    pub decision: ReviewDecision,
    /// Reviewer-provided text; only consulted on the edit path.
    pub final_text: String,
    pub reviewer_id: String,
}

/// Apply one review action, persisting the resulting terminal record.
///
/// The final text depends on the decision: approve keeps the draft text
/// verbatim, edit takes the reviewer's text (truncated at the cap), reject
/// stores no text. The ticket/draft pair must exist and match.
pub async fn apply_review<S: Storage>(
    storage: &S,
    action: ReviewAction,
) -> Result<HumanReview, KanselError> {
    let draft = storage
        .get_draft(&action.draft_id)
        .await?
        .ok_or_else(|| {
            KanselError::Validation(format!("unknown draft `{}`", action.draft_id))
        })?;
    if draft.ticket_id != action.ticket_id {
        return Err(KanselError::Validation(format!(
            "draft `{}` does not belong to ticket `{}`",
            action.draft_id, action.ticket_id
        )));
    }

    let (final_text, truncated) = match action.decision {
        ReviewDecision::Approve => (draft.draft_text, false),
        ReviewDecision::Edit => truncate_final_text(action.final_text),
        ReviewDecision::Reject => (String::new(), false),
    };

    let review = HumanReview {
        id: Uuid::new_v4().to_string(),
        ticket_id: action.ticket_id,
        draft_id: action.draft_id,
        decision: action.decision,
        final_text,
        truncated,
        reviewer_id: action.reviewer_id,
        created_at: Utc::now().to_rfc3339(),
    };
    storage.create_human_review(&review).await?;

    info!(
        review_id = %review.id,
        draft_id = %review.draft_id,
        decision = %review.decision,
        truncated = review.truncated,
        "review recorded"
    );
    Ok(review)
}

/// Cut edited text at the cap, counting characters rather than bytes so
/// multi-byte Norwegian letters never split.
fn truncate_final_text(text: String) -> (String, bool) {
    match text.char_indices().nth(MAX_FINAL_TEXT_CHARS) {
        Some((offset, _)) => (text[..offset].to_string(), true),
        None => (text, false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use kansel_core::{Draft, Language, Ticket};
    use kansel_storage::SqliteStorage;
    use tempfile::tempdir;

    async fn seeded_storage() -> (Arc<SqliteStorage>, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("review.db");
        let storage = Arc::new(SqliteStorage::open(path.to_str().unwrap()).await.unwrap());

        let ticket = Ticket {
            id: "t-1".to_string(),
            source: "test".to_string(),
            customer_email: "[email]".to_string(),
            raw_email: "masked body".to_string(),
            reason: kansel_core::CancellationReason::Moving,
            move_date: None,
            created_at: Utc::now().to_rfc3339(),
        };
        storage.create_ticket(&ticket).await.unwrap();
        let draft = Draft {
            id: "d-1".to_string(),
            ticket_id: "t-1".to_string(),
            language: Language::No,
            draft_text: "Hei,\n\nVi har registrert oppsigelsen.".to_string(),
            confidence: "0.90".to_string(),
            model: "template-fallback".to_string(),
            created_at: Utc::now().to_rfc3339(),
        };
        storage.create_draft(&draft).await.unwrap();
        (storage, dir)
    }

    fn action(decision: ReviewDecision, final_text: &str) -> ReviewAction {
        ReviewAction {
            ticket_id: "t-1".to_string(),
            draft_id: "d-1".to_string(),
            decision,
            final_text: final_text.to_string(),
            reviewer_id: "U123".to_string(),
        }
    }

    #[tokio::test]
    async fn approve_keeps_draft_text() {
        let (storage, _dir) = seeded_storage().await;
        let review = apply_review(&*storage, action(ReviewDecision::Approve, "ignored"))
            .await
            .unwrap();
        assert_eq!(review.decision, ReviewDecision::Approve);
        assert_eq!(review.final_text, "Hei,\n\nVi har registrert oppsigelsen.");
        assert!(!review.truncated);
    }

    #[tokio::test]
    async fn edit_uses_reviewer_text() {
        let (storage, _dir) = seeded_storage().await;
        let review = apply_review(&*storage, action(ReviewDecision::Edit, "Hei, kort svar."))
            .await
            .unwrap();
        assert_eq!(review.final_text, "Hei, kort svar.");
        assert!(!review.truncated);
    }

    #[tokio::test]
    async fn edit_truncates_at_cap() {
        let (storage, _dir) = seeded_storage().await;
        let long = "x".repeat(MAX_FINAL_TEXT_CHARS + 1);
        let review = apply_review(&*storage, action(ReviewDecision::Edit, &long))
            .await
            .unwrap();
        assert_eq!(review.final_text.chars().count(), MAX_FINAL_TEXT_CHARS);
        assert!(review.truncated);
    }

    #[tokio::test]
    async fn edit_at_exact_cap_is_not_truncated() {
        let (storage, _dir) = seeded_storage().await;
        let exact = "\u{e5}".repeat(MAX_FINAL_TEXT_CHARS);
        let review = apply_review(&*storage, action(ReviewDecision::Edit, &exact))
            .await
            .unwrap();
        assert_eq!(review.final_text.chars().count(), MAX_FINAL_TEXT_CHARS);
        assert!(!review.truncated);
    }

    #[tokio::test]
    async fn reject_stores_no_text() {
        let (storage, _dir) = seeded_storage().await;
        let review = apply_review(&*storage, action(ReviewDecision::Reject, "ignored"))
            .await
            .unwrap();
        assert_eq!(review.final_text, "");
        assert!(!review.truncated);
    }

    #[tokio::test]
    async fn unknown_draft_is_rejected() {
        let (storage, _dir) = seeded_storage().await;
        let mut bad = action(ReviewDecision::Approve, "");
        bad.draft_id = "missing".to_string();
        let err = apply_review(&*storage, bad).await.unwrap_err();
        assert!(matches!(err, KanselError::Validation(_)));
    }

    #[tokio::test]
    async fn mismatched_ticket_is_rejected() {
        let (storage, _dir) = seeded_storage().await;
        let mut bad = action(ReviewDecision::Approve, "");
        bad.ticket_id = "t-2".to_string();
        let err = apply_review(&*storage, bad).await.unwrap_err();
        assert!(matches!(err, KanselError::Validation(_)));
    }
}
