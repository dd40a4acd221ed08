// SPDX-FileCopyrightText: 2026 Kansel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Human review persistence. Exactly one row per review action.

use kansel_core::{HumanReview, KanselError};
use rusqlite::params;

use crate::database::{map_tr_err, Database};

pub async fn create_human_review(
    db: &Database,
    review: &HumanReview,
) -> Result<(), KanselError> {
    let review = review.clone();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT INTO human_reviews (id, ticket_id, draft_id, decision,
                                            final_text, truncated, reviewer_id,
                                            created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    review.id,
                    review.ticket_id,
                    review.draft_id,
                    review.decision.to_string(),
                    review.final_text,
                    review.truncated as i64,
                    review.reviewer_id,
                    review.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}
