// SPDX-FileCopyrightText: 2026 Kansel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Draft persistence. One row per generated reply candidate.

use kansel_core::{Draft, KanselError};
use rusqlite::params;
use rusqlite::types::Type;

use crate::database::{map_tr_err, Database};

pub async fn create_draft(db: &Database, draft: &Draft) -> Result<(), KanselError> {
    let draft = draft.clone();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT INTO drafts (id, ticket_id, language, draft_text, confidence,
                                     model, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    draft.id,
                    draft.ticket_id,
                    draft.language.to_string(),
                    draft.draft_text,
                    draft.confidence,
                    draft.model,
                    draft.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

pub async fn get_draft(db: &Database, id: &str) -> Result<Option<Draft>, KanselError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let result = conn.query_row(
                "SELECT id, ticket_id, language, draft_text, confidence, model,
                        created_at
                 FROM drafts WHERE id = ?1",
                params![id],
                |row| {
                    let language: String = row.get(2)?;
                    Ok(Draft {
                        id: row.get(0)?,
                        ticket_id: row.get(1)?,
                        language: language.parse().map_err(|e| {
                            rusqlite::Error::FromSqlConversionFailure(
                                2,
                                Type::Text,
                                Box::new(e),
                            )
                        })?,
                        draft_text: row.get(3)?,
                        confidence: row.get(4)?,
                        model: row.get(5)?,
                        created_at: row.get(6)?,
                    })
                },
            );
            match result {
                Ok(draft) => Ok(Some(draft)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}
