// SPDX-FileCopyrightText: 2026 Kansel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ticket persistence. Rows are immutable once inserted.

use kansel_core::{KanselError, Ticket};
use rusqlite::params;
use rusqlite::types::Type;

use crate::database::{map_tr_err, Database};

pub async fn create_ticket(db: &Database, ticket: &Ticket) -> Result<(), KanselError> {
    let ticket = ticket.clone();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT INTO tickets (id, source, customer_email, raw_email, reason,
                                      move_date, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    ticket.id,
                    ticket.source,
                    ticket.customer_email,
                    ticket.raw_email,
                    ticket.reason.to_string(),
                    ticket.move_date.map(|d| d.to_string()),
                    ticket.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

pub async fn get_ticket(db: &Database, id: &str) -> Result<Option<Ticket>, KanselError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let result = conn.query_row(
                "SELECT id, source, customer_email, raw_email, reason, move_date,
                        created_at
                 FROM tickets WHERE id = ?1",
                params![id],
                |row| {
                    let reason: String = row.get(4)?;
                    let move_date: Option<String> = row.get(5)?;
                    Ok(Ticket {
                        id: row.get(0)?,
                        source: row.get(1)?,
                        customer_email: row.get(2)?,
                        raw_email: row.get(3)?,
                        reason: reason.parse().map_err(|e| {
                            rusqlite::Error::FromSqlConversionFailure(
                                4,
                                Type::Text,
                                Box::new(e),
                            )
                        })?,
                        move_date: move_date
                            .map(|d| {
                                d.parse().map_err(|e| {
                                    rusqlite::Error::FromSqlConversionFailure(
                                        5,
                                        Type::Text,
                                        Box::new(e),
                                    )
                                })
                            })
                            .transpose()?,
                        created_at: row.get(6)?,
                    })
                },
            );
            match result {
                Ok(ticket) => Ok(Some(ticket)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}
