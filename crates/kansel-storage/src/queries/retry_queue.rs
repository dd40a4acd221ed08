// SPDX-FileCopyrightText: 2026 Kansel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Slack retry-queue operations.
//!
//! State machine per item: pending -> processing -> {succeeded | pending
//! (rescheduled) | failed}. The claim is an atomic conditional UPDATE so two
//! workers can never process the same item concurrently.

use kansel_core::{KanselError, NewRetryItem, QueueStats, SlackRetryItem};
use rusqlite::params;
use rusqlite::types::Type;

use crate::database::{map_tr_err, Database};

const NOW: &str = "strftime('%Y-%m-%dT%H:%M:%fZ', 'now')";

fn item_from_row(row: &rusqlite::Row<'_>) -> Result<SlackRetryItem, rusqlite::Error> {
    let status: String = row.get(14)?;
    Ok(SlackRetryItem {
        id: row.get(0)?,
        ticket_id: row.get(1)?,
        draft_id: row.get(2)?,
        channel: row.get(3)?,
        original_email: row.get(4)?,
        subject: row.get(5)?,
        body: row.get(6)?,
        draft_text: row.get(7)?,
        confidence: row.get(8)?,
        extraction_json: row.get(9)?,
        ticket_url: row.get(10)?,
        retry_count: row.get(11)?,
        next_retry_at: row.get(12)?,
        last_error: row.get(13)?,
        status: status.parse().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(14, Type::Text, Box::new(e))
        })?,
        created_at: row.get(15)?,
        updated_at: row.get(16)?,
    })
}

const SELECT_COLUMNS: &str = "id, ticket_id, draft_id, channel, original_email,
        subject, body, draft_text, confidence, extraction_json, ticket_url,
        retry_count, next_retry_at, last_error, status, created_at, updated_at";

/// Insert a new pending item due immediately. Returns the generated id.
pub async fn enqueue(db: &Database, item: &NewRetryItem) -> Result<i64, KanselError> {
    let item = item.clone();
    db.connection()
        .call(move |conn| -> Result<i64, rusqlite::Error> {
            conn.execute(
                "INSERT INTO slack_retry_queue
                     (ticket_id, draft_id, channel, original_email, subject, body,
                      draft_text, confidence, extraction_json, ticket_url, last_error)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    item.ticket_id,
                    item.draft_id,
                    item.channel,
                    item.original_email,
                    item.subject,
                    item.body,
                    item.draft_text,
                    item.confidence,
                    item.extraction_json,
                    item.ticket_url,
                    item.last_error,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(map_tr_err)
}

/// Pending items due now with retry budget left, oldest due first.
pub async fn due_items(
    db: &Database,
    max_retries: i64,
) -> Result<Vec<SlackRetryItem>, KanselError> {
    db.connection()
        .call(move |conn| -> Result<Vec<SlackRetryItem>, rusqlite::Error> {
            let sql = format!(
                "SELECT {SELECT_COLUMNS} FROM slack_retry_queue
                 WHERE status = 'pending' AND next_retry_at <= {NOW}
                       AND retry_count < ?1
                 ORDER BY next_retry_at ASC, id ASC"
            );
            let mut stmt = conn.prepare(&sql)?;
            let items = stmt
                .query_map(params![max_retries], item_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(items)
        })
        .await
        .map_err(map_tr_err)
}

/// Atomically claim one pending item for processing.
///
/// The conditional UPDATE succeeds for exactly one caller; everyone else
/// sees zero affected rows and gets `None`.
pub async fn claim(db: &Database, id: i64) -> Result<Option<SlackRetryItem>, KanselError> {
    db.connection()
        .call(move |conn| -> Result<Option<SlackRetryItem>, rusqlite::Error> {
            let tx = conn.transaction()?;
            let changed = tx.execute(
                &format!(
                    "UPDATE slack_retry_queue
                     SET status = 'processing', updated_at = {NOW}
                     WHERE id = ?1 AND status = 'pending'"
                ),
                params![id],
            )?;
            if changed == 0 {
                tx.commit()?;
                return Ok(None);
            }
            let item = tx.query_row(
                &format!("SELECT {SELECT_COLUMNS} FROM slack_retry_queue WHERE id = ?1"),
                params![id],
                item_from_row,
            )?;
            tx.commit()?;
            Ok(Some(item))
        })
        .await
        .map_err(map_tr_err)
}

/// Failed attempt: bump the retry counter and put the item back in pending
/// with a new due time.
pub async fn reschedule(
    db: &Database,
    id: i64,
    next_retry_at: &str,
    last_error: &str,
) -> Result<(), KanselError> {
    let next_retry_at = next_retry_at.to_string();
    let last_error = last_error.to_string();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                &format!(
                    "UPDATE slack_retry_queue
                     SET status = 'pending', retry_count = retry_count + 1,
                         next_retry_at = ?2, last_error = ?3, updated_at = {NOW}
                     WHERE id = ?1"
                ),
                params![id, next_retry_at, last_error],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Successful delivery.
pub async fn complete(db: &Database, id: i64) -> Result<(), KanselError> {
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                &format!(
                    "UPDATE slack_retry_queue
                     SET status = 'succeeded', updated_at = {NOW}
                     WHERE id = ?1"
                ),
                params![id],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Terminal failure after the retry budget is spent.
pub async fn fail(db: &Database, id: i64, last_error: &str) -> Result<(), KanselError> {
    let last_error = last_error.to_string();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                &format!(
                    "UPDATE slack_retry_queue
                     SET status = 'failed', retry_count = retry_count + 1,
                         last_error = ?2, updated_at = {NOW}
                     WHERE id = ?1"
                ),
                params![id, last_error],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Counts by status for operational monitoring.
pub async fn stats(db: &Database) -> Result<QueueStats, KanselError> {
    db.connection()
        .call(|conn| -> Result<QueueStats, rusqlite::Error> {
            let mut stmt = conn.prepare(
                "SELECT status, COUNT(*) FROM slack_retry_queue GROUP BY status",
            )?;
            let mut stats = QueueStats::default();
            let rows = stmt.query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
            })?;
            for row in rows {
                let (status, count) = row?;
                match status.as_str() {
                    "pending" => stats.pending = count,
                    "processing" => stats.processing = count,
                    "succeeded" => stats.succeeded = count,
                    "failed" => stats.failed = count,
                    _ => {}
                }
            }
            Ok(stats)
        })
        .await
        .map_err(map_tr_err)
}
