// SPDX-FileCopyrightText: 2026 Kansel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for the Kansel triage pipeline.
//!
//! Provides WAL-mode SQLite storage with embedded migrations, a single-writer
//! concurrency model via `tokio-rusqlite`, and typed operations for tickets,
//! drafts, human reviews, and the Slack retry queue.

pub mod database;
pub mod migrations;
pub mod queries;
pub mod storage;

pub use database::Database;
pub use storage::SqliteStorage;
