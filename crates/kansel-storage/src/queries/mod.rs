// SPDX-FileCopyrightText: 2026 Kansel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query modules, one per table.

pub mod drafts;
pub mod retry_queue;
pub mod reviews;
pub mod tickets;
