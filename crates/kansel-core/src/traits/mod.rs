// SPDX-FileCopyrightText: 2026 Kansel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator trait definitions for the triage pipeline.
//!
//! The orchestrator only sees these seams; the webhook layer, database, LLM
//! provider, and Slack channel are all injected implementations.

pub mod delivery;
pub mod fallback;
pub mod storage;

pub use delivery::Delivery;
pub use fallback::LlmFallback;
pub use storage::Storage;
