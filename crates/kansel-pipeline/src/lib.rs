// SPDX-FileCopyrightText: 2026 Kansel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Triage pipeline: inbound normalization, hybrid orchestration, and the
//! human review state machine.
//!
//! The orchestrator owns the route decision (template vs. LLM fallback) and
//! the persistence/dispatch sequence; collaborators come in through the
//! `kansel-core` traits.

pub mod inbound;
pub mod orchestrator;
pub mod review;

pub use inbound::{InboundPayload, normalize};
pub use orchestrator::{Pipeline, PipelineSettings};
pub use review::{MAX_FINAL_TEXT_CHARS, ReviewAction, apply_review};
