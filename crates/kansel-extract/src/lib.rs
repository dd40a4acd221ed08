// SPDX-FileCopyrightText: 2026 Kansel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic extraction for cancellation emails.
//!
//! Pure functions over masked email text: classification, language and date
//! detection, edge-case tagging, concern capture, and confidence scoring.
//! No I/O and no model calls; the LLM fallback lives elsewhere and is only
//! consulted when these results are not confidently standard.

pub mod classifier;
pub mod concerns;
pub mod dates;
pub mod edge_case;
pub mod language;
pub mod scorer;

pub use classifier::{classify, classify_with_reference_date};
pub use dates::extract_move_date;
pub use language::detect_language;
pub use scorer::{score, score_with_reference_date};
