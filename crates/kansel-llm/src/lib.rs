// SPDX-FileCopyrightText: 2026 Kansel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! LLM fallback extraction via the Anthropic Messages API.
//!
//! Consulted only for emails the deterministic classifier cannot handle
//! confidently. Input is already-masked text; the extractor never sees raw
//! PII.

pub mod extractor;

pub use extractor::AnthropicExtractor;
