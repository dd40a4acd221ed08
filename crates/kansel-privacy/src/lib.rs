// SPDX-FileCopyrightText: 2026 Kansel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! PII masking and outbound sanitization for the Kansel triage pipeline.
//!
//! Two complementary mechanisms:
//! 1. **Masking**: best-effort regex redaction applied to inbound email text
//!    before anything else touches it.
//! 2. **Sanitizing**: a hard gate that rejects outbound payloads still
//!    matching PII patterns.

pub mod mask;
pub mod sanitize;

pub use mask::mask;
pub use sanitize::assert_masked;
