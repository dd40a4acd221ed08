// SPDX-FileCopyrightText: 2026 Kansel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound sanitizer gate.
//!
//! Hard invariant, not a warning: a payload that still matches a PII pattern
//! is never emitted to an external read path (Slack, operator surfaces).

use kansel_core::KanselError;

use crate::mask::PII_PATTERNS;

/// Reject payloads containing unmasked email/phone/address patterns.
///
/// Returns `KanselError::PiiLeak` naming the matched category. The payload
/// text itself is never included in the error (it would leak through logs).
pub fn assert_masked(payload: &str) -> Result<(), KanselError> {
    for pattern in PII_PATTERNS.iter() {
        if pattern.regex.is_match(payload) {
            return Err(KanselError::PiiLeak(format!(
                "{} pattern matched",
                pattern.label
            )));
        }
    }
    Ok(())
}
