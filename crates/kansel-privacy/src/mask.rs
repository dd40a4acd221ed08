// SPDX-FileCopyrightText: 2026 Kansel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Regex-based PII redaction.
//!
//! Best-effort, not a guarantee: the downstream sanitizer check
//! ([`crate::sanitize::assert_masked`]) is the second line of defense on any
//! payload leaving the system. Masking runs before persistence, before body
//! logging, and before any external LLM call.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

/// One maskable PII category: label used in sanitizer errors, detection
/// pattern, and the fixed replacement placeholder.
pub(crate) struct PiiPattern {
    pub label: &'static str,
    pub regex: Regex,
    pub placeholder: &'static str,
}

/// Patterns applied in order: emails first, then phone-like digit runs, then
/// simple street addresses. Placeholders contain no digits or `@`, so a
/// second masking pass is a no-op.
pub(crate) static PII_PATTERNS: LazyLock<Vec<PiiPattern>> = LazyLock::new(|| {
    vec![
        PiiPattern {
            label: "email",
            regex: Regex::new(r"[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}").unwrap(),
            placeholder: "[email]",
        },
        PiiPattern {
            label: "phone",
            // International with separators, bare 7+ digit runs, and
            // space-grouped domestic numbers ("123 45 678"). Dotted and
            // dashed calendar dates deliberately do not match; the
            // classifier still needs them after masking.
            regex: Regex::new(r"\+\d[\d \-]{5,}\d|\b\d{7,}\b|\b\d{2,3} \d{2} \d{2,3}\b")
                .unwrap(),
            placeholder: "[phone]",
        },
        PiiPattern {
            label: "address",
            // Norwegian street-name suffixes followed by a house number, and
            // the English "12 Some Street" form.
            regex: Regex::new(
                r"\b[A-ZÆØÅ][a-zæøåéA-ZÆØÅ]*(?:veien|vegen|gata|gaten|gate|allé|plassen|plass|vei)\s+\d+[A-Za-z]?\b|\b\d+\s+[A-Z][a-z]+\s+(?:Street|St|Road|Rd|Avenue|Ave|Lane)\b",
            )
            .unwrap(),
            placeholder: "[address]",
        },
    ]
});

/// Redact email, phone, and address tokens with fixed placeholders.
///
/// Pure and idempotent: `mask(mask(t)) == mask(t)`.
pub fn mask(text: &str) -> String {
    let mut result = text.to_string();
    for pattern in PII_PATTERNS.iter() {
        let hits = pattern.regex.find_iter(&result).count();
        if hits > 0 {
            // Counts only; the matched text itself never reaches the logs.
            debug!(label = pattern.label, hits, "masked PII tokens");
            result = pattern
                .regex
                .replace_all(&result, pattern.placeholder)
                .to_string();
        }
    }
    result
}
