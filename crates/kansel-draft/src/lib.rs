// SPDX-FileCopyrightText: 2026 Kansel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Template drafting for cancellation replies.
//!
//! Pure text assembly, no I/O. Branch order per request: edge case first
//! (fixed short-circuit templates), then payment-issue vs relocation
//! framing, then move-date timing. Every Norwegian and English non-edge
//! draft contains the end-of-month policy phrase and a self-service app
//! reference; Swedish uses a reduced template set without edge branching.

mod english;
mod norwegian;
mod swedish;

use chrono::{NaiveDate, Utc};
use kansel_core::{ExtractionResult, Language};

/// Input to one drafting call.
pub struct DraftRequest<'a> {
    pub extraction: &'a ExtractionResult,
    /// Optional retrieved guidance snippets, appended verbatim before the
    /// sign-off. They never displace the mandatory template elements.
    pub context_snippets: &'a [String],
    /// Anchors the "far future" timing advice.
    pub reference_date: NaiveDate,
}

impl<'a> DraftRequest<'a> {
    pub fn new(extraction: &'a ExtractionResult) -> Self {
        Self {
            extraction,
            context_snippets: &[],
            reference_date: Utc::now().date_naive(),
        }
    }

    pub fn with_context(mut self, snippets: &'a [String]) -> Self {
        self.context_snippets = snippets;
        self
    }
}

/// Render the reply draft for one extraction. Plain text, paragraphs
/// separated by blank lines.
pub fn draft(request: &DraftRequest) -> String {
    let mut paragraphs = match request.extraction.language {
        Language::No => norwegian::render(request),
        Language::En => english::render(request),
        Language::Sv => swedish::render(request),
    };
    if !request.context_snippets.is_empty() {
        // Guidance slots in before the sign-off paragraph.
        let signoff = paragraphs.pop();
        paragraphs.extend(request.context_snippets.iter().cloned());
        paragraphs.extend(signoff);
    }
    paragraphs.join("\n\n")
}
