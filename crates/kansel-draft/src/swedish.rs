// SPDX-FileCopyrightText: 2026 Kansel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Swedish reply templates.
//!
//! Reduced set: no edge-case branching. Swedish volume is low enough that
//! anything unusual goes through human review on the standard template.

use chrono::NaiveDate;
use kansel_core::{CancellationReason, ExtractionResult};

use crate::DraftRequest;

const GREETING: &str = "Hej,";
const POLICY: &str =
    "Observera att uppsägningen gäller från slutet av månaden den registreras i.";
const APP_REFERENCE: &str = "Du kan också hantera uppsägningen direkt i appen.";
const SIGNOFF: &str = "Vänliga hälsningar\nKundservice";

fn format_date(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}

pub(crate) fn render(request: &DraftRequest) -> Vec<String> {
    let extraction = request.extraction;
    let mut paragraphs = vec![GREETING.to_string()];
    paragraphs.push(body(extraction));
    paragraphs.push(POLICY.to_string());
    paragraphs.push(APP_REFERENCE.to_string());
    paragraphs.push(SIGNOFF.to_string());
    paragraphs
}

fn body(extraction: &ExtractionResult) -> String {
    match (extraction.reason, extraction.move_date) {
        (CancellationReason::Moving, Some(date)) => format!(
            "Tack för att du hör av dig. Vi har registrerat din uppsägning av \
             abonnemanget i samband med flytten {}.",
            format_date(date)
        ),
        _ => "Tack för att du hör av dig. Vi har registrerat din uppsägning av \
              abonnemanget."
            .to_string(),
    }
}
