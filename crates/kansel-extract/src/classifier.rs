// SPDX-FileCopyrightText: 2026 Kansel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic cancellation classifier.
//!
//! Pure keyword and pattern matching over masked email text: no model calls,
//! no I/O. Same text and reference date always produce the same
//! [`ExtractionResult`], which is what makes the template route auditable.

use std::sync::LazyLock;

use chrono::{NaiveDate, Utc};
use kansel_core::{
    CancellationReason, ConfidenceFactors, EdgeCase, ExtractionResult, Urgency,
};
use regex::Regex;
use tracing::debug;

use crate::concerns;
use crate::dates::extract_move_date;
use crate::edge_case::detect_edge_case;
use crate::language::detect_language;

/// Phrases that directly state cancellation intent.
const CANCELLATION_PHRASES: &[&str] = &[
    "si opp",
    "sier opp",
    "sagt opp",
    "oppsigelse",
    "avslutte abonnement",
    "avslutte abonnementet",
    "avslutte avtalen",
    "kansellere abonnement",
    "cancel my subscription",
    "cancel the subscription",
    "cancel our subscription",
    "cancel this subscription",
    "want to cancel",
    "wish to cancel",
    "would like to cancel",
    "like to cancel",
    "terminate my subscription",
    "terminate the subscription",
    "help me cancel",
    "säga upp",
    "sagt upp",
    "avsluta abonnemang",
    "avsluta mitt abonnemang",
    "avsluta prenumeration",
    "uppsägning",
];

/// Relocation vocabulary; combined with a subscription term this implies
/// cancellation even without an explicit phrase.
const RELOCATION_TERMS: &[&str] = &[
    "flytte",
    "flytter",
    "flytting",
    "flyttedato",
    "moving",
    "move out",
    "moving out",
    "relocating",
    "relocate",
    "flyttar",
    "flyttning",
];

const SUBSCRIPTION_TERMS: &[&str] = &[
    "abonnement",
    "avtale",
    "medlemskap",
    "subscription",
    "membership",
    "abonnemang",
    "prenumeration",
    "avtal",
];

/// Patterns that veto classification even when a cancellation phrase is
/// present: surveys, process questions, and app malfunction reports are
/// support traffic, not cancellations.
const NON_CANCELLATION_PATTERNS: &[&str] = &[
    "how would you rate",
    "rate the",
    "rate our",
    "survey",
    "tilbakemelding på",
    "undersøkelse",
    "kundeundersökning",
    "how do i cancel",
    "how can i cancel",
    "how to cancel",
    "hvordan sier jeg opp",
    "hvordan kan jeg si opp",
    "hvordan avslutter jeg",
    "hur säger jag upp",
    "appen krasjer",
    "appen fungerer ikke",
    "app crashes",
    "the app is not working",
    "feilmelding i appen",
    "error message in the app",
];

/// Hedging vocabulary: intent stated but not committed.
const HEDGE_TERMS: &[&str] = &[
    "might",
    "maybe",
    "thinking about",
    "considering",
    "not sure if",
    "vurderer",
    "kanskje",
    "tenker på å",
    "usikker på om",
    "funderar på",
    "överväger",
    "kanske",
];

/// Explicit non-moving, non-billing reasons (price, disuse).
const OTHER_REASON_TERMS: &[&str] = &[
    "for dyrt",
    "too expensive",
    "för dyrt",
    "bruker den ikke",
    "bruker det ikke",
    "don't use it",
    "do not use it",
    "not using it",
    "trenger ikke",
    "no longer need",
    "använder inte",
    "behöver inte",
];

const IMMEDIATE_TERMS: &[&str] = &[
    "umiddelbart",
    "med en gang",
    "så snart som mulig",
    "så fort som mulig",
    "immediately",
    "as soon as possible",
    "asap",
    "right away",
    "effective immediately",
    "snarast",
    "omgående",
    "så snart som möjligt",
];

/// Support-ticket reference numbers mark automated or survey traffic.
static INQUIRY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:inquiry|henvendelse|ärende)\s*#?\s*\d{4,}").unwrap());

fn contains_any(lower: &str, terms: &[&str]) -> bool {
    terms.iter().any(|t| lower.contains(t))
}

/// Classify one masked email against the current date.
pub fn classify(masked_email: &str) -> ExtractionResult {
    classify_with_reference_date(masked_email, Utc::now().date_naive())
}

/// Classify against an explicit reference date. Deterministic: the reference
/// date anchors year inference and the future-move-date boundary.
pub fn classify_with_reference_date(masked_email: &str, today: NaiveDate) -> ExtractionResult {
    let lower = masked_email.to_lowercase();
    let language = detect_language(masked_email);

    let has_phrase = contains_any(&lower, CANCELLATION_PHRASES);
    let has_relocation = contains_any(&lower, RELOCATION_TERMS);
    let implies_cancellation =
        has_relocation && contains_any(&lower, SUBSCRIPTION_TERMS);
    let excluded =
        contains_any(&lower, NON_CANCELLATION_PATTERNS) || INQUIRY_RE.is_match(&lower);

    let is_cancellation = (has_phrase || implies_cancellation) && !excluded;
    if !is_cancellation {
        debug!(excluded, has_phrase, "email classified as non-cancellation");
        return ExtractionResult::non_cancellation(language);
    }

    let move_date = extract_move_date(masked_email, today);
    let has_payment_issue = concerns::has_payment_issue(&lower);

    // Relocation outranks billing when both appear: the move drives the
    // cancellation, the billing gripe rides along as a concern.
    let reason = if has_relocation {
        CancellationReason::Moving
    } else if has_payment_issue {
        CancellationReason::PaymentIssue
    } else if contains_any(&lower, OTHER_REASON_TERMS) {
        CancellationReason::Other
    } else {
        CancellationReason::Unknown
    };

    let edge_case = detect_edge_case(&lower, move_date, today);

    let urgency = if contains_any(&lower, IMMEDIATE_TERMS) {
        Urgency::Immediate
    } else if move_date.is_some() {
        Urgency::Future
    } else {
        Urgency::Unclear
    };

    let confidence_factors = ConfidenceFactors {
        clear_intent: has_phrase && !contains_any(&lower, HEDGE_TERMS),
        complete_information: reason != CancellationReason::Unknown
            && (reason != CancellationReason::Moving || move_date.is_some()),
        standard_case: edge_case == EdgeCase::None,
    };

    let result = ExtractionResult {
        is_cancellation: true,
        reason,
        move_date,
        language,
        edge_case,
        has_payment_issue,
        payment_concerns: concerns::payment_concerns(masked_email),
        urgency,
        customer_concerns: concerns::customer_concerns(masked_email),
        policy_risks: concerns::policy_risks(&lower),
        confidence_factors,
    };
    debug!(
        reason = %result.reason,
        language = %result.language,
        edge_case = %result.edge_case,
        "email classified as cancellation"
    );
    result
}
