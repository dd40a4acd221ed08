// SPDX-FileCopyrightText: 2026 Kansel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Concern and policy-risk capture.
//!
//! Works on sentences of the masked email: any sentence mentioning a billing
//! or worry anchor is carried verbatim into the review payload so the human
//! reviewer sees the customer's own words, not a paraphrase.

const PAYMENT_ANCHORS: &[&str] = &[
    "faktura",
    "regning",
    "belastet",
    "trukket",
    "betaling",
    "betalt",
    "refusjon",
    "gebyr",
    "avgift",
    "invoice",
    "charged",
    "charge",
    "payment",
    "refund",
    "fee",
    "billing",
    "debiterad",
    "betalning",
    "återbetalning",
];

const WORRY_ANCHORS: &[&str] = &[
    "bekymret",
    "usikker",
    "redd for",
    "lurer på",
    "hva skjer med",
    "worried",
    "concerned",
    "unsure",
    "what happens to",
    "afraid",
    "orolig",
    "osäker",
    "vad händer med",
];

const REFUND_DEMAND_TERMS: &[&str] = &[
    "refusjon",
    "pengene tilbake",
    "tilbakebetal",
    "refund",
    "money back",
    "återbetalning",
    "pengarna tillbaka",
];

const ESCALATION_TERMS: &[&str] = &[
    "advokat",
    "forbrukerrådet",
    "forbrukertilsynet",
    "inkasso",
    "klage til",
    "anmelde",
    "lawyer",
    "legal action",
    "complaint to",
    "konsumentverket",
];

const BINDING_PERIOD_TERMS: &[&str] = &[
    "bindingstid",
    "bundet til",
    "binding period",
    "contract period",
    "locked in",
    "bindningstid",
];

fn sentences(text: &str) -> impl Iterator<Item = &str> {
    text.split(['.', '!', '?', '\n'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn capture_sentences(text: &str, anchors: &[&str]) -> Vec<String> {
    sentences(text)
        .filter(|s| {
            let lower = s.to_lowercase();
            anchors.iter().any(|a| lower.contains(a))
        })
        .map(str::to_string)
        .collect()
}

/// Sentences mentioning invoices, charges, refunds, or fees, in order.
pub fn payment_concerns(text: &str) -> Vec<String> {
    capture_sentences(text, PAYMENT_ANCHORS)
}

/// Sentences where the customer voices uncertainty or worry, in order.
pub fn customer_concerns(text: &str) -> Vec<String> {
    capture_sentences(text, WORRY_ANCHORS)
}

/// Stable policy-risk labels for review prioritization. Labels, not
/// sentences: the reviewer UI groups on them.
pub fn policy_risks(lower: &str) -> Vec<String> {
    let mut risks = Vec::new();
    if REFUND_DEMAND_TERMS.iter().any(|t| lower.contains(t)) {
        risks.push("refund_requested".to_string());
    }
    if ESCALATION_TERMS.iter().any(|t| lower.contains(t)) {
        risks.push("escalation_threat".to_string());
    }
    if BINDING_PERIOD_TERMS.iter().any(|t| lower.contains(t)) {
        risks.push("binding_period".to_string());
    }
    risks
}

/// Whether the email raises any billing topic at all.
pub fn has_payment_issue(lower: &str) -> bool {
    PAYMENT_ANCHORS.iter().any(|t| lower.contains(t))
}
