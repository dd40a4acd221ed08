// SPDX-FileCopyrightText: 2026 Kansel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Edge-case detection on masked email text.
//!
//! Checks run in a fixed priority order so an email hitting several
//! categories resolves deterministically. Operational blockers (no app
//! access) outrank account-shape questions (sameie, corporate), which
//! outrank dispute and timing categories.

use chrono::{Months, NaiveDate};
use kansel_core::EdgeCase;

const NO_APP_ACCESS_TERMS: &[&str] = &[
    "ikke tilgang til appen",
    "har ikke appen",
    "får ikke logget inn",
    "får ikke logget meg inn",
    "får ikke åpnet appen",
    "uten appen",
    "don't have access to the app",
    "do not have access to the app",
    "no access to the app",
    "can't access the app",
    "cannot access the app",
    "can't log in",
    "cannot log in",
    "har inte tillgång till appen",
    "kan inte logga in",
];

const SAMEIE_TERMS: &[&str] = &[
    "sameie",
    "borettslag",
    "velforening",
    "hele bygget",
    "de andre beboerne",
    "alle beboerne",
    "felles avtale for bygget",
    "housing association",
    "housing cooperative",
    "bostadsrättsförening",
];

const CORPORATE_TERMS: &[&str] = &[
    "bedriftsavtale",
    "bedriftskonto",
    "firmaavtale",
    "på vegne av bedriften",
    "på vegne av firmaet",
    "organisasjonsnummer",
    "org.nr",
    "corporate account",
    "company account",
    "on behalf of the company",
    "företagsavtal",
    "företagskonto",
];

const PAYMENT_DISPUTE_TERMS: &[&str] = &[
    "feilaktig belastet",
    "belastet feil",
    "trukket for mye",
    "bestrider",
    "krever tilbakebetaling",
    "dispute the charge",
    "disputing the charge",
    "wrongly charged",
    "charged twice",
    "chargeback",
    "felaktigt debiterad",
];

const ALREADY_CANCELED_TERMS: &[&str] = &[
    "allerede sagt opp",
    "har sagt opp tidligere",
    "sa opp i fjor",
    "trodde jeg hadde sagt opp",
    "trodde abonnementet var sagt opp",
    "already canceled",
    "already cancelled",
    "cancelled this before",
    "canceled this before",
    "redan sagt upp",
];

/// Detect the highest-priority edge case present in `lower` (lowercased
/// masked text). A move date strictly more than two months past `today`
/// triggers [`EdgeCase::FutureMoveDate`]; exactly two months out does not.
pub fn detect_edge_case(
    lower: &str,
    move_date: Option<NaiveDate>,
    today: NaiveDate,
) -> EdgeCase {
    let contains_any = |terms: &[&str]| terms.iter().any(|t| lower.contains(t));

    if contains_any(NO_APP_ACCESS_TERMS) {
        return EdgeCase::NoAppAccess;
    }
    if contains_any(SAMEIE_TERMS) {
        return EdgeCase::SameieConcern;
    }
    if contains_any(CORPORATE_TERMS) {
        return EdgeCase::CorporateAccount;
    }
    if contains_any(PAYMENT_DISPUTE_TERMS) {
        return EdgeCase::PaymentDispute;
    }
    if let Some(date) = move_date {
        let horizon = today.checked_add_months(Months::new(2)).unwrap_or(today);
        if date > horizon {
            return EdgeCase::FutureMoveDate;
        }
    }
    if contains_any(ALREADY_CANCELED_TERMS) {
        return EdgeCase::AlreadyCanceled;
    }
    EdgeCase::None
}
