// SPDX-FileCopyrightText: 2026 Kansel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Additive confidence scoring over an [`ExtractionResult`].
//!
//! Starts from a 0.3 base and adds fixed weights per signal, clamped to
//! [0.0, 1.0]. The weights are tuned so a clean Norwegian relocation email
//! with a near-term date clears the 0.95 auto-approve band and anything
//! hedged or edge-cased lands in a human-review band.

use chrono::{Months, NaiveDate, Utc};
use kansel_core::{CancellationReason, EdgeCase, ExtractionResult, Language, Urgency};

const BASE: f64 = 0.3;
const INTENT: f64 = 0.30;
const REASON_STRONG: f64 = 0.15;
const REASON_OTHER: f64 = 0.10;
const LANGUAGE_PRIMARY: f64 = 0.10;
const LANGUAGE_SECONDARY: f64 = 0.05;
const DATE_NEAR: f64 = 0.10;
const DATE_FAR: f64 = 0.05;
const IMMEDIATE_NO_DATE: f64 = 0.08;
const EDGE_NONE: f64 = 0.10;
const EDGE_TEMPLATED: f64 = 0.05;
const RISKS_NONE: f64 = 0.10;
const RISKS_ONE: f64 = 0.05;
const PER_FACTOR: f64 = 0.05;

/// Score against the current date.
pub fn score(extraction: &ExtractionResult) -> f64 {
    score_with_reference_date(extraction, Utc::now().date_naive())
}

/// Score against an explicit reference date (anchors the near-term window).
pub fn score_with_reference_date(extraction: &ExtractionResult, today: NaiveDate) -> f64 {
    let mut score = BASE;

    if extraction.is_cancellation {
        score += INTENT;
    }

    score += match extraction.reason {
        CancellationReason::Moving | CancellationReason::PaymentIssue => REASON_STRONG,
        CancellationReason::Other => REASON_OTHER,
        CancellationReason::Unknown => 0.0,
    };

    score += match extraction.language {
        Language::No | Language::En => LANGUAGE_PRIMARY,
        Language::Sv => LANGUAGE_SECONDARY,
    };

    match extraction.move_date {
        Some(date) => {
            let near = today
                .checked_add_months(Months::new(3))
                .map(|horizon| date <= horizon)
                .unwrap_or(false);
            score += if near { DATE_NEAR } else { DATE_FAR };
        }
        None if extraction.urgency == Urgency::Immediate => score += IMMEDIATE_NO_DATE,
        None => {}
    }

    score += if extraction.edge_case == EdgeCase::None {
        EDGE_NONE
    } else if extraction.edge_case.is_templated() {
        EDGE_TEMPLATED
    } else {
        0.0
    };

    score += match extraction.policy_risks.len() {
        0 => RISKS_NONE,
        1 => RISKS_ONE,
        _ => 0.0,
    };

    let factors = &extraction.confidence_factors;
    for flag in [
        factors.clear_intent,
        factors.complete_information,
        factors.standard_case,
    ] {
        if flag {
            score += PER_FACTOR;
        }
    }

    score.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::classify_with_reference_date;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 1).unwrap()
    }

    fn assert_close(got: f64, want: f64) {
        assert!((got - want).abs() < 1e-9, "got {got}, want {want}");
    }

    #[test]
    fn clean_norwegian_relocation_scores_high() {
        let email = "Hei, jeg skal flytte til Oslo 15. mars og vil si opp abonnementet mitt.";
        let extraction = classify_with_reference_date(email, today());
        let got = score_with_reference_date(&extraction, today());
        assert!(got >= 0.8, "got {got}");
    }

    #[test]
    fn non_cancellation_scores_low() {
        let extraction = ExtractionResult::non_cancellation(Language::En);
        let got = score_with_reference_date(&extraction, today());
        // No intent, reason, date, or factor credit; non-cancellations are
        // routed to no_action before the score is ever compared to a band.
        assert_close(got, BASE + LANGUAGE_PRIMARY + EDGE_NONE + RISKS_NONE);
    }

    #[test]
    fn hedged_intent_scores_below_clear_intent() {
        let clear = classify_with_reference_date(
            "Jeg vil si opp abonnementet mitt fra 15. mars.",
            today(),
        );
        let hedged = classify_with_reference_date(
            "Jeg vurderer kanskje å si opp abonnementet mitt fra 15. mars.",
            today(),
        );
        let clear_score = score_with_reference_date(&clear, today());
        let hedged_score = score_with_reference_date(&hedged, today());
        assert!(hedged_score < clear_score);
    }

    #[test]
    fn edge_case_drags_score_down() {
        let standard = classify_with_reference_date(
            "I want to cancel my subscription, we are moving on March 15.",
            today(),
        );
        let edged = classify_with_reference_date(
            "I don't have access to the app, please cancel my subscription. We are moving on March 15.",
            today(),
        );
        assert!(
            score_with_reference_date(&edged, today())
                < score_with_reference_date(&standard, today())
        );
    }

    #[test]
    fn swedish_scores_below_norwegian_all_else_equal() {
        let no = classify_with_reference_date(
            "Jeg vil si opp abonnementet mitt fordi jeg flytter 15. mars.",
            today(),
        );
        let sv = classify_with_reference_date(
            "Jag vill säga upp mitt abonnemang eftersom jag flyttar den 15 mars.",
            today(),
        );
        assert!(
            score_with_reference_date(&sv, today()) < score_with_reference_date(&no, today())
        );
    }

    #[test]
    fn policy_risks_reduce_score() {
        let calm = classify_with_reference_date(
            "Jeg vil si opp abonnementet mitt fra 15. mars, jeg flytter.",
            today(),
        );
        let risky = classify_with_reference_date(
            "Jeg vil si opp abonnementet mitt fra 15. mars, jeg flytter. Jeg krever pengene tilbake, ellers kontakter jeg advokat om bindingstiden.",
            today(),
        );
        assert!(
            score_with_reference_date(&risky, today())
                < score_with_reference_date(&calm, today())
        );
    }

    #[test]
    fn immediate_urgency_without_date_gets_partial_credit() {
        let dated = classify_with_reference_date(
            "Please cancel my subscription, we are moving on March 15.",
            today(),
        );
        let undated = classify_with_reference_date(
            "Please cancel my subscription immediately, we are moving out.",
            today(),
        );
        let dated_score = score_with_reference_date(&dated, today());
        let undated_score = score_with_reference_date(&undated, today());
        assert!(undated_score < dated_score);
        // But better than no timing signal at all.
        let silent = classify_with_reference_date(
            "Please cancel my subscription, we are moving out.",
            today(),
        );
        assert!(score_with_reference_date(&silent, today()) < undated_score);
    }

    #[test]
    fn score_is_clamped_to_unit_interval() {
        let best = classify_with_reference_date(
            "Hei, jeg skal flytte 15. mars og vil si opp abonnementet mitt umiddelbart.",
            today(),
        );
        let got = score_with_reference_date(&best, today());
        assert!((0.0..=1.0).contains(&got));
        let worst = ExtractionResult::non_cancellation(Language::Sv);
        assert!((0.0..=1.0).contains(&score_with_reference_date(&worst, today())));
    }
}
