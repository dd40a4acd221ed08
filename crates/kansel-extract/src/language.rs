// SPDX-FileCopyrightText: 2026 Kansel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Language detection from character and word patterns.
//!
//! Scores diacritics and distinctive stopwords rather than spotting
//! cancellation keywords, so mixed-content emails still land on the right
//! template language. Norwegian is the business default when ambiguous.

use kansel_core::Language;

/// Stopwords that are Norwegian and not Swedish.
const NORWEGIAN_WORDS: &[&str] = &[
    "jeg", "ikke", "og", "skal", "vil", "opp", "til", "fra", "må", "være",
    "hei", "takk", "med", "abonnementet", "oppsigelse",
];

/// Stopwords that are Swedish and not Norwegian.
const SWEDISH_WORDS: &[&str] = &[
    "jag", "inte", "och", "ska", "vill", "upp", "till", "från", "måste",
    "vara", "hej", "tack", "abonnemanget", "uppsägning", "säga",
];

/// Common English stopwords.
const ENGLISH_WORDS: &[&str] = &[
    "the", "i", "my", "to", "and", "of", "is", "have", "want", "would",
    "can", "you", "please", "subscription",
];

/// Detect the email language from diacritics and stopword counts.
pub fn detect_language(text: &str) -> Language {
    let lower = text.to_lowercase();

    let mut no_score = 0i32;
    let mut sv_score = 0i32;
    let mut en_score = 0i32;

    // æ and ø only occur in Norwegian; ä and ö only in Swedish. å is shared.
    for c in lower.chars() {
        match c {
            'æ' | 'ø' => no_score += 2,
            'ä' | 'ö' => sv_score += 2,
            'å' => {
                no_score += 1;
                sv_score += 1;
            }
            _ => {}
        }
    }

    for word in lower.split_whitespace() {
        let word = word.trim_matches(|c: char| !c.is_alphanumeric());
        if NORWEGIAN_WORDS.contains(&word) {
            no_score += 1;
        }
        if SWEDISH_WORDS.contains(&word) {
            sv_score += 1;
        }
        if ENGLISH_WORDS.contains(&word) {
            en_score += 1;
        }
    }

    // English and Swedish must beat Norwegian outright; ties fall back to
    // the Norwegian default per business policy.
    if en_score > no_score && en_score > sv_score {
        Language::En
    } else if sv_score > no_score && sv_score >= en_score {
        Language::Sv
    } else {
        Language::No
    }
}
