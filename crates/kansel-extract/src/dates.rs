// SPDX-FileCopyrightText: 2026 Kansel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Move-date extraction.
//!
//! Recognizes ISO dates, numeric forms (`15.03.2026`, `15/3`), month-name
//! forms in all three languages (`15. mars`, `March 15`), and a handful of
//! relative phrases. Dates without a year are pushed into the future: a
//! month/day already behind the reference date means next year.

use std::sync::LazyLock;

use chrono::{Datelike, Days, Months, NaiveDate};
use regex::Regex;

static ISO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{4})-(\d{2})-(\d{2})\b").unwrap());

static NUMERIC_FULL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{1,2})[./](\d{1,2})[./](\d{4})\b").unwrap());

static DAY_MONTH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d{1,2})(?:st|nd|rd|th)?\.?\s*(?:of\s+)?([a-zA-ZæøåäöÆØÅÄÖ]+)").unwrap()
});

static MONTH_DAY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b([a-zA-Z]+)\s+(\d{1,2})(?:st|nd|rd|th)?\b").unwrap()
});

static NUMERIC_SHORT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{1,2})[./](\d{1,2})\b").unwrap());

/// Month names across Norwegian, English, and Swedish.
const MONTH_NAMES: &[(&str, u32)] = &[
    ("januar", 1),
    ("january", 1),
    ("januari", 1),
    ("februar", 2),
    ("february", 2),
    ("februari", 2),
    ("mars", 3),
    ("march", 3),
    ("april", 4),
    ("mai", 5),
    ("may", 5),
    ("maj", 5),
    ("juni", 6),
    ("june", 6),
    ("juli", 7),
    ("july", 7),
    ("august", 8),
    ("augusti", 8),
    ("september", 9),
    ("oktober", 10),
    ("october", 10),
    ("november", 11),
    ("desember", 12),
    ("december", 12),
];

fn month_from_name(name: &str) -> Option<u32> {
    let lower = name.to_lowercase();
    MONTH_NAMES
        .iter()
        .find(|(n, _)| *n == lower)
        .map(|(_, m)| *m)
}

/// Resolve a month/day without a year: this year if still ahead of (or on)
/// the reference date, otherwise next year.
fn infer_year(day: u32, month: u32, today: NaiveDate) -> Option<NaiveDate> {
    let this_year = NaiveDate::from_ymd_opt(today.year(), month, day)?;
    if this_year < today {
        NaiveDate::from_ymd_opt(today.year() + 1, month, day)
    } else {
        Some(this_year)
    }
}

fn last_day_of_month(today: NaiveDate) -> Option<NaiveDate> {
    today
        .with_day(1)?
        .checked_add_months(Months::new(1))?
        .checked_sub_days(Days::new(1))
}

/// Extract the first recognizable move date, relative to `today`.
///
/// Explicit formats win over relative phrases; within a format class the
/// leftmost match wins. Returns `None` when nothing parses to a real date
/// (so `31.02` is silently ignored rather than guessed at).
pub fn extract_move_date(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    if let Some(caps) = ISO_RE.captures(text) {
        let date = NaiveDate::from_ymd_opt(
            caps[1].parse().ok()?,
            caps[2].parse().ok()?,
            caps[3].parse().ok()?,
        );
        if date.is_some() {
            return date;
        }
    }

    if let Some(caps) = NUMERIC_FULL_RE.captures(text) {
        let date = NaiveDate::from_ymd_opt(
            caps[3].parse().ok()?,
            caps[2].parse().ok()?,
            caps[1].parse().ok()?,
        );
        if date.is_some() {
            return date;
        }
    }

    // "15. mars", "15 mars", "1st of May" style. Iterate: the second capture
    // is any word, so non-month words are skipped rather than failing.
    for caps in DAY_MONTH_RE.captures_iter(text) {
        if let Some(month) = month_from_name(&caps[2]) {
            if let Some(day) = caps[1].parse::<u32>().ok() {
                if let Some(date) = infer_year(day, month, today) {
                    return Some(date);
                }
            }
        }
    }

    // "March 15" style.
    for caps in MONTH_DAY_RE.captures_iter(text) {
        if let Some(month) = month_from_name(&caps[1]) {
            if let Some(day) = caps[2].parse::<u32>().ok() {
                if let Some(date) = infer_year(day, month, today) {
                    return Some(date);
                }
            }
        }
    }

    // "15.03" or "15/3" with the year inferred.
    if let Some(caps) = NUMERIC_SHORT_RE.captures(text) {
        let day: u32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        if let Some(date) = infer_year(day, month, today) {
            return Some(date);
        }
    }

    let lower = text.to_lowercase();
    if lower.contains("neste måned")
        || lower.contains("next month")
        || lower.contains("nästa månad")
    {
        return today.checked_add_months(Months::new(1));
    }
    if lower.contains("slutten av måneden")
        || lower.contains("end of the month")
        || lower.contains("end of this month")
        || lower.contains("slutet av månaden")
    {
        return last_day_of_month(today);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 10).unwrap()
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn parses_iso_date() {
        let got = extract_move_date("Jeg flytter 2026-03-15.", today());
        assert_eq!(got, Some(d(2026, 3, 15)));
    }

    #[test]
    fn parses_dotted_numeric_with_year() {
        let got = extract_move_date("flyttedato 15.03.2026", today());
        assert_eq!(got, Some(d(2026, 3, 15)));
    }

    #[test]
    fn parses_norwegian_month_name() {
        let got = extract_move_date("Jeg skal flytte til Oslo 15. mars.", today());
        assert_eq!(got, Some(d(2026, 3, 15)));
    }

    #[test]
    fn parses_english_month_first() {
        let got = extract_move_date("We are moving on March 15.", today());
        assert_eq!(got, Some(d(2026, 3, 15)));
    }

    #[test]
    fn parses_english_day_first() {
        let got = extract_move_date("moving out on the 1st of May", today());
        assert_eq!(got, Some(d(2026, 5, 1)));
    }

    #[test]
    fn parses_swedish_month_name() {
        let got = extract_move_date("Vi flyttar den 20 augusti.", today());
        assert_eq!(got, Some(d(2026, 8, 20)));
    }

    #[test]
    fn parses_short_numeric_and_infers_year() {
        let got = extract_move_date("flytter 15.03", today());
        assert_eq!(got, Some(d(2026, 3, 15)));
    }

    #[test]
    fn month_day_already_passed_rolls_to_next_year() {
        let reference = d(2026, 8, 25);
        let got = extract_move_date("Jeg flytter 15. mars.", reference);
        assert_eq!(got, Some(d(2027, 3, 15)));
    }

    #[test]
    fn relative_next_month() {
        let got = extract_move_date("vi flytter neste måned", today());
        assert_eq!(got, Some(d(2026, 2, 10)));
    }

    #[test]
    fn relative_end_of_month() {
        let got = extract_move_date("moving at the end of the month", today());
        assert_eq!(got, Some(d(2026, 1, 31)));
    }

    #[test]
    fn invalid_calendar_date_is_ignored() {
        assert_eq!(extract_move_date("flytter 31.02.2026", today()), None);
    }

    #[test]
    fn no_date_returns_none() {
        assert_eq!(extract_move_date("Jeg vil si opp abonnementet.", today()), None);
        assert_eq!(extract_move_date("", today()), None);
    }

    #[test]
    fn street_number_is_not_a_date() {
        assert_eq!(extract_move_date("Jeg bor i Storgata 12 i Oslo.", today()), None);
    }
}
