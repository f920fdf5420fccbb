//! Shared normalization helpers for OCR text.
//!
//! Both the identity and the bill extraction paths run on text that has
//! been collapsed to a single line, so every pattern must tolerate
//! cross-field adjacency. The helpers here are pure and shared by both.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref DATE_DMY: Regex = Regex::new(r"\b(\d{1,2})[/.\-](\d{1,2})[/.\-](\d{2,4})\b").unwrap();
    static ref DATE_YMD: Regex = Regex::new(r"\b(\d{4})[/.\-](\d{1,2})[/.\-](\d{1,2})\b").unwrap();
}

/// Collapse runs of whitespace (including line breaks) to single spaces
/// and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Title-case each word: first letter upper, rest lower. The letter after
/// an apostrophe is upper-cased as well ("D'ANGELO" -> "D'Angelo").
pub fn title_case_words(text: &str) -> String {
    text.split_whitespace()
        .map(title_case_word)
        .collect::<Vec<_>>()
        .join(" ")
}

fn title_case_word(word: &str) -> String {
    let mut out = String::with_capacity(word.len());
    let mut upper_next = true;
    for c in word.chars() {
        if upper_next {
            out.extend(c.to_uppercase());
        } else {
            out.extend(c.to_lowercase());
        }
        upper_next = c == '\'' || c == '-';
    }
    out
}

/// Parse a date in `DD/MM/YYYY` (also `.` or `-` separated) or ISO
/// `YYYY-MM-DD` form. A two-digit year below 100 is taken as 1900s, the
/// convention on older Italian paper documents.
pub fn parse_flexible_date(text: &str) -> Option<NaiveDate> {
    if let Some(caps) = DATE_YMD.captures(text) {
        let year: i32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let day: u32 = caps[3].parse().ok()?;
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            return Some(date);
        }
    }

    if let Some(caps) = DATE_DMY.captures(text) {
        let day: u32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let year = expand_year(caps[3].parse().ok()?);
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            return Some(date);
        }
    }

    None
}

/// Find the first date-like token anywhere in the text.
pub fn first_date(text: &str) -> Option<NaiveDate> {
    for caps in DATE_DMY.captures_iter(text) {
        let matched = caps.get(0).unwrap().as_str();
        if let Some(date) = parse_flexible_date(matched) {
            return Some(date);
        }
    }
    for caps in DATE_YMD.captures_iter(text) {
        let matched = caps.get(0).unwrap().as_str();
        if let Some(date) = parse_flexible_date(matched) {
            return Some(date);
        }
    }
    None
}

fn expand_year(year: i32) -> i32 {
    if year < 100 { 1900 + year } else { year }
}

/// Normalize a comma decimal separator to a period ("3,3" -> "3.3").
pub fn normalize_decimal_comma(text: &str) -> String {
    text.replace(',', ".")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn collapses_runs_and_line_breaks() {
        assert_eq!(
            collapse_whitespace("  COGNOME:\n ROSSI\t NOME:  MARIO "),
            "COGNOME: ROSSI NOME: MARIO"
        );
        assert_eq!(collapse_whitespace(""), "");
    }

    #[test]
    fn title_cases_names() {
        assert_eq!(title_case_words("MARIO"), "Mario");
        assert_eq!(title_case_words("MARIA GRAZIA"), "Maria Grazia");
        assert_eq!(title_case_words("D'ANGELO"), "D'Angelo");
        assert_eq!(title_case_words("ROSSI-BIANCHI"), "Rossi-Bianchi");
    }

    #[test]
    fn parses_dmy_dates() {
        assert_eq!(
            parse_flexible_date("15/06/2030"),
            NaiveDate::from_ymd_opt(2030, 6, 15)
        );
        assert_eq!(
            parse_flexible_date("01.02.1999"),
            NaiveDate::from_ymd_opt(1999, 2, 1)
        );
    }

    #[test]
    fn parses_iso_dates() {
        assert_eq!(
            parse_flexible_date("2030-06-15"),
            NaiveDate::from_ymd_opt(2030, 6, 15)
        );
    }

    #[test]
    fn two_digit_year_is_1900s() {
        assert_eq!(
            parse_flexible_date("01/02/85"),
            NaiveDate::from_ymd_opt(1985, 2, 1)
        );
        assert_eq!(
            parse_flexible_date("01/02/05"),
            NaiveDate::from_ymd_opt(1905, 2, 1)
        );
    }

    #[test]
    fn invalid_dates_are_none() {
        assert_eq!(parse_flexible_date("32/13/2020"), None);
        assert_eq!(parse_flexible_date("no date here"), None);
    }

    #[test]
    fn first_date_scans_noise() {
        assert_eq!(
            first_date("lorem 15/06/2030 ipsum 01/01/2001"),
            NaiveDate::from_ymd_opt(2030, 6, 15)
        );
        assert_eq!(first_date("nothing"), None);
    }

    #[test]
    fn decimal_comma() {
        assert_eq!(normalize_decimal_comma("3,3"), "3.3");
        assert_eq!(normalize_decimal_comma("4.5"), "4.5");
    }
}
