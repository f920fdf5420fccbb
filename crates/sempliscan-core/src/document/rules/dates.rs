//! Issue/expiry/birth date extraction.

use chrono::NaiveDate;

use crate::normalize::{first_date, parse_flexible_date, title_case_words};

use super::patterns::{BIRTH_PLACE_DATE, EXPIRY_DATE_LABELED, ISSUE_DATE_LABELED};
use super::trim_name;

/// Extract the issue date: labeled pattern first, then the first bare
/// date-like token anywhere in the text as the low-priority fallback.
pub fn extract_issue_date(text: &str) -> Option<NaiveDate> {
    if let Some(caps) = ISSUE_DATE_LABELED.captures(text) {
        if let Some(date) = parse_flexible_date(&caps[1]) {
            return Some(date);
        }
    }
    first_date(text)
}

/// Extract the expiry date. Labeled only: a bare date cannot be told
/// apart from the issue or birth date.
pub fn extract_expiry_date(text: &str) -> Option<NaiveDate> {
    let caps = EXPIRY_DATE_LABELED.captures(text)?;
    parse_flexible_date(&caps[1])
}

/// Extract `(birth_place, birth_date)` from the combined
/// "NATO A <place> IL <date>" block.
pub fn extract_birth(text: &str) -> (Option<String>, Option<NaiveDate>) {
    match BIRTH_PLACE_DATE.captures(text) {
        Some(caps) => {
            let place = {
                let trimmed = trim_name(&caps[1]);
                if trimmed.is_empty() {
                    None
                } else {
                    Some(title_case_words(&trimmed))
                }
            };
            (place, parse_flexible_date(&caps[2]))
        }
        None => (None, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn labeled_expiry() {
        assert_eq!(
            extract_expiry_date("DATA DI SCADENZA: 15/06/2030"),
            NaiveDate::from_ymd_opt(2030, 6, 15)
        );
        assert_eq!(
            extract_expiry_date("SCADENZA 2030-06-15"),
            NaiveDate::from_ymd_opt(2030, 6, 15)
        );
    }

    #[test]
    fn expiry_requires_label() {
        assert_eq!(extract_expiry_date("15/06/2030"), None);
    }

    #[test]
    fn labeled_issue_date() {
        assert_eq!(
            extract_issue_date("RILASCIATA IL 01/02/2020"),
            NaiveDate::from_ymd_opt(2020, 2, 1)
        );
    }

    #[test]
    fn issue_date_falls_back_to_first_bare_date() {
        assert_eq!(
            extract_issue_date("QUALCOSA 03/04/2019 ALTRO"),
            NaiveDate::from_ymd_opt(2019, 4, 3)
        );
        assert_eq!(extract_issue_date("NIENTE DATE"), None);
    }

    #[test]
    fn birth_place_and_date() {
        let (place, date) = extract_birth("NATO A ROMA IL 01/01/1980");
        assert_eq!(place.as_deref(), Some("Roma"));
        assert_eq!(date, NaiveDate::from_ymd_opt(1980, 1, 1));
    }

    #[test]
    fn birth_with_province() {
        let (place, date) = extract_birth("NATA A REGGIO EMILIA (RE) IL 05/05/1995");
        assert_eq!(place.as_deref(), Some("Reggio Emilia"));
        assert_eq!(date, NaiveDate::from_ymd_opt(1995, 5, 5));
    }

    #[test]
    fn no_birth_block() {
        assert_eq!(extract_birth("TESTO GENERICO"), (None, None));
    }
}
