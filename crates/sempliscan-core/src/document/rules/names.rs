//! Given/family name extraction.

use crate::normalize::title_case_words;

use super::patterns::{NAME_THEN_SURNAME, SURNAME_THEN_NAME};
use super::trim_name;

/// Extract `(family_name, given_name)` from labeled text.
///
/// Two label orderings are tried in fixed priority: "COGNOME ... NOME ..."
/// first (the layout of ID cards), then "NOME ... COGNOME ..." (some
/// licenses). The first ordering that matches wins.
pub fn extract_names(text: &str) -> (Option<String>, Option<String>) {
    if let Some(caps) = SURNAME_THEN_NAME.captures(text) {
        let family = clean(&caps[1]);
        let given = clean(&caps[2]);
        if family.is_some() || given.is_some() {
            return (family, given);
        }
    }

    if let Some(caps) = NAME_THEN_SURNAME.captures(text) {
        let given = clean(&caps[1]);
        let family = clean(&caps[2]);
        if family.is_some() || given.is_some() {
            return (family, given);
        }
    }

    (None, None)
}

fn clean(raw: &str) -> Option<String> {
    let trimmed = trim_name(raw);
    if trimmed.is_empty() {
        None
    } else {
        Some(title_case_words(&trimmed))
    }
}
