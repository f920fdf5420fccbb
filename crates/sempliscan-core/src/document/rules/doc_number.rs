//! Type-specific document number extraction.

use regex::Regex;

use crate::models::document::DocumentType;

use super::patterns::{DOC_NUMBER_ALNUM9, DOC_NUMBER_CIE, DOC_NUMBER_LICENSE, DOC_NUMBER_OLD};

/// Extract the document number for a given document type.
///
/// Each type has an ordered list of candidate shapes; the first plausible
/// occurrence wins. Applied after the shared field rules and never used
/// to overwrite a field that is already set.
pub fn extract_document_number(doc: DocumentType, text: &str) -> Option<String> {
    let candidates: Vec<&Regex> = match doc {
        DocumentType::NewIdCard => vec![&DOC_NUMBER_CIE, &DOC_NUMBER_ALNUM9],
        DocumentType::OldIdCard => vec![&DOC_NUMBER_OLD],
        DocumentType::DriversLicense => vec![&DOC_NUMBER_LICENSE],
        DocumentType::Passport => vec![&DOC_NUMBER_LICENSE, &DOC_NUMBER_ALNUM9],
        DocumentType::Unknown => vec![&DOC_NUMBER_CIE, &DOC_NUMBER_LICENSE, &DOC_NUMBER_OLD],
    };

    for pattern in candidates {
        for caps in pattern.captures_iter(text) {
            let value = &caps[1];
            if plausible(value) {
                return Some(value.to_string());
            }
        }
    }

    None
}

/// The generic 9-character shape also matches plain words and long
/// numbers; require a mix of letters and digits there.
fn plausible(value: &str) -> bool {
    if value.len() != 9 {
        return true;
    }
    let has_letter = value.chars().any(|c| c.is_ascii_alphabetic());
    let has_digit = value.chars().any(|c| c.is_ascii_digit());
    has_letter && has_digit
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn cie_number() {
        assert_eq!(
            extract_document_number(DocumentType::NewIdCard, "N. CA00000AA RILASCIATA"),
            Some("CA00000AA".to_string())
        );
    }

    #[test]
    fn nine_alnum_needs_digit_and_letter() {
        // RESIDENZA is 9 letters and must not be mistaken for a number.
        assert_eq!(
            extract_document_number(DocumentType::NewIdCard, "RESIDENZA VIA ROMA"),
            None
        );
        assert_eq!(
            extract_document_number(DocumentType::NewIdCard, "RESIDENZA X1234567Y"),
            Some("X1234567Y".to_string())
        );
    }

    #[test]
    fn old_card_number() {
        assert_eq!(
            extract_document_number(DocumentType::OldIdCard, "N. 1234567AB COMUNE"),
            Some("1234567AB".to_string())
        );
        assert_eq!(
            extract_document_number(DocumentType::OldIdCard, "N. 123456"),
            Some("123456".to_string())
        );
    }

    #[test]
    fn license_number() {
        assert_eq!(
            extract_document_number(DocumentType::DriversLicense, "PATENTE U1234567 CAT B"),
            Some("U1234567".to_string())
        );
    }

    #[test]
    fn passport_falls_back_to_nine_alnum() {
        assert_eq!(
            extract_document_number(DocumentType::Passport, "NUM YA1234567"),
            Some("YA1234567".to_string())
        );
    }

    #[test]
    fn nothing_matches() {
        assert_eq!(
            extract_document_number(DocumentType::DriversLicense, "SOLO PAROLE"),
            None
        );
    }
}
