//! Issuing authority extraction.

use crate::normalize::title_case_words;

use super::patterns::{AUTHORITY_BODY, AUTHORITY_LABELED};
use super::trim_authority;

/// Extract the issuing authority.
///
/// Priority order: an explicit label ("RILASCIATA DA", "EMESSA DA",
/// "AUTORITÀ") first, then a bare "COMUNE DI ..." / "QUESTURA DI ..."
/// block anywhere in the text.
pub fn extract_issuing_authority(text: &str) -> Option<String> {
    for pattern in [&*AUTHORITY_LABELED, &*AUTHORITY_BODY] {
        if let Some(caps) = pattern.captures(text) {
            let trimmed = trim_authority(&caps[1]);
            if !trimmed.is_empty() {
                return Some(title_case_words(&trimmed));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn labeled_authority() {
        assert_eq!(
            extract_issuing_authority("RILASCIATA DA COMUNE DI ROMA DATA DI RILASCIO 01/01/2020")
                .as_deref(),
            Some("Comune Di Roma")
        );
    }

    #[test]
    fn bare_comune_block() {
        assert_eq!(
            extract_issuing_authority("COMUNE DI MILANO CARTA D'IDENTITA").as_deref(),
            Some("Comune Di Milano")
        );
    }

    #[test]
    fn questura_block() {
        assert_eq!(
            extract_issuing_authority("QUESTURA DI TORINO").as_deref(),
            Some("Questura Di Torino")
        );
    }

    #[test]
    fn nothing_found() {
        assert_eq!(extract_issuing_authority("TESTO QUALSIASI"), None);
        assert_eq!(extract_issuing_authority(""), None);
    }
}
