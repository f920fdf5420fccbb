//! Document type classification from recognized text.

use tracing::debug;

use crate::models::document::DocumentType;

use super::mrz;

/// Classify recognized text against the known document templates.
///
/// Priority order, first match wins. The machine-readable zone is the
/// strongest signal (structural, language-independent) and is checked
/// before the textual markers, which cover truncated or skewed scans
/// where the MRZ was not picked up.
pub fn classify_document(text: &str) -> DocumentType {
    let upper = fold_accents(&text.to_uppercase());

    let doc = if mrz::has_td1_block(&upper) {
        DocumentType::NewIdCard
    } else if upper.contains("CARTA D'IDENTITA") || upper.contains("CARTA DI IDENTITA") {
        DocumentType::NewIdCard
    } else if mrz::has_td3_line(&upper) {
        DocumentType::Passport
    } else if upper.contains("PASSAPORTO") || upper.contains("PASSPORT") {
        DocumentType::Passport
    } else if upper.contains("PATENTE DI GUIDA") || upper.contains("DRIVING LICENCE") {
        DocumentType::DriversLicense
    } else if upper.contains("COMUNE DI") || upper.contains("RILASCIATA IL") {
        DocumentType::OldIdCard
    } else {
        DocumentType::Unknown
    };

    debug!("classified document as {:?}", doc);
    doc
}

/// Fold the accented vowels OCR engines read off Italian documents, so
/// the literal markers match both "IDENTITA" and "IDENTITÀ".
fn fold_accents(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            'À' | 'Á' => 'A',
            'È' | 'É' => 'E',
            'Ì' | 'Í' => 'I',
            'Ò' | 'Ó' => 'O',
            'Ù' | 'Ú' => 'U',
            _ => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn mrz_beats_markers() {
        // A passport word next to a TD1 block: the MRZ wins.
        let text = "PASSAPORTO\n\
                    IDITACA00000AA4<<<<<<<<<<<<<<<\n\
                    8001014M3012316ITA<<<<<<<<<<<0\n\
                    ROSSI<<MARIO<<<<<<<<<<<<<<<<<<";
        assert_eq!(classify_document(text), DocumentType::NewIdCard);
    }

    #[test]
    fn card_markers() {
        assert_eq!(
            classify_document("CARTA D'IDENTITÀ N. CA00000AA"),
            DocumentType::NewIdCard
        );
        assert_eq!(
            classify_document("carta di identita"),
            DocumentType::NewIdCard
        );
    }

    #[test]
    fn passport_mrz_line() {
        let text = "qualcosa\nP<ITAROSSI<<MARIO<<<<<<<<<<<<<<<<<<<<<<<<<<<<\naltro";
        assert_eq!(classify_document(text), DocumentType::Passport);
    }

    #[test]
    fn passport_markers() {
        assert_eq!(classify_document("REPUBBLICA PASSAPORTO"), DocumentType::Passport);
        assert_eq!(classify_document("passport"), DocumentType::Passport);
    }

    #[test]
    fn license_markers() {
        assert_eq!(
            classify_document("PATENTE DI GUIDA U1234567"),
            DocumentType::DriversLicense
        );
        assert_eq!(
            classify_document("DRIVING LICENCE"),
            DocumentType::DriversLicense
        );
    }

    #[test]
    fn old_card_markers() {
        assert_eq!(classify_document("COMUNE DI ROMA"), DocumentType::OldIdCard);
        assert_eq!(
            classify_document("RILASCIATA IL 01/01/1999"),
            DocumentType::OldIdCard
        );
    }

    #[test]
    fn unknown_and_empty() {
        assert_eq!(classify_document(""), DocumentType::Unknown);
        assert_eq!(classify_document("testo qualunque"), DocumentType::Unknown);
    }

    #[test]
    fn classification_is_idempotent() {
        let text = "CARTA D'IDENTITA";
        assert_eq!(classify_document(text), classify_document(text));
    }
}
