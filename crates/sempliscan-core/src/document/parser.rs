//! Identity document field extraction.

use tracing::debug;

use crate::models::document::{DocumentType, IdentityFields};
use crate::normalize::collapse_whitespace;

use super::mrz;
use super::rules;

/// Parser applying the per-type rule table to recognized text.
///
/// Extraction never fails: every unmatched pattern leaves its field
/// absent. The only configuration is whether to read the machine-readable
/// zone on documents that carry one.
pub struct IdentityParser {
    parse_mrz: bool,
}

impl IdentityParser {
    /// Create a parser with MRZ reading enabled.
    pub fn new() -> Self {
        Self { parse_mrz: true }
    }

    /// Enable or disable MRZ reading.
    pub fn with_mrz(mut self, parse_mrz: bool) -> Self {
        self.parse_mrz = parse_mrz;
        self
    }

    /// Extract structured fields from recognized text.
    ///
    /// The shared rules run on whitespace-collapsed, upper-cased text;
    /// the type-specific document number is applied last and never
    /// overwrites anything. When the MRZ parses and its check digits
    /// pass, its fields take precedence over the visual zone.
    pub fn extract(&self, doc: DocumentType, text: &str) -> IdentityFields {
        let normalized = collapse_whitespace(text).to_uppercase();

        let mut fields = IdentityFields::default();

        let (family, given) = rules::extract_names(&normalized);
        fields.family_name = family;
        fields.given_name = given;
        fields.tax_code = rules::extract_tax_code(&normalized);
        fields.issuing_authority = rules::extract_issuing_authority(&normalized);
        fields.issue_date = rules::extract_issue_date(&normalized);
        fields.expiry_date = rules::extract_expiry_date(&normalized);

        let (birth_place, birth_date) = rules::extract_birth(&normalized);
        fields.birth_place = birth_place;
        fields.birth_date = birth_date;

        if fields.document_number.is_none() {
            fields.document_number = rules::extract_document_number(doc, &normalized);
        }

        if self.parse_mrz {
            if let Some(mrz_data) = mrz::extract(text, doc) {
                debug!("MRZ parsed, overlaying {:?} fields", doc);
                overlay_mrz(&mut fields, mrz_data);
            }
        }

        fields.confidence = doc.base_confidence();
        debug!(
            "extracted {} identity fields from {:?} document",
            fields.populated_count(),
            doc
        );
        fields
    }
}

impl Default for IdentityParser {
    fn default() -> Self {
        Self::new()
    }
}

/// MRZ fields win over the visual zone: the zone exists precisely to be
/// machine-read, and every value here survived its check digit.
fn overlay_mrz(fields: &mut IdentityFields, mrz_data: mrz::MrzData) {
    if mrz_data.document_number.is_some() {
        fields.document_number = mrz_data.document_number;
    }
    if mrz_data.family_name.is_some() {
        fields.family_name = mrz_data.family_name;
    }
    if mrz_data.given_name.is_some() {
        fields.given_name = mrz_data.given_name;
    }
    if mrz_data.birth_date.is_some() {
        fields.birth_date = mrz_data.birth_date;
    }
    if mrz_data.expiry_date.is_some() {
        fields.expiry_date = mrz_data.expiry_date;
    }
}

/// Extract identity fields with the default parser settings.
pub fn extract_identity_fields(doc: DocumentType, text: &str) -> IdentityFields {
    IdentityParser::new().extract(doc, text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    #[test]
    fn extracts_card_fields() {
        let text = "CARTA D'IDENTITA N. CA00000AA \
                    COGNOME: ROSSI NOME: MARIO \
                    NATO A ROMA (RM) IL 01/01/1980 \
                    RSSMRA80A01H501Z \
                    RILASCIATA DA COMUNE DI ROMA \
                    DATA DI RILASCIO 10/05/2020 \
                    DATA DI SCADENZA: 15/06/2030";

        let fields = extract_identity_fields(DocumentType::NewIdCard, text);
        assert_eq!(fields.family_name.as_deref(), Some("Rossi"));
        assert_eq!(fields.given_name.as_deref(), Some("Mario"));
        assert_eq!(fields.tax_code.as_deref(), Some("RSSMRA80A01H501Z"));
        assert_eq!(fields.document_number.as_deref(), Some("CA00000AA"));
        assert_eq!(fields.issue_date, NaiveDate::from_ymd_opt(2020, 5, 10));
        assert_eq!(fields.expiry_date, NaiveDate::from_ymd_opt(2030, 6, 15));
        assert_eq!(fields.birth_place.as_deref(), Some("Roma"));
        assert_eq!(fields.birth_date, NaiveDate::from_ymd_opt(1980, 1, 1));
        assert_eq!(fields.issuing_authority.as_deref(), Some("Comune Di Roma"));
        assert_eq!(fields.confidence, 0.9);
    }

    #[test]
    fn lower_case_input_is_normalized() {
        let fields = extract_identity_fields(
            DocumentType::OldIdCard,
            "cognome: bianchi nome: anna data di scadenza: 15/06/2030",
        );
        assert_eq!(fields.family_name.as_deref(), Some("Bianchi"));
        assert_eq!(fields.given_name.as_deref(), Some("Anna"));
        assert_eq!(fields.expiry_date, NaiveDate::from_ymd_opt(2030, 6, 15));
    }

    #[test]
    fn garbage_yields_empty_record() {
        for doc in [
            DocumentType::NewIdCard,
            DocumentType::OldIdCard,
            DocumentType::DriversLicense,
            DocumentType::Passport,
            DocumentType::Unknown,
        ] {
            let fields = extract_identity_fields(doc, "@@@ ???");
            assert!(fields.is_empty());
            assert!((0.0..=1.0).contains(&fields.confidence));
        }

        let fields = extract_identity_fields(DocumentType::Unknown, "");
        assert!(fields.is_empty());
    }

    #[test]
    fn mrz_overrides_visual_zone() {
        // Visual zone says BIANCHI, the (check-digit-valid) MRZ says ROSSI.
        let text = "COGNOME: BIANCHI NOME: LUIGI\n\
                    IDITACA00000AA4<<<<<<<<<<<<<<<\n\
                    8001014M3012316ITA<<<<<<<<<<<0\n\
                    ROSSI<<MARIO<<<<<<<<<<<<<<<<<<";

        let fields = extract_identity_fields(DocumentType::NewIdCard, text);
        assert_eq!(fields.family_name.as_deref(), Some("Rossi"));
        assert_eq!(fields.given_name.as_deref(), Some("Mario"));
        assert_eq!(fields.document_number.as_deref(), Some("CA00000AA"));
        assert_eq!(fields.expiry_date, NaiveDate::from_ymd_opt(2030, 12, 31));
    }

    #[test]
    fn mrz_can_be_disabled() {
        let text = "COGNOME: BIANCHI NOME: LUIGI\n\
                    IDITACA00000AA4<<<<<<<<<<<<<<<\n\
                    8001014M3012316ITA<<<<<<<<<<<0\n\
                    ROSSI<<MARIO<<<<<<<<<<<<<<<<<<";

        let fields = IdentityParser::new()
            .with_mrz(false)
            .extract(DocumentType::NewIdCard, text);
        assert_eq!(fields.family_name.as_deref(), Some("Bianchi"));
    }

    #[test]
    fn round_trips_rendered_fields() {
        let original = IdentityFields {
            given_name: Some("Mario".to_string()),
            family_name: Some("Rossi".to_string()),
            tax_code: Some("RSSMRA80A01H501Z".to_string()),
            expiry_date: NaiveDate::from_ymd_opt(2030, 6, 15),
            birth_place: Some("Roma".to_string()),
            birth_date: NaiveDate::from_ymd_opt(1980, 1, 1),
            ..Default::default()
        };

        // Render the record into the label/value layout the rules expect.
        let text = format!(
            "COGNOME: {} NOME: {} {} NATO A {} IL {} DATA DI SCADENZA: {}",
            original.family_name.as_deref().unwrap().to_uppercase(),
            original.given_name.as_deref().unwrap().to_uppercase(),
            original.tax_code.as_deref().unwrap(),
            original.birth_place.as_deref().unwrap().to_uppercase(),
            original.birth_date.unwrap().format("%d/%m/%Y"),
            original.expiry_date.unwrap().format("%d/%m/%Y"),
        );

        let extracted = extract_identity_fields(DocumentType::Unknown, &text);
        assert_eq!(extracted.given_name, original.given_name);
        assert_eq!(extracted.family_name, original.family_name);
        assert_eq!(extracted.tax_code, original.tax_code);
        assert_eq!(extracted.expiry_date, original.expiry_date);
        assert_eq!(extracted.birth_place, original.birth_place);
        assert_eq!(extracted.birth_date, original.birth_date);
    }
}
