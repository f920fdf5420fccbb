//! WASM bindings for Sempliswitch document field extraction.
//!
//! The browser host runs OCR on its side and hands the recognized text
//! over; everything here is the pure text-to-struct layer: classify,
//! extract, merge.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use sempliscan_core::{
    classify_document, extract_bill_fields, ContractForm, DocumentType, IdentityParser,
};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Classify recognized text into a document type tag.
#[wasm_bindgen]
pub fn classify(text: &str) -> String {
    type_tag(classify_document(text)).to_string()
}

/// Combined scan result handed back to the browser.
#[derive(Serialize)]
struct IdentityScanResult {
    document_type: DocumentType,
    fields: sempliscan_core::IdentityFields,
}

/// Classify and extract identity fields from recognized text.
#[wasm_bindgen]
pub fn extract_identity(text: &str) -> Result<JsValue, JsValue> {
    DocumentScanner::new().scan_identity(text)
}

/// Extract utility bill fields from recognized text.
#[wasm_bindgen]
pub fn extract_bill(text: &str) -> Result<JsValue, JsValue> {
    let fields = extract_bill_fields(text);
    serde_wasm_bindgen::to_value(&fields).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Validate a codice fiscale check character.
#[wasm_bindgen]
pub fn validate_tax_code(code: &str) -> bool {
    sempliscan_core::document::rules::validate_tax_code(code)
}

/// Merge extracted identity fields into a contract form object. Fields
/// the user already filled are never overwritten.
#[wasm_bindgen]
pub fn merge_identity_into_form(form: JsValue, fields: JsValue) -> Result<JsValue, JsValue> {
    let mut form: ContractForm =
        serde_wasm_bindgen::from_value(form).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let fields: sempliscan_core::IdentityFields =
        serde_wasm_bindgen::from_value(fields).map_err(|e| JsValue::from_str(&e.to_string()))?;

    form.merge_identity(&fields);
    serde_wasm_bindgen::to_value(&form).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Merge extracted bill fields into a contract form object.
#[wasm_bindgen]
pub fn merge_bill_into_form(form: JsValue, fields: JsValue) -> Result<JsValue, JsValue> {
    let mut form: ContractForm =
        serde_wasm_bindgen::from_value(form).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let fields: sempliscan_core::BillFields =
        serde_wasm_bindgen::from_value(fields).map_err(|e| JsValue::from_str(&e.to_string()))?;

    form.merge_bill(&fields);
    serde_wasm_bindgen::to_value(&form).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Document scanner class for browser use.
#[wasm_bindgen]
pub struct DocumentScanner {
    parse_mrz: bool,
}

#[wasm_bindgen]
impl DocumentScanner {
    /// Create a scanner with MRZ reading enabled.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self { parse_mrz: true }
    }

    /// Enable or disable MRZ reading.
    #[wasm_bindgen]
    pub fn set_parse_mrz(&mut self, parse_mrz: bool) {
        self.parse_mrz = parse_mrz;
    }

    /// Classify and extract identity fields from recognized text.
    #[wasm_bindgen]
    pub fn scan_identity(&self, text: &str) -> Result<JsValue, JsValue> {
        let document_type = classify_document(text);
        let fields = IdentityParser::new()
            .with_mrz(self.parse_mrz)
            .extract(document_type, text);

        let result = IdentityScanResult {
            document_type,
            fields,
        };
        serde_wasm_bindgen::to_value(&result).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Extract bill fields from recognized text.
    #[wasm_bindgen]
    pub fn scan_bill(&self, text: &str) -> Result<JsValue, JsValue> {
        extract_bill(text)
    }
}

impl Default for DocumentScanner {
    fn default() -> Self {
        Self::new()
    }
}

/// Text utilities mirrored for the browser form layer.
#[wasm_bindgen]
pub struct SempliscanUtils;

#[wasm_bindgen]
impl SempliscanUtils {
    /// Normalize a date in DD/MM/YYYY or ISO form to ISO 8601.
    #[wasm_bindgen]
    pub fn normalize_date(text: &str) -> Option<String> {
        sempliscan_core::normalize::parse_flexible_date(text).map(|d| d.to_string())
    }

    /// Title-case a name ("ROSSI" -> "Rossi").
    #[wasm_bindgen]
    pub fn title_case(text: &str) -> String {
        sempliscan_core::normalize::title_case_words(text)
    }
}

fn type_tag(doc: DocumentType) -> &'static str {
    match doc {
        DocumentType::NewIdCard => "new_id_card",
        DocumentType::OldIdCard => "old_id_card",
        DocumentType::DriversLicense => "drivers_license",
        DocumentType::Passport => "passport",
        DocumentType::Unknown => "unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn classify_card() {
        assert_eq!(classify("CARTA D'IDENTITA"), "new_id_card");
        assert_eq!(classify(""), "unknown");
    }

    #[wasm_bindgen_test]
    fn validate_known_code() {
        assert!(validate_tax_code("RSSMRA80A01H501U"));
        assert!(!validate_tax_code("RSSMRA80A01H501Z"));
    }

    #[wasm_bindgen_test]
    fn normalize_date_to_iso() {
        assert_eq!(
            SempliscanUtils::normalize_date("15/06/2030"),
            Some("2030-06-15".to_string())
        );
        assert_eq!(SempliscanUtils::normalize_date("garbage"), None);
    }
}
