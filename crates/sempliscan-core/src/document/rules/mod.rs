//! Rule-based field extractors for identity documents.
//!
//! Each field is extracted by an ordered chain of candidates; the first
//! non-empty result wins and a miss leaves the field absent. No extractor
//! here ever errors.

pub mod authority;
pub mod dates;
pub mod doc_number;
pub mod names;
pub mod patterns;
pub mod tax_code;

pub use authority::extract_issuing_authority;
pub use dates::{extract_birth, extract_expiry_date, extract_issue_date};
pub use doc_number::extract_document_number;
pub use names::extract_names;
pub use tax_code::{extract_tax_code, validate_tax_code};

/// Label words that start the next field on the card; a name-like capture
/// is cut at the first of these.
const NAME_STOP_WORDS: &[&str] = &[
    "NATO",
    "NATA",
    "CITTADINANZA",
    "RESIDENZA",
    "DATA",
    "LUOGO",
    "SESSO",
    "STATURA",
    "COMUNE",
    "QUESTURA",
    "SCADENZA",
    "DOCUMENTO",
    "CODICE",
];

/// Stop words for authority captures; COMUNE/QUESTURA/DI are part of the
/// value there.
const AUTHORITY_STOP_WORDS: &[&str] = &[
    "DATA", "NATO", "NATA", "CITTADINANZA", "RESIDENZA", "SCADENZA", "LUOGO", "IL", "VALIDA",
    "VALIDO", "CODICE", "CARTA", "DOCUMENTO",
];

fn trim_at(raw: &str, stop_words: &[&str]) -> String {
    let mut kept = Vec::new();
    for word in raw.split_whitespace() {
        if stop_words.contains(&word) {
            break;
        }
        kept.push(word);
    }
    kept.join(" ")
}

pub(crate) fn trim_name(raw: &str) -> String {
    trim_at(raw, NAME_STOP_WORDS)
}

pub(crate) fn trim_authority(raw: &str) -> String {
    trim_at(raw, AUTHORITY_STOP_WORDS)
}
