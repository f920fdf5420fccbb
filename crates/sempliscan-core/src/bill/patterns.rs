//! Regex patterns for utility bill extraction.
//!
//! As with identity documents, patterns run on whitespace-collapsed,
//! upper-cased text.

use lazy_static::lazy_static;
use regex::Regex;

const WORD: &str = "[A-ZÀÈÉÌÒÙ']";

/// Street designators seen on Italian bills.
const STREET_PREFIX: &str =
    r"(?:VIA|VIALE|V\.LE|PIAZZA|P\.ZZA|CORSO|C\.SO|LARGO|VICOLO|STRADA|LOCALITA'|LOCALITÀ)";

lazy_static! {
    // Electricity metering point: POD label + at least 14 alphanumerics.
    pub static ref POD: Regex =
        Regex::new(r"\bPOD\s*[:.]?\s*([A-Z0-9]{14,})\b").unwrap();

    // Gas metering point: PDR label + exactly 14 digits.
    pub static ref PDR: Regex =
        Regex::new(r"\bPDR\s*[:.]?\s*([0-9]{14})\b").unwrap();

    // Contracted power: label + decimal + kW unit. The comma separator is
    // normalized before numeric parsing.
    pub static ref CONTRACTED_POWER: Regex = Regex::new(
        r"POTENZA\s+(?:IMPEGNATA|CONTRATTUALE)\s*[:.]?\s*([0-9]+(?:[.,][0-9]+)?)\s*KW"
    )
    .unwrap();

    // Labeled address blocks: "LABEL: STREET NUMBER". The street prefix is
    // optional so that bills writing the bare street name still match.
    pub static ref BILLING_ADDRESS: Regex = Regex::new(&format!(
        r"(?:RESIDENZA|DOMICILIO|INTESTATARIO)\s*[:.]?\s*((?:{p}\s+)?{w}+(?:\s+{w}+){{0,2}})\s+([0-9]{{1,4}}(?:/?[A-Z])?)\b",
        p = STREET_PREFIX,
        w = WORD
    ))
    .unwrap();

    pub static ref SUPPLY_ADDRESS: Regex = Regex::new(&format!(
        r"(?:FORNITURA|UTENZA|CONTATORE)\s*[:.]?\s*((?:{p}\s+)?{w}+(?:\s+{w}+){{0,2}})\s+([0-9]{{1,4}}(?:/?[A-Z])?)\b",
        p = STREET_PREFIX,
        w = WORD
    ))
    .unwrap();

    // Postal code + city, found independently of the labeled blocks.
    pub static ref POSTAL_CITY: Regex = Regex::new(&format!(
        r"\b([0-9]{{5}})\s+({w}{{2,}}(?:\s+{w}{{2,}})?)\b",
        w = WORD
    ))
    .unwrap();
}
