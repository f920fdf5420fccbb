//! Regex patterns for Italian identity document extraction.
//!
//! All patterns run on whitespace-collapsed, upper-cased text, so they
//! must tolerate adjacent fields on a single line.

use lazy_static::lazy_static;
use regex::Regex;

/// Uppercase word characters as they appear on Italian documents.
const WORD: &str = "[A-ZÀÈÉÌÒÙ']";

/// A date token: DD/MM/YYYY family or ISO.
const DATE: &str = r"\d{1,2}[/.\-]\d{1,2}[/.\-]\d{2,4}|\d{4}-\d{2}-\d{2}";

lazy_static! {
    // Name labels, both orderings. Captures allow a second word for
    // compound names; a trailing label word is cut afterwards.
    pub static ref SURNAME_THEN_NAME: Regex = Regex::new(&format!(
        r"\bCOGNOME\s*[:.]?\s*({w}+(?:\s+{w}+)?)\s+NOME\s*[:.]?\s*({w}+(?:\s+{w}+)?)\b",
        w = WORD
    ))
    .unwrap();

    pub static ref NAME_THEN_SURNAME: Regex = Regex::new(&format!(
        r"\bNOME\s*[:.]?\s*({w}+(?:\s+{w}+)?)\s+COGNOME\s*[:.]?\s*({w}+(?:\s+{w}+)?)\b",
        w = WORD
    ))
    .unwrap();

    // Codice fiscale: 6 letters, 2 digits, letter, 2 digits, letter,
    // 3 digits, letter.
    pub static ref TAX_CODE: Regex = Regex::new(
        r"\b([A-Z]{6}[0-9]{2}[A-Z][0-9]{2}[A-Z][0-9]{3}[A-Z])\b"
    )
    .unwrap();

    // Issuing authority: explicit label, or a bare COMUNE DI / QUESTURA DI
    // block as the lower-priority fallback.
    pub static ref AUTHORITY_LABELED: Regex = Regex::new(&format!(
        r"(?:RILASCIATA\s+DA|EMESSA\s+DA|AUTORITA'?|AUTORITÀ)\s*[:.]?\s*({w}+(?:\s+{w}+){{0,3}})\b",
        w = WORD
    ))
    .unwrap();

    pub static ref AUTHORITY_BODY: Regex = Regex::new(&format!(
        r"\b((?:COMUNE|QUESTURA)\s+DI\s+{w}+(?:\s+{w}+)?)\b",
        w = WORD
    ))
    .unwrap();

    // Labeled dates.
    pub static ref ISSUE_DATE_LABELED: Regex = Regex::new(&format!(
        r"(?:DATA\s+DI\s+RILASCIO|RILASCIATA\s+IL|EMESSA\s+IL|DATA\s+DI\s+EMISSIONE)\s*[:.]?\s*({d})",
        d = DATE
    ))
    .unwrap();

    pub static ref EXPIRY_DATE_LABELED: Regex = Regex::new(&format!(
        r"(?:DATA\s+DI\s+SCADENZA|SCADENZA|VALID[AO]\s+FINO\s+AL)\s*[:.]?\s*({d})",
        d = DATE
    ))
    .unwrap();

    // Combined birth place and date: "NATO A ROMA (RM) IL 01/01/1980".
    pub static ref BIRTH_PLACE_DATE: Regex = Regex::new(&format!(
        r"NAT[OA]\s+A\s+({w}+(?:\s+{w}+)?)\s+(?:\([A-Z]{{2}}\)\s+)?IL\s+({d})",
        w = WORD,
        d = DATE
    ))
    .unwrap();

    // Document number shapes, selected per document type.
    pub static ref DOC_NUMBER_CIE: Regex =
        Regex::new(r"\b([A-Z]{2}[0-9]{5}[A-Z]{2})\b").unwrap();

    pub static ref DOC_NUMBER_ALNUM9: Regex =
        Regex::new(r"\b([A-Z0-9]{9})\b").unwrap();

    pub static ref DOC_NUMBER_OLD: Regex =
        Regex::new(r"\b([0-9]{5,8}[A-Z]{0,2})\b").unwrap();

    pub static ref DOC_NUMBER_LICENSE: Regex =
        Regex::new(r"\b([A-Z]{1,2}[0-9]{6,8})\b").unwrap();
}
