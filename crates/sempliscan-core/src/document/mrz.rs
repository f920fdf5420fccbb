//! Machine-readable zone detection and parsing.
//!
//! Handles the TD1 layout (ID cards, three lines of 30) and the TD3
//! layout (passports, two lines of 44) with ICAO 9303 7-3-1 check-digit
//! validation. A field whose check digit fails is dropped; the caller
//! falls back to the visual-zone rules for it.

use chrono::NaiveDate;
use tracing::debug;

use crate::models::document::DocumentType;
use crate::normalize::title_case_words;

const MIN_LINE: usize = 25;
const TD1_LINE: usize = 30;
const TD3_LINE: usize = 44;

/// Fields recovered from a machine-readable zone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MrzData {
    pub document_number: Option<String>,
    pub family_name: Option<String>,
    pub given_name: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub expiry_date: Option<NaiveDate>,
}

impl MrzData {
    fn is_empty(&self) -> bool {
        self.document_number.is_none() && self.birth_date.is_none() && self.expiry_date.is_none()
    }
}

/// True when the text contains a TD1 block: an `ID`-prefixed line
/// followed by two more dense MRZ lines.
pub fn has_td1_block(text: &str) -> bool {
    find_td1_block(text).is_some()
}

/// True when the text contains a TD3 (`P<`) line. Detection needs only
/// the one line; parsing requires both.
pub fn has_td3_line(text: &str) -> bool {
    text.lines()
        .filter_map(candidate_line)
        .any(|line| line.starts_with("P<"))
}

/// Locate and parse the MRZ for the given document type, if any.
pub fn extract(text: &str, doc: DocumentType) -> Option<MrzData> {
    let upper = text.to_uppercase();
    match doc {
        DocumentType::NewIdCard => find_td1_block(&upper).and_then(|lines| parse_td1(&lines)),
        DocumentType::Passport => find_td3_lines(&upper).and_then(|lines| parse_td3(&lines)),
        _ => None,
    }
}

/// An OCR line qualifies as an MRZ candidate when, spaces removed, it is
/// long enough and made only of `A-Z`, `0-9`, and the `<` filler.
fn candidate_line(line: &str) -> Option<String> {
    let compact: String = line.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.len() >= MIN_LINE
        && compact
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '<')
    {
        Some(compact)
    } else {
        None
    }
}

fn find_td1_block(text: &str) -> Option<[String; 3]> {
    let lines: Vec<Option<String>> = text.lines().map(candidate_line).collect();
    for window in lines.windows(3) {
        if let [Some(a), Some(b), Some(c)] = window {
            if a.starts_with("ID") {
                return Some([a.clone(), b.clone(), c.clone()]);
            }
        }
    }
    None
}

fn find_td3_lines(text: &str) -> Option<[String; 2]> {
    let lines: Vec<Option<String>> = text.lines().map(candidate_line).collect();
    for window in lines.windows(2) {
        if let [Some(a), Some(b)] = window {
            if a.starts_with("P<") {
                return Some([a.clone(), b.clone()]);
            }
        }
    }
    None
}

fn parse_td1(lines: &[String; 3]) -> Option<MrzData> {
    let l1 = pad_line(&lines[0], TD1_LINE);
    let l2 = pad_line(&lines[1], TD1_LINE);

    let mut data = MrzData::default();

    // Line 1: doc code (0-1), issuing state (2-4), number (5-13), check (14).
    let number = &l1[5..14];
    if check_passes(number, l1.as_bytes()[14] as char) {
        data.document_number = Some(strip_filler(number));
    }

    // Line 2: birth (0-5) + check (6), sex (7), expiry (8-13) + check (14).
    if check_passes(&l2[0..6], l2.as_bytes()[6] as char) {
        data.birth_date = mrz_date(&l2[0..6], false);
    }
    if check_passes(&l2[8..14], l2.as_bytes()[14] as char) {
        data.expiry_date = mrz_date(&l2[8..14], true);
    }

    if data.is_empty() {
        debug!("TD1 block found but every check digit failed");
        return None;
    }

    let (family, given) = parse_name_field(&lines[2]);
    data.family_name = family;
    data.given_name = given;
    Some(data)
}

fn parse_td3(lines: &[String; 2]) -> Option<MrzData> {
    let l1 = pad_line(&lines[0], TD3_LINE);
    let l2 = pad_line(&lines[1], TD3_LINE);

    let mut data = MrzData::default();

    // Line 2: number (0-8) + check (9), nationality (10-12),
    // birth (13-18) + check (19), sex (20), expiry (21-26) + check (27).
    let number = &l2[0..9];
    if check_passes(number, l2.as_bytes()[9] as char) {
        data.document_number = Some(strip_filler(number));
    }
    if check_passes(&l2[13..19], l2.as_bytes()[19] as char) {
        data.birth_date = mrz_date(&l2[13..19], false);
    }
    if check_passes(&l2[21..27], l2.as_bytes()[27] as char) {
        data.expiry_date = mrz_date(&l2[21..27], true);
    }

    if data.is_empty() {
        debug!("TD3 lines found but every check digit failed");
        return None;
    }

    // Line 1: "P<" + issuing state (2-4) + name field.
    let (family, given) = parse_name_field(&l1[5..]);
    data.family_name = family;
    data.given_name = given;
    Some(data)
}

/// Normalize a candidate line to the exact layout length: OCR sometimes
/// drops or invents a trailing filler character.
fn pad_line(line: &str, len: usize) -> String {
    let mut out: String = line.chars().take(len).collect();
    while out.len() < len {
        out.push('<');
    }
    out
}

/// MRZ name field: `FAMILY<<GIVEN<NAMES`.
fn parse_name_field(field: &str) -> (Option<String>, Option<String>) {
    let field = field.trim_end_matches('<');
    let (family_raw, given_raw) = match field.split_once("<<") {
        Some(parts) => parts,
        None => (field, ""),
    };

    let family = clean_name_part(family_raw);
    let given = clean_name_part(given_raw);
    (family, given)
}

fn clean_name_part(raw: &str) -> Option<String> {
    let joined = raw.replace('<', " ");
    let joined = joined.trim();
    if joined.is_empty() || !joined.chars().all(|c| c.is_ascii_alphabetic() || c == ' ') {
        None
    } else {
        Some(title_case_words(joined))
    }
}

fn strip_filler(field: &str) -> String {
    field.trim_end_matches('<').to_string()
}

/// ICAO 9303 check digit: weights 7, 3, 1 over digit values, letter
/// values A=10..Z=35, filler 0.
fn check_digit(field: &str) -> u32 {
    const WEIGHTS: [u32; 3] = [7, 3, 1];
    field
        .chars()
        .enumerate()
        .map(|(i, c)| char_value(c) * WEIGHTS[i % 3])
        .sum::<u32>()
        % 10
}

fn check_passes(field: &str, digit: char) -> bool {
    match digit.to_digit(10) {
        Some(expected) => check_digit(field) == expected,
        None => false,
    }
}

fn char_value(c: char) -> u32 {
    match c {
        '0'..='9' => c as u32 - '0' as u32,
        'A'..='Z' => c as u32 - 'A' as u32 + 10,
        _ => 0,
    }
}

/// MRZ dates are YYMMDD. Expiry dates are always in the 2000s; birth
/// years from 30 upward are taken as 1900s.
fn mrz_date(field: &str, expiry: bool) -> Option<NaiveDate> {
    if field.len() != 6 || !field.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let yy: i32 = field[0..2].parse().ok()?;
    let month: u32 = field[2..4].parse().ok()?;
    let day: u32 = field[4..6].parse().ok()?;

    let year = if expiry {
        2000 + yy
    } else if yy >= 30 {
        1900 + yy
    } else {
        2000 + yy
    };

    NaiveDate::from_ymd_opt(year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // CIE-style TD1 block with valid check digits.
    const TD1: &str = "IDITACA00000AA4<<<<<<<<<<<<<<<\n\
                       8001014M3012316ITA<<<<<<<<<<<0\n\
                       ROSSI<<MARIO<<<<<<<<<<<<<<<<<<";

    // ICAO specimen passport MRZ.
    const TD3: &str = "P<UTOERIKSSON<<ANNA<MARIA<<<<<<<<<<<<<<<<<<<\n\
                       L898902C36UTO7408122F1204159ZE184226B<<<<<10";

    #[test]
    fn detects_td1_block() {
        assert!(has_td1_block(TD1));
        assert!(!has_td1_block("CARTA D'IDENTITA SENZA MRZ"));
        assert!(!has_td1_block(""));
    }

    #[test]
    fn detects_td3_line() {
        assert!(has_td3_line(TD3));
        assert!(!has_td3_line(TD1));
        // A lone P< line is enough for detection.
        assert!(has_td3_line(
            "P<ITAROSSI<<MARIO<<<<<<<<<<<<<<<<<<<<<<<<<<<"
        ));
    }

    #[test]
    fn parses_td1_fields() {
        let data = extract(TD1, DocumentType::NewIdCard).unwrap();
        assert_eq!(data.document_number.as_deref(), Some("CA00000AA"));
        assert_eq!(data.birth_date, NaiveDate::from_ymd_opt(1980, 1, 1));
        assert_eq!(data.expiry_date, NaiveDate::from_ymd_opt(2030, 12, 31));
        assert_eq!(data.family_name.as_deref(), Some("Rossi"));
        assert_eq!(data.given_name.as_deref(), Some("Mario"));
    }

    #[test]
    fn parses_td3_fields() {
        let data = extract(TD3, DocumentType::Passport).unwrap();
        assert_eq!(data.document_number.as_deref(), Some("L898902C3"));
        assert_eq!(data.birth_date, NaiveDate::from_ymd_opt(1974, 8, 12));
        assert_eq!(data.expiry_date, NaiveDate::from_ymd_opt(2012, 4, 15));
        assert_eq!(data.family_name.as_deref(), Some("Eriksson"));
        assert_eq!(data.given_name.as_deref(), Some("Anna Maria"));
    }

    #[test]
    fn bad_check_digit_drops_field() {
        // Corrupt the document number check digit (4 -> 5).
        let corrupted = TD1.replacen("CA00000AA4", "CA00000AA5", 1);
        let data = extract(&corrupted, DocumentType::NewIdCard).unwrap();
        assert_eq!(data.document_number, None);
        // Dates still pass their own check digits.
        assert_eq!(data.birth_date, NaiveDate::from_ymd_opt(1980, 1, 1));
    }

    #[test]
    fn all_checks_failing_is_none() {
        let garbage = "IDITAXXXXXXXXX0<<<<<<<<<<<<<<<\n\
                       0000000X0000000XXX<<<<<<<<<<<0\n\
                       AAAA<<BBBB<<<<<<<<<<<<<<<<<<<<";
        assert_eq!(extract(garbage, DocumentType::NewIdCard), None);
    }

    #[test]
    fn wrong_type_is_none() {
        assert_eq!(extract(TD1, DocumentType::Passport), None);
        assert_eq!(extract(TD3, DocumentType::OldIdCard), None);
    }
}
