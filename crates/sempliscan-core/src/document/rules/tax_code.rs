//! Codice fiscale extraction and validation.

use super::patterns::TAX_CODE;

/// Extract the first codice fiscale shaped token. The input is expected
/// upper-cased; the result is stored upper-case.
pub fn extract_tax_code(text: &str) -> Option<String> {
    TAX_CODE.captures(text).map(|caps| caps[1].to_string())
}

/// Validate a codice fiscale check character (the 16th).
///
/// Extraction deliberately does NOT gate on this: OCR frequently corrupts
/// a single character, and a shape-matching code with a bad checksum is
/// still worth pre-filling for the operator to fix. Exposed for callers
/// that want to flag suspect values.
pub fn validate_tax_code(code: &str) -> bool {
    let code = code.trim().to_uppercase();
    if code.len() != 16 || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
        return false;
    }

    let mut sum = 0u32;
    for (i, c) in code.chars().take(15).enumerate() {
        // Positions are 1-based in the official algorithm.
        sum += if i % 2 == 0 { odd_value(c) } else { even_value(c) };
    }

    let expected = (b'A' + (sum % 26) as u8) as char;
    code.chars().nth(15) == Some(expected)
}

fn even_value(c: char) -> u32 {
    match c {
        '0'..='9' => c as u32 - '0' as u32,
        'A'..='Z' => c as u32 - 'A' as u32,
        _ => 0,
    }
}

fn odd_value(c: char) -> u32 {
    match c {
        '0' | 'A' => 1,
        '1' | 'B' => 0,
        '2' | 'C' => 5,
        '3' | 'D' => 7,
        '4' | 'E' => 9,
        '5' | 'F' => 13,
        '6' | 'G' => 15,
        '7' | 'H' => 17,
        '8' | 'I' => 19,
        '9' | 'J' => 21,
        'K' => 2,
        'L' => 4,
        'M' => 18,
        'N' => 20,
        'O' => 11,
        'P' => 3,
        'Q' => 6,
        'R' => 8,
        'S' => 12,
        'T' => 14,
        'U' => 16,
        'V' => 10,
        'W' => 22,
        'X' => 25,
        'Y' => 24,
        'Z' => 23,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn finds_code_amid_noise() {
        let text = "QUALCOSA RSSMRA80A01H501Z ALTRO TESTO";
        assert_eq!(
            extract_tax_code(text).as_deref(),
            Some("RSSMRA80A01H501Z")
        );
    }

    #[test]
    fn no_code_is_none() {
        assert_eq!(extract_tax_code("TESTO SENZA CODICE"), None);
        assert_eq!(extract_tax_code(""), None);
    }

    #[test]
    fn shape_must_be_exact() {
        // 15 characters: one digit short.
        assert_eq!(extract_tax_code("RSSMRA80A01H50Z"), None);
    }

    #[test]
    fn validates_correct_check_char() {
        // RSSMRA80A01H501 has check character U.
        assert!(validate_tax_code("RSSMRA80A01H501U"));
        assert!(validate_tax_code("rssmra80a01h501u"));
    }

    #[test]
    fn rejects_wrong_check_char() {
        assert!(!validate_tax_code("RSSMRA80A01H501Z"));
        assert!(!validate_tax_code("TOOSHORT"));
        assert!(!validate_tax_code(""));
    }
}
