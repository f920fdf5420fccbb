//! Utility bill field extraction.

use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::debug;

use crate::models::bill::{BillAddress, BillFields};
use crate::normalize::{collapse_whitespace, normalize_decimal_comma, title_case_words};

use super::patterns::{BILLING_ADDRESS, CONTRACTED_POWER, PDR, POD, POSTAL_CITY, SUPPLY_ADDRESS};

/// Words that follow a city name on a bill; a city capture is cut there.
const CITY_STOP_WORDS: &[&str] = &[
    "POD",
    "PDR",
    "POTENZA",
    "FORNITURA",
    "RESIDENZA",
    "DOMICILIO",
    "INTESTATARIO",
    "UTENZA",
    "CONTATORE",
    "TOTALE",
    "IMPORTO",
    "SCADENZA",
    "FATTURA",
    "VIA",
    "PIAZZA",
    "CORSO",
];

/// Parser for utility bill text. Stateless; extraction never fails and
/// every unmatched field is simply absent.
pub struct BillParser;

impl BillParser {
    pub fn new() -> Self {
        Self
    }

    /// Extract structured bill fields from recognized text.
    pub fn extract(&self, text: &str) -> BillFields {
        let normalized = collapse_whitespace(text).to_uppercase();

        let mut fields = BillFields {
            pod: POD.captures(&normalized).map(|caps| caps[1].to_string()),
            pdr: PDR.captures(&normalized).map(|caps| caps[1].to_string()),
            contracted_power_kw: extract_power(&normalized),
            supply_address: extract_address(&SUPPLY_ADDRESS, &normalized),
            billing_address: extract_address(&BILLING_ADDRESS, &normalized),
        };

        attach_postal_city(&mut fields, &normalized);

        debug!(
            "extracted bill fields: pod={} pdr={} power={}",
            fields.pod.is_some(),
            fields.pdr.is_some(),
            fields.contracted_power_kw.is_some()
        );
        fields
    }
}

impl Default for BillParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract bill fields with the default parser.
pub fn extract_bill_fields(text: &str) -> BillFields {
    BillParser::new().extract(text)
}

fn extract_power(text: &str) -> Option<Decimal> {
    let caps = CONTRACTED_POWER.captures(text)?;
    Decimal::from_str(&normalize_decimal_comma(&caps[1])).ok()
}

fn extract_address(pattern: &Regex, text: &str) -> Option<BillAddress> {
    let caps = pattern.captures(text)?;
    Some(BillAddress {
        street: Some(title_case_words(&caps[1])),
        number: Some(caps[2].to_string()),
        postal_code: None,
        city: None,
    })
}

/// Postal code and city are matched independently of the labeled blocks
/// and attached to whichever address block(s) were found. With two
/// occurrences the first goes to the billing block and the second to the
/// supply block; a single occurrence serves both.
fn attach_postal_city(fields: &mut BillFields, text: &str) {
    let found: Vec<(String, String)> = POSTAL_CITY
        .captures_iter(text)
        .map(|caps| (caps[1].to_string(), trim_city(&caps[2])))
        .collect();

    if found.is_empty() {
        return;
    }

    if let Some(billing) = fields.billing_address.as_mut() {
        let (cap, city) = &found[0];
        billing.postal_code = Some(cap.clone());
        billing.city = some_if_not_empty(city);
    }
    if let Some(supply) = fields.supply_address.as_mut() {
        let (cap, city) = found.get(1).unwrap_or(&found[0]);
        supply.postal_code = Some(cap.clone());
        supply.city = some_if_not_empty(city);
    }
}

fn trim_city(raw: &str) -> String {
    let mut kept = Vec::new();
    for word in raw.split_whitespace() {
        if CITY_STOP_WORDS.contains(&word) {
            break;
        }
        kept.push(word);
    }
    title_case_words(&kept.join(" "))
}

fn some_if_not_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn pod_identifier() {
        let fields = extract_bill_fields("CODICE POD IT001E12345678 ALTRO");
        assert_eq!(fields.pod.as_deref(), Some("IT001E12345678"));
    }

    #[test]
    fn pod_needs_fourteen_chars() {
        let fields = extract_bill_fields("POD IT001E123");
        assert_eq!(fields.pod, None);
    }

    #[test]
    fn pdr_is_exactly_fourteen_digits() {
        let fields = extract_bill_fields("PDR 00881234567890");
        assert_eq!(fields.pdr.as_deref(), Some("00881234567890"));

        let fields = extract_bill_fields("PDR 0088123456789");
        assert_eq!(fields.pdr, None);
    }

    #[test]
    fn contracted_power_with_comma() {
        let fields = extract_bill_fields("POTENZA IMPEGNATA 3,3 KW");
        assert_eq!(
            fields.contracted_power_kw,
            Some("3.3".parse::<Decimal>().unwrap())
        );
    }

    #[test]
    fn contracted_power_alternate_label() {
        let fields = extract_bill_fields("potenza contrattuale: 4.5 kw");
        assert_eq!(
            fields.contracted_power_kw,
            Some("4.5".parse::<Decimal>().unwrap())
        );
    }

    #[test]
    fn supply_address_with_postal_code() {
        let fields =
            extract_bill_fields("INDIRIZZO DI FORNITURA: VIA ROMA 10 00100 ROMA POTENZA IMPEGNATA 3 KW");
        let supply = fields.supply_address.unwrap();
        assert_eq!(supply.street.as_deref(), Some("Via Roma"));
        assert_eq!(supply.number.as_deref(), Some("10"));
        assert_eq!(supply.postal_code.as_deref(), Some("00100"));
        assert_eq!(supply.city.as_deref(), Some("Roma"));
    }

    #[test]
    fn both_addresses_get_their_own_postal_blocks() {
        let fields = extract_bill_fields(
            "INTESTATARIO: VIA MILANO 5 20100 MILANO FORNITURA: VIA NAPOLI 7 80100 NAPOLI",
        );
        let billing = fields.billing_address.unwrap();
        assert_eq!(billing.street.as_deref(), Some("Via Milano"));
        assert_eq!(billing.postal_code.as_deref(), Some("20100"));
        assert_eq!(billing.city.as_deref(), Some("Milano"));

        let supply = fields.supply_address.unwrap();
        assert_eq!(supply.street.as_deref(), Some("Via Napoli"));
        assert_eq!(supply.postal_code.as_deref(), Some("80100"));
        assert_eq!(supply.city.as_deref(), Some("Napoli"));
    }

    #[test]
    fn garbage_yields_empty_record() {
        let fields = extract_bill_fields("@@@ niente di utile ###");
        assert!(fields.is_empty());

        let fields = extract_bill_fields("");
        assert!(fields.is_empty());
    }
}
