//! Utility bill extracted field records.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A postal address block found on a bill.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BillAddress {
    /// Street name, including the via/piazza prefix.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,

    /// House number, possibly with a letter suffix.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,

    /// CAP, 5 digits.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,

    /// City name, title-cased.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

impl BillAddress {
    /// True when no component was extracted.
    pub fn is_empty(&self) -> bool {
        self.street.is_none()
            && self.number.is_none()
            && self.postal_code.is_none()
            && self.city.is_none()
    }

    /// Single-line rendering for form fields and text output.
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        match (&self.street, &self.number) {
            (Some(street), Some(number)) => parts.push(format!("{} {}", street, number)),
            (Some(street), None) => parts.push(street.clone()),
            _ => {}
        }
        match (&self.postal_code, &self.city) {
            (Some(cap), Some(city)) => parts.push(format!("{} {}", cap, city)),
            (None, Some(city)) => parts.push(city.clone()),
            (Some(cap), None) => parts.push(cap.clone()),
            _ => {}
        }
        parts.join(", ")
    }
}

/// Fields extracted from a utility bill.
///
/// Same optionality and lifecycle rules as identity fields: absence is
/// data, never an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BillFields {
    /// Electricity metering point identifier (POD).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pod: Option<String>,

    /// Gas metering point identifier (PDR), 14 digits.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdr: Option<String>,

    /// Contracted power in kW.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contracted_power_kw: Option<Decimal>,

    /// Supply point address (fornitura).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supply_address: Option<BillAddress>,

    /// Billing/holder address (residenza/intestatario).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_address: Option<BillAddress>,
}

impl BillFields {
    /// True when no field was extracted at all.
    pub fn is_empty(&self) -> bool {
        self.pod.is_none()
            && self.pdr.is_none()
            && self.contracted_power_kw.is_none()
            && self.supply_address.is_none()
            && self.billing_address.is_none()
    }
}
