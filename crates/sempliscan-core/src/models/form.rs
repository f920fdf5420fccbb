//! Contract form state and merge semantics.
//!
//! The hosting application keeps a mutable form record per contract
//! (`nome`, `cognome`, `cf`, ...). Extracted fields are merged in without
//! ever overwriting a value the user already entered: a field is written
//! only when the extracted value is present and the slot is empty.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::bill::BillFields;
use super::document::IdentityFields;

/// Mutable contract form state mirroring the host wizard's field names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractForm {
    pub nome: Option<String>,
    pub cognome: Option<String>,
    pub cf: Option<String>,
    pub numero_documento: Option<String>,
    pub data_rilascio: Option<NaiveDate>,
    pub data_scadenza: Option<NaiveDate>,

    pub pod: Option<String>,
    pub pdr: Option<String>,
    pub indirizzo_fornitura: Option<String>,
    pub indirizzo_fatturazione: Option<String>,
    pub kw_impegnati: Option<Decimal>,
}

impl ContractForm {
    /// Merge identity fields into the form. Returns the number of fields
    /// written. Existing values are left untouched.
    pub fn merge_identity(&mut self, fields: &IdentityFields) -> usize {
        let mut applied = 0;
        applied += fill_text(&mut self.nome, &fields.given_name) as usize;
        applied += fill_text(&mut self.cognome, &fields.family_name) as usize;
        applied += fill_text(&mut self.cf, &fields.tax_code) as usize;
        applied += fill_text(&mut self.numero_documento, &fields.document_number) as usize;
        applied += fill(&mut self.data_rilascio, &fields.issue_date) as usize;
        applied += fill(&mut self.data_scadenza, &fields.expiry_date) as usize;
        applied
    }

    /// Merge bill fields into the form. Returns the number of fields
    /// written. Existing values are left untouched.
    pub fn merge_bill(&mut self, fields: &BillFields) -> usize {
        let mut applied = 0;
        applied += fill_text(&mut self.pod, &fields.pod) as usize;
        applied += fill_text(&mut self.pdr, &fields.pdr) as usize;
        applied += fill(&mut self.kw_impegnati, &fields.contracted_power_kw) as usize;

        let supply = fields.supply_address.as_ref().map(|a| a.format());
        let billing = fields.billing_address.as_ref().map(|a| a.format());
        applied += fill_text(&mut self.indirizzo_fornitura, &supply) as usize;
        applied += fill_text(&mut self.indirizzo_fatturazione, &billing) as usize;
        applied
    }
}

fn fill<T: Clone>(slot: &mut Option<T>, value: &Option<T>) -> bool {
    if slot.is_none() {
        if let Some(v) = value {
            *slot = Some(v.clone());
            return true;
        }
    }
    false
}

/// Text slots treat an empty or whitespace-only string as vacant.
fn fill_text(slot: &mut Option<String>, value: &Option<String>) -> bool {
    let vacant = slot.as_deref().map(|s| s.trim().is_empty()).unwrap_or(true);
    if vacant {
        if let Some(v) = value {
            if !v.trim().is_empty() {
                *slot = Some(v.clone());
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_identity() -> IdentityFields {
        IdentityFields {
            given_name: Some("Mario".to_string()),
            family_name: Some("Rossi".to_string()),
            tax_code: Some("RSSMRA80A01H501Z".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn merge_fills_empty_slots() {
        let mut form = ContractForm::default();
        let applied = form.merge_identity(&sample_identity());
        assert_eq!(applied, 3);
        assert_eq!(form.nome.as_deref(), Some("Mario"));
        assert_eq!(form.cognome.as_deref(), Some("Rossi"));
    }

    #[test]
    fn merge_never_overwrites_user_input() {
        let mut form = ContractForm {
            nome: Some("Luigi".to_string()),
            ..Default::default()
        };
        form.merge_identity(&sample_identity());
        assert_eq!(form.nome.as_deref(), Some("Luigi"));
        assert_eq!(form.cognome.as_deref(), Some("Rossi"));
    }

    #[test]
    fn empty_string_counts_as_vacant() {
        let mut form = ContractForm {
            nome: Some("  ".to_string()),
            ..Default::default()
        };
        form.merge_identity(&sample_identity());
        assert_eq!(form.nome.as_deref(), Some("Mario"));
    }

    #[test]
    fn absent_fields_leave_form_untouched() {
        let mut form = ContractForm::default();
        let applied = form.merge_identity(&IdentityFields::default());
        assert_eq!(applied, 0);
        assert_eq!(form, ContractForm::default());
    }

    #[test]
    fn merge_bill_formats_addresses() {
        use crate::models::bill::{BillAddress, BillFields};

        let mut form = ContractForm::default();
        let fields = BillFields {
            pod: Some("IT001E12345678".to_string()),
            supply_address: Some(BillAddress {
                street: Some("Via Roma".to_string()),
                number: Some("10".to_string()),
                postal_code: Some("00100".to_string()),
                city: Some("Roma".to_string()),
            }),
            ..Default::default()
        };
        form.merge_bill(&fields);
        assert_eq!(form.pod.as_deref(), Some("IT001E12345678"));
        assert_eq!(
            form.indirizzo_fornitura.as_deref(),
            Some("Via Roma 10, 00100 Roma")
        );
    }
}
