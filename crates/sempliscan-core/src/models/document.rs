//! Identity document types and extracted field records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The identity document template a scan resembles.
///
/// Derived deterministically from recognized text and recomputed on every
/// extraction attempt; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    /// Electronic ID card (CIE), carries a TD1 machine-readable zone.
    NewIdCard,
    /// Older paper ID card issued by the municipality.
    OldIdCard,
    /// Driver's license (patente di guida).
    DriversLicense,
    /// Passport, carries a TD3 machine-readable zone.
    Passport,
    /// Nothing recognizable.
    Unknown,
}

impl Default for DocumentType {
    fn default() -> Self {
        Self::Unknown
    }
}

impl DocumentType {
    /// Fixed heuristic confidence for fields extracted from this template.
    ///
    /// Reflects pattern specificity, not match count: the electronic card
    /// has the most rigid layout, passports the loosest of the known ones.
    pub fn base_confidence(self) -> f32 {
        match self {
            Self::NewIdCard => 0.9,
            Self::OldIdCard => 0.8,
            Self::DriversLicense => 0.7,
            Self::Passport => 0.6,
            Self::Unknown => 0.3,
        }
    }

    /// Human-readable Italian label, used in CLI text output.
    pub fn label(self) -> &'static str {
        match self {
            Self::NewIdCard => "carta d'identità elettronica",
            Self::OldIdCard => "carta d'identità cartacea",
            Self::DriversLicense => "patente di guida",
            Self::Passport => "passaporto",
            Self::Unknown => "documento non riconosciuto",
        }
    }
}

/// Fields extracted from an identity document.
///
/// Every attribute is independently optional: an unmatched pattern leaves
/// its field `None`, which is a fully successful outcome. Constructed fresh
/// per extraction call, merged into the caller's form state, then dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IdentityFields {
    /// Given name (nome), title-cased.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,

    /// Family name (cognome), title-cased.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,

    /// Codice fiscale, 16 characters, stored upper-case.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_code: Option<String>,

    /// Document number in the issuing format.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_number: Option<String>,

    /// Issue date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_date: Option<NaiveDate>,

    /// Expiry date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<NaiveDate>,

    /// Issuing authority (comune, questura, motorizzazione).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuing_authority: Option<String>,

    /// Birth date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,

    /// Birth place, title-cased.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_place: Option<String>,

    /// Heuristic confidence score in [0, 1], fixed per document type.
    pub confidence: f32,
}

impl IdentityFields {
    /// True when no field was extracted at all.
    pub fn is_empty(&self) -> bool {
        self.given_name.is_none()
            && self.family_name.is_none()
            && self.tax_code.is_none()
            && self.document_number.is_none()
            && self.issue_date.is_none()
            && self.expiry_date.is_none()
            && self.issuing_authority.is_none()
            && self.birth_date.is_none()
            && self.birth_place.is_none()
    }

    /// Number of populated fields.
    pub fn populated_count(&self) -> usize {
        [
            self.given_name.is_some(),
            self.family_name.is_some(),
            self.tax_code.is_some(),
            self.document_number.is_some(),
            self.issue_date.is_some(),
            self.expiry_date.is_some(),
            self.issuing_authority.is_some(),
            self.birth_date.is_some(),
            self.birth_place.is_some(),
        ]
        .iter()
        .filter(|b| **b)
        .count()
    }
}
