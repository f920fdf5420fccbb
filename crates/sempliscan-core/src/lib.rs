//! Core library for Sempliswitch document OCR processing.
//!
//! This crate provides:
//! - PDF ingestion (embedded text and image extraction)
//! - A text-recognition boundary with a pure Rust OCR engine
//! - Italian identity document classification and field extraction
//!   (electronic/paper ID cards, driver's licenses, passports)
//! - Utility bill field extraction (POD, PDR, contracted power, addresses)
//! - Form-merge orchestration for the hosting contract wizard

pub mod error;
pub mod models;
pub mod normalize;
pub mod pdf;
pub mod recognition;
pub mod document;
pub mod bill;
pub mod pipeline;

pub use error::{PdfError, RecognitionError, Result, SempliscanError};
pub use models::bill::{BillAddress, BillFields};
pub use models::config::SempliscanConfig;
pub use models::document::{DocumentType, IdentityFields};
pub use models::form::ContractForm;
pub use pdf::{PdfExtractor, PdfType};
pub use recognition::{PageText, TextRecognizer};
#[cfg(feature = "native")]
pub use recognition::{PagePreview, PureOcrRecognizer};
pub use document::{classify_document, extract_identity_fields, IdentityParser};
pub use bill::extract_bill_fields;
pub use pipeline::{RecognitionTicket, UploadSession};
#[cfg(feature = "native")]
pub use pipeline::{BillScan, DocumentPipeline, IdentityScan};
