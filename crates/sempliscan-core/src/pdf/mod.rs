//! PDF ingestion: embedded text and image extraction.
//!
//! Bills arrive overwhelmingly as PDFs. Text-bearing PDFs skip OCR
//! entirely; scanned PDFs hand their embedded page images to the
//! recognition boundary.

mod extractor;

pub use extractor::PdfExtractor;

/// Type of PDF content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PdfType {
    /// Contains extractable text.
    Text,
    /// Contains only images (scanned document).
    Image,
    /// Contains both text and images.
    Hybrid,
    /// Empty or unreadable.
    Empty,
}

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, crate::error::PdfError>;
