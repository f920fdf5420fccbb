//! Error types for the sempliscan-core library.

use thiserror::Error;

/// Main error type for the sempliscan library.
#[derive(Error, Debug)]
pub enum SempliscanError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Text recognition error.
    #[error("recognition error: {0}")]
    Recognition(#[from] RecognitionError),

    /// Image processing error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// Failed to extract images from PDF.
    #[error("failed to extract images: {0}")]
    ImageExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Invalid page number requested.
    #[error("invalid page number: {0}")]
    InvalidPage(u32),
}

/// Errors from the text-recognition boundary.
///
/// This is the only hard failure mode of the scan pipeline. Field
/// extraction itself never errors: an unmatched field is absent, not a
/// fault.
#[derive(Error, Debug)]
pub enum RecognitionError {
    /// Failed to load OCR models.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// The underlying recognition engine failed.
    #[error("text recognition failed: {0}")]
    Engine(String),

    /// Image preprocessing failed.
    #[error("preprocessing failed: {0}")]
    Preprocessing(String),

    /// Failed to write a page preview artifact.
    #[error("failed to write preview: {0}")]
    Preview(String),

    /// The engine ran but produced no usable text.
    #[error("no text could be recognized")]
    EmptyResult,

    /// The recognition call did not complete within the deadline.
    #[error("recognition timed out after {seconds}s")]
    Timeout { seconds: u64 },
}

/// Result type for the sempliscan library.
pub type Result<T> = std::result::Result<T, SempliscanError>;
