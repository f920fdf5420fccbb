//! Text recognition boundary.
//!
//! The OCR engine is an external collaborator. This module owns the
//! boundary trait, the optional binarization transform, preview
//! artifacts, and the pure Rust engine adapter behind the `native`
//! feature.

mod preprocessing;
#[cfg(feature = "native")]
mod preview;
#[cfg(feature = "native")]
mod pure_engine;

pub use preprocessing::binarize;
#[cfg(feature = "native")]
pub use preview::PagePreview;
#[cfg(feature = "native")]
pub use pure_engine::PureOcrRecognizer;

use image::DynamicImage;

use crate::error::RecognitionError;

/// Text recognized from a single page image.
#[derive(Debug, Clone)]
pub struct PageText {
    /// Recognized text, lines joined in reading order.
    pub text: String,

    /// Mean recognition confidence over the detected regions.
    pub confidence: f32,

    /// Engine processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// The recognition boundary.
///
/// The engine call is the pipeline's only blocking operation.
/// Implementations hold no per-call mutable state and are safe to invoke
/// repeatedly across independent documents.
pub trait TextRecognizer {
    fn recognize(&self, image: &DynamicImage) -> Result<PageText, RecognitionError>;
}
