//! Configuration structures for the scan pipeline.

use serde::{Deserialize, Serialize};

/// Main configuration for the sempliscan pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SempliscanConfig {
    /// Text recognition configuration.
    pub recognition: RecognitionConfig,

    /// PDF ingestion configuration.
    pub pdf: PdfConfig,

    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// OCR model file names.
    pub models: ModelConfig,
}

/// Text recognition configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognitionConfig {
    /// Binarize (grayscale + threshold) pages before recognition.
    pub binarize: bool,

    /// Fixed binarization threshold; `None` selects one per page (Otsu).
    pub binarize_threshold: Option<u8>,

    /// Deadline for a recognition call, in seconds.
    pub timeout_secs: u64,

    /// Keep page preview artifacts alongside recognized text.
    pub keep_previews: bool,

    /// Keep `[UNK]` placeholder tokens in recognized text.
    pub keep_unk: bool,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            binarize: true,
            binarize_threshold: None,
            timeout_secs: 8,
            keep_previews: true,
            keep_unk: false,
        }
    }
}

/// PDF ingestion configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Use embedded text when the PDF carries enough of it, skipping OCR.
    pub prefer_embedded_text: bool,

    /// Minimum embedded-text length to consider a PDF text-based.
    pub min_text_length: usize,

    /// Maximum pages to process (0 = unlimited).
    pub max_pages: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            prefer_embedded_text: true,
            min_text_length: 50,
            max_pages: 10,
        }
    }
}

/// Field extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Parse the machine-readable zone on electronic cards and passports.
    pub parse_mrz: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self { parse_mrz: true }
    }
}

/// OCR model file names within the model directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Text detection model file name.
    pub detection_model: String,

    /// Text recognition model file name.
    pub recognition_model: String,

    /// Character dictionary file name.
    pub dictionary: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            detection_model: "det.onnx".to_string(),
            recognition_model: "latin_rec.onnx".to_string(),
            dictionary: "latin_dict.txt".to_string(),
        }
    }
}

impl SempliscanConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }
}
