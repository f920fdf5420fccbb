//! Pure Rust OCR adapter backed by `pure-onnx-ocr`.

use std::path::Path;
use std::time::Instant;

use image::DynamicImage;
use tracing::{debug, info};

use crate::error::RecognitionError;
use crate::models::config::{ModelConfig, RecognitionConfig};

use super::{PageText, TextRecognizer};

/// Recognizer backed by `pure-onnx-ocr` (pure Rust, no external ONNX
/// runtime). Models are loaded once from a directory and reused across
/// pages.
pub struct PureOcrRecognizer {
    engine: pure_onnx_ocr::engine::OcrEngine,
    config: RecognitionConfig,
}

impl PureOcrRecognizer {
    /// Load detection/recognition models and the character dictionary
    /// from a directory.
    pub fn from_dir(
        model_dir: &Path,
        models: &ModelConfig,
        config: RecognitionConfig,
    ) -> Result<Self, RecognitionError> {
        let det_path = model_dir.join(&models.detection_model);
        let rec_path = model_dir.join(&models.recognition_model);
        let dict_path = model_dir.join(&models.dictionary);

        let engine = pure_onnx_ocr::engine::OcrEngineBuilder::new()
            .det_model_path(&det_path)
            .rec_model_path(&rec_path)
            .dictionary_path(&dict_path)
            .build()
            .map_err(|e| RecognitionError::ModelLoad(format!("pure-onnx-ocr: {}", e)))?;

        info!("loaded pure-onnx-ocr engine from {}", model_dir.display());
        Ok(Self { engine, config })
    }
}

impl TextRecognizer for PureOcrRecognizer {
    fn recognize(&self, image: &DynamicImage) -> Result<PageText, RecognitionError> {
        let start = Instant::now();

        let results = self
            .engine
            .run_from_image(image)
            .map_err(|e| RecognitionError::Engine(format!("pure-onnx-ocr: {}", e)))?;

        debug!("engine returned {} text regions", results.len());

        // Sort regions into reading order: rows of ~20px, left to right.
        let mut regions: Vec<(f32, f32, String, f32)> = results
            .iter()
            .map(|r| {
                let (x, y) = r
                    .bounding_box
                    .exterior()
                    .coords()
                    .next()
                    .map(|c| (c.x as f32, c.y as f32))
                    .unwrap_or((0.0, 0.0));
                let text = if self.config.keep_unk {
                    r.text.clone()
                } else {
                    r.text.replace("[UNK]", " ")
                };
                (y, x, text, r.confidence)
            })
            .collect();

        regions.sort_by(|a, b| {
            let row_a = (a.0 / 20.0) as i32;
            let row_b = (b.0 / 20.0) as i32;
            if row_a != row_b {
                row_a.cmp(&row_b)
            } else {
                a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal)
            }
        });

        let confidence = if regions.is_empty() {
            0.0
        } else {
            regions.iter().map(|r| r.3).sum::<f32>() / regions.len() as f32
        };

        let text = regions
            .iter()
            .map(|r| r.2.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        let processing_time_ms = start.elapsed().as_millis() as u64;
        info!(
            "recognized {} regions in {}ms",
            regions.len(),
            processing_time_ms
        );

        Ok(PageText {
            text,
            confidence,
            processing_time_ms,
        })
    }
}
