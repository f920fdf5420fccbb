//! Scan pipeline: pages in, structured fields out.

use image::DynamicImage;
use tracing::info;

use crate::bill::extract_bill_fields;
use crate::document::{classify_document, IdentityParser};
use crate::error::RecognitionError;
use crate::models::bill::BillFields;
use crate::models::config::SempliscanConfig;
use crate::models::document::{DocumentType, IdentityFields};
use crate::recognition::{binarize, PagePreview, TextRecognizer};

/// Result of an identity document scan.
pub struct IdentityScan {
    pub document_type: DocumentType,
    pub fields: IdentityFields,
    pub raw_text: String,
    pub previews: Vec<PagePreview>,
}

/// Result of a utility bill scan.
pub struct BillScan {
    pub fields: BillFields,
    pub raw_text: String,
    pub previews: Vec<PagePreview>,
}

/// Sequences the scan: optional binarization, recognition per page, text
/// concatenation, classification (identity path), field extraction.
///
/// The recognition call is the only blocking step; everything after it is
/// pure string work. A recognition failure is the single hard error and
/// is surfaced to the caller as "enter the data manually"; no automatic
/// retry happens here.
pub struct DocumentPipeline<R> {
    recognizer: R,
    config: SempliscanConfig,
}

impl<R: TextRecognizer> DocumentPipeline<R> {
    pub fn new(recognizer: R) -> Self {
        Self {
            recognizer,
            config: SempliscanConfig::default(),
        }
    }

    pub fn with_config(mut self, config: SempliscanConfig) -> Self {
        self.config = config;
        self
    }

    /// Scan identity document pages into structured fields.
    pub fn scan_identity(&self, pages: &[DynamicImage]) -> Result<IdentityScan, RecognitionError> {
        let (raw_text, previews) = self.recognize_pages(pages)?;
        let document_type = classify_document(&raw_text);
        let fields = IdentityParser::new()
            .with_mrz(self.config.extraction.parse_mrz)
            .extract(document_type, &raw_text);

        info!(
            "identity scan: {:?}, {} fields",
            document_type,
            fields.populated_count()
        );
        Ok(IdentityScan {
            document_type,
            fields,
            raw_text,
            previews,
        })
    }

    /// Scan utility bill pages into structured fields.
    pub fn scan_bill(&self, pages: &[DynamicImage]) -> Result<BillScan, RecognitionError> {
        let (raw_text, previews) = self.recognize_pages(pages)?;
        let fields = extract_bill_fields(&raw_text);

        info!("bill scan complete");
        Ok(BillScan {
            fields,
            raw_text,
            previews,
        })
    }

    /// Recognize every page and join the texts with whitespace. Per-page
    /// field attribution is not attempted.
    fn recognize_pages(
        &self,
        pages: &[DynamicImage],
    ) -> Result<(String, Vec<PagePreview>), RecognitionError> {
        let mut texts = Vec::with_capacity(pages.len());
        let mut previews = Vec::new();

        for page in pages {
            if self.config.recognition.keep_previews {
                previews.push(PagePreview::from_image(page)?);
            }

            let input = if self.config.recognition.binarize {
                binarize(page, self.config.recognition.binarize_threshold)
            } else {
                page.clone()
            };

            let recognized = self.recognizer.recognize(&input)?;
            if !recognized.text.trim().is_empty() {
                texts.push(recognized.text);
            }
        }

        let text = texts.join("\n\n");
        if text.trim().is_empty() {
            return Err(RecognitionError::EmptyResult);
        }
        Ok((text, previews))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::config::SempliscanConfig;
    use crate::recognition::PageText;
    use pretty_assertions::assert_eq;

    struct StubRecognizer {
        pages: std::cell::RefCell<Vec<String>>,
    }

    impl StubRecognizer {
        fn new(pages: &[&str]) -> Self {
            Self {
                pages: std::cell::RefCell::new(
                    pages.iter().rev().map(|s| s.to_string()).collect(),
                ),
            }
        }
    }

    impl TextRecognizer for StubRecognizer {
        fn recognize(&self, _image: &DynamicImage) -> Result<PageText, RecognitionError> {
            let text = self.pages.borrow_mut().pop().unwrap_or_default();
            Ok(PageText {
                text,
                confidence: 0.9,
                processing_time_ms: 1,
            })
        }
    }

    fn quiet_config() -> SempliscanConfig {
        let mut config = SempliscanConfig::default();
        config.recognition.keep_previews = false;
        config
    }

    fn page() -> DynamicImage {
        DynamicImage::new_luma8(8, 8)
    }

    #[test]
    fn identity_scan_classifies_and_extracts() {
        let recognizer =
            StubRecognizer::new(&["CARTA D'IDENTITA COGNOME: ROSSI NOME: MARIO RSSMRA80A01H501Z"]);
        let pipeline = DocumentPipeline::new(recognizer).with_config(quiet_config());

        let scan = pipeline.scan_identity(&[page()]).unwrap();
        assert_eq!(scan.document_type, DocumentType::NewIdCard);
        assert_eq!(scan.fields.family_name.as_deref(), Some("Rossi"));
        assert_eq!(scan.fields.tax_code.as_deref(), Some("RSSMRA80A01H501Z"));
        assert!(scan.previews.is_empty());
    }

    #[test]
    fn multi_page_text_is_concatenated() {
        let recognizer = StubRecognizer::new(&["COGNOME: ROSSI", "NOME: MARIO"]);
        let pipeline = DocumentPipeline::new(recognizer).with_config(quiet_config());

        let scan = pipeline.scan_identity(&[page(), page()]).unwrap();
        assert_eq!(scan.fields.family_name.as_deref(), Some("Rossi"));
        assert_eq!(scan.fields.given_name.as_deref(), Some("Mario"));
    }

    #[test]
    fn empty_recognition_is_the_hard_failure() {
        let recognizer = StubRecognizer::new(&["", "   "]);
        let pipeline = DocumentPipeline::new(recognizer).with_config(quiet_config());

        let result = pipeline.scan_identity(&[page(), page()]);
        assert!(matches!(result, Err(RecognitionError::EmptyResult)));
    }

    #[test]
    fn bill_scan_extracts_fields() {
        let recognizer = StubRecognizer::new(&["POD IT001E12345678 POTENZA IMPEGNATA 3,3 KW"]);
        let pipeline = DocumentPipeline::new(recognizer).with_config(quiet_config());

        let scan = pipeline.scan_bill(&[page()]).unwrap();
        assert_eq!(scan.fields.pod.as_deref(), Some("IT001E12345678"));
        assert_eq!(
            scan.fields.contracted_power_kw,
            Some("3.3".parse().unwrap())
        );
    }

    #[test]
    fn garbage_scan_is_success_with_absent_fields() {
        let recognizer = StubRecognizer::new(&["testo senza alcun campo utile"]);
        let pipeline = DocumentPipeline::new(recognizer).with_config(quiet_config());

        let scan = pipeline.scan_identity(&[page()]).unwrap();
        assert_eq!(scan.document_type, DocumentType::Unknown);
        assert!(scan.fields.is_empty());
        assert!((0.0..=1.0).contains(&scan.fields.confidence));
    }
}
