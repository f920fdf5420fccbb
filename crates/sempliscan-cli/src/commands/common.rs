//! Shared helpers for the identity, bill, and batch commands.

use std::path::{Path, PathBuf};
use std::time::Duration;

use image::DynamicImage;
use serde::Serialize;
use tracing::{debug, warn};

use sempliscan_core::{
    BillFields, DocumentPipeline, DocumentType, IdentityFields, PdfExtractor, PdfType,
    PureOcrRecognizer, RecognitionError, SempliscanConfig,
};

use super::models::default_model_dir;

/// Output format shared by the processing commands.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

/// What a file was scanned as.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum ScanKind {
    /// Identity document
    Identity,
    /// Utility bill
    Bill,
}

/// Scan report for an identity document.
#[derive(Debug, Serialize)]
pub struct IdentityReport {
    pub source: String,
    pub document_type: DocumentType,
    pub fields: IdentityFields,
}

/// Scan report for a utility bill.
#[derive(Debug, Serialize)]
pub struct BillReport {
    pub source: String,
    pub fields: BillFields,
}

/// Load the pipeline configuration, from a file when given.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<SempliscanConfig> {
    match config_path {
        Some(path) => Ok(SempliscanConfig::from_file(Path::new(path))?),
        None => Ok(SempliscanConfig::default()),
    }
}

/// The text a file yields: embedded PDF text, or page images that still
/// need recognition.
pub enum FileContent {
    Text(String),
    Pages(Vec<DynamicImage>),
}

/// Read a file into recognizable content.
///
/// PDFs with enough embedded text skip OCR entirely; scanned PDFs yield
/// their embedded page images. Plain images yield a single page.
pub fn read_file(
    path: &Path,
    config: &SempliscanConfig,
    text_only: bool,
) -> anyhow::Result<FileContent> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "pdf" => read_pdf(path, config, text_only),
        "png" | "jpg" | "jpeg" | "webp" | "tiff" | "tif" | "bmp" => {
            let image = image::open(path)?;
            Ok(FileContent::Pages(vec![image]))
        }
        _ => anyhow::bail!("Unsupported file format: {}", extension),
    }
}

fn read_pdf(
    path: &Path,
    config: &SempliscanConfig,
    text_only: bool,
) -> anyhow::Result<FileContent> {
    let data = std::fs::read(path)?;
    let extractor = PdfExtractor::load(&data)?;
    let pdf_type = extractor.analyze();
    debug!("PDF type: {:?}", pdf_type);

    match pdf_type {
        PdfType::Empty => anyhow::bail!("PDF appears to be empty"),
        PdfType::Text => Ok(FileContent::Text(extractor.extract_text()?)),
        PdfType::Hybrid if config.pdf.prefer_embedded_text || text_only => {
            let text = extractor.extract_text()?;
            if text.trim().len() >= config.pdf.min_text_length {
                Ok(FileContent::Text(text))
            } else {
                warn!("hybrid PDF has little embedded text, using page images");
                Ok(FileContent::Pages(pdf_pages(&extractor, config)?))
            }
        }
        PdfType::Image if text_only => {
            anyhow::bail!("PDF is image-based but --text-only was set. Remove the flag to use OCR.")
        }
        _ => Ok(FileContent::Pages(pdf_pages(&extractor, config)?)),
    }
}

fn pdf_pages(
    extractor: &PdfExtractor,
    config: &SempliscanConfig,
) -> anyhow::Result<Vec<DynamicImage>> {
    let mut page_count = extractor.page_count();
    if config.pdf.max_pages > 0 {
        page_count = page_count.min(config.pdf.max_pages as u32);
    }

    let mut pages = Vec::new();
    for page in 1..=page_count {
        match extractor.extract_images(page) {
            Ok(images) => pages.extend(images),
            Err(e) => warn!("failed to extract images from page {}: {}", page, e),
        }
    }

    if pages.is_empty() {
        anyhow::bail!("no page images found in PDF");
    }
    Ok(pages)
}

/// Build the OCR recognizer, checking that models are present.
pub fn build_recognizer(
    model_dir: Option<&Path>,
    config: &SempliscanConfig,
) -> anyhow::Result<PureOcrRecognizer> {
    let model_dir = model_dir
        .map(|p| p.to_path_buf())
        .unwrap_or_else(default_model_dir);

    let det_model = model_dir.join(&config.models.detection_model);
    if !det_model.exists() {
        anyhow::bail!(
            "OCR models not found at {}.\n\n\
             Run 'sempliscan models download' to fetch them.",
            model_dir.display()
        );
    }

    Ok(PureOcrRecognizer::from_dir(
        &model_dir,
        &config.models,
        config.recognition.clone(),
    )?)
}

/// Run a blocking scan under the configured deadline.
///
/// On expiry the in-flight result is discarded when it eventually
/// arrives; only the timeout error surfaces.
pub async fn with_timeout<T, F>(
    timeout_override: Option<u64>,
    config: &SempliscanConfig,
    task: F,
) -> anyhow::Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, RecognitionError> + Send + 'static,
{
    let seconds = timeout_override.unwrap_or(config.recognition.timeout_secs);
    let deadline = Duration::from_secs(seconds);

    match tokio::time::timeout(deadline, tokio::task::spawn_blocking(task)).await {
        Err(_) => Err(RecognitionError::Timeout { seconds }.into()),
        Ok(joined) => Ok(joined??),
    }
}

/// Scan already-loaded pages as an identity document.
pub async fn scan_identity_pages(
    pages: Vec<DynamicImage>,
    config: &SempliscanConfig,
    model_dir: Option<&Path>,
    timeout_override: Option<u64>,
) -> anyhow::Result<(DocumentType, IdentityFields)> {
    let recognizer = build_recognizer(model_dir, config)?;
    let pipeline = DocumentPipeline::new(recognizer).with_config(config.clone());

    let scan = with_timeout(timeout_override, config, move || {
        pipeline.scan_identity(&pages)
    })
    .await?;
    Ok((scan.document_type, scan.fields))
}

/// Scan already-loaded pages as a utility bill.
pub async fn scan_bill_pages(
    pages: Vec<DynamicImage>,
    config: &SempliscanConfig,
    model_dir: Option<&Path>,
    timeout_override: Option<u64>,
) -> anyhow::Result<BillFields> {
    let recognizer = build_recognizer(model_dir, config)?;
    let pipeline = DocumentPipeline::new(recognizer).with_config(config.clone());

    let scan = with_timeout(timeout_override, config, move || pipeline.scan_bill(&pages)).await?;
    Ok(scan.fields)
}

/// Write output to a file or stdout.
pub fn write_output(output: &str, path: Option<&PathBuf>) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, output)?;
            println!(
                "{} Output written to {}",
                console::style("✓").green(),
                path.display()
            );
        }
        None => println!("{}", output),
    }
    Ok(())
}
