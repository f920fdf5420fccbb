//! Batch processing command for multiple document files.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, warn};

use sempliscan_core::{classify_document, extract_bill_fields, IdentityParser, SempliscanConfig};

use super::common::{
    load_config, read_file, scan_bill_pages, scan_identity_pages, BillReport, FileContent,
    IdentityReport, ScanKind,
};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Scan files as identity documents or bills
    #[arg(short, long, value_enum, default_value = "bill")]
    kind: ScanKind,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,

    /// Model directory
    #[arg(short, long)]
    model_dir: Option<PathBuf>,
}

/// Result of processing a single file.
enum ScanOutcome {
    Identity(IdentityReport),
    Bill(BillReport),
    Failed(String),
}

struct ProcessResult {
    path: PathBuf,
    outcome: ScanOutcome,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            matches!(
                ext.to_lowercase().as_str(),
                "pdf" | "png" | "jpg" | "jpeg" | "tiff" | "tif" | "bmp"
            )
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap()
            .progress_chars("=>-"),
    );

    let mut results = Vec::with_capacity(files.len());
    for path in files {
        let file_start = Instant::now();
        let outcome = match process_file(&path, &args, &config).await {
            Ok(outcome) => outcome,
            Err(e) => {
                let message = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), message);
                    ScanOutcome::Failed(message)
                } else {
                    error!("Failed to process {}: {}", path.display(), message);
                    anyhow::bail!("Processing failed: {}", message);
                }
            }
        };

        results.push(ProcessResult {
            path,
            outcome,
            processing_time_ms: file_start.elapsed().as_millis() as u64,
        });
        overall_pb.inc(1);
    }
    overall_pb.finish_with_message("Complete");

    write_outputs(&results, &args)?;

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));
        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let failed = results
        .iter()
        .filter(|r| matches!(r.outcome, ScanOutcome::Failed(_)))
        .count();

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(results.len() - failed).green(),
        style(failed).red()
    );

    if failed > 0 {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &results {
            if let ScanOutcome::Failed(message) = &result.outcome {
                println!("  - {}: {}", result.path.display(), message);
            }
        }
    }

    Ok(())
}

async fn process_file(
    path: &PathBuf,
    args: &BatchArgs,
    config: &SempliscanConfig,
) -> anyhow::Result<ScanOutcome> {
    let content = read_file(path, config, false)?;
    let source = path.display().to_string();

    match args.kind {
        ScanKind::Identity => {
            let (document_type, fields) = match content {
                FileContent::Text(text) => {
                    let document_type = classify_document(&text);
                    let fields = IdentityParser::new()
                        .with_mrz(config.extraction.parse_mrz)
                        .extract(document_type, &text);
                    (document_type, fields)
                }
                FileContent::Pages(pages) => {
                    scan_identity_pages(pages, config, args.model_dir.as_deref(), None).await?
                }
            };
            Ok(ScanOutcome::Identity(IdentityReport {
                source,
                document_type,
                fields,
            }))
        }
        ScanKind::Bill => {
            let fields = match content {
                FileContent::Text(text) => extract_bill_fields(&text),
                FileContent::Pages(pages) => {
                    scan_bill_pages(pages, config, args.model_dir.as_deref(), None).await?
                }
            };
            Ok(ScanOutcome::Bill(BillReport { source, fields }))
        }
    }
}

fn write_outputs(results: &[ProcessResult], args: &BatchArgs) -> anyhow::Result<()> {
    let Some(output_dir) = &args.output_dir else {
        return Ok(());
    };

    for result in results {
        let content = match &result.outcome {
            ScanOutcome::Identity(report) => serde_json::to_string_pretty(report)?,
            ScanOutcome::Bill(report) => serde_json::to_string_pretty(report)?,
            ScanOutcome::Failed(_) => continue,
        };

        let output_name = result
            .path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("scan");
        let output_path = output_dir.join(format!("{}.json", output_name));
        fs::write(&output_path, content)?;
    }
    Ok(())
}

fn write_summary(path: &PathBuf, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "document_type",
        "key_field",
        "confidence",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");
        let time = result.processing_time_ms.to_string();

        match &result.outcome {
            ScanOutcome::Identity(report) => {
                let document_type = format!("{:?}", report.document_type);
                let confidence = format!("{:.2}", report.fields.confidence);
                wtr.write_record([
                    filename,
                    "success",
                    document_type.as_str(),
                    report.fields.tax_code.as_deref().unwrap_or(""),
                    confidence.as_str(),
                    time.as_str(),
                    "",
                ])?;
            }
            ScanOutcome::Bill(report) => {
                wtr.write_record([
                    filename,
                    "success",
                    "bill",
                    report.fields.pod.as_deref().unwrap_or(""),
                    "",
                    time.as_str(),
                    "",
                ])?;
            }
            ScanOutcome::Failed(message) => {
                wtr.write_record([
                    filename,
                    "error",
                    "",
                    "",
                    "",
                    time.as_str(),
                    message.as_str(),
                ])?;
            }
        }
    }

    wtr.flush()?;
    Ok(())
}
