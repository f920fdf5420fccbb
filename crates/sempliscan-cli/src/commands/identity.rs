//! Identity command - extract fields from an identity document.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use sempliscan_core::{
    classify_document, ContractForm, DocumentType, IdentityFields, IdentityParser,
};

use super::common::{
    load_config, read_file, scan_identity_pages, write_output, FileContent, IdentityReport,
    OutputFormat,
};

/// Arguments for the identity command.
#[derive(Args)]
pub struct IdentityArgs {
    /// Input file (PDF or image)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Model directory
    #[arg(short, long)]
    model_dir: Option<PathBuf>,

    /// Skip OCR and use only PDF text extraction
    #[arg(long)]
    text_only: bool,

    /// Show extraction confidence
    #[arg(long)]
    show_confidence: bool,

    /// Recognition deadline in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Merge extracted fields into a contract form JSON file
    #[arg(long)]
    form: Option<PathBuf>,
}

pub async fn run(args: IdentityArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }
    info!("Processing identity document: {}", args.input.display());

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {msg}")
            .unwrap()
            .progress_chars("##-"),
    );

    pb.set_message("Reading file...");
    pb.set_position(10);
    let content = read_file(&args.input, &config, args.text_only)?;

    let (document_type, fields) = match content {
        FileContent::Text(text) => {
            pb.set_message("Extracting fields from embedded text...");
            pb.set_position(60);
            let document_type = classify_document(&text);
            let fields = IdentityParser::new()
                .with_mrz(config.extraction.parse_mrz)
                .extract(document_type, &text);
            (document_type, fields)
        }
        FileContent::Pages(pages) => {
            pb.set_message("Recognizing text...");
            pb.set_position(30);
            scan_identity_pages(
                pages,
                &config,
                args.model_dir.as_deref(),
                args.timeout_secs,
            )
            .await?
        }
    };

    pb.set_position(90);
    pb.finish_with_message("Done");

    let report = IdentityReport {
        source: args.input.display().to_string(),
        document_type,
        fields,
    };

    if let Some(form_path) = &args.form {
        merge_into_form(form_path, &report.fields)?;
    }

    let output = format_report(&report, args.format)?;
    write_output(&output, args.output.as_ref())?;

    if args.show_confidence {
        println!();
        println!(
            "{} Document type: {}",
            style("ℹ").blue(),
            report.document_type.label()
        );
        println!(
            "{} Extraction confidence: {:.0}%",
            style("ℹ").blue(),
            report.fields.confidence * 100.0
        );
    }

    debug!("Total processing time: {:?}", start.elapsed());
    Ok(())
}

/// Merge extracted fields into a contract form JSON file, never
/// overwriting values already present.
fn merge_into_form(path: &PathBuf, fields: &IdentityFields) -> anyhow::Result<()> {
    let mut form: ContractForm = if path.exists() {
        serde_json::from_str(&std::fs::read_to_string(path)?)?
    } else {
        ContractForm::default()
    };

    let applied = form.merge_identity(fields);
    std::fs::write(path, serde_json::to_string_pretty(&form)?)?;

    println!(
        "{} Merged {} field(s) into {}",
        style("✓").green(),
        applied,
        path.display()
    );
    Ok(())
}

fn format_report(report: &IdentityReport, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Csv => format_csv(report),
        OutputFormat::Text => Ok(format_text(report)),
    }
}

fn format_csv(report: &IdentityReport) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "source",
        "document_type",
        "given_name",
        "family_name",
        "tax_code",
        "document_number",
        "issue_date",
        "expiry_date",
        "birth_date",
        "birth_place",
        "issuing_authority",
        "confidence",
    ])?;

    let f = &report.fields;
    let issue = f.issue_date.map(|d| d.to_string()).unwrap_or_default();
    let expiry = f.expiry_date.map(|d| d.to_string()).unwrap_or_default();
    let birth = f.birth_date.map(|d| d.to_string()).unwrap_or_default();
    let confidence = format!("{:.2}", f.confidence);

    wtr.write_record([
        report.source.as_str(),
        type_tag(report.document_type),
        f.given_name.as_deref().unwrap_or(""),
        f.family_name.as_deref().unwrap_or(""),
        f.tax_code.as_deref().unwrap_or(""),
        f.document_number.as_deref().unwrap_or(""),
        issue.as_str(),
        expiry.as_str(),
        birth.as_str(),
        f.birth_place.as_deref().unwrap_or(""),
        f.issuing_authority.as_deref().unwrap_or(""),
        confidence.as_str(),
    ])?;

    Ok(String::from_utf8(wtr.into_inner()?)?)
}

fn format_text(report: &IdentityReport) -> String {
    let f = &report.fields;
    let mut out = String::new();

    out.push_str(&format!("Documento: {}\n", report.document_type.label()));
    push_field(&mut out, "Nome", f.given_name.as_deref());
    push_field(&mut out, "Cognome", f.family_name.as_deref());
    push_field(&mut out, "Codice fiscale", f.tax_code.as_deref());
    push_field(&mut out, "Numero documento", f.document_number.as_deref());
    push_field(
        &mut out,
        "Data di rilascio",
        f.issue_date.map(|d| d.to_string()).as_deref(),
    );
    push_field(
        &mut out,
        "Data di scadenza",
        f.expiry_date.map(|d| d.to_string()).as_deref(),
    );
    push_field(
        &mut out,
        "Nascita",
        match (&f.birth_place, f.birth_date) {
            (Some(place), Some(date)) => Some(format!("{} il {}", place, date)),
            (Some(place), None) => Some(place.clone()),
            (None, Some(date)) => Some(date.to_string()),
            (None, None) => None,
        }
        .as_deref(),
    );
    push_field(&mut out, "Rilasciata da", f.issuing_authority.as_deref());
    out
}

fn push_field(out: &mut String, label: &str, value: Option<&str>) {
    match value {
        Some(value) => out.push_str(&format!("{}: {}\n", label, value)),
        None => out.push_str(&format!("{}: -\n", label)),
    }
}

fn type_tag(doc: DocumentType) -> &'static str {
    match doc {
        DocumentType::NewIdCard => "new_id_card",
        DocumentType::OldIdCard => "old_id_card",
        DocumentType::DriversLicense => "drivers_license",
        DocumentType::Passport => "passport",
        DocumentType::Unknown => "unknown",
    }
}
