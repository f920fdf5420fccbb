//! Bill command - extract fields from a utility bill.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use sempliscan_core::{extract_bill_fields, BillFields, ContractForm};

use super::common::{
    load_config, read_file, scan_bill_pages, write_output, BillReport, FileContent, OutputFormat,
};

/// Arguments for the bill command.
#[derive(Args)]
pub struct BillArgs {
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

    /// Recognition deadline in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Merge extracted fields into a contract form JSON file
    #[arg(long)]
    form: Option<PathBuf>,
}

pub async fn run(args: BillArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }
    info!("Processing bill: {}", args.input.display());

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

    let fields = match content {
        FileContent::Text(text) => {
            pb.set_message("Extracting fields from embedded text...");
            pb.set_position(60);
            extract_bill_fields(&text)
        }
        FileContent::Pages(pages) => {
            pb.set_message("Recognizing text...");
            pb.set_position(30);
            scan_bill_pages(pages, &config, args.model_dir.as_deref(), args.timeout_secs).await?
        }
    };

    pb.set_position(90);
    pb.finish_with_message("Done");

    let report = BillReport {
        source: args.input.display().to_string(),
        fields,
    };

    if let Some(form_path) = &args.form {
        merge_into_form(form_path, &report.fields)?;
    }

    let output = format_report(&report, args.format)?;
    write_output(&output, args.output.as_ref())?;

    debug!("Total processing time: {:?}", start.elapsed());
    Ok(())
}

fn merge_into_form(path: &PathBuf, fields: &BillFields) -> anyhow::Result<()> {
    let mut form: ContractForm = if path.exists() {
        serde_json::from_str(&std::fs::read_to_string(path)?)?
    } else {
        ContractForm::default()
    };

    let applied = form.merge_bill(fields);
    std::fs::write(path, serde_json::to_string_pretty(&form)?)?;

    println!(
        "{} Merged {} field(s) into {}",
        style("✓").green(),
        applied,
        path.display()
    );
    Ok(())
}

fn format_report(report: &BillReport, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Csv => format_csv(report),
        OutputFormat::Text => Ok(format_text(report)),
    }
}

fn format_csv(report: &BillReport) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "source",
        "pod",
        "pdr",
        "contracted_power_kw",
        "supply_address",
        "billing_address",
    ])?;

    let f = &report.fields;
    let power = f
        .contracted_power_kw
        .map(|p| p.to_string())
        .unwrap_or_default();
    let supply = f
        .supply_address
        .as_ref()
        .map(|a| a.format())
        .unwrap_or_default();
    let billing = f
        .billing_address
        .as_ref()
        .map(|a| a.format())
        .unwrap_or_default();

    wtr.write_record([
        report.source.as_str(),
        f.pod.as_deref().unwrap_or(""),
        f.pdr.as_deref().unwrap_or(""),
        power.as_str(),
        supply.as_str(),
        billing.as_str(),
    ])?;

    Ok(String::from_utf8(wtr.into_inner()?)?)
}

fn format_text(report: &BillReport) -> String {
    let f = &report.fields;
    let mut out = String::new();

    push_field(&mut out, "POD", f.pod.as_deref());
    push_field(&mut out, "PDR", f.pdr.as_deref());
    push_field(
        &mut out,
        "Potenza impegnata (kW)",
        f.contracted_power_kw.map(|p| p.to_string()).as_deref(),
    );
    push_field(
        &mut out,
        "Indirizzo fornitura",
        f.supply_address.as_ref().map(|a| a.format()).as_deref(),
    );
    push_field(
        &mut out,
        "Indirizzo fatturazione",
        f.billing_address.as_ref().map(|a| a.format()).as_deref(),
    );
    out
}

fn push_field(out: &mut String, label: &str, value: Option<&str>) {
    match value {
        Some(value) => out.push_str(&format!("{}: {}\n", label, value)),
        None => out.push_str(&format!("{}: -\n", label)),
    }
}
