//! Models command - download and manage OCR models.

use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;

use clap::{Args, Subcommand};
use console::style;
use futures_util::StreamExt;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

/// Arguments for the models command.
#[derive(Args)]
pub struct ModelsArgs {
    #[command(subcommand)]
    command: ModelsCommand,
}

#[derive(Subcommand)]
enum ModelsCommand {
    /// List the model files and where they live
    List,

    /// Download models
    Download(DownloadArgs),

    /// Check model status
    Status,

    /// Remove downloaded models
    Clean,
}

#[derive(Args)]
struct DownloadArgs {
    /// Output directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Force re-download even if files exist
    #[arg(long)]
    force: bool,
}

/// Model information with download URL.
struct ModelInfo {
    filename: &'static str,
    size_bytes: u64,
    description: &'static str,
    url: &'static str,
}

const MODEL_FILES: [ModelInfo; 3] = [
    ModelInfo {
        filename: "det.onnx",
        size_bytes: 4_500_000,
        description: "PP-OCRv3 mobile detection",
        url: "https://github.com/sempliswitch/sempliscan/raw/main/models/det.onnx",
    },
    ModelInfo {
        filename: "latin_rec.onnx",
        size_bytes: 7_500_000,
        description: "Latin recognition",
        url: "https://github.com/sempliswitch/sempliscan/raw/main/models/latin_rec.onnx",
    },
    ModelInfo {
        filename: "latin_dict.txt",
        size_bytes: 2_000,
        description: "Latin character dictionary",
        url: "https://github.com/sempliswitch/sempliscan/raw/main/models/latin_dict.txt",
    },
];

/// Default model directory under the platform data dir.
pub fn default_model_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sempliscan")
        .join("models")
}

pub async fn run(args: ModelsArgs) -> anyhow::Result<()> {
    match args.command {
        ModelsCommand::List => list_models(),
        ModelsCommand::Download(download_args) => download_models(download_args).await,
        ModelsCommand::Status => check_status(),
        ModelsCommand::Clean => clean_models(),
    }
}

fn list_models() -> anyhow::Result<()> {
    println!("{}", style("OCR model files").bold());
    println!("Directory: {}", default_model_dir().display());
    println!();

    for model in &MODEL_FILES {
        println!(
            "  {:<20} {:>10}  {}",
            model.filename,
            format_size(model.size_bytes),
            model.description
        );
    }

    println!();
    println!("Run 'sempliscan models download' to fetch them (~12MB).");
    Ok(())
}

async fn download_models(args: DownloadArgs) -> anyhow::Result<()> {
    let output_dir = args.output.unwrap_or_else(default_model_dir);
    fs::create_dir_all(&output_dir)?;

    println!(
        "{} Downloading models to {}",
        style("ℹ").blue(),
        output_dir.display()
    );
    println!();

    let client = reqwest::Client::builder()
        .user_agent("sempliscan-cli/0.1.0")
        .timeout(std::time::Duration::from_secs(300))
        .build()?;

    let multi_progress = MultiProgress::new();
    let mut success_count = 0;
    let mut skip_count = 0;
    let mut error_count = 0;

    for model in &MODEL_FILES {
        let path = output_dir.join(model.filename);

        if path.exists() && !args.force {
            let metadata = fs::metadata(&path)?;
            // A plausibly complete file is at least half the expected size.
            if metadata.len() > model.size_bytes / 2 {
                println!(
                    "  {} {} (already exists, {})",
                    style("✓").green(),
                    model.filename,
                    format_size(metadata.len())
                );
                skip_count += 1;
                continue;
            }
        }

        let pb = multi_progress.add(ProgressBar::new(model.size_bytes));
        pb.set_style(
            ProgressStyle::default_bar()
                .template("  {spinner:.green} {msg:<30} [{bar:25.cyan/blue}] {bytes}/{total_bytes}")
                .unwrap()
                .progress_chars("=>-"),
        );
        pb.set_message(model.filename.to_string());

        match download_file(&client, model.url, &path, &pb).await {
            Ok(()) => {
                pb.finish_with_message(format!("{} {}", style("✓").green(), model.filename));
                success_count += 1;
            }
            Err(e) => {
                pb.finish_with_message(format!(
                    "{} {} - {}",
                    style("✗").red(),
                    model.filename,
                    e
                ));
                error_count += 1;
            }
        }
    }

    println!();
    if error_count == 0 {
        println!(
            "{} Models ready ({} downloaded, {} already present)",
            style("✓").green().bold(),
            success_count,
            skip_count
        );
    } else {
        println!(
            "{} Download completed with errors: {} downloaded, {} skipped, {} failed",
            style("⚠").yellow().bold(),
            success_count,
            skip_count,
            error_count
        );
        println!("Retry with: sempliscan models download --force");
    }

    println!();
    check_status()
}

async fn download_file(
    client: &reqwest::Client,
    url: &str,
    path: &PathBuf,
    pb: &ProgressBar,
) -> anyhow::Result<()> {
    let response = client.get(url).send().await?;

    if !response.status().is_success() {
        anyhow::bail!("HTTP {}", response.status());
    }

    if let Some(content_length) = response.content_length() {
        pb.set_length(content_length);
    }

    // Stream into a temp file, rename on completion.
    let temp_path = path.with_extension("tmp");
    let mut file = File::create(&temp_path)?;

    let mut stream = response.bytes_stream();
    let mut downloaded: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk)?;
        downloaded += chunk.len() as u64;
        pb.set_position(downloaded);
    }

    file.flush()?;
    drop(file);
    fs::rename(&temp_path, path)?;
    Ok(())
}

fn check_status() -> anyhow::Result<()> {
    let model_dir = default_model_dir();

    println!("{}", style("Model status").bold());
    println!("Directory: {}", model_dir.display());
    println!();

    let mut all_present = true;
    let mut total_size: u64 = 0;

    for model in &MODEL_FILES {
        let path = model_dir.join(model.filename);
        let (status, size_str) = if path.exists() {
            let size = fs::metadata(&path)?.len();
            total_size += size;
            if size > model.size_bytes / 2 {
                (style("✓").green(), format_size(size))
            } else {
                all_present = false;
                (style("⚠").yellow(), format!("{} (incomplete?)", format_size(size)))
            }
        } else {
            all_present = false;
            (style("✗").red(), "missing".to_string())
        };

        println!("  {} {:<25} {:>10}", status, model.filename, size_str);
    }

    println!();
    if all_present {
        println!("  {} Ready ({} total)", style("✓").green(), format_size(total_size));
    } else {
        println!(
            "  {} Run 'sempliscan models download' to download",
            style("⚠").yellow()
        );
    }
    Ok(())
}

fn clean_models() -> anyhow::Result<()> {
    let model_dir = default_model_dir();
    if !model_dir.exists() {
        println!("{} No model files to remove.", style("ℹ").blue());
        return Ok(());
    }

    let mut total_removed = 0;
    let mut total_freed: u64 = 0;

    for model in &MODEL_FILES {
        let path = model_dir.join(model.filename);
        if path.exists() {
            let size = fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
            fs::remove_file(&path)?;
            total_removed += 1;
            total_freed += size;
            println!("  {} Removed {}", style("✓").green(), model.filename);
        }
    }

    // Also remove any leftover partial downloads.
    if let Ok(entries) = fs::read_dir(&model_dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().map(|e| e == "tmp").unwrap_or(false) {
                let _ = fs::remove_file(&path);
            }
        }
    }

    if total_removed > 0 {
        println!();
        println!(
            "{} Removed {} files, freed {}",
            style("✓").green(),
            total_removed,
            format_size(total_freed)
        );
    } else {
        println!("{} No model files to remove.", style("ℹ").blue());
    }
    Ok(())
}

fn format_size(bytes: u64) -> String {
    if bytes >= 1_000_000_000 {
        format!("{:.1}GB", bytes as f64 / 1_000_000_000.0)
    } else if bytes >= 1_000_000 {
        format!("{:.1}MB", bytes as f64 / 1_000_000.0)
    } else if bytes >= 1_000 {
        format!("{:.1}KB", bytes as f64 / 1_000.0)
    } else {
        format!("{}B", bytes)
    }
}
