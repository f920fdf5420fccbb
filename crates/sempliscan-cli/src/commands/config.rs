//! Config command - show and initialize configuration.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use console::style;

use sempliscan_core::SempliscanConfig;

use super::common::load_config;

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the resolved configuration
    Show,

    /// Write a default configuration file
    Init(InitArgs),
}

#[derive(Args)]
struct InitArgs {
    /// Destination path
    #[arg(default_value = "sempliscan.json")]
    path: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    force: bool,
}

pub async fn run(args: ConfigArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => show(config_path),
        ConfigCommand::Init(init_args) => init(init_args),
    }
}

fn show(config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

fn init(args: InitArgs) -> anyhow::Result<()> {
    if args.path.exists() && !args.force {
        anyhow::bail!(
            "{} already exists; pass --force to overwrite",
            args.path.display()
        );
    }

    SempliscanConfig::default().save(&args.path)?;
    println!(
        "{} Wrote default configuration to {}",
        style("✓").green(),
        args.path.display()
    );
    Ok(())
}
