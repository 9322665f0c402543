#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for tax-status debt extraction.
//!
//! Reads tax-status documents (PDF, or `.txt` with form-feed page breaks),
//! runs the extraction pipeline and prints the report as text or JSON. Set
//! `RUST_LOG=debug` to see per-stage details.

mod render;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use sitfis_extract::{ExtractionConfig, Extractor};
use sitfis_pdf::{DocumentPaths, read_documents};

#[derive(Parser)]
#[command(name = "sitfis", about = "Tax-status debt extraction tool")]
struct Cli {
    /// TOML file overriding the built-in section markers and patterns
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Print JSON instead of a text report
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract and total the debts listed in a tax-status report
    Debts {
        /// Report file (`.pdf`, or `.txt` with form-feed page breaks)
        path: PathBuf,
    },
    /// Build the combined report from up to three documents, read
    /// concurrently. Fails without output if any document cannot be read.
    Combined {
        /// Tax-status report ("Relatório de Situação Fiscal")
        #[arg(long)]
        status: Option<PathBuf>,
        /// Active-debt certificate naming the debtor
        #[arg(long)]
        certificate: Option<PathBuf>,
        /// Payment-capacity (CAPAG) report
        #[arg(long)]
        capag: Option<PathBuf>,
    },
    /// Print the built-in extraction config
    DefaultConfig,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::DefaultConfig => {
            print!("{}", sitfis_extract::config::DEFAULT_TOML);
        }
        Commands::Debts { path } => {
            let extractor = load_extractor(cli.config.as_deref())?;
            let documents = read_documents(DocumentPaths {
                status: Some(path),
                ..DocumentPaths::default()
            })
            .await?;
            let pages = documents.status.unwrap_or_default();
            let report = extractor.debts(&pages);

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", render::debt_report(&report));
            }
        }
        Commands::Combined {
            status,
            certificate,
            capag,
        } => {
            if status.is_none() && certificate.is_none() && capag.is_none() {
                return Err("at least one of --status, --certificate, --capag is required".into());
            }

            let extractor = load_extractor(cli.config.as_deref())?;
            let documents = read_documents(DocumentPaths {
                status,
                certificate,
                capag,
            })
            .await?;
            let report = extractor.combined(&documents);

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", render::combined_report(&report));
            }
        }
    }

    Ok(())
}

/// Compiles the config at `path`, or the built-in one.
fn load_extractor(path: Option<&Path>) -> Result<Extractor, sitfis_extract::ConfigError> {
    let config = match path {
        Some(path) => ExtractionConfig::from_path(path)?,
        None => {
            log::debug!("Using built-in extraction config");
            ExtractionConfig::embedded()
        }
    };
    Extractor::new(&config)
}
