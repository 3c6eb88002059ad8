use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use poimap::loader::ConfigLoader;
use poimap::web::{self, AppState};
use poimap::{PoiMapSettings, logging, validate_document};

#[derive(Debug, Parser)]
#[command(
    name = "poimap",
    version,
    about = "Points-of-interest map viewer driven by static JSON documents"
)]
struct Cli {
    /// Settings file (TOML). Defaults to <config dir>/poimap/settings.toml
    #[arg(long, global = true, env = "POIMAP_SETTINGS")]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the map page and the static documents
    Serve {
        /// Port to listen on, overrides the settings file
        #[arg(long)]
        port: Option<u16>,
    },
    /// Validate map documents on disk
    Validate {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Load a named document through the configured source and report on it
    Check { name: String },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut settings = PoiMapSettings::load_from_path(cli.settings)?;
    logging::init(&settings.logging)?;

    match cli.command {
        Command::Serve { port } => {
            if let Some(port) = port {
                settings.server.port = port;
            }
            // Must fail before the listener is bound.
            let state = AppState::from_settings(settings).map_err(|e| {
                tracing::error!("{}", e);
                anyhow::anyhow!(e.user_message())
            })?;
            web::run(state).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Validate { files } => Ok(validate_files(&files)),
        Command::Check { name } => {
            let loader = ConfigLoader::new(web::document_source(&settings)?);
            match loader.load(Some(name.as_str())).await {
                Ok(config) => {
                    println!(
                        "{name}: OK, {} locations centered at {}",
                        config.locations.len(),
                        config.center.format_coordinates()
                    );
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => {
                    eprintln!("{name}: {e}");
                    Ok(ExitCode::FAILURE)
                }
            }
        }
    }
}

fn validate_files(files: &[PathBuf]) -> ExitCode {
    let mut failed = 0usize;
    for path in files {
        match validate_file(path) {
            Ok(count) => println!("{}: OK ({count} locations)", path.display()),
            Err(e) => {
                failed += 1;
                eprintln!("{}: {e:#}", path.display());
            }
        }
    }

    if failed == 0 {
        ExitCode::SUCCESS
    } else {
        eprintln!("{failed} of {} document(s) invalid", files.len());
        ExitCode::FAILURE
    }
}

fn validate_file(path: &Path) -> Result<usize> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let config = validate_document(&bytes)?;
    Ok(config.locations.len())
}
