mod run_cmd;
mod scan_cmd;
mod terminal_output;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::warn;

use vaultocr_config::{config_dir, config_file_path, load_config, EngineConfig, OcrConfig};
use vaultocr_core::{Recognizer, Shutdown, ShutdownHandle};
use vaultocr_understanding::{TesseractRecognizer, VisionRecognizer};

#[derive(Parser)]
#[command(name = "vaultocr")]
#[command(about = "Write OCR text of embedded images into note front matter")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct CommonArgs {
    /// Vault root to walk (overrides `vaultPath`)
    #[arg(long)]
    vault: Option<PathBuf>,
    /// Config file (default: ~/.vaultocr/config.yaml)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Print machine-readable JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Recognize attachments and update every document in the vault
    Run {
        #[command(flatten)]
        common: CommonArgs,
        /// Replace an existing OCR field
        #[arg(long)]
        overwrite: bool,
        /// Recognition languages, e.g. "eng+deu"
        #[arg(long)]
        languages: Option<String>,
        /// Documents processed concurrently
        #[arg(long)]
        documents: Option<usize>,
        /// Attachments recognized concurrently per document
        #[arg(long)]
        attachments: Option<usize>,
    },
    /// List the attachments each document references, as resolved paths
    Scan {
        #[command(flatten)]
        common: CommonArgs,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { common, overwrite, languages, documents, attachments } => {
            let mut config = load(&common).await?;
            config.overwrite |= overwrite;
            if let Some(languages) = languages {
                config.languages = languages;
            }
            if let Some(documents) = documents {
                config.document_concurrency = documents;
            }
            if let Some(attachments) = attachments {
                config.attachment_concurrency = attachments;
            }
            let _guard = prepare(&config)?;
            let vault = vault_root(&common, &config)?;
            let shutdown = install_interrupt_handler();
            let failed = run_cmd::run(&config, build_recognizer(&config.engine), &vault, &shutdown, common.json).await?;
            Ok(if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS })
        }
        Commands::Scan { common } => {
            let config = load(&common).await?;
            let _guard = prepare(&config)?;
            let vault = vault_root(&common, &config)?;
            scan_cmd::run(&config, build_recognizer(&config.engine), &vault, common.json).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn load(common: &CommonArgs) -> Result<OcrConfig> {
    let path = common.config.clone().unwrap_or_else(|| config_file_path(&config_dir()));
    load_config(&path).await
}

/// Start logging, then validate the config with overrides applied.
fn prepare(config: &OcrConfig) -> Result<logging::LogGuard> {
    let guard = logging::init_logger(&config.logging.level, config.logging.json, config.logging.dir.as_deref())?;
    vaultocr_config::check(config)?;
    Ok(guard)
}

fn vault_root(common: &CommonArgs, config: &OcrConfig) -> Result<PathBuf> {
    let root = common
        .vault
        .clone()
        .or_else(|| config.vault_path.clone())
        .context("No vault given; pass --vault or set vaultPath in the config")?;
    anyhow::ensure!(root.is_dir(), "Vault root is not a directory: {}", root.display());
    Ok(root)
}

fn build_recognizer(engine: &EngineConfig) -> Arc<dyn Recognizer> {
    match engine {
        EngineConfig::Tesseract { binary } => Arc::new(TesseractRecognizer::new(binary)),
        EngineConfig::OpenAi { api_key, model, base_url } => {
            Arc::new(VisionRecognizer::new(api_key).with_model(model).with_base_url(base_url))
        }
    }
}

/// First Ctrl-C stops new work; in-flight documents finish or are left untouched.
fn install_interrupt_handler() -> Shutdown {
    let (handle, shutdown) = ShutdownHandle::new();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping after in-flight work");
            handle.trigger();
        }
    });
    shutdown
}
