use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rust_decimal::Decimal;
use tracing::{debug, info};

use doc_core::calculations::amount::parse_canonical;
use doc_core::form::{FormSession, InitialValues};
use doc_core::{DocumentStatus, DocumentType};
use doc_form::{FormConfig, build_registry, load_script, logging, replay};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Replays a CSV event script through the document form and prints the
/// resulting form state.
#[derive(Debug, Parser)]
#[command(name = "doc-form")]
#[command(version, about, long_about = None)]
struct Cli {
    /// CSV script with `event,target,value` columns.
    #[arg(short, long)]
    script: PathBuf,

    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Lookup backend (`http` or `memory`). Overrides the config file.
    #[arg(long)]
    backend: Option<String>,

    /// Backend connection: base URL for `http`, data directory for `memory`.
    #[arg(long)]
    connection: Option<String>,

    /// Open the form on a saved document instead of a new one.
    #[arg(long, default_value_t = false)]
    edit: bool,

    /// Saved document type code (NF, FAT, NFS, NFSA, REC).
    #[arg(long = "type", requires = "edit")]
    document_type: Option<String>,

    /// Saved status code (PEN, PAG, ATR).
    #[arg(long, requires = "edit")]
    status: Option<String>,

    /// Saved gross amount, canonical form (e.g. `1500.00`).
    #[arg(long, requires = "edit")]
    gross: Option<String>,

    /// Saved ISS amount, canonical form.
    #[arg(long, requires = "edit")]
    iss: Option<String>,

    /// Saved IRRF amount, canonical form.
    #[arg(long, requires = "edit")]
    irrf: Option<String>,

    /// Log at debug level.
    #[arg(short, long, default_value_t = false)]
    verbose: bool,

    /// Print the outcome as JSON.
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn amount_arg(
    name: &str,
    value: Option<&str>,
) -> Result<Decimal> {
    match value {
        Some(text) => parse_canonical(text).with_context(|| format!("invalid --{name}")),
        None => Ok(Decimal::ZERO),
    }
}

fn open_session(cli: &Cli) -> Result<FormSession> {
    if !cli.edit {
        return Ok(FormSession::create());
    }

    let document_type = match cli.document_type.as_deref() {
        Some(code) => Some(
            DocumentType::parse(code)
                .with_context(|| format!("unknown document type '{code}'"))?,
        ),
        None => None,
    };
    let status = match cli.status.as_deref() {
        Some(code) => Some(
            DocumentStatus::parse(code).with_context(|| format!("unknown status '{code}'"))?,
        ),
        None => None,
    };

    Ok(FormSession::edit(InitialValues {
        document_type,
        status,
        gross: amount_arg("gross", cli.gross.as_deref())?,
        iss: amount_arg("iss", cli.iss.as_deref())?,
        irrf: amount_arg("irrf", cli.irrf.as_deref())?,
    }))
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => FormConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => FormConfig::default(),
    };
    if let Some(backend) = &cli.backend {
        config.api.backend = backend.clone();
    }
    if let Some(connection) = &cli.connection {
        config.api.connection = connection.clone();
    }

    logging::init_logging(&config.logging).context("Failed to initialize logging")?;
    if cli.verbose {
        logging::set_log_level("debug")?;
    }

    let steps = load_script(&cli.script)
        .with_context(|| format!("Failed to read script: {}", cli.script.display()))?;
    info!(steps = steps.len(), script = %cli.script.display(), "script loaded");

    debug!(backend = %config.api.backend, "creating lookup backend");
    let directory = build_registry()
        .create(&config.api)
        .await
        .with_context(|| format!("Failed to create '{}' backend", config.api.backend))?;

    let session = open_session(&cli)?;
    let outcome = replay(session, &steps, &*directory).await;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&outcome).context("Failed to encode outcome")?
        );
    } else {
        print!("{outcome}");
    }

    Ok(())
}
