use std::{io, path::PathBuf, sync::Arc};

use anyhow::{bail, Result};
use clap::Parser;
use client_core::{SessionController, StoreLookupService};
use storage::RecordStore;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod terminal;

use config::load_settings;
use terminal::Terminal;

#[derive(Parser, Debug)]
#[command(about = "Check a student's terminal result with a registration number and scratch card PIN")]
struct Args {
    /// Dataset file (.json or .toml). Defaults to the built-in sample records.
    #[arg(long)]
    data: Option<PathBuf>,
    /// Simulated lookup latency in milliseconds.
    #[arg(long)]
    latency_ms: Option<u64>,
    #[arg(long, requires = "pin")]
    reg_no: Option<String>,
    #[arg(long, requires = "reg_no")]
    pin: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings();
    if let Some(path) = args.data {
        settings.data_path = Some(path);
    }
    if let Some(latency_ms) = args.latency_ms {
        settings.lookup_latency_ms = latency_ms;
    }

    let store = match &settings.data_path {
        Some(path) => RecordStore::load_from_path(path)?,
        None => {
            let store = RecordStore::sample();
            info!(records = store.len(), "using built-in sample records");
            store
        }
    };
    let lookup = Arc::new(StoreLookupService::new(store, settings.lookup_latency()));
    let session = SessionController::new(lookup);

    let mut terminal = Terminal::new(
        session,
        settings.school,
        chrono::Local::now().date_naive(),
        BufReader::new(tokio::io::stdin()),
        io::stdout(),
    );

    match (args.reg_no, args.pin) {
        (Some(reg_no), Some(pin)) => {
            if !terminal.check_once(&reg_no, &pin).await? {
                bail!("no result for registration number {reg_no}");
            }
        }
        _ => terminal.run().await?,
    }

    Ok(())
}
