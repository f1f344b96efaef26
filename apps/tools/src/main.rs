use std::{fs, path::{Path, PathBuf}};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use shared::domain::Dataset;
use storage::RecordStore;
use tracing::{info, warn};

#[derive(Parser, Debug)]
struct Cli {
    /// Dataset file (.json or .toml). Defaults to the built-in sample records.
    #[arg(long, global = true)]
    data: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List registration numbers and names in load order.
    List,
    /// Check for duplicate keys, blank credentials and inconsistent totals.
    Validate,
    /// Write the built-in sample dataset to a .json or .toml file.
    ExportSample { path: PathBuf },
}

fn open_store(data: Option<&Path>) -> Result<RecordStore> {
    match data {
        Some(path) => RecordStore::load_from_path(path),
        None => Ok(RecordStore::sample()),
    }
}

fn encode_dataset(dataset: &Dataset, path: &Path) -> Result<String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(serde_json::to_string_pretty(dataset)?),
        Some("toml") => Ok(toml::to_string_pretty(dataset)?),
        _ => bail!(
            "cannot infer dataset format from '{}'; use .json or .toml",
            path.display()
        ),
    }
}

fn list_lines(store: &RecordStore) -> Vec<String> {
    store
        .records()
        .map(|record| {
            format!(
                "{}\t{}\t{} {}",
                record.registration_number, record.name, record.class_name, record.term
            )
        })
        .collect()
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    match cli.command {
        Command::List => {
            let store = open_store(cli.data.as_deref())?;
            for line in list_lines(&store) {
                println!("{line}");
            }
        }
        Command::Validate => {
            let store = open_store(cli.data.as_deref())?;
            let issues = store.audit();
            for issue in &issues {
                warn!(%issue, "dataset issue");
            }
            if !issues.is_empty() {
                bail!("{} issue(s) found in {} record(s)", issues.len(), store.len());
            }
            info!(records = store.len(), "dataset is consistent");
        }
        Command::ExportSample { path } => {
            let raw = encode_dataset(&RecordStore::sample().to_dataset(), &path)?;
            fs::write(&path, raw)
                .with_context(|| format!("failed to write '{}'", path.display()))?;
            println!("wrote sample dataset to {}", path.display());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exported_sample_loads_in_both_formats() {
        let dir = tempfile::tempdir().expect("tempdir");
        for name in ["students.json", "students.toml"] {
            let path = dir.path().join(name);
            let raw = encode_dataset(&RecordStore::sample().to_dataset(), &path).expect("encode");
            fs::write(&path, raw).expect("write");

            let store = open_store(Some(&path)).expect("load");
            assert_eq!(store.len(), 2);
            assert!(store.audit().is_empty());
        }
    }

    #[test]
    fn export_rejects_unknown_extension() {
        let err = encode_dataset(&Dataset::default(), Path::new("students.yaml"))
            .expect_err("yaml unsupported");
        assert!(err.to_string().contains("students.yaml"));
    }

    #[test]
    fn list_shows_registration_number_and_name() {
        let lines = list_lines(&RecordStore::sample());
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("STU/2024/001\tIbrahim Musa"));
        assert!(lines[1].starts_with("STU/2024/002\tChioma Okeke"));
    }
}
