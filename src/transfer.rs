//! Moving history in and out of kwik.
//!
//! - `kwik import-history [--file F]` seeds the store from a bash or zsh
//!   history file.
//! - `kwik export [FILE] [--format json|csv]` writes every stored record.
//! - `kwik import FILE` replays a JSON export through the normal track path.

use anyhow::{Context, Result};
use clap::ValueEnum;
use kwik_core::models::CommandRecord;
use kwik_core::shell_history::{self, ImportSummary};
use kwik_core::store::Store;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::display;
use crate::sqlite_store::SqliteStore;

/// Candidate history files, most specific first.
fn history_candidates(explicit: Option<PathBuf>) -> Vec<PathBuf> {
    let mut candidates: Vec<PathBuf> = Vec::new();
    candidates.extend(explicit);
    if let Some(histfile) = std::env::var_os("HISTFILE").filter(|v| !v.is_empty()) {
        candidates.push(PathBuf::from(histfile));
    }
    if let Some(home) = dirs::home_dir() {
        candidates.push(home.join(".zsh_history"));
        candidates.push(home.join(".bash_history"));
    }
    candidates
}

/// The first candidate that is an existing regular file.
pub fn find_history_file(explicit: Option<PathBuf>) -> Option<PathBuf> {
    history_candidates(explicit)
        .into_iter()
        .find(|p| p.is_file())
}

pub async fn run_import_history(config: &Config, file: Option<PathBuf>) -> Result<()> {
    let path = match find_history_file(file) {
        Some(p) => p,
        None => anyhow::bail!("Could not find a shell history file. Use --file."),
    };

    // zsh metafies non-ASCII bytes, so decode lossily
    let bytes = std::fs::read(&path)
        .with_context(|| format!("Failed to read history file: {}", path.display()))?;
    let text = String::from_utf8_lossy(&bytes);

    println!("Importing from: {}", path.display());

    let store = SqliteStore::open(config).await?;
    let result = shell_history::import_lines(&store, text.lines(), display::now()).await;
    store.close().await;
    let ImportSummary { imported, skipped } = result?;

    println!("  imported: {}", imported);
    println!("  skipped:  {}", skipped);
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Json,
    Csv,
}

/// Write all records to `output`, or stdout when `None`.
pub async fn run_export(
    config: &Config,
    output: Option<&Path>,
    format: ExportFormat,
) -> Result<()> {
    let store = SqliteStore::open(config).await?;
    let result = store.recent_commands(i64::MAX).await;
    store.close().await;
    let records = result?;

    let writer: Box<dyn Write> = match output {
        Some(path) => Box::new(
            std::fs::File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?,
        ),
        None => Box::new(io::stdout()),
    };
    match format {
        ExportFormat::Json => write_json(writer, &records)?,
        ExportFormat::Csv => write_csv(writer, &records)?,
    }

    if let Some(path) = output {
        println!("Exported {} commands to {}", records.len(), path.display());
    }
    Ok(())
}

fn write_json(mut writer: impl Write, records: &[CommandRecord]) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, records)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// One header row, then one row per record. A missing subcommand is an
/// empty field.
fn write_csv(writer: impl Write, records: &[CommandRecord]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Read a JSON export and track each record again.
pub async fn run_import(config: &Config, file: &Path) -> Result<()> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read export file: {}", file.display()))?;
    let records: Vec<CommandRecord> = serde_json::from_str(&text)
        .with_context(|| format!("{} is not a kwik JSON export", file.display()))?;

    println!("Importing from: {}", file.display());

    let store = SqliteStore::open(config).await?;
    let result = shell_history::import_records(&store, &records).await;
    store.close().await;
    let ImportSummary { imported, skipped } = result?;

    println!("  imported: {}", imported);
    println!("  skipped:  {}", skipped);
    Ok(())
}
