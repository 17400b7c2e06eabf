//! `kwik recent` and `kwik rerun`.

use anyhow::{bail, Context, Result};
use kwik_core::history;
use kwik_core::store::Store;

use crate::config::Config;
use crate::sqlite_store::SqliteStore;

pub const DEFAULT_RECENT_LIMIT: i64 = 5;

/// Print a numbered quick-pick list of the most recent commands.
pub async fn run_recent(config: &Config, limit: i64) -> Result<()> {
    let store = SqliteStore::open(config).await?;
    let result = store.recent_commands(limit).await;
    store.close().await;
    let commands = result?;

    if commands.is_empty() {
        println!("No commands tracked yet.");
        return Ok(());
    }

    println!("Recent commands:");
    for (i, c) in commands.iter().enumerate() {
        println!("  {}. {}", i + 1, c.full_command);
    }
    Ok(())
}

/// Re-run the most recently used command through `sh -c`.
///
/// The child inherits stdio. A non-zero exit is reported as an error.
pub async fn run_rerun(config: &Config, dry_run: bool) -> Result<()> {
    let store = SqliteStore::open(config).await?;
    let result = history::last_command(&store).await;
    store.close().await;

    let Some(last) = result? else {
        println!("No commands to re-run.");
        return Ok(());
    };

    println!("Re-running: {}", last.full_command);
    if dry_run {
        println!("(dry-run, not executing)");
        return Ok(());
    }

    let status = tokio::process::Command::new("sh")
        .arg("-c")
        .arg(&last.full_command)
        .status()
        .await
        .with_context(|| format!("Failed to spawn: {}", last.full_command))?;

    if !status.success() {
        bail!(
            "command exited with {}",
            status
                .code()
                .map(|c| c.to_string())
                .unwrap_or_else(|| "a signal".to_string())
        );
    }
    Ok(())
}
