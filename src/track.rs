//! `kwik track`: record one command execution.
//!
//! Meant to be called from a shell hook after every prompt, so it prints
//! nothing on success.

use anyhow::{Context, Result};
use kwik_core::history;
use kwik_core::models::Outcome;

use crate::config::Config;
use crate::display;
use crate::sqlite_store::SqliteStore;

/// Build the outcome for a tracked run: success means exit code 0 and no
/// explicit `--failed`.
pub fn outcome(exit_code: i32, failed: bool) -> Outcome {
    Outcome {
        success: exit_code == 0 && !failed,
        exit_code,
    }
}

/// The directory to attribute a command to: `--dir` if given, else the
/// process working directory, else empty.
pub fn resolve_directory(dir: Option<String>) -> String {
    dir.or_else(|| {
        std::env::current_dir()
            .ok()
            .map(|p| p.to_string_lossy().into_owned())
    })
    .unwrap_or_default()
}

pub async fn run_track(
    config: &Config,
    command: &str,
    exit_code: i32,
    failed: bool,
    dir: Option<String>,
) -> Result<()> {
    let directory = resolve_directory(dir);
    let store = SqliteStore::open(config).await?;
    let result = history::track(
        &store,
        command,
        &directory,
        outcome(exit_code, failed),
        display::now(),
    )
    .await
    .with_context(|| format!("Failed to track command: {}", command));
    store.close().await;
    result.map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome() {
        assert_eq!(outcome(0, false), Outcome::ok());
        assert!(!outcome(0, true).success);
        assert_eq!(outcome(2, false), Outcome::from_exit_code(2));
    }

    #[test]
    fn test_explicit_directory_wins() {
        assert_eq!(resolve_directory(Some("/srv/app".into())), "/srv/app");
        assert!(!resolve_directory(None).is_empty());
    }
}
