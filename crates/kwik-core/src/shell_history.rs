//! Importing existing shell history files and kwik exports.
//!
//! Understands plain bash history (one command per line) and zsh extended
//! history (`: <epoch>:<duration>;<command>`). Comments, history expansions
//! (`!…`) and the builtins in [`lexicon::HISTORY_IGNORED_BASES`] are skipped.
//!
//! [`import_records`] replays records written by `kwik export`.

use serde::Serialize;

use crate::models::{CommandRecord, Outcome};
use crate::store::Store;
use crate::{history, lexicon, parser, Result};

/// One classified line of a history file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryLine<'a> {
    Blank,
    Skipped,
    Command {
        text: &'a str,
        /// Epoch seconds from a zsh extended-history prefix.
        timestamp: Option<i64>,
    },
}

pub fn classify_line(line: &str) -> HistoryLine<'_> {
    let mut line = line.trim();
    let mut timestamp = None;

    if let Some(rest) = line.strip_prefix(": ") {
        if let Some((meta, command)) = rest.split_once(';') {
            timestamp = meta
                .split(':')
                .next()
                .and_then(|ts| ts.trim().parse::<i64>().ok());
            line = command.trim();
        }
    }

    let Some(base) = line.split_whitespace().next() else {
        return HistoryLine::Blank;
    };
    if line.starts_with('#') || line.starts_with('!') || lexicon::is_history_ignored(base) {
        return HistoryLine::Skipped;
    }

    HistoryLine::Command {
        text: line,
        timestamp,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
}

/// Track every command line in `lines` as a successful run with no directory.
///
/// Lines without a timestamp are recorded at `now`.
pub async fn import_lines<'a, S, I>(store: &S, lines: I, now: i64) -> Result<ImportSummary>
where
    S: Store,
    I: IntoIterator<Item = &'a str>,
{
    let mut summary = ImportSummary::default();
    for line in lines {
        match classify_line(line) {
            HistoryLine::Blank => {}
            HistoryLine::Skipped => summary.skipped += 1,
            HistoryLine::Command { text, timestamp } => {
                history::track(store, text, "", Outcome::ok(), timestamp.unwrap_or(now)).await?;
                summary.imported += 1;
            }
        }
    }
    tracing::debug!(
        imported = summary.imported,
        skipped = summary.skipped,
        "history import finished"
    );
    Ok(summary)
}

/// Re-track exported records through [`Store::track`].
///
/// A record with frequency `n` becomes `n` successful runs in its directory:
/// the last at `last_used`, the earlier ones at `created_at`. Exit codes are
/// not part of an export, so failure history does not carry over. Records
/// with no runs or no command text are counted as skipped.
pub async fn import_records<S: Store>(
    store: &S,
    records: &[CommandRecord],
) -> Result<ImportSummary> {
    let mut summary = ImportSummary::default();
    for record in records {
        let parsed = match parser::parse_command(&record.full_command) {
            Some(p) if record.frequency > 0 => p,
            _ => {
                summary.skipped += 1;
                continue;
            }
        };
        for run in 1..=record.frequency {
            let at = if run == record.frequency {
                record.last_used
            } else {
                record.created_at
            };
            let cmd = history::tracked_command(&parsed, &record.directory, Outcome::ok(), at);
            store.track(&cmd).await?;
        }
        summary.imported += 1;
    }
    tracing::debug!(
        imported = summary.imported,
        skipped = summary.skipped,
        "record import finished"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryStore;

    #[test]
    fn test_plain_line() {
        assert_eq!(
            classify_line("  git status  "),
            HistoryLine::Command {
                text: "git status",
                timestamp: None
            }
        );
    }

    #[test]
    fn test_zsh_extended_line() {
        assert_eq!(
            classify_line(": 1700000000:0;cargo build --release"),
            HistoryLine::Command {
                text: "cargo build --release",
                timestamp: Some(1_700_000_000)
            }
        );
        assert_eq!(classify_line(": 1700000000:0;"), HistoryLine::Blank);
    }

    #[test]
    fn test_skipped_lines() {
        assert_eq!(classify_line(""), HistoryLine::Blank);
        assert_eq!(classify_line("# comment"), HistoryLine::Skipped);
        assert_eq!(classify_line("!!"), HistoryLine::Skipped);
        assert_eq!(classify_line("cd /tmp"), HistoryLine::Skipped);
        assert_eq!(classify_line(": 1:0;ls -la"), HistoryLine::Skipped);
    }

    #[tokio::test]
    async fn test_import_lines() {
        let store = InMemoryStore::new();
        let text = "git status\n\ncd ..\n: 1600000000:0;git status\nmake test\n";
        let summary = import_lines(&store, text.lines(), 1_700_000_000)
            .await
            .unwrap();
        assert_eq!(
            summary,
            ImportSummary {
                imported: 3,
                skipped: 1
            }
        );
        let stats = store.stats().await.unwrap();
        assert_eq!(stats.unique_commands, 2);
        assert_eq!(stats.total_executions, 3);
    }

    #[tokio::test]
    async fn test_old_history_does_not_rewind_last_used() {
        let store = InMemoryStore::new();
        history::track(&store, "git status", "", Outcome::ok(), 1_700_000_000)
            .await
            .unwrap();
        import_lines(&store, [": 1600000000:0;git status"], 1_700_000_500)
            .await
            .unwrap();

        let rec = &store.recent_commands(1).await.unwrap()[0];
        assert_eq!(rec.frequency, 2);
        assert_eq!(rec.last_used, 1_700_000_000);
        assert_eq!(rec.created_at, 1_700_000_000);
    }

    fn exported(full_command: &str, directory: &str, frequency: i64) -> CommandRecord {
        CommandRecord {
            id: 99,
            base: String::new(),
            subcommand: None,
            full_command: full_command.to_string(),
            frequency,
            last_used: 1_700_000_900,
            created_at: 1_700_000_000,
            directory: directory.to_string(),
        }
    }

    #[tokio::test]
    async fn test_import_records_restores_counts_and_times() {
        let store = InMemoryStore::new();
        let records = vec![
            exported("git commit -m wip", "/repo", 3),
            exported("make", "", 1),
            exported("   ", "/repo", 2),
            exported("git push", "/repo", 0),
        ];

        let summary = import_records(&store, &records).await.unwrap();
        assert_eq!(summary, ImportSummary { imported: 2, skipped: 2 });

        let stats = store.stats().await.unwrap();
        assert_eq!(stats.unique_commands, 2);
        assert_eq!(stats.total_executions, 4);

        let top = &store.top_commands(1).await.unwrap()[0];
        assert_eq!(top.full_command, "git commit -m wip");
        assert_eq!(top.base, "git");
        assert_eq!(top.subcommand.as_deref(), Some("commit"));
        assert_eq!(top.directory, "/repo");
        assert_eq!(top.frequency, 3);
        assert_eq!(top.created_at, 1_700_000_000);
        assert_eq!(top.last_used, 1_700_000_900);
        assert_eq!(store.flags_for(top.id).await.unwrap()[0].flag, "-m");

        let recent = store.recent_commands(10).await.unwrap();
        let single = recent.iter().find(|c| c.full_command == "make").unwrap();
        assert_eq!(single.frequency, 1);
        assert_eq!(single.created_at, 1_700_000_900);
    }
}
