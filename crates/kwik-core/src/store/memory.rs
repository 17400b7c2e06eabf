//! In-memory [`Store`] implementation for tests and embedding.
//!
//! All tables live behind a single `std::sync::RwLock`, so `track` is atomic
//! the same way a SQLite transaction is. Orderings and tie-breaks mirror the
//! SQL queries of the SQLite store.

use std::collections::{BTreeMap, HashSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::models::{CommandRecord, FailureStat, FlagEntry, PatternGroup, Stats, TrackedCommand};

use super::{Store, KEYWORD_SEARCH_LIMIT};

struct UsageEvent {
    command_id: i64,
    success: bool,
    exit_code: i32,
    used_at: i64,
}

#[derive(Default)]
struct Tables {
    next_id: i64,
    commands: Vec<CommandRecord>,
    keywords: Vec<(i64, String)>,
    flags: Vec<(i64, FlagEntry)>,
    usage: Vec<UsageEvent>,
}

/// In-memory store.
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| Error::storage("in-memory store lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| Error::storage("in-memory store lock poisoned"))
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn limit_to_usize(limit: i64) -> usize {
    usize::try_from(limit).unwrap_or(0)
}

fn by_frequency(a: &CommandRecord, b: &CommandRecord) -> std::cmp::Ordering {
    b.frequency
        .cmp(&a.frequency)
        .then(b.last_used.cmp(&a.last_used))
        .then(a.id.cmp(&b.id))
}

#[async_trait]
impl Store for InMemoryStore {
    async fn track(&self, cmd: &TrackedCommand) -> Result<i64> {
        let mut guard = self.write()?;
        let t = &mut *guard;

        let existing = t.commands.iter().position(|c| {
            c.base == cmd.base && c.full_command == cmd.full_command && c.directory == cmd.directory
        });
        let id = match existing {
            Some(idx) => {
                let record = &mut t.commands[idx];
                record.frequency += 1;
                record.last_used = record.last_used.max(cmd.used_at);
                record.id
            }
            None => {
                t.next_id += 1;
                let id = t.next_id;
                t.commands.push(CommandRecord {
                    id,
                    base: cmd.base.clone(),
                    subcommand: cmd.subcommand.clone(),
                    full_command: cmd.full_command.clone(),
                    frequency: 1,
                    last_used: cmd.used_at,
                    created_at: cmd.used_at,
                    directory: cmd.directory.clone(),
                });
                id
            }
        };

        for keyword in &cmd.keywords {
            if !t.keywords.iter().any(|(cid, k)| *cid == id && k == keyword) {
                t.keywords.push((id, keyword.clone()));
            }
        }
        for flag in &cmd.flags {
            if !t.flags.iter().any(|(cid, f)| *cid == id && f.flag == flag.flag) {
                t.flags.push((id, flag.clone()));
            }
        }
        t.usage.push(UsageEvent {
            command_id: id,
            success: cmd.outcome.success,
            exit_code: cmd.outcome.exit_code,
            used_at: cmd.used_at,
        });

        Ok(id)
    }

    async fn recent_commands(&self, limit: i64) -> Result<Vec<CommandRecord>> {
        let t = self.read()?;
        let mut out = t.commands.clone();
        out.sort_by(|a, b| b.last_used.cmp(&a.last_used).then(b.id.cmp(&a.id)));
        out.truncate(limit_to_usize(limit));
        Ok(out)
    }

    async fn top_commands(&self, limit: i64) -> Result<Vec<CommandRecord>> {
        let t = self.read()?;
        let mut out = t.commands.clone();
        out.sort_by(by_frequency);
        out.truncate(limit_to_usize(limit));
        Ok(out)
    }

    async fn search_by_keyword(&self, needle: &str) -> Result<Vec<CommandRecord>> {
        let t = self.read()?;
        let needle = needle.to_lowercase();
        let ids: HashSet<i64> = t
            .keywords
            .iter()
            .filter(|(_, k)| k.to_lowercase().contains(&needle))
            .map(|(id, _)| *id)
            .collect();
        let mut out: Vec<CommandRecord> = t
            .commands
            .iter()
            .filter(|c| ids.contains(&c.id))
            .cloned()
            .collect();
        out.sort_by(by_frequency);
        out.truncate(KEYWORD_SEARCH_LIMIT);
        Ok(out)
    }

    async fn flags_for(&self, command_id: i64) -> Result<Vec<FlagEntry>> {
        let t = self.read()?;
        Ok(t.flags
            .iter()
            .filter(|(id, _)| *id == command_id)
            .map(|(_, f)| f.clone())
            .collect())
    }

    async fn stats(&self) -> Result<Stats> {
        let t = self.read()?;
        Ok(Stats {
            unique_commands: t.commands.len() as i64,
            total_executions: t.commands.iter().map(|c| c.frequency).sum(),
        })
    }

    async fn pattern_groups(
        &self,
        max_groups: i64,
        max_examples: i64,
    ) -> Result<Vec<PatternGroup>> {
        let t = self.read()?;

        // base -> (full_command -> summed frequency)
        let mut by_base: BTreeMap<&str, BTreeMap<&str, i64>> = BTreeMap::new();
        for c in &t.commands {
            *by_base
                .entry(c.base.as_str())
                .or_default()
                .entry(c.full_command.as_str())
                .or_default() += c.frequency;
        }

        let mut groups: Vec<PatternGroup> = by_base
            .into_iter()
            .filter(|(_, variants)| variants.len() > 1)
            .map(|(base, variants)| {
                let run_count = variants.values().sum();
                let mut examples: Vec<(&str, i64)> = variants.into_iter().collect();
                examples.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
                examples.truncate(limit_to_usize(max_examples));
                PatternGroup {
                    base: base.to_string(),
                    commands: examples.into_iter().map(|(c, _)| c.to_string()).collect(),
                    run_count,
                }
            })
            .collect();

        groups.sort_by(|a, b| b.run_count.cmp(&a.run_count).then(a.base.cmp(&b.base)));
        groups.truncate(limit_to_usize(max_groups));
        Ok(groups)
    }

    async fn failure_stats(&self, limit: i64) -> Result<Vec<FailureStat>> {
        let t = self.read()?;
        let mut stats: Vec<FailureStat> = t
            .commands
            .iter()
            .filter_map(|c| {
                let events: Vec<&UsageEvent> =
                    t.usage.iter().filter(|u| u.command_id == c.id).collect();
                let failures: Vec<&&UsageEvent> = events.iter().filter(|u| !u.success).collect();
                if failures.is_empty() {
                    return None;
                }
                // max_by_key keeps the later event on equal timestamps
                let last = failures.iter().max_by_key(|u| u.used_at);
                Some(FailureStat::new(
                    c.id,
                    c.full_command.clone(),
                    events.len() as i64,
                    failures.len() as i64,
                    last.map(|u| u.used_at),
                    last.map(|u| u.exit_code),
                ))
            })
            .collect();
        stats.sort_by(|a, b| b.failures.cmp(&a.failures).then(a.command_id.cmp(&b.command_id)));
        stats.truncate(limit_to_usize(limit));
        Ok(stats)
    }

    async fn long_commands(
        &self,
        min_len: usize,
        min_frequency: i64,
        limit: i64,
    ) -> Result<Vec<CommandRecord>> {
        let t = self.read()?;
        let mut out: Vec<CommandRecord> = t
            .commands
            .iter()
            .filter(|c| c.full_command.chars().count() > min_len && c.frequency > min_frequency)
            .cloned()
            .collect();
        out.sort_by(by_frequency);
        out.truncate(limit_to_usize(limit));
        Ok(out)
    }

    async fn reset(&self) -> Result<()> {
        let mut t = self.write()?;
        t.usage.clear();
        t.keywords.clear();
        t.flags.clear();
        t.commands.clear();
        Ok(())
    }
}
