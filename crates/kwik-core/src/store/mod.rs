//! Storage abstraction for kwik.
//!
//! The [`Store`] trait covers every read and write the engine needs, so the
//! ranking and analysis code runs unchanged against SQLite or the in-memory
//! store used in tests.
//!
//! Implementations must be `Send + Sync` to work with async runtimes.

pub mod memory;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{CommandRecord, FailureStat, FlagEntry, PatternGroup, Stats, TrackedCommand};

/// Abstract storage backend for command history.
///
/// # Operations
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`track`](Store::track) | Upsert a record, attach keywords/flags, append a usage event |
/// | [`recent_commands`](Store::recent_commands) | Records by last use, newest first |
/// | [`top_commands`](Store::top_commands) | Records by frequency, highest first |
/// | [`search_by_keyword`](Store::search_by_keyword) | Records whose keywords contain a substring |
/// | [`flags_for`](Store::flags_for) | Flags attached to a record |
/// | [`stats`](Store::stats) | Unique records and total executions |
/// | [`pattern_groups`](Store::pattern_groups) | Bases with more than one distinct command |
/// | [`failure_stats`](Store::failure_stats) | Records with failed runs |
/// | [`long_commands`](Store::long_commands) | Long, repeated commands for alias synthesis |
/// | [`reset`](Store::reset) | Delete everything |
#[async_trait]
pub trait Store: Send + Sync {
    /// Record one invocation atomically.
    ///
    /// Looks up the record by `(base, full_command, directory)`; an existing
    /// record has its frequency incremented and `last_used` raised to
    /// `cmd.used_at` (never lowered), otherwise a record with frequency 1 is inserted.
    /// Keywords and flags are attached without duplicates and a usage event
    /// is appended. Returns the record ID.
    async fn track(&self, cmd: &TrackedCommand) -> Result<i64>;

    /// Records ordered by `last_used` descending (ties: newest ID first).
    async fn recent_commands(&self, limit: i64) -> Result<Vec<CommandRecord>>;

    /// Records ordered by frequency descending (ties: most recent first).
    async fn top_commands(&self, limit: i64) -> Result<Vec<CommandRecord>>;

    /// Distinct records with a keyword containing `needle`
    /// (case-insensitive), by frequency descending, at most 20.
    async fn search_by_keyword(&self, needle: &str) -> Result<Vec<CommandRecord>>;

    /// Flags attached to a record, in insertion order.
    async fn flags_for(&self, command_id: i64) -> Result<Vec<FlagEntry>>;

    async fn stats(&self) -> Result<Stats>;

    /// Bases with more than one distinct full command, by summed frequency
    /// descending, each with up to `max_examples` commands by frequency.
    async fn pattern_groups(&self, max_groups: i64, max_examples: i64)
        -> Result<Vec<PatternGroup>>;

    /// Records with at least one failed usage event, by failure count
    /// descending.
    async fn failure_stats(&self, limit: i64) -> Result<Vec<FailureStat>>;

    /// Records whose full command is longer than `min_len` characters and
    /// whose frequency exceeds `min_frequency`, by frequency descending.
    async fn long_commands(
        &self,
        min_len: usize,
        min_frequency: i64,
        limit: i64,
    ) -> Result<Vec<CommandRecord>>;

    /// Delete all usage events, keywords, flags, and records.
    async fn reset(&self) -> Result<()>;
}

/// Maximum results from [`Store::search_by_keyword`].
pub const KEYWORD_SEARCH_LIMIT: usize = 20;
