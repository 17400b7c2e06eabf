//! The history engine: every caller-facing operation, generic over [`Store`].
//!
//! The store handle is always passed in explicitly; nothing here keeps state
//! between calls. Clock values (`now`) are Unix seconds supplied by the
//! caller so ranking is reproducible in tests.

use serde::Serialize;

use crate::analyze::{
    self, LONG_COMMAND_LIMIT, LONG_COMMAND_MIN_FREQUENCY, LONG_COMMAND_MIN_LEN,
    MAX_FAILURE_STATS, MAX_PATTERN_EXAMPLES, MAX_PATTERN_GROUPS,
};
use crate::error::{Error, Result};
use crate::lexicon;
use crate::models::{
    Analysis, CommandRecord, FlagEntry, Outcome, RankedCommand, Stats, TrackedCommand,
};
use crate::parser::{self, ParsedCommand};
use crate::rank::{self, RankQuery, RankWeights, RANK_POOL_SIZE};
use crate::store::Store;

/// Score multiplier for substring search hits.
const SEARCH_SUBSTRING_WEIGHT: f64 = 0.5;

/// Build the store payload for one invocation of a parsed command.
pub fn tracked_command(
    parsed: &ParsedCommand,
    directory: &str,
    outcome: Outcome,
    used_at: i64,
) -> TrackedCommand {
    let flags = parsed
        .flags
        .iter()
        .map(|flag| FlagEntry {
            flag: flag.clone(),
            meaning: lexicon::flag_meaning(flag).map(str::to_string),
        })
        .collect();

    TrackedCommand {
        base: parsed.base.clone(),
        subcommand: parsed.subcommand.clone(),
        full_command: parsed.full_command.clone(),
        directory: directory.to_string(),
        keywords: parser::extract_keywords(parsed),
        flags,
        outcome,
        used_at,
    }
}

/// Record one execution of `raw` run from `directory`.
///
/// Returns the ID of the command record. Empty input is rejected with
/// [`Error::Parse`] and nothing is written.
pub async fn track<S: Store>(
    store: &S,
    raw: &str,
    directory: &str,
    outcome: Outcome,
    now: i64,
) -> Result<i64> {
    let parsed = parser::parse_command(raw)
        .ok_or_else(|| Error::Parse("empty command".to_string()))?;
    let cmd = tracked_command(&parsed, directory, outcome, now);
    let id = store.track(&cmd).await?;
    tracing::debug!(
        id,
        base = %cmd.base,
        success = outcome.success,
        "tracked command"
    );
    Ok(id)
}

/// Ranked suggestions for a partial command typed in `query.directory`.
pub async fn suggest<S: Store>(
    store: &S,
    query: &RankQuery<'_>,
    weights: &RankWeights,
    now: i64,
) -> Result<Vec<RankedCommand>> {
    let pool = store.recent_commands(RANK_POOL_SIZE).await?;
    let query = RankQuery {
        partial: query.partial.trim(),
        ..*query
    };
    Ok(rank::rank(pool, &query, weights, now))
}

/// Suggestions split into a recent list and a frequent list.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SplitSuggestions {
    pub recent: Vec<String>,
    pub frequent: Vec<String>,
}

/// Recent and frequent commands whose base or full text starts with
/// `partial` (case-insensitive), up to `limit` each (`0` = unlimited).
pub async fn suggest_split<S: Store>(
    store: &S,
    partial: &str,
    limit: usize,
) -> Result<SplitSuggestions> {
    let (fetch, limit) = match limit {
        0 => (i64::MAX, usize::MAX),
        n => (i64::try_from(n).unwrap_or(i64::MAX).saturating_mul(2), n),
    };
    let recent = store.recent_commands(fetch).await?;
    let frequent = store.top_commands(fetch).await?;
    let partial = partial.trim().to_lowercase();

    let pick = |records: Vec<CommandRecord>| -> Vec<String> {
        records
            .into_iter()
            .filter(|c| {
                partial.is_empty()
                    || c.base.to_lowercase().starts_with(&partial)
                    || c.full_command.to_lowercase().starts_with(&partial)
            })
            .map(|c| c.full_command)
            .take(limit)
            .collect()
    };

    Ok(SplitSuggestions {
        recent: pick(recent),
        frequent: pick(frequent),
    })
}

/// Keyword search.
///
/// Every whitespace-separated word must occur (case-insensitive) in the full
/// command of one of the [`RANK_POOL_SIZE`] most recent records; those hits
/// score `frequency × 0.5`. With no hits, falls back to the keyword index
/// (score = frequency). Results are sorted by score descending and truncated
/// to `limit` (`0` = unlimited).
pub async fn search<S: Store>(store: &S, keywords: &str, limit: usize) -> Result<Vec<RankedCommand>> {
    let keywords = keywords.trim();
    if keywords.is_empty() {
        return Err(Error::Parse("no search keywords".to_string()));
    }

    let lowered = keywords.to_lowercase();
    let words: Vec<&str> = lowered.split_whitespace().collect();

    let mut matches: Vec<RankedCommand> = store
        .recent_commands(RANK_POOL_SIZE)
        .await?
        .into_iter()
        .filter(|c| {
            let text = c.full_command.to_lowercase();
            words.iter().all(|w| text.contains(w))
        })
        .map(|command| RankedCommand {
            score: command.frequency as f64 * SEARCH_SUBSTRING_WEIGHT,
            command,
        })
        .collect();

    if matches.is_empty() {
        matches = store
            .search_by_keyword(keywords)
            .await?
            .into_iter()
            .map(|command| RankedCommand {
                score: command.frequency as f64,
                command,
            })
            .collect();
    }

    matches.sort_by(|a, b| b.score.total_cmp(&a.score));
    if limit > 0 {
        matches.truncate(limit);
    }
    Ok(matches)
}

pub async fn stats<S: Store>(store: &S) -> Result<Stats> {
    store.stats().await
}

/// Pattern groups, failure-prone commands, and alias suggestions.
pub async fn analyze<S: Store>(store: &S) -> Result<Analysis> {
    let patterns = store
        .pattern_groups(MAX_PATTERN_GROUPS, MAX_PATTERN_EXAMPLES)
        .await?;
    let failures = store.failure_stats(MAX_FAILURE_STATS).await?;
    let long_commands = store
        .long_commands(
            LONG_COMMAND_MIN_LEN,
            LONG_COMMAND_MIN_FREQUENCY,
            LONG_COMMAND_LIMIT,
        )
        .await?;
    let aliases = analyze::suggest_aliases(&patterns, &long_commands);

    Ok(Analysis {
        patterns,
        failures,
        aliases,
    })
}

/// The most recently used command, if any.
pub async fn last_command<S: Store>(store: &S) -> Result<Option<CommandRecord>> {
    Ok(store.recent_commands(1).await?.into_iter().next())
}

pub async fn reset<S: Store>(store: &S) -> Result<()> {
    store.reset().await?;
    tracing::info!("command history cleared");
    Ok(())
}
