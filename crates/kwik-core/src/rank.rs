//! Ranking engine for command suggestions.
//!
//! # Scoring
//!
//! Every candidate in the recency pool gets four sub-scores:
//!
//! | Signal | Formula |
//! |--------|---------|
//! | recency | `max(0, 1 - days_since_last_use / 30)` |
//! | frequency | `min(1, frequency / 10)` |
//! | directory | `1.0` same dir, `0.5` parent/child, `0.0` otherwise |
//! | partial | `0.3` if the partial prefixes the base or the full command |
//!
//! `score = w_r·recency + w_f·frequency + w_d·directory + partial`.
//!
//! Results are sorted by score descending with a stable sort, so equal
//! scores keep the pool order (most recently used first).

use serde::{Deserialize, Serialize};

use crate::models::{CommandRecord, RankedCommand};

/// Number of most-recent records considered for ranking.
pub const RANK_POOL_SIZE: i64 = 100;
/// Age in days at which the recency score reaches zero.
pub const RECENCY_HORIZON_DAYS: f64 = 30.0;
/// Frequency at which the frequency score saturates.
pub const FREQUENCY_CEILING: f64 = 10.0;
/// Flat bonus for a prefix match on the partial query.
pub const PARTIAL_MATCH_BONUS: f64 = 0.3;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Weights for the three normalized signals. They must sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankWeights {
    pub recency: f64,
    pub frequency: f64,
    pub directory: f64,
}

impl Default for RankWeights {
    fn default() -> Self {
        Self {
            recency: 0.4,
            frequency: 0.4,
            directory: 0.2,
        }
    }
}

impl RankWeights {
    pub fn sum(&self) -> f64 {
        self.recency + self.frequency + self.directory
    }

    /// True when every weight is in `[0, 1]` and they sum to 1.0.
    pub fn is_valid(&self) -> bool {
        let in_unit = |w: f64| (0.0..=1.0).contains(&w);
        in_unit(self.recency)
            && in_unit(self.frequency)
            && in_unit(self.directory)
            && (self.sum() - 1.0).abs() < 1e-6
    }
}

/// Query context for one ranking call.
#[derive(Debug, Clone, Copy)]
pub struct RankQuery<'a> {
    /// Text typed so far; empty for no partial filter.
    pub partial: &'a str,
    /// Current working directory; empty when unknown.
    pub directory: &'a str,
    /// Maximum results; `0` means unlimited.
    pub limit: usize,
}

/// The individual signals behind a score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub recency: f64,
    pub frequency: f64,
    pub directory: f64,
    pub partial: f64,
}

impl ScoreBreakdown {
    pub fn total(&self, weights: &RankWeights) -> f64 {
        weights.recency * self.recency
            + weights.frequency * self.frequency
            + weights.directory * self.directory
            + self.partial
    }
}

pub fn recency_score(last_used: i64, now: i64) -> f64 {
    let days_since = (now - last_used) as f64 / SECONDS_PER_DAY;
    (1.0 - days_since / RECENCY_HORIZON_DAYS).max(0.0)
}

pub fn frequency_score(frequency: i64) -> f64 {
    (frequency as f64 / FREQUENCY_CEILING).min(1.0)
}

pub fn directory_score(record_dir: &str, current_dir: &str) -> f64 {
    if record_dir.is_empty() || current_dir.is_empty() {
        return 0.0;
    }
    if record_dir == current_dir {
        1.0
    } else if is_parent(record_dir, current_dir) || is_parent(current_dir, record_dir) {
        0.5
    } else {
        0.0
    }
}

/// True if `parent` + `/` is a prefix of `child`.
fn is_parent(parent: &str, child: &str) -> bool {
    child.len() > parent.len()
        && child.starts_with(parent)
        && child.as_bytes()[parent.len()] == b'/'
}

pub fn partial_bonus(partial: &str, record: &CommandRecord) -> f64 {
    if !partial.is_empty()
        && (record.base.starts_with(partial) || record.full_command.starts_with(partial))
    {
        PARTIAL_MATCH_BONUS
    } else {
        0.0
    }
}

/// Compute all sub-scores for one record.
pub fn score_breakdown(record: &CommandRecord, query: &RankQuery<'_>, now: i64) -> ScoreBreakdown {
    ScoreBreakdown {
        recency: recency_score(record.last_used, now),
        frequency: frequency_score(record.frequency),
        directory: directory_score(&record.directory, query.directory),
        partial: partial_bonus(query.partial, record),
    }
}

/// Score and order a candidate pool.
///
/// `pool` is expected in most-recently-used order; that order breaks ties.
pub fn rank(
    pool: Vec<CommandRecord>,
    query: &RankQuery<'_>,
    weights: &RankWeights,
    now: i64,
) -> Vec<RankedCommand> {
    let mut ranked: Vec<RankedCommand> = pool
        .into_iter()
        .map(|command| {
            let score = score_breakdown(&command, query, now).total(weights);
            RankedCommand { command, score }
        })
        .collect();

    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));

    if query.limit > 0 {
        ranked.truncate(query.limit);
    }
    tracing::debug!(
        partial = query.partial,
        results = ranked.len(),
        "ranked suggestions"
    );
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000;
    const DAY: i64 = 86_400;

    fn record(id: i64, full: &str, freq: i64, last_used: i64, dir: &str) -> CommandRecord {
        CommandRecord {
            id,
            base: full.split_whitespace().next().unwrap_or_default().to_string(),
            subcommand: None,
            full_command: full.to_string(),
            frequency: freq,
            last_used,
            created_at: last_used,
            directory: dir.to_string(),
        }
    }

    fn query<'a>(partial: &'a str, dir: &'a str) -> RankQuery<'a> {
        RankQuery {
            partial,
            directory: dir,
            limit: 0,
        }
    }

    #[test]
    fn test_recency_decay() {
        assert!((recency_score(NOW, NOW) - 1.0).abs() < 1e-9);
        assert_eq!(recency_score(NOW - 30 * DAY, NOW), 0.0);
        assert_eq!(recency_score(NOW - 400 * DAY, NOW), 0.0);
        assert!((recency_score(NOW - 15 * DAY, NOW) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_frequency_saturation() {
        assert!((frequency_score(1) - 0.1).abs() < 1e-9);
        assert!((frequency_score(5) - 0.5).abs() < 1e-9);
        assert_eq!(frequency_score(10), 1.0);
        assert_eq!(frequency_score(250), 1.0);
    }

    #[test]
    fn test_directory_levels() {
        assert_eq!(directory_score("/home/u/proj", "/home/u/proj"), 1.0);
        assert_eq!(directory_score("/home/u", "/home/u/proj"), 0.5);
        assert_eq!(directory_score("/home/u/proj/src", "/home/u/proj"), 0.5);
        assert_eq!(directory_score("/home/u/project", "/home/u/proj"), 0.0);
        assert_eq!(directory_score("/tmp", "/home/u"), 0.0);
        assert_eq!(directory_score("", "/home/u"), 0.0);
        assert_eq!(directory_score("/home/u", ""), 0.0);
    }

    #[test]
    fn test_directory_ordering_for_identical_records() {
        let q = query("", "/work/app");
        let exact = record(1, "make", 3, NOW, "/work/app");
        let parent = record(2, "make", 3, NOW, "/work");
        let other = record(3, "make", 3, NOW, "/srv");
        let w = RankWeights::default();
        let s_exact = score_breakdown(&exact, &q, NOW).total(&w);
        let s_parent = score_breakdown(&parent, &q, NOW).total(&w);
        let s_other = score_breakdown(&other, &q, NOW).total(&w);
        assert!(s_exact > s_parent);
        assert!(s_parent > s_other);
    }

    #[test]
    fn test_partial_bonus() {
        let git = record(1, "git status", 1, NOW, "");
        let vim = record(2, "vim file", 1, NOW, "");
        assert_eq!(partial_bonus("gi", &git), PARTIAL_MATCH_BONUS);
        assert_eq!(partial_bonus("gi", &vim), 0.0);
        assert_eq!(partial_bonus("git st", &git), PARTIAL_MATCH_BONUS);
        assert_eq!(partial_bonus("", &git), 0.0);
        // case-sensitive
        assert_eq!(partial_bonus("GI", &git), 0.0);
    }

    #[test]
    fn test_rank_reference_example() {
        let a = record(1, "cargo build", 10, NOW, "/x");
        let b = record(2, "cargo test", 1, NOW - 29 * DAY, "/x");
        let c = record(3, "cargo run", 5, NOW - 5 * DAY, "/y");
        let ranked = rank(
            vec![a, b, c],
            &query("", "/x"),
            &RankWeights::default(),
            NOW,
        );
        let ids: Vec<i64> = ranked.iter().map(|r| r.command.id).collect();
        assert_eq!(ids, vec![1, 3, 2]);

        assert!((ranked[0].score - 1.0).abs() < 1e-9);
        let expected_c = 0.4 * (1.0 - 5.0 / 30.0) + 0.4 * 0.5;
        assert!((ranked[1].score - expected_c).abs() < 1e-9);
        let expected_b = 0.4 * (1.0 - 29.0 / 30.0) + 0.4 * 0.1 + 0.2;
        assert!((ranked[2].score - expected_b).abs() < 1e-9);
    }

    #[test]
    fn test_rank_ties_keep_pool_order() {
        let pool = vec![
            record(7, "ls", 2, NOW - DAY, ""),
            record(3, "pwd", 2, NOW - DAY, ""),
            record(5, "id", 2, NOW - DAY, ""),
        ];
        let ranked = rank(pool, &query("", ""), &RankWeights::default(), NOW);
        let ids: Vec<i64> = ranked.iter().map(|r| r.command.id).collect();
        assert_eq!(ids, vec![7, 3, 5]);
    }

    #[test]
    fn test_rank_limit() {
        let pool: Vec<CommandRecord> = (0..5)
            .map(|i| record(i, "echo hi", i + 1, NOW, ""))
            .collect();
        let mut q = query("", "");
        q.limit = 2;
        let ranked = rank(pool.clone(), &q, &RankWeights::default(), NOW);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].command.id, 4);

        q.limit = 0;
        assert_eq!(rank(pool, &q, &RankWeights::default(), NOW).len(), 5);
    }

    #[test]
    fn test_partial_bonus_lifts_match_above_frequent() {
        let frequent = record(1, "ls -la", 10, NOW, "");
        let rare = record(2, "git push", 1, NOW, "");
        let ranked = rank(
            vec![frequent, rare],
            &query("git", ""),
            &RankWeights::default(),
            NOW,
        );
        // ls: 0.4 + 0.4 = 0.8; git: 0.4 + 0.04 + 0.3 = 0.74
        assert_eq!(ranked[0].command.id, 1);
        assert!((ranked[1].score - 0.74).abs() < 1e-9);
    }

    #[test]
    fn test_weights_validation() {
        assert!(RankWeights::default().is_valid());
        let skewed = RankWeights {
            recency: 0.7,
            frequency: 0.2,
            directory: 0.1,
        };
        assert!(skewed.is_valid());
        let bad_sum = RankWeights {
            recency: 0.5,
            frequency: 0.5,
            directory: 0.5,
        };
        assert!(!bad_sum.is_valid());
        let negative = RankWeights {
            recency: 1.2,
            frequency: -0.2,
            directory: 0.0,
        };
        assert!(!negative.is_valid());
    }
}
