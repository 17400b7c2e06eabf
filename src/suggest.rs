//! `kwik suggest`: ranked completions for a partial command.
//!
//! Output modes:
//!
//! | Flag | Output |
//! |------|--------|
//! | (none) | numbered list with scores |
//! | `--plain` | one command per line, for shell widgets |
//! | `--split` | `---RECENT---` / `---FREQUENT---` sections |
//! | `--explain` | numbered list plus the per-signal breakdown |
//! | `--json` | ranked records as JSON |

use anyhow::Result;
use kwik_core::history::{self, SplitSuggestions};
use kwik_core::models::RankedCommand;
use kwik_core::rank::{self, RankQuery, RankWeights};

use crate::config::Config;
use crate::display;
use crate::sqlite_store::SqliteStore;

#[derive(Debug, Clone, Copy, Default)]
pub struct SuggestOptions {
    pub limit: Option<usize>,
    pub plain: bool,
    pub split: bool,
    pub explain: bool,
    pub json: bool,
}

pub async fn run_suggest(
    config: &Config,
    partial: &str,
    directory: &str,
    opts: SuggestOptions,
) -> Result<()> {
    let store = SqliteStore::open(config).await?;
    let result = suggest_with(&store, config, partial, directory, opts).await;
    store.close().await;
    result
}

async fn suggest_with(
    store: &SqliteStore,
    config: &Config,
    partial: &str,
    directory: &str,
    opts: SuggestOptions,
) -> Result<()> {
    let limit = opts.limit.unwrap_or(config.suggest.max_suggestions);

    if opts.split {
        let split = history::suggest_split(store, partial, limit).await?;
        return print_split(&split, opts.json);
    }

    let weights = config.ranking.weights();
    let now = display::now();
    let query = RankQuery {
        partial,
        directory,
        limit,
    };
    let ranked = history::suggest(store, &query, &weights, now).await?;
    print_ranked(&ranked, &query, &weights, now, opts)
}

fn print_split(split: &SplitSuggestions, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(split)?);
        return Ok(());
    }
    println!("---RECENT---");
    for cmd in &split.recent {
        println!("{}", cmd);
    }
    println!("---FREQUENT---");
    for cmd in &split.frequent {
        println!("{}", cmd);
    }
    Ok(())
}

fn print_ranked(
    ranked: &[RankedCommand],
    query: &RankQuery<'_>,
    weights: &RankWeights,
    now: i64,
    opts: SuggestOptions,
) -> Result<()> {
    if opts.json {
        println!("{}", serde_json::to_string_pretty(ranked)?);
        return Ok(());
    }

    if opts.plain {
        for r in ranked {
            println!("{}", r.command.full_command);
        }
        return Ok(());
    }

    if ranked.is_empty() {
        println!("No suggestions.");
        return Ok(());
    }

    let partial = query.partial.trim();
    for (i, r) in ranked.iter().enumerate() {
        println!("{}. [{:.2}] {}", i + 1, r.score, r.command.full_command);
        if opts.explain {
            let query = RankQuery { partial, ..*query };
            let b = rank::score_breakdown(&r.command, &query, now);
            println!(
                "    recency {:.2} x {:.2}  frequency {:.2} x {:.2}  directory {:.2} x {:.2}  prefix +{:.2}",
                b.recency,
                weights.recency,
                b.frequency,
                weights.frequency,
                b.directory,
                weights.directory,
                b.partial
            );
            println!(
                "    used {} times, last {}",
                r.command.frequency,
                display::format_ts_relative(r.command.last_used, now)
            );
        }
    }
    Ok(())
}
