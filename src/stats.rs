//! Usage statistics.
//!
//! `kwik stats` prints the store totals followed by the five most recent and
//! the five most frequently used commands.

use anyhow::Result;
use kwik_core::history;
use kwik_core::models::{CommandRecord, Stats};
use kwik_core::store::Store;
use serde::Serialize;

use crate::config::Config;
use crate::display;
use crate::sqlite_store::SqliteStore;

const STATS_LIST_LEN: i64 = 5;

#[derive(Debug, Serialize)]
struct StatsReport {
    #[serde(flatten)]
    totals: Stats,
    recent: Vec<CommandRecord>,
    top: Vec<CommandRecord>,
}

async fn collect(store: &SqliteStore) -> Result<StatsReport> {
    Ok(StatsReport {
        totals: history::stats(store).await?,
        recent: store.recent_commands(STATS_LIST_LEN).await?,
        top: store.top_commands(STATS_LIST_LEN).await?,
    })
}

/// Run the stats command: query the store and print a summary.
pub async fn run_stats(config: &Config, json: bool) -> Result<()> {
    let store = SqliteStore::open(config).await?;
    let result = collect(&store).await;
    store.close().await;
    let report = result?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let now = display::now();

    println!("kwik command stats");
    println!("==================");
    println!();
    println!("  Database:          {}", config.db.path.display());
    println!("  Unique commands:   {}", report.totals.unique_commands);
    println!("  Total executions:  {}", report.totals.total_executions);

    if report.recent.is_empty() {
        println!();
        println!("  No commands tracked yet.");
        println!();
        return Ok(());
    }

    println!();
    println!("  Recent:");
    for c in &report.recent {
        println!(
            "    {:<48} {}",
            c.full_command,
            display::format_ts_relative(c.last_used, now)
        );
    }

    println!();
    println!("  Most used:");
    for c in &report.top {
        println!("    {:<48} {:>5} runs", c.full_command, c.frequency);
    }
    println!();

    Ok(())
}
