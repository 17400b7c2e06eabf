//! `kwik analyze`: command patterns, failure analysis, and alias suggestions.

use anyhow::Result;
use kwik_core::history;
use kwik_core::models::Analysis;

use crate::config::Config;
use crate::display;
use crate::sqlite_store::SqliteStore;

/// Examples printed per pattern group; the rest are summarized.
const PATTERN_EXAMPLES_SHOWN: usize = 5;

pub async fn run_analyze(config: &Config, json: bool) -> Result<()> {
    let store = SqliteStore::open(config).await?;
    let result = history::analyze(&store).await;
    store.close().await;
    let analysis = result?;

    if json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        print_analysis(&analysis, display::now());
    }
    Ok(())
}

fn print_analysis(analysis: &Analysis, now: i64) {
    println!("Command patterns");
    println!("----------------");
    if analysis.patterns.is_empty() {
        println!("  No repeated patterns yet.");
    }
    for group in &analysis.patterns {
        println!("  {} ({} runs)", group.base, group.run_count);
        for cmd in group.commands.iter().take(PATTERN_EXAMPLES_SHOWN) {
            println!("    {}", cmd);
        }
        if group.commands.len() > PATTERN_EXAMPLES_SHOWN {
            println!(
                "    ... and {} more",
                group.commands.len() - PATTERN_EXAMPLES_SHOWN
            );
        }
    }
    println!();

    println!("Failure analysis");
    println!("----------------");
    if analysis.failures.is_empty() {
        println!("  No failed commands recorded.");
    }
    for f in &analysis.failures {
        let last = f
            .last_failure
            .map(|ts| display::format_ts_relative(ts, now))
            .unwrap_or_else(|| "unknown".to_string());
        let code = f
            .last_exit_code
            .map(|c| format!(" (exit {})", c))
            .unwrap_or_default();
        println!(
            "  {}  {}/{} failed ({:.1}% success), last failure {}{}",
            f.full_command, f.failures, f.total_runs, f.success_rate, last, code
        );
    }
    println!();

    println!("Alias suggestions");
    println!("-----------------");
    if analysis.aliases.is_empty() {
        println!("  Nothing to suggest yet.");
    }
    for alias in &analysis.aliases {
        println!("  {}", alias);
    }
}
