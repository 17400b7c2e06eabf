use anyhow::Result;
use kwik_core::models::RankedCommand;
use kwik_core::{history, Error};

use crate::config::Config;
use crate::sqlite_store::SqliteStore;

/// Default number of search results.
pub const DEFAULT_SEARCH_LIMIT: usize = 10;

pub async fn run_search(
    config: &Config,
    keywords: &str,
    limit: usize,
    plain: bool,
    json: bool,
) -> Result<()> {
    let store = SqliteStore::open(config).await?;
    let result = history::search(&store, keywords, limit).await;
    store.close().await;
    let results = match result {
        Err(e @ Error::Parse(_)) => {
            return Err(anyhow::Error::new(e).context("please provide search keywords"))
        }
        other => other?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else if plain {
        for r in &results {
            println!("{}", r.command.full_command);
        }
    } else {
        print_results(keywords, &results);
    }
    Ok(())
}

fn print_results(keywords: &str, results: &[RankedCommand]) {
    if results.is_empty() {
        println!("No results.");
        return;
    }

    println!("Results for \"{}\":", keywords.trim());
    for (i, r) in results.iter().enumerate() {
        let cmd = &r.command;
        println!("{}. [{:.2}] {}", i + 1, r.score, cmd.full_command);
        if !cmd.directory.is_empty() {
            println!("    dir: {}", cmd.directory);
        }
        println!("    runs: {}", cmd.frequency);
    }
}
