use anyhow::{bail, Result};
use kwik_core::history;

use crate::config::Config;
use crate::sqlite_store::SqliteStore;

/// Delete every tracked command. Refuses unless `confirmed`.
pub async fn run_reset(config: &Config, confirmed: bool) -> Result<()> {
    if !confirmed {
        tracing::warn!("reset refused without --yes");
        bail!("Refusing to delete history without --yes");
    }

    let store = SqliteStore::open(config).await?;
    let result = history::reset(&store).await;
    store.close().await;
    result?;

    println!("Command history cleared.");
    Ok(())
}
