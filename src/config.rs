//! TOML configuration parsing and validation.
//!
//! Every section is optional. Without a config file kwik stores its database
//! at `~/.kwik/commands.sqlite` and ranks with the default weights
//! (0.4 recency, 0.4 frequency, 0.2 directory).
//!
//! ```toml
//! [db]
//! path = "~/.kwik/commands.sqlite"
//!
//! [ranking]
//! recency_weight = 0.4
//! frequency_weight = 0.4
//! directory_weight = 0.2
//!
//! [suggest]
//! max_suggestions = 10
//! ```

use anyhow::{Context, Result};
use kwik_core::rank::RankWeights;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Directory under `$HOME` holding the database and default config.
pub const DATA_DIR_NAME: &str = ".kwik";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub db: DbConfig,
    #[serde(default)]
    pub ranking: RankingConfig,
    #[serde(default)]
    pub suggest: SuggestConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DATA_DIR_NAME)
}

fn default_db_path() -> PathBuf {
    data_dir().join("commands.sqlite")
}

/// Default location of the config file: `~/.kwik/config.toml`.
pub fn default_config_path() -> PathBuf {
    data_dir().join("config.toml")
}

#[derive(Debug, Deserialize, Clone)]
pub struct RankingConfig {
    #[serde(default = "default_recency_weight")]
    pub recency_weight: f64,
    #[serde(default = "default_frequency_weight")]
    pub frequency_weight: f64,
    #[serde(default = "default_directory_weight")]
    pub directory_weight: f64,
}

fn default_recency_weight() -> f64 {
    RankWeights::default().recency
}
fn default_frequency_weight() -> f64 {
    RankWeights::default().frequency
}
fn default_directory_weight() -> f64 {
    RankWeights::default().directory
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            recency_weight: default_recency_weight(),
            frequency_weight: default_frequency_weight(),
            directory_weight: default_directory_weight(),
        }
    }
}

impl RankingConfig {
    pub fn weights(&self) -> RankWeights {
        RankWeights {
            recency: self.recency_weight,
            frequency: self.frequency_weight,
            directory: self.directory_weight,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SuggestConfig {
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,
}

fn default_max_suggestions() -> usize {
    10
}

impl Default for SuggestConfig {
    fn default() -> Self {
        Self {
            max_suggestions: default_max_suggestions(),
        }
    }
}

/// Expand a leading `~/` to the home directory.
fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

/// Load and validate the configuration.
///
/// A missing file at the default location yields [`Config::default`]; a
/// missing file anywhere else is an error.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() && path == default_config_path() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_config(&content)
}

/// Parse and validate configuration text.
pub fn parse_config(content: &str) -> Result<Config> {
    let mut config: Config =
        toml::from_str(content).with_context(|| "Failed to parse config file")?;

    config.db.path = expand_home(&config.db.path);

    let weights = config.ranking.weights();
    for (name, w) in [
        ("recency_weight", weights.recency),
        ("frequency_weight", weights.frequency),
        ("directory_weight", weights.directory),
    ] {
        if !(0.0..=1.0).contains(&w) {
            anyhow::bail!("ranking.{} must be in [0.0, 1.0]", name);
        }
    }
    if !weights.is_valid() {
        anyhow::bail!(
            "ranking weights must sum to 1.0 (got {:.3})",
            weights.sum()
        );
    }

    if config.suggest.max_suggestions < 1 {
        anyhow::bail!("suggest.max_suggestions must be >= 1");
    }

    Ok(config)
}
