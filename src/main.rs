//! # kwik CLI
//!
//! ## Usage
//!
//! ```bash
//! kwik [--config ~/.kwik/config.toml] <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `kwik init` | Create the SQLite database and schema |
//! | `kwik track "<cmd>"` | Record one execution of a command |
//! | `kwik suggest "<partial>"` | Ranked suggestions for a partial command |
//! | `kwik search "<keywords>"` | Keyword search over the history |
//! | `kwik stats` | Totals, recent and most used commands |
//! | `kwik analyze` | Patterns, failures and alias suggestions |
//! | `kwik recent` | Quick-pick list of recent commands |
//! | `kwik rerun` | Re-run the last command |
//! | `kwik import-history` | Seed the store from a shell history file |
//! | `kwik export [FILE] [--format csv]` | Dump all records as JSON or CSV |
//! | `kwik import FILE` | Re-track the records of a JSON export |
//! | `kwik reset --yes` | Delete all history |
//! | `kwik completions <shell>` | Print a shell completion script |
//!
//! ## Shell hook
//!
//! ```bash
//! # zsh
//! precmd() { kwik track "$(fc -ln -1)" --exit-code $? >/dev/null 2>&1 & }
//! ```

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::path::PathBuf;

use kwik::suggest::SuggestOptions;
use kwik::transfer::ExportFormat;
use kwik::{
    analyze, config, logging, migrate, recent, reset, search, stats, suggest, track, transfer,
};

/// kwik: a shell-command history tracker with ranked suggestions.
#[derive(Parser)]
#[command(
    name = "kwik",
    about = "Track shell commands and get ranked suggestions back",
    version
)]
struct Cli {
    /// Path to the configuration file (TOML).
    ///
    /// Defaults to `~/.kwik/config.toml`. A missing default file means
    /// built-in defaults.
    #[arg(long, global = true, default_value_os_t = config::default_config_path())]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema. Idempotent.
    Init,

    /// Record one execution of a command.
    ///
    /// Examples:
    ///   kwik track "git commit -m 'fix bug'"
    ///   kwik track "npm test" --exit-code 1
    Track {
        /// The full command line as typed.
        command: String,

        /// Exit code of the run; non-zero marks a failure.
        #[arg(short = 'e', long, default_value_t = 0, allow_negative_numbers = true)]
        exit_code: i32,

        /// Mark the run as failed regardless of exit code.
        #[arg(long)]
        failed: bool,

        /// Directory the command ran in. Defaults to the current directory.
        #[arg(long)]
        dir: Option<String>,
    },

    /// Suggest commands for a partial input.
    Suggest {
        /// What has been typed so far. May be empty.
        #[arg(default_value = "")]
        partial: String,

        /// Maximum suggestions, 0 for no limit (default from
        /// `[suggest].max_suggestions`).
        #[arg(short, long)]
        limit: Option<usize>,

        /// One command per line, no headers.
        #[arg(short, long)]
        plain: bool,

        /// Separate recent and frequent lists, for shell integration.
        #[arg(short, long)]
        split: bool,

        /// Show the signals behind each score.
        #[arg(long, conflicts_with_all = ["plain", "split"])]
        explain: bool,

        /// JSON output.
        #[arg(long)]
        json: bool,

        /// Directory to rank against. Defaults to the current directory.
        #[arg(long)]
        dir: Option<String>,
    },

    /// Search commands by keywords.
    Search {
        keywords: String,

        /// Maximum results; 0 for no limit.
        #[arg(short, long, default_value_t = search::DEFAULT_SEARCH_LIMIT)]
        limit: usize,

        /// One command per line, no headers.
        #[arg(short, long)]
        plain: bool,

        /// JSON output.
        #[arg(long)]
        json: bool,
    },

    /// Show usage statistics.
    Stats {
        #[arg(long)]
        json: bool,
    },

    /// Find repeated patterns, failing commands and alias candidates.
    Analyze {
        #[arg(long)]
        json: bool,
    },

    /// List the most recent commands.
    Recent {
        #[arg(short, long, default_value_t = recent::DEFAULT_RECENT_LIMIT)]
        limit: i64,
    },

    /// Re-run the most recently used command.
    Rerun {
        /// Print the command without running it.
        #[arg(short = 'n', long)]
        dry_run: bool,
    },

    /// Import commands from a bash or zsh history file.
    ImportHistory {
        /// History file. Defaults to $HISTFILE, ~/.zsh_history, ~/.bash_history.
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Export all stored commands as JSON or CSV.
    Export {
        /// Output file; stdout when omitted.
        output: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value_t = ExportFormat::Json)]
        format: ExportFormat,
    },

    /// Re-track the commands of a `kwik export` JSON file.
    Import { file: PathBuf },

    /// Delete all tracked history.
    Reset {
        /// Confirm the deletion.
        #[arg(short, long)]
        yes: bool,
    },

    /// Print a shell completion script.
    Completions { shell: Shell },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_logging();
    let cli = Cli::parse();

    // Commands that don't require config
    if let Commands::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "kwik", &mut std::io::stdout());
        return Ok(());
    }

    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Init => {
            migrate::run_migrations(&cfg).await?;
            println!("Database initialized at {}", cfg.db.path.display());
        }
        Commands::Track {
            command,
            exit_code,
            failed,
            dir,
        } => {
            track::run_track(&cfg, &command, exit_code, failed, dir).await?;
        }
        Commands::Suggest {
            partial,
            limit,
            plain,
            split,
            explain,
            json,
            dir,
        } => {
            let directory = track::resolve_directory(dir);
            let opts = SuggestOptions {
                limit,
                plain,
                split,
                explain,
                json,
            };
            suggest::run_suggest(&cfg, &partial, &directory, opts).await?;
        }
        Commands::Search {
            keywords,
            limit,
            plain,
            json,
        } => {
            search::run_search(&cfg, &keywords, limit, plain, json).await?;
        }
        Commands::Stats { json } => {
            stats::run_stats(&cfg, json).await?;
        }
        Commands::Analyze { json } => {
            analyze::run_analyze(&cfg, json).await?;
        }
        Commands::Recent { limit } => {
            recent::run_recent(&cfg, limit).await?;
        }
        Commands::Rerun { dry_run } => {
            recent::run_rerun(&cfg, dry_run).await?;
        }
        Commands::ImportHistory { file } => {
            transfer::run_import_history(&cfg, file).await?;
        }
        Commands::Export { output, format } => {
            transfer::run_export(&cfg, output.as_deref(), format).await?;
        }
        Commands::Import { file } => {
            transfer::run_import(&cfg, &file).await?;
        }
        Commands::Reset { yes } => {
            reset::run_reset(&cfg, yes).await?;
        }
        Commands::Completions { .. } => unreachable!("handled before config loading"),
    }

    Ok(())
}
