//! Core data models shared by the parser, the stores, and the ranking engine.
//!
//! All timestamps are Unix seconds.

use serde::{Deserialize, Serialize};

/// A stored command, unique per `(base, full_command, directory)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandRecord {
    pub id: i64,
    pub base: String,
    pub subcommand: Option<String>,
    pub full_command: String,
    pub frequency: i64,
    pub last_used: i64,
    pub created_at: i64,
    pub directory: String,
}

/// A flag attached to a stored command, with its human-readable meaning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlagEntry {
    pub flag: String,
    pub meaning: Option<String>,
}

/// How a tracked invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub success: bool,
    pub exit_code: i32,
}

impl Outcome {
    /// Successful run with exit code 0.
    pub fn ok() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Outcome derived from an exit code: anything but 0 is a failure.
    pub fn from_exit_code(exit_code: i32) -> Self {
        Self {
            success: exit_code == 0,
            exit_code,
        }
    }
}

/// Everything a store needs to record one invocation in a single unit.
#[derive(Debug, Clone)]
pub struct TrackedCommand {
    pub base: String,
    pub subcommand: Option<String>,
    pub full_command: String,
    pub directory: String,
    pub keywords: Vec<String>,
    pub flags: Vec<FlagEntry>,
    pub outcome: Outcome,
    pub used_at: i64,
}

/// A command record with its composite relevance score.
#[derive(Debug, Clone, Serialize)]
pub struct RankedCommand {
    pub command: CommandRecord,
    pub score: f64,
}

/// Totals over the whole store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub unique_commands: i64,
    pub total_executions: i64,
}

/// Distinct full commands sharing one base command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternGroup {
    pub base: String,
    pub commands: Vec<String>,
    pub run_count: i64,
}

/// Failure summary for a command with at least one failed run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailureStat {
    pub command_id: i64,
    pub full_command: String,
    pub total_runs: i64,
    pub failures: i64,
    pub success_rate: f64,
    pub last_failure: Option<i64>,
    /// Exit code of the most recent failed run.
    pub last_exit_code: Option<i32>,
}

impl FailureStat {
    /// Build a summary, computing the success rate as a percentage.
    pub fn new(
        command_id: i64,
        full_command: String,
        total_runs: i64,
        failures: i64,
        last_failure: Option<i64>,
        last_exit_code: Option<i32>,
    ) -> Self {
        let success_rate = if total_runs > 0 {
            (total_runs - failures) as f64 / total_runs as f64 * 100.0
        } else {
            0.0
        };
        Self {
            command_id,
            full_command,
            total_runs,
            failures,
            success_rate,
            last_failure,
            last_exit_code,
        }
    }
}

/// Result of `analyze`: patterns, failure-prone commands, and aliases.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Analysis {
    pub patterns: Vec<PatternGroup>,
    pub failures: Vec<FailureStat>,
    pub aliases: Vec<String>,
}
