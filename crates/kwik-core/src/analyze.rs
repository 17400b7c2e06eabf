//! Alias suggestions built from detected patterns and long, repeated commands.
//!
//! Two sources feed the suggestions, in this order:
//!
//! 1. Pattern groups whose base is a well-known tool
//!    ([`lexicon::ALIAS_NAMES`]): `alias g='git'`.
//! 2. Long commands (more than [`LONG_COMMAND_MIN_LEN`] characters, run more
//!    than [`LONG_COMMAND_MIN_FREQUENCY`] times): the name is the first letter
//!    of the first word plus the first two letters of the second word.
//!
//! A synthesized name already taken by an earlier suggestion gets a numeric
//! suffix starting at 2 (`gcm`, `gcm2`, ...).

use std::collections::HashSet;

use crate::lexicon;
use crate::models::{CommandRecord, PatternGroup};

/// Commands must be longer than this (in characters) to get a synthesized alias.
pub const LONG_COMMAND_MIN_LEN: usize = 20;
/// Commands must have run more than this many times.
pub const LONG_COMMAND_MIN_FREQUENCY: i64 = 2;
/// At most this many long commands are considered.
pub const LONG_COMMAND_LIMIT: i64 = 5;
/// Maximum pattern groups returned by pattern detection.
pub const MAX_PATTERN_GROUPS: i64 = 10;
/// Maximum example commands per pattern group.
pub const MAX_PATTERN_EXAMPLES: i64 = 10;
/// Maximum entries in the failure report.
pub const MAX_FAILURE_STATS: i64 = 20;

/// Build alias suggestions.
///
/// `long_commands` must already be filtered and ordered by frequency
/// descending.
pub fn suggest_aliases(patterns: &[PatternGroup], long_commands: &[CommandRecord]) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::new();
    let mut aliases = Vec::new();

    for group in patterns {
        if let Some(name) = lexicon::alias_for(&group.base) {
            if taken.insert(name.to_string()) {
                aliases.push(alias_line(name, &group.base));
            }
        }
    }

    for record in long_commands {
        let Some(stem) = synthesize_alias_name(&record.full_command) else {
            continue;
        };
        let name = unique_name(&stem, &taken);
        taken.insert(name.clone());
        aliases.push(alias_line(&name, &record.full_command));
    }

    aliases
}

/// First letter of the first word plus the first two letters of the second,
/// lower-cased. `None` for single-word commands.
pub fn synthesize_alias_name(command: &str) -> Option<String> {
    let mut words = command.split_whitespace();
    let first = words.next()?;
    let second = words.next()?;
    let name: String = first
        .chars()
        .take(1)
        .chain(second.chars().take(2))
        .collect();
    Some(name.to_lowercase())
}

fn unique_name(stem: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(stem) {
        return stem.to_string();
    }
    let mut n = 2;
    loop {
        let candidate = format!("{}{}", stem, n);
        if !taken.contains(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

fn alias_line(name: &str, command: &str) -> String {
    format!("alias {}='{}'", name, command.replace('\'', r"'\''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(base: &str) -> PatternGroup {
        PatternGroup {
            base: base.to_string(),
            commands: vec![format!("{} a", base), format!("{} b", base)],
            run_count: 4,
        }
    }

    fn long(id: i64, full: &str, freq: i64) -> CommandRecord {
        CommandRecord {
            id,
            base: full.split_whitespace().next().unwrap_or_default().to_string(),
            subcommand: None,
            full_command: full.to_string(),
            frequency: freq,
            last_used: 0,
            created_at: 0,
            directory: String::new(),
        }
    }

    #[test]
    fn test_synthesize_alias_name() {
        assert_eq!(
            synthesize_alias_name("git commit --amend --no-edit").as_deref(),
            Some("gco")
        );
        assert_eq!(
            synthesize_alias_name("Docker Compose up -d").as_deref(),
            Some("dco")
        );
        assert_eq!(synthesize_alias_name("make x").as_deref(), Some("mx"));
        assert_eq!(synthesize_alias_name("htop"), None);
    }

    #[test]
    fn test_well_known_aliases_only_for_table_bases() {
        let aliases = suggest_aliases(&[group("git"), group("cargo"), group("kubectl")], &[]);
        assert_eq!(aliases, vec!["alias g='git'", "alias k='kubectl'"]);
    }

    #[test]
    fn test_long_command_aliases() {
        let cmds = vec![long(1, "kubectl get pods --all-namespaces", 9)];
        let aliases = suggest_aliases(&[], &cmds);
        assert_eq!(
            aliases,
            vec!["alias kge='kubectl get pods --all-namespaces'"]
        );
    }

    #[test]
    fn test_collisions_get_numeric_suffix() {
        let cmds = vec![
            long(1, "git commit --amend --no-edit", 9),
            long(2, "git config --global user.name", 5),
            long(3, "git co feature/very-long-branch", 4),
        ];
        let aliases = suggest_aliases(&[], &cmds);
        assert_eq!(aliases[0], "alias gco='git commit --amend --no-edit'");
        assert_eq!(aliases[1], "alias gco2='git config --global user.name'");
        assert_eq!(aliases[2], "alias gco3='git co feature/very-long-branch'");
    }

    #[test]
    fn test_synthesized_name_avoids_well_known_alias() {
        let cmds = vec![long(1, "d compose-wrapper --profile dev up", 3)];
        let aliases = suggest_aliases(&[group("docker-compose")], &cmds);
        assert_eq!(aliases[0], "alias dc='docker-compose'");
        assert_eq!(aliases[1], "alias dco='d compose-wrapper --profile dev up'");

        let clash = vec![long(2, "d c --profile dev up --build now", 3)];
        let aliases = suggest_aliases(&[group("docker-compose")], &clash);
        assert_eq!(aliases[1], "alias dc2='d c --profile dev up --build now'");
    }

    #[test]
    fn test_single_quotes_are_escaped() {
        let cmds = vec![long(1, "git commit -m 'wip' --no-verify", 3)];
        let aliases = suggest_aliases(&[], &cmds);
        assert_eq!(
            aliases[0],
            r"alias gco='git commit -m '\''wip'\'' --no-verify'"
        );
    }
}
