//! Shell command-line parsing.
//!
//! Splits a raw command line on whitespace into a base command, an optional
//! subcommand, flags, and positional arguments. No quoting rules are applied;
//! `git commit -m "fix bug"` yields the flag `-m` and the argument `bug"`.
//!
//! # Rules
//!
//! 1. A leading `sudo`/`doas` wrapper is dropped when a plain command follows
//!    it. With wrapper options (`sudo -u root …`) the wrapper stays the base.
//! 2. A path-like base is reduced to its last segment (`/usr/bin/git` → `git`).
//! 3. A flag without `=` consumes the following token as its value unless that
//!    token is itself a flag.
//! 4. The first non-flag token is the subcommand; the rest are arguments.
//! 5. Flags are deduplicated in first-seen order.

use crate::lexicon::{self, PRIVILEGE_WRAPPERS};

/// A parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub base: String,
    pub subcommand: Option<String>,
    pub flags: Vec<String>,
    pub args: Vec<String>,
    /// The trimmed input text.
    pub full_command: String,
}

/// Parse a raw command line. Returns `None` for empty or whitespace-only input.
pub fn parse_command(raw: &str) -> Option<ParsedCommand> {
    let full_command = raw.trim();
    let tokens: Vec<&str> = full_command.split_whitespace().collect();
    if tokens.is_empty() {
        return None;
    }

    let mut start = 0;
    if tokens.len() > 1
        && PRIVILEGE_WRAPPERS.contains(&tokens[0])
        && !tokens[1].starts_with('-')
    {
        start = 1;
    }
    let base = reduce_path(tokens[start]);

    let mut subcommand: Option<String> = None;
    let mut flags: Vec<String> = Vec::new();
    let mut args: Vec<String> = Vec::new();

    let rest = &tokens[start + 1..];
    let mut i = 0;
    while i < rest.len() {
        let token = rest[i];
        if token.starts_with('-') {
            if !flags.iter().any(|f| f == token) {
                flags.push(token.to_string());
            }
            let takes_value = !token.contains('=')
                && rest.get(i + 1).is_some_and(|next| !next.starts_with('-'));
            if takes_value {
                i += 1;
            }
        } else if subcommand.is_none() {
            subcommand = Some(token.to_string());
        } else {
            args.push(token.to_string());
        }
        i += 1;
    }

    Some(ParsedCommand {
        base,
        subcommand,
        flags,
        args,
        full_command: full_command.to_string(),
    })
}

/// `./script.sh` → `script.sh`, `/usr/bin/git` → `git`.
fn reduce_path(token: &str) -> String {
    if !token.contains('/') {
        return token.to_string();
    }
    let trimmed = token
        .strip_prefix("./")
        .or_else(|| token.strip_prefix('/'))
        .unwrap_or(token);
    match trimmed.rfind('/') {
        Some(idx) => trimmed[idx + 1..].to_string(),
        None => trimmed.to_string(),
    }
}

/// Searchable keywords for a parsed command.
///
/// Always the base and the subcommand (if any), followed by the synonym
/// selection from [`lexicon::KEYWORD_SYNONYMS`]: the first synonym contained
/// in the subcommand, or the whole list when none is.
pub fn extract_keywords(cmd: &ParsedCommand) -> Vec<String> {
    let mut keywords: Vec<String> = vec![cmd.base.clone()];
    if let Some(sub) = &cmd.subcommand {
        keywords.push(sub.clone());
    }
    for synonym in select_synonyms(&cmd.base, cmd.subcommand.as_deref()) {
        keywords.push(synonym.to_string());
    }

    let mut seen = std::collections::HashSet::new();
    keywords.retain(|k| seen.insert(k.clone()));
    keywords
}

fn select_synonyms(base: &str, subcommand: Option<&str>) -> Vec<&'static str> {
    let Some(words) = lexicon::synonyms_for(base) else {
        return Vec::new();
    };
    if let Some(sub) = subcommand {
        if let Some(hit) = words.iter().find(|w| sub.contains(**w)) {
            return vec![*hit];
        }
    }
    words.to_vec()
}
