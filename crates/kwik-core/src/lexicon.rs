//! Static lookup tables: keyword synonyms, flag meanings, and well-known
//! alias names.
//!
//! The tables are plain data so they can be inspected and extended without
//! touching the parser. Entry order matters for [`KEYWORD_SYNONYMS`]: the
//! first synonym contained in a subcommand wins.

/// Per-base search synonyms.
pub const KEYWORD_SYNONYMS: &[(&str, &[&str])] = &[
    (
        "git",
        &[
            "commit", "push", "pull", "fetch", "merge", "rebase", "branch", "checkout", "status",
            "log", "diff", "add", "stash", "reset",
        ],
    ),
    (
        "docker",
        &[
            "run", "build", "pull", "push", "ps", "logs", "exec", "stop", "start", "rm", "images",
            "-compose",
        ],
    ),
    (
        "npm",
        &["install", "run", "start", "test", "build", "publish", "init"],
    ),
    ("yarn", &["add", "run", "start", "build", "publish"]),
    (
        "go",
        &["run", "build", "test", "get", "install", "mod", "fmt", "vet"],
    ),
    (
        "kubectl",
        &[
            "get",
            "apply",
            "delete",
            "describe",
            "logs",
            "exec",
            "port-forward",
        ],
    ),
    (
        "terraform",
        &["init", "plan", "apply", "destroy", "validate", "fmt"],
    ),
    ("make", &["install", "build", "clean", "test"]),
    ("python", &["python", "pip", "virtualenv", "venv"]),
    ("ls", &["list", "directory", "files"]),
    ("cd", &["change", "directory", "navigate"]),
    ("vim", &["editor", "edit", "vim", "vi"]),
];

/// Common flag spellings and what they mean.
pub const FLAG_MEANINGS: &[(&str, &str)] = &[
    ("-m", "message"),
    ("--message", "message"),
    ("-f", "force"),
    ("--force", "force"),
    ("-r", "recursive"),
    ("--recursive", "recursive"),
    ("-v", "verbose"),
    ("--verbose", "verbose"),
    ("-d", "directory"),
    ("--directory", "directory"),
    ("-n", "dry-run"),
    ("--dry-run", "dry-run"),
    ("-y", "yes"),
    ("--yes", "yes"),
    ("-p", "port"),
    ("--port", "port"),
    ("-t", "tag"),
    ("--tag", "tag"),
    ("--help", "help"),
    ("--version", "version"),
];

/// Short aliases for well-known tools.
pub const ALIAS_NAMES: &[(&str, &str)] = &[
    ("git", "g"),
    ("docker", "d"),
    ("kubectl", "k"),
    ("npm", "n"),
    ("yarn", "y"),
    ("terraform", "tf"),
    ("docker-compose", "dc"),
];

/// Privilege-escalation wrappers that never count as the base command.
pub const PRIVILEGE_WRAPPERS: &[&str] = &["sudo", "doas"];

/// Shell builtins and navigation commands skipped when importing history.
pub const HISTORY_IGNORED_BASES: &[&str] = &[
    "cd", "ls", "ll", "la", "lla", "pwd", "echo", "exit", "export", "declare", "typeset", "unset",
    "shift", "local", "readonly", "help", "which", "time", "fg", "bg", "jobs", "kill", "builtin",
    "test", "[", "true", "false", "logout", "shopt", "umask", "set", "setenv", "printenv", "eval",
    "exec", "source", "alias", "unalias",
];

/// Synonym list for a base command, if the table knows it.
pub fn synonyms_for(base: &str) -> Option<&'static [&'static str]> {
    KEYWORD_SYNONYMS
        .iter()
        .find(|(b, _)| *b == base)
        .map(|(_, words)| *words)
}

/// Meaning of a flag spelling, if known.
pub fn flag_meaning(flag: &str) -> Option<&'static str> {
    FLAG_MEANINGS
        .iter()
        .find(|(f, _)| *f == flag)
        .map(|(_, meaning)| *meaning)
}

/// Well-known alias for a base command, if any.
pub fn alias_for(base: &str) -> Option<&'static str> {
    ALIAS_NAMES
        .iter()
        .find(|(b, _)| *b == base)
        .map(|(_, alias)| *alias)
}

pub fn is_history_ignored(base: &str) -> bool {
    HISTORY_IGNORED_BASES.contains(&base)
}
