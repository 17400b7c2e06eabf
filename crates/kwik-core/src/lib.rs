//! # kwik core
//!
//! Shell-free logic for kwik: command parsing, the static lexicon tables,
//! the [`store::Store`] abstraction, the ranking engine, and pattern/alias
//! analysis.
//!
//! This crate has no sqlx, tokio runtime, or filesystem dependencies. The
//! `kwik` binary crate supplies the SQLite-backed store and the CLI.
//!
//! ## Data flow
//!
//! ```text
//! raw command ──▶ parser ──▶ Store::track ──▶ commands / keywords / flags / usage_stats
//!
//! Store::recent_commands ──▶ rank ──▶ suggestions
//! Store::pattern_groups  ──▶ analyze ──▶ alias suggestions
//! ```

pub mod analyze;
pub mod error;
pub mod history;
pub mod lexicon;
pub mod models;
pub mod parser;
pub mod rank;
pub mod shell_history;
pub mod store;

pub use error::{Error, Result};
