//! # kwik
//!
//! A local shell-command history tracker. Shell hooks call `kwik track` after
//! every command; `kwik suggest` and `kwik search` rank the history back by
//! recency, frequency, directory affinity and prefix match.
//!
//! The parsing, ranking and analysis logic lives in [`kwik_core`]. This
//! crate adds the SQLite store, configuration and the CLI commands.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────┐   ┌─────────────┐   ┌─────────────┐
//! │ shell hook │──▶│ kwik track  │──▶│   SQLite    │
//! └────────────┘   └─────────────┘   │  (WAL, tx)  │
//!                                    └──────┬──────┘
//!                  ┌────────────────────────┤
//!                  ▼                        ▼
//!           ┌─────────────┐          ┌─────────────┐
//!           │  suggest /  │          │  analyze /  │
//!           │   search    │          │    stats    │
//!           └─────────────┘          └─────────────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`db`] | Database connection |
//! | [`migrate`] | Schema creation |
//! | [`sqlite_store`] | SQLite implementation of the store trait |
//! | [`logging`] | stderr tracing subscriber |
//! | [`track`], [`suggest`], [`search`], [`stats`], [`analyze`], [`recent`], [`reset`], [`transfer`] | CLI commands |

pub mod analyze;
pub mod config;
pub mod db;
pub mod display;
pub mod logging;
pub mod migrate;
pub mod recent;
pub mod reset;
pub mod search;
pub mod sqlite_store;
pub mod stats;
pub mod suggest;
pub mod track;
pub mod transfer;

pub use kwik_core;
