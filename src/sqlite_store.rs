//! SQLite-backed [`Store`] implementation.
//!
//! Every write that touches more than one table runs in a single transaction,
//! so a tracked command is either fully recorded (record, keywords, flags,
//! usage event) or not at all.

use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection, SqlitePool};

use kwik_core::error::{Error, Result};
use kwik_core::models::{
    CommandRecord, FailureStat, FlagEntry, Outcome, PatternGroup, Stats, TrackedCommand,
};
use kwik_core::store::{Store, KEYWORD_SEARCH_LIMIT};

use crate::config::Config;
use crate::{db, migrate};

const RECORD_COLUMNS: &str =
    "id, base, subcommand, full_command, frequency, last_used, created_at, directory";

/// SQLite implementation of the [`Store`] trait.
///
/// Wraps a [`SqlitePool`] and translates every `Store` method into one or
/// more SQL statements against the schema created by
/// [`migrate_pool`](crate::migrate::migrate_pool).
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to the configured database and make sure the schema exists.
    ///
    /// Callers own the returned store and must [`close`](Self::close) it.
    pub async fn open(config: &Config) -> anyhow::Result<Self> {
        let pool = db::connect(config).await?;
        if let Err(e) = migrate::migrate_pool(&pool).await {
            pool.close().await;
            return Err(e);
        }
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the underlying pool, waiting for open connections.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Insert a command record or bump its frequency; returns the record ID.
    pub async fn upsert_command(
        &self,
        base: &str,
        subcommand: Option<&str>,
        full_command: &str,
        directory: &str,
        now: i64,
    ) -> Result<i64> {
        let mut conn = self.pool.acquire().await.map_err(Error::storage)?;
        upsert_in(&mut conn, base, subcommand, full_command, directory, now)
            .await
            .map_err(Error::storage)
    }

    /// Append a usage event for an existing record.
    pub async fn record_usage(&self, command_id: i64, outcome: Outcome, now: i64) -> Result<()> {
        let mut conn = self.pool.acquire().await.map_err(Error::storage)?;
        record_usage_in(&mut conn, command_id, outcome, now)
            .await
            .map_err(Error::storage)
    }

    async fn fetch_records(&self, sql: &str, limit: i64) -> Result<Vec<CommandRecord>> {
        let rows = sqlx::query(sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::storage)?;
        rows.iter()
            .map(record_from_row)
            .collect::<std::result::Result<_, _>>()
            .map_err(Error::storage)
    }
}

fn record_from_row(row: &SqliteRow) -> std::result::Result<CommandRecord, sqlx::Error> {
    Ok(CommandRecord {
        id: row.try_get("id")?,
        base: row.try_get("base")?,
        subcommand: row.try_get("subcommand")?,
        full_command: row.try_get("full_command")?,
        frequency: row.try_get("frequency")?,
        last_used: row.try_get("last_used")?,
        created_at: row.try_get("created_at")?,
        directory: row.try_get("directory")?,
    })
}

/// Single-statement upsert keyed on `(base, full_command, directory)`.
async fn upsert_in(
    conn: &mut SqliteConnection,
    base: &str,
    subcommand: Option<&str>,
    full_command: &str,
    directory: &str,
    now: i64,
) -> std::result::Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        INSERT INTO commands (base, subcommand, full_command, frequency, last_used, directory, created_at)
        VALUES (?, ?, ?, 1, ?, ?, ?)
        ON CONFLICT(base, full_command, directory) DO UPDATE SET
            frequency = frequency + 1,
            last_used = MAX(last_used, excluded.last_used)
        RETURNING id
        "#,
    )
    .bind(base)
    .bind(subcommand)
    .bind(full_command)
    .bind(now)
    .bind(directory)
    .bind(now)
    .fetch_one(&mut *conn)
    .await
}

async fn record_usage_in(
    conn: &mut SqliteConnection,
    command_id: i64,
    outcome: Outcome,
    now: i64,
) -> std::result::Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO usage_stats (command_id, success, exit_code, used_at) VALUES (?, ?, ?, ?)",
    )
    .bind(command_id)
    .bind(outcome.success)
    .bind(outcome.exit_code)
    .bind(now)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

async fn track_in(
    conn: &mut SqliteConnection,
    cmd: &TrackedCommand,
) -> std::result::Result<i64, sqlx::Error> {
    let id = upsert_in(
        conn,
        &cmd.base,
        cmd.subcommand.as_deref(),
        &cmd.full_command,
        &cmd.directory,
        cmd.used_at,
    )
    .await?;

    for keyword in &cmd.keywords {
        sqlx::query("INSERT OR IGNORE INTO keywords (command_id, keyword) VALUES (?, ?)")
            .bind(id)
            .bind(keyword)
            .execute(&mut *conn)
            .await?;
    }

    for flag in &cmd.flags {
        sqlx::query("INSERT OR IGNORE INTO flags (command_id, flag, meaning) VALUES (?, ?, ?)")
            .bind(id)
            .bind(&flag.flag)
            .bind(&flag.meaning)
            .execute(&mut *conn)
            .await?;
    }

    record_usage_in(conn, id, cmd.outcome, cmd.used_at).await?;
    Ok(id)
}

#[async_trait]
impl Store for SqliteStore {
    async fn track(&self, cmd: &TrackedCommand) -> Result<i64> {
        let mut tx = self.pool.begin().await.map_err(Error::storage)?;
        let id = track_in(&mut *tx, cmd).await.map_err(Error::storage)?;
        tx.commit().await.map_err(Error::storage)?;
        Ok(id)
    }

    async fn recent_commands(&self, limit: i64) -> Result<Vec<CommandRecord>> {
        let sql = format!(
            "SELECT {} FROM commands ORDER BY last_used DESC, id DESC LIMIT ?",
            RECORD_COLUMNS
        );
        self.fetch_records(&sql, limit).await
    }

    async fn top_commands(&self, limit: i64) -> Result<Vec<CommandRecord>> {
        let sql = format!(
            "SELECT {} FROM commands ORDER BY frequency DESC, last_used DESC, id ASC LIMIT ?",
            RECORD_COLUMNS
        );
        self.fetch_records(&sql, limit).await
    }

    async fn search_by_keyword(&self, needle: &str) -> Result<Vec<CommandRecord>> {
        // instr() instead of LIKE so `%` and `_` in the needle match literally
        let sql = format!(
            r#"
            SELECT {} FROM commands
            WHERE id IN (
                SELECT command_id FROM keywords
                WHERE instr(lower(keyword), lower(?)) > 0
            )
            ORDER BY frequency DESC, last_used DESC, id ASC
            LIMIT ?
            "#,
            RECORD_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(needle)
            .bind(KEYWORD_SEARCH_LIMIT as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::storage)?;
        rows.iter()
            .map(record_from_row)
            .collect::<std::result::Result<_, _>>()
            .map_err(Error::storage)
    }

    async fn flags_for(&self, command_id: i64) -> Result<Vec<FlagEntry>> {
        let rows = sqlx::query("SELECT flag, meaning FROM flags WHERE command_id = ? ORDER BY id")
            .bind(command_id)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::storage)?;

        rows.iter()
            .map(|row| {
                Ok(FlagEntry {
                    flag: row.try_get("flag")?,
                    meaning: row.try_get("meaning")?,
                })
            })
            .collect::<std::result::Result<_, sqlx::Error>>()
            .map_err(Error::storage)
    }

    async fn stats(&self) -> Result<Stats> {
        let (unique_commands, total_executions): (i64, i64) =
            sqlx::query_as("SELECT COUNT(*), COALESCE(SUM(frequency), 0) FROM commands")
                .fetch_one(&self.pool)
                .await
                .map_err(Error::storage)?;

        Ok(Stats {
            unique_commands,
            total_executions,
        })
    }

    async fn pattern_groups(
        &self,
        max_groups: i64,
        max_examples: i64,
    ) -> Result<Vec<PatternGroup>> {
        let group_rows = sqlx::query(
            r#"
            SELECT base, SUM(frequency) AS total_runs
            FROM commands
            GROUP BY base
            HAVING COUNT(DISTINCT full_command) > 1
            ORDER BY total_runs DESC, base ASC
            LIMIT ?
            "#,
        )
        .bind(max_groups)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::storage)?;

        let mut groups = Vec::with_capacity(group_rows.len());
        for row in &group_rows {
            let base: String = row.try_get("base").map_err(Error::storage)?;
            let run_count: i64 = row.try_get("total_runs").map_err(Error::storage)?;

            let commands: Vec<String> = sqlx::query_scalar(
                r#"
                SELECT full_command FROM commands
                WHERE base = ?
                GROUP BY full_command
                ORDER BY SUM(frequency) DESC, full_command ASC
                LIMIT ?
                "#,
            )
            .bind(&base)
            .bind(max_examples)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::storage)?;

            groups.push(PatternGroup {
                base,
                commands,
                run_count,
            });
        }

        Ok(groups)
    }

    async fn failure_stats(&self, limit: i64) -> Result<Vec<FailureStat>> {
        let rows = sqlx::query(
            r#"
            SELECT
                c.id,
                c.full_command,
                COUNT(us.id) AS total_runs,
                SUM(CASE WHEN us.success = 0 THEN 1 ELSE 0 END) AS failures,
                MAX(CASE WHEN us.success = 0 THEN us.used_at END) AS last_failure,
                (
                    SELECT f.exit_code FROM usage_stats f
                    WHERE f.command_id = c.id AND f.success = 0
                    ORDER BY f.used_at DESC, f.id DESC
                    LIMIT 1
                ) AS last_exit_code
            FROM commands c
            JOIN usage_stats us ON us.command_id = c.id
            GROUP BY c.id
            HAVING failures > 0
            ORDER BY failures DESC, c.id ASC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::storage)?;

        rows.iter()
            .map(|row| {
                Ok(FailureStat::new(
                    row.try_get("id")?,
                    row.try_get("full_command")?,
                    row.try_get("total_runs")?,
                    row.try_get("failures")?,
                    row.try_get("last_failure")?,
                    row.try_get("last_exit_code")?,
                ))
            })
            .collect::<std::result::Result<_, sqlx::Error>>()
            .map_err(Error::storage)
    }

    async fn long_commands(
        &self,
        min_len: usize,
        min_frequency: i64,
        limit: i64,
    ) -> Result<Vec<CommandRecord>> {
        let sql = format!(
            r#"
            SELECT {} FROM commands
            WHERE LENGTH(full_command) > ? AND frequency > ?
            ORDER BY frequency DESC, last_used DESC, id ASC
            LIMIT ?
            "#,
            RECORD_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(min_len as i64)
            .bind(min_frequency)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::storage)?;
        rows.iter()
            .map(record_from_row)
            .collect::<std::result::Result<_, _>>()
            .map_err(Error::storage)
    }

    async fn reset(&self) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(Error::storage)?;
        for table in ["usage_stats", "keywords", "flags", "commands"] {
            sqlx::query(&format!("DELETE FROM {}", table))
                .execute(&mut *tx)
                .await
                .map_err(Error::storage)?;
        }
        tx.commit().await.map_err(Error::storage)?;
        Ok(())
    }
}
