use anyhow::Result;
use sqlx::SqlitePool;

use crate::config::Config;
use crate::db;

/// Create the database and schema. Idempotent.
pub async fn run_migrations(config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;
    let result = migrate_pool(&pool).await;
    pool.close().await;
    result
}

/// Apply the schema to an open pool.
pub async fn migrate_pool(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS commands (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            base TEXT NOT NULL,
            subcommand TEXT,
            full_command TEXT NOT NULL,
            frequency INTEGER NOT NULL DEFAULT 1,
            last_used INTEGER NOT NULL,
            directory TEXT NOT NULL DEFAULT '',
            created_at INTEGER NOT NULL,
            UNIQUE(base, full_command, directory)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS flags (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            command_id INTEGER NOT NULL,
            flag TEXT NOT NULL,
            meaning TEXT,
            UNIQUE(command_id, flag),
            FOREIGN KEY (command_id) REFERENCES commands(id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS keywords (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            command_id INTEGER NOT NULL,
            keyword TEXT NOT NULL,
            UNIQUE(command_id, keyword),
            FOREIGN KEY (command_id) REFERENCES commands(id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS usage_stats (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            command_id INTEGER NOT NULL,
            success INTEGER NOT NULL DEFAULT 1,
            exit_code INTEGER NOT NULL DEFAULT 0,
            used_at INTEGER NOT NULL,
            FOREIGN KEY (command_id) REFERENCES commands(id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_commands_base ON commands(base)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_commands_last_used ON commands(last_used DESC)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_keywords_keyword ON keywords(keyword)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_usage_stats_command ON usage_stats(command_id)")
        .execute(pool)
        .await?;

    Ok(())
}
