use std::str::FromStr;

use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

/// Creates the SQLite connection pool and brings the schema up to date.
pub async fn create_pool(database_url: &str) -> Result<SqlitePool> {
    info!("Opening SQLite store at {database_url}");

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    run_migrations(&pool).await?;

    info!("SQLite store ready");
    Ok(pool)
}

/// Runs each `;`-separated statement of a migration file, skipping `--` comment lines.
async fn execute_sql(pool: &SqlitePool, sql: &str) -> Result<()> {
    for statement in sql.split(';') {
        let cleaned: String = statement
            .lines()
            .filter(|line| !line.trim().starts_with("--"))
            .collect::<Vec<_>>()
            .join("\n");
        let trimmed = cleaned.trim();
        if !trimmed.is_empty() {
            sqlx::query(trimmed).execute(pool).await?;
        }
    }
    Ok(())
}

/// Creates missing tables, then applies additive migrations. Safe to run on every start.
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    execute_sql(pool, include_str!("../migrations/001_initial.sql")).await?;

    let has_job_description: Option<(String,)> = sqlx::query_as(
        "SELECT name FROM pragma_table_info('applications') WHERE name = 'job_description'",
    )
    .fetch_optional(pool)
    .await?;
    if has_job_description.is_none() {
        info!("Adding job_description column to applications table");
        execute_sql(pool, include_str!("../migrations/002_job_description.sql")).await?;
    }

    Ok(())
}

/// Single-connection in-memory store; every connection to `:memory:` is a fresh database.
#[cfg(test)]
pub async fn test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .unwrap();
    run_migrations(&pool).await.unwrap();
    pool
}
