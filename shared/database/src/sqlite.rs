use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;

pub type SqlitePool = sqlx::SqlitePool;

pub async fn create_sqlite_pool(database_url: &str, max_connections: u32) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)
        .with_context(|| format!("Invalid SQLite URL: {}", database_url))?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5))
        .foreign_keys(true);

    let mut pool_options = SqlitePoolOptions::new().acquire_timeout(Duration::from_secs(30));

    // Every connection to `:memory:` opens its own empty database, so the
    // pool must hold exactly one connection for its whole lifetime.
    if database_url.contains(":memory:") {
        pool_options = pool_options
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None);
    } else {
        pool_options = pool_options.max_connections(max_connections);
    }

    let pool = pool_options
        .connect_with(options)
        .await
        .context("Failed to connect to SQLite database")?;

    tracing::info!(url = %database_url, "Connected to SQLite database");
    Ok(pool)
}

pub async fn health_check(pool: &SqlitePool) -> Result<()> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
