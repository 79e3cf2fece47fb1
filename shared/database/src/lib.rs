pub mod migrations;
pub mod repositories;
pub mod sqlite;

pub use repositories::*;
pub use sqlite::{create_sqlite_pool, health_check, SqlitePool};

use anyhow::Result;

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://doc_analyzer.db".to_string(),
            max_connections: 5,
        }
    }
}

pub async fn initialize_database(config: &DatabaseConfig) -> Result<SqlitePool> {
    let pool = create_sqlite_pool(&config.url, config.max_connections).await?;

    migrations::run_sqlite_migrations(&pool).await?;

    Ok(pool)
}
