//! Database management for the local account store.
//!
//! Provides a shared SQLite connection pool. The dashboard itself is
//! stateless; the database only holds login accounts.

use crate::config::DatabaseConfig;
use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;
use tracing::info;

pub use sqlx::SqlitePool as DbPool;

/// Shared database handle.
///
/// Created once at startup; the pool is cheap to clone (internally
/// Arc-based) and handed to the account store.
pub struct Database {
    pool: DbPool,
}

impl Database {
    /// Connect to the database (creating the SQLite file if needed) and run
    /// all pending migrations.
    pub async fn new(config: &DatabaseConfig, data_dir: &Path) -> Result<Self> {
        use std::fs;

        let db_path = config
            .path
            .clone()
            .unwrap_or_else(|| data_dir.join("meshboard.db"));

        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", db_path.display()))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .context("Failed to connect to SQLite database")?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to run migrations")?;

        info!(path = %db_path.display(), "Database connected");

        Ok(Self { pool })
    }

    /// Get a clone of the connection pool.
    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_sqlite_connection() {
        let temp = TempDir::new().unwrap();
        let config = DatabaseConfig::default();
        let db = Database::new(&config, temp.path()).await.unwrap();

        // Just verify we can get a pool
        let _pool = db.pool();
    }
}
