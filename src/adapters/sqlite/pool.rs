//! SQLite connection pool.

use crate::config::DatabaseConfig;
use crate::ports::repository::StoreError;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

const MIGRATIONS: &[&str] = &[include_str!("../../../migrations/0001_create_videos.sql")];

/// SQLite-backed adapter for the video record store.
#[derive(Clone, Debug)]
pub struct SqliteVideoStore {
    pub(super) pool: SqlitePool,
}

impl SqliteVideoStore {
    /// Open (or create) the database and bring the schema up to date.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(&config.url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections.max(1))
            .connect_with(options)
            .await?;

        info!(url = %config.url, "Connected to SQLite");
        Self::from_pool(pool).await
    }

    /// Private in-memory database, mainly for tests.
    ///
    /// Every connection to `:memory:` is its own database, so the pool is
    /// pinned to a single connection that never expires.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        Self::from_pool(pool).await
    }

    /// Wrap an existing pool and run migrations on it.
    pub async fn from_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        for migration in MIGRATIONS {
            sqlx::query(migration).execute(&pool).await?;
        }
        Ok(Self { pool })
    }
}
