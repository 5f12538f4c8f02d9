use std::str::FromStr;

use anyhow::Context;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::debug;

pub type DatabasePool = SqlitePool;

const MAX_CONNECTIONS: u32 = 8;

/// Process-wide connection pool, created once at startup and handed to
/// every repository explicitly.
#[derive(Clone)]
pub struct Database {
    pool: DatabasePool,
}

impl Database {
    pub async fn connect(url: &str) -> anyhow::Result<Self> {
        let in_memory = url.contains(":memory:");

        let mut options = SqliteConnectOptions::from_str(url)
            .with_context(|| format!("invalid database URL: {url}"))?
            .create_if_missing(true);
        if !in_memory {
            options = options.journal_mode(SqliteJournalMode::Wal);
        }

        // Every in-memory connection is its own database, so keep exactly one alive.
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(MAX_CONNECTIONS)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .context("failed to open database")?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("failed to run database migrations")?;

        debug!(in_memory, "database ready");

        Ok(Self { pool })
    }

    pub fn clone_pool(&self) -> DatabasePool {
        self.pool.clone()
    }
}
