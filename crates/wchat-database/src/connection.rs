//! PostgreSQL pool backing the presence store.
//!
//! [`DatabasePool::open`] is the whole startup sequence for the database
//! side of the server: connect, make sure the `users.is_online` column is
//! there, and clear flags a previous process left behind.

use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use tracing::{info, warn};

use wchat_core::config::DatabaseConfig;
use wchat_core::error::{AppError, ErrorKind};
use wchat_core::result::AppResult;

use crate::repositories::user_presence::UserPresenceRepository;

const PRESENCE_COLUMN_QUERY: &str = "SELECT EXISTS (\
     SELECT 1 FROM information_schema.columns \
     WHERE table_name = 'users' AND column_name = 'is_online')";

#[derive(Debug, Clone)]
pub struct DatabasePool {
    pool: PgPool,
}

impl DatabasePool {
    /// Connect and prepare the presence store.
    ///
    /// Fails if the database is unreachable or has no `users.is_online`
    /// column. On success every stored online flag is false.
    pub async fn open(config: &DatabaseConfig) -> AppResult<(Self, UserPresenceRepository)> {
        let db = Self::connect(config).await?;
        db.check_presence_schema().await?;

        let presence = UserPresenceRepository::new(db.pool.clone());
        let cleared = presence.reset_all().await?;
        if cleared > 0 {
            warn!(users = cleared, "Cleared online flags left by a previous run");
        }

        Ok((db, presence))
    }

    async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        let options: PgConnectOptions = config.url.parse().map_err(|e| {
            AppError::with_source(ErrorKind::Configuration, "Invalid database.url", e)
        })?;
        info!(
            target_db = %describe_target(&options),
            max_connections = config.max_connections,
            "Connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .idle_timeout(Duration::from_secs(config.idle_timeout_seconds))
            .connect_with(options)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to connect to PostgreSQL", e)
            })?;

        Ok(Self { pool })
    }

    async fn check_presence_schema(&self) -> AppResult<()> {
        let present: bool = sqlx::query_scalar(PRESENCE_COLUMN_QUERY)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Presence schema check failed", e)
            })?;

        if !present {
            return Err(AppError::database(
                "Table users has no is_online column; run the chat schema migrations first",
            ));
        }
        Ok(())
    }

    /// Close all connections. Call after the presence writer has drained.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database pool closed");
    }
}

/// `user@host:port/database` for logs. The password never appears.
fn describe_target(options: &PgConnectOptions) -> String {
    format!(
        "{}@{}:{}/{}",
        options.get_username(),
        options.get_host(),
        options.get_port(),
        options.get_database().unwrap_or("-"),
    )
}
