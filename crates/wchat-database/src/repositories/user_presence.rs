//! User online-flag repository.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use wchat_core::error::{AppError, ErrorKind};
use wchat_core::result::AppResult;
use wchat_core::traits::PresenceStore;
use wchat_core::types::UserId;

/// Persists the `is_online` column of the `users` table.
#[derive(Debug, Clone)]
pub struct UserPresenceRepository {
    pool: PgPool,
}

impl UserPresenceRepository {
    /// Create a new user presence repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Clear every stored online flag. Run once at startup: no connection
    /// survives a restart.
    pub(crate) async fn reset_all(&self) -> AppResult<u64> {
        sqlx::query("UPDATE users SET is_online = FALSE WHERE is_online")
            .execute(&self.pool)
            .await
            .map(|r| r.rows_affected())
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to reset online flags", e)
            })
    }
}

#[async_trait]
impl PresenceStore for UserPresenceRepository {
    async fn set_online(&self, user_id: &UserId, online: bool) -> AppResult<()> {
        let result = sqlx::query("UPDATE users SET is_online = $1 WHERE id = $2")
            .bind(online)
            .bind(user_id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to update online flag", e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::database(format!("No stored user {user_id}")));
        }

        debug!(user_id = %user_id, online, "Stored online flag updated");
        Ok(())
    }
}
