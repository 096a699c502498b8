//! Persistence of the per-user online flag.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::id::UserId;

/// Writes a user's stored online flag.
///
/// The realtime engine issues these writes without awaiting them before
/// broadcasting; implementations only need to report failure so it can be
/// logged.
#[async_trait]
pub trait PresenceStore: Send + Sync + std::fmt::Debug + 'static {
    /// Set (`true`) or clear (`false`) the user's online flag.
    async fn set_online(&self, user_id: &UserId, online: bool) -> AppResult<()>;
}
