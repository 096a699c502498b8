//! Persisted chat records handed to the realtime layer by the CRUD path.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{MessageId, RoomId, UserId};

/// A chat message that has already been written to the document store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageRecord {
    /// Message id.
    pub id: MessageId,
    /// Chat the message belongs to.
    pub chat_id: RoomId,
    /// Author of the message.
    pub sender_id: UserId,
    /// Text body; absent for attachment-only messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Relative path of an uploaded attachment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// When the message was persisted.
    pub created_at: DateTime<Utc>,
}

/// A read receipt: `user_id` has seen `message_id` in `chat_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeenReceipt {
    /// The message that was seen.
    pub message_id: MessageId,
    /// Chat the message belongs to.
    pub chat_id: RoomId,
    /// The reader.
    pub user_id: UserId,
}
