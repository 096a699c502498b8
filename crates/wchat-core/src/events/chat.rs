//! Chat-related domain events.

use serde::{Deserialize, Serialize};

use crate::types::id::RoomId;
use crate::types::message::{MessageRecord, SeenReceipt};

/// Events produced after a successful chat write.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatEvent {
    /// A new message was persisted.
    MessageCreated {
        /// The stored message.
        message: MessageRecord,
    },
    /// A message was marked as seen by a participant.
    MessageSeen {
        /// The receipt.
        receipt: SeenReceipt,
    },
}

impl ChatEvent {
    /// The chat room this event is scoped to.
    pub fn room(&self) -> &RoomId {
        match self {
            Self::MessageCreated { message } => &message.chat_id,
            Self::MessageSeen { receipt } => &receipt.chat_id,
        }
    }
}
