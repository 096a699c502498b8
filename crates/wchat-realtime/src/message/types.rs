//! Inbound and outbound WebSocket message type definitions.

use serde::{Deserialize, Serialize};

use wchat_core::types::{MessageId, MessageRecord, RoomId, SeenReceipt, UserId};

/// Messages sent by the client to the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundMessage {
    /// Bind this connection to a user. Required before any other event.
    Identify {
        /// The authenticated user.
        user_id: UserId,
    },
    /// Join a chat room.
    JoinRoom {
        /// Room (chat) id.
        room_id: RoomId,
    },
    /// Leave a chat room.
    LeaveRoom {
        /// Room (chat) id.
        room_id: RoomId,
    },
    /// The user started typing in a room.
    Typing {
        /// Room (chat) id.
        room_id: RoomId,
    },
    /// The user stopped typing in a room.
    StopTyping {
        /// Room (chat) id.
        room_id: RoomId,
    },
    /// Client-side relay of a message payload to the other room members.
    SendMsg {
        /// Target chat.
        chat_id: RoomId,
        /// Opaque message payload, forwarded as-is.
        data: serde_json::Value,
    },
}

impl InboundMessage {
    /// Event name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Identify { .. } => "identify",
            Self::JoinRoom { .. } => "join_room",
            Self::LeaveRoom { .. } => "leave_room",
            Self::Typing { .. } => "typing",
            Self::StopTyping { .. } => "stop_typing",
            Self::SendMsg { .. } => "send_msg",
        }
    }
}

/// Messages sent by the server to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundMessage {
    /// A user came online (global).
    UserOnline {
        /// User id.
        user_id: UserId,
    },
    /// A user went offline (global).
    UserOffline {
        /// User id.
        user_id: UserId,
    },
    /// Users online at the moment this connection identified.
    OnlineUsers {
        /// Online user ids, sorted.
        user_ids: Vec<UserId>,
    },
    /// Another room member is typing.
    Typing {
        /// Room id.
        room_id: RoomId,
        /// Typing user.
        user_id: UserId,
    },
    /// Another room member stopped typing.
    StopTyping {
        /// Room id.
        room_id: RoomId,
        /// User who stopped typing.
        user_id: UserId,
    },
    /// A message arrived in a joined room.
    MessageReceived {
        /// The message.
        message: ReceivedMessage,
    },
    /// A message in a joined room was seen.
    MessageSeen {
        /// Seen message.
        message_id: MessageId,
        /// Chat of the message.
        chat_id: RoomId,
        /// Reader.
        user_id: UserId,
    },
}

impl OutboundMessage {
    /// Event name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UserOnline { .. } => "user_online",
            Self::UserOffline { .. } => "user_offline",
            Self::OnlineUsers { .. } => "online_users",
            Self::Typing { .. } => "typing",
            Self::StopTyping { .. } => "stop_typing",
            Self::MessageReceived { .. } => "message_received",
            Self::MessageSeen { .. } => "message_seen",
        }
    }
}

impl From<SeenReceipt> for OutboundMessage {
    fn from(receipt: SeenReceipt) -> Self {
        Self::MessageSeen {
            message_id: receipt.message_id,
            chat_id: receipt.chat_id,
            user_id: receipt.user_id,
        }
    }
}

impl From<MessageRecord> for OutboundMessage {
    fn from(record: MessageRecord) -> Self {
        Self::MessageReceived {
            message: ReceivedMessage::Stored(record),
        }
    }
}

/// Body of a `message_received` event.
///
/// Persisted messages carry the stored record; client relays carry the
/// payload the sender supplied, untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReceivedMessage {
    /// Message delivered after persistence.
    Stored(MessageRecord),
    /// Payload relayed from another client.
    Relayed(serde_json::Value),
}
