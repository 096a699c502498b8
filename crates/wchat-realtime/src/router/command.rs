//! Commands accepted by the router actor.

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};

use wchat_core::types::{ConnectionId, RoomId, UserId};

use crate::message::types::{InboundMessage, OutboundMessage};

/// Commands for the router actor.
#[derive(Debug)]
pub enum RouterCommand {
    /// A transport connected; track it as anonymous.
    Open {
        /// New connection id.
        conn_id: ConnectionId,
        /// Queue drained by the connection's writer.
        sender: mpsc::Sender<OutboundMessage>,
    },
    /// A decoded client event.
    Inbound {
        /// Sending connection.
        conn_id: ConnectionId,
        /// The event.
        message: InboundMessage,
    },
    /// A transport disconnected; run the cleanup cascade.
    Close {
        /// Closed connection.
        conn_id: ConnectionId,
        /// Signalled once cleanup has been applied.
        reply: oneshot::Sender<()>,
    },
    /// Deliver an event to every connection joined to a room.
    DeliverToRoom {
        /// Target room.
        room_id: RoomId,
        /// Event to deliver.
        message: OutboundMessage,
        /// Number of connections the event was queued to.
        reply: oneshot::Sender<usize>,
    },
    /// Fetch the online user list.
    OnlineUsers {
        /// Sorted online users.
        reply: oneshot::Sender<Vec<UserId>>,
    },
    /// Fetch registry and room counters.
    Stats {
        /// Current counters.
        reply: oneshot::Sender<RouterStats>,
    },
    /// Close every connection and stop the actor.
    Shutdown {
        /// Signalled once connections are dropped and presence writes flushed.
        reply: oneshot::Sender<()>,
    },
}

/// Point-in-time counters of router-owned state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouterStats {
    /// Open transports, identified or not.
    pub open_connections: usize,
    /// Identified connections.
    pub identified_connections: usize,
    /// Users with at least one connection.
    pub online_users: usize,
    /// Rooms with at least one member.
    pub active_rooms: usize,
}
