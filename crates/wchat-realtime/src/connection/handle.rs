//! Individual WebSocket connection handle.

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

use wchat_core::types::{ConnectionId, UserId};

use crate::message::types::OutboundMessage;

/// Where a connection is in its lifecycle.
///
/// `Anonymous` → `Identified` happens at most once; `Terminated` is final.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    /// Transport is open but the client has not said who it is.
    Anonymous,
    /// Bound to a user; this binding is never changed.
    Identified(UserId),
    /// Transport is gone.
    Terminated,
}

/// Outcome of pushing one event onto a connection's queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Queued for the writer.
    Queued,
    /// Queue full; event dropped.
    Full,
    /// Writer has gone away; event dropped.
    Closed,
}

/// A handle to a single WebSocket connection, owned by the router.
#[derive(Debug)]
pub struct ConnectionHandle {
    /// Unique connection ID
    pub id: ConnectionId,
    /// Sender for outbound messages
    sender: mpsc::Sender<OutboundMessage>,
    /// Lifecycle state
    state: ConnectionState,
    /// When the connection was established
    pub connected_at: DateTime<Utc>,
}

impl ConnectionHandle {
    /// Create a new anonymous connection handle
    pub fn new(id: ConnectionId, sender: mpsc::Sender<OutboundMessage>) -> Self {
        Self {
            id,
            sender,
            state: ConnectionState::Anonymous,
            connected_at: Utc::now(),
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    /// The owning user, once identified
    pub fn user_id(&self) -> Option<&UserId> {
        match &self.state {
            ConnectionState::Identified(user_id) => Some(user_id),
            _ => None,
        }
    }

    /// Bind the connection to a user. Only valid from `Anonymous`.
    pub fn identify(&mut self, user_id: UserId) -> bool {
        if self.state != ConnectionState::Anonymous {
            return false;
        }
        self.state = ConnectionState::Identified(user_id);
        true
    }

    /// Move to `Terminated`, returning the previous state.
    pub fn terminate(&mut self) -> ConnectionState {
        std::mem::replace(&mut self.state, ConnectionState::Terminated)
    }

    /// Queue an outbound message without waiting.
    pub fn send(&self, msg: OutboundMessage) -> SendOutcome {
        if self.state == ConnectionState::Terminated {
            return SendOutcome::Closed;
        }
        match self.sender.try_send(msg) {
            Ok(()) => SendOutcome::Queued,
            Err(mpsc::error::TrySendError::Full(msg)) => {
                tracing::warn!(
                    conn_id = %self.id,
                    kind = msg.kind(),
                    "Connection send buffer full, dropping message"
                );
                SendOutcome::Full
            }
            Err(mpsc::error::TrySendError::Closed(_)) => SendOutcome::Closed,
        }
    }
}
