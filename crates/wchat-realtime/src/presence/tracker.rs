//! Presence tracker: turns registry transitions into persistence + broadcasts.

use std::sync::Arc;

use tracing::info;

use wchat_core::types::UserId;

use super::writer::PresenceWriter;
use crate::connection::registry::ConnectionRegistry;
use crate::message::types::OutboundMessage;
use crate::metrics::RealtimeMetrics;

/// Derives online/offline events from registry results.
///
/// Acts only when the registry reports an actual transition, so one user
/// with several connections produces one `user_online` per online span and
/// one `user_offline` per return to zero connections. The persistence write
/// is queued, never awaited: the broadcast decision rests on registry state
/// alone.
#[derive(Debug)]
pub struct PresenceTracker {
    writer: PresenceWriter,
    metrics: Arc<RealtimeMetrics>,
}

impl PresenceTracker {
    /// Create a new presence tracker
    pub fn new(writer: PresenceWriter, metrics: Arc<RealtimeMetrics>) -> Self {
        Self { writer, metrics }
    }

    /// Handle the result of a registry `register`.
    ///
    /// Returns the global `user_online` event to broadcast, if any.
    pub fn on_registered(&self, user_id: &UserId, became_online: bool) -> Option<OutboundMessage> {
        if !became_online {
            return None;
        }
        info!(user_id = %user_id, "User is online");
        self.metrics.presence_transition();
        self.writer.enqueue(user_id.clone(), true);
        Some(OutboundMessage::UserOnline {
            user_id: user_id.clone(),
        })
    }

    /// Handle the result of a registry `unregister`.
    ///
    /// Returns the global `user_offline` event to broadcast, if any.
    pub fn on_unregistered(
        &self,
        user_id: &UserId,
        became_offline: bool,
    ) -> Option<OutboundMessage> {
        if !became_offline {
            return None;
        }
        info!(user_id = %user_id, "User is offline");
        self.metrics.presence_transition();
        self.writer.enqueue(user_id.clone(), false);
        Some(OutboundMessage::UserOffline {
            user_id: user_id.clone(),
        })
    }

    /// The one-time snapshot sent to a newly identified connection.
    pub fn snapshot(&self, registry: &ConnectionRegistry) -> OutboundMessage {
        OutboundMessage::OnlineUsers {
            user_ids: registry.online_users(),
        }
    }
}
