//! Chat domain event → room delivery.
//!
//! Called by the message creation path once a write has been persisted.
//! Delivery is best-effort: a connection whose queue is full or closed
//! misses the event, and a stopped router is logged rather than surfaced
//! to the caller, whose write has already succeeded.

use tracing::{debug, warn};

use wchat_core::events::ChatEvent;
use wchat_core::types::{MessageRecord, RoomId, SeenReceipt};

use crate::message::types::OutboundMessage;
use crate::router::handle::RouterHandle;

/// Bridges chat events into the realtime system.
#[derive(Debug, Clone)]
pub struct MessageDeliveryBridge {
    router: RouterHandle,
}

impl MessageDeliveryBridge {
    /// Create a new delivery bridge
    pub fn new(router: RouterHandle) -> Self {
        Self { router }
    }

    /// Deliver a new message to every connection joined to its chat,
    /// including the author's own connections.
    pub async fn on_message_created(&self, record: MessageRecord) -> usize {
        let room_id = record.chat_id.clone();
        let message_id = record.id.clone();
        let delivered = self.deliver(room_id, record.into()).await;
        debug!(message_id = %message_id, delivered, "Message delivered");
        delivered
    }

    /// Deliver a read receipt to the chat's room.
    pub async fn on_message_seen(&self, receipt: SeenReceipt) -> usize {
        let room_id = receipt.chat_id.clone();
        self.deliver(room_id, receipt.into()).await
    }

    /// Handle any chat domain event.
    pub async fn dispatch(&self, event: ChatEvent) -> usize {
        match event {
            ChatEvent::MessageCreated { message } => self.on_message_created(message).await,
            ChatEvent::MessageSeen { receipt } => self.on_message_seen(receipt).await,
        }
    }

    async fn deliver(&self, room_id: RoomId, message: OutboundMessage) -> usize {
        let kind = message.kind();
        match self.router.deliver_to_room(room_id.clone(), message).await {
            Ok(delivered) => delivered,
            Err(e) => {
                warn!(room_id = %room_id, kind, error = %e, "Failed to deliver chat event");
                0
            }
        }
    }
}
