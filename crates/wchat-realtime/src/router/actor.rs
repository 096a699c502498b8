//! The router actor task.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use wchat_core::config::RealtimeConfig;
use wchat_core::traits::PresenceStore;
use wchat_core::types::{ConnectionId, RoomId, UserId};

use super::command::{RouterCommand, RouterStats};
use super::handle::RouterHandle;
use crate::connection::handle::{ConnectionHandle, SendOutcome};
use crate::connection::pool::ConnectionPool;
use crate::connection::registry::ConnectionRegistry;
use crate::message::types::{InboundMessage, OutboundMessage, ReceivedMessage};
use crate::metrics::RealtimeMetrics;
use crate::presence::tracker::PresenceTracker;
use crate::presence::writer::PresenceWriter;
use crate::room::membership::RoomMembership;

/// Owns every open connection, the user registry, and room membership.
///
/// Commands are applied one at a time and never await, so each presence
/// transition and its broadcast form one step that no other connection's
/// event can interleave with.
#[derive(Debug)]
pub struct EventRouter {
    rx: mpsc::Receiver<RouterCommand>,
    pool: ConnectionPool,
    registry: ConnectionRegistry,
    rooms: RoomMembership,
    presence: PresenceTracker,
    writer_task: JoinHandle<()>,
    metrics: Arc<RealtimeMetrics>,
}

impl EventRouter {
    /// Spawns the router on the current runtime and returns its handle.
    pub fn start(
        config: &RealtimeConfig,
        store: Arc<dyn PresenceStore>,
        metrics: Arc<RealtimeMetrics>,
    ) -> RouterHandle {
        let (tx, rx) = mpsc::channel(config.command_buffer_size.max(1));
        let (writer, writer_task) = PresenceWriter::spawn(store);
        let router = Self {
            rx,
            pool: ConnectionPool::new(),
            registry: ConnectionRegistry::new(),
            rooms: RoomMembership::new(),
            presence: PresenceTracker::new(writer, Arc::clone(&metrics)),
            writer_task,
            metrics,
        };
        tokio::spawn(router.run());
        RouterHandle::new(tx, config.outbound_buffer_size.max(1))
    }

    async fn run(mut self) {
        info!("Event router started");
        let mut stopped_by = None;
        while let Some(cmd) = self.rx.recv().await {
            match cmd {
                RouterCommand::Open { conn_id, sender } => self.open(conn_id, sender),
                RouterCommand::Inbound { conn_id, message } => self.inbound(conn_id, message),
                RouterCommand::Close { conn_id, reply } => {
                    self.close(conn_id);
                    let _ = reply.send(());
                }
                RouterCommand::DeliverToRoom {
                    room_id,
                    message,
                    reply,
                } => {
                    let delivered = self.broadcast_room(&room_id, message, None);
                    let _ = reply.send(delivered);
                }
                RouterCommand::OnlineUsers { reply } => {
                    let _ = reply.send(self.registry.online_users());
                }
                RouterCommand::Stats { reply } => {
                    let _ = reply.send(self.stats());
                }
                RouterCommand::Shutdown { reply } => {
                    self.shutdown();
                    stopped_by = Some(reply);
                    break;
                }
            }
        }
        self.stop(stopped_by).await;
    }

    /// Stops taking commands, then waits for queued presence writes.
    async fn stop(self, reply: Option<oneshot::Sender<()>>) {
        let Self {
            rx,
            presence,
            writer_task,
            ..
        } = self;
        drop(rx);
        // The tracker owns the only writer sender.
        drop(presence);
        if let Err(e) = writer_task.await {
            warn!(error = %e, "Presence writer task failed");
        }
        info!("Event router stopped");
        if let Some(reply) = reply {
            let _ = reply.send(());
        }
    }

    fn open(&mut self, conn_id: ConnectionId, sender: mpsc::Sender<OutboundMessage>) {
        if !self.pool.add(ConnectionHandle::new(conn_id, sender)) {
            debug!(conn_id = %conn_id, "Connection already open");
            return;
        }
        self.metrics.connection_opened();
        debug!(conn_id = %conn_id, "Connection opened");
    }

    fn inbound(&mut self, conn_id: ConnectionId, message: InboundMessage) {
        let Some(handle) = self.pool.get(&conn_id) else {
            debug!(conn_id = %conn_id, kind = message.kind(), "Event from unknown connection dropped");
            return;
        };
        let sender = handle.user_id().cloned();
        if sender.is_some() || matches!(message, InboundMessage::Identify { .. }) {
            self.metrics.message_received();
        }

        match (message, sender) {
            (InboundMessage::Identify { user_id }, _) => self.identify(conn_id, user_id),
            (message, None) => {
                debug!(conn_id = %conn_id, kind = message.kind(), "Event from anonymous connection dropped");
            }
            (InboundMessage::JoinRoom { room_id }, Some(user_id)) => {
                if self.rooms.join(conn_id, room_id.clone()) {
                    debug!(conn_id = %conn_id, user_id = %user_id, room_id = %room_id, "Joined room");
                }
            }
            (InboundMessage::LeaveRoom { room_id }, Some(user_id)) => {
                if self.rooms.leave(conn_id, &room_id) {
                    debug!(conn_id = %conn_id, user_id = %user_id, room_id = %room_id, "Left room");
                }
            }
            (InboundMessage::Typing { room_id }, Some(user_id)) => {
                let event = OutboundMessage::Typing {
                    room_id: room_id.clone(),
                    user_id,
                };
                self.to_room_peers(conn_id, &room_id, event);
            }
            (InboundMessage::StopTyping { room_id }, Some(user_id)) => {
                let event = OutboundMessage::StopTyping {
                    room_id: room_id.clone(),
                    user_id,
                };
                self.to_room_peers(conn_id, &room_id, event);
            }
            (InboundMessage::SendMsg { chat_id, data }, Some(_)) => {
                let event = OutboundMessage::MessageReceived {
                    message: ReceivedMessage::Relayed(data),
                };
                self.to_room_peers(conn_id, &chat_id, event);
            }
        }
    }

    /// Sends a client's room event to every other member of the room.
    fn to_room_peers(&self, from: ConnectionId, room_id: &RoomId, event: OutboundMessage) {
        let kind = event.kind();
        let delivered = self.broadcast_room(room_id, event, Some(from));
        debug!(conn_id = %from, room_id = %room_id, kind, delivered, "Room event routed");
    }

    fn identify(&mut self, conn_id: ConnectionId, user_id: UserId) {
        let Some(handle) = self.pool.get_mut(&conn_id) else {
            return;
        };
        if !handle.identify(user_id.clone()) {
            debug!(
                conn_id = %conn_id,
                requested = %user_id,
                "Connection already identified, ignoring"
            );
            return;
        }
        self.metrics.connection_identified();

        let became_online = self.registry.register(user_id.clone(), conn_id);
        info!(conn_id = %conn_id, user_id = %user_id, "Connection identified");

        let snapshot = self.presence.snapshot(&self.registry);
        self.send_to(conn_id, snapshot);

        if let Some(event) = self.presence.on_registered(&user_id, became_online) {
            self.broadcast_all(event, Some(conn_id));
        }
    }

    fn close(&mut self, conn_id: ConnectionId) {
        let Some(mut handle) = self.pool.remove(&conn_id) else {
            debug!(conn_id = %conn_id, "Close for unknown connection ignored");
            return;
        };
        handle.terminate();
        drop(handle);
        self.metrics.connection_closed();
        self.release(conn_id);
        debug!(conn_id = %conn_id, "Connection closed");
    }

    /// Leaves every room, unregisters, and announces the offline transition.
    fn release(&mut self, conn_id: ConnectionId) {
        let left = self.rooms.leave_all(conn_id);
        if !left.is_empty() {
            debug!(conn_id = %conn_id, rooms = left.len(), "Left all rooms");
        }

        if let Some((user_id, became_offline)) = self.registry.unregister(&conn_id) {
            if let Some(event) = self.presence.on_unregistered(&user_id, became_offline) {
                self.broadcast_all(event, None);
            }
        }
    }

    fn shutdown(&mut self) {
        if self.pool.is_empty() {
            debug!("No open connections at shutdown");
            return;
        }
        let handles = self.pool.drain();
        info!(connections = handles.len(), "Closing all connections");
        for mut handle in handles {
            handle.terminate();
            self.metrics.connection_closed();
            self.release(handle.id);
        }
    }

    fn stats(&self) -> RouterStats {
        RouterStats {
            open_connections: self.pool.len(),
            identified_connections: self.registry.connection_count(),
            online_users: self.registry.user_count(),
            active_rooms: self.rooms.room_count(),
        }
    }

    fn send_to(&self, conn_id: ConnectionId, message: OutboundMessage) {
        if let Some(handle) = self.pool.get(&conn_id) {
            self.record(handle.send(message));
        }
    }

    /// Sends to every open connection, identified or not.
    fn broadcast_all(&self, message: OutboundMessage, exclude: Option<ConnectionId>) -> usize {
        let mut delivered = 0;
        for handle in self.pool.iter() {
            if Some(handle.id) == exclude {
                continue;
            }
            if self.record(handle.send(message.clone())) {
                delivered += 1;
            }
        }
        delivered
    }

    fn broadcast_room(
        &self,
        room_id: &RoomId,
        message: OutboundMessage,
        exclude: Option<ConnectionId>,
    ) -> usize {
        let mut delivered = 0;
        for conn_id in self.rooms.members(room_id) {
            if Some(conn_id) == exclude {
                continue;
            }
            let Some(handle) = self.pool.get(&conn_id) else {
                continue;
            };
            if self.record(handle.send(message.clone())) {
                delivered += 1;
            }
        }
        delivered
    }

    fn record(&self, outcome: SendOutcome) -> bool {
        match outcome {
            SendOutcome::Queued => {
                self.metrics.events_sent(1);
                true
            }
            SendOutcome::Full | SendOutcome::Closed => {
                self.metrics.events_dropped(1);
                false
            }
        }
    }
}
