//! Cloneable handle for talking to the router actor.

use tokio::sync::{mpsc, oneshot};

use wchat_core::error::AppError;
use wchat_core::result::AppResult;
use wchat_core::types::{ConnectionId, RoomId, UserId};

use super::command::{RouterCommand, RouterStats};
use crate::message::types::{InboundMessage, OutboundMessage};

/// Handle for communicating with the [`EventRouter`](super::EventRouter).
#[derive(Clone, Debug)]
pub struct RouterHandle {
    tx: mpsc::Sender<RouterCommand>,
    outbound_buffer: usize,
}

impl RouterHandle {
    pub(crate) fn new(tx: mpsc::Sender<RouterCommand>, outbound_buffer: usize) -> Self {
        Self {
            tx,
            outbound_buffer,
        }
    }

    /// Opens a new anonymous connection.
    ///
    /// Returns its id and the queue of events to write to the transport.
    /// The queue closes when the router drops the connection.
    pub async fn open(&self) -> AppResult<(ConnectionId, mpsc::Receiver<OutboundMessage>)> {
        let conn_id = ConnectionId::new();
        let (sender, receiver) = mpsc::channel(self.outbound_buffer);
        self.send(RouterCommand::Open { conn_id, sender }).await?;
        Ok((conn_id, receiver))
    }

    /// Routes a decoded client event.
    pub async fn dispatch(&self, conn_id: ConnectionId, message: InboundMessage) -> AppResult<()> {
        self.send(RouterCommand::Inbound { conn_id, message }).await
    }

    /// Runs the disconnect cascade and waits until it has been applied.
    ///
    /// Any command sent after this returns observes the connection as gone.
    pub async fn close(&self, conn_id: ConnectionId) -> AppResult<()> {
        let (reply, rx) = oneshot::channel();
        self.send(RouterCommand::Close { conn_id, reply }).await?;
        rx.await.map_err(|_| router_stopped())
    }

    /// Delivers an event to every connection joined to `room_id`.
    ///
    /// Returns how many connections the event was queued to.
    pub async fn deliver_to_room(
        &self,
        room_id: RoomId,
        message: OutboundMessage,
    ) -> AppResult<usize> {
        let (reply, rx) = oneshot::channel();
        self.send(RouterCommand::DeliverToRoom {
            room_id,
            message,
            reply,
        })
        .await?;
        rx.await.map_err(|_| router_stopped())
    }

    /// Users currently online, sorted.
    pub async fn online_users(&self) -> AppResult<Vec<UserId>> {
        let (reply, rx) = oneshot::channel();
        self.send(RouterCommand::OnlineUsers { reply }).await?;
        rx.await.map_err(|_| router_stopped())
    }

    /// Registry and room counters.
    pub async fn stats(&self) -> AppResult<RouterStats> {
        let (reply, rx) = oneshot::channel();
        self.send(RouterCommand::Stats { reply }).await?;
        rx.await.map_err(|_| router_stopped())
    }

    /// Closes all connections, flushes queued presence writes, and stops
    /// the router. Idempotent.
    pub async fn shutdown(&self) -> AppResult<()> {
        let (reply, rx) = oneshot::channel();
        if self.tx.send(RouterCommand::Shutdown { reply }).await.is_err() {
            return Ok(());
        }
        let _ = rx.await;
        Ok(())
    }

    async fn send(&self, cmd: RouterCommand) -> AppResult<()> {
        self.tx.send(cmd).await.map_err(|_| router_stopped())
    }
}

fn router_stopped() -> AppError {
    AppError::service_unavailable("Realtime router is not running")
}
