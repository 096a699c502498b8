//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::mpsc;

use wchat_core::config::{AppConfig, DatabaseConfig, RealtimeConfig};
use wchat_core::error::AppError;
use wchat_core::result::AppResult;
use wchat_core::traits::PresenceStore;
use wchat_core::types::{ConnectionId, MessageRecord, RoomId, UserId};
use wchat_realtime::message::types::{InboundMessage, OutboundMessage};
use wchat_realtime::router::RouterHandle;
use wchat_realtime::server::RealtimeEngine;

/// Presence store that records every write, optionally failing them.
#[derive(Debug, Default)]
pub struct RecordingStore {
    writes: Mutex<Vec<(UserId, bool)>>,
    fail: bool,
}

impl RecordingStore {
    /// A store whose writes all fail after being recorded.
    pub fn failing() -> Self {
        Self {
            writes: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    /// Writes seen so far, in order.
    pub fn writes(&self) -> Vec<(UserId, bool)> {
        self.writes.lock().expect("store lock").clone()
    }

    /// Wait until at least `count` writes have been recorded.
    pub async fn wait_for_writes(&self, count: usize) -> Vec<(UserId, bool)> {
        tokio::time::timeout(Duration::from_secs(2), async {
            loop {
                let writes = self.writes();
                if writes.len() >= count {
                    return writes;
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("presence writes within timeout")
    }
}

#[async_trait]
impl PresenceStore for RecordingStore {
    async fn set_online(&self, user_id: &UserId, online: bool) -> AppResult<()> {
        self.writes
            .lock()
            .expect("store lock")
            .push((user_id.clone(), online));
        if self.fail {
            return Err(AppError::database("database is down"));
        }
        Ok(())
    }
}

/// Realtime engine wired to a recording store.
pub struct TestEngine {
    /// The engine under test.
    pub engine: RealtimeEngine,
    /// Presence writes issued by the engine.
    pub store: Arc<RecordingStore>,
}

impl TestEngine {
    /// Start an engine with default settings.
    pub fn new() -> Self {
        Self::with_store(RecordingStore::default())
    }

    /// Start an engine backed by the given store.
    pub fn with_store(store: RecordingStore) -> Self {
        let store = Arc::new(store);
        let engine = RealtimeEngine::new(RealtimeConfig::default(), store.clone());
        Self { engine, store }
    }

    /// Open an anonymous connection.
    pub async fn connect(&self) -> TestClient {
        let (id, rx) = self.engine.router.open().await.expect("open connection");
        TestClient {
            id,
            rx,
            router: self.engine.router.clone(),
        }
    }

    /// Open a connection and identify it as `user`.
    pub async fn connect_as(&self, user: &str) -> TestClient {
        let client = self.connect().await;
        client.identify(user).await;
        client
    }

    /// Wait until every previously sent command has been applied.
    ///
    /// Commands are processed in order, so once a reply-bearing command
    /// returns, all earlier events are sitting in the connection queues.
    pub async fn settle(&self) {
        self.engine.router.stats().await.expect("router stats");
    }
}

/// A connection driven directly through the router handle.
pub struct TestClient {
    /// Connection id.
    pub id: ConnectionId,
    rx: mpsc::Receiver<OutboundMessage>,
    router: RouterHandle,
}

impl TestClient {
    /// Send a client event.
    pub async fn send(&self, message: InboundMessage) {
        self.router
            .dispatch(self.id, message)
            .await
            .expect("dispatch");
    }

    pub async fn identify(&self, user: &str) {
        self.send(InboundMessage::Identify {
            user_id: UserId::new(user),
        })
        .await;
    }

    pub async fn join(&self, room: &str) {
        self.send(InboundMessage::JoinRoom {
            room_id: RoomId::new(room),
        })
        .await;
    }

    pub async fn leave(&self, room: &str) {
        self.send(InboundMessage::LeaveRoom {
            room_id: RoomId::new(room),
        })
        .await;
    }

    pub async fn typing(&self, room: &str) {
        self.send(InboundMessage::Typing {
            room_id: RoomId::new(room),
        })
        .await;
    }

    pub async fn stop_typing(&self, room: &str) {
        self.send(InboundMessage::StopTyping {
            room_id: RoomId::new(room),
        })
        .await;
    }

    pub async fn relay(&self, room: &str, data: Value) {
        self.send(InboundMessage::SendMsg {
            chat_id: RoomId::new(room),
            data,
        })
        .await;
    }

    /// Run the disconnect cascade for this connection.
    pub async fn close(&self) {
        self.router.close(self.id).await.expect("close");
    }

    /// Everything queued for this connection so far.
    pub fn drain(&mut self) -> Vec<OutboundMessage> {
        let mut out = Vec::new();
        while let Ok(msg) = self.rx.try_recv() {
            out.push(msg);
        }
        out
    }
}

pub fn user_online(user: &str) -> OutboundMessage {
    OutboundMessage::UserOnline {
        user_id: UserId::new(user),
    }
}

pub fn user_offline(user: &str) -> OutboundMessage {
    OutboundMessage::UserOffline {
        user_id: UserId::new(user),
    }
}

pub fn online_users(users: &[&str]) -> OutboundMessage {
    OutboundMessage::OnlineUsers {
        user_ids: users.iter().map(|u| UserId::new(*u)).collect(),
    }
}

pub fn typing(room: &str, user: &str) -> OutboundMessage {
    OutboundMessage::Typing {
        room_id: RoomId::new(room),
        user_id: UserId::new(user),
    }
}

pub fn stop_typing(room: &str, user: &str) -> OutboundMessage {
    OutboundMessage::StopTyping {
        room_id: RoomId::new(room),
        user_id: UserId::new(user),
    }
}

/// Configuration for tests that build the HTTP app. Nothing connects to
/// the database URL.
pub fn test_config() -> AppConfig {
    AppConfig {
        server: Default::default(),
        database: DatabaseConfig {
            url: "postgres://localhost/wchat_test".to_string(),
            max_connections: 1,
            min_connections: 0,
            connect_timeout_seconds: 1,
            idle_timeout_seconds: 1,
        },
        realtime: RealtimeConfig::default(),
        logging: Default::default(),
    }
}

/// A stored message as the chat write path would hand it over.
pub fn record(id: &str, chat: &str, sender: &str, content: &str) -> MessageRecord {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "chat_id": chat,
        "sender_id": sender,
        "content": content,
        "created_at": "2024-05-01T12:00:00Z",
    }))
    .expect("message record")
}
