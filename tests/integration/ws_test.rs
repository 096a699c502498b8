//! End-to-end tests over a real WebSocket connection.

mod helpers;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use futures::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tower::ServiceExt;

use helpers::{RecordingStore, test_config};
use wchat_api::{AppState, build_router};
use wchat_core::types::ConnectionId;
use wchat_realtime::router::RouterStats;
use wchat_realtime::server::RealtimeEngine;

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

struct TestServer {
    addr: SocketAddr,
    app: Router,
    engine: RealtimeEngine,
}

impl TestServer {
    async fn start() -> Self {
        let config = test_config();
        let engine = RealtimeEngine::new(
            config.realtime.clone(),
            Arc::new(RecordingStore::default()),
        );
        let app = build_router(AppState::new(config, engine.clone()));

        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let serve_app = app.clone();
        tokio::spawn(async move {
            axum::serve(listener, serve_app).await.expect("serve");
        });

        Self { addr, app, engine }
    }

    async fn connect(&self) -> Client {
        let (client, _) = connect_async(format!("ws://{}/ws", self.addr))
            .await
            .expect("connect");
        client
    }

    /// Wait until the router's counters satisfy `done`.
    async fn wait_until(&self, done: impl Fn(&RouterStats) -> bool) {
        tokio::time::timeout(Duration::from_secs(2), async {
            loop {
                let stats = self.engine.router.stats().await.expect("stats");
                if done(&stats) {
                    return;
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("router state within timeout");
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let response = self
            .app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
            .await
            .expect("response");
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("body");
        (status, serde_json::from_slice(&body).expect("json"))
    }
}

async fn send(client: &mut Client, value: Value) {
    client
        .send(Message::text(value.to_string()))
        .await
        .expect("send");
}

/// Next JSON event, skipping control frames.
async fn recv(client: &mut Client) -> Value {
    tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            match client.next().await.expect("stream open").expect("frame") {
                Message::Text(text) => return serde_json::from_str(text.as_str()).expect("json"),
                Message::Close(_) => panic!("connection closed"),
                _ => continue,
            }
        }
    })
    .await
    .expect("event within timeout")
}

/// Asserts nothing arrives for a short while.
async fn assert_silent(client: &mut Client) {
    let next = tokio::time::timeout(Duration::from_millis(200), client.next()).await;
    assert!(next.is_err(), "unexpected frame: {next:?}");
}

#[tokio::test]
async fn test_identify_and_presence_over_websocket() {
    let server = TestServer::start().await;
    let mut alice = server.connect().await;
    let mut bob = server.connect().await;
    server.wait_until(|s| s.open_connections == 2).await;

    send(&mut alice, json!({"type": "identify", "user_id": "alice"})).await;
    assert_eq!(
        recv(&mut alice).await,
        json!({"type": "online_users", "user_ids": ["alice"]})
    );
    assert_eq!(
        recv(&mut bob).await,
        json!({"type": "user_online", "user_id": "alice"})
    );

    send(&mut bob, json!({"type": "identify", "user_id": "bob"})).await;
    assert_eq!(
        recv(&mut bob).await,
        json!({"type": "online_users", "user_ids": ["alice", "bob"]})
    );
    assert_eq!(
        recv(&mut alice).await,
        json!({"type": "user_online", "user_id": "bob"})
    );

    bob.close(None).await.expect("close");
    assert_eq!(
        recv(&mut alice).await,
        json!({"type": "user_offline", "user_id": "bob"})
    );
}

#[tokio::test]
async fn test_typing_over_websocket_is_room_scoped() {
    let server = TestServer::start().await;
    let mut alice = server.connect().await;
    let mut bob = server.connect().await;
    server.wait_until(|s| s.open_connections == 2).await;

    send(&mut alice, json!({"type": "identify", "user_id": "alice"})).await;
    recv(&mut alice).await;
    recv(&mut bob).await;
    send(&mut bob, json!({"type": "identify", "user_id": "bob"})).await;
    recv(&mut bob).await;
    recv(&mut alice).await;

    send(&mut alice, json!({"type": "join_room", "room_id": "chat-42"})).await;
    server.wait_until(|s| s.active_rooms == 1).await;

    // Bob's join is routed before his typing, so seeing it proves both joins.
    send(&mut bob, json!({"type": "join_room", "room_id": "chat-42"})).await;
    send(&mut bob, json!({"type": "typing", "room_id": "chat-42"})).await;
    assert_eq!(
        recv(&mut alice).await,
        json!({"type": "typing", "room_id": "chat-42", "user_id": "bob"})
    );

    send(&mut alice, json!({"type": "typing", "room_id": "chat-42"})).await;
    assert_eq!(
        recv(&mut bob).await,
        json!({"type": "typing", "room_id": "chat-42", "user_id": "alice"})
    );
    assert_silent(&mut alice).await;
}

#[tokio::test]
async fn test_malformed_frames_do_not_close_the_connection() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;

    client
        .send(Message::text("not json"))
        .await
        .expect("send");
    send(&mut client, json!({"type": "add_friend", "id": "x"})).await;
    send(&mut client, json!({"type": "identify", "user_id": ""})).await;
    send(&mut client, json!({"type": "identify", "user_id": "carol"})).await;

    assert_eq!(
        recv(&mut client).await,
        json!({"type": "online_users", "user_ids": ["carol"]})
    );
    assert_eq!(server.engine.metrics.snapshot().messages_rejected, 3);
}

#[tokio::test]
async fn test_detailed_health_counts_live_connections() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;
    send(&mut client, json!({"type": "identify", "user_id": "dave"})).await;
    recv(&mut client).await;

    let (status, body) = server.get("/api/health/detailed").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["ws_connections"], 1);
    assert_eq!(body["data"]["online_users"], 1);

    let (status, body) = server.get("/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ok");
}

#[tokio::test]
async fn test_oversized_frame_is_rejected_without_disconnect() {
    let server = TestServer::start().await;
    let mut carol = server.connect().await;
    let mut observer = server.connect().await;
    server.wait_until(|s| s.open_connections == 2).await;

    send(&mut carol, json!({"type": "identify", "user_id": "carol"})).await;
    recv(&mut carol).await;
    recv(&mut observer).await;

    let content = "x".repeat(70_000);
    send(
        &mut carol,
        json!({"type": "send_msg", "chat_id": "chat-1", "data": {"content": content}}),
    )
    .await;
    // Routed only if the reader kept going after the oversized frame.
    send(&mut carol, json!({"type": "join_room", "room_id": "chat-1"})).await;
    server.wait_until(|s| s.active_rooms == 1).await;

    let stats = server.engine.router.stats().await.expect("stats");
    assert_eq!(stats.open_connections, 2);
    assert_eq!(stats.online_users, 1);
    assert_eq!(server.engine.metrics.snapshot().messages_rejected, 1);
    assert_silent(&mut observer).await;
}

#[tokio::test]
async fn test_engine_shutdown_closes_open_sockets() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;
    send(&mut client, json!({"type": "identify", "user_id": "erin"})).await;
    recv(&mut client).await;

    server.engine.shutdown().await.expect("shutdown");

    tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            match client.next().await {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => return,
                Some(Ok(_)) => continue,
            }
        }
    })
    .await
    .expect("socket closed after shutdown");

    // The socket task's own cleanup sees this and stays quiet.
    let err = server
        .engine
        .router
        .close(ConnectionId::new())
        .await
        .unwrap_err();
    assert!(err.is_unavailable());
}
