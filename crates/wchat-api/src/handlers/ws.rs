//! WebSocket upgrade handler.
//!
//! Each socket runs a reader loop on the upgrade task and a writer task
//! that forwards the router's outbound queue and sends heartbeat pings.
//! However the reader ends (close frame, transport error, heartbeat expiry,
//! router gone) it runs the disconnect cascade before returning.

use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use wchat_core::types::ConnectionId;
use wchat_realtime::connection::heartbeat::{HeartbeatConfig, HeartbeatMonitor};
use wchat_realtime::message::serializer::{decode_inbound, serialize_outbound};
use wchat_realtime::message::types::OutboundMessage;
use wchat_realtime::server::RealtimeEngine;

use crate::state::AppState;

/// How long the writer gets to flush after the router drops the connection.
const WRITER_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Frames above `max_message_size` are rejected by the validator and the
/// connection stays open. Only frames past this multiple of it make the
/// transport fail the socket.
const TRANSPORT_LIMIT_FACTOR: usize = 16;

/// Hard per-message limit handed to the WebSocket transport.
fn transport_limit(max_message_size: usize) -> usize {
    max_message_size.saturating_mul(TRANSPORT_LIMIT_FACTOR)
}

/// GET /ws: WebSocket upgrade
pub async fn ws_upgrade(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    let limit = transport_limit(state.realtime.config().max_message_size);
    ws.max_message_size(limit)
        .on_upgrade(move |socket| handle_socket(state.realtime, socket))
}

/// Handles an established WebSocket connection.
async fn handle_socket(engine: RealtimeEngine, socket: WebSocket) {
    let (conn_id, outbound_rx) = match engine.router.open().await {
        Ok(opened) => opened,
        Err(e) => {
            warn!(error = %e, "Rejecting WebSocket connection");
            return;
        }
    };

    info!(conn_id = %conn_id, "WebSocket connection established");

    let heartbeat = HeartbeatConfig::from(engine.config());
    let (ws_tx, ws_rx) = socket.split();
    let writer = tokio::spawn(write_loop(
        conn_id,
        ws_tx,
        outbound_rx,
        heartbeat.ping_interval,
    ));

    read_loop(&engine, conn_id, ws_rx, HeartbeatMonitor::new(heartbeat)).await;

    match engine.router.close(conn_id).await {
        Ok(()) => {}
        // Router shutdown already released every connection.
        Err(e) if e.is_unavailable() => {
            debug!(conn_id = %conn_id, "Router stopped before disconnect cleanup");
        }
        Err(e) => warn!(conn_id = %conn_id, error = %e, "Disconnect cleanup did not run"),
    }
    if tokio::time::timeout(WRITER_DRAIN_TIMEOUT, writer)
        .await
        .is_err()
    {
        debug!(conn_id = %conn_id, "Writer did not finish in time");
    }

    info!(conn_id = %conn_id, "WebSocket connection closed");
}

async fn read_loop(
    engine: &RealtimeEngine,
    conn_id: ConnectionId,
    mut ws_rx: SplitStream<WebSocket>,
    mut heartbeat: HeartbeatMonitor,
) {
    let max_message_size = engine.config().max_message_size;
    let mut liveness = tokio::time::interval(heartbeat.ping_interval());

    loop {
        tokio::select! {
            frame = ws_rx.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    heartbeat.record_pong();
                    match decode_inbound(text.as_str(), max_message_size) {
                        Ok(msg) => {
                            if engine.router.dispatch(conn_id, msg).await.is_err() {
                                break;
                            }
                        }
                        Err(e) => {
                            engine.metrics.message_rejected();
                            debug!(conn_id = %conn_id, error = %e, "Rejected inbound frame");
                        }
                    }
                }
                Some(Ok(Message::Pong(_))) => heartbeat.record_pong(),
                Some(Ok(Message::Close(_))) | None => break,
                // Pings are answered by the transport.
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    debug!(conn_id = %conn_id, error = %e, "WebSocket error");
                    break;
                }
            },
            _ = liveness.tick() => {
                if heartbeat.is_expired() {
                    info!(conn_id = %conn_id, "Heartbeat timed out");
                    break;
                }
            }
        }
    }
}

async fn write_loop(
    conn_id: ConnectionId,
    mut ws_tx: SplitSink<WebSocket, Message>,
    mut outbound_rx: mpsc::Receiver<OutboundMessage>,
    ping_interval: Duration,
) {
    let mut ping = tokio::time::interval(ping_interval);
    // The first tick completes immediately.
    ping.tick().await;

    loop {
        tokio::select! {
            outbound = outbound_rx.recv() => {
                let Some(msg) = outbound else {
                    let _ = ws_tx.send(Message::Close(None)).await;
                    break;
                };
                let json = match serialize_outbound(&msg) {
                    Ok(json) => json,
                    Err(e) => {
                        warn!(conn_id = %conn_id, kind = msg.kind(), error = %e, "Failed to serialize outbound message");
                        continue;
                    }
                };
                if ws_tx.send(Message::Text(json.into())).await.is_err() {
                    break;
                }
            }
            _ = ping.tick() => {
                if ws_tx.send(Message::Ping(Bytes::new())).await.is_err() {
                    break;
                }
            }
        }
    }
}
