//! Response DTOs.

use serde::{Deserialize, Serialize};

use wchat_realtime::metrics::MetricsSnapshot;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Basic health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status string.
    pub status: String,
    /// Server version.
    pub version: String,
}

/// Detailed health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedHealthResponse {
    /// Overall status.
    pub status: String,
    /// Server version.
    pub version: String,
    /// Open WebSocket connections.
    pub ws_connections: usize,
    /// Users with at least one identified connection.
    pub online_users: usize,
    /// Chat rooms with at least one member.
    pub active_rooms: usize,
    /// Realtime engine counters.
    pub metrics: MetricsSnapshot,
}
