//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use wchat_core::config::AppConfig;
use wchat_realtime::server::RealtimeEngine;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// WebSocket realtime engine
    pub realtime: RealtimeEngine,
}

impl AppState {
    /// Create the shared state.
    pub fn new(config: AppConfig, realtime: RealtimeEngine) -> Self {
        Self {
            config: Arc::new(config),
            realtime,
        }
    }
}
