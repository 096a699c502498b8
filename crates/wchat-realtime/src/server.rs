//! Top-level real-time engine that ties together all subsystems.

use std::sync::Arc;

use tracing::info;

use wchat_core::config::RealtimeConfig;
use wchat_core::result::AppResult;
use wchat_core::traits::PresenceStore;

use crate::bridge::delivery::MessageDeliveryBridge;
use crate::metrics::RealtimeMetrics;
use crate::router::actor::EventRouter;
use crate::router::handle::RouterHandle;

/// Central real-time engine that coordinates all WebSocket subsystems.
///
/// Must be created inside a tokio runtime; it spawns the router actor and
/// the presence writer.
#[derive(Clone)]
pub struct RealtimeEngine {
    /// Handle to the router actor.
    pub router: RouterHandle,
    /// Message delivery bridge (chat events → rooms).
    pub bridge: Arc<MessageDeliveryBridge>,
    /// Metrics collector.
    pub metrics: Arc<RealtimeMetrics>,
    config: Arc<RealtimeConfig>,
}

impl std::fmt::Debug for RealtimeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimeEngine").finish()
    }
}

impl RealtimeEngine {
    /// Creates a new real-time engine with all subsystems.
    pub fn new(config: RealtimeConfig, store: Arc<dyn PresenceStore>) -> Self {
        let metrics = Arc::new(RealtimeMetrics::new());
        let router = EventRouter::start(&config, store, Arc::clone(&metrics));
        let bridge = Arc::new(MessageDeliveryBridge::new(router.clone()));

        info!(
            outbound_buffer = config.outbound_buffer_size,
            ping_interval = config.ping_interval_seconds,
            "Real-time engine initialized"
        );

        Self {
            router,
            bridge,
            metrics,
            config: Arc::new(config),
        }
    }

    /// Engine configuration.
    pub fn config(&self) -> &RealtimeConfig {
        &self.config
    }

    /// Closes every connection and stops the router.
    pub async fn shutdown(&self) -> AppResult<()> {
        info!("Shutting down real-time engine");
        self.router.shutdown().await?;
        info!("Real-time engine shut down");
        Ok(())
    }
}
