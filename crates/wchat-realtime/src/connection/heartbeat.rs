//! Ping/pong liveness tracking for WebSocket connections.

use std::time::Duration;

use tokio::time::Instant;

use wchat_core::config::RealtimeConfig;

/// Heartbeat configuration
#[derive(Debug, Clone, Copy)]
pub struct HeartbeatConfig {
    /// Interval between pings
    pub ping_interval: Duration,
    /// Grace period after an interval before the peer is considered dead
    pub ping_timeout: Duration,
}

impl From<&RealtimeConfig> for HeartbeatConfig {
    fn from(config: &RealtimeConfig) -> Self {
        Self {
            ping_interval: Duration::from_secs(config.ping_interval_seconds.max(1)),
            ping_timeout: Duration::from_secs(config.ping_timeout_seconds),
        }
    }
}

/// Tracks the last pong seen on one connection.
///
/// The transport loop pings every `ping_interval` and asks
/// [`HeartbeatMonitor::is_expired`] on each tick; an expired monitor means
/// the connection terminated abnormally and must run the disconnect cascade.
#[derive(Debug)]
pub struct HeartbeatMonitor {
    config: HeartbeatConfig,
    last_pong: Instant,
}

impl HeartbeatMonitor {
    /// Start tracking from now.
    pub fn new(config: HeartbeatConfig) -> Self {
        Self {
            config,
            last_pong: Instant::now(),
        }
    }

    /// Interval at which to send pings.
    pub fn ping_interval(&self) -> Duration {
        self.config.ping_interval
    }

    /// Record a pong (or any other sign of life).
    pub fn record_pong(&mut self) {
        self.last_pong = Instant::now();
    }

    /// Whether the peer has been silent longer than interval + timeout.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    fn is_expired_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.last_pong)
            > self.config.ping_interval + self.config.ping_timeout
    }
}
