//! Realtime engine metrics.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Engine-level counters, shared between the router and the transport tasks.
#[derive(Debug, Default)]
pub struct RealtimeMetrics {
    connections_total: AtomicU64,
    connections_active: AtomicU64,
    identifications: AtomicU64,
    presence_transitions: AtomicU64,
    messages_received: AtomicU64,
    messages_rejected: AtomicU64,
    events_sent: AtomicU64,
    events_dropped: AtomicU64,
}

impl RealtimeMetrics {
    /// Create new zeroed metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// A transport connection opened.
    pub fn connection_opened(&self) {
        self.connections_total.fetch_add(1, Ordering::Relaxed);
        self.connections_active.fetch_add(1, Ordering::Relaxed);
    }

    /// A transport connection closed.
    pub fn connection_closed(&self) {
        let _ = self
            .connections_active
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |v| v.checked_sub(1));
    }

    /// A connection identified itself.
    pub fn connection_identified(&self) {
        self.identifications.fetch_add(1, Ordering::Relaxed);
    }

    /// A user went online or offline.
    pub fn presence_transition(&self) {
        self.presence_transitions.fetch_add(1, Ordering::Relaxed);
    }

    /// An inbound event was accepted for routing.
    pub fn message_received(&self) {
        self.messages_received.fetch_add(1, Ordering::Relaxed);
    }

    /// An inbound frame failed to decode or validate.
    pub fn message_rejected(&self) {
        self.messages_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Events queued to connections.
    pub fn events_sent(&self, count: u64) {
        self.events_sent.fetch_add(count, Ordering::Relaxed);
    }

    /// Events dropped because a connection queue was full or closed.
    pub fn events_dropped(&self, count: u64) {
        self.events_dropped.fetch_add(count, Ordering::Relaxed);
    }

    /// Get a snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            connections_total: self.connections_total.load(Ordering::Relaxed),
            connections_active: self.connections_active.load(Ordering::Relaxed),
            identifications: self.identifications.load(Ordering::Relaxed),
            presence_transitions: self.presence_transitions.load(Ordering::Relaxed),
            messages_received: self.messages_received.load(Ordering::Relaxed),
            messages_rejected: self.messages_rejected.load(Ordering::Relaxed),
            events_sent: self.events_sent.load(Ordering::Relaxed),
            events_dropped: self.events_dropped.load(Ordering::Relaxed),
        }
    }
}

/// Serializable metrics snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Connections ever opened
    pub connections_total: u64,
    /// Connections currently open
    pub connections_active: u64,
    /// Successful identify events
    pub identifications: u64,
    /// Online plus offline transitions
    pub presence_transitions: u64,
    /// Inbound events routed
    pub messages_received: u64,
    /// Inbound frames rejected
    pub messages_rejected: u64,
    /// Outbound events queued
    pub events_sent: u64,
    /// Outbound events dropped
    pub events_dropped: u64,
}
