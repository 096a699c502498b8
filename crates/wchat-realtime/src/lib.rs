//! # wchat-realtime
//!
//! Real-time engine for the W-Chat server. Provides:
//!
//! - A connection registry mapping users to their live connections
//! - Online/offline presence transitions, broadcast exactly once each
//! - Chat-room membership used to scope typing and message events
//! - A single-owner router actor that serializes all registry mutations
//! - A delivery bridge that fans persisted messages out to chat rooms

pub mod bridge;
pub mod connection;
pub mod message;
pub mod metrics;
pub mod presence;
pub mod room;
pub mod router;
pub mod server;

pub use bridge::delivery::MessageDeliveryBridge;
pub use connection::registry::ConnectionRegistry;
pub use presence::tracker::PresenceTracker;
pub use room::membership::RoomMembership;
pub use router::handle::RouterHandle;
pub use server::RealtimeEngine;
