//! Bridges persisted chat writes into room-scoped realtime delivery.

pub mod delivery;

pub use delivery::MessageDeliveryBridge;
