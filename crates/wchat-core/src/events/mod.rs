//! Domain events emitted by the chat CRUD path.
//!
//! The realtime engine consumes these after the underlying write has
//! succeeded and fans them out to the affected chat room.

pub mod chat;

pub use chat::ChatEvent;
