//! User presence tracking.

pub mod tracker;
pub mod writer;

pub use tracker::PresenceTracker;
pub use writer::PresenceWriter;
