//! Collaborator traits implemented outside the realtime core.

pub mod presence;

pub use presence::PresenceStore;
