//! Chat-room membership used to scope room broadcasts.

pub mod membership;

pub use membership::RoomMembership;
