//! Repository implementations.

pub mod user_presence;
