//! # wchat-database
//!
//! PostgreSQL access for the realtime server: the connection pool and the
//! repository that persists each user's online flag.

pub mod connection;
pub mod repositories;

pub use connection::DatabasePool;
pub use repositories::user_presence::UserPresenceRepository;
