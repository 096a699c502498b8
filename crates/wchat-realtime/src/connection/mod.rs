//! Connection lifecycle: per-connection handles, the user registry, and heartbeat.

pub mod handle;
pub mod heartbeat;
pub mod pool;
pub mod registry;

pub use handle::{ConnectionHandle, ConnectionState};
pub use pool::ConnectionPool;
pub use registry::ConnectionRegistry;
