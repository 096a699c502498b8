//! Connection pool: every open transport, identified or not.

use std::collections::HashMap;

use wchat_core::types::ConnectionId;

use super::handle::ConnectionHandle;

/// All live connections, keyed by id. Owned by the router actor.
#[derive(Debug, Default)]
pub struct ConnectionPool {
    by_id: HashMap<ConnectionId, ConnectionHandle>,
}

impl ConnectionPool {
    /// Creates a new empty connection pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a connection. Returns `false` if the id was already present.
    pub fn add(&mut self, handle: ConnectionHandle) -> bool {
        if self.by_id.contains_key(&handle.id) {
            return false;
        }
        self.by_id.insert(handle.id, handle);
        true
    }

    /// Removes a connection.
    pub fn remove(&mut self, conn_id: &ConnectionId) -> Option<ConnectionHandle> {
        self.by_id.remove(conn_id)
    }

    /// Gets a specific connection by ID.
    pub fn get(&self, conn_id: &ConnectionId) -> Option<&ConnectionHandle> {
        self.by_id.get(conn_id)
    }

    /// Gets a specific connection by ID, mutably.
    pub fn get_mut(&mut self, conn_id: &ConnectionId) -> Option<&mut ConnectionHandle> {
        self.by_id.get_mut(conn_id)
    }

    /// Iterates over all connections.
    pub fn iter(&self) -> impl Iterator<Item = &ConnectionHandle> {
        self.by_id.values()
    }

    /// Returns total number of open connections.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Returns whether no connection is open.
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Removes every connection, dropping their senders.
    pub fn drain(&mut self) -> Vec<ConnectionHandle> {
        self.by_id.drain().map(|(_, handle)| handle).collect()
    }
}
