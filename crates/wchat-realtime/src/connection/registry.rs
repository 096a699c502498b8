//! Connection registry: which users are online, and through which connections.

use std::collections::{HashMap, HashSet};

use wchat_core::types::{ConnectionId, UserId};

/// Maps each identified user to the set of connections it currently holds.
///
/// A reverse index (connection → user) is maintained alongside the forward
/// map because a disconnect only knows its connection id. A user is online
/// iff its set is non-empty; empty sets are removed eagerly so the forward
/// map's key set is exactly the online user set.
///
/// The registry is not internally synchronized. It is owned by the router
/// actor, which serializes every mutation.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    /// User ID → connections held by that user.
    by_user: HashMap<UserId, HashSet<ConnectionId>>,
    /// Connection ID → owning user.
    owners: HashMap<ConnectionId, UserId>,
}

impl ConnectionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `conn_id` to `user_id`'s connection set.
    ///
    /// Returns `true` iff this was the user's first connection (the user
    /// just came online). Re-registering a connection is a no-op returning
    /// `false`, including an attempt to move it to a different user: a
    /// connection's owner is fixed at first registration.
    pub fn register(&mut self, user_id: UserId, conn_id: ConnectionId) -> bool {
        if let Some(owner) = self.owners.get(&conn_id) {
            if *owner != user_id {
                tracing::warn!(
                    conn_id = %conn_id,
                    owner = %owner,
                    requested = %user_id,
                    "Ignoring attempt to re-register connection under another user"
                );
            }
            return false;
        }

        self.owners.insert(conn_id, user_id.clone());
        let connections = self.by_user.entry(user_id).or_default();
        connections.insert(conn_id);
        connections.len() == 1
    }

    /// Removes `conn_id` from whichever user owns it.
    ///
    /// Returns the owner and whether its set is now empty (the user just
    /// went offline). Unknown connections yield `None`.
    pub fn unregister(&mut self, conn_id: &ConnectionId) -> Option<(UserId, bool)> {
        let user_id = self.owners.remove(conn_id)?;

        let became_offline = match self.by_user.get_mut(&user_id) {
            Some(connections) => {
                connections.remove(conn_id);
                if connections.is_empty() {
                    self.by_user.remove(&user_id);
                    true
                } else {
                    false
                }
            }
            None => {
                tracing::error!(
                    conn_id = %conn_id,
                    user_id = %user_id,
                    "Registry reverse index pointed at a user with no connection set"
                );
                true
            }
        };

        Some((user_id, became_offline))
    }

    /// Whether the user holds at least one connection.
    pub fn is_online(&self, user_id: &UserId) -> bool {
        self.by_user.contains_key(user_id)
    }

    /// The user that owns a connection.
    pub fn owner_of(&self, conn_id: &ConnectionId) -> Option<&UserId> {
        self.owners.get(conn_id)
    }

    /// All connections held by a user.
    pub fn connections_of(&self, user_id: &UserId) -> Vec<ConnectionId> {
        self.by_user
            .get(user_id)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Every online user, sorted for stable snapshots.
    pub fn online_users(&self) -> Vec<UserId> {
        let mut users: Vec<UserId> = self.by_user.keys().cloned().collect();
        users.sort();
        users
    }

    /// Number of identified connections.
    pub fn connection_count(&self) -> usize {
        self.owners.len()
    }

    /// Number of online users.
    pub fn user_count(&self) -> usize {
        self.by_user.len()
    }
}
