//! Room membership index: which connections are joined to which chat rooms.

use std::collections::{HashMap, HashSet};

use wchat_core::types::{ConnectionId, RoomId};

/// Two-way index between rooms and the connections joined to them.
///
/// Membership is per connection, not per user, so several devices of one
/// user can sit in the same room independently. No authorization happens
/// here: the chat CRUD layer decides who may join before a join is issued.
#[derive(Debug, Default)]
pub struct RoomMembership {
    /// Room ID → joined connections.
    rooms: HashMap<RoomId, HashSet<ConnectionId>>,
    /// Connection ID → joined rooms (reverse index).
    joined: HashMap<ConnectionId, HashSet<RoomId>>,
}

impl RoomMembership {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Joins a connection to a room. Returns `false` if already joined.
    pub fn join(&mut self, conn_id: ConnectionId, room_id: RoomId) -> bool {
        let added = self
            .rooms
            .entry(room_id.clone())
            .or_default()
            .insert(conn_id);
        if added {
            self.joined.entry(conn_id).or_default().insert(room_id);
        }
        added
    }

    /// Removes a connection from one room. Returns `false` if it was not joined.
    pub fn leave(&mut self, conn_id: ConnectionId, room_id: &RoomId) -> bool {
        let removed = self.detach(conn_id, room_id);
        if removed {
            if let Some(rooms) = self.joined.get_mut(&conn_id) {
                rooms.remove(room_id);
                if rooms.is_empty() {
                    self.joined.remove(&conn_id);
                }
            }
        }
        removed
    }

    /// Removes a connection from every room it joined, returning those rooms.
    pub fn leave_all(&mut self, conn_id: ConnectionId) -> Vec<RoomId> {
        let rooms = self.joined.remove(&conn_id).unwrap_or_default();
        for room_id in &rooms {
            self.detach(conn_id, room_id);
        }
        rooms.into_iter().collect()
    }

    /// Connections joined to a room.
    pub fn members(&self, room_id: &RoomId) -> Vec<ConnectionId> {
        self.rooms
            .get(room_id)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Number of rooms with at least one member.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Drops `conn_id` from the room's member set, removing the room when empty.
    fn detach(&mut self, conn_id: ConnectionId, room_id: &RoomId) -> bool {
        let Some(members) = self.rooms.get_mut(room_id) else {
            return false;
        };
        let removed = members.remove(&conn_id);
        if members.is_empty() {
            self.rooms.remove(room_id);
        }
        removed
    }
}
