use std::collections::HashMap;

use uuid::Uuid;

use crate::error::GameError;
use crate::game::{Player, Room};

/// Which room, if any, a live connection currently sits in. At most one
/// room per connection; unbinding twice is a no-op.
#[derive(Default)]
pub struct ConnectionRegistry {
    bindings: HashMap<Uuid, String>,
}

impl ConnectionRegistry {
    pub fn bind(&mut self, conn: Uuid, room: &str) {
        self.bindings.insert(conn, room.to_string());
    }

    /// Returns the prior binding so the caller knows which room to clean
    /// up on disconnect.
    pub fn unbind(&mut self, conn: Uuid) -> Option<String> {
        self.bindings.remove(&conn)
    }

    pub fn room_of(&self, conn: Uuid) -> Option<&str> {
        self.bindings.get(&conn).map(String::as_str)
    }
}

/// Outcome of [`RoomStore::remove_player`], so callers know whether a
/// roster broadcast is still due or the room is already gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    Removed,
    RoomDestroyed,
    NotFound,
}

#[derive(Default)]
pub struct RoomStore {
    rooms: HashMap<String, Room>,
}

impl RoomStore {
    pub fn create_room(&mut self, name: &str, first: Player) -> Result<(), GameError> {
        if self.rooms.contains_key(name) {
            return Err(GameError::RoomAlreadyExists(name.to_string()));
        }
        let mut room = Room::new(name.to_string());
        room.players.push(first);
        self.rooms.insert(name.to_string(), room);
        Ok(())
    }

    /// Appends to the roster in join order. A connection already seated
    /// in the room is left untouched, keeping the roster duplicate-free.
    pub fn join_room(&mut self, name: &str, player: Player) -> Result<(), GameError> {
        let room = self
            .rooms
            .get_mut(name)
            .ok_or_else(|| GameError::RoomNotFound(name.to_string()))?;
        if room.player(player.id).is_none() {
            room.players.push(player);
        }
        Ok(())
    }

    /// Removes the matching player; the last player out destroys the
    /// room. The stale drawer reference is deliberately left in place
    /// (rotation skips past it on the next round).
    pub fn remove_player(&mut self, name: &str, conn: Uuid) -> Removal {
        let Some(room) = self.rooms.get_mut(name) else {
            return Removal::NotFound;
        };
        let before = room.players.len();
        room.players.retain(|p| p.id != conn);
        if room.players.len() == before {
            return Removal::NotFound;
        }
        if room.players.is_empty() {
            self.rooms.remove(name);
            return Removal::RoomDestroyed;
        }
        Removal::Removed
    }

    pub fn get(&self, name: &str) -> Option<&Room> {
        self.rooms.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Room> {
        self.rooms.get_mut(name)
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}
