use sketchparty_protocol::ServerToClient;
use uuid::Uuid;

use crate::game::Room;

/// Delivery is fire-and-forget: a send only fails once the connection's
/// writer task is gone, and the disconnect path reaps that player.
pub fn to_room(room: &Room, event: &ServerToClient) {
    for p in &room.players {
        if p.tx.send(event.clone()).is_err() {
            tracing::debug!(room = %room.name, player = %p.username, "send to dead connection");
        }
    }
}

/// Everyone except the originating connection. Used for stroke relay so
/// the sender, who already rendered locally, gets no echo.
pub fn to_room_except(room: &Room, sender: Uuid, event: &ServerToClient) {
    for p in room.players.iter().filter(|p| p.id != sender) {
        let _ = p.tx.send(event.clone());
    }
}

pub fn to_connection(room: &Room, conn: Uuid, event: &ServerToClient) {
    if let Some(p) = room.player(conn) {
        let _ = p.tx.send(event.clone());
    }
}
