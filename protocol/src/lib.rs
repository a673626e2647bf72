use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One roster row as shown to clients. The order of the surrounding list
/// is join order, which also defines turn rotation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerInfo {
    pub username: String,
    pub score: u32,
}

/// A freehand stroke sample. The server relays it verbatim to the rest
/// of the room; only `room` is inspected, for routing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DrawStroke {
    pub x: f64,
    pub y: f64,
    pub room: String,
    pub drawing: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ClientToServer {
    CreateRoom { username: String, room: String },
    JoinRoom { username: String, room: String },
    /// Starts (or resumes) the round loop in the named room.
    StartGame(String),
    Draw(DrawStroke),
    /// Asks for the named room's shared surface to be wiped.
    ClearCanvas(String),
    /// Chat line, evaluated as a guess while a round is active.
    Message { room: String, message: String },
    LeaveRoom,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ServerToClient {
    /// First event on every connection: the id the server will know this
    /// client by, so it can recognise itself in `NewRound`.
    #[serde(rename_all = "camelCase")]
    Hello { your_id: Uuid },
    RoomCreated { room: String },
    JoinedRoom { room: String },
    /// Delivered to the initiator only. Non-fatal for the server; clients
    /// treat it as terminal and return to the entry screen.
    ErrorMsg(String),
    /// Full roster snapshot in join order, replacing any prior one.
    UpdatePlayerList(Vec<PlayerInfo>),
    /// Chat line. Announcements use the synthetic sender `"system"`.
    Message {
        username: String,
        message: String,
        timestamp: String,
    },
    Draw(DrawStroke),
    ClearCanvas,
    #[serde(rename_all = "camelCase")]
    NewRound { drawer_id: Uuid, drawer_name: String },
    /// Private to the drawer.
    YourWord { word: String },
}
