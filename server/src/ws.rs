use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::{SinkExt, StreamExt};
use sketchparty_protocol::{ClientToServer, ServerToClient};
use tokio::sync::mpsc::{self, UnboundedSender};
use uuid::Uuid;

use crate::broadcast;
use crate::game::{self, Player};
use crate::store::Removal;
use crate::AppState;

pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();

    let (tx_out, mut rx_out) = mpsc::unbounded_channel::<ServerToClient>();

    tokio::spawn(async move {
        while let Some(msg) = rx_out.recv().await {
            let text = match serde_json::to_string(&msg) {
                Ok(text) => text,
                Err(err) => {
                    tracing::error!(%err, "failed to encode outbound event");
                    continue;
                }
            };
            if sender.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    });

    let my_id = Uuid::new_v4();
    let _ = tx_out.send(ServerToClient::Hello { your_id: my_id });
    tracing::debug!(conn = %my_id, "connection open");

    while let Some(Ok(msg)) = receiver.next().await {
        match msg {
            Message::Text(text) => match serde_json::from_str::<ClientToServer>(&text) {
                Ok(cmd) => route_cmd(cmd, &state, my_id, &tx_out),
                Err(err) => {
                    // Fail closed on anything we cannot decode.
                    tracing::debug!(conn = %my_id, %err, "ignoring malformed payload");
                }
            },
            Message::Close(_) => break,
            _ => {}
        }
    }

    // Reached on a close frame and on abrupt drops alike; the transport
    // hands us this exactly once per connection.
    leave_current_room(&state, my_id);
    tracing::debug!(conn = %my_id, "connection closed");
}

fn route_cmd(
    cmd: ClientToServer,
    state: &AppState,
    my_id: Uuid,
    tx_out: &UnboundedSender<ServerToClient>,
) {
    match cmd {
        ClientToServer::CreateRoom { username, room } => {
            let mut hub = state.inner.lock();
            let hub = &mut *hub;
            if hub.registry.room_of(my_id).is_some() {
                let _ = tx_out.send(ServerToClient::ErrorMsg("You are already in a room.".into()));
                return;
            }
            match hub
                .rooms
                .create_room(&room, Player::new(my_id, username, tx_out.clone()))
            {
                Ok(()) => {
                    hub.registry.bind(my_id, &room);
                    let _ = tx_out.send(ServerToClient::RoomCreated { room: room.clone() });
                    if let Some(r) = hub.rooms.get(&room) {
                        broadcast::to_room(r, &ServerToClient::UpdatePlayerList(r.roster()));
                    }
                    tracing::info!(%room, conn = %my_id, "room created");
                }
                Err(err) => {
                    let _ = tx_out.send(ServerToClient::ErrorMsg(err.to_string()));
                }
            }
        }
        ClientToServer::JoinRoom { username, room } => {
            let mut hub = state.inner.lock();
            let hub = &mut *hub;
            if hub.registry.room_of(my_id).is_some() {
                let _ = tx_out.send(ServerToClient::ErrorMsg("You are already in a room.".into()));
                return;
            }
            match hub
                .rooms
                .join_room(&room, Player::new(my_id, username, tx_out.clone()))
            {
                Ok(()) => {
                    hub.registry.bind(my_id, &room);
                    let _ = tx_out.send(ServerToClient::JoinedRoom { room: room.clone() });
                    if let Some(r) = hub.rooms.get(&room) {
                        broadcast::to_room(r, &ServerToClient::UpdatePlayerList(r.roster()));
                    }
                    tracing::info!(%room, conn = %my_id, "player joined");
                }
                Err(err) => {
                    let _ = tx_out.send(ServerToClient::ErrorMsg(err.to_string()));
                }
            }
        }
        ClientToServer::StartGame(room) => {
            let mut hub = state.inner.lock();
            if let Some(r) = hub.rooms.get_mut(&room) {
                game::start_round_or_notice(r);
            }
        }
        ClientToServer::Draw(stroke) => {
            let hub = state.inner.lock();
            if let Some(r) = hub.rooms.get(&stroke.room) {
                broadcast::to_room_except(r, my_id, &ServerToClient::Draw(stroke.clone()));
            }
        }
        ClientToServer::ClearCanvas(room) => {
            let hub = state.inner.lock();
            if let Some(r) = hub.rooms.get(&room) {
                broadcast::to_room(r, &ServerToClient::ClearCanvas);
            }
        }
        ClientToServer::Message { room, message } => {
            let mut hub = state.inner.lock();
            if let Some(r) = hub.rooms.get_mut(&room) {
                game::evaluate_guess(r, my_id, &message);
            }
        }
        ClientToServer::LeaveRoom => {
            leave_current_room(state, my_id);
        }
    }
}

/// Unbinds the connection and reaps its player; the last player out
/// tears the room down.
fn leave_current_room(state: &AppState, conn: Uuid) {
    let mut hub = state.inner.lock();
    let hub = &mut *hub;
    let Some(room_name) = hub.registry.unbind(conn) else {
        return;
    };
    match hub.rooms.remove_player(&room_name, conn) {
        Removal::RoomDestroyed => {
            tracing::info!(room = %room_name, "room destroyed");
        }
        Removal::Removed => {
            if let Some(r) = hub.rooms.get(&room_name) {
                broadcast::to_room(r, &ServerToClient::UpdatePlayerList(r.roster()));
            }
        }
        Removal::NotFound => {}
    }
}
