use std::sync::Arc;

use axum::{routing::get, Router};
use parking_lot::Mutex;

pub mod broadcast;
pub mod error;
pub mod game;
pub mod store;
pub mod words;
pub mod ws;


use store::{ConnectionRegistry, RoomStore};

/// Everything the coordinator mutates, behind one lock: each inbound
/// event runs to completion against a consistent view, so no handler
/// ever observes a half-updated room.
#[derive(Default)]
pub struct Hub {
    pub rooms: RoomStore,
    pub registry: ConnectionRegistry,
}

#[derive(Clone, Default)]
pub struct AppState {
    pub inner: Arc<Mutex<Hub>>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Builds the websocket router. Split out of `main` so tests can serve
/// it on an ephemeral port.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ws", get(ws::ws_handler))
        .with_state(state)
}
