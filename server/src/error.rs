use thiserror::Error;

/// User-facing failures of the room coordinator.
///
/// `RoomAlreadyExists` and `RoomNotFound` end the client's session by
/// convention; `InsufficientPlayers` is an informational notice and the
/// room stays joinable and startable.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("room '{0}' already exists")]
    RoomAlreadyExists(String),
    #[error("room '{0}' not found")]
    RoomNotFound(String),
    #[error("not enough players to start a round")]
    InsufficientPlayers,
}
