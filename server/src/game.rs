use chrono::Utc;
use sketchparty_protocol::{PlayerInfo, ServerToClient};
use tokio::sync::mpsc::UnboundedSender;
use uuid::Uuid;

use crate::broadcast;
use crate::error::GameError;
use crate::words;

// ==== knobs ====
pub const MIN_PLAYERS: usize = 2; // a round needs a drawer and a guesser
pub const GUESSER_POINTS: u32 = 10;
pub const DRAWER_POINTS: u32 = 5;
pub const SYSTEM_SENDER: &str = "system";

pub struct Player {
    pub id: Uuid,
    pub username: String,
    pub score: u32,
    pub tx: UnboundedSender<ServerToClient>,
}

impl Player {
    pub fn new(id: Uuid, username: impl Into<String>, tx: UnboundedSender<ServerToClient>) -> Self {
        Self {
            id,
            username: username.into(),
            score: 0,
            tx,
        }
    }
}

/// The drawer/word pairing of the active round. Replaced wholesale on
/// every round transition, absent outside of one.
#[derive(Debug, Clone)]
pub struct RoundContext {
    pub drawer: Uuid,
    pub word: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No round has ever started here.
    Waiting,
    /// A drawer holds a secret word.
    RoundActive,
    /// Rounds have run before, but the last transition could not seat a
    /// new drawer. `startGame` resumes from here.
    Paused,
}

pub struct Room {
    pub name: String,
    /// Join order; defines turn rotation.
    pub players: Vec<Player>,
    pub round: Option<RoundContext>,
    /// Rotation anchor. Survives round teardown so rotation resumes from
    /// wherever the previous drawer sat; may reference a departed player.
    pub last_drawer: Option<Uuid>,
}

impl Room {
    pub fn new(name: String) -> Self {
        Self {
            name,
            players: Vec::new(),
            round: None,
            last_drawer: None,
        }
    }

    pub fn phase(&self) -> Phase {
        match (&self.round, self.last_drawer) {
            (Some(_), _) => Phase::RoundActive,
            (None, Some(_)) => Phase::Paused,
            (None, None) => Phase::Waiting,
        }
    }

    pub fn player(&self, id: Uuid) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn current_drawer(&self) -> Option<Uuid> {
        self.round.as_ref().map(|r| r.drawer)
    }

    pub fn roster(&self) -> Vec<PlayerInfo> {
        self.players
            .iter()
            .map(|p| PlayerInfo {
                username: p.username.clone(),
                score: p.score,
            })
            .collect()
    }
}

/// Seats the next drawer, deals a fresh word, and announces the round.
///
/// Rotation is positional: the successor of wherever the previous drawer
/// currently sits, or the head of the roster when that player is unset or
/// gone. Joins and leaves between rounds can therefore skip or repeat
/// turns relative to the original order.
pub fn start_round(room: &mut Room) -> Result<(), GameError> {
    if room.players.len() < MIN_PLAYERS {
        return Err(GameError::InsufficientPlayers);
    }

    let seated = room
        .last_drawer
        .and_then(|id| room.players.iter().position(|p| p.id == id));
    let next = match seated {
        Some(i) => (i + 1) % room.players.len(),
        None => 0,
    };

    let drawer_id = room.players[next].id;
    let drawer_name = room.players[next].username.clone();
    let word = words::pick().to_string();
    room.last_drawer = Some(drawer_id);
    room.round = Some(RoundContext {
        drawer: drawer_id,
        word: word.clone(),
    });

    tracing::info!(room = %room.name, drawer = %drawer_name, "round started");
    broadcast::to_room(
        room,
        &ServerToClient::NewRound {
            drawer_id,
            drawer_name,
        },
    );
    broadcast::to_connection(room, drawer_id, &ServerToClient::YourWord { word });
    broadcast::to_room(room, &ServerToClient::ClearCanvas);
    Ok(())
}

/// `startGame` entry point, also the post-guess cascade: an understaffed
/// room gets an informational notice instead of an error.
pub fn start_round_or_notice(room: &mut Room) {
    if let Err(err) = start_round(room) {
        tracing::debug!(room = %room.name, %err, "round not started");
        system_message(room, "Not enough players to start a new round.");
    }
}

/// Scores `text` against the active round, or relays it as ordinary chat.
///
/// The drawer's own messages and messages outside an active round are
/// never scored. A correct guess is an exact, case-sensitive match; it
/// consumes the round, settles scores, and cascades into the next round.
pub fn evaluate_guess(room: &mut Room, guesser: Uuid, text: &str) {
    let Some(sender) = room.player(guesser) else {
        return; // not seated here, drop the message
    };
    let sender_name = sender.username.clone();

    let hit = match &room.round {
        Some(ctx) if ctx.drawer != guesser && ctx.word == text => {
            Some((ctx.drawer, ctx.word.clone()))
        }
        _ => None,
    };
    let Some((drawer_id, word)) = hit else {
        broadcast::to_room(
            room,
            &ServerToClient::Message {
                username: sender_name,
                message: text.to_string(),
                timestamp: Utc::now().to_rfc3339(),
            },
        );
        return;
    };

    room.round = None;
    if let Some(p) = room.players.iter_mut().find(|p| p.id == guesser) {
        p.score += GUESSER_POINTS;
    }
    if let Some(p) = room.players.iter_mut().find(|p| p.id == drawer_id) {
        p.score += DRAWER_POINTS;
    }

    tracing::info!(room = %room.name, guesser = %sender_name, %word, "correct guess");
    system_message(
        room,
        format!("{sender_name} guessed it! The word was \"{word}\"."),
    );
    broadcast::to_room(room, &ServerToClient::UpdatePlayerList(room.roster()));
    start_round_or_notice(room);
}

fn system_message(room: &Room, text: impl Into<String>) {
    broadcast::to_room(
        room,
        &ServerToClient::Message {
            username: SYSTEM_SENDER.to_string(),
            message: text.into(),
            timestamp: Utc::now().to_rfc3339(),
        },
    );
}
