//! Core protocol types for Gambit's wire format.
//!
//! Everything here travels "on the wire": clients send a
//! [`CommandEnvelope`] per text frame, and the server answers with
//! [`ServerMessage`]s. The field names (`commandType`, `authToken`,
//! `gameID`, `serverMessageType`, ...) are the ones existing clients
//! already speak, so the serde attributes below are part of the contract.

use std::fmt;

use gambit_rules::{Board, Color, GameStatus, Move};
use gambit_transport::ConnectionId;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique identifier for a game.
///
/// A newtype over `u64` so a game id can never be confused with any other
/// number. `#[serde(transparent)]` keeps it a plain JSON number: `42`, not
/// `{"0": 42}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(pub u64);

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "G-{}", self.0)
    }
}

/// A participant identity as vouched for by the authenticator. In
/// practice this is a username.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Seats and roles
// ---------------------------------------------------------------------------

/// Who holds each color in a game. Either seat may be empty.
///
/// This is the game record store's view, and the source of truth for
/// "who may move which color".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seats {
    pub light: Option<Identity>,
    pub dark: Option<Identity>,
}

impl Seats {
    pub fn new(light: Option<Identity>, dark: Option<Identity>) -> Self {
        Self { light, dark }
    }

    /// The identity seated at `color`, if any.
    pub fn get(&self, color: Color) -> Option<&Identity> {
        match color {
            Color::Light => self.light.as_ref(),
            Color::Dark => self.dark.as_ref(),
        }
    }

    /// Seats `identity` at `color`, returning whoever sat there before.
    pub fn set(&mut self, color: Color, identity: Option<Identity>) -> Option<Identity> {
        let seat = match color {
            Color::Light => &mut self.light,
            Color::Dark => &mut self.dark,
        };
        std::mem::replace(seat, identity)
    }

    /// The color `identity` plays, if seated. Light is checked first, so
    /// someone holding both seats is treated as light.
    pub fn color_of(&self, identity: &Identity) -> Option<Color> {
        Color::ALL
            .into_iter()
            .find(|color| self.get(*color) == Some(identity))
    }

    pub fn role_of(&self, identity: &Identity) -> Role {
        match self.color_of(identity) {
            Some(Color::Light) => Role::Light,
            Some(Color::Dark) => Role::Dark,
            None => Role::Observer,
        }
    }
}

/// How a connection participates in a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Light,
    Dark,
    Observer,
}

impl Role {
    /// The color this role may move, or `None` for observers.
    pub fn color(self) -> Option<Color> {
        match self {
            Self::Light => Some(Color::Light),
            Self::Dark => Some(Color::Dark),
            Self::Observer => None,
        }
    }
}

/// Reads naturally after "joined as": `white`, `black`, `an observer`.
impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.color() {
            Some(color) => write!(f, "{color}"),
            None => write!(f, "an observer"),
        }
    }
}

// ---------------------------------------------------------------------------
// Client → server
// ---------------------------------------------------------------------------

/// One client command with its credentials and target game.
///
/// `#[serde(flatten)]` lifts the command's fields (including its
/// `commandType` tag) to the top level, so the wire shape is flat:
///
/// ```json
/// {"commandType": "MAKE_MOVE", "authToken": "...", "gameID": 42,
///  "move": {"start": {"row": 2, "col": 5}, "end": {"row": 4, "col": 5}}}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandEnvelope {
    #[serde(rename = "authToken")]
    pub auth_token: String,
    #[serde(rename = "gameID")]
    pub game_id: GameId,
    #[serde(flatten)]
    pub command: Command,
}

/// The closed set of things a client can ask for.
///
/// Parsed once at the edge; nothing past the connection handler ever sees
/// raw text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "commandType", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Command {
    /// Attach this connection to the game, as a player or an observer.
    Connect,
    /// Detach from the game and give up any seat.
    Leave,
    /// Concede the game.
    Resign,
    /// Play a move.
    MakeMove {
        #[serde(rename = "move")]
        chess_move: Move,
    },
}

impl Command {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Connect => "connect",
            Self::Leave => "leave",
            Self::Resign => "resign",
            Self::MakeMove { .. } => "make_move",
        }
    }
}

// ---------------------------------------------------------------------------
// Server → client
// ---------------------------------------------------------------------------

/// Full state of one game, sent whenever a client needs to redraw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    #[serde(rename = "gameID")]
    pub game_id: GameId,
    pub seats: Seats,
    pub board: Board,
    pub turn: Color,
    pub status: GameStatus,
}

/// Machine-readable category of an [`ServerMessage::Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    InvalidCredential,
    GameNotFound,
    NotAParticipant,
    WrongTurn,
    NoSuchMove,
    GameOver,
    MalformedCommand,
    Unavailable,
}

/// Everything the server sends.
///
/// Internally tagged with `serverMessageType`:
///
/// ```json
/// {"serverMessageType": "NOTIFICATION", "message": "alice moved e2-e4"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "serverMessageType", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServerMessage {
    /// Replace your copy of the game with this one.
    LoadGame { game: GameSnapshot },

    /// Human-readable news about the game.
    Notification { message: String },

    /// Your last command failed. Only ever sent to the connection that
    /// issued the command.
    Error {
        #[serde(rename = "errorMessage")]
        error_message: String,
        kind: ErrorKind,
    },
}

impl ServerMessage {
    pub fn notification(message: impl Into<String>) -> Self {
        Self::Notification {
            message: message.into(),
        }
    }

    pub fn error(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self::Error {
            error_message: message.into(),
            kind,
        }
    }
}

// ---------------------------------------------------------------------------
// Recipient — who should receive a message?
// ---------------------------------------------------------------------------

/// Which connections of a game a server message goes to.
///
/// Never serialized; it only steers the fan-out inside the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipient {
    /// Every connection attached to the game.
    All,

    /// One specific connection.
    Connection(ConnectionId),

    /// Everyone except the given connection, typically the one whose
    /// command caused the message.
    AllExcept(ConnectionId),
}

impl Recipient {
    /// Whether `conn` should receive a message addressed to `self`.
    pub fn includes(&self, conn: ConnectionId) -> bool {
        match self {
            Self::All => true,
            Self::Connection(target) => *target == conn,
            Self::AllExcept(excluded) => *excluded != conn,
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
