//! Error types for the room layer.

use gambit_protocol::{ErrorKind, GameId, ServerMessage};
use gambit_rules::RulesError;
use gambit_session::SessionError;

/// Errors a coordinator (or the lobby in front of it) reports back to the
/// caller. None of them ever reaches a connection other than the one whose
/// command failed.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// The connection is unknown to the game, or its identity holds
    /// neither color.
    #[error("not a participant in game {0}")]
    NotAParticipant(GameId),

    /// The rules engine refused: wrong turn, illegal move, or game over.
    #[error(transparent)]
    Rules(#[from] RulesError),

    /// The record store or authenticator refused.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The coordinator's command channel is closed.
    #[error("game {0} is unavailable")]
    Unavailable(GameId),
}

impl RoomError {
    /// The wire category for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotAParticipant(_) => ErrorKind::NotAParticipant,
            Self::Rules(err) => match err {
                RulesError::NoSuchMove(_) => ErrorKind::NoSuchMove,
                RulesError::WrongTurn { .. } => ErrorKind::WrongTurn,
                RulesError::GameOver(_) => ErrorKind::GameOver,
                RulesError::InvalidPosition { .. } | RulesError::InvalidNotation(_) => {
                    ErrorKind::MalformedCommand
                }
                RulesError::MissingKing(_) => ErrorKind::Unavailable,
            },
            Self::Session(err) => match err {
                SessionError::InvalidCredential => ErrorKind::InvalidCredential,
                SessionError::GameNotFound(_) => ErrorKind::GameNotFound,
                SessionError::SeatTaken { .. } => ErrorKind::NotAParticipant,
            },
            Self::Unavailable(_) => ErrorKind::Unavailable,
        }
    }

    /// The `ERROR` message to send back to the originating connection.
    pub fn to_server_message(&self) -> ServerMessage {
        ServerMessage::error(self.kind(), format!("error: {self}"))
    }
}
