//! Error types for the session layer.

use gambit_protocol::GameId;
use gambit_rules::Color;

/// Errors raised by the identity provider and the game record store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The credential was unknown, revoked, or rejected by the
    /// [`Authenticator`](crate::Authenticator).
    #[error("invalid credential")]
    InvalidCredential,

    /// No game record exists under this id.
    #[error("game {0} not found")]
    GameNotFound(GameId),

    /// Someone already holds that color in this game.
    #[error("{color} is already taken in game {game_id}")]
    SeatTaken { game_id: GameId, color: Color },
}
