//! Error types for the rules engine.

use crate::{Color, GameStatus, Move};

/// Errors raised by the board model and the game state machine.
///
/// `InvalidPosition` and `InvalidNotation` are contract errors: they come
/// from building a [`Position`](crate::Position) out of bad input and never
/// from a move on a well-formed board. The remaining variants are
/// user-triggered and leave the game untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RulesError {
    /// Row or column outside `1..=8`.
    #[error("position ({row}, {col}) is off the board")]
    InvalidPosition { row: i16, col: i16 },

    /// A square name like `"e4"` could not be parsed.
    #[error("invalid square notation: {0:?}")]
    InvalidNotation(String),

    /// The move is not among the legal moves of the piece on its start square.
    #[error("illegal move {0}")]
    NoSuchMove(Move),

    /// The piece on the start square belongs to the side not to move.
    #[error("not your turn, {expected} to move")]
    WrongTurn { expected: Color },

    /// The game already reached a terminal status.
    #[error("game is over: {0}")]
    GameOver(GameStatus),

    /// A position handed to the state machine lacks a king (or has two).
    #[error("{0} must have exactly one king")]
    MissingKing(Color),
}
