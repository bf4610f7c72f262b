//! Chess rules for Gambit.
//!
//! Pure, synchronous, and free of any networking: everything here can be
//! driven from a unit test without a runtime.
//!
//! # Key types
//!
//! - [`Position`], [`Piece`], [`Move`] — value types, validated on
//!   construction
//! - [`Board`] — the 8×8 grid
//! - [`ChessGame`] — board + side to move + [`GameStatus`], the only
//!   thing that mutates a live board
//!
//! Move generation is split in two layers: [`movegen`] produces
//! pseudo-legal moves from piece patterns, and [`legality`] filters out
//! those that leave the mover's king attacked.

mod board;
mod error;
mod game;
pub mod legality;
pub mod movegen;
mod types;

pub use board::Board;
pub use error::RulesError;
pub use game::{ChessGame, GameStatus};
pub use types::{Color, Move, Piece, PieceKind, Position};
