//! The game state machine: one board, whose turn it is, and how it ended.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::legality::{self, is_in_check, legal_moves};
use crate::{Board, Color, Move, Position, RulesError};

// ---------------------------------------------------------------------------
// GameStatus
// ---------------------------------------------------------------------------

/// Where a game stands.
///
/// ```text
///            ┌──(mated)──────→ Checkmate { winner }
/// Ongoing ───┼──(no moves)────→ Stalemate { stalemated }
///            └──(resign)──────→ Resigned { winner }
/// ```
///
/// `Ongoing` is the only non-terminal state; there are no transitions out
/// of the other three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameStatus {
    Ongoing,
    /// The side to move is in check with no legal move; `winner` delivered
    /// the mate.
    Checkmate { winner: Color },
    /// The side to move is not in check but has no legal move.
    Stalemate { stalemated: Color },
    /// `winner`'s opponent resigned.
    Resigned { winner: Color },
}

impl GameStatus {
    /// Returns `true` for every state except `Ongoing`.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Ongoing)
    }

    /// The winning side, if the game was decided.
    pub fn winner(&self) -> Option<Color> {
        match self {
            Self::Checkmate { winner } | Self::Resigned { winner } => Some(*winner),
            Self::Ongoing | Self::Stalemate { .. } => None,
        }
    }

    /// The losing side, if the game was decided.
    pub fn loser(&self) -> Option<Color> {
        self.winner().map(Color::opposite)
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ongoing => write!(f, "ongoing"),
            Self::Checkmate { winner } => write!(f, "checkmate, {winner} wins"),
            Self::Stalemate { stalemated } => {
                write!(f, "stalemate, {stalemated} has no legal move")
            }
            Self::Resigned { winner } => {
                write!(f, "{} resigned, {winner} wins", winner.opposite())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// ChessGame
// ---------------------------------------------------------------------------

/// One chess game: the board, the side to move, and the status.
///
/// The only mutations are [`attempt_move`](Self::attempt_move) and
/// [`resign`](Self::resign), and both are refused once the status is
/// terminal. A failed call changes nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChessGame {
    board: Board,
    turn: Color,
    status: GameStatus,
}

impl ChessGame {
    /// A new game from the standard opening, light to move.
    pub fn new() -> Self {
        Self {
            board: Board::starting(),
            turn: Color::Light,
            status: GameStatus::Ongoing,
        }
    }

    /// A game from an arbitrary position.
    ///
    /// Each side must have exactly one king. The status is evaluated for
    /// the side to move, so a position that is already mate starts out
    /// terminal.
    pub fn from_position(board: Board, turn: Color) -> Result<Self, RulesError> {
        for color in Color::ALL {
            if board.king_count(color) != 1 {
                return Err(RulesError::MissingKing(color));
            }
        }
        let mut game = Self {
            board,
            turn,
            status: GameStatus::Ongoing,
        };
        game.status = game.evaluate();
        Ok(game)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The side to move.
    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_over(&self) -> bool {
        self.status.is_terminal()
    }

    /// True if `color`'s king is attacked by any opposing piece.
    pub fn is_in_check(&self, color: Color) -> bool {
        is_in_check(&self.board, color)
    }

    /// Legal moves of the piece on `pos`.
    ///
    /// Empty if `pos` is empty or holds a piece of the side not to move;
    /// callers decide whether that emptiness means anything.
    pub fn legal_moves_from(&self, pos: Position) -> Vec<Move> {
        match self.board.get(pos) {
            Some(piece) if piece.color == self.turn => legal_moves(&self.board, pos),
            _ => Vec::new(),
        }
    }

    /// Every legal move of the side to move.
    pub fn legal_moves(&self) -> Vec<Move> {
        self.board
            .pieces_of(self.turn)
            .flat_map(|(pos, _)| legal_moves(&self.board, pos))
            .collect()
    }

    /// Plays `mv` for the side to move and returns the new status.
    ///
    /// # Errors
    /// - [`RulesError::GameOver`] — the game is already terminal
    /// - [`RulesError::WrongTurn`] — `mv.start` holds the other side's piece
    /// - [`RulesError::NoSuchMove`] — `mv` is not a legal move of the piece
    ///   on `mv.start` (including a missing or unneeded promotion kind)
    pub fn attempt_move(&mut self, mv: Move) -> Result<GameStatus, RulesError> {
        self.ensure_ongoing()?;

        if let Some(piece) = self.board.get(mv.start) {
            if piece.color != self.turn {
                return Err(RulesError::WrongTurn {
                    expected: self.turn,
                });
            }
        }
        if !self.legal_moves_from(mv.start).contains(&mv) {
            return Err(RulesError::NoSuchMove(mv));
        }

        let Some(undo) = legality::apply(&mut self.board, &mv) else {
            return Err(RulesError::NoSuchMove(mv));
        };
        tracing::trace!(%mv, captured = ?undo.captured(), "move applied");

        self.turn = self.turn.opposite();
        self.status = self.evaluate();
        Ok(self.status)
    }

    /// Records that `color` resigned. Whether the caller may resign for
    /// `color` is the caller's business.
    ///
    /// # Errors
    /// [`RulesError::GameOver`] if the game is already terminal.
    pub fn resign(&mut self, color: Color) -> Result<GameStatus, RulesError> {
        self.ensure_ongoing()?;
        self.status = GameStatus::Resigned {
            winner: color.opposite(),
        };
        Ok(self.status)
    }

    fn ensure_ongoing(&self) -> Result<(), RulesError> {
        if self.status.is_terminal() {
            return Err(RulesError::GameOver(self.status));
        }
        Ok(())
    }

    /// Status of the current position for the side to move.
    fn evaluate(&self) -> GameStatus {
        let can_move = self
            .board
            .pieces_of(self.turn)
            .any(|(pos, _)| !legal_moves(&self.board, pos).is_empty());

        if can_move {
            GameStatus::Ongoing
        } else if self.is_in_check(self.turn) {
            GameStatus::Checkmate {
                winner: self.turn.opposite(),
            }
        } else {
            GameStatus::Stalemate {
                stalemated: self.turn,
            }
        }
    }
}

impl Default for ChessGame {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Piece, PieceKind};

    fn mv(s: &str) -> Move {
        s.parse().unwrap()
    }

    fn sq(s: &str) -> Position {
        s.parse().unwrap()
    }

    #[test]
    fn test_new_game_light_to_move_twenty_moves() {
        let game = ChessGame::new();
        assert_eq!(game.turn(), Color::Light);
        assert_eq!(game.status(), GameStatus::Ongoing);
        assert_eq!(game.legal_moves().len(), 20);
    }

    #[test]
    fn test_legal_moves_from_other_side_is_empty() {
        let game = ChessGame::new();
        assert!(game.legal_moves_from(sq("e7")).is_empty());
        assert!(game.legal_moves_from(sq("e4")).is_empty());
        assert_eq!(game.legal_moves_from(sq("e2")).len(), 2);
    }

    #[test]
    fn test_attempt_move_flips_turn() {
        let mut game = ChessGame::new();
        let status = game.attempt_move(mv("e2e4")).unwrap();

        assert_eq!(status, GameStatus::Ongoing);
        assert_eq!(game.turn(), Color::Dark);
        assert_eq!(
            game.board().get(sq("e4")),
            Some(Piece::new(Color::Light, PieceKind::Pawn))
        );
        assert_eq!(game.board().get(sq("e2")), None);
    }

    #[test]
    fn test_attempt_move_wrong_turn_leaves_state() {
        let mut game = ChessGame::new();
        let before = game.clone();

        let result = game.attempt_move(mv("e7e5"));

        assert!(matches!(
            result,
            Err(RulesError::WrongTurn {
                expected: Color::Light
            })
        ));
        assert_eq!(game, before);
    }

    #[test]
    fn test_attempt_move_illegal_leaves_state() {
        let mut game = ChessGame::new();
        let before = game.clone();

        assert!(matches!(
            game.attempt_move(mv("e2e5")),
            Err(RulesError::NoSuchMove(_))
        ));
        assert!(matches!(
            game.attempt_move(mv("e3e4")),
            Err(RulesError::NoSuchMove(_))
        ));
        assert_eq!(game, before);
    }

    #[test]
    fn test_resign_records_opponent_as_winner() {
        let mut game = ChessGame::new();
        let status = game.resign(Color::Dark).unwrap();
        assert_eq!(status, GameStatus::Resigned { winner: Color::Light });
        assert!(game.is_over());
        assert!(matches!(game.resign(Color::Light), Err(RulesError::GameOver(_))));
    }

    #[test]
    fn test_from_position_requires_one_king_each() {
        let mut board = Board::empty();
        board.set(sq("e1"), Some(Piece::new(Color::Light, PieceKind::King)));
        assert_eq!(
            ChessGame::from_position(board.clone(), Color::Light),
            Err(RulesError::MissingKing(Color::Dark))
        );

        board.set(sq("e8"), Some(Piece::new(Color::Dark, PieceKind::King)));
        board.set(sq("a8"), Some(Piece::new(Color::Dark, PieceKind::King)));
        assert_eq!(
            ChessGame::from_position(board, Color::Light),
            Err(RulesError::MissingKing(Color::Dark))
        );
    }

    #[test]
    fn test_status_display() {
        assert_eq!(
            GameStatus::Checkmate { winner: Color::Dark }.to_string(),
            "checkmate, black wins"
        );
        assert_eq!(
            GameStatus::Resigned { winner: Color::Light }.to_string(),
            "black resigned, white wins"
        );
    }

    #[test]
    fn test_status_json_shape() {
        let json = serde_json::to_value(GameStatus::Checkmate { winner: Color::Dark }).unwrap();
        assert_eq!(json, serde_json::json!({"state": "CHECKMATE", "winner": "DARK"}));
        let json = serde_json::to_value(GameStatus::Ongoing).unwrap();
        assert_eq!(json, serde_json::json!({"state": "ONGOING"}));
    }

    #[test]
    fn test_winner_and_loser() {
        let mate = GameStatus::Checkmate { winner: Color::Dark };
        assert_eq!(mate.winner(), Some(Color::Dark));
        assert_eq!(mate.loser(), Some(Color::Light));
        assert_eq!(GameStatus::Stalemate { stalemated: Color::Light }.winner(), None);
    }
}
