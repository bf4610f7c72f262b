//! The 8×8 board: pure data plus accessors.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Color, Piece, PieceKind, Position};

/// Back-rank layout from the a-file to the h-file.
const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// A total mapping from [`Position`] to an optional [`Piece`].
///
/// The board does no legality checking at all: `set` overwrites whatever
/// is there. Rules live in [`movegen`](crate::movegen) and
/// [`legality`](crate::legality); the only owner that mutates a live
/// board is [`ChessGame`](crate::ChessGame).
///
/// Serialized as eight rows (row 1 first) of eight optional pieces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    squares: [[Option<Piece>; 8]; 8],
}

impl Board {
    /// A board with no pieces on it.
    pub fn empty() -> Self {
        Self {
            squares: [[None; 8]; 8],
        }
    }

    /// The standard opening array, 16 pieces per side.
    pub fn starting() -> Self {
        let mut board = Self::empty();
        board.reset_to_starting_position();
        board
    }

    /// Clears the board and sets up the standard opening array.
    pub fn reset_to_starting_position(&mut self) {
        self.squares = [[None; 8]; 8];
        for color in Color::ALL {
            let back = usize::from(color.back_row() - 1);
            let pawns = usize::from(color.pawn_row() - 1);
            for (col, kind) in BACK_RANK.iter().enumerate() {
                self.squares[back][col] = Some(Piece::new(color, *kind));
                self.squares[pawns][col] = Some(Piece::new(color, PieceKind::Pawn));
            }
        }
    }

    /// Returns the piece on `pos`, if any.
    pub fn get(&self, pos: Position) -> Option<Piece> {
        let (r, c) = pos.index();
        self.squares[r][c]
    }

    /// Puts `piece` on `pos` (or clears it with `None`) and returns the
    /// previous occupant.
    pub fn set(&mut self, pos: Position, piece: Option<Piece>) -> Option<Piece> {
        let (r, c) = pos.index();
        std::mem::replace(&mut self.squares[r][c], piece)
    }

    /// Every occupied square with its piece.
    pub fn pieces(&self) -> impl Iterator<Item = (Position, Piece)> + '_ {
        Position::all().filter_map(|pos| self.get(pos).map(|piece| (pos, piece)))
    }

    /// Every occupied square holding a piece of `color`.
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Position, Piece)> + '_ {
        self.pieces().filter(move |(_, piece)| piece.color == color)
    }

    /// Where `color`'s king stands. `None` only on hand-built boards or
    /// mid-simulation.
    pub fn find_king(&self, color: Color) -> Option<Position> {
        let king = Piece::new(color, PieceKind::King);
        self.pieces()
            .find(|(_, piece)| *piece == king)
            .map(|(pos, _)| pos)
    }

    /// Number of `color` kings on the board.
    pub(crate) fn king_count(&self, color: Color) -> usize {
        let king = Piece::new(color, PieceKind::King);
        self.pieces().filter(|(_, piece)| *piece == king).count()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::starting()
    }
}

/// ASCII diagram, row 8 on top, `.` for empty squares.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..8).rev() {
            write!(f, "{} ", row + 1)?;
            for col in 0..8 {
                let symbol = self.squares[row][col].map_or('.', Piece::symbol);
                write!(f, "{symbol}")?;
            }
            writeln!(f)?;
        }
        write!(f, "  abcdefgh")
    }
}
