//! Value types shared by every layer of the rules engine.
//!
//! Everything here is a small `Copy` value: squares, colors, pieces and
//! moves. They serialize to the JSON shapes the wire protocol embeds in
//! game snapshots and move commands.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::RulesError;

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// The two sides. `Light` moves first and starts on rows 1 and 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Color {
    Light,
    Dark,
}

impl Color {
    /// Both colors, light first.
    pub const ALL: [Color; 2] = [Color::Light, Color::Dark];

    /// Returns the other side.
    pub fn opposite(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Row delta of a single pawn step.
    pub(crate) fn forward(self) -> i8 {
        match self {
            Self::Light => 1,
            Self::Dark => -1,
        }
    }

    /// Row pawns start on (and may double-step from).
    pub(crate) fn pawn_row(self) -> u8 {
        match self {
            Self::Light => 2,
            Self::Dark => 7,
        }
    }

    /// Row a pawn promotes on.
    pub(crate) fn promotion_row(self) -> u8 {
        match self {
            Self::Light => 8,
            Self::Dark => 1,
        }
    }

    /// Row the non-pawn pieces start on.
    pub(crate) fn back_row(self) -> u8 {
        match self {
            Self::Light => 1,
            Self::Dark => 8,
        }
    }
}

/// Players see the traditional names.
impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Light => write!(f, "white"),
            Self::Dark => write!(f, "black"),
        }
    }
}

// ---------------------------------------------------------------------------
// PieceKind / Piece
// ---------------------------------------------------------------------------

/// The six kinds of chess pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PieceKind {
    King,
    Queen,
    Rook,
    Bishop,
    Knight,
    Pawn,
}

impl PieceKind {
    /// Kinds a pawn may promote to, in the order moves are generated.
    pub const PROMOTIONS: [PieceKind; 4] = [
        PieceKind::Queen,
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Knight,
    ];

    /// Single-letter symbol used by notation and board diagrams.
    pub fn letter(self) -> char {
        match self {
            Self::King => 'K',
            Self::Queen => 'Q',
            Self::Rook => 'R',
            Self::Bishop => 'B',
            Self::Knight => 'N',
            Self::Pawn => 'P',
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::King => "king",
            Self::Queen => "queen",
            Self::Rook => "rook",
            Self::Bishop => "bishop",
            Self::Knight => "knight",
            Self::Pawn => "pawn",
        };
        f.write_str(name)
    }
}

/// A piece: a color and a kind. Has no behavior of its own; movement
/// lives in [`movegen`](crate::movegen).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
}

impl Piece {
    pub fn new(color: Color, kind: PieceKind) -> Self {
        Self { color, kind }
    }

    /// Diagram symbol: uppercase for light, lowercase for dark.
    pub fn symbol(self) -> char {
        match self.color {
            Color::Light => self.kind.letter(),
            Color::Dark => self.kind.letter().to_ascii_lowercase(),
        }
    }
}

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// A square on the board. Row and column are both in `1..=8`.
///
/// Row 1 is light's back rank; column 1 is the a-file. The range is
/// checked once in [`Position::new`], so every `Position` that exists is
/// on the board and the board accessors never need to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawPosition", into = "RawPosition")]
pub struct Position {
    row: u8,
    col: u8,
}

/// The unchecked JSON shape of a position: `{"row": 2, "col": 5}`.
#[derive(Serialize, Deserialize)]
struct RawPosition {
    row: i16,
    col: i16,
}

impl Position {
    /// Creates a position, failing with `InvalidPosition` when either
    /// coordinate is outside `1..=8`.
    pub fn new(row: i16, col: i16) -> Result<Self, RulesError> {
        if (1..=8).contains(&row) && (1..=8).contains(&col) {
            Ok(Self {
                row: row as u8,
                col: col as u8,
            })
        } else {
            Err(RulesError::InvalidPosition { row, col })
        }
    }

    pub fn row(self) -> u8 {
        self.row
    }

    pub fn col(self) -> u8 {
        self.col
    }

    /// The square `(dr, dc)` away, or `None` past the edge.
    pub fn offset(self, dr: i8, dc: i8) -> Option<Self> {
        Self::new(
            i16::from(self.row) + i16::from(dr),
            i16::from(self.col) + i16::from(dc),
        )
        .ok()
    }

    /// Iterates all 64 squares, row by row starting at a1.
    pub fn all() -> impl Iterator<Item = Position> {
        (1..=8u8).flat_map(|row| (1..=8u8).map(move |col| Position { row, col }))
    }

    /// Zero-based indices into the board array.
    pub(crate) fn index(self) -> (usize, usize) {
        (usize::from(self.row - 1), usize::from(self.col - 1))
    }
}

impl TryFrom<RawPosition> for Position {
    type Error = RulesError;

    fn try_from(raw: RawPosition) -> Result<Self, Self::Error> {
        Self::new(raw.row, raw.col)
    }
}

impl From<Position> for RawPosition {
    fn from(pos: Position) -> Self {
        Self {
            row: i16::from(pos.row),
            col: i16::from(pos.col),
        }
    }
}

/// Algebraic square name, e.g. `e4`.
impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = char::from(b'a' + self.col - 1);
        write!(f, "{file}{}", self.row)
    }
}

impl FromStr for Position {
    type Err = RulesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || RulesError::InvalidNotation(s.to_string());
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(invalid());
        }
        let file = bytes[0].to_ascii_lowercase();
        let rank = bytes[1];
        if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
            return Err(invalid());
        }
        Self::new(i16::from(rank - b'0'), i16::from(file - b'a' + 1))
    }
}

// ---------------------------------------------------------------------------
// Move
// ---------------------------------------------------------------------------

/// A move from one square to another.
///
/// `promotion` is set only for pawn moves onto the far rank; equality
/// compares all three fields, so `e7-e8=Q` and `e7-e8=N` are different
/// moves and a bare `e7-e8` is neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub start: Position,
    pub end: Position,
    #[serde(default)]
    pub promotion: Option<PieceKind>,
}

impl Move {
    pub fn new(start: Position, end: Position) -> Self {
        Self {
            start,
            end,
            promotion: None,
        }
    }

    pub fn promoting(start: Position, end: Position, kind: PieceKind) -> Self {
        Self {
            start,
            end,
            promotion: Some(kind),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)?;
        if let Some(kind) = self.promotion {
            write!(f, "={}", kind.letter())?;
        }
        Ok(())
    }
}

/// Parses `e2e4`, `e2-e4`, `e7e8=Q` or `e7e8q`. Mostly useful in tests
/// and log tooling.
impl FromStr for Move {
    type Err = RulesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || RulesError::InvalidNotation(s.to_string());
        let compact: String = s.chars().filter(|c| *c != '-' && *c != '=').collect();
        if compact.len() != 4 && compact.len() != 5 {
            return Err(invalid());
        }
        let start: Position = compact.get(0..2).ok_or_else(invalid)?.parse()?;
        let end: Position = compact.get(2..4).ok_or_else(invalid)?.parse()?;
        let promotion = match compact.get(4..).and_then(|p| p.chars().next()) {
            None => None,
            Some(c) => Some(
                match c.to_ascii_uppercase() {
                    'Q' => PieceKind::Queen,
                    'R' => PieceKind::Rook,
                    'B' => PieceKind::Bishop,
                    'N' => PieceKind::Knight,
                    _ => return Err(invalid()),
                },
            ),
        };
        Ok(Self {
            start,
            end,
            promotion,
        })
    }
}
