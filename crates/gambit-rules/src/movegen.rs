//! Pseudo-legal move generation.
//!
//! A move is *pseudo-legal* when it follows the piece's movement pattern
//! and the occupancy rules of the board, whether or not it leaves the
//! mover's own king attacked. King safety is layered on top by
//! [`legality`](crate::legality).
//!
//! Movement is a pure function of `(kind, color, position, board)`, written
//! as one `match` over [`PieceKind`] plus direction tables.

use crate::{Board, Color, Move, PieceKind, Position};

const ROOK_DIRECTIONS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const ROYAL_DIRECTIONS: [(i8, i8); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];
const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (2, 1),
    (2, -1),
    (-2, 1),
    (-2, -1),
    (1, 2),
    (-1, 2),
    (1, -2),
    (-1, -2),
];

/// Every pseudo-legal move of the piece on `from`. Empty when `from` is
/// empty. The order of the returned moves carries no meaning.
pub fn pseudo_legal_moves(board: &Board, from: Position) -> Vec<Move> {
    let Some(piece) = board.get(from) else {
        return Vec::new();
    };

    let mut moves = Vec::new();
    match piece.kind {
        PieceKind::Rook => slide(board, from, piece.color, &ROOK_DIRECTIONS, &mut moves),
        PieceKind::Bishop => slide(board, from, piece.color, &BISHOP_DIRECTIONS, &mut moves),
        PieceKind::Queen => slide(board, from, piece.color, &ROYAL_DIRECTIONS, &mut moves),
        PieceKind::Knight => leap(board, from, piece.color, &KNIGHT_OFFSETS, &mut moves),
        PieceKind::King => leap(board, from, piece.color, &ROYAL_DIRECTIONS, &mut moves),
        PieceKind::Pawn => pawn(board, from, piece.color, &mut moves),
    }
    moves
}

/// Walks each ray until the edge or the first occupied square, which is
/// included only when it holds an enemy piece.
fn slide(
    board: &Board,
    from: Position,
    color: Color,
    directions: &[(i8, i8)],
    moves: &mut Vec<Move>,
) {
    for &(dr, dc) in directions {
        let mut cursor = from.offset(dr, dc);
        while let Some(to) = cursor {
            match board.get(to) {
                None => moves.push(Move::new(from, to)),
                Some(other) => {
                    if other.color != color {
                        moves.push(Move::new(from, to));
                    }
                    break;
                }
            }
            cursor = to.offset(dr, dc);
        }
    }
}

fn leap(
    board: &Board,
    from: Position,
    color: Color,
    offsets: &[(i8, i8)],
    moves: &mut Vec<Move>,
) {
    for &(dr, dc) in offsets {
        let Some(to) = from.offset(dr, dc) else {
            continue;
        };
        if board.get(to).is_none_or(|other| other.color != color) {
            moves.push(Move::new(from, to));
        }
    }
}

fn pawn(board: &Board, from: Position, color: Color, moves: &mut Vec<Move>) {
    let forward = color.forward();

    if let Some(one) = from.offset(forward, 0) {
        if board.get(one).is_none() {
            push_pawn_move(from, one, color, moves);

            if from.row() == color.pawn_row() {
                if let Some(two) = one.offset(forward, 0) {
                    if board.get(two).is_none() {
                        moves.push(Move::new(from, two));
                    }
                }
            }
        }
    }

    for dc in [-1, 1] {
        let Some(diagonal) = from.offset(forward, dc) else {
            continue;
        };
        if board.get(diagonal).is_some_and(|other| other.color != color) {
            push_pawn_move(from, diagonal, color, moves);
        }
    }
}

/// A pawn landing on the far rank yields one move per promotion kind and
/// no plain move.
fn push_pawn_move(from: Position, to: Position, color: Color, moves: &mut Vec<Move>) {
    if to.row() == color.promotion_row() {
        moves.extend(
            PieceKind::PROMOTIONS
                .iter()
                .map(|kind| Move::promoting(from, to, *kind)),
        );
    } else {
        moves.push(Move::new(from, to));
    }
}
