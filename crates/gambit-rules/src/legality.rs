//! King-safety filtering on top of pseudo-legal generation.
//!
//! Each candidate is simulated on a scratch copy of the board with
//! [`apply`] and undone with [`Undo::revert`]; the two are exact inverses,
//! so the scratch board is back to the caller's position after every
//! candidate and the caller's board is never touched at all.

use crate::movegen::pseudo_legal_moves;
use crate::{Board, Color, Move, Piece, Position};

/// What [`apply`] displaced, enough to put the board back exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "dropping an Undo leaves the simulated move on the board"]
pub struct Undo {
    mv: Move,
    moved: Piece,
    captured: Option<Piece>,
}

impl Undo {
    /// Restores the mover on its start square and whatever stood on the
    /// end square before the move.
    pub fn revert(self, board: &mut Board) {
        board.set(self.mv.start, Some(self.moved));
        board.set(self.mv.end, self.captured);
    }

    /// The piece captured by the move, if any.
    pub fn captured(&self) -> Option<Piece> {
        self.captured
    }
}

/// Plays `mv` on `board` without any legality checks, promoting when the
/// move says so. Returns `None` (board untouched) if `mv.start` is empty.
pub fn apply(board: &mut Board, mv: &Move) -> Option<Undo> {
    let moved = board.set(mv.start, None)?;
    let placed = match mv.promotion {
        Some(kind) => Piece::new(moved.color, kind),
        None => moved,
    };
    let captured = board.set(mv.end, Some(placed));
    Some(Undo {
        mv: *mv,
        moved,
        captured,
    })
}

/// True if some `attacker` piece has a pseudo-legal move ending on
/// `target`.
///
/// Only meaningful when `target` holds a non-`attacker` piece: pawn
/// pushes onto an empty square would otherwise count as attacks.
pub fn is_square_attacked(board: &Board, target: Position, attacker: Color) -> bool {
    board.pieces_of(attacker).any(|(from, _)| {
        pseudo_legal_moves(board, from)
            .iter()
            .any(|mv| mv.end == target)
    })
}

/// True if `color`'s king is attacked. A board without that king is never
/// in check.
pub fn is_in_check(board: &Board, color: Color) -> bool {
    board
        .find_king(color)
        .is_some_and(|king| is_square_attacked(board, king, color.opposite()))
}

/// The legal moves of the piece on `from`: its pseudo-legal moves that do
/// not leave its own king attacked.
pub fn legal_moves(board: &Board, from: Position) -> Vec<Move> {
    let Some(piece) = board.get(from) else {
        return Vec::new();
    };

    let mut scratch = board.clone();
    let legal = pseudo_legal_moves(board, from)
        .into_iter()
        .filter(|mv| leaves_king_safe(&mut scratch, mv, piece.color))
        .collect();

    debug_assert_eq!(&scratch, board, "simulation must leave no trace");
    legal
}

fn leaves_king_safe(scratch: &mut Board, mv: &Move, color: Color) -> bool {
    let Some(undo) = apply(scratch, mv) else {
        return false;
    };
    let safe = !is_in_check(scratch, color);
    undo.revert(scratch);
    safe
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PieceKind;

    fn sq(s: &str) -> Position {
        s.parse().unwrap()
    }

    fn put(board: &mut Board, s: &str, color: Color, kind: PieceKind) {
        board.set(sq(s), Some(Piece::new(color, kind)));
    }

    #[test]
    fn test_apply_then_revert_restores_capture() {
        let mut board = Board::empty();
        put(&mut board, "d4", Color::Light, PieceKind::Rook);
        put(&mut board, "d7", Color::Dark, PieceKind::Queen);
        let before = board.clone();

        let undo = apply(&mut board, &Move::new(sq("d4"), sq("d7"))).unwrap();
        assert_eq!(undo.captured(), Some(Piece::new(Color::Dark, PieceKind::Queen)));
        assert_eq!(board.get(sq("d4")), None);
        assert_eq!(board.get(sq("d7")), Some(Piece::new(Color::Light, PieceKind::Rook)));

        undo.revert(&mut board);
        assert_eq!(board, before);
    }

    #[test]
    fn test_apply_then_revert_restores_pawn_after_promotion() {
        let mut board = Board::empty();
        put(&mut board, "g7", Color::Light, PieceKind::Pawn);
        let before = board.clone();

        let mv = Move::promoting(sq("g7"), sq("g8"), PieceKind::Queen);
        let undo = apply(&mut board, &mv).unwrap();
        assert_eq!(board.get(sq("g8")), Some(Piece::new(Color::Light, PieceKind::Queen)));

        undo.revert(&mut board);
        assert_eq!(board, before);
    }

    #[test]
    fn test_apply_from_empty_square_is_noop() {
        let mut board = Board::starting();
        assert!(apply(&mut board, &Move::new(sq("e4"), sq("e5"))).is_none());
        assert_eq!(board, Board::starting());
    }

    #[test]
    fn test_is_in_check_detects_rook_on_file() {
        let mut board = Board::empty();
        put(&mut board, "e1", Color::Light, PieceKind::King);
        put(&mut board, "e8", Color::Dark, PieceKind::Rook);
        assert!(is_in_check(&board, Color::Light));

        put(&mut board, "e4", Color::Light, PieceKind::Knight);
        assert!(!is_in_check(&board, Color::Light), "knight blocks the file");
    }

    #[test]
    fn test_is_in_check_without_king_is_false() {
        let mut board = Board::empty();
        put(&mut board, "a1", Color::Dark, PieceKind::Queen);
        assert!(!is_in_check(&board, Color::Light));
    }

    #[test]
    fn test_pinned_piece_cannot_leave_the_line() {
        let mut board = Board::empty();
        put(&mut board, "e1", Color::Light, PieceKind::King);
        put(&mut board, "e2", Color::Light, PieceKind::Knight);
        put(&mut board, "e8", Color::Dark, PieceKind::Rook);

        assert!(legal_moves(&board, sq("e2")).is_empty());
    }

    #[test]
    fn test_pinned_rook_may_slide_along_pin_and_capture_pinner() {
        let mut board = Board::empty();
        put(&mut board, "e1", Color::Light, PieceKind::King);
        put(&mut board, "e3", Color::Light, PieceKind::Rook);
        put(&mut board, "e8", Color::Dark, PieceKind::Rook);

        let ends: Vec<String> = legal_moves(&board, sq("e3"))
            .iter()
            .map(|mv| mv.end.to_string())
            .collect();
        assert_eq!(ends.len(), 6, "e2, e4..e8 along the file: {ends:?}");
        assert!(ends.contains(&"e8".to_string()));
        assert!(!ends.contains(&"d3".to_string()));
    }

    #[test]
    fn test_king_may_not_step_into_attack() {
        let mut board = Board::empty();
        put(&mut board, "e1", Color::Light, PieceKind::King);
        put(&mut board, "d8", Color::Dark, PieceKind::Rook);
        put(&mut board, "f8", Color::Dark, PieceKind::Rook);

        let ends: Vec<Position> = legal_moves(&board, sq("e1")).iter().map(|mv| mv.end).collect();
        assert_eq!(ends, vec![sq("e2")]);
    }

    #[test]
    fn test_legal_moves_leave_board_untouched() {
        let mut board = Board::starting();
        put(&mut board, "e2", Color::Dark, PieceKind::Queen);
        let before = board.clone();

        for (pos, _) in before.pieces() {
            let _ = legal_moves(&board, pos);
        }

        assert_eq!(board, before);
    }
}
