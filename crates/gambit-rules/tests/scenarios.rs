//! Whole-game scenarios driven through `ChessGame`.

use gambit_rules::legality::{self, is_in_check};
use gambit_rules::movegen::pseudo_legal_moves;
use gambit_rules::{
    Board, ChessGame, Color, GameStatus, Move, Piece, PieceKind, Position, RulesError,
};

// =========================================================================
// Helpers
// =========================================================================

fn mv(s: &str) -> Move {
    s.parse().unwrap()
}

fn sq(s: &str) -> Position {
    s.parse().unwrap()
}

fn board_with(pieces: &[(&str, Color, PieceKind)]) -> Board {
    let mut board = Board::empty();
    for (square, color, kind) in pieces {
        board.set(sq(square), Some(Piece::new(*color, *kind)));
    }
    board
}

fn play(game: &mut ChessGame, moves: &[&str]) {
    for m in moves {
        game.attempt_move(mv(m))
            .unwrap_or_else(|e| panic!("{m} should be legal: {e}"));
    }
}

/// A handful of positions reached by deterministic play, used by the
/// property sweeps below.
fn sample_games() -> Vec<ChessGame> {
    let mut games = vec![ChessGame::new()];

    // Always pick the n-th legal move, for a few different n.
    for pick in [0usize, 3, 7, 11] {
        let mut game = ChessGame::new();
        for _ in 0..24 {
            let moves = game.legal_moves();
            if moves.is_empty() {
                break;
            }
            game.attempt_move(moves[pick % moves.len()]).unwrap();
            games.push(game.clone());
        }
    }
    games
}

// =========================================================================
// Scenarios
// =========================================================================

#[test]
fn test_e2e4_then_dark_repeats_it_no_such_move() {
    let mut game = ChessGame::new();

    let status = game.attempt_move(mv("e2e4")).unwrap();
    assert_eq!(status, GameStatus::Ongoing);
    assert_eq!(game.turn(), Color::Dark);

    let before = game.clone();
    let result = game.attempt_move(mv("e2e4"));
    assert!(matches!(result, Err(RulesError::NoSuchMove(_))), "got {result:?}");
    assert_eq!(game, before);
}

#[test]
fn test_fools_mate_checkmate_then_game_over() {
    let mut game = ChessGame::new();
    play(&mut game, &["f2f3", "e7e5", "g2g4"]);

    let status = game.attempt_move(mv("d8h4")).unwrap();

    assert_eq!(status, GameStatus::Checkmate { winner: Color::Dark });
    assert_eq!(status.loser(), Some(Color::Light));
    assert!(game.is_in_check(Color::Light));
    assert!(game.legal_moves().is_empty());

    let before = game.clone();
    for (color_to_try, attempt) in [(Color::Light, "a2a3"), (Color::Dark, "a7a6")] {
        let result = game.attempt_move(mv(attempt));
        assert!(
            matches!(result, Err(RulesError::GameOver(GameStatus::Checkmate { .. }))),
            "{color_to_try} got {result:?}"
        );
    }
    assert!(matches!(game.resign(Color::Light), Err(RulesError::GameOver(_))));
    assert_eq!(game, before);
}

#[test]
fn test_promotion_needs_a_kind() {
    let board = board_with(&[
        ("a7", Color::Light, PieceKind::Pawn),
        ("e1", Color::Light, PieceKind::King),
        ("h8", Color::Dark, PieceKind::King),
    ]);
    let mut game = ChessGame::from_position(board, Color::Light).unwrap();

    let bare = game.attempt_move(mv("a7a8"));
    assert!(matches!(bare, Err(RulesError::NoSuchMove(_))), "got {bare:?}");
    assert_eq!(game.turn(), Color::Light);

    game.attempt_move(mv("a7a8=N")).unwrap();
    assert_eq!(
        game.board().get(sq("a8")),
        Some(Piece::new(Color::Light, PieceKind::Knight))
    );
    assert_eq!(game.board().get(sq("a7")), None);
    assert_eq!(game.turn(), Color::Dark);
}

#[test]
fn test_queen_move_stalemates_lone_king() {
    let board = board_with(&[
        ("a8", Color::Dark, PieceKind::King),
        ("c5", Color::Light, PieceKind::Queen),
        ("e1", Color::Light, PieceKind::King),
    ]);
    let mut game = ChessGame::from_position(board, Color::Light).unwrap();
    assert_eq!(game.status(), GameStatus::Ongoing);

    let status = game.attempt_move(mv("c5c7")).unwrap();

    assert_eq!(status, GameStatus::Stalemate { stalemated: Color::Dark });
    assert!(!game.is_in_check(Color::Dark));
    assert_eq!(status.winner(), None);
}

#[test]
fn test_from_position_already_mated() {
    let board = board_with(&[
        ("h8", Color::Dark, PieceKind::King),
        ("g7", Color::Light, PieceKind::Queen),
        ("g6", Color::Light, PieceKind::King),
    ]);
    let game = ChessGame::from_position(board, Color::Dark).unwrap();
    assert_eq!(game.status(), GameStatus::Checkmate { winner: Color::Light });
}

#[test]
fn test_check_is_not_mate_when_capture_exists() {
    let board = board_with(&[
        ("h8", Color::Dark, PieceKind::King),
        ("g7", Color::Light, PieceKind::Queen),
        ("a1", Color::Light, PieceKind::King),
    ]);
    let game = ChessGame::from_position(board, Color::Dark).unwrap();

    assert!(game.is_in_check(Color::Dark));
    assert_eq!(game.status(), GameStatus::Ongoing);
    assert_eq!(game.legal_moves(), vec![mv("h8g7")]);
}

#[test]
fn test_moves_that_ignore_check_are_rejected() {
    let mut game = ChessGame::new();
    play(&mut game, &["e2e4", "e7e5", "d1h5", "f7f6", "h5e5"]);
    assert!(game.is_in_check(Color::Dark));
    assert_eq!(game.status(), GameStatus::Ongoing);

    for attempt in ["e8e7", "a7a6"] {
        let result = game.attempt_move(mv(attempt));
        assert!(matches!(result, Err(RulesError::NoSuchMove(_))), "{attempt}: {result:?}");
    }
    game.attempt_move(mv("d8e7")).unwrap();
    assert!(!game.is_in_check(Color::Dark));
}

// =========================================================================
// Properties over sampled positions
// =========================================================================

#[test]
fn test_no_move_lands_on_own_piece() {
    for game in sample_games() {
        let board = game.board();
        for (from, piece) in board.pieces() {
            for m in pseudo_legal_moves(board, from) {
                let target = board.get(m.end);
                assert!(
                    target.is_none_or(|other| other.color != piece.color),
                    "{m} lands on own piece\n{board}"
                );
            }
        }
    }
}

#[test]
fn test_apply_revert_restores_every_legal_move() {
    for game in sample_games() {
        let original = game.board().clone();
        for m in game.legal_moves() {
            let mut board = original.clone();
            let undo = legality::apply(&mut board, &m).unwrap();
            assert_ne!(board, original);
            undo.revert(&mut board);
            assert_eq!(board, original, "revert of {m} diverged");
        }
    }
}

#[test]
fn test_terminal_status_matches_check_and_mobility() {
    for game in sample_games() {
        let side = game.turn();
        let in_check = is_in_check(game.board(), side);
        let stuck = game
            .board()
            .pieces_of(side)
            .all(|(pos, _)| game.legal_moves_from(pos).is_empty());

        let expected = match (stuck, in_check) {
            (false, _) => GameStatus::Ongoing,
            (true, true) => GameStatus::Checkmate { winner: side.opposite() },
            (true, false) => GameStatus::Stalemate { stalemated: side },
        };
        assert_eq!(game.status(), expected);
    }
}

#[test]
fn test_turn_alternates_and_failures_keep_it() {
    let mut game = ChessGame::new();
    for m in ["e2e4", "e7e5", "g1f3", "b8c6"] {
        let before = game.turn();
        assert!(game.attempt_move(mv("a1a5")).is_err());
        assert_eq!(game.turn(), before);

        game.attempt_move(mv(m)).unwrap();
        assert_eq!(game.turn(), before.opposite());
    }
}
