use hotseat::chess::board::{Board, STARTING_FEN};
use hotseat::chess::core::{Move, Piece, PieceKind, Player, Square};
use hotseat::chess::rules;
use hotseat::chess::ChessError;
use pretty_assertions::assert_eq;

fn legal_position(input: &str, expected: &str) {
    let board = Board::from_fen(input).unwrap_or_else(|e| panic!("parsing {input}: {e}"));
    assert_eq!(board.to_string(), expected);
}

#[test]
fn basic_positions() {
    legal_position(STARTING_FEN, STARTING_FEN);
    legal_position(
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        STARTING_FEN,
    );
    legal_position(
        "2r3r1/p3k3/1p3pp1/1B5p/5P2/2P1p1P1/PP4KP/3R4 w - - 0 34",
        "2r3r1/p3k3/1p3pp1/1B5p/5P2/2P1p1P1/PP4KP/3R4 w - - 0 34",
    );
    legal_position(
        "r1b1qrk1/ppp2pbp/n2p1np1/4p1B1/2PPP3/2NB1N1P/PP3PP1/R2QK2R w KQ e6 0 9",
        "r1b1qrk1/ppp2pbp/n2p1np1/4p1B1/2PPP3/2NB1N1P/PP3PP1/R2QK2R w - - 0 9",
    );
    legal_position("8/8/8/8/2P5/3k4/8/KB6 b - c3 0 1", "8/8/8/8/2P5/3k4/8/KB6 b - - 0 1");
    // Trimmed FEN.
    legal_position(
        "rnbqkb1r/pp2pppp/3p1n2/8/3NP3/2N5/PPP2PPP/R1BQKB1R b KQkq -",
        "rnbqkb1r/pp2pppp/3p1n2/8/3NP3/2N5/PPP2PPP/R1BQKB1R b - - 0 1",
    );
}

#[test]
fn invalid_positions() {
    for (input, message) in [
        ("3k4/8/8/8/8/8/8/8 w - - 0 1", "expected 1 white king, got 0"),
        ("8/8/8/8/8/8/8/3K4 w - - 0 1", "expected 1 black king, got 0"),
        ("1kk5/8/8/8/8/8/8/3K4 w - - 0 1", "expected 1 black king, got 2"),
        (
            "3kr3/8/8/8/8/5Q2/8/1KP5 w - - 0 1",
            "white pawns can not be placed on their own backrank",
        ),
        (
            "3kp3/8/8/8/8/5Q2/8/1K6 w - - 0 1",
            "black pawns can not be placed on their own backrank",
        ),
        ("4k3/8/8/8/8/8/8/4K3 x - - 0 1", "player should be 'w' or 'b', got 'x'"),
        ("4k3/8/8/8/8/8/8/4K3 w KQkX - 0 1", "unknown castle rights: KQkX"),
    ] {
        match Board::try_from(input) {
            Err(ChessError::Parse(error)) => assert_eq!(error, message, "{input}"),
            other => panic!("{input} should be rejected, got {other:?}"),
        }
    }
}

#[test]
fn undo_restores_every_move() {
    let mut board = Board::try_from(
        "r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w - - 4 4",
    )
    .unwrap();
    let before = board.to_string();
    for first in rules::legal_moves(&mut board).unwrap() {
        board.apply_move(first).unwrap();
        assert_eq!(board.side_to_move(), Player::Black);
        for second in rules::legal_moves(&mut board).unwrap() {
            let fen = board.to_string();
            board.apply_move(second).unwrap();
            assert_eq!(board.side_to_move(), Player::White);
            assert_eq!(board.undo_last_move(), Ok(second));
            assert_eq!(board.to_string(), fen);
        }
        assert_eq!(board.undo_last_move(), Ok(first));
        assert_eq!(board.to_string(), before);
    }
    assert_eq!(board.undo_last_move(), Err(ChessError::NoHistory));
}

#[test]
fn scholars_mate_capture() {
    let mut board = Board::try_from(
        "r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w - - 4 4",
    )
    .unwrap();
    let mate = rules::validate_move(&mut board, Square::H5, Square::F7).unwrap();
    assert_eq!(
        mate,
        Move::new(
            Square::H5,
            Square::F7,
            Piece::new(Player::White, PieceKind::Queen),
            Some(Piece::new(Player::Black, PieceKind::Pawn))
        )
    );
    board.apply_move(mate).unwrap();
    assert_eq!(
        board.to_string(),
        "r1bqkb1r/pppp1Qpp/2n2n2/4p3/2B1P3/8/PPPP1PPP/RNB1K1NR b - - 0 4"
    );
    assert!(rules::is_checkmate(&mut board).unwrap());
    assert_eq!(board.history().last(), Some(mate));
}
