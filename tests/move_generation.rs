use hotseat::chess::board::Board;
use hotseat::chess::core::Move;
use hotseat::chess::rules::{legal_moves, perft};
use itertools::Itertools;
use pretty_assertions::assert_eq;
use shakmaty::{CastlingMode, Chess, Position as ShakmatyPosition};

fn setup(input: &str) -> Board {
    Board::try_from(input).unwrap_or_else(|e| panic!("parsing legal position {input}: {e}"))
}

fn get_moves(board: &mut Board) -> Vec<String> {
    legal_moves(board)
        .unwrap()
        .iter()
        .map(Move::to_string)
        .sorted()
        .collect::<Vec<_>>()
}

fn sorted_moves(moves: &[&str]) -> Vec<String> {
    moves
        .iter()
        .map(|m| (*m).to_string())
        .sorted()
        .collect::<Vec<_>>()
}

// Castling rights, en passant squares and promotions are absent from the
// compared positions, so the move sets have to be identical.
fn agrees_with_shakmaty(input: &str) {
    let mut board = setup(input);
    let fen: shakmaty::fen::Fen = input.parse().unwrap();
    let reference: Chess = fen.into_position(CastlingMode::Standard).unwrap();
    assert_eq!(
        get_moves(&mut board),
        reference
            .legal_moves()
            .iter()
            .map(|m| m.to_uci(CastlingMode::Standard).to_string())
            .sorted()
            .collect::<Vec<_>>(),
        "{input}"
    );
    assert_eq!(board.to_string(), input);
}

#[test]
fn starting_moves() {
    assert_eq!(
        get_moves(&mut Board::starting()),
        sorted_moves(&[
            "a2a3", "a2a4", "b1a3", "b1c3", "b2b3", "b2b4", "c2c3", "c2c4", "d2d3", "d2d4", "e2e3",
            "e2e4", "f2f3", "f2f4", "g1f3", "g1h3", "g2g3", "g2g4", "h2h3", "h2h4"
        ])
    );
}

#[test]
fn double_check_evasions() {
    assert_eq!(
        get_moves(&mut setup("3kn3/R2p1N2/8/8/7B/6K1/3R4/8 b - - 0 1")),
        sorted_moves(&["d8c8"])
    );
    assert_eq!(
        get_moves(&mut setup("8/5Nk1/7p/4Bp2/3q4/8/8/5KR1 b - - 0 1")),
        sorted_moves(&["g7f8", "g7f7", "g7h7"])
    );
}

#[test]
fn check_evasions() {
    assert_eq!(
        get_moves(&mut setup("3kn3/R2p4/8/6B1/8/6K1/3R4/8 b - - 0 1")),
        sorted_moves(&["e8f6", "d8c8"])
    );
    assert_eq!(
        get_moves(&mut setup("2R5/8/6k1/8/8/8/PPn5/KR6 w - - 0 1")),
        sorted_moves(&["c8c2"])
    );
}

#[test]
fn pins() {
    // The pawn is pinned along the diagonal and can't move forward.
    assert_eq!(
        get_moves(&mut setup("6qk/8/8/3Pp3/8/8/K7/8 w - - 0 1")),
        sorted_moves(&["a2a1", "a2a3", "a2b1", "a2b2", "a2b3"])
    );
    assert_eq!(
        get_moves(&mut setup("k7/1p6/8/8/8/8/8/4K2B b - - 0 1")),
        sorted_moves(&["a8a7", "a8b8"])
    );
}

#[test]
fn king_next_to_attacked_squares() {
    assert_eq!(
        get_moves(&mut setup(
            "2r3r1/3p3k/1p3pp1/1B5P/5P2/2P1pqP1/PP4KP/3R4 w - - 0 34"
        )),
        sorted_moves(&["g2g1", "g2f3", "g2h3"])
    );
    assert_eq!(
        get_moves(&mut setup(
            "2r3r1/p3k3/pp3p2/1B5p/5P2/2pqp1P1/PPK4P/3R4 w - - 0 34"
        )),
        sorted_moves(&["b5d3", "c2b3", "c2c1", "c2d3", "d1d3"])
    );
    assert_eq!(
        get_moves(&mut setup(
            "2r3r1/p3k3/pp3p2/1B5p/5P2/2P1p1P1/PP4Kr/3R4 w - - 0 1"
        )),
        sorted_moves(&["g2f1", "g2f3", "g2g1", "g2h2"])
    );
}

#[test]
fn same_moves_as_shakmaty() {
    for input in [
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w - - 0 1",
        "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w - - 2 3",
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w - - 0 1",
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R b - - 0 1",
        "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        "2r3r1/3p3k/1p3pp1/1B5P/5p2/2P1p1P1/PP4KP/3R4 w - - 0 34",
        "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10",
        "4k3/8/8/8/8/8/8/4K3 w - - 0 1",
        "7k/5Q2/6K1/8/8/8/8/8 b - - 0 1",
    ] {
        agrees_with_shakmaty(input);
    }
}

#[test]
fn perft_starting_position() {
    let mut board = Board::starting();
    assert_eq!(perft(&mut board, 1), Ok(20));
    assert_eq!(perft(&mut board, 2), Ok(400));
    assert_eq!(perft(&mut board, 3), Ok(8902));
    assert_eq!(board, Board::starting());
    assert_eq!(board.history().len(), 0);
}

// Slow in debug builds.
#[ignore]
#[test]
fn perft_starting_position_deep() {
    assert_eq!(perft(&mut Board::starting(), 4), Ok(197_281));
}

// Position 3 from https://www.chessprogramming.org/Perft_Results: neither
// castling nor en passant are possible in the first two plies.
#[test]
fn perft_endgame() {
    let mut board = setup("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1");
    assert_eq!(perft(&mut board, 1), Ok(14));
    assert_eq!(perft(&mut board, 2), Ok(191));
}
