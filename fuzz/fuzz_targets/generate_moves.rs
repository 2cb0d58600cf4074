#![no_main]
use hotseat::chess::board::Board;
use hotseat::chess::rules;
use itertools::Itertools;
use libfuzzer_sys::fuzz_target;
use pretty_assertions::assert_eq;
use shakmaty::{CastlingMode, Chess, FromSetup, Position};

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(mut board) = Board::from_fen(input) else {
        return;
    };
    let shakmaty_setup: shakmaty::fen::Fen = input
        .parse()
        .expect("when we parsed a valid position it should be accepted by shakmaty");
    // Castling, en passant and promotions are not supported: only compare
    // positions where they can not happen.
    let mut setup = shakmaty_setup.into_setup();
    setup.castling_rights = shakmaty::Bitboard::EMPTY;
    setup.ep_square = None;
    let Ok(reference) = Chess::from_setup(setup, CastlingMode::Standard) else {
        return;
    };
    if reference.legal_moves().iter().any(|m| m.is_promotion()) {
        return;
    }
    let fen = board.to_string();
    assert_eq!(
        rules::legal_moves(&mut board)
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .sorted()
            .collect::<Vec<_>>(),
        reference
            .legal_moves()
            .iter()
            .map(|m| m.to_uci(CastlingMode::Standard).to_string())
            .sorted()
            .collect::<Vec<_>>()
    );
    assert_eq!(board.to_string(), fen);
});
