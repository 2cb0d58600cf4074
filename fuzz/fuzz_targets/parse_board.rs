#![no_main]
use hotseat::chess::board::Board;
use libfuzzer_sys::fuzz_target;
use pretty_assertions::assert_eq;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(board) = Board::try_from(input) else {
        return;
    };
    // Printed boards have to be accepted back as is.
    let printed = board.to_string();
    let reparsed = Board::from_fen(&printed).expect("printed FEN should be valid");
    assert_eq!(reparsed.to_string(), printed);
    assert_eq!(reparsed, board);
});
