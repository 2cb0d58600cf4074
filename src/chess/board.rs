//! Square-centric ([mailbox]) board: piece placement, side to move, move
//! counters and the history of applied moves.
//!
//! [`Board::apply_move`] and [`Board::undo_last_move`] form a pair: the rules
//! engine relies on undo restoring the exact state preceding the apply to
//! try moves out without copying the board.
//!
//! [mailbox]: https://www.chessprogramming.org/Mailbox

use std::fmt::{self, Write};
use std::num::NonZeroU16;

use itertools::Itertools;

use crate::chess::attacks;
use crate::chess::core::{
    File, Move, Piece, PieceKind, Player, Rank, Square, BOARD_SIZE, BOARD_WIDTH,
};
use crate::chess::error::{bail_parse, ChessError, Result};

/// FEN of the standard initial position.
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w - - 0 1";

/// Order of the pieces on the backranks at the start of the game.
const BACKRANK_PIECES: [PieceKind; BOARD_WIDTH as usize] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// An applied move together with the counters it overwrote.
#[derive(Clone, Debug)]
struct Ply {
    played: Move,
    halfmove_clock: u16,
    fullmove_counter: NonZeroU16,
}

/// Piece placement, side to move and history of a single game.
///
/// `Board::try_from()` creates a board from [Forsyth-Edwards Notation]
/// (FEN). Castling rights and en passant squares are accepted in the input
/// but not tracked: these moves are not part of the supported rules.
///
/// Two boards are equal when their piece placement and side to move are equal;
/// history and move counters do not participate in the comparison.
///
/// [Forsyth-Edwards Notation]: https://www.chessprogramming.org/Forsyth-Edwards_Notation
#[derive(Clone)]
pub struct Board {
    squares: [Option<Piece>; BOARD_SIZE as usize],
    side_to_move: Player,
    /// [Halfmove Clock] keeps track of the number of (half-)moves since the
    /// last capture or pawn move. It is only reported, the fifty-move rule is
    /// not enforced.
    ///
    /// [Halfmove Clock]: https://www.chessprogramming.org/Halfmove_Clock
    halfmove_clock: u16,
    fullmove_counter: NonZeroU16,
    history: Vec<Ply>,
}

impl Board {
    /// Creates the starting position of the standard chess variant.
    ///
    /// ```
    /// use hotseat::chess::board::Board;
    ///
    /// assert_eq!(
    ///     Board::starting().to_string(),
    ///     "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w - - 0 1"
    /// );
    /// ```
    #[must_use]
    pub fn starting() -> Self {
        let mut board = Self::empty();
        for player in [Player::White, Player::Black] {
            let backrank = Rank::backrank(player);
            let pawns = Rank::pawns_starting(player);
            for (file, kind) in File::ALL.into_iter().zip(BACKRANK_PIECES) {
                board.put(Square::new(file, backrank), Piece::new(player, kind));
                board.put(
                    Square::new(file, pawns),
                    Piece::new(player, PieceKind::Pawn),
                );
            }
        }
        board
    }

    // Creates an empty board to be filled by the parser.
    fn empty() -> Self {
        Self {
            squares: [None; BOARD_SIZE as usize],
            side_to_move: Player::White,
            halfmove_clock: 0,
            fullmove_counter: NonZeroU16::MIN,
            history: Vec::new(),
        }
    }

    fn put(&mut self, square: Square, piece: Piece) {
        self.squares[square as usize] = Some(piece);
    }

    fn clear(&mut self, square: Square) {
        self.squares[square as usize] = None;
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn piece_at(&self, square: Square) -> Option<Piece> {
        self.squares[square as usize]
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn side_to_move(&self) -> Player {
        self.side_to_move
    }

    /// Number of halfmoves since the last capture or pawn move.
    #[must_use]
    pub const fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    /// Starts at 1 and is incremented after each Black move.
    #[must_use]
    pub const fn fullmove_counter(&self) -> u16 {
        self.fullmove_counter.get()
    }

    /// Applied moves, from the first to the most recent one.
    pub fn history(&self) -> impl ExactSizeIterator<Item = Move> + '_ {
        self.history.iter().map(|ply| ply.played)
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn last_move(&self) -> Option<Move> {
        self.history.last().map(|ply| ply.played)
    }

    /// Iterates over the squares occupied by `player` and the pieces on them.
    pub fn pieces(&self, player: Player) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::iter().filter_map(move |square| match self.piece_at(square) {
            Some(piece) if piece.owner == player => Some((square, piece)),
            _ => None,
        })
    }

    /// Locates the king of `player`.
    ///
    /// # Errors
    ///
    /// Returns [`ChessError::InvariantViolation`] unless there is exactly one
    /// such king on the board.
    pub fn king_square(&self, player: Player) -> Result<Square> {
        self.pieces(player)
            .filter(|(_, piece)| piece.kind == PieceKind::King)
            .map(|(square, _)| square)
            .exactly_one()
            .map_err(|kings| {
                ChessError::InvariantViolation(format!(
                    "expected 1 {} king, got {}",
                    player_name(player),
                    kings.count()
                ))
            })
    }

    /// Makes the move: moves the piece, removes the captured one, updates the
    /// counters, passes the turn to the opponent and records the move in the
    /// history.
    ///
    /// Only the consistency of the move with the board is checked here, not
    /// its legality: that is the responsibility of [`crate::chess::rules`].
    ///
    /// # Errors
    ///
    /// Returns [`ChessError::IllegalState`] and leaves the board intact if
    /// the source square is empty, holds a piece of the player who is not to
    /// move or a piece different from the one in the move, if the target
    /// square content differs from the captured piece, or if the move would
    /// capture a king or a piece of the mover.
    pub fn apply_move(&mut self, next_move: Move) -> Result<()> {
        let (from, to) = (next_move.from(), next_move.to());
        let Some(piece) = self.piece_at(from) else {
            return Err(ChessError::IllegalState(format!("no piece on {from}")));
        };
        if piece.owner != self.side_to_move {
            return Err(ChessError::IllegalState(format!(
                "{from} holds a {} piece but {} is to move",
                player_name(piece.owner),
                player_name(self.side_to_move)
            )));
        }
        if piece != next_move.piece() {
            return Err(ChessError::IllegalState(format!(
                "{from} holds {piece}, not {}",
                next_move.piece()
            )));
        }
        if from == to {
            return Err(ChessError::IllegalState(format!(
                "{from} is both the source and the target"
            )));
        }
        if self.piece_at(to) != next_move.captured() {
            return Err(ChessError::IllegalState(format!(
                "captured piece does not match the content of {to}"
            )));
        }
        if let Some(captured) = next_move.captured() {
            if captured.owner == piece.owner {
                return Err(ChessError::IllegalState(format!(
                    "{to} is occupied by the mover's own piece"
                )));
            }
            if captured.kind == PieceKind::King {
                return Err(ChessError::IllegalState(format!(
                    "the king on {to} can not be captured"
                )));
            }
        }
        self.history.push(Ply {
            played: next_move,
            halfmove_clock: self.halfmove_clock,
            fullmove_counter: self.fullmove_counter,
        });
        self.clear(from);
        self.put(to, piece);
        self.halfmove_clock = if piece.kind == PieceKind::Pawn || next_move.is_capture() {
            0
        } else {
            self.halfmove_clock.saturating_add(1)
        };
        if self.side_to_move == Player::Black {
            self.fullmove_counter = self.fullmove_counter.saturating_add(1);
        }
        self.side_to_move = self.side_to_move.opponent();
        Ok(())
    }

    /// Takes back the most recent move and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`ChessError::NoHistory`] if no moves were made.
    pub fn undo_last_move(&mut self) -> Result<Move> {
        let ply = self.history.pop().ok_or(ChessError::NoHistory)?;
        let played = ply.played;
        self.put(played.from(), played.piece());
        match played.captured() {
            Some(captured) => self.put(played.to(), captured),
            None => self.clear(played.to()),
        }
        self.side_to_move = self.side_to_move.opponent();
        self.halfmove_clock = ply.halfmove_clock;
        self.fullmove_counter = ply.fullmove_counter;
        Ok(played)
    }

    /// Parses board from Forsyth-Edwards Notation. It will also accept trimmed
    /// FEN (EPD with 4 parts).
    ///
    /// FEN ::=
    ///       Piece Placement
    ///   ' ' Side to move
    ///   ' ' Castling ability
    ///   ' ' En passant target square
    ///   ' ' Halfmove clock
    ///   ' ' Fullmove counter
    ///
    /// The last two parts (together) are optional and will default to "0 1".
    /// Castling ability and en passant target are validated and discarded.
    ///
    /// NOTE: This expects properly-formatted inputs: no extra symbols or
    /// additional whitespace. Use `Board::try_from` for cleaning up the input
    /// if it is coming from untrusted source.
    ///
    /// # Errors
    ///
    /// Returns [`ChessError::Parse`] on malformed input and on positions that
    /// can not occur in a game: a number of kings per player other than one,
    /// pawns on their own backrank or the player who is not to move being in
    /// check.
    pub fn from_fen(input: &str) -> Result<Self> {
        let mut parts = input.split(' ');
        let mut result = Self::empty();
        let Some(pieces_placement) = parts.next() else {
            bail_parse!("incorrect FEN: missing pieces placement");
        };
        let mut rank_id = BOARD_WIDTH;
        for rank_fen in pieces_placement.split('/') {
            if rank_id == 0 {
                bail_parse!("incorrect FEN: expected 8 ranks, got {pieces_placement}");
            }
            rank_id -= 1;
            let rank = Rank::try_from(rank_id)?;
            let mut file: u8 = 0;
            for symbol in rank_fen.chars() {
                if file >= BOARD_WIDTH {
                    bail_parse!("incorrect FEN: rank {rank_fen} exceeds {BOARD_WIDTH} files");
                }
                match symbol {
                    '0' => bail_parse!("incorrect FEN: increment can not be 0"),
                    '1'..='8' => {
                        file += symbol as u8 - b'0';
                        continue;
                    },
                    _ => (),
                }
                let piece = Piece::try_from(symbol)?;
                result.put(Square::new(File::try_from(file)?, rank), piece);
                file += 1;
            }
            if file != BOARD_WIDTH {
                bail_parse!(
                    "incorrect FEN: rank size should be exactly {BOARD_WIDTH}, got {rank_fen} of \
                     length {file}"
                );
            }
        }
        if rank_id != 0 {
            bail_parse!("incorrect FEN: there should be 8 ranks, got {pieces_placement}");
        }
        result.side_to_move = match parts.next() {
            Some(value) => value.try_into()?,
            None => bail_parse!("incorrect FEN: missing side to move"),
        };
        match parts.next() {
            Some(value) => validate_castling(value)?,
            None => bail_parse!("incorrect FEN: missing castling rights"),
        }
        match parts.next() {
            Some("-") => (),
            Some(value) => {
                let _ = Square::try_from(value)?;
            },
            None => bail_parse!("incorrect FEN: missing en passant square"),
        }
        match parts.next() {
            Some(value) => result.halfmove_clock = parse_counter(value, "halfmove clock")?,
            // This is a correct EPD: exit early.
            None => return result.validate(),
        }
        match parts.next() {
            Some(value) => {
                let counter = parse_counter(value, "fullmove counter")?;
                let Some(counter) = NonZeroU16::new(counter) else {
                    bail_parse!("incorrect FEN: fullmove counter can not be 0");
                };
                result.fullmove_counter = counter;
            },
            None => bail_parse!("incorrect FEN: missing fullmove counter"),
        }
        match parts.next() {
            None => result.validate(),
            Some(_) => bail_parse!("trailing symbols are not allowed in FEN"),
        }
    }

    // Rejects parsed positions that break the board invariants.
    fn validate(self) -> Result<Self> {
        for player in [Player::White, Player::Black] {
            let kings = self
                .pieces(player)
                .filter(|(_, piece)| piece.kind == PieceKind::King)
                .count();
            if kings != 1 {
                bail_parse!("expected 1 {} king, got {kings}", player_name(player));
            }
        }
        // Pawns that reach the far rank stay on the board, but nothing moves a
        // pawn back to its own backrank.
        for player in [Player::White, Player::Black] {
            let behind_start = self.pieces(player).any(|(square, piece)| {
                piece.kind == PieceKind::Pawn && square.rank() == Rank::backrank(player)
            });
            if behind_start {
                bail_parse!(
                    "{} pawns can not be placed on their own backrank",
                    player_name(player)
                );
            }
        }
        let waiting = self.side_to_move.opponent();
        if attacks::is_attacked(&self, self.king_square(waiting)?, self.side_to_move) {
            bail_parse!(
                "{} king is in check but it is {} to move",
                player_name(waiting),
                player_name(self.side_to_move)
            );
        }
        Ok(self)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::starting()
    }
}

impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.squares == other.squares && self.side_to_move == other.side_to_move
    }
}

impl Eq for Board {}

impl TryFrom<&str> for Board {
    type Error = ChessError;

    /// Trims whitespace and an optional "fen" prefix before parsing the input
    /// with [`Board::from_fen`].
    fn try_from(input: &str) -> Result<Self> {
        let input = input.trim();
        match input.strip_prefix("fen ") {
            Some(stripped) => Self::from_fen(stripped),
            None => Self::from_fen(input),
        }
    }
}

impl fmt::Display for Board {
    /// Prints board in Forsyth-Edwards Notation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::ALL.into_iter().rev() {
            let mut empty_squares = 0i32;
            for file in File::ALL {
                if let Some(piece) = self.piece_at(Square::new(file, rank)) {
                    if empty_squares != 0 {
                        write!(f, "{empty_squares}")?;
                        empty_squares = 0;
                    }
                    write!(f, "{piece}")?;
                } else {
                    empty_squares += 1;
                }
            }
            if empty_squares != 0 {
                write!(f, "{empty_squares}")?;
            }
            if rank != Rank::One {
                const RANK_SEPARATOR: char = '/';
                write!(f, "{RANK_SEPARATOR}")?;
            }
        }
        // Castling and en passant are not tracked.
        write!(
            f,
            " {} - - {} {}",
            self.side_to_move, self.halfmove_clock, self.fullmove_counter
        )
    }
}

impl fmt::Debug for Board {
    /// Dumps the board in a simple format ('.' for empty square, FEN algebraic
    /// symbol for piece) a-la Stockfish "debug" command in UCI mode.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::ALL.into_iter().rev() {
            for file in File::ALL {
                match self.piece_at(Square::new(file, rank)) {
                    Some(piece) => write!(f, "{piece}"),
                    None => f.write_char('.'),
                }?;
                if file != File::H {
                    write!(f, "{SQUARE_SEPARATOR}")?;
                }
            }
            write!(f, "{LINE_SEPARATOR}")?;
        }
        write!(f, "{} to move", player_name(self.side_to_move))
    }
}

const LINE_SEPARATOR: &str = "\n";
const SQUARE_SEPARATOR: &str = " ";

pub(crate) const fn player_name(player: Player) -> &'static str {
    match player {
        Player::White => "white",
        Player::Black => "black",
    }
}

// Castling ability ::= '-' | (K)? (Q)? (k)? (q)?
fn validate_castling(input: &str) -> Result<()> {
    if input == "-" {
        return Ok(());
    }
    // Each symbol has to appear after the previous one in "KQkq", which also
    // rules out duplicates.
    let mut expected = "KQkq".chars();
    if input.is_empty() || !input.chars().all(|symbol| expected.any(|c| c == symbol)) {
        bail_parse!("unknown castle rights: {input}");
    }
    Ok(())
}

fn parse_counter(value: &str, name: &str) -> Result<u16> {
    if value.is_empty() || !value.bytes().all(|c| c.is_ascii_digit()) {
        bail_parse!("incorrect FEN: {name} can not contain anything other than digits");
    }
    value.parse::<u16>().map_err(|e| {
        ChessError::Parse(format!(
            "incorrect FEN: {name} can not be parsed {value}: {e}"
        ))
    })
}
