//! Chess primitives commonly used within [`crate::chess`].

use std::fmt::{self, Write};

use itertools::Itertools;

use crate::chess::error::{bail_parse, ChessError, Result};

#[allow(missing_docs)]
pub const BOARD_WIDTH: u8 = 8;
#[allow(missing_docs)]
pub const BOARD_SIZE: u8 = BOARD_WIDTH * BOARD_WIDTH;

/// A move of a single piece from one square to another. A move is the only way
/// to mutate [`crate::chess::board::Board`].
///
/// Moves are produced by [`crate::chess::rules`] and carry everything needed
/// to take them back: the moving piece and the piece it captured, if any. Once
/// created, a move is never modified; the board history owns the applied ones.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Move {
    from: Square,
    to: Square,
    piece: Piece,
    captured: Option<Piece>,
}

impl Move {
    /// Describes `piece` moving from `from` to `to`, replacing `captured`.
    ///
    /// No validation happens here: [`crate::chess::board::Board::apply_move`]
    /// rejects moves that do not match the board.
    #[must_use]
    pub const fn new(from: Square, to: Square, piece: Piece, captured: Option<Piece>) -> Self {
        Self {
            from,
            to,
            piece,
            captured,
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn from(self) -> Square {
        self.from
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn to(self) -> Square {
        self.to
    }

    /// The piece that moves.
    #[must_use]
    pub const fn piece(self) -> Piece {
        self.piece
    }

    /// The piece that occupied the target square before the move.
    #[must_use]
    pub const fn captured(self) -> Option<Piece> {
        self.captured
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn is_capture(self) -> bool {
        self.captured.is_some()
    }
}

impl fmt::Display for Move {
    /// Serializes a move in [UCI format] (without promotions, which are not
    /// supported).
    ///
    /// [UCI format]: http://wbec-ridderkerk.nl/html/UCIProtocol.html
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

/// Board squares: from left to right, from bottom to the top:
///
/// ```
/// use hotseat::chess::core::Square;
///
/// assert_eq!(Square::A1 as u8, 0);
/// assert_eq!(Square::E1 as u8, 4);
/// assert_eq!(Square::H1 as u8, 7);
/// assert_eq!(Square::A4 as u8, 8 * 3);
/// assert_eq!(Square::H8 as u8, 63);
/// ```
///
/// Square is a compact representation using only one byte.
///
/// ```
/// use hotseat::chess::core::Square;
///
/// assert_eq!(std::mem::size_of::<Square>(), 1);
/// ```
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[rustfmt::skip]
#[allow(missing_docs)]
pub enum Square {
    A1, B1, C1, D1, E1, F1, G1, H1,
    A2, B2, C2, D2, E2, F2, G2, H2,
    A3, B3, C3, D3, E3, F3, G3, H3,
    A4, B4, C4, D4, E4, F4, G4, H4,
    A5, B5, C5, D5, E5, F5, G5, H5,
    A6, B6, C6, D6, E6, F6, G6, H6,
    A7, B7, C7, D7, E7, F7, G7, H7,
    A8, B8, C8, D8, E8, F8, G8, H8,
}

impl Square {
    /// All squares in index order (A1, B1, ..., H8).
    #[rustfmt::skip]
    pub const ALL: [Self; BOARD_SIZE as usize] = [
        Self::A1, Self::B1, Self::C1, Self::D1, Self::E1, Self::F1, Self::G1, Self::H1,
        Self::A2, Self::B2, Self::C2, Self::D2, Self::E2, Self::F2, Self::G2, Self::H2,
        Self::A3, Self::B3, Self::C3, Self::D3, Self::E3, Self::F3, Self::G3, Self::H3,
        Self::A4, Self::B4, Self::C4, Self::D4, Self::E4, Self::F4, Self::G4, Self::H4,
        Self::A5, Self::B5, Self::C5, Self::D5, Self::E5, Self::F5, Self::G5, Self::H5,
        Self::A6, Self::B6, Self::C6, Self::D6, Self::E6, Self::F6, Self::G6, Self::H6,
        Self::A7, Self::B7, Self::C7, Self::D7, Self::E7, Self::F7, Self::G7, Self::H7,
        Self::A8, Self::B8, Self::C8, Self::D8, Self::E8, Self::F8, Self::G8, Self::H8,
    ];

    /// Connects file (column) and rank (row) to form a full square.
    #[must_use]
    pub const fn new(file: File, rank: Rank) -> Self {
        Self::ALL[(file as u8 + (rank as u8) * BOARD_WIDTH) as usize]
    }

    /// Creates a square from zero-based `(file, rank)` coordinates.
    ///
    /// # Errors
    ///
    /// If either coordinate is outside 0..[`BOARD_WIDTH`] range.
    pub fn from_coordinates(file: u8, rank: u8) -> Result<Self> {
        Ok(Self::new(file.try_into()?, rank.try_into()?))
    }

    /// Returns file (column) on which the square is located.
    #[must_use]
    pub const fn file(self) -> File {
        File::ALL[(self as u8 % BOARD_WIDTH) as usize]
    }

    /// Returns rank (row) on which the square is located.
    #[must_use]
    pub const fn rank(self) -> Rank {
        Rank::ALL[(self as u8 / BOARD_WIDTH) as usize]
    }

    /// Zero-based `(file, rank)` pair.
    #[must_use]
    pub const fn coordinates(self) -> (u8, u8) {
        (self.file() as u8, self.rank() as u8)
    }

    /// Returns the square `file_delta` columns to the right and `rank_delta`
    /// rows up (from White's perspective), or `None` if that falls off the
    /// board.
    #[must_use]
    pub fn offset(self, file_delta: i8, rank_delta: i8) -> Option<Self> {
        let (file, rank) = self.coordinates();
        let file = u8::try_from(i16::from(file) + i16::from(file_delta)).ok()?;
        let rank = u8::try_from(i16::from(rank) + i16::from(rank_delta)).ok()?;
        Self::from_coordinates(file, rank).ok()
    }

    /// Iterates over all squares in index order.
    pub fn iter() -> impl DoubleEndedIterator<Item = Self> {
        Self::ALL.into_iter()
    }
}

impl TryFrom<u8> for Square {
    type Error = ChessError;

    /// Creates a square given its position on the board.
    ///
    /// # Errors
    ///
    /// If given square index is outside 0..[`BOARD_SIZE`] range.
    fn try_from(square_index: u8) -> Result<Self> {
        match Self::ALL.get(usize::from(square_index)) {
            Some(square) => Ok(*square),
            None => bail_parse!("square index should be in 0..BOARD_SIZE, got {square_index}"),
        }
    }
}

impl TryFrom<&str> for Square {
    type Error = ChessError;

    fn try_from(square: &str) -> Result<Self> {
        let Some((file, rank)) = square.chars().collect_tuple() else {
            bail_parse!(
                "square should be two-char, got {square} with {} chars",
                square.chars().count()
            );
        };
        Ok(Self::new(file.try_into()?, rank.try_into()?))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

/// Represents a column (vertical row) of the chessboard. In chess notation, it
/// is normally represented with a lowercase letter.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub enum File {
    A = 0,
    B = 1,
    C = 2,
    D = 3,
    E = 4,
    F = 5,
    G = 6,
    H = 7,
}

impl File {
    /// All files from A to H.
    pub const ALL: [Self; BOARD_WIDTH as usize] = [
        Self::A,
        Self::B,
        Self::C,
        Self::D,
        Self::E,
        Self::F,
        Self::G,
        Self::H,
    ];
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(char::from(b'a' + *self as u8))
    }
}

impl TryFrom<char> for File {
    type Error = ChessError;

    fn try_from(file: char) -> Result<Self> {
        match file {
            'a'..='h' => Ok(Self::ALL[usize::from(file as u8 - b'a')]),
            _ => bail_parse!("file should be within 'a'..='h', got '{file}'"),
        }
    }
}

impl TryFrom<u8> for File {
    type Error = ChessError;

    fn try_from(column: u8) -> Result<Self> {
        match Self::ALL.get(usize::from(column)) {
            Some(file) => Ok(*file),
            None => bail_parse!("file should be within 0..BOARD_WIDTH, got {column}"),
        }
    }
}

/// Represents a horizontal row of the chessboard. In chess notation, it is
/// represented with a number. The implementation assumes zero-based values
/// (i.e. rank 1 would be 0).
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub enum Rank {
    One = 0,
    Two = 1,
    Three = 2,
    Four = 3,
    Five = 4,
    Six = 5,
    Seven = 6,
    Eight = 7,
}

impl Rank {
    /// All ranks from the first to the eighth.
    pub const ALL: [Self; BOARD_WIDTH as usize] = [
        Self::One,
        Self::Two,
        Self::Three,
        Self::Four,
        Self::Five,
        Self::Six,
        Self::Seven,
        Self::Eight,
    ];

    /// The rank the player's pieces (other than pawns) start on.
    #[must_use]
    pub const fn backrank(player: Player) -> Self {
        match player {
            Player::White => Self::One,
            Player::Black => Self::Eight,
        }
    }

    /// The rank the player's pawns start on: they are allowed to advance two
    /// squares from here.
    #[must_use]
    pub const fn pawns_starting(player: Player) -> Self {
        match player {
            Player::White => Self::Two,
            Player::Black => Self::Seven,
        }
    }
}

impl TryFrom<char> for Rank {
    type Error = ChessError;

    fn try_from(rank: char) -> Result<Self> {
        match rank {
            '1'..='8' => Ok(Self::ALL[usize::from(rank as u8 - b'1')]),
            _ => bail_parse!("rank should be within '1'..='8', got '{rank}'"),
        }
    }
}

impl TryFrom<u8> for Rank {
    type Error = ChessError;

    fn try_from(row: u8) -> Result<Self> {
        match Self::ALL.get(usize::from(row)) {
            Some(rank) => Ok(*rank),
            None => bail_parse!("rank should be within 0..BOARD_WIDTH, got {row}"),
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", *self as u8 + 1)
    }
}

/// A standard game of chess is played between two players: White (having the
/// advantage of the first turn) and Black.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    White,
    Black,
}

impl Player {
    /// "Flips" the color.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// Rank increment of a pawn push.
    #[must_use]
    pub const fn push_direction(self) -> i8 {
        match self {
            Self::White => 1,
            Self::Black => -1,
        }
    }
}

impl TryFrom<&str> for Player {
    type Error = ChessError;

    fn try_from(player: &str) -> Result<Self> {
        match player {
            "w" => Ok(Self::White),
            "b" => Ok(Self::Black),
            _ => bail_parse!("player should be 'w' or 'b', got '{player}'"),
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(match &self {
            Self::White => 'w',
            Self::Black => 'b',
        })
    }
}

/// Standard [chess pieces].
///
/// [chess pieces]: https://en.wikipedia.org/wiki/Chess_piece
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PieceKind {
    King,
    Queen,
    Rook,
    Bishop,
    Knight,
    Pawn,
}

impl PieceKind {
    /// Lowercase algebraic symbol used by FEN.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::King => 'k',
            Self::Queen => 'q',
            Self::Rook => 'r',
            Self::Bishop => 'b',
            Self::Knight => 'n',
            Self::Pawn => 'p',
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(self.symbol())
    }
}

/// Represents a specific piece owned by a player. Pieces are plain values:
/// they are moved around the board and never change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    #[allow(missing_docs)]
    pub owner: Player,
    #[allow(missing_docs)]
    pub kind: PieceKind,
}

impl Piece {
    #[allow(missing_docs)]
    #[must_use]
    pub const fn new(owner: Player, kind: PieceKind) -> Self {
        Self { owner, kind }
    }
}

impl TryFrom<char> for Piece {
    type Error = ChessError;

    /// Parses FEN piece symbol: uppercase for White, lowercase for Black.
    fn try_from(symbol: char) -> Result<Self> {
        let kind = match symbol.to_ascii_lowercase() {
            'k' => PieceKind::King,
            'q' => PieceKind::Queen,
            'r' => PieceKind::Rook,
            'b' => PieceKind::Bishop,
            'n' => PieceKind::Knight,
            'p' => PieceKind::Pawn,
            _ => bail_parse!("piece symbol should be within \"KQRBNPkqrbnp\", got '{symbol}'"),
        };
        let owner = if symbol.is_ascii_uppercase() {
            Player::White
        } else {
            Player::Black
        };
        Ok(Self { owner, kind })
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = self.kind.symbol();
        f.write_char(match self.owner {
            // White player: uppercase symbols.
            Player::White => symbol.to_ascii_uppercase(),
            Player::Black => symbol,
        })
    }
}
