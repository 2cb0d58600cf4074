//! Errors produced by the board and the rules engine.
//!
//! Only [`ChessError::InvariantViolation`] is fatal: it means the board no
//! longer describes a game of chess (e.g. a king went missing) and nothing
//! computed from it can be trusted. Every other kind leaves the board exactly
//! as it was before the failed call.

use std::fmt;

use crate::chess::core::Square;

/// Errors that can occur while manipulating or querying the board.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ChessError {
    /// The user attempted a move that violates movement or check rules.
    #[error("illegal move {from}{to}: {reason}")]
    IllegalMove {
        #[allow(missing_docs)]
        from: Square,
        #[allow(missing_docs)]
        to: Square,
        #[allow(missing_docs)]
        reason: RejectReason,
    },

    /// A move does not match the board it is applied to.
    #[error("illegal state: {0}")]
    IllegalState(String),

    /// Undo was requested with an empty history.
    #[error("no moves to undo")]
    NoHistory,

    /// The board is corrupted: correctness can not be guaranteed further.
    #[error("board invariant violated: {0}")]
    InvariantViolation(String),

    /// Malformed textual input (square, piece, FEN, etc).
    #[error("{0}")]
    Parse(String),
}

impl ChessError {
    /// Returns true if the session can not continue after this error.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::InvariantViolation(_))
    }
}

/// Result type alias for board and rules operations.
pub type Result<T> = std::result::Result<T, ChessError>;

/// Why a move attempt was turned down.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RejectReason {
    /// There is no piece on the source square.
    EmptySquare,
    /// The piece on the source square belongs to the player who is not to
    /// move.
    NotYourPiece,
    /// The piece can not reach the target square according to its movement
    /// pattern.
    UnreachableSquare,
    /// The move would leave (or put) the mover's king in check.
    LeavesKingInCheck,
    /// The game has already ended.
    GameOver,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::EmptySquare => "no piece on the source square",
            Self::NotYourPiece => "the piece belongs to the opponent",
            Self::UnreachableSquare => "the piece can not reach the target square",
            Self::LeavesKingInCheck => "the move leaves the king in check",
            Self::GameOver => "the game is over",
        })
    }
}

/// Returns early with [`ChessError::Parse`] built from the format arguments,
/// the same way [`anyhow::bail`] does.
macro_rules! bail_parse {
    ($($arg:tt)*) => {
        return Err($crate::chess::error::ChessError::Parse(format!($($arg)*)))
    };
}

pub(crate) use bail_parse;
