//! Game session: the object a front end talks to.
//!
//! [`Game`] owns the [`Board`] and keeps the [`GameStatus`] up to date after
//! every applied move. Once the game is over, every further move attempt is
//! rejected with [`RejectReason::GameOver`] until a new game is started.

use tracing::{debug, error, info};

use crate::chess::board::Board;
use crate::chess::core::{Move, Square};
use crate::chess::rules::{self, GameStatus};
use crate::chess::{ChessError, RejectReason, Result};

/// A single game between two players sharing the board.
#[derive(Debug)]
pub struct Game {
    board: Board,
    status: GameStatus,
}

impl Game {
    /// Starts a game from the standard initial position.
    #[must_use]
    pub fn new() -> Self {
        let board = Board::starting();
        Self {
            status: GameStatus::InProgress(board.side_to_move()),
            board,
        }
    }

    /// Continues the game from the given position, which may already be
    /// terminal.
    ///
    /// # Errors
    ///
    /// Returns [`ChessError::InvariantViolation`] if the position can not be
    /// reached in a game (e.g. the player who is not to move is in check).
    pub fn from_board(mut board: Board) -> Result<Self> {
        let status = rules::status(&mut board).inspect_err(log_failure)?;
        Ok(Self { board, status })
    }

    /// Parses the position with `Board::try_from` and continues the game
    /// from it.
    ///
    /// # Errors
    ///
    /// Returns [`ChessError::Parse`] for malformed FEN.
    pub fn from_fen(fen: &str) -> Result<Self> {
        Self::from_board(Board::try_from(fen)?)
    }

    /// Discards the current game and sets up the initial position.
    pub fn new_game(&mut self) {
        *self = Self::new();
        info!("started new game");
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn status(&self) -> GameStatus {
        self.status
    }

    /// Squares the piece on `square` can legally move to, in index order.
    ///
    /// The list is empty if the square is empty, holds a piece of the player
    /// who is not to move or the game is over.
    ///
    /// # Errors
    ///
    /// Returns [`ChessError::InvariantViolation`] if the board is corrupted.
    pub fn legal_targets(&mut self, square: Square) -> Result<Vec<Square>> {
        if self.status.is_over() {
            return Ok(Vec::new());
        }
        let mut targets: Vec<Square> = rules::legal_moves_from(&mut self.board, square)
            .inspect_err(log_failure)?
            .into_iter()
            .map(Move::to)
            .collect();
        targets.sort_unstable();
        Ok(targets)
    }

    /// Validates the move of the piece on `from` to `to` and applies it if it
    /// is legal. Returns the applied move.
    ///
    /// # Errors
    ///
    /// Returns [`ChessError::IllegalMove`] and leaves the game unchanged if
    /// the move is rejected. [`ChessError::InvariantViolation`] is fatal: the
    /// session should not continue.
    pub fn attempt_move(&mut self, from: Square, to: Square) -> Result<Move> {
        if self.status.is_over() {
            let rejection = ChessError::IllegalMove {
                from,
                to,
                reason: RejectReason::GameOver,
            };
            log_failure(&rejection);
            return Err(rejection);
        }
        let next_move =
            rules::validate_move(&mut self.board, from, to).inspect_err(log_failure)?;
        self.board.apply_move(next_move).inspect_err(log_failure)?;
        self.status = rules::status(&mut self.board).inspect_err(log_failure)?;
        info!(%next_move, status = %self.status, "applied move");
        if self.status.is_over() {
            info!(status = %self.status, moves = self.board.history().len(), "game over");
        }
        Ok(next_move)
    }

    /// Square of the king of the player to move if that king is in check.
    #[must_use]
    pub fn checked_king(&self) -> Option<Square> {
        let player = self.board.side_to_move();
        let king = self.board.king_square(player).ok()?;
        rules::is_square_attacked(&self.board, king, player.opponent()).then_some(king)
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

fn log_failure(failure: &ChessError) {
    if failure.is_fatal() {
        error!(%failure, "board is corrupted");
    } else {
        debug!(%failure, "move rejected");
    }
}
