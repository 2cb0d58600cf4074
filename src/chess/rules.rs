//! Legal move generation and game state classification.
//!
//! Legality is checked by simulation: the candidate move is applied, the
//! mover's king is tested for attacks and the move is taken back. The board is
//! borrowed mutably for the duration of each query but is left exactly as it
//! was when the query returns, whatever the outcome.

use std::fmt;
use std::ops::Deref;

use itertools::Itertools;
use tracing::{error, trace};

use crate::chess::attacks;
use crate::chess::board::{player_name, Board};
use crate::chess::core::{Move, PieceKind, Player, Square};
use crate::chess::error::{ChessError, RejectReason, Result};

/// State of the game as seen by the player who is to move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    /// The game continues and the given player is to move.
    InProgress(Player),
    #[allow(missing_docs)]
    Checkmate { winner: Player },
    /// The player to move has no legal moves but is not in check. The game is
    /// drawn.
    Stalemate,
}

impl GameStatus {
    /// Returns true for checkmate and stalemate.
    #[must_use]
    pub const fn is_over(self) -> bool {
        !matches!(self, Self::InProgress(_))
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InProgress(Player::White) => f.write_str("White to move"),
            Self::InProgress(Player::Black) => f.write_str("Black to move"),
            Self::Checkmate {
                winner: Player::White,
            } => f.write_str("checkmate, White wins"),
            Self::Checkmate {
                winner: Player::Black,
            } => f.write_str("checkmate, Black wins"),
            Self::Stalemate => f.write_str("stalemate"),
        }
    }
}

/// A move applied to the board for the lifetime of the guard. Dropping the
/// guard takes the move back, so the board is restored on every exit path of
/// the simulating code.
struct Simulation<'a> {
    board: &'a mut Board,
}

impl<'a> Simulation<'a> {
    fn new(board: &'a mut Board, next_move: Move) -> Result<Self> {
        board.apply_move(next_move)?;
        Ok(Self { board })
    }
}

impl Deref for Simulation<'_> {
    type Target = Board;

    fn deref(&self) -> &Board {
        self.board
    }
}

impl Drop for Simulation<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.board.undo_last_move() {
            error!("failed to take back simulated move: {e}");
        }
    }
}

/// Returns true if making the move does not leave the mover's king attacked.
///
/// # Errors
///
/// Propagates [`ChessError::IllegalState`] for moves inconsistent with the
/// board and [`ChessError::InvariantViolation`] if the mover has no king.
fn keeps_king_safe(board: &mut Board, candidate: Move) -> Result<bool> {
    let mover = board.side_to_move();
    let simulation = Simulation::new(board, candidate)?;
    let king = simulation.king_square(mover)?;
    let safe = !attacks::is_attacked(&simulation, king, mover.opponent());
    trace!(%candidate, safe, "simulated move");
    Ok(safe)
}

/// Generates the moves of the piece on `from` that follow its movement
/// pattern, ignoring king safety. The piece does not have to belong to the
/// player to move.
#[must_use]
pub fn pseudo_legal_moves(board: &Board, from: Square) -> Vec<Move> {
    let Some(piece) = board.piece_at(from) else {
        return Vec::new();
    };
    attacks::targets(board, from)
        .into_iter()
        .map(|to| Move::new(from, to, piece, board.piece_at(to)))
        .collect()
}

/// Legal moves of the piece on `from`.
///
/// Returns an empty list if the square is empty or holds a piece of the player
/// who is not to move. Moves capturing the enemy king never appear in legal
/// positions and are skipped.
///
/// # Errors
///
/// Returns [`ChessError::InvariantViolation`] if the board has no king of the
/// player to move.
pub fn legal_moves_from(board: &mut Board, from: Square) -> Result<Vec<Move>> {
    match board.piece_at(from) {
        Some(piece) if piece.owner == board.side_to_move() => (),
        _ => return Ok(Vec::new()),
    }
    let mut moves = Vec::new();
    for candidate in pseudo_legal_moves(board, from) {
        if candidate.captured().is_some_and(|captured| captured.kind == PieceKind::King) {
            continue;
        }
        if keeps_king_safe(board, candidate)? {
            moves.push(candidate);
        }
    }
    Ok(moves)
}

/// All legal moves of the player to move.
///
/// # Errors
///
/// See [`legal_moves_from`].
pub fn legal_moves(board: &mut Board) -> Result<Vec<Move>> {
    let player = board.side_to_move();
    let origins = board.pieces(player).map(|(square, _)| square).collect_vec();
    let mut moves = Vec::new();
    for from in origins {
        moves.extend(legal_moves_from(board, from)?);
    }
    Ok(moves)
}

/// Checks whether moving the piece on `from` to `to` is legal for the player
/// to move and builds the corresponding [`Move`].
///
/// # Errors
///
/// Returns [`ChessError::IllegalMove`] with the first reason that applies, in
/// order: [`RejectReason::EmptySquare`], [`RejectReason::NotYourPiece`],
/// [`RejectReason::UnreachableSquare`], [`RejectReason::LeavesKingInCheck`].
/// Board invariant violations are propagated.
pub fn validate_move(board: &mut Board, from: Square, to: Square) -> Result<Move> {
    let reject = |reason| ChessError::IllegalMove { from, to, reason };
    let piece = board
        .piece_at(from)
        .ok_or_else(|| reject(RejectReason::EmptySquare))?;
    if piece.owner != board.side_to_move() {
        return Err(reject(RejectReason::NotYourPiece));
    }
    let candidate = pseudo_legal_moves(board, from)
        .into_iter()
        .find(|candidate| candidate.to() == to)
        .ok_or_else(|| reject(RejectReason::UnreachableSquare))?;
    if candidate.captured().is_some_and(|captured| captured.kind == PieceKind::King) {
        // The opponent's king can only be attacked if the mover's previous
        // move was illegal.
        return Err(ChessError::InvariantViolation(format!(
            "{candidate} captures the king"
        )));
    }
    if keeps_king_safe(board, candidate)? {
        Ok(candidate)
    } else {
        Err(reject(RejectReason::LeavesKingInCheck))
    }
}

/// Returns true if any piece of `by` attacks `square`. Empty squares count:
/// a pawn attacks both forward diagonals but not the squares it pushes to.
#[must_use]
pub fn is_square_attacked(board: &Board, square: Square, by: Player) -> bool {
    attacks::is_attacked(board, square, by)
}

/// Returns true if the king of `player` is attacked.
///
/// # Errors
///
/// Returns [`ChessError::InvariantViolation`] if `player` does not have
/// exactly one king.
pub fn is_in_check(board: &Board, player: Player) -> Result<bool> {
    Ok(attacks::is_attacked(
        board,
        board.king_square(player)?,
        player.opponent(),
    ))
}

/// Squares of the opponent pieces giving check to the king of `player`,
/// empty if the king is safe.
///
/// # Errors
///
/// Returns [`ChessError::InvariantViolation`] if `player` does not have
/// exactly one king.
pub fn checkers(board: &Board, player: Player) -> Result<Vec<Square>> {
    let king = board.king_square(player)?;
    Ok(attacks::attackers(board, king, player.opponent()).collect())
}

fn has_legal_moves(board: &mut Board) -> Result<bool> {
    let player = board.side_to_move();
    let origins = board.pieces(player).map(|(square, _)| square).collect_vec();
    for from in origins {
        if !legal_moves_from(board, from)?.is_empty() {
            return Ok(true);
        }
    }
    Ok(false)
}

/// The player to move is in check and has no legal moves.
///
/// # Errors
///
/// See [`is_in_check`].
pub fn is_checkmate(board: &mut Board) -> Result<bool> {
    Ok(is_in_check(board, board.side_to_move())? && !has_legal_moves(board)?)
}

/// The player to move is not in check and has no legal moves.
///
/// # Errors
///
/// See [`is_in_check`].
pub fn is_stalemate(board: &mut Board) -> Result<bool> {
    Ok(!is_in_check(board, board.side_to_move())? && !has_legal_moves(board)?)
}

/// Classifies the position from the perspective of the player to move.
///
/// # Errors
///
/// Returns [`ChessError::InvariantViolation`] if either king is missing or
/// duplicated, or if the player who just moved left their king in check.
pub fn status(board: &mut Board) -> Result<GameStatus> {
    let player = board.side_to_move();
    if is_in_check(board, player.opponent())? {
        return Err(ChessError::InvariantViolation(format!(
            "{} king is attacked but it is {} to move",
            player_name(player.opponent()),
            player_name(player)
        )));
    }
    if has_legal_moves(board)? {
        return Ok(GameStatus::InProgress(player));
    }
    if is_in_check(board, player)? {
        Ok(GameStatus::Checkmate {
            winner: player.opponent(),
        })
    } else {
        Ok(GameStatus::Stalemate)
    }
}

/// [Perft] (**per**formance **t**esting) counts the leaf nodes of the legal
/// move tree of the given depth. The numbers for well-known positions validate
/// move generation.
///
/// # Errors
///
/// Propagates board invariant violations.
///
/// [Perft]: https://www.chessprogramming.org/Perft
pub fn perft(board: &mut Board, depth: u8) -> Result<u64> {
    if depth == 0 {
        return Ok(1);
    }
    let moves = legal_moves(board)?;
    if depth == 1 {
        return Ok(moves.len() as u64);
    }
    let mut nodes = 0;
    for next_move in moves {
        board.apply_move(next_move)?;
        let subtree = perft(board, depth - 1);
        let _ = board.undo_last_move()?;
        nodes += subtree?;
    }
    Ok(nodes)
}
