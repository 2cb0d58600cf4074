//! Movement patterns of the pieces and the attack queries built on top of
//! them.
//!
//! Each [`PieceKind`] maps to a [`Movement`] which is either a fixed set of
//! jumps (knight, king), a set of ray directions (bishop, rook, queen) or the
//! pawn rules. Targets produced here are *pseudo-legal*: whether the mover's
//! king stays safe is checked by [`crate::chess::rules`].

use arrayvec::ArrayVec;

use crate::chess::board::Board;
use crate::chess::core::{PieceKind, Player, Rank, Square};

/// Upper bound on the number of targets of a single piece: a queen in the
/// center of an otherwise empty board.
pub const MAX_TARGETS: usize = 27;

/// Squares a single piece can move to.
pub type Targets = ArrayVec<Square, MAX_TARGETS>;

/// How a piece of a given kind moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Movement {
    /// Jumps straight to each `(file, rank)` offset, ignoring the squares in
    /// between.
    Leaper(&'static [(i8, i8)]),
    /// Walks each direction until the edge of the board or the first occupied
    /// square (included if it holds an enemy piece).
    Slider(&'static [(i8, i8)]),
    /// Pushes forward onto empty squares, captures diagonally forward.
    Pawn,
}

const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];
const DIAGONALS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];
const ORTHOGONALS: [(i8, i8); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];
// King steps and queen rays share the directions.
const ALL_DIRECTIONS: [(i8, i8); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

#[allow(missing_docs)]
#[must_use]
pub const fn movement(kind: PieceKind) -> Movement {
    match kind {
        PieceKind::King => Movement::Leaper(&ALL_DIRECTIONS),
        PieceKind::Queen => Movement::Slider(&ALL_DIRECTIONS),
        PieceKind::Rook => Movement::Slider(&ORTHOGONALS),
        PieceKind::Bishop => Movement::Slider(&DIAGONALS),
        PieceKind::Knight => Movement::Leaper(&KNIGHT_JUMPS),
        PieceKind::Pawn => Movement::Pawn,
    }
}

/// Calculates the squares the piece on `from` can move to, regardless of
/// whose turn it is. Returns no targets for an empty square.
///
/// Squares occupied by pieces of the same color are never included, squares
/// occupied by the enemy pieces (kings included) are.
#[must_use]
pub fn targets(board: &Board, from: Square) -> Targets {
    let mut targets = Targets::new();
    let Some(piece) = board.piece_at(from) else {
        return targets;
    };
    let reachable =
        |to: Square| board.piece_at(to).map_or(true, |occupant| occupant.owner != piece.owner);
    match movement(piece.kind) {
        Movement::Leaper(jumps) => targets.extend(
            jumps
                .iter()
                .filter_map(|&(file_delta, rank_delta)| from.offset(file_delta, rank_delta))
                .filter(|&to| reachable(to)),
        ),
        Movement::Slider(directions) => {
            for &(file_delta, rank_delta) in directions {
                let mut current = from;
                while let Some(to) = current.offset(file_delta, rank_delta) {
                    if reachable(to) {
                        targets.push(to);
                    }
                    if board.piece_at(to).is_some() {
                        break;
                    }
                    current = to;
                }
            }
        },
        Movement::Pawn => pawn_targets(board, from, piece.owner, &mut targets),
    }
    targets
}

fn pawn_targets(board: &Board, from: Square, owner: Player, targets: &mut Targets) {
    let forward = owner.push_direction();
    let is_empty = |square: &Square| board.piece_at(*square).is_none();
    if let Some(single_push) = from.offset(0, forward).filter(is_empty) {
        targets.push(single_push);
        if from.rank() == Rank::pawns_starting(owner) {
            if let Some(double_push) = single_push.offset(0, forward).filter(is_empty) {
                targets.push(double_push);
            }
        }
    }
    for file_delta in [-1, 1] {
        let Some(to) = from.offset(file_delta, forward) else {
            continue;
        };
        if board.piece_at(to).is_some_and(|occupant| occupant.owner != owner) {
            targets.push(to);
        }
    }
}

/// Calculates the squares the piece on `from` attacks: the squares where it
/// would capture an enemy piece. Returns no squares for an empty square.
///
/// Unlike [`targets`], pawns attack both forward diagonals whether they are
/// occupied or not and never attack with a push. Squares held by pieces of the
/// same color are included (they are defended).
#[must_use]
pub fn attacks(board: &Board, from: Square) -> Targets {
    let mut attacked = Targets::new();
    let Some(piece) = board.piece_at(from) else {
        return attacked;
    };
    match movement(piece.kind) {
        Movement::Leaper(jumps) => attacked.extend(
            jumps
                .iter()
                .filter_map(|&(file_delta, rank_delta)| from.offset(file_delta, rank_delta)),
        ),
        Movement::Slider(directions) => {
            for &(file_delta, rank_delta) in directions {
                let mut current = from;
                while let Some(to) = current.offset(file_delta, rank_delta) {
                    attacked.push(to);
                    if board.piece_at(to).is_some() {
                        break;
                    }
                    current = to;
                }
            }
        },
        Movement::Pawn => attacked.extend(
            [-1, 1]
                .into_iter()
                .filter_map(|file_delta| from.offset(file_delta, piece.owner.push_direction())),
        ),
    }
    attacked
}

/// Returns true if any piece of player `by` attacks `square`, whether the
/// square is empty or occupied.
#[must_use]
pub fn is_attacked(board: &Board, square: Square, by: Player) -> bool {
    attackers(board, square, by).next().is_some()
}

/// Squares of the pieces of player `by` that attack `square`.
pub fn attackers(board: &Board, square: Square, by: Player) -> impl Iterator<Item = Square> + '_ {
    board
        .pieces(by)
        .map(|(from, _)| from)
        .filter(move |&from| attacks(board, from).contains(&square))
}

#[cfg(test)]
mod test {
    use itertools::Itertools;
    use pretty_assertions::assert_eq;

    use super::*;

    fn sorted_targets(fen: &str, from: Square) -> Vec<Square> {
        let board = Board::try_from(fen).unwrap();
        targets(&board, from).into_iter().sorted().collect()
    }

    #[test]
    fn knight() {
        assert_eq!(
            sorted_targets("4k3/8/8/8/8/8/8/N3K3 w - - 0 1", Square::A1),
            vec![Square::C2, Square::B3]
        );
        assert_eq!(
            sorted_targets("4k3/8/8/8/3N4/8/8/4K3 w - - 0 1", Square::D4),
            vec![
                Square::C2,
                Square::E2,
                Square::B3,
                Square::F3,
                Square::B5,
                Square::F5,
                Square::C6,
                Square::E6
            ]
        );
        // Knights jump over pieces.
        assert_eq!(
            sorted_targets(crate::chess::board::STARTING_FEN, Square::B1),
            vec![Square::A3, Square::C3]
        );
    }

    #[test]
    fn sliders_stop_at_blockers() {
        // The rook can capture the black knight but can not move onto its own
        // pawn.
        assert_eq!(
            sorted_targets("4k3/8/8/8/1n1R2P1/8/8/4K3 w - - 0 1", Square::D4),
            vec![
                Square::D1,
                Square::D2,
                Square::D3,
                Square::B4,
                Square::C4,
                Square::E4,
                Square::F4,
                Square::D5,
                Square::D6,
                Square::D7,
                Square::D8
            ]
        );
        assert_eq!(
            sorted_targets("4k3/8/8/8/8/8/8/B3K3 w - - 0 1", Square::A1),
            vec![
                Square::B2,
                Square::C3,
                Square::D4,
                Square::E5,
                Square::F6,
                Square::G7,
                Square::H8
            ]
        );
        assert_eq!(
            targets(
                &Board::try_from("4k3/8/8/3Q4/8/8/8/4K3 w - - 0 1").unwrap(),
                Square::D5
            )
            .len(),
            MAX_TARGETS
        );
        assert!(targets(&Board::starting(), Square::D1).is_empty());
    }

    #[test]
    fn pawns() {
        assert_eq!(
            sorted_targets(crate::chess::board::STARTING_FEN, Square::E2),
            vec![Square::E3, Square::E4]
        );
        assert_eq!(
            sorted_targets(crate::chess::board::STARTING_FEN, Square::D7),
            vec![Square::D5, Square::D6]
        );
        // Blocked double push.
        assert_eq!(
            sorted_targets("4k3/8/8/8/4n3/8/4P3/4K3 w - - 0 1", Square::E2),
            vec![Square::E3]
        );
        // Blocked pawns still capture diagonally.
        assert_eq!(
            sorted_targets("4k3/8/8/8/8/3pn3/4P3/4K3 w - - 0 1", Square::E2),
            vec![Square::D3]
        );
        // Only one step outside the starting rank.
        assert_eq!(
            sorted_targets("4k3/8/8/8/8/4P3/8/4K3 w - - 0 1", Square::E3),
            vec![Square::E4]
        );
        // Pawns do not capture straight ahead.
        assert!(sorted_targets("4k3/8/8/8/8/4p3/4P3/4K3 w - - 0 1", Square::E2).is_empty());
    }

    #[test]
    fn empty_square_has_no_targets() {
        assert!(targets(&Board::starting(), Square::E4).is_empty());
    }

    #[test]
    fn attackers_of_occupied_squares() {
        let board = Board::try_from("4k3/8/8/8/8/8/3p4/R3K3 w - - 0 1").unwrap();
        assert!(is_attacked(&board, Square::E1, Player::Black));
        assert!(!is_attacked(&board, Square::E8, Player::White));
        assert!(is_attacked(&board, Square::D2, Player::White));
        assert_eq!(
            attackers(&board, Square::D2, Player::White).collect_vec(),
            vec![Square::E1]
        );
        assert_eq!(
            attackers(&board, Square::E1, Player::Black).collect_vec(),
            vec![Square::D2]
        );
    }

    #[test]
    fn attacks_on_empty_squares() {
        let board = Board::starting();
        // Pushes do not attack, diagonals do.
        assert!(!is_attacked(&board, Square::E4, Player::White));
        assert!(is_attacked(&board, Square::E3, Player::White));
        assert!(!is_attacked(&board, Square::E5, Player::Black));
        assert!(is_attacked(&board, Square::F6, Player::Black));

        let board = Board::try_from("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1").unwrap();
        assert!(is_attacked(&board, Square::D3, Player::White));
        assert!(is_attacked(&board, Square::F3, Player::White));
        assert!(!is_attacked(&board, Square::E3, Player::White));
        assert_eq!(
            attacks(&board, Square::E2).into_iter().sorted().collect_vec(),
            vec![Square::D3, Square::F3]
        );
    }

    #[test]
    fn defended_squares() {
        let board = Board::starting();
        assert_eq!(
            attackers(&board, Square::D2, Player::White).sorted().collect_vec(),
            vec![Square::B1, Square::C1, Square::D1, Square::E1]
        );
        // The rook is blocked by its own knight but defends it.
        assert_eq!(
            attacks(&board, Square::A1).into_iter().sorted().collect_vec(),
            vec![Square::B1, Square::A2]
        );
        assert!(attacks(&board, Square::E4).is_empty());
    }
}
