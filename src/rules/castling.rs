/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::{Board, Piece, PieceKind, Square, StatusChecker};

/// Number of steps away from its square that the King must not be attacked on.
///
/// Covers the King's own square, the square it crosses, and the square it lands on.
const GUARDED_STEPS: u8 = 2;

/// Walks from the King towards a Rook, one file at a time, to decide whether a castle is allowed.
///
/// The castle is allowed when the King has never moved, every square between it and the Rook is
/// empty, the Rook at the end of the walk has never moved, and the King is not attacked on its own
/// square, the square it crosses, or the square it lands on.
#[derive(Debug)]
pub struct CastlingChecker<'a> {
    board: &'a Board,
    king: Piece,
    turn: u32,

    /// File direction of the walk: `-1` towards file A (long), `+1` towards file H (short).
    modifier: i8,
}

impl<'a> CastlingChecker<'a> {
    pub fn new(board: &'a Board, king: &Piece, target: Square, turn: u32) -> Self {
        let modifier = if target.col() < king.square().col() {
            -1
        } else {
            1
        };

        Self {
            board,
            king: *king,
            turn,
            modifier,
        }
    }

    /// Runs the walk from the King's current square.
    pub fn check(&self) -> bool {
        self.king.is_kind(PieceKind::King)
            && self.king.move_count() == 0
            && self.visit(self.king.square(), 0)
    }

    /// Checks the square `count` steps from the King, then inspects its neighbor in the direction
    /// of travel.
    fn visit(&self, square: Square, count: u8) -> bool {
        if count <= GUARDED_STEPS && self.attacked_on(square, count) {
            return false;
        }

        let Some(next) = square.offset(0, self.modifier) else {
            return false;
        };

        match self.board.piece_at(next) {
            Some(rook) if rook.is_kind(PieceKind::Rook) && rook.color() == self.king.color() => {
                rook.move_count() == 0
            }
            Some(_) => false,
            None => self.visit(next, count + 1),
        }
    }

    /// Would the King be in check standing on `square`?
    ///
    /// The first square is the King's own and is tested in place. Later squares are tested by
    /// moving the King there on a clone.
    fn attacked_on(&self, square: Square, count: u8) -> bool {
        let color = self.king.color();

        if count == 0 {
            return StatusChecker::new(self.board, color, self.turn).own_king_in_check(None);
        }

        let mut clone = self.board.speculative_clone();
        clone.move_piece_to_target(square, &self.king);
        StatusChecker::new(&clone, color, self.turn).own_king_in_check(None)
    }
}

/// Returns `true` if `king` may castle by jumping to `target`.
///
/// # Example
/// ```
/// # use squire::{castling_allowed, Board, Color, Piece, PieceKind, Square};
/// let board = Board::from_pieces([
///     Piece::new(Color::White, PieceKind::King, Square::E1),
///     Piece::new(Color::White, PieceKind::Rook, Square::H1),
/// ]);
/// let king = *board.piece_at(Square::E1).unwrap();
/// assert!(castling_allowed(&board, &king, Square::G1, 1));
/// assert!(!castling_allowed(&board, &king, Square::C1, 1));
/// ```
#[inline(always)]
pub fn castling_allowed(board: &Board, king: &Piece, target: Square, turn: u32) -> bool {
    CastlingChecker::new(board, king, target, turn).check()
}
