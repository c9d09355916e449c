/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::{Board, Color, Piece, PieceKind, Square};

/// Rank on which a pawn of `color` can be captured en passant.
///
/// That is, the rank a pawn of that color lands on after its double-step.
#[inline(always)]
pub const fn en_passant_rank(color: Color) -> u8 {
    match color {
        Color::White => 4,
        Color::Black => 5,
    }
}

/// Returns `true` if `pawn` may capture en passant by moving diagonally onto the empty `target`.
///
/// The victim must be an enemy pawn standing beside `pawn` on `target`'s file, sitting on its
/// en passant rank, and it must have double-stepped on the turn immediately before `turn`.
///
/// # Example
/// ```
/// # use squire::{en_passant_allowed, Board, Color, Piece, PieceKind, Square};
/// let board = Board::from_pieces([
///     Piece::new(Color::White, PieceKind::Pawn, Square::E5).with_move_count(2),
///     Piece::new(Color::Black, PieceKind::Pawn, Square::D5)
///         .with_move_count(1)
///         .with_double_step(6),
/// ]);
/// let pawn = *board.piece_at(Square::E5).unwrap();
///
/// assert!(en_passant_allowed(&board, &pawn, Square::D6, 7));
/// assert!(!en_passant_allowed(&board, &pawn, Square::D6, 8));
/// ```
pub fn en_passant_allowed(board: &Board, pawn: &Piece, target: Square, turn: u32) -> bool {
    let behind = Square::new_unchecked(pawn.square().row(), target.col());

    let Some(victim) = board.piece_at(behind) else {
        return false;
    };

    if !victim.is_kind(PieceKind::Pawn) || victim.color() == pawn.color() {
        return false;
    }

    victim.square().rank() == en_passant_rank(victim.color())
        && victim
            .double_step_turn()
            .is_some_and(|double_stepped| turn.checked_sub(double_stepped) == Some(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_black_captures_white() {
        let board = Board::from_pieces([
            Piece::new(Color::Black, PieceKind::Pawn, Square::C4).with_move_count(2),
            Piece::new(Color::White, PieceKind::Pawn, Square::B4)
                .with_move_count(1)
                .with_double_step(11),
        ]);
        let pawn = *board.piece_at(Square::C4).unwrap();

        assert!(en_passant_allowed(&board, &pawn, Square::B3, 12));
        assert!(!en_passant_allowed(&board, &pawn, Square::D3, 12));
        assert!(!en_passant_allowed(&board, &pawn, Square::B3, 13));
        assert!(!en_passant_allowed(&board, &pawn, Square::B3, 11));
    }

    #[test]
    fn test_requires_pawn_that_double_stepped() {
        let board = Board::from_pieces([
            Piece::new(Color::White, PieceKind::Pawn, Square::E5).with_move_count(2),
            Piece::new(Color::Black, PieceKind::Pawn, Square::D5).with_move_count(2),
            Piece::new(Color::Black, PieceKind::Knight, Square::F5),
        ]);
        let pawn = *board.piece_at(Square::E5).unwrap();

        assert!(!en_passant_allowed(&board, &pawn, Square::D6, 7));
        assert!(!en_passant_allowed(&board, &pawn, Square::F6, 7));
    }

    #[test]
    fn test_wrong_rank() {
        // A black pawn that double-stepped but then advanced again is no longer capturable
        let board = Board::from_pieces([
            Piece::new(Color::White, PieceKind::Pawn, Square::E4).with_move_count(1),
            Piece::new(Color::Black, PieceKind::Pawn, Square::D4)
                .with_move_count(2)
                .with_double_step(6),
        ]);
        let pawn = *board.piece_at(Square::E4).unwrap();

        assert!(!en_passant_allowed(&board, &pawn, Square::D5, 7));
    }
}
