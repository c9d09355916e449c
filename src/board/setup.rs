/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::{Board, Color, Piece, PieceKind, Square};

/// Back rank order from file A to file H.
const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// Rows holding each side's back rank and pawns, as `(color, back rank row, pawn row)`.
const HOME_ROWS: [(Color, u8, u8); Color::COUNT] = [(Color::White, 7, 6), (Color::Black, 0, 1)];

/// The 32 pieces of a standard game, each on its fixed starting square.
///
/// # Example
/// ```
/// # use squire::{starting_pieces, Color};
/// let pieces = starting_pieces();
/// assert_eq!(pieces.len(), 32);
/// assert_eq!(pieces.iter().filter(|p| p.color() == Color::White).count(), 16);
/// ```
pub fn starting_pieces() -> Vec<Piece> {
    let mut pieces = Vec::with_capacity(32);

    for (color, back_row, pawn_row) in HOME_ROWS {
        for (col, kind) in BACK_RANK.into_iter().enumerate() {
            let col = col as u8;
            pieces.push(Piece::new(color, kind, Square::new_unchecked(back_row, col)));
            pieces.push(Piece::new(
                color,
                PieceKind::Pawn,
                Square::new_unchecked(pawn_row, col),
            ));
        }
    }

    pieces
}

impl Board {
    /// A [`Board`] in the standard starting layout.
    #[inline(always)]
    pub fn standard() -> Self {
        Self::from_pieces(starting_pieces())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_layout() {
        let board = Board::standard();
        assert_eq!(board.pieces().count(), 32);

        let white_king = board.piece_at(Square::E1).unwrap();
        assert_eq!(white_king.kind(), PieceKind::King);
        assert_eq!(white_king.color(), Color::White);

        let black_queen = board.piece_at(Square::D8).unwrap();
        assert_eq!(black_queen.kind(), PieceKind::Queen);
        assert_eq!(black_queen.color(), Color::Black);

        for col in 0..8 {
            let white_pawn = board.piece_at(Square::new_unchecked(6, col)).unwrap();
            assert_eq!(white_pawn.start_square(), Some(white_pawn.square()));
            assert!(white_pawn.is_kind(PieceKind::Pawn));
            assert!(board
                .piece_at(Square::new_unchecked(1, col))
                .is_some_and(|p| p.color() == Color::Black && p.is_kind(PieceKind::Pawn)));
        }

        for row in 2..6 {
            for col in 0..8 {
                assert!(!board.is_occupied(Square::new_unchecked(row, col)));
            }
        }
    }

    #[test]
    fn test_each_setup_is_independent() {
        let mut first = Board::standard();
        let second = Board::standard();
        first.delete_piece_at(Square::E1);
        assert!(second.is_occupied(Square::E1));
    }
}
