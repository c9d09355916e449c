/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use super::{Color, Manner, Piece, PieceKind, Ray, Square};

/// An `8x8` grid of optional [`Piece`]s.
///
/// Every occupied cell holds exactly one piece, and that piece's [`Piece::square`] always equals
/// the cell it occupies. All mutators below preserve this.
///
/// Cloning a [`Board`] copies every piece it holds, so a clone can be freely mutated to test
/// "what if" scenarios without touching the original.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Board {
    mailbox: [Option<Piece>; Square::COUNT],
}

impl Board {
    /// Creates a new, empty [`Board`].
    #[inline(always)]
    pub const fn new() -> Self {
        Self {
            mailbox: [None; Square::COUNT],
        }
    }

    /// Creates a [`Board`] holding the provided pieces, each on its own recorded square.
    ///
    /// Later pieces overwrite earlier ones that claim the same square.
    ///
    /// # Example
    /// ```
    /// # use squire::{Board, Color, Piece, PieceKind, Square};
    /// let board = Board::from_pieces([
    ///     Piece::new(Color::White, PieceKind::King, Square::E1),
    ///     Piece::new(Color::Black, PieceKind::King, Square::E8),
    /// ]);
    /// assert!(board.is_occupied(Square::E8));
    /// ```
    pub fn from_pieces(pieces: impl IntoIterator<Item = Piece>) -> Self {
        let mut board = Self::new();
        for piece in pieces {
            board.set_piece_at(piece.square(), piece);
        }
        board
    }

    /// Returns an explicit deep copy of this board for speculative evaluation.
    ///
    /// Pieces are owned values, so the copy shares nothing with `self`.
    #[inline(always)]
    pub fn speculative_clone(&self) -> Self {
        Self {
            mailbox: self.mailbox,
        }
    }

    /// Fetches the [`Piece`] at the provided [`Square`], if there is one.
    #[inline(always)]
    pub const fn piece_at(&self, square: Square) -> Option<&Piece> {
        self.mailbox[square.index()].as_ref()
    }

    /// Mutable access to the [`Piece`] at the provided [`Square`], if there is one.
    #[inline(always)]
    pub fn piece_at_mut(&mut self, square: Square) -> Option<&mut Piece> {
        self.mailbox[square.index()].as_mut()
    }

    /// Places `piece` on `square`, replacing any occupant, and records `square` on the piece.
    ///
    /// The piece's previous cell, if any, is *not* cleared. Use [`Board::move_piece_to_target`]
    /// to relocate a piece that is already on the board.
    #[inline(always)]
    pub fn set_piece_at(&mut self, square: Square, mut piece: Piece) {
        piece.set_square(square);
        self.mailbox[square.index()] = Some(piece);
    }

    /// Removes and returns whatever occupies `square`.
    #[inline(always)]
    pub fn delete_piece_at(&mut self, square: Square) -> Option<Piece> {
        self.mailbox[square.index()].take()
    }

    /// Returns `true` if there is a piece at the given [`Square`].
    #[inline(always)]
    pub const fn is_occupied(&self, square: Square) -> bool {
        self.mailbox[square.index()].is_some()
    }

    /// Returns `true` if both coordinates lie on the board.
    #[inline(always)]
    pub const fn within_limits(row: i8, col: i8) -> bool {
        Square::within_limits(row, col)
    }

    /// Returns `true` if `square` holds a piece of the same color as `piece`.
    #[inline(always)]
    pub fn same_color_at(&self, square: Square, piece: &Piece) -> bool {
        self.piece_at(square)
            .is_some_and(|occupant| occupant.color() == piece.color())
    }

    /// Returns `true` if `square` holds a piece of the opposite color to `piece`.
    #[inline(always)]
    pub fn enemy_at(&self, square: Square, piece: &Piece) -> bool {
        self.piece_at(square)
            .is_some_and(|occupant| occupant.color() != piece.color())
    }

    /// An iterator over every piece on the board, from A8 to H1.
    #[inline(always)]
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.mailbox.iter().flatten()
    }

    /// Copies of every piece of the provided [`Color`].
    pub fn all_allies(&self, color: Color) -> Vec<Piece> {
        self.pieces()
            .filter(|piece| piece.color() == color)
            .copied()
            .collect()
    }

    /// Copies of every piece *not* of the provided [`Color`].
    pub fn all_enemies(&self, color: Color) -> Vec<Piece> {
        self.all_allies(color.opponent())
    }

    /// The first piece of `color` and `kind` found on the board.
    #[inline(always)]
    pub fn find(&self, color: Color, kind: PieceKind) -> Option<&Piece> {
        self.pieces()
            .find(|piece| piece.color() == color && piece.is_kind(kind))
    }

    /// The square of `color`'s King, if it is on the board.
    #[inline(always)]
    pub fn find_own_king(&self, color: Color) -> Option<Square> {
        self.find(color, PieceKind::King).map(Piece::square)
    }

    /// Every enemy of `color` whose raw movement reaches `color`'s King.
    ///
    /// If `target` is supplied, that square is tested instead of the King's, which is used to ask
    /// "would the King be attacked if it stood there?".
    ///
    /// Only geometry is consulted here, never the full move validator, since the validator itself
    /// asks this question.
    pub fn enemies_giving_check(&self, color: Color, target: Option<Square>) -> Vec<Piece> {
        let Some(target) = target.or_else(|| self.find_own_king(color)) else {
            return Vec::new();
        };

        self.pieces()
            .filter(|enemy| enemy.color() != color && self.attacks(enemy, target))
            .copied()
            .collect()
    }

    /// Returns `true` if `piece` could capture on `target` by geometry alone.
    ///
    /// Sliders may not pass through occupied squares, pawns only attack diagonally forward,
    /// and the King's castling jump never counts as an attack.
    pub fn attacks(&self, piece: &Piece, target: Square) -> bool {
        let from = piece.square();
        if from == target {
            return false;
        }

        match piece.kind() {
            PieceKind::Pawn => {
                let (dr, dc) = from.delta_to(target);
                dr == piece.color().forward() && dc.abs() == 1
            }

            PieceKind::King => {
                let (dr, dc) = from.delta_to(target);
                dr.abs() <= 1 && dc.abs() <= 1
            }

            _ => self.reaches(piece, target),
        }
    }

    /// Returns `true` if `target` is one application of `piece`'s [`Manner`] away.
    ///
    /// Sliders walk each direction recursively, failing that direction when stepping off the board
    /// or onto an occupied square other than `target`.
    pub fn reaches(&self, piece: &Piece, target: Square) -> bool {
        match piece.manner() {
            Manner::Sliding(directions) => directions
                .iter()
                .any(|&direction| self.slide(piece.square(), direction, target)),

            Manner::Stepping(offsets) => offsets.contains(&piece.square().delta_to(target)),
        }
    }

    /// Recursive step along `direction` from `from`, looking for `target`.
    fn slide(&self, from: Square, direction: (i8, i8), target: Square) -> bool {
        let Some(next) = from.offset(direction.0, direction.1) else {
            return false;
        };

        if next == target {
            true
        } else if self.is_occupied(next) {
            false
        } else {
            self.slide(next, direction, target)
        }
    }

    /// Every square `piece` could geometrically move to, before any legality filtering.
    ///
    /// Sliders include the first occupied square of each direction (a possible capture),
    /// and steppers include every on-board offset regardless of occupancy.
    ///
    /// # Example
    /// ```
    /// # use squire::{Board, Square};
    /// let board = Board::default();
    /// let knight = *board.piece_at(Square::B1).unwrap();
    /// let mut targets = board.possible_targets(&knight);
    /// targets.sort();
    /// assert_eq!(targets, vec![Square::A3, Square::C3, Square::D2]);
    /// ```
    pub fn possible_targets(&self, piece: &Piece) -> Vec<Square> {
        let manner = piece.manner();
        match &manner {
            Manner::Sliding(directions) => {
                let mut targets = Vec::new();
                for &direction in directions.iter() {
                    for square in Ray::new(piece.square(), direction) {
                        targets.push(square);
                        if self.is_occupied(square) {
                            break;
                        }
                    }
                }
                targets
            }

            Manner::Stepping(_) => manner.steps_from(piece.square()).collect(),
        }
    }

    /// Moves `piece` onto `target`, discarding any occupant there, and clears its previous cell.
    ///
    /// The moved piece's square is updated and its move counter incremented.
    ///
    /// # Panics
    ///
    /// If `piece` is not standing on its recorded square.
    pub fn move_piece_to_target(&mut self, target: Square, piece: &Piece) {
        let from = piece.square();
        let mut moving = self.delete_piece_at(from).unwrap_or_else(|| {
            panic!("Attempted to move {piece} but {from} is empty:\n{self}")
        });

        moving.mark_moved();
        self.set_piece_at(target, moving);
    }

    /// Removes the pawn that `piece` just captured en passant by moving to `target`.
    ///
    /// The victim stands directly "behind" `target` from the capturer's point of view.
    pub fn remove_pawn_captured_en_passant(
        &mut self,
        piece: &Piece,
        target: Square,
    ) -> Option<Piece> {
        let behind = target.offset(-piece.color().forward(), 0)?;
        self.delete_piece_at(behind)
    }

    /// Relocates the Rook involved in a castle whose King landed on `target`.
    ///
    /// A King on file G pulls the H Rook to F, and a King on file C pulls the A Rook to D.
    /// Anything else is left untouched.
    pub fn move_castle(&mut self, target: Square) {
        let row = target.row();
        let (from, to) = match target.col() {
            6 => (Square::new_unchecked(row, 7), Square::new_unchecked(row, 5)),
            2 => (Square::new_unchecked(row, 0), Square::new_unchecked(row, 3)),
            _ => return,
        };

        if let Some(rook) = self.piece_at(from).copied() {
            self.move_piece_to_target(to, &rook);
        }
    }
}

impl Default for Board {
    /// The standard starting layout.
    #[inline(always)]
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Allocate just enough capacity
        let mut board = String::with_capacity(198);

        for row in 0..8 {
            board += &format!("{}| ", 8 - row);

            for col in 0..8 {
                let square = Square::new_unchecked(row, col);
                let occupant = self.piece_at(square).map(Piece::char).unwrap_or('.');
                board.push(occupant);
                board.push(' ');
            }

            board += "\n";
        }
        board += " +----------------\n";
        board += "   A B C D E F G H";

        write!(f, "{board}")
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rook(color: Color, square: Square) -> Piece {
        Piece::new(color, PieceKind::Rook, square)
    }

    #[test]
    fn test_set_piece_updates_position() {
        let mut board = Board::new();
        board.set_piece_at(Square::D4, rook(Color::White, Square::A1));

        assert_eq!(board.piece_at(Square::D4).unwrap().square(), Square::D4);
        assert!(!board.is_occupied(Square::A1));
    }

    #[test]
    fn test_move_piece_keeps_grid_and_piece_in_sync() {
        let mut board = Board::from_pieces([rook(Color::White, Square::A1)]);
        let piece = *board.piece_at(Square::A1).unwrap();

        board.move_piece_to_target(Square::A5, &piece);

        assert!(board.piece_at(Square::A1).is_none());
        let moved = board.piece_at(Square::A5).unwrap();
        assert_eq!(moved.square(), Square::A5);
        assert_eq!(moved.move_count(), 1);
    }

    #[test]
    #[should_panic]
    fn test_moving_absent_piece_panics() {
        let mut board = Board::new();
        let ghost = rook(Color::Black, Square::H8);
        board.move_piece_to_target(Square::H1, &ghost);
    }

    #[test]
    fn test_speculative_clone_does_not_alias() {
        let board = Board::from_pieces([rook(Color::White, Square::A1)]);
        let mut clone = board.speculative_clone();
        let piece = *clone.piece_at(Square::A1).unwrap();
        clone.move_piece_to_target(Square::H1, &piece);

        assert!(board.is_occupied(Square::A1));
        assert_eq!(board.piece_at(Square::A1).unwrap().move_count(), 0);
        assert!(!board.is_occupied(Square::H1));
    }

    #[test]
    fn test_slider_blocked() {
        let board = Board::from_pieces([
            rook(Color::White, Square::A8),
            Piece::new(Color::Black, PieceKind::Pawn, Square::A4),
        ]);
        let rook = board.piece_at(Square::A8).unwrap();

        assert!(board.reaches(rook, Square::A5));
        assert!(board.reaches(rook, Square::A4));
        assert!(!board.reaches(rook, Square::A3));
        assert!(!board.reaches(rook, Square::B7));
    }

    #[test]
    fn test_enemies_giving_check() {
        let board = Board::from_pieces([
            Piece::new(Color::White, PieceKind::King, Square::E1),
            rook(Color::Black, Square::E8),
            Piece::new(Color::Black, PieceKind::Pawn, Square::D2),
            Piece::new(Color::Black, PieceKind::Knight, Square::A1),
        ]);

        let checkers = board.enemies_giving_check(Color::White, None);
        assert_eq!(checkers.len(), 2);
        assert!(checkers.iter().any(|p| p.is_kind(PieceKind::Rook)));
        assert!(checkers.iter().any(|p| p.is_kind(PieceKind::Pawn)));

        // Override square: F1 is covered by neither the rook nor the pawn
        assert!(board
            .enemies_giving_check(Color::White, Some(Square::F1))
            .is_empty());
    }

    #[test]
    fn test_remove_pawn_captured_en_passant() {
        let mut board = Board::from_pieces([
            Piece::new(Color::White, PieceKind::Pawn, Square::E5),
            Piece::new(Color::Black, PieceKind::Pawn, Square::D5),
        ]);
        let pawn = *board.piece_at(Square::E5).unwrap();

        let captured = board.remove_pawn_captured_en_passant(&pawn, Square::D6);
        assert_eq!(captured.map(|p| p.square()), Some(Square::D5));
        assert!(!board.is_occupied(Square::D5));
    }

    #[test]
    fn test_move_castle() {
        let mut board = Board::from_pieces([
            rook(Color::Black, Square::A8),
            rook(Color::Black, Square::H8),
        ]);

        board.move_castle(Square::G8);
        assert!(board.piece_at(Square::F8).is_some_and(|p| p.move_count() == 1));
        assert!(!board.is_occupied(Square::H8));

        board.move_castle(Square::C8);
        assert!(board.is_occupied(Square::D8));
        assert!(!board.is_occupied(Square::A8));
    }

    #[test]
    fn test_display() {
        let board = Board::default();
        let text = board.to_string();
        assert!(text.starts_with("8| r n b q k b n r"));
        assert!(text.contains("1| R N B Q K B N R"));
    }
}
