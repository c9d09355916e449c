/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use bitflags::bitflags;
use tracing::trace;

use crate::{
    castling_allowed, en_passant_allowed, Board, Color, Piece, PieceKind, Square, KING_OFFSETS,
};

bitflags! {
    /// Special rules that a validated move relies on.
    ///
    /// The orchestrator uses these after committing a move to apply its side effects:
    /// removing the pawn captured en passant, relocating the castling Rook, or recording the
    /// turn of a double-step.
    #[derive(Default)]
    pub struct MoveFlags: u8 {
        const EN_PASSANT = 1 << 0;
        const CASTLING = 1 << 1;
        const DOUBLE_STEP = 1 << 2;
    }
}

/// A legal move: the piece that moves, where it lands, and which special rules it used.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct MoveResult {
    /// The moving piece, as it stood before the move.
    pub piece: Piece,

    /// Destination of the moving piece.
    pub target: Square,

    pub flags: MoveFlags,
}

impl MoveResult {
    /// The square the moving piece departs from.
    #[inline(always)]
    pub const fn from(&self) -> Square {
        self.piece.square()
    }

    #[inline(always)]
    pub fn is_en_passant(&self) -> bool {
        self.flags.contains(MoveFlags::EN_PASSANT)
    }

    #[inline(always)]
    pub fn is_castling(&self) -> bool {
        self.flags.contains(MoveFlags::CASTLING)
    }

    #[inline(always)]
    pub fn is_double_step(&self) -> bool {
        self.flags.contains(MoveFlags::DOUBLE_STEP)
    }

    /// Returns `true` if this move removes an enemy piece from `board`.
    ///
    /// `board` must be the position this move was validated against.
    pub fn is_capture(&self, board: &Board) -> bool {
        self.is_en_passant() || board.enemy_at(self.target, &self.piece)
    }

    /// The enemy piece this move lands on, if any. En passant victims are not included.
    pub fn victim<'a>(&self, board: &'a Board) -> Option<&'a Piece> {
        board
            .piece_at(self.target)
            .filter(|occupant| occupant.color() != self.piece.color())
    }
}

impl fmt::Display for MoveResult {
    /// Displays the move as its two squares, such as `E2E4`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from(), self.target)
    }
}

/// Evaluates whether one piece may legally move to one square on one turn.
///
/// Evaluation happens in two phases. First, a cheap geometric check decides whether the target
/// is reachable at all, consulting the castling and en passant rules where needed. Then, the move
/// is played out on a clone of the board to make sure it does not leave the mover's own King
/// under attack.
///
/// An examiner is single-use: construct one, call [`MoveExaminer::validate`], and read the
/// [`MoveFlags`] it discovered.
#[derive(Debug)]
pub struct MoveExaminer<'a> {
    board: &'a Board,
    piece: Piece,
    target: Square,
    turn: u32,
    flags: MoveFlags,
}

impl<'a> MoveExaminer<'a> {
    #[inline(always)]
    pub fn new(board: &'a Board, piece: &Piece, target: Square, turn: u32) -> Self {
        Self {
            board,
            piece: *piece,
            target,
            turn,
            flags: MoveFlags::empty(),
        }
    }

    /// Flags discovered by the most recent call to [`MoveExaminer::validate`].
    #[inline(always)]
    pub const fn flags(&self) -> MoveFlags {
        self.flags
    }

    /// Returns the target square if the move is legal, else `None`.
    pub fn validate(&mut self) -> Option<Square> {
        self.flags = MoveFlags::empty();

        if self.board.same_color_at(self.target, &self.piece) {
            return None;
        }

        if !self.reachable() {
            return None;
        }

        if self.exposes_own_king() {
            trace!(piece = %self.piece, target = %self.target, "move would leave the king attacked");
            return None;
        }

        Some(self.target)
    }

    /// Consumes this examiner, producing a [`MoveResult`] if the move is legal.
    #[inline(always)]
    pub fn examine(mut self) -> Option<MoveResult> {
        let target = self.validate()?;
        Some(MoveResult {
            piece: self.piece,
            target,
            flags: self.flags,
        })
    }

    /// Geometric reachability, dispatched on the kind of the moving piece.
    fn reachable(&mut self) -> bool {
        match self.piece.kind() {
            PieceKind::Rook | PieceKind::Bishop | PieceKind::Queen | PieceKind::Knight => {
                self.board.reaches(&self.piece, self.target)
            }

            PieceKind::King if self.is_castling_attempt() => {
                let allowed = castling_allowed(self.board, &self.piece, self.target, self.turn);
                self.flags.set(MoveFlags::CASTLING, allowed);
                allowed
            }

            PieceKind::King => KING_OFFSETS.contains(&self.piece.square().delta_to(self.target)),

            PieceKind::Pawn => self.pawn_capture() || self.pawn_advance(),
        }
    }

    /// An unmoved King jumping two files along its rank.
    fn is_castling_attempt(&self) -> bool {
        let (dr, dc) = self.piece.square().delta_to(self.target);
        self.piece.move_count() == 0 && dr == 0 && dc.abs() == 2
    }

    /// A diagonal step forward, onto an enemy or as an en passant capture.
    fn pawn_capture(&mut self) -> bool {
        let (dr, dc) = self.piece.square().delta_to(self.target);
        if dr != self.piece.color().forward() || dc.abs() != 1 {
            return false;
        }

        if self.board.is_occupied(self.target) {
            return true;
        }

        let allowed = en_passant_allowed(self.board, &self.piece, self.target, self.turn);
        self.flags.set(MoveFlags::EN_PASSANT, allowed);
        allowed
    }

    /// One square straight ahead, or two from an unmoved pawn, through empty squares only.
    fn pawn_advance(&mut self) -> bool {
        let forward = self.piece.color().forward();
        let Some(one_step) = self.piece.square().offset(forward, 0) else {
            return false;
        };

        if self.board.is_occupied(one_step) || self.board.is_occupied(self.target) {
            return false;
        }

        match self.piece.square().delta_to(self.target) {
            (dr, 0) if dr == forward => true,
            (dr, 0) if dr == forward * 2 && self.piece.move_count() == 0 => {
                self.flags.insert(MoveFlags::DOUBLE_STEP);
                true
            }
            _ => false,
        }
    }

    /// Plays the move on a clone and asks whether the mover's King ends up attacked.
    fn exposes_own_king(&self) -> bool {
        let mut clone = self.board.speculative_clone();
        clone.move_piece_to_target(self.target, &self.piece);

        if self.flags.contains(MoveFlags::EN_PASSANT) {
            clone.remove_pawn_captured_en_passant(&self.piece, self.target);
        }

        let color = self.piece.color();
        let king_square = if self.piece.is_kind(PieceKind::King) {
            Some(self.target)
        } else {
            None
        };

        !clone.enemies_giving_check(color, king_square).is_empty()
    }
}

/// Validates a single move, returning it alongside its [`MoveFlags`] if it is legal.
///
/// # Example
/// ```
/// # use squire::{validate_move, Board, Square};
/// let board = Board::default();
/// let pawn = *board.piece_at(Square::E2).unwrap();
///
/// let double_step = validate_move(&board, &pawn, Square::E4, 1).unwrap();
/// assert!(double_step.is_double_step());
/// assert!(validate_move(&board, &pawn, Square::E5, 1).is_none());
/// ```
#[inline(always)]
pub fn validate_move(
    board: &Board,
    piece: &Piece,
    target: Square,
    turn: u32,
) -> Option<MoveResult> {
    MoveExaminer::new(board, piece, target, turn).examine()
}

/// Every legal move of a single piece.
pub fn legal_moves_for(board: &Board, piece: &Piece, turn: u32) -> Vec<MoveResult> {
    board
        .possible_targets(piece)
        .into_iter()
        .filter_map(|target| validate_move(board, piece, target, turn))
        .collect()
}

/// Every legal move of every piece of `color`.
pub fn legal_moves(board: &Board, color: Color, turn: u32) -> Vec<MoveResult> {
    board
        .all_allies(color)
        .iter()
        .flat_map(|piece| legal_moves_for(board, piece, turn))
        .collect()
}

/// Returns `true` if `piece` has at least one legal move.
pub fn moves_available(board: &Board, piece: &Piece, turn: u32) -> bool {
    board
        .possible_targets(piece)
        .into_iter()
        .any(|target| validate_move(board, piece, target, turn).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn piece(color: Color, kind: PieceKind, square: Square) -> Piece {
        Piece::new(color, kind, square)
    }

    #[test]
    fn test_rejects_own_piece() {
        let board = Board::default();
        let rook = *board.piece_at(Square::A1).unwrap();
        assert!(validate_move(&board, &rook, Square::A2, 1).is_none());
    }

    #[test]
    fn test_knight_jumps_over_pieces() {
        let board = Board::default();
        let knight = *board.piece_at(Square::G1).unwrap();
        assert!(validate_move(&board, &knight, Square::F3, 1).is_some());
        assert!(validate_move(&board, &knight, Square::G3, 1).is_none());
    }

    #[test]
    fn test_pawn_forward_rules() {
        let board = Board::from_pieces([
            piece(Color::White, PieceKind::Pawn, Square::C2),
            piece(Color::Black, PieceKind::Knight, Square::C3),
            piece(Color::White, PieceKind::Pawn, Square::D2),
            piece(Color::Black, PieceKind::Knight, Square::D4),
            piece(Color::White, PieceKind::Pawn, Square::E3).with_move_count(1),
        ]);

        let blocked = *board.piece_at(Square::C2).unwrap();
        assert!(validate_move(&board, &blocked, Square::C3, 1).is_none());
        assert!(validate_move(&board, &blocked, Square::C4, 1).is_none());

        let target_taken = *board.piece_at(Square::D2).unwrap();
        assert!(validate_move(&board, &target_taken, Square::D3, 1).is_some());
        assert!(validate_move(&board, &target_taken, Square::D4, 1).is_none());

        let moved = *board.piece_at(Square::E3).unwrap();
        assert!(validate_move(&board, &moved, Square::E4, 1).is_some());
        assert!(validate_move(&board, &moved, Square::E5, 1).is_none());
    }

    #[test]
    fn test_pawn_captures_diagonally_only_onto_enemies() {
        let board = Board::from_pieces([
            piece(Color::Black, PieceKind::Pawn, Square::E5),
            piece(Color::White, PieceKind::Rook, Square::D4),
        ]);
        let pawn = *board.piece_at(Square::E5).unwrap();

        let capture = validate_move(&board, &pawn, Square::D4, 3).unwrap();
        assert!(capture.is_capture(&board));
        assert_eq!(capture.flags, MoveFlags::empty());

        assert!(validate_move(&board, &pawn, Square::F4, 3).is_none());
        // Backwards is never allowed
        assert!(validate_move(&board, &pawn, Square::D6, 3).is_none());
    }

    #[test]
    fn test_king_cannot_step_into_attack() {
        let board = Board::from_pieces([
            piece(Color::White, PieceKind::King, Square::E1).with_move_count(3),
            piece(Color::Black, PieceKind::Rook, Square::D8),
        ]);
        let king = *board.piece_at(Square::E1).unwrap();

        assert!(validate_move(&board, &king, Square::D1, 9).is_none());
        assert!(validate_move(&board, &king, Square::D2, 9).is_none());
        assert!(validate_move(&board, &king, Square::F1, 9).is_some());
        assert!(validate_move(&board, &king, Square::G1, 9).is_none());
    }

    #[test]
    fn test_legal_moves_from_start() {
        let board = Board::default();
        assert_eq!(legal_moves(&board, Color::White, 1).len(), 20);
        assert_eq!(legal_moves(&board, Color::Black, 2).len(), 20);
    }

    #[test]
    fn test_display_move() {
        let board = Board::default();
        let knight = *board.piece_at(Square::B8).unwrap();
        let mv = validate_move(&board, &knight, Square::C6, 2).unwrap();
        assert_eq!(mv.to_string(), "B8C6");
    }
}
