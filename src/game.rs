/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use anyhow::{bail, Context, Result};
use rand::Rng;
use tracing::{info, Level};

use crate::{
    game_status, legal_moves, legal_moves_for, validate_move, Board, Color, GameStatus,
    HeuristicSelector, MoveResult, Piece, PieceKind, SelectorConfig, Square,
};

/// A game of chess: the live [`Board`] plus the turn counter.
///
/// Turns count plies, starting at `1`. White moves on odd turns and Black on even turns.
///
/// This is the only place the live board is mutated. Everything else works on clones.
#[derive(Clone, PartialEq, Eq)]
pub struct Game {
    board: Board,
    turn: u32,
}

impl Game {
    /// A new game in the standard starting position.
    #[inline(always)]
    pub fn new() -> Self {
        Self::from_board(Board::standard(), 1)
    }

    /// Resumes a game from an externally constructed [`Board`] on the provided turn.
    ///
    /// # Panics
    ///
    /// If `turn` is `0`.
    #[inline(always)]
    pub fn from_board(board: Board, turn: u32) -> Self {
        assert!(turn > 0, "Turns are counted from 1");
        Self { board, turn }
    }

    #[inline(always)]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    #[inline(always)]
    pub const fn turn(&self) -> u32 {
        self.turn
    }

    /// The [`Color`] whose turn it is.
    ///
    /// # Example
    /// ```
    /// # use squire::{Color, Game};
    /// let mut game = Game::new();
    /// assert_eq!(game.side_to_move(), Color::White);
    /// game.play("E2", "E4").unwrap();
    /// assert_eq!(game.side_to_move(), Color::Black);
    /// ```
    #[inline(always)]
    pub const fn side_to_move(&self) -> Color {
        if self.turn % 2 == 1 {
            Color::White
        } else {
            Color::Black
        }
    }

    /// Every legal move of the side to move.
    #[inline(always)]
    pub fn legal_moves(&self) -> Vec<MoveResult> {
        legal_moves(&self.board, self.side_to_move(), self.turn)
    }

    /// Every legal move of the piece on `square`, whichever side it belongs to.
    pub fn legal_moves_from(&self, square: Square) -> Vec<MoveResult> {
        self.board
            .piece_at(square)
            .map(|piece| legal_moves_for(&self.board, piece, self.turn))
            .unwrap_or_default()
    }

    /// Status of the side to move.
    #[inline(always)]
    pub fn status(&self) -> GameStatus {
        game_status(&self.board, self.side_to_move(), self.turn)
    }

    /// Validates moving the side to move's piece on `from` to `to`.
    pub fn validate(&self, from: Square, to: Square) -> Option<MoveResult> {
        let piece = self.board.piece_at(from)?;
        if piece.color() != self.side_to_move() {
            return None;
        }

        validate_move(&self.board, piece, to, self.turn)
    }

    /// Commits a validated move to the board and advances the turn.
    ///
    /// The piece is relocated first, then the special-rule side effects flagged on `mv` are
    /// applied: the pawn captured en passant is removed, the castling Rook is moved, or the turn
    /// of a double-step is recorded on the pawn.
    ///
    /// # Panics
    ///
    /// If the moving piece is not on its recorded square.
    pub fn apply(&mut self, mv: MoveResult) {
        let captured = self.board.piece_at(mv.target).copied();
        self.board.move_piece_to_target(mv.target, &mv.piece);

        if mv.is_en_passant() {
            self.board.remove_pawn_captured_en_passant(&mv.piece, mv.target);
        }

        if mv.is_castling() {
            self.board.move_castle(mv.target);
        }

        if mv.is_double_step() {
            if let Some(pawn) = self.board.piece_at_mut(mv.target) {
                pawn.record_double_step(self.turn);
            }
        }

        info!(
            turn = self.turn,
            color = %mv.piece.color(),
            piece = %mv.piece.kind(),
            %mv,
            captured = ?captured.map(|p| p.kind()),
            "committed move"
        );

        self.turn += 1;

        // Status is a full legal-move scan
        if tracing::enabled!(Level::INFO) {
            let status = self.status();
            if status != GameStatus::Ongoing {
                info!(turn = self.turn, color = %self.side_to_move(), %status, "status changed");
            }
        }
    }

    /// Validates and commits a move given as two squares, such as `"E2"` and `"E4"`.
    ///
    /// # Example
    /// ```
    /// # use squire::Game;
    /// let mut game = Game::new();
    /// assert!(game.play("E2", "E4").is_ok());
    /// assert!(game.play("E7", "E4").is_err());
    /// ```
    pub fn play(&mut self, from: &str, to: &str) -> Result<MoveResult> {
        let from = Square::from_notation(from).context("Invalid origin square")?;
        let to = Square::from_notation(to).context("Invalid destination square")?;

        let Some(piece) = self.board.piece_at(from) else {
            bail!("There is no piece on {from}");
        };
        if piece.color() != self.side_to_move() {
            bail!("The {piece} does not belong to {}", self.side_to_move());
        }

        let Some(mv) = self.validate(from, to) else {
            bail!("Moving the {piece} to {to} is illegal");
        };

        self.apply(mv);
        Ok(mv)
    }

    /// Validates and commits a move written as four characters, such as `"E2E4"`.
    pub fn play_pair(&mut self, mv: &str) -> Result<MoveResult> {
        let mv = mv.trim();
        let (Some(from), Some(to)) = (mv.get(..2), mv.get(2..)) else {
            bail!("Invalid move {mv:?}: Expected two squares, such as \"E2E4\"");
        };
        self.play(from, to.trim_start_matches('-'))
    }

    /// The square of a pawn standing on its last rank, waiting to be promoted.
    pub fn promotable_pawn(&self) -> Option<Square> {
        self.board
            .pieces()
            .find(|piece| {
                let last_row = if piece.color().is_white() { 0 } else { 7 };
                piece.is_kind(PieceKind::Pawn) && piece.square().row() == last_row
            })
            .map(Piece::square)
    }

    /// Replaces the pawn on `square`, which must have reached its last rank, with a new piece of
    /// `kind`.
    ///
    /// The new piece keeps the pawn's move count, so a promoted Rook can never castle.
    pub fn promote(&mut self, square: Square, kind: PieceKind) -> Result<()> {
        if !PieceKind::promotions().contains(&kind) {
            bail!("Pawns cannot promote to a {kind}");
        }
        if self.promotable_pawn() != Some(square) {
            bail!("There is no pawn waiting to be promoted on {square}");
        }

        let Some(pawn) = self.board.delete_piece_at(square) else {
            bail!("There is no piece on {square}");
        };

        let promoted = Piece::new(pawn.color(), kind, square).with_move_count(pawn.move_count());
        self.board.set_piece_at(square, promoted);
        info!(turn = self.turn, %square, %kind, "promoted pawn");

        Ok(())
    }

    /// Chooses a move for the side to move with the provided [`SelectorConfig`].
    pub fn choose_move<R: Rng + ?Sized>(
        &self,
        config: SelectorConfig,
        rng: &mut R,
    ) -> Option<MoveResult> {
        HeuristicSelector::with_config(&self.board, self.side_to_move(), self.turn, config)
            .choose(rng)
    }
}

impl Default for Game {
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.board)?;
        write!(f, "Turn {} ({} to move)", self.turn, self.side_to_move())
    }
}

impl fmt::Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}
