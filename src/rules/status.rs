/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use crate::{moves_available, validate_move, Board, Color, Square};

/// The state of the game from the perspective of the side to move.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum GameStatus {
    #[default]
    Ongoing,
    Check,
    Checkmate,
    Stalemate,
}

impl GameStatus {
    /// Returns `true` if no further moves can be played.
    #[inline(always)]
    pub const fn is_over(&self) -> bool {
        matches!(self, Self::Checkmate | Self::Stalemate)
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = match self {
            Self::Ongoing => "ongoing",
            Self::Check => "check",
            Self::Checkmate => "checkmate",
            Self::Stalemate => "stalemate",
        };
        write!(f, "{status}")
    }
}

/// Classifies check, checkmate and stalemate for one side on one turn.
#[derive(Debug, Clone, Copy)]
pub struct StatusChecker<'a> {
    board: &'a Board,
    color: Color,
    turn: u32,
}

impl<'a> StatusChecker<'a> {
    #[inline(always)]
    pub const fn new(board: &'a Board, color: Color, turn: u32) -> Self {
        Self { board, color, turn }
    }

    /// Returns `true` if any enemy attacks this side's King, or `target` if one is supplied.
    #[inline(always)]
    pub fn own_king_in_check(&self, target: Option<Square>) -> bool {
        !self
            .board
            .enemies_giving_check(self.color, target)
            .is_empty()
    }

    /// Returns `true` if no piece of this side has a single legal move.
    pub fn no_legal_moves(&self) -> bool {
        self.board
            .all_allies(self.color)
            .iter()
            .all(|piece| !moves_available(self.board, piece, self.turn))
    }

    /// Returns `true` if no piece of this side can capture any of the pieces giving check.
    ///
    /// Only captures are considered. Blocking a distant slider's line of attack is not.
    /// Vacuously `true` when nothing gives check.
    pub fn no_counterattack(&self) -> bool {
        let allies = self.board.all_allies(self.color);

        self.board
            .enemies_giving_check(self.color, None)
            .iter()
            .all(|checker| {
                allies.iter().all(|ally| {
                    validate_move(self.board, ally, checker.square(), self.turn).is_none()
                })
            })
    }

    pub fn is_stalemate(&self) -> bool {
        self.no_legal_moves() && self.no_counterattack() && !self.own_king_in_check(None)
    }

    pub fn is_checkmate(&self) -> bool {
        self.no_legal_moves() && self.no_counterattack() && self.own_king_in_check(None)
    }

    /// Classifies the position for this side.
    pub fn status(&self) -> GameStatus {
        let in_check = self.own_king_in_check(None);
        let stuck = self.no_legal_moves() && self.no_counterattack();

        match (stuck, in_check) {
            (true, true) => GameStatus::Checkmate,
            (true, false) => GameStatus::Stalemate,
            (false, true) => GameStatus::Check,
            (false, false) => GameStatus::Ongoing,
        }
    }
}

/// Classifies the position on `board` for `color` on `turn`.
///
/// # Example
/// ```
/// # use squire::{game_status, Board, Color, GameStatus};
/// let board = Board::default();
/// assert_eq!(game_status(&board, Color::White, 1), GameStatus::Ongoing);
/// ```
#[inline(always)]
pub fn game_status(board: &Board, color: Color, turn: u32) -> GameStatus {
    StatusChecker::new(board, color, turn).status()
}
