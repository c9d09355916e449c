/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use rand::{seq::SliceRandom, Rng};
use tracing::debug;

use crate::{legal_moves, validate_move, Board, Color, MoveResult, Piece, PieceKind, Square};

/// Configuration variables for a [`HeuristicSelector`].
///
/// Each decision draws a number `n` from `draw_min..=draw_max`. Some stages of the selector only
/// run when `n` exceeds their threshold, which makes the opponent occasionally careless.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectorConfig {
    /// Smallest value of the per-decision draw.
    pub draw_min: u8,

    /// Largest value of the per-decision draw.
    pub draw_max: u8,

    /// Rescuing an attacked piece requires `n` above this.
    pub danger_threshold: u8,

    /// Making a safe capture requires `n` above this.
    pub capture_threshold: u8,

    /// Threatening the enemy King requires `n` above this.
    pub threat_threshold: u8,

    /// Picking any safe move requires `n` above this.
    pub cautious_threshold: u8,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            draw_min: 1,
            draw_max: 10,
            danger_threshold: 1,
            capture_threshold: 1,
            threat_threshold: 3,
            cautious_threshold: 1,
        }
    }
}

/// The stage of the selection pipeline that produced a move, in order of priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stage {
    /// Castling or capturing en passant.
    Special,

    /// Capturing a Queen, Rook, Bishop or Knight.
    ValuableCapture,

    /// Moving an attacked piece somewhere safe.
    Escape,

    /// A capture that leaves neither the mover nor the Queen hanging.
    SafeCapture,

    /// A safe move that attacks the enemy King.
    Threat,

    /// Any move that leaves neither the mover nor the Queen hanging.
    Cautious,

    /// Any move that does not leave the Queen hanging.
    QueenSafe,

    /// Any capture at all.
    Capture,

    /// Anything legal.
    Fallback,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A candidate move alongside what playing it would do to the mover's side.
#[derive(Debug, Clone, Copy)]
struct Assessment {
    mv: MoveResult,
    capture: bool,
    exposes_self: bool,
    exposes_queen: bool,
}

impl Assessment {
    /// Neither the Queen nor, for pieces worth guarding, the mover is left capturable.
    fn is_safe(&self) -> bool {
        let guards_self = matches!(
            self.mv.piece.kind(),
            PieceKind::Queen | PieceKind::Knight | PieceKind::Rook | PieceKind::Bishop
        );

        !self.exposes_queen && !(guards_self && self.exposes_self)
    }
}

/// Picks a move for one side using a fixed pipeline of tactical preferences.
///
/// Only the current position is considered; there is no lookahead beyond asking what the
/// opponent could capture right after each candidate.
#[derive(Debug, Clone, Copy)]
pub struct HeuristicSelector<'a> {
    board: &'a Board,
    color: Color,
    turn: u32,
    config: SelectorConfig,
}

impl<'a> HeuristicSelector<'a> {
    #[inline(always)]
    pub fn new(board: &'a Board, color: Color, turn: u32) -> Self {
        Self::with_config(board, color, turn, SelectorConfig::default())
    }

    #[inline(always)]
    pub const fn with_config(
        board: &'a Board,
        color: Color,
        turn: u32,
        config: SelectorConfig,
    ) -> Self {
        Self {
            board,
            color,
            turn,
            config,
        }
    }

    /// Chooses a legal move, or `None` if there are none.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<MoveResult> {
        let moves = legal_moves(self.board, self.color, self.turn);
        let n = rng.gen_range(self.config.draw_min..=self.config.draw_max);

        let (stage, mv) = self.select(&moves, n, rng)?;
        debug!(color = %self.color, turn = self.turn, n, %stage, %mv, "selected move");
        Some(mv)
    }

    /// Runs the pipeline over `moves` with the draw `n`, reporting which stage decided.
    ///
    /// Every element of `moves` must be legal for this selector's side on this turn.
    pub fn select<R: Rng + ?Sized>(
        &self,
        moves: &[MoveResult],
        n: u8,
        rng: &mut R,
    ) -> Option<(Stage, MoveResult)> {
        if moves.is_empty() {
            return None;
        }

        let specials: Vec<MoveResult> = moves
            .iter()
            .filter(|mv| mv.is_en_passant() || mv.is_castling())
            .copied()
            .collect();
        if let Some(mv) = specials.choose(rng) {
            return Some((Stage::Special, *mv));
        }

        let valuable: Vec<MoveResult> = moves
            .iter()
            .filter(|mv| {
                mv.victim(self.board).is_some_and(|victim| {
                    matches!(
                        victim.kind(),
                        PieceKind::Queen | PieceKind::Rook | PieceKind::Bishop | PieceKind::Knight
                    )
                })
            })
            .copied()
            .collect();
        if let Some(mv) = valuable.choose(rng) {
            return Some((Stage::ValuableCapture, *mv));
        }

        let assessed: Vec<Assessment> = moves.iter().map(|mv| self.assess(mv)).collect();

        if n > self.config.danger_threshold {
            let escapes: Vec<&Assessment> = assessed
                .iter()
                .filter(|a| !a.exposes_self && self.in_danger(&a.mv.piece))
                .collect();
            let capturing: Vec<&Assessment> =
                escapes.iter().copied().filter(|a| a.capture).collect();

            if let Some(a) = capturing.choose(rng).or_else(|| escapes.choose(rng)) {
                return Some((Stage::Escape, a.mv));
            }
        }

        let safe: Vec<&Assessment> = assessed.iter().filter(|a| a.is_safe()).collect();

        if n > self.config.capture_threshold {
            let safe_captures: Vec<&Assessment> =
                safe.iter().copied().filter(|a| a.capture).collect();
            if let Some(a) = safe_captures.choose(rng) {
                return Some((Stage::SafeCapture, a.mv));
            }
        }

        if n > self.config.threat_threshold {
            let threats: Vec<&Assessment> = safe
                .iter()
                .copied()
                .filter(|a| self.threatens_king(&a.mv))
                .collect();
            if let Some(a) = threats.choose(rng) {
                return Some((Stage::Threat, a.mv));
            }
        }

        if n > self.config.cautious_threshold {
            if let Some(a) = safe.choose(rng) {
                return Some((Stage::Cautious, a.mv));
            }
        }

        if self.board.find(self.color, PieceKind::Queen).is_some() {
            let queen_safe: Vec<&Assessment> =
                assessed.iter().filter(|a| !a.exposes_queen).collect();
            if let Some(a) = queen_safe.choose(rng) {
                return Some((Stage::QueenSafe, a.mv));
            }
        }

        let captures: Vec<&Assessment> = assessed.iter().filter(|a| a.capture).collect();
        if let Some(a) = captures.choose(rng) {
            return Some((Stage::Capture, a.mv));
        }

        moves.choose(rng).map(|mv| (Stage::Fallback, *mv))
    }

    fn assess(&self, mv: &MoveResult) -> Assessment {
        let after = simulate(self.board, mv);

        let exposes_self = self.enemy_can_reach(&after, mv.target);
        let exposes_queen = after
            .find(self.color, PieceKind::Queen)
            .is_some_and(|queen| self.enemy_can_reach(&after, queen.square()));

        Assessment {
            mv: *mv,
            capture: mv.is_capture(self.board),
            exposes_self,
            exposes_queen,
        }
    }

    /// Can any enemy legally move onto `square` on their next turn?
    fn enemy_can_reach(&self, board: &Board, square: Square) -> bool {
        board
            .all_enemies(self.color)
            .iter()
            .any(|enemy| validate_move(board, enemy, square, self.turn + 1).is_some())
    }

    /// Is `piece` attacked where it stands right now? Pawns are never considered endangered.
    fn in_danger(&self, piece: &Piece) -> bool {
        if piece.is_kind(PieceKind::Pawn) {
            return false;
        }

        let clone = self.board.speculative_clone();
        self.enemy_can_reach(&clone, piece.square())
    }

    /// After playing `mv`, does the moved piece reach the enemy King's square?
    fn threatens_king(&self, mv: &MoveResult) -> bool {
        let after = simulate(self.board, mv);
        let Some(king) = after.find_own_king(self.color.opponent()) else {
            return false;
        };

        after
            .piece_at(mv.target)
            .is_some_and(|moved| after.attacks(moved, king))
    }
}

/// A clone of `board` with `mv` fully applied, special-rule side effects included.
fn simulate(board: &Board, mv: &MoveResult) -> Board {
    let mut clone = board.speculative_clone();
    clone.move_piece_to_target(mv.target, &mv.piece);

    if mv.is_en_passant() {
        clone.remove_pawn_captured_en_passant(&mv.piece, mv.target);
    }
    if mv.is_castling() {
        clone.move_castle(mv.target);
    }

    clone
}

/// Chooses a move for `color` on `turn` with the default [`SelectorConfig`].
///
/// # Example
/// ```
/// # use squire::{choose_move, Board, Color};
/// # use rand::{rngs::StdRng, SeedableRng};
/// let board = Board::default();
/// let mut rng = StdRng::seed_from_u64(7);
/// let mv = choose_move(&board, Color::White, 1, &mut rng).unwrap();
/// assert_eq!(mv.piece.color(), Color::White);
/// ```
#[inline(always)]
pub fn choose_move<R: Rng + ?Sized>(
    board: &Board,
    color: Color,
    turn: u32,
    rng: &mut R,
) -> Option<MoveResult> {
    HeuristicSelector::new(board, color, turn).choose(rng)
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn test_no_moves_no_choice() {
        let board = Board::default();
        let selector = HeuristicSelector::new(&board, Color::White, 1);
        let mut rng = StdRng::seed_from_u64(0);
        assert!(selector.select(&[], 10, &mut rng).is_none());
    }

    #[test]
    fn test_castling_preferred() {
        let board = Board::from_pieces([
            Piece::new(Color::White, PieceKind::King, Square::E1),
            Piece::new(Color::White, PieceKind::Rook, Square::H1),
            Piece::new(Color::White, PieceKind::Pawn, Square::A2),
            Piece::new(Color::Black, PieceKind::King, Square::E8).with_move_count(1),
        ]);
        let selector = HeuristicSelector::new(&board, Color::White, 9);
        let moves = legal_moves(&board, Color::White, 9);

        for seed in 0..10 {
            let mut rng = StdRng::seed_from_u64(seed);
            let (stage, mv) = selector.select(&moves, 10, &mut rng).unwrap();
            assert_eq!(stage, Stage::Special);
            assert!(mv.is_castling());
            assert_eq!(mv.target, Square::G1);
        }
    }

    #[test]
    fn test_valuable_capture_beats_pawn_capture() {
        let board = Board::from_pieces([
            Piece::new(Color::White, PieceKind::King, Square::A1).with_move_count(1),
            Piece::new(Color::White, PieceKind::Pawn, Square::D4).with_move_count(1),
            Piece::new(Color::Black, PieceKind::Pawn, Square::C5).with_move_count(1),
            Piece::new(Color::Black, PieceKind::Knight, Square::E5),
            Piece::new(Color::Black, PieceKind::King, Square::H8).with_move_count(1),
        ]);
        let selector = HeuristicSelector::new(&board, Color::White, 15);
        let moves = legal_moves(&board, Color::White, 15);

        let mut rng = StdRng::seed_from_u64(3);
        let (stage, mv) = selector.select(&moves, 1, &mut rng).unwrap();
        assert_eq!(stage, Stage::ValuableCapture);
        assert_eq!(mv.target, Square::E5);
    }

    #[test]
    fn test_attacked_queen_escapes() {
        // The Black knight on C4 attacks the White Queen on D2, and cannot be captured by it
        let board = Board::from_pieces([
            Piece::new(Color::White, PieceKind::King, Square::H1).with_move_count(1),
            Piece::new(Color::White, PieceKind::Queen, Square::D2).with_move_count(1),
            Piece::new(Color::Black, PieceKind::Knight, Square::C4).with_move_count(1),
            Piece::new(Color::Black, PieceKind::King, Square::H8).with_move_count(1),
            Piece::new(Color::Black, PieceKind::Pawn, Square::A7),
        ]);
        let selector = HeuristicSelector::new(&board, Color::White, 15);
        let moves = legal_moves(&board, Color::White, 15);

        for seed in 0..5 {
            let mut rng = StdRng::seed_from_u64(seed);
            let (stage, mv) = selector.select(&moves, 10, &mut rng).unwrap();
            assert_eq!(stage, Stage::Escape);
            assert!(mv.piece.is_kind(PieceKind::Queen));
        }
    }

    #[test]
    fn test_low_draw_skips_gated_stages() {
        let board = Board::default();
        let selector = HeuristicSelector::new(&board, Color::White, 1);
        let moves = legal_moves(&board, Color::White, 1);

        let mut rng = StdRng::seed_from_u64(11);
        let (stage, _) = selector.select(&moves, 1, &mut rng).unwrap();
        assert_eq!(stage, Stage::QueenSafe);
    }
}
