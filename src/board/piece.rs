/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, str::FromStr};

use anyhow::{bail, Result};

use super::{Manner, Offset, Square};

/// Represents the color of a player or piece.
///
/// White moves first, and therefore [`Color`] defaults to [`Color::White`].
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[repr(u8)]
pub enum Color {
    #[default]
    White,
    Black,
}

impl Color {
    /// Number of color variants.
    pub const COUNT: usize = 2;

    /// Returns `true` if this [`Color`] is White.
    #[inline(always)]
    pub const fn is_white(&self) -> bool {
        matches!(self, Self::White)
    }

    /// Returns this [`Color`]'s opposite / enemy.
    ///
    /// # Example
    /// ```
    /// # use squire::Color;
    /// assert_eq!(Color::White.opponent(), Color::Black);
    /// assert_eq!(Color::Black.opponent(), Color::White);
    /// ```
    #[inline(always)]
    pub const fn opponent(&self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// The row delta of a single step "forward" for pawns of this color.
    ///
    /// Row `0` is rank 8, so White advances with `-1` and Black with `+1`.
    ///
    /// # Example
    /// ```
    /// # use squire::Color;
    /// assert_eq!(Color::White.forward(), -1);
    /// assert_eq!(Color::Black.forward(), 1);
    /// ```
    #[inline(always)]
    pub const fn forward(&self) -> i8 {
        match self {
            Self::White => -1,
            Self::Black => 1,
        }
    }

    /// Fetches a human-readable name for this [`Color`].
    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Black => "black",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Represents the kind (or "role") that a chess piece can be.
///
/// These have no [`Color`] associated with them. See [`Piece`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[repr(u8)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// Number of piece variants.
    pub const COUNT: usize = 6;

    /// An array of all 6 [`PieceKind`]s.
    ///
    /// In the order: `Pawn`, `Knight`, `Bishop`, `Rook`, `Queen`, `King`.
    #[inline(always)]
    pub const fn all() -> [Self; Self::COUNT] {
        use PieceKind::*;
        [Pawn, Knight, Bishop, Rook, Queen, King]
    }

    /// The kinds a pawn may promote into.
    #[inline(always)]
    pub const fn promotions() -> [Self; 4] {
        use PieceKind::*;
        [Queen, Rook, Bishop, Knight]
    }

    /// Creates a [`PieceKind`] from its letter (case-insensitive).
    ///
    /// # Example
    /// ```
    /// # use squire::PieceKind;
    /// assert_eq!(PieceKind::from_char('q').unwrap(), PieceKind::Queen);
    /// assert!(PieceKind::from_char('x').is_err());
    /// ```
    pub fn from_char(kind: char) -> Result<Self> {
        match kind {
            'P' | 'p' => Ok(Self::Pawn),
            'N' | 'n' => Ok(Self::Knight),
            'B' | 'b' => Ok(Self::Bishop),
            'R' | 'r' => Ok(Self::Rook),
            'Q' | 'q' => Ok(Self::Queen),
            'K' | 'k' => Ok(Self::King),
            _ => bail!("Invalid char for PieceKind: Got {kind}."),
        }
    }

    /// Converts this [`PieceKind`] to a lowercase letter.
    #[inline(always)]
    pub const fn char(&self) -> char {
        match self {
            Self::Pawn => 'p',
            Self::Knight => 'n',
            Self::Bishop => 'b',
            Self::Rook => 'r',
            Self::Queen => 'q',
            Self::King => 'k',
        }
    }

    /// Fetches a human-readable name for this [`PieceKind`].
    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Pawn => "pawn",
            Self::Knight => "knight",
            Self::Bishop => "bishop",
            Self::Rook => "rook",
            Self::Queen => "queen",
            Self::King => "king",
        }
    }
}

impl FromStr for PieceKind {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = s.to_ascii_lowercase();
        if let Some(found) = Self::all().into_iter().find(|k| k.name() == kind) {
            return Ok(found);
        }

        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_char(c),
            _ => bail!("Invalid PieceKind string: Got {s:?}"),
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// State that only pawns carry.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct PawnState {
    /// Where this pawn stood when it was created.
    pub start: Square,

    /// Turn on which this pawn last advanced two squares, if ever.
    pub double_step_turn: Option<u32>,
}

/// A chess piece on the board.
///
/// A [`Piece`] knows where it stands. The [`Board`](crate::Board) keeps that field in sync with the
/// cell the piece occupies, so move pieces through the board's mutators rather than editing
/// `square` by hand.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Piece {
    kind: PieceKind,
    color: Color,
    square: Square,
    move_count: u32,
    pawn: Option<PawnState>,
}

impl Piece {
    /// Creates a fresh, unmoved [`Piece`] standing on `square`.
    ///
    /// # Example
    /// ```
    /// # use squire::{Color, Piece, PieceKind, Square};
    /// let pawn = Piece::new(Color::White, PieceKind::Pawn, Square::E2);
    /// assert_eq!(pawn.square(), Square::E2);
    /// assert_eq!(pawn.move_count(), 0);
    /// assert_eq!(pawn.start_square(), Some(Square::E2));
    /// ```
    #[inline(always)]
    pub const fn new(color: Color, kind: PieceKind, square: Square) -> Self {
        let pawn = match kind {
            PieceKind::Pawn => Some(PawnState {
                start: square,
                double_step_turn: None,
            }),
            _ => None,
        };

        Self {
            kind,
            color,
            square,
            move_count: 0,
            pawn,
        }
    }

    /// Returns a copy of `self` that has moved `move_count` times.
    ///
    /// Used when restoring a game from an external source.
    #[inline(always)]
    pub const fn with_move_count(mut self, move_count: u32) -> Self {
        self.move_count = move_count;
        self
    }

    /// Returns a copy of `self` whose last double-step happened on `turn`.
    ///
    /// Has no effect on pieces other than pawns.
    #[inline(always)]
    pub fn with_double_step(mut self, turn: u32) -> Self {
        self.record_double_step(turn);
        self
    }

    #[inline(always)]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    #[inline(always)]
    pub const fn color(&self) -> Color {
        self.color
    }

    #[inline(always)]
    pub const fn square(&self) -> Square {
        self.square
    }

    /// Number of times this piece has physically moved.
    #[inline(always)]
    pub const fn move_count(&self) -> u32 {
        self.move_count
    }

    #[inline(always)]
    pub const fn is_kind(&self, kind: PieceKind) -> bool {
        self.kind as u8 == kind as u8
    }

    /// Starting square of a pawn, `None` for every other kind.
    #[inline(always)]
    pub fn start_square(&self) -> Option<Square> {
        self.pawn.map(|pawn| pawn.start)
    }

    /// Turn of this pawn's most recent double-step, if any.
    #[inline(always)]
    pub fn double_step_turn(&self) -> Option<u32> {
        self.pawn.and_then(|pawn| pawn.double_step_turn)
    }

    /// Remembers that this pawn advanced two squares on `turn`.
    #[inline(always)]
    pub fn record_double_step(&mut self, turn: u32) {
        if let Some(pawn) = self.pawn.as_mut() {
            pawn.double_step_turn = Some(turn);
        }
    }

    /// Relocates this piece's own notion of where it stands.
    ///
    /// Only the [`Board`](crate::Board) calls this, alongside updating its grid.
    #[inline(always)]
    pub(crate) fn set_square(&mut self, square: Square) {
        self.square = square;
    }

    /// Bumps the move counter after a physical move.
    #[inline(always)]
    pub(crate) fn mark_moved(&mut self) {
        self.move_count += 1;
    }

    /// This piece's movement pattern.
    ///
    /// Kings include the two castling offsets while they have never moved, and pawns point
    /// "forward" relative to their color.
    pub fn manner(&self) -> Manner {
        match self.kind {
            PieceKind::Rook => Manner::Sliding(&ROOK_DIRECTIONS),
            PieceKind::Bishop => Manner::Sliding(&BISHOP_DIRECTIONS),
            PieceKind::Queen => Manner::Sliding(&QUEEN_DIRECTIONS),
            PieceKind::Knight => Manner::Stepping(KNIGHT_OFFSETS.to_vec()),
            PieceKind::King => {
                let mut offsets = KING_OFFSETS.to_vec();
                if self.move_count == 0 {
                    offsets.extend(CASTLING_OFFSETS);
                }
                Manner::Stepping(offsets)
            }
            PieceKind::Pawn => {
                let forward = self.color.forward();
                Manner::Stepping(vec![
                    (forward, 0),
                    (forward * 2, 0),
                    (forward, -1),
                    (forward, 1),
                ])
            }
        }
    }

    /// Converts this [`Piece`] into a character: upper-case for White, lower-case for Black.
    ///
    /// # Example
    /// ```
    /// # use squire::{Color, Piece, PieceKind, Square};
    /// let white_knight = Piece::new(Color::White, PieceKind::Knight, Square::B1);
    /// assert_eq!(white_knight.char(), 'N');
    /// ```
    #[inline(always)]
    pub const fn char(&self) -> char {
        let c = self.kind.char();
        if self.color.is_white() {
            c.to_ascii_uppercase()
        } else {
            c
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} on {}", self.color, self.kind, self.square)
    }
}

/// Orthogonal unit directions.
pub const ROOK_DIRECTIONS: [Offset; 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Diagonal unit directions.
pub const BISHOP_DIRECTIONS: [Offset; 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// Orthogonal and diagonal unit directions.
pub const QUEEN_DIRECTIONS: [Offset; 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
];

pub const KNIGHT_OFFSETS: [Offset; 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

pub const KING_OFFSETS: [Offset; 8] = QUEEN_DIRECTIONS;

/// A king's two-file jump when castling long and short.
pub const CASTLING_OFFSETS: [Offset; 2] = [(0, -2), (0, 2)];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_king_manner_drops_castling_after_moving() {
        let king = Piece::new(Color::White, PieceKind::King, Square::E1);
        let Manner::Stepping(offsets) = king.manner() else {
            panic!("Kings step");
        };
        assert_eq!(offsets.len(), 10);
        assert!(offsets.contains(&(0, 2)));

        let moved = king.with_move_count(1);
        let Manner::Stepping(offsets) = moved.manner() else {
            panic!("Kings step");
        };
        assert_eq!(offsets.len(), 8);
        assert!(!offsets.contains(&(0, -2)));
    }

    #[test]
    fn test_pawn_manner_points_forward() {
        let white = Piece::new(Color::White, PieceKind::Pawn, Square::E2);
        let black = Piece::new(Color::Black, PieceKind::Pawn, Square::E7);

        let Manner::Stepping(white_offsets) = white.manner() else {
            panic!("Pawns step");
        };
        let Manner::Stepping(black_offsets) = black.manner() else {
            panic!("Pawns step");
        };

        assert!(white_offsets.contains(&(-2, 0)));
        assert!(black_offsets.contains(&(2, 0)));
        assert!(black_offsets.contains(&(1, -1)));
    }

    #[test]
    fn test_double_step_only_for_pawns() {
        let pawn = Piece::new(Color::Black, PieceKind::Pawn, Square::D7).with_double_step(4);
        assert_eq!(pawn.double_step_turn(), Some(4));

        let rook = Piece::new(Color::Black, PieceKind::Rook, Square::A8).with_double_step(4);
        assert_eq!(rook.double_step_turn(), None);
        assert_eq!(rook.start_square(), None);
    }

    #[test]
    fn test_parsing() {
        assert_eq!("queen".parse::<PieceKind>().unwrap(), PieceKind::Queen);
        assert_eq!("N".parse::<PieceKind>().unwrap(), PieceKind::Knight);
        assert!("dragon".parse::<PieceKind>().is_err());
    }
}
