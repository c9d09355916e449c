/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, str::FromStr};

use anyhow::{bail, Context, Result};

/// A `(row, column)` displacement between two squares.
///
/// Rows grow towards White's side of the board, so `(-1, 0)` is one step "up" towards rank 8.
pub type Offset = (i8, i8);

/// Represents a single square on an `8x8` chess board.
///
/// Internally encoded as `row * 8 + column`, where row `0` is rank 8 and column `0` is file A:
/// ```text
/// 8|  0  1  2  3  4  5  6  7
/// 7|  8  9 10 11 12 13 14 15
/// 6| 16 17 18 19 20 21 22 23
/// 5| 24 25 26 27 28 29 30 31
/// 4| 32 33 34 35 36 37 38 39
/// 3| 40 41 42 43 44 45 46 47
/// 2| 48 49 50 51 52 53 54 55
/// 1| 56 57 58 59 60 61 62 63
///  +------------------------
///    A  B  C  D  E  F  G  H
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[repr(transparent)]
pub struct Square(pub(crate) u8);

impl Square {
    pub const A1: Self = Self::new_unchecked(7, 0);
    pub const A2: Self = Self::new_unchecked(6, 0);
    pub const A3: Self = Self::new_unchecked(5, 0);
    pub const A4: Self = Self::new_unchecked(4, 0);
    pub const A5: Self = Self::new_unchecked(3, 0);
    pub const A6: Self = Self::new_unchecked(2, 0);
    pub const A7: Self = Self::new_unchecked(1, 0);
    pub const A8: Self = Self::new_unchecked(0, 0);

    pub const B1: Self = Self::new_unchecked(7, 1);
    pub const B2: Self = Self::new_unchecked(6, 1);
    pub const B3: Self = Self::new_unchecked(5, 1);
    pub const B4: Self = Self::new_unchecked(4, 1);
    pub const B5: Self = Self::new_unchecked(3, 1);
    pub const B6: Self = Self::new_unchecked(2, 1);
    pub const B7: Self = Self::new_unchecked(1, 1);
    pub const B8: Self = Self::new_unchecked(0, 1);

    pub const C1: Self = Self::new_unchecked(7, 2);
    pub const C2: Self = Self::new_unchecked(6, 2);
    pub const C3: Self = Self::new_unchecked(5, 2);
    pub const C4: Self = Self::new_unchecked(4, 2);
    pub const C5: Self = Self::new_unchecked(3, 2);
    pub const C6: Self = Self::new_unchecked(2, 2);
    pub const C7: Self = Self::new_unchecked(1, 2);
    pub const C8: Self = Self::new_unchecked(0, 2);

    pub const D1: Self = Self::new_unchecked(7, 3);
    pub const D2: Self = Self::new_unchecked(6, 3);
    pub const D3: Self = Self::new_unchecked(5, 3);
    pub const D4: Self = Self::new_unchecked(4, 3);
    pub const D5: Self = Self::new_unchecked(3, 3);
    pub const D6: Self = Self::new_unchecked(2, 3);
    pub const D7: Self = Self::new_unchecked(1, 3);
    pub const D8: Self = Self::new_unchecked(0, 3);

    pub const E1: Self = Self::new_unchecked(7, 4);
    pub const E2: Self = Self::new_unchecked(6, 4);
    pub const E3: Self = Self::new_unchecked(5, 4);
    pub const E4: Self = Self::new_unchecked(4, 4);
    pub const E5: Self = Self::new_unchecked(3, 4);
    pub const E6: Self = Self::new_unchecked(2, 4);
    pub const E7: Self = Self::new_unchecked(1, 4);
    pub const E8: Self = Self::new_unchecked(0, 4);

    pub const F1: Self = Self::new_unchecked(7, 5);
    pub const F2: Self = Self::new_unchecked(6, 5);
    pub const F3: Self = Self::new_unchecked(5, 5);
    pub const F4: Self = Self::new_unchecked(4, 5);
    pub const F5: Self = Self::new_unchecked(3, 5);
    pub const F6: Self = Self::new_unchecked(2, 5);
    pub const F7: Self = Self::new_unchecked(1, 5);
    pub const F8: Self = Self::new_unchecked(0, 5);

    pub const G1: Self = Self::new_unchecked(7, 6);
    pub const G2: Self = Self::new_unchecked(6, 6);
    pub const G3: Self = Self::new_unchecked(5, 6);
    pub const G4: Self = Self::new_unchecked(4, 6);
    pub const G5: Self = Self::new_unchecked(3, 6);
    pub const G6: Self = Self::new_unchecked(2, 6);
    pub const G7: Self = Self::new_unchecked(1, 6);
    pub const G8: Self = Self::new_unchecked(0, 6);

    pub const H1: Self = Self::new_unchecked(7, 7);
    pub const H2: Self = Self::new_unchecked(6, 7);
    pub const H3: Self = Self::new_unchecked(5, 7);
    pub const H4: Self = Self::new_unchecked(4, 7);
    pub const H5: Self = Self::new_unchecked(3, 7);
    pub const H6: Self = Self::new_unchecked(2, 7);
    pub const H7: Self = Self::new_unchecked(1, 7);
    pub const H8: Self = Self::new_unchecked(0, 7);

    pub const MIN: u8 = 0;
    pub const MAX: u8 = 63;
    pub const COUNT: usize = 64;

    /// Number of rows (and columns) on the board.
    pub const SIDE: i8 = 8;

    /// Returns an iterator over all available squares, starting at A8 and ending at H1.
    ///
    /// # Example
    /// ```
    /// # use squire::Square;
    /// let mut iter = Square::iter();
    /// assert_eq!(iter.len(), 64);
    /// assert_eq!(iter.next().unwrap(), Square::A8);
    /// assert_eq!(iter.last().unwrap(), Square::H1);
    /// ```
    #[inline(always)]
    pub fn iter() -> impl ExactSizeIterator<Item = Self> + DoubleEndedIterator<Item = Self> {
        (Self::MIN..=Self::MAX).map(Self)
    }

    /// Creates a new [`Square`] from a row and column, without bounds checking.
    ///
    /// # Panics
    ///
    /// If `row` or `col` is greater than `7` and debug assertions are enabled.
    #[inline(always)]
    pub const fn new_unchecked(row: u8, col: u8) -> Self {
        debug_assert!(row < 8 && col < 8, "Row and column must be between [0,8)");
        Self(row * 8 + col)
    }

    /// Creates a new [`Square`] from a (possibly out-of-range) row and column.
    ///
    /// Returns `None` if either coordinate falls outside `[0, 7]`.
    ///
    /// # Example
    /// ```
    /// # use squire::Square;
    /// assert_eq!(Square::new(4, 4), Some(Square::E4));
    /// assert_eq!(Square::new(-1, 4), None);
    /// assert_eq!(Square::new(0, 8), None);
    /// ```
    #[inline(always)]
    pub const fn new(row: i8, col: i8) -> Option<Self> {
        if Self::within_limits(row, col) {
            Some(Self::new_unchecked(row as u8, col as u8))
        } else {
            None
        }
    }

    /// Returns `true` if both coordinates lie within `[0, 7]`.
    #[inline(always)]
    pub const fn within_limits(row: i8, col: i8) -> bool {
        row >= 0 && row < Self::SIDE && col >= 0 && col < Self::SIDE
    }

    /// The row of this square. Row `0` is rank 8.
    #[inline(always)]
    pub const fn row(&self) -> u8 {
        self.0 >> 3
    }

    /// The column of this square. Column `0` is file A.
    #[inline(always)]
    pub const fn col(&self) -> u8 {
        self.0 & 0b111
    }

    /// The 1-based rank of this square, as printed on a board.
    ///
    /// # Example
    /// ```
    /// # use squire::Square;
    /// assert_eq!(Square::E4.rank(), 4);
    /// assert_eq!(Square::A8.rank(), 8);
    /// ```
    #[inline(always)]
    pub const fn rank(&self) -> u8 {
        8 - self.row()
    }

    /// The upper-case file letter of this square.
    #[inline(always)]
    pub const fn file(&self) -> char {
        (b'A' + self.col()) as char
    }

    /// Returns this [`Square`] as a `usize`, useful for indexing.
    #[inline(always)]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }

    /// Attempt to offset this [`Square`] by the provided row and column deltas.
    ///
    /// If the result would leave the board, `None` is returned.
    ///
    /// # Example
    /// ```
    /// # use squire::Square;
    /// assert_eq!(Square::C4.offset(-1, 1), Some(Square::D5));
    /// assert_eq!(Square::C4.offset(1, -1), Some(Square::B3));
    /// assert_eq!(Square::A1.offset(1, 0), None);
    /// ```
    #[inline(always)]
    pub const fn offset(&self, row_delta: i8, col_delta: i8) -> Option<Self> {
        Self::new(self.row() as i8 + row_delta, self.col() as i8 + col_delta)
    }

    /// The `(row, column)` displacement that takes `self` to `other`.
    #[inline(always)]
    pub const fn delta_to(&self, other: Self) -> Offset {
        (
            other.row() as i8 - self.row() as i8,
            other.col() as i8 - self.col() as i8,
        )
    }

    /// Parses a [`Square`] from its coordinate notation, such as `"E4"`.
    ///
    /// The file letter may be either case.
    ///
    /// # Example
    /// ```
    /// # use squire::Square;
    /// assert_eq!(Square::from_notation("E4").unwrap(), Square::E4);
    /// assert_eq!(Square::from_notation("h8").unwrap(), Square::H8);
    /// assert!(Square::from_notation("I1").is_err());
    /// ```
    pub fn from_notation(square: &str) -> Result<Self> {
        let mut chars = square.chars();
        let (Some(file), Some(rank), None) = (chars.next(), chars.next(), chars.next()) else {
            bail!("Invalid Square string: String must contain exactly 2 characters. Got {square:?}")
        };

        let file = file.to_ascii_uppercase();
        if !('A'..='H').contains(&file) {
            bail!("Invalid file in {square:?}: File must be between [A, H]. Got {file:?}");
        }

        let rank = rank
            .to_digit(10)
            .filter(|rank| (1..=8).contains(rank))
            .with_context(|| format!("Invalid rank in {square:?}: Rank must be between [1, 8]"))?;

        Ok(Self::new_unchecked(8 - rank as u8, file as u8 - b'A'))
    }

    /// Converts this [`Square`] to its upper-case coordinate notation, such as `"E4"`.
    ///
    /// # Example
    /// ```
    /// # use squire::Square;
    /// assert_eq!("C4", Square::C4.to_notation());
    /// ```
    #[inline(always)]
    pub fn to_notation(self) -> String {
        format!("{}{}", self.file(), self.rank())
    }
}

impl FromStr for Square {
    type Err = anyhow::Error;
    /// Wrapper for [`Square::from_notation`].
    #[inline(always)]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_notation(s)
    }
}

impl TryFrom<&str> for Square {
    type Error = anyhow::Error;
    /// Wrapper for [`Square::from_notation`].
    #[inline(always)]
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::from_notation(value)
    }
}

impl fmt::Display for Square {
    /// Calls [`Square::to_notation`].
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_notation())
    }
}

impl fmt::Debug for Square {
    /// Displays the notation alongside the `(row, column)` pair.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.to_notation(), self.row(), self.col())
    }
}
