/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::{Offset, Square};

/// How a piece moves across the board.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Manner {
    /// Repeatable unit directions, followed until blocked or off the board.
    ///
    /// Rooks, Bishops and Queens.
    Sliding(&'static [Offset]),

    /// Offsets applied exactly once from the current square.
    ///
    /// Knights, Kings and Pawns.
    Stepping(Vec<Offset>),
}

impl Manner {
    /// The raw offsets or directions of this pattern.
    #[inline(always)]
    pub fn offsets(&self) -> &[Offset] {
        match self {
            Self::Sliding(directions) => directions,
            Self::Stepping(offsets) => offsets,
        }
    }

    /// For a [`Manner::Stepping`] pattern, all on-board squares one application away from `from`.
    ///
    /// For a [`Manner::Sliding`] pattern, only the first step of every direction is produced;
    /// walk a [`Ray`] to go further.
    pub fn steps_from(&self, from: Square) -> impl Iterator<Item = Square> + '_ {
        self.offsets()
            .iter()
            .filter_map(move |&(dr, dc)| from.offset(dr, dc))
    }
}

/// Lazily walks a sliding direction one square at a time, stopping at the edge of the board.
///
/// Blocking is up to the caller: the ray knows nothing about occupants.
///
/// # Example
/// ```
/// # use squire::{Ray, Square};
/// let ray: Vec<Square> = Ray::new(Square::F6, (-1, 1)).collect();
/// assert_eq!(ray, vec![Square::G7, Square::H8]);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Ray {
    current: Square,
    direction: Offset,
}

impl Ray {
    #[inline(always)]
    pub const fn new(from: Square, direction: Offset) -> Self {
        Self {
            current: from,
            direction,
        }
    }
}

impl Iterator for Ray {
    type Item = Square;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.current.offset(self.direction.0, self.direction.1)?;
        self.current = next;
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_stops_at_edge() {
        assert_eq!(Ray::new(Square::A8, (-1, 0)).count(), 0);
        assert_eq!(Ray::new(Square::A1, (-1, 0)).count(), 7);
        assert_eq!(Ray::new(Square::D4, (1, 1)).last(), Some(Square::G1));
    }

    #[test]
    fn test_steps_filter_off_board() {
        let knight = Manner::Stepping(crate::KNIGHT_OFFSETS.to_vec());
        let mut from_corner: Vec<Square> = knight.steps_from(Square::A1).collect();
        from_corner.sort();
        assert_eq!(from_corner, vec![Square::B3, Square::C2]);
    }
}
