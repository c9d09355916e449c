/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// The `8x8` grid of pieces and its queries.
mod grid;

/// Movement patterns and lazy sliding rays.
mod manner;

/// Colors, piece kinds, and the pieces themselves.
mod piece;

/// The standard starting layout.
mod setup;

/// Squares and coordinate notation.
mod square;

pub use grid::*;
pub use manner::*;
pub use piece::*;
pub use setup::*;
pub use square::*;
