/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// Squares, pieces, and the mailbox board they live on.
mod board;

/// Command-line interface for exploring positions and watching self-play.
mod cli;

/// The live game: turn tracking and committing moves.
mod game;

/// Legality of moves, special rules, and game status.
mod rules;

/// The heuristic opponent.
mod selector;

pub use board::*;
pub use cli::*;
pub use game::*;
pub use rules::*;
pub use selector::*;
