/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// Preconditions for castling.
mod castling;

/// Preconditions for capturing en passant.
mod en_passant;

/// Move legality: geometry first, then King safety.
mod examiner;

/// Check, checkmate and stalemate.
mod status;

pub use castling::*;
pub use en_passant::*;
pub use examiner::*;
pub use status::*;
