/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::{rngs::StdRng, SeedableRng};
use tracing::info;

use crate::{Game, PieceKind, SelectorConfig, Square};

/// Explore chess positions and watch the heuristic opponent play itself.
#[derive(Debug, Clone, Parser)]
#[command(version, about, rename_all = "lower")]
pub struct Cli {
    /// If set, debug logs are emitted to stderr. Otherwise, `RUST_LOG` decides.
    #[arg(short, long, global = true, default_value = "false")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// A command to run against a fresh game.
#[derive(Debug, Clone, Subcommand)]
#[command(rename_all = "lower")]
pub enum Command {
    /// Shows all legal destinations of the piece on the provided square.
    Moves {
        square: Square,

        /// Moves to play from the starting position first, written as two squares (`E2E4`).
        #[arg(short, long, num_args = 1..)]
        play: Vec<String>,
    },

    /// Shows whether the side to move is in check, checkmate, or stalemate.
    Status {
        /// Moves to play from the starting position first, written as two squares (`E2E4`).
        #[arg(short, long, num_args = 1..)]
        play: Vec<String>,
    },

    /// Lets the heuristic opponent play both sides.
    #[command(alias = "self")]
    Selfplay {
        /// Stop after this many plies, even if the game is not over.
        #[arg(short, long, default_value = "200")]
        plies: u32,

        /// Seed for the opponent's random choices. Random if omitted.
        #[arg(short, long)]
        seed: Option<u64>,

        /// Kind of piece that pawns reaching their last rank become.
        #[arg(long, default_value = "queen")]
        promote: PieceKind,
    },
}

impl Cli {
    /// Executes the parsed command, printing its results to stdout.
    pub fn run(self) -> Result<()> {
        match self.command {
            Command::Moves { square, play } => {
                let game = replay(&play)?;
                let moves = game.legal_moves_from(square);

                println!("{game}");
                match game.board().piece_at(square) {
                    Some(piece) if moves.is_empty() => println!("The {piece} has no legal moves"),
                    Some(piece) => {
                        let targets = moves
                            .iter()
                            .map(|mv| mv.target.to_string())
                            .collect::<Vec<_>>();
                        println!("{piece}: {}", targets.join(" "));
                    }
                    None => println!("There is no piece on {square}"),
                }
            }

            Command::Status { play } => {
                let game = replay(&play)?;
                println!("{game}");
                println!("{}: {}", game.side_to_move(), game.status());
            }

            Command::Selfplay {
                plies,
                seed,
                promote,
            } => selfplay(plies, seed, promote)?,
        }

        Ok(())
    }
}

/// Plays `moves` from the starting position, promoting to a Queen whenever a pawn reaches its
/// last rank.
fn replay(moves: &[String]) -> Result<Game> {
    let mut game = Game::new();

    for mv in moves {
        game.play_pair(mv)
            .with_context(|| format!("Failed to replay {mv:?} on turn {}", game.turn()))?;
        promote_waiting_pawn(&mut game, PieceKind::Queen)?;
    }

    Ok(game)
}

fn promote_waiting_pawn(game: &mut Game, kind: PieceKind) -> Result<()> {
    if let Some(square) = game.promotable_pawn() {
        game.promote(square, kind)?;
    }
    Ok(())
}

fn selfplay(plies: u32, seed: Option<u64>, promote: PieceKind) -> Result<()> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let config = SelectorConfig::default();
    let mut game = Game::new();

    for _ in 0..plies {
        if game.status().is_over() {
            break;
        }

        let Some(mv) = game.choose_move(config, &mut rng) else {
            break;
        };

        println!("{:>4}. {} {mv}", game.turn(), game.side_to_move());
        game.apply(mv);
        promote_waiting_pawn(&mut game, promote)?;
    }

    let status = game.status();
    info!(turn = game.turn(), %status, "self-play finished");

    println!("{game}");
    println!("{}: {status}", game.side_to_move());
    Ok(())
}
