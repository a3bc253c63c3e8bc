use std::fmt::Display;

use clap::{Parser, ValueEnum};

use grubler::games::connect4::{Connect4, Connect4Position};
use grubler::games::tic_tac_toe::{TicTacToe, TttPosition};
use grubler::search::MAX_DEPTH;
use grubler::{Game, Searcher, Side};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum GameChoice {
    TicTacToe,
    Connect4,
}

/// Plays the engine against itself and prints each position.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[arg(value_enum)]
    game: GameChoice,

    /// Search horizon in plies.
    #[arg(short, long, default_value_t = 5)]
    depth: usize,

    /// Full strength: pin the horizon to the depth ceiling.
    #[arg(long)]
    max: bool,
}

fn main() {
    let args = Args::parse();
    let depth = if args.max {
        MAX_DEPTH
    } else {
        args.depth.min(MAX_DEPTH)
    };

    match args.game {
        GameChoice::TicTacToe => play(&TicTacToe, TttPosition::empty(Side::Max), depth),
        GameChoice::Connect4 => play(&Connect4, Connect4Position::empty(Side::Max), depth),
    }
}

fn play<G: Game>(game: &G, mut pos: G::Position, depth: usize)
where
    G::Position: Display,
{
    // One searcher for the whole game, so later plies reuse the cache.
    let mut searcher = Searcher::new(game);
    let mut ply = 0u32;

    loop {
        println!("{pos}");
        if game.won_by_last_move(&pos) {
            println!(
                "{:?} wins after {ply} plies",
                game.side_to_move(&pos).opposite()
            );
            break;
        }
        if game.is_draw(&pos) {
            println!("draw after {ply} plies");
            break;
        }

        let result = match searcher.find_best_move(&pos, depth) {
            Ok(result) => result,
            Err(err) => {
                eprintln!("search failed: {err}");
                break;
            }
        };
        let Some(mv) = result.best_move else { break };

        let stats = searcher.stats();
        println!(
            "{:?} plays {mv:?}  score {:.1}  ({} nodes, {} cache hits, {:?})",
            game.side_to_move(&pos),
            result.score,
            stats.nodes,
            stats.cache_hits,
            stats.total,
        );
        pos = game.apply(&pos, mv);
        ply += 1;
    }
}
