// Copyright 2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use echiquier::{Game, Language};
use rand::{rngs::SmallRng, SeedableRng};
use structopt::StructOpt;
use tracing_subscriber::{filter::LevelFilter, EnvFilter, FmtSubscriber};

/// Plays a game from the starting position and reports how it went.
#[derive(Debug, StructOpt)]
struct Options {
    /// Language the moves are written in (english, french).
    #[structopt(short, long, default_value = "english")]
    language: Language,

    /// After the given moves, keep playing random legal moves for up to this many plies.
    #[structopt(long)]
    random: Option<usize>,

    /// Seed for random play.
    #[structopt(long, default_value = "0")]
    seed: u64,

    /// Print the game record as JSON instead of text.
    #[structopt(long)]
    json: bool,

    /// Moves to play, in algebraic notation.
    #[structopt(name = "MOVES")]
    moves: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(LevelFilter::WARN)
        .with_env_filter(EnvFilter::from_env("ECHIQUIER_LOG"))
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let args = Options::from_args();
    let mut game = Game::new(args.language);
    for notation in &args.moves {
        game.apply_notation(notation)?;
    }

    if let Some(plies) = args.random {
        game.play_random(&mut SmallRng::seed_from_u64(args.seed), plies)?;
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&game.record())?);
        return Ok(());
    }

    for (i, pair) in game.moves().chunks(2).enumerate() {
        let moves: Vec<_> = pair.iter().map(|m| m.full_notation()).collect();
        println!("{:>3}. {}", i + 1, moves.join(" "));
    }

    println!("===========================");
    print!("{}", game.current_position());
    println!("===========================");
    match game.result() {
        Some(result) => println!("{}", result),
        None => println!("{} to move", game.current_position().side_to_move()),
    }

    Ok(())
}
