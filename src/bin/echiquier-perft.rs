// Copyright 2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::time::Instant;

use echiquier::{movegen, Language, Position};
use structopt::StructOpt;
use tracing_subscriber::{filter::LevelFilter, EnvFilter, FmtSubscriber};

#[derive(Debug, StructOpt)]
struct Options {
    /// The depth to search to.
    #[structopt(short, long)]
    depth: u32,

    /// Number of worker threads. Defaults to the number of CPUs; 1 counts on the main thread.
    #[structopt(short, long)]
    threads: Option<usize>,

    /// Language the moves are written in (english, french).
    #[structopt(short, long, default_value = "english")]
    language: Language,

    /// Moves to play from the starting position before counting, in algebraic notation.
    #[structopt(name = "MOVES")]
    moves: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(LevelFilter::WARN)
        .with_env_filter(EnvFilter::from_env("ECHIQUIER_LOG"))
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let ops = Options::from_args();
    let mut pos = Position::starting();
    for notation in &ops.moves {
        pos = pos.play(notation, ops.language)?.0;
    }

    let threads = ops.threads.unwrap_or_else(num_cpus::get);
    let start = Instant::now();
    let count = if threads > 1 {
        movegen::parallel_perft(&pos, ops.depth, threads)
    } else {
        movegen::perft(&pos, ops.depth)
    };
    tracing::info!(threads, elapsed = ?start.elapsed(), "perft finished");
    println!("{}", count);
    Ok(())
}
