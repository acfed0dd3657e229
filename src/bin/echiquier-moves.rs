// Copyright 2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use echiquier::{Language, Position};
use structopt::StructOpt;
use tracing_subscriber::{filter::LevelFilter, EnvFilter, FmtSubscriber};

/// Lists the legal moves after playing a sequence of moves from the starting position.
#[derive(Debug, StructOpt)]
struct Options {
    /// Language the moves are written in (english, french).
    #[structopt(short, long, default_value = "english")]
    language: Language,

    /// Print coordinate moves (e2e4) instead of algebraic notation.
    #[structopt(long)]
    uci: bool,

    /// Moves to play first, in algebraic notation.
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
    let mut pos = Position::starting();
    for notation in &args.moves {
        pos = pos.play(notation, args.language)?.0;
    }

    for (square, moves) in pos.legal_moves().pieces() {
        if moves.is_empty() {
            continue;
        }

        let rendered: Vec<_> = moves
            .iter()
            .map(|&mov| {
                if args.uci {
                    mov.as_uci()
                } else {
                    pos.notation(mov, args.language)
                }
            })
            .collect();
        println!("{}: {}", square, rendered.join(" "));
    }

    Ok(())
}
