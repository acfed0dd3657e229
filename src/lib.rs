// Copyright 2017-2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! `echiquier`, a chess rules engine.
//!
//! `echiquier` knows the rules of chess and nothing else: given a position it computes every legal move, including
//! castling, en passant and promotion, applies moves to produce new positions, renders and reads algebraic notation
//! in English and French, and recognizes checkmate and stalemate. Positions are immutable values; making a move
//! never changes the position it was made from.

pub mod core;
pub mod game;
pub mod movegen;
pub mod notation;
pub mod position;

pub use crate::game::{Game, GameError, Outcome};
pub use crate::notation::{Language, NotatedMove};
pub use crate::position::Position;
