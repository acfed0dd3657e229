// Copyright 2017-2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Piece geometry. Every piece kind is described by the directions it moves in; sliding kinds repeat a direction
//! until something blocks them, the others take a single step. Single-step reach is precomputed per square.

use crate::core::*;

const WHITE_PAWN_PUSH: [Direction; 1] = [Direction::NORTH];
const BLACK_PAWN_PUSH: [Direction; 1] = [Direction::SOUTH];
const WHITE_PAWN_CAPTURES: [Direction; 2] = [Direction::NORTH_WEST, Direction::NORTH_EAST];
const BLACK_PAWN_CAPTURES: [Direction; 2] = [Direction::SOUTH_WEST, Direction::SOUTH_EAST];

/// The directions a piece of the given kind moves in. For pawns this is the push direction only.
pub fn moving_directions(kind: PieceKind, color: Color) -> &'static [Direction] {
    match kind {
        PieceKind::Pawn => match color {
            Color::White => &WHITE_PAWN_PUSH,
            Color::Black => &BLACK_PAWN_PUSH,
        },
        PieceKind::Knight => &KNIGHT_JUMPS,
        PieceKind::Bishop => &DIAGONALS,
        PieceKind::Rook => &STRAIGHTS,
        PieceKind::Queen | PieceKind::King => &LINES,
    }
}

/// The two diagonal-forward directions a pawn of the given color captures in.
pub fn pawn_capture_directions(color: Color) -> &'static [Direction; 2] {
    match color {
        Color::White => &WHITE_PAWN_CAPTURES,
        Color::Black => &BLACK_PAWN_CAPTURES,
    }
}

struct StepTable {
    table: [SquareSet; 64],
}

impl StepTable {
    fn new(directions: &[Direction]) -> StepTable {
        let mut st = StepTable {
            table: [SquareSet::empty(); 64],
        };

        for sq in squares() {
            st.table[sq.as_u8() as usize] = directions.iter().filter_map(|&d| sq.towards(d)).collect();
        }

        st
    }

    fn attacks(&self, sq: Square) -> SquareSet {
        self.table[sq.as_u8() as usize]
    }
}

lazy_static::lazy_static! {
    static ref KING_TABLE: StepTable = StepTable::new(&LINES);
    static ref KNIGHT_TABLE: StepTable = StepTable::new(&KNIGHT_JUMPS);
    static ref WHITE_PAWN_TABLE: StepTable = StepTable::new(&WHITE_PAWN_CAPTURES);
    static ref BLACK_PAWN_TABLE: StepTable = StepTable::new(&BLACK_PAWN_CAPTURES);
}

/// The result of walking outward from a square in one direction.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Ray {
    /// Every square traversed, including the blocking square if there is one.
    pub squares: SquareSet,
    /// The first occupied square met, if the walk did not run off the board.
    pub blocker: Option<Square>,
}

/// Walks from `sq` in `dir`, stopping at the edge of the board or on the first square in `occupancy`.
pub fn ray(sq: Square, dir: Direction, occupancy: SquareSet) -> Ray {
    let mut squares = SquareSet::empty();
    let mut cursor = sq.towards(dir);
    while let Some(next) = cursor {
        squares.insert(next);
        if occupancy.contains(next) {
            return Ray {
                squares,
                blocker: Some(next),
            };
        }

        cursor = next.towards(dir);
    }

    Ray {
        squares,
        blocker: None,
    }
}

fn slider_attacks(sq: Square, directions: &[Direction], occupancy: SquareSet) -> SquareSet {
    directions
        .iter()
        .fold(SquareSet::empty(), |acc, &dir| acc | ray(sq, dir, occupancy).squares)
}

pub fn pawn_attacks(sq: Square, color: Color) -> SquareSet {
    match color {
        Color::White => WHITE_PAWN_TABLE.attacks(sq),
        Color::Black => BLACK_PAWN_TABLE.attacks(sq),
    }
}

pub fn knight_attacks(sq: Square) -> SquareSet {
    KNIGHT_TABLE.attacks(sq)
}

pub fn king_attacks(sq: Square) -> SquareSet {
    KING_TABLE.attacks(sq)
}

/// Non-capturing pawn advances: one step if empty, and a second from the pawn's starting rank if both are empty.
pub fn pawn_pushes(sq: Square, color: Color, occupancy: SquareSet) -> SquareSet {
    let mut pushes = SquareSet::empty();
    let dir = Direction::new(0, color.forward());
    if let Some(one) = sq.towards(dir).filter(|&s| !occupancy.contains(s)) {
        pushes.insert(one);
        if sq.rank() == color.pawn_rank() {
            if let Some(two) = one.towards(dir).filter(|&s| !occupancy.contains(s)) {
                pushes.insert(two);
            }
        }
    }

    pushes
}

/// The squares a piece controls: every square it could move to or capture on, ignoring what stands there and
/// whether the move would be legal.
pub fn attacks(kind: PieceKind, color: Color, sq: Square, occupancy: SquareSet) -> SquareSet {
    match kind {
        PieceKind::Pawn => pawn_attacks(sq, color),
        PieceKind::Knight => knight_attacks(sq),
        PieceKind::King => king_attacks(sq),
        PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen => {
            slider_attacks(sq, moving_directions(kind, color), occupancy)
        }
    }
}
