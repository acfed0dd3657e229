// Copyright 2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Legal move generation.
//!
//! Generation starts from the king of the side to move: rays cast outward from the king find sliding checkers and
//! the pieces pinned against it, and single-step probes find knight and pawn checkers. Every other piece's
//! candidate squares are then cut down by its pin line and, in simple check, by the squares that block or capture
//! the checker. King moves are always computed against the opponent's control with the king lifted off the board.

use std::{collections::BTreeMap, thread};

use crate::core::{attacks, *};
use crate::position::Position;

/// How many pieces give check to the side to move.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CheckKind {
    NoCheck,
    Simple,
    Double,
}

/// A piece pinned against its own king, and the squares it may still move to without exposing the king.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Pin {
    pub square: Square,
    pub line: SquareSet,
}

/// The checks and pins bearing on the king of the side to move.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Checks {
    /// Squares of the pieces giving check.
    pub checkers: SquareSet,
    /// Squares a non-king piece may move to in order to answer a simple check. Empty unless in simple check.
    pub intercepting: SquareSet,
    pub pins: Vec<Pin>,
}

impl Checks {
    pub fn kind(&self) -> CheckKind {
        match self.checkers.len() {
            0 => CheckKind::NoCheck,
            1 => CheckKind::Simple,
            _ => CheckKind::Double,
        }
    }

    pub fn pin_line(&self, square: Square) -> Option<SquareSet> {
        self.pins
            .iter()
            .find(|pin| pin.square == square)
            .map(|pin| pin.line)
    }
}

/// The legal moves of a position, grouped by the square of the moving piece. Every piece of the side to move has
/// an entry, possibly empty.
#[derive(Clone, Debug, Default)]
pub struct LegalMoves {
    by_piece: BTreeMap<Square, Vec<Move>>,
}

impl LegalMoves {
    /// The legal moves of the piece on `square`.
    pub fn for_piece(&self, square: Square) -> &[Move] {
        self.by_piece
            .get(&square)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Each piece of the side to move, with its legal moves.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, &[Move])> {
        self.by_piece.iter().map(|(&sq, moves)| (sq, moves.as_slice()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Move> {
        self.by_piece.values().flatten()
    }

    pub fn contains(&self, mov: &Move) -> bool {
        self.for_piece(mov.source()).contains(mov)
    }

    /// The legal moves between two squares. More than one means the moves differ only in promotion kind.
    pub fn between(&self, source: Square, destination: Square) -> Vec<Move> {
        self.for_piece(source)
            .iter()
            .filter(|mov| mov.destination() == destination)
            .copied()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.by_piece.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_piece.values().all(Vec::is_empty)
    }
}

impl Position {
    /// The legal moves of the side to move, computed on first use and cached for the life of this position.
    pub fn legal_moves(&self) -> &LegalMoves {
        self.cached_legal_moves()
            .get_or_init(|| self.compute_legal_moves())
    }

    /// Checks and pins against the king of the side to move. A side without a king is never in check and has no
    /// pinned pieces.
    pub fn checks(&self) -> Checks {
        match self.king(self.side_to_move()) {
            Some(king) => self.explore_checks_and_pins(king),
            None => Checks::default(),
        }
    }

    fn explore_checks_and_pins(&self, king: Square) -> Checks {
        let us = self.side_to_move();
        let them = us.toggle();
        let mut checks = Checks::default();
        let aligned = |piece: Piece, dir: Direction| {
            piece.color == them
                && piece.kind.is_slider()
                && attacks::moving_directions(piece.kind, them).contains(&dir.reverse())
        };

        for dir in LINES {
            let (near, blocker) = self.explore_in_direction(king, dir);
            match blocker {
                Some((sq, piece)) if piece.color == them => {
                    if aligned(piece, dir) {
                        checks.checkers.insert(sq);
                        checks.intercepting = near;
                    }
                }
                Some((sq, _)) => {
                    let (far, pinner) = self.explore_in_direction(sq, dir);
                    if let Some((_, piece)) = pinner {
                        if aligned(piece, dir) {
                            checks.pins.push(Pin {
                                square: sq,
                                line: (near | far) - SquareSet::single(sq),
                            });
                        }
                    }
                }
                None => {}
            }
        }

        let knight = Piece::new(them, PieceKind::Knight);
        let pawn = Piece::new(them, PieceKind::Pawn);
        let steps = KNIGHT_JUMPS
            .iter()
            .map(|&dir| (dir, knight))
            .chain(attacks::pawn_capture_directions(us).iter().map(|&dir| (dir, pawn)));
        for (dir, checker) in steps {
            if let Some(sq) = king.towards(dir) {
                if self.piece_at(sq) == Some(checker) {
                    checks.checkers.insert(sq);
                    checks.intercepting = SquareSet::single(sq);
                }
            }
        }

        if checks.checkers.len() > 1 {
            checks.intercepting = SquareSet::empty();
        }

        checks
    }

    fn compute_legal_moves(&self) -> LegalMoves {
        let checks = self.checks();
        let kind = checks.kind();
        let mut legal = LegalMoves::default();
        for sq in self.pieces(self.side_to_move()) {
            let piece = match self.piece_at(sq) {
                Some(piece) => piece,
                None => continue,
            };

            let mut moves = Vec::new();
            if piece.kind == PieceKind::King {
                self.king_moves(sq, piece, &mut moves);
            } else if kind != CheckKind::Double {
                let mut candidates = self.moving_squares(sq);
                if let Some(line) = checks.pin_line(sq) {
                    candidates = candidates & line;
                }

                if kind == CheckKind::Simple {
                    candidates = candidates & checks.intercepting;
                }

                for dest in candidates {
                    self.push_moves(piece, sq, dest, &mut moves);
                }

                if piece.kind == PieceKind::Pawn {
                    moves.extend(self.en_passant_move(sq, piece));
                }
            }

            legal.by_piece.insert(sq, moves);
        }

        tracing::trace!(moves = legal.len(), ?kind, "computed legal moves");
        legal
    }

    fn push_moves(&self, piece: Piece, source: Square, dest: Square, moves: &mut Vec<Move>) {
        let mov = Move::new(self.id(), piece, source, dest);
        if piece.kind == PieceKind::Pawn {
            if SS_BACK_RANKS.contains(dest) {
                moves.extend(PieceKind::PROMOTIONS.iter().map(|&kind| mov.promote(kind)));
                return;
            }

            if source.rank().as_u8().abs_diff(dest.rank().as_u8()) == 2 {
                moves.push(mov.double_pawn_push());
                return;
            }
        }

        moves.push(mov);
    }

    fn king_moves(&self, sq: Square, piece: Piece, moves: &mut Vec<Move>) {
        let us = piece.color;
        let them = us.toggle();
        let danger =
            self.controlled_squares_with(them, self.occupancy() - SquareSet::single(sq));
        let candidates = king_attacks(sq) - self.pieces(us) - danger;
        for dest in candidates {
            moves.push(Move::new(self.id(), piece, sq, dest));
        }

        if danger.contains(sq) || sq != Square::of(us.home_rank(), FILE_E) {
            return;
        }

        let rank = us.home_rank();
        let rook = Some(Piece::new(us, PieceKind::Rook));
        let occupancy = self.occupancy();
        let castles = [
            (
                self.can_castle_kingside(us),
                FILE_H,
                &[FILE_F, FILE_G][..],
                FILE_G,
                FILE_F,
            ),
            (
                self.can_castle_queenside(us),
                FILE_A,
                &[FILE_B, FILE_C, FILE_D][..],
                FILE_C,
                FILE_D,
            ),
        ];

        for (held, rook_file, between, king_file, rook_dest_file) in castles {
            let rook_sq = Square::of(rank, rook_file);
            if !held || self.piece_at(rook_sq) != rook {
                continue;
            }

            let path: SquareSet = between.iter().map(|&file| Square::of(rank, file)).collect();
            if !(path & occupancy).is_empty() || !(path & danger).is_empty() {
                continue;
            }

            moves.push(
                Move::new(self.id(), piece, sq, Square::of(rank, king_file))
                    .castle(rook_sq, Square::of(rank, rook_dest_file)),
            );
        }
    }

    /// The en-passant capture available to the pawn on `sq`, if any. The capture is played out to confirm it does
    /// not expose the king, which covers both checks and the pawns leaving a shared rank with the king.
    fn en_passant_move(&self, sq: Square, piece: Piece) -> Option<Move> {
        let target = self.en_passant_target()?;
        let captured = self.piece_at(target)?;
        if captured != Piece::new(piece.color.toggle(), PieceKind::Pawn)
            || target.rank() != sq.rank()
            || target.file().as_u8().abs_diff(sq.file().as_u8()) != 1
        {
            return None;
        }

        let dest = target.towards(Direction::new(0, piece.color.forward()))?;
        if self.piece_at(dest).is_some() {
            return None;
        }

        let mov = Move::new(self.id(), piece, sq, dest).en_passant();
        if self.apply(mov).is_check(piece.color) {
            return None;
        }

        Some(mov)
    }
}

/// Counts the leaf nodes of the legal move tree rooted at `pos`, `depth` plies deep.
pub fn perft(pos: &Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = pos.legal_moves();
    if depth == 1 {
        return moves.len() as u64;
    }

    moves
        .iter()
        .map(|&mov| perft(&pos.apply(mov), depth - 1))
        .sum()
}

/// Like [`perft`], with the root moves divided among `threads` worker threads.
pub fn parallel_perft(pos: &Position, depth: u32, threads: usize) -> u64 {
    if depth <= 1 {
        return perft(pos, depth);
    }

    let roots: Vec<Move> = pos.legal_moves().iter().copied().collect();
    let chunk = roots.len().div_ceil(threads.max(1)).max(1);
    thread::scope(|s| {
        let workers: Vec<_> = roots
            .chunks(chunk)
            .enumerate()
            .map(|(i, moves)| {
                s.spawn(move || {
                    let count = moves
                        .iter()
                        .map(|&mov| perft(&pos.apply(mov), depth - 1))
                        .sum::<u64>();
                    tracing::debug!(worker = i, roots = moves.len(), count, "perft worker finished");
                    count
                })
            })
            .collect();

        workers
            .into_iter()
            .map(|worker| worker.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
            .sum()
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::CheckKind;
    use crate::core::*;
    use crate::position::Position;

    fn position(side: Color, placements: &[(&str, &str, &str)]) -> Position {
        Position::from_placements(side, placements).unwrap()
    }

    fn destinations(pos: &Position, square: Square) -> SquareSet {
        pos.legal_moves()
            .for_piece(square)
            .iter()
            .map(|mov| mov.destination())
            .collect()
    }

    fn set(squares: &[Square]) -> SquareSet {
        squares.iter().copied().collect()
    }

    fn assert_moves_generated(pos: &Position, square: Square, expected: &[Square]) {
        let generated = destinations(pos, square);
        if generated != set(expected) {
            println!("{}", pos);
            println!("generated for {}:\n{}", square, generated);
            panic!("unexpected moves for {}", square);
        }
    }

    fn assert_no_self_check(pos: &Position) {
        let us = pos.side_to_move();
        for &mov in pos.legal_moves().iter() {
            if pos.apply(mov).is_check(us) {
                println!("{}", pos);
                panic!("move {:?} leaves the king in check", mov);
            }
        }
    }

    mod checks {
        use super::*;

        #[test]
        fn queen_check_on_file() {
            let pos = position(
                Color::White,
                &[("white", "King", "e1"), ("black", "Queen", "e8")],
            );
            let checks = pos.checks();
            assert_eq!(CheckKind::Simple, checks.kind());
            assert_eq!(set(&[E8]), checks.checkers);
            assert_eq!(set(&[E2, E3, E4, E5, E6, E7, E8]), checks.intercepting);
            assert!(pos.is_check(Color::White));
            for mov in pos.legal_moves().for_piece(E1) {
                assert_ne!(FILE_E, mov.destination().file());
            }
            assert_moves_generated(&pos, E1, &[D1, D2, F1, F2]);
        }

        #[test]
        fn interceptions_only() {
            let pos = position(
                Color::White,
                &[
                    ("white", "King", "e1"),
                    ("white", "Rook", "a4"),
                    ("white", "Knight", "g1"),
                    ("black", "Rook", "e8"),
                    ("black", "King", "h8"),
                ],
            );
            assert_moves_generated(&pos, A4, &[E4]);
            assert_moves_generated(&pos, G1, &[E2]);
            assert_no_self_check(&pos);
        }

        #[test]
        fn capture_the_checker() {
            let pos = position(
                Color::White,
                &[
                    ("white", "King", "e1"),
                    ("white", "Bishop", "b5"),
                    ("black", "Knight", "d3"),
                    ("black", "King", "h8"),
                ],
            );
            let checks = pos.checks();
            assert_eq!(set(&[D3]), checks.intercepting);
            assert_moves_generated(&pos, B5, &[D3]);
        }

        #[test]
        fn pawn_check() {
            let pos = position(
                Color::White,
                &[
                    ("white", "King", "e4"),
                    ("white", "Rook", "a5"),
                    ("black", "Pawn", "d5"),
                    ("black", "King", "h8"),
                ],
            );
            assert_eq!(set(&[D5]), pos.checks().checkers);
            assert_moves_generated(&pos, A5, &[D5]);
        }

        #[test]
        fn pawn_behind_king_gives_no_check() {
            let pos = position(
                Color::White,
                &[
                    ("white", "King", "e4"),
                    ("black", "Pawn", "d3"),
                    ("black", "King", "h8"),
                ],
            );
            assert_eq!(CheckKind::NoCheck, pos.checks().kind());
            assert!(!pos.is_check(Color::White));
        }

        #[test]
        fn double_check() {
            let pos = position(
                Color::White,
                &[
                    ("white", "King", "e1"),
                    ("white", "Queen", "a5"),
                    ("white", "Rook", "h4"),
                    ("black", "Rook", "e8"),
                    ("black", "Knight", "d3"),
                    ("black", "King", "h8"),
                ],
            );
            let checks = pos.checks();
            assert_eq!(CheckKind::Double, checks.kind());
            assert!(checks.intercepting.is_empty());
            assert!(pos.legal_moves().for_piece(A5).is_empty());
            assert!(pos.legal_moves().for_piece(H4).is_empty());
            assert!(!pos.legal_moves().for_piece(E1).is_empty());
            assert_no_self_check(&pos);
        }

        #[test]
        fn king_does_not_retreat_along_ray() {
            let pos = position(
                Color::White,
                &[
                    ("white", "King", "d4"),
                    ("black", "Bishop", "a7"),
                    ("black", "King", "h8"),
                ],
            );
            assert!(!destinations(&pos, D4).contains(E3));
            assert_no_self_check(&pos);
        }

        #[test]
        fn no_king_no_checks() {
            let pos = position(
                Color::White,
                &[("white", "Rook", "a1"), ("black", "Queen", "a8")],
            );
            assert_eq!(CheckKind::NoCheck, pos.checks().kind());
            assert_eq!(14, pos.legal_moves().len());
        }
    }

    mod pins {
        use super::*;

        #[test]
        fn rook_pinned_on_file() {
            let pos = position(
                Color::White,
                &[
                    ("white", "King", "e1"),
                    ("white", "Rook", "e4"),
                    ("black", "Rook", "e8"),
                    ("black", "King", "h8"),
                ],
            );
            let line = pos.checks().pin_line(E4).unwrap();
            assert_eq!(set(&[E2, E3, E5, E6, E7, E8]), line);
            assert_moves_generated(&pos, E4, &[E2, E3, E5, E6, E7, E8]);
        }

        #[test]
        fn knight_pinned_cannot_move() {
            let pos = position(
                Color::White,
                &[
                    ("white", "King", "e1"),
                    ("white", "Knight", "d2"),
                    ("black", "Bishop", "a5"),
                    ("black", "King", "h8"),
                ],
            );
            assert!(pos.legal_moves().for_piece(D2).is_empty());
        }

        #[test]
        fn bishop_pinned_on_file_cannot_move() {
            let pos = position(
                Color::White,
                &[
                    ("white", "King", "e1"),
                    ("white", "Bishop", "e3"),
                    ("black", "Queen", "e7"),
                    ("black", "King", "h8"),
                ],
            );
            assert!(pos.legal_moves().for_piece(E3).is_empty());
        }

        #[test]
        fn pinned_pawn_captures_pinner() {
            let pos = position(
                Color::White,
                &[
                    ("white", "King", "e1"),
                    ("white", "Pawn", "f2"),
                    ("black", "Bishop", "g3"),
                    ("black", "King", "h8"),
                ],
            );
            assert_moves_generated(&pos, F2, &[G3]);
        }

        #[test]
        fn pinned_pawn_pushes_along_file() {
            let pos = position(
                Color::White,
                &[
                    ("white", "King", "e1"),
                    ("white", "Pawn", "e2"),
                    ("black", "Bishop", "d3"),
                    ("black", "Rook", "e8"),
                    ("black", "King", "h8"),
                ],
            );
            assert_moves_generated(&pos, E2, &[E3, E4]);
        }

        #[test]
        fn non_aligned_slider_does_not_pin() {
            let pos = position(
                Color::White,
                &[
                    ("white", "King", "e1"),
                    ("white", "Knight", "e4"),
                    ("black", "Bishop", "e8"),
                    ("black", "King", "h8"),
                ],
            );
            assert!(pos.checks().pins.is_empty());
            assert_eq!(8, pos.legal_moves().for_piece(E4).len());
        }
    }

    mod castling {
        use super::*;

        fn castles(pos: &Position) -> Vec<Move> {
            pos.legal_moves()
                .iter()
                .filter(|mov| mov.is_castle())
                .copied()
                .collect()
        }

        #[test]
        fn kingside_with_rook() {
            let pos = position(
                Color::White,
                &[
                    ("white", "King", "e1"),
                    ("white", "Rook", "h1"),
                    ("black", "King", "e8"),
                ],
            );
            let moves = castles(&pos);
            assert_eq!(1, moves.len());
            assert_eq!(G1, moves[0].destination());
            assert_eq!(Some((H1, F1)), moves[0].rook_squares());
            assert!(moves[0].is_kingside_castle());
        }

        #[test]
        fn both_sides() {
            let pos = position(
                Color::Black,
                &[
                    ("white", "King", "e1"),
                    ("black", "Rook", "a8"),
                    ("black", "Rook", "h8"),
                    ("black", "King", "e8"),
                ],
            );
            let dests: HashSet<_> = castles(&pos).iter().map(|m| m.destination()).collect();
            assert_eq!([C8, G8].iter().copied().collect::<HashSet<_>>(), dests);
        }

        #[test]
        fn not_out_of_check() {
            let pos = position(
                Color::White,
                &[
                    ("white", "King", "e1"),
                    ("white", "Rook", "h1"),
                    ("black", "Rook", "e8"),
                    ("black", "King", "a8"),
                ],
            );
            assert!(castles(&pos).is_empty());
        }

        #[test]
        fn not_through_control() {
            let pos = position(
                Color::White,
                &[
                    ("white", "King", "e1"),
                    ("white", "Rook", "h1"),
                    ("white", "Rook", "a1"),
                    ("black", "Rook", "g8"),
                    ("black", "Bishop", "f4"),
                    ("black", "King", "h8"),
                ],
            );
            // g8 covers g1 and f4 covers c1
            assert!(castles(&pos).is_empty());
        }

        #[test]
        fn queenside_requires_b_file_empty_and_uncontrolled() {
            let blocked = position(
                Color::White,
                &[
                    ("white", "King", "e1"),
                    ("white", "Rook", "a1"),
                    ("white", "Knight", "b1"),
                    ("black", "King", "e8"),
                ],
            );
            assert!(castles(&blocked).is_empty());

            let controlled = position(
                Color::White,
                &[
                    ("white", "King", "e1"),
                    ("white", "Rook", "a1"),
                    ("black", "Rook", "b8"),
                    ("black", "King", "e8"),
                ],
            );
            assert!(castles(&controlled).is_empty());
        }

        #[test]
        fn requires_right_and_rook() {
            let mut pos = position(
                Color::White,
                &[
                    ("white", "King", "e1"),
                    ("white", "Rook", "h1"),
                    ("black", "King", "e8"),
                ],
            );
            pos.set_castle_status(CastleStatus::WHITE_QUEENSIDE | CastleStatus::BLACK);
            assert!(castles(&pos).is_empty());

            let no_rook = position(
                Color::White,
                &[
                    ("white", "King", "e1"),
                    ("white", "Knight", "h1"),
                    ("black", "King", "e8"),
                ],
            );
            assert!(castles(&no_rook).is_empty());
        }

        #[test]
        fn king_off_home_square() {
            let pos = position(
                Color::White,
                &[
                    ("white", "King", "d1"),
                    ("white", "Rook", "h1"),
                    ("black", "King", "e8"),
                ],
            );
            assert!(castles(&pos).is_empty());
        }
    }

    mod pawns {
        use super::*;

        #[test]
        fn four_promotions() {
            let pos = position(
                Color::White,
                &[
                    ("white", "King", "a1"),
                    ("white", "Pawn", "e7"),
                    ("black", "King", "h1"),
                ],
            );
            let moves = pos.legal_moves().between(E7, E8);
            assert_eq!(4, moves.len());
            let kinds: HashSet<_> = moves.iter().filter_map(|m| m.promotion_piece()).collect();
            assert_eq!(PieceKind::PROMOTIONS.iter().copied().collect::<HashSet<_>>(), kinds);
            assert!(moves.iter().all(|m| m.is_promotion()));
        }

        #[test]
        fn promotion_by_capture() {
            let pos = position(
                Color::Black,
                &[
                    ("white", "King", "h8"),
                    ("white", "Rook", "c1"),
                    ("black", "Pawn", "b2"),
                    ("black", "King", "e5"),
                ],
            );
            assert_eq!(4, pos.legal_moves().between(B2, C1).len());
            assert_eq!(4, pos.legal_moves().between(B2, B1).len());
        }

        #[test]
        fn double_push_flagged() {
            let pos = Position::starting();
            let moves = pos.legal_moves().between(E2, E4);
            assert_eq!(1, moves.len());
            assert!(moves[0].is_double_pawn_push());
            assert!(!pos.legal_moves().between(E2, E3)[0].is_double_pawn_push());
        }

        #[test]
        fn en_passant_available() {
            let mut pos = position(
                Color::White,
                &[
                    ("white", "King", "e1"),
                    ("white", "Pawn", "e5"),
                    ("black", "Pawn", "d5"),
                    ("black", "King", "e8"),
                ],
            );
            pos.set_en_passant_target(Some(D5)).unwrap();
            let moves = pos.legal_moves().between(E5, D6);
            assert_eq!(1, moves.len());
            assert!(moves[0].is_en_passant());
        }

        #[test]
        fn en_passant_only_for_target() {
            let pos = position(
                Color::White,
                &[
                    ("white", "King", "e1"),
                    ("white", "Pawn", "e5"),
                    ("black", "Pawn", "d5"),
                    ("black", "King", "e8"),
                ],
            );
            assert!(pos.legal_moves().between(E5, D6).is_empty());
        }

        #[test]
        fn en_passant_exposing_king_on_rank() {
            let mut pos = position(
                Color::White,
                &[
                    ("white", "King", "a5"),
                    ("white", "Pawn", "e5"),
                    ("black", "Pawn", "d5"),
                    ("black", "Rook", "h5"),
                    ("black", "King", "e8"),
                ],
            );
            pos.set_en_passant_target(Some(D5)).unwrap();
            assert!(pos.legal_moves().between(E5, D6).is_empty());
        }

        #[test]
        fn en_passant_answers_pawn_check() {
            let mut pos = position(
                Color::White,
                &[
                    ("white", "King", "e4"),
                    ("white", "Pawn", "e5"),
                    ("black", "Pawn", "d5"),
                    ("black", "King", "h8"),
                ],
            );
            pos.set_en_passant_target(Some(D5)).unwrap();
            assert!(pos.is_check(Color::White));
            assert_eq!(1, pos.legal_moves().between(E5, D6).len());
            assert_no_self_check(&pos);
        }
    }

    mod perft {
        use crate::movegen::{parallel_perft, perft};
        use crate::position::Position;

        #[test]
        fn starting_position() {
            let pos = Position::starting();
            assert_eq!(1, perft(&pos, 0));
            assert_eq!(20, perft(&pos, 1));
            assert_eq!(400, perft(&pos, 2));
            assert_eq!(8902, perft(&pos, 3));
        }

        #[test]
        fn parallel_matches_serial() {
            let pos = Position::starting();
            assert_eq!(8902, parallel_perft(&pos, 3, 4));
            assert_eq!(400, parallel_perft(&pos, 2, 64));
        }
    }
}
