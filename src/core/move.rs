// Copyright 2017-2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::core::*;
use crate::position::PositionId;
use bitflags::bitflags;
use std::fmt::{self, Write};
use std::hash::{Hash, Hasher};

bitflags! {
    /// The special-move attributes a move can carry. At most one of them is set on any legal move.
    pub struct MoveFlags: u8 {
        const QUIET = 0;
        const CASTLE = 0b0001;
        const DOUBLE_PAWN_PUSH = 0b0010;
        const EN_PASSANT = 0b0100;
        const PROMOTION = 0b1000;
    }
}

/// A candidate or applied transition out of one specific position.
///
/// ## Identity
/// Two moves are equal when they leave the same position (by [`PositionId`]), move the same piece from the same
/// square to the same destination, agree on whether they castle, and promote to the same kind. The remaining
/// attributes are derived from those, so a move rebuilt from its description (say, from notation) compares equal to
/// the one the move generator produced and can be looked up by set membership.
#[derive(Copy, Clone)]
pub struct Move {
    position: PositionId,
    piece: Piece,
    source: Square,
    destination: Square,
    flags: MoveFlags,
    promotion: Option<PieceKind>,
    rook: Option<(Square, Square)>,
}

impl Move {
    /// Constructs a plain move, a capture if the destination is occupied.
    pub(crate) fn new(position: PositionId, piece: Piece, source: Square, destination: Square) -> Move {
        Move {
            position,
            piece,
            source,
            destination,
            flags: MoveFlags::QUIET,
            promotion: None,
            rook: None,
        }
    }

    pub(crate) fn double_pawn_push(mut self) -> Move {
        self.flags |= MoveFlags::DOUBLE_PAWN_PUSH;
        self
    }

    pub(crate) fn en_passant(mut self) -> Move {
        self.flags |= MoveFlags::EN_PASSANT;
        self
    }

    pub(crate) fn promote(mut self, kind: PieceKind) -> Move {
        debug_assert!(PieceKind::PROMOTIONS.contains(&kind), "invalid promotion piece");
        self.flags |= MoveFlags::PROMOTION;
        self.promotion = Some(kind);
        self
    }

    pub(crate) fn castle(mut self, rook_source: Square, rook_destination: Square) -> Move {
        self.flags |= MoveFlags::CASTLE;
        self.rook = Some((rook_source, rook_destination));
        self
    }

    /// The position this move leaves.
    pub fn position_id(self) -> PositionId {
        self.position
    }

    /// The moving piece, as it stands before the move.
    pub fn piece(self) -> Piece {
        self.piece
    }

    /// Returns the source square of this move.
    pub fn source(self) -> Square {
        self.source
    }

    /// Returns the destination square of this move.
    pub fn destination(self) -> Square {
        self.destination
    }

    pub fn flags(self) -> MoveFlags {
        self.flags
    }

    pub fn is_castle(self) -> bool {
        self.flags.contains(MoveFlags::CASTLE)
    }

    pub fn is_kingside_castle(self) -> bool {
        self.is_castle() && self.destination.file() == FILE_G
    }

    pub fn is_queenside_castle(self) -> bool {
        self.is_castle() && self.destination.file() == FILE_C
    }

    /// The rook's start and end squares, for castling moves.
    pub fn rook_squares(self) -> Option<(Square, Square)> {
        self.rook
    }

    pub fn is_double_pawn_push(self) -> bool {
        self.flags.contains(MoveFlags::DOUBLE_PAWN_PUSH)
    }

    pub fn is_en_passant(self) -> bool {
        self.flags.contains(MoveFlags::EN_PASSANT)
    }

    pub fn is_promotion(self) -> bool {
        self.flags.contains(MoveFlags::PROMOTION)
    }

    /// The kind a pawn promotes to, if this is a promotion.
    pub fn promotion_piece(self) -> Option<PieceKind> {
        self.promotion
    }

    /// The kind of piece standing on the destination once the move is made.
    pub fn resulting_kind(self) -> PieceKind {
        self.promotion.unwrap_or(self.piece.kind)
    }

    /// Returns a UCI-style coordinate string for this move, e.g. `e2e4` or `e7e8q`.
    pub fn as_uci(self) -> String {
        let mut buf = String::new();
        let _ = write!(&mut buf, "{}{}", self.source, self.destination);
        if let Some(kind) = self.promotion {
            let _ = write!(&mut buf, "{}", Piece::new(Color::Black, kind));
        }

        buf
    }
}

impl PartialEq for Move {
    fn eq(&self, other: &Move) -> bool {
        self.position == other.position
            && self.piece == other.piece
            && self.source == other.source
            && self.destination == other.destination
            && self.is_castle() == other.is_castle()
            && self.promotion == other.promotion
    }
}

impl Eq for Move {}

impl Hash for Move {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.position.hash(state);
        self.piece.hash(state);
        self.source.hash(state);
        self.destination.hash(state);
        self.is_castle().hash(state);
        self.promotion.hash(state);
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, "{}", self.as_uci())
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(
            f,
            "{} {:?} {:?} ({:?})",
            self.as_uci(),
            self.piece.color,
            self.piece.kind,
            self.flags
        )
    }
}

#[cfg(test)]
mod tests {
    use super::Move;
    use crate::core::*;
    use crate::position::PositionId;
    use std::collections::HashSet;

    const WHITE_PAWN: Piece = Piece::new(Color::White, PieceKind::Pawn);
    const WHITE_KING: Piece = Piece::new(Color::White, PieceKind::King);

    #[test]
    fn flags() {
        let id = PositionId::next();
        let dpp = Move::new(id, WHITE_PAWN, D2, D4).double_pawn_push();
        assert!(dpp.is_double_pawn_push());
        assert!(!dpp.is_en_passant());
        assert!(!dpp.is_castle());

        let ep = Move::new(id, WHITE_PAWN, E5, D6).en_passant();
        assert!(ep.is_en_passant());
        assert!(!ep.is_promotion());

        let castle = Move::new(id, WHITE_KING, E1, C1).castle(A1, D1);
        assert!(castle.is_queenside_castle());
        assert!(!castle.is_kingside_castle());
        assert_eq!(Some((A1, D1)), castle.rook_squares());
    }

    #[test]
    fn promotion_kinds_are_distinct_moves() {
        let id = PositionId::next();
        let moves: HashSet<_> = PieceKind::PROMOTIONS
            .iter()
            .map(|&kind| Move::new(id, WHITE_PAWN, E7, E8).promote(kind))
            .collect();
        assert_eq!(4, moves.len());
        assert!(moves.contains(&Move::new(id, WHITE_PAWN, E7, E8).promote(PieceKind::Rook)));
        assert!(!moves.contains(&Move::new(id, WHITE_PAWN, E7, E8)));
    }

    #[test]
    fn equality_is_by_value() {
        let id = PositionId::next();
        let generated = Move::new(id, WHITE_PAWN, E2, E4).double_pawn_push();
        let described = Move::new(id, WHITE_PAWN, E2, E4);
        assert_eq!(generated, described);

        let elsewhere = Move::new(PositionId::next(), WHITE_PAWN, E2, E4);
        assert_ne!(generated, elsewhere);
    }

    #[test]
    fn castle_flag_participates_in_equality() {
        let id = PositionId::next();
        let castle = Move::new(id, WHITE_KING, E1, G1).castle(H1, F1);
        assert_ne!(castle, Move::new(id, WHITE_KING, E1, G1));
    }

    #[test]
    fn uci_rendering() {
        let id = PositionId::next();
        assert_eq!("a1a2", Move::new(id, WHITE_KING, A1, A2).as_uci());
        assert_eq!(
            "a7a8q",
            Move::new(id, WHITE_PAWN, A7, A8)
                .promote(PieceKind::Queen)
                .as_uci()
        );
    }
}
