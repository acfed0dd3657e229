// Copyright 2017-2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::{
    fmt,
    sync::{
        atomic::{AtomicU64, Ordering},
        OnceLock,
    },
};

use serde::Serialize;
use thiserror::Error;

use crate::{
    core::{self, attacks, *},
    movegen::LegalMoves,
    notation::{Language, NotatedMove},
};

static NEXT_POSITION_ID: AtomicU64 = AtomicU64::new(1);

/// Identifies one concrete board state. Every position built, forked, or edited gets a fresh id, so moves generated
/// for one position never compare equal to moves of another.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PositionId(u64);

impl PositionId {
    pub(crate) fn next() -> PositionId {
        PositionId(NEXT_POSITION_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Errors raised while placing or removing pieces.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error(transparent)]
    InvalidColor(#[from] ColorParseError),
    #[error(transparent)]
    UnimplementedPieceKind(#[from] PieceKindParseError),
    #[error(transparent)]
    InvalidSquare(#[from] SquareParseError),
    #[error("square {0} is already occupied")]
    SquareOccupied(Square),
    #[error("square {0} is empty")]
    EmptySquare(Square),
    #[error("no pawn on {0} to serve as en-passant target")]
    InvalidEnPassantTarget(Square),
}

/// Ways a position can break the rules of chess. Only reported by [`Position::assert_valid`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ValidityError {
    #[error("{color} has {count} kings")]
    InvalidNumberOfKings { color: Color, count: u32 },
    #[error("the {0} king is in check, but it is not {0}'s turn to move")]
    NonPlayingSideKingInCheck(Color),
    #[error("pawn on {0}, a first or last rank square")]
    PawnOnFirstOrLastRank(Square),
}

/// A move or notation that the position's legal move set does not contain.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum IllegalMove {
    #[error("move {0} is not legal in this position")]
    NotLegal(Move),
    #[error("no legal move matches {language} notation {notation:?}")]
    UnknownNotation { notation: String, language: Language },
    #[error("moving from {origin} to {destination} requires choosing a promotion piece")]
    PromotionRequired { origin: Square, destination: Square },
    #[error("no legal move from {origin} to {destination}")]
    NoSuchMove { origin: Square, destination: Square },
}

/// A chess position: the pieces on the board, the side to move, castle rights and the en-passant target.
///
/// Positions are values. Making a move forks a brand-new position and leaves this one untouched; the only state a
/// position mutates after it is built is its lazily computed set of legal moves, which is written at most once and
/// is safe to populate from several threads.
#[derive(Clone, Debug)]
pub struct Position {
    id: PositionId,
    /// The occupant of each square.
    board: [Option<Piece>; 64],
    /// SquareSets for each piece and color combination (6 pieces, 2 colors = 12 sets).
    sets_by_piece: [SquareSet; 12],
    /// Squaresets for each color.
    sets_by_color: [SquareSet; 2],
    /// The pawn that just advanced two squares, capturable en passant on this move only.
    en_passant_target: Option<Square>,
    /// Castle status for both players.
    castle_status: CastleStatus,
    /// Color whose turn it is to move.
    side_to_move: Color,
    legal_moves: OnceLock<LegalMoves>,
}

impl Position {
    pub fn id(&self) -> PositionId {
        self.id
    }

    pub fn en_passant_target(&self) -> Option<Square> {
        self.en_passant_target
    }

    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn castle_status(&self) -> CastleStatus {
        self.castle_status
    }

    pub fn can_castle_kingside(&self, color: Color) -> bool {
        self.castle_status.contains(CastleStatus::kingside(color))
    }

    pub fn can_castle_queenside(&self, color: Color) -> bool {
        self.castle_status.contains(CastleStatus::queenside(color))
    }

    pub fn pieces(&self, color: Color) -> SquareSet {
        self.sets_by_color[color as usize]
    }

    pub fn pieces_of_kind(&self, color: Color, kind: PieceKind) -> SquareSet {
        self.sets_by_piece[piece_index(Piece::new(color, kind))]
    }

    pub fn occupancy(&self) -> SquareSet {
        self.pieces(Color::White) | self.pieces(Color::Black)
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.board[square.as_u8() as usize]
    }

    pub(crate) fn cached_legal_moves(&self) -> &OnceLock<LegalMoves> {
        &self.legal_moves
    }

    /// The square of the given color's king. If a position holds several kings of one color, the lowest one.
    pub fn king(&self, color: Color) -> Option<Square> {
        self.pieces_of_kind(color, PieceKind::King).into_iter().next()
    }
}

//
// Construction and piece placement.
//

impl Position {
    /// An empty board, white to move, with every castle right still held.
    pub fn new() -> Position {
        Position {
            id: PositionId::next(),
            board: [None; 64],
            sets_by_piece: [SquareSet::empty(); 12],
            sets_by_color: [SquareSet::empty(); 2],
            en_passant_target: None,
            castle_status: CastleStatus::BLACK | CastleStatus::WHITE,
            side_to_move: Color::White,
            legal_moves: OnceLock::new(),
        }
    }

    pub fn starting() -> Position {
        const BACK_RANK: [PieceKind; 8] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];

        let mut pos = Position::new();
        for color in core::colors() {
            for (file, &kind) in core::files().zip(BACK_RANK.iter()) {
                pos.put(Square::of(color.home_rank(), file), Piece::new(color, kind));
                pos.put(
                    Square::of(color.pawn_rank(), file),
                    Piece::new(color, PieceKind::Pawn),
                );
            }
        }

        pos
    }

    /// Builds a position from typed placements.
    pub fn from_pieces(
        side_to_move: Color,
        pieces: &[(Color, PieceKind, Square)],
    ) -> Result<Position, PlacementError> {
        let mut pos = Position::new();
        pos.side_to_move = side_to_move;
        for &(color, kind, square) in pieces {
            pos.add_piece(square, Piece::new(color, kind))?;
        }

        Ok(pos)
    }

    /// Builds a position from `(color, kind, square)` name triples such as `("white", "King", "e1")`.
    pub fn from_placements(
        side_to_move: Color,
        placements: &[(&str, &str, &str)],
    ) -> Result<Position, PlacementError> {
        let mut pos = Position::new();
        pos.side_to_move = side_to_move;
        for &(color, kind, square) in placements {
            pos.place_piece(color, kind, square)?;
        }

        Ok(pos)
    }

    /// Places a piece described by names, returning the placed piece.
    pub fn place_piece(
        &mut self,
        color: &str,
        kind: &str,
        square: &str,
    ) -> Result<Piece, PlacementError> {
        let piece = Piece::new(color.parse()?, kind.parse()?);
        self.add_piece(square.parse()?, piece)?;
        Ok(piece)
    }

    pub fn add_piece(&mut self, square: Square, piece: Piece) -> Result<(), PlacementError> {
        if self.piece_at(square).is_some() {
            return Err(PlacementError::SquareOccupied(square));
        }

        self.put(square, piece);
        self.invalidate();
        Ok(())
    }

    pub fn remove_piece(&mut self, square: Square) -> Result<Piece, PlacementError> {
        let piece = self.take(square).ok_or(PlacementError::EmptySquare(square))?;
        self.invalidate();
        Ok(piece)
    }

    pub fn set_side_to_move(&mut self, color: Color) {
        self.side_to_move = color;
        self.invalidate();
    }

    pub fn set_castle_status(&mut self, status: CastleStatus) {
        self.castle_status = status;
        self.invalidate();
    }

    /// Marks the pawn on `square` as having just advanced two squares.
    pub fn set_en_passant_target(&mut self, square: Option<Square>) -> Result<(), PlacementError> {
        if let Some(sq) = square {
            match self.piece_at(sq) {
                Some(Piece {
                    kind: PieceKind::Pawn,
                    ..
                }) => {}
                _ => return Err(PlacementError::InvalidEnPassantTarget(sq)),
            }
        }

        self.en_passant_target = square;
        self.invalidate();
        Ok(())
    }

    fn put(&mut self, square: Square, piece: Piece) {
        debug_assert!(self.piece_at(square).is_none());
        self.board[square.as_u8() as usize] = Some(piece);
        self.sets_by_color[piece.color as usize].insert(square);
        self.sets_by_piece[piece_index(piece)].insert(square);
    }

    fn take(&mut self, square: Square) -> Option<Piece> {
        let piece = self.board[square.as_u8() as usize].take()?;
        self.sets_by_color[piece.color as usize].remove(square);
        self.sets_by_piece[piece_index(piece)].remove(square);
        if self.en_passant_target == Some(square) {
            self.en_passant_target = None;
        }

        Some(piece)
    }

    /// Any edit makes this a different position: new id, no cached legal moves.
    fn invalidate(&mut self) {
        self.id = PositionId::next();
        self.legal_moves = OnceLock::new();
    }

    /// Copies the pieces into a new, independent position with the other side to move.
    fn fork(&self, castle_status: CastleStatus) -> Position {
        Position {
            id: PositionId::next(),
            board: self.board,
            sets_by_piece: self.sets_by_piece,
            sets_by_color: self.sets_by_color,
            en_passant_target: None,
            castle_status,
            side_to_move: self.side_to_move.toggle(),
            legal_moves: OnceLock::new(),
        }
    }
}

//
// Geometry and control.
//

impl Position {
    /// Walks outward from `from` in `dir`, returning every traversed square (including the blocking square) and the
    /// blocking piece if the walk stopped on one.
    pub fn explore_in_direction(
        &self,
        from: Square,
        dir: Direction,
    ) -> (SquareSet, Option<(Square, Piece)>) {
        let ray = attacks::ray(from, dir, self.occupancy());
        let blocker = ray
            .blocker
            .and_then(|sq| self.piece_at(sq).map(|piece| (sq, piece)));
        (ray.squares, blocker)
    }

    /// The squares controlled by the piece on `square`, or the empty set if the square is empty.
    pub fn controlled_squares_of(&self, square: Square) -> SquareSet {
        match self.piece_at(square) {
            Some(piece) => attacks::attacks(piece.kind, piece.color, square, self.occupancy()),
            None => SquareSet::empty(),
        }
    }

    /// The union of the squares controlled by every piece of `color`.
    pub fn controlled_squares(&self, color: Color) -> SquareSet {
        self.controlled_squares_with(color, self.occupancy())
    }

    /// Like `controlled_squares`, with sliding reach computed against `occupancy` instead of the actual board.
    pub(crate) fn controlled_squares_with(&self, color: Color, occupancy: SquareSet) -> SquareSet {
        self.pieces(color)
            .into_iter()
            .filter_map(|sq| {
                self.piece_at(sq)
                    .map(|piece| attacks::attacks(piece.kind, color, sq, occupancy))
            })
            .fold(SquareSet::empty(), |acc, set| acc | set)
    }

    /// The squares the piece on `square` can move to, ignoring checks and pins. Kings additionally avoid every square
    /// the opponent controls.
    pub fn moving_squares(&self, square: Square) -> SquareSet {
        let piece = match self.piece_at(square) {
            Some(piece) => piece,
            None => return SquareSet::empty(),
        };

        let occupancy = self.occupancy();
        let ours = self.pieces(piece.color);
        let theirs = self.pieces(piece.color.toggle());
        match piece.kind {
            PieceKind::Pawn => {
                attacks::pawn_pushes(square, piece.color, occupancy)
                    | (attacks::pawn_attacks(square, piece.color) & theirs)
            }
            PieceKind::King => {
                // The king is lifted off the board so it cannot step back along a ray that attacks it.
                let danger = self.controlled_squares_with(
                    piece.color.toggle(),
                    occupancy - SquareSet::single(square),
                );
                attacks::king_attacks(square) - ours - danger
            }
            kind => attacks::attacks(kind, piece.color, square, occupancy) - ours,
        }
    }

    /// Whether the king of `color` stands on a square the opponent controls. A side without a king is never in check.
    pub fn is_check(&self, color: Color) -> bool {
        match self.king(color) {
            Some(king) => self.controlled_squares(color.toggle()).contains(king),
            None => false,
        }
    }
}

//
// Validity.
//

impl Position {
    /// Checks that each side has exactly one king, that the side not to move is not in check, and that no pawn
    /// stands on the first or last rank.
    pub fn assert_valid(&self) -> Result<(), ValidityError> {
        for color in core::colors() {
            let count = self.pieces_of_kind(color, PieceKind::King).len();
            if count != 1 {
                return Err(ValidityError::InvalidNumberOfKings { color, count });
            }
        }

        let waiting = self.side_to_move.toggle();
        if self.is_check(waiting) {
            return Err(ValidityError::NonPlayingSideKingInCheck(waiting));
        }

        let pawns = self.pieces_of_kind(Color::White, PieceKind::Pawn)
            | self.pieces_of_kind(Color::Black, PieceKind::Pawn);
        if let Some(square) = (pawns & SS_BACK_RANKS).into_iter().next() {
            return Err(ValidityError::PawnOnFirstOrLastRank(square));
        }

        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        match self.assert_valid() {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(%err, "invalid position");
                false
            }
        }
    }
}

//
// Making moves.
//

impl Position {
    /// Applies a legal move, returning the resulting position and the move annotated with its notation and whether it
    /// gives check. This position is left untouched.
    pub fn make_move(
        &self,
        mov: Move,
        language: Language,
    ) -> Result<(Position, NotatedMove), IllegalMove> {
        if !self.legal_moves().contains(&mov) {
            return Err(IllegalMove::NotLegal(mov));
        }

        // Generated moves carry every flag; a caller-described move may not, so play the generated one.
        let mov = self
            .legal_moves()
            .iter()
            .find(|&&m| m == mov)
            .copied()
            .unwrap_or(mov);
        let notation = self.notation(mov, language);
        let next = self.apply(mov);
        let check = next.is_check(next.side_to_move());
        tracing::debug!(%notation, check, "applied move {}", mov);
        Ok((next, NotatedMove::new(mov, notation, check)))
    }

    /// Resolves `notation` against the legal moves and applies the move it names.
    pub fn play(
        &self,
        notation: &str,
        language: Language,
    ) -> Result<(Position, NotatedMove), IllegalMove> {
        let mov = self.resolve(notation, language)?;
        self.make_move(mov, language)
    }

    /// Produces the position after `mov` without checking that `mov` is legal. `mov` must at least describe a piece
    /// of the side to move on its source square.
    pub(crate) fn apply(&self, mov: Move) -> Position {
        let mut next = self.fork(self.updated_castle_status(mov));
        next.take(mov.source());
        if mov.is_en_passant() {
            if let Some(target) = self.en_passant_target {
                next.take(target);
            }
        } else {
            next.take(mov.destination());
        }

        next.put(
            mov.destination(),
            Piece::new(mov.piece().color, mov.resulting_kind()),
        );
        if let Some((rook_source, rook_destination)) = mov.rook_squares() {
            if let Some(rook) = next.take(rook_source) {
                next.put(rook_destination, rook);
            }
        }

        if mov.is_double_pawn_push() {
            next.en_passant_target = Some(mov.destination());
        }

        next
    }

    /// Castle rights after `mov`: a king move drops both of its side's rights, a rook leaving its corner drops that
    /// corner's right, and any piece landing on a corner drops the right tied to that corner.
    fn updated_castle_status(&self, mov: Move) -> CastleStatus {
        let mut status = self.castle_status;
        let piece = mov.piece();
        if piece.kind == PieceKind::King {
            status &= !CastleStatus::both(piece.color);
        }

        if piece.kind == PieceKind::Rook {
            status &= !CastleStatus::for_corner(mov.source());
        }

        status &= !CastleStatus::for_corner(mov.destination());
        status
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for rank in core::ranks().rev() {
            for file in core::files() {
                let sq = Square::of(rank, file);
                if let Some(piece) = self.piece_at(sq) {
                    write!(f, " {} ", piece)?;
                } else {
                    write!(f, " . ")?;
                }
            }

            writeln!(f, "| {}", rank)?;
        }

        for _ in core::files() {
            write!(f, "---")?;
        }

        writeln!(f)?;
        for file in core::files() {
            write!(f, " {} ", file)?;
        }

        writeln!(f)?;
        Ok(())
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::new()
    }
}

fn piece_index(piece: Piece) -> usize {
    let offset = match piece.color {
        Color::White => 0,
        Color::Black => 6,
    };
    offset + piece.kind as usize
}
