// Copyright 2017-2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Algebraic notation, rendered and parsed in several languages.

use std::{
    fmt::{self, Write},
    str::FromStr,
};

use derive_more::Display;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    core::*,
    position::{IllegalMove, Position},
};

/// The languages notation can be written in. They differ only in the letters naming the pieces.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English,
    French,
}

impl Language {
    /// The letter naming a piece kind. Pawns are never named.
    pub fn letter(self, kind: PieceKind) -> &'static str {
        match (self, kind) {
            (_, PieceKind::Pawn) => "",
            (Language::English, PieceKind::Knight) => "N",
            (Language::English, PieceKind::Bishop) => "B",
            (Language::English, PieceKind::Rook) => "R",
            (Language::English, PieceKind::Queen) => "Q",
            (Language::English, PieceKind::King) => "K",
            (Language::French, PieceKind::Knight) => "C",
            (Language::French, PieceKind::Bishop) => "F",
            (Language::French, PieceKind::Rook) => "T",
            (Language::French, PieceKind::Queen) => "D",
            (Language::French, PieceKind::King) => "R",
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::English
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown notation language: {0}")]
pub struct LanguageParseError(pub String);

impl FromStr for Language {
    type Err = LanguageParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "english" | "en" => Ok(Language::English),
            "french" | "fr" => Ok(Language::French),
            _ => Err(LanguageParseError(s.to_string())),
        }
    }
}

/// A move together with its notation and whether it checks or mates the opponent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NotatedMove {
    #[serde(skip)]
    mov: Move,
    uci: String,
    notation: String,
    check: bool,
    checkmate: bool,
}

impl NotatedMove {
    pub(crate) fn new(mov: Move, notation: String, check: bool) -> NotatedMove {
        NotatedMove {
            mov,
            uci: mov.as_uci(),
            notation,
            check,
            checkmate: false,
        }
    }

    /// Mate is only known once the opponent's legal moves have been computed, so it is marked after the fact.
    pub(crate) fn mark_checkmate(&mut self) {
        self.checkmate = true;
    }

    pub fn mov(&self) -> Move {
        self.mov
    }

    /// Notation without the check or mate suffix.
    pub fn base_notation(&self) -> &str {
        &self.notation
    }

    pub fn is_check(&self) -> bool {
        self.check
    }

    pub fn is_checkmate(&self) -> bool {
        self.checkmate
    }

    pub fn full_notation(&self) -> String {
        let suffix = if self.checkmate {
            "#"
        } else if self.check {
            "+"
        } else {
            ""
        };

        format!("{}{}", self.notation, suffix)
    }
}

impl fmt::Display for NotatedMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full_notation())
    }
}

impl Position {
    /// The base notation of `mov` in this position, without any check or mate suffix.
    pub fn notation(&self, mov: Move, language: Language) -> String {
        if mov.is_kingside_castle() {
            return "0-0".to_string();
        }

        if mov.is_queenside_castle() {
            return "0-0-0".to_string();
        }

        let piece = mov.piece();
        let capture = mov.is_en_passant() || self.piece_at(mov.destination()).is_some();
        let mut buf = String::new();
        buf.push_str(language.letter(piece.kind));
        if piece.kind != PieceKind::Pawn {
            buf.push_str(&self.disambiguation(mov));
        }

        if capture {
            if piece.kind == PieceKind::Pawn {
                let _ = write!(&mut buf, "{}", mov.source().file());
            }

            buf.push('x');
        }

        let _ = write!(&mut buf, "{}", mov.destination());
        if let Some(kind) = mov.promotion_piece() {
            buf.push('=');
            buf.push_str(language.letter(kind));
        }

        buf
    }

    /// What distinguishes `mov` from other legal moves by pieces of the same kind to the same square: the origin
    /// file if no rival shares it, else the origin rank if no rival shares that, else the full origin square.
    fn disambiguation(&self, mov: Move) -> String {
        let rivals: Vec<Square> = self
            .legal_moves()
            .iter()
            .filter(|other| {
                other.piece() == mov.piece()
                    && other.destination() == mov.destination()
                    && other.source() != mov.source()
            })
            .map(|other| other.source())
            .collect();
        if rivals.is_empty() {
            return String::new();
        }

        let source = mov.source();
        if rivals.iter().all(|sq| sq.file() != source.file()) {
            source.file().to_string()
        } else if rivals.iter().all(|sq| sq.rank() != source.rank()) {
            source.rank().to_string()
        } else {
            source.to_string()
        }
    }

    /// Finds the legal move whose base notation is `notation`, ignoring any trailing check or mate marks.
    pub fn resolve(&self, notation: &str, language: Language) -> Result<Move, IllegalMove> {
        let wanted = notation.trim().trim_end_matches(&['+', '#'][..]);
        self.legal_moves()
            .iter()
            .find(|&&mov| self.notation(mov, language) == wanted)
            .copied()
            .ok_or_else(|| IllegalMove::UnknownNotation {
                notation: notation.to_string(),
                language,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::{Language, LanguageParseError};
    use crate::core::*;
    use crate::position::{IllegalMove, Position};

    fn position(side: Color, placements: &[(&str, &str, &str)]) -> Position {
        Position::from_placements(side, placements).unwrap()
    }

    fn notation_of(pos: &Position, source: Square, destination: Square, language: Language) -> String {
        let moves = pos.legal_moves().between(source, destination);
        assert_eq!(1, moves.len(), "expected exactly one move {}{}", source, destination);
        pos.notation(moves[0], language)
    }

    #[test]
    fn language_names() {
        assert_eq!(Ok(Language::English), "english".parse());
        assert_eq!(Ok(Language::French), "FR".parse());
        assert_eq!(
            Err(LanguageParseError("klingon".to_string())),
            "klingon".parse::<Language>()
        );
        assert_eq!("French", Language::French.to_string());
    }

    #[test]
    fn piece_letters() {
        let pos = Position::starting();
        assert_eq!("Nf3", notation_of(&pos, G1, F3, Language::English));
        assert_eq!("Cf3", notation_of(&pos, G1, F3, Language::French));
        assert_eq!("e4", notation_of(&pos, E2, E4, Language::French));
    }

    #[test]
    fn french_king_is_r() {
        let pos = position(
            Color::White,
            &[
                ("white", "King", "e1"),
                ("white", "Rook", "a2"),
                ("black", "King", "h8"),
            ],
        );
        assert_eq!("Re2", notation_of(&pos, E1, E2, Language::French));
        assert_eq!("Ta7", notation_of(&pos, A2, A7, Language::French));
        assert_eq!("Kd1", notation_of(&pos, E1, D1, Language::English));
    }

    #[test]
    fn captures() {
        let pos = position(
            Color::White,
            &[
                ("white", "King", "e1"),
                ("white", "Pawn", "e4"),
                ("white", "Knight", "c3"),
                ("black", "Pawn", "d5"),
                ("black", "King", "h8"),
            ],
        );
        assert_eq!("exd5", notation_of(&pos, E4, D5, Language::English));
        assert_eq!("Nxd5", notation_of(&pos, C3, D5, Language::English));
    }

    #[test]
    fn disambiguate_by_file() {
        let pos = position(
            Color::White,
            &[
                ("white", "King", "e1"),
                ("white", "Knight", "b1"),
                ("white", "Knight", "f1"),
                ("black", "King", "h8"),
            ],
        );
        assert_eq!("Nbd2", notation_of(&pos, B1, D2, Language::English));
        assert_eq!("Nfd2", notation_of(&pos, F1, D2, Language::English));
        assert_eq!("Na3", notation_of(&pos, B1, A3, Language::English));
    }

    #[test]
    fn disambiguate_by_rank() {
        let pos = position(
            Color::White,
            &[
                ("white", "King", "e1"),
                ("white", "Rook", "a1"),
                ("white", "Rook", "a5"),
                ("black", "King", "h8"),
            ],
        );
        assert_eq!("R1a3", notation_of(&pos, A1, A3, Language::English));
        assert_eq!("R5a3", notation_of(&pos, A5, A3, Language::English));
    }

    #[test]
    fn disambiguate_by_square() {
        let pos = position(
            Color::White,
            &[
                ("white", "King", "a1"),
                ("white", "Queen", "h4"),
                ("white", "Queen", "h1"),
                ("white", "Queen", "e4"),
                ("black", "King", "c8"),
            ],
        );
        assert_eq!("Qh4e1", notation_of(&pos, H4, E1, Language::English));
        assert_eq!("Qee1", notation_of(&pos, E4, E1, Language::English));
        assert_eq!("Q1e1", notation_of(&pos, H1, E1, Language::English));
    }

    #[test]
    fn promotion_and_castles() {
        let pos = position(
            Color::White,
            &[
                ("white", "King", "e1"),
                ("white", "Rook", "h1"),
                ("white", "Rook", "a1"),
                ("white", "Pawn", "b7"),
                ("black", "Knight", "c8"),
                ("black", "King", "h8"),
            ],
        );
        let promotions = pos.legal_moves().between(B7, C8);
        let rendered: Vec<_> = promotions
            .iter()
            .map(|&m| pos.notation(m, Language::French))
            .collect();
        assert!(rendered.contains(&"bxc8=D".to_string()));
        assert!(rendered.contains(&"bxc8=C".to_string()));
        assert_eq!("0-0", notation_of(&pos, E1, G1, Language::English));
        assert_eq!("0-0-0", notation_of(&pos, E1, C1, Language::French));
    }

    #[test]
    fn resolve_strips_suffixes() {
        let pos = Position::starting();
        let mov = pos.resolve("Nf3+", Language::English).unwrap();
        assert_eq!(G1, mov.source());
        assert_eq!(F3, mov.destination());
        assert_eq!(mov, pos.resolve("Cf3#", Language::French).unwrap());
    }

    #[test]
    fn resolve_unknown() {
        let pos = Position::starting();
        assert_eq!(
            Err(IllegalMove::UnknownNotation {
                notation: "Nf3".to_string(),
                language: Language::French,
            }),
            pos.resolve("Nf3", Language::French)
        );
        assert!(pos.resolve("e5", Language::English).is_err());
    }

    #[test]
    fn every_move_round_trips() {
        let pos = position(
            Color::White,
            &[
                ("white", "King", "e1"),
                ("white", "Rook", "h1"),
                ("white", "Rook", "a1"),
                ("white", "Knight", "c3"),
                ("white", "Knight", "g5"),
                ("white", "Queen", "e4"),
                ("white", "Pawn", "b7"),
                ("black", "Rook", "a8"),
                ("black", "Pawn", "f7"),
                ("black", "King", "h8"),
            ],
        );
        for language in [Language::English, Language::French] {
            for &mov in pos.legal_moves().iter() {
                let notation = pos.notation(mov, language);
                assert_eq!(Ok(mov), pos.resolve(&notation, language), "{}", notation);
            }
        }
    }
}
