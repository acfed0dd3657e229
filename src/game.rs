// Copyright 2017-2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Game orchestration. A game owns the history of positions and moves and decides, after every move, whether the
//! side to move has been mated or stalemated.

use derive_more::Display;
use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    core::*,
    notation::{Language, NotatedMove},
    position::{IllegalMove, Position, ValidityError},
};

/// How a game ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    #[display(fmt = "Checkmate! {} won.", "winner.capitalized()")]
    Checkmate { winner: Color },
    #[display(fmt = "Stalemate!")]
    Stalemate,
}

impl Outcome {
    /// The outcome of `position` if the side to move has no legal moves.
    pub fn of(position: &Position) -> Option<Outcome> {
        if !position.legal_moves().is_empty() {
            return None;
        }

        let side = position.side_to_move();
        if position.is_check(side) {
            Some(Outcome::Checkmate {
                winner: side.toggle(),
            })
        } else {
            Some(Outcome::Stalemate)
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GameError {
    #[error(transparent)]
    IllegalMove(#[from] IllegalMove),
    #[error(transparent)]
    InvalidPosition(#[from] ValidityError),
    #[error("the game is over: {0}")]
    GameOver(Outcome),
}

/// A serializable summary of a game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GameRecord<'a> {
    pub language: Language,
    pub moves: &'a [NotatedMove],
    pub outcome: Option<Outcome>,
    pub result: Option<String>,
}

#[derive(Clone, Debug)]
pub struct Game {
    language: Language,
    positions: Vec<Position>,
    moves: Vec<NotatedMove>,
    outcome: Option<Outcome>,
}

impl Game {
    /// A game from the standard starting position.
    pub fn new(language: Language) -> Game {
        Game {
            language,
            positions: vec![Position::starting()],
            moves: Vec::new(),
            outcome: None,
        }
    }

    /// A game from an arbitrary position, which must pass validation.
    pub fn from_position(position: Position, language: Language) -> Result<Game, GameError> {
        position.assert_valid()?;
        let outcome = Outcome::of(&position);
        Ok(Game {
            language,
            positions: vec![position],
            moves: Vec::new(),
            outcome,
        })
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    pub fn current_position(&self) -> &Position {
        self.positions
            .last()
            .unwrap_or_else(|| unreachable!("a game always holds its starting position"))
    }

    /// Every position of the game, starting position first.
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn moves(&self) -> &[NotatedMove] {
        &self.moves
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// The result message, if the game is over.
    pub fn result(&self) -> Option<String> {
        self.outcome.map(|outcome| outcome.to_string())
    }

    pub fn record(&self) -> GameRecord<'_> {
        GameRecord {
            language: self.language,
            moves: &self.moves,
            outcome: self.outcome,
            result: self.result(),
        }
    }

    /// Plays a move generated for the current position.
    pub fn apply_move(&mut self, mov: Move) -> Result<&NotatedMove, GameError> {
        self.ensure_running()?;
        let result = self.current_position().make_move(mov, self.language);
        self.advance(result)
    }

    /// Plays the move named by `notation` in the game's language.
    pub fn apply_notation(&mut self, notation: &str) -> Result<&NotatedMove, GameError> {
        self.ensure_running()?;
        let result = self.current_position().play(notation, self.language);
        self.advance(result)
    }

    /// Plays the move of the piece on `source` to `destination`. When that is a promotion, `promotion` must name
    /// the piece to promote to.
    pub fn apply_choice(
        &mut self,
        source: Square,
        destination: Square,
        promotion: Option<PieceKind>,
    ) -> Result<&NotatedMove, GameError> {
        self.ensure_running()?;
        let candidates = self
            .current_position()
            .legal_moves()
            .between(source, destination);
        let mov = match (candidates.as_slice(), promotion) {
            ([], _) => Err(IllegalMove::NoSuchMove {
                origin: source,
                destination,
            }),
            ([mov], None) if !mov.is_promotion() => Ok(*mov),
            (_, None) => Err(IllegalMove::PromotionRequired {
                origin: source,
                destination,
            }),
            (moves, Some(kind)) => moves
                .iter()
                .find(|mov| mov.promotion_piece() == Some(kind))
                .copied()
                .ok_or(IllegalMove::NoSuchMove {
                    origin: source,
                    destination,
                }),
        };

        let result = mov.and_then(|mov| self.current_position().make_move(mov, self.language));
        self.advance(result)
    }

    fn ensure_running(&self) -> Result<(), GameError> {
        match self.outcome {
            Some(outcome) => Err(GameError::GameOver(outcome)),
            None => Ok(()),
        }
    }

    fn advance(
        &mut self,
        result: Result<(Position, NotatedMove), IllegalMove>,
    ) -> Result<&NotatedMove, GameError> {
        let (position, mut notated) = match result {
            Ok(next) => next,
            Err(err) => {
                tracing::debug!(%err, "rejected move");
                return Err(err.into());
            }
        };

        self.outcome = Outcome::of(&position);
        if let Some(outcome) = self.outcome {
            if let Outcome::Checkmate { .. } = outcome {
                notated.mark_checkmate();
            }

            tracing::info!(%outcome, plies = self.moves.len() + 1, "game over");
        }

        self.positions.push(position);
        self.moves.push(notated);
        Ok(&self.moves[self.moves.len() - 1])
    }

    /// Plays uniformly random legal moves until the game ends or `max_plies` moves have been played.
    pub fn play_random<R: Rng + ?Sized>(&mut self, rng: &mut R, max_plies: usize) -> Result<(), GameError> {
        for _ in 0..max_plies {
            if self.outcome.is_some() {
                break;
            }

            let moves: Vec<Move> = self.current_position().legal_moves().iter().copied().collect();
            match moves.choose(rng) {
                Some(&mov) => {
                    self.apply_move(mov)?;
                }
                None => break,
            }
        }

        Ok(())
    }
}

impl Default for Game {
    fn default() -> Self {
        Game::new(Language::default())
    }
}
