//! Bot strength: a ladder of named levels, each mixing random legal moves
//! into the engine's play with a fixed probability.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use anyhow::bail;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::chess::core::Move;
use crate::chess::position::Position;
use crate::error::GameError;
use crate::oracle::{MoveOracle, OracleError};

/// Skill levels from the weakest to the strongest.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum DifficultyLevel {
    #[default]
    RandomNovice,
    UncertainBeginner,
    CasualPlayer,
    LearningStrategist,
    EmergingPlayer,
    IntermediateThinker,
    TacticalPonderer,
    StrategicPlayer,
    AdvancedPlanner,
    PerfectStrategist,
}

impl DifficultyLevel {
    /// The ladder in menu order.
    pub const ALL: [Self; 10] = [
        Self::RandomNovice,
        Self::UncertainBeginner,
        Self::CasualPlayer,
        Self::LearningStrategist,
        Self::EmergingPlayer,
        Self::IntermediateThinker,
        Self::TacticalPonderer,
        Self::StrategicPlayer,
        Self::AdvancedPlanner,
        Self::PerfectStrategist,
    ];

    /// Probability of playing a uniformly random legal move instead of
    /// consulting the oracle.
    #[must_use]
    pub const fn weight(self) -> f64 {
        match self {
            Self::RandomNovice => 1.0,
            Self::UncertainBeginner => 0.8,
            Self::CasualPlayer => 0.6,
            Self::LearningStrategist => 0.4,
            Self::EmergingPlayer => 0.3,
            Self::IntermediateThinker => 0.2,
            Self::TacticalPonderer => 0.1,
            Self::StrategicPlayer => 0.05,
            Self::AdvancedPlanner => 0.02,
            Self::PerfectStrategist => 0.0,
        }
    }

    /// Name shown in the menu.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::RandomNovice => "Random Novice",
            Self::UncertainBeginner => "Uncertain Beginner",
            Self::CasualPlayer => "Casual Player",
            Self::LearningStrategist => "Learning Strategist",
            Self::EmergingPlayer => "Emerging Player",
            Self::IntermediateThinker => "Intermediate Thinker",
            Self::TacticalPonderer => "Tactical Ponderer",
            Self::StrategicPlayer => "Strategic Player",
            Self::AdvancedPlanner => "Advanced Planner",
            Self::PerfectStrategist => "Perfect Strategist",
        }
    }

    /// Identifier used in configuration, e.g. `random_novice`.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::RandomNovice => "random_novice",
            Self::UncertainBeginner => "uncertain_beginner",
            Self::CasualPlayer => "casual_player",
            Self::LearningStrategist => "learning_strategist",
            Self::EmergingPlayer => "emerging_player",
            Self::IntermediateThinker => "intermediate_thinker",
            Self::TacticalPonderer => "tactical_ponderer",
            Self::StrategicPlayer => "strategic_player",
            Self::AdvancedPlanner => "advanced_planner",
            Self::PerfectStrategist => "perfect_strategist",
        }
    }

    /// Moves `delta` steps along the ladder, wrapping around at both ends.
    #[must_use]
    pub fn shift(self, delta: isize) -> Self {
        let len = Self::ALL.len() as isize;
        Self::ALL[(self as isize + delta).rem_euclid(len) as usize]
    }

    /// Draws the source of the next bot move.
    pub fn decide<R: Rng>(self, rng: &mut R) -> MoveSource {
        let roll: f64 = rng.gen_range(0.0..1.0);
        if roll < self.weight() {
            MoveSource::Random
        } else {
            MoveSource::Oracle
        }
    }
}

impl fmt::Display for DifficultyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DifficultyLevel {
    type Err = anyhow::Error;

    /// Accepts both display names and keys, ignoring case and treating
    /// spaces, dashes and underscores alike.
    fn from_str(input: &str) -> anyhow::Result<Self> {
        let key = input.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        match Self::ALL.into_iter().find(|level| level.key() == key) {
            Some(level) => Ok(level),
            None => bail!("unknown difficulty level '{input}'"),
        }
    }
}

/// Where the bot's move came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoveSource {
    /// Uniformly random legal move drawn by the difficulty level.
    Random,
    #[allow(missing_docs)]
    Oracle,
    /// Uniformly random legal move played because the oracle failed.
    Fallback,
}

/// A bot move together with the way it was picked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Choice {
    #[allow(missing_docs)]
    pub next_move: Move,
    #[allow(missing_docs)]
    pub source: MoveSource,
}

/// Picks a uniformly random move.
pub fn random_move<R: Rng>(moves: &[Move], rng: &mut R) -> Option<Move> {
    moves.choose(rng).copied()
}

/// Asks the oracle for a move and checks it against the position. A missing
/// promotion piece defaults to a queen.
///
/// # Errors
///
/// Oracle failures are passed through, a move that is not legal becomes
/// [`OracleError::IllegalMove`].
pub fn oracle_move<O: MoveOracle + ?Sized>(
    position: &Position,
    oracle: &mut O,
    budget: Duration,
) -> Result<Move, OracleError> {
    let suggested = oracle.best_move(position, budget)?;
    let next_move = suggested.with_default_promotion(position);
    if position.is_legal_move(&next_move) {
        Ok(next_move)
    } else {
        Err(OracleError::IllegalMove(suggested.to_string()))
    }
}

/// Picks the bot's move: a random legal move with the probability given by
/// `level`, the oracle's move otherwise.
///
/// # Errors
///
/// [`GameError::NoLegalMoves`] in terminal positions and
/// [`GameError::Oracle`] if the oracle was consulted and failed.
pub fn choose<R: Rng, O: MoveOracle + ?Sized>(
    position: &Position,
    level: DifficultyLevel,
    rng: &mut R,
    oracle: &mut O,
    budget: Duration,
) -> Result<Choice, GameError> {
    let moves = position.legal_moves();
    if moves.is_empty() {
        return Err(GameError::NoLegalMoves {
            position: position.to_string(),
        });
    }
    match level.decide(rng) {
        MoveSource::Oracle => Ok(Choice {
            next_move: oracle_move(position, oracle, budget)?,
            source: MoveSource::Oracle,
        }),
        source => match random_move(&moves, rng) {
            Some(next_move) => Ok(Choice { next_move, source }),
            None => Err(GameError::NoLegalMoves {
                position: position.to_string(),
            }),
        },
    }
}
