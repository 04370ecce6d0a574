//! A single game in progress.

use tracing::debug;

use crate::chess::core::{Move, Player};
use crate::chess::position::{GameResult, Position};
use crate::chess::record::MoveRecord;
use crate::error::GameError;
use crate::game::difficulty::DifficultyLevel;
use crate::game::log::GameLog;

/// Owns the current position and its move log. Every change to the position
/// goes through the session so that the log always describes how the
/// position was reached.
#[derive(Clone, Debug)]
pub struct GameSession {
    position: Position,
    log: GameLog,
    human: Player,
    difficulty: DifficultyLevel,
}

impl GameSession {
    /// Starts a new game from the starting position.
    #[must_use]
    pub fn new(difficulty: DifficultyLevel, human: Player) -> Self {
        Self {
            position: Position::starting(),
            log: GameLog::new(),
            human,
            difficulty,
        }
    }

    /// Continues a game from a saved position. The history of the saved game
    /// is unknown, so nothing can be undone until new moves are made. The
    /// human plays the side to move.
    #[must_use]
    pub fn resume(position: Position, difficulty: DifficultyLevel) -> Self {
        Self {
            human: position.side_to_move(),
            position,
            log: GameLog::new(),
            difficulty,
        }
    }

    #[must_use]
    #[allow(missing_docs)]
    pub const fn position(&self) -> &Position {
        &self.position
    }

    #[must_use]
    #[allow(missing_docs)]
    pub const fn log(&self) -> &GameLog {
        &self.log
    }

    /// The color controlled by the human.
    #[must_use]
    pub const fn human(&self) -> Player {
        self.human
    }

    /// The color controlled by the bot.
    #[must_use]
    pub const fn bot(&self) -> Player {
        self.human.opponent()
    }

    #[must_use]
    #[allow(missing_docs)]
    pub const fn difficulty(&self) -> DifficultyLevel {
        self.difficulty
    }

    /// The side to move.
    #[must_use]
    pub const fn turn(&self) -> Player {
        self.position.side_to_move()
    }

    #[must_use]
    #[allow(missing_docs)]
    pub fn is_human_turn(&self) -> bool {
        self.turn() == self.human
    }

    #[must_use]
    #[allow(missing_docs)]
    pub fn is_over(&self) -> bool {
        self.position.is_terminal()
    }

    #[must_use]
    #[allow(missing_docs)]
    pub fn result(&self) -> GameResult {
        self.position.result()
    }

    /// Plays `next_move` and records it. Either both happen or neither does.
    ///
    /// # Errors
    ///
    /// See [`Position::play`].
    pub fn play(&mut self, next_move: &Move) -> Result<MoveRecord, GameError> {
        let (position, record) = self.position.play(next_move)?;
        debug!(%next_move, fen = %position, "move played");
        self.position = position;
        self.log.record(record);
        Ok(record)
    }

    /// Takes back the last move.
    ///
    /// # Errors
    ///
    /// [`GameError::EmptyHistory`] if there is nothing to take back.
    pub fn undo(&mut self) -> Result<MoveRecord, GameError> {
        let (position, record) = self.log.undo(&self.position)?;
        debug!(next_move = %record.next_move(), fen = %position, "move taken back");
        self.position = position;
        Ok(record)
    }

    /// Plays the last taken back move again.
    ///
    /// # Errors
    ///
    /// [`GameError::EmptyRedo`] if there is nothing to redo.
    pub fn redo(&mut self) -> Result<MoveRecord, GameError> {
        let (position, record) = self.log.redo(&self.position)?;
        debug!(next_move = %record.next_move(), fen = %position, "move replayed");
        self.position = position;
        Ok(record)
    }
}
