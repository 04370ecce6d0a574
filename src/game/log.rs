//! Undo and redo history of a single game.

use crate::chess::position::Position;
use crate::chess::record::MoveRecord;
use crate::error::GameError;

/// Two stacks of [`MoveRecord`]s: moves that have been played (most recent
/// last) and moves that were taken back and can be played again.
///
/// The log does not own the position: undo and redo take the current
/// position and return the one on the other side of the move.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GameLog {
    history: Vec<MoveRecord>,
    redo: Vec<MoveRecord>,
}

impl GameLog {
    #[must_use]
    #[allow(missing_docs)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a freshly played move. Any moves that could be redone are
    /// discarded because the game has diverged.
    pub fn record(&mut self, record: MoveRecord) {
        self.history.push(record);
        self.redo.clear();
    }

    /// Takes back the last played move.
    ///
    /// # Errors
    ///
    /// [`GameError::EmptyHistory`] if no moves were played.
    pub fn undo(&mut self, position: &Position) -> Result<(Position, MoveRecord), GameError> {
        let record = self.history.pop().ok_or(GameError::EmptyHistory)?;
        self.redo.push(record);
        Ok((position.reverse(&record), record))
    }

    /// Plays the last taken back move again.
    ///
    /// # Errors
    ///
    /// [`GameError::EmptyRedo`] if nothing was taken back since the last
    /// played move.
    pub fn redo(&mut self, position: &Position) -> Result<(Position, MoveRecord), GameError> {
        let record = self.redo.pop().ok_or(GameError::EmptyRedo)?;
        self.history.push(record);
        Ok((position.replay(&record), record))
    }

    /// Played moves, oldest first.
    #[must_use]
    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    /// Moves that can be redone, the next one last.
    #[must_use]
    pub fn redo_stack(&self) -> &[MoveRecord] {
        &self.redo
    }

    /// The most recently played move.
    #[must_use]
    pub fn last(&self) -> Option<&MoveRecord> {
        self.history.last()
    }

    /// Number of played moves.
    #[must_use]
    pub fn len(&self) -> usize {
        self.history.len()
    }

    #[must_use]
    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Forgets both played and taken back moves.
    pub fn clear(&mut self) {
        self.history.clear();
        self.redo.clear();
    }

    #[must_use]
    #[allow(missing_docs)]
    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    #[must_use]
    #[allow(missing_docs)]
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }
}
