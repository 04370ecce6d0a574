//! The source of "best" moves for the bot: an external engine speaking the
//! [Universal Chess Interface] (UCI) or anything else implementing
//! [`MoveOracle`].
//!
//! [Universal Chess Interface]: https://backscattering.de/chess/uci/

pub mod process;
pub mod uci;

use std::time::Duration;

pub use process::{UciEngine, UciEngineConfig};

use crate::chess::core::Move;
use crate::chess::position::Position;

/// Failures of the move oracle. None of them are fatal: the caller may retry
/// or fall back to a random legal move.
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    /// The engine could not be started or has gone away.
    #[error("engine is unavailable: {0}")]
    Unavailable(String),
    /// The engine did not reply in time.
    #[error("engine did not answer within {0:?}")]
    Timeout(Duration),
    /// The engine replied with something that does not follow the protocol.
    #[error("unexpected engine reply: {0}")]
    Protocol(String),
    /// The suggested move is not legal in the queried position.
    #[error("engine suggested illegal move {0}")]
    IllegalMove(String),
}

/// Suggests moves for a given position within a time budget. Implementations
/// are stateful (they may own a process) and are used by a single game at a
/// time.
pub trait MoveOracle {
    /// Returns the best move the oracle finds in `budget`. The move is not
    /// guaranteed to be legal: callers validate it against
    /// [`Position::legal_moves`].
    ///
    /// # Errors
    ///
    /// Returns [`OracleError`] if no move could be obtained.
    fn best_move(&mut self, position: &Position, budget: Duration) -> Result<Move, OracleError>;

    /// Resets the oracle state between games.
    ///
    /// # Errors
    ///
    /// Returns [`OracleError`] if the oracle did not acknowledge the reset.
    fn new_game(&mut self) -> Result<(), OracleError> {
        Ok(())
    }

    /// Human-readable name for messages and logs.
    fn name(&self) -> &str;
}

impl<T: MoveOracle + ?Sized> MoveOracle for Box<T> {
    fn best_move(&mut self, position: &Position, budget: Duration) -> Result<Move, OracleError> {
        (**self).best_move(position, budget)
    }

    fn new_game(&mut self) -> Result<(), OracleError> {
        (**self).new_game()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Stands in when no engine is configured or it failed to start. Every query
/// fails with [`OracleError::Unavailable`] so the bot falls back to random
/// moves.
#[derive(Debug, Default)]
pub struct NoOracle;

impl MoveOracle for NoOracle {
    fn best_move(&mut self, _: &Position, _: Duration) -> Result<Move, OracleError> {
        Err(OracleError::Unavailable("no engine is configured".to_string()))
    }

    fn name(&self) -> &str {
        "engine"
    }
}
