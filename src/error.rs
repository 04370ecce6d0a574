//! Errors surfaced by the game: rejected moves, history navigation, saved
//! games and engine failures.

use std::path::PathBuf;

use crate::chess::core::Move;
use crate::game::controller::State;
use crate::oracle::OracleError;

/// Everything that can go wrong while playing. Most variants are recovered
/// from by the controller (the move is ignored and a message is shown),
/// [`GameError::NoLegalMoves`] signals a broken invariant and is fatal.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// The move is not legal in the current position.
    #[error("illegal move {next_move} in position {position}")]
    IllegalMove {
        #[allow(missing_docs)]
        next_move: Move,
        /// FEN of the position the move was attempted in.
        position: String,
    },
    /// A pawn reaches the last rank but the promotion piece is missing.
    #[error("move {next_move} needs a promotion piece")]
    PromotionRequired {
        #[allow(missing_docs)]
        next_move: Move,
    },
    #[error("there are no moves to undo")]
    #[allow(missing_docs)]
    EmptyHistory,
    #[error("there are no moves to redo")]
    #[allow(missing_docs)]
    EmptyRedo,
    /// The bot was asked to move in a position without legal moves.
    #[error("no legal moves in position {position}")]
    NoLegalMoves {
        /// FEN of the terminal position.
        position: String,
    },
    /// The operation does not make sense in the current controller state.
    #[error("{action} is not available in state {state:?}")]
    InvalidState {
        #[allow(missing_docs)]
        action: &'static str,
        #[allow(missing_docs)]
        state: State,
    },
    /// Reading or writing the saved game failed.
    #[error("can not access saved game {}: {source}", path.display())]
    Persistence {
        #[allow(missing_docs)]
        path: PathBuf,
        #[allow(missing_docs)]
        source: std::io::Error,
    },
    /// The saved game does not contain a valid position.
    #[error("saved game {} is not a valid position: {reason}", path.display())]
    InvalidSave {
        #[allow(missing_docs)]
        path: PathBuf,
        #[allow(missing_docs)]
        reason: String,
    },
    #[error(transparent)]
    #[allow(missing_docs)]
    Oracle(#[from] OracleError),
}

impl GameError {
    /// Fatal errors end the program: they can only be caused by a bug.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::NoLegalMoves { .. })
    }
}
