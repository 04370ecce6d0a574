//! Playing a game against the bot: history, difficulty, saved games and the
//! turn state machine tying them together.

pub mod controller;
pub mod difficulty;
pub mod log;
pub mod persistence;
pub mod session;

pub use controller::{Controller, Input, Key, Outcome, Settings, State, View};
pub use difficulty::DifficultyLevel;
pub use session::GameSession;
