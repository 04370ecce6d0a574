//! Turn state machine driving a game between the human and the bot.
//!
//! The controller is fed discrete [`Input`] events by the front-end and
//! [`Controller::tick`]ed once per frame, which is when the bot gets to move.
//! Everything the front-end needs to draw is available through
//! [`Controller::view`].
//!
//! ```text
//! Menu --start--> PlayerToMove --submit--> BotToMove --tick--> PlayerToMove
//!   |                  |  \________________________/ \              |
//!   +--load--> PlayerToMove|GameOver        (terminal position) --> GameOver
//! ```
//!
//! Undo and redo are allowed in every state except the menu and pick the
//! state matching the restored position. A bot turn reached through undo or
//! redo is held until [`Controller::resume`] so that the bot does not replay
//! the move that was just taken back.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use rand::Rng;
use tracing::{debug, info, warn};

use crate::chess::core::{Move, Player, Promotion, Square};
use crate::chess::position::{GameResult, Position};
use crate::chess::record::MoveRecord;
use crate::error::GameError;
use crate::game::difficulty::{self, Choice, DifficultyLevel, MoveSource};
use crate::game::persistence;
use crate::game::session::GameSession;
use crate::oracle::{MoveOracle, OracleError};

/// Knobs of the controller. By default the human plays White, the engine
/// thinks for a second, messages stay on screen for two seconds and a failed
/// engine query is retried once.
#[derive(Clone, Debug)]
pub struct Settings {
    /// The color the human plays in new games.
    pub human: Player,
    /// Time budget of a single oracle query.
    pub move_time: Duration,
    /// How long a message stays visible.
    pub message_duration: Duration,
    /// Where the game is saved.
    pub save_path: PathBuf,
    /// How many times a failed oracle query is repeated before the bot falls
    /// back to a random move.
    pub oracle_retries: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            human: Player::White,
            move_time: Duration::from_secs(1),
            message_duration: Duration::from_secs(2),
            save_path: PathBuf::from("saved_game.fen"),
            oracle_retries: 1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum State {
    Menu,
    PlayerToMove,
    BotToMove,
    GameOver,
}

/// Keyboard shortcuts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Back to the menu, or quit when already there.
    Escape,
    #[allow(missing_docs)]
    Save,
    #[allow(missing_docs)]
    Undo,
    #[allow(missing_docs)]
    Redo,
}

/// Events delivered by the front-end.
#[derive(Clone, Debug, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum Input {
    SquareClicked(Square),
    /// Answer to [`Outcome::PromotionRequired`].
    Promote(Promotion),
    Key(Key),
    /// Moves the menu selection along the difficulty ladder.
    SelectDifficulty(isize),
    Start,
    Load(PathBuf),
    /// Plays a complete move without going through square selection.
    Submit(Move),
    /// Lets a held bot turn proceed.
    Resume,
    Quit,
}

/// What an input did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum Outcome {
    /// The input had no effect in the current state.
    Ignored,
    Selected(Square),
    Deselected,
    /// The selected pawn reaches the last rank: the front-end has to ask for
    /// the promotion piece and send [`Input::Promote`].
    PromotionRequired {
        from: Square,
        to: Square,
    },
    Played(MoveRecord),
    Undone(MoveRecord),
    Redone(MoveRecord),
    DifficultyChanged(DifficultyLevel),
    Started,
    Loaded,
    Saved,
    Resumed,
    Menu,
    Quit,
}

/// Banner text that disappears after a while.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    #[allow(missing_docs)]
    pub text: String,
    #[allow(missing_docs)]
    pub expires_at: Instant,
}

/// Snapshot of everything the front-end draws.
#[derive(Debug)]
pub struct View<'a> {
    #[allow(missing_docs)]
    pub state: State,
    /// Selected level in the menu, level of the current game otherwise.
    pub difficulty: DifficultyLevel,
    /// Current position, [`None`] in the menu.
    pub position: Option<&'a Position>,
    #[allow(missing_docs)]
    pub human: Option<Player>,
    #[allow(missing_docs)]
    pub selected: Option<Square>,
    /// Legal destinations of the selected piece.
    pub destinations: Vec<Square>,
    /// King of the side to move when it is in check.
    pub checked_king: Option<Square>,
    #[allow(missing_docs)]
    pub pending_promotion: Option<(Square, Square)>,
    /// The bot is to move but waits for [`Input::Resume`].
    pub bot_held: bool,
    /// Message that has not expired yet.
    pub message: Option<&'a Message>,
    /// Set once the game is over.
    pub result: Option<GameResult>,
    #[allow(missing_docs)]
    pub can_undo: bool,
    #[allow(missing_docs)]
    pub can_redo: bool,
}

/// Owns the game session, the oracle and the random source the bot uses.
#[derive(Debug)]
pub struct Controller<O, R> {
    oracle: O,
    rng: R,
    settings: Settings,
    state: State,
    difficulty: DifficultyLevel,
    session: Option<GameSession>,
    selected: Option<Square>,
    pending_promotion: Option<(Square, Square)>,
    bot_held: bool,
    message: Option<Message>,
}

impl<O: MoveOracle, R: Rng> Controller<O, R> {
    /// Creates a controller in the menu.
    pub fn new(oracle: O, rng: R, settings: Settings) -> Self {
        Self {
            oracle,
            rng,
            settings,
            state: State::Menu,
            difficulty: DifficultyLevel::default(),
            session: None,
            selected: None,
            pending_promotion: None,
            bot_held: false,
            message: None,
        }
    }

    /// Preselects the difficulty level in the menu.
    #[must_use]
    pub fn with_difficulty(mut self, difficulty: DifficultyLevel) -> Self {
        self.difficulty = difficulty;
        self
    }

    #[must_use]
    #[allow(missing_docs)]
    pub const fn state(&self) -> State {
        self.state
    }

    /// The game in progress, [`None`] in the menu.
    #[must_use]
    pub const fn session(&self) -> Option<&GameSession> {
        self.session.as_ref()
    }

    #[must_use]
    #[allow(missing_docs)]
    pub const fn difficulty(&self) -> DifficultyLevel {
        self.difficulty
    }

    #[must_use]
    #[allow(missing_docs)]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    #[allow(missing_docs)]
    pub const fn oracle(&self) -> &O {
        &self.oracle
    }

    /// The latest message, expired or not.
    #[must_use]
    pub const fn message(&self) -> Option<&Message> {
        self.message.as_ref()
    }

    /// Dispatches a front-end event. Recoverable errors are reported through
    /// a message and the input is ignored.
    ///
    /// # Errors
    ///
    /// Only fatal errors (see [`GameError::is_fatal`]) are returned.
    pub fn handle(&mut self, input: Input) -> Result<Outcome, GameError> {
        debug!(?input, state = ?self.state, "input");
        let outcome = match input {
            Input::SquareClicked(square) => self.square_clicked(square),
            Input::Promote(promotion) => self.choose_promotion(promotion),
            Input::Key(Key::Escape) if self.state == State::Menu => Ok(Outcome::Quit),
            Input::Key(Key::Escape) => Ok(self.return_to_menu()),
            Input::Key(Key::Save) => self.save(),
            Input::Key(Key::Undo) => self.undo(),
            Input::Key(Key::Redo) => self.redo(),
            Input::SelectDifficulty(delta) => self.select_difficulty(delta),
            Input::Start => self.start(),
            Input::Load(path) => self.load(&path),
            Input::Submit(next_move) => self.submit(next_move),
            Input::Resume => Ok(self.resume()),
            Input::Quit => Ok(Outcome::Quit),
        };
        match outcome {
            Err(e) if !e.is_fatal() => {
                debug!(error = %e, "input rejected");
                self.notify(e.to_string());
                Ok(Outcome::Ignored)
            },
            outcome => outcome,
        }
    }

    /// Cycles the difficulty ladder in the menu.
    ///
    /// # Errors
    ///
    /// [`GameError::InvalidState`] outside of the menu.
    pub fn select_difficulty(&mut self, delta: isize) -> Result<Outcome, GameError> {
        self.require(State::Menu, "selecting difficulty")?;
        self.difficulty = self.difficulty.shift(delta);
        Ok(Outcome::DifficultyChanged(self.difficulty))
    }

    /// Starts a new game at the selected difficulty.
    ///
    /// # Errors
    ///
    /// [`GameError::InvalidState`] outside of the menu.
    pub fn start(&mut self) -> Result<Outcome, GameError> {
        self.require(State::Menu, "starting a game")?;
        self.begin(GameSession::new(self.difficulty, self.settings.human));
        info!(difficulty = %self.difficulty, human = ?self.settings.human, "new game");
        Ok(Outcome::Started)
    }

    /// Continues the game saved in `path`. The human plays the side to move.
    ///
    /// # Errors
    ///
    /// [`GameError::InvalidState`] outside of the menu, persistence errors if
    /// the save can not be read. The controller stays in the menu on error.
    pub fn load(&mut self, path: &Path) -> Result<Outcome, GameError> {
        self.require(State::Menu, "loading a game")?;
        let position = persistence::load(path)?;
        self.begin(GameSession::resume(position, self.difficulty));
        self.notify(format!("Loaded {}", path.display()));
        Ok(Outcome::Loaded)
    }

    fn begin(&mut self, session: GameSession) {
        if let Err(e) = self.oracle.new_game() {
            warn!(error = %e, oracle = self.oracle.name(), "oracle did not start a new game");
        }
        self.session = Some(session);
        self.clear_selection();
        self.bot_held = false;
        self.sync_state();
    }

    /// Writes the current position to the configured save file.
    ///
    /// # Errors
    ///
    /// [`GameError::InvalidState`] in the menu, [`GameError::Persistence`] if
    /// the file can not be written.
    pub fn save(&mut self) -> Result<Outcome, GameError> {
        let position = self.active_session("saving")?.position();
        persistence::save(&self.settings.save_path, position)?;
        self.notify(format!("Game saved to {}", self.settings.save_path.display()));
        Ok(Outcome::Saved)
    }

    /// Selects the human's piece on `square`, or tries to move the selected
    /// piece there. Clicking the selected square again deselects it, a click
    /// while a promotion choice is pending cancels the move.
    ///
    /// # Errors
    ///
    /// [`GameError::IllegalMove`] if the attempted move is not legal (the
    /// selection is cleared).
    pub fn square_clicked(&mut self, square: Square) -> Result<Outcome, GameError> {
        if self.state != State::PlayerToMove {
            return Ok(Outcome::Ignored);
        }
        if self.pending_promotion.is_some() {
            self.clear_selection();
            return Ok(Outcome::Deselected);
        }
        let Some(session) = &self.session else {
            return Ok(Outcome::Ignored);
        };
        let position = session.position();
        match self.selected {
            None if position.at(square).is_some_and(|p| p.owner == session.human()) => {
                self.selected = Some(square);
                Ok(Outcome::Selected(square))
            },
            None => Ok(Outcome::Ignored),
            Some(from) if from == square => {
                self.selected = None;
                Ok(Outcome::Deselected)
            },
            Some(from) => {
                let attempt = Move::new(from, square, None);
                if attempt.needs_promotion(position)
                    && position.legal_destinations(from).contains(&square)
                {
                    self.pending_promotion = Some((from, square));
                    return Ok(Outcome::PromotionRequired { from, to: square });
                }
                self.submit(attempt)
            },
        }
    }

    /// Completes the pending promotion.
    ///
    /// # Errors
    ///
    /// See [`Controller::submit`].
    pub fn choose_promotion(&mut self, promotion: Promotion) -> Result<Outcome, GameError> {
        match self.pending_promotion {
            Some((from, to)) => self.submit(Move::new(from, to, Some(promotion))),
            None => Ok(Outcome::Ignored),
        }
    }

    /// Plays the human's move.
    ///
    /// # Errors
    ///
    /// [`GameError::InvalidState`] when it is not the human's turn,
    /// [`GameError::IllegalMove`] or [`GameError::PromotionRequired`] if the
    /// move can not be played as is.
    pub fn submit(&mut self, next_move: Move) -> Result<Outcome, GameError> {
        self.require(State::PlayerToMove, "playing a move")?;
        self.clear_selection();
        let record = self.session_mut("playing a move")?.play(&next_move)?;
        info!(%next_move, "human moved");
        self.bot_held = false;
        self.sync_state();
        Ok(Outcome::Played(record))
    }

    /// Lets the bot move if it is its turn. Returns the bot's move.
    ///
    /// # Errors
    ///
    /// [`GameError::NoLegalMoves`] if the bot is asked to move in a terminal
    /// position. Oracle failures are handled by retrying and falling back to
    /// a random move.
    pub fn tick(&mut self) -> Result<Option<MoveRecord>, GameError> {
        if self.state != State::BotToMove || self.bot_held {
            return Ok(None);
        }
        let Some(session) = &self.session else {
            return Ok(None);
        };
        let position = session.position().clone();
        let level = session.difficulty();
        let budget = self.settings.move_time;
        let choice = match difficulty::choose(&position, level, &mut self.rng, &mut self.oracle, budget)
        {
            Err(GameError::Oracle(e)) => self.recover(&position, e)?,
            choice => choice?,
        };
        let record = self.session_mut("bot move")?.play(&choice.next_move)?;
        info!(next_move = %choice.next_move, source = ?choice.source, "bot moved");
        self.sync_state();
        Ok(Some(record))
    }

    /// Repeats the failed oracle query, then settles for a random move.
    fn recover(&mut self, position: &Position, error: OracleError) -> Result<Choice, GameError> {
        let mut error = error;
        for attempt in 1..=self.settings.oracle_retries {
            warn!(%error, attempt, "oracle failed, retrying");
            match difficulty::oracle_move(position, &mut self.oracle, self.settings.move_time) {
                Ok(next_move) => {
                    return Ok(Choice {
                        next_move,
                        source: MoveSource::Oracle,
                    })
                },
                Err(e) => error = e,
            }
        }
        warn!(%error, "oracle failed, playing a random move");
        self.notify(format!("{} failed ({error}), playing a random move", self.oracle.name()));
        let moves = position.legal_moves();
        match difficulty::random_move(&moves, &mut self.rng) {
            Some(next_move) => Ok(Choice {
                next_move,
                source: MoveSource::Fallback,
            }),
            None => Err(GameError::NoLegalMoves {
                position: position.to_string(),
            }),
        }
    }

    /// Takes back the last move, whoever made it.
    ///
    /// # Errors
    ///
    /// [`GameError::InvalidState`] in the menu, [`GameError::EmptyHistory`]
    /// if there is nothing to take back.
    pub fn undo(&mut self) -> Result<Outcome, GameError> {
        let record = self.session_mut("undo")?.undo()?;
        self.after_history_change();
        Ok(Outcome::Undone(record))
    }

    /// Plays the last taken back move again.
    ///
    /// # Errors
    ///
    /// [`GameError::InvalidState`] in the menu, [`GameError::EmptyRedo`] if
    /// there is nothing to redo.
    pub fn redo(&mut self) -> Result<Outcome, GameError> {
        let record = self.session_mut("redo")?.redo()?;
        self.after_history_change();
        Ok(Outcome::Redone(record))
    }

    fn after_history_change(&mut self) {
        self.clear_selection();
        self.sync_state();
        self.bot_held = self.state == State::BotToMove;
    }

    /// Releases a bot turn held after undo or redo.
    pub fn resume(&mut self) -> Outcome {
        if self.state == State::BotToMove && self.bot_held {
            self.bot_held = false;
            Outcome::Resumed
        } else {
            Outcome::Ignored
        }
    }

    /// Abandons the current game.
    pub fn return_to_menu(&mut self) -> Outcome {
        if self.session.take().is_some() {
            info!("game abandoned");
        }
        self.clear_selection();
        self.bot_held = false;
        self.state = State::Menu;
        Outcome::Menu
    }

    /// Shows `text` for the configured duration.
    pub fn notify(&mut self, text: impl Into<String>) {
        self.message = Some(Message {
            text: text.into(),
            expires_at: Instant::now() + self.settings.message_duration,
        });
    }

    /// Everything the front-end needs to draw at `now`.
    #[must_use]
    pub fn view(&self, now: Instant) -> View<'_> {
        let position = self.session.as_ref().map(GameSession::position);
        let destinations = match (position, self.selected) {
            (Some(position), Some(from)) => position.legal_destinations(from),
            _ => Vec::new(),
        };
        let checked_king = position.and_then(|position| {
            let turn = position.side_to_move();
            if position.is_in_check(turn) {
                position.king(turn)
            } else {
                None
            }
        });
        View {
            state: self.state,
            difficulty: self
                .session
                .as_ref()
                .map_or(self.difficulty, GameSession::difficulty),
            position,
            human: self.session.as_ref().map(GameSession::human),
            selected: self.selected,
            destinations,
            checked_king,
            pending_promotion: self.pending_promotion,
            bot_held: self.bot_held && self.state == State::BotToMove,
            message: self.message.as_ref().filter(|m| now < m.expires_at),
            result: match (&self.session, self.state) {
                (Some(session), State::GameOver) => Some(session.result()),
                _ => None,
            },
            can_undo: self.session.as_ref().is_some_and(|s| s.log().can_undo()),
            can_redo: self.session.as_ref().is_some_and(|s| s.log().can_redo()),
        }
    }

    fn sync_state(&mut self) {
        let previous = self.state;
        self.state = match &self.session {
            None => State::Menu,
            Some(session) if session.is_over() => State::GameOver,
            Some(session) if session.is_human_turn() => State::PlayerToMove,
            Some(_) => State::BotToMove,
        };
        if self.state == State::GameOver && previous != State::GameOver {
            if let Some(session) = &self.session {
                info!(result = %session.result(), "game over");
            }
        }
    }

    fn clear_selection(&mut self) {
        self.selected = None;
        self.pending_promotion = None;
    }

    fn require(&self, state: State, action: &'static str) -> Result<(), GameError> {
        if self.state == state {
            Ok(())
        } else {
            Err(GameError::InvalidState {
                action,
                state: self.state,
            })
        }
    }

    fn active_session(&self, action: &'static str) -> Result<&GameSession, GameError> {
        self.session.as_ref().ok_or(GameError::InvalidState {
            action,
            state: self.state,
        })
    }

    fn session_mut(&mut self, action: &'static str) -> Result<&mut GameSession, GameError> {
        let state = self.state;
        self.session
            .as_mut()
            .ok_or(GameError::InvalidState { action, state })
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::oracle::NoOracle;

    fn controller() -> Controller<NoOracle, StdRng> {
        Controller::new(NoOracle, StdRng::seed_from_u64(1), Settings::default())
    }

    #[test]
    fn menu() {
        let mut controller = controller();
        assert_eq!(controller.state(), State::Menu);
        assert_eq!(
            controller.handle(Input::SelectDifficulty(-1)).unwrap(),
            Outcome::DifficultyChanged(DifficultyLevel::PerfectStrategist)
        );
        assert_eq!(controller.handle(Input::Key(Key::Undo)).unwrap(), Outcome::Ignored);
        assert!(controller.message().is_some());
        assert_eq!(controller.handle(Input::Key(Key::Escape)).unwrap(), Outcome::Quit);
    }

    #[test]
    fn selection() {
        let mut controller = controller();
        let _ = controller.start().unwrap();
        assert_eq!(controller.square_clicked(Square::E7).unwrap(), Outcome::Ignored);
        assert_eq!(
            controller.square_clicked(Square::E2).unwrap(),
            Outcome::Selected(Square::E2)
        );
        assert_eq!(
            controller.view(Instant::now()).destinations,
            vec![Square::E3, Square::E4]
        );
        assert_eq!(controller.square_clicked(Square::E2).unwrap(), Outcome::Deselected);
        let _ = controller.square_clicked(Square::E2).unwrap();
        assert!(matches!(
            controller.square_clicked(Square::E5),
            Err(GameError::IllegalMove { .. })
        ));
        assert_eq!(controller.view(Instant::now()).selected, None);
        assert_eq!(controller.state(), State::PlayerToMove);
    }

    #[test]
    fn held_bot_turn() {
        let mut controller = controller();
        let _ = controller.start().unwrap();
        let _ = controller.submit(Move::from_uci("e2e4").unwrap()).unwrap();
        assert!(controller.tick().unwrap().is_some());
        assert_eq!(controller.state(), State::PlayerToMove);

        let _ = controller.undo().unwrap();
        assert_eq!(controller.state(), State::BotToMove);
        assert!(controller.view(Instant::now()).bot_held);
        assert_eq!(controller.tick().unwrap(), None);
        assert_eq!(controller.resume(), Outcome::Resumed);
        assert!(controller.tick().unwrap().is_some());
        assert_eq!(controller.state(), State::PlayerToMove);
    }

    #[test]
    fn default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.human, Player::White);
        assert_eq!(settings.move_time, Duration::from_secs(1));
        assert_eq!(settings.message_duration, Duration::from_secs(2));
        assert_eq!(settings.save_path, PathBuf::from("saved_game.fen"));
        assert_eq!(settings.oracle_retries, 1);
    }

    #[test]
    fn save_needs_a_game() {
        let path = std::env::temp_dir()
            .join(format!("gambit-{}-controller.fen", std::process::id()));
        let mut controller = Controller::new(
            NoOracle,
            StdRng::seed_from_u64(1),
            Settings {
                save_path: path.clone(),
                ..Settings::default()
            },
        );
        assert!(matches!(
            controller.save(),
            Err(GameError::InvalidState {
                action: "saving",
                state: State::Menu
            })
        ));
        let _ = controller.start().unwrap();
        assert_eq!(controller.save().unwrap(), Outcome::Saved);
        assert_eq!(persistence::load(&path).unwrap(), Position::starting());
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn message_expires() {
        let mut controller = controller();
        controller.notify("hello");
        let now = Instant::now();
        assert_eq!(controller.view(now).message.map(|m| m.text.as_str()), Some("hello"));
        assert!(controller.view(now + Duration::from_secs(3)).message.is_none());
    }
}
