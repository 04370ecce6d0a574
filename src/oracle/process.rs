//! Runs a UCI engine as a child process and queries it for moves.
//!
//! A dedicated thread reads the engine's stdout and forwards complete lines
//! through a channel, so every wait on the engine has a deadline. The process
//! lives exactly as long as the [`UciEngine`] value: dropping it asks the
//! engine to quit and kills it if it does not.

use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, Command as Process, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError};
use tracing::{debug, info, trace, warn};

use crate::chess::core::Move;
use crate::chess::position::Position;
use crate::oracle::uci::{Command, Response};
use crate::oracle::{MoveOracle, OracleError};

/// How long the engine gets to exit after `quit` before it is killed.
const QUIT_GRACE: Duration = Duration::from_millis(500);

/// Where to find the engine and how patient to be with it.
#[derive(Clone, Debug)]
pub struct UciEngineConfig {
    /// Executable to run, looked up in `PATH` when it is not a path.
    pub program: PathBuf,
    /// Command-line arguments for the executable.
    pub args: Vec<String>,
    /// `setoption` pairs sent after the handshake.
    pub options: Vec<(String, String)>,
    /// Deadline for `uciok` and `readyok`.
    pub startup_timeout: Duration,
    /// Extra time on top of the search budget before the search is abandoned.
    pub response_grace: Duration,
}

impl UciEngineConfig {
    /// Configuration with default timeouts and no arguments or options.
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            options: Vec::new(),
            startup_timeout: Duration::from_secs(5),
            response_grace: Duration::from_secs(1),
        }
    }

    #[must_use]
    #[allow(missing_docs)]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    #[must_use]
    #[allow(missing_docs)]
    pub fn with_option(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.push((name.into(), value.into()));
        self
    }
}

/// A running UCI engine.
#[derive(Debug)]
pub struct UciEngine {
    config: UciEngineConfig,
    child: Child,
    stdin: ChildStdin,
    lines: Receiver<String>,
    name: String,
    /// False after an abandoned search: a stale `bestmove` may still arrive
    /// and has to be drained before the next query.
    in_sync: bool,
}

impl UciEngine {
    /// Starts the engine and completes the UCI handshake.
    ///
    /// # Errors
    ///
    /// [`OracleError::Unavailable`] if the process can not be started or exits
    /// early, [`OracleError::Timeout`] if it does not finish the handshake in
    /// time.
    pub fn spawn(config: UciEngineConfig) -> Result<Self, OracleError> {
        let program = config.program.display().to_string();
        let mut child = Process::new(&config.program)
            .args(&config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| OracleError::Unavailable(format!("can not start {program}: {e}")))?;
        let (Some(stdin), Some(stdout)) = (child.stdin.take(), child.stdout.take()) else {
            let _ = child.kill();
            return Err(OracleError::Unavailable(format!(
                "{program} has no piped stdio"
            )));
        };

        let (sender, lines) = crossbeam_channel::unbounded();
        let reader = thread::Builder::new()
            .name("uci-reader".to_string())
            .spawn(move || {
                for line in BufReader::new(stdout).lines() {
                    let Ok(line) = line else { break };
                    if sender.send(line).is_err() {
                        break;
                    }
                }
            });
        if let Err(e) = reader {
            let _ = child.kill();
            return Err(OracleError::Unavailable(format!(
                "can not read from {program}: {e}"
            )));
        }

        let mut engine = Self {
            config,
            child,
            stdin,
            lines,
            name: program,
            in_sync: true,
        };
        engine.handshake()?;
        info!(engine = %engine.name, "engine is ready");
        Ok(engine)
    }

    fn handshake(&mut self) -> Result<(), OracleError> {
        self.send(&Command::Uci)?;
        let mut name = None;
        self.wait_for(self.config.startup_timeout, |response| match response {
            Response::Name(engine) => {
                name = Some(engine);
                None
            },
            Response::UciOk => Some(()),
            _ => None,
        })?;
        if let Some(name) = name {
            self.name = name;
        }
        for (name, value) in self.config.options.clone() {
            self.send(&Command::SetOption {
                name,
                value: Some(value),
            })?;
        }
        self.synchronize()
    }

    /// Sends `isready` and discards everything until `readyok`, including the
    /// reply to an abandoned search.
    fn synchronize(&mut self) -> Result<(), OracleError> {
        self.send(&Command::IsReady)?;
        self.wait_for(self.config.startup_timeout, |response| {
            matches!(response, Response::ReadyOk).then_some(())
        })?;
        self.in_sync = true;
        Ok(())
    }

    fn send(&mut self, command: &Command) -> Result<(), OracleError> {
        trace!(engine = %self.name, ">> {command}");
        writeln!(self.stdin, "{command}")
            .and_then(|()| self.stdin.flush())
            .map_err(|e| OracleError::Unavailable(format!("can not write to {}: {e}", self.name)))
    }

    /// Reads responses until `accept` extracts a value or `timeout` passes.
    fn wait_for<T>(
        &self,
        timeout: Duration,
        mut accept: impl FnMut(Response) -> Option<T>,
    ) -> Result<T, OracleError> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            let line = match self.lines.recv_timeout(remaining) {
                Ok(line) => line,
                Err(RecvTimeoutError::Timeout) => return Err(OracleError::Timeout(timeout)),
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(OracleError::Unavailable(format!(
                        "{} closed its output",
                        self.name
                    )))
                },
            };
            trace!(engine = %self.name, "<< {line}");
            if let Some(value) = accept(Response::parse(&line)) {
                return Ok(value);
            }
        }
    }
}

impl MoveOracle for UciEngine {
    fn best_move(&mut self, position: &Position, budget: Duration) -> Result<Move, OracleError> {
        if !self.in_sync {
            self.synchronize()?;
        }
        let started = Instant::now();
        self.send(&Command::SetPosition {
            fen: Some(position.to_string()),
            moves: Vec::new(),
        })?;
        self.send(&Command::Go {
            depth: None,
            nodes: None,
            movetime: Some(u64::try_from(budget.as_millis()).unwrap_or(u64::MAX)),
        })?;
        let reply = self.wait_for(budget + self.config.response_grace, |response| match response {
            Response::BestMove { best, .. } => Some(best),
            _ => None,
        });
        let best = match reply {
            Ok(best) => best,
            Err(OracleError::Timeout(_)) => {
                warn!(engine = %self.name, ?budget, "search timed out, stopping it");
                self.in_sync = false;
                let _ = self.send(&Command::Stop);
                return Err(OracleError::Timeout(budget));
            },
            Err(e) => return Err(e),
        };
        debug!(engine = %self.name, elapsed = ?started.elapsed(), ?best, "search finished");
        match best {
            Some(uci) => Move::from_uci(&uci)
                .map_err(|e| OracleError::Protocol(format!("bestmove {uci}: {e:#}"))),
            None => Err(OracleError::Protocol(format!(
                "{} has no move in {position}",
                self.name
            ))),
        }
    }

    fn new_game(&mut self) -> Result<(), OracleError> {
        self.send(&Command::NewGame)?;
        self.synchronize()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for UciEngine {
    fn drop(&mut self) {
        let _ = self.send(&Command::Quit);
        let deadline = Instant::now() + QUIT_GRACE;
        loop {
            match self.child.try_wait() {
                Ok(Some(status)) => {
                    debug!(engine = %self.name, %status, "engine exited");
                    return;
                },
                Ok(None) if Instant::now() < deadline => thread::sleep(Duration::from_millis(10)),
                _ => break,
            }
        }
        warn!(engine = %self.name, "engine did not quit, killing it");
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
