//! Messages exchanged with an engine over the [Universal Chess Interface]:
//! [`Command`]s are written to its stdin, [`Response`]s are read from its
//! stdout line by line.
//!
//! [Universal Chess Interface]: https://backscattering.de/chess/uci/

use std::fmt;

/// GUI to engine messages.
#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    /// Switches the engine to UCI mode, answered with `uciok`.
    Uci,
    /// Synchronization point, answered with `readyok`.
    IsReady,
    #[allow(missing_docs)]
    SetOption { name: String, value: Option<String> },
    #[allow(missing_docs)]
    NewGame,
    /// Sets up the position from FEN (or the starting one) and plays the
    /// moves on top of it.
    SetPosition {
        #[allow(missing_docs)]
        fen: Option<String>,
        #[allow(missing_docs)]
        moves: Vec<String>,
    },
    /// Starts searching, answered with `bestmove` when it is done.
    Go {
        #[allow(missing_docs)]
        depth: Option<u32>,
        #[allow(missing_docs)]
        nodes: Option<u64>,
        /// Search time in milliseconds.
        movetime: Option<u64>,
    },
    /// Interrupts the search, the engine still answers with `bestmove`.
    Stop,
    #[allow(missing_docs)]
    Quit,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uci => f.write_str("uci"),
            Self::IsReady => f.write_str("isready"),
            Self::SetOption { name, value } => {
                write!(f, "setoption name {name}")?;
                if let Some(value) = value {
                    write!(f, " value {value}")?;
                }
                Ok(())
            },
            Self::NewGame => f.write_str("ucinewgame"),
            Self::SetPosition { fen, moves } => {
                match fen {
                    Some(fen) => write!(f, "position fen {fen}")?,
                    None => f.write_str("position startpos")?,
                }
                if !moves.is_empty() {
                    write!(f, " moves {}", moves.join(" "))?;
                }
                Ok(())
            },
            Self::Go {
                depth,
                nodes,
                movetime,
            } => {
                f.write_str("go")?;
                if let Some(depth) = depth {
                    write!(f, " depth {depth}")?;
                }
                if let Some(nodes) = nodes {
                    write!(f, " nodes {nodes}")?;
                }
                if let Some(movetime) = movetime {
                    write!(f, " movetime {movetime}")?;
                }
                Ok(())
            },
            Self::Stop => f.write_str("stop"),
            Self::Quit => f.write_str("quit"),
        }
    }
}

/// Engine to GUI messages. Only the parts the game relies on are parsed,
/// everything else is kept as is.
#[derive(Debug, PartialEq, Eq)]
pub enum Response {
    /// `id name <name>`.
    Name(String),
    /// `id author <author>`.
    Author(String),
    #[allow(missing_docs)]
    UciOk,
    #[allow(missing_docs)]
    ReadyOk,
    /// `bestmove <move> [ponder <move>]`. Engines report `(none)` or `0000`
    /// when there is nothing to play.
    BestMove {
        #[allow(missing_docs)]
        best: Option<String>,
        #[allow(missing_docs)]
        ponder: Option<String>,
    },
    /// Search progress, the rest of the line after `info`.
    Info(String),
    /// Supported option, the rest of the line after `option`.
    Option(String),
    /// Anything else, including empty lines.
    Unknown(String),
}

fn meaningful(uci: &&str) -> bool {
    !matches!(*uci, "(none)" | "0000")
}

fn parse_bestmove(parts: &[&str]) -> Response {
    let best = parts.get(1).copied().filter(meaningful).map(ToString::to_string);
    let ponder = match parts.get(2) {
        Some(&"ponder") => parts.get(3).copied().filter(meaningful).map(ToString::to_string),
        _ => None,
    };
    Response::BestMove { best, ponder }
}

fn rest<'a>(input: &'a str, keyword: &str) -> &'a str {
    input
        .trim_start()
        .strip_prefix(keyword)
        .map_or("", str::trim)
}

impl Response {
    /// Parses a single line of engine output. Never fails: unrecognized lines
    /// become [`Response::Unknown`].
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let parts: Vec<&str> = input.split_whitespace().collect();
        match parts.as_slice() {
            ["id", "name", ..] => Self::Name(rest(rest(input, "id"), "name").to_string()),
            ["id", "author", ..] => Self::Author(rest(rest(input, "id"), "author").to_string()),
            ["uciok"] => Self::UciOk,
            ["readyok"] => Self::ReadyOk,
            ["bestmove", ..] => parse_bestmove(&parts),
            ["info", ..] => Self::Info(rest(input, "info").to_string()),
            ["option", ..] => Self::Option(rest(input, "option").to_string()),
            _ => Self::Unknown(input.to_string()),
        }
    }
}
