//! Terminal front-end: reads one command per line from stdin, feeds it to the
//! game controller, lets the bot move and prints the board.

use std::fmt::Write as _;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use gambit::chess::core::{Move, Promotion, Square, BOARD_WIDTH};
use gambit::chess::position::GameResult;
use gambit::game::{Controller, DifficultyLevel, Input, Key, Outcome, Settings, State, View};
use gambit::oracle::{MoveOracle, NoOracle, UciEngine, UciEngineConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Play chess against a UCI engine.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Config {
    /// UCI engine executable. Without it the bot only plays random moves.
    #[arg(long)]
    engine: Option<PathBuf>,
    /// Argument passed to the engine, can be repeated.
    #[arg(long = "engine-arg", allow_hyphen_values = true)]
    engine_args: Vec<String>,
    /// Engine option as NAME=VALUE, can be repeated.
    #[arg(long = "engine-option", value_parser = parse_engine_option)]
    engine_options: Vec<(String, String)>,
    /// Engine thinking time per move in milliseconds.
    #[arg(long, default_value_t = 1000)]
    move_time: u64,
    /// Where "save" writes the position and "load" reads it by default.
    #[arg(long, default_value = "saved_game.fen")]
    save_file: PathBuf,
    /// Initially selected difficulty, e.g. "Casual Player" or casual_player.
    #[arg(long, default_value = "random_novice")]
    difficulty: DifficultyLevel,
    /// Seed of the random source for reproducible games.
    #[arg(long)]
    seed: Option<u64>,
    /// How long messages stay visible in milliseconds.
    #[arg(long, default_value_t = 2000)]
    message_ms: u64,
}

fn parse_engine_option(input: &str) -> anyhow::Result<(String, String)> {
    match input.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.trim().to_string()))
        },
        _ => anyhow::bail!("engine option should look like NAME=VALUE, got '{input}'"),
    }
}

const HELP: &str = "\
Menu: left, right, start, load [file], quit
Game: <square> to select and move, <uci move> (e.g. e2e4), q/r/b/n to promote,
      undo (z), redo (y), resume, save, menu (esc), board, quit";

/// Maps a command line to a controller input. [`None`] means the line is not
/// an input (e.g. "board" or "help") and is handled by the caller.
fn parse_input(line: &str, save_path: &Path) -> Option<Input> {
    let (command, argument) = match line.split_once(' ') {
        Some((command, argument)) => (command, Some(argument.trim())),
        None => (line, None),
    };
    let input = match (command, argument) {
        ("left", None) => Input::SelectDifficulty(-1),
        ("right", None) => Input::SelectDifficulty(1),
        ("start", None) => Input::Start,
        ("load", None) => Input::Load(save_path.to_path_buf()),
        ("load", Some(path)) => Input::Load(PathBuf::from(path)),
        ("quit" | "exit", None) => Input::Quit,
        ("menu" | "esc", None) => Input::Key(Key::Escape),
        ("save", None) => Input::Key(Key::Save),
        ("undo" | "z", None) => Input::Key(Key::Undo),
        ("redo" | "y", None) => Input::Key(Key::Redo),
        ("resume", None) => Input::Resume,
        (symbol, None) if symbol.len() == 1 => {
            Input::Promote(Promotion::try_from(symbol.chars().next()?).ok()?)
        },
        (square, None) if square.len() == 2 => Input::SquareClicked(Square::try_from(square).ok()?),
        (uci, None) => Input::Submit(Move::from_uci(uci).ok()?),
        _ => return None,
    };
    Some(input)
}

fn render(view: &View<'_>) -> String {
    let mut out = String::new();
    let Some(position) = view.position else {
        let _ = writeln!(out, "Difficulty: < {} >", view.difficulty);
        let _ = write!(out, "Type \"start\", \"load\" or \"quit\"");
        if let Some(message) = view.message {
            let _ = write!(out, "\n{}", message.text);
        }
        return out;
    };
    for rank in (0..BOARD_WIDTH).rev() {
        let _ = write!(out, "{} ", rank + 1);
        for file in 0..BOARD_WIDTH {
            let Ok(square) = Square::try_from(file + rank * BOARD_WIDTH) else {
                continue;
            };
            let marker = if view.selected == Some(square) {
                '>'
            } else if view.checked_king == Some(square) {
                '!'
            } else if view.destinations.contains(&square) {
                '*'
            } else {
                ' '
            };
            let symbol = position
                .at(square)
                .map_or('.', |piece| piece.to_string().chars().next().unwrap_or('?'));
            let _ = write!(out, "{marker}{symbol}");
        }
        out.push('\n');
    }
    let _ = writeln!(out, "   a b c d e f g h");
    let _ = write!(out, "{} | {}", view.difficulty, position);
    match view.state {
        State::GameOver => {
            let result = view.result.unwrap_or(GameResult::Ongoing);
            let _ = write!(out, "\nGame Over: {result}");
        },
        State::BotToMove if view.bot_held => {
            let _ = write!(out, "\nThe bot is waiting, type \"resume\" to let it move");
        },
        State::PlayerToMove => {
            if view.pending_promotion.is_some() {
                let _ = write!(out, "\nPromote to: q r b n");
            }
        },
        _ => (),
    }
    if let Some(message) = view.message {
        let _ = write!(out, "\n{}", message.text);
    }
    out
}

fn report(outcome: &Outcome) {
    match outcome {
        Outcome::Played(record) => println!("You played {}", record.next_move()),
        Outcome::Undone(record) => println!("Took back {}", record.next_move()),
        Outcome::Redone(record) => println!("Replayed {}", record.next_move()),
        Outcome::Started => println!("New game"),
        _ => (),
    }
}

fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    gambit::print_game_info();
    println!("{HELP}\n");

    let settings = Settings {
        move_time: Duration::from_millis(config.move_time),
        message_duration: Duration::from_millis(config.message_ms),
        save_path: config.save_file.clone(),
        ..Settings::default()
    };
    let oracle: Box<dyn MoveOracle> = match &config.engine {
        Some(program) => {
            let mut engine_config =
                UciEngineConfig::new(program).with_args(config.engine_args.iter().cloned());
            for (name, value) in &config.engine_options {
                engine_config = engine_config.with_option(name.clone(), value.clone());
            }
            match UciEngine::spawn(engine_config) {
                Ok(engine) => Box::new(engine),
                Err(e) => {
                    error!(error = %e, "engine is not available");
                    println!("Engine is not available ({e}), the bot will play random moves");
                    Box::new(NoOracle)
                },
            }
        },
        None => Box::new(NoOracle),
    };
    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    info!(?config, "starting");
    let mut controller = Controller::new(oracle, rng, settings).with_difficulty(config.difficulty);
    println!("{}", render(&controller.view(Instant::now())));

    for line in io::stdin().lock().lines() {
        let line = line.context("can not read from stdin")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match line {
            "help" => println!("{HELP}"),
            "board" => (),
            _ => match parse_input(line, &controller.settings().save_path) {
                Some(input) => {
                    let outcome = controller.handle(input)?;
                    if outcome == Outcome::Quit {
                        break;
                    }
                    report(&outcome);
                    if let Some(record) = controller.tick()? {
                        println!("Bot played {}", record.next_move());
                    }
                },
                None => println!("Unknown command \"{line}\", type \"help\""),
            },
        }
        println!("{}", render(&controller.view(Instant::now())));
    }
    Ok(())
}
