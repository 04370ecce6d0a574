//! Provides fully-specified [Chess Position] implementation: stores information
//! about the board and tracks the state of castling, 50-move rule draw, etc.
//!
//! Positions are immutable values: making a move produces a new [`Position`]
//! together with a [`MoveRecord`] that is sufficient to restore the previous
//! one exactly. Move legality and game termination rules are delegated to
//! [`shakmaty`], the board itself is a plain square-centric mailbox.
//!
//! [Chess Position]: https://www.chessprogramming.org/Chess_Position

use std::fmt::{self, Write};
use std::num::NonZeroU16;

use anyhow::{anyhow, bail, Context};
use itertools::Itertools;
use shakmaty::{CastlingMode, Chess};

use crate::chess::core::{
    CastleRights,
    File,
    Move,
    MoveList,
    Piece,
    PieceKind,
    Player,
    Rank,
    Square,
    BOARD_SIZE,
    BOARD_WIDTH,
};
use crate::chess::record::MoveRecord;
use crate::error::GameError;

/// The 75-move rule ends the game automatically after this many halfmoves
/// without captures or pawn moves.
pub const SEVENTY_FIVE_MOVE_RULE: u16 = 150;

/// State of the chess game: board, half-move counters and castling rights,
/// etc. It has 1:1 relationship with [Forsyth-Edwards Notation] (FEN).
///
/// [`Position::try_from()`] provides a convenient interface for creating a
/// [`Position`]. It will clean up the input (trim newlines and whitespace) and
/// attempt to parse in either FEN or trimmed [Extended Position Description]
/// (EPD) without operations.
///
/// Every [`Position`] obtained through the public API is valid: parsing
/// rejects unreachable setups and moves are only applied after a legality
/// check.
///
/// [Forsyth-Edwards Notation]: https://www.chessprogramming.org/Forsyth-Edwards_Notation
/// [Extended Position Description]: https://www.chessprogramming.org/Extended_Position_Description
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Position {
    board: [Option<Piece>; BOARD_SIZE as usize],
    castling: CastleRights,
    side_to_move: Player,
    /// [Halfmove Clock] keeps track of the number of (half-)moves since the
    /// last capture or pawn move and is used to enforce the 75-move rule.
    ///
    /// [Halfmove Clock]: https://www.chessprogramming.org/Halfmove_Clock
    halfmove_clock: u16,
    /// [Fullmove Counter] starts at 1 and is incremented after every Black
    /// move.
    ///
    /// [Fullmove Counter]: https://www.chessprogramming.org/Forsyth-Edwards_Notation#Fullmove_counter
    fullmove_counter: NonZeroU16,
    /// [En passant] target square: set after every double pawn push, even if
    /// no capture is possible.
    ///
    /// [En passant]: https://en.wikipedia.org/wiki/En_passant
    en_passant_square: Option<Square>,
}

impl Position {
    /// Creates the starting position of the standard chess.
    ///
    /// ```
    /// use gambit::chess::position::Position;
    ///
    /// let starting_position = Position::starting();
    /// assert_eq!(
    ///     &starting_position.to_string(),
    ///     "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
    /// );
    /// ```
    #[must_use]
    pub fn starting() -> Self {
        let mut result = Self::empty();
        let backrank = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        for player in [Player::White, Player::Black] {
            for (column, kind) in backrank.into_iter().enumerate() {
                let file = File::ALL[column];
                result.put(
                    Square::new(file, Rank::backrank(player)),
                    Piece::new(player, kind),
                );
                result.put(
                    Square::new(file, Rank::pawns_starting(player)),
                    Piece::new(player, PieceKind::Pawn),
                );
            }
        }
        result.castling = CastleRights::ALL;
        result
    }

    fn empty() -> Self {
        Self {
            board: [None; BOARD_SIZE as usize],
            castling: CastleRights::NONE,
            side_to_move: Player::White,
            halfmove_clock: 0,
            fullmove_counter: NonZeroU16::MIN,
            en_passant_square: None,
        }
    }

    fn put(&mut self, square: Square, piece: Piece) {
        self.board[square as usize] = Some(piece);
    }

    /// Returns the piece standing on the square, if any.
    #[must_use]
    pub fn at(&self, square: Square) -> Option<Piece> {
        self.board[square as usize]
    }

    #[must_use]
    #[allow(missing_docs)]
    pub const fn side_to_move(&self) -> Player {
        self.side_to_move
    }

    #[must_use]
    #[allow(missing_docs)]
    pub const fn castling(&self) -> CastleRights {
        self.castling
    }

    #[must_use]
    #[allow(missing_docs)]
    pub const fn en_passant_square(&self) -> Option<Square> {
        self.en_passant_square
    }

    #[must_use]
    #[allow(missing_docs)]
    pub const fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    #[must_use]
    #[allow(missing_docs)]
    pub const fn fullmove_counter(&self) -> NonZeroU16 {
        self.fullmove_counter
    }

    /// Square of the given player's king.
    #[must_use]
    pub fn king(&self, player: Player) -> Option<Square> {
        Square::iter().find(|square| {
            self.at(*square) == Some(Piece::new(player, PieceKind::King))
        })
    }

    /// Converts the position into the rules engine representation. This only
    /// fails for positions that were not obtained through the public API.
    fn rules(&self) -> anyhow::Result<Chess> {
        let fen: shakmaty::fen::Fen = self
            .to_string()
            .parse()
            .with_context(|| format!("rules engine can not parse FEN {self}"))?;
        fen.into_position(CastlingMode::Standard)
            .map_err(|e| anyhow!("rules engine rejected position {self}: {e}"))
    }

    /// Calculates a list of legal moves (i.e. the moves that do not leave
    /// our king in check). Promotions to each of the four pieces are listed
    /// as separate moves.
    #[must_use]
    pub fn legal_moves(&self) -> MoveList {
        let rules = match self.rules() {
            Ok(rules) => rules,
            Err(e) => {
                tracing::error!("no moves for an invalid position: {e:#}");
                return MoveList::new();
            },
        };
        shakmaty::Position::legal_moves(&rules)
            .iter()
            .filter_map(|m| Move::from_uci(&m.to_uci(CastlingMode::Standard).to_string()).ok())
            .collect()
    }

    /// Squares the piece on `from` can legally move to. Promotion choices
    /// collapse into a single destination.
    #[must_use]
    pub fn legal_destinations(&self, from: Square) -> Vec<Square> {
        self.legal_moves()
            .iter()
            .filter(|m| m.from() == from)
            .map(Move::to)
            .sorted()
            .dedup()
            .collect()
    }

    /// Returns true if `next_move` can be played in this position.
    #[must_use]
    pub fn is_legal_move(&self, next_move: &Move) -> bool {
        self.legal_moves().contains(next_move)
    }

    /// Returns true if `player`'s king is attacked. Only the side to move can
    /// be in check in a valid position.
    #[must_use]
    pub fn is_in_check(&self, player: Player) -> bool {
        player == self.side_to_move
            && self
                .rules()
                .is_ok_and(|rules| shakmaty::Position::is_check(&rules))
    }

    /// Checks all game-ending conditions: checkmate, stalemate, insufficient
    /// material and the 75-move rule (in that order of precedence).
    #[must_use]
    pub fn termination(&self) -> Option<Termination> {
        let rules = self.rules().ok()?;
        if shakmaty::Position::is_checkmate(&rules) {
            Some(Termination::Checkmate)
        } else if shakmaty::Position::is_stalemate(&rules) {
            Some(Termination::Stalemate)
        } else if shakmaty::Position::is_insufficient_material(&rules) {
            Some(Termination::InsufficientMaterial)
        } else if self.halfmove_clock >= SEVENTY_FIVE_MOVE_RULE {
            Some(Termination::SeventyFiveMoves)
        } else {
            None
        }
    }

    #[must_use]
    #[allow(missing_docs)]
    pub fn is_checkmate(&self) -> bool {
        self.termination() == Some(Termination::Checkmate)
    }

    #[must_use]
    #[allow(missing_docs)]
    pub fn is_stalemate(&self) -> bool {
        self.termination() == Some(Termination::Stalemate)
    }

    /// Neither side has enough pieces to deliver a checkmate.
    #[must_use]
    pub fn has_insufficient_material(&self) -> bool {
        self.rules()
            .is_ok_and(|rules| shakmaty::Position::is_insufficient_material(&rules))
    }

    /// Returns true if the game can not continue from this position.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.termination().is_some()
    }

    /// Result of the game: the side to move loses when checkmated, all other
    /// terminations are draws.
    #[must_use]
    pub fn result(&self) -> GameResult {
        match self.termination() {
            None => GameResult::Ongoing,
            Some(Termination::Checkmate) => GameResult::Win(self.side_to_move.opponent()),
            Some(_) => GameResult::Draw,
        }
    }

    /// Validates `next_move` against the legal moves and applies it. Returns
    /// the resulting position and the record that allows reversing it.
    ///
    /// # Errors
    ///
    /// [`GameError::PromotionRequired`] when a pawn reaches the last rank
    /// without a promotion piece, [`GameError::IllegalMove`] for every other
    /// move that is not legal.
    ///
    pub fn play(&self, next_move: &Move) -> Result<(Self, MoveRecord), GameError> {
        let legal_moves = self.legal_moves();
        if !legal_moves.contains(next_move) {
            let promotes = next_move.promotion().is_none()
                && legal_moves
                    .iter()
                    .any(|m| m.from() == next_move.from() && m.to() == next_move.to());
            return Err(if promotes {
                GameError::PromotionRequired {
                    next_move: *next_move,
                }
            } else {
                GameError::IllegalMove {
                    next_move: *next_move,
                    position: self.to_string(),
                }
            });
        }
        let piece = self.at(next_move.from()).ok_or_else(|| GameError::IllegalMove {
            next_move: *next_move,
            position: self.to_string(),
        })?;
        let record = MoveRecord::new(self, *next_move, piece);
        Ok((self.replay(&record), record))
    }

    /// Same as [`Position::play`] without keeping the record.
    ///
    /// # Errors
    ///
    /// See [`Position::play`].
    pub fn apply(&self, next_move: &Move) -> Result<Self, GameError> {
        self.play(next_move).map(|(position, _)| position)
    }

    /// Applies a previously recorded move. The record has to be produced for
    /// this exact position (which is how redo uses it).
    #[must_use]
    pub fn replay(&self, record: &MoveRecord) -> Self {
        debug_assert_eq!(record.piece().owner, self.side_to_move);
        let next_move = record.next_move();
        let mut next = self.clone();
        next.board[next_move.from() as usize] = None;
        if let Some((square, _)) = record.captured() {
            next.board[square as usize] = None;
        }
        let placed = match next_move.promotion() {
            Some(promotion) => Piece::new(record.piece().owner, promotion.into()),
            None => record.piece(),
        };
        next.put(next_move.to(), placed);
        if let Some((rook_from, rook_to)) = record.castling_rook() {
            next.board[rook_to as usize] = next.board[rook_from as usize].take();
        }

        if record.piece().kind == PieceKind::King {
            next.castling.remove(CastleRights::both(record.piece().owner));
        }
        next.castling.remove(CastleRights::lost_at(next_move.from()));
        next.castling.remove(CastleRights::lost_at(next_move.to()));

        let pawn_move = record.piece().kind == PieceKind::Pawn;
        next.en_passant_square = if pawn_move
            && (next_move.to().rank() as i8 - next_move.from().rank() as i8).abs() == 2
        {
            next_move
                .from()
                .offset(0, record.piece().owner.push_direction())
        } else {
            None
        };
        next.halfmove_clock = if pawn_move || record.captured().is_some() {
            0
        } else {
            self.halfmove_clock.saturating_add(1)
        };
        if self.side_to_move == Player::Black {
            next.fullmove_counter = self.fullmove_counter.saturating_add(1);
        }
        next.side_to_move = self.side_to_move.opponent();
        next
    }

    /// Restores the position that `record` was played from. The record has to
    /// be the last move that led to this position (which is how undo uses
    /// it).
    #[must_use]
    pub fn reverse(&self, record: &MoveRecord) -> Self {
        debug_assert_eq!(record.piece().owner, self.side_to_move.opponent());
        let next_move = record.next_move();
        let mut previous = self.clone();
        if let Some((rook_from, rook_to)) = record.castling_rook() {
            previous.board[rook_from as usize] = previous.board[rook_to as usize].take();
        }
        previous.board[next_move.to() as usize] = None;
        previous.put(next_move.from(), record.piece());
        if let Some((square, piece)) = record.captured() {
            previous.put(square, piece);
        }
        previous.castling = record.castling();
        previous.en_passant_square = record.en_passant_square();
        previous.halfmove_clock = record.halfmove_clock();
        previous.fullmove_counter = record.fullmove_counter();
        previous.side_to_move = record.piece().owner;
        previous
    }

    /// Rejects positions that can not occur in a game: wrong number of kings
    /// or pawns, pawns on backranks, en passant squares without a pushed pawn
    /// and anything else the rules engine refuses (e.g. the side not to move
    /// being in check or castling rights without the rook).
    fn validate(&self) -> anyhow::Result<()> {
        for player in [Player::White, Player::Black] {
            let count = |kind| {
                self.board
                    .iter()
                    .filter(|piece| **piece == Some(Piece::new(player, kind)))
                    .count()
            };
            if count(PieceKind::King) != 1 {
                bail!("{player:?} should have exactly one king");
            }
            if count(PieceKind::Pawn) > 8 {
                bail!("{player:?} can not have more than 8 pawns");
            }
        }
        for rank in [Rank::One, Rank::Eight] {
            for file in File::ALL {
                if self.at(Square::new(file, rank)).is_some_and(|p| p.kind == PieceKind::Pawn) {
                    bail!("pawns can not be placed on backranks");
                }
            }
        }
        if let Some(square) = self.en_passant_square {
            let they = self.side_to_move.opponent();
            let expected_rank = match self.side_to_move {
                Player::White => Rank::Six,
                Player::Black => Rank::Three,
            };
            if square.rank() != expected_rank {
                bail!("en passant square {square} is on the wrong rank");
            }
            let pushed_pawn = square.offset(0, they.push_direction());
            if pushed_pawn.and_then(|s| self.at(s)) != Some(Piece::new(they, PieceKind::Pawn)) {
                bail!("en passant square {square} is not behind a pushed pawn");
            }
        }
        let _ = self.rules()?;
        Ok(())
    }

    /// Parses board from Forsyth-Edwards Notation. It will also accept trimmed
    /// FEN (EPD with 4 parts).
    ///
    /// FEN ::=
    ///       Piece Placement
    ///   ' ' Side to move
    ///   ' ' Castling ability
    ///   ' ' En passant target square
    ///   ' ' Halfmove clock
    ///   ' ' Fullmove counter
    ///
    /// The last two parts (together) are optional and will default to "0 1".
    ///
    /// NOTE: This expects properly-formatted inputs: no extra symbols or
    /// additional whitespace. Use [`Position::try_from`] for cleaning up the
    /// input if it is coming from untrusted source and is likely to contain
    /// extra symbols.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is malformed or describes a position
    /// that can not occur in a game.
    pub fn from_fen(input: &str) -> anyhow::Result<Self> {
        let mut parts = input.split(' ');
        let mut result = Self::empty();
        let Some(pieces_placement) = parts.next() else {
            bail!("incorrect FEN: missing pieces placement");
        };
        let mut rank_id = BOARD_WIDTH;
        for rank_fen in pieces_placement.split('/') {
            if rank_id == 0 {
                bail!("incorrect FEN: expected 8 ranks, got {pieces_placement}");
            }
            rank_id -= 1;
            let rank = Rank::try_from(rank_id)?;
            let mut file: u8 = 0;
            for symbol in rank_fen.chars() {
                if file >= BOARD_WIDTH {
                    bail!("incorrect FEN: rank {rank_fen} exceeds {BOARD_WIDTH} files");
                }
                match symbol {
                    '0' => bail!("increment can not be 0"),
                    '1'..='8' => file += symbol as u8 - b'0',
                    _ => {
                        result.put(Square::new(file.try_into()?, rank), Piece::try_from(symbol)?);
                        file += 1;
                    },
                }
            }
            if file != BOARD_WIDTH {
                bail!("incorrect FEN: rank size should be exactly {BOARD_WIDTH}, got {rank_fen} of length {file}");
            }
        }
        if rank_id != 0 {
            bail!("incorrect FEN: there should be 8 ranks, got {pieces_placement}");
        }
        result.side_to_move = match parts.next() {
            Some(value) => value.try_into()?,
            None => bail!("incorrect FEN: missing side to move"),
        };
        result.castling = match parts.next() {
            Some(value) => value.try_into()?,
            None => bail!("incorrect FEN: missing castling rights"),
        };
        result.en_passant_square = match parts.next() {
            Some("-") => None,
            Some(value) => Some(value.try_into()?),
            None => bail!("incorrect FEN: missing en passant square"),
        };
        // Trimmed EPD keeps the default counters.
        if let Some(halfmove_clock) = parts.next() {
            result.halfmove_clock = parse_counter(halfmove_clock, "halfmove clock")?;
            result.fullmove_counter = match parts.next() {
                Some(value) => parse_counter(value, "fullmove counter")?,
                None => bail!("incorrect FEN: missing fullmove counter"),
            };
        }
        if parts.next().is_some() {
            bail!("trailing symbols are not allowed in FEN");
        }
        result.validate()?;
        Ok(result)
    }
}

fn parse_counter<T: std::str::FromStr>(value: &str, name: &str) -> anyhow::Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    if value.is_empty() || !value.bytes().all(|c| c.is_ascii_digit()) {
        bail!("{name} can not contain anything other than digits, got '{value}'");
    }
    value
        .parse::<T>()
        .with_context(|| format!("incorrect FEN: {name} can not be parsed {value}"))
}

impl TryFrom<&str> for Position {
    type Error = anyhow::Error;

    /// Trims surrounding whitespace and an optional "fen " or "epd " prefix
    /// before parsing the input with [`Position::from_fen`].
    fn try_from(input: &str) -> anyhow::Result<Self> {
        let input = input.trim();
        for prefix in ["fen ", "epd "] {
            if let Some(stripped) = input.strip_prefix(prefix) {
                return Self::from_fen(stripped);
            }
        }
        Self::from_fen(input)
    }
}

impl fmt::Display for Position {
    /// Prints board in Forsyth-Edwards Notation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..BOARD_WIDTH).rev() {
            let mut empty_squares = 0;
            for file in 0..BOARD_WIDTH {
                match self.board[(file + rank * BOARD_WIDTH) as usize] {
                    Some(piece) => {
                        if empty_squares != 0 {
                            write!(f, "{empty_squares}")?;
                            empty_squares = 0;
                        }
                        write!(f, "{piece}")?;
                    },
                    None => empty_squares += 1,
                }
            }
            if empty_squares != 0 {
                write!(f, "{empty_squares}")?;
            }
            if rank != 0 {
                f.write_char('/')?;
            }
        }
        write!(f, " {} {} ", self.side_to_move, self.castling)?;
        match self.en_passant_square {
            Some(square) => write!(f, "{square} "),
            None => write!(f, "- "),
        }?;
        write!(f, "{} {}", self.halfmove_clock, self.fullmove_counter)
    }
}

impl fmt::Debug for Position {
    /// Draws the board from White's perspective followed by the FEN.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..BOARD_WIDTH).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..BOARD_WIDTH {
                match self.board[(file + rank * BOARD_WIDTH) as usize] {
                    Some(piece) => write!(f, " {piece}")?,
                    None => f.write_str(" .")?,
                }
            }
            f.write_char('\n')?;
        }
        writeln!(f, "   a b c d e f g h")?;
        writeln!(f, "FEN: {self}")
    }
}

/// The reason a game has ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Termination {
    Checkmate,
    Stalemate,
    InsufficientMaterial,
    SeventyFiveMoves,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Checkmate => "checkmate",
            Self::Stalemate => "stalemate",
            Self::InsufficientMaterial => "insufficient material",
            Self::SeventyFiveMoves => "75-move rule",
        })
    }
}

/// Game result in the PGN notation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameResult {
    /// The given player has won.
    Win(Player),
    #[allow(missing_docs)]
    Draw,
    /// The game is not over yet.
    Ongoing,
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Win(Player::White) => "1-0",
            Self::Win(Player::Black) => "0-1",
            Self::Draw => "1/2-1/2",
            Self::Ongoing => "*",
        })
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::chess::core::Promotion;

    fn setup(fen: &str) -> Position {
        let position = Position::try_from(fen);
        assert!(position.is_ok(), "input: {fen}: {position:?}");
        let position = position.unwrap();
        assert_eq!(position.to_string(), fen);
        position
    }

    fn play(position: &Position, uci: &str) -> (Position, MoveRecord) {
        position.play(&Move::from_uci(uci).unwrap()).unwrap()
    }

    #[test]
    #[allow(unused_results)]
    fn correct_fen() {
        setup("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
        setup("2r3r1/p3k3/1p3pp1/1B5p/5P2/2P1p1P1/PP4KP/3R4 w - - 0 34");
        setup("rnbqk1nr/p3bppp/1p2p3/2ppP3/3P4/P7/1PP1NPPP/R1BQKBNR w KQkq c6 0 7");
        setup("r2qkb1r/1pp1pp1p/p1np1np1/1B6/3PP1b1/2N1BN2/PPP2PPP/R2QK2R w KQkq - 0 7");
        setup("r3k3/5p2/2p5/p7/P3r3/2N2n2/1PP2P2/2K2B2 w q - 0 24");
        setup("8/8/8/8/2P5/3k4/8/KB6 b - c3 0 1");
    }

    #[test]
    fn starting_position() {
        assert_eq!(
            Position::starting(),
            Position::try_from("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1")
                .unwrap()
        );
        assert_eq!(Position::starting().legal_moves().len(), 20);
        assert_eq!(Position::starting().king(Player::Black), Some(Square::E8));
    }

    #[test]
    fn correct_epd() {
        let epd = "rnbqkb1r/pp2pppp/3p1n2/8/3NP3/2N5/PPP2PPP/R1BQKB1R b KQkq -";
        let position = Position::try_from(epd).unwrap();
        assert_eq!(position.halfmove_clock(), 0);
        assert_eq!(position.fullmove_counter().get(), 1);
        assert!(Position::try_from(&format!("epd {epd}")[..]).is_ok());
    }

    #[test]
    fn no_crash() {
        assert!(Position::try_from("3k2p1N/82/8/8/7B/6K1/3R4/8 b - - 0 1").is_err());
        assert!(
            Position::try_from("3kn3/R2p1N2/8/8/70000000000000000B/6K1/3R4/8 b - - 0 1").is_err()
        );
        assert!(Position::try_from("3kn3/R4N2/8/8/7B/6K1/3R4/8 b - - 0 48 b - - 0 4/8 b").is_err());
        assert!(Position::try_from("\tfen3kn3/R2p1N2/8/8/7B/6K1/3R4/8 b - - 0 23").is_err());
        assert!(Position::try_from("3kn3/R4N2/8/8/7B/6K1/3r4/8 b - - +8 1").is_err());
        assert!(Position::try_from("3kn3/R4N2/8/8/7B/6K1/3r4/8 b - - 8 0").is_err());
        assert!(Position::try_from("8/8/8/8/8/8/8/8 b 88 🔠 🔠 ").is_err());
        assert!(Position::try_from("").is_err());
    }

    #[test]
    fn illegal_positions() {
        // No white king.
        assert!(Position::try_from("3k4/8/8/8/8/8/8/8 w - - 0 1").is_err());
        // Too many kings.
        assert!(Position::try_from("1kkk4/8/8/8/8/8/8/1KKK4 w - - 0 1").is_err());
        // Too many white pawns.
        assert!(
            Position::try_from("rnbqkbnr/pppppppp/8/8/8/P7/PPPPPPPP/RNBQKBNR w KQkq - 0 1")
                .is_err()
        );
        // Pawns on backranks.
        assert!(Position::try_from("3kr3/8/8/8/8/5Q2/8/1KP5 w - - 0 1").is_err());
        // En passant square not behind a pushed pawn.
        assert!(
            Position::try_from("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq d3 0 1")
                .is_err()
        );
        // Wrong en passant rank.
        assert!(
            Position::try_from("rnbqkbnr/pppppppp/8/4P3/8/8/PPPP1PPP/RNBQKBNR b KQkq e4 0 1")
                .is_err()
        );
        // The side not to move is in check.
        assert!(Position::try_from("4k3/8/8/8/8/8/4R3/4K3 w - - 0 1").is_err());
        // Castling rights without the rook.
        assert!(Position::try_from("4k3/8/8/8/8/8/8/4K3 w K - 0 1").is_err());
    }

    #[test]
    fn double_push_sets_en_passant() {
        let (position, _) = play(&Position::starting(), "e2e4");
        assert_eq!(
            position.to_string(),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
        );
        let (position, _) = play(&position, "g8f6");
        assert_eq!(position.en_passant_square(), None);
        assert_eq!(position.halfmove_clock(), 1);
        assert_eq!(position.fullmove_counter().get(), 2);
    }

    #[test]
    fn en_passant_capture_round_trip() {
        let position =
            setup("rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3");
        let (next, record) = play(&position, "e5f6");
        assert_eq!(
            next.to_string(),
            "rnbqkbnr/ppp1p1pp/5P2/3p4/8/8/PPPP1PPP/RNBQKBNR b KQkq - 0 3"
        );
        assert_eq!(
            record.captured(),
            Some((Square::F5, Piece::new(Player::Black, PieceKind::Pawn)))
        );
        assert_eq!(next.reverse(&record), position);
    }

    #[test]
    fn castling_round_trip() {
        let position =
            setup("r3k2r/pppq1ppp/2npbn2/2b1p3/2B1P3/2NPBN2/PPPQ1PPP/R3K2R w KQkq - 4 8");
        let (short, record) = play(&position, "e1g1");
        assert_eq!(
            short.to_string(),
            "r3k2r/pppq1ppp/2npbn2/2b1p3/2B1P3/2NPBN2/PPPQ1PPP/R4RK1 b kq - 5 8"
        );
        assert_eq!(short.reverse(&record), position);
        let (long, record) = play(&short, "e8c8");
        assert_eq!(
            long.to_string(),
            "2kr3r/pppq1ppp/2npbn2/2b1p3/2B1P3/2NPBN2/PPPQ1PPP/R4RK1 w - - 6 9"
        );
        assert_eq!(long.reverse(&record), short);
        assert_eq!(short.replay(&record), long);
    }

    #[test]
    fn rook_capture_removes_castling() {
        let position = setup("r3k2r/8/8/8/8/8/6B1/R3K2R w KQkq - 0 1");
        let (next, record) = play(&position, "g2a8");
        assert_eq!(next.castling().to_string(), "KQk");
        assert_eq!(next.reverse(&record), position);
    }

    #[test]
    fn promotion() {
        let position = setup("8/P6k/8/8/8/8/8/K7 w - - 0 1");
        assert!(matches!(
            position.play(&Move::from_uci("a7a8").unwrap()),
            Err(GameError::PromotionRequired { .. })
        ));
        assert_eq!(position.legal_destinations(Square::A7), vec![Square::A8]);
        let (next, record) = play(&position, "a7a8n");
        assert_eq!(
            next.at(Square::A8),
            Some(Piece::new(Player::White, Promotion::Knight.into()))
        );
        assert_eq!(next.reverse(&record), position);
    }

    #[test]
    fn illegal_move() {
        let position = Position::starting();
        assert!(matches!(
            position.play(&Move::from_uci("e2e5").unwrap()),
            Err(GameError::IllegalMove { .. })
        ));
        assert!(position.apply(&Move::from_uci("e7e5").unwrap()).is_err());
        assert!(position.is_legal_move(&Move::from_uci("g1f3").unwrap()));
        assert!(!position.is_legal_move(&Move::from_uci("e1e2").unwrap()));
    }

    #[test]
    fn terminal_positions() {
        let mate = setup("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3");
        assert_eq!(mate.termination(), Some(Termination::Checkmate));
        assert!(mate.is_checkmate());
        assert!(!mate.is_stalemate());
        assert_eq!(mate.result(), GameResult::Win(Player::Black));
        assert_eq!(mate.result().to_string(), "0-1");
        assert!(mate.is_in_check(Player::White));
        assert!(!mate.is_in_check(Player::Black));

        let stalemate = setup("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
        assert_eq!(stalemate.termination(), Some(Termination::Stalemate));
        assert_eq!(stalemate.result().to_string(), "1/2-1/2");
        assert!(stalemate.legal_moves().is_empty());
        assert!(stalemate.is_stalemate());

        let bare_kings = setup("8/8/4k3/8/8/3K4/8/8 w - - 0 1");
        assert_eq!(
            bare_kings.termination(),
            Some(Termination::InsufficientMaterial)
        );
        assert!(bare_kings.has_insufficient_material());

        let slow = setup("8/8/4k3/8/8/3K4/8/R7 w - - 150 120");
        assert_eq!(slow.termination(), Some(Termination::SeventyFiveMoves));
        assert_eq!(Position::starting().result(), GameResult::Ongoing);
    }

    #[test]
    fn debug_board() {
        let board = format!("{:?}", Position::starting());
        assert!(board.starts_with("8  r n b q k b n r\n"));
        assert!(board.contains("   a b c d e f g h\n"));
    }
}
