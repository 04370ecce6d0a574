//! Everything needed to take a move back.

use std::num::NonZeroU16;

use crate::chess::core::{CastleRights, File, Move, Piece, PieceKind, Square};
use crate::chess::position::Position;

/// A move together with the parts of the position it destroys: the moved and
/// captured pieces, the rook of a castling move and the counters, castling
/// rights and en passant square from before the move.
///
/// [`Position::reverse`] restores the previous position from it exactly and
/// [`Position::replay`] applies the move again without re-validating it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MoveRecord {
    next_move: Move,
    piece: Piece,
    captured: Option<(Square, Piece)>,
    castling_rook: Option<(Square, Square)>,
    castling: CastleRights,
    en_passant_square: Option<Square>,
    halfmove_clock: u16,
    fullmove_counter: NonZeroU16,
}

impl MoveRecord {
    /// Captures the state `position` loses when `piece` makes `next_move`.
    /// The move has to be legal in `position`.
    pub(super) fn new(position: &Position, next_move: Move, piece: Piece) -> Self {
        let (from, to) = (next_move.from(), next_move.to());
        let captured = match position.at(to) {
            Some(victim) => Some((to, victim)),
            None if piece.kind == PieceKind::Pawn
                && from.file() != to.file()
                && position.en_passant_square() == Some(to) =>
            {
                let square = Square::new(to.file(), from.rank());
                position.at(square).map(|victim| (square, victim))
            },
            None => None,
        };
        let castling_rook = if piece.kind == PieceKind::King
            && (to.file() as i8 - from.file() as i8).abs() == 2
        {
            let rank = from.rank();
            Some(if to.file() == File::G {
                (Square::new(File::H, rank), Square::new(File::F, rank))
            } else {
                (Square::new(File::A, rank), Square::new(File::D, rank))
            })
        } else {
            None
        };
        Self {
            next_move,
            piece,
            captured,
            castling_rook,
            castling: position.castling(),
            en_passant_square: position.en_passant_square(),
            halfmove_clock: position.halfmove_clock(),
            fullmove_counter: position.fullmove_counter(),
        }
    }

    #[must_use]
    #[allow(missing_docs)]
    pub const fn next_move(&self) -> Move {
        self.next_move
    }

    /// The piece that moved, as it was before a promotion.
    #[must_use]
    pub const fn piece(&self) -> Piece {
        self.piece
    }

    /// Square and piece removed from the board. For en passant captures the
    /// square differs from the move destination.
    #[must_use]
    pub const fn captured(&self) -> Option<(Square, Piece)> {
        self.captured
    }

    /// Origin and destination of the rook for castling moves.
    #[must_use]
    pub const fn castling_rook(&self) -> Option<(Square, Square)> {
        self.castling_rook
    }

    #[must_use]
    pub(super) const fn castling(&self) -> CastleRights {
        self.castling
    }

    #[must_use]
    pub(super) const fn en_passant_square(&self) -> Option<Square> {
        self.en_passant_square
    }

    #[must_use]
    pub(super) const fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    #[must_use]
    pub(super) const fn fullmove_counter(&self) -> NonZeroU16 {
        self.fullmove_counter
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::chess::core::Player;

    #[test]
    fn quiet_move() {
        let position = Position::starting();
        let next_move = Move::from_uci("g1f3").unwrap();
        let (_, record) = position.play(&next_move).unwrap();
        assert_eq!(record.next_move(), next_move);
        assert_eq!(record.piece(), Piece::new(Player::White, PieceKind::Knight));
        assert_eq!(record.captured(), None);
        assert_eq!(record.castling_rook(), None);
        assert_eq!(record.castling(), CastleRights::ALL);
    }

    #[test]
    fn castling_rook() {
        let position = Position::try_from("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 3 20").unwrap();
        let (_, record) = position.play(&Move::from_uci("e8c8").unwrap()).unwrap();
        assert_eq!(record.castling_rook(), Some((Square::A8, Square::D8)));
        assert_eq!(record.halfmove_clock(), 3);
        assert_eq!(record.fullmove_counter().get(), 20);
    }

    #[test]
    fn capture() {
        let position =
            Position::try_from("rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 2")
                .unwrap();
        let (_, record) = position.play(&Move::from_uci("e4d5").unwrap()).unwrap();
        assert_eq!(
            record.captured(),
            Some((Square::D5, Piece::new(Player::Black, PieceKind::Pawn)))
        );
        assert_eq!(record.en_passant_square(), Some(Square::D6));
    }
}
