use gambit::chess::core::{Move, Player, Square};
use gambit::chess::position::{GameResult, Position, Termination};
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

fn legal_position(input: &str) -> Position {
    let position = Position::from_fen(input)
        .unwrap_or_else(|e| panic!("we are parsing valid position {input}: {e}"));
    assert_eq!(position.to_string(), input);
    position
}

#[test]
#[allow(unused_results)]
fn basic_positions() {
    legal_position("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
    legal_position("2r3r1/p3k3/1p3pp1/1B5p/5P2/2P1p1P1/PP4KP/3R4 w - - 0 34");
    legal_position("rnbqk1nr/p3bppp/1p2p3/2ppP3/3P4/P7/1PP1NPPP/R1BQKBNR w KQkq c6 0 7");
    legal_position("r2qkb1r/1pp1pp1p/p1np1np1/1B6/3PP1b1/2N1BN2/PPP2PPP/R2QK2R w KQkq - 0 7");
    legal_position("r3k3/5p2/2p5/p7/P3r3/2N2n2/1PP2P2/2K2B2 w q - 0 24");
    legal_position("rnbq1rk1/pp4pp/1b1ppn2/2p2p2/2PP4/1P2PN2/PB2BPPP/RN1Q1RK1 w - c6 0 9");
}

#[test]
#[should_panic(expected = "White should have exactly one king")]
fn no_white_king() {
    let _ = Position::try_from("3k4/8/8/8/8/8/8/8 w - - 0 1").unwrap();
}

#[test]
#[should_panic(expected = "Black can not have more than 8 pawns")]
fn too_many_black_pawns() {
    let _ = Position::try_from("rnbqkbnr/pppppppp/p7/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1")
        .unwrap();
}

#[test]
#[should_panic(expected = "pawns can not be placed on backranks")]
fn pawns_on_backranks() {
    let _ = Position::try_from("3kr3/8/8/8/8/5Q2/8/1KP5 w - - 0 1").unwrap();
}

#[test]
#[should_panic(expected = "en passant square e4 is on the wrong rank")]
fn wrong_en_passant_rank() {
    let _ = Position::try_from("rnbqkbnr/pppppppp/8/4P3/8/8/PPPP1PPP/RNBQKBNR b KQkq e4 0 1")
        .unwrap();
}

#[test]
#[should_panic(expected = "incorrect FEN: missing side to move")]
fn missing_side_to_move() {
    let _ = Position::try_from("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR").unwrap();
}

/// Counts leaf nodes of the move tree, checking on the way that every move is
/// reversed exactly.
fn perft(position: &Position, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }
    position
        .legal_moves()
        .iter()
        .map(|next_move| {
            let (next, record) = position.play(next_move).unwrap();
            assert_eq!(&next.reverse(&record), position, "{next_move}");
            perft(&next, depth - 1)
        })
        .sum()
}

// Expected values are from https://www.chessprogramming.org/Perft_Results
#[test]
fn perft_starting_position() {
    let position = Position::starting();
    assert_eq!(perft(&position, 1), 20);
    assert_eq!(perft(&position, 2), 400);
    assert_eq!(perft(&position, 3), 8902);
}

#[test]
fn perft_kiwipete() {
    let position =
        legal_position("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
    assert_eq!(perft(&position, 1), 48);
    assert_eq!(perft(&position, 2), 2039);
}

#[test]
fn perft_en_passant_and_pins() {
    let position = legal_position("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1");
    assert_eq!(perft(&position, 1), 14);
    assert_eq!(perft(&position, 2), 191);
    assert_eq!(perft(&position, 3), 2812);
}

#[test]
fn perft_promotions() {
    let position =
        legal_position("r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1");
    assert_eq!(perft(&position, 1), 6);
    assert_eq!(perft(&position, 2), 264);
    assert_eq!(perft(&position, 3), 9467);
}

#[test]
fn random_games_round_trip() {
    let mut rng = StdRng::seed_from_u64(2024);
    for _ in 0..20 {
        let mut played = vec![Position::starting()];
        let mut records = Vec::new();
        while records.len() < 120 {
            let position = played.last().unwrap();
            let moves = position.legal_moves();
            let Some(next_move) = moves.choose(&mut rng) else {
                assert!(position.is_terminal());
                break;
            };
            let (next, record) = position.play(next_move).unwrap();
            assert_eq!(position.replay(&record), next);
            assert_eq!(
                Position::try_from(next.to_string().as_str()).unwrap(),
                next,
                "FEN of a reachable position parses back"
            );
            records.push(record);
            played.push(next);
            if played.last().unwrap().is_terminal() {
                break;
            }
        }
        // Walk all the way back to the starting position.
        let mut position = played.pop().unwrap();
        while let Some(record) = records.pop() {
            position = position.reverse(&record);
            assert_eq!(Some(&position), played.last());
            let _ = played.pop();
        }
        assert_eq!(position, Position::starting());
    }
}

#[test]
fn fools_mate() {
    let mut position = Position::starting();
    for uci in ["f2f3", "e7e5", "g2g4"] {
        position = position.apply(&Move::from_uci(uci).unwrap()).unwrap();
        assert!(!position.is_terminal());
    }
    position = position.apply(&Move::from_uci("d8h4").unwrap()).unwrap();
    assert!(position.is_terminal());
    assert_eq!(position.termination(), Some(Termination::Checkmate));
    assert_eq!(position.result(), GameResult::Win(Player::Black));
    assert!(position.is_in_check(Player::White));
    assert_eq!(position.king(Player::White), Some(Square::E1));
    assert!(position.legal_moves().is_empty());
}

#[test]
fn promotion_choice() {
    let position = legal_position("8/4P1k1/8/8/8/8/6K1/8 w - - 0 1");
    let destinations = position.legal_destinations(Square::E7);
    assert_eq!(destinations, vec![Square::E8]);
    let promotions: Vec<String> = position
        .legal_moves()
        .iter()
        .filter(|m| m.from() == Square::E7)
        .map(ToString::to_string)
        .collect();
    assert_eq!(promotions.len(), 4);
    for uci in ["e7e8q", "e7e8r", "e7e8b", "e7e8n"] {
        assert!(promotions.contains(&uci.to_string()), "{uci}");
    }
    let bare = Move::from_uci("e7e8").unwrap();
    assert!(bare.needs_promotion(&position));
    assert_eq!(bare.with_default_promotion(&position).to_string(), "e7e8q");
    assert!(!Move::from_uci("g2g3").unwrap().needs_promotion(&position));
}
