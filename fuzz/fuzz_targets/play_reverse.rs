#![no_main]
use gambit::chess::position::Position;
use libfuzzer_sys::fuzz_target;
use pretty_assertions::assert_eq;

// Every byte picks one of the legal moves in the current position.
fuzz_target!(|data: &[u8]| {
    let mut position = Position::starting();
    let mut records = Vec::new();
    for &byte in data {
        let moves = position.legal_moves();
        if moves.is_empty() {
            break;
        }
        let next_move = moves[usize::from(byte) % moves.len()];
        let (next, record) = position.play(&next_move).unwrap();
        assert_eq!(position.replay(&record), next);
        records.push(record);
        position = next;
    }
    while let Some(record) = records.pop() {
        position = position.reverse(&record);
    }
    assert_eq!(position, Position::starting());
});
