//! Criterion benchmarks of the operations the game runs on every turn.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use gambit::chess::position::Position;

const POSITIONS: [&str; 4] = [
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
    "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
];

fn positions() -> Vec<Position> {
    POSITIONS
        .iter()
        .map(|fen| Position::try_from(*fen).unwrap())
        .collect()
}

fn legal_moves_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("Legal moves");
    let positions = positions();
    group.throughput(criterion::Throughput::Elements(positions.len() as u64));
    group.bench_with_input(
        BenchmarkId::new("legal_moves", format!("{} positions", positions.len())),
        &positions,
        |b, positions| {
            b.iter(|| {
                for position in positions {
                    std::hint::black_box(position.legal_moves());
                }
            });
        },
    );
    group.finish();
}

fn play_and_reverse(positions: &[Position]) {
    for position in positions {
        for next_move in &position.legal_moves() {
            let (next, record) = position.play(next_move).unwrap();
            std::hint::black_box(next.reverse(&record));
        }
    }
}

fn undo_redo_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("Undo and redo");
    let positions = positions();
    group.bench_with_input(
        BenchmarkId::new("play_and_reverse", format!("{} positions", positions.len())),
        &positions,
        |b, positions| {
            b.iter(|| play_and_reverse(positions));
        },
    );
    group.finish();
}

fn fen_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("FEN");
    group.throughput(criterion::Throughput::Elements(POSITIONS.len() as u64));
    group.bench_function("parse_and_print", |b| {
        b.iter(|| {
            for fen in POSITIONS {
                let position = Position::try_from(std::hint::black_box(fen)).unwrap();
                std::hint::black_box(position.to_string());
            }
        });
    });
    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(10);
    targets = legal_moves_bench, undo_redo_bench, fen_bench
}
criterion_main!(benches);
