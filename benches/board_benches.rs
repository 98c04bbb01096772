use std::hint::black_box;

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use tessera::prelude::*;

fn setup_position() -> Position {
    Position::new()
}

fn apply_undo_cycle(c: &mut Criterion) {
    let mut pos = setup_position();
    let from: Square = "e2".parse().unwrap();
    let to: Square = "e4".parse().unwrap();
    let m = pos.move_from_parts(from, to, None).unwrap();

    c.bench_function("apply_undo_cycle", |b| {
        b.iter(|| {
            pos.apply_move(m);
            pos.undo_move(m);

            black_box(&pos);
        });
    });
}

fn legal_move_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("legal_moves");

    for (name, fen) in [("startpos", START_FEN), ("kiwipete", KIWIPETE)] {
        let pos = Position::from_fen(fen).unwrap();
        group.bench_function(name, |b| {
            b.iter(|| black_box(move_gen::generate_legal_moves(&pos, &ATTACK_TABLES)))
        });
    }

    group.bench_function("cached_after_clone", |b| {
        b.iter_batched(
            || Position::from_fen(KIWIPETE).unwrap(),
            |pos| black_box(pos.legal_moves().len()),
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

fn perft_kiwipete(c: &mut Criterion) {
    let mut pos = Position::from_fen(KIWIPETE).unwrap();
    c.bench_function("perft_kiwipete_depth_2", |b| {
        b.iter(|| black_box(perft(&mut pos, 2)))
    });
}

criterion_group!(benches, apply_undo_cycle, legal_move_generation, perft_kiwipete);
criterion_main!(benches);
