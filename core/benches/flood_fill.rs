use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use mineclear_core::*;

fn open_board(c: &mut Criterion) {
    let grid = MineGrid::from_mine_coords(255, 255, &[(254, 254)]).unwrap();

    c.bench_function("flood fill 255x255", |b| {
        b.iter_batched(
            || RevealEngine::with_layout(grid.clone(), NoopTicker, 0),
            |mut engine| engine.reveal((0, 0), &mut ()).unwrap(),
            BatchSize::LargeInput,
        )
    });
}

fn default_density(c: &mut Criterion) {
    let grid = GameConfig::new(64, 64, None).build_grid().unwrap();

    c.bench_function("first click 64x64 default density", |b| {
        let mut seed = 0;
        b.iter_batched(
            || {
                seed += 1;
                RevealEngine::new(grid.clone(), NoopTicker, seed)
            },
            |mut engine| engine.reveal((32, 32), &mut ()).unwrap(),
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, open_board, default_density);
criterion_main!(benches);
