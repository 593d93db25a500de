//! Performance benchmarks for the maze simulation

use asteroid_maze::genome::{Evolver, Genome};
use asteroid_maze::spawn::{place_obstacle, AnnealingSchedule};
use asteroid_maze::{Config, Direction, InputState, MapLayout, Session, Tile, TileGrid};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn benchmark_session_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("session_step");

    for obstacles in [3, 16, 64].iter() {
        let mut config = Config::default();
        config.world.obstacle_count = *obstacles;
        config.outcome.capture_radius = 0.0;

        let mut session = Session::new_with_seed(config, &MapLayout::bordered(40, 40), 42).unwrap();
        let input = InputState::holding(Some(Direction::Down));

        // Warm up
        session.run(10, &input);

        group.bench_with_input(BenchmarkId::new("obstacles", obstacles), obstacles, |b, _| {
            b.iter(|| {
                session.step(black_box(&input));
            });
        });
    }

    group.finish();
}

fn benchmark_placement(c: &mut Criterion) {
    let mut group = c.benchmark_group("placement");
    let schedule = AnnealingSchedule::default();

    for size in [16, 64].iter() {
        let grid = TileGrid::from_layout(&MapLayout::bordered(*size, *size)).unwrap();
        let existing: Vec<Tile> = (1..8).map(|i| Tile::new(i, i)).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        group.bench_with_input(BenchmarkId::new("grid", size), size, |b, _| {
            b.iter(|| place_obstacle(&grid, black_box(&existing), Tile::new(1, 1), &schedule, &mut rng));
        });
    }

    group.finish();
}

fn benchmark_evolve(c: &mut Criterion) {
    let evolver = Evolver::default();
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let genome = Genome::random(&mut rng);

    c.bench_function("genome_evolve", |b| {
        b.iter(|| evolver.evolve(black_box(&genome), &mut rng));
    });
}

criterion_group!(benches, benchmark_session_step, benchmark_placement, benchmark_evolve);
criterion_main!(benches);
