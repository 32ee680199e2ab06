use criterion::{criterion_group, criterion_main, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sim_core::{CompanyId, GameConfig, GameWorld};

fn bench_turns(c: &mut Criterion) {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let config = GameConfig {
        companies: 10,
        ..GameConfig::default()
    };
    let world = GameWorld::new(config, &mut rng).unwrap();
    let ids: Vec<CompanyId> = world.companies.keys().cloned().collect();

    c.bench_function("ai 10 company turns", |b| {
        b.iter(|| {
            let mut w = world.clone();
            let mut r = rng.clone();
            for id in &ids {
                sim_ai::take_turn(&mut w, id, &mut r).unwrap();
            }
        })
    });
}

criterion_group!(benches, bench_turns);
criterion_main!(benches);
