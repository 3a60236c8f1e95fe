// benches/crypto_bench.rs
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use lattice_steps::core::{
    crypto::{
        ggh::{generate_keys, Ggh, GghParams},
        sampling::EngineRng,
    },
    reduction::gauss_reduce,
};

fn bench_key_generation(c: &mut Criterion) {
    let params = GghParams::default();
    let mut group = c.benchmark_group("ggh_keygen");
    for n in [2usize, 4, 8] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            let mut rng = EngineRng::from_seed(1);
            b.iter(|| generate_keys(&params, black_box(n), &mut rng))
        });
    }
    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut rng = EngineRng::from_seed(2);
    let state = Ggh::default().initialize(4, &mut rng).unwrap();

    c.bench_function("ggh_decode_dim4", |b| b.iter(|| Ggh::decode(black_box(&state))));
}

fn bench_gauss(c: &mut Criterion) {
    c.bench_function("gauss_reduce_textbook", |b| {
        b.iter(|| gauss_reduce(black_box(&[66586820, 65354729]), black_box(&[6513996, 6393464])))
    });
}

criterion_group!(crypto_benches, bench_key_generation, bench_decode, bench_gauss);
criterion_main!(crypto_benches);
