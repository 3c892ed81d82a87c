//! Benchmarks for kriging training and prediction

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use terrain_kriging::{DVec2, DVec3, Kriging, VariogramModel};

fn create_samples(count: usize) -> Vec<DVec3> {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    (0..count)
        .map(|_| {
            let (x, y) = (rng.gen_range(0.0..1000.0), rng.gen_range(0.0..1000.0));
            DVec3::new(x, y, 100.0 + 0.02 * x + 10.0 * (y / 150.0).sin())
        })
        .collect()
}

fn bench_train(c: &mut Criterion) {
    let mut group = c.benchmark_group("kriging/train");
    group.sample_size(10);
    for size in [50, 200, 500] {
        let samples = create_samples(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                let mut kriging = Kriging::new(black_box(samples.clone()));
                kriging.train(VariogramModel::Exponential, 0.0, 100.0).unwrap();
                kriging
            })
        });
    }
    group.finish();
}

fn bench_predict_many(c: &mut Criterion) {
    let mut group = c.benchmark_group("kriging/predict_many");
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let queries: Vec<DVec2> = (0..10_000)
        .map(|_| DVec2::new(rng.gen_range(0.0..1000.0), rng.gen_range(0.0..1000.0)))
        .collect();
    for size in [50, 200, 500] {
        let mut kriging = Kriging::new(create_samples(size));
        kriging.train(VariogramModel::Exponential, 0.0, 100.0).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| kriging.predict_many(black_box(&queries)).unwrap())
        });
    }
    group.finish();
}

fn bench_contour(c: &mut Criterion) {
    let mut group = c.benchmark_group("kriging/contour");
    group.sample_size(10);
    let mut kriging = Kriging::new(create_samples(200));
    kriging.train(VariogramModel::Spherical, 0.0, 100.0).unwrap();
    for size in [64, 128, 256] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| kriging.contour(size, size).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_train, bench_predict_many, bench_contour);
criterion_main!(benches);
