use criterion::{criterion_group, criterion_main, Criterion};
use ndarray::Array2;
use offprep::perturb::{add_noise, occlude};
use offprep::Geometry;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn perturbation_benchmark(c: &mut Criterion) {
    const N: usize = 100000;

    let geometry = Geometry::point_cloud(Array2::from_shape_fn((N, 3), |(i, c)| {
        ((i * 7 + c * 13) % 1000) as f32 * 0.001
    }))
    .unwrap();
    let mut rng = StdRng::seed_from_u64(5);

    c.bench_function("occlusion", |b| {
        b.iter(|| occlude(&geometry, 0.3, &mut rng).unwrap());
    });

    c.bench_function("gaussian noise", |b| {
        b.iter(|| add_noise(&geometry, 0.01, &mut rng).unwrap());
    });
}

criterion_group!(benches, perturbation_benchmark);
criterion_main!(benches);
