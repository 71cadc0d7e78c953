use criterion::{criterion_group, criterion_main, Criterion};
use num_complex::Complex64;
use std::hint::black_box;
use zbessel::*;

fn bench_single_values(c: &mut Criterion) {
    let mut group = c.benchmark_group("single");
    let near = Complex64::new(1.5, 0.5);
    let far = Complex64::new(40.0, 15.0);

    group.bench_function("besselj_small_z", |b| b.iter(|| besselj(black_box(0.3), black_box(near))));
    group.bench_function("besselj_large_z", |b| b.iter(|| besselj(black_box(0.3), black_box(far))));
    group.bench_function("besselk_small_z", |b| b.iter(|| besselk(black_box(1.0), black_box(near))));
    group.bench_function("besselk_left_half_plane", |b| {
        b.iter(|| besselk(black_box(1.0), black_box(-far)))
    });
    group.bench_function("bessely", |b| b.iter(|| bessely(black_box(2.5), black_box(far))));
    group.bench_function("besseli_large_order", |b| {
        b.iter(|| besseli(black_box(120.0), black_box(far)))
    });
    group.bench_function("airy", |b| b.iter(|| airy(black_box(far))));
    group.bench_function("biry", |b| b.iter(|| biry(black_box(near))));

    group.finish();
}

fn bench_runs(c: &mut Criterion) {
    let mut group = c.benchmark_group("runs");
    let z = Complex64::new(8.0, 3.0);

    for n in [4usize, 32] {
        group.bench_function(format!("besselj_into_{n}"), |b| {
            let mut y = vec![Complex64::new(0.0, 0.0); n];
            b.iter(|| besselj_into(black_box(0.0), black_box(z), Scaling::Unscaled, &mut y))
        });
        group.bench_function(format!("besselk_into_{n}"), |b| {
            let mut y = vec![Complex64::new(0.0, 0.0); n];
            b.iter(|| besselk_into(black_box(0.0), black_box(z), Scaling::Exponential, &mut y))
        });
        group.bench_function(format!("bessely_into_{n}"), |b| {
            let mut y = vec![Complex64::new(0.0, 0.0); n];
            b.iter(|| bessely_into(black_box(0.0), black_box(z), Scaling::Unscaled, &mut y))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_single_values, bench_runs);
criterion_main!(benches);
