use criterion::{criterion_group, criterion_main, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::hint::black_box;

use sss::math::{evaluate, interpolate};
use sss::{Field, Secrets, Settings};

pub fn bench_tables(c: &mut Criterion) {
    c.bench_function("tables GF(2^8)", |b| b.iter(|| Field::new(black_box(8), 29)));
    c.bench_function("tables GF(2^16)", |b| b.iter(|| Field::new(black_box(16), 45)));
}

pub fn bench_arith(c: &mut Criterion) {
    let field = Field::with_bits(8).unwrap();
    let coeffs = [97, 13, 200, 7, 255];
    let xs = [1, 2, 3, 4, 5];
    let ys: Vec<_> = xs
        .iter()
        .map(|&x| evaluate(&field, x, &coeffs).unwrap())
        .collect();

    c.bench_function("mul GF(2^8)", |b| {
        b.iter(|| field.mul(black_box(0x53), black_box(0xca)))
    });
    c.bench_function("horner degree 4", |b| {
        b.iter(|| evaluate(&field, black_box(7), &coeffs))
    });
    c.bench_function("lagrange 5 points", |b| {
        b.iter(|| interpolate(&field, black_box(0), &xs, &ys))
    });
}

pub fn bench_secrets(c: &mut Criterion) {
    let secrets = Secrets::new(Settings::default()).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let secret = "00112233445566778899aabbccddeeff";
    let shares = secrets.share_hex(secret, 10, 5, &mut rng).unwrap();

    c.bench_function("split 128 bits 5 of 10", |b| {
        b.iter(|| secrets.share_hex(black_box(secret), 10, 5, &mut rng))
    });
    c.bench_function("combine 128 bits 5 of 10", |b| {
        b.iter(|| secrets.combine_hex(black_box(&shares[..5])))
    });
}

criterion_group!(benches, bench_tables, bench_arith, bench_secrets);
criterion_main!(benches);
