//! Benchmarks for the bit-generator engines.
//!
//! Measures MT19937 extraction and state cloning, byte throughput of every
//! engine through its native byte generator, and DRBG throughput across
//! request sizes.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use bitgen::random::mersenne_twister::STATE_WORDS;
use bitgen::{untemper, Bbs, BbsParams, Drbg, DrbgConfig, HashDrbg, HmacDrbg, Lcg, LcgPreset, Mt19937};

/// Seed used consistently across all deterministic engines.
const BENCH_SEED: u32 = 42;

/// Output size for the per-engine byte throughput group.
const BYTES_PER_ITER: usize = 1024;

/// DRBG limits that never force a reseed during a benchmark run.
fn unbounded_config() -> DrbgConfig {
    DrbgConfig {
        reseed_interval: u64::MAX,
        ..DrbgConfig::default()
    }
}

/// Benchmarks single `extract()` calls, including the amortized twist.
fn bench_mt_extract(c: &mut Criterion) {
    let mut mt = Mt19937::new(BENCH_SEED);
    c.bench_function("mt_extract", |b| {
        b.iter(|| black_box(mt.extract()));
    });
}

/// Benchmarks `untemper()` on a varying input.
fn bench_untemper(c: &mut Criterion) {
    let mut x: u32 = 0x1234_5678;
    c.bench_function("untemper", |b| {
        b.iter(|| {
            x = x.wrapping_add(0x9E37_79B9);
            black_box(untemper(black_box(x)))
        });
    });
}

/// Benchmarks rebuilding an MT19937 state from 624 observed outputs.
fn bench_mt_clone(c: &mut Criterion) {
    let observed = Mt19937::new(BENCH_SEED).generate_sequence(STATE_WORDS);
    c.bench_function("mt_from_outputs", |b| {
        b.iter(|| Mt19937::from_outputs(black_box(&observed)).unwrap());
    });
}

/// Benchmarks byte throughput of the deterministic engines.
fn bench_engine_bytes(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine_bytes");
    group.throughput(Throughput::Bytes(BYTES_PER_ITER as u64));

    let mut lcg = Lcg::with_preset(BENCH_SEED as u64, LcgPreset::Glibc);
    group.bench_function("lcg_glibc", |b| {
        b.iter(|| black_box(lcg.generate_bytes(BYTES_PER_ITER)));
    });

    let mut mt = Mt19937::new(BENCH_SEED);
    group.bench_function("mt19937", |b| {
        b.iter(|| black_box(mt.generate_bytes(BYTES_PER_ITER)));
    });

    let mut bbs = Bbs::with_seed(123_456, BbsParams::default()).unwrap();
    group.bench_function("blum_blum_shub", |b| {
        b.iter(|| black_box(bbs.generate_bytes(BYTES_PER_ITER)));
    });

    group.finish();
}

/// Benchmarks DRBG `generate()` across request sizes.
///
/// Small requests are dominated by the post-generate state update, large
/// ones by the output loop.
fn bench_drbg_generate(c: &mut Criterion) {
    let sizes: &[usize] = &[32, 1024, 65_536];
    let mut group = c.benchmark_group("drbg_generate");

    for &size in sizes {
        group.throughput(Throughput::Bytes(size as u64));

        let mut hmac = HmacDrbg::with_config(&[0x11; 32], None, None, unbounded_config()).unwrap();
        group.bench_with_input(BenchmarkId::new("hmac_sha256", size), &size, |b, &n| {
            b.iter(|| black_box(hmac.generate(n, None).unwrap()));
        });

        let mut hash = HashDrbg::with_config(&[0x11; 32], None, None, unbounded_config()).unwrap();
        group.bench_with_input(BenchmarkId::new("hash_sha256", size), &size, |b, &n| {
            b.iter(|| black_box(hash.generate(n, None).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_mt_extract,
    bench_untemper,
    bench_mt_clone,
    bench_engine_bytes,
    bench_drbg_generate,
);
criterion_main!(benches);
