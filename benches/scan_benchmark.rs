use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io::Write;
use tempfile::NamedTempFile;

use dictcol::DictionaryCodec;

/// Helper to build a codec over a generated corpus
fn build_codec(rows: usize, distinct: usize) -> DictionaryCodec {
    let mut rng = StdRng::seed_from_u64(1234);
    let alphabet: Vec<String> = (0..distinct).map(|i| format!("value_{:05}", i)).collect();

    let mut file = NamedTempFile::new().unwrap();
    for _ in 0..rows {
        writeln!(file, "{}", alphabet[rng.gen_range(0..alphabet.len())]).unwrap();
    }
    file.flush().unwrap();

    let mut codec = DictionaryCodec::new();
    codec.encode(file.path(), 4).unwrap();
    codec
}

fn bench_exact_match(c: &mut Criterion) {
    let codec = build_codec(1_000_000, 1_000);
    let target = "value_00042";

    let mut group = c.benchmark_group("exact_match");
    group.bench_function("baseline", |b| {
        b.iter(|| codec.find_exact_baseline(black_box(target)))
    });
    group.bench_function("scalar", |b| {
        b.iter(|| codec.find_exact_scalar(black_box(target)))
    });
    group.bench_function("simd", |b| {
        b.iter(|| codec.find_exact(black_box(target)))
    });
    group.finish();
}

fn bench_prefix_match(c: &mut Criterion) {
    let codec = build_codec(1_000_000, 1_000);

    let mut group = c.benchmark_group("prefix_match");
    for prefix in ["value_00042", "value_000", "value_0"] {
        group.bench_with_input(
            BenchmarkId::new("baseline", prefix),
            &prefix,
            |b, prefix| b.iter(|| codec.find_prefix_baseline(black_box(prefix))),
        );
        group.bench_with_input(BenchmarkId::new("simd", prefix), &prefix, |b, prefix| {
            b.iter(|| codec.find_prefix(black_box(prefix)))
        });
    }
    group.finish();
}

fn bench_encode_threads(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(99);
    let alphabet: Vec<String> = (0..500).map(|i| format!("term_{:04}", i)).collect();
    let mut file = NamedTempFile::new().unwrap();
    for _ in 0..200_000 {
        writeln!(file, "{}", alphabet[rng.gen_range(0..alphabet.len())]).unwrap();
    }
    file.flush().unwrap();
    let path = file.path().to_path_buf();

    let mut group = c.benchmark_group("encode");
    group.sample_size(10);
    for threads in [1usize, 2, 4, 8] {
        group.bench_with_input(
            BenchmarkId::from_parameter(threads),
            &threads,
            |b, &threads| {
                b.iter(|| {
                    let mut codec = DictionaryCodec::new();
                    codec.encode(&path, threads).unwrap();
                    black_box(codec.dictionary_size())
                })
            },
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_exact_match,
    bench_prefix_match,
    bench_encode_threads
);
criterion_main!(benches);
