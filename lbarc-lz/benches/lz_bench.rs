//! Performance benchmarks for lbarc-lz
//!
//! This benchmark suite evaluates:
//! - Compression speed of LZSS and LZMIT across data patterns
//! - Decompression speed of the shared decoder
//! - Throughput for typical resource sizes (MB/s)

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use lbarc_core::CodecId;
use lbarc_lz::{compress, decompress};
use std::hint::black_box;

/// Type alias for pattern generator functions
type PatternGenerator = fn(usize) -> Vec<u8>;

/// Generate test data patterns for benchmarking
mod test_data {
    /// Uniform data - all bytes are the same (best compression)
    pub fn uniform(size: usize) -> Vec<u8> {
        vec![0xAA; size]
    }

    /// Random data - no patterns (worst compression)
    pub fn random(size: usize) -> Vec<u8> {
        let mut data = Vec::with_capacity(size);
        let mut seed: u64 = 0x123456789ABCDEF0;
        for _ in 0..size {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
            data.push((seed >> 32) as u8);
        }
        data
    }

    /// Text-like data - dialogue and script resources
    pub fn text_like(size: usize) -> Vec<u8> {
        let text = b"Twinsen, you must find the Sendell's ball. \
                     Dr. FunFrock's clones patrol Citadel Island. \
                     The ferry to Principal Island leaves from the harbour. ";
        text.iter().copied().cycle().take(size).collect()
    }

    /// Sprite-like data - runs of transparent pixels between colour spans
    pub fn sprite_like(size: usize) -> Vec<u8> {
        let mut data = Vec::with_capacity(size);
        let mut seed: u64 = 0xC0FFEE;
        while data.len() < size {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
            let run = 4 + (seed >> 60) as usize;
            data.extend(std::iter::repeat_n(0, run));
            for k in 0..run {
                data.push(((seed >> 40) as u8).wrapping_add(k as u8 & 3));
            }
        }
        data.truncate(size);
        data
    }
}

/// Typical resource sizes
mod data_sizes {
    pub const SMALL: usize = 2 * 1024; // 2 KB
    pub const MEDIUM: usize = 16 * 1024; // 16 KB
    pub const LARGE: usize = 128 * 1024; // 128 KB
}

const PATTERNS: [(&str, PatternGenerator); 4] = [
    ("uniform", test_data::uniform as PatternGenerator),
    ("random", test_data::random as PatternGenerator),
    ("text", test_data::text_like as PatternGenerator),
    ("sprite", test_data::sprite_like as PatternGenerator),
];

const CODECS: [(&str, CodecId); 2] = [("lzss", CodecId::Lzss), ("lzmit", CodecId::Lzmit)];

/// Benchmark compression speed for different data types
fn bench_compression_data_types(c: &mut Criterion) {
    let mut group = c.benchmark_group("compression_data_types");
    let size = data_sizes::MEDIUM;

    for (codec_name, codec) in CODECS {
        for (pattern_name, generator) in PATTERNS {
            let data = generator(size);
            let id = format!("{codec_name}/{pattern_name}");

            group.throughput(Throughput::Bytes(size as u64));
            group.bench_with_input(BenchmarkId::from_parameter(id), &data, |b, data| {
                b.iter(|| black_box(compress(codec, black_box(data))));
            });
        }
    }

    group.finish();
}

/// Benchmark compression speed for different input sizes
fn bench_compression_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("compression_sizes");

    let sizes = [
        ("2KB", data_sizes::SMALL),
        ("16KB", data_sizes::MEDIUM),
        ("128KB", data_sizes::LARGE),
    ];

    for (codec_name, codec) in CODECS {
        for (size_name, size) in sizes {
            let data = test_data::text_like(size);
            let id = format!("{codec_name}/{size_name}");

            group.throughput(Throughput::Bytes(size as u64));
            group.bench_with_input(BenchmarkId::from_parameter(id), &data, |b, data| {
                b.iter(|| black_box(compress(codec, black_box(data))));
            });
        }
    }

    group.finish();
}

/// Benchmark decompression speed for different data types
fn bench_decompression_data_types(c: &mut Criterion) {
    let mut group = c.benchmark_group("decompression_data_types");
    let size = data_sizes::MEDIUM;

    for (codec_name, codec) in CODECS {
        for (pattern_name, generator) in PATTERNS {
            let original = generator(size);
            let compressed = compress(codec, &original);
            let id = format!("{codec_name}/{pattern_name}");

            group.throughput(Throughput::Bytes(size as u64));
            group.bench_with_input(
                BenchmarkId::from_parameter(id),
                &compressed,
                |b, compressed| {
                    b.iter(|| {
                        let decompressed = decompress(codec, black_box(compressed), size).unwrap();
                        black_box(decompressed);
                    });
                },
            );
        }
    }

    group.finish();
}

/// Benchmark roundtrip (compress + decompress)
fn bench_roundtrip(c: &mut Criterion) {
    let mut group = c.benchmark_group("roundtrip");
    let data = test_data::sprite_like(data_sizes::MEDIUM);

    for (codec_name, codec) in CODECS {
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(codec_name), &data, |b, data| {
            b.iter(|| {
                let compressed = compress(codec, black_box(data));
                let decompressed = decompress(codec, &compressed, data.len()).unwrap();
                black_box(decompressed);
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_compression_data_types,
    bench_compression_sizes,
    bench_decompression_data_types,
    bench_roundtrip,
);
criterion_main!(benches);
