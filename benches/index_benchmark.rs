//! Indexing and range-loading benchmarks.
//!
//! Synthetic sources of a few million bytes, so the numbers track the cost
//! per byte of the LF scan plus chunk validation, and the cost of loading
//! one viewport's worth of lines.
//!
//! Run with: cargo bench --bench index_benchmark

#![allow(missing_docs)] // criterion macros generate undocumented items

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::sync::Arc;
use txtview::document::Document;
use txtview::index::{build_index, DEFAULT_CHUNK_SIZE};
use txtview::model::TextEncoding;
use txtview::source::{ByteSource, MemorySource};

const LINES: usize = 100_000;

fn ascii_source() -> MemorySource {
    let text: String = (0..LINES)
        .map(|i| format!("{:>6} the quick brown fox jumps over the lazy dog\n", i))
        .collect();
    MemorySource::new("ascii.txt", text.into_bytes())
}

fn cjk_source() -> MemorySource {
    let text: String = (0..LINES)
        .map(|i| format!("第{}行 中文文本用于测试索引性能\n", i))
        .collect();
    MemorySource::new("cjk.txt", text.into_bytes())
}

fn bench_build_index(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_index");

    for (label, source) in [("ascii", ascii_source()), ("cjk", cjk_source())] {
        group.throughput(Throughput::Bytes(source.len()));
        for chunk in [64 * 1024, DEFAULT_CHUNK_SIZE] {
            group.bench_with_input(
                BenchmarkId::new(label, chunk),
                &chunk,
                |b, &chunk| {
                    b.iter(|| build_index(black_box(&source), chunk, TextEncoding::utf8()))
                },
            );
        }
    }

    group.finish();
}

fn bench_load_range(c: &mut Criterion) {
    let source: Arc<dyn ByteSource> = Arc::new(ascii_source());
    let mut group = c.benchmark_group("load_range");

    for buffer in [50usize, 500] {
        group.bench_with_input(BenchmarkId::from_parameter(buffer), &buffer, |b, &buffer| {
            b.iter_batched(
                || Document::open(Arc::clone(&source), DEFAULT_CHUNK_SIZE, TextEncoding::utf8())
                    .expect("synthetic source indexes"),
                |mut doc| {
                    let middle = LINES / 2;
                    doc.load_range(middle - buffer, middle + 40 + buffer)
                },
                criterion::BatchSize::LargeInput,
            )
        });
    }

    group.finish();
}

criterion_group!(benches, bench_build_index, bench_load_range);
criterion_main!(benches);
