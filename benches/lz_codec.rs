//! Benchmark for the LZ-string-style codec, the hot path of assembling
//! and decoding beacon payloads.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use jsd_oneshot::codec::lz;

/// Generates a JSON-ish payload of roughly `size` bytes with enough
/// repetition for the dictionary to kick in, similar to the fingerprint
/// document's array-of-strings shape.
fn generate_payload(size: usize) -> String {
    let mut out = String::with_capacity(size);
    while out.len() < size {
        out.push_str(r#"{"t":1700000000,"lhr":"about:blank","api":false,"payload":{"0":["win","nav"]}},"#);
    }
    out.truncate(size);
    out
}

fn benchmark_compress(c: &mut Criterion) {
    let mut group = c.benchmark_group("compress_to_base64");
    for size in [256, 4096, 65536].iter() {
        let payload = generate_payload(*size);
        group.bench_with_input(BenchmarkId::new("size", size), &payload, |b, payload| {
            b.iter(|| lz::compress_to_base64(payload))
        });
    }
    group.finish();
}

fn benchmark_round_trip(c: &mut Criterion) {
    let mut group = c.benchmark_group("compress_decompress_round_trip");
    for size in [256, 4096, 65536].iter() {
        let payload = generate_payload(*size);
        let compressed = lz::compress_to_base64(&payload);
        group.bench_with_input(BenchmarkId::new("size", size), &compressed, |b, compressed| {
            b.iter(|| lz::decompress_from_base64(compressed))
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_compress, benchmark_round_trip);
criterion_main!(benches);
