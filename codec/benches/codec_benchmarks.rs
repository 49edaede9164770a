//
// Copyright 2026 The telscrub Authors. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Benchmarks for the scrubber and framing codec

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use telscrub_codec::{ScrubCodec, consts, scrub};
use tokio_util::bytes::BytesMut;
use tokio_util::codec::Decoder;

// Benchmark scrubbing plain lines with no negotiation content
fn bench_scrub_plain(c: &mut Criterion) {
    let mut group = c.benchmark_group("scrub_plain");

    for size in [16, 128, 512, 4096].iter() {
        group.throughput(Throughput::Bytes(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let mut line = vec![b'a'; size];
            line.push(consts::CR);
            line.push(consts::LF);

            b.iter(|| {
                black_box(scrub::scrub_line(black_box(&line)));
            });
        });
    }
    group.finish();
}

// Benchmark scrubbing lines peppered with negotiation sequences
fn bench_scrub_negotiation_heavy(c: &mut Criterion) {
    let mut group = c.benchmark_group("scrub_negotiation_heavy");

    for size in [128, 512, 4096].iter() {
        group.throughput(Throughput::Bytes(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let mut line = Vec::with_capacity(size + 2);
            while line.len() < size {
                line.extend_from_slice(b"data");
                line.extend_from_slice(&[consts::IAC, consts::DO, consts::option::ECHO]);
            }
            line.push(consts::CR);
            line.push(consts::LF);

            b.iter(|| {
                black_box(scrub::scrub_line(black_box(&line)));
            });
        });
    }
    group.finish();
}

// Benchmark escaping outbound payloads
fn bench_escape_iac(c: &mut Criterion) {
    let mut group = c.benchmark_group("escape_iac");

    for size in [16, 512, 4096].iter() {
        group.throughput(Throughput::Bytes(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            // Every eighth byte is an IAC
            let payload: Vec<u8> = (0..size)
                .map(|i| if i % 8 == 0 { consts::IAC } else { b'x' })
                .collect();

            b.iter(|| {
                black_box(scrub::escape_iac(black_box(&payload)));
            });
        });
    }
    group.finish();
}

// Benchmark decoding buffered lines through the framing codec
fn bench_decode_lines(c: &mut Criterion) {
    c.bench_function("decode_lines", |b| {
        let chunk: Vec<u8> = b"the quick brown fox\r\n".repeat(64);
        let mut codec = ScrubCodec::new();

        b.iter(|| {
            let mut buffer = BytesMut::from(black_box(chunk.as_slice()));
            let mut count = 0;
            while let Ok(Some(_)) = codec.decode(&mut buffer) {
                count += 1;
            }
            black_box(count);
        });
    });
}

criterion_group!(
    benches,
    bench_scrub_plain,
    bench_scrub_negotiation_heavy,
    bench_escape_iac,
    bench_decode_lines
);
criterion_main!(benches);
