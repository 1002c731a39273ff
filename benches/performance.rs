// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Performance benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::fmt::Write as _;
use stl_dimensions::{measure_bytes, GeometryAccumulator, Triangle, TriangleSource};

/// Triangulated height field with `n * n * 2` facets
fn grid(n: usize) -> Vec<Triangle> {
    let height = |x: usize, y: usize| ((x * 7 + y * 13) % 17) as f32 * 0.1;
    let point = |x: usize, y: usize| [x as f32, y as f32, height(x, y)];

    let mut triangles = Vec::with_capacity(n * n * 2);
    for y in 0..n {
        for x in 0..n {
            let (a, b, c, d) = (point(x, y), point(x + 1, y), point(x + 1, y + 1), point(x, y + 1));
            triangles.push(Triangle::from_arrays([0.0, 0.0, 1.0], [a, b, c]));
            triangles.push(Triangle::from_arrays([0.0, 0.0, 1.0], [a, c, d]));
        }
    }
    triangles
}

fn to_binary(triangles: &[Triangle]) -> Vec<u8> {
    let mut bytes = vec![0u8; 80];
    bytes.extend_from_slice(&(triangles.len() as u32).to_le_bytes());
    for t in triangles {
        let values = t.normal.iter().chain(t.vertices.iter().flat_map(|v| v.coords.iter()));
        for value in values {
            bytes.extend_from_slice(&value.to_le_bytes());
        }
        bytes.extend_from_slice(&[0, 0]);
    }
    bytes
}

fn to_ascii(triangles: &[Triangle]) -> Vec<u8> {
    let mut text = String::from("solid bench\n");
    for t in triangles {
        let _ = writeln!(text, "facet normal {} {} {}", t.normal.x, t.normal.y, t.normal.z);
        text.push_str("outer loop\n");
        for v in &t.vertices {
            let _ = writeln!(text, "vertex {} {} {}", v.x, v.y, v.z);
        }
        text.push_str("endloop\nendfacet\n");
    }
    text.push_str("endsolid bench\n");
    text.into_bytes()
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");

    for n in [32usize, 128] {
        let triangles = grid(n);
        let binary = to_binary(&triangles);
        let ascii = to_ascii(&triangles);

        group.throughput(Throughput::Elements(triangles.len() as u64));
        group.bench_with_input(BenchmarkId::new("binary", triangles.len()), &binary, |b, bytes| {
            b.iter(|| {
                TriangleSource::new(black_box(bytes.as_slice()))
                    .unwrap()
                    .filter(|t| t.is_ok())
                    .count()
            });
        });
        group.bench_with_input(BenchmarkId::new("ascii", triangles.len()), &ascii, |b, bytes| {
            b.iter(|| {
                TriangleSource::new(black_box(bytes.as_slice()))
                    .unwrap()
                    .filter(|t| t.is_ok())
                    .count()
            });
        });
    }

    group.finish();
}

fn bench_accumulate(c: &mut Criterion) {
    let triangles = grid(256);

    c.bench_function("accumulate_131k", |b| {
        b.iter(|| {
            let acc: GeometryAccumulator = black_box(&triangles).iter().collect();
            acc.signed_volume()
        });
    });
}

fn bench_measure(c: &mut Criterion) {
    let binary = to_binary(&grid(128));

    c.bench_function("measure_binary_32k", |b| {
        b.iter(|| measure_bytes(black_box(&binary)));
    });
}

criterion_group!(benches, bench_decode, bench_accumulate, bench_measure);
criterion_main!(benches);
