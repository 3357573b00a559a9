//! Benchmarks for Conduit Cable Topology
//!
//! Measures performance of:
//! - Connection refresh on dense grids
//! - Neighbor queries
//! - The can-connect predicate

use conduit_topology::{ConnectivityGraph, Pos, Side, SideSet};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

/// Build a filled cube of cables with edge length `n`, fully refreshed.
fn cube(n: i64) -> ConnectivityGraph {
    let mut graph = ConnectivityGraph::new();
    for x in 0..n {
        for y in 0..n {
            for z in 0..n {
                graph.insert(Pos::new(x, y, z), SideSet::ALL);
            }
        }
    }
    let positions: Vec<Pos> = graph.positions().collect();
    for pos in positions {
        graph.refresh(pos);
    }
    graph
}

/// Benchmark refreshing a single node surrounded by cables
fn bench_refresh(c: &mut Criterion) {
    let mut group = c.benchmark_group("refresh");

    for &n in &[2i64, 4, 8, 16] {
        let mut graph = cube(n);
        let center = Pos::new(n / 2, n / 2, n / 2);
        group.throughput(Throughput::Elements(6));
        group.bench_with_input(BenchmarkId::from_parameter(n), &center, |b, &pos| {
            b.iter(|| graph.refresh(black_box(pos)))
        });
    }
    group.finish();
}

/// Benchmark refreshing all neighbours of a node
fn bench_refresh_around(c: &mut Criterion) {
    let mut group = c.benchmark_group("refresh_around");

    for &n in &[4i64, 8, 16] {
        let mut graph = cube(n);
        let center = Pos::new(n / 2, n / 2, n / 2);
        group.throughput(Throughput::Elements(36)); // 6 nodes x 6 sides
        group.bench_with_input(BenchmarkId::from_parameter(n), &center, |b, &pos| {
            b.iter(|| graph.refresh_around(black_box(pos)))
        });
    }
    group.finish();
}

/// Benchmark active-edge neighbor queries
fn bench_neighbors(c: &mut Criterion) {
    let mut group = c.benchmark_group("neighbors");

    for &n in &[2i64, 4, 8, 16] {
        let graph = cube(n);
        let center = Pos::new(n / 2, n / 2, n / 2);
        group.throughput(Throughput::Elements(6));
        group.bench_with_input(BenchmarkId::from_parameter(n), &center, |b, &pos| {
            b.iter(|| graph.neighbors(black_box(pos)).count())
        });
    }
    group.finish();
}

/// Benchmark the symmetric can-connect predicate
fn bench_can_connect(c: &mut Criterion) {
    let graph = cube(8);
    let center = Pos::new(4, 4, 4);

    c.bench_function("can_connect", |b| {
        b.iter(|| {
            Side::ALL
                .iter()
                .filter(|&&side| graph.can_connect(black_box(center), side))
                .count()
        })
    });
}

criterion_group!(
    benches,
    bench_refresh,
    bench_refresh_around,
    bench_neighbors,
    bench_can_connect,
);

criterion_main!(benches);
