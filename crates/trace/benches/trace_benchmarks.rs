//! Benchmarks for parsing and trace recording
//!
//! Run with: cargo bench -p toposcope-trace

#![allow(clippy::unwrap_used)]

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use toposcope_trace::generate::seeded_dag;
use toposcope_trace::{InputMode, parse, run_bfs, run_dfs};

/// Adjacency-list text for a linear chain `n0 -> n1 -> ... -> n{len-1}`
fn chain_text(len: usize) -> String {
    (0..len)
        .map(|i| {
            if i + 1 < len {
                format!("n{i}: n{}", i + 1)
            } else {
                format!("n{i}:")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Adjacency-matrix text for a wide fan-out from a single root
fn fan_out_matrix(width: usize) -> String {
    let names: Vec<String> = (0..=width).map(|i| format!("n{i}")).collect();
    let mut text = names.join(" ");
    for (row, name) in names.iter().enumerate() {
        let bits: Vec<&str> = (0..=width)
            .map(|col| if row == 0 && col > 0 { "1" } else { "0" })
            .collect();
        text.push('\n');
        text.push_str(name);
        text.push(' ');
        text.push_str(&bits.join(" "));
    }
    text
}

fn benchmark_parse_list(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_list");

    for len in [100, 500, 1000] {
        let text = chain_text(len);
        group.bench_with_input(BenchmarkId::from_parameter(len), &text, |b, text| {
            b.iter(|| black_box(parse(text, InputMode::List).unwrap()));
        });
    }

    group.finish();
}

fn benchmark_parse_matrix(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_matrix");

    for width in [10, 50, 100] {
        let text = fan_out_matrix(width);
        group.bench_with_input(BenchmarkId::from_parameter(width), &text, |b, text| {
            b.iter(|| black_box(parse(text, InputMode::Matrix).unwrap()));
        });
    }

    group.finish();
}

fn benchmark_dfs_trace(c: &mut Criterion) {
    let mut group = c.benchmark_group("dfs_trace");

    for nodes in [10, 50, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(nodes), &nodes, |b, &nodes| {
            let graph = seeded_dag(nodes, nodes * 2, 7);
            b.iter(|| black_box(run_dfs(&graph)));
        });
    }

    group.finish();
}

fn benchmark_bfs_trace(c: &mut Criterion) {
    let mut group = c.benchmark_group("bfs_trace");

    for nodes in [10, 50, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(nodes), &nodes, |b, &nodes| {
            let graph = seeded_dag(nodes, nodes * 2, 7);
            b.iter(|| black_box(run_bfs(&graph)));
        });
    }

    group.finish();
}

fn benchmark_cycle_detection(c: &mut Criterion) {
    let mut group = c.benchmark_group("cycle_detection");

    for len in [100, 500, 1000] {
        let graph = parse(&chain_text(len), InputMode::List).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(len), &graph, |b, graph| {
            b.iter(|| black_box(graph.has_cycles()));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_parse_list,
    benchmark_parse_matrix,
    benchmark_dfs_trace,
    benchmark_bfs_trace,
    benchmark_cycle_detection,
);

criterion_main!(benches);
