//! Benchmarks for the analysis engine on a ring-of-cliques network: dense
//! groups joined in a cycle, a shape with planted community structure and
//! a nontrivial clique/core profile.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use kith::{
    core_numbers, maximal_cliques, CliqueStats, CommunityDetection, GirvanNewman, Interaction,
    InteractionGraph, Louvain,
};

/// `groups` cliques of `size` nodes each, neighbors in the ring joined by
/// a single light edge.
fn ring_of_cliques(groups: usize, size: usize) -> InteractionGraph {
    let mut g = InteractionGraph::new();
    let name = |group: usize, member: usize| format!("n{group}_{member}");

    for group in 0..groups {
        for a in 0..size {
            for b in (a + 1)..size {
                g.add_edge(&name(group, a), &name(group, b), Interaction::new(5, 1))
                    .unwrap();
            }
        }
    }
    for group in 0..groups {
        let next = (group + 1) % groups;
        g.add_edge(&name(group, 0), &name(next, 1), Interaction::new(1, 1))
            .unwrap();
    }
    g
}

fn bench_cliques(c: &mut Criterion) {
    let g = ring_of_cliques(12, 6);
    let _ = c
        .bench_function("maximal_cliques/ring12x6", |b| {
            b.iter(|| maximal_cliques(black_box(&g)))
        })
        .bench_function("clique_stats/ring12x6", |b| {
            b.iter(|| CliqueStats::of(black_box(&g)))
        });
}

fn bench_core_decomposition(c: &mut Criterion) {
    let g = ring_of_cliques(20, 8);
    let _ = c.bench_function("core_numbers/ring20x8", |b| {
        b.iter(|| core_numbers(black_box(&g)))
    });
}

fn bench_louvain(c: &mut Criterion) {
    let g = ring_of_cliques(20, 8);
    let _ = c.bench_function("louvain/ring20x8", |b| {
        b.iter(|| Louvain::new().detect(black_box(&g)).unwrap())
    });
}

fn bench_girvan_newman(c: &mut Criterion) {
    // Small input: each removal round recomputes all-pairs betweenness.
    let g = ring_of_cliques(4, 5);
    let _ = c.bench_function("girvan_newman/ring4x5", |b| {
        b.iter(|| GirvanNewman::new().dendrogram(black_box(&g)).unwrap())
    });
}

criterion_group!(
    benches,
    bench_cliques,
    bench_core_decomposition,
    bench_louvain,
    bench_girvan_newman
);
criterion_main!(benches);
