// Copyright 2026 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use bracken_broadphase::{BroadPhase, BruteForce, DynamicTree};
use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Rect, Vec2};

fn gen_grid_rects(n: usize, cell: f64) -> Vec<Rect> {
    let mut out = Vec::with_capacity(n * n);
    for y in 0..n {
        for x in 0..n {
            let x0 = x as f64 * cell;
            let y0 = y as f64 * cell;
            out.push(Rect::new(x0, y0, x0 + cell * 0.8, y0 + cell * 0.8));
        }
    }
    out
}

fn gen_clustered_rects(n_clusters: usize, per_cluster: usize, spread: f64) -> Vec<Rect> {
    let mut out = Vec::with_capacity(n_clusters * per_cluster);
    let mut rng = Rng::new(0xC1A5_7E55_9999_ABCD);
    let mut centers = Vec::with_capacity(n_clusters);
    for _ in 0..n_clusters {
        centers.push((rng.next_f64() * 2000.0, rng.next_f64() * 2000.0));
    }
    for (cx, cy) in centers {
        for _ in 0..per_cluster {
            let dx = (rng.next_f64() - 0.5) * spread;
            let dy = (rng.next_f64() - 0.5) * spread;
            out.push(Rect::new(cx + dx, cy + dy, cx + dx + 12.0, cy + dy + 12.0));
        }
    }
    out
}

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

fn count_hits<B: BroadPhase<u32>>(backend: &B, window: Rect) -> usize {
    let mut hits = 0;
    backend.query(window, &mut |_| {
        hits += 1;
        true
    });
    hits
}

fn bench_build_query_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("dynamic_tree");
    for &n in &[16usize, 32, 64] {
        let rects = gen_grid_rects(n, 10.0);
        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_function(format!("build_query_n{}", n), |b| {
            b.iter_batched(
                DynamicTree::<u32>::new,
                |mut tree| {
                    for (i, r) in rects.iter().copied().enumerate() {
                        let _ = tree.create_proxy(r, i as u32);
                    }
                    let hits = count_hits(&tree, Rect::new(100.0, 100.0, 500.0, 500.0));
                    black_box(hits);
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_build_query_brute(c: &mut Criterion) {
    let mut group = c.benchmark_group("brute_force");
    for &n in &[16usize, 32, 64] {
        let rects = gen_grid_rects(n, 10.0);
        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_function(format!("build_query_n{}", n), |b| {
            b.iter_batched(
                BruteForce::<u32>::new,
                |mut bf| {
                    for (i, r) in rects.iter().copied().enumerate() {
                        let _ = bf.create_proxy(r, i as u32);
                    }
                    let hits = count_hits(&bf, Rect::new(100.0, 100.0, 500.0, 500.0));
                    black_box(hits);
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_move_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("dynamic_tree_move_heavy");
    let rects = gen_grid_rects(48, 10.0);
    group.bench_function("move_then_query", |b| {
        b.iter_batched(
            || {
                let mut tree = DynamicTree::<u32>::new();
                let ids: Vec<_> = rects
                    .iter()
                    .copied()
                    .enumerate()
                    .map(|(i, r)| tree.create_proxy(r, i as u32))
                    .collect();
                (tree, ids)
            },
            |(mut tree, ids)| {
                for (j, id) in ids.into_iter().enumerate() {
                    let dx = (j % 5) as f64 - 2.0;
                    let dy = ((j * 7) % 5) as f64 - 2.0;
                    let r = rects[j] + Vec2::new(dx * 4.0, dy * 4.0);
                    tree.move_proxy(id, r, Vec2::new(dx, dy));
                }
                let hits = count_hits(&tree, Rect::new(100.0, 100.0, 500.0, 500.0));
                black_box(hits);
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_rebalance_clustered(c: &mut Criterion) {
    let mut group = c.benchmark_group("dynamic_tree_rebalance");
    let rects = gen_clustered_rects(16, 256, 128.0);
    group.bench_function("rebalance_sweep", |b| {
        b.iter_batched(
            || {
                let mut tree = DynamicTree::<u32>::new();
                for (i, r) in rects.iter().copied().enumerate() {
                    let _ = tree.create_proxy(r, i as u32);
                }
                tree
            },
            |mut tree| {
                tree.rebalance(512);
                black_box(tree.area_ratio());
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_build_query_tree,
    bench_build_query_brute,
    bench_move_churn,
    bench_rebalance_clustered,
);
criterion_main!(benches);
