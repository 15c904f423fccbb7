// Copyright 2026 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![cfg(feature = "compare_rstar")]

use bracken_broadphase::DynamicTree;
use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::Rect;

use rstar::primitives::Rectangle;
use rstar::{AABB, RTree};

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

fn to_rstar_rects(v: &[Rect]) -> Vec<Rectangle<[f64; 2]>> {
    v.iter()
        .map(|r| Rectangle::from_corners([r.x0, r.y0], [r.x1, r.y1]))
        .collect()
}

fn bench_tree_external_compare(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree_external_compare");
    for &n in &[32usize, 64] {
        let rects = gen_grid_rects(n, 10.0);
        let window = Rect::new(100.0, 100.0, 500.0, 500.0);
        group.throughput(Throughput::Elements((n * n) as u64));

        group.bench_function(format!("bracken_build_query_n{}", n), |b| {
            b.iter_batched(
                DynamicTree::<u32>::new,
                |mut tree| {
                    for (i, r) in rects.iter().copied().enumerate() {
                        let _ = tree.create_proxy(r, i as u32);
                    }
                    let mut hits = 0usize;
                    tree.query(window, |_| {
                        hits += 1;
                        true
                    });
                    black_box(hits);
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("rstar_build_query_bulk_n{}", n), |b| {
            b.iter_batched(
                || to_rstar_rects(&rects),
                |rectangles| {
                    let tree = RTree::bulk_load(rectangles);
                    let aabb =
                        AABB::from_corners([window.x0, window.y0], [window.x1, window.y1]);
                    let hits: usize = tree.locate_in_envelope_intersecting(&aabb).count();
                    black_box(hits);
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_tree_external_compare);
criterion_main!(benches);
