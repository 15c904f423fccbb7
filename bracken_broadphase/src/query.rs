// Copyright 2026 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Read-side traversals: overlap enumeration and ray casting against the fat
//! boxes.

use alloc::vec;
use core::fmt::Debug;

use kurbo::{Point, Rect, Vec2};

use crate::tree::DynamicTree;
use crate::types::{ProxyId, abs, intersects};

/// A ray cast as a clipped segment: from `p1` toward `p2`, cut off at
/// `p1 + max_fraction * (p2 - p1)`.
#[derive(Copy, Clone, Debug)]
pub struct RayCastInput {
    pub p1: Point,
    pub p2: Point,
    pub max_fraction: f64,
}

impl<D: Copy + Debug> DynamicTree<D> {
    /// Invoke `visit` for every proxy whose fat box touches `aabb`.
    ///
    /// Returning `false` from `visit` stops the traversal early.
    pub fn query(&self, aabb: Rect, mut visit: impl FnMut(ProxyId) -> bool) {
        if self.root.is_null() {
            return;
        }

        let mut stack = vec![self.root];
        while let Some(index) = stack.pop() {
            let node = &self.nodes[index];
            if !intersects(node.aabb, aabb) {
                continue;
            }
            if node.is_leaf() {
                if !visit(index.to_proxy()) {
                    return;
                }
            } else {
                stack.push(node.child1);
                stack.push(node.child2);
            }
        }
    }

    /// Cast a segment through the tree, invoking `callback` for every proxy
    /// whose fat box the segment might hit, in an unspecified order.
    ///
    /// The callback returns the fraction to clip the ray to from here on:
    /// `0.0` terminates the cast, a positive value shortens the segment, and
    /// a negative value leaves it as is (typically "no hit, keep going").
    pub fn ray_cast(
        &self,
        input: &RayCastInput,
        mut callback: impl FnMut(&RayCastInput, ProxyId) -> f64,
    ) {
        if self.root.is_null() {
            return;
        }

        let p1 = input.p1;
        let p2 = input.p2;
        let r = p2 - p1;
        debug_assert!(r.hypot2() > 0.0, "ray must have positive length");
        let r = r / r.hypot();

        // v is perpendicular to the segment; a box with center c and extents
        // h is separated from the segment's line iff
        // |dot(v, p1 - c)| > dot(|v|, h).
        let v = Vec2::new(-r.y, r.x);
        let abs_v = Vec2::new(abs(v.x), abs(v.y));

        let mut max_fraction = input.max_fraction;
        let mut segment_box = segment_aabb(p1, p2, max_fraction);

        let mut stack = vec![self.root];
        while let Some(index) = stack.pop() {
            let node = &self.nodes[index];
            if !intersects(node.aabb, segment_box) {
                continue;
            }

            let c = node.aabb.center();
            let h = Vec2::new(0.5 * node.aabb.width(), 0.5 * node.aabb.height());
            let separation = abs(v.dot(p1 - c)) - abs_v.dot(h);
            if separation > 0.0 {
                continue;
            }

            if node.is_leaf() {
                let sub_input = RayCastInput {
                    p1,
                    p2,
                    max_fraction,
                };
                let value = callback(&sub_input, index.to_proxy());
                if value == 0.0 {
                    return;
                }
                if value > 0.0 {
                    max_fraction = value;
                    segment_box = segment_aabb(p1, p2, max_fraction);
                }
            } else {
                stack.push(node.child1);
                stack.push(node.child2);
            }
        }
    }
}

fn segment_aabb(p1: Point, p2: Point, max_fraction: f64) -> Rect {
    let t = p1 + max_fraction * (p2 - p1);
    Rect::new(p1.x.min(t.x), p1.y.min(t.y), p1.x.max(t.x), p1.y.max(t.y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn grid_tree(n: usize) -> (DynamicTree<u32>, Vec<ProxyId>) {
        let mut tree = DynamicTree::new();
        let mut ids = Vec::new();
        for i in 0..n {
            let x = (i % 8) as f64 * 10.0;
            let y = (i / 8) as f64 * 10.0;
            ids.push(tree.create_proxy(Rect::new(x, y, x + 5.0, y + 5.0), i as u32));
        }
        (tree, ids)
    }

    #[test]
    fn query_on_empty_tree_visits_nothing() {
        let tree: DynamicTree<u32> = DynamicTree::new();
        let mut visited = 0;
        tree.query(Rect::new(-1e9, -1e9, 1e9, 1e9), |_| {
            visited += 1;
            true
        });
        assert_eq!(visited, 0);
    }

    #[test]
    fn query_finds_exactly_the_overlapping_proxies() {
        let (tree, _) = grid_tree(32);
        let window = Rect::new(8.0, 8.0, 22.0, 22.0);

        let mut hits = Vec::new();
        tree.query(window, |id| {
            hits.push(tree.user_data(id));
            true
        });
        hits.sort_unstable();

        // Brute-force ground truth over the same fat boxes.
        let mut expected = Vec::new();
        for i in 0..32u32 {
            let x = f64::from(i % 8) * 10.0;
            let y = f64::from(i / 8) * 10.0;
            let fat = Rect::new(x, y, x + 5.0, y + 5.0).inflate(0.1, 0.1);
            if intersects(fat, window) {
                expected.push(i);
            }
        }
        assert_eq!(hits, expected);
    }

    #[test]
    fn query_early_exit_stops_the_walk() {
        let (tree, _) = grid_tree(32);
        let mut visited = 0;
        tree.query(Rect::new(-1e9, -1e9, 1e9, 1e9), |_| {
            visited += 1;
            false
        });
        assert_eq!(visited, 1);
    }

    #[test]
    fn ray_cast_reaches_boxes_on_the_segment() {
        let (tree, _) = grid_tree(8);
        // A horizontal ray through the first row (fat boxes span y in
        // [-0.1, 5.1]).
        let input = RayCastInput {
            p1: Point::new(-10.0, 2.5),
            p2: Point::new(100.0, 2.5),
            max_fraction: 1.0,
        };
        let mut hits = Vec::new();
        tree.ray_cast(&input, |_, id| {
            hits.push(tree.user_data(id));
            -1.0
        });
        hits.sort_unstable();
        assert_eq!(hits, alloc::vec![0, 1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn ray_cast_misses_offset_rows() {
        let (tree, _) = grid_tree(16);
        // Between the rows: fat boxes cover y in [-0.1, 5.1] and [9.9, 15.1].
        let input = RayCastInput {
            p1: Point::new(-10.0, 7.5),
            p2: Point::new(100.0, 7.5),
            max_fraction: 1.0,
        };
        let mut visited = 0;
        tree.ray_cast(&input, |_, _| {
            visited += 1;
            -1.0
        });
        assert_eq!(visited, 0);
    }

    #[test]
    fn ray_cast_clipping_prunes_far_boxes() {
        let (tree, _) = grid_tree(8);
        let input = RayCastInput {
            p1: Point::new(-10.0, 2.5),
            p2: Point::new(100.0, 2.5),
            max_fraction: 1.0,
        };
        // Clip hard at the first callback: the remaining segment ends at
        // x = -9.89, short of every fat box, so nothing else is visited no
        // matter which leaf came first.
        let mut visited = 0;
        tree.ray_cast(&input, |sub, _| {
            assert!(sub.max_fraction <= 1.0);
            visited += 1;
            0.001
        });
        assert_eq!(visited, 1);
    }

    #[test]
    fn ray_cast_zero_terminates() {
        let (tree, _) = grid_tree(8);
        let input = RayCastInput {
            p1: Point::new(-10.0, 2.5),
            p2: Point::new(100.0, 2.5),
            max_fraction: 1.0,
        };
        let mut visited = 0;
        tree.ray_cast(&input, |_, _| {
            visited += 1;
            0.0
        });
        assert_eq!(visited, 1);
    }
}
