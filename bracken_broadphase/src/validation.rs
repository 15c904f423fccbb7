// Copyright 2026 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Structural and metric checks, plus the quality measurements tests lean on.
//!
//! Trees can get deep enough to threaten the thread stack, so every walk here
//! is iterative over an explicit stack.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt::Debug;

use crate::tree::DynamicTree;
use crate::types::perimeter;

impl<D: Copy + Debug> DynamicTree<D> {
    /// Stored height of the root; 0 for an empty tree.
    pub fn height(&self) -> i32 {
        if self.root.is_null() {
            0
        } else {
            self.nodes[self.root].height
        }
    }

    /// Height recomputed from scratch. Must always equal [`height`](Self::height).
    pub fn compute_height(&self) -> i32 {
        if self.root.is_null() {
            return 0;
        }
        let mut best = 0;
        let mut stack = vec![(self.root, 0)];
        while let Some((index, depth)) = stack.pop() {
            let node = &self.nodes[index];
            if node.is_leaf() {
                best = best.max(depth);
            } else {
                stack.push((node.child1, depth + 1));
                stack.push((node.child2, depth + 1));
            }
        }
        best
    }

    /// Sum of all node perimeters divided by the root perimeter. A measure of
    /// how loose the hierarchy is; smaller is tighter.
    pub fn area_ratio(&self) -> f64 {
        if self.root.is_null() {
            return 0.0;
        }
        let root_area = perimeter(self.nodes[self.root].aabb);
        let mut total = 0.0;
        let mut stack = vec![self.root];
        while let Some(index) = stack.pop() {
            let node = &self.nodes[index];
            total += perimeter(node.aabb);
            if !node.is_leaf() {
                stack.push(node.child1);
                stack.push(node.child2);
            }
        }
        total / root_area
    }

    /// Largest height difference between the two children of any internal
    /// node.
    pub fn max_balance(&self) -> i32 {
        if self.root.is_null() {
            return 0;
        }
        let mut best = 0;
        let mut stack = vec![self.root];
        while let Some(index) = stack.pop() {
            let node = &self.nodes[index];
            if node.is_leaf() {
                continue;
            }
            let balance = (self.nodes[node.child2].height - self.nodes[node.child1].height).abs();
            best = best.max(balance);
            stack.push(node.child1);
            stack.push(node.child2);
        }
        best
    }

    /// Assert every structural invariant. Intended for tests and debugging;
    /// panics on the first violation.
    pub fn validate(&self) {
        let capacity = self.nodes.capacity();

        if !self.root.is_null() {
            assert!(
                self.nodes[self.root].parent.is_null(),
                "root must have no parent"
            );

            // Pre-order walk checking each node against its children; the
            // local checks compose into a full recomputation.
            let mut stack = vec![self.root];
            while let Some(index) = stack.pop() {
                assert!(index.get() < capacity, "node index out of range");
                let node = &self.nodes[index];

                if node.is_leaf() {
                    assert!(node.child2.is_null(), "leaf with a single child");
                    assert_eq!(node.height, 0, "leaf height must be 0");
                    assert!(node.user_data.is_some(), "leaf must carry a payload");
                    continue;
                }

                let child1 = node.child1;
                let child2 = node.child2;
                assert!(child1.get() < capacity, "child1 out of range");
                assert!(child2.get() < capacity, "child2 out of range");
                assert_eq!(self.nodes[child1].parent, index, "child1 parent link");
                assert_eq!(self.nodes[child2].parent, index, "child2 parent link");
                assert!(node.user_data.is_none(), "internal node with a payload");

                let h1 = self.nodes[child1].height;
                let h2 = self.nodes[child2].height;
                assert_eq!(node.height, 1 + h1.max(h2), "stored height is stale");
                assert!((h2 - h1).abs() <= 1, "children out of balance");
                assert_eq!(
                    node.aabb,
                    self.nodes[child1].aabb.union(self.nodes[child2].aabb),
                    "stored box is not the exact child union"
                );

                stack.push(child1);
                stack.push(child2);
            }
        }

        // The free list must stay inside the pool, visit each slot at most
        // once, mark every member free, and account for exactly the slots
        // that are not live.
        let mut seen = Vec::new();
        seen.resize(capacity, false);
        let mut free_count = 0;
        let mut free = self.nodes.free_list_head();
        while !free.is_null() {
            assert!(free.get() < capacity, "free index out of range");
            assert!(!seen[free.get()], "free list visits a slot twice");
            seen[free.get()] = true;
            assert_eq!(self.nodes[free].height, -1, "free slot not marked free");
            free_count += 1;
            free = self.nodes[free].parent;
        }
        assert_eq!(
            self.nodes.count() + free_count,
            capacity,
            "live + free must cover the pool"
        );

        assert_eq!(self.height(), self.compute_height(), "root height is stale");
    }
}
