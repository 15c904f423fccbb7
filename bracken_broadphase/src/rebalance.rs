// Copyright 2026 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Incremental tree quality maintenance: the single-rotation balancer applied
//! on every ancestor walk, and the grandchild shuffle driven round-robin by
//! [`DynamicTree::rebalance`].

use core::fmt::Debug;

use crate::arena::NodeIndex;
use crate::tree::DynamicTree;
use crate::types::perimeter;

impl<D: Copy + Debug> DynamicTree<D> {
    /// Rotate the taller child of `a` up if the subtree is imbalanced.
    ///
    /// Returns the index now occupying `a`'s place in the tree, which is
    /// where an ancestor walk must resume.
    pub(crate) fn balance(&mut self, i_a: NodeIndex) -> NodeIndex {
        debug_assert!(!i_a.is_null());

        if self.nodes[i_a].is_leaf() || self.nodes[i_a].height < 2 {
            return i_a;
        }

        let i_b = self.nodes[i_a].child1;
        let i_c = self.nodes[i_a].child2;
        let balance = self.nodes[i_c].height - self.nodes[i_b].height;

        if balance > 1 {
            self.rotate_up(i_a, i_c, i_b)
        } else if balance < -1 {
            self.rotate_up(i_a, i_b, i_c)
        } else {
            i_a
        }
    }

    /// Promote `tall` (the taller child of `a`) into `a`'s slot. `a` keeps
    /// `low` and takes over the shorter of `tall`'s children; `tall` keeps
    /// the taller one. Returns the promoted index.
    fn rotate_up(&mut self, i_a: NodeIndex, tall: NodeIndex, low: NodeIndex) -> NodeIndex {
        let g1 = self.nodes[tall].child1;
        let g2 = self.nodes[tall].child2;

        // Swap a and tall.
        self.nodes[tall].child1 = i_a;
        self.nodes[tall].parent = self.nodes[i_a].parent;
        self.nodes[i_a].parent = tall;

        let old_parent = self.nodes[tall].parent;
        if old_parent.is_null() {
            self.root = tall;
        } else if self.nodes[old_parent].child1 == i_a {
            self.nodes[old_parent].child1 = tall;
        } else {
            debug_assert_eq!(self.nodes[old_parent].child2, i_a);
            self.nodes[old_parent].child2 = tall;
        }

        let (keep, give) = if self.nodes[g1].height > self.nodes[g2].height {
            (g1, g2)
        } else {
            (g2, g1)
        };

        // Both of a's child slots are written outright; one of them used to
        // point at `tall`.
        self.nodes[tall].child2 = keep;
        self.nodes[i_a].child1 = low;
        self.nodes[i_a].child2 = give;
        self.nodes[give].parent = i_a;

        self.nodes[i_a].aabb = self.nodes[low].aabb.union(self.nodes[give].aabb);
        self.nodes[i_a].height = 1 + self.nodes[low].height.max(self.nodes[give].height);
        self.nodes[tall].aabb = self.nodes[i_a].aabb.union(self.nodes[keep].aabb);
        self.nodes[tall].height = 1 + self.nodes[i_a].height.max(self.nodes[keep].height);

        tall
    }

    /// Re-pair the four grandchildren of `index` if another grouping has a
    /// smaller summed perimeter (Kensler 2008). Height is preserved exactly;
    /// only pairings that keep every affected node within the one-level
    /// balance bound are considered.
    pub(crate) fn shuffle(&mut self, index: NodeIndex) {
        if index.is_null() || self.nodes[index].height < 2 {
            return;
        }

        let i1 = self.nodes[index].child1;
        let i2 = self.nodes[index].child2;
        if self.nodes[i1].height < 1 || self.nodes[i2].height < 1 {
            return;
        }

        let i11 = self.nodes[i1].child1;
        let i12 = self.nodes[i1].child2;
        let i21 = self.nodes[i2].child1;
        let i22 = self.nodes[i2].child2;

        let b11 = self.nodes[i11].aabb;
        let b12 = self.nodes[i12].aabb;
        let b21 = self.nodes[i21].aabb;
        let b22 = self.nodes[i22].aabb;

        let h11 = self.nodes[i11].height;
        let h12 = self.nodes[i12].height;
        let h21 = self.nodes[i21].height;
        let h22 = self.nodes[i22].height;

        // Summed perimeter of each candidate pairing; m1 is the current
        // layout. Pairings that would break the one-level balance bound are
        // priced out.
        let m1 = perimeter(b11.union(b12)) + perimeter(b21.union(b22));
        let m2 = if pairing_balanced(h11, h22, h21, h12) {
            perimeter(b11.union(b22)) + perimeter(b12.union(b21))
        } else {
            f64::INFINITY
        };
        let m3 = if pairing_balanced(h11, h21, h12, h22) {
            perimeter(b11.union(b21)) + perimeter(b12.union(b22))
        } else {
            f64::INFINITY
        };

        if m1 <= m2 && m1 <= m3 {
            return;
        }

        if m2 <= m3 {
            // (11, 22) and (21, 12)
            self.nodes[i1].child2 = i22;
            self.nodes[i22].parent = i1;
            self.nodes[i2].child2 = i12;
            self.nodes[i12].parent = i2;
        } else {
            // (11, 21) and (12, 22)
            self.nodes[i1].child2 = i21;
            self.nodes[i21].parent = i1;
            self.nodes[i2].child1 = i12;
            self.nodes[i12].parent = i2;
        }

        self.refresh_node(i1);
        self.refresh_node(i2);
        self.refresh_node(index);

        // Ancestor boxes can only shrink; no rotations are needed on the way
        // up because heights did not change.
        let mut i = self.nodes[index].parent;
        while !i.is_null() {
            self.refresh_node(i);
            i = self.nodes[i].parent;
        }
    }

    /// Sweep `iterations` nodes round-robin through the arena, shuffling
    /// each. The cursor persists across calls and skips free slots.
    pub fn rebalance(&mut self, iterations: usize) {
        if self.root.is_null() {
            return;
        }

        for _ in 0..iterations {
            while self.nodes[NodeIndex::new(self.path)].height == -1 {
                self.path += 1;
                if self.path == self.nodes.capacity() {
                    self.path = 0;
                }
            }

            self.shuffle(NodeIndex::new(self.path));

            self.path += 1;
            if self.path == self.nodes.capacity() {
                self.path = 0;
            }
        }
    }

    fn refresh_node(&mut self, index: NodeIndex) {
        let child1 = self.nodes[index].child1;
        let child2 = self.nodes[index].child2;
        self.nodes[index].aabb = self.nodes[child1].aabb.union(self.nodes[child2].aabb);
        self.nodes[index].height = 1 + self.nodes[child1].height.max(self.nodes[child2].height);
    }
}

/// Whether re-pairing grandchildren into `(a, b)` and `(c, d)` keeps the two
/// new siblings and their parent within the one-level balance bound.
fn pairing_balanced(a: i32, b: i32, c: i32, d: i32) -> bool {
    (a - b).abs() <= 1 && (c - d).abs() <= 1 && ((1 + a.max(b)) - (1 + c.max(d))).abs() <= 1
}
