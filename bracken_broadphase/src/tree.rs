// Copyright 2026 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The dynamic AABB tree: proxy lifecycle, SAH insertion, removal, and the
//! ancestor fix-up walk.

use core::fmt::Debug;

use kurbo::{Rect, Vec2};

use crate::arena::{NodeArena, NodeIndex};
use crate::types::{ProxyId, TreeConfig, contains_rect, perimeter, predicted_aabb};

/// A dynamic bounding-volume hierarchy over fat 2D AABBs.
///
/// Leaves carry user proxies; internal nodes are exact unions of their two
/// children. Insertion picks a sibling by the surface-area heuristic and a
/// single-rotation balancer keeps child heights within one of each other, so
/// queries stay logarithmic while the population churns.
///
/// Proxy ids are arena indices and survive pool growth; see [`ProxyId`].
pub struct DynamicTree<D: Copy + Debug> {
    pub(crate) nodes: NodeArena<D>,
    pub(crate) root: NodeIndex,
    /// Round-robin cursor for [`rebalance`](Self::rebalance).
    pub(crate) path: usize,
    pub(crate) insertions: u64,
    pub(crate) config: TreeConfig,
}

impl<D: Copy + Debug> Default for DynamicTree<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Copy + Debug> Debug for DynamicTree<D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DynamicTree")
            .field("proxies", &self.proxy_count())
            .field("nodes_live", &self.nodes.count())
            .field("capacity", &self.nodes.capacity())
            .field("height", &self.height())
            .finish_non_exhaustive()
    }
}

impl<D: Copy + Debug> DynamicTree<D> {
    /// Create an empty tree with the default tuning constants.
    pub fn new() -> Self {
        Self::with_config(TreeConfig::default())
    }

    /// Create an empty tree with explicit tuning constants.
    pub fn with_config(config: TreeConfig) -> Self {
        Self {
            nodes: NodeArena::new(),
            root: NodeIndex::NULL,
            path: 0,
            insertions: 0,
            config,
        }
    }

    /// Insert a proxy. The stored box is `aabb` fattened by
    /// [`TreeConfig::aabb_extension`] so small motions are absorbed later.
    pub fn create_proxy(&mut self, aabb: Rect, user_data: D) -> ProxyId {
        let margin = self.config.aabb_extension;
        let leaf = self.nodes.allocate();
        let node = &mut self.nodes[leaf];
        node.aabb = aabb.inflate(margin, margin);
        node.user_data = Some(user_data);

        self.insert_leaf(leaf);
        leaf.to_proxy()
    }

    /// Remove a proxy and recycle its node.
    pub fn destroy_proxy(&mut self, id: ProxyId) {
        let leaf = self.leaf_index(id);
        self.remove_leaf(leaf);
        self.nodes.free(leaf);
    }

    /// Move a proxy to `aabb`.
    ///
    /// Returns `false` when the stored fat box still contains `aabb` and the
    /// tree is left untouched. Otherwise the leaf is re-inserted with a new
    /// fat box extended toward `displacement` and the call returns `true`.
    pub fn move_proxy(&mut self, id: ProxyId, aabb: Rect, displacement: Vec2) -> bool {
        let leaf = self.leaf_index(id);
        if contains_rect(self.nodes[leaf].aabb, aabb) {
            return false;
        }

        self.remove_leaf(leaf);
        self.nodes[leaf].aabb = predicted_aabb(aabb, &self.config, displacement);
        self.insert_leaf(leaf);
        true
    }

    /// Payload attached to a proxy.
    pub fn user_data(&self, id: ProxyId) -> D {
        let leaf = self.leaf_index(id);
        self.nodes[leaf].user_data.expect("leaf carries a payload")
    }

    /// The fat box currently stored for a proxy. Strictly contains the last
    /// user-supplied AABB.
    pub fn fat_aabb(&self, id: ProxyId) -> Rect {
        self.nodes[self.leaf_index(id)].aabb
    }

    /// Number of live proxies.
    pub fn proxy_count(&self) -> usize {
        // Every internal node has exactly two children, so a non-empty tree
        // holds 2n - 1 nodes for n leaves.
        if self.root.is_null() {
            0
        } else {
            (self.nodes.count() + 1) / 2
        }
    }

    /// Number of leaf insertions performed over the tree's lifetime (creates
    /// plus restructuring moves).
    pub fn insertion_count(&self) -> u64 {
        self.insertions
    }

    fn leaf_index(&self, id: ProxyId) -> NodeIndex {
        let index = NodeIndex::from(id);
        assert!(index.get() < self.nodes.capacity(), "ProxyId out of range");
        let node = &self.nodes[index];
        assert!(
            node.height == 0 && node.is_leaf(),
            "stale or non-leaf ProxyId"
        );
        index
    }

    /// Insert `leaf` under the sibling of minimum SAH cost, then fix heights
    /// and boxes on the way back to the root.
    pub(crate) fn insert_leaf(&mut self, leaf: NodeIndex) {
        self.insertions += 1;

        if self.root.is_null() {
            self.root = leaf;
            self.nodes[leaf].parent = NodeIndex::NULL;
            return;
        }

        // Descend from the root. At each internal node, compare the cost of
        // pairing up right here against the marginal cost of pushing the leaf
        // into either child.
        let leaf_aabb = self.nodes[leaf].aabb;
        let mut index = self.root;
        while !self.nodes[index].is_leaf() {
            let child1 = self.nodes[index].child1;
            let child2 = self.nodes[index].child2;

            let area = perimeter(self.nodes[index].aabb);
            let combined_area = perimeter(self.nodes[index].aabb.union(leaf_aabb));

            // Cost of creating a new parent for this node and the leaf.
            let cost = 2.0 * combined_area;

            // Every ancestor grows by the same union no matter how deep the
            // leaf lands, so both descent costs inherit it.
            let inheritance_cost = 2.0 * (combined_area - area);

            let cost1 = self.descend_cost(child1, leaf_aabb, inheritance_cost);
            let cost2 = self.descend_cost(child2, leaf_aabb, inheritance_cost);

            if cost < cost1 && cost < cost2 {
                break;
            }
            index = if cost1 < cost2 { child1 } else { child2 };
        }
        let sibling = index;

        // Splice a fresh parent between the sibling and its old parent.
        let old_parent = self.nodes[sibling].parent;
        let sibling_aabb = self.nodes[sibling].aabb;
        let sibling_height = self.nodes[sibling].height;

        let new_parent = self.nodes.allocate();
        self.nodes[new_parent].parent = old_parent;
        self.nodes[new_parent].aabb = leaf_aabb.union(sibling_aabb);
        self.nodes[new_parent].height = sibling_height + 1;
        self.nodes[new_parent].child1 = sibling;
        self.nodes[new_parent].child2 = leaf;
        self.nodes[sibling].parent = new_parent;
        self.nodes[leaf].parent = new_parent;

        if old_parent.is_null() {
            self.root = new_parent;
        } else if self.nodes[old_parent].child1 == sibling {
            self.nodes[old_parent].child1 = new_parent;
        } else {
            self.nodes[old_parent].child2 = new_parent;
        }

        let start = self.nodes[leaf].parent;
        self.refresh_ancestors(start);
    }

    /// Remove `leaf` from the tree without recycling it, collapsing its
    /// parent onto the surviving sibling.
    pub(crate) fn remove_leaf(&mut self, leaf: NodeIndex) {
        if leaf == self.root {
            self.root = NodeIndex::NULL;
            return;
        }

        let parent = self.nodes[leaf].parent;
        let grandparent = self.nodes[parent].parent;
        let sibling = if self.nodes[parent].child1 == leaf {
            self.nodes[parent].child2
        } else {
            self.nodes[parent].child1
        };

        if grandparent.is_null() {
            self.root = sibling;
            self.nodes[sibling].parent = NodeIndex::NULL;
            self.nodes.free(parent);
        } else {
            if self.nodes[grandparent].child1 == parent {
                self.nodes[grandparent].child1 = sibling;
            } else {
                self.nodes[grandparent].child2 = sibling;
            }
            self.nodes[sibling].parent = grandparent;
            self.nodes.free(parent);
            self.refresh_ancestors(grandparent);
        }
    }

    fn descend_cost(&self, child: NodeIndex, leaf_aabb: Rect, inheritance_cost: f64) -> f64 {
        let node = &self.nodes[child];
        let combined = perimeter(node.aabb.union(leaf_aabb));
        if node.is_leaf() {
            combined + inheritance_cost
        } else {
            (combined - perimeter(node.aabb)) + inheritance_cost
        }
    }

    /// Walk from `index` to the root, rebalancing each ancestor and then
    /// refreshing its box and height from the post-rotation children.
    pub(crate) fn refresh_ancestors(&mut self, mut index: NodeIndex) {
        while !index.is_null() {
            index = self.balance(index);

            let child1 = self.nodes[index].child1;
            let child2 = self.nodes[index].child2;
            debug_assert!(!child1.is_null());
            debug_assert!(!child2.is_null());

            self.nodes[index].height =
                1 + self.nodes[child1].height.max(self.nodes[child2].height);
            self.nodes[index].aabb = self.nodes[child1].aabb.union(self.nodes[child2].aabb);

            index = self.nodes[index].parent;
        }
    }
}
