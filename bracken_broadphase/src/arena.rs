// Copyright 2026 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pooled node storage addressed by stable 32-bit indices.
//!
//! Proxy ids handed out by the tree are arena indices, so the pool can only
//! ever grow in place: growth doubles the backing vector and re-threads the
//! fresh tail as a free chain, leaving every existing index valid.

use alloc::vec::Vec;
use core::ops::{Index, IndexMut};

use kurbo::Rect;

use crate::types::ProxyId;

/// Initial pool size; the pool doubles every time the free list runs dry.
pub(crate) const INITIAL_CAPACITY: usize = 16;

/// Index of a node in the arena.
///
/// `NULL` plays the role of a null pointer: the root's parent, a leaf's
/// children, and the end of the free chain.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct NodeIndex(u32);

impl NodeIndex {
    pub(crate) const NULL: Self = Self(u32::MAX);

    #[allow(
        clippy::cast_possible_truncation,
        reason = "node indices are 32-bit by design"
    )]
    pub(crate) const fn new(i: usize) -> Self {
        Self(i as u32)
    }

    pub(crate) const fn get(self) -> usize {
        self.0 as usize
    }

    pub(crate) const fn is_null(self) -> bool {
        self.0 == u32::MAX
    }

    pub(crate) const fn to_proxy(self) -> ProxyId {
        ProxyId(self.0)
    }
}

impl From<ProxyId> for NodeIndex {
    fn from(id: ProxyId) -> Self {
        Self(id.0)
    }
}

/// A single tree node.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Node<D> {
    /// Fat box for a leaf; exact union of the two children for an internal
    /// node.
    pub aabb: Rect,
    /// Payload attached to leaves. `None` for internal nodes.
    pub user_data: Option<D>,
    /// Parent for live nodes. For a node on the free list this holds the next
    /// free slot instead; the two readings are never mixed.
    pub parent: NodeIndex,
    pub child1: NodeIndex,
    pub child2: NodeIndex,
    /// 0 for a leaf, `1 + max(child heights)` for an internal node, -1 for a
    /// free slot.
    pub height: i32,
}

impl<D> Node<D> {
    fn vacant(next: NodeIndex) -> Self {
        Self {
            aabb: Rect::ZERO,
            user_data: None,
            parent: next,
            child1: NodeIndex::NULL,
            child2: NodeIndex::NULL,
            height: -1,
        }
    }

    pub(crate) fn is_leaf(&self) -> bool {
        self.child1.is_null()
    }
}

/// Free-list node pool.
pub(crate) struct NodeArena<D> {
    nodes: Vec<Node<D>>,
    free_list: NodeIndex,
    count: usize,
}

impl<D> NodeArena<D> {
    pub(crate) fn new() -> Self {
        let mut nodes = Vec::with_capacity(INITIAL_CAPACITY);
        for i in 0..INITIAL_CAPACITY {
            nodes.push(Node::vacant(chain_next(i, INITIAL_CAPACITY)));
        }
        Self {
            nodes,
            free_list: NodeIndex::new(0),
            count: 0,
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.len()
    }

    /// Number of live nodes. Together with the free-list length this always
    /// accounts for the whole pool.
    pub(crate) fn count(&self) -> usize {
        self.count
    }

    pub(crate) fn free_list_head(&self) -> NodeIndex {
        self.free_list
    }

    /// Take a node off the free list, growing the pool when it runs dry.
    /// The node comes back blank: no parent, no children, height 0.
    pub(crate) fn allocate(&mut self) -> NodeIndex {
        if self.free_list.is_null() {
            debug_assert_eq!(self.count, self.nodes.len());
            self.grow();
        }

        let id = self.free_list;
        self.free_list = self.nodes[id.get()].parent;

        let node = &mut self.nodes[id.get()];
        node.parent = NodeIndex::NULL;
        node.child1 = NodeIndex::NULL;
        node.child2 = NodeIndex::NULL;
        node.height = 0;
        node.user_data = None;
        self.count += 1;
        id
    }

    /// Push a previously allocated node back onto the free list.
    pub(crate) fn free(&mut self, id: NodeIndex) {
        debug_assert!(id.get() < self.nodes.len());
        debug_assert!(self.count > 0);
        debug_assert!(self.nodes[id.get()].height != -1, "double free");

        self.nodes[id.get()].parent = self.free_list;
        self.nodes[id.get()].height = -1;
        self.free_list = id;
        self.count -= 1;
    }

    /// Double the pool and thread the fresh tail as a free chain.
    fn grow(&mut self) {
        let old_capacity = self.nodes.len();
        let new_capacity = old_capacity * 2;
        self.nodes.reserve_exact(old_capacity);
        for i in old_capacity..new_capacity {
            self.nodes.push(Node::vacant(chain_next(i, new_capacity)));
        }
        self.free_list = NodeIndex::new(old_capacity);
    }
}

fn chain_next(i: usize, capacity: usize) -> NodeIndex {
    if i + 1 < capacity {
        NodeIndex::new(i + 1)
    } else {
        NodeIndex::NULL
    }
}

impl<D> Index<NodeIndex> for NodeArena<D> {
    type Output = Node<D>;

    fn index(&self, index: NodeIndex) -> &Node<D> {
        &self.nodes[index.get()]
    }
}

impl<D> IndexMut<NodeIndex> for NodeArena<D> {
    fn index_mut(&mut self, index: NodeIndex) -> &mut Node<D> {
        &mut self.nodes[index.get()]
    }
}
