// Copyright 2026 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bracken Broadphase: a dynamic AABB tree for 2D collision detection.
//!
//! This crate is the broad phase of a collision pipeline: it indexes a
//! changing population of axis-aligned bounding boxes so overlap and ray
//! queries run in expected logarithmic time while proxies are created, moved,
//! and destroyed freely.
//!
//! - Stored boxes are *fattened* by a configurable margin, so small motions
//!   are absorbed without touching the tree; [`DynamicTree::move_proxy`]
//!   reports whether a move actually restructured anything.
//! - Insertion picks a sibling with the surface-area heuristic; a
//!   single-rotation balancer runs on every ancestor walk, and
//!   [`DynamicTree::rebalance`] incrementally shuffles grandchildren to keep
//!   total surface area down on long-lived worlds.
//! - Proxy ids are stable 32-bit arena indices. The node pool grows by
//!   doubling and never moves a live proxy's id.
//!
//! Narrow phase, contact generation, and pair management belong to the
//! caller; the tree only answers "which fat boxes might touch this?".
//!
//! # Example
//!
//! ```rust
//! use bracken_broadphase::DynamicTree;
//! use kurbo::{Rect, Vec2};
//!
//! let mut tree: DynamicTree<u32> = DynamicTree::new();
//! let a = tree.create_proxy(Rect::new(0.0, 0.0, 1.0, 1.0), 1);
//! let b = tree.create_proxy(Rect::new(10.0, 10.0, 11.0, 11.0), 2);
//!
//! // A nudge inside the fat box is absorbed; the tree is untouched.
//! assert!(!tree.move_proxy(a, Rect::new(0.05, 0.05, 1.05, 1.05), Vec2::ZERO));
//!
//! // Enumerate proxies overlapping a window.
//! let mut hits = Vec::new();
//! tree.query(Rect::new(-1.0, -1.0, 2.0, 2.0), |id| {
//!     hits.push(tree.user_data(id));
//!     true
//! });
//! assert_eq!(hits, vec![1]);
//!
//! tree.destroy_proxy(b);
//! tree.validate();
//! ```
//!
//! # Choosing a backend
//!
//! [`DynamicTree`] is the default and the point of the crate. [`BruteForce`]
//! keeps the same surface over a flat slot vector with linear scans; it is
//! the ground truth in tests and a baseline in benches, and the
//! `brute-force` cargo feature makes it the [`DefaultBroadPhase`] for
//! pipelines that want to rule the hierarchy out while debugging.
//!
//! # Float semantics
//!
//! Coordinates are `f64` via [`kurbo`]. Inputs are assumed finite; NaN is
//! undefined behavior at this layer.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod arena;
mod broad_phase;
mod query;
mod rebalance;
mod tree;
mod types;
mod validation;

pub use broad_phase::{BroadPhase, BruteForce, DefaultBroadPhase};
pub use query::RayCastInput;
pub use tree::DynamicTree;
pub use types::{ProxyId, TreeConfig};
