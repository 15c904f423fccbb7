// Copyright 2026 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend seam: the surface shared by the dynamic tree and the linear-scan
//! reference, and the compile-time default switch between them.

use alloc::vec::Vec;
use core::fmt::Debug;

use kurbo::{Rect, Vec2};

use crate::tree::DynamicTree;
use crate::types::{ProxyId, TreeConfig, contains_rect, intersects, predicted_aabb};

/// Operations every broad-phase backend supports.
///
/// Both backends fatten on create and apply the same predictive extension on
/// move, so swapping backends never changes the containment contract of the
/// stored boxes.
pub trait BroadPhase<D: Copy + Debug> {
    fn create_proxy(&mut self, aabb: Rect, user_data: D) -> ProxyId;
    fn destroy_proxy(&mut self, id: ProxyId);
    fn move_proxy(&mut self, id: ProxyId, aabb: Rect, displacement: Vec2) -> bool;
    fn user_data(&self, id: ProxyId) -> D;
    fn fat_aabb(&self, id: ProxyId) -> Rect;
    /// Invoke `visit` for every proxy whose fat box touches `aabb`;
    /// returning `false` stops early.
    fn query(&self, aabb: Rect, visit: &mut dyn FnMut(ProxyId) -> bool);
    fn validate(&self);
}

impl<D: Copy + Debug> BroadPhase<D> for DynamicTree<D> {
    fn create_proxy(&mut self, aabb: Rect, user_data: D) -> ProxyId {
        DynamicTree::create_proxy(self, aabb, user_data)
    }

    fn destroy_proxy(&mut self, id: ProxyId) {
        DynamicTree::destroy_proxy(self, id);
    }

    fn move_proxy(&mut self, id: ProxyId, aabb: Rect, displacement: Vec2) -> bool {
        DynamicTree::move_proxy(self, id, aabb, displacement)
    }

    fn user_data(&self, id: ProxyId) -> D {
        DynamicTree::user_data(self, id)
    }

    fn fat_aabb(&self, id: ProxyId) -> Rect {
        DynamicTree::fat_aabb(self, id)
    }

    fn query(&self, aabb: Rect, visit: &mut dyn FnMut(ProxyId) -> bool) {
        DynamicTree::query(self, aabb, |id| visit(id));
    }

    fn validate(&self) {
        DynamicTree::validate(self);
    }
}

#[derive(Copy, Clone, Debug)]
struct Proxy<D> {
    aabb: Rect,
    user_data: D,
}

/// Linear-scan reference backend: a slot vector and no hierarchy at all.
///
/// Every query walks every live proxy. Useful as ground truth in tests and as
/// a baseline in benches; selectable as [`DefaultBroadPhase`] with the
/// `brute-force` feature.
pub struct BruteForce<D: Copy + Debug> {
    proxies: Vec<Option<Proxy<D>>>,
    free_list: Vec<u32>,
    config: TreeConfig,
}

impl<D: Copy + Debug> Default for BruteForce<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Copy + Debug> BruteForce<D> {
    /// Create an empty backend with the default tuning constants.
    pub fn new() -> Self {
        Self::with_config(TreeConfig::default())
    }

    /// Create an empty backend with explicit tuning constants.
    pub fn with_config(config: TreeConfig) -> Self {
        Self {
            proxies: Vec::new(),
            free_list: Vec::new(),
            config,
        }
    }

    /// Number of live proxies.
    pub fn proxy_count(&self) -> usize {
        self.proxies.len() - self.free_list.len()
    }

    fn slot(&self, id: ProxyId) -> &Proxy<D> {
        self.proxies
            .get(id.idx())
            .and_then(|slot| slot.as_ref())
            .expect("stale ProxyId")
    }
}

impl<D: Copy + Debug> Debug for BruteForce<D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BruteForce")
            .field("total_slots", &self.proxies.len())
            .field("alive", &self.proxy_count())
            .finish_non_exhaustive()
    }
}

impl<D: Copy + Debug> BroadPhase<D> for BruteForce<D> {
    fn create_proxy(&mut self, aabb: Rect, user_data: D) -> ProxyId {
        let margin = self.config.aabb_extension;
        let proxy = Proxy {
            aabb: aabb.inflate(margin, margin),
            user_data,
        };
        if let Some(idx) = self.free_list.pop() {
            self.proxies[idx as usize] = Some(proxy);
            ProxyId(idx)
        } else {
            self.proxies.push(Some(proxy));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "proxy ids are 32-bit by design"
            )]
            let id = ProxyId((self.proxies.len() - 1) as u32);
            id
        }
    }

    fn destroy_proxy(&mut self, id: ProxyId) {
        let slot = self
            .proxies
            .get_mut(id.idx())
            .expect("ProxyId out of range");
        assert!(slot.is_some(), "stale ProxyId");
        *slot = None;
        self.free_list.push(id.0);
    }

    fn move_proxy(&mut self, id: ProxyId, aabb: Rect, displacement: Vec2) -> bool {
        if contains_rect(self.slot(id).aabb, aabb) {
            return false;
        }
        let b = predicted_aabb(aabb, &self.config, displacement);
        self.proxies[id.idx()].as_mut().expect("stale ProxyId").aabb = b;
        true
    }

    fn user_data(&self, id: ProxyId) -> D {
        self.slot(id).user_data
    }

    fn fat_aabb(&self, id: ProxyId) -> Rect {
        self.slot(id).aabb
    }

    fn query(&self, aabb: Rect, visit: &mut dyn FnMut(ProxyId) -> bool) {
        for (i, slot) in self.proxies.iter().enumerate() {
            if let Some(proxy) = slot
                && intersects(proxy.aabb, aabb)
            {
                #[allow(
                    clippy::cast_possible_truncation,
                    reason = "proxy ids are 32-bit by design"
                )]
                let id = ProxyId(i as u32);
                if !visit(id) {
                    return;
                }
            }
        }
    }

    fn validate(&self) {
        let mut seen = Vec::new();
        seen.resize(self.proxies.len(), false);
        for &idx in &self.free_list {
            let idx = idx as usize;
            assert!(idx < self.proxies.len(), "free index out of range");
            assert!(!seen[idx], "free list visits a slot twice");
            seen[idx] = true;
            assert!(self.proxies[idx].is_none(), "free slot still occupied");
        }
        assert_eq!(
            self.proxy_count() + self.free_list.len(),
            self.proxies.len(),
            "live + free must cover the pool"
        );
    }
}

/// Broad phase selected at compile time: the dynamic tree by default, the
/// linear-scan reference with the `brute-force` feature.
#[cfg(not(feature = "brute-force"))]
pub type DefaultBroadPhase<D> = DynamicTree<D>;

/// Broad phase selected at compile time: the dynamic tree by default, the
/// linear-scan reference with the `brute-force` feature.
#[cfg(feature = "brute-force")]
pub type DefaultBroadPhase<D> = BruteForce<D>;
