// Copyright 2026 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types and small geometry helpers shared by the backends.

use kurbo::{Rect, Vec2};

/// Handle to a proxy stored in a broad phase.
///
/// A `ProxyId` is the arena index of the leaf node that carries the proxy. It
/// stays valid for the whole lifetime of the proxy, across any internal pool
/// growth, and is invalidated by [`destroy_proxy`](crate::DynamicTree::destroy_proxy).
///
/// Operating on a destroyed id is a precondition violation: lookups panic,
/// they do not return a stale neighbor.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ProxyId(pub(crate) u32);

impl ProxyId {
    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Tuning constants consumed by both backends.
#[derive(Copy, Clone, Debug)]
pub struct TreeConfig {
    /// Uniform margin added around every stored AABB, so small motions are
    /// absorbed without restructuring.
    pub aabb_extension: f64,
    /// Scale applied to the displacement when predicting where a moved proxy
    /// is headed; the fat box is extended on that side only.
    pub aabb_multiplier: f64,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            aabb_extension: 0.1,
            aabb_multiplier: 2.0,
        }
    }
}

/// Perimeter of a rectangle, the 2D surface-area-heuristic cost proxy.
#[inline]
pub(crate) fn perimeter(r: Rect) -> f64 {
    2.0 * (r.width() + r.height())
}

// `f64::abs` lives in std on older toolchains; this keeps the crate no_std.
#[inline]
pub(crate) fn abs(x: f64) -> f64 {
    if x < 0.0 { -x } else { x }
}

/// Whether `outer` contains `inner` entirely.
#[inline]
pub(crate) fn contains_rect(outer: Rect, inner: Rect) -> bool {
    outer.x0 <= inner.x0 && outer.y0 <= inner.y0 && inner.x1 <= outer.x1 && inner.y1 <= outer.y1
}

/// Whether two rectangles overlap. Shared edges count as overlap.
#[inline]
pub(crate) fn intersects(a: Rect, b: Rect) -> bool {
    a.x0 <= b.x1 && b.x0 <= a.x1 && a.y0 <= b.y1 && b.y0 <= a.y1
}

/// Fatten `aabb` by the uniform margin, then extend it along the predicted
/// motion: each axis grows on the side the scaled displacement points to.
pub(crate) fn predicted_aabb(aabb: Rect, config: &TreeConfig, displacement: Vec2) -> Rect {
    let mut b = aabb.inflate(config.aabb_extension, config.aabb_extension);
    let d = config.aabb_multiplier * displacement;

    if d.x < 0.0 {
        b.x0 += d.x;
    } else {
        b.x1 += d.x;
    }

    if d.y < 0.0 {
        b.y0 += d.y;
    } else {
        b.y1 += d.y;
    }

    b
}
