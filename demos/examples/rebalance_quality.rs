// Copyright 2026 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rebalance quality.
//!
//! Build a deliberately interleaved world, then watch the incremental
//! grandchild shuffle drive the area ratio down.
//!
//! Run:
//! - `cargo run -p bracken_demos --example rebalance_quality`

use bracken_broadphase::DynamicTree;
use kurbo::Rect;

fn main() {
    let mut tree: DynamicTree<u32> = DynamicTree::new();

    // Two distant clusters, interleaved so incremental insertion produces
    // mixed groupings.
    let mut state = 0x9E37_79B9_7F4A_7C15u64;
    let mut next = || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        ((state >> 11) as f64) / ((1u64 << 53) as f64)
    };
    for i in 0..512u32 {
        let base = if i % 2 == 0 { 0.0 } else { 1000.0 };
        let x = base + next() * 80.0;
        let y = base + next() * 80.0;
        tree.create_proxy(Rect::new(x, y, x + 4.0, y + 4.0), i);
    }

    println!(
        "before: height={} max_balance={} area_ratio={:.3}",
        tree.height(),
        tree.max_balance(),
        tree.area_ratio()
    );

    for round in 1..=8 {
        tree.rebalance(256);
        println!("round {round}: area_ratio={:.3}", tree.area_ratio());
    }

    tree.validate();
    println!(
        "after: height={} max_balance={} area_ratio={:.3}",
        tree.height(),
        tree.max_balance(),
        tree.area_ratio()
    );
}
