// Copyright 2026 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Broad-phase basics.
//!
//! Create a few proxies, move one, and query a window.
//!
//! Run:
//! - `cargo run -p bracken_demos --example broadphase_basics`

use bracken_broadphase::DynamicTree;
use kurbo::{Rect, Vec2};

fn main() {
    let mut tree: DynamicTree<&str> = DynamicTree::new();

    let player = tree.create_proxy(Rect::new(0.0, 0.0, 1.0, 2.0), "player");
    let crate_a = tree.create_proxy(Rect::new(4.0, 0.0, 5.0, 1.0), "crate a");
    let crate_b = tree.create_proxy(Rect::new(9.0, 0.0, 10.0, 1.0), "crate b");

    // A small step stays inside the fat box; nothing is restructured.
    let moved = tree.move_proxy(player, Rect::new(0.05, 0.0, 1.05, 2.0), Vec2::new(0.05, 0.0));
    println!("small step restructured: {moved}");

    // A real jump re-inserts the leaf with a motion-extended fat box.
    let moved = tree.move_proxy(player, Rect::new(3.0, 0.0, 4.0, 2.0), Vec2::new(3.0, 0.0));
    println!("jump restructured: {moved}");
    assert!(moved, "a jump past the margin must restructure");

    // Who might the player touch now?
    let mut candidates = Vec::new();
    tree.query(tree.fat_aabb(player), |id| {
        if id != player {
            candidates.push(tree.user_data(id));
        }
        true
    });
    println!("candidates near the player: {candidates:?}");
    assert!(candidates.contains(&"crate a"));

    tree.destroy_proxy(crate_a);
    tree.destroy_proxy(crate_b);
    tree.validate();
    println!("tree after cleanup: {tree:?}");
}
