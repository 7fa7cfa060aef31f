// Copyright 2025 the tuicore Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Wheel routing: nearest-scrollable-ancestor dispatch through nested
//! `overflow: scroll` containers.

use tuicore_layout::LaidOutNode;

use crate::types::WheelRouted;

/// Lines scrolled per wheel tick. Not a contract the codec or focus state
/// depend on; a host backend reporting pixel deltas should pre-convert to
/// ticks before calling [`route_wheel`].
const WHEEL_STEP_LINES: i32 = 3;

/// Walk `root`'s hit-path at `(x, y)` from leaf to root and hand the wheel
/// delta to the nearest ancestor with room to scroll on at least one axis.
/// Ancestors further out are left untouched.
#[must_use]
pub fn route_wheel(root: &LaidOutNode, x: i32, y: i32, wheel_x: i32, wheel_y: i32) -> Option<WheelRouted> {
    let path = root.path_to_point(x, y);
    let want_dx = wheel_x * WHEEL_STEP_LINES;
    let want_dy = wheel_y * WHEEL_STEP_LINES;

    for node in path.iter().rev() {
        let Some(meta) = node.meta else { continue };
        let can_x = meta.can_scroll_horizontally(want_dx);
        let can_y = meta.can_scroll_vertically(want_dy);
        if !can_x && !can_y {
            continue;
        }
        let requested_x = if can_x { meta.scroll_x + want_dx } else { meta.scroll_x };
        let requested_y = if can_y { meta.scroll_y + want_dy } else { meta.scroll_y };
        let (scroll_x, scroll_y) = meta.clamp_scroll(requested_x, requested_y);
        log::debug!("wheel: {} consumed ({wheel_x},{wheel_y}) -> ({scroll_x},{scroll_y})", node.id);
        return Some(WheelRouted { id: node.id, scroll_x, scroll_y });
    }
    None
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use tuicore_layout::{OverflowMeta, Rect};

    use super::*;

    fn leaf(id: u64, rect: Rect, meta: Option<OverflowMeta>, children: vec::Vec<LaidOutNode>) -> LaidOutNode {
        LaidOutNode { id, rect, meta, children }
    }

    fn scrollable(scroll_y: i32) -> OverflowMeta {
        OverflowMeta {
            scroll_x: 0,
            scroll_y,
            content_w: 10,
            content_h: 100,
            viewport_w: 10,
            viewport_h: 10,
            scrollable_x: false,
            scrollable_y: true,
        }
    }

    /// Two nested `overflow: scroll` containers, mouse over the inner leaf:
    /// inner.scrollY increases by 3, outer.scrollY unchanged.
    #[test]
    fn wheel_in_nested_scroll_prefers_inner() {
        let inner_leaf = leaf(3, Rect::new(0, 0, 10, 10), None, vec![]);
        let inner = leaf(2, Rect::new(0, 0, 10, 10), Some(scrollable(0)), vec![inner_leaf]);
        let outer = leaf(1, Rect::new(0, 0, 10, 10), Some(scrollable(5)), vec![inner]);

        let routed = route_wheel(&outer, 5, 5, 0, 1).expect("inner container consumes the wheel event");
        assert_eq!(routed.id, 2);
        assert_eq!(routed.scroll_y, 3);
    }

    #[test]
    fn wheel_falls_through_to_outer_when_inner_is_exhausted() {
        let inner_leaf = leaf(3, Rect::new(0, 0, 10, 10), None, vec![]);
        let mut inner_meta = scrollable(90);
        inner_meta.content_h = 100;
        inner_meta.viewport_h = 10;
        let inner = leaf(2, Rect::new(0, 0, 10, 10), Some(inner_meta), vec![inner_leaf]);
        let outer = leaf(1, Rect::new(0, 0, 10, 10), Some(scrollable(5)), vec![inner]);

        // Inner is already scrolled to its max (90 = 100 - 10); downward wheel
        // has no room there, so the outer ancestor consumes it instead.
        let routed = route_wheel(&outer, 5, 5, 0, 1).expect("outer consumes once inner is exhausted");
        assert_eq!(routed.id, 1);
        assert_eq!(routed.scroll_y, 8);
    }

    #[test]
    fn wheel_outside_any_container_routes_nowhere() {
        let leaf_node = leaf(1, Rect::new(0, 0, 10, 10), Some(scrollable(0)), vec![]);
        assert!(route_wheel(&leaf_node, 50, 50, 0, 1).is_none());
    }
}
