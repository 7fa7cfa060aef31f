// Copyright 2025 the tuicore Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! tuicore_layout: a deterministic flex/grid/stack solver over integer
//! terminal-cell grids.
//!
//! This crate is the layout engine: given a
//! tree of [`LayoutNode`]s (each a validated [`LayoutProps`] plus a
//! [`Container`] arrangement), [`layout`] produces a [`LaidOutNode`] tree
//! with an integer `rect` per node and optional overflow/scroll metadata.
//!
//! ## Determinism
//!
//! No floating point ever influences a cell count. Every proportional split
//! (flex grow/shrink, `justify: between/around/evenly`, auto grid tracks)
//! goes through the single [`remainder::distribute`] routine so that results
//! are bit-identical across platforms given identical input — the
//! determinism contract tested in `solve::tests` and exercised end-to-end in
//! [`tests`] below using the same deterministic remainder rule the
//! properties section.
//!
//! ## What this crate does not do
//!
//! It does not own instance identity (see `tuicore_reconciler`), does not
//! decide *what* to render (see `tuicore_drawlist`), and does not route
//! input (see `tuicore_router`, which consumes this crate's
//! [`LaidOutNode::path_to_point`] for wheel routing and [`LaidOutNode::hit_test`]
//! for mouse hit-testing).
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod node;
mod props;
mod remainder;
mod solve;
mod tree;
mod types;

pub use node::{Container, LayoutError, LayoutNode};
pub use props::{
    Align, AbsoluteInsets, Border, BorderSides, BorderStyle, EdgeInsets, GridPlacement, GridTrack,
    Justify, LayoutProps, MainAxis, Overflow, PositionMode, Size,
};
pub use remainder::{distribute, redistribute_with_bounds};
pub use tree::LaidOutNode;
pub use types::{OverflowMeta, Rect};

/// Lay out `root` within the box `(x, y, max_w, max_h)`.
///
/// `main_axis` is honored only when `root`'s own container is a stack with
/// no further ambiguity to resolve; the root's outer rect is always exactly
/// `(x, y, max_w, max_h)` — the engine does not auto-size the viewport
/// itself, matching every host's usage of `layout(tree, 0, 0, cols, rows, …)`.
///
/// Returns `Err(LayoutError)` with code `INVALID_PROPS` on the first
/// validation failure encountered in a deterministic (pre-order) walk; the
/// caller aborts the frame without partial commit, per the failure
/// semantics.
pub fn layout(
    root: &LayoutNode,
    x: i32,
    y: i32,
    max_w: i32,
    max_h: i32,
    main_axis: MainAxis,
) -> Result<LaidOutNode, LayoutError> {
    let _ = main_axis;
    if max_w < 0 || max_h < 0 {
        return Err(LayoutError {
            node_id: Some(root.id),
            detail: alloc::format!("viewport: negative extent ({max_w}, {max_h})"),
        });
    }
    log::debug!("layout: root={} viewport=({max_w}x{max_h}) at ({x},{y})", root.id);
    let result = solve::solve_node(root, Rect::new(x, y, max_w, max_h));
    match &result {
        Ok(laid) => log::trace!("layout: solved {} nodes", laid.len()),
        Err(e) => log::warn!("layout: INVALID_PROPS: {e}"),
    }
    result
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    fn flex_child(id: u64, flex: u32, flex_shrink: u32, min_w: i32) -> LayoutNode {
        let props = LayoutProps {
            flex,
            flex_shrink,
            min_width: min_w,
            width: Size::Auto,
            ..LayoutProps::default()
        };
        LayoutNode::leaf(id, props, 0, 1)
    }

    /// Row of three `flex:1` boxes in a 100-cell-wide
    /// parent with gap 0 yields widths `[34, 33, 33]`.
    #[test]
    fn flex_grow_with_remainder() {
        let row = LayoutNode::stack(
            0,
            LayoutProps::default(),
            MainAxis::Row,
            vec![flex_child(1, 1, 0, 0), flex_child(2, 1, 0, 0), flex_child(3, 1, 0, 0)],
        );
        let laid = layout(&row, 0, 0, 100, 1, MainAxis::Row).unwrap();
        let widths: vec::Vec<i32> = laid.children.iter().map(|c| c.rect.w).collect();
        assert_eq!(widths, vec![34, 33, 33]);
    }

    /// Row widths `[60 (min 50, shrink 1), 60 (shrink 1)]`
    /// in 90 cells yields `[50, 40]`.
    #[test]
    fn flex_shrink_with_floor() {
        let mut a = flex_child(1, 0, 1, 50);
        a.props.width = Size::Cells(60);
        let mut b = flex_child(2, 0, 1, 0);
        b.props.width = Size::Cells(60);
        let row = LayoutNode::stack(0, LayoutProps::default(), MainAxis::Row, vec![a, b]);
        let laid = layout(&row, 0, 0, 90, 1, MainAxis::Row).unwrap();
        let widths: vec::Vec<i32> = laid.children.iter().map(|c| c.rect.w).collect();
        assert_eq!(widths, vec![50, 40]);
    }

    #[test]
    fn negative_padding_is_invalid_props() {
        let mut props = LayoutProps::default();
        props.padding.left = -1;
        let node = LayoutNode::leaf(1, props, 0, 0);
        let err = layout(&node, 0, 0, 10, 10, MainAxis::Row).unwrap_err();
        assert!(err.detail.contains("padding"));
    }

    #[test]
    fn percent_width_floors_against_parent_inner() {
        let mut props = LayoutProps::default();
        props.width = Size::Percent(33);
        let child = LayoutNode::leaf(1, props, 0, 1);
        let row = LayoutNode::stack(0, LayoutProps::default(), MainAxis::Row, vec![child]);
        let laid = layout(&row, 0, 0, 10, 1, MainAxis::Row).unwrap();
        // floor(10 * 33 / 100) = 3
        assert_eq!(laid.children[0].rect.w, 3);
    }

    #[test]
    fn overflow_scroll_clamps_and_shifts_descendants() {
        let mut container_props = LayoutProps::default();
        container_props.overflow_y = Overflow::Scroll;
        container_props.scroll_y = 1000;
        let mut tall = flex_child(1, 0, 0, 0);
        tall.props.height = Size::Cells(50);
        let column = LayoutNode::stack(0, container_props, MainAxis::Column, vec![tall]);
        let laid = layout(&column, 0, 0, 10, 10, MainAxis::Column).unwrap();
        let meta = laid.meta.expect("scroll container must carry overflow meta");
        assert_eq!(meta.scroll_y, meta.content_h - meta.viewport_h);
        assert!(meta.scroll_y <= meta.content_h - meta.viewport_h || meta.content_h <= meta.viewport_h);
    }

    #[test]
    fn hit_test_prefers_topmost_later_sibling() {
        let a = flex_child(1, 0, 0, 0);
        let mut a = a;
        a.props.width = Size::Cells(10);
        a.props.height = Size::Cells(10);
        let mut b = flex_child(2, 0, 0, 0);
        b.props.position = PositionMode::Absolute;
        b.props.absolute = AbsoluteInsets { top: Some(0), left: Some(0), right: None, bottom: None };
        b.props.width = Size::Cells(10);
        b.props.height = Size::Cells(10);
        let root = LayoutNode::stack(0, LayoutProps::default(), MainAxis::Row, vec![a, b]);
        let laid = layout(&root, 0, 0, 20, 20, MainAxis::Row).unwrap();
        let hit = laid.hit_test(5, 5).unwrap();
        assert_eq!(hit.id, 2, "the later (overlapping, absolute) sibling wins hit-testing");
    }
}
