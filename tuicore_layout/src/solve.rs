// Copyright 2025 the tuicore Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The deterministic two-pass stack/grid solver.

use alloc::vec;
use alloc::vec::Vec;

use crate::node::{Container, LayoutError, LayoutNode};
use crate::props::{Align, GridTrack, Justify, LayoutProps, MainAxis, Overflow, PositionMode, Size};
use crate::remainder::{distribute, redistribute_with_bounds};
use crate::types::{OverflowMeta, Rect};
use crate::LaidOutNode;

/// Box-model geometry derived from a node's props at a given outer size.
struct BoxModel {
    /// Margin-box rect (what the parent allocated).
    outer: Rect,
    /// Border-box rect (`outer` shrunk by margin).
    border_box: Rect,
    /// Content-box rect (`border_box` shrunk by border + padding).
    content: Rect,
}

fn resolve_box(props: &LayoutProps, outer: Rect) -> BoxModel {
    let border_box = Rect::new(
        outer.x + props.margin.left,
        outer.y + props.margin.top,
        (outer.w - props.margin.horizontal()).max(0),
        (outer.h - props.margin.vertical()).max(0),
    );
    let (bl, bt) = props.border.leading();
    let (br, bb) = props.border.trailing();
    let content = Rect::new(
        border_box.x + bl + props.padding.left,
        border_box.y + bt + props.padding.top,
        (border_box.w - bl - br - props.padding.horizontal()).max(0),
        (border_box.h - bt - bb - props.padding.vertical()).max(0),
    );
    BoxModel { outer, border_box, content }
}

/// Natural (intrinsic) border-box size of a node, given an available cross
/// bound used only to measure children with unconstrained main axis.
fn measure_natural(node: &LayoutNode) -> (i32, i32) {
    let p = &node.props;
    let (bl, bt) = p.border.leading();
    let (br, bb) = p.border.trailing();
    let pad_w = p.padding.horizontal();
    let pad_h = p.padding.vertical();
    let extra_w = bl + br + pad_w;
    let extra_h = bt + bb + pad_h;

    let (content_w, content_h) = match &node.container {
        Container::Leaf => (node.intrinsic_w.max(0), node.intrinsic_h.max(0)),
        Container::Stack { axis } => {
            let flow: Vec<&LayoutNode> =
                node.children.iter().filter(|c| c.props.position != PositionMode::Absolute).collect();
            let mut main = 0i32;
            let mut cross = 0i32;
            for (i, child) in flow.iter().enumerate() {
                let (cw, ch) = natural_border_box(child);
                let (cm, cc) = match axis {
                    MainAxis::Row => (cw, ch),
                    MainAxis::Column => (ch, cw),
                };
                main += cm;
                if i > 0 {
                    main += p.gap;
                }
                cross = cross.max(cc);
            }
            match axis {
                MainAxis::Row => (main, cross),
                MainAxis::Column => (cross, main),
            }
        }
        Container::Grid { columns, rows } => {
            let col_w = track_total(columns);
            let row_h = if rows.is_empty() {
                // One auto row per child, tallest natural height.
                node.children.iter().map(|c| natural_border_box(c).1).max().unwrap_or(0)
            } else {
                track_total(rows)
            };
            (col_w, row_h)
        }
    };
    (content_w + extra_w, content_h + extra_h)
}

fn track_total(tracks: &[GridTrack]) -> i32 {
    tracks
        .iter()
        .map(|t| match t {
            GridTrack::Fixed(n) => (*n).max(0),
            GridTrack::Auto => 0,
        })
        .sum()
}

/// Border-box natural size honoring explicit width/height/aspect-ratio when
/// present (falls back to content-derived natural size otherwise).
fn natural_border_box(node: &LayoutNode) -> (i32, i32) {
    let (nat_w, nat_h) = measure_natural(node);
    let p = &node.props;
    let explicit_w = match p.width {
        Size::Cells(n) => Some(n.max(0)),
        Size::Auto => None,
        _ => None,
    };
    let explicit_h = match p.height {
        Size::Cells(n) => Some(n.max(0)),
        Size::Auto => None,
        _ => None,
    };
    let mut w = explicit_w.unwrap_or(nat_w);
    let mut h = explicit_h.unwrap_or(nat_h);
    if let Some(ratio) = p.aspect_ratio {
        if explicit_w.is_some() && explicit_h.is_none() {
            h = ((w as f64) / ratio).floor() as i32;
        } else if explicit_h.is_some() && explicit_w.is_none() {
            w = ((h as f64) * ratio).floor() as i32;
        }
    }
    (w.clamp(p.min_width, p.max_width), h.clamp(p.min_height, p.max_height))
}

/// Entry point: solve `node`'s own box model against `outer` and recurse.
pub(crate) fn solve_node(node: &LayoutNode, outer: Rect) -> Result<LaidOutNode, LayoutError> {
    node.props.validate().map_err(|detail| LayoutError { node_id: Some(node.id), detail })?;
    let bm = resolve_box(&node.props, outer);

    let (children, meta) = match &node.container {
        Container::Leaf => (Vec::new(), None),
        Container::Stack { axis } => solve_stack(node, *axis, bm.content)?,
        Container::Grid { columns, rows } => solve_grid(node, columns, rows, bm.content)?,
    };

    Ok(LaidOutNode { id: node.id, rect: bm.border_box, meta, children })
}

fn apply_overflow(
    props: &LayoutProps,
    content: Rect,
    content_w: i32,
    content_h: i32,
    children: &mut [LaidOutNode],
) -> Option<OverflowMeta> {
    let scrollable_x = matches!(props.overflow_x, Overflow::Scroll);
    let scrollable_y = matches!(props.overflow_y, Overflow::Scroll);
    if matches!(props.overflow_x, Overflow::Visible) && matches!(props.overflow_y, Overflow::Visible) {
        return None;
    }
    let meta = OverflowMeta {
        scroll_x: 0,
        scroll_y: 0,
        content_w,
        content_h,
        viewport_w: content.w,
        viewport_h: content.h,
        scrollable_x,
        scrollable_y,
    };
    let (sx, sy) = meta.clamp_scroll(props.scroll_x, props.scroll_y);
    if sx != 0 || sy != 0 {
        shift_subtree(children, -sx, -sy);
    }
    Some(OverflowMeta { scroll_x: sx, scroll_y: sy, ..meta })
}

fn shift_subtree(nodes: &mut [LaidOutNode], dx: i32, dy: i32) {
    for n in nodes.iter_mut() {
        n.rect = n.rect.translate(dx, dy);
        shift_subtree(&mut n.children, dx, dy);
    }
}

struct FlowItem<'a> {
    #[allow(dead_code, reason = "kept for future alignSelf support")]
    node: &'a LayoutNode,
    basis: i32,
    min: i32,
    max: i32,
}

fn solve_stack(
    node: &LayoutNode,
    axis: MainAxis,
    content: Rect,
) -> Result<(Vec<LaidOutNode>, Option<OverflowMeta>), LayoutError> {
    let gap = node.props.gap;
    let (main_bound, cross_bound) = match axis {
        MainAxis::Row => (content.w, content.h),
        MainAxis::Column => (content.h, content.w),
    };

    let mut flow_idx = Vec::new();
    let mut absolute_idx = Vec::new();
    for (i, c) in node.children.iter().enumerate() {
        if c.props.position == PositionMode::Absolute {
            absolute_idx.push(i);
        } else {
            flow_idx.push(i);
        }
    }

    let mut items = Vec::with_capacity(flow_idx.len());
    for &i in &flow_idx {
        let child = &node.children[i];
        let (nat_w, nat_h) = natural_border_box(child);
        let (nat_main, nat_cross) = match axis {
            MainAxis::Row => (nat_w, nat_h),
            MainAxis::Column => (nat_h, nat_w),
        };
        let p = &child.props;
        let (min_main, max_main, main_size_prop) = match axis {
            MainAxis::Row => (p.min_width, p.max_width, &p.width),
            MainAxis::Column => (p.min_height, p.max_height, &p.height),
        };
        let basis_size = match &p.flex_basis {
            Some(size) => size.resolve(main_bound, nat_main),
            None => main_size_prop.resolve(main_bound, nat_main),
        };
        let basis = basis_size.clamp(min_main, max_main);
        let _ = nat_cross;
        items.push(FlowItem { node: child, basis, min: min_main, max: max_main });
    }
    let _ = cross_bound;

    let n = items.len();
    let gaps_total = if n > 1 { gap * (n as i32 - 1) } else { 0 };
    let basis_total: i32 = items.iter().map(|it| it.basis).sum();
    let used = basis_total + gaps_total;
    let free = main_bound - used;

    let mut mains: Vec<i32> = items.iter().map(|it| it.basis).collect();

    if free > 0 && n > 0 {
        let weights: Vec<u32> = flow_idx.iter().map(|&i| node.children[i].props.flex).collect();
        if weights.iter().any(|&w| w > 0) {
            let bounds: Vec<(u32, u32)> = items
                .iter()
                .map(|it| (it.basis.max(0) as u32, it.max.max(it.basis).min(i32::MAX) as u32))
                .collect();
            let grown = redistribute_with_bounds(free as u32, &weights, &bounds, &mains.iter().map(|&m| m as u32).collect::<Vec<_>>());
            mains = grown.into_iter().map(|v| v as i32).collect();
        }
    } else if free < 0 && n > 0 {
        let deficit = (-free) as u32;
        let weights: Vec<u32> = flow_idx.iter().map(|&i| node.children[i].props.flex_shrink).collect();
        if weights.iter().any(|&w| w > 0) {
            // Shrinking is modeled as growing a "shrunk-by" quantity from 0
            // up to `basis - floor`, then subtracted from the basis — this
            // lets a capped item return its excess demand to the pool via
            // the same deterministic bounded-redistribution routine grow
            // uses, rather than a one-shot distribute that ignores floors.
            let rooms: Vec<(u32, u32)> =
                items.iter().map(|it| (0u32, (it.basis - it.min).max(0) as u32)).collect();
            let zero_base = vec![0u32; n];
            let shrunk_by = redistribute_with_bounds(deficit, &weights, &rooms, &zero_base);
            for (i, amt) in shrunk_by.into_iter().enumerate() {
                mains[i] = mains[i] - amt as i32;
            }
        }
    }

    let used_main: i32 = mains.iter().sum::<i32>() + gaps_total;
    let leftover = (main_bound - used_main).max(0);

    let (mut cursor, extra_gap) = justify_offsets(node.props.justify, leftover, n);

    let mut out: Vec<LaidOutNode> = vec![placeholder(); node.children.len()];
    let mut max_main_end = 0i32;
    let mut max_cross_extent = 0i32;

    for (k, &i) in flow_idx.iter().enumerate() {
        let child = &node.children[i];
        let main_size = mains[k];
        let (nat_w, nat_h) = natural_border_box(child);
        let cross_size = resolve_cross(&child.props, axis, cross_bound, nat_w, nat_h);

        let cross_pos = align_offset(node.props.align, cross_bound, cross_size);

        let (cx, cy, cw, ch) = match axis {
            MainAxis::Row => (content.x + cursor, content.y + cross_pos, main_size, cross_size),
            MainAxis::Column => (content.x + cross_pos, content.y + cursor, cross_size, main_size),
        };

        let laid = solve_node(child, Rect::new(cx, cy, cw.max(0), ch.max(0)))?;
        max_main_end = max_main_end.max(cursor + main_size);
        max_cross_extent = max_cross_extent.max(cross_pos + cross_size);
        out[i] = laid;

        cursor += main_size;
        if k + 1 < n {
            cursor += gap + extra_gap;
        }
    }

    for &i in &absolute_idx {
        out[i] = solve_absolute(&node.children[i], content)?;
    }

    let (content_w, content_h) = match axis {
        MainAxis::Row => (max_main_end, max_cross_extent),
        MainAxis::Column => (max_cross_extent, max_main_end),
    };
    let mut out = out;
    let meta = apply_overflow(&node.props, content, content_w, content_h, &mut out);
    Ok((out, meta))
}

fn explicit_cells(size: &Size) -> Option<i32> {
    match size {
        Size::Cells(n) => Some((*n).max(0)),
        _ => None,
    }
}

fn resolve_cross(props: &LayoutProps, axis: MainAxis, cross_bound: i32, nat_w: i32, nat_h: i32) -> i32 {
    let (size, min, max, nat) = match axis {
        MainAxis::Row => (&props.height, props.min_height, props.max_height, nat_h),
        MainAxis::Column => (&props.width, props.min_width, props.max_width, nat_w),
    };
    let resolved = match size {
        Size::Auto if props.align == Align::Stretch => cross_bound,
        _ => size.resolve(cross_bound, nat),
    };
    resolved.clamp(min, max)
}

fn align_offset(align: Align, bound: i32, size: i32) -> i32 {
    match align {
        Align::Start | Align::Stretch => 0,
        Align::Center => ((bound - size) / 2).max(0),
        Align::End => (bound - size).max(0),
    }
}

/// Leading cursor offset and extra per-gap spacing for a justify mode.
fn justify_offsets(justify: Justify, leftover: i32, n: usize) -> (i32, i32) {
    if n == 0 || leftover <= 0 {
        return (0, 0);
    }
    match justify {
        Justify::Start => (0, 0),
        Justify::End => (leftover, 0),
        Justify::Center => (leftover / 2, 0),
        Justify::Between => {
            if n < 2 {
                (0, 0)
            } else {
                (0, leftover / (n as i32 - 1))
            }
        }
        Justify::Around => {
            let slot = leftover / n as i32;
            (slot / 2, slot)
        }
        Justify::Evenly => {
            let slot = leftover / (n as i32 + 1);
            (slot, slot)
        }
    }
}

fn solve_absolute(node: &LayoutNode, parent_content: Rect) -> Result<LaidOutNode, LayoutError> {
    let a = &node.props.absolute;
    let (nat_w, nat_h) = natural_border_box(node);

    let w = match (a.left, a.right, explicit_cells(&node.props.width)) {
        (Some(l), Some(r), _) => (parent_content.w - l - r).max(0),
        (_, _, Some(w)) => w,
        _ => node.props.width.resolve(parent_content.w, nat_w),
    };
    let h = match (a.top, a.bottom, explicit_cells(&node.props.height)) {
        (Some(t), Some(b), _) => (parent_content.h - t - b).max(0),
        (_, _, Some(h)) => h,
        _ => node.props.height.resolve(parent_content.h, nat_h),
    };

    let x = if let Some(l) = a.left {
        parent_content.x + l
    } else if let Some(r) = a.right {
        parent_content.x + parent_content.w - r - w
    } else {
        parent_content.x
    };
    let y = if let Some(t) = a.top {
        parent_content.y + t
    } else if let Some(b) = a.bottom {
        parent_content.y + parent_content.h - b - h
    } else {
        parent_content.y
    };

    solve_node(node, Rect::new(x, y, w.max(0), h.max(0)))
}

fn solve_grid(
    node: &LayoutNode,
    columns: &[GridTrack],
    rows: &[GridTrack],
    content: Rect,
) -> Result<(Vec<LaidOutNode>, Option<OverflowMeta>), LayoutError> {
    let gap = node.props.gap;
    let n_cols = columns.len().max(1);
    let col_widths = resolve_tracks(columns, content.w, gap, n_cols);

    let flow: Vec<usize> = node
        .children
        .iter()
        .enumerate()
        .filter(|(_, c)| c.props.position != PositionMode::Absolute)
        .map(|(i, _)| i)
        .collect();

    // Auto-place row-major, honoring explicit placements/spans; compute row count.
    let mut occupied: hashbrown::HashSet<(usize, usize)> = hashbrown::HashSet::new();
    let mut placements: Vec<(usize, usize, usize, i32, i32)> = Vec::new(); // (child_idx, col0, row0, col_span, row_span)
    let mut auto_cursor = 0usize;
    let mut max_row = 0usize;

    for &i in &flow {
        let gp = &node.children[i].props.grid_placement;
        let col_span = gp.col_span.max(1) as usize;
        let col_span = col_span.min(n_cols);
        let (col0, row0) = if let (Some(col), Some(row)) = (gp.column, gp.row) {
            (((col - 1).max(0) as usize).min(n_cols.saturating_sub(1)), (row - 1).max(0) as usize)
        } else {
            loop {
                let col0 = auto_cursor % n_cols;
                let row0 = auto_cursor / n_cols;
                let fits = col0 + col_span <= n_cols
                    && (0..col_span).all(|dc| !occupied.contains(&(col0 + dc, row0)));
                if fits {
                    break (col0, row0);
                }
                auto_cursor += 1;
            }
        };
        for dc in 0..col_span {
            occupied.insert((col0 + dc, row0));
        }
        auto_cursor = auto_cursor.max(row0 * n_cols + col0 + 1);
        max_row = max_row.max(row0 + gp.row_span.max(1) as usize);
        placements.push((i, col0, row0, col_span as i32, gp.row_span.max(1)));
    }

    let row_tracks_full: Vec<GridTrack> = if rows.is_empty() {
        vec![GridTrack::Auto; max_row.max(1)]
    } else {
        rows.to_vec()
    };
    let row_heights = resolve_tracks(&row_tracks_full, content.h, gap, row_tracks_full.len().max(1));

    let col_offsets = track_offsets(&col_widths, gap);
    let row_offsets = track_offsets(&row_heights, gap);

    let mut out: Vec<LaidOutNode> = vec![placeholder(); node.children.len()];
    let mut content_w = 0;
    let mut content_h = 0;

    for (i, col0, row0, col_span, row_span) in placements {
        let col_span_clamped = col_span.min((n_cols - col0) as i32).max(1) as usize;
        let row_end = (row0 + row_span.max(1) as usize).min(row_heights.len().max(row0 + 1));
        let w: i32 = col_widths[col0..(col0 + col_span_clamped).min(col_widths.len())].iter().sum::<i32>()
            + gap * (col_span_clamped as i32 - 1).max(0);
        let h: i32 = row_heights.get(row0..row_end).map(|s| s.iter().sum::<i32>()).unwrap_or(0)
            + gap * (row_end.saturating_sub(row0) as i32 - 1).max(0);
        let x = content.x + col_offsets.get(col0).copied().unwrap_or(0);
        let y = content.y + row_offsets.get(row0).copied().unwrap_or(0);
        let laid = solve_node(&node.children[i], Rect::new(x, y, w.max(0), h.max(0)))?;
        content_w = content_w.max(x - content.x + w);
        content_h = content_h.max(y - content.y + h);
        out[i] = laid;
    }

    for (i, child) in node.children.iter().enumerate() {
        if child.props.position == PositionMode::Absolute {
            out[i] = solve_absolute(child, content)?;
        }
    }

    let mut out = out;
    let meta = apply_overflow(&node.props, content, content_w, content_h, &mut out);
    Ok((out, meta))
}

fn resolve_tracks(tracks: &[GridTrack], bound: i32, gap: i32, n: usize) -> Vec<i32> {
    let gaps_total = if n > 1 { gap * (n as i32 - 1) } else { 0 };
    let available = (bound - gaps_total).max(0);
    let fixed_total: i32 = tracks
        .iter()
        .map(|t| match t {
            GridTrack::Fixed(w) => (*w).max(0),
            GridTrack::Auto => 0,
        })
        .sum();
    let auto_count = tracks.iter().filter(|t| matches!(t, GridTrack::Auto)).count();
    let remainder = (available - fixed_total).max(0);
    let auto_shares = if auto_count > 0 {
        distribute(remainder as u32, &vec![1u32; auto_count])
    } else {
        Vec::new()
    };
    let mut auto_iter = auto_shares.into_iter();
    tracks
        .iter()
        .map(|t| match t {
            GridTrack::Fixed(w) => (*w).max(0),
            GridTrack::Auto => auto_iter.next().unwrap_or(0) as i32,
        })
        .collect()
}

fn track_offsets(sizes: &[i32], gap: i32) -> Vec<i32> {
    let mut offsets = Vec::with_capacity(sizes.len());
    let mut cursor = 0;
    for &s in sizes {
        offsets.push(cursor);
        cursor += s + gap;
    }
    offsets
}

fn placeholder() -> LaidOutNode {
    LaidOutNode { id: 0, rect: Rect::ZERO, meta: None, children: Vec::new() }
}
