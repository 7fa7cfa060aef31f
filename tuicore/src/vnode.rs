// Copyright 2025 the tuicore Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The immutable view-tree node type a host's `view(state)` function
//! produces each frame.
//!
//! `Kind` is a closed tagged union covering the layout-relevant and
//! routing-relevant node kinds; widget-specific visual recipes beyond what
//! the core needs to reconcile, lay out, and route are intentionally out
//! of scope, so a handful of kinds this core does not specialize fall back
//! to [`Kind::Custom`], a name plus an opaque prop bag the host interprets
//! itself. This mirrors how the reconciler is generic over
//! `Kind: PartialEq + Clone` and never inspects it beyond equality.

use std::string::String;
use std::vec::Vec;

use tuicore_layout::{GridTrack, LayoutProps};

/// The closed set of node kinds the core itself understands structurally
/// (participates in focus zones/traps, needs a specific router, or the
/// layout engine special-cases it beyond generic flex/grid props).
///
/// Purely presentational kinds (charts, markdown, progress bars, and
/// dozens of others) are represented as [`Kind::Custom`]; the engine lays
/// them out like any other box and does not need to special-case their
/// rendering.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Leaf text content.
    Text,
    /// Row stack container (main axis: horizontal).
    Row,
    /// Column stack container (main axis: vertical).
    Column,
    /// Generic box container (no intrinsic stacking axis).
    Box,
    /// A focusable, clickable control.
    Button,
    /// A focusable single-line text entry.
    Input,
    /// A grid-track container.
    Grid,
    /// A tabular layout with header/row semantics for its own router.
    Table,
    /// An expandable/collapsible hierarchical list.
    Tree,
    /// A windowed list over a large/unbounded item count.
    VirtualList,
    /// A named focus-traversal boundary.
    FocusZone,
    /// A focus zone that additionally forbids focus from leaving it.
    FocusTrap,
    /// An overlay that traps focus and closes on Escape by default.
    Modal,
    /// A non-modal overlay participating in the LIFO escape-router stack.
    Layer,
    /// A popup list bound to an anchor control.
    Dropdown,
    /// A tab strip plus its associated panel switching.
    Tabs,
    /// A collapsible section list.
    Accordion,
    /// A wrapper that plays an animation while its child enters or exits.
    Transition,
    /// Any other presentational kind, named by the host and otherwise
    /// treated as an opaque box for layout/reconciliation purposes.
    Custom(String),
}

/// An opaque, host-defined props bag.
///
/// The core treats this as a blob consulted only for the handful of fields
/// it understands structurally (see [`VNode::layout_props`],
/// [`VNode::id`], [`VNode::key`]); everything else is forwarded verbatim to
/// the drawlist builder or widget router by the host.
pub type Props = hashbrown::HashMap<String, PropValue>;

/// A dynamically typed prop value, broad enough to cover every scalar the
/// spec's layout/focus/router props need without the host hand-rolling a
/// parser for each node kind.
#[derive(Clone, Debug, PartialEq)]
pub enum PropValue {
    /// A UTF-8 string value (text content, size literals, labels, …).
    Str(String),
    /// An integer value.
    Int(i64),
    /// A floating-point value (spring configs, aspect ratios, …).
    Float(f64),
    /// A boolean flag.
    Bool(bool),
}

/// An immutable view-tree node produced by the view function.
#[derive(Clone, Debug)]
pub struct VNode {
    /// The closed kind this node belongs to.
    pub kind: Kind,
    /// User-stable handle, independent of reconciliation identity.
    pub id: Option<String>,
    /// Sibling-scoped identity hint consumed by the reconciler.
    pub key: Option<String>,
    /// Opaque props bag; widget routers and the drawlist builder interpret
    /// kind-specific entries the core itself does not.
    pub props: Props,
    /// Resolved layout properties for this node (already validated/parsed;
    /// see [`tuicore_layout::LayoutProps`]).
    pub layout: LayoutProps,
    /// Column/row track definitions, consulted only when `kind ==
    /// Kind::Grid`; `None` for every other kind.
    pub grid_tracks: Option<(Vec<GridTrack>, Vec<GridTrack>)>,
    /// Natural content size for leaf kinds with no children (e.g. measured
    /// text); ignored for container kinds, whose size is derived from their
    /// children.
    pub intrinsic_size: (i32, i32),
    /// Ordered children. A `None` entry is an explicit hole: see
    /// [`tuicore_reconciler::reconcile`] for its effect on slot assignment.
    pub children: Vec<Option<VNode>>,
}

impl VNode {
    /// Construct a childless leaf node.
    #[must_use]
    pub fn leaf(kind: Kind, layout: LayoutProps) -> Self {
        Self {
            kind,
            id: None,
            key: None,
            props: Props::new(),
            layout,
            grid_tracks: None,
            intrinsic_size: (0, 0),
            children: Vec::new(),
        }
    }

    /// Construct a container node with the given children.
    #[must_use]
    pub fn with_children(kind: Kind, layout: LayoutProps, children: Vec<Option<Self>>) -> Self {
        Self {
            kind,
            id: None,
            key: None,
            props: Props::new(),
            layout,
            grid_tracks: None,
            intrinsic_size: (0, 0),
            children,
        }
    }

    /// Set the natural content size used when this node is a childless leaf.
    #[must_use]
    pub fn with_intrinsic_size(mut self, w: i32, h: i32) -> Self {
        self.intrinsic_size = (w, h);
        self
    }

    /// Attach grid track definitions; only consulted when `kind ==
    /// Kind::Grid`.
    #[must_use]
    pub fn with_grid_tracks(mut self, columns: Vec<GridTrack>, rows: Vec<GridTrack>) -> Self {
        self.grid_tracks = Some((columns, rows));
        self
    }

    /// Attach a sibling-scoped identity key, consumed by the reconciler.
    #[must_use]
    pub fn keyed(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Attach a user-stable handle, independent of reconciliation identity.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set a single prop entry, builder-style.
    #[must_use]
    pub fn prop(mut self, name: impl Into<String>, value: PropValue) -> Self {
        self.props.insert(name.into(), value);
        self
    }

    /// Whether this kind participates in the focus zone graph as a zone
    /// (not necessarily a trap).
    #[must_use]
    pub fn is_focus_zone(&self) -> bool {
        matches!(self.kind, Kind::FocusZone | Kind::FocusTrap | Kind::Modal)
    }

    /// Whether this kind is always a trap (forbids focus leaving by
    /// traversal, only by explicit deactivation).
    #[must_use]
    pub fn is_focus_trap(&self) -> bool {
        matches!(self.kind, Kind::FocusTrap | Kind::Modal)
    }

    /// Whether this kind is independently focusable (a leaf target, not
    /// just a zone boundary).
    #[must_use]
    pub fn is_focusable(&self) -> bool {
        matches!(self.kind, Kind::Button | Kind::Input | Kind::Dropdown) || self.props.contains_key("focusable")
    }

    /// Inter-zone Tab-cycling order; only consulted when [`Self::is_focus_zone`].
    #[must_use]
    pub fn tab_index(&self) -> i32 {
        match self.props.get("tab_index") {
            Some(PropValue::Int(v)) => i32::try_from(*v).unwrap_or(i32::MAX),
            _ => 0,
        }
    }

    /// Whether `Next`/`Prev` traversal wraps at this zone's ends.
    #[must_use]
    pub fn wrap_around(&self) -> bool {
        matches!(self.props.get("wrap_around"), Some(PropValue::Bool(true)))
    }

    /// Grid column count for directional navigation within this zone, if
    /// declared; `None` selects linear (Tab-order) traversal instead.
    #[must_use]
    pub fn nav_columns(&self) -> Option<u32> {
        match self.props.get("nav_columns") {
            Some(PropValue::Int(v)) if *v > 0 => u32::try_from(*v).ok(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custom_kind_compares_by_name() {
        let a = Kind::Custom("chart".into());
        let b = Kind::Custom("chart".into());
        let c = Kind::Custom("sparkline".into());
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn button_is_focusable_button_is_not_a_zone() {
        let button = VNode::leaf(Kind::Button, LayoutProps::default());
        assert!(button.is_focusable());
        assert!(!button.is_focus_zone());
    }

    #[test]
    fn modal_is_both_zone_and_trap() {
        let modal = VNode::leaf(Kind::Modal, LayoutProps::default());
        assert!(modal.is_focus_zone());
        assert!(modal.is_focus_trap());
    }
}
