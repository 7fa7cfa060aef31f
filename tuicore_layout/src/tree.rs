// Copyright 2025 the tuicore Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The result tree handed back from [`crate::layout`], plus hit-testing and
//! traversal helpers used by the router and scroll metadata consumers.

use alloc::vec::Vec;

use crate::types::{OverflowMeta, Rect};

/// One node of the committed `LayoutTree`: a rect, optional
/// overflow metadata, and children in paint order.
#[derive(Clone, Debug)]
pub struct LaidOutNode {
    /// Correlates back to the [`crate::LayoutNode`] this was solved from.
    pub id: u64,
    /// Border-box rect in the coordinate space of the root passed to
    /// [`crate::layout`] (i.e. already offset by ancestors, already shifted
    /// for ancestor scroll).
    pub rect: Rect,
    /// Overflow/scroll metadata, present only when this node resolved a
    /// non-`visible` overflow on at least one axis.
    pub meta: Option<OverflowMeta>,
    /// Children in document (paint) order.
    pub children: Vec<LaidOutNode>,
}

impl LaidOutNode {
    /// Returns the deepest descendant (including `self`) whose rect contains
    /// `(x, y)`, preferring later siblings at equal depth (paint-order
    /// topmost), as required for mouse hit-testing.
    #[must_use]
    pub fn hit_test(&self, x: i32, y: i32) -> Option<&Self> {
        if !self.rect.contains_point(x, y) {
            return None;
        }
        for child in self.children.iter().rev() {
            if let Some(hit) = child.hit_test(x, y) {
                return Some(hit);
            }
        }
        Some(self)
    }

    /// Returns the root-to-leaf chain of nodes whose rects contain
    /// `(x, y)`, deepest last. Used by wheel routing, which needs to walk
    /// from the leaf back up to the root looking for a scrollable ancestor.
    #[must_use]
    pub fn path_to_point(&self, x: i32, y: i32) -> Vec<&Self> {
        let mut path = Vec::new();
        self.collect_path(x, y, &mut path);
        path
    }

    fn collect_path<'a>(&'a self, x: i32, y: i32, path: &mut Vec<&'a Self>) {
        if !self.rect.contains_point(x, y) {
            return;
        }
        path.push(self);
        for child in &self.children {
            child.collect_path(x, y, path);
        }
    }

    /// Depth-first search by correlated id.
    #[must_use]
    pub fn find(&self, id: u64) -> Option<&Self> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(id))
    }

    /// Total node count in this subtree, including `self`.
    #[must_use]
    pub fn len(&self) -> usize {
        1 + self.children.iter().map(Self::len).sum::<usize>()
    }

    /// Returns `true` if this subtree has no nodes beyond `self`... never
    /// true in practice (a node always contains itself); kept for API
    /// symmetry with container types that can be empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }
}
