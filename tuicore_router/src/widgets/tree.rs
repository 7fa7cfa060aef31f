// Copyright 2025 the tuicore Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Key routing for the `tree` widget kind.

use crate::keys;
use crate::types::{KeyAction, KeyEvent};

/// Action a tree's key router asks the host to perform on the focused node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TreeAction {
    /// Move focus to the previous visible row.
    MoveUp,
    /// Move focus to the next visible row.
    MoveDown,
    /// Expand a collapsed branch node.
    Expand,
    /// Collapse an expanded branch node.
    Collapse,
    /// Activate the focused node (open a file, run a command, ...).
    Activate,
}

/// Committed state a tree router needs to decide the next action.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TreeContext {
    /// Whether the focused node has children (is a branch, not a leaf).
    pub has_children: bool,
    /// Whether the focused branch is currently expanded.
    pub expanded: bool,
}

/// Route one key event to a focused tree.
#[must_use]
pub fn route(ev: &KeyEvent, ctx: &TreeContext) -> Option<TreeAction> {
    if !matches!(ev.action, KeyAction::Down | KeyAction::Repeat) {
        return None;
    }
    match ev.key_code {
        keys::ARROW_UP => Some(TreeAction::MoveUp),
        keys::ARROW_DOWN => Some(TreeAction::MoveDown),
        keys::ARROW_RIGHT if ctx.has_children && !ctx.expanded => Some(TreeAction::Expand),
        keys::ARROW_LEFT if ctx.has_children && ctx.expanded => Some(TreeAction::Collapse),
        keys::ENTER | keys::SPACE => Some(TreeAction::Activate),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Mods;

    fn key(code: u32) -> KeyEvent {
        KeyEvent { time_ms: 0, key_code: code, mods: Mods::empty(), action: KeyAction::Down }
    }

    #[test]
    fn arrow_right_expands_collapsed_branch() {
        let ctx = TreeContext { has_children: true, expanded: false };
        assert_eq!(route(&key(keys::ARROW_RIGHT), &ctx), Some(TreeAction::Expand));
    }

    #[test]
    fn arrow_right_on_leaf_does_nothing() {
        let ctx = TreeContext { has_children: false, expanded: false };
        assert_eq!(route(&key(keys::ARROW_RIGHT), &ctx), None);
    }

    #[test]
    fn arrow_left_collapses_expanded_branch() {
        let ctx = TreeContext { has_children: true, expanded: true };
        assert_eq!(route(&key(keys::ARROW_LEFT), &ctx), Some(TreeAction::Collapse));
    }

    #[test]
    fn vertical_navigation_always_available() {
        let ctx = TreeContext { has_children: false, expanded: false };
        assert_eq!(route(&key(keys::ARROW_DOWN), &ctx), Some(TreeAction::MoveDown));
        assert_eq!(route(&key(keys::ARROW_UP), &ctx), Some(TreeAction::MoveUp));
    }
}
