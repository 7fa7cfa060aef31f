// Copyright 2025 the tuicore Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Key routing for the `tabs` widget kind.

use crate::keys;
use crate::types::{KeyAction, KeyEvent};

/// Action a tabs widget's key router asks the host to perform.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TabsAction {
    /// Activate the next tab, wrapping at the end.
    Next,
    /// Activate the previous tab, wrapping at the start.
    Prev,
    /// Jump directly to a tab index.
    SelectIndex(usize),
}

/// Committed state a tabs router needs to decide the next action.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TabsContext {
    /// Total number of tabs.
    pub tab_count: usize,
}

/// Route one key event to a focused tabs widget.
#[must_use]
pub fn route(ev: &KeyEvent, ctx: &TabsContext) -> Option<TabsAction> {
    if !matches!(ev.action, KeyAction::Down | KeyAction::Repeat) || ctx.tab_count == 0 {
        return None;
    }
    match ev.key_code {
        keys::ARROW_LEFT => Some(TabsAction::Prev),
        keys::ARROW_RIGHT => Some(TabsAction::Next),
        keys::HOME => Some(TabsAction::SelectIndex(0)),
        keys::END => Some(TabsAction::SelectIndex(ctx.tab_count - 1)),
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
    fn arrow_keys_cycle_direction() {
        let ctx = TabsContext { tab_count: 3 };
        assert_eq!(route(&key(keys::ARROW_RIGHT), &ctx), Some(TabsAction::Next));
        assert_eq!(route(&key(keys::ARROW_LEFT), &ctx), Some(TabsAction::Prev));
    }

    #[test]
    fn end_selects_last_index() {
        let ctx = TabsContext { tab_count: 5 };
        assert_eq!(route(&key(keys::END), &ctx), Some(TabsAction::SelectIndex(4)));
    }

    #[test]
    fn empty_tab_set_ignores_all_keys() {
        let ctx = TabsContext { tab_count: 0 };
        assert_eq!(route(&key(keys::ARROW_RIGHT), &ctx), None);
    }
}
