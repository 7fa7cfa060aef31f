// Copyright 2025 the tuicore Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Key routing for the `dropdown` widget kind.

use crate::keys;
use crate::types::{KeyAction, KeyEvent};

/// Action a dropdown's key router asks the host to perform.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DropdownAction {
    /// Open the option list.
    Open,
    /// Close the option list without changing the selection.
    Close,
    /// Move the highlighted option by `delta` (negative is up).
    MoveHighlight(i32),
    /// Commit the currently highlighted option and close.
    Select(usize),
}

/// Committed state a dropdown router needs to decide the next action.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct DropdownContext {
    /// Whether the option list is currently open.
    pub open: bool,
    /// Index of the currently highlighted option.
    pub highlighted: usize,
}

/// Route one key event to a focused dropdown.
#[must_use]
pub fn route(ev: &KeyEvent, ctx: &DropdownContext) -> Option<DropdownAction> {
    if !matches!(ev.action, KeyAction::Down | KeyAction::Repeat) {
        return None;
    }
    match ev.key_code {
        keys::ENTER | keys::SPACE if !ctx.open => Some(DropdownAction::Open),
        keys::ENTER if ctx.open => Some(DropdownAction::Select(ctx.highlighted)),
        keys::ESCAPE if ctx.open => Some(DropdownAction::Close),
        keys::ARROW_DOWN if !ctx.open => Some(DropdownAction::Open),
        keys::ARROW_DOWN => Some(DropdownAction::MoveHighlight(1)),
        keys::ARROW_UP if ctx.open => Some(DropdownAction::MoveHighlight(-1)),
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
    fn arrow_down_opens_closed_dropdown() {
        let ctx = DropdownContext { open: false, highlighted: 0 };
        assert_eq!(route(&key(keys::ARROW_DOWN), &ctx), Some(DropdownAction::Open));
    }

    #[test]
    fn arrow_down_moves_highlight_when_open() {
        let ctx = DropdownContext { open: true, highlighted: 0 };
        assert_eq!(route(&key(keys::ARROW_DOWN), &ctx), Some(DropdownAction::MoveHighlight(1)));
    }

    #[test]
    fn enter_selects_highlighted_when_open() {
        let ctx = DropdownContext { open: true, highlighted: 2 };
        assert_eq!(route(&key(keys::ENTER), &ctx), Some(DropdownAction::Select(2)));
    }

    #[test]
    fn escape_closes_open_dropdown() {
        let ctx = DropdownContext { open: true, highlighted: 0 };
        assert_eq!(route(&key(keys::ESCAPE), &ctx), Some(DropdownAction::Close));
    }

    #[test]
    fn key_up_events_are_ignored() {
        let ctx = DropdownContext { open: true, highlighted: 0 };
        let ev = KeyEvent { action: KeyAction::Up, ..key(keys::ENTER) };
        assert_eq!(route(&ev, &ctx), None);
    }
}
