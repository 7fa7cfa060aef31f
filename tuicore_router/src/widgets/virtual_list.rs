// Copyright 2025 the tuicore Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Key routing for the `virtualList` widget kind.

use crate::keys;
use crate::types::{KeyAction, KeyEvent};

/// Action a virtual list's key router asks the host to perform.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum VirtualListAction {
    /// Move the selected index by `delta` rows (negative is up), clamped to
    /// `[0, len - 1]` by the host.
    MoveBy(i32),
    /// Jump to the first row.
    MoveToStart,
    /// Jump to the last row.
    MoveToEnd,
    /// Move by one viewport page of rows (negative is up).
    PageBy(i32),
    /// Activate the selected row.
    Activate,
}

/// Route one key event to a focused virtual list.
#[must_use]
pub fn route(ev: &KeyEvent) -> Option<VirtualListAction> {
    if !matches!(ev.action, KeyAction::Down | KeyAction::Repeat) {
        return None;
    }
    match ev.key_code {
        keys::ARROW_UP => Some(VirtualListAction::MoveBy(-1)),
        keys::ARROW_DOWN => Some(VirtualListAction::MoveBy(1)),
        keys::PAGE_UP => Some(VirtualListAction::PageBy(-1)),
        keys::PAGE_DOWN => Some(VirtualListAction::PageBy(1)),
        keys::HOME => Some(VirtualListAction::MoveToStart),
        keys::END => Some(VirtualListAction::MoveToEnd),
        keys::ENTER => Some(VirtualListAction::Activate),
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
    fn arrow_keys_move_by_one() {
        assert_eq!(route(&key(keys::ARROW_DOWN)), Some(VirtualListAction::MoveBy(1)));
        assert_eq!(route(&key(keys::ARROW_UP)), Some(VirtualListAction::MoveBy(-1)));
    }

    #[test]
    fn home_and_end_jump_to_bounds() {
        assert_eq!(route(&key(keys::HOME)), Some(VirtualListAction::MoveToStart));
        assert_eq!(route(&key(keys::END)), Some(VirtualListAction::MoveToEnd));
    }

    #[test]
    fn unrelated_key_is_ignored() {
        assert_eq!(route(&key(b'z' as u32)), None);
    }
}
