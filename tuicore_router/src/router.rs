// Copyright 2025 the tuicore Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ties the layer-escape router, chord matcher, mouse state machine, and
//! wheel router into the dispatch order a frame orchestrator drives each
//! tick: layers, then the focused widget's own per-kind router (the host's
//! responsibility — it alone knows which kind is focused), then chords,
//! then mouse, then wheel.

use tuicore_layout::LaidOutNode;

use crate::chord::{ChordMatcher, ChordOutcome};
use crate::click::MouseRouter;
use crate::keys;
use crate::layers::LayerStack;
use crate::types::{KeyAction, KeyEvent, MouseEvent, MouseKind, MouseRouted, WheelRouted};
use crate::wheel;

/// Outcome of routing one key event through the layer-escape router and the
/// chord matcher (steps 1 and 3 of the input routing order; step 2, the
/// focused widget's own router, is the host's concern since only the host
/// knows which widget kind is focused).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KeyRouted {
    /// A modal/overlay layer consumed Escape and should close.
    LayerClosed(u64),
    /// Escape was blocked by a layer that does not close on Escape; no
    /// further routing (including the chord matcher) should see this key.
    BlockedByLayer,
    /// The chord matcher consumed the key.
    Chord(ChordOutcome),
    /// Nothing in this router recognized the key; the host's per-widget
    /// router already had first refusal and also passed.
    Unhandled,
}

/// The input router for one running engine: owns the layer stack, chord
/// matcher, and mouse press/click state machine. Does not own focus state
/// or layout — those are supplied per call so this type has no dependency
/// on the reconciler or the frame orchestrator.
#[derive(Clone, Debug, Default)]
pub struct InputRouter {
    /// LIFO overlay stack consulted first on every key event.
    pub layers: LayerStack,
    /// Chord sequence matcher for app-registered keybindings.
    pub chords: ChordMatcher,
    /// Mouse press/release/double-click/context-menu state machine.
    pub mouse: MouseRouter,
}

impl InputRouter {
    /// Construct a router with empty layers, no bindings, and no press state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Route a key event through the layer-escape router, then (if not
    /// consumed) the chord matcher. Callers should try their own focused
    /// per-widget router *before* calling this, since that router sits
    /// between steps 1 and 3 and this type cannot see it.
    pub fn route_key(&mut self, ev: &KeyEvent) -> KeyRouted {
        if ev.action == KeyAction::Down && ev.key_code == keys::ESCAPE && !self.layers.is_empty() {
            return match self.layers.handle_escape() {
                Some(id) => KeyRouted::LayerClosed(id),
                None => KeyRouted::BlockedByLayer,
            };
        }

        if ev.action != KeyAction::Down {
            return KeyRouted::Unhandled;
        }

        let outcome = self.chords.feed(crate::types::ChordKey { key_code: ev.key_code, mods: ev.mods });
        match outcome {
            ChordOutcome::NoMatch => KeyRouted::Unhandled,
            other => KeyRouted::Chord(other),
        }
    }

    /// Hit-test `(x, y)` against `tree` and route the mouse event through
    /// the press/release/double-click/context-menu state machine.
    pub fn route_mouse(&mut self, tree: &LaidOutNode, ev: &MouseEvent) -> MouseRouted {
        let hit = tree.hit_test(ev.x, ev.y).map(|n| n.id);
        self.mouse.route(hit, ev)
    }

    /// Route a wheel event to the nearest scrollable ancestor under
    /// `(x, y)`. Returns `None` if `ev.kind` is not [`MouseKind::Wheel`] or
    /// no ancestor had room to scroll.
    #[must_use]
    pub fn route_wheel(&self, tree: &LaidOutNode, ev: &MouseEvent) -> Option<WheelRouted> {
        if ev.kind != MouseKind::Wheel {
            return None;
        }
        wheel::route_wheel(tree, ev.x, ev.y, ev.wheel_x, ev.wheel_y)
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use alloc::vec;

    use tuicore_layout::Rect;

    use super::*;
    use crate::types::{Binding, ChordKey, Mods, MouseButtons};

    #[test]
    fn escape_routes_to_layer_before_chords() {
        let mut router = InputRouter::new();
        router.layers.push(1, true);
        router.chords.set_bindings(vec![Binding {
            sequence: vec![ChordKey { key_code: keys::ESCAPE, mods: Mods::empty() }],
            action: "should-not-fire".to_string(),
        }]);
        let ev = KeyEvent { time_ms: 0, key_code: keys::ESCAPE, mods: Mods::empty(), action: KeyAction::Down };
        assert_eq!(router.route_key(&ev), KeyRouted::LayerClosed(1));
    }

    #[test]
    fn non_escape_key_falls_through_to_chords() {
        let mut router = InputRouter::new();
        router.chords.set_bindings(vec![Binding {
            sequence: vec![ChordKey { key_code: b'q' as u32, mods: Mods::empty() }],
            action: "quit".to_string(),
        }]);
        let ev = KeyEvent { time_ms: 0, key_code: b'q' as u32, mods: Mods::empty(), action: KeyAction::Down };
        assert_eq!(router.route_key(&ev), KeyRouted::Chord(ChordOutcome::Hit("quit".to_string())));
    }

    #[test]
    fn mouse_hit_test_then_click_state() {
        let mut router = InputRouter::new();
        let leaf = LaidOutNode { id: 7, rect: Rect::new(0, 0, 10, 10), meta: None, children: vec![] };
        let ev = MouseEvent {
            time_ms: 0,
            x: 5,
            y: 5,
            kind: MouseKind::Down,
            mods: Mods::empty(),
            buttons: MouseButtons::LEFT,
            wheel_x: 0,
            wheel_y: 0,
        };
        let routed = router.route_mouse(&leaf, &ev);
        assert_eq!(routed.id, Some(7));
        assert_eq!(routed.action, Some(crate::types::RoutedAction::Press));
    }
}
