// Copyright 2025 the tuicore Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mouse press/release/double-click/context-menu state machine.
//!
//! This module does not hit-test; callers resolve `(x, y)` to a target id
//! (typically via [`tuicore_layout::LaidOutNode::hit_test`]) and feed the
//! result in alongside the raw event.

use crate::types::{MouseButtons, MouseEvent, MouseKind, MouseRouted, RoutedAction};

/// Window, in milliseconds, within which two press/release pairs on the same
/// id count as a double-click.
const DOUBLE_CLICK_WINDOW_MS: u64 = 500;

/// Cell-distance (Chebyshev) the pointer may drift from its down position
/// before a release on the original id stops counting as a click. Zero cells
/// of tolerance is an implementation choice, not a contract — terminal hit
/// regions are already cell-granular, so any move to a different cell is
/// treated as a drag.
const CLICK_MOVE_THRESHOLD_CELLS: i32 = 0;

#[derive(Copy, Clone, Debug)]
struct PressState {
    id: u64,
    button: MouseButtons,
    down_time: u64,
    down_x: i32,
    down_y: i32,
    moved_past_threshold: bool,
}

/// Mouse button press/release tracking, double-click detection, and
/// right-button context-menu routing.
#[derive(Clone, Debug, Default)]
pub struct MouseRouter {
    pressed: Option<PressState>,
    last_click: Option<(u64, u64)>,
    intervening_other_press: bool,
}

impl MouseRouter {
    /// Construct a router with no active press and no click history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Route one mouse event given the id it hit-tested against (`None` if
    /// the pointer was over no node).
    pub fn route(&mut self, hit_id: Option<u64>, ev: &MouseEvent) -> MouseRouted {
        match ev.kind {
            MouseKind::Down => self.on_down(hit_id, ev),
            MouseKind::Up => self.on_up(hit_id, ev),
            MouseKind::Move => self.on_move(ev),
            MouseKind::Wheel => MouseRouted::default(),
        }
    }

    /// Track pointer drift during an active press. Does not itself emit a
    /// routed action; `on_up` consults `moved_past_threshold` to decide
    /// whether a release on the original id still counts as a click.
    fn on_move(&mut self, ev: &MouseEvent) -> MouseRouted {
        if let Some(press) = self.pressed.as_mut() {
            if !press.moved_past_threshold {
                let dx = (ev.x - press.down_x).abs();
                let dy = (ev.y - press.down_y).abs();
                if dx.max(dy) > CLICK_MOVE_THRESHOLD_CELLS {
                    press.moved_past_threshold = true;
                    log::debug!("mouse: press on {} exceeded move threshold, click cancelled", press.id);
                }
            }
        }
        MouseRouted::default()
    }

    fn on_down(&mut self, hit_id: Option<u64>, ev: &MouseEvent) -> MouseRouted {
        let Some(id) = hit_id else {
            return MouseRouted::default();
        };

        if ev.buttons.contains(MouseButtons::RIGHT) {
            log::debug!("mouse: context menu requested on {id}");
            return MouseRouted {
                id: Some(id),
                action: Some(RoutedAction::ContextMenu),
                next_focused_id: Some(Some(id)),
                next_pressed_id: None,
            };
        }

        if let Some((last_id, _)) = self.last_click {
            if last_id != id {
                self.intervening_other_press = true;
            }
        }

        self.pressed = Some(PressState {
            id,
            button: ev.buttons,
            down_time: ev.time_ms,
            down_x: ev.x,
            down_y: ev.y,
            moved_past_threshold: false,
        });
        log::debug!("mouse: press on {id}");
        MouseRouted {
            id: Some(id),
            action: Some(RoutedAction::Press),
            next_focused_id: Some(Some(id)),
            next_pressed_id: Some(Some(id)),
        }
    }

    fn on_up(&mut self, hit_id: Option<u64>, ev: &MouseEvent) -> MouseRouted {
        let Some(press) = self.pressed.take() else {
            return MouseRouted { next_pressed_id: Some(None), ..MouseRouted::default() };
        };

        if hit_id != Some(press.id) || press.button != ev.buttons || press.moved_past_threshold {
            if press.moved_past_threshold {
                log::debug!("mouse: release on {} suppressed, press moved past threshold", press.id);
            }
            return MouseRouted {
                id: hit_id,
                action: Some(RoutedAction::Release),
                next_pressed_id: Some(None),
                next_focused_id: None,
            };
        }

        let is_double = self.last_click.is_some_and(|(last_id, last_time)| {
            last_id == press.id
                && ev.time_ms.saturating_sub(last_time) <= DOUBLE_CLICK_WINDOW_MS
                && !self.intervening_other_press
        });

        self.intervening_other_press = false;
        self.last_click = if is_double { None } else { Some((press.id, ev.time_ms)) };

        let action = if is_double { RoutedAction::DoubleClick } else { RoutedAction::Click };
        log::debug!("mouse: {action:?} on {}", press.id);
        MouseRouted {
            id: Some(press.id),
            action: Some(action),
            next_pressed_id: Some(None),
            next_focused_id: None,
        }
    }

    /// Discard any in-progress press without emitting a release/click. Used
    /// when the pointer stream is interrupted (e.g. focus loss, backend
    /// `stop`).
    pub fn cancel(&mut self) {
        self.pressed = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn down(id: u64, t: u64, buttons: MouseButtons) -> (Option<u64>, MouseEvent) {
        (
            Some(id),
            MouseEvent {
                time_ms: t,
                x: 0,
                y: 0,
                kind: MouseKind::Down,
                mods: crate::types::Mods::empty(),
                buttons,
                wheel_x: 0,
                wheel_y: 0,
            },
        )
    }

    fn up(id: Option<u64>, t: u64, buttons: MouseButtons) -> (Option<u64>, MouseEvent) {
        (
            id,
            MouseEvent {
                time_ms: t,
                x: 0,
                y: 0,
                kind: MouseKind::Up,
                mods: crate::types::Mods::empty(),
                buttons,
                wheel_x: 0,
                wheel_y: 0,
            },
        )
    }

    fn moved(id: Option<u64>, x: i32, y: i32, t: u64) -> (Option<u64>, MouseEvent) {
        (
            id,
            MouseEvent {
                time_ms: t,
                x,
                y,
                kind: MouseKind::Move,
                mods: crate::types::Mods::empty(),
                buttons: MouseButtons::empty(),
                wheel_x: 0,
                wheel_y: 0,
            },
        )
    }

    #[test]
    fn press_then_release_on_same_id_is_click() {
        let mut r = MouseRouter::new();
        let (id, ev) = down(1, 0, MouseButtons::LEFT);
        let out = r.route(id, &ev);
        assert_eq!(out.action, Some(RoutedAction::Press));

        let (id, ev) = up(Some(1), 10, MouseButtons::LEFT);
        let out = r.route(id, &ev);
        assert_eq!(out.action, Some(RoutedAction::Click));
    }

    #[test]
    fn two_clicks_within_window_is_double_click() {
        let mut r = MouseRouter::new();
        let (id, ev) = down(1, 0, MouseButtons::LEFT);
        r.route(id, &ev);
        let (id, ev) = up(Some(1), 10, MouseButtons::LEFT);
        assert_eq!(r.route(id, &ev).action, Some(RoutedAction::Click));

        let (id, ev) = down(1, 100, MouseButtons::LEFT);
        r.route(id, &ev);
        let (id, ev) = up(Some(1), 110, MouseButtons::LEFT);
        assert_eq!(r.route(id, &ev).action, Some(RoutedAction::DoubleClick));
    }

    #[test]
    fn click_outside_window_is_not_double() {
        let mut r = MouseRouter::new();
        let (id, ev) = down(1, 0, MouseButtons::LEFT);
        r.route(id, &ev);
        let (id, ev) = up(Some(1), 10, MouseButtons::LEFT);
        r.route(id, &ev);

        let (id, ev) = down(1, 600, MouseButtons::LEFT);
        r.route(id, &ev);
        let (id, ev) = up(Some(1), 610, MouseButtons::LEFT);
        assert_eq!(r.route(id, &ev).action, Some(RoutedAction::Click));
    }

    #[test]
    fn intervening_press_on_different_id_blocks_double_click() {
        let mut r = MouseRouter::new();
        let (id, ev) = down(1, 0, MouseButtons::LEFT);
        r.route(id, &ev);
        let (id, ev) = up(Some(1), 10, MouseButtons::LEFT);
        r.route(id, &ev);

        let (id, ev) = down(2, 20, MouseButtons::LEFT);
        r.route(id, &ev);
        let (id, ev) = up(Some(2), 25, MouseButtons::LEFT);
        r.route(id, &ev);

        let (id, ev) = down(1, 50, MouseButtons::LEFT);
        r.route(id, &ev);
        let (id, ev) = up(Some(1), 60, MouseButtons::LEFT);
        assert_eq!(r.route(id, &ev).action, Some(RoutedAction::Click));
    }

    #[test]
    fn right_button_fires_context_menu_without_press_tracking() {
        let mut r = MouseRouter::new();
        let (id, ev) = down(1, 0, MouseButtons::RIGHT);
        let out = r.route(id, &ev);
        assert_eq!(out.action, Some(RoutedAction::ContextMenu));
        assert!(r.pressed.is_none());
    }

    #[test]
    fn move_past_threshold_cancels_click_on_release() {
        let mut r = MouseRouter::new();
        let (id, ev) = down(1, 0, MouseButtons::LEFT);
        r.route(id, &ev);

        let (id, ev) = moved(Some(1), 3, 0, 5);
        r.route(id, &ev);

        let (id, ev) = up(Some(1), 10, MouseButtons::LEFT);
        let out = r.route(id, &ev);
        assert_eq!(out.action, Some(RoutedAction::Release), "drag past threshold must not emit a click");
    }

    #[test]
    fn move_without_crossing_threshold_still_clicks() {
        let mut r = MouseRouter::new();
        let (id, ev) = down(1, 0, MouseButtons::LEFT);
        r.route(id, &ev);

        // No actual displacement: stays within the zero-cell threshold.
        let (id, ev) = moved(Some(1), 0, 0, 5);
        r.route(id, &ev);

        let (id, ev) = up(Some(1), 10, MouseButtons::LEFT);
        let out = r.route(id, &ev);
        assert_eq!(out.action, Some(RoutedAction::Click));
    }

    #[test]
    fn release_on_different_id_is_not_a_click() {
        let mut r = MouseRouter::new();
        let (id, ev) = down(1, 0, MouseButtons::LEFT);
        r.route(id, &ev);
        let (id, ev) = up(Some(2), 10, MouseButtons::LEFT);
        let out = r.route(id, &ev);
        assert_ne!(out.action, Some(RoutedAction::Click));
    }
}
