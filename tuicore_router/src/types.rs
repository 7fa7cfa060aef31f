// Copyright 2025 the tuicore Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared event and action types for the input router.

use alloc::string::String;

bitflags::bitflags! {
    /// Modifier keys held during a key or mouse event.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Mods: u8 {
        /// Shift.
        const SHIFT = 0b0001;
        /// Control.
        const CTRL  = 0b0010;
        /// Alt/Option.
        const ALT   = 0b0100;
        /// Super/Command/Meta.
        const SUPER = 0b1000;
    }
}

bitflags::bitflags! {
    /// Pressed mouse button state, as carried on a mouse event.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct MouseButtons: u8 {
        /// Left/primary button.
        const LEFT   = 0b001;
        /// Middle button.
        const MIDDLE = 0b010;
        /// Right/secondary button.
        const RIGHT  = 0b100;
    }
}

/// Transition of a key event.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum KeyAction {
    /// Key pressed down.
    Down,
    /// Key released.
    Up,
    /// Auto-repeat while held.
    Repeat,
}

/// A decoded key event (see the ZREV `key` record).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    /// Event timestamp in milliseconds, monotonic within a session.
    pub time_ms: u64,
    /// Platform-independent key code.
    pub key_code: u32,
    /// Modifiers held during the event.
    pub mods: Mods,
    /// Press/release/repeat.
    pub action: KeyAction,
}

/// Distinguishes the sub-kind of a mouse event (see the ZREV `mouse` record).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MouseKind {
    /// A button transitioned to pressed.
    Down,
    /// A button transitioned to released.
    Up,
    /// The pointer moved with no button transition.
    Move,
    /// A wheel tick; `wheel_x`/`wheel_y` carry the delta.
    Wheel,
}

/// A decoded mouse event, in cell coordinates.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct MouseEvent {
    /// Event timestamp in milliseconds.
    pub time_ms: u64,
    /// Cell-space x coordinate.
    pub x: i32,
    /// Cell-space y coordinate.
    pub y: i32,
    /// Which sub-kind of mouse event this is.
    pub kind: MouseKind,
    /// Modifiers held during the event.
    pub mods: Mods,
    /// Currently pressed buttons.
    pub buttons: MouseButtons,
    /// Horizontal wheel delta (wheel events only).
    pub wheel_x: i32,
    /// Vertical wheel delta (wheel events only).
    pub wheel_y: i32,
}

/// An action the mouse state machine asks the host to perform.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RoutedAction {
    /// A button was pressed on `id`.
    Press,
    /// A button was released on `id`, completing a press/release pair.
    Release,
    /// A full click (press and release on the same id) completed.
    Click,
    /// A double-click completed (two clicks on the same id within the
    /// double-click window, with no intervening press on a different id).
    DoubleClick,
    /// The right mouse button requested a context menu.
    ContextMenu,
}

/// Result of routing a single mouse event through [`crate::click::MouseRouter`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct MouseRouted {
    /// The hit-tested id the action applies to, if any node was hit.
    pub id: Option<u64>,
    /// The action produced, if any.
    pub action: Option<RoutedAction>,
    /// A pending focus change the host should request, if the press landed
    /// on a focusable id.
    pub next_focused_id: Option<Option<u64>>,
    /// Updated press-tracking id across move/release, for host bookkeeping.
    pub next_pressed_id: Option<Option<u64>>,
}

/// Result of routing a wheel event: the scrollable ancestor that consumed it
/// and its newly clamped scroll offsets.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct WheelRouted {
    /// Id of the container whose scroll offsets changed.
    pub id: u64,
    /// New horizontal scroll offset, already clamped.
    pub scroll_x: i32,
    /// New vertical scroll offset, already clamped.
    pub scroll_y: i32,
}

/// A single key in a chord sequence: code plus modifiers, compared for
/// equality against registered bindings.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ChordKey {
    /// Key code of this step.
    pub key_code: u32,
    /// Modifiers required for this step.
    pub mods: Mods,
}

/// A registered multi-key binding: sequence of [`ChordKey`] plus the mode it
/// is active in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Binding {
    /// Ordered key sequence that must be matched in full to fire.
    pub sequence: alloc::vec::Vec<ChordKey>,
    /// Opaque identifier for the action this binding triggers.
    pub action: String,
}
