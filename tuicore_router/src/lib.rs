// Copyright 2025 the tuicore Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! tuicore_router: input routing for a terminal UI runtime.
//!
//! A single frame-driven loop decodes each event in a batch and dispatches
//! it, in order, to:
//!
//! 1. the layer/overlay escape router ([`layers::LayerStack`]), LIFO;
//! 2. the focused widget's own per-kind router ([`widgets`]) — a pure
//!    function `(event, context) -> action?` the host calls directly, since
//!    only the host knows which widget kind is currently focused;
//! 3. the keybinding chord matcher ([`chord::ChordMatcher`]);
//! 4. mouse hit-test plus the press/release/double-click state machine
//!    ([`click::MouseRouter`]);
//! 5. wheel hit-test plus nearest-scrollable-ancestor routing
//!    ([`wheel::route_wheel`]).
//!
//! [`router::InputRouter`] bundles steps 1, 3, 4, and 5 (the parts that
//! don't need host-specific widget state) behind one type.
//!
//! This crate is `no_std` and uses `alloc`. Hit-testing and wheel routing
//! build directly on `tuicore_layout`'s committed `LaidOutNode` tree; focus
//! zone/trap bookkeeping is `tuicore_focus`'s concern, consulted by the host
//! to decide *which* id a press should request focus for.

#![no_std]

extern crate alloc;

pub mod chord;
pub mod click;
pub mod keys;
pub mod layers;
pub mod router;
pub mod types;
pub mod wheel;
pub mod widgets;
