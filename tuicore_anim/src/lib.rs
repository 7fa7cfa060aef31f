// Copyright 2025 the tuicore Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! tuicore_anim: spring stepping, timeline sampling, and exit-transition
//! lifecycle tracking for a terminal UI runtime.
//!
//! [`spring::step`] advances a damped spring toward a target value with
//! substepped explicit Euler integration; [`timeline::Timeline`] samples a
//! sequence of eased segments; [`exit::ExitTracker`] retains an unmounted
//! instance's frozen payload for its exit-transition duration, cancelling
//! outright if the same key reappears under the same parent lineage before
//! the exit finishes.
//!
//! `no_std` + `alloc`; uses no transcendental math (no `sqrt`/`powf`/trig),
//! so it needs no `libm` dependency.

#![no_std]

extern crate alloc;

pub mod exit;
pub mod spring;
pub mod timeline;

pub use exit::{ExitTrack, ExitTracker};
pub use spring::{step, SpringConfig, SpringState, SteppedSpring};
pub use timeline::{Easing, Segment, Timeline};
