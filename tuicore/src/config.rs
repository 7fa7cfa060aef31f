// Copyright 2025 the tuicore Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The configuration surface exposed to application code.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Engine-level tuning knobs, distinct from the application's own state.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EngineConfig {
    /// Number of frames a theme transition blends over; `0` applies a
    /// theme change instantly.
    pub theme_transition_frames: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { theme_transition_frames: 0 }
    }
}

/// The full runtime configuration a host constructs an
/// [`crate::engine::Engine`] with.
///
/// `State` is the application's own state type, supplied once as
/// `initial_state` and thereafter owned by the engine. `Theme` is left
/// generic rather than fixed to a concrete token table, matching the
/// scoping of theme token tables out of the core.
#[derive(Clone, Debug)]
pub struct RuntimeConfig<State, Theme> {
    /// The application's initial state value.
    pub initial_state: State,
    /// The initial theme value.
    pub theme: Theme,
    /// Engine-level tuning knobs.
    pub config: EngineConfig,
}

impl<State, Theme> RuntimeConfig<State, Theme> {
    /// Construct a configuration with default engine knobs.
    pub fn new(initial_state: State, theme: Theme) -> Self {
        Self { initial_state, theme, config: EngineConfig::default() }
    }
}
