// Copyright 2025 the tuicore Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! tuicore: the frame orchestrator and public runtime API for a terminal
//! UI engine.
//!
//! This crate is the composition root. It does not itself implement
//! reconciliation, layout, focus, routing, the drawlist codec, or
//! animation — those live in `tuicore_reconciler`, `tuicore_layout`,
//! `tuicore_focus`, `tuicore_router`, `tuicore_drawlist`, and
//! `tuicore_anim` respectively. What lives here:
//!
//! - [`vnode`]: the immutable view-tree node a host's `view(state)`
//!   produces each frame.
//! - [`instance`]: the committed instance tree, correlating
//!   [`tuicore_reconciler::InstanceId`]s with a [`tuicore_layout::LayoutNode`]
//!   tree built in the same walk, plus focus-zone declarations.
//! - [`state`]: the per-instance hook cell store (local widget state,
//!   refs, effects, deferred cleanups).
//! - [`zrev`]: the ZREV v1 event batch wire format the engine decodes each
//!   turn.
//! - [`backend`]: the trait seam a concrete terminal backend implements.
//! - [`config`]: the configuration surface exposed to application code.
//! - [`error`]: the fatal error taxonomy shared by every subsystem.
//! - [`engine`]: [`engine::Engine`], the frame orchestrator tying all of
//!   the above into one [`engine::Engine::pump`] call per turn.

pub mod backend;
pub mod config;
pub mod engine;
pub mod error;
pub mod instance;
pub mod state;
pub mod vnode;
pub mod zrev;

pub use backend::{Backend, BackendEventBatch, Caps, ColorDepth};
pub use config::{EngineConfig, RuntimeConfig};
pub use engine::{Engine, EventContext, TurnReport};
pub use error::{EngineError, ErrorCode};
pub use instance::{CommitSummary, CommittedNode, InstanceTree, UnmountedInstance, ZoneMeta};
pub use state::{HookCursor, LocalStateStore};
pub use vnode::{Kind, PropValue, Props, VNode};

/// Re-exports of the collaborator crates' public surfaces, for hosts that
/// want to name a reconciler/layout/focus/router/drawlist/anim type
/// without adding each dependency themselves.
pub mod prelude {
    pub use tuicore_anim as anim;
    pub use tuicore_drawlist as drawlist;
    pub use tuicore_focus as focus;
    pub use tuicore_layout as layout;
    pub use tuicore_reconciler as reconciler;
    pub use tuicore_router as router;

    pub use crate::{
        Backend, BackendEventBatch, Caps, CommitSummary, Engine, EngineConfig, EngineError,
        ErrorCode, EventContext, Kind, PropValue, RuntimeConfig, TurnReport, VNode,
    };
}
