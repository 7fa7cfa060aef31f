// Copyright 2025 the tuicore Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The backend contract: the collaborator the core drives but
//! does not implement. A concrete backend translates drawlists to ANSI
//! output and raw terminal bytes to ZREV event batches; this crate only
//! defines the trait the orchestrator calls against.

use crate::error::EngineError;

/// Terminal capability record a backend reports once at startup.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Caps {
    /// Terminal width in cells.
    pub cols: u16,
    /// Terminal height in cells.
    pub rows: u16,
    /// Color depth the terminal supports.
    pub color_depth: ColorDepth,
    /// Cursor shapes the terminal can render, if it supports changing one.
    pub cursor_shapes: bool,
    /// Whether the terminal supports the Kitty graphics protocol.
    pub kitty_images: bool,
    /// Whether the terminal supports sixel graphics.
    pub sixel_images: bool,
    /// Whether the terminal supports iTerm2's inline image protocol.
    pub iterm_images: bool,
    /// Whether the terminal supports OSC 8 hyperlinks.
    pub hyperlinks: bool,
    /// Cell pixel size, when the backend can detect it (used to scale
    /// image protocols to whole cells).
    pub cell_pixel_size: Option<(u16, u16)>,
}

/// Color depth a terminal supports.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum ColorDepth {
    /// 16 ANSI colors.
    Ansi16,
    /// 256-color palette.
    #[default]
    Ansi256,
    /// 24-bit truecolor.
    TrueColor,
}

/// One batch of raw ZREV-encoded event bytes handed to the core by
/// [`Backend::poll_events`].
pub struct BackendEventBatch {
    /// The raw ZREV v1 batch bytes.
    pub bytes: Vec<u8>,
    /// Number of batches the backend dropped before this one (e.g. under
    /// backpressure); surfaced so the host can log data loss without the
    /// core needing an opinion on what to do about it.
    pub dropped_batches: u32,
}

impl BackendEventBatch {
    /// Release any backend-side resources associated with this batch (e.g.
    /// a reusable buffer). The default no-op is correct for a backend that
    /// hands out owned `Vec<u8>`s; a backend pooling buffers overrides this
    /// via its own wrapper type instead of this struct.
    pub fn release(self) {}
}

/// The terminal backend the core drives each frame turn.
///
/// A real implementation (ANSI writer, raw-mode input reader) lives outside
/// this crate's scope; this trait is the seam. All methods are
/// synchronous from the orchestrator's point of view — the core's
/// suspension points are at awaiting the *next* call to return, not
/// inside any one call.
pub trait Backend {
    /// Begin event delivery.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Platform`] if the backend cannot initialize
    /// (no TTY, raw-mode unavailable, etc.).
    fn start(&mut self) -> Result<(), EngineError>;

    /// Cease event delivery; any outstanding frame waiters must resolve.
    fn stop(&mut self);

    /// Release backend resources. Idempotent: repeated calls are no-ops.
    fn dispose(&mut self);

    /// The terminal's capability record, valid only after [`Self::start`].
    fn caps(&self) -> Caps;

    /// Pop the next pending event batch, if one is ready.
    ///
    /// The very first batch returned after [`Self::start`] must contain a
    /// `resize` event seeding the initial viewport; the orchestrator's
    /// [`crate::engine::Engine`] depends on this to size its first layout
    /// pass.
    fn poll_events(&mut self) -> Option<BackendEventBatch>;

    /// Submit a drawlist for display.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Platform`] if the backend failed to write the
    /// frame.
    fn request_frame(&mut self, drawlist: &[u8]) -> Result<(), EngineError>;

    /// Inject a host-defined user event into the event stream, to be
    /// delivered on a subsequent [`Self::poll_events`] call.
    fn post_user_event(&mut self, tag: &str, payload: Vec<u8>);
}
