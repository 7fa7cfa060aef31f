// Copyright 2025 the tuicore Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer/overlay escape routing: a LIFO stack of modal and command-palette
//! style overlays, each optionally configured to close on Escape.

use alloc::vec::Vec;

#[derive(Copy, Clone, Debug)]
struct LayerEntry {
    id: u64,
    close_on_escape: bool,
}

/// Tracks nested overlay layers (modals, dropdowns, command palettes) in
/// open order. Escape is routed to the topmost layer first; this router
/// runs before the focused widget's own key router and the chord matcher,
/// so a modal with `close_on_escape` always wins the key regardless of what
/// else is focused inside it.
#[derive(Clone, Debug, Default)]
pub struct LayerStack {
    layers: Vec<LayerEntry>,
}

impl LayerStack {
    /// Construct an empty stack (no overlays open).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a newly opened layer onto the top of the stack.
    pub fn push(&mut self, id: u64, close_on_escape: bool) {
        log::debug!("layers: push {id} (close_on_escape={close_on_escape})");
        self.layers.push(LayerEntry { id, close_on_escape });
    }

    /// Remove a layer regardless of position (e.g. closed by a means other
    /// than Escape).
    pub fn remove(&mut self, id: u64) {
        self.layers.retain(|l| l.id != id);
    }

    /// The id of the topmost open layer, if any.
    #[must_use]
    pub fn top(&self) -> Option<u64> {
        self.layers.last().map(|l| l.id)
    }

    /// Handle an Escape key press: if the topmost layer declared
    /// `close_on_escape`, pop and return its id so the host can dismiss it.
    /// If the topmost layer did not opt in, Escape is *not* forwarded past
    /// it — a modal without `close_on_escape` still blocks lower layers and
    /// the rest of the routing pipeline from seeing the key.
    pub fn handle_escape(&mut self) -> Option<u64> {
        let top = self.layers.last()?;
        if top.close_on_escape {
            let entry = self.layers.pop().expect("checked non-empty above");
            log::debug!("layers: escape closed {}", entry.id);
            Some(entry.id)
        } else {
            log::debug!("layers: escape blocked by {} (close_on_escape=false)", top.id);
            None
        }
    }

    /// Returns `true` if any overlay is currently open.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_closes_topmost_closeable_layer() {
        let mut stack = LayerStack::new();
        stack.push(1, true);
        stack.push(2, true);
        assert_eq!(stack.handle_escape(), Some(2));
        assert_eq!(stack.top(), Some(1));
    }

    #[test]
    fn non_closeable_top_layer_blocks_escape() {
        let mut stack = LayerStack::new();
        stack.push(1, true);
        stack.push(2, false);
        assert_eq!(stack.handle_escape(), None);
        assert_eq!(stack.top(), Some(2), "the non-closeable layer stays open");
    }

    #[test]
    fn empty_stack_does_not_handle_escape() {
        let mut stack = LayerStack::new();
        assert_eq!(stack.handle_escape(), None);
    }
}
