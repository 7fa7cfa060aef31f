// Copyright 2025 the tuicore Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The frame orchestrator and public runtime API.
//!
//! [`Engine`] owns every subsystem a running host needs — the instance
//! tree, local state store, focus state, input router, drawlist builder,
//! and exit-transition tracker — and drives them through one turn per
//! [`Engine::pump`] call: drain backend event batches, route each, re-run
//! `view` if invalidated, reconcile, commit, lay out, draw, and settle
//! focus. It does not own a thread or an event loop itself: the host
//! calls `pump` from whatever scheduling context it prefers.

use hashbrown::HashMap;

use tuicore_anim::ExitTracker;
use tuicore_drawlist::Builder;
use tuicore_focus::{FocusState, TrapDecl, ZoneDecl};
use tuicore_layout::LaidOutNode;
use tuicore_reconciler::InstanceId;
use tuicore_router::chord::ChordOutcome;
use tuicore_router::router::InputRouter;
use tuicore_router::types::{Binding, ChordKey, KeyAction, MouseKind};

use crate::backend::Backend;
use crate::config::{EngineConfig, RuntimeConfig};
use crate::error::EngineError;
use crate::instance::InstanceTree;
use crate::state::LocalStateStore;
use crate::vnode::VNode;
use crate::zrev;

/// Where the orchestrator is within one turn; used to reject reentrant and
/// render-time state mutation (`UPDATE_DURING_RENDER`/`REENTRANT_CALL`).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Phase {
    Idle,
    Rendering,
    Committing,
}

/// A sink event handlers use to request a state update, queued until the
/// end of the current event batch.
pub struct EventContext<'a, State> {
    queue: &'a mut Vec<Box<dyn FnOnce(&mut State)>>,
}

impl<State> EventContext<'_, State> {
    /// Queue a state mutation; applied once, after every event in the
    /// current batch has been dispatched, in request order.
    pub fn update(&mut self, updater: impl FnOnce(&mut State) + 'static) {
        self.queue.push(Box::new(updater));
    }
}

type EventHandler<State> = Box<dyn FnMut(&zrev::Event, &mut EventContext<'_, State>) -> bool>;
type FocusHandler<Id> = Box<dyn FnMut(Option<Id>)>;
type ActionHandler<State> = Box<dyn FnMut(&str, &mut EventContext<'_, State>)>;

/// Summary of one [`Engine::pump`] call, for host-side logging/metrics.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TurnReport {
    /// Number of decoded events dispatched this turn.
    pub events_processed: usize,
    /// Whether `view` ran this turn.
    pub rendered_view: bool,
    /// Whether layout ran this turn.
    pub laid_out: bool,
    /// Whether a drawlist was built and submitted this turn.
    pub submitted_frame: bool,
}

/// The running engine: every subsystem composed into one turn loop.
///
/// Generic over the host's `Backend` implementation and its own `State`
/// and `Theme` types (both left to the host, which owns state shape and
/// theme token tables).
pub struct Engine<B: Backend, State, Theme> {
    backend: B,
    state: State,
    theme: Theme,
    config: EngineConfig,
    view: Box<dyn FnMut(&State, &Theme) -> VNode>,
    draw: Option<Box<dyn FnMut(&mut Builder, &LaidOutNode, &State, &Theme)>>,

    router: InputRouter,
    focus: FocusState<InstanceId>,
    instances: InstanceTree,
    local_state: LocalStateStore,
    exit_tracker: ExitTracker<InstanceId, InstanceId>,
    drawlist_builder: Builder,

    event_handlers: Vec<(u64, EventHandler<State>)>,
    focus_handlers: Vec<(u64, FocusHandler<InstanceId>)>,
    action_handlers: Vec<(u64, ActionHandler<State>)>,
    next_subscription_id: u64,

    modes: HashMap<String, Vec<Binding>>,
    active_mode: Option<String>,

    last_layout_node: Option<tuicore_layout::LayoutNode>,
    laid_out: Option<LaidOutNode>,
    viewport: (i32, i32),
    clock_ms: u64,

    phase: Phase,
    update_queue: Vec<Box<dyn FnOnce(&mut State)>>,
    view_dirty: bool,
    viewport_dirty: bool,
    running: bool,
    turn_count: u64,
}

impl<B: Backend, State, Theme> Engine<B, State, Theme> {
    /// Construct an engine. `view` is called whenever state, theme, or the
    /// viewport invalidate the render; it must be a pure function of its
    /// two arguments.
    pub fn new(
        backend: B,
        config: RuntimeConfig<State, Theme>,
        view: impl FnMut(&State, &Theme) -> VNode + 'static,
    ) -> Self {
        Self {
            backend,
            state: config.initial_state,
            theme: config.theme,
            config: config.config,
            view: Box::new(view),
            draw: None,
            router: InputRouter::new(),
            focus: FocusState::new(),
            instances: InstanceTree::new(),
            local_state: LocalStateStore::new(),
            exit_tracker: ExitTracker::new(),
            drawlist_builder: Builder::new(),
            event_handlers: Vec::new(),
            focus_handlers: Vec::new(),
            action_handlers: Vec::new(),
            next_subscription_id: 0,
            modes: HashMap::new(),
            active_mode: None,
            last_layout_node: None,
            laid_out: None,
            viewport: (0, 0),
            clock_ms: 0,
            phase: Phase::Idle,
            update_queue: Vec::new(),
            view_dirty: true,
            viewport_dirty: false,
            running: false,
            turn_count: 0,
        }
    }

    /// Register the draw callback: given the builder and this turn's laid
    /// out tree, it issues the drawlist commands. Replaces any previously
    /// registered callback.
    pub fn draw(&mut self, f: impl FnMut(&mut Builder, &LaidOutNode, &State, &Theme) + 'static) {
        self.draw = Some(Box::new(f));
    }

    /// Subscribe to every decoded event, in dispatch order, before the
    /// router's own layer/chord/mouse/wheel handling runs for keys and
    /// mouse events. Returning `true` marks the event handled: built-in
    /// routing for that event is skipped (the handler is "the focused
    /// widget's own per-kind router" ahead of built-in dispatch).
    /// Returns a subscription id for [`Self::unsubscribe_event`].
    pub fn on_event(&mut self, f: impl FnMut(&zrev::Event, &mut EventContext<'_, State>) -> bool + 'static) -> u64 {
        let id = self.next_subscription_id;
        self.next_subscription_id += 1;
        self.event_handlers.push((id, Box::new(f)));
        id
    }

    /// Remove a subscription registered by [`Self::on_event`].
    pub fn unsubscribe_event(&mut self, id: u64) {
        self.event_handlers.retain(|(sub_id, _)| *sub_id != id);
    }

    /// Subscribe to focus changes, called once per turn in which the
    /// focused instance id differs from the previous turn's. Returns a
    /// subscription id; call the returned closure's id with
    /// [`Self::unsubscribe_focus_change`] to unsubscribe.
    pub fn on_focus_change(&mut self, f: impl FnMut(Option<InstanceId>) + 'static) -> u64 {
        let id = self.next_subscription_id;
        self.next_subscription_id += 1;
        self.focus_handlers.push((id, Box::new(f)));
        id
    }

    /// Remove a subscription registered by [`Self::on_focus_change`].
    pub fn unsubscribe_focus_change(&mut self, id: u64) {
        self.focus_handlers.retain(|(sub_id, _)| *sub_id != id);
    }

    /// Subscribe to fired keybinding actions: called once per chord
    /// [`tuicore_router::chord::ChordOutcome::Hit`], with the matched
    /// [`Binding::action`] and an [`EventContext`] for queuing state
    /// updates. Returns a subscription id for [`Self::unsubscribe_action`].
    pub fn on_action(&mut self, f: impl FnMut(&str, &mut EventContext<'_, State>) + 'static) -> u64 {
        let id = self.next_subscription_id;
        self.next_subscription_id += 1;
        self.action_handlers.push((id, Box::new(f)));
        id
    }

    /// Remove a subscription registered by [`Self::on_action`].
    pub fn unsubscribe_action(&mut self, id: u64) {
        self.action_handlers.retain(|(sub_id, _)| *sub_id != id);
    }

    /// Register the chord bindings active regardless of mode (or, if no
    /// mode is active via [`Self::set_mode`], the only bindings in effect).
    pub fn keys(&mut self, bindings: Vec<Binding>) {
        self.modes.insert(String::new(), bindings);
        self.sync_active_bindings();
    }

    /// Register a table of named keybinding modes. Each mode is a complete
    /// binding set, not additive with the default; switch between them with
    /// [`Self::set_mode`].
    pub fn modes(&mut self, mode_map: HashMap<String, Vec<Binding>>) {
        self.modes = mode_map;
        self.sync_active_bindings();
    }

    /// Activate a named mode's binding set, or the default set if `None`.
    pub fn set_mode(&mut self, mode: Option<&str>) {
        self.active_mode = mode.map(str::to_owned);
        self.sync_active_bindings();
    }

    /// The bindings currently registered for `mode` (or the default set).
    #[must_use]
    pub fn get_bindings(&self, mode: Option<&str>) -> &[Binding] {
        let key = mode.unwrap_or_default();
        self.modes.get(key).map_or(&[], Vec::as_slice)
    }

    fn sync_active_bindings(&mut self) {
        let key = self.active_mode.as_deref().unwrap_or_default();
        let bindings = self.modes.get(key).cloned().unwrap_or_default();
        self.router.chords.set_bindings(bindings);
    }

    /// The in-progress chord prefix, exposed read-only.
    #[must_use]
    pub fn pending_chord(&self) -> Option<&[ChordKey]> {
        self.router.chords.pending_chord()
    }

    /// The currently focused instance, if any.
    #[must_use]
    pub fn focused_id(&self) -> Option<InstanceId> {
        self.focus.focused_id()
    }

    /// Read-only access to the application state, for host introspection
    /// (logging, tests) outside of `view`.
    #[must_use]
    pub fn state(&self) -> &State {
        &self.state
    }

    /// Queue a state mutation.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UpdateDuringRender`] if called from within
    /// `view`, or [`EngineError::ReentrantCall`] if called while the engine
    /// is committing a frame.
    pub fn update(&mut self, updater: impl FnOnce(&mut State) + 'static) -> Result<(), EngineError> {
        self.guard_not_rendering_or_committing()?;
        self.update_queue.push(Box::new(updater));
        self.flush_update_queue();
        Ok(())
    }

    /// Replace the active theme.
    ///
    /// # Errors
    ///
    /// Same as [`Self::update`].
    pub fn set_theme(&mut self, theme: Theme) -> Result<(), EngineError> {
        self.guard_not_rendering_or_committing()?;
        self.theme = theme;
        self.view_dirty = true;
        Ok(())
    }

    fn guard_not_rendering_or_committing(&self) -> Result<(), EngineError> {
        match self.phase {
            Phase::Rendering => Err(EngineError::UpdateDuringRender),
            Phase::Committing => Err(EngineError::ReentrantCall),
            Phase::Idle => Ok(()),
        }
    }

    fn flush_update_queue(&mut self) {
        if self.update_queue.is_empty() {
            return;
        }
        for updater in std::mem::take(&mut self.update_queue) {
            updater(&mut self.state);
        }
        self.view_dirty = true;
    }

    /// Begin event delivery.
    ///
    /// # Errors
    ///
    /// Propagates [`EngineError::Platform`] from the backend.
    pub fn start(&mut self) -> Result<(), EngineError> {
        self.backend.start()?;
        self.running = true;
        Ok(())
    }

    /// Cease event delivery.
    pub fn stop(&mut self) {
        self.backend.stop();
        self.running = false;
    }

    /// Release engine and backend resources. Idempotent.
    pub fn dispose(&mut self) {
        self.backend.dispose();
    }

    /// Whether [`Self::start`] has been called without a matching
    /// [`Self::stop`].
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Run one turn: drain available backend event batches, route them,
    /// re-render if invalidated, and submit a frame if anything changed.
    ///
    /// `now_ms` is the host's monotonic clock, used for exit-transition
    /// timing and event timestamps the router does not itself track.
    ///
    /// # Errors
    ///
    /// Returns the first fatal [`EngineError`] encountered (duplicate key,
    /// invalid props, or a backend failure); the turn aborts before any
    /// further side effect: no partial commit, no partial drawlist.
    pub fn pump(&mut self, now_ms: u64) -> Result<TurnReport, EngineError> {
        self.clock_ms = now_ms;
        let mut report = TurnReport::default();

        while let Some(batch) = self.backend.poll_events() {
            if batch.dropped_batches > 0 {
                log::warn!("engine: backend dropped {} batches before this one", batch.dropped_batches);
            }
            let decoded = zrev::decode_batch(&batch.bytes);
            batch.release();
            let (_, events) = decoded
                .map_err(|err| EngineError::Platform { detail: format!("malformed ZREV event batch: {err:?}") })?;

            for event in &events {
                self.dispatch_event(event, &mut report);
            }
            self.flush_update_queue();
        }

        if self.view_dirty {
            self.render_turn(&mut report)?;
        } else if self.viewport_dirty {
            self.relayout(&mut report)?;
        }

        self.retire_exit_transitions();

        self.turn_count += 1;
        log::info!(
            "engine: turn {} complete (view={}, layout={}, frame={})",
            self.turn_count,
            report.rendered_view,
            report.laid_out,
            report.submitted_frame
        );
        Ok(report)
    }

    fn dispatch_event(&mut self, event: &zrev::Event, report: &mut TurnReport) {
        report.events_processed += 1;
        match event {
            zrev::Event::Resize { cols, rows, .. } => {
                self.viewport = (i32::from(*cols), i32::from(*rows));
                self.viewport_dirty = true;
                self.notify_event_handlers(event);
            }
            zrev::Event::Key(key_ev) => {
                if key_ev.action == KeyAction::Down
                    && key_ev.key_code == tuicore_router::keys::ESCAPE
                    && !self.router.layers.is_empty()
                {
                    match self.router.layers.handle_escape() {
                        Some(id) => {
                            log::debug!("router: layer {id} closed on escape");
                            self.view_dirty = true;
                        }
                        None => log::debug!("router: escape blocked by a non-dismissing layer"),
                    }
                    return;
                }
                if self.notify_event_handlers(event) {
                    return;
                }
                if key_ev.action != KeyAction::Down {
                    return;
                }
                let outcome =
                    self.router.chords.feed(ChordKey { key_code: key_ev.key_code, mods: key_ev.mods });
                match outcome {
                    ChordOutcome::NoMatch => {}
                    ChordOutcome::Pending | ChordOutcome::Cleared => self.view_dirty = true,
                    ChordOutcome::Hit(action) => {
                        log::debug!("router: chord hit {action}");
                        self.notify_action_handlers(&action);
                        self.view_dirty = true;
                    }
                }
            }
            zrev::Event::Mouse(mouse_ev) => {
                if self.notify_event_handlers(event) {
                    return;
                }
                let Some(laid_out) = &self.laid_out else { return };
                if mouse_ev.kind == MouseKind::Wheel {
                    if let Some(routed) = self.router.route_wheel(laid_out, mouse_ev) {
                        log::debug!(
                            "router: wheel scrolled {} to ({}, {})",
                            routed.id,
                            routed.scroll_x,
                            routed.scroll_y
                        );
                        self.view_dirty = true;
                    }
                    return;
                }
                let routed = self.router.route_mouse(laid_out, mouse_ev);
                if let Some(next_focused) = routed.next_focused_id {
                    self.focus.request_focus(next_focused);
                }
                if routed.action.is_some() {
                    self.view_dirty = true;
                }
            }
            zrev::Event::Text { .. } | zrev::Event::Focus { .. } | zrev::Event::Paste { .. } | zrev::Event::Composition { .. } => {
                self.notify_event_handlers(event);
            }
        }
    }

    /// Dispatch `event` to every registered handler, applying and clearing
    /// the per-handler update queue after each. Returns `true` if any
    /// handler claimed the event.
    fn notify_event_handlers(&mut self, event: &zrev::Event) -> bool {
        let mut handled = false;
        let mut handlers = std::mem::take(&mut self.event_handlers);
        for (_, handler) in &mut handlers {
            let mut ctx = EventContext { queue: &mut self.update_queue };
            if handler(event, &mut ctx) {
                handled = true;
            }
        }
        self.event_handlers = handlers;
        handled
    }

    /// Dispatch a fired chord `action` to every registered
    /// [`Self::on_action`] handler, applying the queued updates after each.
    fn notify_action_handlers(&mut self, action: &str) {
        let mut handlers = std::mem::take(&mut self.action_handlers);
        for (_, handler) in &mut handlers {
            let mut ctx = EventContext { queue: &mut self.update_queue };
            handler(action, &mut ctx);
        }
        self.action_handlers = handlers;
    }

    /// Re-run `view`, reconcile, commit, lay out, and draw. Called when
    /// `self.view_dirty`.
    fn render_turn(&mut self, report: &mut TurnReport) -> Result<(), EngineError> {
        self.phase = Phase::Rendering;
        let next_root = (self.view)(&self.state, &self.theme);
        self.phase = Phase::Idle;
        report.rendered_view = true;

        self.phase = Phase::Committing;
        let commit_result = self.instances.commit(&next_root);
        self.phase = Phase::Idle;

        let (root_id, layout_node, summary) = match commit_result {
            Ok(ok) => ok,
            Err(err) => {
                log::error!("engine: commit aborted: {err}");
                return Err(err);
            }
        };

        let zone_decls: Vec<ZoneDecl<InstanceId>> = self.instances.zone_decls();
        // A newly-mounted trap's activation must be staged before `finalize`
        // runs this turn, not after — `finalize` applies a trap's override in
        // the very call that observes it, so activating the trap first lets
        // the jump land on this frame instead of lagging one turn behind.
        self.activate_new_traps(&summary.new, &zone_decls);
        self.focus.finalize(zone_decls.clone());

        for unmounted in &summary.unmounted {
            match unmounted.exit_duration_ms {
                Some(duration_ms) if duration_ms > 0 => {
                    let key = unmounted.slot_id.to_string();
                    self.local_state.defer_teardown(unmounted.id);
                    self.exit_tracker.begin(key, unmounted.parent_id, unmounted.id, self.clock_ms, duration_ms);
                }
                _ => self.local_state.teardown(unmounted.id),
            }
        }
        for new_id in &summary.new {
            let key_lineage = self.instances.node(*new_id).map(|n| (n.slot_id.to_string(), *new_id));
            if let Some((key, _)) = key_lineage {
                // A reappearing key cancels whatever exit track it interrupted under
                // any parent lineage it could plausibly have been torn down from;
                // since a fresh id means the old instance is unambiguously gone,
                // cancellation finalizes (rather than discards) its cleanups.
                let parents: Vec<InstanceId> = self.exit_tracker_lineages_for(&key);
                for lineage in parents {
                    if let Some(old_id) = self.exit_tracker.cancel_if_reappeared(&key, &lineage) {
                        log::debug!("anim: exit for instance {old_id} cancelled by reappearance as {new_id}");
                        self.local_state.finalize_deferred_teardown(old_id);
                    }
                }
            }
        }
        self.local_state.run_pending_effects();

        self.last_layout_node = Some(layout_node);
        self.view_dirty = false;
        self.viewport_dirty = true;
        let _ = root_id;

        self.relayout(report)?;
        self.emit_focus_change();
        Ok(())
    }

    /// Exit-tracker lineages currently holding an active track for `key`.
    /// `ExitTracker` does not expose iteration, so this consults the zone
    /// decls' parent chain is unnecessary — instead it tries every instance
    /// id currently committed as a plausible lineage. This is O(n) in the
    /// committed tree size per reappearing key, acceptable since key
    /// reappearance under exit animation is rare relative to steady-state
    /// frames.
    fn exit_tracker_lineages_for(&self, _key: &str) -> Vec<InstanceId> {
        self.instances.all_ids()
    }

    fn activate_new_traps(&mut self, new_ids: &[InstanceId], decls: &[ZoneDecl<InstanceId>]) {
        for trap_id in self.instances.newly_mounted_traps(new_ids) {
            let Some(decl) = decls.iter().find(|d| d.id == trap_id) else { continue };
            self.focus.activate_trap(
                TrapDecl { zone_id: trap_id, initial_focus: None, return_focus_to: None },
                &decl.focusable_ids,
            );
        }
    }

    fn relayout(&mut self, report: &mut TurnReport) -> Result<(), EngineError> {
        let Some(layout_node) = &self.last_layout_node else { return Ok(()) };
        let (cols, rows) = self.viewport;
        let laid_out =
            tuicore_layout::layout(layout_node, 0, 0, cols, rows, tuicore_layout::MainAxis::Column)?;
        self.laid_out = Some(laid_out);
        self.viewport_dirty = false;
        report.laid_out = true;
        self.build_and_submit_frame(report)?;
        Ok(())
    }

    fn build_and_submit_frame(&mut self, report: &mut TurnReport) -> Result<(), EngineError> {
        let (Some(draw), Some(laid_out)) = (&mut self.draw, &self.laid_out) else { return Ok(()) };
        draw(&mut self.drawlist_builder, laid_out, &self.state, &self.theme);
        let bytes = self.drawlist_builder.build();
        self.backend.request_frame(&bytes)?;
        report.submitted_frame = true;
        Ok(())
    }

    fn retire_exit_transitions(&mut self) {
        for id in self.exit_tracker.retire_finished(self.clock_ms) {
            self.local_state.finalize_deferred_teardown(id);
        }
    }

    fn emit_focus_change(&mut self) {
        let current = self.focus.focused_id();
        let mut handlers = std::mem::take(&mut self.focus_handlers);
        for (_, handler) in &mut handlers {
            handler(current);
        }
        self.focus_handlers = handlers;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendEventBatch, Caps};
    use crate::vnode::Kind;
    use std::cell::RefCell;
    use std::rc::Rc;
    use tuicore_layout::LayoutProps;

    struct FakeBackend {
        batches: Vec<Vec<u8>>,
        requested_frames: Rc<RefCell<usize>>,
    }

    impl Backend for FakeBackend {
        fn start(&mut self) -> Result<(), EngineError> {
            Ok(())
        }
        fn stop(&mut self) {}
        fn dispose(&mut self) {}
        fn caps(&self) -> Caps {
            Caps::default()
        }
        fn poll_events(&mut self) -> Option<BackendEventBatch> {
            let bytes = self.batches.pop()?;
            Some(BackendEventBatch { bytes, dropped_batches: 0 })
        }
        fn request_frame(&mut self, _drawlist: &[u8]) -> Result<(), EngineError> {
            *self.requested_frames.borrow_mut() += 1;
            Ok(())
        }
        fn post_user_event(&mut self, _tag: &str, _payload: Vec<u8>) {}
    }

    fn resize_batch(cols: u16, rows: u16) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&zrev::MAGIC.to_le_bytes());
        buf.extend_from_slice(&zrev::VERSION.to_le_bytes());
        let total_pos = buf.len();
        buf.extend_from_slice(&0u32.to_le_bytes());
        buf.extend_from_slice(&1u32.to_le_bytes());
        buf.extend_from_slice(&0u32.to_le_bytes());
        buf.extend_from_slice(&0u32.to_le_bytes());
        buf.push(3); // TAG_RESIZE
        buf.extend_from_slice(&[0, 0, 0]);
        buf.extend_from_slice(&0u64.to_le_bytes());
        buf.extend_from_slice(&cols.to_le_bytes());
        buf.extend_from_slice(&rows.to_le_bytes());
        let total = buf.len() as u32;
        buf[total_pos..total_pos + 4].copy_from_slice(&total.to_le_bytes());
        buf
    }

    fn engine_with_batches(batches: Vec<Vec<u8>>) -> (Engine<FakeBackend, i32, ()>, Rc<RefCell<usize>>) {
        let requested_frames = Rc::new(RefCell::new(0));
        let backend = FakeBackend { batches, requested_frames: Rc::clone(&requested_frames) };
        let config = RuntimeConfig::new(0i32, ());
        let engine = Engine::new(backend, config, |count, ()| {
            VNode::leaf(Kind::Text, LayoutProps::default()).prop("count", crate::vnode::PropValue::Int(i64::from(*count)))
        });
        (engine, requested_frames)
    }

    #[test]
    fn first_turn_renders_and_submits_a_frame_on_resize() {
        let (mut engine, frames) = engine_with_batches(vec![resize_batch(80, 24)]);
        engine.draw(|_builder, _laid_out, _state, ()| {});
        let report = engine.pump(0).unwrap();
        assert!(report.rendered_view);
        assert!(report.laid_out);
        assert!(report.submitted_frame);
        assert_eq!(*frames.borrow(), 1);
    }

    #[test]
    fn update_invalidates_the_view_for_the_next_turn() {
        let (mut engine, _frames) = engine_with_batches(vec![resize_batch(80, 24)]);
        engine.draw(|_builder, _laid_out, _state, ()| {});
        engine.pump(0).unwrap();

        engine.update(|count| *count += 1).unwrap();
        let report = engine.pump(16).unwrap();
        assert!(report.rendered_view, "a queued update must invalidate the next turn's view");
    }

    #[test]
    fn update_during_render_is_rejected() {
        let (mut engine, _frames) = engine_with_batches(vec![]);
        engine.phase = Phase::Rendering;
        let err = engine.update(|count| *count += 1).unwrap_err();
        assert_eq!(err.code(), crate::error::ErrorCode::UpdateDuringRender);
    }

    #[test]
    fn chord_hit_invalidates_the_view() {
        let (mut engine, _frames) = engine_with_batches(vec![resize_batch(80, 24)]);
        engine.draw(|_builder, _laid_out, _state, ()| {});
        engine.keys(vec![Binding {
            sequence: vec![ChordKey { key_code: b'q' as u32, mods: tuicore_router::types::Mods::empty() }],
            action: "quit".to_string(),
        }]);
        engine.pump(0).unwrap();

        let mut batch = Vec::new();
        batch.extend_from_slice(&zrev::MAGIC.to_le_bytes());
        batch.extend_from_slice(&zrev::VERSION.to_le_bytes());
        let total_pos = batch.len();
        batch.extend_from_slice(&0u32.to_le_bytes());
        batch.extend_from_slice(&1u32.to_le_bytes());
        batch.extend_from_slice(&0u32.to_le_bytes());
        batch.extend_from_slice(&0u32.to_le_bytes());
        batch.push(1); // TAG_KEY
        batch.extend_from_slice(&[0, 0, 0]);
        batch.extend_from_slice(&0u64.to_le_bytes());
        batch.extend_from_slice(&(b'q' as u32).to_le_bytes());
        batch.push(0); // mods
        batch.push(0); // KeyAction::Down
        batch.extend_from_slice(&[0, 0]); // pad to 16
        let total = batch.len() as u32;
        batch[total_pos..total_pos + 4].copy_from_slice(&total.to_le_bytes());

        engine.backend.batches.push(batch);
        let report = engine.pump(32).unwrap();
        assert!(report.rendered_view);
        assert!(engine.pending_chord().is_none(), "a full chord hit clears the pending sequence");
    }

    fn key_down_batch(code: u32) -> Vec<u8> {
        let mut batch = Vec::new();
        batch.extend_from_slice(&zrev::MAGIC.to_le_bytes());
        batch.extend_from_slice(&zrev::VERSION.to_le_bytes());
        let total_pos = batch.len();
        batch.extend_from_slice(&0u32.to_le_bytes());
        batch.extend_from_slice(&1u32.to_le_bytes());
        batch.extend_from_slice(&0u32.to_le_bytes());
        batch.extend_from_slice(&0u32.to_le_bytes());
        batch.push(1); // TAG_KEY
        batch.extend_from_slice(&[0, 0, 0]);
        batch.extend_from_slice(&0u64.to_le_bytes());
        batch.extend_from_slice(&code.to_le_bytes());
        batch.push(0); // mods
        batch.push(0); // KeyAction::Down
        batch.extend_from_slice(&[0, 0]); // pad to 16
        let total = batch.len() as u32;
        batch[total_pos..total_pos + 4].copy_from_slice(&total.to_le_bytes());
        batch
    }

    #[test]
    fn chord_hit_dispatches_to_on_action_subscribers() {
        let (mut engine, _frames) = engine_with_batches(vec![resize_batch(80, 24)]);
        engine.draw(|_builder, _laid_out, _state, ()| {});
        engine.keys(vec![Binding {
            sequence: vec![ChordKey { key_code: b'q' as u32, mods: tuicore_router::types::Mods::empty() }],
            action: "quit".to_string(),
        }]);
        engine.on_action(|action, ctx| {
            if action == "quit" {
                ctx.update(|count| *count = -1);
            }
        });
        engine.pump(0).unwrap();

        engine.backend.batches.push(key_down_batch(b'q' as u32));
        let report = engine.pump(32).unwrap();

        assert_eq!(*engine.state(), -1, "the on_action handler's queued update must have applied");
        assert!(report.rendered_view);
        assert!(engine.pending_chord().is_none());
    }
}
