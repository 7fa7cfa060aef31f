// Copyright 2025 the tuicore Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The local state store: per-instance hook cells, effects, and deferred
//! cleanup, held as an ordered per-instance cell list.
//!
//! Each instance owns an append-only vector of [`HookCell`]s. A render
//! visits them positionally — the same call order every frame is the only
//! contract a host's composite render function must uphold. Effects queue
//! into a pending list drained once after commit; cleanups run on
//! teardown unless the instance is mid-exit-animation, in which case they
//! are deferred onto the exit track's completion.

use std::any::Any;
use hashbrown::HashMap;
use std::vec::Vec;

type InstanceId = u64;
type Cleanup = Box<dyn FnOnce() + 'static>;

/// One hook cell. Visited positionally by [`HookCursor`]; the cell's
/// concrete payload type must stay the same across frames at a given
/// position (a host that violates this — e.g. an `if` around a `use_state`
/// call — gets a panic from the `downcast_mut` call, matching the hard
/// failure a hook-order violation produces in every hooks-based runtime).
enum HookCell {
    State(Box<dyn Any>),
    Ref(Box<dyn Any>),
    Effect { last_dep_hash: Option<u64>, cleanup: Option<Cleanup> },
}

#[derive(Default)]
struct InstanceState {
    cells: Vec<HookCell>,
}

/// Per-instance hook state, pending effects, and deferred cleanups for one
/// running engine.
#[derive(Default)]
pub struct LocalStateStore {
    instances: HashMap<InstanceId, InstanceState>,
    /// Cleanups set aside for instances mid-exit-animation; run by
    /// [`Self::finalize_deferred_teardown`] when the exit track completes.
    deferred: HashMap<InstanceId, Vec<Cleanup>>,
    /// Effects queued this render, in call order, run after commit.
    pending_effects: Vec<(InstanceId, usize, Box<dyn FnOnce() -> Option<Cleanup> + 'static>)>,
}

impl LocalStateStore {
    /// Construct an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin (or resume) rendering `id`: returns a cursor that visits hook
    /// cells positionally starting at index 0.
    pub fn begin_render(&mut self, id: InstanceId) -> HookCursor<'_> {
        self.instances.entry(id).or_default();
        HookCursor { store: self, id, index: 0 }
    }

    /// Tear down `id` immediately: run every stored effect cleanup in
    /// reverse hook order (matching React's own unmount cleanup order) and
    /// drop its cell table.
    pub fn teardown(&mut self, id: InstanceId) {
        let Some(state) = self.instances.remove(&id) else { return };
        for cell in state.cells.into_iter().rev() {
            if let HookCell::Effect { cleanup: Some(cleanup), .. } = cell {
                cleanup();
            }
        }
        log::trace!("state: instance {id} torn down, cleanups run");
    }

    /// Tear down `id` but defer its cleanups: the instance has a pending
    /// exit animation, so its cells are removed from the live table (no
    /// further hook access) but cleanups are held until
    /// [`Self::finalize_deferred_teardown`] is called when the exit
    /// completes.
    pub fn defer_teardown(&mut self, id: InstanceId) {
        let Some(state) = self.instances.remove(&id) else { return };
        let cleanups: Vec<Cleanup> = state
            .cells
            .into_iter()
            .rev()
            .filter_map(|cell| match cell {
                HookCell::Effect { cleanup: Some(cleanup), .. } => Some(cleanup),
                _ => None,
            })
            .collect();
        if !cleanups.is_empty() {
            self.deferred.insert(id, cleanups);
        }
        log::trace!("state: instance {id} torn down, cleanups deferred to exit completion");
    }

    /// Run and clear the cleanups deferred for `id` by
    /// [`Self::defer_teardown`]. Called by the animation scheduler when an
    /// exit track finishes. A no-op if the exit was cancelled via
    /// reappearance (cleanups were never deferred in the first place, since
    /// the instance simply continues living) or already finalized.
    pub fn finalize_deferred_teardown(&mut self, id: InstanceId) {
        if let Some(cleanups) = self.deferred.remove(&id) {
            for cleanup in cleanups {
                cleanup();
            }
            log::trace!("state: instance {id} deferred cleanups ran on exit completion");
        }
    }

    /// Queue an effect to run after commit, in the order queued. If a
    /// deferred teardown is still pending for `id` (the exit was cancelled
    /// mid-flight and the instance is rendering again), this simply queues
    /// normally — the deferred cleanups run independently when retired.
    fn queue_effect(&mut self, id: InstanceId, index: usize, run: Box<dyn FnOnce() -> Option<Cleanup> + 'static>) {
        self.pending_effects.push((id, index, run));
    }

    /// Drain and run every effect queued this commit, in queue order. Each
    /// effect's previous cleanup (if any, from a prior render at the same
    /// hook position) runs immediately before the new effect body.
    pub fn run_pending_effects(&mut self) {
        let pending = std::mem::take(&mut self.pending_effects);
        for (id, index, run) in pending {
            let Some(state) = self.instances.get_mut(&id) else { continue };
            if let Some(HookCell::Effect { cleanup, .. }) = state.cells.get_mut(index) {
                if let Some(old) = cleanup.take() {
                    old();
                }
            }
            let new_cleanup = run();
            if let Some(HookCell::Effect { cleanup, .. }) = state.cells.get_mut(index) {
                *cleanup = new_cleanup;
            }
        }
    }

    /// Whether any effects are queued for the next [`Self::run_pending_effects`].
    #[must_use]
    pub fn has_pending_effects(&self) -> bool {
        !self.pending_effects.is_empty()
    }
}

/// A positional visitor over one instance's hook cells for a single render.
pub struct HookCursor<'a> {
    store: &'a mut LocalStateStore,
    id: InstanceId,
    index: usize,
}

impl HookCursor<'_> {
    /// Visit (creating on first render) a `State` cell, returning a mutable
    /// reference to its current value.
    ///
    /// # Panics
    ///
    /// Panics if this hook position held a different concrete type on a
    /// previous render — a hook-order violation.
    pub fn state<T: 'static>(&mut self, init: impl FnOnce() -> T) -> &mut T {
        let index = self.advance();
        let state = self.store.instances.get_mut(&self.id).expect("begin_render was called");
        if index == state.cells.len() {
            state.cells.push(HookCell::State(Box::new(init())));
        }
        match &mut state.cells[index] {
            HookCell::State(value) => value.downcast_mut::<T>().expect("hook order violated: State cell type changed between renders"),
            _ => panic!("hook order violated: cell at index {index} was not a State cell"),
        }
    }

    /// Visit (creating on first render) a `Ref` cell: a mutable cell that
    /// never triggers a rerender and is never touched by reconciliation,
    /// only by the host.
    ///
    /// # Panics
    ///
    /// Panics if this hook position held a different concrete type on a
    /// previous render.
    pub fn reference<T: Default + 'static>(&mut self) -> &mut T {
        let index = self.advance();
        let state = self.store.instances.get_mut(&self.id).expect("begin_render was called");
        if index == state.cells.len() {
            state.cells.push(HookCell::Ref(Box::<T>::default()));
        }
        match &mut state.cells[index] {
            HookCell::Ref(value) => value.downcast_mut::<T>().expect("hook order violated: Ref cell type changed between renders"),
            _ => panic!("hook order violated: cell at index {index} was not a Ref cell"),
        }
    }

    /// Register an effect keyed by `dep_hash`: `run` is queued to execute
    /// after commit only if `dep_hash` differs from the hash recorded on
    /// the previous render (or this is the first render). The effect may
    /// return a cleanup, run immediately before the next execution (or on
    /// unmount).
    pub fn effect(&mut self, dep_hash: u64, run: impl FnOnce() -> Option<Cleanup> + 'static) {
        let index = self.advance();
        let state = self.store.instances.get_mut(&self.id).expect("begin_render was called");
        if index == state.cells.len() {
            state.cells.push(HookCell::Effect { last_dep_hash: None, cleanup: None });
        }
        let should_run = match &mut state.cells[index] {
            HookCell::Effect { last_dep_hash, .. } => {
                let changed = *last_dep_hash != Some(dep_hash);
                *last_dep_hash = Some(dep_hash);
                changed
            }
            _ => panic!("hook order violated: cell at index {index} was not an Effect cell"),
        };
        if should_run {
            self.store.queue_effect(self.id, index, Box::new(run));
        }
    }

    fn advance(&mut self) -> usize {
        let index = self.index;
        self.index += 1;
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn state_cell_persists_across_renders() {
        let mut store = LocalStateStore::new();
        {
            let mut cursor = store.begin_render(1);
            let count = cursor.state(|| 0i32);
            *count += 1;
        }
        {
            let mut cursor = store.begin_render(1);
            let count = cursor.state(|| 0i32);
            assert_eq!(*count, 1);
            *count += 1;
        }
        {
            let mut cursor = store.begin_render(1);
            let count = cursor.state(|| 0i32);
            assert_eq!(*count, 2);
        }
    }

    #[test]
    fn effect_runs_once_per_dep_hash_change() {
        let mut store = LocalStateStore::new();
        let calls = Rc::new(RefCell::new(0));

        for dep in [1u64, 1, 2, 2] {
            let calls = Rc::clone(&calls);
            let mut cursor = store.begin_render(1);
            cursor.effect(dep, move || {
                *calls.borrow_mut() += 1;
                None
            });
            store.run_pending_effects();
        }
        assert_eq!(*calls.borrow(), 2, "effect runs only when the dependency hash changes");
    }

    #[test]
    fn teardown_runs_cleanup_in_reverse_order() {
        let mut store = LocalStateStore::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        {
            let mut cursor = store.begin_render(1);
            let o1 = Rc::clone(&order);
            cursor.effect(1, move || {
                Some(Box::new(move || o1.borrow_mut().push(1)) as Box<dyn FnOnce()>)
            });
            let o2 = Rc::clone(&order);
            cursor.effect(1, move || {
                Some(Box::new(move || o2.borrow_mut().push(2)) as Box<dyn FnOnce()>)
            });
        }
        store.run_pending_effects();
        store.teardown(1);
        assert_eq!(*order.borrow(), vec![2, 1], "cleanups run in reverse hook order");
    }

    #[test]
    fn deferred_teardown_withholds_cleanup_until_finalized() {
        let mut store = LocalStateStore::new();
        let ran = Rc::new(RefCell::new(false));
        {
            let mut cursor = store.begin_render(1);
            let ran = Rc::clone(&ran);
            cursor.effect(1, move || Some(Box::new(move || *ran.borrow_mut() = true) as Box<dyn FnOnce()>));
        }
        store.run_pending_effects();
        store.defer_teardown(1);
        assert!(!*ran.borrow(), "cleanup withheld while the exit animation plays");
        store.finalize_deferred_teardown(1);
        assert!(*ran.borrow(), "cleanup runs once the exit animation completes");
    }

    #[test]
    #[should_panic(expected = "hook order violated")]
    fn changing_hook_type_at_a_position_panics() {
        let mut store = LocalStateStore::new();
        {
            let mut cursor = store.begin_render(1);
            let _ = cursor.state(|| 0i32);
        }
        let mut cursor = store.begin_render(1);
        let _ = cursor.state(|| "oops");
    }
}
