// Copyright 2025 the tuicore Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! tuicore_focus: focus zones, traps, and traversal order.
//!
//! Focus is modeled as a set of *zones* forming a containment graph plus a
//! LIFO *trap stack*. At most one zone is active at a time; traversal occurs
//! within it until explicitly leaving. [`FocusState`] is generic over the
//! id type `Id` (normally the reconciler's instance id) so this crate has no
//! dependency on any particular tree representation.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::vec::Vec;
use core::hash::Hash;

use hashbrown::HashMap;

/// High-level navigation intent driving [`FocusState::traverse`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Navigation {
    /// Tab: advance to the next focusable.
    Next,
    /// Shift+Tab: advance to the previous focusable.
    Prev,
    /// Arrow up (grid navigation only).
    Up,
    /// Arrow down (grid navigation only).
    Down,
    /// Arrow left (grid navigation only).
    Left,
    /// Arrow right (grid navigation only).
    Right,
}

/// A zone's traversal style.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NavigationMode {
    /// Step through `focusable_ids` in order; wraps only when `wrap_around`.
    Linear,
    /// Step by ±1 on horizontal moves, ±`columns` on vertical moves, clamped
    /// (never wraps, regardless of `wrap_around` — grid wrap is a
    /// higher-level widget concern).
    Grid {
        /// Column count used to compute vertical strides.
        columns: u32,
    },
}

/// A focus zone: a named subtree within which traversal is contained.
#[derive(Clone, Debug)]
pub struct Zone<Id> {
    /// Inter-zone ordering for Tab cycling; ties break by commit-encounter order.
    pub tab_index: i32,
    /// Traversal style within this zone.
    pub navigation: NavigationMode,
    /// Whether `Next`/`Prev` wraps at the ends of `focusable_ids`.
    pub wrap_around: bool,
    /// Focusable ids in this zone, ordered by commit-time appearance.
    pub focusable_ids: Vec<Id>,
    /// Last focused id within this zone, restored when the zone re-activates.
    pub last_focused_id: Option<Id>,
    /// Containing zone, if any.
    pub parent_zone_id: Option<Id>,
}

/// One frame's declaration of a zone's committed metadata, handed to
/// [`FocusState::finalize`]. `last_focused_id` is *not* part of this input —
/// it is carried over internally across frames.
#[derive(Clone, Debug)]
pub struct ZoneDecl<Id> {
    /// This zone's id.
    pub id: Id,
    /// See [`Zone::tab_index`].
    pub tab_index: i32,
    /// See [`Zone::navigation`].
    pub navigation: NavigationMode,
    /// See [`Zone::wrap_around`].
    pub wrap_around: bool,
    /// See [`Zone::focusable_ids`].
    pub focusable_ids: Vec<Id>,
    /// See [`Zone::parent_zone_id`].
    pub parent_zone_id: Option<Id>,
}

/// A trap declaration: forbids focus from leaving its zone except by
/// explicit deactivation.
#[derive(Clone, Debug)]
pub struct TrapDecl<Id> {
    /// The zone this trap confines focus to.
    pub zone_id: Id,
    /// Focusable id to jump to on activation, if present among descendants.
    pub initial_focus: Option<Id>,
    /// Focusable id to restore on deactivation; falls back to the
    /// previously active zone's `last_focused_id` when `None`.
    pub return_focus_to: Option<Id>,
}

/// The full focus state machine: zones, trap stack, and pending focus.
#[derive(Clone, Debug)]
pub struct FocusState<Id> {
    focused_id: Option<Id>,
    /// `Some(None)` is an explicit request to clear focus; `Some(Some(id))`
    /// requests `id`; `None` means no pending request this frame.
    pending_focused_id: Option<Option<Id>>,
    active_zone_id: Option<Id>,
    zones: HashMap<Id, Zone<Id>>,
    /// Zones in first-encountered order, used as the Tab tie-break.
    zone_order: Vec<Id>,
    trap_stack: Vec<TrapDecl<Id>>,
    last_focused_by_zone: HashMap<Id, Id>,
    trap_override: Option<Option<Id>>,
}

impl<Id> Default for FocusState<Id>
where
    Id: Copy + Eq + Hash,
{
    fn default() -> Self {
        Self {
            focused_id: None,
            pending_focused_id: None,
            active_zone_id: None,
            zones: HashMap::new(),
            zone_order: Vec::new(),
            trap_stack: Vec::new(),
            last_focused_by_zone: HashMap::new(),
            trap_override: None,
        }
    }
}

impl<Id> FocusState<Id>
where
    Id: Copy + Eq + Hash,
{
    /// Construct an empty focus state with nothing focused.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently focused id, if any.
    #[must_use]
    pub const fn focused_id(&self) -> Option<Id>
    where
        Id: Copy,
    {
        self.focused_id
    }

    /// Returns `true` if `id` is currently focused.
    #[must_use]
    pub fn is_focused(&self, id: Id) -> bool {
        self.focused_id == Some(id)
    }

    /// The currently active zone, if any.
    #[must_use]
    pub const fn active_zone_id(&self) -> Option<Id> {
        self.active_zone_id
    }

    /// Whether a trap is currently active.
    #[must_use]
    pub fn trap_active(&self) -> bool {
        !self.trap_stack.is_empty()
    }

    /// The innermost active trap, if any.
    #[must_use]
    pub fn active_trap(&self) -> Option<&TrapDecl<Id>> {
        self.trap_stack.last()
    }

    /// Request a pending focus change, applied at the next [`Self::finalize`].
    /// `None` requests clearing focus.
    pub fn request_focus(&mut self, id: Option<Id>) {
        self.pending_focused_id = Some(id);
        log::trace!("focus: pending request set");
    }

    /// Activate a trap: push it onto the LIFO stack and compute where focus
    /// should land (`initial_focus` if present among `trap_focusables`, else
    /// the first of `trap_focusables`). The actual move is applied at the
    /// next [`Self::finalize`], which gives it priority over any other
    /// pending focus request; applied once at the end of routing.
    pub fn activate_trap(&mut self, decl: TrapDecl<Id>, trap_focusables: &[Id]) {
        let target = decl
            .initial_focus
            .filter(|f| trap_focusables.contains(f))
            .or_else(|| trap_focusables.first().copied());
        self.trap_override = Some(target);
        log::debug!("focus: trap activated");
        self.trap_stack.push(decl);
    }

    /// Deactivate the innermost trap, restoring `return_focus_to` or the
    /// previously active zone's `last_focused_id`.
    pub fn deactivate_trap(&mut self) {
        let Some(trap) = self.trap_stack.pop() else {
            return;
        };
        let restore = trap.return_focus_to.or_else(|| {
            self.trap_stack
                .last()
                .map(|t| t.zone_id)
                .and_then(|zone| self.last_focused_by_zone.get(&zone).copied())
        });
        self.trap_override = Some(restore);
        log::debug!("focus: trap deactivated");
    }

    /// Reconcile focus state against the newly committed zone metadata.
    /// Must be called exactly once per frame, after commit and before the
    /// next render.
    pub fn finalize(&mut self, decls: Vec<ZoneDecl<Id>>) {
        let mut new_zones = HashMap::with_capacity(decls.len());
        let mut new_order = Vec::with_capacity(decls.len());
        for decl in decls {
            let last_focused_id =
                self.zones.get(&decl.id).and_then(|z| z.last_focused_id).filter(|id| {
                    decl.focusable_ids.contains(id)
                });
            new_order.push(decl.id);
            new_zones.insert(
                decl.id,
                Zone {
                    tab_index: decl.tab_index,
                    navigation: decl.navigation,
                    wrap_around: decl.wrap_around,
                    focusable_ids: decl.focusable_ids,
                    last_focused_id,
                    parent_zone_id: decl.parent_zone_id,
                },
            );
        }
        self.zones = new_zones;
        self.zone_order = new_order;

        let all_focusables: Vec<Id> =
            self.zone_order.iter().flat_map(|z| self.zones[z].focusable_ids.iter().copied()).collect();
        // While a trap is active, focus may only land on one of the trap zone's
        // own descendants, not just any committed focusable — this is re-checked
        // every finalize,
        // not only at trap activation, since a pending request or a stale
        // `focused_id` could otherwise point outside the trap on a later frame.
        let candidates = self.trap_stack.last().map_or(all_focusables, |t| self.trap_descendant_focusables(t.zone_id));

        let next_focused = if let Some(over) = self.trap_override.take() {
            over
        } else if let Some(pending) = self.pending_focused_id.take() {
            match pending {
                Some(id) if candidates.contains(&id) => Some(id),
                Some(_) => self.previous_or_fallback(&candidates),
                None => None,
            }
        } else {
            self.previous_or_fallback(&candidates)
        };

        self.focused_id = next_focused;
        self.active_zone_id = next_focused.and_then(|id| self.zone_of(id));
        if let (Some(zone), Some(id)) = (self.active_zone_id, self.focused_id) {
            self.last_focused_by_zone.insert(zone, id);
            if let Some(z) = self.zones.get_mut(&zone) {
                z.last_focused_id = Some(id);
            }
        }
        log::trace!("focus: finalized, {} zones committed", self.zone_order.len());
    }

    /// Step 4/5 of the finalize cascade: keep the previous focused id if it
    /// is still among `candidates`, else fall back to the first candidate.
    fn previous_or_fallback(&self, candidates: &[Id]) -> Option<Id> {
        match self.focused_id {
            Some(id) if candidates.contains(&id) => Some(id),
            _ => self.fallback_focus(candidates),
        }
    }

    fn fallback_focus(&self, candidates: &[Id]) -> Option<Id> {
        candidates.first().copied()
    }

    fn zone_of(&self, id: Id) -> Option<Id> {
        self.zone_order.iter().find(|z| self.zones[z].focusable_ids.contains(&id)).copied()
    }

    /// All focusable ids belonging to `zone_id` or any zone nested under it
    /// (by transitive `parent_zone_id`), in commit-encounter order. This is
    /// the set a trap on `zone_id` confines focus to.
    fn trap_descendant_focusables(&self, zone_id: Id) -> Vec<Id> {
        let is_descendant = |mut z: Id| -> bool {
            loop {
                if z == zone_id {
                    return true;
                }
                match self.zones.get(&z).and_then(|zone| zone.parent_zone_id) {
                    Some(parent) => z = parent,
                    None => return false,
                }
            }
        };
        self.zone_order
            .iter()
            .filter(|z| is_descendant(**z))
            .flat_map(|z| self.zones[z].focusable_ids.iter().copied())
            .collect()
    }

    /// Traverse within the active zone per its navigation mode, returning
    /// the id that should become the new pending focus (caller still must
    /// call [`Self::request_focus`] to apply it — traversal never mutates
    /// state directly, matching the "focus changes are pending" ordering
    /// rule).
    #[must_use]
    pub fn traverse(&self, direction: Navigation) -> Option<Id> {
        let zone_id = self.active_zone_id?;
        let zone = self.zones.get(&zone_id)?;
        let ids = &zone.focusable_ids;
        if ids.is_empty() {
            return None;
        }
        let current = self.focused_id.and_then(|id| ids.iter().position(|x| *x == id));

        match zone.navigation {
            NavigationMode::Linear => match direction {
                Navigation::Next => step(ids, current, 1, zone.wrap_around),
                Navigation::Prev => step(ids, current, -1, zone.wrap_around),
                _ => None,
            },
            NavigationMode::Grid { columns } => {
                let stride = match direction {
                    Navigation::Left => -1,
                    Navigation::Right => 1,
                    Navigation::Up => -(columns as isize),
                    Navigation::Down => columns as isize,
                    Navigation::Next | Navigation::Prev => return None,
                };
                step_clamped(ids, current, stride)
            }
        }
    }

    /// Cycle zones by ascending `tab_index`, ties broken by commit-encounter
    /// order, and return the first focusable id of the next/previous zone.
    #[must_use]
    pub fn tab_to_zone(&self, forward: bool) -> Option<Id> {
        if self.trap_active() {
            // A trap forbids leaving its zone via zone-cycling.
            return self.traverse(if forward { Navigation::Next } else { Navigation::Prev });
        }
        let mut ordered: Vec<&Id> = self.zone_order.iter().collect();
        ordered.sort_by(|a, b| {
            self.zones[a].tab_index.cmp(&self.zones[b].tab_index).then_with(|| {
                let pa = self.zone_order.iter().position(|z| z == *a).unwrap_or(0);
                let pb = self.zone_order.iter().position(|z| z == *b).unwrap_or(0);
                pa.cmp(&pb)
            })
        });
        if ordered.is_empty() {
            return None;
        }
        let current_pos = self.active_zone_id.and_then(|az| ordered.iter().position(|z| **z == az));
        let next_zone = match current_pos {
            Some(pos) => {
                let len = ordered.len() as isize;
                let delta = if forward { 1 } else { -1 };
                let idx = (pos as isize + delta).rem_euclid(len) as usize;
                *ordered[idx]
            }
            None => *ordered[0],
        };
        self.zones.get(&next_zone).and_then(|z| z.focusable_ids.first().copied())
    }
}

fn step<Id: Copy>(ids: &[Id], current: Option<usize>, delta: isize, wrap: bool) -> Option<Id> {
    let len = ids.len() as isize;
    match current {
        None => Some(ids[0]),
        Some(pos) => {
            let next = pos as isize + delta;
            if next < 0 || next >= len {
                if wrap {
                    Some(ids[next.rem_euclid(len) as usize])
                } else {
                    None
                }
            } else {
                Some(ids[next as usize])
            }
        }
    }
}

fn step_clamped<Id: Copy>(ids: &[Id], current: Option<usize>, delta: isize) -> Option<Id> {
    let len = ids.len() as isize;
    match current {
        None => Some(ids[0]),
        Some(pos) => {
            let next = (pos as isize + delta).clamp(0, len - 1);
            Some(ids[next as usize])
        }
    }
}
