// Copyright 2025 the tuicore Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chord matcher: multi-key sequence bindings with a pending-prefix state.

use alloc::string::String;
use alloc::vec::Vec;

use crate::types::{Binding, ChordKey};

/// Result of feeding one key into the [`ChordMatcher`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChordOutcome {
    /// No pending sequence and no match; nothing happened.
    NoMatch,
    /// The key extended a pending sequence that is a strict prefix of at
    /// least one binding, but matches none in full yet.
    Pending,
    /// The pending sequence matched a binding in full; it fires and clears.
    Hit(String),
    /// The key broke every pending prefix; the sequence was cleared without
    /// firing.
    Cleared,
}

/// Deterministic multi-key chord matcher.
///
/// Holds a `pendingChord` state: on every key-down, the key is appended to
/// the pending sequence. If the sequence is now a complete registered
/// binding, the handler fires and the state clears. If it is a strict
/// prefix of at least one binding, it is retained. Otherwise it clears
/// without firing. Every transition that changes pending-chord emptiness
/// (non-null ↔ any, null ↔ non-null) is reported via [`ChordOutcome`] so the
/// host can invalidate the render to show the in-progress chord.
#[derive(Clone, Debug, Default)]
pub struct ChordMatcher {
    bindings: Vec<Binding>,
    pending: Vec<ChordKey>,
}

impl ChordMatcher {
    /// Construct a matcher with no registered bindings.
    #[must_use]
    pub fn new() -> Self {
        Self { bindings: Vec::new(), pending: Vec::new() }
    }

    /// Replace the registered binding set. Clears any pending sequence,
    /// since a binding it was matching against may no longer exist.
    pub fn set_bindings(&mut self, bindings: Vec<Binding>) {
        self.bindings = bindings;
        self.pending.clear();
    }

    /// The in-progress chord prefix, exposed read-only to the host (mirrors
    /// the public `pendingChord` property).
    #[must_use]
    pub fn pending_chord(&self) -> Option<&[ChordKey]> {
        if self.pending.is_empty() { None } else { Some(&self.pending) }
    }

    /// Feed one key-down event into the matcher.
    pub fn feed(&mut self, key: ChordKey) -> ChordOutcome {
        let was_pending = !self.pending.is_empty();
        self.pending.push(key);

        if let Some(binding) = self.bindings.iter().find(|b| b.sequence == self.pending) {
            let action = binding.action.clone();
            self.pending.clear();
            log::debug!("chord: matched binding {action:?}");
            return ChordOutcome::Hit(action);
        }

        let is_prefix = self.bindings.iter().any(|b| {
            b.sequence.len() > self.pending.len() && b.sequence[..self.pending.len()] == self.pending[..]
        });

        if is_prefix {
            log::debug!("chord: pending ({} keys)", self.pending.len());
            ChordOutcome::Pending
        } else {
            self.pending.clear();
            if was_pending {
                log::debug!("chord: prefix broken, cleared");
                ChordOutcome::Cleared
            } else {
                ChordOutcome::NoMatch
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use alloc::vec;

    use super::*;
    use crate::types::Mods;

    fn key(code: u32) -> ChordKey {
        ChordKey { key_code: code, mods: Mods::empty() }
    }

    fn g() -> ChordKey {
        key(b'g' as u32)
    }

    /// Binding `"g g" -> hit`: pressing `g` once leaves a pending chord and
    /// no hit; pressing `g` again clears the pending chord and fires once.
    #[test]
    fn chord_progression_g_g() {
        let mut matcher = ChordMatcher::new();
        matcher.set_bindings(vec![Binding { sequence: vec![g(), g()], action: "hit".to_string() }]);

        let first = matcher.feed(g());
        assert_eq!(first, ChordOutcome::Pending);
        assert_eq!(matcher.pending_chord(), Some(&[g()][..]));

        let second = matcher.feed(g());
        assert_eq!(second, ChordOutcome::Hit("hit".to_string()));
        assert!(matcher.pending_chord().is_none());
    }

    #[test]
    fn non_prefix_key_clears_without_firing() {
        let mut matcher = ChordMatcher::new();
        matcher.set_bindings(vec![Binding { sequence: vec![g(), g()], action: "hit".to_string() }]);
        matcher.feed(g());
        let outcome = matcher.feed(key(b'x' as u32));
        assert_eq!(outcome, ChordOutcome::Cleared);
        assert!(matcher.pending_chord().is_none());
    }

    #[test]
    fn unrelated_key_with_no_pending_is_no_match() {
        let mut matcher = ChordMatcher::new();
        matcher.set_bindings(vec![Binding { sequence: vec![g(), g()], action: "hit".to_string() }]);
        let outcome = matcher.feed(key(b'x' as u32));
        assert_eq!(outcome, ChordOutcome::NoMatch);
    }

    #[test]
    fn single_key_binding_fires_immediately() {
        let mut matcher = ChordMatcher::new();
        matcher.set_bindings(vec![Binding { sequence: vec![g()], action: "hit".to_string() }]);
        let outcome = matcher.feed(g());
        assert_eq!(outcome, ChordOutcome::Hit("hit".to_string()));
    }
}
