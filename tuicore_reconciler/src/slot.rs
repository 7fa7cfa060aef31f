// Copyright 2025 the tuicore Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Slot identity: the key a child is matched against across frames.

use alloc::string::String;
use core::fmt;

/// The identity a child list entry is matched against between frames.
///
/// Keyed children (`"k:<key>"`) are matched by their author-supplied key
/// regardless of where they sit in the list; unkeyed children (`"i:<index>"`)
/// are matched by their position among *all* children in the next list
/// (including keyed siblings, but not counting holes — see
/// [`reconcile`](crate::reconcile::reconcile)). The two namespaces never
/// collide, so a keyed child can never accidentally steal an unkeyed
/// sibling's instance or vice versa.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SlotId {
    /// An explicit, author-supplied key.
    Keyed(String),
    /// A positional slot, indexed by position in the next children list.
    Indexed(usize),
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotId::Keyed(key) => write!(f, "k:{key}"),
            SlotId::Indexed(index) => write!(f, "i:{index}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn display_matches_wire_prefixes() {
        assert_eq!(SlotId::Keyed("a".to_string()).to_string(), "k:a");
        assert_eq!(SlotId::Indexed(3).to_string(), "i:3");
    }
}
