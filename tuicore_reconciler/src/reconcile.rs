// Copyright 2025 the tuicore Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyed/unkeyed child list reconciliation.

use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;

use crate::error::ReconcileError;
use crate::id::{InstanceId, InstanceIdAllocator};
use crate::slot::SlotId;

/// One child of the previous frame's committed child list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrevChild<Kind> {
    /// The instance id this child was mounted as.
    pub instance_id: InstanceId,
    /// The slot id it was matched under when it was last reconciled.
    pub slot_id: SlotId,
    /// Its kind, compared against the next child's kind to decide reuse.
    pub kind: Kind,
}

/// A requested child of the next frame's child list, or `None` for an
/// explicit hole (an `undefined` left by the author at that position).
///
/// A hole unmounts whatever previously sat in the slot it would have
/// occupied and does not consume a positional index for later unkeyed
/// siblings: indices are assigned only to the concrete (non-hole) entries,
/// in the order they appear.
pub type NextChildSlot<Kind> = Option<NextChild<Kind>>;

/// A concrete (non-hole) requested child.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NextChild<Kind> {
    /// Author-supplied key, if any. `None` means this child is matched
    /// positionally.
    pub key: Option<String>,
    /// The child's kind.
    pub kind: Kind,
}

/// One entry of the reconciled next child list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReconciledChild<Kind> {
    /// The instance id this child is (or remains) mounted as.
    pub instance_id: InstanceId,
    /// The slot id it was matched under, carried forward for next frame.
    pub slot_id: SlotId,
    /// Its kind.
    pub kind: Kind,
    /// Whether a previous instance was reused, as opposed to newly mounted.
    pub reused: bool,
}

/// Result of reconciling one instance's children against a new request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReconcileOutput<Kind> {
    /// The next committed child list, in document order.
    pub next_children: Vec<ReconciledChild<Kind>>,
    /// Instance ids that were reused, in the order they appear in
    /// `next_children`.
    pub reused: Vec<InstanceId>,
    /// Instance ids newly allocated this frame, in the order they appear in
    /// `next_children`.
    pub new: Vec<InstanceId>,
    /// Instance ids from the previous child list with no counterpart in the
    /// next list; these must be torn down.
    pub unmounted: Vec<InstanceId>,
}

/// Reconcile `prev`, the previously committed children of `parent_id`,
/// against `next`, the newly requested children.
///
/// A previous child is reused only when both its slot id *and* its kind
/// match the next child occupying that slot; a kind mismatch at a matched
/// slot forces a remount (new instance id) even though the position or key
/// lined up. Because the keyed (`"k:"`) and positional (`"i:"`) slot
/// namespaces never collide, a keyed child's identity can never be stolen
/// by a positional sibling shifting into its old index, and vice versa —
/// moving, adding, or removing a keyed sibling can still shift a positional
/// sibling's own index far enough to remount it, which is expected.
///
/// # Errors
///
/// Returns [`ReconcileError::DuplicateKey`] if two next children share a
/// key. The caller must not commit a partial child list on error.
pub fn reconcile<Kind: PartialEq + Clone>(
    parent_id: InstanceId,
    prev: &[PrevChild<Kind>],
    next: &[NextChildSlot<Kind>],
    allocator: &mut InstanceIdAllocator,
) -> Result<ReconcileOutput<Kind>, ReconcileError> {
    let mut prev_by_slot: HashMap<&SlotId, &PrevChild<Kind>> =
        HashMap::with_capacity(prev.len());
    for child in prev {
        prev_by_slot.insert(&child.slot_id, child);
    }

    let mut first_seen_key: HashMap<&str, usize> = HashMap::new();
    let mut next_children = Vec::with_capacity(next.len());
    let mut reused = Vec::new();
    let mut new = Vec::new();
    let mut consumed: HashMap<&SlotId, ()> = HashMap::with_capacity(prev.len());

    let mut concrete_index = 0usize;
    for (raw_index, slot) in next.iter().enumerate() {
        let Some(child) = slot else { continue };

        let slot_id = match &child.key {
            Some(key) => {
                if let Some(&first_index) = first_seen_key.get(key.as_str()) {
                    log::warn!(
                        "reconcile: DUPLICATE_KEY on parent {parent_id}: key {key:?} at indices {first_index} and {raw_index}"
                    );
                    return Err(ReconcileError::DuplicateKey {
                        parent_id,
                        child_count: next.len(),
                        first_index,
                        second_index: raw_index,
                        key: key.clone(),
                    });
                }
                first_seen_key.insert(key.as_str(), raw_index);
                SlotId::Keyed(key.clone())
            }
            None => SlotId::Indexed(concrete_index),
        };
        concrete_index += 1;

        let matched = prev_by_slot.get(&slot_id).filter(|prev_child| prev_child.kind == child.kind);

        let (instance_id, was_reused) = match matched {
            Some(prev_child) => {
                consumed.insert(&prev_child.slot_id, ());
                (prev_child.instance_id, true)
            }
            None => (allocator.alloc(), false),
        };

        if was_reused {
            reused.push(instance_id);
        } else {
            new.push(instance_id);
        }
        next_children.push(ReconciledChild { instance_id, slot_id, kind: child.kind.clone(), reused: was_reused });
    }

    let unmounted = prev
        .iter()
        .filter(|child| !consumed.contains_key(&child.slot_id))
        .map(|child| child.instance_id)
        .collect();

    log::trace!(
        "reconcile: parent {parent_id}: {} reused, {} new, {} unmounted",
        reused.len(),
        new.len(),
        unmounted.len()
    );
    Ok(ReconcileOutput { next_children, reused, new, unmounted })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec;

    #[derive(Clone, Debug, PartialEq, Eq)]
    enum Kind {
        A,
        B,
        Plain,
    }

    fn keyed(key: &str, kind: Kind) -> NextChildSlot<Kind> {
        Some(NextChild { key: Some(key.to_string()), kind })
    }

    fn unkeyed(kind: Kind) -> NextChildSlot<Kind> {
        Some(NextChild { key: None, kind })
    }

    #[test]
    fn keyed_reorder_with_mixed_unkeyed() {
        // Prev frame: [A("a"), plain, B("b")] mounted as ids 1, 2, 3.
        let prev = vec![
            PrevChild { instance_id: 1, slot_id: SlotId::Keyed("a".to_string()), kind: Kind::A },
            PrevChild { instance_id: 2, slot_id: SlotId::Indexed(1), kind: Kind::Plain },
            PrevChild { instance_id: 3, slot_id: SlotId::Keyed("b".to_string()), kind: Kind::B },
        ];
        // Next frame: [plain, B("b"), A("a")].
        let next = vec![unkeyed(Kind::Plain), keyed("b", Kind::B), keyed("a", Kind::A)];
        let mut allocator = InstanceIdAllocator::new();
        allocator.alloc(); // ids 1..3 already spent on the previous frame.
        allocator.alloc();
        allocator.alloc();

        let out = reconcile(99, &prev, &next, &mut allocator).unwrap();

        assert_eq!(out.reused, vec![3, 1]);
        assert_eq!(out.new, vec![4]);
        assert_eq!(out.unmounted, vec![2]);
    }

    #[test]
    fn kind_mismatch_at_matched_slot_forces_remount() {
        let prev = vec![PrevChild { instance_id: 1, slot_id: SlotId::Indexed(0), kind: Kind::A }];
        let next = vec![unkeyed(Kind::B)];
        let mut allocator = InstanceIdAllocator::new();
        allocator.alloc();

        let out = reconcile(1, &prev, &next, &mut allocator).unwrap();
        assert_eq!(out.new, vec![2]);
        assert_eq!(out.unmounted, vec![1]);
        assert!(out.reused.is_empty());
    }

    #[test]
    fn mid_list_hole_unmounts_without_consuming_an_index() {
        // Prev: two unkeyed children, ids 1 and 2, at indices 0 and 1.
        let prev = vec![
            PrevChild { instance_id: 1, slot_id: SlotId::Indexed(0), kind: Kind::Plain },
            PrevChild { instance_id: 2, slot_id: SlotId::Indexed(1), kind: Kind::Plain },
        ];
        // Next: [child, hole, child] — the hole removes whatever would have
        // sat at its raw position without reserving index 1 for the next
        // concrete sibling, so the trailing child lands at index 1.
        let next: Vec<NextChildSlot<Kind>> = vec![unkeyed(Kind::Plain), None, unkeyed(Kind::Plain)];
        let mut allocator = InstanceIdAllocator::new();
        allocator.alloc();
        allocator.alloc();

        let out = reconcile(1, &prev, &next, &mut allocator).unwrap();

        assert_eq!(out.reused, vec![1, 2]);
        assert!(out.new.is_empty());
        assert!(out.unmounted.is_empty());
    }

    #[test]
    fn duplicate_key_is_fatal_and_names_both_indices() {
        let prev: Vec<PrevChild<Kind>> = vec![];
        let next = vec![keyed("x", Kind::A), keyed("x", Kind::B)];
        let mut allocator = InstanceIdAllocator::new();

        let err = reconcile(7, &prev, &next, &mut allocator).unwrap_err();
        assert_eq!(
            err,
            ReconcileError::DuplicateKey {
                parent_id: 7,
                child_count: 2,
                first_index: 0,
                second_index: 1,
                key: "x".to_string(),
            }
        );
    }

    #[test]
    fn unmatched_next_children_allocate_fresh_instance_ids() {
        let prev: Vec<PrevChild<Kind>> = vec![];
        let next = vec![unkeyed(Kind::A), unkeyed(Kind::B)];
        let mut allocator = InstanceIdAllocator::new();

        let out = reconcile(1, &prev, &next, &mut allocator).unwrap();
        assert_eq!(out.new, vec![1, 2]);
        assert!(out.reused.is_empty());
        assert!(out.unmounted.is_empty());
    }
}
