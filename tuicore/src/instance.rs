// Copyright 2025 the tuicore Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The instance tree: recursive reconciliation of a [`VNode`] tree against
//! the previously committed one, producing stable
//! [`tuicore_reconciler::InstanceId`]s and, in the same pass, a
//! [`tuicore_layout::LayoutNode`] tree correlated by those same ids.

use hashbrown::HashMap;

use tuicore_layout::LayoutNode;
use tuicore_reconciler::{
    reconcile, InstanceId, InstanceIdAllocator, NextChild, NextChildSlot, PrevChild, SlotId,
};

use crate::error::EngineError;
use crate::vnode::{Kind, PropValue, VNode};

/// Sentinel parent id for a torn-down root: `0` is reserved by
/// [`InstanceIdAllocator`] and never handed out to a real instance.
const NO_PARENT: InstanceId = 0;

fn exit_duration_ms(vnode: &VNode) -> Option<u32> {
    match vnode.props.get("exit_duration_ms") {
        Some(PropValue::Int(ms)) => u32::try_from(*ms).ok(),
        _ => None,
    }
}

/// One committed instance: its kind (for next frame's kind-match check),
/// the slot id it currently occupies under its parent, and its committed
/// children in document order.
#[derive(Clone, Debug)]
pub struct CommittedNode {
    /// The VNode kind this instance was last rendered as.
    pub kind: Kind,
    /// This instance's parent; [`NO_PARENT`] for the root.
    pub parent_id: InstanceId,
    /// Slot id this instance currently occupies under its parent.
    pub slot_id: SlotId,
    /// Committed children, in document order.
    pub children: Vec<InstanceId>,
    /// `exitTransition` duration in milliseconds, if this node's props
    /// declared one (`"exit_duration_ms"`); `None` means an
    /// unmount of this instance finalizes its local state immediately.
    pub exit_duration_ms: Option<u32>,
    /// Focus zone metadata, present only when [`VNode::is_focus_zone`] held
    /// for this instance's last render.
    pub zone: Option<ZoneMeta>,
    /// Whether this instance is independently focusable.
    pub focusable: bool,
}

/// A committed instance's focus-zone declaration, mirroring
/// [`tuicore_focus::ZoneDecl`] minus the fields ([`focusable_ids`],
/// [`parent_zone_id`]) that require a whole-tree walk to resolve.
#[derive(Clone, Copy, Debug)]
pub struct ZoneMeta {
    /// See [`tuicore_focus::Zone::tab_index`].
    pub tab_index: i32,
    /// See [`tuicore_focus::Zone::navigation`].
    pub navigation: tuicore_focus::NavigationMode,
    /// See [`tuicore_focus::Zone::wrap_around`].
    pub wrap_around: bool,
    /// Whether this zone additionally traps focus.
    pub is_trap: bool,
}

/// One torn-down instance, with enough of its last-committed metadata for
/// the orchestrator to decide whether it plays an exit transition before
/// its local state is finally released.
#[derive(Clone, Debug)]
pub struct UnmountedInstance {
    /// The unmounted instance.
    pub id: InstanceId,
    /// Its parent at the time of unmount; `0` for a torn-down root (`0` is
    /// reserved and never handed out to a real instance).
    pub parent_id: InstanceId,
    /// The slot id it last occupied, carrying its key if any.
    pub slot_id: SlotId,
    /// See [`CommittedNode::exit_duration_ms`].
    pub exit_duration_ms: Option<u32>,
}

/// The outcome of one [`InstanceTree::commit`] call: which ids were
/// mounted fresh and which were torn down, across the whole tree (not just
/// one reconcile level), in the order encountered during the pre-order
/// commit walk.
#[derive(Default, Clone, Debug)]
pub struct CommitSummary {
    /// Instance ids newly allocated this commit.
    pub new: Vec<InstanceId>,
    /// Instances torn down this commit (whole subtrees, deepest-first
    /// within each subtree).
    pub unmounted: Vec<UnmountedInstance>,
}

/// The committed instance tree for one running engine.
#[derive(Default)]
pub struct InstanceTree {
    allocator: InstanceIdAllocator,
    nodes: HashMap<InstanceId, CommittedNode>,
    root: Option<InstanceId>,
}

/// Sentinel slot id for the tree root, which has no parent to assign it a
/// slot; never compared against any real sibling's slot id.
fn root_slot() -> SlotId {
    SlotId::Indexed(0)
}

impl InstanceTree {
    /// Construct an empty tree (no instances mounted).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The root instance id, once at least one commit has happened.
    #[must_use]
    pub fn root(&self) -> Option<InstanceId> {
        self.root
    }

    /// Look up a committed instance's metadata.
    #[must_use]
    pub fn node(&self, id: InstanceId) -> Option<&CommittedNode> {
        self.nodes.get(&id)
    }

    /// Reconcile the whole tree against `next_root`, recursively.
    ///
    /// Returns the new root instance id, a [`LayoutNode`] tree built in the
    /// same walk (correlated by instance id), and a [`CommitSummary`].
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::DuplicateKey`] on the first duplicate key
    /// found in any reconcile level, pre-order. The caller must not use a
    /// partial result: on error, `self` is left exactly as it was before
    /// this call (no partial mutation survives a fatal reconcile).
    pub fn commit(&mut self, next_root: &VNode) -> Result<(InstanceId, LayoutNode, CommitSummary), EngineError> {
        let mut staged = self.clone_shallow();
        let mut summary = CommitSummary::default();

        let prev_root = staged.root;
        let kind_matches = prev_root.is_some_and(|pid| staged.nodes.get(&pid).is_some_and(|n| n.kind == next_root.kind));
        let (root_id, fresh) = if kind_matches {
            (prev_root.expect("kind_matches implies prev_root is Some"), false)
        } else {
            if let Some(pid) = prev_root {
                staged.unmount_subtree(pid, NO_PARENT, &mut summary);
            }
            let id = staged.allocator.alloc();
            summary.new.push(id);
            (id, true)
        };

        let layout_node = staged.reconcile_node(root_id, fresh, next_root, root_slot(), NO_PARENT, &mut summary)?;
        staged.root = Some(root_id);
        *self = staged;
        Ok((root_id, layout_node, summary))
    }

    /// A shallow clone used to stage a commit: on a fatal reconcile error,
    /// the staged copy is simply dropped and `self` is untouched, giving
    /// the "no partial commit" guarantee without needing a
    /// hand-rolled undo log.
    fn clone_shallow(&self) -> Self {
        Self { allocator: self.allocator.clone(), nodes: self.nodes.clone(), root: self.root }
    }

    /// Reconcile `vnode`'s children and rebuild its own committed entry.
    /// `id` and `fresh` are decided by the caller: either by the
    /// parent-level [`reconcile`] call (which already allocated an id for a
    /// brand-new slot) or, for the root, by [`Self::commit`] itself.
    fn reconcile_node(
        &mut self,
        id: InstanceId,
        fresh: bool,
        vnode: &VNode,
        slot_id: SlotId,
        parent_id: InstanceId,
        summary: &mut CommitSummary,
    ) -> Result<LayoutNode, EngineError> {
        let prev_children: Vec<PrevChild<Kind>> = if fresh {
            Vec::new()
        } else {
            self.nodes[&id]
                .children
                .iter()
                .map(|&cid| {
                    let n = &self.nodes[&cid];
                    PrevChild { instance_id: cid, slot_id: n.slot_id.clone(), kind: n.kind.clone() }
                })
                .collect()
        };

        let next_slots: Vec<NextChildSlot<Kind>> = vnode
            .children
            .iter()
            .map(|c| c.as_ref().map(|child| NextChild { key: child.key.clone(), kind: child.kind.clone() }))
            .collect();

        let output = reconcile(id, &prev_children, &next_slots, &mut self.allocator)?;

        for &unmounted_id in &output.unmounted {
            self.unmount_subtree(unmounted_id, id, summary);
        }
        for &new_id in &output.new {
            summary.new.push(new_id);
        }

        let mut child_vnodes = vnode.children.iter().filter_map(|c| c.as_ref());
        let mut child_instance_ids = Vec::with_capacity(output.next_children.len());
        let mut child_layout_nodes = Vec::with_capacity(output.next_children.len());

        for reconciled in &output.next_children {
            let child_vnode = child_vnodes.next().expect("reconcile output arity matches concrete children");
            let child_layout = self.reconcile_node(
                reconciled.instance_id,
                !reconciled.reused,
                child_vnode,
                reconciled.slot_id.clone(),
                id,
                summary,
            )?;
            child_instance_ids.push(reconciled.instance_id);
            child_layout_nodes.push(child_layout);
        }

        let zone = vnode.is_focus_zone().then(|| ZoneMeta {
            tab_index: vnode.tab_index(),
            navigation: match vnode.nav_columns() {
                Some(columns) => tuicore_focus::NavigationMode::Grid { columns },
                None => tuicore_focus::NavigationMode::Linear,
            },
            wrap_around: vnode.wrap_around(),
            is_trap: vnode.is_focus_trap(),
        });

        self.nodes.insert(
            id,
            CommittedNode {
                kind: vnode.kind.clone(),
                parent_id,
                slot_id,
                children: child_instance_ids,
                exit_duration_ms: exit_duration_ms(vnode),
                zone,
                focusable: vnode.is_focusable(),
            },
        );

        Ok(build_layout_node(id, vnode, child_layout_nodes))
    }

    /// Walk the committed tree from the root and build the zone
    /// declarations [`tuicore_focus::FocusState::finalize`] expects:
    /// `focusable_ids` in commit order, scoped to the nearest enclosing
    /// zone, and `parent_zone_id` linking each zone to its own nearest
    /// enclosing zone.
    #[must_use]
    pub fn zone_decls(&self) -> Vec<tuicore_focus::ZoneDecl<InstanceId>> {
        let mut decls: HashMap<InstanceId, tuicore_focus::ZoneDecl<InstanceId>> = HashMap::new();
        let mut order = Vec::new();
        if let Some(root) = self.root {
            self.walk_zones(root, None, &mut decls, &mut order);
        }
        order.into_iter().filter_map(|id| decls.remove(&id)).collect()
    }

    /// Every instance id currently committed, in arbitrary order. Used by
    /// the orchestrator to search for a reappearing key's exit-tracker
    /// lineage without the instance tree needing to expose its internal
    /// storage.
    #[must_use]
    pub fn all_ids(&self) -> Vec<InstanceId> {
        self.nodes.keys().copied().collect()
    }

    /// Instances whose kind is always a trap, in commit order;
    /// used to auto-activate a trap the first frame it mounts.
    #[must_use]
    pub fn newly_mounted_traps<'a>(&self, new_ids: impl IntoIterator<Item = &'a InstanceId>) -> Vec<InstanceId> {
        new_ids
            .into_iter()
            .copied()
            .filter(|id| self.nodes.get(id).is_some_and(|n| n.zone.is_some_and(|z| z.is_trap)))
            .collect()
    }

    fn walk_zones(
        &self,
        id: InstanceId,
        enclosing_zone: Option<InstanceId>,
        decls: &mut HashMap<InstanceId, tuicore_focus::ZoneDecl<InstanceId>>,
        order: &mut Vec<InstanceId>,
    ) {
        let Some(node) = self.nodes.get(&id) else { return };

        let this_zone = if let Some(zone) = node.zone {
            decls.insert(
                id,
                tuicore_focus::ZoneDecl {
                    id,
                    tab_index: zone.tab_index,
                    navigation: zone.navigation,
                    wrap_around: zone.wrap_around,
                    focusable_ids: Vec::new(),
                    parent_zone_id: enclosing_zone,
                },
            );
            order.push(id);
            Some(id)
        } else {
            enclosing_zone
        };

        if node.focusable {
            if let Some(zone_id) = this_zone {
                if let Some(decl) = decls.get_mut(&zone_id) {
                    decl.focusable_ids.push(id);
                }
            }
        }

        for &child in &node.children {
            self.walk_zones(child, this_zone, decls, order);
        }
    }

    fn unmount_subtree(&mut self, id: InstanceId, parent_id: InstanceId, summary: &mut CommitSummary) {
        if let Some(node) = self.nodes.remove(&id) {
            for child in node.children {
                self.unmount_subtree(child, id, summary);
            }
            log::warn!("reconcile: instance {id} torn down");
            summary.unmounted.push(UnmountedInstance {
                id,
                parent_id,
                slot_id: node.slot_id,
                exit_duration_ms: node.exit_duration_ms,
            });
        }
    }
}

fn build_layout_node(id: InstanceId, vnode: &VNode, children: Vec<LayoutNode>) -> LayoutNode {
    if children.is_empty() {
        let (w, h) = vnode.intrinsic_size;
        return LayoutNode::leaf(id, vnode.layout.clone(), w, h);
    }
    match vnode.kind {
        Kind::Grid => {
            let (columns, rows) = vnode.grid_tracks.clone().unwrap_or_default();
            LayoutNode::grid(id, vnode.layout.clone(), columns, rows, children)
        }
        Kind::Column => LayoutNode::stack(id, vnode.layout.clone(), tuicore_layout::MainAxis::Column, children),
        _ => LayoutNode::stack(id, vnode.layout.clone(), tuicore_layout::MainAxis::Row, children),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tuicore_layout::LayoutProps;

    fn text(key: Option<&str>) -> VNode {
        let mut n = VNode::leaf(Kind::Text, LayoutProps::default());
        if let Some(k) = key {
            n = n.keyed(k);
        }
        n
    }

    #[test]
    fn first_commit_mounts_every_node_fresh() {
        let mut tree = InstanceTree::new();
        let root = VNode::with_children(
            Kind::Row,
            LayoutProps::default(),
            vec![Some(text(Some("a"))), Some(text(Some("b")))],
        );
        let (root_id, layout, summary) = tree.commit(&root).unwrap();
        assert_eq!(root_id, 1);
        assert_eq!(summary.new, vec![1, 2, 3]);
        assert!(summary.unmounted.is_empty());
        assert_eq!(layout.children.len(), 2);
    }

    #[test]
    fn second_commit_with_same_keys_reuses_every_id() {
        let mut tree = InstanceTree::new();
        let root = VNode::with_children(
            Kind::Row,
            LayoutProps::default(),
            vec![Some(text(Some("a"))), Some(text(Some("b")))],
        );
        tree.commit(&root).unwrap();

        let next = VNode::with_children(
            Kind::Row,
            LayoutProps::default(),
            vec![Some(text(Some("a"))), Some(text(Some("b")))],
        );
        let (root_id, _layout, summary) = tree.commit(&next).unwrap();
        assert_eq!(root_id, 1);
        assert!(summary.new.is_empty());
        assert!(summary.unmounted.is_empty());
    }

    #[test]
    fn removing_a_keyed_child_unmounts_its_subtree() {
        let mut tree = InstanceTree::new();
        let root = VNode::with_children(
            Kind::Row,
            LayoutProps::default(),
            vec![Some(text(Some("a"))), Some(text(Some("b")))],
        );
        tree.commit(&root).unwrap();

        let next = VNode::with_children(Kind::Row, LayoutProps::default(), vec![Some(text(Some("a")))]);
        let (_root_id, _layout, summary) = tree.commit(&next).unwrap();
        assert_eq!(summary.unmounted.iter().map(|u| u.id).collect::<Vec<_>>(), vec![3]);
        assert!(summary.new.is_empty());
    }

    #[test]
    fn duplicate_key_leaves_tree_untouched() {
        let mut tree = InstanceTree::new();
        let root = VNode::with_children(Kind::Row, LayoutProps::default(), vec![Some(text(Some("a")))]);
        tree.commit(&root).unwrap();

        let dup = VNode::with_children(
            Kind::Row,
            LayoutProps::default(),
            vec![Some(text(Some("x"))), Some(text(Some("x")))],
        );
        let err = tree.commit(&dup).unwrap_err();
        assert!(matches!(err, EngineError::DuplicateKey { .. }));
        // The previous commit's tree must still be intact.
        assert_eq!(tree.root(), Some(1));
        assert_eq!(tree.node(1).unwrap().children.len(), 1);
    }

    #[test]
    fn kind_change_at_same_key_remounts_with_a_fresh_id() {
        let mut tree = InstanceTree::new();
        let root = VNode::with_children(Kind::Row, LayoutProps::default(), vec![Some(text(Some("a")))]);
        tree.commit(&root).unwrap();

        let changed = VNode::with_children(
            Kind::Row,
            LayoutProps::default(),
            vec![Some(VNode::leaf(Kind::Box, LayoutProps::default()).keyed("a"))],
        );
        let (_root_id, _layout, summary) = tree.commit(&changed).unwrap();
        assert_eq!(summary.unmounted.iter().map(|u| u.id).collect::<Vec<_>>(), vec![2]);
        assert_eq!(summary.new, vec![3]);
    }
}
