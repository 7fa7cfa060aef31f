// Copyright 2025 the tuicore Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! tuicore_reconciler: instance identity and child-list diffing for a
//! terminal UI runtime.
//!
//! Every mounted node gets a monotonically increasing [`id::InstanceId`]
//! that is never reused for the life of the engine. Each frame,
//! [`reconcile::reconcile`] diffs a parent's previously committed children
//! against a newly requested list and decides, per child, whether to reuse
//! a previous instance or mount a fresh one — matching keyed children by
//! their author-supplied key and unkeyed children by position, and forcing
//! a remount whenever a matched slot's kind has changed.
//!
//! This crate is `no_std` and uses `alloc`; it knows nothing about the
//! concrete set of node kinds a host defines; it is generic over `Kind:
//! PartialEq + Clone` and compares kinds structurally.

#![no_std]

extern crate alloc;

pub mod error;
pub mod id;
pub mod reconcile;
pub mod slot;

pub use error::ReconcileError;
pub use id::{InstanceId, InstanceIdAllocator};
pub use reconcile::{reconcile, NextChild, NextChildSlot, PrevChild, ReconcileOutput, ReconciledChild};
pub use slot::SlotId;
