// Copyright 2025 the tuicore Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fatal reconciliation errors.

use alloc::string::String;

use crate::id::InstanceId;

/// A fatal condition found while reconciling one instance's children.
///
/// Both variants abort the frame: the caller must not commit a partial
/// child list, since the remaining siblings' slot assignments are only
/// meaningful once duplicate/invalid entries are ruled out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReconcileError {
    /// Two children in the same next list carried the same key.
    DuplicateKey {
        /// The instance whose children were being reconciled.
        parent_id: InstanceId,
        /// Total number of children in the next list (including holes).
        child_count: usize,
        /// Position of the key's first occurrence.
        first_index: usize,
        /// Position of the colliding occurrence.
        second_index: usize,
        /// The key both children carried.
        key: String,
    },
    /// A child supplied props its kind cannot accept.
    InvalidProps {
        /// The instance whose children were being reconciled.
        parent_id: InstanceId,
        /// Position of the offending child in the next list.
        index: usize,
        /// Human-readable detail describing what was wrong.
        detail: String,
    },
}

impl core::fmt::Display for ReconcileError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ReconcileError::DuplicateKey { parent_id, child_count, first_index, second_index, key } => write!(
                f,
                "DUPLICATE_KEY: parent instance {parent_id} has {child_count} children; \
                 key {key:?} used at both index {first_index} and index {second_index}"
            ),
            ReconcileError::InvalidProps { parent_id, index, detail } => {
                write!(f, "INVALID_PROPS: parent instance {parent_id}, child index {index}: {detail}")
            }
        }
    }
}
