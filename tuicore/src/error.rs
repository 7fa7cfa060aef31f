// Copyright 2025 the tuicore Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The engine-wide error taxonomy.
//!
//! Every variant is fatal for the frame in which it occurs: the orchestrator
//! aborts the turn before any side effect (no partial drawlist, no partial
//! commit) and surfaces the error to whichever public API call triggered it.

use std::string::String;

use thiserror::Error;

/// Stable, matchable discriminant for an [`EngineError`], so application
/// code can branch on kind without string-parsing [`EngineError::message`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Two siblings shared a key during reconciliation.
    DuplicateKey,
    /// A node's props failed validation.
    InvalidProps,
    /// A state-mutating API was invoked from within the view function.
    UpdateDuringRender,
    /// A public API was invoked while the engine was committing.
    ReentrantCall,
    /// Engine pin mismatch, or a requested backend feature is unavailable.
    Unsupported,
    /// Backend initialization failed (no TTY, etc.).
    Platform,
}

/// A fatal engine error, one variant per error code, each carrying a
/// deterministic detail string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    /// Two siblings of `parent_id` shared a key during reconciliation.
    #[error(
        "DUPLICATE_KEY: parent instance {parent_id} has {child_count} children; \
         key {key:?} used at both index {first_index} and index {second_index}"
    )]
    DuplicateKey {
        /// Instance id of the parent whose children were being reconciled.
        parent_id: u64,
        /// Number of children in the offending next list.
        child_count: usize,
        /// Index of the key's first occurrence.
        first_index: usize,
        /// Index of the colliding occurrence.
        second_index: usize,
        /// The key both children carried.
        key: String,
    },
    /// A node's props failed validation, or an unknown VNode kind was used.
    #[error("INVALID_PROPS: {detail}")]
    InvalidProps {
        /// Human-readable, deterministic detail string.
        detail: String,
    },
    /// `update`/`setTheme` (or an equivalent state mutation) was called
    /// synchronously from within the view function.
    #[error("UPDATE_DURING_RENDER: state mutation attempted while rendering")]
    UpdateDuringRender,
    /// A public API was invoked re-entrantly while a commit was in progress.
    #[error("REENTRANT_CALL: public API invoked during commit")]
    ReentrantCall,
    /// The requested backend capability is unavailable, or an engine ABI
    /// pin does not match.
    #[error("UNSUPPORTED: {detail}")]
    Unsupported {
        /// Human-readable detail naming the unsupported feature.
        detail: String,
    },
    /// Backend initialization failed.
    #[error("PLATFORM: {detail}")]
    Platform {
        /// Human-readable detail from the backend.
        detail: String,
    },
}

impl EngineError {
    /// The stable discriminant for this error, for callers that want to
    /// match on kind rather than parse [`Self::to_string`].
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::DuplicateKey { .. } => ErrorCode::DuplicateKey,
            Self::InvalidProps { .. } => ErrorCode::InvalidProps,
            Self::UpdateDuringRender => ErrorCode::UpdateDuringRender,
            Self::ReentrantCall => ErrorCode::ReentrantCall,
            Self::Unsupported { .. } => ErrorCode::Unsupported,
            Self::Platform { .. } => ErrorCode::Platform,
        }
    }
}

impl From<tuicore_reconciler::ReconcileError> for EngineError {
    fn from(err: tuicore_reconciler::ReconcileError) -> Self {
        match err {
            tuicore_reconciler::ReconcileError::DuplicateKey {
                parent_id,
                child_count,
                first_index,
                second_index,
                key,
            } => Self::DuplicateKey { parent_id, child_count, first_index, second_index, key },
            tuicore_reconciler::ReconcileError::InvalidProps { parent_id, index, detail } => {
                Self::InvalidProps { detail: format!("parent instance {parent_id}, child index {index}: {detail}") }
            }
        }
    }
}

impl From<tuicore_layout::LayoutError> for EngineError {
    fn from(err: tuicore_layout::LayoutError) -> Self {
        Self::InvalidProps { detail: format!("{err}") }
    }
}
