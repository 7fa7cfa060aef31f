// Copyright 2025 the tuicore Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drawlist decode errors.

/// Why a byte buffer failed to decode as a drawlist.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecodeError {
    /// Buffer shorter than the 64-byte header.
    Truncated,
    /// Header magic did not spell `"ZRDL"`.
    BadMagic,
    /// A command's declared size ran past the end of the command stream.
    CommandOverrun {
        /// Byte offset of the malformed command header.
        offset: u32,
    },
    /// A command declared a size less than 8 bytes or not 4-aligned.
    BadCommandSize {
        /// Byte offset of the malformed command header.
        offset: u32,
        /// The offending size field.
        size: u32,
    },
    /// A resource span pointed outside its raw-bytes section.
    ResourceOverrun {
        /// Byte offset of the malformed span entry.
        offset: u32,
    },
}

impl core::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DecodeError::Truncated => write!(f, "drawlist buffer shorter than the header"),
            DecodeError::BadMagic => write!(f, "drawlist magic mismatch"),
            DecodeError::CommandOverrun { offset } => {
                write!(f, "command at offset {offset} runs past the end of the command stream")
            }
            DecodeError::BadCommandSize { offset, size } => {
                write!(f, "command at offset {offset} has invalid size {size} (must be >= 8 and 4-aligned)")
            }
            DecodeError::ResourceOverrun { offset } => {
                write!(f, "resource span at offset {offset} points outside its raw-bytes section")
            }
        }
    }
}
