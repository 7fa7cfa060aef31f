// Copyright 2025 the tuicore Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! tuicore_drawlist: the binary frame codec for a terminal UI runtime.
//!
//! A drawlist is a 64-byte header ([`header::Header`]) followed by a
//! 4-byte-aligned command stream and two interned resource sections
//! (strings, blobs). [`build::Builder`] exposes one method per opcode plus
//! string/blob interning, and [`build::Builder::build`] emits the aligned
//! buffer; [`decode::decode_commands`] and [`decode::decode_spans`] read one
//! back. All multi-byte integers are little-endian; unknown opcodes decode
//! without error so older consumers survive newer producers.
//!
//! This crate is `no_std` and uses `alloc`; it has no opinion on what a
//! payload's coordinates or colors *mean* — that is the renderer's concern.

#![no_std]

extern crate alloc;

pub mod build;
pub mod decode;
pub mod error;
pub mod header;
pub mod opcode;

pub use build::Builder;
pub use decode::{decode_commands, decode_spans, DecodedCommand, ResourceMirror, Span};
pub use error::DecodeError;
pub use header::{Header, HEADER_SIZE, MAGIC, VERSION};
pub use opcode::Opcode;
