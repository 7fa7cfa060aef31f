// Copyright 2025 the tuicore Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Decoding a drawlist buffer back into commands and resources.

use alloc::collections::BTreeSet;
use alloc::vec::Vec;

use crate::error::DecodeError;
use crate::header::{align4, get_u16, get_u32, Header};
use crate::opcode::Opcode;

/// One decoded command, borrowing its payload from the source buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodedCommand<'a> {
    /// The command's operation.
    pub opcode: Opcode,
    /// Opaque per-command flags; opcode-defined.
    pub flags: u16,
    /// Byte offset of this command's 8-byte header within the buffer.
    pub offset: u32,
    /// The payload bytes, excluding the 8-byte command header.
    pub payload: &'a [u8],
}

/// Decode the command stream of a drawlist buffer whose header has already
/// been parsed.
///
/// Unknown opcodes decode successfully (callers skip what they don't
/// recognize); only structural corruption — truncation, a bad size field —
/// is an error.
pub fn decode_commands<'a>(bytes: &'a [u8], header: &Header) -> Result<Vec<DecodedCommand<'a>>, DecodeError> {
    let start = header.cmd_offset as usize;
    let end = start + header.cmd_bytes as usize;
    let stream = bytes.get(start..end).ok_or(DecodeError::CommandOverrun { offset: header.cmd_offset })?;

    let mut commands = Vec::with_capacity(header.cmd_count as usize);
    let mut pos = 0usize;
    while pos < stream.len() {
        if pos + 8 > stream.len() {
            return Err(DecodeError::CommandOverrun { offset: header.cmd_offset + pos as u32 });
        }
        let opcode = Opcode::from_raw(get_u16(stream, pos));
        let flags = get_u16(stream, pos + 2);
        let size = get_u32(stream, pos + 4);
        if size < 8 || size % 4 != 0 {
            return Err(DecodeError::BadCommandSize { offset: header.cmd_offset + pos as u32, size });
        }
        let payload_len = (size - 8) as usize;
        let payload_start = pos + 8;
        let payload_end = payload_start + payload_len;
        let payload = stream
            .get(payload_start..payload_end)
            .ok_or(DecodeError::CommandOverrun { offset: header.cmd_offset + pos as u32 })?;
        commands.push(DecodedCommand { opcode, flags, offset: header.cmd_offset + pos as u32, payload });
        pos = payload_end;
    }
    Ok(commands)
}

/// One `(offset, len)` span into a resource's raw-bytes section.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Span {
    /// Byte offset into the section's raw-bytes blob.
    pub offset: u32,
    /// Unpadded length of the resource.
    pub len: u32,
}

/// Decode a resource span table (string or blob) and hand back each entry's
/// slice into the raw-bytes blob, in ascending-id order.
pub fn decode_spans<'a>(
    bytes: &'a [u8],
    span_offset: u32,
    count: u32,
    raw_offset: u32,
    raw_len: u32,
) -> Result<Vec<&'a [u8]>, DecodeError> {
    let raw = bytes
        .get(raw_offset as usize..(raw_offset + raw_len) as usize)
        .ok_or(DecodeError::ResourceOverrun { offset: raw_offset })?;
    let mut out = Vec::with_capacity(count as usize);
    for i in 0..count {
        let at = span_offset as usize + (i * 8) as usize;
        let span_bytes = bytes.get(at..at + 8).ok_or(DecodeError::ResourceOverrun { offset: at as u32 })?;
        let offset = get_u32(span_bytes, 0);
        let len = get_u32(span_bytes, 4);
        let slice = raw
            .get(offset as usize..(offset + len) as usize)
            .ok_or(DecodeError::ResourceOverrun { offset: span_offset + i * 8 })?;
        out.push(slice);
        debug_assert_eq!(align4(len) % 4, 0);
    }
    Ok(out)
}

/// Mirrors a builder's resource id set so a consumer can map a `DEF_STRING`
/// or `DEF_BLOB` command's persistent id to a position in that frame's span
/// table, which (per the wire format) carries no id of its own — span table
/// position `i` always corresponds to the `i`-th smallest currently-live id.
#[derive(Default, Debug, Clone)]
pub struct ResourceMirror {
    live: BTreeSet<u32>,
}

impl ResourceMirror {
    /// An empty mirror, matching a builder with no interned resources.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one frame's `DEF_*`/`FREE_*` commands for this resource kind,
    /// in order. `def_opcode`/`free_opcode` select which commands apply.
    pub fn apply<'a>(&mut self, commands: &[DecodedCommand<'a>], def_opcode: Opcode, free_opcode: Opcode) {
        for cmd in commands {
            if cmd.opcode == def_opcode && cmd.payload.len() >= 4 {
                self.live.insert(get_u32(cmd.payload, 0));
            } else if cmd.opcode == free_opcode && cmd.payload.len() >= 4 {
                self.live.remove(&get_u32(cmd.payload, 0));
            }
        }
    }

    /// The span-table position `id` occupies after the mutations applied so
    /// far, or `None` if it is not currently live.
    #[must_use]
    pub fn position_of(&self, id: u32) -> Option<usize> {
        if !self.live.contains(&id) {
            return None;
        }
        Some(self.live.range(..id).count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::Builder;
    use alloc::vec;

    #[test]
    fn decode_rejects_truncated_command() {
        let header = Header { cmd_offset: 64, cmd_bytes: 4, ..Header::default() };
        let bytes = vec![0u8; 68];
        assert!(decode_commands(&bytes, &header).is_err());
    }

    #[test]
    fn mirror_tracks_def_and_free_across_frames() {
        let mut builder = Builder::new();
        let a = builder.intern_string(b"a");
        let first = builder.build();
        let first_header = Header::read_from(&first).unwrap();
        let first_cmds = decode_commands(&first, &first_header).unwrap();

        let mut mirror = ResourceMirror::new();
        mirror.apply(&first_cmds, Opcode::DefString, Opcode::FreeString);
        assert_eq!(mirror.position_of(a), Some(0));

        builder.free_string(a);
        let second = builder.build();
        let second_header = Header::read_from(&second).unwrap();
        let second_cmds = decode_commands(&second, &second_header).unwrap();
        mirror.apply(&second_cmds, Opcode::DefString, Opcode::FreeString);
        assert_eq!(mirror.position_of(a), None);
    }

    #[test]
    fn span_table_resolves_to_exact_interned_bytes() {
        let mut builder = Builder::new();
        builder.intern_string(b"hello");
        let bytes = builder.build();
        let header = Header::read_from(&bytes).unwrap();
        let spans = decode_spans(
            &bytes,
            header.strings_span_offset,
            header.strings_count,
            header.strings_bytes_offset,
            header.strings_bytes_len,
        )
        .unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0], b"hello");
    }
}
