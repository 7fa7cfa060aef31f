// Copyright 2025 the tuicore Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The drawlist builder.

use alloc::collections::BTreeMap;
use alloc::vec;
use alloc::vec::Vec;

use hashbrown::HashMap;

use crate::header::{align4, put_u16, put_u32, Header, HEADER_SIZE};
use crate::opcode::Opcode;

/// An interning table for one resource kind (strings or blobs).
///
/// Ids are monotonic and never reused even after a free, so a stale id held
/// by a consumer can never silently come to mean a different resource.
/// Content-identical interns return the existing live id instead of
/// allocating a new one.
#[derive(Default, Debug)]
struct ResourceTable {
    next_id: u32,
    live: BTreeMap<u32, Vec<u8>>,
    by_content: HashMap<Vec<u8>, u32>,
}

impl ResourceTable {
    fn intern(&mut self, bytes: &[u8]) -> (u32, bool) {
        if let Some(&id) = self.by_content.get(bytes) {
            return (id, false);
        }
        let id = self.next_id;
        self.next_id += 1;
        self.live.insert(id, bytes.to_vec());
        self.by_content.insert(bytes.to_vec(), id);
        (id, true)
    }

    fn free(&mut self, id: u32) -> bool {
        match self.live.remove(&id) {
            Some(bytes) => {
                self.by_content.remove(&bytes);
                true
            }
            None => false,
        }
    }
}

/// Builds drawlist byte buffers.
///
/// A `Builder` owns the live string and blob interning tables across
/// frames — ids stay valid until [`free_string`](Self::free_string) or
/// [`free_blob`](Self::free_blob) releases them — but the command stream is
/// per-frame: [`build`](Self::build) drains it.
#[derive(Default, Debug)]
pub struct Builder {
    commands: Vec<u8>,
    cmd_count: u32,
    strings: ResourceTable,
    blobs: ResourceTable,
}

impl Builder {
    /// Construct an empty builder with no interned resources.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn push_command(&mut self, opcode: Opcode, flags: u16, payload: &[u8]) {
        debug_assert_eq!(payload.len() % 4, 0, "command payload must be 4-aligned");
        let size = 8 + payload.len() as u32;
        let mut header = [0u8; 8];
        put_u16(&mut header, 0, opcode.to_raw());
        put_u16(&mut header, 2, flags);
        put_u32(&mut header, 4, size);
        self.commands.extend_from_slice(&header);
        self.commands.extend_from_slice(payload);
        self.cmd_count += 1;
    }

    /// Fill the current clip region with `color`.
    pub fn clear(&mut self, color: u32) {
        let mut payload = [0u8; 4];
        put_u32(&mut payload, 0, color);
        self.push_command(Opcode::Clear, 0, &payload);
    }

    /// Fill an axis-aligned rectangle with `color`.
    pub fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: u32) {
        let mut payload = [0u8; 20];
        put_i32_slice(&mut payload, 0, x);
        put_i32_slice(&mut payload, 4, y);
        put_u32(&mut payload, 8, w);
        put_u32(&mut payload, 12, h);
        put_u32(&mut payload, 16, color);
        self.push_command(Opcode::FillRect, 0, &payload);
    }

    /// Draw `byte_len` bytes of the interned string `string_id`, starting at
    /// `byte_off`, with its top-left cell at `(x, y)`.
    pub fn draw_text(&mut self, x: i32, y: i32, string_id: u32, byte_off: u32, byte_len: u32) {
        let mut payload = [0u8; 20];
        put_i32_slice(&mut payload, 0, x);
        put_i32_slice(&mut payload, 4, y);
        put_u32(&mut payload, 8, string_id);
        put_u32(&mut payload, 12, byte_off);
        put_u32(&mut payload, 16, byte_len);
        self.push_command(Opcode::DrawText, 0, &payload);
    }

    /// Push a clip rectangle, intersected with the current one, onto the
    /// clip stack.
    pub fn push_clip(&mut self, x: i32, y: i32, w: u32, h: u32) {
        let mut payload = [0u8; 16];
        put_i32_slice(&mut payload, 0, x);
        put_i32_slice(&mut payload, 4, y);
        put_u32(&mut payload, 8, w);
        put_u32(&mut payload, 12, h);
        self.push_command(Opcode::PushClip, 0, &payload);
    }

    /// Pop the most recently pushed clip rectangle.
    pub fn pop_clip(&mut self) {
        self.push_command(Opcode::PopClip, 0, &[]);
    }

    /// Draw a pre-shaped run of styled glyphs from the interned blob
    /// `blob_id`, with its top-left cell at `(x, y)`.
    pub fn draw_text_run(&mut self, x: i32, y: i32, blob_id: u32) {
        let mut payload = [0u8; 12];
        put_i32_slice(&mut payload, 0, x);
        put_i32_slice(&mut payload, 4, y);
        put_u32(&mut payload, 8, blob_id);
        self.push_command(Opcode::DrawTextRun, 0, &payload);
    }

    /// Set the cursor cell position and visibility.
    pub fn set_cursor(&mut self, x: i32, y: i32, visible: bool) {
        let mut payload = [0u8; 12];
        put_i32_slice(&mut payload, 0, x);
        put_i32_slice(&mut payload, 4, y);
        put_u32(&mut payload, 8, u32::from(visible));
        self.push_command(Opcode::SetCursor, 0, &payload);
    }

    /// Draw the interned canvas blob `blob_id` into the `w`x`h` region
    /// whose top-left cell is `(x, y)`.
    pub fn draw_canvas(&mut self, x: i32, y: i32, w: u32, h: u32, blob_id: u32) {
        let mut payload = [0u8; 20];
        put_i32_slice(&mut payload, 0, x);
        put_i32_slice(&mut payload, 4, y);
        put_u32(&mut payload, 8, w);
        put_u32(&mut payload, 12, h);
        put_u32(&mut payload, 16, blob_id);
        self.push_command(Opcode::DrawCanvas, 0, &payload);
    }

    /// Draw the interned image blob `blob_id` into the `w`x`h` region whose
    /// top-left cell is `(x, y)`.
    pub fn draw_image(&mut self, x: i32, y: i32, w: u32, h: u32, blob_id: u32) {
        let mut payload = [0u8; 20];
        put_i32_slice(&mut payload, 0, x);
        put_i32_slice(&mut payload, 4, y);
        put_u32(&mut payload, 8, w);
        put_u32(&mut payload, 12, h);
        put_u32(&mut payload, 16, blob_id);
        self.push_command(Opcode::DrawImage, 0, &payload);
    }

    /// Copy a `w`x`h` rectangle of already-drawn cells from `(src_x, src_y)`
    /// to `(dst_x, dst_y)`.
    pub fn blit_rect(&mut self, src_x: i32, src_y: i32, dst_x: i32, dst_y: i32, w: u32, h: u32) {
        let mut payload = [0u8; 24];
        put_i32_slice(&mut payload, 0, src_x);
        put_i32_slice(&mut payload, 4, src_y);
        put_i32_slice(&mut payload, 8, dst_x);
        put_i32_slice(&mut payload, 12, dst_y);
        put_u32(&mut payload, 16, w);
        put_u32(&mut payload, 20, h);
        self.push_command(Opcode::BlitRect, 0, &payload);
    }

    /// Intern `bytes` as a string, returning a stable id valid until
    /// [`free_string`](Self::free_string) releases it. Interning
    /// content-identical bytes while the original is still live returns the
    /// same id and does not emit a new `DEF_STRING` command.
    pub fn intern_string(&mut self, bytes: &[u8]) -> u32 {
        let (id, is_new) = self.strings.intern(bytes);
        if is_new {
            log::trace!("drawlist: interned string {id} ({} bytes)", bytes.len());
            self.emit_def(Opcode::DefString, id, bytes);
        }
        id
    }

    /// Release a previously interned string. A no-op, with no emitted
    /// command, if `id` is not currently live.
    pub fn free_string(&mut self, id: u32) {
        if self.strings.free(id) {
            log::trace!("drawlist: freed string {id}");
            let mut payload = [0u8; 4];
            put_u32(&mut payload, 0, id);
            self.push_command(Opcode::FreeString, 0, &payload);
        }
    }

    /// Intern `bytes` as a blob, returning a stable id valid until
    /// [`free_blob`](Self::free_blob) releases it.
    pub fn intern_blob(&mut self, bytes: &[u8]) -> u32 {
        let (id, is_new) = self.blobs.intern(bytes);
        if is_new {
            log::trace!("drawlist: interned blob {id} ({} bytes)", bytes.len());
            self.emit_def(Opcode::DefBlob, id, bytes);
        }
        id
    }

    /// Release a previously interned blob. A no-op, with no emitted
    /// command, if `id` is not currently live.
    pub fn free_blob(&mut self, id: u32) {
        if self.blobs.free(id) {
            log::trace!("drawlist: freed blob {id}");
            let mut payload = [0u8; 4];
            put_u32(&mut payload, 0, id);
            self.push_command(Opcode::FreeBlob, 0, &payload);
        }
    }

    fn emit_def(&mut self, opcode: Opcode, id: u32, bytes: &[u8]) {
        let byte_len = bytes.len() as u32;
        let padded = align4(byte_len) as usize;
        let mut payload = vec![0u8; 8 + padded];
        put_u32(&mut payload, 0, id);
        put_u32(&mut payload, 4, byte_len);
        payload[8..8 + bytes.len()].copy_from_slice(bytes);
        self.push_command(opcode, 0, &payload);
    }

    /// Emit the buffer for this frame: the command stream issued since the
    /// last `build`, plus a fresh span/raw-bytes section for every
    /// currently-live string and blob.
    ///
    /// Clears the per-frame command stream; the string and blob tables
    /// persist, since their ids remain valid until explicitly freed.
    #[must_use]
    pub fn build(&mut self) -> Vec<u8> {
        let cmd_bytes = self.commands.len() as u32;
        debug_assert_eq!(cmd_bytes % 4, 0);

        let (strings_span, strings_raw) = flatten(&self.strings.live);
        let (blobs_span, blobs_raw) = flatten(&self.blobs.live);

        let strings_span_offset = HEADER_SIZE + cmd_bytes;
        let strings_count = self.strings.live.len() as u32;
        let strings_bytes_offset = strings_span_offset + strings_count * 8;
        let strings_bytes_len = strings_raw.len() as u32;

        let blobs_span_offset = strings_bytes_offset + strings_bytes_len;
        let blobs_count = self.blobs.live.len() as u32;
        let blobs_bytes_offset = blobs_span_offset + blobs_count * 8;
        let blobs_bytes_len = blobs_raw.len() as u32;

        let total_size = blobs_bytes_offset + blobs_bytes_len;
        debug_assert_eq!(total_size % 4, 0);

        let mut out = vec![0u8; total_size as usize];
        let header = Header {
            total_size,
            cmd_offset: HEADER_SIZE,
            cmd_bytes,
            cmd_count: self.cmd_count,
            strings_span_offset,
            strings_count,
            strings_bytes_offset,
            strings_bytes_len,
            blobs_span_offset,
            blobs_count,
            blobs_bytes_offset,
            blobs_bytes_len,
        };
        header.write_to(&mut out);

        let cmd_start = HEADER_SIZE as usize;
        out[cmd_start..cmd_start + cmd_bytes as usize].copy_from_slice(&self.commands);

        write_section(&mut out, strings_span_offset, &strings_span, strings_bytes_offset, &strings_raw);
        write_section(&mut out, blobs_span_offset, &blobs_span, blobs_bytes_offset, &blobs_raw);

        log::debug!(
            "drawlist: built {total_size} bytes ({} commands, {strings_count} strings, {blobs_count} blobs)",
            self.cmd_count
        );

        self.commands.clear();
        self.cmd_count = 0;
        out
    }
}

/// One `(offset, len)` entry of a resource span table, in wire order.
struct SpanEntry {
    offset: u32,
    len: u32,
}

fn flatten(live: &BTreeMap<u32, Vec<u8>>) -> (Vec<SpanEntry>, Vec<u8>) {
    let mut spans = Vec::with_capacity(live.len());
    let mut raw = Vec::new();
    for bytes in live.values() {
        let offset = raw.len() as u32;
        let len = bytes.len() as u32;
        raw.extend_from_slice(bytes);
        let padded = align4(len) as usize;
        raw.resize(raw.len() + (padded - bytes.len()), 0);
        spans.push(SpanEntry { offset, len });
    }
    (spans, raw)
}

fn write_section(out: &mut [u8], span_offset: u32, spans: &[SpanEntry], bytes_offset: u32, raw: &[u8]) {
    for (i, span) in spans.iter().enumerate() {
        let at = span_offset as usize + i * 8;
        put_u32(out, at, span.offset);
        put_u32(out, at + 4, span.len);
    }
    let at = bytes_offset as usize;
    out[at..at + raw.len()].copy_from_slice(raw);
}

fn put_i32_slice(buf: &mut [u8], offset: usize, value: i32) {
    buf[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode_commands;

    #[test]
    fn build_emits_4_aligned_header_fields() {
        let mut builder = Builder::new();
        builder.clear(0);
        builder.fill_rect(0, 0, 10, 3, 1);
        let bytes = builder.build();
        let header = Header::read_from(&bytes).unwrap();
        assert_eq!(header.total_size % 4, 0);
        assert_eq!(header.cmd_bytes % 4, 0);
        assert_eq!(bytes.len() as u32, header.total_size);
    }

    #[test]
    fn command_stream_drains_after_build() {
        let mut builder = Builder::new();
        builder.clear(0);
        let first = builder.build();
        let second = builder.build();
        let first_header = Header::read_from(&first).unwrap();
        let second_header = Header::read_from(&second).unwrap();
        assert_eq!(first_header.cmd_count, 1);
        assert_eq!(second_header.cmd_count, 0);
    }

    #[test]
    fn repeated_intern_of_identical_bytes_reuses_id_and_does_not_redefine() {
        let mut builder = Builder::new();
        let a = builder.intern_string(b"hello");
        let b = builder.intern_string(b"hello");
        assert_eq!(a, b);
        let bytes = builder.build();
        let header = Header::read_from(&bytes).unwrap();
        assert_eq!(header.cmd_count, 1, "second intern of identical content must not re-emit DEF_STRING");
    }

    #[test]
    fn string_table_persists_across_builds_until_freed() {
        let mut builder = Builder::new();
        let id = builder.intern_string(b"persist");
        let _ = builder.build();
        let bytes = builder.build();
        let header = Header::read_from(&bytes).unwrap();
        assert_eq!(header.strings_count, 1, "live strings are re-emitted every frame until freed");

        builder.free_string(id);
        let bytes = builder.build();
        let header = Header::read_from(&bytes).unwrap();
        assert_eq!(header.strings_count, 0);
    }

    #[test]
    fn round_trip_decodes_matching_opcodes_and_payload_sizes() {
        let mut builder = Builder::new();
        builder.clear(0xFF00_00FF);
        let s = builder.intern_string(b"hi");
        builder.draw_text(1, 2, s, 0, 2);
        builder.push_clip(0, 0, 80, 24);
        builder.pop_clip();
        let bytes = builder.build();

        let header = Header::read_from(&bytes).unwrap();
        let cmds = decode_commands(&bytes, &header).unwrap();
        let opcodes: Vec<_> = cmds.iter().map(|c| c.opcode).collect();
        assert_eq!(
            opcodes,
            alloc::vec![
                Opcode::Clear,
                Opcode::DefString,
                Opcode::DrawText,
                Opcode::PushClip,
                Opcode::PopClip,
            ]
        );
    }

    #[test]
    fn string_bytes_padded_to_4_with_zeros() {
        let mut builder = Builder::new();
        builder.intern_string(b"abc"); // length 3, pads one zero byte.
        let bytes = builder.build();
        let header = Header::read_from(&bytes).unwrap();
        assert_eq!(header.strings_bytes_len, 4);
        let start = header.strings_bytes_offset as usize;
        assert_eq!(&bytes[start..start + 4], b"abc\0");
    }
}
