// Copyright 2025 the tuicore Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The 64-byte drawlist header.

/// `"ZRDL"` read as a little-endian `u32`.
pub const MAGIC: u32 = 0x4C44_525A;

/// Current drawlist wire format version.
pub const VERSION: u32 = 5;

/// Size of the header in bytes. All section offsets are relative to the
/// start of the buffer, not the end of the header.
pub const HEADER_SIZE: u32 = 64;

/// The fixed-layout header every drawlist buffer begins with.
///
/// Field order and byte offsets are part of the wire format and must not
/// change: magic(0), version(4), headerSize(8), totalSize(12), cmdOffset(16),
/// cmdBytes(20), cmdCount(24), stringsSpanOffset(28), stringsCount(32),
/// stringsBytesOffset(36), stringsBytesLen(40), blobsSpanOffset(44),
/// blobsCount(48), blobsBytesOffset(52), blobsBytesLen(56). Bytes 60..64 are
/// reserved and always zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Header {
    /// Total size of the buffer, including the header. Always 4-aligned.
    pub total_size: u32,
    /// Byte offset of the command stream (always [`HEADER_SIZE`]).
    pub cmd_offset: u32,
    /// Length of the command stream in bytes. Always 4-aligned.
    pub cmd_bytes: u32,
    /// Number of commands in the stream.
    pub cmd_count: u32,
    /// Byte offset of the string span table.
    pub strings_span_offset: u32,
    /// Number of live interned strings.
    pub strings_count: u32,
    /// Byte offset of the string raw-bytes blob.
    pub strings_bytes_offset: u32,
    /// Length of the string raw-bytes blob. Always 4-aligned.
    pub strings_bytes_len: u32,
    /// Byte offset of the blob span table.
    pub blobs_span_offset: u32,
    /// Number of live interned blobs.
    pub blobs_count: u32,
    /// Byte offset of the blob raw-bytes blob.
    pub blobs_bytes_offset: u32,
    /// Length of the blob raw-bytes blob. Always 4-aligned.
    pub blobs_bytes_len: u32,
}

impl Header {
    /// Encode this header as the first [`HEADER_SIZE`] bytes of `out`.
    ///
    /// `out` must already be at least [`HEADER_SIZE`] bytes long.
    pub fn write_to(&self, out: &mut [u8]) {
        debug_assert!(out.len() >= HEADER_SIZE as usize);
        put_u32(out, 0, MAGIC);
        put_u32(out, 4, VERSION);
        put_u32(out, 8, HEADER_SIZE);
        put_u32(out, 12, self.total_size);
        put_u32(out, 16, HEADER_SIZE);
        put_u32(out, 20, self.cmd_bytes);
        put_u32(out, 24, self.cmd_count);
        put_u32(out, 28, self.strings_span_offset);
        put_u32(out, 32, self.strings_count);
        put_u32(out, 36, self.strings_bytes_offset);
        put_u32(out, 40, self.strings_bytes_len);
        put_u32(out, 44, self.blobs_span_offset);
        put_u32(out, 48, self.blobs_count);
        put_u32(out, 52, self.blobs_bytes_offset);
        put_u32(out, 56, self.blobs_bytes_len);
        out[60..64].fill(0);
    }

    /// Decode a header from the first [`HEADER_SIZE`] bytes of `bytes`.
    pub fn read_from(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < HEADER_SIZE as usize {
            return None;
        }
        if get_u32(bytes, 0) != MAGIC {
            return None;
        }
        Some(Header {
            total_size: get_u32(bytes, 12),
            cmd_offset: get_u32(bytes, 16),
            cmd_bytes: get_u32(bytes, 20),
            cmd_count: get_u32(bytes, 24),
            strings_span_offset: get_u32(bytes, 28),
            strings_count: get_u32(bytes, 32),
            strings_bytes_offset: get_u32(bytes, 36),
            strings_bytes_len: get_u32(bytes, 40),
            blobs_span_offset: get_u32(bytes, 44),
            blobs_count: get_u32(bytes, 48),
            blobs_bytes_offset: get_u32(bytes, 52),
            blobs_bytes_len: get_u32(bytes, 56),
        })
    }
}

pub(crate) fn put_u32(buf: &mut [u8], offset: usize, value: u32) {
    buf[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

pub(crate) fn get_u32(buf: &[u8], offset: usize) -> u32 {
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&buf[offset..offset + 4]);
    u32::from_le_bytes(bytes)
}

pub(crate) fn put_u16(buf: &mut [u8], offset: usize, value: u16) {
    buf[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
}

pub(crate) fn get_u16(buf: &[u8], offset: usize) -> u16 {
    let mut bytes = [0u8; 2];
    bytes.copy_from_slice(&buf[offset..offset + 2]);
    u16::from_le_bytes(bytes)
}

pub(crate) fn put_i32(buf: &mut [u8], offset: usize, value: i32) {
    buf[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

pub(crate) fn get_i32(buf: &[u8], offset: usize) -> i32 {
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&buf[offset..offset + 4]);
    i32::from_le_bytes(bytes)
}

/// Round `len` up to the next multiple of 4.
pub(crate) const fn align4(len: u32) -> u32 {
    (len + 3) & !3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magic_spells_zrdl() {
        assert_eq!(&MAGIC.to_le_bytes(), b"ZRDL");
    }

    #[test]
    fn align4_rounds_up() {
        assert_eq!(align4(0), 0);
        assert_eq!(align4(1), 4);
        assert_eq!(align4(4), 4);
        assert_eq!(align4(5), 8);
    }

    #[test]
    fn header_round_trips() {
        let header = Header {
            total_size: 128,
            cmd_offset: HEADER_SIZE,
            cmd_bytes: 32,
            cmd_count: 2,
            strings_span_offset: 96,
            strings_count: 1,
            strings_bytes_offset: 104,
            strings_bytes_len: 8,
            blobs_span_offset: 112,
            blobs_count: 0,
            blobs_bytes_offset: 120,
            blobs_bytes_len: 0,
        };
        let mut buf = [0u8; HEADER_SIZE as usize];
        header.write_to(&mut buf);
        let decoded = Header::read_from(&buf).unwrap();
        assert_eq!(decoded, header);
    }

    #[test]
    fn rejects_wrong_magic() {
        let buf = [0u8; HEADER_SIZE as usize];
        assert!(Header::read_from(&buf).is_none());
    }
}
