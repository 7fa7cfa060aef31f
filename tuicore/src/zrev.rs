// Copyright 2025 the tuicore Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! ZREV v1 event batch decoding: the wire format a
//! [`crate::backend::Backend`] hands the orchestrator each
//! [`crate::backend::Backend::poll_events`] call.
//!
//! ## Wire layout
//!
//! ```text
//! [ 24-byte header: magic, version, totalSize, eventCount, flags, reserved ]
//! [ event 0 ] [ event 1 ] ...
//! ```
//!
//! Every multi-byte integer is little-endian, matching the drawlist codec's
//! convention. Each event entry is a 4-byte tag header (`u8` tag plus 3
//! reserved bytes) followed by a fixed-size record for every kind except
//! `paste`, whose trailing byte payload is padded to a 4-byte boundary —
//! the same alignment discipline the drawlist command stream uses, chosen
//! here since the wire format leaves the exact per-event byte layout open,
//! pinning only the header fields and record field names.

use tuicore_router::types::{KeyAction, KeyEvent, MouseEvent, MouseKind, Mods};

/// `"ZREV"` read as a little-endian `u32`.
pub const MAGIC: u32 = 0x5645_525A;

/// Current ZREV wire format version.
pub const VERSION: u32 = 1;

/// Size of the batch header in bytes.
pub const HEADER_SIZE: usize = 24;

const TAG_KEY: u8 = 1;
const TAG_TEXT: u8 = 2;
const TAG_RESIZE: u8 = 3;
const TAG_MOUSE: u8 = 4;
const TAG_FOCUS: u8 = 5;
const TAG_PASTE: u8 = 6;
const TAG_COMPOSITION: u8 = 7;

/// One decoded ZREV event.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// A key transition.
    Key(KeyEvent),
    /// A decoded text codepoint (distinct from raw key codes, for IME/text
    /// input composition results).
    Text {
        /// Event timestamp in milliseconds.
        time_ms: u64,
        /// The decoded Unicode scalar value.
        codepoint: u32,
    },
    /// A terminal resize. The first batch after `start()` must contain one
    /// of these, seeding the initial viewport.
    Resize {
        /// Event timestamp in milliseconds.
        time_ms: u64,
        /// New terminal width in cells.
        cols: u16,
        /// New terminal height in cells.
        rows: u16,
    },
    /// A mouse event (press/release/move/wheel).
    Mouse(MouseEvent),
    /// Terminal focus gained/lost (distinct from in-app widget focus).
    Focus {
        /// Event timestamp in milliseconds.
        time_ms: u64,
        /// `true` if the terminal window gained focus.
        gained: bool,
    },
    /// A bracketed paste payload.
    Paste {
        /// Event timestamp in milliseconds.
        time_ms: u64,
        /// The pasted bytes, already stripped of bracketed-paste escapes.
        bytes: Vec<u8>,
    },
    /// An IME composition update (preedit text).
    Composition {
        /// Event timestamp in milliseconds.
        time_ms: u64,
        /// The in-progress composition text.
        bytes: Vec<u8>,
    },
}

/// A decoded ZREV batch header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BatchHeader {
    /// Declared total byte size of the batch, header included.
    pub total_size: u32,
    /// Number of events in the stream.
    pub event_count: u32,
    /// Reserved bitflags, currently always 0.
    pub flags: u32,
}

/// Failure decoding a ZREV batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZrevDecodeError {
    /// Fewer than [`HEADER_SIZE`] bytes, or fewer than `totalSize` bytes.
    Truncated,
    /// The magic number did not read `"ZREV"`.
    BadMagic,
    /// The version field named an ABI newer than [`VERSION`].
    UnsupportedVersion(u32),
}

fn get_u32(buf: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes(buf[offset..offset + 4].try_into().expect("4-byte slice"))
}

fn get_u64(buf: &[u8], offset: usize) -> u64 {
    u64::from_le_bytes(buf[offset..offset + 8].try_into().expect("8-byte slice"))
}

fn get_u16(buf: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes(buf[offset..offset + 2].try_into().expect("2-byte slice"))
}

fn get_i32(buf: &[u8], offset: usize) -> i32 {
    i32::from_le_bytes(buf[offset..offset + 4].try_into().expect("4-byte slice"))
}

const fn align4(len: usize) -> usize {
    (len + 3) & !3
}

/// Decode a full ZREV batch, returning its header and the events in wire
/// order.
///
/// # Errors
///
/// Returns [`ZrevDecodeError`] on a truncated buffer, bad magic, or an
/// unsupported version. Unknown *event* tags within an otherwise valid
/// batch are skipped (forward-compatible), matching the drawlist codec's
/// "unknown opcodes are skipped" rule.
pub fn decode_batch(bytes: &[u8]) -> Result<(BatchHeader, Vec<Event>), ZrevDecodeError> {
    if bytes.len() < HEADER_SIZE {
        return Err(ZrevDecodeError::Truncated);
    }
    if get_u32(bytes, 0) != MAGIC {
        return Err(ZrevDecodeError::BadMagic);
    }
    let version = get_u32(bytes, 4);
    if version > VERSION {
        return Err(ZrevDecodeError::UnsupportedVersion(version));
    }
    let header = BatchHeader {
        total_size: get_u32(bytes, 8),
        event_count: get_u32(bytes, 12),
        flags: get_u32(bytes, 16),
    };
    if (header.total_size as usize) > bytes.len() {
        return Err(ZrevDecodeError::Truncated);
    }

    let mut events = Vec::with_capacity(header.event_count as usize);
    let mut cursor = HEADER_SIZE;
    let end = header.total_size as usize;
    for _ in 0..header.event_count {
        if cursor + 4 > end {
            return Err(ZrevDecodeError::Truncated);
        }
        let tag = bytes[cursor];
        let body = cursor + 4;
        match tag {
            TAG_KEY => {
                if body + 16 > end {
                    return Err(ZrevDecodeError::Truncated);
                }
                let time_ms = get_u64(bytes, body);
                let key_code = get_u32(bytes, body + 8);
                let mods = Mods::from_bits_truncate(bytes[body + 12]);
                let action = match bytes[body + 13] {
                    0 => KeyAction::Down,
                    1 => KeyAction::Up,
                    _ => KeyAction::Repeat,
                };
                events.push(Event::Key(KeyEvent { time_ms, key_code, mods, action }));
                cursor = body + 16;
            }
            TAG_TEXT => {
                if body + 12 > end {
                    return Err(ZrevDecodeError::Truncated);
                }
                let time_ms = get_u64(bytes, body);
                let codepoint = get_u32(bytes, body + 8);
                events.push(Event::Text { time_ms, codepoint });
                cursor = body + 12;
            }
            TAG_RESIZE => {
                if body + 12 > end {
                    return Err(ZrevDecodeError::Truncated);
                }
                let time_ms = get_u64(bytes, body);
                let cols = get_u16(bytes, body + 8);
                let rows = get_u16(bytes, body + 10);
                events.push(Event::Resize { time_ms, cols, rows });
                cursor = body + 12;
            }
            TAG_MOUSE => {
                if body + 28 > end {
                    return Err(ZrevDecodeError::Truncated);
                }
                let time_ms = get_u64(bytes, body);
                let x = get_i32(bytes, body + 8);
                let y = get_i32(bytes, body + 12);
                let kind = match bytes[body + 16] {
                    0 => MouseKind::Down,
                    1 => MouseKind::Up,
                    2 => MouseKind::Move,
                    _ => MouseKind::Wheel,
                };
                let mods = Mods::from_bits_truncate(bytes[body + 17]);
                let buttons = tuicore_router::types::MouseButtons::from_bits_truncate(bytes[body + 18]);
                let wheel_x = get_i32(bytes, body + 20);
                let wheel_y = get_i32(bytes, body + 24);
                events.push(Event::Mouse(MouseEvent {
                    time_ms,
                    x,
                    y,
                    kind,
                    mods,
                    buttons,
                    wheel_x,
                    wheel_y,
                }));
                cursor = body + 28;
            }
            TAG_FOCUS => {
                if body + 12 > end {
                    return Err(ZrevDecodeError::Truncated);
                }
                let time_ms = get_u64(bytes, body);
                let gained = bytes[body + 8] != 0;
                events.push(Event::Focus { time_ms, gained });
                cursor = body + 12;
            }
            TAG_PASTE | TAG_COMPOSITION => {
                if body + 12 > end {
                    return Err(ZrevDecodeError::Truncated);
                }
                let time_ms = get_u64(bytes, body);
                let byte_len = get_u32(bytes, body + 8) as usize;
                let payload_start = body + 12;
                let payload_end = payload_start + byte_len;
                if payload_end > end {
                    return Err(ZrevDecodeError::Truncated);
                }
                let payload = bytes[payload_start..payload_end].to_vec();
                cursor = payload_start + align4(byte_len);
                events.push(if tag == TAG_PASTE {
                    Event::Paste { time_ms, bytes: payload }
                } else {
                    Event::Composition { time_ms, bytes: payload }
                });
            }
            _ => {
                log::warn!("zrev: unknown event tag {tag}, batch truncated at cursor");
                break;
            }
        }
    }
    Ok((header, events))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push_u32(buf: &mut Vec<u8>, v: u32) {
        buf.extend_from_slice(&v.to_le_bytes());
    }
    fn push_u64(buf: &mut Vec<u8>, v: u64) {
        buf.extend_from_slice(&v.to_le_bytes());
    }

    fn resize_batch(cols: u16, rows: u16) -> Vec<u8> {
        let mut buf = Vec::new();
        push_u32(&mut buf, MAGIC);
        push_u32(&mut buf, VERSION);
        let total_size_pos = buf.len();
        push_u32(&mut buf, 0); // total_size placeholder
        push_u32(&mut buf, 1); // event_count
        push_u32(&mut buf, 0); // flags
        push_u32(&mut buf, 0); // reserved

        buf.push(TAG_RESIZE);
        buf.extend_from_slice(&[0, 0, 0]);
        push_u64(&mut buf, 1000);
        buf.extend_from_slice(&cols.to_le_bytes());
        buf.extend_from_slice(&rows.to_le_bytes());

        let total = buf.len() as u32;
        buf[total_size_pos..total_size_pos + 4].copy_from_slice(&total.to_le_bytes());
        buf
    }

    #[test]
    fn decodes_first_resize_batch() {
        let batch = resize_batch(80, 24);
        let (header, events) = decode_batch(&batch).unwrap();
        assert_eq!(header.event_count, 1);
        assert_eq!(events, vec![Event::Resize { time_ms: 1000, cols: 80, rows: 24 }]);
    }

    #[test]
    fn rejects_bad_magic() {
        let mut batch = resize_batch(80, 24);
        batch[0] = 0;
        assert_eq!(decode_batch(&batch), Err(ZrevDecodeError::BadMagic));
    }

    #[test]
    fn rejects_truncated_buffer() {
        let batch = resize_batch(80, 24);
        assert_eq!(decode_batch(&batch[..HEADER_SIZE + 2]), Err(ZrevDecodeError::Truncated));
    }

    #[test]
    fn unknown_tag_stops_decoding_without_erroring() {
        let mut batch = resize_batch(80, 24);
        // Append a second, bogus event with an unknown tag; event_count
        // says 2 but decode should stop cleanly at the unknown tag.
        batch.extend_from_slice(&[99, 0, 0, 0]);
        // event_count lives at byte offset 12.
        let total = batch.len() as u32;
        batch[8..12].copy_from_slice(&total.to_le_bytes());
        batch[12..16].copy_from_slice(&2u32.to_le_bytes());

        let (header, events) = decode_batch(&batch).unwrap();
        assert_eq!(header.event_count, 2);
        assert_eq!(events.len(), 1, "only the well-formed resize event decodes");
    }
}
