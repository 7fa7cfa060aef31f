// Copyright 2025 the tuicore Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Command opcodes.

/// A drawlist command's operation code.
///
/// Decoders must skip opcodes they don't recognize rather than fail, so new
/// opcodes can be added without breaking old consumers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Opcode {
    /// Fill the whole clip region with a background color.
    Clear,
    /// Fill an axis-aligned rectangle.
    FillRect,
    /// Draw a slice of an interned string.
    DrawText,
    /// Push a clip rectangle onto the clip stack.
    PushClip,
    /// Pop the most recently pushed clip rectangle.
    PopClip,
    /// Draw a pre-shaped run of styled glyphs from an interned blob.
    DrawTextRun,
    /// Set the cursor position and visibility.
    SetCursor,
    /// Draw an interned canvas blob.
    DrawCanvas,
    /// Draw an interned image blob.
    DrawImage,
    /// Intern a string, assigning it a stable id.
    DefString,
    /// Release a previously interned string.
    FreeString,
    /// Intern a blob, assigning it a stable id.
    DefBlob,
    /// Release a previously interned blob.
    FreeBlob,
    /// Copy a rectangle of cells from one position to another.
    BlitRect,
    /// An opcode this decoder version does not recognize.
    Unknown(u16),
}

impl Opcode {
    /// Decode a raw wire opcode.
    #[must_use]
    pub fn from_raw(raw: u16) -> Self {
        match raw {
            1 => Opcode::Clear,
            2 => Opcode::FillRect,
            3 => Opcode::DrawText,
            4 => Opcode::PushClip,
            5 => Opcode::PopClip,
            6 => Opcode::DrawTextRun,
            7 => Opcode::SetCursor,
            8 => Opcode::DrawCanvas,
            9 => Opcode::DrawImage,
            10 => Opcode::DefString,
            11 => Opcode::FreeString,
            12 => Opcode::DefBlob,
            13 => Opcode::FreeBlob,
            14 => Opcode::BlitRect,
            other => Opcode::Unknown(other),
        }
    }

    /// Encode as the raw wire opcode.
    #[must_use]
    pub fn to_raw(self) -> u16 {
        match self {
            Opcode::Clear => 1,
            Opcode::FillRect => 2,
            Opcode::DrawText => 3,
            Opcode::PushClip => 4,
            Opcode::PopClip => 5,
            Opcode::DrawTextRun => 6,
            Opcode::SetCursor => 7,
            Opcode::DrawCanvas => 8,
            Opcode::DrawImage => 9,
            Opcode::DefString => 10,
            Opcode::FreeString => 11,
            Opcode::DefBlob => 12,
            Opcode::FreeBlob => 13,
            Opcode::BlitRect => 14,
            Opcode::Unknown(raw) => raw,
        }
    }
}
