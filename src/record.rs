// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/record.rs - Record framing for Altium compound-document streams.
 *  Copyright (C) 2026  Forest Crossman <cyrozap@gmail.com>
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  You should have received a copy of the GNU General Public License
 *  along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

/*!
 * # `record` Module
 *
 * Splits the bytes of one stream into framed records.
 *
 * Every record starts with a 4-byte little-endian prefix. The low 24 bits
 * hold the length of the body that follows, and the high 8 bits hold the
 * kind of the body: `0` for a `|KEY=VALUE|...` property list terminated by a
 * NUL byte, `1` for a binary record.
 *
 * ## Usage Example
 *
 * ```
 * use schlib::record::{Frames, FrameKind};
 *
 * let data = b"\x08\x00\x00\x00|RECORD\x00";
 * let frames: Vec<_> = Frames::new(data).collect::<Result<_, _>>().unwrap();
 * assert_eq!(frames.len(), 1);
 * assert_eq!(frames[0].kind, FrameKind::Properties);
 * assert_eq!(frames[0].body, b"|RECORD\x00");
 * ```
 */

use crate::error::{Error, Result};

const PREFIX_LEN: usize = 4;
const LENGTH_MASK: u32 = 0x00FF_FFFF;
const KIND_SHIFT: u32 = 24;

/// The kind of a record body, taken from the high byte of its prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// A NUL-terminated `|KEY=VALUE` list.
    Properties,
    /// An opaque binary record.
    Binary,
    /// Any other kind byte.
    Other(u8),
}

impl From<u8> for FrameKind {
    fn from(kind: u8) -> Self {
        match kind {
            0 => FrameKind::Properties,
            1 => FrameKind::Binary,
            other => FrameKind::Other(other),
        }
    }
}

/// One record, with its length prefix stripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame<'a> {
    /// The kind of the body.
    pub kind: FrameKind,
    /// The offset of the length prefix within the stream.
    pub offset: usize,
    /// The record body, exactly as long as the prefix declares.
    pub body: &'a [u8],
}

/// A lazy iterator over the records of one stream.
///
/// Iteration ends at the end of the stream. A truncated prefix or a length
/// that runs past the end of the stream is reported once as
/// [Error::Framing], after which the iterator is exhausted.
#[derive(Debug, Clone)]
pub struct Frames<'a> {
    data: &'a [u8],
    pos: usize,
    done: bool,
}

impl<'a> Frames<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            done: false,
        }
    }

    fn fail(&mut self, needed: usize) -> Option<Result<Frame<'a>>> {
        self.done = true;
        Some(Err(Error::Framing {
            offset: self.pos,
            needed,
            available: self.data.len() - self.pos,
        }))
    }
}

impl<'a> Iterator for Frames<'a> {
    type Item = Result<Frame<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.pos >= self.data.len() {
            self.done = true;
            return None;
        }

        let rest = &self.data[self.pos..];
        let prefix: [u8; PREFIX_LEN] = match rest.get(..PREFIX_LEN) {
            Some(bytes) => bytes.try_into().ok()?,
            None => return self.fail(PREFIX_LEN),
        };
        let prefix = u32::from_le_bytes(prefix);
        let length = (prefix & LENGTH_MASK) as usize;
        let kind = FrameKind::from((prefix >> KIND_SHIFT) as u8);

        let body = match rest[PREFIX_LEN..].get(..length) {
            Some(body) => body,
            None => return self.fail(PREFIX_LEN + length),
        };

        let frame = Frame {
            kind,
            offset: self.pos,
            body,
        };
        self.pos += PREFIX_LEN + length;
        Some(Ok(frame))
    }
}

impl std::iter::FusedIterator for Frames<'_> {}
