// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/error.rs - Error types for Altium SchLib and LibPkg files.
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

use thiserror::Error;

/// The error type for all operations in this crate.
///
/// Errors fall into two groups. [Error::Framing], [Error::FormatMissing],
/// [Error::FormatMismatch], [Error::Io] and [Error::Manifest] are fatal to
/// the file being read. The rest are local to one record or one part, and
/// the assemblers turn them into a logged skip.
#[derive(Debug, Error)]
pub enum Error {
    /// An error originating from I/O operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An error originating from the CSV writer.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A record's length prefix is truncated or points past the end of the
    /// stream.
    #[error("Framing error at offset {offset}: {needed} bytes needed, {available} available")]
    Framing {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// A record's body could not be decoded into properties.
    #[error("Decode error: {0}")]
    Decode(String),

    /// A header property required by [crate::properties::PropertyMap::check]
    /// is absent.
    #[error("Format error: missing {key}")]
    FormatMissing { key: String },

    /// A header property has a value other than the accepted ones.
    #[error("Format error: {key} is {found:?}, expected {expected:?}")]
    FormatMismatch {
        key: String,
        expected: String,
        found: String,
    },

    /// A part header has neither `DESIGNITEMID` nor `LIBREFERENCE`.
    #[error("Part header has no DESIGNITEMID or LIBREFERENCE")]
    MissingIdentity,

    /// A record of a known kind lacks one of its required fields.
    #[error("Record {record} is missing required field {key}")]
    MissingField { record: i64, key: &'static str },

    /// A stream has no records at all.
    #[error("Stream contains no records")]
    EmptyStream,

    /// The container has no stream at the requested path.
    #[error("Stream not found: {0}")]
    StreamNotFound(String),

    /// The LibPkg manifest is structurally invalid.
    #[error("Invalid manifest: {0}")]
    Manifest(String),
}

/// A convenience `Result` type alias using the crate's [Error] type.
pub type Result<T> = std::result::Result<T, Error>;
