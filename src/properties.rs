// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/properties.rs - Property list decoder for Altium records.
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
 * # `properties` Module
 *
 * Decodes the body of a property-list record into a [PropertyMap].
 *
 * A body is a sequence of `KEY=VALUE` segments separated by `|`, usually
 * with a leading `|` and always with a trailing NUL byte:
 *
 * ```text
 * |RECORD=41|NAME=Comment|TEXT=10k\0
 * ```
 *
 * ## Usage Example
 *
 * ```
 * use schlib::properties::PropertyMap;
 *
 * let props = PropertyMap::parse(b"|RECORD=41|name=Comment|TEXT=10k\x00").unwrap();
 * assert_eq!(props.get_int("RECORD").unwrap(), 41);
 * assert_eq!(props.get("NAME"), Some(&b"Comment"[..]));
 * assert_eq!(props.get_or("DESCRIPTION", b""), b"");
 * ```
 */

use std::borrow::Cow;
use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::record::{Frame, FrameKind};

const SEPARATOR: u8 = b'|';
const ASSIGNMENT: u8 = b'=';
const TERMINATOR: u8 = 0;

/// Altium stores a UTF-8 copy of non-ASCII values under this key prefix.
const UTF8_PREFIX: &str = "%UTF8%";

/// Which accepted value a [PropertyMap::check] matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Matched {
    Expected,
    Alternate,
}

/// The properties of one record.
///
/// Keys are case-insensitive. A key that is absent is distinct from a key
/// whose value is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyMap {
    entries: HashMap<String, Vec<u8>>,
}

impl PropertyMap {
    /// Decodes a frame, which must be a property list.
    pub fn from_frame(frame: &Frame) -> Result<Self> {
        match frame.kind {
            FrameKind::Properties => Self::parse(frame.body),
            kind => Err(Error::Decode(format!(
                "record at offset {} is {:?}, not a property list",
                frame.offset, kind
            ))),
        }
    }

    /// Decodes a property list body.
    ///
    /// Trailing NUL bytes are ignored, as are empty segments. Every other
    /// segment must contain `=` and a non-empty UTF-8 key. If a key appears
    /// twice the later value wins.
    pub fn parse(body: &[u8]) -> Result<Self> {
        let end = body
            .iter()
            .rposition(|&b| b != TERMINATOR)
            .map_or(0, |i| i + 1);

        let mut entries = HashMap::new();
        for segment in body[..end].split(|&b| b == SEPARATOR) {
            if segment.is_empty() {
                continue;
            }

            let split = segment
                .iter()
                .position(|&b| b == ASSIGNMENT)
                .ok_or_else(|| {
                    Error::Decode(format!(
                        "segment {:?} has no '='",
                        String::from_utf8_lossy(segment)
                    ))
                })?;
            let (key, value) = (&segment[..split], &segment[split + 1..]);

            let key = std::str::from_utf8(key)
                .map_err(|e| Error::Decode(format!("property key is not UTF-8: {}", e)))?;
            if key.is_empty() {
                return Err(Error::Decode(format!(
                    "segment {:?} has an empty key",
                    String::from_utf8_lossy(segment)
                )));
            }

            entries.insert(key.to_ascii_uppercase(), value.to_vec());
        }

        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(&key.to_ascii_uppercase())
    }

    /// Returns the raw value of `key`, or `None` if it is absent.
    pub fn get(&self, key: &str) -> Option<&[u8]> {
        self.entries
            .get(&key.to_ascii_uppercase())
            .map(Vec::as_slice)
    }

    /// Returns the raw value of `key`, or `default` if it is absent.
    pub fn get_or<'a>(&'a self, key: &str, default: &'a [u8]) -> &'a [u8] {
        self.get(key).unwrap_or(default)
    }

    /// Returns the value of `key` as text.
    ///
    /// The `%UTF8%` copy of the key is preferred when the record carries one.
    /// Invalid UTF-8 is replaced rather than rejected.
    pub fn get_text(&self, key: &str) -> Option<Cow<'_, str>> {
        let utf8_key = format!("{}{}", UTF8_PREFIX, key);
        self.get(&utf8_key)
            .or_else(|| self.get(key))
            .map(String::from_utf8_lossy)
    }

    /// Parses the value of `key` as a decimal integer.
    ///
    /// # Returns
    ///
    /// [Error::Decode] if the key is absent or its value is not a number.
    pub fn get_int(&self, key: &str) -> Result<i64> {
        let value = self
            .get(key)
            .ok_or_else(|| Error::Decode(format!("missing integer property {}", key)))?;
        std::str::from_utf8(value)
            .ok()
            .and_then(|s| s.trim().parse::<i64>().ok())
            .ok_or_else(|| {
                Error::Decode(format!(
                    "property {} is not an integer: {:?}",
                    key,
                    String::from_utf8_lossy(value)
                ))
            })
    }

    /// Validates a header property.
    ///
    /// The value of `key` must equal `expected` or `alternate`. An `expected`
    /// of `None` means the key may also be absent.
    ///
    /// # Returns
    ///
    /// Which value matched, or [Error::FormatMissing] /
    /// [Error::FormatMismatch].
    pub fn check(
        &self,
        key: &str,
        expected: Option<&[u8]>,
        alternate: Option<&[u8]>,
    ) -> Result<Matched> {
        let value = match (self.get(key), expected) {
            (None, None) => return Ok(Matched::Expected),
            (None, Some(_)) => {
                return Err(Error::FormatMissing {
                    key: key.to_string(),
                });
            }
            (Some(value), _) => value,
        };

        if expected == Some(value) {
            Ok(Matched::Expected)
        } else if alternate == Some(value) {
            Ok(Matched::Alternate)
        } else {
            let mut accepted = vec![match expected {
                Some(v) => String::from_utf8_lossy(v).into_owned(),
                None => "<absent>".to_string(),
            }];
            if let Some(v) = alternate {
                accepted.push(String::from_utf8_lossy(v).into_owned());
            }
            Err(Error::FormatMismatch {
                key: key.to_string(),
                expected: accepted.join(" or "),
                found: String::from_utf8_lossy(value).into_owned(),
            })
        }
    }

    /// Iterates over the normalized keys and raw values in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}
