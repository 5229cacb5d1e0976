// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/part.rs - Part decoder for Altium SchLib component streams.
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
 * # `part` Module
 *
 * Folds the records of one component's `Data` stream into a [Part].
 *
 * The first record is the component header, which carries the part's
 * identity. Every later record is classified by its `RECORD` number. Only
 * parameters, the designator and footprint implementations are kept.
 *
 * ## Usage Example
 *
 * ```no_run
 * use schlib::part::Part;
 *
 * fn main() -> Result<(), Box<dyn std::error::Error>> {
 *     let data = std::fs::read("Data")?;
 *     let part = Part::from_bytes(&data, "Thick film resistor")?;
 *
 *     println!("{} ({})", part.id, part.designator);
 *     for (name, text) in &part.properties {
 *         println!("  {} = {}", name, text);
 *     }
 *
 *     Ok(())
 * }
 * ```
 */

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::fmt;

use crate::error::{Error, Result};
use crate::properties::PropertyMap;
use crate::record::Frames;

/// `RECORD` number of the designator text.
pub const RECORD_DESIGNATOR: i64 = 34;
/// `RECORD` number of a named parameter.
pub const RECORD_PARAMETER: i64 = 41;
/// `RECORD` number of a model implementation (footprint).
pub const RECORD_IMPLEMENTATION: i64 = 45;

/// A record from a component stream, reduced to the fields a [Part] uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartRecord {
    /// A named parameter, such as `Comment` or `Value`.
    Property { name: String, text: String },
    /// The designator prefix, such as `R?`.
    Designator(String),
    /// A footprint model and its description.
    Footprint {
        model_name: String,
        description: String,
    },
    /// Any record kind that does not contribute to a [Part].
    Unknown(i64),
}

impl PartRecord {
    /// Classifies a decoded record.
    ///
    /// # Returns
    ///
    /// [Error::Decode] if `RECORD` is absent or not a number, or
    /// [Error::MissingField] if a known kind lacks a required field.
    pub fn from_properties(props: &PropertyMap) -> Result<Self> {
        let kind = props.get_int("RECORD")?;
        let required = |key: &'static str| {
            props
                .get_text(key)
                .map(|text| text.into_owned())
                .ok_or(Error::MissingField { record: kind, key })
        };
        let optional = |key: &str| props.get_text(key).unwrap_or_default().into_owned();

        Ok(match kind {
            RECORD_PARAMETER => PartRecord::Property {
                name: required("NAME")?,
                text: optional("TEXT"),
            },
            RECORD_DESIGNATOR => PartRecord::Designator(required("TEXT")?),
            RECORD_IMPLEMENTATION => PartRecord::Footprint {
                model_name: required("MODELNAME")?,
                description: optional("DESCRIPTION"),
            },
            other => PartRecord::Unknown(other),
        })
    }
}

/// One schematic component.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Part {
    /// `DESIGNITEMID` of the component, or its `LIBREFERENCE`.
    pub id: String,
    /// Designator prefix, empty if the component has none.
    pub designator: String,
    /// Description supplied by the library header.
    pub description: String,
    /// Parameter name to parameter text.
    pub properties: BTreeMap<String, String>,
    /// Footprint model name to footprint description.
    pub footprints: BTreeMap<String, String>,
}

impl Part {
    /// Decodes a component's `Data` stream.
    ///
    /// Records that cannot be decoded are skipped. A framing error ends the
    /// stream, keeping everything read up to that point.
    ///
    /// # Arguments
    ///
    /// * `data` - The raw bytes of the `Data` stream.
    /// * `description` - The component description from the library header.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Part`, or an error if the header has no
    /// identity or a known record lacks a required field.
    pub fn from_bytes(data: &[u8], description: &str) -> Result<Self> {
        let mut frames = Frames::new(data);

        let header = frames.next().ok_or(Error::EmptyStream)??;
        let header = PropertyMap::from_frame(&header)?;
        let id = header
            .get_text("DESIGNITEMID")
            .or_else(|| header.get_text("LIBREFERENCE"))
            .ok_or(Error::MissingIdentity)?
            .into_owned();

        let mut part = Part {
            id,
            description: description.to_string(),
            ..Default::default()
        };

        for frame in frames {
            let frame = match frame {
                Ok(frame) => frame,
                Err(e) => {
                    tracing::warn!(part = %part.id, error = %e, "stream truncated, keeping records read so far");
                    break;
                }
            };

            let record = match PropertyMap::from_frame(&frame)
                .and_then(|props| PartRecord::from_properties(&props))
            {
                Ok(record) => record,
                Err(e @ Error::MissingField { .. }) => return Err(e),
                Err(e) => {
                    tracing::debug!(part = %part.id, offset = frame.offset, error = %e, "skipping record");
                    continue;
                }
            };

            match record {
                PartRecord::Property { name, text } => {
                    part.properties.insert(name, text);
                }
                PartRecord::Designator(text) => part.designator = text,
                PartRecord::Footprint {
                    model_name,
                    description,
                } => {
                    part.footprints.insert(model_name, description);
                }
                PartRecord::Unknown(_) => (),
            }
        }

        Ok(part)
    }

    /// Returns the export fields of this part.
    ///
    /// `id`, `designator` and `description` come first, then every property
    /// by name. A property named like one of the fixed fields replaces it.
    pub fn params(&self) -> HashMap<&str, &str> {
        let mut params = HashMap::from([
            ("id", self.id.as_str()),
            ("designator", self.designator.as_str()),
            ("description", self.description.as_str()),
        ]);
        params.extend(
            self.properties
                .iter()
                .map(|(name, text)| (name.as_str(), text.as_str())),
        );
        params
    }
}

impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}, {}, {:?}",
            self.id, self.designator, self.description, self.properties
        )
    }
}
