// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/library.rs - Decoder for Altium SchLib schematic libraries.
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
 * # `library` Module
 *
 * This module reads a SchLib compound document into a [Library] of parts.
 *
 * The `FileHeader` stream names every component as `LIBREF0`, `LIBREF1`,
 * ... together with a description in `COMPDESCR0`, `COMPDESCR1`, ... Each
 * component's records live in the stream `<LIBREF>/Data`.
 *
 * ## Usage Example
 *
 * ```no_run
 * use schlib::library::Library;
 *
 * fn main() -> Result<(), Box<dyn std::error::Error>> {
 *     let library = Library::from_filename("Resistors.SchLib")?;
 *
 *     for (libref, part) in library.iter() {
 *         println!("{}: {} {}", libref, part.id, part.description);
 *     }
 *
 *     Ok(())
 * }
 * ```
 */

use std::io::{Read, Seek};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::part::Part;
use crate::properties::PropertyMap;
use crate::record::Frames;

/// Name of the stream holding the library header.
pub const FILE_HEADER: &str = "FileHeader";
/// Name of the stream holding a component's records, inside its storage.
pub const DATA: &str = "Data";
/// Required value of the header's `HEADER` property.
pub const SIGNATURE: &[u8] = b"Protel for Windows - Schematic Library Editor Binary File Version 5.0";
/// Accepted value of the header's `MINORVERSION` property, if present.
pub const MINOR_VERSION: &[u8] = b"2";

/// Read access to the streams of a compound document.
pub trait Container {
    /// Reads the whole stream at `path`, given as storage names from the
    /// root.
    ///
    /// # Returns
    ///
    /// [Error::StreamNotFound] if there is no stream at `path`.
    fn read_stream(&mut self, path: &[&str]) -> Result<Vec<u8>>;
}

impl<F: Read + Seek> Container for cfb::CompoundFile<F> {
    fn read_stream(&mut self, path: &[&str]) -> Result<Vec<u8>> {
        let stream_path: PathBuf = std::iter::once("/").chain(path.iter().copied()).collect();
        if !self.is_stream(&stream_path) {
            return Err(Error::StreamNotFound(path.join("/")));
        }

        let mut stream = self.open_stream(&stream_path)?;
        let mut buffer = Vec::new();
        stream.read_to_end(&mut buffer)?;
        Ok(buffer)
    }
}

/// Replaces every line break in a component description with one space.
pub fn sanitize_description(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\r', '\n'], " ")
}

/// The parts of one schematic library, in header order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Library {
    parts: Vec<(String, Part)>,
    declared_count: Option<usize>,
}

impl Library {
    /// Opens and decodes a SchLib file.
    pub fn from_filename<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = cfb::open(path)?;
        Self::from_container(&mut file)
    }

    /// Decodes a SchLib file from any seekable reader.
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut file = cfb::CompoundFile::open(reader)?;
        Self::from_container(&mut file)
    }

    /// Decodes a library from its container.
    ///
    /// The header signature and minor version are checked first, and a
    /// mismatch fails the whole library. After that, a component that
    /// cannot be read or decoded is logged and left out.
    ///
    /// Components are discovered from index 0 upwards. Discovery stops at
    /// the first index whose `LIBREF` is absent or empty, even if later
    /// indices exist.
    pub fn from_container<C: Container + ?Sized>(container: &mut C) -> Result<Self> {
        let header_data = container.read_stream(&[FILE_HEADER])?;
        let header = Frames::new(&header_data).next().ok_or(Error::EmptyStream)??;
        let header = PropertyMap::from_frame(&header)?;

        header.check("HEADER", Some(SIGNATURE), None)?;
        header.check("MINORVERSION", None, Some(MINOR_VERSION))?;

        let mut library = Library {
            parts: Vec::new(),
            declared_count: header
                .get_int("COMPCOUNT")
                .ok()
                .and_then(|count| usize::try_from(count).ok()),
        };

        let mut index = 0;
        loop {
            let libref = match header.get(&format!("LIBREF{}", index)) {
                Some(libref) if !libref.is_empty() => String::from_utf8_lossy(libref).into_owned(),
                _ => break,
            };
            let description = header
                .get_text(&format!("COMPDESCR{}", index))
                .map(|text| sanitize_description(&text))
                .unwrap_or_default();

            match container
                .read_stream(&[libref.as_str(), DATA])
                .and_then(|data| Part::from_bytes(&data, &description))
            {
                Ok(part) => library.insert(libref, part),
                Err(e) => {
                    tracing::warn!(libref = %libref, index, error = %e, "skipping part");
                }
            }

            index += 1;
        }

        library.report_discovery(&header, index);
        tracing::debug!(parts = library.len(), references = index, "decoded library");

        Ok(library)
    }

    fn insert(&mut self, libref: String, part: Part) {
        match self.parts.iter_mut().find(|(existing, _)| *existing == libref) {
            Some((_, slot)) => *slot = part,
            None => self.parts.push((libref, part)),
        }
    }

    /// Warns when the header names more components than were discovered.
    fn report_discovery(&self, header: &PropertyMap, discovered: usize) {
        let beyond_gap = header
            .iter()
            .filter(|(_, value)| !value.is_empty())
            .filter_map(|(key, _)| key.strip_prefix("LIBREF")?.parse::<usize>().ok())
            .filter(|&n| n > discovered)
            .count();
        if beyond_gap > 0 {
            tracing::warn!(
                discovered,
                beyond_gap,
                "LIBREF numbering has a gap, later components were not read"
            );
        }

        if let Some(declared) = self.declared_count {
            if declared != discovered {
                tracing::warn!(declared, discovered, "COMPCOUNT does not match LIBREF entries");
            }
        }
    }

    /// The number of parts that decoded successfully.
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// The header's `COMPCOUNT`, if it has one.
    pub fn declared_count(&self) -> Option<usize> {
        self.declared_count
    }

    pub fn get(&self, libref: &str) -> Option<&Part> {
        self.parts
            .iter()
            .find(|(existing, _)| existing == libref)
            .map(|(_, part)| part)
    }

    /// Iterates over `(libref, part)` pairs in header order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Part)> {
        self.parts.iter().map(|(libref, part)| (libref.as_str(), part))
    }

    pub fn parts(&self) -> impl Iterator<Item = &Part> {
        self.parts.iter().map(|(_, part)| part)
    }
}
