// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/package.rs - Reader for Altium LibPkg integrated library packages.
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
 * # `package` Module
 *
 * A LibPkg file is an INI-style manifest. Its `[Design]` section carries the
 * manifest version and every `[DocumentN]` section names one source
 * document by its `DocumentPath`, relative to the manifest:
 *
 * ```text
 * [Design]
 * Version=1.0
 *
 * [Document1]
 * DocumentPath=Symbols\Passives.SchLib
 * ```
 *
 * [Package] loads every `.SchLib` document it lists. A library that cannot
 * be read is logged and left out, so one broken file does not hide the
 * others.
 *
 * ## Usage Example
 *
 * ```no_run
 * use schlib::package::Package;
 *
 * fn main() -> Result<(), Box<dyn std::error::Error>> {
 *     let package = Package::from_filename("Components.LibPkg")?;
 *
 *     for (name, library) in package.libraries() {
 *         println!("{}: {} parts", name, library.len());
 *     }
 *
 *     Ok(())
 * }
 * ```
 */

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::library::Library;
use crate::part::Part;

/// The only manifest version this reader understands.
pub const MANIFEST_VERSION: &str = "1.0";

const BYTE_ORDER_MARK: char = '\u{FEFF}';

/// One `[Name]` section of a manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    /// The section name, as written.
    pub name: String,
    entries: HashMap<String, String>,
}

impl Section {
    /// Returns the value of `key`. Keys are case-insensitive.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .get(&key.to_ascii_lowercase())
            .map(String::as_str)
    }
}

/// A parsed LibPkg manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    sections: Vec<Section>,
}

impl Manifest {
    /// Parses manifest text.
    ///
    /// Blank lines and lines starting with `;` or `#` are ignored. Keys are
    /// separated from values by the first `=` or `:`.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(text);
        let mut sections: Vec<Section> = Vec::new();

        for (line_num, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
                continue;
            }

            if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                let name = name.trim();
                if sections.iter().any(|s| s.name == name) {
                    return Err(Error::Manifest(format!(
                        "line {}: duplicate section [{}]",
                        line_num + 1,
                        name
                    )));
                }
                sections.push(Section {
                    name: name.to_string(),
                    entries: HashMap::new(),
                });
                continue;
            }

            let section = sections.last_mut().ok_or_else(|| {
                Error::Manifest(format!("line {}: entry before any section", line_num + 1))
            })?;
            let (key, value) = line
                .find(['=', ':'])
                .map(|split| (&line[..split], &line[split + 1..]))
                .ok_or_else(|| {
                    Error::Manifest(format!("line {}: expected key=value", line_num + 1))
                })?;
            section
                .entries
                .insert(key.trim().to_ascii_lowercase(), value.trim().to_string());
        }

        Ok(Self { sections })
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// The `Version` of the `[Design]` section.
    pub fn version(&self) -> Option<&str> {
        self.section("Design")?.get("Version")
    }

    /// The `[Document...]` sections, in file order.
    pub fn documents(&self) -> impl Iterator<Item = &Section> {
        self.sections
            .iter()
            .filter(|s| s.name.starts_with("Document"))
    }

    /// Checks that the manifest has a `[Design]` section of a known version.
    pub fn validate(&self) -> Result<()> {
        match self.version() {
            Some(MANIFEST_VERSION) => Ok(()),
            Some(other) => Err(Error::Manifest(format!(
                "unsupported LibPkg version {:?}",
                other
            ))),
            None => Err(Error::Manifest("missing [Design] Version".to_string())),
        }
    }
}

/// Turns a `DocumentPath` into a path relative to `dir`.
fn resolve_document(dir: &Path, document_path: &str) -> PathBuf {
    dir.join(document_path.replace('\\', "/"))
}

fn is_schlib(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("schlib"))
}

/// A LibPkg manifest and the schematic libraries it lists.
#[derive(Debug, Clone)]
pub struct Package {
    /// The directory containing the manifest.
    pub dir: PathBuf,
    /// The file name of the manifest.
    pub name: String,
    pub manifest: Manifest,
    libraries: Vec<(String, Library)>,
}

impl Package {
    /// Reads a LibPkg manifest and loads its schematic libraries.
    pub fn from_filename<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let manifest = Manifest::parse(&fs::read_to_string(path)?)?;
        let dir = path.parent().unwrap_or_else(|| Path::new(".")).to_path_buf();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self::from_manifest(dir, name, manifest)
    }

    /// Loads the schematic libraries of an already parsed manifest.
    ///
    /// Document paths are resolved against `dir`.
    pub fn from_manifest(dir: PathBuf, name: String, manifest: Manifest) -> Result<Self> {
        manifest.validate()?;

        let mut libraries: Vec<(String, Library)> = Vec::new();
        for document in manifest.documents() {
            let Some(document_path) = document.get("DocumentPath") else {
                tracing::warn!(section = %document.name, "document has no DocumentPath");
                continue;
            };

            let path = resolve_document(&dir, document_path);
            if !is_schlib(&path) {
                continue;
            }

            let key = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            match Library::from_filename(&path) {
                Ok(library) => {
                    tracing::info!(path = %path.display(), parts = library.len(), "loaded library");
                    match libraries.iter_mut().find(|(existing, _)| *existing == key) {
                        Some((_, slot)) => *slot = library,
                        None => libraries.push((key, library)),
                    }
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping library");
                }
            }
        }

        Ok(Self {
            dir,
            name,
            manifest,
            libraries,
        })
    }

    /// The `[Document...]` sections of the manifest.
    pub fn list_documents(&self) -> Vec<&Section> {
        self.manifest.documents().collect()
    }

    /// Iterates over `(file name, library)` pairs in manifest order.
    pub fn libraries(&self) -> impl Iterator<Item = (&str, &Library)> {
        self.libraries
            .iter()
            .map(|(name, library)| (name.as_str(), library))
    }

    pub fn library(&self, name: &str) -> Option<&Library> {
        self.libraries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, library)| library)
    }

    /// Every part of every library, library by library.
    pub fn parts(&self) -> impl Iterator<Item = &Part> {
        self.libraries.iter().flat_map(|(_, library)| library.parts())
    }
}
