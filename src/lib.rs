// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/lib.rs - Part extraction library for Altium SchLib and LibPkg files.
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
 * # `schlib` Crate
 *
 * A library for extracting component definitions from Altium schematic
 * libraries (`.SchLib`) and library packages (`.LibPkg`).
 *
 * A SchLib file is an OLE compound document. This crate provides the
 * pipeline from its streams to a table of parts:
 *
 * 1. [record]: Splits a stream into length-prefixed records.
 * 2. [properties]: Decodes a record into a `KEY=VALUE` property map.
 * 3. [part]: Folds one component's records into a [part::Part].
 * 4. [library]: Discovers and decodes every component of a SchLib file.
 * 5. [package]: Loads every SchLib listed in a LibPkg manifest.
 * 6. [export]: Writes parts as CSV.
 *
 * ## Usage Example
 *
 * ```no_run
 * use schlib::export;
 * use schlib::package::Package;
 *
 * fn main() -> Result<(), Box<dyn std::error::Error>> {
 *     // Load every schematic library in the package
 *     let package = Package::from_filename("Components.LibPkg")?;
 *
 *     // Export the parts with one extra column
 *     let columns = export::columns(&["Value"]);
 *     let output = std::fs::File::create("Components.csv")?;
 *     export::write_parts(output, &columns, package.parts())?;
 *
 *     Ok(())
 * }
 * ```
 */

pub mod error;
pub mod export;
pub mod library;
pub mod package;
pub mod part;
pub mod properties;
pub mod record;

#[cfg(test)]
mod test_util;

pub use error::{Error, Result};
