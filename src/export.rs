// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/export.rs - CSV export of schematic library parts.
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

use std::io::Write;

use crate::error::Result;
use crate::part::Part;

/// Columns every export starts with.
pub const DEFAULT_COLUMNS: [&str; 4] = ["id", "designator", "description", "Comment"];

/// The default columns followed by `extra`.
pub fn columns<S: AsRef<str>>(extra: &[S]) -> Vec<String> {
    DEFAULT_COLUMNS
        .iter()
        .map(|c| c.to_string())
        .chain(extra.iter().map(|c| c.as_ref().to_string()))
        .collect()
}

/// Writes a header row and one row per part.
///
/// Each cell is looked up in [Part::params] by column name. Columns that a
/// part does not have are left empty.
pub fn write_parts<'a, W, I>(writer: W, columns: &[String], parts: I) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a Part>,
{
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(columns)?;

    for part in parts {
        let params = part.params();
        writer.write_record(
            columns
                .iter()
                .map(|column| params.get(column.as_str()).copied().unwrap_or("")),
        )?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn part(id: &str, comment: Option<&str>) -> Part {
        let mut part = Part {
            id: id.to_string(),
            designator: "R?".to_string(),
            description: "Resistor, thick film".to_string(),
            ..Default::default()
        };
        if let Some(comment) = comment {
            part.properties
                .insert("Comment".to_string(), comment.to_string());
        }
        part.properties
            .insert("Tolerance".to_string(), "1%".to_string());
        part
    }

    #[test]
    fn columns_start_with_defaults() {
        assert_eq!(
            columns(&["Value", "Manufacturer"]),
            ["id", "designator", "description", "Comment", "Value", "Manufacturer"]
        );
    }

    #[test]
    fn writes_header_and_rows() {
        let parts = [part("R1", Some("10k")), part("R2", None)];
        let mut out = Vec::new();
        write_parts(&mut out, &columns(&["Tolerance", "Missing"]), &parts).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            [
                "id,designator,description,Comment,Tolerance,Missing",
                "R1,R?,\"Resistor, thick film\",10k,1%,",
                "R2,R?,\"Resistor, thick film\",,1%,",
            ]
        );
    }

    #[test]
    fn writes_header_without_parts() {
        let mut out = Vec::new();
        write_parts(&mut out, &columns::<&str>(&[]), []).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "id,designator,description,Comment\n"
        );
    }
}
