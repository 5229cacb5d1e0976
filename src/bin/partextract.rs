// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  partextract.rs - Part export tool for Altium SchLib and LibPkg files.
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

use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;

use schlib::export;
use schlib::library::Library;
use schlib::package::Package;
use schlib::part::Part;

/// Extract parts from .SchLib or .LibPkg
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The .SchLib or .LibPkg file to read.
    file: PathBuf,

    /// Extra parameter columns, after id, designator, description and Comment.
    fields: Vec<String>,

    /// The CSV file to write. Defaults to the input file name plus ".csv" in
    /// the current directory.
    #[arg(long, env = "PARTEXTRACT_OUTPUT")]
    output: Option<PathBuf>,
}

fn default_output(file: &Path) -> PathBuf {
    let name = file
        .file_name()
        .unwrap_or_default()
        .to_string_lossy();
    PathBuf::from(format!("{}.csv", name))
}

fn write_csv<'a>(
    output: &Path,
    columns: &[String],
    parts: impl IntoIterator<Item = &'a Part>,
) -> schlib::Result<()> {
    let file = File::create(output)?;
    export::write_parts(file, columns, parts)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let columns = export::columns(&args.fields);
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output(&args.file));

    let extension = args
        .file
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase());

    let result = match extension.as_deref() {
        Some("libpkg") => Package::from_filename(&args.file)
            .and_then(|package| write_csv(&output, &columns, package.parts())),
        Some("schlib") => Library::from_filename(&args.file)
            .and_then(|library| write_csv(&output, &columns, library.parts())),
        _ => {
            eprintln!("Unknown file format {:?}", &args.file);
            return ExitCode::FAILURE;
        }
    };

    match result {
        Ok(()) => {
            tracing::info!(output = %output.display(), "wrote parts");
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("Error exporting file {:?}: {}", &args.file, error);
            ExitCode::FAILURE
        }
    }
}
