// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  recdump.rs - Record dump tool for Altium compound-document streams.
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

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use schlib::library::{Container, FILE_HEADER};
use schlib::properties::PropertyMap;
use schlib::record::{FrameKind, Frames};

/// Print the records of one stream of an Altium compound document
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The file to read.
    file: PathBuf,

    /// The stream to dump, with storages separated by '/'.
    #[arg(long, default_value = FILE_HEADER)]
    stream: String,
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

    let mut file = match cfb::open(&args.file) {
        Ok(file) => file,
        Err(error) => {
            eprintln!("Error opening file {:?}: {}", &args.file, error);
            return ExitCode::FAILURE;
        }
    };

    let path: Vec<&str> = args.stream.split('/').filter(|s| !s.is_empty()).collect();
    let data = match file.read_stream(&path) {
        Ok(data) => data,
        Err(error) => {
            eprintln!("Error reading stream {:?}: {}", &args.stream, error);
            return ExitCode::FAILURE;
        }
    };

    for (i, frame) in Frames::new(&data).enumerate() {
        let label = match i {
            0 => "Header".to_string(),
            i => format!("{}", i - 1),
        };

        let frame = match frame {
            Ok(frame) => frame,
            Err(error) => {
                eprintln!("{}: {}", label, error);
                return ExitCode::FAILURE;
            }
        };

        match frame.kind {
            FrameKind::Properties => match PropertyMap::from_frame(&frame) {
                Ok(props) => {
                    let mut entries: Vec<(&str, &[u8])> = props.iter().collect();
                    entries.sort();
                    let text: Vec<String> = entries
                        .into_iter()
                        .map(|(key, value)| format!("{}={}", key, String::from_utf8_lossy(value)))
                        .collect();
                    println!("{}: |{}", label, text.join("|"));
                }
                Err(error) => println!("{}: {}", label, error),
            },
            kind => println!("{}: {:?}, {} bytes", label, kind, frame.body.len()),
        }
    }

    ExitCode::SUCCESS
}
