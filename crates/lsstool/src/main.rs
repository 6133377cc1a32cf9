/*
    FluxFox - lsstool
    https://github.com/dbalsom/fluxfox

    Copyright 2024 Daniel Balsom

    Permission is hereby granted, free of charge, to any person obtaining a
    copy of this software and associated documentation files (the “Software”),
    to deal in the Software without restriction, including without limitation
    the rights to use, copy, modify, merge, publish, distribute, sublicense,
    and/or sell copies of the Software, and to permit persons to whom the
    Software is furnished to do so, subject to the following conditions:

    The above copyright notice and this permission notice shall be included in
    all copies or substantial portions of the Software.

    THE SOFTWARE IS PROVIDED “AS IS”, WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
    IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
    FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
    AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
    LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
    FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
    DEALINGS IN THE SOFTWARE.

    --------------------------------------------------------------------------
*/

pub mod args;
pub mod decode;
pub mod trace;

use anyhow::{Context, Error};
use bpaf::Parser;
use std::path::Path;

use crate::args::Command;
use args::command_parser;

fn main() -> Result<(), Error> {
    env_logger::init();

    let app_params = command_parser().run();

    let command_result = match &app_params.command {
        Command::Version => {
            println!("lsstool v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Command::Decode(params) => decode::run(&app_params.global, params),
        Command::Trace(params) => trace::run(&app_params.global, params),
    };

    match command_result {
        Ok(_) => Ok(()),
        Err(e) => {
            eprintln!("Command '{}' failed: {}", app_params.command, e);
            for cause in e.chain().skip(1) {
                eprintln!("Caused by: {}", cause);
            }
            std::process::exit(1);
        }
    }
}

/// Read a raw run-length flux delta stream.
pub(crate) fn read_file(path: &Path) -> Result<Vec<u8>, Error> {
    let buffer = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    log::debug!("read_file(): read {} bytes from {}", buffer.len(), path.display());
    Ok(buffer)
}

/// Write `data` as rows of hex bytes prefixed with their offset.
pub(crate) fn dump_slice<W: std::io::Write>(data: &[u8], row_size: usize, out: &mut W) -> std::io::Result<()> {
    for (row_idx, row) in data.chunks(row_size).enumerate() {
        write!(out, "{:05X} |", row_idx * row_size)?;
        for byte in row {
            write!(out, " {:02X}", byte)?;
        }
        writeln!(out)?;
    }
    Ok(())
}
