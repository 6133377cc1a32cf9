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
pub(crate) mod args;

use anyhow::{Context, Error};
use std::io::{BufWriter, Write};

use crate::{args::GlobalOptions, dump_slice, read_file};
use fluxlss::LssDecoder;

pub(crate) fn run(global: &GlobalOptions, params: &args::DecodeCmdParams) -> Result<(), Error> {
    let row_size = params.row_size.unwrap_or(16) as usize;
    let deltas = read_file(&params.in_file)?;
    let decode_params = params.timing.decode_params();

    if !global.silent {
        println!(
            "Decoding {} flux bytes from {} (period: {} horizon: {:?})",
            deltas.len(),
            params.in_file.display(),
            decode_params.period,
            decode_params.horizon
        );
    }

    let result = LssDecoder::decode(&deltas, decode_params)
        .with_context(|| format!("Failed to decode {}", params.in_file.display()))?;

    let mut buf = BufWriter::new(std::io::stdout());

    if params.pulses {
        writeln!(&mut buf, "{}", result.read_pulse_string())?;
    }

    if !global.silent {
        writeln!(&mut buf, "{}", result.stats)?;
    }

    dump_slice(&result.bytes, row_size, &mut buf)?;
    buf.flush()?;
    Ok(())
}
