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
use bit_vec::BitVec;
use std::io::{BufWriter, Write};

use crate::{args::GlobalOptions, read_file};
use fluxlss::{DecodeParams, FluxTimeline, LssDecoder};

pub(crate) fn run(global: &GlobalOptions, params: &args::TraceParams) -> Result<(), Error> {
    let deltas = read_file(&params.in_file)?;
    let timeline = FluxTimeline::from_deltas(&deltas)
        .with_context(|| format!("Failed to read flux timeline from {}", params.in_file.display()))?;

    if !global.silent {
        println!(
            "Flux timeline: {} intervals, {} pulses, {} flux ticks",
            timeline.intervals().len(),
            timeline.pulse_ct(),
            timeline.end_time()
        );
    }

    let mut buf = BufWriter::new(std::io::stdout());
    write_trace(
        &timeline,
        params.timing.decode_params(),
        params.start,
        params.count,
        !global.silent,
        &mut buf,
    )?;
    buf.flush()?;
    Ok(())
}

/// Write a line per sequencer tick in `[start, start + count)`, followed by the read pulse line
/// over the same ticks as a string of '0' and '1'.
pub(crate) fn write_trace<W: Write>(
    timeline: &FluxTimeline,
    decode_params: DecodeParams,
    start: u64,
    count: Option<u64>,
    header: bool,
    out: &mut W,
) -> Result<(), Error> {
    let decoder = LssDecoder::new(timeline, decode_params)?;
    let end = count.map(|count| start.saturating_add(count));

    if header {
        writeln!(out, "  tick     flux P S/C DR")?;
    }

    let mut read_pulses = BitVec::new();
    for record in decoder {
        let record = record.context("Sequencer stopped")?;
        if record.tick < start {
            continue;
        }
        if matches!(end, Some(end) if record.tick >= end) {
            break;
        }
        writeln!(out, "{}", record)?;
        read_pulses.push(record.read_pulse);
    }

    let pulse_string: String = read_pulses.iter().map(|p| if p { '1' } else { '0' }).collect();
    writeln!(out, "Read pulses: {}", pulse_string)?;
    Ok(())
}
