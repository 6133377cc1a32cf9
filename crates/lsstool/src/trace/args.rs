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
use crate::args::*;
use bpaf::{construct, long, Parser};
use std::path::PathBuf;

#[derive(Clone, Debug)]
pub(crate) struct TraceParams {
    pub(crate) in_file: PathBuf,
    pub(crate) timing: TimingOptions,
    pub(crate) start: u64,
    pub(crate) count: Option<u64>,
}

pub(crate) fn trace_parser() -> impl Parser<TraceParams> {
    let in_file = in_file_parser();
    let timing = timing_parser();
    let start = long("start")
        .argument::<u64>("TICK")
        .help("First sequencer tick to print")
        .fallback(0);
    let count = long("count")
        .argument::<u64>("TICKS")
        .help("Number of sequencer ticks to print")
        .optional();

    construct!(TraceParams {
        in_file,
        timing,
        start,
        count
    })
}
