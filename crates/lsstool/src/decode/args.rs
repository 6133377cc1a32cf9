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
pub(crate) struct DecodeCmdParams {
    pub(crate) in_file: PathBuf,
    pub(crate) timing: TimingOptions,
    pub(crate) row_size: Option<u8>,
    pub(crate) pulses: bool,
}

fn row_size_parser() -> impl Parser<u8> {
    long("row-size")
        .argument::<u8>("SIZE")
        .help("Specify the number of bytes per row to be dumped")
        .guard(|&size| (8..=128).contains(&size), "Size must be between 8 and 128")
}

fn pulses_parser() -> impl Parser<bool> {
    long("pulses")
        .help("Also print the read pulse line, one digit per sequencer tick")
        .switch()
}

pub(crate) fn decode_parser() -> impl Parser<DecodeCmdParams> {
    let in_file = in_file_parser();
    let timing = timing_parser();
    let row_size = row_size_parser().optional();
    let pulses = pulses_parser();

    construct!(DecodeCmdParams {
        in_file,
        timing,
        row_size,
        pulses
    })
}
