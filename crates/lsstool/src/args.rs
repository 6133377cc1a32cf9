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

use bpaf::*;
use std::{
    fmt::{self, Display, Formatter},
    path::PathBuf,
};

use fluxlss::DecodeParams;

use crate::{
    decode::args::{decode_parser, DecodeCmdParams},
    trace::args::{trace_parser, TraceParams},
};

#[derive(Clone, Debug)]
pub(crate) enum Command {
    Version,
    Decode(DecodeCmdParams),
    Trace(TraceParams),
}

impl Display for Command {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Command::Version => write!(f, "version"),
            Command::Decode(_) => write!(f, "decode"),
            Command::Trace(_) => write!(f, "trace"),
        }
    }
}

#[derive(Debug)]
pub(crate) struct AppParams {
    pub(crate) global: GlobalOptions,
    pub(crate) command: Command,
}

#[derive(Debug)]
pub(crate) struct GlobalOptions {
    pub(crate) silent: bool,
}

pub(crate) fn global_options_parser() -> impl Parser<GlobalOptions> {
    let silent = long("silent")
        .help("Suppress all output except required output")
        .switch(); // Switch returns a bool, true if the flag is present

    construct!(GlobalOptions { silent })
}

pub(crate) fn in_file_parser() -> impl Parser<PathBuf> {
    long("in_file")
        .short('i')
        .argument::<PathBuf>("IN_FILE")
        .help("Path to a raw flux delta stream")
}

/// Sequencer timing options shared by every decoding command.
#[derive(Clone, Debug)]
pub(crate) struct TimingOptions {
    pub(crate) period: u64,
    pub(crate) horizon: Option<u64>,
    pub(crate) no_horizon: bool,
    pub(crate) strict: bool,
}

impl TimingOptions {
    pub(crate) fn decode_params(&self) -> DecodeParams {
        let defaults = DecodeParams::default();
        let horizon = match (self.no_horizon, self.horizon) {
            (true, _) => None,
            (false, Some(horizon)) => Some(horizon),
            (false, None) => defaults.horizon,
        };
        defaults
            .with_period(self.period)
            .with_horizon(horizon)
            .with_strict_horizon(self.strict)
    }
}

pub(crate) fn timing_parser() -> impl Parser<TimingOptions> {
    let period = long("period")
        .argument::<u64>("TICKS")
        .help("Flux ticks per sequencer tick (default 4)")
        .guard(|&period| period > 0, "Period must be greater than 0")
        .fallback(fluxlss::decoder::DEFAULT_LSS_PERIOD);
    let horizon = long("horizon")
        .argument::<u64>("FLUX_TIME")
        .help("Stop before a sequencer tick would pass this flux time (default 1280)")
        .optional();
    let no_horizon = long("no-horizon")
        .help("Decode the whole stream")
        .switch();
    let strict = long("strict")
        .help("Fail if the stream ends before the horizon")
        .switch();

    construct!(TimingOptions {
        period,
        horizon,
        no_horizon,
        strict
    })
}

pub(crate) fn command_parser() -> impl Parser<AppParams> {
    let global = global_options_parser();

    let version = pure(Command::Version)
        .to_options()
        .command("version")
        .help("Display version information and exit");

    let decode = construct!(Command::Decode(decode_parser()))
        .to_options()
        .command("decode")
        .help("Decode a flux stream into disk bytes");
    let trace = construct!(Command::Trace(trace_parser()))
        .to_options()
        .command("trace")
        .help("Print the sequencer state for each tick of a flux stream");

    let command = construct!([version, decode, trace]);

    construct!(AppParams { global, command })
}
