/*
    FluxFox - fluxlss
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

//! # fluxlss
//!
//! fluxlss recovers Apple II disk bytes from a raw flux timing trace by emulating the two hardware
//! stages of the Disk II controller that perform the decode: the MC3470 pulse-detection front end
//! and the Logic State Sequencer (LSS), a 16-state ROM-driven automaton with an 8-bit data register.
//!
//! The decode pipeline is:
//!
//! ```text
//! flux deltas -> FluxTimeline -> ClockDomainSampler -> Sequencer -> BitstreamExtractor -> bytes
//! ```
//!
//! Most callers only need [`LssDecoder`]:
//!
//! ```no_run
//! use fluxlss::prelude::*;
//!
//! let deltas = std::fs::read("track.bin").unwrap();
//! let result = LssDecoder::decode(&deltas, DecodeParams::default()).unwrap();
//! println!("{}", result.stats);
//! ```

pub mod decoder;
pub mod flux;
pub mod lss;

use thiserror::Error;

use crate::lss::{Mnemonic, SequencerState};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LssError {
    #[error("Malformed flux stream: accumulated count {count} at byte offset {offset} is shorter than a read pulse")]
    MalformedFluxStream { offset: usize, count: u64 },
    #[error("Flux timeline exhausted at tick {tick} (timeline ends at flux time {flux_time})")]
    TimelineExhausted { tick: u64, flux_time: u64 },
    #[error("Sequencer selected an unsupported command {} in state {state}", display_mnemonic(.mnemonic))]
    UnsupportedCommand { state: SequencerState, mnemonic: Option<Mnemonic> },
    #[error("Invalid parameters were specified to a library function: {0}")]
    ParameterError(String),
}

fn display_mnemonic(mnemonic: &Option<Mnemonic>) -> String {
    match mnemonic {
        Some(m) => m.to_string(),
        None => "<undefined>".to_string(),
    }
}

pub use crate::{
    decoder::{DecodeParams, LssDecodeResult, LssDecodeStats, LssDecoder, TickRecord},
    flux::{
        sampler::ClockDomainSampler,
        timeline::{encode_flux_deltas, FluxTimeline},
        SignalInterval,
        SignalKind,
    },
    lss::{BitstreamExtractor, Sequencer},
};

pub mod prelude {
    pub use crate::{
        decoder::{DecodeParams, LssDecodeResult, LssDecodeStats, LssDecoder, TickRecord},
        flux::{sampler::ClockDomainSampler, timeline::FluxTimeline, SignalInterval, SignalKind},
        lss::{BitstreamExtractor, Mnemonic, Sequencer, SequencerState},
        LssError,
    };
}
