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

//! The decode pipeline: flux deltas in, recovered bytes out.
//!
//! [LssDecoder] walks a [FluxTimeline] one sequencer tick at a time. Each tick samples the read
//! pulse line, clocks the sequencer and offers the new data register to the byte extractor. A tick
//! is the unit of state change, so a caller that wants to stop early can simply stop pulling ticks
//! from the decoder.

use std::{
    fmt,
    fmt::{Display, Formatter},
};

use bit_vec::BitVec;

use crate::{
    flux::{sampler::ClockDomainSampler, timeline::FluxTimeline, FLUX_TICK_RES},
    format_us,
    lss::{BitstreamExtractor, Sequencer, SequencerState},
    LssError,
};

/// Flux ticks per sequencer tick. The LSS runs at 2MHz against a 125ns flux tick.
pub const DEFAULT_LSS_PERIOD: u64 = 4;
/// Default decode horizon, in flux ticks.
pub const DEFAULT_HORIZON: u64 = 1280;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DecodeParams {
    /// Flux ticks per sequencer tick.
    pub period: u64,
    /// Last flux tick a sequencer tick window may cover. `None` decodes the whole timeline.
    pub horizon: Option<u64>,
    /// READ/WRITE control line, held for the whole run.
    pub rw_switch: bool,
    /// SHIFT/LOAD control line, held for the whole run.
    pub sl_switch: bool,
    /// If set, a timeline that ends before `horizon` is an error rather than the end of the run.
    pub strict_horizon: bool,
}

impl Default for DecodeParams {
    fn default() -> Self {
        DecodeParams {
            period: DEFAULT_LSS_PERIOD,
            horizon: Some(DEFAULT_HORIZON),
            rw_switch: false,
            sl_switch: false,
            strict_horizon: false,
        }
    }
}

impl DecodeParams {
    pub fn with_period(mut self, period: u64) -> Self {
        self.period = period;
        self
    }

    pub fn with_horizon(mut self, horizon: Option<u64>) -> Self {
        self.horizon = horizon;
        self
    }

    pub fn with_strict_horizon(mut self, strict: bool) -> Self {
        self.strict_horizon = strict;
        self
    }

    pub fn with_switches(mut self, rw_switch: bool, sl_switch: bool) -> Self {
        self.rw_switch = rw_switch;
        self.sl_switch = sl_switch;
        self
    }

    pub fn validate(&self) -> Result<(), LssError> {
        if self.period == 0 {
            return Err(LssError::ParameterError("sequencer tick period must be non-zero".to_string()));
        }
        if matches!(self.horizon, Some(h) if h < self.period - 1) {
            return Err(LssError::ParameterError(format!(
                "horizon {:?} is shorter than a single tick of {} flux ticks",
                self.horizon, self.period
            )));
        }
        Ok(())
    }
}

/// The observable result of a single sequencer tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickRecord {
    pub tick: u64,
    /// Flux time at the start of this tick's window.
    pub flux_time: u64,
    pub read_pulse: bool,
    pub state: SequencerState,
    pub data_register: u8,
    /// Set if this tick completed a byte.
    pub byte: Option<u8>,
}

impl Display for TickRecord {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(
            f,
            "{:>6} {:>8} {} {} {:02X}",
            self.tick, self.flux_time, self.read_pulse as u8, self.state, self.data_register
        )?;
        if let Some(byte) = self.byte {
            write!(f, " <{:02X}>", byte)?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LssDecodeStats {
    pub ticks: u64,
    /// Sequencer time at the end of the run, in flux ticks.
    pub lss_time: u64,
    /// Flux time covered by the run.
    pub flux_time: u64,
    /// Index of the interval the sampler finished on.
    pub interval_idx: usize,
    pub intervals: usize,
    pub pulses: usize,
    /// Ticks that observed a read pulse.
    pub pulse_ticks: u64,
    pub bytes: usize,
}

impl Display for LssDecodeStats {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(
            f,
            "Ticks: {} LSS time: {} Flux time: {} ({}) Interval: {}/{} Pulses: {} Pulse ticks: {} Bytes: {}",
            self.ticks,
            self.lss_time,
            self.flux_time,
            format_us!(self.flux_time as f64 * FLUX_TICK_RES),
            self.interval_idx,
            self.intervals,
            self.pulses,
            self.pulse_ticks,
            self.bytes
        )
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LssDecodeResult {
    /// Recovered bytes in the order they completed.
    pub bytes: Vec<u8>,
    /// Read pulse line as sampled on each tick.
    pub read_pulses: BitVec,
    /// Data register after each tick.
    pub registers: Vec<u8>,
    pub stats: LssDecodeStats,
}

impl LssDecodeResult {
    /// Per-tick `(read_pulse, data_register)` pairs.
    pub fn trace(&self) -> impl Iterator<Item = (bool, u8)> + '_ {
        self.read_pulses.iter().zip(self.registers.iter().copied())
    }

    /// The read pulse line as a string of '0' and '1', one character per tick.
    pub fn read_pulse_string(&self) -> String {
        self.read_pulses.iter().map(|p| if p { '1' } else { '0' }).collect()
    }
}

pub struct LssDecoder<'a> {
    timeline: &'a FluxTimeline,
    params: DecodeParams,
    sampler: ClockDomainSampler<'a>,
    sequencer: Sequencer<'a>,
    extractor: BitstreamExtractor,
    tick: u64,
    done: bool,
}

impl<'a> LssDecoder<'a> {
    /// Decode a run-length flux delta stream with the Disk II sequencer ROM.
    pub fn decode(deltas: &[u8], params: DecodeParams) -> Result<LssDecodeResult, LssError> {
        let timeline = FluxTimeline::from_deltas(deltas)?;
        LssDecoder::new(&timeline, params)?.run()
    }

    pub fn new(timeline: &'a FluxTimeline, params: DecodeParams) -> Result<Self, LssError> {
        LssDecoder::with_sequencer(timeline, params, Sequencer::new())
    }

    /// Create a decoder driving the supplied sequencer, which may carry its own ROM tables.
    pub fn with_sequencer(
        timeline: &'a FluxTimeline,
        params: DecodeParams,
        sequencer: Sequencer<'a>,
    ) -> Result<Self, LssError> {
        params.validate()?;
        let sampler = ClockDomainSampler::new(timeline.intervals(), timeline.end_time(), params.period)?;

        log::debug!(
            "LssDecoder::new(): {} intervals, {} flux ticks, period: {} horizon: {:?} strict: {}",
            timeline.intervals().len(),
            timeline.end_time(),
            params.period,
            params.horizon,
            params.strict_horizon
        );

        Ok(LssDecoder {
            timeline,
            params,
            sampler,
            sequencer,
            extractor: BitstreamExtractor::new(),
            tick: 0,
            done: false,
        })
    }

    pub fn sequencer(&self) -> &Sequencer<'a> {
        &self.sequencer
    }

    /// Number of ticks completed so far.
    pub fn tick_ct(&self) -> u64 {
        self.tick
    }

    /// Run one sequencer tick. Returns `Ok(None)` once the horizon or the end of the timeline is
    /// reached.
    pub fn step(&mut self) -> Result<Option<TickRecord>, LssError> {
        if self.done {
            return Ok(None);
        }

        let Some((flux_time, window_end)) = self.sampler.window(self.tick)
        else {
            // Past representable flux time, so past the end of any timeline.
            return self.timeline_exhausted(LssError::TimelineExhausted {
                tick: self.tick,
                flux_time: self.timeline.end_time(),
            });
        };
        if matches!(self.params.horizon, Some(horizon) if window_end > horizon) {
            log::debug!("LssDecoder::step(): reached horizon at tick {}", self.tick);
            self.done = true;
            return Ok(None);
        }

        let read_pulse = match self.sampler.sample(self.tick) {
            Ok(read_pulse) => read_pulse,
            Err(e @ LssError::TimelineExhausted { .. }) => return self.timeline_exhausted(e),
            Err(e) => {
                self.done = true;
                return Err(e);
            }
        };

        let data_register = match self
            .sequencer
            .tick(self.params.rw_switch, self.params.sl_switch, read_pulse)
        {
            Ok(data_register) => data_register,
            Err(e) => {
                self.done = true;
                return Err(e);
            }
        };

        let record = TickRecord {
            tick: self.tick,
            flux_time,
            read_pulse,
            state: self.sequencer.state(),
            data_register,
            byte: self.extractor.push(data_register),
        };
        log::trace!("LssDecoder::step(): {}", record);

        self.tick += 1;
        Ok(Some(record))
    }

    /// Running out of timeline ends the run, unless a strict horizon says there should have been more.
    fn timeline_exhausted(&mut self, e: LssError) -> Result<Option<TickRecord>, LssError> {
        self.done = true;
        if self.params.strict_horizon && self.params.horizon.is_some() {
            log::error!("LssDecoder::step(): {}", e);
            return Err(e);
        }
        log::debug!("LssDecoder::step(): timeline exhausted at tick {}", self.tick);
        Ok(None)
    }

    /// Decode until the horizon or the end of the timeline.
    pub fn run(mut self) -> Result<LssDecodeResult, LssError> {
        let mut result = LssDecodeResult::default();

        while let Some(record) = self.step()? {
            result.read_pulses.push(record.read_pulse);
            result.registers.push(record.data_register);
            if let Some(byte) = record.byte {
                result.bytes.push(byte);
            }
        }

        let lss_time = self.tick.saturating_mul(self.params.period);
        result.stats = LssDecodeStats {
            ticks: self.tick,
            lss_time,
            flux_time: lss_time.min(self.timeline.end_time()),
            interval_idx: self.sampler.cursor(),
            intervals: self.timeline.intervals().len(),
            pulses: self.timeline.pulse_ct(),
            pulse_ticks: result.read_pulses.iter().filter(|p| *p).count() as u64,
            bytes: result.bytes.len(),
        };

        log::debug!("LssDecoder::run(): {}", result.stats);
        Ok(result)
    }
}

impl Iterator for LssDecoder<'_> {
    type Item = Result<TickRecord, LssError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.step().transpose()
    }
}
