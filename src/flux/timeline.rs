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

//! Build a timeline of read pulses from run-length flux delta bytes.
//!
//! Each byte of the stream is the number of ticks since the previous flux transition. The value
//! 255 is a carry: keep adding bytes until one below 255 arrives, so 255, 255, 10 is a single
//! transition 520 ticks after the previous one.
//!
//! The MC3470 raises its read pulse at the start of each accumulated window, so each delta `n`
//! becomes a [READ_PULSE_WIDTH] tick `Pulse` followed by an `n - 8` tick `Gap`.

use crate::{
    flux::{SignalInterval, FLUX_CONTINUATION, FLUX_TICK_RES, READ_PULSE_WIDTH},
    format_us,
    LssError,
};

/// An ordered, gapless sequence of [SignalInterval]s beginning at flux time 0.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FluxTimeline {
    intervals: Vec<SignalInterval>,
    end_time: u64,
}

impl FluxTimeline {
    /// Decode a run-length flux delta stream.
    ///
    /// Fails with [LssError::MalformedFluxStream] if any accumulated count is shorter than a
    /// read pulse, as no valid interval can represent it.
    pub fn from_deltas(deltas: &[u8]) -> Result<FluxTimeline, LssError> {
        let mut intervals = Vec::with_capacity(deltas.len() * 2);
        let mut time_offset: u64 = 0;
        let mut count: u64 = 0;

        for (offset, &byte) in deltas.iter().enumerate() {
            count += byte as u64;
            if byte == FLUX_CONTINUATION {
                continue;
            }

            if count < READ_PULSE_WIDTH {
                log::error!(
                    "FluxTimeline::from_deltas(): count of {} at offset {} cannot hold a read pulse",
                    count,
                    offset
                );
                return Err(LssError::MalformedFluxStream { offset, count });
            }

            intervals.push(SignalInterval::pulse(time_offset));
            if count > READ_PULSE_WIDTH {
                intervals.push(SignalInterval::gap(
                    time_offset + READ_PULSE_WIDTH,
                    count - READ_PULSE_WIDTH,
                ));
            }
            time_offset += count;
            count = 0;
        }

        if count > 0 {
            log::warn!(
                "FluxTimeline::from_deltas(): stream ended inside a continuation run, discarding {} ticks",
                count
            );
        }

        log::debug!(
            "FluxTimeline::from_deltas(): {} bytes -> {} intervals over {} ticks ({})",
            deltas.len(),
            intervals.len(),
            time_offset,
            format_us!(time_offset as f64 * FLUX_TICK_RES)
        );

        Ok(FluxTimeline {
            intervals,
            end_time: time_offset,
        })
    }

    pub fn intervals(&self) -> &[SignalInterval] {
        &self.intervals
    }

    /// First flux tick past the end of the timeline.
    pub fn end_time(&self) -> u64 {
        self.end_time
    }

    pub fn duration_secs(&self) -> f64 {
        self.end_time as f64 * FLUX_TICK_RES
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn pulse_ct(&self) -> usize {
        self.intervals.iter().filter(|i| i.is_pulse()).count()
    }

    /// Start times of every read pulse, in order.
    pub fn pulse_positions(&self) -> impl Iterator<Item = u64> + '_ {
        self.intervals.iter().filter(|i| i.is_pulse()).map(|i| i.start_time)
    }
}

/// Encode read pulse start times back into a run-length flux delta stream.
///
/// `positions` must start at 0 and be strictly increasing with at least [READ_PULSE_WIDTH] ticks
/// between pulses; `end_time` closes the final window and must likewise leave room for the last
/// pulse. Long windows are split into 255 carry bytes.
pub fn encode_flux_deltas(positions: &[u64], end_time: u64) -> Result<Vec<u8>, LssError> {
    match positions.first() {
        None => return Ok(Vec::new()),
        Some(0) => {}
        Some(first) => {
            return Err(LssError::ParameterError(format!(
                "first pulse must be at time 0, not {}",
                first
            )))
        }
    }

    let mut deltas = Vec::with_capacity(positions.len());
    let window_ends = positions.iter().skip(1).copied().chain(std::iter::once(end_time));

    for (&start, end) in positions.iter().zip(window_ends) {
        if end < start + READ_PULSE_WIDTH {
            return Err(LssError::ParameterError(format!(
                "pulse at {} is followed by {} after only {} ticks",
                start,
                end,
                end.saturating_sub(start)
            )));
        }

        let mut remaining = end - start;
        // A remainder of exactly 255 would read back as a carry, so keep one byte in reserve.
        while remaining >= FLUX_CONTINUATION as u64 {
            deltas.push(FLUX_CONTINUATION);
            remaining -= FLUX_CONTINUATION as u64;
        }
        deltas.push(remaining as u8);
    }

    Ok(deltas)
}
