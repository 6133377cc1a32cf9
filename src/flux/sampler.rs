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

//! Carry the flux timeline into the sequencer's clock domain.
//!
//! The LSS is clocked at 2MHz, so with 125ns flux ticks it samples its read pulse input once every
//! 4 flux ticks. Tick `n` covers the flux window `[n * period, n * period + period - 1]`, and sees
//! a read pulse if any flux tick of that window falls inside a `Pulse` interval. Pulses are
//! shorter than a window is wide in some configurations, so a point sample would drop them.

use crate::{flux::SignalInterval, LssError};

/// Returns true if any tick of the inclusive window `[first, last]` is covered by a read pulse.
///
/// This is the stateless form of [ClockDomainSampler::sample]; it locates the window with a
/// binary search instead of a cursor.
pub fn window_has_pulse(intervals: &[SignalInterval], first: u64, last: u64) -> bool {
    let start_idx = intervals.partition_point(|i| i.end_time() <= first);
    intervals[start_idx..]
        .iter()
        .take_while(|i| i.start_time <= last)
        .any(|i| i.is_pulse())
}

/// Walks a timeline and the tick clock together. The interval cursor only moves forward while
/// ticks are requested in increasing order, so a full pass costs O(intervals + ticks).
pub struct ClockDomainSampler<'a> {
    intervals: &'a [SignalInterval],
    end_time: u64,
    period: u64,
    cursor: usize,
    last_tick: Option<u64>,
}

impl<'a> ClockDomainSampler<'a> {
    /// Create a sampler over `intervals`, which must be contiguous from time 0 and end at
    /// `end_time`. `period` is the number of flux ticks per sequencer tick.
    pub fn new(intervals: &'a [SignalInterval], end_time: u64, period: u64) -> Result<Self, LssError> {
        if period == 0 {
            return Err(LssError::ParameterError("sequencer tick period must be non-zero".to_string()));
        }
        Ok(ClockDomainSampler {
            intervals,
            end_time,
            period,
            cursor: 0,
            last_tick: None,
        })
    }

    /// Number of ticks whose window starts inside the timeline.
    pub fn tick_ct(&self) -> u64 {
        self.end_time.div_ceil(self.period)
    }

    /// Inclusive flux window covered by sequencer tick `tick`, or `None` if the window starts past
    /// the end of representable flux time. A window whose end would overflow ends at `u64::MAX`.
    #[inline]
    pub fn window(&self, tick: u64) -> Option<(u64, u64)> {
        let first = tick.checked_mul(self.period)?;
        Some((first, first.saturating_add(self.period - 1)))
    }

    /// Index of the interval the cursor currently rests on.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Sample the read pulse line for sequencer tick `tick`.
    ///
    /// Returns [LssError::TimelineExhausted] if the tick window starts at or past the end of the
    /// timeline. A window that runs past the end is sampled over the part that exists.
    pub fn sample(&mut self, tick: u64) -> Result<bool, LssError> {
        let (first, last) = match self.window(tick) {
            Some((first, last)) if first < self.end_time => (first, last),
            _ => {
                return Err(LssError::TimelineExhausted {
                    tick,
                    flux_time: self.end_time,
                })
            }
        };

        if matches!(self.last_tick, Some(prev) if tick < prev) {
            // Sampling backwards. Reseek rather than rescan.
            self.cursor = self.intervals.partition_point(|i| i.end_time() <= first);
        }
        self.last_tick = Some(tick);

        while self.cursor < self.intervals.len() && self.intervals[self.cursor].end_time() <= first {
            self.cursor += 1;
        }

        let mut read_pulse = false;
        for interval in self.intervals[self.cursor..].iter() {
            if interval.start_time > last {
                break;
            }
            if interval.is_pulse() {
                read_pulse = true;
                break;
            }
        }

        log::trace!(
            "ClockDomainSampler::sample(): tick {} window [{}, {}] cursor {} pulse {}",
            tick,
            first,
            last,
            self.cursor,
            read_pulse
        );
        Ok(read_pulse)
    }
}

impl Iterator for ClockDomainSampler<'_> {
    type Item = bool;

    /// Sample successive ticks, starting after the last tick sampled, until the timeline ends.
    fn next(&mut self) -> Option<bool> {
        let tick = self.last_tick.map_or(0, |t| t + 1);
        self.sample(tick).ok()
    }
}
