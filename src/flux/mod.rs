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

//! Types shared by the flux front end: the timeline of read pulses built from a run-length flux
//! delta stream, and the sampler that carries that timeline into the sequencer's clock domain.
//!
//! All times in this module are counted in flux ticks. Apple II flux captures (WOZ/MOOF) use a
//! tick of 125ns, see [FLUX_TICK_RES].

use std::{
    fmt,
    fmt::{Display, Formatter},
};

pub mod sampler;
pub mod timeline;

/// Duration of a single flux tick in seconds.
pub const FLUX_TICK_RES: f64 = 125e-9;
/// Width of a read pulse emitted by the MC3470 front end, in flux ticks (1µs).
pub const READ_PULSE_WIDTH: u64 = 8;
/// A run-length byte of this value carries 255 ticks into the next byte instead of ending a
/// flux transition.
pub const FLUX_CONTINUATION: u8 = 255;

#[doc(hidden)]
#[macro_export]
macro_rules! format_us {
    ($value:expr) => {
        format!("{:.4}μs", $value * 1_000_000.0)
    };
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SignalKind {
    /// The front end is asserting a read pulse.
    Pulse,
    /// No signal.
    Gap,
}

impl Display for SignalKind {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            SignalKind::Pulse => write!(f, "RP"),
            SignalKind::Gap => write!(f, "NO_SIG"),
        }
    }
}

/// A span of flux time during which the front end output is constant.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SignalInterval {
    pub start_time: u64,
    pub kind: SignalKind,
    pub duration: u64,
}

impl SignalInterval {
    pub fn pulse(start_time: u64) -> Self {
        SignalInterval {
            start_time,
            kind: SignalKind::Pulse,
            duration: READ_PULSE_WIDTH,
        }
    }

    pub fn gap(start_time: u64, duration: u64) -> Self {
        SignalInterval {
            start_time,
            kind: SignalKind::Gap,
            duration,
        }
    }

    /// First flux tick after this interval.
    #[inline]
    pub fn end_time(&self) -> u64 {
        self.start_time + self.duration
    }

    #[inline]
    pub fn is_pulse(&self) -> bool {
        matches!(self.kind, SignalKind::Pulse)
    }

    /// Returns true if any tick of the inclusive window `[first, last]` falls inside this interval.
    #[inline]
    pub fn overlaps(&self, first: u64, last: u64) -> bool {
        self.start_time <= last && self.end_time() > first
    }
}

impl Display for SignalInterval {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "[{}+{} {}]", self.start_time, self.duration, self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pulse_has_fixed_width() {
        let pulse = SignalInterval::pulse(12);
        assert!(pulse.is_pulse());
        assert_eq!(pulse.duration, READ_PULSE_WIDTH);
        assert_eq!(pulse.end_time(), 20);
    }

    #[test]
    fn overlap_is_inclusive_of_window_edges() {
        let pulse = SignalInterval::pulse(12);
        assert!(pulse.overlaps(8, 12));
        assert!(pulse.overlaps(19, 22));
        assert!(!pulse.overlaps(8, 11));
        assert!(!pulse.overlaps(20, 23));
    }

    #[test]
    fn interval_display() {
        assert_eq!(SignalInterval::gap(8, 4).to_string(), "[8+4 NO_SIG]");
    }
}
