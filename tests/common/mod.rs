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

    tests/common/mod.rs

    Common support routines for tests
*/
#![allow(dead_code)]

use fluxlss::encode_flux_deltas;

use hex::encode;
use sha1::{Digest, Sha1};

/// Flux ticks per GCR bit cell (4µs at 125ns per tick).
pub const GCR_CELL_TICKS: u64 = 32;

pub fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn compute_slice_hash(slice: &[u8]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(slice);
    let result = hasher.finalize();

    encode(result)
}

/// Synthesize an ideal flux delta stream for a sequence of disk nibbles. Each 1 bit is a flux
/// transition at the start of its cell. The stream begins on the first transition.
pub fn gcr_flux_deltas(nibbles: &[u8]) -> Vec<u8> {
    let mut positions = Vec::new();
    let mut cell = 0u64;
    for nibble in nibbles {
        for bit in (0..8).rev() {
            if nibble & (1 << bit) != 0 {
                positions.push(cell * GCR_CELL_TICKS);
            }
            cell += 1;
        }
    }

    let first = positions.first().copied().unwrap_or(0);
    let positions: Vec<u64> = positions.iter().map(|p| p - first).collect();
    let end_time = cell * GCR_CELL_TICKS - first;

    encode_flux_deltas(&positions, end_time).unwrap()
}
