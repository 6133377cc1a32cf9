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

//! Recover bytes from the sequencer's data register.
//!
//! Disk II data is written so that every byte has its high bit set, and the LSS shifts bits in
//! from the right. A byte is therefore complete the first tick bit 7 of the register reads as 1;
//! it stays set until the sequencer clears the register for the next byte, and is reported once.

/// Tracks the QA latch across register snapshots and reports each completed byte once.
#[derive(Clone, Debug, Default)]
pub struct BitstreamExtractor {
    latched: bool,
}

impl BitstreamExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one data register snapshot, returning the byte if this snapshot completes one.
    #[inline]
    pub fn push(&mut self, data_register: u8) -> Option<u8> {
        if data_register & 0x80 == 0 {
            self.latched = false;
            None
        }
        else if !self.latched {
            self.latched = true;
            Some(data_register)
        }
        else {
            None
        }
    }

    pub fn is_latched(&self) -> bool {
        self.latched
    }

    /// Lazily extract bytes from an iterator of register snapshots.
    pub fn extract<I>(registers: I) -> ExtractBytes<I::IntoIter>
    where
        I: IntoIterator<Item = u8>,
    {
        ExtractBytes {
            registers: registers.into_iter(),
            extractor: BitstreamExtractor::new(),
        }
    }
}

/// Iterator returned by [BitstreamExtractor::extract].
pub struct ExtractBytes<I> {
    registers: I,
    extractor: BitstreamExtractor,
}

impl<I: Iterator<Item = u8>> Iterator for ExtractBytes<I> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        for register in self.registers.by_ref() {
            if let Some(byte) = self.extractor.push(register) {
                return Some(byte);
            }
        }
        None
    }
}
