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

//! The Disk II Logic State Sequencer ROM (P6) and its command decode.
//!
//! The ROM is addressed by `state << 4 | rw << 3 | sl << 2 | read_pulse << 1 | qa` (Sather, 9-44):
//!   A1 - QA, the MSB of the data register
//!   A2 - SHIFT/LOAD, the $C08C,X/$C08D,X switch
//!   A3 - READ/WRITE, the $C08E,X/$C08F,X switch
//!   A4 - The read pulse from the drive
//!
//! Each entry holds the next state in the high nibble and the command to execute in the low nibble.

use std::ops::Index;

/// Commands the sequencer can apply to its data register.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, strum::EnumIter, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Mnemonic {
    #[strum(to_string = "CLR")]
    Clr,
    #[strum(to_string = "NOP")]
    Nop,
    #[strum(to_string = "SL0")]
    Sl0,
    #[strum(to_string = "SL1")]
    Sl1,
    /// Shift right, write protect into the MSB. Only reachable with SHIFT/LOAD high.
    #[strum(to_string = "SR")]
    Sr,
    /// Load the data register from the data bus. Only reachable with SHIFT/LOAD and READ/WRITE high.
    #[strum(to_string = "LD")]
    Ld,
}

/// Maps the low nibble of a ROM entry to its command. Nibbles with no command are `None`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MnemonicTable([Option<Mnemonic>; 16]);

impl MnemonicTable {
    pub const fn new(table: [Option<Mnemonic>; 16]) -> Self {
        MnemonicTable(table)
    }

    #[inline]
    pub fn get(&self, nibble: u8) -> Option<Mnemonic> {
        self.0[(nibble & 0x0F) as usize]
    }

    /// Low nibble assigned to `mnemonic`, if any.
    pub fn nibble_of(&self, mnemonic: Mnemonic) -> Option<u8> {
        self.0.iter().position(|m| *m == Some(mnemonic)).map(|n| n as u8)
    }
}

/// A 256 entry sequencer ROM image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SequencerRom([u8; 256]);

impl SequencerRom {
    pub const fn new(rom: [u8; 256]) -> Self {
        SequencerRom(rom)
    }

    /// Compose a ROM address from the current state and the four input lines.
    #[inline]
    pub fn address(state: u8, rw_switch: bool, sl_switch: bool, read_pulse: bool, qa: bool) -> u8 {
        (state & 0xF0) | (rw_switch as u8) << 3 | (sl_switch as u8) << 2 | (read_pulse as u8) << 1 | qa as u8
    }

    #[inline]
    pub fn lookup(&self, state: u8, rw_switch: bool, sl_switch: bool, read_pulse: bool, qa: bool) -> u8 {
        self.0[Self::address(state, rw_switch, sl_switch, read_pulse, qa) as usize]
    }
}

impl Index<u8> for SequencerRom {
    type Output = u8;

    fn index(&self, address: u8) -> &u8 {
        &self.0[address as usize]
    }
}

pub static DISK_II_MNEMONICS: MnemonicTable = MnemonicTable::new([
    Some(Mnemonic::Clr), // 0
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    Some(Mnemonic::Nop), // 8
    Some(Mnemonic::Sl0), // 9
    Some(Mnemonic::Sr),  // A
    Some(Mnemonic::Ld),  // B
    None,
    Some(Mnemonic::Sl1), // D
    None,
    None,
]);

#[rustfmt::skip]
pub static DISK_II_SEQUENCER_ROM: SequencerRom = SequencerRom::new([
    0x18, 0x18, 0x18, 0x18, 0x0A, 0x0A, 0x0A, 0x0A, 0x18, 0x18, 0x18, 0x18, 0x18, 0x18, 0x18, 0x18, // 0
    0x2D, 0x38, 0x2D, 0x38, 0x0A, 0x0A, 0x0A, 0x0A, 0x28, 0x28, 0x28, 0x28, 0x28, 0x28, 0x28, 0x28, // 1
    0x38, 0x28, 0xD8, 0x08, 0x0A, 0x0A, 0x0A, 0x0A, 0x39, 0x39, 0x39, 0x39, 0x3B, 0x3B, 0x3B, 0x3B, // 2
    0x48, 0x48, 0xD8, 0x48, 0x0A, 0x0A, 0x0A, 0x0A, 0x48, 0x48, 0x48, 0x48, 0x48, 0x48, 0x48, 0x48, // 3
    0x58, 0x58, 0xD8, 0xD8, 0x0A, 0x0A, 0x0A, 0x0A, 0x58, 0x58, 0x58, 0x58, 0x58, 0x58, 0x58, 0x58, // 4
    0x68, 0x68, 0xD8, 0xD8, 0x0A, 0x0A, 0x0A, 0x0A, 0x68, 0x68, 0x68, 0x68, 0x68, 0x68, 0x68, 0x68, // 5
    0x78, 0x78, 0xD8, 0xD8, 0x0A, 0x0A, 0x0A, 0x0A, 0x78, 0x78, 0x78, 0x78, 0x78, 0x78, 0x78, 0x78, // 6
    0x88, 0x88, 0xD8, 0xD8, 0x0A, 0x0A, 0x0A, 0x0A, 0x08, 0x88, 0x08, 0x88, 0x08, 0x88, 0x08, 0x88, // 7
    0x98, 0x98, 0xD8, 0xD8, 0x0A, 0x0A, 0x0A, 0x0A, 0x98, 0x98, 0x98, 0x98, 0x98, 0x98, 0x98, 0x98, // 8
    0x29, 0xA8, 0xD8, 0xD8, 0x0A, 0x0A, 0x0A, 0x0A, 0xA8, 0xA8, 0xA8, 0xA8, 0xA8, 0xA8, 0xA8, 0xA8, // 9
    0xBD, 0xB8, 0xCD, 0xD8, 0x0A, 0x0A, 0x0A, 0x0A, 0xB9, 0xB9, 0xB9, 0xB9, 0xBB, 0xBB, 0xBB, 0xBB, // A
    0x59, 0xC8, 0xD9, 0xD8, 0x0A, 0x0A, 0x0A, 0x0A, 0xC8, 0xC8, 0xC8, 0xC8, 0xC8, 0xC8, 0xC8, 0xC8, // B
    0xD9, 0xA0, 0xD9, 0xD8, 0x0A, 0x0A, 0x0A, 0x0A, 0xD8, 0xD8, 0xD8, 0xD8, 0xD8, 0xD8, 0xD8, 0xD8, // C
    0x08, 0xE8, 0xD8, 0xE8, 0x0A, 0x0A, 0x0A, 0x0A, 0xE8, 0xE8, 0xE8, 0xE8, 0xE8, 0xE8, 0xE8, 0xE8, // D
    0xFD, 0xF8, 0xFD, 0xF8, 0x0A, 0x0A, 0x0A, 0x0A, 0xF8, 0xF8, 0xF8, 0xF8, 0xF8, 0xF8, 0xF8, 0xF8, // E
    0x4D, 0xE0, 0xDD, 0xE0, 0x0A, 0x0A, 0x0A, 0x0A, 0x88, 0x08, 0x88, 0x08, 0x88, 0x08, 0x88, 0x08, // F
]);

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn address_packs_input_lines() {
        assert_eq!(SequencerRom::address(0x2D, false, false, false, false), 0x20);
        assert_eq!(SequencerRom::address(0x20, true, false, false, false), 0x28);
        assert_eq!(SequencerRom::address(0x20, false, true, false, false), 0x24);
        assert_eq!(SequencerRom::address(0x20, false, false, true, false), 0x22);
        assert_eq!(SequencerRom::address(0xF0, true, true, true, true), 0xFF);
    }

    #[test]
    fn rom_lookup() {
        assert_eq!(DISK_II_SEQUENCER_ROM.lookup(0x20, false, false, true, false), 0xD8);
        assert_eq!(DISK_II_SEQUENCER_ROM[0xC1], 0xA0);
        assert_eq!(DISK_II_SEQUENCER_ROM[0xFF], 0x08);
    }

    #[test]
    fn every_mnemonic_has_a_nibble() {
        for mnemonic in Mnemonic::iter() {
            let nibble = DISK_II_MNEMONICS.nibble_of(mnemonic).unwrap();
            assert_eq!(DISK_II_MNEMONICS.get(nibble), Some(mnemonic));
        }
        assert_eq!(DISK_II_MNEMONICS.get(0x01), None);
        assert_eq!(Mnemonic::Sl1.to_string(), "SL1");
    }

    #[test]
    fn read_mode_selects_only_implemented_commands() {
        // With READ/WRITE and SHIFT/LOAD low, only columns 0-3 of each row are addressable.
        for state in 0..16u8 {
            for low in 0..4u8 {
                let entry = DISK_II_SEQUENCER_ROM[state << 4 | low];
                let mnemonic = DISK_II_MNEMONICS.get(entry & 0x0F);
                assert!(
                    matches!(
                        mnemonic,
                        Some(Mnemonic::Clr | Mnemonic::Nop | Mnemonic::Sl0 | Mnemonic::Sl1)
                    ),
                    "state {:X} column {} selects {:?}",
                    state,
                    low,
                    mnemonic
                );
            }
        }
    }

    #[test]
    fn shift_load_selects_unimplemented_commands() {
        assert_eq!(
            DISK_II_MNEMONICS.get(DISK_II_SEQUENCER_ROM.lookup(0x00, false, true, false, false)),
            Some(Mnemonic::Sr)
        );
        assert_eq!(
            DISK_II_MNEMONICS.get(DISK_II_SEQUENCER_ROM.lookup(0x20, true, true, false, false)),
            Some(Mnemonic::Ld)
        );
    }
}
