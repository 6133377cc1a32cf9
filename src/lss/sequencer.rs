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

use std::{
    fmt,
    fmt::{Display, Formatter},
};

use crate::{
    lss::rom::{Mnemonic, MnemonicTable, SequencerRom, DISK_II_MNEMONICS, DISK_II_SEQUENCER_ROM},
    LssError,
};

/// State nibble the sequencer powers up in.
pub const RESET_STATE: u8 = 0x2;

/// A sequencer ROM entry: the automaton state in the high nibble and the selected command in the
/// low nibble.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SequencerState(u8);

impl SequencerState {
    pub const fn new(state: u8, command: u8) -> Self {
        SequencerState((state & 0x0F) << 4 | (command & 0x0F))
    }

    #[inline]
    pub fn state(&self) -> u8 {
        self.0 >> 4
    }

    #[inline]
    pub fn command(&self) -> u8 {
        self.0 & 0x0F
    }
}

impl From<u8> for SequencerState {
    fn from(value: u8) -> Self {
        SequencerState(value)
    }
}

impl From<SequencerState> for u8 {
    fn from(state: SequencerState) -> Self {
        state.0
    }
}

impl Display for SequencerState {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{:X}/{:X}", self.state(), self.command())
    }
}

/// Emulates the Disk II Logic State Sequencer: a ROM driven state machine and its 8-bit data
/// register.
#[derive(Clone, Debug)]
pub struct Sequencer<'rom> {
    rom: &'rom SequencerRom,
    mnemonics: &'rom MnemonicTable,
    state: SequencerState,
    data_register: u8,
}

impl Default for Sequencer<'static> {
    fn default() -> Self {
        Sequencer::new()
    }
}

impl Sequencer<'static> {
    /// Create a sequencer running the Disk II P6 ROM, in its reset state.
    pub fn new() -> Self {
        Sequencer::with_tables(&DISK_II_SEQUENCER_ROM, &DISK_II_MNEMONICS)
    }
}

impl<'rom> Sequencer<'rom> {
    pub fn with_tables(rom: &'rom SequencerRom, mnemonics: &'rom MnemonicTable) -> Self {
        Sequencer {
            rom,
            mnemonics,
            state: SequencerState::new(RESET_STATE, 0),
            data_register: 0,
        }
    }

    pub fn state(&self) -> SequencerState {
        self.state
    }

    pub fn data_register(&self) -> u8 {
        self.data_register
    }

    /// QA, the most significant bit of the data register.
    #[inline]
    pub fn qa(&self) -> bool {
        self.data_register & 0x80 != 0
    }

    /// Advance the sequencer by one clock.
    ///
    /// QA is sampled before the ROM lookup, and the command selected by the new state is applied
    /// to the data register. Returns the new data register value.
    ///
    /// A command with no implementation here (SR, LD, or a nibble with no command at all) fails
    /// with [LssError::UnsupportedCommand]. The state has advanced but the data register is left
    /// untouched.
    pub fn tick(&mut self, rw_switch: bool, sl_switch: bool, read_pulse: bool) -> Result<u8, LssError> {
        let next = self
            .rom
            .lookup(self.state.into(), rw_switch, sl_switch, read_pulse, self.qa());
        self.state = SequencerState::from(next);

        let mnemonic = self.mnemonics.get(self.state.command());
        match mnemonic {
            Some(Mnemonic::Clr) => self.data_register = 0,
            Some(Mnemonic::Nop) => {}
            Some(Mnemonic::Sl0) => self.data_register <<= 1,
            Some(Mnemonic::Sl1) => self.data_register = self.data_register << 1 | 1,
            Some(Mnemonic::Sr) | Some(Mnemonic::Ld) | None => {
                log::error!(
                    "Sequencer::tick(): state {} selected unsupported command {:?}",
                    self.state,
                    mnemonic
                );
                return Err(LssError::UnsupportedCommand {
                    state: self.state,
                    mnemonic,
                });
            }
        }

        Ok(self.data_register)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a ROM where every address in state row `s` jumps to row `s + 1`, running the commands
    /// of `program` in order.
    fn program_rom(program: &[Mnemonic]) -> SequencerRom {
        let mut rom = [0u8; 256];
        for (i, mnemonic) in program.iter().enumerate() {
            let row = (RESET_STATE as usize + i) & 0x0F;
            let next = (row as u8 + 1) & 0x0F;
            let command = DISK_II_MNEMONICS.nibble_of(*mnemonic).unwrap();
            for col in 0..16 {
                rom[row << 4 | col] = next << 4 | command;
            }
        }
        SequencerRom::new(rom)
    }

    #[test]
    fn new_sequencer_is_reset() {
        let mut first = Sequencer::new();
        first.tick(false, false, true).unwrap();
        first.tick(false, false, true).unwrap();

        let second = Sequencer::new();
        assert_eq!(second.state().state(), 2);
        assert_eq!(second.data_register(), 0);
    }

    #[test]
    fn commands_shift_and_clear() {
        let rom = program_rom(&[Mnemonic::Clr, Mnemonic::Sl1, Mnemonic::Sl1, Mnemonic::Sl0]);
        let mut seq = Sequencer::with_tables(&rom, &DISK_II_MNEMONICS);

        let trace: Vec<u8> = (0..4).map(|_| seq.tick(false, false, false).unwrap()).collect();
        assert_eq!(trace, vec![0, 1, 3, 6]);
        assert_eq!(seq.data_register(), 0b0000_0110);
    }

    #[test]
    fn shifts_truncate_to_eight_bits() {
        let rom = program_rom(&[Mnemonic::Sl1; 9]);
        let mut seq = Sequencer::with_tables(&rom, &DISK_II_MNEMONICS);
        for _ in 0..8 {
            seq.tick(false, false, false).unwrap();
        }
        assert_eq!(seq.data_register(), 0xFF);
        assert!(seq.qa());
        assert_eq!(seq.tick(false, false, false).unwrap(), 0xFF);

        let mut program = vec![Mnemonic::Sl1];
        program.extend([Mnemonic::Sl0; 8]);
        let rom = program_rom(&program);
        let mut seq = Sequencer::with_tables(&rom, &DISK_II_MNEMONICS);
        let last = (0..9).map(|_| seq.tick(false, false, false).unwrap()).last();
        assert_eq!(last, Some(0));
    }

    #[test]
    fn nop_holds_register() {
        let rom = program_rom(&[Mnemonic::Sl1, Mnemonic::Nop, Mnemonic::Nop]);
        let mut seq = Sequencer::with_tables(&rom, &DISK_II_MNEMONICS);
        let trace: Vec<u8> = (0..3).map(|_| seq.tick(false, false, false).unwrap()).collect();
        assert_eq!(trace, vec![1, 1, 1]);
    }

    #[test]
    fn unimplemented_commands_are_errors() {
        for mnemonic in [Mnemonic::Sr, Mnemonic::Ld] {
            let rom = program_rom(&[Mnemonic::Sl1, mnemonic]);
            let mut seq = Sequencer::with_tables(&rom, &DISK_II_MNEMONICS);
            assert_eq!(seq.tick(false, false, false), Ok(1));
            assert!(matches!(
                seq.tick(false, false, false),
                Err(LssError::UnsupportedCommand { mnemonic: Some(m), .. }) if m == mnemonic
            ));
            assert_eq!(seq.data_register(), 1);
        }
    }

    #[test]
    fn undefined_command_nibble_is_an_error() {
        let mut rom = [0u8; 256];
        rom[0x20] = 0x31;
        let rom = SequencerRom::new(rom);
        let mut seq = Sequencer::with_tables(&rom, &DISK_II_MNEMONICS);
        assert_eq!(
            seq.tick(false, false, false),
            Err(LssError::UnsupportedCommand {
                state: SequencerState::from(0x31),
                mnemonic: None,
            })
        );
    }

    #[test]
    fn disk_ii_rom_pulse_from_reset() {
        // A pulse in the reset state jumps to state D and holds the register.
        let mut seq = Sequencer::new();
        assert_eq!(seq.tick(false, false, true), Ok(0));
        assert_eq!(seq.state(), SequencerState::from(0xD8));
    }

    #[test]
    fn shift_load_mode_reaches_sr() {
        let mut seq = Sequencer::new();
        assert!(matches!(
            seq.tick(false, true, false),
            Err(LssError::UnsupportedCommand {
                mnemonic: Some(Mnemonic::Sr),
                ..
            })
        ));
    }

    #[test]
    fn state_display() {
        assert_eq!(SequencerState::from(0xD8).to_string(), "D/8");
        assert_eq!(SequencerState::new(2, 0).state(), 2);
    }
}
