//! Operand resolution for each addressing mode.

use emu_core::Bus;
use log::warn;

use super::{Mc6809, read_word};
use crate::error::CpuError;
use crate::opcodes::{AddressingMode, Instruction};
use crate::run::IllegalOpcodePolicy;

/// A resolved operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    /// Inherent instructions.
    None,
    /// Value taken from the instruction stream.
    Immediate(u16),
    /// Effective address (or branch target for relative mode).
    Address(u16),
}

/// Index register selected by post-byte bits 5-6.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IndexRegister {
    X,
    Y,
    U,
    S,
}

impl IndexRegister {
    const fn from_postbyte(postbyte: u8) -> Self {
        match (postbyte >> 5) & 0x03 {
            0 => Self::X,
            1 => Self::Y,
            2 => Self::U,
            _ => Self::S,
        }
    }
}

impl Mc6809 {
    pub(super) fn fetch_byte<B: Bus>(&mut self, bus: &mut B) -> u8 {
        let value = bus.read(self.regs.pc);
        self.regs.pc = self.regs.pc.wrapping_add(1);
        value
    }

    pub(super) fn fetch_word<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let value = read_word(bus, self.regs.pc);
        self.regs.pc = self.regs.pc.wrapping_add(2);
        value
    }

    /// Consume the operand bytes of `entry` and resolve them.
    ///
    /// Indexed extra cycles are added to `cycles`. `address` is where the
    /// instruction started, for error reporting.
    pub(super) fn resolve_operand<B: Bus>(
        &mut self,
        bus: &mut B,
        entry: &Instruction,
        address: u16,
        cycles: &mut u32,
    ) -> Result<Operand, CpuError> {
        let operand = match entry.mode {
            AddressingMode::Immediate => {
                if entry.operand_len() == 2 {
                    Operand::Immediate(self.fetch_word(bus))
                } else {
                    Operand::Immediate(u16::from(self.fetch_byte(bus)))
                }
            }
            AddressingMode::Direct => {
                let low = self.fetch_byte(bus);
                Operand::Address(u16::from_be_bytes([self.regs.dp, low]))
            }
            AddressingMode::Extended => Operand::Address(self.fetch_word(bus)),
            AddressingMode::Relative => {
                let offset = if entry.operand_len() == 2 {
                    self.fetch_word(bus)
                } else {
                    self.fetch_byte(bus) as i8 as u16
                };
                Operand::Address(self.regs.pc.wrapping_add(offset))
            }
            AddressingMode::Indexed => {
                let (ea, extra) = self.indexed(bus, entry.opcode, address)?;
                *cycles += extra;
                Operand::Address(ea)
            }
            AddressingMode::Inherent | AddressingMode::Variant | AddressingMode::Illegal => {
                Operand::None
            }
        };
        Ok(operand)
    }

    fn index_register(&self, reg: IndexRegister) -> u16 {
        match reg {
            IndexRegister::X => self.regs.x,
            IndexRegister::Y => self.regs.y,
            IndexRegister::U => self.regs.u,
            IndexRegister::S => self.regs.s,
        }
    }

    fn set_index_register(&mut self, reg: IndexRegister, value: u16) {
        match reg {
            IndexRegister::X => self.regs.x = value,
            IndexRegister::Y => self.regs.y = value,
            IndexRegister::U => self.regs.u = value,
            IndexRegister::S => self.regs.s = value,
        }
    }

    /// Decode an indexed post-byte. Returns the effective address and the
    /// cycles on top of the table's base count.
    ///
    /// | post-byte  | form        | extra |
    /// |------------|-------------|-------|
    /// | `0RRnnnnn` | n5,R        | 1     |
    /// | `1RR00000` | ,R+         | 2     |
    /// | `1RRi0001` | ,R++        | 3     |
    /// | `1RR00010` | ,-R         | 2     |
    /// | `1RRi0011` | ,--R        | 3     |
    /// | `1RRi0100` | ,R          | 0     |
    /// | `1RRi0101` | B,R         | 1     |
    /// | `1RRi0110` | A,R         | 1     |
    /// | `1RRi1000` | n8,R        | 1     |
    /// | `1RRi1001` | n16,R       | 4     |
    /// | `1RRi1011` | D,R         | 4     |
    /// | `1xxi1100` | n8,PCR      | 1     |
    /// | `1xxi1101` | n16,PCR     | 5     |
    /// | `1xx11111` | [n16]       | 5     |
    ///
    /// Indirect forms (`i` set) add a pointer fetch and 3 cycles.
    fn indexed<B: Bus>(
        &mut self,
        bus: &mut B,
        opcode: u16,
        address: u16,
    ) -> Result<(u16, u32), CpuError> {
        let postbyte = self.fetch_byte(bus);
        let reg = IndexRegister::from_postbyte(postbyte);
        let base = self.index_register(reg);

        if postbyte & 0x80 == 0 {
            // 5-bit signed offset, sign extended from bit 4
            let offset = ((postbyte << 3) as i8 >> 3) as u16;
            return Ok((base.wrapping_add(offset), 1));
        }

        let indirect = postbyte & 0x10 != 0;
        let (ea, extra) = match postbyte & 0x0F {
            0x00 if !indirect => {
                self.set_index_register(reg, base.wrapping_add(1));
                (base, 2)
            }
            0x01 => {
                self.set_index_register(reg, base.wrapping_add(2));
                (base, 3)
            }
            0x02 if !indirect => {
                let ea = base.wrapping_sub(1);
                self.set_index_register(reg, ea);
                (ea, 2)
            }
            0x03 => {
                let ea = base.wrapping_sub(2);
                self.set_index_register(reg, ea);
                (ea, 3)
            }
            0x04 => (base, 0),
            0x05 => (base.wrapping_add(self.regs.b as i8 as u16), 1),
            0x06 => (base.wrapping_add(self.regs.a as i8 as u16), 1),
            0x08 => {
                let offset = self.fetch_byte(bus) as i8 as u16;
                (base.wrapping_add(offset), 1)
            }
            0x09 => {
                let offset = self.fetch_word(bus);
                (base.wrapping_add(offset), 4)
            }
            0x0B => (base.wrapping_add(self.regs.d()), 4),
            0x0C => {
                let offset = self.fetch_byte(bus) as i8 as u16;
                (self.regs.pc.wrapping_add(offset), 1)
            }
            0x0D => {
                let offset = self.fetch_word(bus);
                (self.regs.pc.wrapping_add(offset), 5)
            }
            0x0F if indirect => (self.fetch_word(bus), 2),
            _ => return self.illegal_postbyte(opcode, address, postbyte, base),
        };

        if indirect {
            Ok((read_word(bus, ea), extra + 3))
        } else {
            Ok((ea, extra))
        }
    }

    /// `[,R+]`, `[,-R]` and the undefined encodings.
    fn illegal_postbyte(
        &mut self,
        opcode: u16,
        address: u16,
        postbyte: u8,
        base: u16,
    ) -> Result<(u16, u32), CpuError> {
        match self.config.illegal_opcode {
            IllegalOpcodePolicy::Fail => {
                self.regs.pc = address;
                Err(CpuError::IllegalOpcode { opcode, address })
            }
            IllegalOpcodePolicy::Ignore => {
                warn!("illegal index post-byte ${postbyte:02X} at ${address:04X}, treated as ,R");
                Ok((base, 0))
            }
        }
    }
}
