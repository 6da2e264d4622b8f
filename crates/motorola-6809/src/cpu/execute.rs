//! Instruction execution for the 6809.
//!
//! `execute` fetches the opcode (and page prefix), resolves the operand
//! and dispatches on the numeric opcode. ALU results carry every flag they
//! can compute; [`Mc6809::apply_flags`] keeps only what the table entry
//! documents for the opcode.

use emu_core::Bus;
use log::{trace, warn};

use super::interrupts::{SWI_VECTOR, SWI2_VECTOR, SWI3_VECTOR};
use super::{Mc6809, Operand, RESET_VECTOR, read_word, write_word};
use crate::alu;
use crate::error::CpuError;
use crate::flags::{C, F, H, I, N, V, Z};
use crate::opcodes::{Cycles, FlagEffect, FlagEffects, Instruction};
use crate::registers::RegisterName;
use crate::run::IllegalOpcodePolicy;

/// 8-bit operand: immediate value or the byte at the effective address.
fn operand8<B: Bus>(bus: &mut B, operand: Operand) -> u8 {
    match operand {
        Operand::Immediate(value) => value as u8,
        Operand::Address(address) => bus.read(address),
        Operand::None => 0,
    }
}

fn operand16<B: Bus>(bus: &mut B, operand: Operand) -> u16 {
    match operand {
        Operand::Immediate(value) => value,
        Operand::Address(address) => read_word(bus, address),
        Operand::None => 0,
    }
}

/// Effective address of a memory operand.
const fn effective_address(operand: Operand) -> u16 {
    match operand {
        Operand::Address(address) | Operand::Immediate(address) => address,
        Operand::None => 0,
    }
}

/// EXG/TFR register nibble.
const fn selected_register(nibble: u8) -> Option<RegisterName> {
    match nibble {
        0x0 => Some(RegisterName::D),
        0x1 => Some(RegisterName::X),
        0x2 => Some(RegisterName::Y),
        0x3 => Some(RegisterName::U),
        0x4 => Some(RegisterName::S),
        0x5 => Some(RegisterName::Pc),
        0x8 => Some(RegisterName::A),
        0x9 => Some(RegisterName::B),
        0xA => Some(RegisterName::Cc),
        0xB => Some(RegisterName::Dp),
        _ => None,
    }
}

/// Where a read-modify-write instruction operates.
#[derive(Clone, Copy)]
enum Target {
    A,
    B,
    Memory(u16),
}

impl Mc6809 {
    /// Fetch, decode and execute one instruction. Returns cycles used.
    pub(super) fn execute<B: Bus>(&mut self, bus: &mut B) -> Result<u32, CpuError> {
        let address = self.regs.pc;
        let first = self.fetch_byte(bus);
        let opcode = match first {
            0x10 | 0x11 => (u16::from(first) << 8) | u16::from(self.fetch_byte(bus)),
            _ => u16::from(first),
        };

        let entry = self.table.lookup(opcode).filter(|e| !e.is_illegal()).copied();
        let Some(entry) = entry else {
            return self.illegal_opcode(opcode, address);
        };

        if self.config.trace {
            self.trace_instruction(address, &entry);
        }

        let mut cycles = u32::from(entry.cycles.base());
        let operand = self.resolve_operand(bus, &entry, address, &mut cycles)?;
        cycles += match opcode >> 8 {
            0x10 => self.execute_page1(bus, &entry, operand),
            0x11 => self.execute_page2(bus, &entry, operand),
            _ => self.execute_page0(bus, &entry, operand, address)?,
        };
        Ok(cycles)
    }

    fn illegal_opcode(&mut self, opcode: u16, address: u16) -> Result<u32, CpuError> {
        match self.config.illegal_opcode {
            IllegalOpcodePolicy::Fail => {
                self.regs.pc = address;
                Err(CpuError::IllegalOpcode { opcode, address })
            }
            IllegalOpcodePolicy::Ignore => {
                warn!("illegal opcode ${opcode:02X} at ${address:04X} ignored");
                // Prefixed opcodes have consumed both bytes
                Ok(if opcode > 0xFF { 2 } else { 1 })
            }
        }
    }

    fn trace_instruction(&self, address: u16, entry: &Instruction) {
        let r = &self.regs;
        trace!(
            "${address:04X} {:<10} A={:02X} B={:02X} X={:04X} Y={:04X} U={:04X} S={:04X} DP={:02X} CC={}",
            entry.mnemonic,
            r.a,
            r.b,
            r.x,
            r.y,
            r.u,
            r.s,
            r.dp,
            r.cc.describe()
        );
    }

    /// Update CC from `computed` as the table entry documents.
    ///
    /// Affected and special bits are copied from `computed`, cleared and
    /// set bits are forced, everything else is left alone.
    pub(super) fn apply_flags(&mut self, effects: &FlagEffects, computed: u8) {
        let copied = effects.mask_of(FlagEffect::Affected) | effects.mask_of(FlagEffect::Special);
        let cc = &mut self.regs.cc;
        cc.merge(copied, computed);
        cc.clear(effects.mask_of(FlagEffect::Cleared));
        cc.set(effects.mask_of(FlagEffect::Set));
    }

    /// Branch condition from the low nibble of a branch opcode.
    fn condition(&self, op: u8) -> bool {
        let cc = self.regs.cc;
        let n_xor_v = cc.is_set(N) != cc.is_set(V);
        match op & 0x0F {
            0x0 => true,                              // BRA
            0x1 => false,                             // BRN
            0x2 => !cc.is_set(C) && !cc.is_set(Z),    // BHI
            0x3 => cc.is_set(C) || cc.is_set(Z),      // BLS
            0x4 => !cc.is_set(C),                     // BCC
            0x5 => cc.is_set(C),                      // BCS
            0x6 => !cc.is_set(Z),                     // BNE
            0x7 => cc.is_set(Z),                      // BEQ
            0x8 => !cc.is_set(V),                     // BVC
            0x9 => cc.is_set(V),                      // BVS
            0xA => !cc.is_set(N),                     // BPL
            0xB => cc.is_set(N),                      // BMI
            0xC => !n_xor_v,                          // BGE
            0xD => n_xor_v,                           // BLT
            0xE => !cc.is_set(Z) && !n_xor_v,         // BGT
            _ => cc.is_set(Z) || n_xor_v,             // BLE
        }
    }

    // =========================================================================
    // Page 0
    // =========================================================================

    fn execute_page0<B: Bus>(
        &mut self,
        bus: &mut B,
        entry: &Instruction,
        operand: Operand,
        address: u16,
    ) -> Result<u32, CpuError> {
        let op = entry.opcode as u8;
        let flags = &entry.flags;
        let mut extra = 0;

        match op {
            // NEG COM LSR ROR ASR LSL ROL DEC INC TST JMP CLR
            // (direct, A, B, indexed, extended)
            0x00..=0x0F | 0x40..=0x7F => self.read_modify_write(bus, op, flags, operand),

            // NOP - 2 cycles
            0x12 => {}

            // SYNC - 2 cycles, then waits
            0x13 => self.sync(),

            // LBRA - 5 cycles
            0x16 => self.regs.pc = effective_address(operand),

            // LBSR - 9 cycles, BSR - 7 cycles
            0x17 | 0x8D => {
                self.push_s16(bus, self.regs.pc);
                self.regs.pc = effective_address(operand);
            }

            // DAA - 2 cycles
            0x19 => {
                let cc = self.regs.cc;
                let result = alu::daa(self.regs.a, cc.is_set(H), cc.is_set(C));
                self.regs.a = result.value;
                self.apply_flags(flags, result.flags);
            }

            // ORCC #imm - 3 cycles
            0x1A => self.regs.cc.0 |= operand8(bus, operand),

            // ANDCC #imm - 3 cycles
            0x1C => self.regs.cc.0 &= operand8(bus, operand),

            // SEX - 2 cycles
            0x1D => {
                self.regs.a = if self.regs.b & 0x80 != 0 { 0xFF } else { 0x00 };
                self.apply_flags(flags, alu::logic16(self.regs.d()).flags);
            }

            // EXG - 8 cycles, TFR - 7 cycles
            0x1E | 0x1F => {
                let postbyte = operand8(bus, operand);
                self.transfer(postbyte, op == 0x1E, address)?;
            }

            // Bcc - 3 cycles
            0x20..=0x2F => {
                if self.condition(op) {
                    self.regs.pc = effective_address(operand);
                }
            }

            // LEAX, LEAY - 4+ cycles, Z from the result
            0x30 | 0x31 => {
                let ea = effective_address(operand);
                if op == 0x30 {
                    self.regs.x = ea;
                } else {
                    self.regs.y = ea;
                }
                self.apply_flags(flags, alu::logic16(ea).flags);
            }

            // LEAS, LEAU - 4+ cycles
            0x32 => self.regs.s = effective_address(operand),
            0x33 => self.regs.u = effective_address(operand),

            // PSHS, PULS, PSHU, PULU - 5 cycles + 1 per byte
            0x34..=0x37 => {
                let mask = operand8(bus, operand);
                let user = op >= 0x36;
                extra = if op & 0x01 == 0 {
                    self.push_registers(bus, user, mask)
                } else {
                    self.pull_registers(bus, user, mask)
                };
            }

            // RTS - 5 cycles
            0x39 => self.regs.pc = self.pull_s16(bus),

            // ABX - 3 cycles
            0x3A => self.regs.x = self.regs.x.wrapping_add(u16::from(self.regs.b)),

            // RTI - 6 cycles, 15 with the entire state
            0x3B => {
                let entire_state = self.return_from_interrupt(bus);
                if let Cycles::ReturnFromInterrupt { pc_only, entire } = entry.cycles {
                    if entire_state {
                        extra = u32::from(entire - pc_only);
                    }
                }
            }

            // CWAI #imm - 21 cycles, then waits
            0x3C => {
                let mask = operand8(bus, operand);
                self.cwai(bus, mask);
            }

            // MUL - 11 cycles
            0x3D => {
                let result = alu::mul(self.regs.a, self.regs.b);
                self.regs.set_d(result.value);
                self.apply_flags(flags, result.flags);
            }

            // RESET* (undocumented) - 19 cycles
            0x3E => self.software_interrupt(bus, RESET_VECTOR, I | F),

            // SWI - 19 cycles
            0x3F => self.software_interrupt(bus, SWI_VECTOR, I | F),

            // Accumulator and 16-bit register group
            0x80..=0xFF => self.accumulator_group(bus, op, flags, operand),

            _ => {}
        }
        Ok(extra)
    }

    /// The `$00-$0F` and `$40-$7F` groups. The low nibble selects the
    /// operation, bits 4-7 the target.
    fn read_modify_write<B: Bus>(
        &mut self,
        bus: &mut B,
        op: u8,
        flags: &FlagEffects,
        operand: Operand,
    ) {
        let kind = op & 0x0F;
        let target = match op >> 4 {
            0x4 => Target::A,
            0x5 => Target::B,
            _ => Target::Memory(effective_address(operand)),
        };

        // JMP
        if kind == 0x0E {
            self.regs.pc = effective_address(operand);
            return;
        }

        // CLR does not read; reads may have side effects through hooks
        let value = match (kind, target) {
            (0x0F, _) => 0,
            (_, Target::A) => self.regs.a,
            (_, Target::B) => self.regs.b,
            (_, Target::Memory(ea)) => bus.read(ea),
        };

        let carry = self.regs.cc.is_set(C);
        let result = match kind {
            0x0 => alu::neg8(value),
            0x3 => alu::com8(value),
            0x4 => alu::lsr8(value),
            0x6 => alu::ror8(value, carry),
            0x7 => alu::asr8(value),
            0x8 => alu::lsl8(value),
            0x9 => alu::rol8(value, carry),
            0xA => alu::dec8(value),
            0xC => alu::inc8(value),
            // TST and CLR
            _ => alu::logic8(value),
        };
        self.apply_flags(flags, result.flags);

        // TST writes nothing back
        if kind == 0x0D {
            return;
        }
        match target {
            Target::A => self.regs.a = result.value,
            Target::B => self.regs.b = result.value,
            Target::Memory(ea) => bus.write(ea, result.value),
        }
    }

    /// The `$80-$FF` groups: bit 6 picks A or B (or the 16-bit register
    /// pair), bits 4-5 the mode and the low nibble the operation.
    fn accumulator_group<B: Bus>(
        &mut self,
        bus: &mut B,
        op: u8,
        flags: &FlagEffects,
        operand: Operand,
    ) {
        let use_b = op >= 0xC0;
        match op & 0x0F {
            // SUBD / ADDD
            0x3 => {
                let m = operand16(bus, operand);
                let d = self.regs.d();
                let result = if use_b {
                    alu::add16(d, m)
                } else {
                    alu::sub16(d, m)
                };
                self.regs.set_d(result.value);
                self.apply_flags(flags, result.flags);
            }

            // CMPX / LDD
            0xC => {
                let m = operand16(bus, operand);
                if use_b {
                    self.regs.set_d(m);
                    self.apply_flags(flags, alu::logic16(m).flags);
                } else {
                    self.apply_flags(flags, alu::sub16(self.regs.x, m).flags);
                }
            }

            // JSR / STD
            0xD => {
                let ea = effective_address(operand);
                if use_b {
                    let d = self.regs.d();
                    write_word(bus, ea, d);
                    self.apply_flags(flags, alu::logic16(d).flags);
                } else {
                    self.push_s16(bus, self.regs.pc);
                    self.regs.pc = ea;
                }
            }

            // LDX / LDU
            0xE => {
                let m = operand16(bus, operand);
                if use_b {
                    self.regs.u = m;
                } else {
                    self.regs.x = m;
                }
                self.apply_flags(flags, alu::logic16(m).flags);
            }

            // STX / STU
            0xF => {
                let value = if use_b { self.regs.u } else { self.regs.x };
                write_word(bus, effective_address(operand), value);
                self.apply_flags(flags, alu::logic16(value).flags);
            }

            // STA / STB
            0x7 => {
                let value = if use_b { self.regs.b } else { self.regs.a };
                bus.write(effective_address(operand), value);
                self.apply_flags(flags, alu::logic8(value).flags);
            }

            kind => {
                let acc = if use_b { self.regs.b } else { self.regs.a };
                let m = operand8(bus, operand);
                let carry = self.regs.cc.is_set(C);
                let (result, store) = match kind {
                    0x0 => (alu::sub8(acc, m, false), true), // SUB
                    0x1 => (alu::sub8(acc, m, false), false), // CMP
                    0x2 => (alu::sub8(acc, m, carry), true), // SBC
                    0x4 => (alu::logic8(acc & m), true),     // AND
                    0x5 => (alu::logic8(acc & m), false),    // BIT
                    0x6 => (alu::logic8(m), true),           // LD
                    0x8 => (alu::logic8(acc ^ m), true),     // EOR
                    0x9 => (alu::add8(acc, m, carry), true), // ADC
                    0xA => (alu::logic8(acc | m), true),     // OR
                    _ => (alu::add8(acc, m, false), true),   // ADD
                };
                self.apply_flags(flags, result.flags);
                if store {
                    if use_b {
                        self.regs.b = result.value;
                    } else {
                        self.regs.a = result.value;
                    }
                }
            }
        }
    }

    /// EXG (`exchange`) or TFR. Registers must name the same width.
    fn transfer(&mut self, postbyte: u8, exchange: bool, address: u16) -> Result<(), CpuError> {
        let invalid = CpuError::InvalidRegisterSelector { postbyte, address };
        let (Some(src), Some(dst)) = (
            selected_register(postbyte >> 4),
            selected_register(postbyte & 0x0F),
        ) else {
            return Err(invalid);
        };
        if src.is_8bit() != dst.is_8bit() {
            return Err(invalid);
        }

        let src_value = self.regs.get(src);
        let dst_value = self.regs.get(dst);
        self.regs.store(dst, src_value);
        if exchange {
            self.regs.store(src, dst_value);
        }
        Ok(())
    }

    // =========================================================================
    // Page 1 ($10 prefix)
    // =========================================================================

    fn execute_page1<B: Bus>(&mut self, bus: &mut B, entry: &Instruction, operand: Operand) -> u32 {
        let op = entry.opcode as u8;
        let flags = &entry.flags;

        match op {
            // LBcc - 5 cycles, 6 when taken
            0x21..=0x2F => {
                if self.condition(op) {
                    self.regs.pc = effective_address(operand);
                    if let Cycles::Branch { not_taken, taken } = entry.cycles {
                        return u32::from(taken - not_taken);
                    }
                }
            }

            // SWI2 - 20 cycles
            0x3F => self.software_interrupt(bus, SWI2_VECTOR, 0),

            _ => match op & 0x0F {
                // CMPD
                0x3 => {
                    let m = operand16(bus, operand);
                    self.apply_flags(flags, alu::sub16(self.regs.d(), m).flags);
                }
                // CMPY
                0xC => {
                    let m = operand16(bus, operand);
                    self.apply_flags(flags, alu::sub16(self.regs.y, m).flags);
                }
                // LDY / LDS
                0xE => {
                    let m = operand16(bus, operand);
                    if op >= 0xC0 {
                        self.regs.s = m;
                    } else {
                        self.regs.y = m;
                    }
                    self.apply_flags(flags, alu::logic16(m).flags);
                }
                // STY / STS
                _ => {
                    let value = if op >= 0xC0 { self.regs.s } else { self.regs.y };
                    write_word(bus, effective_address(operand), value);
                    self.apply_flags(flags, alu::logic16(value).flags);
                }
            },
        }
        0
    }

    // =========================================================================
    // Page 2 ($11 prefix)
    // =========================================================================

    fn execute_page2<B: Bus>(&mut self, bus: &mut B, entry: &Instruction, operand: Operand) -> u32 {
        let op = entry.opcode as u8;

        match op {
            // SWI3 - 20 cycles
            0x3F => self.software_interrupt(bus, SWI3_VECTOR, 0),

            // CMPU / CMPS
            _ => {
                let m = operand16(bus, operand);
                let reg = if op & 0x0F == 0x03 { self.regs.u } else { self.regs.s };
                self.apply_flags(&entry.flags, alu::sub16(reg, m).flags);
            }
        }
        0
    }
}
