//! 6809 instruction table.
//!
//! One entry per opcode across the three opcode pages (plain, `$10`
//! prefixed, `$11` prefixed). The table is built at compile time from the
//! documented rows below; flag columns are parsed into [`FlagEffects`]
//! while building, so a malformed row is a compile error.
//!
//! The CPU only reads this table: base cycles, instruction length and the
//! addressing mode that selects how operand bytes are resolved.

use thiserror::Error;

use AddressingMode::{Direct, Extended, Immediate, Indexed, Inherent, Relative, Variant};

/// Operand addressing modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AddressingMode {
    /// Operand bytes follow the opcode.
    Immediate,
    /// Effective address is DP:next byte.
    Direct,
    /// Post-byte selects base register, offset and indirection.
    Indexed,
    /// Effective address is the next two bytes.
    Extended,
    /// No operand.
    Inherent,
    /// Signed displacement added to PC after the instruction.
    Relative,
    /// Page prefix byte ($10/$11).
    Variant,
    /// Undefined opcode.
    Illegal,
}

/// Base cycle count of an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cycles {
    Fixed(u8),
    /// Long conditional branch: one extra cycle when taken.
    Branch { not_taken: u8, taken: u8 },
    /// RTI: fast frame (CC, PC) or entire frame.
    ReturnFromInterrupt { pc_only: u8, entire: u8 },
}

impl Cycles {
    /// Smallest cycle count the instruction can take.
    #[must_use]
    pub const fn base(self) -> u8 {
        match self {
            Self::Fixed(n) => n,
            Self::Branch { not_taken, .. } => not_taken,
            Self::ReturnFromInterrupt { pc_only, .. } => pc_only,
        }
    }
}

/// Documented effect of an instruction on one condition code bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagEffect {
    /// `-`: never touched.
    Unaffected,
    /// `a`: computed from the result.
    Affected,
    /// `0`: always cleared.
    Cleared,
    /// `1`: always set.
    Set,
    /// `u`: undefined; this core leaves the bit alone.
    Undefined,
    /// `s`: instruction specific (shift carry, prefix, reset).
    Special,
    /// `d`: taken from the operand (ANDCC, ORCC, CWAI).
    FromOperand,
    /// `c`: depends on the register post-byte (EXG, TFR, PULS, PULU).
    Complex,
}

impl FlagEffect {
    const fn parse(symbol: u8) -> Self {
        match symbol {
            b'-' => Self::Unaffected,
            b'a' => Self::Affected,
            b'0' => Self::Cleared,
            b'1' => Self::Set,
            b'u' | b'n' => Self::Undefined,
            b's' | b'+' | b'*' => Self::Special,
            b'd' => Self::FromOperand,
            b'c' => Self::Complex,
            _ => panic!("unknown flag effect symbol in instruction table"),
        }
    }
}

/// Effects on H, N, Z, V and C.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagEffects {
    pub h: FlagEffect,
    pub n: FlagEffect,
    pub z: FlagEffect,
    pub v: FlagEffect,
    pub c: FlagEffect,
}

impl FlagEffects {
    /// Parse a five-letter `HNZVC` column such as `"-aa0-"`.
    #[must_use]
    pub const fn parse(column: &str) -> Self {
        let bytes = column.as_bytes();
        assert!(bytes.len() == 5, "flag column must have five symbols");
        Self {
            h: FlagEffect::parse(bytes[0]),
            n: FlagEffect::parse(bytes[1]),
            z: FlagEffect::parse(bytes[2]),
            v: FlagEffect::parse(bytes[3]),
            c: FlagEffect::parse(bytes[4]),
        }
    }

    /// The five effects paired with their CC bit, in `HNZVC` order.
    #[must_use]
    pub const fn by_bit(&self) -> [(u8, FlagEffect); 5] {
        [
            (crate::flags::H, self.h),
            (crate::flags::N, self.n),
            (crate::flags::Z, self.z),
            (crate::flags::V, self.v),
            (crate::flags::C, self.c),
        ]
    }

    /// Mask of bits with the given effect.
    #[must_use]
    pub fn mask_of(&self, effect: FlagEffect) -> u8 {
        self.by_bit()
            .iter()
            .filter(|(_, e)| *e == effect)
            .fold(0, |mask, (bit, _)| mask | bit)
    }
}

/// One instruction table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    /// Opcode including page prefix (`$10xx`, `$11xx`).
    pub opcode: u16,
    pub mnemonic: &'static str,
    pub mode: AddressingMode,
    pub cycles: Cycles,
    /// Length including prefix and opcode; indexed extension bytes excluded.
    pub bytes: u8,
    pub flags: FlagEffects,
}

impl Instruction {
    /// Number of opcode bytes (2 when page prefixed).
    #[must_use]
    pub const fn opcode_len(&self) -> u8 {
        if self.opcode > 0xFF { 2 } else { 1 }
    }

    /// Operand bytes following the opcode, as documented.
    #[must_use]
    pub const fn operand_len(&self) -> u8 {
        self.bytes - self.opcode_len()
    }

    #[must_use]
    pub const fn is_illegal(&self) -> bool {
        matches!(self.mode, AddressingMode::Illegal)
    }
}

/// Instruction table inconsistency, found when a CPU is built on a table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("no table entry for opcode ${0:02X}")]
    UnknownOpcode(u16),

    #[error("opcode ${0:04X} is listed twice")]
    DuplicateOpcode(u16),

    #[error("opcode ${opcode:04X} is listed as {listed:?} but decodes as {decoded:?}")]
    ModeMismatch {
        opcode: u16,
        listed: AddressingMode,
        decoded: AddressingMode,
    },

    #[error("opcode ${opcode:04X} is listed with {listed} bytes, its mode needs {expected}")]
    LengthMismatch { opcode: u16, listed: u8, expected: u8 },

    #[error("opcode ${0:04X} is listed but the CPU has no implementation for it")]
    Unimplemented(u16),
}

const PAGE_SIZE: usize = 0x100;

/// Slot of an opcode in the flat table, if it is on a known page.
const fn slot(opcode: u16) -> Option<usize> {
    let low = (opcode & 0xFF) as usize;
    match opcode >> 8 {
        0x00 => Some(low),
        0x10 => Some(PAGE_SIZE + low),
        0x11 => Some(2 * PAGE_SIZE + low),
        _ => None,
    }
}

/// Opcode lookup keyed by numeric opcode.
#[derive(Debug, Clone)]
pub struct InstructionTable {
    entries: [Option<Instruction>; 3 * PAGE_SIZE],
}

static STANDARD: InstructionTable = InstructionTable::from_rows(ROWS);

impl InstructionTable {
    /// The documented 6809 instruction set.
    #[must_use]
    pub fn standard() -> &'static Self {
        &STANDARD
    }

    /// Build a table from rows. Panics (at compile time when used in a
    /// constant) on duplicate opcodes or opcodes outside the three pages.
    #[must_use]
    pub const fn from_rows(rows: &[Instruction]) -> Self {
        let mut entries = [None; 3 * PAGE_SIZE];
        let mut i = 0;
        while i < rows.len() {
            let Some(index) = slot(rows[i].opcode) else {
                panic!("opcode outside pages 0, $10 and $11");
            };
            assert!(entries[index].is_none(), "opcode listed twice");
            entries[index] = Some(rows[i]);
            i += 1;
        }
        Self { entries }
    }

    /// Build a table from rows without panicking.
    pub fn try_from_rows(rows: &[Instruction]) -> Result<Self, TableError> {
        let mut entries = [None; 3 * PAGE_SIZE];
        for row in rows {
            let index = slot(row.opcode).ok_or(TableError::UnknownOpcode(row.opcode))?;
            if entries[index].is_some() {
                return Err(TableError::DuplicateOpcode(row.opcode));
            }
            entries[index] = Some(*row);
        }
        Ok(Self { entries })
    }

    /// Look up an opcode (`$00xx`, `$10xx` or `$11xx`).
    #[must_use]
    pub fn lookup(&self, opcode: u16) -> Option<&Instruction> {
        slot(opcode).and_then(|index| self.entries[index].as_ref())
    }

    /// All entries in opcode order.
    pub fn iter(&self) -> impl Iterator<Item = &Instruction> {
        self.entries.iter().flatten()
    }

    /// Check that the table agrees with the decoder.
    ///
    /// Every plain opcode must have an entry (legal or illegal), and each
    /// legal entry must be one the CPU executes, with the addressing mode
    /// and length the decoder uses for that opcode.
    pub fn validate(&self) -> Result<(), TableError> {
        for opcode in 0..=0xFF_u16 {
            if self.lookup(opcode).is_none() {
                return Err(TableError::UnknownOpcode(opcode));
            }
        }
        for entry in self.iter().filter(|e| !e.is_illegal()) {
            if !implemented(entry.opcode) {
                return Err(TableError::Unimplemented(entry.opcode));
            }
            let decoded = decoded_mode(entry.opcode);
            if decoded != Some(entry.mode) {
                return Err(TableError::ModeMismatch {
                    opcode: entry.opcode,
                    listed: entry.mode,
                    decoded: decoded.unwrap_or(AddressingMode::Illegal),
                });
            }
            let operand = match entry.mode {
                AddressingMode::Direct | AddressingMode::Indexed => Some(1),
                AddressingMode::Extended => Some(2),
                AddressingMode::Inherent | AddressingMode::Variant => Some(0),
                AddressingMode::Immediate => Some(if wide_immediate(entry.opcode) { 2 } else { 1 }),
                AddressingMode::Relative => Some(if long_relative(entry.opcode) { 2 } else { 1 }),
                AddressingMode::Illegal => None,
            };
            if let Some(operand) = operand {
                let expected = entry.opcode_len() + operand;
                if entry.bytes != expected {
                    return Err(TableError::LengthMismatch {
                        opcode: entry.opcode,
                        listed: entry.bytes,
                        expected,
                    });
                }
            }
        }
        Ok(())
    }
}

impl Default for InstructionTable {
    fn default() -> Self {
        STANDARD.clone()
    }
}

/// Addressing mode the decoder applies to an opcode, from its bit pattern.
#[must_use]
pub fn decoded_mode(opcode: u16) -> Option<AddressingMode> {
    let low = (opcode & 0xFF) as u8;
    match opcode >> 8 {
        0x00 => Some(match low {
            0x00..=0x0F => Direct,
            0x10 | 0x11 => Variant,
            0x16 | 0x17 | 0x20..=0x2F | 0x8D => Relative,
            0x1A | 0x1C | 0x1E | 0x1F | 0x34..=0x37 | 0x3C => Immediate,
            0x30..=0x33 | 0x60..=0x6F => Indexed,
            0x70..=0x7F => Extended,
            0x80..=0xFF => operand_column(low),
            _ => Inherent,
        }),
        0x10 | 0x11 => Some(match low {
            0x21..=0x2F => Relative,
            0x3F => Inherent,
            _ => operand_column(low),
        }),
        _ => None,
    }
}

/// True for opcodes the execution engine dispatches.
#[must_use]
pub fn implemented(opcode: u16) -> bool {
    let low = (opcode & 0xFF) as u8;
    match opcode >> 8 {
        0x00 => match low {
            // NEG COM LSR ROR ASR LSL ROL DEC INC TST JMP CLR; no JMP on A or B
            0x00..=0x0F | 0x40..=0x7F => {
                matches!(low & 0x0F, 0x0 | 0x3 | 0x4 | 0x6..=0xA | 0xC..=0xF)
                    && !matches!(low, 0x4E | 0x5E)
            }
            0x10..=0x13 | 0x16 | 0x17 | 0x19 | 0x1A | 0x1C..=0x37 | 0x39..=0x3F => true,
            // No store to an immediate, no JSR/STD/STU immediate
            0x80..=0xFF => !matches!(low, 0x87 | 0x8F | 0xC7 | 0xCD | 0xCF),
            _ => false,
        },
        // LBcc, SWI2, CMPD, CMPY, LDY, STY, LDS, STS
        0x10 => matches!(
            low,
            0x21..=0x2F
                | 0x3F
                | 0x83
                | 0x8C
                | 0x8E
                | 0x93
                | 0x9C
                | 0x9E
                | 0x9F
                | 0xA3
                | 0xAC
                | 0xAE
                | 0xAF
                | 0xB3
                | 0xBC
                | 0xBE
                | 0xBF
                | 0xCE
                | 0xDE
                | 0xDF
                | 0xEE
                | 0xEF
                | 0xFE
                | 0xFF
        ),
        // SWI3, CMPU, CMPS
        0x11 => matches!(low, 0x3F | 0x83 | 0x8C | 0x93 | 0x9C | 0xA3 | 0xAC | 0xB3 | 0xBC),
        _ => false,
    }
}

/// Mode of the `$80..=$FF` opcode columns: bits 4-5 select the mode.
fn operand_column(low: u8) -> AddressingMode {
    match (low >> 4) & 0x03 {
        0 => AddressingMode::Immediate,
        1 => AddressingMode::Direct,
        2 => AddressingMode::Indexed,
        _ => AddressingMode::Extended,
    }
}

/// True for immediate-mode instructions that take a 16-bit operand.
#[must_use]
pub fn wide_immediate(opcode: u16) -> bool {
    let low = (opcode & 0xFF) as u8;
    match opcode >> 8 {
        // SUBD, CMPX, LDX, ADDD, LDD, LDU
        0x00 => matches!(low, 0x83 | 0x8C | 0x8E | 0xC3 | 0xCC | 0xCE),
        _ => low >= 0x80,
    }
}

/// True for relative-mode instructions with a 16-bit displacement.
#[must_use]
pub fn long_relative(opcode: u16) -> bool {
    opcode > 0xFF || matches!(opcode, 0x16 | 0x17)
}

const fn row(
    opcode: u16,
    mnemonic: &'static str,
    mode: AddressingMode,
    cycles: Cycles,
    bytes: u8,
    flags: &str,
) -> Instruction {
    Instruction {
        opcode,
        mnemonic,
        mode,
        cycles,
        bytes,
        flags: FlagEffects::parse(flags),
    }
}

const fn illegal(opcode: u16) -> Instruction {
    row(opcode, "ILLEGAL", AddressingMode::Illegal, Cycles::Fixed(1), 1, "uuuuu")
}

const fn long_branch(opcode: u16, mnemonic: &'static str, not_taken: u8, taken: u8) -> Instruction {
    row(
        opcode,
        mnemonic,
        AddressingMode::Relative,
        Cycles::Branch { not_taken, taken },
        4,
        "-----",
    )
}

#[rustfmt::skip]
const ROWS: &[Instruction] = &[
    row(0x00, "NEG", Direct, Cycles::Fixed(6), 2, "uaaaa"),
    illegal(0x01),
    illegal(0x02),
    row(0x03, "COM", Direct, Cycles::Fixed(6), 2, "-aa01"),
    row(0x04, "LSR", Direct, Cycles::Fixed(6), 2, "-0a-s"),
    illegal(0x05),
    row(0x06, "ROR", Direct, Cycles::Fixed(6), 2, "-aa-s"),
    row(0x07, "ASR", Direct, Cycles::Fixed(6), 2, "uaa-s"),
    row(0x08, "LSL/ASL", Direct, Cycles::Fixed(6), 2, "naaas"),
    row(0x09, "ROL", Direct, Cycles::Fixed(6), 2, "-aaas"),
    row(0x0A, "DEC", Direct, Cycles::Fixed(6), 2, "-aaa-"),
    illegal(0x0B),
    row(0x0C, "INC", Direct, Cycles::Fixed(6), 2, "-aaa-"),
    row(0x0D, "TST", Direct, Cycles::Fixed(6), 2, "-aa0-"),
    row(0x0E, "JMP", Direct, Cycles::Fixed(3), 2, "-----"),
    row(0x0F, "CLR", Direct, Cycles::Fixed(6), 2, "-0100"),
    row(0x10, "PAGE1+", Variant, Cycles::Fixed(1), 1, "+++++"),
    row(0x11, "PAGE2+", Variant, Cycles::Fixed(1), 1, "+++++"),
    row(0x12, "NOP", Inherent, Cycles::Fixed(2), 1, "-----"),
    row(0x13, "SYNC", Inherent, Cycles::Fixed(2), 1, "-----"),
    illegal(0x14),
    illegal(0x15),
    row(0x16, "LBRA", Relative, Cycles::Fixed(5), 3, "-----"),
    row(0x17, "LBSR", Relative, Cycles::Fixed(9), 3, "-----"),
    illegal(0x18),
    row(0x19, "DAA", Inherent, Cycles::Fixed(2), 1, "-aa0a"),
    row(0x1A, "ORCC", Immediate, Cycles::Fixed(3), 2, "ddddd"),
    illegal(0x1B),
    row(0x1C, "ANDCC", Immediate, Cycles::Fixed(3), 2, "ddddd"),
    row(0x1D, "SEX", Inherent, Cycles::Fixed(2), 1, "-aa0-"),
    row(0x1E, "EXG", Immediate, Cycles::Fixed(8), 2, "ccccc"),
    row(0x1F, "TFR", Immediate, Cycles::Fixed(7), 2, "ccccc"),
    row(0x20, "BRA", Relative, Cycles::Fixed(3), 2, "-----"),
    row(0x21, "BRN", Relative, Cycles::Fixed(3), 2, "-----"),
    row(0x22, "BHI", Relative, Cycles::Fixed(3), 2, "-----"),
    row(0x23, "BLS", Relative, Cycles::Fixed(3), 2, "-----"),
    row(0x24, "BHS/BCC", Relative, Cycles::Fixed(3), 2, "-----"),
    row(0x25, "BLO/BCS", Relative, Cycles::Fixed(3), 2, "-----"),
    row(0x26, "BNE", Relative, Cycles::Fixed(3), 2, "-----"),
    row(0x27, "BEQ", Relative, Cycles::Fixed(3), 2, "-----"),
    row(0x28, "BVC", Relative, Cycles::Fixed(3), 2, "-----"),
    row(0x29, "BVS", Relative, Cycles::Fixed(3), 2, "-----"),
    row(0x2A, "BPL", Relative, Cycles::Fixed(3), 2, "-----"),
    row(0x2B, "BMI", Relative, Cycles::Fixed(3), 2, "-----"),
    row(0x2C, "BGE", Relative, Cycles::Fixed(3), 2, "-----"),
    row(0x2D, "BLT", Relative, Cycles::Fixed(3), 2, "-----"),
    row(0x2E, "BGT", Relative, Cycles::Fixed(3), 2, "-----"),
    row(0x2F, "BLE", Relative, Cycles::Fixed(3), 2, "-----"),
    row(0x30, "LEAX", Indexed, Cycles::Fixed(4), 2, "--a--"),
    row(0x31, "LEAY", Indexed, Cycles::Fixed(4), 2, "--a--"),
    row(0x32, "LEAS", Indexed, Cycles::Fixed(4), 2, "-----"),
    row(0x33, "LEAU", Indexed, Cycles::Fixed(4), 2, "-----"),
    row(0x34, "PSHS", Immediate, Cycles::Fixed(5), 2, "-----"),
    row(0x35, "PULS", Immediate, Cycles::Fixed(5), 2, "ccccc"),
    row(0x36, "PSHU", Immediate, Cycles::Fixed(5), 2, "-----"),
    row(0x37, "PULU", Immediate, Cycles::Fixed(5), 2, "ccccc"),
    illegal(0x38),
    row(0x39, "RTS", Inherent, Cycles::Fixed(5), 1, "-----"),
    row(0x3A, "ABX", Inherent, Cycles::Fixed(3), 1, "-----"),
    row(0x3B, "RTI", Inherent, Cycles::ReturnFromInterrupt { pc_only: 6, entire: 15 }, 1, "-----"),
    row(0x3C, "CWAI", Immediate, Cycles::Fixed(21), 2, "ddddd"),
    row(0x3D, "MUL", Inherent, Cycles::Fixed(11), 1, "--a-a"),
    row(0x3E, "RESET*", Inherent, Cycles::Fixed(19), 1, "*****"),
    row(0x3F, "SWI", Inherent, Cycles::Fixed(19), 1, "-----"),
    row(0x40, "NEGA", Inherent, Cycles::Fixed(2), 1, "uaaaa"),
    illegal(0x41),
    illegal(0x42),
    row(0x43, "COMA", Inherent, Cycles::Fixed(2), 1, "-aa01"),
    row(0x44, "LSRA", Inherent, Cycles::Fixed(2), 1, "-0a-s"),
    illegal(0x45),
    row(0x46, "RORA", Inherent, Cycles::Fixed(2), 1, "-aa-s"),
    row(0x47, "ASRA", Inherent, Cycles::Fixed(2), 1, "uaa-s"),
    row(0x48, "LSLA/ASLA", Inherent, Cycles::Fixed(2), 1, "naaas"),
    row(0x49, "ROLA", Inherent, Cycles::Fixed(2), 1, "-aaas"),
    row(0x4A, "DECA", Inherent, Cycles::Fixed(2), 1, "-aaa-"),
    illegal(0x4B),
    row(0x4C, "INCA", Inherent, Cycles::Fixed(2), 1, "-aaa-"),
    row(0x4D, "TSTA", Inherent, Cycles::Fixed(2), 1, "-aa0-"),
    illegal(0x4E),
    row(0x4F, "CLRA", Inherent, Cycles::Fixed(2), 1, "-0100"),
    row(0x50, "NEGB", Inherent, Cycles::Fixed(2), 1, "uaaaa"),
    illegal(0x51),
    illegal(0x52),
    row(0x53, "COMB", Inherent, Cycles::Fixed(2), 1, "-aa01"),
    row(0x54, "LSRB", Inherent, Cycles::Fixed(2), 1, "-0a-s"),
    illegal(0x55),
    row(0x56, "RORB", Inherent, Cycles::Fixed(2), 1, "-aa-s"),
    row(0x57, "ASRB", Inherent, Cycles::Fixed(2), 1, "uaa-s"),
    row(0x58, "LSLB/ASLB", Inherent, Cycles::Fixed(2), 1, "naaas"),
    row(0x59, "ROLB", Inherent, Cycles::Fixed(2), 1, "-aaas"),
    row(0x5A, "DECB", Inherent, Cycles::Fixed(2), 1, "-aaa-"),
    illegal(0x5B),
    row(0x5C, "INCB", Inherent, Cycles::Fixed(2), 1, "-aaa-"),
    row(0x5D, "TSTB", Inherent, Cycles::Fixed(2), 1, "-aa0-"),
    illegal(0x5E),
    row(0x5F, "CLRB", Inherent, Cycles::Fixed(2), 1, "-0100"),
    row(0x60, "NEG", Indexed, Cycles::Fixed(6), 2, "uaaaa"),
    illegal(0x61),
    illegal(0x62),
    row(0x63, "COM", Indexed, Cycles::Fixed(6), 2, "-aa01"),
    row(0x64, "LSR", Indexed, Cycles::Fixed(6), 2, "-0a-s"),
    illegal(0x65),
    row(0x66, "ROR", Indexed, Cycles::Fixed(6), 2, "-aa-s"),
    row(0x67, "ASR", Indexed, Cycles::Fixed(6), 2, "uaa-s"),
    row(0x68, "LSL/ASL", Indexed, Cycles::Fixed(6), 2, "naaas"),
    row(0x69, "ROL", Indexed, Cycles::Fixed(6), 2, "-aaas"),
    row(0x6A, "DEC", Indexed, Cycles::Fixed(6), 2, "-aaa-"),
    illegal(0x6B),
    row(0x6C, "INC", Indexed, Cycles::Fixed(6), 2, "-aaa-"),
    row(0x6D, "TST", Indexed, Cycles::Fixed(6), 2, "-aa0-"),
    row(0x6E, "JMP", Indexed, Cycles::Fixed(3), 2, "-----"),
    row(0x6F, "CLR", Indexed, Cycles::Fixed(6), 2, "-0100"),
    row(0x70, "NEG", Extended, Cycles::Fixed(7), 3, "uaaaa"),
    illegal(0x71),
    illegal(0x72),
    row(0x73, "COM", Extended, Cycles::Fixed(7), 3, "-aa01"),
    row(0x74, "LSR", Extended, Cycles::Fixed(7), 3, "-0a-s"),
    illegal(0x75),
    row(0x76, "ROR", Extended, Cycles::Fixed(7), 3, "-aa-s"),
    row(0x77, "ASR", Extended, Cycles::Fixed(7), 3, "uaa-s"),
    row(0x78, "LSL/ASL", Extended, Cycles::Fixed(7), 3, "naaas"),
    row(0x79, "ROL", Extended, Cycles::Fixed(7), 3, "-aaas"),
    row(0x7A, "DEC", Extended, Cycles::Fixed(7), 3, "-aaa-"),
    illegal(0x7B),
    row(0x7C, "INC", Extended, Cycles::Fixed(7), 3, "-aaa-"),
    row(0x7D, "TST", Extended, Cycles::Fixed(7), 3, "-aa0-"),
    row(0x7E, "JMP", Extended, Cycles::Fixed(3), 3, "-----"),
    row(0x7F, "CLR", Extended, Cycles::Fixed(7), 3, "-0100"),
    row(0x80, "SUBA", Immediate, Cycles::Fixed(2), 2, "uaaaa"),
    row(0x81, "CMPA", Immediate, Cycles::Fixed(2), 2, "uaaaa"),
    row(0x82, "SBCA", Immediate, Cycles::Fixed(2), 2, "uaaaa"),
    row(0x83, "SUBD", Immediate, Cycles::Fixed(4), 3, "-aaaa"),
    row(0x84, "ANDA", Immediate, Cycles::Fixed(2), 2, "-aa0-"),
    row(0x85, "BITA", Immediate, Cycles::Fixed(2), 2, "-aa0-"),
    row(0x86, "LDA", Immediate, Cycles::Fixed(2), 2, "-aa0-"),
    illegal(0x87),
    row(0x88, "EORA", Immediate, Cycles::Fixed(2), 2, "-aa0-"),
    row(0x89, "ADCA", Immediate, Cycles::Fixed(2), 2, "aaaaa"),
    row(0x8A, "ORA", Immediate, Cycles::Fixed(2), 2, "-aa0-"),
    row(0x8B, "ADDA", Immediate, Cycles::Fixed(2), 2, "aaaaa"),
    row(0x8C, "CMPX", Immediate, Cycles::Fixed(4), 3, "-aaaa"),
    row(0x8D, "BSR", Relative, Cycles::Fixed(7), 2, "-----"),
    row(0x8E, "LDX", Immediate, Cycles::Fixed(3), 3, "-aa0-"),
    illegal(0x8F),
    row(0x90, "SUBA", Direct, Cycles::Fixed(4), 2, "uaaaa"),
    row(0x91, "CMPA", Direct, Cycles::Fixed(4), 2, "uaaaa"),
    row(0x92, "SBCA", Direct, Cycles::Fixed(4), 2, "uaaaa"),
    row(0x93, "SUBD", Direct, Cycles::Fixed(6), 2, "-aaaa"),
    row(0x94, "ANDA", Direct, Cycles::Fixed(4), 2, "-aa0-"),
    row(0x95, "BITA", Direct, Cycles::Fixed(4), 2, "-aa0-"),
    row(0x96, "LDA", Direct, Cycles::Fixed(4), 2, "-aa0-"),
    row(0x97, "STA", Direct, Cycles::Fixed(4), 2, "-aa0-"),
    row(0x98, "EORA", Direct, Cycles::Fixed(4), 2, "-aa0-"),
    row(0x99, "ADCA", Direct, Cycles::Fixed(4), 2, "aaaaa"),
    row(0x9A, "ORA", Direct, Cycles::Fixed(4), 2, "-aa0-"),
    row(0x9B, "ADDA", Direct, Cycles::Fixed(4), 2, "aaaaa"),
    row(0x9C, "CMPX", Direct, Cycles::Fixed(6), 2, "-aaaa"),
    row(0x9D, "JSR", Direct, Cycles::Fixed(7), 2, "-----"),
    row(0x9E, "LDX", Direct, Cycles::Fixed(5), 2, "-aa0-"),
    row(0x9F, "STX", Direct, Cycles::Fixed(5), 2, "-aa0-"),
    row(0xA0, "SUBA", Indexed, Cycles::Fixed(4), 2, "uaaaa"),
    row(0xA1, "CMPA", Indexed, Cycles::Fixed(4), 2, "uaaaa"),
    row(0xA2, "SBCA", Indexed, Cycles::Fixed(4), 2, "uaaaa"),
    row(0xA3, "SUBD", Indexed, Cycles::Fixed(6), 2, "-aaaa"),
    row(0xA4, "ANDA", Indexed, Cycles::Fixed(4), 2, "-aa0-"),
    row(0xA5, "BITA", Indexed, Cycles::Fixed(4), 2, "-aa0-"),
    row(0xA6, "LDA", Indexed, Cycles::Fixed(4), 2, "-aa0-"),
    row(0xA7, "STA", Indexed, Cycles::Fixed(4), 2, "-aa0-"),
    row(0xA8, "EORA", Indexed, Cycles::Fixed(4), 2, "-aa0-"),
    row(0xA9, "ADCA", Indexed, Cycles::Fixed(4), 2, "aaaaa"),
    row(0xAA, "ORA", Indexed, Cycles::Fixed(4), 2, "-aa0-"),
    row(0xAB, "ADDA", Indexed, Cycles::Fixed(4), 2, "aaaaa"),
    row(0xAC, "CMPX", Indexed, Cycles::Fixed(6), 2, "-aaaa"),
    row(0xAD, "JSR", Indexed, Cycles::Fixed(7), 2, "-----"),
    row(0xAE, "LDX", Indexed, Cycles::Fixed(5), 2, "-aa0-"),
    row(0xAF, "STX", Indexed, Cycles::Fixed(5), 2, "-aa0-"),
    row(0xB0, "SUBA", Extended, Cycles::Fixed(5), 3, "uaaaa"),
    row(0xB1, "CMPA", Extended, Cycles::Fixed(5), 3, "uaaaa"),
    row(0xB2, "SBCA", Extended, Cycles::Fixed(5), 3, "uaaaa"),
    row(0xB3, "SUBD", Extended, Cycles::Fixed(7), 3, "-aaaa"),
    row(0xB4, "ANDA", Extended, Cycles::Fixed(5), 3, "-aa0-"),
    row(0xB5, "BITA", Extended, Cycles::Fixed(5), 3, "-aa0-"),
    row(0xB6, "LDA", Extended, Cycles::Fixed(5), 3, "-aa0-"),
    row(0xB7, "STA", Extended, Cycles::Fixed(5), 3, "-aa0-"),
    row(0xB8, "EORA", Extended, Cycles::Fixed(5), 3, "-aa0-"),
    row(0xB9, "ADCA", Extended, Cycles::Fixed(5), 3, "aaaaa"),
    row(0xBA, "ORA", Extended, Cycles::Fixed(5), 3, "-aa0-"),
    row(0xBB, "ADDA", Extended, Cycles::Fixed(5), 3, "aaaaa"),
    row(0xBC, "CMPX", Extended, Cycles::Fixed(7), 3, "-aaaa"),
    row(0xBD, "JSR", Extended, Cycles::Fixed(8), 3, "-----"),
    row(0xBE, "LDX", Extended, Cycles::Fixed(6), 3, "-aa0-"),
    row(0xBF, "STX", Extended, Cycles::Fixed(6), 3, "-aa0-"),
    row(0xC0, "SUBB", Immediate, Cycles::Fixed(2), 2, "uaaaa"),
    row(0xC1, "CMPB", Immediate, Cycles::Fixed(2), 2, "uaaaa"),
    row(0xC2, "SBCB", Immediate, Cycles::Fixed(2), 2, "uaaaa"),
    row(0xC3, "ADDD", Immediate, Cycles::Fixed(4), 3, "-aaaa"),
    row(0xC4, "ANDB", Immediate, Cycles::Fixed(2), 2, "-aa0-"),
    row(0xC5, "BITB", Immediate, Cycles::Fixed(2), 2, "-aa0-"),
    row(0xC6, "LDB", Immediate, Cycles::Fixed(2), 2, "-aa0-"),
    illegal(0xC7),
    row(0xC8, "EORB", Immediate, Cycles::Fixed(2), 2, "-aa0-"),
    row(0xC9, "ADCB", Immediate, Cycles::Fixed(2), 2, "aaaaa"),
    row(0xCA, "ORB", Immediate, Cycles::Fixed(2), 2, "-aa0-"),
    row(0xCB, "ADDB", Immediate, Cycles::Fixed(2), 2, "aaaaa"),
    row(0xCC, "LDD", Immediate, Cycles::Fixed(3), 3, "-aa0-"),
    illegal(0xCD),
    row(0xCE, "LDU", Immediate, Cycles::Fixed(3), 3, "-aa0-"),
    illegal(0xCF),
    row(0xD0, "SUBB", Direct, Cycles::Fixed(4), 2, "uaaaa"),
    row(0xD1, "CMPB", Direct, Cycles::Fixed(4), 2, "uaaaa"),
    row(0xD2, "SBCB", Direct, Cycles::Fixed(4), 2, "uaaaa"),
    row(0xD3, "ADDD", Direct, Cycles::Fixed(6), 2, "-aaaa"),
    row(0xD4, "ANDB", Direct, Cycles::Fixed(4), 2, "-aa0-"),
    row(0xD5, "BITB", Direct, Cycles::Fixed(4), 2, "-aa0-"),
    row(0xD6, "LDB", Direct, Cycles::Fixed(4), 2, "-aa0-"),
    row(0xD7, "STB", Direct, Cycles::Fixed(4), 2, "-aa0-"),
    row(0xD8, "EORB", Direct, Cycles::Fixed(4), 2, "-aa0-"),
    row(0xD9, "ADCB", Direct, Cycles::Fixed(4), 2, "aaaaa"),
    row(0xDA, "ORB", Direct, Cycles::Fixed(4), 2, "-aa0-"),
    row(0xDB, "ADDB", Direct, Cycles::Fixed(4), 2, "aaaaa"),
    row(0xDC, "LDD", Direct, Cycles::Fixed(5), 2, "-aa0-"),
    row(0xDD, "STD", Direct, Cycles::Fixed(5), 2, "-aa0-"),
    row(0xDE, "LDU", Direct, Cycles::Fixed(5), 2, "-aa0-"),
    row(0xDF, "STU", Direct, Cycles::Fixed(5), 2, "-aa0-"),
    row(0xE0, "SUBB", Indexed, Cycles::Fixed(4), 2, "uaaaa"),
    row(0xE1, "CMPB", Indexed, Cycles::Fixed(4), 2, "uaaaa"),
    row(0xE2, "SBCB", Indexed, Cycles::Fixed(4), 2, "uaaaa"),
    row(0xE3, "ADDD", Indexed, Cycles::Fixed(6), 2, "-aaaa"),
    row(0xE4, "ANDB", Indexed, Cycles::Fixed(4), 2, "-aa0-"),
    row(0xE5, "BITB", Indexed, Cycles::Fixed(4), 2, "-aa0-"),
    row(0xE6, "LDB", Indexed, Cycles::Fixed(4), 2, "-aa0-"),
    row(0xE7, "STB", Indexed, Cycles::Fixed(4), 2, "-aa0-"),
    row(0xE8, "EORB", Indexed, Cycles::Fixed(4), 2, "-aa0-"),
    row(0xE9, "ADCB", Indexed, Cycles::Fixed(4), 2, "aaaaa"),
    row(0xEA, "ORB", Indexed, Cycles::Fixed(4), 2, "-aa0-"),
    row(0xEB, "ADDB", Indexed, Cycles::Fixed(4), 2, "aaaaa"),
    row(0xEC, "LDD", Indexed, Cycles::Fixed(5), 2, "-aa0-"),
    row(0xED, "STD", Indexed, Cycles::Fixed(5), 2, "-aa0-"),
    row(0xEE, "LDU", Indexed, Cycles::Fixed(5), 2, "-aa0-"),
    row(0xEF, "STU", Indexed, Cycles::Fixed(5), 2, "-aa0-"),
    row(0xF0, "SUBB", Extended, Cycles::Fixed(5), 3, "uaaaa"),
    row(0xF1, "CMPB", Extended, Cycles::Fixed(5), 3, "uaaaa"),
    row(0xF2, "SBCB", Extended, Cycles::Fixed(5), 3, "uaaaa"),
    row(0xF3, "ADDD", Extended, Cycles::Fixed(7), 3, "-aaaa"),
    row(0xF4, "ANDB", Extended, Cycles::Fixed(5), 3, "-aa0-"),
    row(0xF5, "BITB", Extended, Cycles::Fixed(5), 3, "-aa0-"),
    row(0xF6, "LDB", Extended, Cycles::Fixed(5), 3, "-aa0-"),
    row(0xF7, "STB", Extended, Cycles::Fixed(5), 3, "-aa0-"),
    row(0xF8, "EORB", Extended, Cycles::Fixed(5), 3, "-aa0-"),
    row(0xF9, "ADCB", Extended, Cycles::Fixed(5), 3, "aaaaa"),
    row(0xFA, "ORB", Extended, Cycles::Fixed(5), 3, "-aa0-"),
    row(0xFB, "ADDB", Extended, Cycles::Fixed(5), 3, "aaaaa"),
    row(0xFC, "LDD", Extended, Cycles::Fixed(6), 3, "-aa0-"),
    row(0xFD, "STD", Extended, Cycles::Fixed(6), 3, "-aa0-"),
    row(0xFE, "LDU", Extended, Cycles::Fixed(6), 3, "-aa0-"),
    row(0xFF, "STU", Extended, Cycles::Fixed(6), 3, "-aa0-"),
    long_branch(0x1021, "LBRN", 5, 6),
    long_branch(0x1022, "LBHI", 5, 6),
    long_branch(0x1023, "LBLS", 5, 6),
    long_branch(0x1024, "LBHS/LBCC", 5, 6),
    long_branch(0x1025, "LBLO/LBCS", 5, 6),
    long_branch(0x1026, "LBNE", 5, 6),
    long_branch(0x1027, "LBEQ", 5, 6),
    long_branch(0x1028, "LBVC", 5, 6),
    long_branch(0x1029, "LBVS", 5, 6),
    long_branch(0x102A, "LBPL", 5, 6),
    long_branch(0x102B, "LBMI", 5, 6),
    long_branch(0x102C, "LBGE", 5, 6),
    long_branch(0x102D, "LBLT", 5, 6),
    long_branch(0x102E, "LBGT", 5, 6),
    long_branch(0x102F, "LBLE", 5, 6),
    row(0x103F, "SWI2", Inherent, Cycles::Fixed(20), 2, "-----"),
    row(0x1083, "CMPD", Immediate, Cycles::Fixed(5), 4, "-aaaa"),
    row(0x108C, "CMPY", Immediate, Cycles::Fixed(5), 4, "-aaaa"),
    row(0x108E, "LDY", Immediate, Cycles::Fixed(4), 4, "-aa0-"),
    row(0x1093, "CMPD", Direct, Cycles::Fixed(7), 3, "-aaaa"),
    row(0x109C, "CMPY", Direct, Cycles::Fixed(7), 3, "-aaaa"),
    row(0x109E, "LDY", Direct, Cycles::Fixed(6), 3, "-aa0-"),
    row(0x109F, "STY", Direct, Cycles::Fixed(6), 3, "-aa0-"),
    row(0x10A3, "CMPD", Indexed, Cycles::Fixed(7), 3, "-aaaa"),
    row(0x10AC, "CMPY", Indexed, Cycles::Fixed(7), 3, "-aaaa"),
    row(0x10AE, "LDY", Indexed, Cycles::Fixed(6), 3, "-aa0-"),
    row(0x10AF, "STY", Indexed, Cycles::Fixed(6), 3, "-aa0-"),
    row(0x10B3, "CMPD", Extended, Cycles::Fixed(8), 4, "-aaaa"),
    row(0x10BC, "CMPY", Extended, Cycles::Fixed(8), 4, "-aaaa"),
    row(0x10BE, "LDY", Extended, Cycles::Fixed(7), 4, "-aa0-"),
    row(0x10BF, "STY", Extended, Cycles::Fixed(7), 4, "-aa0-"),
    row(0x10CE, "LDS", Immediate, Cycles::Fixed(4), 4, "-aa0-"),
    row(0x10DE, "LDS", Direct, Cycles::Fixed(6), 3, "-aa0-"),
    row(0x10DF, "STS", Direct, Cycles::Fixed(6), 3, "-aa0-"),
    row(0x10EE, "LDS", Indexed, Cycles::Fixed(6), 3, "-aa0-"),
    row(0x10EF, "STS", Indexed, Cycles::Fixed(6), 3, "-aa0-"),
    row(0x10FE, "LDS", Extended, Cycles::Fixed(7), 4, "-aa0-"),
    row(0x10FF, "STS", Extended, Cycles::Fixed(7), 4, "-aa0-"),
    row(0x113F, "SWI3", Inherent, Cycles::Fixed(20), 2, "-----"),
    row(0x1183, "CMPU", Immediate, Cycles::Fixed(5), 4, "-aaaa"),
    row(0x118C, "CMPS", Immediate, Cycles::Fixed(5), 4, "-aaaa"),
    row(0x1193, "CMPU", Direct, Cycles::Fixed(7), 3, "-aaaa"),
    row(0x119C, "CMPS", Direct, Cycles::Fixed(7), 3, "-aaaa"),
    row(0x11A3, "CMPU", Indexed, Cycles::Fixed(7), 3, "-aaaa"),
    row(0x11AC, "CMPS", Indexed, Cycles::Fixed(7), 3, "-aaaa"),
    row(0x11B3, "CMPU", Extended, Cycles::Fixed(8), 4, "-aaaa"),
    row(0x11BC, "CMPS", Extended, Cycles::Fixed(8), 4, "-aaaa"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_table_is_consistent() {
        assert_eq!(InstructionTable::standard().validate(), Ok(()));
    }

    #[test]
    fn page_prefixed_lookup() {
        let table = InstructionTable::standard();
        let ldy = table.lookup(0x108E).unwrap();
        assert_eq!(ldy.mnemonic, "LDY");
        assert_eq!(ldy.operand_len(), 2);
        assert!(table.lookup(0x1012).is_none());
        assert!(table.lookup(0x1234).is_none());
    }

    #[test]
    fn flag_columns_are_parsed() {
        let clr = InstructionTable::standard().lookup(0x4F).unwrap();
        assert_eq!(clr.flags.n, FlagEffect::Cleared);
        assert_eq!(clr.flags.z, FlagEffect::Set);
        assert_eq!(
            clr.flags.mask_of(FlagEffect::Cleared),
            crate::flags::N | crate::flags::V | crate::flags::C
        );
    }

    #[test]
    fn duplicate_rows_are_rejected() {
        let rows = [illegal(0x01), illegal(0x01)];
        assert_eq!(
            InstructionTable::try_from_rows(&rows).unwrap_err(),
            TableError::DuplicateOpcode(0x01)
        );
    }

    #[test]
    fn missing_rows_fail_validation() {
        let table = InstructionTable::try_from_rows(&ROWS[1..]).unwrap();
        assert_eq!(table.validate(), Err(TableError::UnknownOpcode(0x00)));
    }

    #[test]
    fn wrong_mode_fails_validation() {
        let mut rows = ROWS.to_vec();
        rows[0].mode = AddressingMode::Extended;
        let table = InstructionTable::try_from_rows(&rows).unwrap();
        assert!(matches!(
            table.validate(),
            Err(TableError::ModeMismatch { opcode: 0x00, .. })
        ));
    }

    #[test]
    fn rows_the_cpu_cannot_execute_fail_validation() {
        // LDA has no $10 page form
        let mut rows = ROWS.to_vec();
        rows.push(row(0x1086, "LDA", Immediate, Cycles::Fixed(4), 4, "-aa0-"));
        let table = InstructionTable::try_from_rows(&rows).unwrap();
        assert_eq!(table.validate(), Err(TableError::Unimplemented(0x1086)));

        // STA immediate in place of the illegal row
        let mut rows = ROWS.to_vec();
        rows[0x87] = row(0x87, "STA", Immediate, Cycles::Fixed(2), 2, "-aa0-");
        let table = InstructionTable::try_from_rows(&rows).unwrap();
        assert_eq!(table.validate(), Err(TableError::Unimplemented(0x87)));
    }

    #[test]
    fn every_standard_row_is_implemented() {
        let unimplemented: Vec<u16> = InstructionTable::standard()
            .iter()
            .filter(|e| !e.is_illegal() && !implemented(e.opcode))
            .map(|e| e.opcode)
            .collect();
        assert!(unimplemented.is_empty(), "{unimplemented:04X?}");
        for opcode in [0x01, 0x4E, 0x87, 0xCD, 0x1086, 0x1140] {
            assert!(!implemented(opcode), "${opcode:04X}");
        }
    }
}
