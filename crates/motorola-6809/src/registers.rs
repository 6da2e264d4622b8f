//! 6809 register set.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::ConditionCodes;

/// 6809 CPU register set.
///
/// - A, B: 8-bit accumulators, jointly the 16-bit D accumulator (A high)
/// - X, Y: 16-bit index registers
/// - U: user stack pointer, S: hardware stack pointer
/// - PC: program counter
/// - DP: direct page register (high byte of direct addresses)
/// - CC: condition codes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Registers {
    pub a: u8,
    pub b: u8,
    pub dp: u8,
    pub cc: ConditionCodes,
    pub x: u16,
    pub y: u16,
    pub u: u16,
    pub s: u16,
    pub pc: u16,
}

impl Registers {
    /// Get the D accumulator (A:B).
    #[must_use]
    pub const fn d(&self) -> u16 {
        (self.a as u16) << 8 | self.b as u16
    }

    /// Set the D accumulator; writes both A and B.
    pub fn set_d(&mut self, value: u16) {
        self.a = (value >> 8) as u8;
        self.b = value as u8;
    }

    /// Read a register by name. 8-bit registers are zero-extended.
    #[must_use]
    pub fn get(&self, name: RegisterName) -> u16 {
        match name {
            RegisterName::A => u16::from(self.a),
            RegisterName::B => u16::from(self.b),
            RegisterName::D => self.d(),
            RegisterName::X => self.x,
            RegisterName::Y => self.y,
            RegisterName::U => self.u,
            RegisterName::S => self.s,
            RegisterName::Pc => self.pc,
            RegisterName::Dp => u16::from(self.dp),
            RegisterName::Cc => u16::from(self.cc.bits()),
        }
    }

    /// Write a register by name.
    ///
    /// Fails without changing anything if an 8-bit register is given a
    /// value above 0xFF.
    pub fn set(&mut self, name: RegisterName, value: u16) -> Result<(), RegisterError> {
        if name.is_8bit() && value > 0xFF {
            return Err(RegisterError::ValueTooWide { name, value });
        }
        self.store(name, value);
        Ok(())
    }

    /// Write a register by name, truncating for 8-bit registers.
    pub(crate) fn store(&mut self, name: RegisterName, value: u16) {
        match name {
            RegisterName::A => self.a = value as u8,
            RegisterName::B => self.b = value as u8,
            RegisterName::D => self.set_d(value),
            RegisterName::X => self.x = value,
            RegisterName::Y => self.y = value,
            RegisterName::U => self.u = value,
            RegisterName::S => self.s = value,
            RegisterName::Pc => self.pc = value,
            RegisterName::Dp => self.dp = value as u8,
            RegisterName::Cc => self.cc = ConditionCodes(value as u8),
        }
    }
}

/// A programmer-visible register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RegisterName {
    A,
    B,
    D,
    X,
    Y,
    U,
    S,
    Pc,
    Dp,
    Cc,
}

impl RegisterName {
    pub const ALL: [Self; 10] = [
        Self::A,
        Self::B,
        Self::D,
        Self::X,
        Self::Y,
        Self::U,
        Self::S,
        Self::Pc,
        Self::Dp,
        Self::Cc,
    ];

    /// True for A, B, DP and CC.
    #[must_use]
    pub const fn is_8bit(self) -> bool {
        matches!(self, Self::A | Self::B | Self::Dp | Self::Cc)
    }

    /// Assembler spelling of the register.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::D => "D",
            Self::X => "X",
            Self::Y => "Y",
            Self::U => "U",
            Self::S => "S",
            Self::Pc => "PC",
            Self::Dp => "DP",
            Self::Cc => "CC",
        }
    }
}

impl fmt::Display for RegisterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RegisterName {
    type Err = RegisterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|name| name.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| RegisterError::UnknownRegister(s.to_string()))
    }
}

/// Failure of name-based register access.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegisterError {
    #[error("unknown register {0:?}")]
    UnknownRegister(String),

    #[error("value ${value:04X} does not fit 8-bit register {name}")]
    ValueTooWide { name: RegisterName, value: u16 },
}
