//! ALU operations for the 6809.
//!
//! Each operation returns the result and every flag it can define. The
//! execution engine keeps only the bits the instruction table lists as
//! affected, so e.g. the H computed by `sub8` never reaches CC.

use crate::flags::{C, ConditionCodes, H, N, V, Z};

/// Result of an 8-bit ALU operation with flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AluResult {
    pub value: u8,
    pub flags: u8,
}

/// Result of a 16-bit ALU operation with flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AluResult16 {
    pub value: u16,
    pub flags: u8,
}

const fn nz8(value: u8) -> u8 {
    let mut cc = ConditionCodes(0);
    cc.update_nz8(value);
    cc.bits()
}

const fn nz16(value: u16) -> u8 {
    let mut cc = ConditionCodes(0);
    cc.update_nz16(value);
    cc.bits()
}

/// Flags for a result that only defines N and Z (loads, stores, logic).
#[must_use]
pub const fn logic8(value: u8) -> AluResult {
    AluResult {
        value,
        flags: nz8(value),
    }
}

/// 16-bit counterpart of [`logic8`].
#[must_use]
pub const fn logic16(value: u16) -> AluResult16 {
    AluResult16 {
        value,
        flags: nz16(value),
    }
}

/// Add with optional carry in.
#[must_use]
pub fn add8(a: u8, b: u8, carry: bool) -> AluResult {
    let c = u8::from(carry);
    let wide = u16::from(a) + u16::from(b) + u16::from(c);
    let value = wide as u8;
    let mut flags = nz8(value);

    if (a & 0x0F) + (b & 0x0F) + c > 0x0F {
        flags |= H;
    }
    // Both operands same sign, result different sign
    if (a ^ b) & 0x80 == 0 && (a ^ value) & 0x80 != 0 {
        flags |= V;
    }
    if wide > 0xFF {
        flags |= C;
    }
    AluResult { value, flags }
}

/// Subtract with optional borrow in. C is set on borrow.
#[must_use]
pub fn sub8(a: u8, b: u8, borrow: bool) -> AluResult {
    let c = u16::from(borrow);
    let value = a.wrapping_sub(b).wrapping_sub(c as u8);
    let mut flags = nz8(value);

    // Operands different sign, result sign differs from minuend
    if (a ^ b) & 0x80 != 0 && (a ^ value) & 0x80 != 0 {
        flags |= V;
    }
    if u16::from(a) < u16::from(b) + c {
        flags |= C;
    }
    AluResult { value, flags }
}

#[must_use]
pub fn add16(a: u16, b: u16) -> AluResult16 {
    let wide = u32::from(a) + u32::from(b);
    let value = wide as u16;
    let mut flags = nz16(value);
    if (a ^ b) & 0x8000 == 0 && (a ^ value) & 0x8000 != 0 {
        flags |= V;
    }
    if wide > 0xFFFF {
        flags |= C;
    }
    AluResult16 { value, flags }
}

#[must_use]
pub fn sub16(a: u16, b: u16) -> AluResult16 {
    let value = a.wrapping_sub(b);
    let mut flags = nz16(value);
    if (a ^ b) & 0x8000 != 0 && (a ^ value) & 0x8000 != 0 {
        flags |= V;
    }
    if a < b {
        flags |= C;
    }
    AluResult16 { value, flags }
}

/// Two's complement negate. C is set unless the operand is zero, V only
/// for 0x80.
#[must_use]
pub fn neg8(a: u8) -> AluResult {
    sub8(0, a, false)
}

/// One's complement.
#[must_use]
pub const fn com8(a: u8) -> AluResult {
    logic8(!a)
}

#[must_use]
pub const fn inc8(a: u8) -> AluResult {
    let value = a.wrapping_add(1);
    let mut flags = nz8(value);
    if a == 0x7F {
        flags |= V;
    }
    AluResult { value, flags }
}

#[must_use]
pub const fn dec8(a: u8) -> AluResult {
    let value = a.wrapping_sub(1);
    let mut flags = nz8(value);
    if a == 0x80 {
        flags |= V;
    }
    AluResult { value, flags }
}

/// Logical shift right: bit 0 to C, 0 into bit 7.
#[must_use]
pub const fn lsr8(a: u8) -> AluResult {
    let value = a >> 1;
    let mut flags = nz8(value);
    if a & 0x01 != 0 {
        flags |= C;
    }
    AluResult { value, flags }
}

/// Arithmetic shift right: bit 7 is kept.
#[must_use]
pub const fn asr8(a: u8) -> AluResult {
    let value = (a >> 1) | (a & 0x80);
    let mut flags = nz8(value);
    if a & 0x01 != 0 {
        flags |= C;
    }
    AluResult { value, flags }
}

/// Rotate right through carry.
#[must_use]
pub const fn ror8(a: u8, carry: bool) -> AluResult {
    let value = (a >> 1) | if carry { 0x80 } else { 0 };
    let mut flags = nz8(value);
    if a & 0x01 != 0 {
        flags |= C;
    }
    AluResult { value, flags }
}

/// Shift left: bit 7 to C, V = bit 7 xor bit 6 of the operand.
#[must_use]
pub const fn lsl8(a: u8) -> AluResult {
    rol8(a, false)
}

/// Rotate left through carry.
#[must_use]
pub const fn rol8(a: u8, carry: bool) -> AluResult {
    let value = (a << 1) | if carry { 0x01 } else { 0 };
    let mut flags = nz8(value);
    if a & 0x80 != 0 {
        flags |= C;
    }
    if (a ^ (a << 1)) & 0x80 != 0 {
        flags |= V;
    }
    AluResult { value, flags }
}

/// Decimal adjust A after a BCD addition.
///
/// `half` and `carry` are H and C from the preceding add. C is only ever
/// set by the adjustment, never cleared.
#[must_use]
pub fn daa(a: u8, half: bool, carry: bool) -> AluResult {
    let low = a & 0x0F;
    let high = a >> 4;
    let mut correction = 0u16;
    if half || low > 9 {
        correction |= 0x06;
    }
    if carry || high > 9 || (high > 8 && low > 9) {
        correction |= 0x60;
    }
    let wide = u16::from(a) + correction;
    let value = wide as u8;
    let mut flags = nz8(value);
    if carry || wide > 0xFF {
        flags |= C;
    }
    AluResult { value, flags }
}

/// Unsigned A * B into D. C is bit 7 of the low byte, for rounding.
#[must_use]
pub fn mul(a: u8, b: u8) -> AluResult16 {
    let value = u16::from(a) * u16::from(b);
    let mut flags = if value == 0 { Z } else { 0 };
    if value & 0x0080 != 0 {
        flags |= C;
    }
    AluResult16 { value, flags }
}
