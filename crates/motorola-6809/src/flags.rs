//! 6809 condition code register (CC).
//!
//! Bit layout, most significant first: E F H I N Z V C.

/// Carry flag - carry out of bit 7 (or 15), or borrow for subtraction.
pub const C: u8 = 0x01;

/// Overflow flag - two's complement overflow.
pub const V: u8 = 0x02;

/// Zero flag - set if result is zero.
pub const Z: u8 = 0x04;

/// Negative flag - copy of the result's sign bit.
pub const N: u8 = 0x08;

/// IRQ mask - when set, IRQ is ignored.
pub const I: u8 = 0x10;

/// Half-carry flag - carry from bit 3 to bit 4 on 8-bit additions.
pub const H: u8 = 0x20;

/// FIRQ mask - when set, FIRQ is ignored.
pub const F: u8 = 0x40;

/// Entire flag - set when the full register set is on the stack.
pub const E: u8 = 0x80;

/// Condition code register.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConditionCodes(pub u8);

impl ConditionCodes {
    /// Raw register value.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Check if a flag is set.
    #[must_use]
    pub const fn is_set(self, flag: u8) -> bool {
        self.0 & flag != 0
    }

    /// Set a flag.
    pub const fn set(&mut self, flag: u8) {
        self.0 |= flag;
    }

    /// Clear a flag.
    pub const fn clear(&mut self, flag: u8) {
        self.0 &= !flag;
    }

    /// Set or clear a flag based on condition.
    pub const fn set_if(&mut self, flag: u8, condition: bool) {
        if condition {
            self.set(flag);
        } else {
            self.clear(flag);
        }
    }

    /// Update N and Z from an 8-bit result.
    pub const fn update_nz8(&mut self, value: u8) {
        self.set_if(N, value & 0x80 != 0);
        self.set_if(Z, value == 0);
    }

    /// Update N and Z from a 16-bit result.
    pub const fn update_nz16(&mut self, value: u16) {
        self.set_if(N, value & 0x8000 != 0);
        self.set_if(Z, value == 0);
    }

    /// Replace the bits selected by `mask` with the same bits of `flags`.
    ///
    /// Bits outside `mask` are left exactly as they were.
    pub fn merge(&mut self, mask: u8, flags: u8) {
        self.0 = (self.0 & !mask) | (flags & mask);
    }

    /// Short form like `EF-I--Z-` for traces.
    #[must_use]
    pub fn describe(self) -> String {
        const NAMES: [char; 8] = ['E', 'F', 'H', 'I', 'N', 'Z', 'V', 'C'];
        NAMES
            .iter()
            .enumerate()
            .map(|(i, &name)| {
                if self.0 & (0x80 >> i) != 0 {
                    name
                } else {
                    '-'
                }
            })
            .collect()
    }
}
