//! Hardware (S) and user (U) stack operations.
//!
//! Both stacks grow down; a push pre-decrements, a pull post-increments.
//! Words are stored big-endian.

use emu_core::Bus;

use super::Mc6809;

/// PSH/PUL post-byte bits in push order: PC first, CC last.
const PUSH_ORDER: [u8; 8] = [0x80, 0x40, 0x20, 0x10, 0x08, 0x04, 0x02, 0x01];

impl Mc6809 {
    fn stack_pointer(&mut self, user: bool) -> &mut u16 {
        if user { &mut self.regs.u } else { &mut self.regs.s }
    }

    pub(super) fn push8<B: Bus>(&mut self, bus: &mut B, user: bool, value: u8) {
        let sp = self.stack_pointer(user);
        *sp = sp.wrapping_sub(1);
        let address = *sp;
        bus.write(address, value);
    }

    pub(super) fn push16<B: Bus>(&mut self, bus: &mut B, user: bool, value: u16) {
        let [hi, lo] = value.to_be_bytes();
        self.push8(bus, user, lo);
        self.push8(bus, user, hi);
    }

    pub(super) fn pull8<B: Bus>(&mut self, bus: &mut B, user: bool) -> u8 {
        let sp = self.stack_pointer(user);
        let address = *sp;
        *sp = sp.wrapping_add(1);
        bus.read(address)
    }

    pub(super) fn pull16<B: Bus>(&mut self, bus: &mut B, user: bool) -> u16 {
        let hi = self.pull8(bus, user);
        let lo = self.pull8(bus, user);
        u16::from_be_bytes([hi, lo])
    }

    pub(super) fn push_s8<B: Bus>(&mut self, bus: &mut B, value: u8) {
        self.push8(bus, false, value);
    }

    pub(super) fn push_s16<B: Bus>(&mut self, bus: &mut B, value: u16) {
        self.push16(bus, false, value);
    }

    pub(super) fn pull_s8<B: Bus>(&mut self, bus: &mut B) -> u8 {
        self.pull8(bus, false)
    }

    pub(super) fn pull_s16<B: Bus>(&mut self, bus: &mut B) -> u16 {
        self.pull16(bus, false)
    }

    /// PSHS (`user` false) or PSHU (`user` true). Returns bytes pushed.
    ///
    /// Bit 6 names the other stack pointer: U for PSHS, S for PSHU.
    pub(super) fn push_registers<B: Bus>(&mut self, bus: &mut B, user: bool, mask: u8) -> u32 {
        let mut bytes = 0;
        for bit in PUSH_ORDER.into_iter().filter(|bit| mask & bit != 0) {
            match bit {
                0x80 => self.push16(bus, user, self.regs.pc),
                0x40 => {
                    let other = if user { self.regs.s } else { self.regs.u };
                    self.push16(bus, user, other);
                }
                0x20 => self.push16(bus, user, self.regs.y),
                0x10 => self.push16(bus, user, self.regs.x),
                0x08 => self.push8(bus, user, self.regs.dp),
                0x04 => self.push8(bus, user, self.regs.b),
                0x02 => self.push8(bus, user, self.regs.a),
                _ => self.push8(bus, user, self.regs.cc.bits()),
            }
            bytes += if bit >= 0x10 { 2 } else { 1 };
        }
        bytes
    }

    /// PULS or PULU, reverse of [`push_registers`](Self::push_registers).
    /// Returns bytes pulled.
    pub(super) fn pull_registers<B: Bus>(&mut self, bus: &mut B, user: bool, mask: u8) -> u32 {
        let mut bytes = 0;
        for bit in PUSH_ORDER.into_iter().rev().filter(|bit| mask & bit != 0) {
            match bit {
                0x01 => self.regs.cc.0 = self.pull8(bus, user),
                0x02 => self.regs.a = self.pull8(bus, user),
                0x04 => self.regs.b = self.pull8(bus, user),
                0x08 => self.regs.dp = self.pull8(bus, user),
                0x10 => self.regs.x = self.pull16(bus, user),
                0x20 => self.regs.y = self.pull16(bus, user),
                0x40 => {
                    let other = self.pull16(bus, user);
                    if user {
                        self.regs.s = other;
                    } else {
                        self.regs.u = other;
                    }
                }
                _ => self.regs.pc = self.pull16(bus, user),
            }
            bytes += if bit >= 0x10 { 2 } else { 1 };
        }
        bytes
    }
}
