//! Interrupt entry, software interrupts and the CWAI/SYNC wait states.

use emu_core::Bus;
use log::debug;

use super::{ExecState, InterruptLine, Mc6809, read_word};
use crate::flags::{E, F, I};

pub const SWI3_VECTOR: u16 = 0xFFF2;
pub const SWI2_VECTOR: u16 = 0xFFF4;
pub const FIRQ_VECTOR: u16 = 0xFFF6;
pub const IRQ_VECTOR: u16 = 0xFFF8;
pub const SWI_VECTOR: u16 = 0xFFFA;
pub const NMI_VECTOR: u16 = 0xFFFC;

/// Cycles for IRQ and NMI entry with a full push.
const FULL_ENTRY_CYCLES: u32 = 19;
/// Cycles for FIRQ entry (PC and CC only).
const FAST_ENTRY_CYCLES: u32 = 10;
/// Cycles to vector out of CWAI, the state already being stacked.
const STACKED_ENTRY_CYCLES: u32 = 3;

impl InterruptLine {
    const fn vector(self) -> u16 {
        match self {
            Self::Nmi => NMI_VECTOR,
            Self::Firq => FIRQ_VECTOR,
            Self::Irq => IRQ_VECTOR,
        }
    }

    /// CC mask bits set on entry.
    const fn masks(self) -> u8 {
        match self {
            Self::Nmi | Self::Firq => I | F,
            Self::Irq => I,
        }
    }
}

impl Mc6809 {
    /// Highest-priority pending line that CC does not mask.
    pub(crate) fn accepted_line(&self) -> Option<InterruptLine> {
        let cc = self.regs.cc;
        if self.pending.nmi {
            Some(InterruptLine::Nmi)
        } else if self.pending.firq && !cc.is_set(F) {
            Some(InterruptLine::Firq)
        } else if self.pending.irq && !cc.is_set(I) {
            Some(InterruptLine::Irq)
        } else {
            None
        }
    }

    /// Check the lines before an instruction.
    ///
    /// Returns the cycles spent when an interrupt was entered. `None` means
    /// nothing was taken: the caller executes the next instruction if the
    /// CPU is running, or burns a one-cycle wait poll otherwise.
    pub(super) fn service_interrupts<B: Bus>(&mut self, bus: &mut B) -> Option<u32> {
        match self.state {
            ExecState::Running => {
                let line = self.accepted_line()?;
                Some(self.enter_interrupt(bus, line))
            }
            ExecState::WaitingForInterrupt => {
                let line = self.accepted_line()?;
                self.pending.clear(line);
                self.regs.cc.set(line.masks());
                self.regs.pc = read_word(bus, line.vector());
                self.state = ExecState::Running;
                debug!("{line:?} ends CWAI, vector ${:04X}", self.regs.pc);
                Some(STACKED_ENTRY_CYCLES)
            }
            ExecState::Syncing => {
                if !self.pending.any() {
                    return None;
                }
                self.state = ExecState::Running;
                match self.accepted_line() {
                    Some(line) => Some(self.enter_interrupt(bus, line)),
                    None => {
                        debug!("masked line ends SYNC at ${:04X}", self.regs.pc);
                        None
                    }
                }
            }
        }
    }

    fn enter_interrupt<B: Bus>(&mut self, bus: &mut B, line: InterruptLine) -> u32 {
        self.pending.clear(line);
        let cycles = if line == InterruptLine::Firq {
            self.regs.cc.clear(E);
            self.push_s16(bus, self.regs.pc);
            self.push_s8(bus, self.regs.cc.bits());
            FAST_ENTRY_CYCLES
        } else {
            self.push_entire_state(bus);
            FULL_ENTRY_CYCLES
        };
        self.regs.cc.set(line.masks());
        self.regs.pc = read_word(bus, line.vector());
        debug!("{line:?} taken, vector ${:04X}", self.regs.pc);
        cycles
    }

    /// Set E and stack PC, U, Y, X, DP, B, A and CC on S.
    pub(crate) fn push_entire_state<B: Bus>(&mut self, bus: &mut B) {
        self.regs.cc.set(E);
        self.push_registers(bus, false, 0xFF);
    }

    /// SWI, SWI2, SWI3 and the undocumented reset opcode.
    pub(super) fn software_interrupt<B: Bus>(&mut self, bus: &mut B, vector: u16, masks: u8) {
        self.push_entire_state(bus);
        self.regs.cc.set(masks);
        self.regs.pc = read_word(bus, vector);
        debug!("software interrupt through ${vector:04X}");
    }

    /// CWAI: AND CC with the mask, stack everything and wait.
    pub(super) fn cwai<B: Bus>(&mut self, bus: &mut B, mask: u8) {
        self.regs.cc.0 &= mask;
        self.push_entire_state(bus);
        self.state = ExecState::WaitingForInterrupt;
        debug!("CWAI #${mask:02X}, waiting at ${:04X}", self.regs.pc);
    }

    pub(super) fn sync(&mut self) {
        self.state = ExecState::Syncing;
        debug!("SYNC at ${:04X}", self.regs.pc);
    }

    /// RTI. Returns true when the entire state was stacked.
    pub(super) fn return_from_interrupt<B: Bus>(&mut self, bus: &mut B) -> bool {
        let cc = self.pull_s8(bus);
        self.regs.cc.0 = cc;
        if self.regs.cc.is_set(E) {
            // CC already restored
            self.pull_registers(bus, false, 0xFE);
            true
        } else {
            self.regs.pc = self.pull_s16(bus);
            false
        }
    }
}

impl super::PendingLines {
    fn clear(&mut self, line: InterruptLine) {
        *self.line_mut(line) = false;
    }
}
