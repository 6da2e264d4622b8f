//! 6809 CPU core with per-instruction execution.

mod addressing;
mod execute;
mod interrupts;
mod stack;

use std::borrow::Cow;

use emu_core::{Bus, Cpu, Observable, Ticks, Value};
use log::debug;

use crate::error::CpuError;
use crate::flags::{C, E, F, H, I, N, V, Z};
use crate::opcodes::{InstructionTable, TableError};
use crate::registers::{RegisterError, RegisterName, Registers};
use crate::run::RunConfig;

pub use addressing::Operand;
pub use interrupts::{FIRQ_VECTOR, IRQ_VECTOR, NMI_VECTOR, SWI_VECTOR, SWI2_VECTOR, SWI3_VECTOR};

/// Reset vector.
pub const RESET_VECTOR: u16 = 0xFFFE;

/// Whether the CPU is executing or parked by CWAI/SYNC.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExecState {
    #[default]
    Running,
    /// After CWAI: full state is stacked, waiting for an unmasked line.
    WaitingForInterrupt,
    /// After SYNC: waiting for any line, masked or not.
    Syncing,
}

/// The three hardware interrupt request lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InterruptLine {
    Nmi,
    Firq,
    Irq,
}

/// Latched interrupt requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PendingLines {
    pub nmi: bool,
    pub firq: bool,
    pub irq: bool,
}

impl PendingLines {
    #[must_use]
    pub const fn any(&self) -> bool {
        self.nmi || self.firq || self.irq
    }

    fn line_mut(&mut self, line: InterruptLine) -> &mut bool {
        match line {
            InterruptLine::Nmi => &mut self.nmi,
            InterruptLine::Firq => &mut self.firq,
            InterruptLine::Irq => &mut self.irq,
        }
    }
}

/// Everything needed to resume a CPU later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CpuState {
    pub registers: Registers,
    pub state: ExecState,
    pub pending: PendingLines,
    pub cycles: Ticks,
}

/// Motorola 6809 CPU.
///
/// The CPU does not own the bus. The bus is passed to `step()` so the
/// machine can share it with peripherals between instructions.
#[derive(Debug, Clone)]
pub struct Mc6809 {
    pub(crate) regs: Registers,
    pub(crate) state: ExecState,
    pub(crate) pending: PendingLines,
    /// Cycles elapsed since creation.
    pub(crate) total_cycles: Ticks,
    pub(crate) config: RunConfig,
    table: Cow<'static, InstructionTable>,
}

impl Mc6809 {
    /// Create a CPU on the standard instruction table. Registers are zero;
    /// call [`reset`](Self::reset) to fetch the reset vector.
    #[must_use]
    pub fn new() -> Self {
        Self::build(Cow::Borrowed(InstructionTable::standard()))
    }

    /// Create a CPU on a custom table, checked against the decoder.
    pub fn with_table(table: InstructionTable) -> Result<Self, TableError> {
        table.validate()?;
        Ok(Self::build(Cow::Owned(table)))
    }

    fn build(table: Cow<'static, InstructionTable>) -> Self {
        Self {
            regs: Registers::default(),
            state: ExecState::Running,
            pending: PendingLines::default(),
            total_cycles: Ticks::ZERO,
            config: RunConfig::default(),
            table,
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: RunConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub const fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: RunConfig) {
        self.config = config;
    }

    #[must_use]
    pub fn table(&self) -> &InstructionTable {
        &self.table
    }

    #[must_use]
    pub const fn regs(&self) -> &Registers {
        &self.regs
    }

    pub fn regs_mut(&mut self) -> &mut Registers {
        &mut self.regs
    }

    #[must_use]
    pub const fn exec_state(&self) -> ExecState {
        self.state
    }

    #[must_use]
    pub const fn pending(&self) -> PendingLines {
        self.pending
    }

    /// Cycles elapsed since creation.
    #[must_use]
    pub const fn total_cycles(&self) -> Ticks {
        self.total_cycles
    }

    /// Load PC from the reset vector, mask IRQ and FIRQ, clear DP and
    /// drop any pending lines or wait state. Other registers are kept.
    pub fn reset<B: Bus>(&mut self, bus: &mut B) {
        self.regs.pc = read_word(bus, RESET_VECTOR);
        self.regs.cc.set(I | F);
        self.regs.dp = 0;
        self.pending = PendingLines::default();
        self.state = ExecState::Running;
        debug!("reset, PC=${:04X}", self.regs.pc);
    }

    /// Latch an interrupt request. It stays pending until serviced or
    /// released with [`release_line`](Self::release_line).
    pub fn assert_line(&mut self, line: InterruptLine) {
        *self.pending.line_mut(line) = true;
    }

    pub fn release_line(&mut self, line: InterruptLine) {
        *self.pending.line_mut(line) = false;
    }

    /// Read a register by its assembler name.
    pub fn get_register(&self, name: &str) -> Result<u16, RegisterError> {
        Ok(self.regs.get(name.parse()?))
    }

    /// Write a register by its assembler name.
    pub fn set_register(&mut self, name: &str, value: u16) -> Result<(), RegisterError> {
        let name: RegisterName = name.parse()?;
        self.regs.set(name, value)
    }

    /// Execute one instruction, one interrupt entry, or one wait poll.
    ///
    /// Returns the cycles consumed.
    pub fn step<B: Bus>(&mut self, bus: &mut B) -> Result<u32, CpuError> {
        bus.begin_instruction(self.total_cycles.get(), self.regs.pc);

        let cycles = match self.service_interrupts(bus) {
            Some(cycles) => cycles,
            None if self.state == ExecState::Running => self.execute(bus)?,
            None => 1,
        };

        self.total_cycles += cycles;
        Ok(cycles)
    }

    #[must_use]
    pub fn save_state(&self) -> CpuState {
        CpuState {
            registers: self.regs,
            state: self.state,
            pending: self.pending,
            cycles: self.total_cycles,
        }
    }

    /// Restore a saved state. Configuration and table are kept.
    pub fn load_state(&mut self, saved: &CpuState) {
        self.regs = saved.registers;
        self.state = saved.state;
        self.pending = saved.pending;
        self.total_cycles = saved.cycles;
    }
}

impl Default for Mc6809 {
    fn default() -> Self {
        Self::new()
    }
}

/// Big-endian word through the bus.
pub(crate) fn read_word<B: Bus>(bus: &mut B, address: u16) -> u16 {
    let hi = bus.read(address);
    let lo = bus.read(address.wrapping_add(1));
    u16::from_be_bytes([hi, lo])
}

pub(crate) fn write_word<B: Bus>(bus: &mut B, address: u16, value: u16) {
    let [hi, lo] = value.to_be_bytes();
    bus.write(address, hi);
    bus.write(address.wrapping_add(1), lo);
}

impl Cpu for Mc6809 {
    type Registers = Registers;
    type Error = CpuError;

    fn step<B: Bus>(&mut self, bus: &mut B) -> Result<u32, CpuError> {
        Mc6809::step(self, bus)
    }

    fn pc(&self) -> u32 {
        u32::from(self.regs.pc)
    }

    fn registers(&self) -> Registers {
        self.regs
    }

    fn is_halted(&self) -> bool {
        self.state != ExecState::Running
    }

    fn interrupt(&mut self) -> bool {
        self.assert_line(InterruptLine::Irq);
        !self.regs.cc.is_set(I)
    }

    fn nmi(&mut self) {
        self.assert_line(InterruptLine::Nmi);
    }

    fn reset<B: Bus>(&mut self, bus: &mut B) {
        Mc6809::reset(self, bus);
    }
}

impl Observable for Mc6809 {
    fn query(&self, path: &str) -> Option<Value> {
        let cc = self.regs.cc;
        match path {
            "a" => Some(self.regs.a.into()),
            "b" => Some(self.regs.b.into()),
            "d" => Some(self.regs.d().into()),
            "x" => Some(self.regs.x.into()),
            "y" => Some(self.regs.y.into()),
            "u" => Some(self.regs.u.into()),
            "s" => Some(self.regs.s.into()),
            "pc" => Some(self.regs.pc.into()),
            "dp" => Some(self.regs.dp.into()),
            "cc" => Some(cc.bits().into()),

            "cc.c" => Some(cc.is_set(C).into()),
            "cc.v" => Some(cc.is_set(V).into()),
            "cc.z" => Some(cc.is_set(Z).into()),
            "cc.n" => Some(cc.is_set(N).into()),
            "cc.i" => Some(cc.is_set(I).into()),
            "cc.h" => Some(cc.is_set(H).into()),
            "cc.f" => Some(cc.is_set(F).into()),
            "cc.e" => Some(cc.is_set(E).into()),

            "halted" => Some((self.state != ExecState::Running).into()),
            "state" => Some(format!("{:?}", self.state).into()),
            "pending.nmi" => Some(self.pending.nmi.into()),
            "pending.firq" => Some(self.pending.firq.into()),
            "pending.irq" => Some(self.pending.irq.into()),
            "cycles" => Some(self.total_cycles.get().into()),
            _ => None,
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &[
            "a",
            "b",
            "d",
            "x",
            "y",
            "u",
            "s",
            "pc",
            "dp",
            "cc",
            "cc.c",
            "cc.v",
            "cc.z",
            "cc.n",
            "cc.i",
            "cc.h",
            "cc.f",
            "cc.e",
            "halted",
            "state",
            "pending.nmi",
            "pending.firq",
            "pending.irq",
            "cycles",
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use emu_core::SimpleBus;

    #[test]
    fn reset_loads_vector_and_masks_interrupts() {
        let mut bus = SimpleBus::new();
        bus.load(0xFFFE, &[0xC0, 0x00]);
        let mut cpu = Mc6809::new();
        cpu.regs.dp = 0x12;
        cpu.regs.x = 0x5555;
        cpu.assert_line(InterruptLine::Irq);

        cpu.reset(&mut bus);

        assert_eq!(cpu.regs.pc, 0xC000);
        assert!(cpu.regs.cc.is_set(I | F));
        assert_eq!(cpu.regs.dp, 0);
        assert_eq!(cpu.regs.x, 0x5555);
        assert!(!cpu.pending.any());
    }

    #[test]
    fn query_reports_registers_and_flags() {
        let mut cpu = Mc6809::new();
        cpu.regs.set_d(0x1234);
        cpu.regs.cc.set(Z);
        assert_eq!(cpu.query("d"), Some(Value::U16(0x1234)));
        assert_eq!(cpu.query("a"), Some(Value::U8(0x12)));
        assert_eq!(cpu.query("cc.z"), Some(Value::Bool(true)));
        assert_eq!(cpu.query("cc.c"), Some(Value::Bool(false)));
        assert_eq!(cpu.query("nope"), None);
        for path in cpu.query_paths() {
            assert!(cpu.query(path).is_some(), "{path} not answered");
        }
    }

    #[test]
    fn named_register_access() {
        let mut cpu = Mc6809::new();
        cpu.set_register("x", 0xBEEF).unwrap();
        assert_eq!(cpu.get_register("X"), Ok(0xBEEF));
        assert!(cpu.set_register("dp", 0x100).is_err());
        assert!(cpu.get_register("q").is_err());
    }
}
