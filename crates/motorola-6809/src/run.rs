//! Run-loop configuration and the bounded run used by test harnesses.

use emu_core::Bus;
use log::debug;

use crate::cpu::Mc6809;
use crate::error::CpuError;

/// What to do when an opcode with no instruction is fetched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IllegalOpcodePolicy {
    /// Stop with [`CpuError::IllegalOpcode`], PC left on the opcode.
    #[default]
    Fail,
    /// Treat the opcode as a 1-byte, 1-cycle no-op.
    Ignore,
}

/// Per-CPU execution options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunConfig {
    pub illegal_opcode: IllegalOpcodePolicy,
    /// Log every executed instruction at trace level.
    pub trace: bool,
}

/// Why [`Mc6809::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// PC reached the requested end address.
    ReachedEnd,
    /// The step budget ran out first.
    StepLimit,
}

/// Outcome of a bounded run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub steps: u64,
    pub cycles: u64,
    pub stop: StopReason,
}

impl Mc6809 {
    /// Set PC to `start` and step until PC equals `end`, or `max_steps`
    /// steps have run.
    ///
    /// The end check happens before each step, so a run that starts on
    /// `end` executes nothing.
    pub fn run<B: Bus>(
        &mut self,
        bus: &mut B,
        start: u16,
        end: Option<u16>,
        max_steps: u64,
    ) -> Result<RunSummary, CpuError> {
        self.regs_mut().pc = start;
        let mut steps = 0;
        let mut cycles = 0;

        let stop = loop {
            if end == Some(self.regs().pc) {
                break StopReason::ReachedEnd;
            }
            if steps >= max_steps {
                break StopReason::StepLimit;
            }
            cycles += u64::from(self.step(bus)?);
            steps += 1;
        };

        debug!("run from ${start:04X} stopped after {steps} steps, {cycles} cycles: {stop:?}");
        Ok(RunSummary {
            steps,
            cycles,
            stop,
        })
    }
}
