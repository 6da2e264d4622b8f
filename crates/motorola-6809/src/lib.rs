//! Motorola 6809 CPU emulator.
//!
//! Each call to `step()` executes one instruction, enters one interrupt,
//! or spends one cycle waiting in CWAI/SYNC, and returns the cycles used.
//! Memory is reached through [`emu_core::Bus`]; [`Memory`] is the hooked
//! 64 KiB implementation machines build on.

mod alu;
mod cpu;
mod error;
pub mod flags;
mod memory;
pub mod opcodes;
mod registers;
mod run;

pub use cpu::{
    CpuState, ExecState, FIRQ_VECTOR, IRQ_VECTOR, InterruptLine, Mc6809, NMI_VECTOR, Operand,
    PendingLines, RESET_VECTOR, SWI_VECTOR, SWI2_VECTOR, SWI3_VECTOR,
};
pub use error::CpuError;
pub use flags::ConditionCodes;
pub use memory::{Hooks, Memory, ReadHook, WriteHook};
pub use opcodes::{
    AddressingMode, Cycles, FlagEffect, FlagEffects, Instruction, InstructionTable, TableError,
};
pub use registers::{RegisterError, RegisterName, Registers};
pub use run::{IllegalOpcodePolicy, RunConfig, RunSummary, StopReason};
