//! Errors raised while stepping the CPU.

use thiserror::Error;

/// A step that could not complete.
///
/// The CPU state is left as it was at the point of failure: for an illegal
/// opcode PC still addresses the opcode, for a bad register selector the
/// instruction bytes have been consumed and no register has changed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CpuError {
    #[error("illegal opcode ${opcode:02X} at ${address:04X}")]
    IllegalOpcode { opcode: u16, address: u16 },

    #[error("invalid register selector ${postbyte:02X} at ${address:04X}")]
    InvalidRegisterSelector { postbyte: u8, address: u16 },
}
