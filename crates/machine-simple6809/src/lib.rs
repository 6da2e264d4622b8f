//! Grant Searle's Simple 6809 single-board computer.
//!
//! A Motorola 6809, 64 KiB of memory and a 6850 ACIA serial console. The
//! host talks to the machine through [`Console`]: text pushed in is read
//! by the ROM from the ACIA data register, and everything the ROM
//! transmits collects in the output buffer.

mod acia;
mod config;
mod error;
mod machine;

pub use acia::{ACIA_DATA, ACIA_STATUS, Console, remap_output};
pub use config::{DEFAULT_ROM_ADDRESS, Simple6809Config};
pub use error::MachineError;
pub use machine::{Simple6809, Snapshot};
