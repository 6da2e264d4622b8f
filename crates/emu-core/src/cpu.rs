//! CPU core trait.

use crate::Bus;

/// A CPU core stepped one instruction at a time.
///
/// CPUs execute instructions and access memory through a bus. The bus is
/// passed in, not owned, so the machine that owns both can hand the same
/// bus to other components between steps.
///
/// CPUs expose their internal state for observation and debugging.
pub trait Cpu {
    /// The type used for register inspection.
    type Registers;

    /// Condition reported when a step cannot complete.
    type Error;

    /// Execute one instruction, one interrupt entry, or one halted poll.
    ///
    /// Returns the number of CPU cycles consumed.
    fn step<B: Bus>(&mut self, bus: &mut B) -> Result<u32, Self::Error>;

    /// Returns the current program counter.
    ///
    /// Returns `u32` to support all CPU address widths. Narrower CPUs
    /// zero-extend.
    fn pc(&self) -> u32;

    /// Returns a snapshot of all registers for inspection.
    fn registers(&self) -> Self::Registers;

    /// Returns true if the CPU is waiting for an interrupt.
    fn is_halted(&self) -> bool;

    /// Request a maskable interrupt. Returns true if it is not masked.
    fn interrupt(&mut self) -> bool;

    /// Request a non-maskable interrupt.
    fn nmi(&mut self);

    /// Reset the CPU, fetching the reset vector through the bus.
    fn reset<B: Bus>(&mut self, bus: &mut B);
}
