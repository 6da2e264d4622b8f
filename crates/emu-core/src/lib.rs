//! Core traits and types for cycle-accurate emulation.
//!
//! Every component counts time in CPU cycles derived from the master
//! crystal. Buses are passed to CPUs, never owned by them.

mod bus;
mod clock;
mod cpu;
mod observable;

pub use bus::{Bus, SimpleBus};
pub use clock::{MasterClock, Ticks};
pub use cpu::Cpu;
pub use observable::{Observable, Value, parse_address};
