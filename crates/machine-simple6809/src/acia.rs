//! Serial console of the Simple 6809: a 6850 ACIA seen through two
//! memory-mapped registers.
//!
//! Only the register behaviour the monitor ROM relies on is modelled. The
//! status register always reports "receive full, transmit empty"; reading
//! the data register with nothing queued yields 0x00, which the ROM treats
//! as "no key".

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use log::info;
use motorola_6809::Hooks;

/// Control (write) / status (read) register.
pub const ACIA_STATUS: u16 = 0xA000;

/// Transmit (write) / receive (read) data register.
pub const ACIA_DATA: u16 = 0xA001;

/// RDRF | TDRE.
const STATUS_READY: u8 = 0x03;

/// Character remapping applied by the console to every transmitted byte.
///
/// Bytes at or above 0x90 drop by 0x60, then bytes 0x00-0x09 are shifted up
/// to the letters `A`-`J`.
#[must_use]
pub const fn remap_output(value: u8) -> u8 {
    let value = if value >= 0x90 { value - 0x60 } else { value };
    if value <= 0x09 { value + 0x41 } else { value }
}

/// Host side of the serial line.
///
/// Cloning shares the buffers, so a host thread can feed input while the
/// machine runs on another.
#[derive(Debug, Clone, Default)]
pub struct Console {
    input: Arc<Mutex<VecDeque<u8>>>,
    output: Arc<Mutex<Vec<u8>>>,
}

impl Console {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue text for the CPU to read, one byte per data register read.
    pub fn push_input(&self, text: &str) {
        let mut input = self.input.lock().unwrap_or_else(PoisonError::into_inner);
        input.extend(text.bytes());
    }

    /// Bytes queued and not yet read by the CPU.
    #[must_use]
    pub fn pending_input(&self) -> usize {
        self.input.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Drain everything the CPU has transmitted so far.
    ///
    /// Bytes map one-to-one onto characters (Latin-1).
    pub fn take_output(&self) -> String {
        let mut output = self.output.lock().unwrap_or_else(PoisonError::into_inner);
        output.drain(..).map(char::from).collect()
    }

    /// Bytes transmitted and not yet taken.
    #[must_use]
    pub fn pending_output(&self) -> usize {
        self.output.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Hooks wiring the ACIA registers to this console.
    #[must_use]
    pub fn hooks(&self) -> Hooks {
        let input = Arc::clone(&self.input);
        let output = Arc::clone(&self.output);

        Hooks::new()
            .on_read(ACIA_STATUS, |_, _, _| STATUS_READY)
            // Control register writes (reset, word select) have no effect
            .on_write(ACIA_STATUS, |_, _, _, _| {})
            .on_read(ACIA_DATA, move |cycles, pc, _| {
                let mut input = input.lock().unwrap_or_else(PoisonError::into_inner);
                match input.pop_front() {
                    Some(byte) => {
                        let shown = char::from(byte);
                        info!("${pc:04X} ({cycles}) ACIA receive {shown:?} ${byte:02X}");
                        byte
                    }
                    None => 0x00,
                }
            })
            .on_write(ACIA_DATA, move |_, _, _, value| {
                let byte = remap_output(value);
                info!("ACIA transmit {:?} ${value:02X}", char::from(byte));
                output
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(byte);
            })
    }
}
