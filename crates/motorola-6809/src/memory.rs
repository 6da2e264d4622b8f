//! 64 KiB memory with per-address peripheral hooks.
//!
//! Every access checks the hook table first. A read hook supplies the byte
//! for its address; a write hook receives the value and RAM underneath is
//! left alone. Unhooked addresses go to flat RAM.
//!
//! Hooks are called with the cycle count and the address of the
//! instruction in progress, which the CPU announces through
//! [`Bus::begin_instruction`] before each instruction.

use std::collections::HashMap;
use std::fmt;

use emu_core::{Bus, SimpleBus};

/// Read hook: `(cycles, instruction_address, address) -> byte`.
pub type ReadHook = Box<dyn FnMut(u64, u16, u16) -> u8 + Send>;

/// Write hook: `(cycles, instruction_address, address, value)`.
pub type WriteHook = Box<dyn FnMut(u64, u16, u16, u8) + Send>;

/// Address to hook registration table.
///
/// Machines build one of these and hand it to [`Memory::with_hooks`].
#[derive(Default)]
pub struct Hooks {
    read: HashMap<u16, ReadHook>,
    write: HashMap<u16, WriteHook>,
}

impl Hooks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a read hook for `address`, replacing any earlier one.
    #[must_use]
    pub fn on_read<F>(mut self, address: u16, hook: F) -> Self
    where
        F: FnMut(u64, u16, u16) -> u8 + Send + 'static,
    {
        self.read.insert(address, Box::new(hook));
        self
    }

    /// Add a write hook for `address`, replacing any earlier one.
    #[must_use]
    pub fn on_write<F>(mut self, address: u16, hook: F) -> Self
    where
        F: FnMut(u64, u16, u16, u8) + Send + 'static,
    {
        self.write.insert(address, Box::new(hook));
        self
    }

    /// Hooked read addresses, sorted.
    #[must_use]
    pub fn read_addresses(&self) -> Vec<u16> {
        let mut addresses: Vec<u16> = self.read.keys().copied().collect();
        addresses.sort_unstable();
        addresses
    }

    /// Hooked write addresses, sorted.
    #[must_use]
    pub fn write_addresses(&self) -> Vec<u16> {
        let mut addresses: Vec<u16> = self.write.keys().copied().collect();
        addresses.sort_unstable();
        addresses
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("read", &self.read_addresses())
            .field("write", &self.write_addresses())
            .finish()
    }
}

/// The 6809 address space.
pub struct Memory {
    ram: SimpleBus,
    hooks: Hooks,
    /// Cycle count announced for the current instruction.
    cycles: u64,
    /// Address of the current instruction.
    instruction_address: u16,
}

impl Memory {
    /// Plain RAM, no hooks.
    #[must_use]
    pub fn new() -> Self {
        Self::with_hooks(Hooks::new())
    }

    #[must_use]
    pub fn with_hooks(hooks: Hooks) -> Self {
        Self {
            ram: SimpleBus::new(),
            hooks,
            cycles: 0,
            instruction_address: 0,
        }
    }

    pub fn register_read_hook<F>(&mut self, address: u16, hook: F)
    where
        F: FnMut(u64, u16, u16) -> u8 + Send + 'static,
    {
        self.hooks.read.insert(address, Box::new(hook));
    }

    pub fn register_write_hook<F>(&mut self, address: u16, hook: F)
    where
        F: FnMut(u64, u16, u16, u8) + Send + 'static,
    {
        self.hooks.write.insert(address, Box::new(hook));
    }

    #[must_use]
    pub fn hooks(&self) -> &Hooks {
        &self.hooks
    }

    pub fn read_byte(&mut self, address: u16) -> u8 {
        match self.hooks.read.get_mut(&address) {
            Some(hook) => hook(self.cycles, self.instruction_address, address),
            None => self.ram.peek(address),
        }
    }

    /// Big-endian word; the second byte wraps past 0xFFFF.
    pub fn read_word(&mut self, address: u16) -> u16 {
        let hi = self.read_byte(address);
        let lo = self.read_byte(address.wrapping_add(1));
        u16::from_be_bytes([hi, lo])
    }

    pub fn write_byte(&mut self, address: u16, value: u8) {
        match self.hooks.write.get_mut(&address) {
            Some(hook) => hook(self.cycles, self.instruction_address, address, value),
            None => self.ram.poke(address, value),
        }
    }

    pub fn write_word(&mut self, address: u16, value: u16) {
        let [hi, lo] = value.to_be_bytes();
        self.write_byte(address, hi);
        self.write_byte(address.wrapping_add(1), lo);
    }

    /// Stage bytes straight into RAM, bypassing hooks. Wraps at 0xFFFF.
    pub fn load(&mut self, address: u16, data: &[u8]) {
        self.ram.load(address, data);
    }

    /// Raw RAM contents, bypassing hooks.
    #[must_use]
    pub fn peek(&self, address: u16) -> u8 {
        self.ram.peek(address)
    }

    /// Raw RAM range starting at `address`, wrapping at 0xFFFF.
    #[must_use]
    pub fn dump(&self, address: u16, len: usize) -> Vec<u8> {
        (0..len)
            .map(|i| self.ram.peek(address.wrapping_add(i as u16)))
            .collect()
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Memory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memory")
            .field("hooks", &self.hooks)
            .field("cycles", &self.cycles)
            .field("instruction_address", &self.instruction_address)
            .finish_non_exhaustive()
    }
}

impl Bus for Memory {
    fn read(&mut self, address: u16) -> u8 {
        self.read_byte(address)
    }

    fn write(&mut self, address: u16, value: u8) {
        self.write_byte(address, value);
    }

    fn begin_instruction(&mut self, cycles: u64, pc: u16) {
        self.cycles = cycles;
        self.instruction_address = pc;
    }
}
