//! Top-level Simple 6809 system.
//!
//! A 6809 with 64 KiB of RAM, a ROM image copied in at start-up and the
//! ACIA console at $A000/$A001. The board runs from a 3.6864 MHz crystal
//! divided by four inside the CPU.
//!
//! One operation is one CPU step: an instruction, an interrupt entry or a
//! wait poll.

use std::time::Duration;

use emu_core::{MasterClock, Observable, Value, parse_address};
use log::info;
use motorola_6809::{CpuState, Mc6809, Memory};
use serde::{Deserialize, Serialize};

use crate::acia::Console;
use crate::config::Simple6809Config;
use crate::error::MachineError;

/// Crystal frequency in Hz.
const CRYSTAL_HZ: u64 = 3_686_400;

/// Crystal cycles per CPU cycle.
const CPU_DIVIDER: u64 = 4;

const ADDRESS_SPACE: usize = 0x1_0000;

/// Saved machine state: CPU, all of RAM and the operation count.
///
/// Console buffers are host state and are not included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub cpu: CpuState,
    pub ram: Vec<u8>,
    pub ops: u64,
}

/// Simple 6809 single-board computer.
#[derive(Debug)]
pub struct Simple6809 {
    cpu: Mc6809,
    memory: Memory,
    console: Console,
    clock: MasterClock,
    /// Operations executed since creation.
    ops: u64,
    max_ops: Option<u64>,
}

impl Simple6809 {
    /// Build the machine, load the ROM and reset the CPU.
    pub fn new(config: &Simple6809Config) -> Result<Self, MachineError> {
        let console = Console::new();
        let mut memory = Memory::with_hooks(console.hooks());

        if let Some(rom) = &config.rom {
            let address = config.rom_address;
            if usize::from(address) + rom.len() > ADDRESS_SPACE {
                return Err(MachineError::RomTooLarge {
                    address,
                    len: rom.len(),
                });
            }
            memory.load(address, rom);
            info!("loaded {} byte ROM at ${address:04X}", rom.len());
        }

        let mut cpu = Mc6809::new().with_config(config.run_config());
        cpu.reset(&mut memory);

        Ok(Self {
            cpu,
            memory,
            console,
            clock: MasterClock::new(CRYSTAL_HZ, CPU_DIVIDER),
            ops: 0,
            max_ops: config.max_ops,
        })
    }

    /// Reset the CPU through the reset vector. RAM is kept.
    pub fn reset(&mut self) {
        self.cpu.reset(&mut self.memory);
    }

    /// Execute one operation. Returns the cycles it took.
    pub fn step(&mut self) -> Result<u32, MachineError> {
        if let Some(limit) = self.max_ops {
            if self.ops >= limit {
                return Err(MachineError::OpLimit(limit));
            }
        }
        let cycles = self.cpu.step(&mut self.memory)?;
        self.ops += 1;
        Ok(cycles)
    }

    /// Execute `count` operations. Returns the cycles they took.
    pub fn run_ops(&mut self, count: u64) -> Result<u64, MachineError> {
        let start = self.cpu.total_cycles();
        for _ in 0..count {
            self.step()?;
        }
        Ok(self.cpu.total_cycles().since(start).get())
    }

    /// Run until the configured operation limit. Without a limit this only
    /// returns on error.
    pub fn run(&mut self) -> Result<u64, MachineError> {
        loop {
            match self.step() {
                Ok(_) => {}
                Err(MachineError::OpLimit(limit)) => {
                    info!(
                        "stopped after {limit} operations ({}) at ${:04X}",
                        self.cpu.total_cycles(),
                        self.cpu.regs().pc
                    );
                    return Ok(self.ops);
                }
                Err(e) => {
                    info!("stopped at ${:04X}: {e}", self.cpu.regs().pc);
                    return Err(e);
                }
            }
        }
    }

    /// Run until the console output contains `pattern`, for at most
    /// `max_ops` operations.
    ///
    /// Returns (and drains) all output produced while waiting.
    pub fn run_until_output(
        &mut self,
        pattern: &str,
        max_ops: u64,
    ) -> Result<String, MachineError> {
        let mut seen = String::new();
        for _ in 0..max_ops {
            self.step()?;
            if self.console.pending_output() > 0 {
                seen.push_str(&self.console.take_output());
                if seen.contains(pattern) {
                    return Ok(seen);
                }
            }
        }
        info!("gave up waiting for {pattern:?}, got {seen:?}");
        Err(MachineError::OutputTimeout {
            pattern: pattern.to_owned(),
            ops: max_ops,
        })
    }

    /// Queue keyboard input for the ACIA.
    pub fn push_input(&self, text: &str) {
        self.console.push_input(text);
    }

    /// Drain console output.
    pub fn take_output(&self) -> String {
        self.console.take_output()
    }

    /// Drain console output as lines, CR/LF stripped.
    pub fn output_lines(&self) -> Vec<String> {
        self.take_output().lines().map(str::to_owned).collect()
    }

    /// Shared handle to the console buffers.
    #[must_use]
    pub fn console(&self) -> &Console {
        &self.console
    }

    #[must_use]
    pub fn cpu(&self) -> &Mc6809 {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut Mc6809 {
        &mut self.cpu
    }

    #[must_use]
    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }

    /// Operations executed since creation.
    #[must_use]
    pub fn ops(&self) -> u64 {
        self.ops
    }

    /// Emulated time since creation.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.clock.duration_of(self.cpu.total_cycles())
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            cpu: self.cpu.save_state(),
            ram: self.memory.dump(0, ADDRESS_SPACE),
            ops: self.ops,
        }
    }

    pub fn restore(&mut self, snapshot: &Snapshot) -> Result<(), MachineError> {
        if snapshot.ram.len() != ADDRESS_SPACE {
            return Err(MachineError::SnapshotSize(snapshot.ram.len()));
        }
        self.memory.load(0, &snapshot.ram);
        self.cpu.load_state(&snapshot.cpu);
        self.ops = snapshot.ops;
        Ok(())
    }

    /// Snapshot as JSON.
    pub fn save_json(&self) -> Result<String, MachineError> {
        Ok(serde_json::to_string(&self.snapshot())?)
    }

    pub fn load_json(&mut self, json: &str) -> Result<(), MachineError> {
        let snapshot: Snapshot = serde_json::from_str(json)?;
        self.restore(&snapshot)
    }
}

impl Observable for Simple6809 {
    fn query(&self, path: &str) -> Option<Value> {
        if let Some(rest) = path.strip_prefix("cpu.") {
            self.cpu.query(rest)
        } else if let Some(rest) = path.strip_prefix("memory.") {
            parse_address(rest).map(|addr| Value::U8(self.memory.peek(addr)))
        } else {
            match path {
                "ops" => Some(self.ops.into()),
                "acia.input_pending" => Some((self.console.pending_input() as u64).into()),
                "acia.output_pending" => Some((self.console.pending_output() as u64).into()),
                _ => self.cpu.query(path),
            }
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &[
            "cpu.<6809_paths>",
            "memory.<address>",
            "ops",
            "acia.input_pending",
            "acia.output_pending",
        ]
    }
}
