//! Simple 6809 machine configuration.

use motorola_6809::{IllegalOpcodePolicy, RunConfig};
use serde::{Deserialize, Serialize};

use crate::error::MachineError;

/// Where the monitor/BASIC ROM sits on the board.
pub const DEFAULT_ROM_ADDRESS: u16 = 0xC000;

/// Configuration for creating a [`Simple6809`](crate::Simple6809).
///
/// Every field has a default, so a JSON config only needs the fields it
/// changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Simple6809Config {
    /// ROM image, copied into memory at `rom_address`. It normally covers
    /// the vectors at the top of memory.
    pub rom: Option<Vec<u8>>,
    pub rom_address: u16,
    /// Stop [`run`](crate::Simple6809::run) after this many operations.
    pub max_ops: Option<u64>,
    /// Log every executed instruction at trace level.
    pub trace: bool,
    pub illegal_opcode: IllegalOpcodePolicy,
}

impl Default for Simple6809Config {
    fn default() -> Self {
        Self {
            rom: None,
            rom_address: DEFAULT_ROM_ADDRESS,
            max_ops: None,
            trace: false,
            illegal_opcode: IllegalOpcodePolicy::Fail,
        }
    }
}

impl Simple6809Config {
    /// Parse a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, MachineError> {
        Ok(serde_json::from_str(json)?)
    }

    /// CPU options derived from this configuration.
    #[must_use]
    pub fn run_config(&self) -> RunConfig {
        RunConfig {
            illegal_opcode: self.illegal_opcode,
            trace: self.trace,
        }
    }
}
