//! Machine-level errors.

use motorola_6809::CpuError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MachineError {
    #[error(transparent)]
    Cpu(#[from] CpuError),

    #[error("ROM of {len} bytes does not fit at ${address:04X}")]
    RomTooLarge { address: u16, len: usize },

    #[error("operation limit of {0} reached")]
    OpLimit(u64),

    #[error("{pattern:?} not seen after {ops} operations")]
    OutputTimeout { pattern: String, ops: u64 },

    #[error("snapshot holds {0} bytes of RAM, expected 65536")]
    SnapshotSize(usize),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),
}
