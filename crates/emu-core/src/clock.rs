//! CPU cycle counts and the crystal they derive from.

use std::fmt;
use std::ops::AddAssign;
use std::time::Duration;

/// A count of CPU cycles.
///
/// CPU cores count every cycle they spend; machines turn counts into
/// emulated wall time through [`MasterClock`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ticks(pub u64);

impl Ticks {
    pub const ZERO: Self = Self(0);

    #[must_use]
    pub const fn new(count: u64) -> Self {
        Self(count)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Cycles from `earlier` up to this count. Zero if `earlier` is later.
    #[must_use]
    pub const fn since(self, earlier: Self) -> Self {
        Self(self.0.saturating_sub(earlier.0))
    }
}

impl AddAssign<u32> for Ticks {
    fn add_assign(&mut self, cycles: u32) {
        self.0 += u64::from(cycles);
    }
}

impl fmt::Display for Ticks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} cycles", self.0)
    }
}

/// Master clock configuration for a system.
///
/// Each system has a master crystal that drives all timing. The CPU runs at
/// the crystal frequency divided by `cpu_divider`.
#[derive(Debug, Clone, Copy)]
pub struct MasterClock {
    /// Crystal frequency in Hz (e.g., `3_686_400` for a 6809 SBC).
    pub frequency_hz: u64,
    /// Crystal cycles per CPU cycle (4 for a 6809 with internal oscillator).
    pub cpu_divider: u64,
}

impl MasterClock {
    #[must_use]
    pub const fn new(frequency_hz: u64, cpu_divider: u64) -> Self {
        Self {
            frequency_hz,
            cpu_divider,
        }
    }

    /// CPU cycles per second.
    #[must_use]
    pub const fn cpu_hz(&self) -> u64 {
        self.frequency_hz / self.cpu_divider
    }

    /// Emulated wall time covered by `cycles` CPU cycles.
    #[must_use]
    pub fn duration_of(&self, cycles: Ticks) -> Duration {
        let hz = self.cpu_hz().max(1);
        let secs = cycles.get() / hz;
        let rem = cycles.get() % hz;
        Duration::from_secs(secs) + Duration::from_nanos(rem * 1_000_000_000 / hz)
    }
}
