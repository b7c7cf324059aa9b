use crate::error::{MachineError, Result};
use std::collections::BTreeSet;
use std::time::Duration;

/// how many visible-effect instructions run between forced screen refreshes
pub const DEFAULT_REFRESH_INTERVAL: u64 = 500;

/// two 64K halves either side of the origin
pub const DEFAULT_TAPE_SIZE: usize = 0x20000;

/// hex dump rows are this wide, so the tape must be a multiple of it
pub const ROW_BYTES: usize = 16;

/// Settings for a single `TapeMachine`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MachineConfig {
    pub refresh_interval: u64,
    pub tape_size: usize,
}

impl Default for MachineConfig {
    fn default() -> Self {
        MachineConfig {
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            tape_size: DEFAULT_TAPE_SIZE,
        }
    }
}

impl MachineConfig {
    /// pointer start position
    pub fn origin(&self) -> usize {
        self.tape_size / 2
    }

    pub fn validate(&self) -> Result<()> {
        if self.refresh_interval == 0 {
            return Err(MachineError::InvalidConfig(
                "refresh interval must be at least 1".to_string(),
            ));
        }
        if self.tape_size == 0 || self.tape_size % ROW_BYTES != 0 {
            return Err(MachineError::InvalidConfig(format!(
                "tape size {} must be a positive multiple of {}",
                self.tape_size, ROW_BYTES
            )));
        }
        Ok(())
    }
}

/// Settings for the fetch-execute loop.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DriverConfig {
    pub machine: MachineConfig,
    /// pause before executing any of these pcs
    pub breakpoints: BTreeSet<usize>,
    /// pause and redraw before every instruction
    pub step: bool,
    /// sleep this long after each redraw
    pub frame_delay: Option<Duration>,
}

impl DriverConfig {
    pub fn validate(&self) -> Result<()> {
        self.machine.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = DriverConfig::default();
        assert_eq!(c.machine.refresh_interval, 500);
        assert_eq!(c.machine.origin(), 0x10000);
        assert!(c.breakpoints.is_empty());
        assert!(!c.step);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_interval() {
        let c = MachineConfig {
            refresh_interval: 0,
            ..MachineConfig::default()
        };
        assert!(matches!(c.validate(), Err(MachineError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_ragged_tape() {
        for tape_size in [0, 15, 100] {
            let c = MachineConfig {
                tape_size,
                ..MachineConfig::default()
            };
            assert!(c.validate().is_err(), "tape size {} accepted", tape_size);
        }
    }
}
