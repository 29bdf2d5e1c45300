//! Device profile types.
//!
//! A profile carries the fixed constants the hardware integration supplies:
//! the peripheral's bus address, the three registers of the banked memory
//! window, and the actuator's coordinate geometry. Profiles are deserialized
//! from the stack configuration file and validated before use.

use crate::config::ConfigError;
use serde::{Deserialize, Serialize};

/// Scan direction of an actuator position range.
///
/// Determines both the sort order of the calibration position table and the
/// mirroring applied when converting between coordinate systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScanDirection {
    /// Positions ascend from near focus toward infinity.
    #[default]
    NearToFar,
    /// Positions descend from infinity toward near focus.
    FarToNear,
}

/// Register map and bus address for the banked-memory peripheral.
///
/// The device exposes its internal memory through a narrow register window:
/// one bank-select register, one offset register and one data register.
/// All three ids are device constants, not discovered at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusProfile {
    /// Peripheral address on the shared bus.
    pub bus_addr: u8,
    /// Bank-select register (high byte of the 16-bit memory address).
    pub bank_select_reg: u8,
    /// Start-offset register (low byte of the 16-bit memory address).
    pub mem_start_reg: u8,
    /// Data/opcode register the bulk transfer moves through.
    pub mem_rw_reg: u8,
}

impl Default for BusProfile {
    fn default() -> Self {
        // Classic MPU-class memory window.
        Self {
            bus_addr: 0x68,
            bank_select_reg: 0x6D,
            mem_start_reg: 0x6E,
            mem_rw_reg: 0x6F,
        }
    }
}

impl BusProfile {
    /// Validate the register map.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if any two window registers
    /// share an id — a duplicated id would alias bank and offset writes.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bank_select_reg == self.mem_start_reg
            || self.bank_select_reg == self.mem_rw_reg
            || self.mem_start_reg == self.mem_rw_reg
        {
            return Err(ConfigError::ValidationError(
                "banked memory window registers must be distinct".to_string(),
            ));
        }
        Ok(())
    }
}

/// Geometry and timing of the focus actuator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActuatorProfile {
    /// Maximum position expressed as a power-of-two exponent (bit depth).
    pub pos_size_bit: u32,
    /// Scan direction of the hardware position range.
    pub direction: ScanDirection,
    /// AF-window valid-time budget in microseconds (commit delay base).
    pub valid_time_us: u64,
}

impl Default for ActuatorProfile {
    fn default() -> Self {
        Self {
            pos_size_bit: 10,
            direction: ScanDirection::NearToFar,
            valid_time_us: 33_000,
        }
    }
}

impl ActuatorProfile {
    /// Validate the actuator geometry.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if:
    /// - `pos_size_bit` is 0 or does not fit a `u32` position value
    /// - `valid_time_us` is 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pos_size_bit == 0 || self.pos_size_bit > 31 {
            return Err(ConfigError::ValidationError(format!(
                "pos_size_bit must be in 1..=31, got {}",
                self.pos_size_bit
            )));
        }
        if self.valid_time_us == 0 {
            return Err(ConfigError::ValidationError(
                "valid_time_us cannot be 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Largest representable raw position for this bit depth.
    #[inline]
    pub const fn max_position(&self) -> u32 {
        (1u32 << self.pos_size_bit) - 1
    }
}
