//! Configuration loading traits and types.
//!
//! Standardized TOML configuration loading for the stack. Applications embed
//! [`StackConfig`] (or its pieces) in their own configuration structs and
//! load them through [`ConfigLoader`].

use crate::profile::{ActuatorProfile, BusProfile};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Error type for configuration loading operations.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Configuration file not found at specified path.
    #[error("Configuration file not found")]
    FileNotFound,

    /// TOML parsing failed.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Semantic validation failed.
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

/// Log level for application logging.
///
/// Uses lowercase serde values for TOML compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Most verbose, detailed tracing information.
    Trace,
    /// Debug information useful during development.
    Debug,
    /// General information about application operation.
    #[default]
    Info,
    /// Warning messages for potentially problematic situations.
    Warn,
    /// Error messages for serious problems.
    Error,
}

/// Full configuration of one sensor peripheral stack instance.
///
/// # TOML Example
///
/// ```toml
/// log_level = "debug"
/// service_name = "sps-front-imu"
///
/// [bus]
/// bus_addr = 0x68
/// bank_select_reg = 0x6D
/// mem_start_reg = 0x6E
/// mem_rw_reg = 0x6F
///
/// [actuator]
/// pos_size_bit = 10
/// direction = "near_to_far"
/// valid_time_us = 33000
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StackConfig {
    /// Logging verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Stack instance identifier.
    pub service_name: String,

    /// Peripheral bus register map.
    #[serde(default)]
    pub bus: BusProfile,

    /// Focus actuator geometry and timing.
    #[serde(default)]
    pub actuator: ActuatorProfile,
}

impl StackConfig {
    /// Validate the configuration and all embedded profiles.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if `service_name` is empty or
    /// either profile fails its own validation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service_name.is_empty() {
            return Err(ConfigError::ValidationError(
                "service_name cannot be empty".to_string(),
            ));
        }
        self.bus.validate()?;
        self.actuator.validate()?;
        Ok(())
    }
}

/// Trait for loading configuration from TOML files.
///
/// # Contract
///
/// - Returns `ConfigError::FileNotFound` if the file does not exist
/// - Returns `ConfigError::ParseError` if TOML syntax is invalid
/// - Returns `ConfigError::ValidationError` if semantic validation fails
pub trait ConfigLoader: Sized + serde::de::DeserializeOwned {
    /// Load configuration from a TOML file.
    fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound
            } else {
                ConfigError::ParseError(e.to_string())
            }
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

// Blanket implementation for all types that implement DeserializeOwned.
impl<T: serde::de::DeserializeOwned> ConfigLoader for T {}
