//! SPS Common Library
//!
//! Shared constants, device/actuator profiles and configuration loading for
//! the sensor peripheral stack workspace.
//!
//! # Module Structure
//!
//! - [`consts`] - Transaction limits, table capacity, virtual coordinate space
//! - [`profile`] - Bus and actuator profile types with validation
//! - [`config`] - Configuration loading traits and types
//! - [`prelude`] - Common re-exports for convenience

pub mod config;
pub mod consts;
pub mod prelude;
pub mod profile;
