//! Prelude module for common re-exports.
//!
//! Consumers can do `use sps_common::prelude::*;` and get the most
//! important types without listing individual paths.

// ─── Logging ────────────────────────────────────────────────────────
pub use crate::config::LogLevel;

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, StackConfig};

// ─── Profiles ───────────────────────────────────────────────────────
pub use crate::profile::{ActuatorProfile, BusProfile, ScanDirection};

// ─── System Constants ───────────────────────────────────────────────
pub use crate::consts::{
    MAX_FOCUS_POSITIONS, MAX_MEMORY_WRITE, MAX_TRANSACTION_SIZE, MEM_VERIFY_WINDOW,
    MEM_WRITE_ATTEMPTS, VIRTUAL_COORDINATE_HEIGHT, VIRTUAL_COORDINATE_WIDTH,
};
