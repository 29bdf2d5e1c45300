//! Device handle shared by the register and banked memory access layers.

use crate::transport::Transport;
use sps_common::profile::BusProfile;
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;

/// Error types for bus access operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BusError {
    /// Malformed call rejected before any bus activity.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// Transfer length exceeds the transaction ceiling; nothing was issued.
    #[error("transfer length {len} exceeds ceiling {max}")]
    OutOfRange { len: usize, max: usize },

    /// The transport completed fewer segments than the transaction requested.
    #[error("bus exchange incomplete: {completed}/{requested} segments")]
    Io { requested: usize, completed: usize },
}

/// Handle to one banked-memory peripheral on the bus.
///
/// The transport is held behind a `Mutex` scoped to this device. Register
/// accesses take the lock per transaction; banked memory accesses hold it
/// from bank-select through the data transfer (and across write-verify
/// read-backs), so two callers can never corrupt each other's addressing
/// state on the device.
pub struct Device<T: Transport> {
    bus: Mutex<T>,
    profile: BusProfile,
}

impl<T: Transport> Device<T> {
    /// Create a device handle for the peripheral described by `profile`.
    pub fn new(transport: T, profile: BusProfile) -> Self {
        Self {
            bus: Mutex::new(transport),
            profile,
        }
    }

    /// Register map and bus address of this device.
    #[inline]
    pub fn profile(&self) -> &BusProfile {
        &self.profile
    }

    /// Consume the handle and return the transport.
    pub fn into_transport(self) -> T {
        self.bus.into_inner().unwrap_or_else(|e| e.into_inner())
    }

    /// Acquire the device-scoped bus lock.
    ///
    /// Poisoning is recovered; each exchange is atomic at the transport
    /// level, so a panicked holder leaves no half-written transaction.
    pub(crate) fn lock_bus(&self) -> MutexGuard<'_, T> {
        self.bus.lock().unwrap_or_else(|e| e.into_inner())
    }
}
