//! Single-register access layer.
//!
//! Thin two-segment / one-segment transactions over the transport. No retry
//! here; retry policy belongs to callers.

use crate::device::{BusError, Device};
use crate::transport::{Segment, Transport};
use tracing::trace;

impl<T: Transport> Device<T> {
    /// Read `data.len()` bytes starting at register `reg`.
    ///
    /// Issues a two-segment transaction: register-address write, then the
    /// data read.
    ///
    /// # Errors
    ///
    /// - `BusError::InvalidArgument` if `data` is empty
    /// - `BusError::Io` if the transport completed fewer than two segments
    pub fn read_reg(&self, reg: u8, data: &mut [u8]) -> Result<(), BusError> {
        if data.is_empty() {
            return Err(BusError::InvalidArgument("read buffer is empty"));
        }

        let addr = self.profile().bus_addr;
        let cmd = [reg];
        let length = data.len();
        let mut segments = [Segment::Write(&cmd), Segment::Read(data)];

        let completed = self.lock_bus().exchange(addr, &mut segments);
        if completed < segments.len() {
            return Err(BusError::Io {
                requested: segments.len(),
                completed,
            });
        }

        trace!(reg, length, "register read");
        Ok(())
    }

    /// Write one byte to register `reg`.
    ///
    /// Issues a single write segment carrying `[reg, value]`.
    ///
    /// # Errors
    ///
    /// `BusError::Io` if the transport completed zero segments.
    pub fn write_reg(&self, reg: u8, value: u8) -> Result<(), BusError> {
        let addr = self.profile().bus_addr;
        let frame = [reg, value];
        let mut segments = [Segment::Write(&frame)];

        let completed = self.lock_bus().exchange(addr, &mut segments);
        if completed < 1 {
            return Err(BusError::Io {
                requested: 1,
                completed,
            });
        }

        trace!(reg, value, "register write");
        Ok(())
    }
}
