//! Banked memory access layer.
//!
//! The device exposes its internal memory through a narrow register window:
//! a bank-select register (high byte of the 16-bit address), an offset
//! register (low byte) and a data register. The device's "current bank" is
//! hidden mutable state set by the most recent bank-select write, so every
//! call re-asserts bank and offset before transferring — prior state is
//! never assumed.
//!
//! `memory_write_verified` wraps the raw write with a read-back-and-compare
//! retry loop. The loop is best-effort: the returned status is the last
//! transport call's raw result, and a persistent verify mismatch surfaces
//! only through the logs and the [`WriteOutcome::verified`] flag.

use crate::device::{BusError, Device};
use crate::transport::{Segment, Transport};
use sps_common::consts::{
    MAX_MEMORY_WRITE, MAX_TRANSACTION_SIZE, MEM_VERIFY_WINDOW, MEM_WRITE_ATTEMPTS,
};
use tracing::{debug, error};

/// Result of a verified memory write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOutcome {
    /// True when the final attempt's read-back compared clean.
    ///
    /// Writes at or above the verify window are never read back and report
    /// `false`; callers wanting a strict guarantee must check this flag,
    /// not just the surrounding `Result`.
    pub verified: bool,
    /// Write attempts performed (1..=[`MEM_WRITE_ATTEMPTS`]).
    pub attempts: u8,
}

impl<T: Transport> Device<T> {
    /// Read `data.len()` bytes of device memory starting at `mem_addr`.
    ///
    /// Issues four ordered segments: bank-select write, offset write,
    /// data-register opcode write, then the data read.
    ///
    /// # Errors
    ///
    /// - `BusError::InvalidArgument` if `data` is empty
    /// - `BusError::Io` if fewer than four segments completed; `data` is
    ///   left untouched in that case
    pub fn memory_read(&self, mem_addr: u16, data: &mut [u8]) -> Result<(), BusError> {
        if data.is_empty() {
            return Err(BusError::InvalidArgument("read buffer is empty"));
        }
        let mut bus = self.lock_bus();
        self.memory_read_locked(&mut bus, mem_addr, data)
    }

    /// Write `data` to device memory starting at `mem_addr`, no verify.
    ///
    /// Issues three ordered write segments: bank-select, offset, then the
    /// data register followed by the payload.
    ///
    /// # Errors
    ///
    /// - `BusError::InvalidArgument` if `data` is empty
    /// - `BusError::OutOfRange` if the payload exceeds the transaction
    ///   ceiling; nothing is issued on the bus
    /// - `BusError::Io` if fewer than three segments completed
    pub fn memory_write(&self, mem_addr: u16, data: &[u8]) -> Result<(), BusError> {
        check_write_length(data)?;
        let mut bus = self.lock_bus();
        self.memory_write_locked(&mut bus, mem_addr, data)
    }

    /// Write `data` to device memory, read it back and retry on mismatch.
    ///
    /// Payloads shorter than [`MEM_VERIFY_WINDOW`] are re-read after every
    /// attempt and compared byte-for-byte; each mismatched byte is logged
    /// with its address, expected and actual value, and triggers another
    /// attempt, up to [`MEM_WRITE_ATTEMPTS`] total. The device lock is held
    /// across the whole loop.
    ///
    /// The returned `Result` carries the **last transport call's** status —
    /// a clean transport exchange with a persistent verify mismatch still
    /// returns `Ok`, with [`WriteOutcome::verified`] set to `false`.
    ///
    /// # Errors
    ///
    /// Same synchronous rejections as [`Device::memory_write`]; `Io` from
    /// the final write or read-back is returned verbatim.
    pub fn memory_write_verified(
        &self,
        mem_addr: u16,
        data: &[u8],
    ) -> Result<WriteOutcome, BusError> {
        check_write_length(data)?;
        let mut bus = self.lock_bus();

        let mut attempts: u8 = 0;
        let mut verified = false;
        let mut retry = true;
        let mut last = Ok(());

        while usize::from(attempts) < MEM_WRITE_ATTEMPTS && retry {
            retry = false;
            last = self.memory_write_locked(&mut bus, mem_addr, data);

            if data.len() < MEM_VERIFY_WINDOW {
                let mut readback = [0u8; MEM_VERIFY_WINDOW];
                let check = &mut readback[..data.len()];
                last = self.memory_read_locked(&mut bus, mem_addr, check);

                let mut mismatch = false;
                for (i, (&expected, &actual)) in data.iter().zip(check.iter()).enumerate() {
                    if expected != actual {
                        error!(
                            addr = mem_addr as usize + i,
                            expected, actual, "memory write verify mismatch"
                        );
                        mismatch = true;
                    }
                }
                if mismatch {
                    retry = true;
                }
                verified = last.is_ok() && !mismatch;
            }
            attempts += 1;
        }

        last.map(|()| WriteOutcome { verified, attempts })
    }

    fn memory_read_locked(
        &self,
        bus: &mut T,
        mem_addr: u16,
        data: &mut [u8],
    ) -> Result<(), BusError> {
        let profile = self.profile();
        let bank = [profile.bank_select_reg, (mem_addr >> 8) as u8];
        let offset = [profile.mem_start_reg, (mem_addr & 0xFF) as u8];
        let opcode = [profile.mem_rw_reg];
        let length = data.len();

        let mut segments = [
            Segment::Write(&bank),
            Segment::Write(&offset),
            Segment::Write(&opcode),
            Segment::Read(data),
        ];

        let completed = bus.exchange(profile.bus_addr, &mut segments);
        if completed != segments.len() {
            return Err(BusError::Io {
                requested: segments.len(),
                completed,
            });
        }

        debug!(mem_addr, length, "banked memory read");
        Ok(())
    }

    fn memory_write_locked(
        &self,
        bus: &mut T,
        mem_addr: u16,
        data: &[u8],
    ) -> Result<(), BusError> {
        let profile = self.profile();
        let bank = [profile.bank_select_reg, (mem_addr >> 8) as u8];
        let offset = [profile.mem_start_reg, (mem_addr & 0xFF) as u8];

        // Data register opcode travels in the same segment as the payload.
        let mut payload = [0u8; MAX_TRANSACTION_SIZE];
        payload[0] = profile.mem_rw_reg;
        payload[1..=data.len()].copy_from_slice(data);

        let mut segments = [
            Segment::Write(&bank),
            Segment::Write(&offset),
            Segment::Write(&payload[..data.len() + 1]),
        ];

        let completed = bus.exchange(profile.bus_addr, &mut segments);
        if completed != segments.len() {
            return Err(BusError::Io {
                requested: segments.len(),
                completed,
            });
        }

        debug!(mem_addr, length = data.len(), "banked memory write");
        Ok(())
    }
}

fn check_write_length(data: &[u8]) -> Result<(), BusError> {
    if data.is_empty() {
        return Err(BusError::InvalidArgument("write payload is empty"));
    }
    if data.len() >= MAX_MEMORY_WRITE {
        return Err(BusError::OutOfRange {
            len: data.len(),
            max: MAX_MEMORY_WRITE,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockTransport, SegmentRecord};
    use sps_common::profile::BusProfile;

    fn device(mock: MockTransport) -> Device<MockTransport> {
        Device::new(mock, BusProfile::default())
    }

    #[test]
    fn memory_write_segment_layout() {
        let dev = device(MockTransport::new());
        dev.memory_write(0x0123, &[0xDE, 0xAD]).unwrap();

        let mock = dev.into_transport();
        let segments = &mock.exchanges()[0].segments;
        assert_eq!(segments[0], SegmentRecord::Write(vec![0x6D, 0x01]));
        assert_eq!(segments[1], SegmentRecord::Write(vec![0x6E, 0x23]));
        assert_eq!(segments[2], SegmentRecord::Write(vec![0x6F, 0xDE, 0xAD]));
    }

    #[test]
    fn memory_write_rejects_oversized_payload() {
        let dev = device(MockTransport::new());
        let payload = vec![0u8; MAX_MEMORY_WRITE];
        assert_eq!(
            dev.memory_write(0x0000, &payload),
            Err(BusError::OutOfRange {
                len: MAX_MEMORY_WRITE,
                max: MAX_MEMORY_WRITE
            })
        );
        // Fail-fast: nothing reached the bus.
        assert_eq!(dev.into_transport().exchange_count(), 0);
    }

    #[test]
    fn memory_write_accepts_largest_legal_payload() {
        let dev = device(MockTransport::new());
        let payload = vec![0x55u8; MAX_MEMORY_WRITE - 1];
        dev.memory_write(0x0400, &payload).unwrap();

        let mock = dev.into_transport();
        let segments = &mock.exchanges()[0].segments;
        // Opcode byte plus the 511-byte payload.
        match &segments[2] {
            SegmentRecord::Write(bytes) => assert_eq!(bytes.len(), MAX_MEMORY_WRITE),
            other => panic!("expected write segment, got {other:?}"),
        }
    }

    #[test]
    fn memory_read_segment_layout() {
        let mut mock = MockTransport::new();
        mock.push_read([1, 2, 3]);
        let dev = device(mock);

        let mut data = [0u8; 3];
        dev.memory_read(0xABCD, &mut data).unwrap();
        assert_eq!(data, [1, 2, 3]);

        let mock = dev.into_transport();
        let segments = &mock.exchanges()[0].segments;
        assert_eq!(segments[0], SegmentRecord::Write(vec![0x6D, 0xAB]));
        assert_eq!(segments[1], SegmentRecord::Write(vec![0x6E, 0xCD]));
        assert_eq!(segments[2], SegmentRecord::Write(vec![0x6F]));
        assert_eq!(segments[3], SegmentRecord::Read(3));
    }

    #[test]
    fn memory_read_empty_buffer_rejected() {
        let dev = device(MockTransport::new());
        let mut data = [];
        assert!(matches!(
            dev.memory_read(0x0000, &mut data),
            Err(BusError::InvalidArgument(_))
        ));
    }

    #[test]
    fn verified_write_single_clean_attempt() {
        let mut mock = MockTransport::new();
        mock.push_read([0xCA, 0xFE]);
        let dev = device(mock);

        let outcome = dev.memory_write_verified(0x0100, &[0xCA, 0xFE]).unwrap();
        assert_eq!(
            outcome,
            WriteOutcome {
                verified: true,
                attempts: 1
            }
        );
        // One write transaction, one read-back.
        assert_eq!(dev.into_transport().exchange_count(), 2);
    }

    #[test]
    fn verified_write_skips_readback_at_window() {
        let dev = device(MockTransport::new());
        let payload = [0x11u8; MEM_VERIFY_WINDOW];

        let outcome = dev.memory_write_verified(0x0200, &payload).unwrap();
        assert_eq!(
            outcome,
            WriteOutcome {
                verified: false,
                attempts: 1
            }
        );
        assert_eq!(dev.into_transport().exchange_count(), 1);
    }
}
