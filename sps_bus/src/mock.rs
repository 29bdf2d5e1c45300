//! Scripted transport backend for tests and bench harnesses.
//!
//! Records every exchange, serves read segments from a script queue, and can
//! truncate completion to simulate a failing bus.

use crate::transport::{Segment, Transport};
use std::collections::VecDeque;

/// Completed segment as observed by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentRecord {
    /// Bytes the access layer wrote, including the register/opcode prefix.
    Write(Vec<u8>),
    /// Length of a read segment served from the script queue.
    Read(usize),
}

/// One recorded `exchange` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeRecord {
    /// Peripheral address the transaction targeted.
    pub addr: u8,
    /// Segments that completed, in program order.
    pub segments: Vec<SegmentRecord>,
}

/// Scripted in-memory transport.
#[derive(Debug, Default)]
pub struct MockTransport {
    exchanges: Vec<ExchangeRecord>,
    read_scripts: VecDeque<Vec<u8>>,
    complete_limit: Option<usize>,
}

impl MockTransport {
    /// Fresh transport with no scripts and full completion.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue payload bytes for the next unserved read segment.
    pub fn push_read(&mut self, data: impl Into<Vec<u8>>) {
        self.read_scripts.push_back(data.into());
    }

    /// Complete at most `n` segments of every subsequent exchange.
    pub fn complete_only(&mut self, n: usize) {
        self.complete_limit = Some(n);
    }

    /// Restore full segment completion.
    pub fn complete_all(&mut self) {
        self.complete_limit = None;
    }

    /// Number of exchanges issued so far.
    pub fn exchange_count(&self) -> usize {
        self.exchanges.len()
    }

    /// All recorded exchanges, oldest first.
    pub fn exchanges(&self) -> &[ExchangeRecord] {
        &self.exchanges
    }

    /// Exchanges whose segment count matches `segments` — convenient for
    /// telling three-segment memory writes from four-segment read-backs.
    pub fn exchanges_with_segments(&self, segments: usize) -> usize {
        self.exchanges
            .iter()
            .filter(|e| e.segments.len() == segments)
            .count()
    }
}

impl Transport for MockTransport {
    fn exchange(&mut self, addr: u8, segments: &mut [Segment<'_>]) -> usize {
        let limit = self
            .complete_limit
            .unwrap_or(segments.len())
            .min(segments.len());

        let mut record = ExchangeRecord {
            addr,
            segments: Vec::with_capacity(limit),
        };

        for segment in segments.iter_mut().take(limit) {
            match segment {
                Segment::Write(data) => record.segments.push(SegmentRecord::Write(data.to_vec())),
                Segment::Read(buf) => {
                    if let Some(script) = self.read_scripts.pop_front() {
                        let n = script.len().min(buf.len());
                        buf[..n].copy_from_slice(&script[..n]);
                    }
                    record.segments.push(SegmentRecord::Read(buf.len()));
                }
            }
        }

        self.exchanges.push(record);
        limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_writes_and_serves_reads() {
        let mut mock = MockTransport::new();
        mock.push_read([7, 8]);

        let cmd = [0x10u8];
        let mut buf = [0u8; 2];
        let mut segments = [Segment::Write(&cmd), Segment::Read(&mut buf)];
        let completed = mock.exchange(0x68, &mut segments);

        assert_eq!(completed, 2);
        assert_eq!(buf, [7, 8]);
        assert_eq!(mock.exchanges()[0].addr, 0x68);
    }

    #[test]
    fn completion_limit_truncates() {
        let mut mock = MockTransport::new();
        mock.complete_only(1);

        let a = [1u8];
        let b = [2u8];
        let mut segments = [Segment::Write(&a), Segment::Write(&b)];
        assert_eq!(mock.exchange(0x68, &mut segments), 1);
        assert_eq!(mock.exchanges()[0].segments.len(), 1);

        mock.complete_all();
        let mut segments = [Segment::Write(&a), Segment::Write(&b)];
        assert_eq!(mock.exchange(0x68, &mut segments), 2);
    }

    #[test]
    fn unserved_read_leaves_buffer_untouched() {
        let mut mock = MockTransport::new();
        let mut buf = [0xEEu8; 2];
        let mut segments = [Segment::Read(&mut buf)];
        assert_eq!(mock.exchange(0x68, &mut segments), 1);
        assert_eq!(buf, [0xEE, 0xEE]);
    }
}
