//! Transport seam between the access layers and the bus implementation.
//!
//! The stack never owns the bus itself; a hardware integration supplies a
//! [`Transport`] and the access layers build multi-segment transactions on
//! top of it.

/// One directional unit within a bus transaction.
///
/// Invariant: a segment that reaches the bus carries a non-empty buffer.
/// The access layers enforce this before calling [`Transport::exchange`].
#[derive(Debug)]
pub enum Segment<'a> {
    /// Bytes written to the peripheral.
    Write(&'a [u8]),
    /// Buffer filled from the peripheral.
    Read(&'a mut [u8]),
}

impl Segment<'_> {
    /// Buffer length of this segment.
    #[inline]
    pub fn len(&self) -> usize {
        match self {
            Segment::Write(data) => data.len(),
            Segment::Read(buf) => buf.len(),
        }
    }

    /// True if the segment carries no bytes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Synchronous exchange primitive for a fixed-address peripheral.
///
/// # Contract
///
/// - Segments execute strictly in order as **one atomic bus transaction**:
///   no other transaction on the same bus may interleave between them.
/// - Returns the number of fully completed segments. Anything less than the
///   requested count is a failure; partially transferred segments do not
///   count as completed.
/// - Blocks until the exchange completes or the bus layer times out.
///   Timeouts belong to the implementation, not to the access layers.
pub trait Transport {
    /// Execute `segments` against the peripheral at `addr`.
    fn exchange(&mut self, addr: u8, segments: &mut [Segment<'_>]) -> usize;
}
