//! # SPS Bus Library
//!
//! Register-level transport for a banked-memory peripheral on a shared bus.
//!
//! Two access layers sit on top of one collaborator-provided [`Transport`]
//! primitive:
//!
//! 1. **Register access** — single-register read/write, no retry policy.
//! 2. **Banked memory access** — flat 16-bit addressing over the device's
//!    narrow bank-select/offset/data register window, with an optional
//!    write-verify-retry wrapper.
//!
//! Both layers are synchronous and blocking; callers in restricted execution
//! contexts (timer callbacks) must hand off to a deferred worker before
//! touching the bus. A per-device lock spans every banked call so concurrent
//! callers cannot interleave their bank-select and offset writes.

pub mod banked;
pub mod device;
pub mod mock;
pub mod register;
pub mod transport;

pub use banked::WriteOutcome;
pub use device::{BusError, Device};
pub use transport::{Segment, Transport};
