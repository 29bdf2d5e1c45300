//! # SPS Actuator Library
//!
//! Closed-loop lens actuator positioning for the sensor peripheral stack.
//!
//! Two halves:
//!
//! 1. **Position engine** — pure conversion between heterogeneous position
//!    coordinate systems (bit depth + scan direction) and a directional
//!    binary search over the calibration position table. No I/O, no
//!    allocation on the hot path.
//! 2. **Commit loop** — AF-window requests arm a one-shot timer whose
//!    expiry hands the pending move to a deferred worker for the actual
//!    register-write commit. A single-slot mailbox makes the last-write-wins
//!    supersede policy explicit.

pub mod commit;
pub mod position;

pub use commit::{AfWindow, CommitLoop, CommitPhase, DeferredQueue, OneShotTimer};
pub use position::{PositionError, PositionFormat, PositionTable, SearchOutcome, convert_position};
pub use sps_common::profile::ScanDirection;
