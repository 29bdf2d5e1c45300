//! Actuator position conversion and table lookup.
//!
//! Hardware, calibration and control code each express a focus position in
//! their own coordinate system: a bit depth (maximum position as a
//! power-of-two exponent) and a scan direction. [`convert_position`]
//! normalizes between them; [`PositionTable::search`] maps a physical
//! position back to its calibration table index.

use heapless::Vec;
use sps_common::consts::MAX_FOCUS_POSITIONS;
use sps_common::profile::ScanDirection;
use thiserror::Error;
use tracing::warn;

/// Error types for the position engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PositionError {
    /// Out-of-range position, bit depth, or malformed table.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
}

/// Coordinate system of a position value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionFormat {
    /// Maximum position expressed as a power-of-two exponent (1..=31).
    pub bit_depth: u32,
    /// Scan direction of the range.
    pub direction: ScanDirection,
}

impl PositionFormat {
    /// Shorthand constructor.
    #[inline]
    pub const fn new(bit_depth: u32, direction: ScanDirection) -> Self {
        Self {
            bit_depth,
            direction,
        }
    }
}

/// Convert `pos` from the `src` coordinate system to `tgt`.
///
/// The magnitude is rescaled by shifting toward the target bit depth, then
/// mirrored over the target range when the scan directions differ. Pure
/// function, no hidden state.
///
/// # Errors
///
/// `PositionError::InvalidArgument` if either bit depth is outside 1..=31
/// or `pos` does not fit the source bit depth.
pub fn convert_position(
    pos: u32,
    src: PositionFormat,
    tgt: PositionFormat,
) -> Result<u32, PositionError> {
    if src.bit_depth == 0 || src.bit_depth > 31 || tgt.bit_depth == 0 || tgt.bit_depth > 31 {
        return Err(PositionError::InvalidArgument("bit depth outside 1..=31"));
    }
    if pos >= 1u32 << src.bit_depth {
        return Err(PositionError::InvalidArgument(
            "position exceeds source bit depth",
        ));
    }

    // Rescale magnitude.
    let mut converted = pos;
    if src.bit_depth < tgt.bit_depth {
        converted <<= tgt.bit_depth - src.bit_depth;
    } else if src.bit_depth > tgt.bit_depth {
        converted >>= src.bit_depth - tgt.bit_depth;
    }

    // Mirror when the scan directions disagree.
    if src.direction != tgt.direction {
        converted = ((1u32 << tgt.bit_depth) - 1) - converted;
    }

    Ok(converted)
}

/// Result of a position table lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The position matched a table entry exactly.
    Exact(usize),
    /// No exact entry; the bracketing index left by the last midpoint.
    ///
    /// Actuator stop positions are quantization-lossy, so this is a success
    /// path with reduced precision, not an error.
    Closest(usize),
}

impl SearchOutcome {
    /// Table index regardless of match quality.
    #[inline]
    pub const fn index(&self) -> usize {
        match self {
            SearchOutcome::Exact(i) | SearchOutcome::Closest(i) => *i,
        }
    }
}

/// Calibration-derived sorted table of physical actuator stop positions.
///
/// Populated once during device init and read-only afterwards. Entries are
/// monotonic in the declared scan direction; the calibration collaborator
/// owns that invariant.
#[derive(Debug, Clone)]
pub struct PositionTable {
    positions: Vec<u32, MAX_FOCUS_POSITIONS>,
    direction: ScanDirection,
}

impl PositionTable {
    /// Build a table from calibration data.
    ///
    /// # Errors
    ///
    /// `PositionError::InvalidArgument` if `positions` is empty or exceeds
    /// [`MAX_FOCUS_POSITIONS`].
    pub fn from_slice(
        direction: ScanDirection,
        positions: &[u32],
    ) -> Result<Self, PositionError> {
        if positions.is_empty() {
            return Err(PositionError::InvalidArgument("position table is empty"));
        }
        let positions = Vec::from_slice(positions)
            .map_err(|_| PositionError::InvalidArgument("position table exceeds capacity"))?;
        Ok(Self {
            positions,
            direction,
        })
    }

    /// Declared scan direction of the table.
    #[inline]
    pub fn direction(&self) -> ScanDirection {
        self.direction
    }

    /// Number of calibration entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// True if the table holds no entries (unreachable after construction).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Entry at `index`, if present.
    #[inline]
    pub fn get(&self, index: usize) -> Option<u32> {
        self.positions.get(index).copied()
    }

    /// Map a physical `position` back to its table index.
    ///
    /// Directional binary search: the comparison flips with the declared
    /// scan direction. An exact hit returns [`SearchOutcome::Exact`]; when
    /// the loop exhausts its bracket the last midpoint is returned as
    /// [`SearchOutcome::Closest`] with a diagnostic warning.
    ///
    /// # Errors
    ///
    /// `PositionError::InvalidArgument` if a midpoint falls outside the
    /// table — only possible with a corrupt bracket, kept as a defensive
    /// check.
    pub fn search(&self, position: u32) -> Result<SearchOutcome, PositionError> {
        let mut left: isize = 0;
        let mut right: isize = self.positions.len() as isize - 1;
        let mut middle: isize = 0;

        while right >= left {
            middle = (right + left) >> 1;

            if middle < 0 || middle >= self.positions.len() as isize {
                return Err(PositionError::InvalidArgument(
                    "search midpoint outside table",
                ));
            }
            let entry = self.positions[middle as usize];

            if position == entry {
                return Ok(SearchOutcome::Exact(middle as usize));
            }

            let go_left = match self.direction {
                ScanDirection::NearToFar => position < entry,
                ScanDirection::FarToNear => position > entry,
            };
            if go_left {
                right = middle - 1;
            } else {
                left = middle + 1;
            }
        }

        warn!(
            position,
            closest = self.positions[middle as usize],
            index = middle,
            "no exact table entry, using closest match"
        );
        Ok(SearchOutcome::Closest(middle as usize))
    }
}
