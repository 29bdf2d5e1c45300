//! System-wide constants for the sensor peripheral stack.
//!
//! Single source of truth for all numeric limits.
//! Imported by all crates — no duplication permitted.

use static_assertions::const_assert;

/// Maximum size of one bus transaction buffer in bytes.
///
/// Banked memory writes carry the data-register opcode in the same buffer,
/// so the largest payload a single write can move is one byte less.
pub const MAX_TRANSACTION_SIZE: usize = 513;

/// Payload ceiling for a single banked memory write (opcode byte reserved).
pub const MAX_MEMORY_WRITE: usize = MAX_TRANSACTION_SIZE - 1;

/// Writes shorter than this are read back and compared after each attempt.
pub const MEM_VERIFY_WINDOW: usize = 16;

/// Total write attempts before the verify loop gives up.
pub const MEM_WRITE_ATTEMPTS: usize = 3;

/// Capacity of the calibration-derived actuator position table.
pub const MAX_FOCUS_POSITIONS: usize = 1024;

/// Width of the virtual coordinate space AF windows are expressed in.
pub const VIRTUAL_COORDINATE_WIDTH: u64 = 65_536;

/// Height of the virtual coordinate space AF windows are expressed in.
pub const VIRTUAL_COORDINATE_HEIGHT: u64 = 65_536;

// The verify read-back must fit inside one transaction.
const_assert!(MEM_VERIFY_WINDOW < MAX_MEMORY_WRITE);
const_assert!(MEM_WRITE_ATTEMPTS > 0);
const_assert!(MAX_FOCUS_POSITIONS > 0);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constants_are_consistent() {
        assert!(MAX_TRANSACTION_SIZE > 1);
        assert_eq!(MAX_MEMORY_WRITE, MAX_TRANSACTION_SIZE - 1);
        assert!(MEM_VERIFY_WINDOW < MAX_MEMORY_WRITE);
        assert!(VIRTUAL_COORDINATE_WIDTH > 0);
        assert!(VIRTUAL_COORDINATE_HEIGHT > 0);
    }

    #[test]
    fn virtual_image_size_is_nonzero_after_scaling() {
        // Delay arithmetic divides by (W * H) / 1000.
        assert!((VIRTUAL_COORDINATE_WIDTH * VIRTUAL_COORDINATE_HEIGHT) / 1000 > 0);
    }
}
