// SPDX-License-Identifier: MIT OR Apache-2.0
//! Contract violations raised by the LOD engine.

use crate::level::MIN_THRESHOLD;
use crate::table::MAX_LODS;

/// A caller passed input outside the documented domain.
///
/// None of these are recoverable: the engine never clamps, it reports the
/// violation and leaves the table untouched.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ContractViolation {
    /// Declared LOD count above the supported maximum
    #[error("LOD count {0} is outside 0..={max}", max = MAX_LODS)]
    CountOutOfRange(usize),

    /// LOD index past the end of the table
    #[error("LOD index {index} out of range (table holds {len} levels)")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Number of stored levels
        len: usize,
    },

    /// Threshold below the minimum or not finite
    #[error("LOD threshold {0} is below the minimum of {min}", min = MIN_THRESHOLD)]
    ThresholdOutOfRange(f32),

    /// Operation index past the end of a level's operation list
    #[error("operation index {index} out of range (list holds {len} entries)")]
    OperationOutOfRange {
        /// Requested index
        index: usize,
        /// Number of stored operations
        len: usize,
    },

    /// A LOD-shaped array is out of step with the declared count
    #[error("LOD array holds {actual} entries, expected {expected}")]
    SlotCountMismatch {
        /// Length implied by the declared count
        expected: usize,
        /// Stored length
        actual: usize,
    },
}

/// Result type for LOD engine operations
pub type Result<T> = std::result::Result<T, ContractViolation>;
