//! Constants used throughout the repmin library for safety limits,
//! performance tuning, and the binary index format.

// ============================================================================
// K-mer limits
// ============================================================================

/// Largest supported k-mer length. A k-mer is packed 2 bits per base into a
/// u64, so 32 bases is the ceiling.
pub const MAX_K: usize = 32;

// ============================================================================
// I/O Buffer Sizes
// ============================================================================

/// Buffer size for writing binary index files (8MB).
pub(crate) const WRITE_BUF_SIZE: usize = 8 * 1024 * 1024;

/// Buffer size for reading binary index files (8MB).
pub(crate) const READ_BUF_SIZE: usize = 8 * 1024 * 1024;

// ============================================================================
// Safety Limits for Loading Files
// ============================================================================

/// Maximum distinct k-mer codes accepted when reading an index
/// (~8GB of codes at 8 bytes each). The on-disk format has no magic bytes,
/// so an implausible count is the first line of defense against reading a
/// file that is not an index.
pub(crate) const MAX_DISTINCT_CODES: usize = 1_000_000_000;

/// Maximum minimizer window size accepted when reading an index.
pub(crate) const MAX_WINDOW: usize = 100_000_000;

/// Maximum number of training sequences per build. Source ids are stored
/// as u32 in the (code, source) table.
pub(crate) const MAX_SOURCES: usize = u32::MAX as usize;

// ============================================================================
// Workspace Defaults
// ============================================================================

/// Default capacity for the minimizer scratch buffer (covers typical read
/// lengths without reallocation).
pub(crate) const DEFAULT_MINIMIZER_CAPACITY: usize = 128;

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_k_fits_in_u64() {
        assert!(MAX_K * 2 <= 64, "a packed k-mer must fit in 64 bits");
    }

    #[test]
    fn test_max_distinct_codes_no_overflow() {
        // 8 bytes per code, must not overflow usize
        assert!(MAX_DISTINCT_CODES <= usize::MAX / 8);
    }

    #[test]
    fn test_buffer_sizes_are_power_of_two() {
        assert!(WRITE_BUF_SIZE.is_power_of_two());
        assert!(READ_BUF_SIZE.is_power_of_two());
    }

    #[test]
    fn test_workspace_capacity_nonzero() {
        assert!(DEFAULT_MINIMIZER_CAPACITY > 0);
    }
}
