//! Reusable scratch space for minimizer extraction.

use crate::constants::DEFAULT_MINIMIZER_CAPACITY;
use crate::core::extraction::Minimizer;

/// Caller-owned scratch buffer for minimizer streams.
///
/// Extraction clears and refills `minimizers` on every call; the index
/// never retains a reference to it. Holding one workspace per thread (or
/// per query loop) avoids reallocating on every query.
#[derive(Debug)]
pub struct MinimizerWorkspace {
    /// Minimizer stream of the most recent extraction, one per window.
    pub minimizers: Vec<Minimizer>,
}

impl MinimizerWorkspace {
    pub fn new() -> Self {
        Self {
            minimizers: Vec::with_capacity(DEFAULT_MINIMIZER_CAPACITY),
        }
    }

    /// Pre-size for sequences with a known window count.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            minimizers: Vec::with_capacity(capacity),
        }
    }
}

impl Default for MinimizerWorkspace {
    fn default() -> Self {
        Self::new()
    }
}
