//! Core algorithms for minimizer-based repeat detection.
//!
//! - 2-bit k-mer packing with explicit symbol translation
//! - Brute-force and streaming minimizer extraction
//! - Reusable workspace for avoiding allocations in query loops

pub mod codec;
pub mod extraction;
pub mod workspace;

pub use codec::{decode_kmer, reverse_complement, KmerCodec, STANDARD_TRANSLATION};
pub use extraction::{extract_into, min_sequence_len, window_minimizer, Minimizer};
pub use workspace::MinimizerWorkspace;
