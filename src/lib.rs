//! Repeat detection via minimizer k-mer indexing.
//!
//! Repmin packs nucleotide k-mers into 2-bit codes, takes the minimizer of
//! every window of `w` consecutive k-mers, and indexes the minimizers of
//! known repeat sequences two ways: a sorted (code, source id) table that
//! names which training sequences share a minimizer with a query, and a
//! distinct-code set behind a majority-vote repeat test.
//!
//! The on-disk format persists only the code set (plus `w` and `k`), so a
//! restored index classifies but cannot locate; see
//! [`RepeatKmerIndex::read_from`].
//!
//! ```
//! use repmin::{MinimizerWorkspace, RepeatKmerIndex};
//!
//! let index = RepeatKmerIndex::build(&[&b"ACGTACGT"[..]], 2, 3);
//! let mut ws = MinimizerWorkspace::new();
//! assert!(index.is_repeat(b"ACGTACGT", None, &mut ws));
//! assert!(!index.is_repeat(b"CCCCCCCC", None, &mut ws));
//! ```

pub mod config;
mod constants;
pub mod core;
pub mod error;
pub mod index;
pub mod io;
pub mod logging;

pub use crate::constants::MAX_K;
pub use crate::core::{
    decode_kmer, extract_into, min_sequence_len, reverse_complement, window_minimizer, KmerCodec,
    Minimizer, MinimizerWorkspace, STANDARD_TRANSLATION,
};
pub use crate::error::{RepminError, Result};
pub use crate::index::RepeatKmerIndex;
pub use crate::io::Endianness;

/// Crate version string from Cargo.toml.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
