//! 2-bit nucleotide packing for k-mers up to 32 bases.
//!
//! This module provides:
//! - Symbol translation through an explicit, caller-supplied table
//! - Whole-k-mer packing and O(1) rolling updates
//! - Reverse complement and code-to-text helpers for diagnostics

use crate::constants::MAX_K;

/// Standard translation table for ASCII nucleotides.
/// - `C/c → 1`, `G/g → 2`, `T/t → 3`
/// - `A/a` and every unrecognized symbol stay 0
pub const STANDARD_TRANSLATION: [u8; 256] = {
    let mut table = [0u8; 256];
    table[b'C' as usize] = 1;
    table[b'c' as usize] = 1;
    table[b'G' as usize] = 2;
    table[b'g' as usize] = 2;
    table[b'T' as usize] = 3;
    table[b't' as usize] = 3;
    table
};

/// Complement table for byte sequences. Case is preserved for ACGT;
/// everything else becomes `N`.
const COMPLEMENT: [u8; 256] = {
    let mut table = [b'N'; 256];
    table[b'A' as usize] = b'T';
    table[b'T' as usize] = b'A';
    table[b'C' as usize] = b'G';
    table[b'G' as usize] = b'C';
    table[b'a' as usize] = b't';
    table[b't' as usize] = b'a';
    table[b'c' as usize] = b'g';
    table[b'g' as usize] = b'c';
    table
};

const NUCLEOTIDES: [u8; 4] = *b"ACGT";

/// Packs nucleotide runs into 2-bit-per-base integer codes.
///
/// The translation table is an explicit dependency rather than ambient
/// state: construct with [`KmerCodec::standard`] for plain ASCII input, or
/// supply a custom table via [`KmerCodec::new`]. Input bytes that are
/// already 2-bit values (0..=3) bypass translation, so pre-encoded
/// sequences and ASCII text are both accepted.
#[derive(Debug, Clone, Copy)]
pub struct KmerCodec {
    table: [u8; 256],
}

impl KmerCodec {
    /// Create a codec with a custom translation table.
    ///
    /// # Panics
    /// Panics if any table entry is greater than 3; packed codes would
    /// bleed into neighboring base positions otherwise.
    pub const fn new(table: [u8; 256]) -> Self {
        let mut i = 0;
        while i < table.len() {
            assert!(
                table[i] <= 3,
                "translation table entries must be 2-bit values"
            );
            i += 1;
        }
        KmerCodec { table }
    }

    /// Create a codec with the standard ASCII nucleotide table.
    pub const fn standard() -> Self {
        KmerCodec {
            table: STANDARD_TRANSLATION,
        }
    }

    #[inline(always)]
    fn translate(&self, base: u8) -> u64 {
        if base > 3 {
            self.table[base as usize] as u64
        } else {
            base as u64
        }
    }

    /// Pack the k bases starting at `offset` into a code, first base in the
    /// highest-order bit pair. Bits above `2k` of the result are zero.
    ///
    /// # Panics
    /// Panics if `k` is outside `1..=32` or the k-mer overruns `seq`.
    pub fn encode(&self, seq: &[u8], offset: usize, k: usize) -> u64 {
        assert!(
            k >= 1 && k <= MAX_K,
            "k must be in 1..={}, got {}",
            MAX_K,
            k
        );
        assert!(
            offset + k <= seq.len(),
            "k-mer at offset {} overruns sequence of length {}",
            offset,
            seq.len()
        );
        let mut code = 0u64;
        for &base in &seq[offset..offset + k] {
            code = (code << 2) | self.translate(base);
        }
        code
    }

    /// Slide a code one base to the right: drop the oldest base (mask to
    /// the low `2(k-1)` bits), shift, and insert `next`. Equivalent to
    /// re-encoding at `offset + 1` but O(1).
    #[inline]
    pub fn roll_forward(&self, code: u64, next: u8, k: usize) -> u64 {
        debug_assert!(k >= 1 && k <= MAX_K);
        let kept = code & ((1u64 << (2 * (k - 1))) - 1);
        (kept << 2) | self.translate(next)
    }
}

impl Default for KmerCodec {
    fn default() -> Self {
        Self::standard()
    }
}

/// Render a packed code back to ACGT text.
///
/// # Panics
/// Panics if `k` is outside `1..=32`.
pub fn decode_kmer(code: u64, k: usize) -> String {
    assert!(k >= 1 && k <= MAX_K, "k must be in 1..={}, got {}", MAX_K, k);
    let mut seq = String::with_capacity(k);
    for i in (0..k).rev() {
        let base = ((code >> (2 * i)) & 0x3) as usize;
        seq.push(NUCLEOTIDES[base] as char);
    }
    seq
}

/// Reverse complement of a byte sequence. Repeats occur in either
/// orientation, so queries are typically checked both ways.
pub fn reverse_complement(seq: &[u8]) -> Vec<u8> {
    seq.iter().rev().map(|&b| COMPLEMENT[b as usize]).collect()
}
