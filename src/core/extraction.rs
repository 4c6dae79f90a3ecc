//! Minimizer extraction over sliding windows of k-mer start positions.
//!
//! A window covers `w` consecutive k-mer starts; its minimizer is the
//! smallest packed code in the window, with ties going to the last scanned
//! position. A sequence of length L yields exactly `L - w - k + 2`
//! overlapping windows. Streaming extraction keeps the previous window's
//! minimizer and only rescans when it slides out of range, which is
//! amortized cheap on real sequences.

use crate::constants::MAX_K;
use crate::core::codec::KmerCodec;
use crate::core::workspace::MinimizerWorkspace;

/// One minimizer: the winning k-mer code of a window and the k-mer start
/// offset where it occurs in the source sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Minimizer {
    pub code: u64,
    pub pos: usize,
}

/// Shortest sequence that yields at least one window for the given
/// parameters.
pub fn min_sequence_len(w: usize, k: usize) -> usize {
    w + k - 1
}

/// Brute-force minimizer of the single window whose k-mer starts span
/// `[off, off + w - 1]`.
///
/// A candidate replaces the running minimum when `candidate <= current`,
/// so among equal codes the **last** scanned position wins. O(w).
///
/// # Panics
/// Panics if `k` is outside `1..=32`, `w` is zero, or the window overruns
/// the sequence (`off + w + k - 1 > seq.len()`).
pub fn window_minimizer(
    codec: &KmerCodec,
    seq: &[u8],
    off: usize,
    w: usize,
    k: usize,
) -> Minimizer {
    assert!(k >= 1 && k <= MAX_K, "k must be in 1..={}, got {}", MAX_K, k);
    assert!(w >= 1, "window size must be at least 1");
    assert!(
        off + w + k - 1 <= seq.len(),
        "window at offset {} needs {} bases, sequence has {}",
        off,
        w + k - 1,
        seq.len()
    );

    let mut minimizer = Minimizer {
        code: codec.encode(seq, off, k),
        pos: off,
    };
    let mut kmer = minimizer.code;
    for i in off + 1..off + w {
        kmer = codec.roll_forward(kmer, seq[i + k - 1], k);
        if kmer <= minimizer.code {
            minimizer = Minimizer { code: kmer, pos: i };
        }
    }
    minimizer
}

/// Streaming minimizer extraction over every window of `seq`.
///
/// Clears `ws.minimizers` and fills it with exactly
/// `seq.len() - w - k + 2` entries, one per window in order. Window 0 is
/// computed by brute force; each later window reuses the retained
/// minimizer unless it slid out of range (then the window is rescanned),
/// otherwise only the newly entering k-mer is compared, with the same
/// ties-to-last rule as [`window_minimizer`].
///
/// # Panics
/// Panics if `k` is outside `1..=32`, `w` is zero, or
/// `seq.len() < w + k - 1`.
pub fn extract_into(codec: &KmerCodec, seq: &[u8], w: usize, k: usize, ws: &mut MinimizerWorkspace) {
    assert!(k >= 1 && k <= MAX_K, "k must be in 1..={}, got {}", MAX_K, k);
    assert!(w >= 1, "window size must be at least 1");
    assert!(
        min_sequence_len(w, k) <= seq.len(),
        "sequence of length {} is shorter than one window ({} bases)",
        seq.len(),
        min_sequence_len(w, k)
    );

    ws.minimizers.clear();
    let num_windows = seq.len() - min_sequence_len(w, k) + 1;
    ws.minimizers.reserve(num_windows);

    let mut minimizer = window_minimizer(codec, seq, 0, w, k);
    ws.minimizers.push(minimizer);

    // Rolling code of the k-mer at each window's rightmost start position.
    let mut kmer = codec.encode(seq, w - 1, k);
    for i in 1..num_windows {
        kmer = codec.roll_forward(kmer, seq[i + w + k - 2], k);
        if minimizer.pos < i {
            minimizer = window_minimizer(codec, seq, i, w, k);
        } else if kmer <= minimizer.code {
            minimizer = Minimizer {
                code: kmer,
                pos: i + w - 1,
            };
        }
        ws.minimizers.push(minimizer);
    }

    #[cfg(debug_assertions)]
    verify_against_rescan(codec, seq, w, k, &ws.minimizers);
}

/// Debug-build consistency check: the streamed result must match a
/// from-scratch rescan of every window.
#[cfg(debug_assertions)]
fn verify_against_rescan(
    codec: &KmerCodec,
    seq: &[u8],
    w: usize,
    k: usize,
    minimizers: &[Minimizer],
) {
    assert_eq!(minimizers.len() + w + k - 2, seq.len());
    for (i, m) in minimizers.iter().enumerate() {
        assert_eq!(
            *m,
            window_minimizer(codec, seq, i, w, k),
            "streamed minimizer diverged from rescan at window {}",
            i
        );
    }
}
