//! Repeat k-mer index: a sorted (code, source) table plus a distinct-code
//! set, built from the minimizer streams of known repeat sequences.
//!
//! The two halves answer different questions. The distinct-code set backs
//! [`RepeatKmerIndex::is_repeat`], a majority-vote estimate of whether a
//! query looks repetitive at all. The table backs
//! [`RepeatKmerIndex::find_repeats`], which names the training sequences
//! sharing a minimizer with the query. Only the set is persisted: a
//! restored index classifies but cannot locate until rebuilt (see
//! [`RepeatKmerIndex::read_from`]).

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::constants::{
    MAX_DISTINCT_CODES, MAX_K, MAX_SOURCES, MAX_WINDOW, READ_BUF_SIZE, WRITE_BUF_SIZE,
};
use crate::core::codec::KmerCodec;
use crate::core::extraction::extract_into;
use crate::core::workspace::MinimizerWorkspace;
use crate::error::{RepminError, Result};
use crate::io::{read_word, write_word, Endianness};

/// Minimizer index over a set of repeat sequences.
///
/// Built once, then queried arbitrarily often. All queries take `&self`,
/// so sharing a built index across threads is safe; rebuilding produces a
/// new value rather than mutating in place.
#[derive(Debug)]
pub struct RepeatKmerIndex {
    w: usize,
    k: usize,
    codec: KmerCodec,
    /// Sorted ascending by (code, source); no duplicate pairs after build.
    table: Vec<(u64, u32)>,
    /// Every distinct minimizer code, ascending.
    codes: BTreeSet<u64>,
}

impl RepeatKmerIndex {
    /// Build an index from training sequences with the standard nucleotide
    /// table. Each sequence gets its position in `seqs` as its source id.
    ///
    /// # Panics
    /// Panics if `k` is outside `1..=32`, `w` is zero, any sequence is
    /// shorter than `w + k - 1`, or there are more than `u32::MAX`
    /// sequences.
    pub fn build<S: AsRef<[u8]>>(seqs: &[S], w: usize, k: usize) -> Self {
        Self::build_with_codec(seqs, w, k, KmerCodec::standard())
    }

    /// Build with a caller-supplied codec (custom translation table).
    ///
    /// # Panics
    /// Same contract as [`RepeatKmerIndex::build`].
    pub fn build_with_codec<S: AsRef<[u8]>>(
        seqs: &[S],
        w: usize,
        k: usize,
        codec: KmerCodec,
    ) -> Self {
        assert!(k >= 1 && k <= MAX_K, "k must be in 1..={}, got {}", MAX_K, k);
        assert!(w >= 1, "window size must be at least 1");
        assert!(
            seqs.len() <= MAX_SOURCES,
            "source ids are u32; cannot index {} sequences",
            seqs.len()
        );

        let mut table: Vec<(u64, u32)> = Vec::new();
        let mut codes = BTreeSet::new();
        let mut ws = MinimizerWorkspace::new();

        for (source, seq) in seqs.iter().enumerate() {
            let source = source as u32;
            extract_into(&codec, seq.as_ref(), w, k, &mut ws);
            for m in &ws.minimizers {
                // Adjacent windows usually share a minimizer; skip the
                // immediate repeat here, the post-sort dedup is the
                // authoritative pass for everything else.
                if table.last() == Some(&(m.code, source)) {
                    continue;
                }
                table.push((m.code, source));
                codes.insert(m.code);
            }
        }

        table.sort_unstable();
        table.dedup();

        log::debug!(
            "built repeat index: w={}, k={}, {} table entries, {} distinct codes",
            w,
            k,
            table.len(),
            codes.len()
        );

        RepeatKmerIndex {
            w,
            k,
            codec,
            table,
            codes,
        }
    }

    /// Estimate whether `query` is repetitive: true when at least half of
    /// its minimizers are codes seen during training, in either the given
    /// orientation or `rc_query` if supplied.
    ///
    /// This is a heuristic — distinct sequences can share minimizer codes,
    /// and such collisions count toward the vote. `ws` is scratch space;
    /// its contents afterwards are unspecified.
    ///
    /// # Panics
    /// Panics if a supplied orientation is shorter than `w + k - 1`.
    pub fn is_repeat(
        &self,
        query: &[u8],
        rc_query: Option<&[u8]>,
        ws: &mut MinimizerWorkspace,
    ) -> bool {
        if self.is_repeat_oriented(query, ws) {
            return true;
        }
        match rc_query {
            Some(rc) => self.is_repeat_oriented(rc, ws),
            None => false,
        }
    }

    fn is_repeat_oriented(&self, query: &[u8], ws: &mut MinimizerWorkspace) -> bool {
        extract_into(&self.codec, query, self.w, self.k, ws);
        let mut in_count = 0usize;
        let mut prev: Option<(u64, bool)> = None;
        for m in &ws.minimizers {
            // Adjacent windows that retained the same minimizer carry the
            // same verdict; only a changed code needs a set lookup.
            let curr_in = match prev {
                Some((code, verdict)) if code == m.code => verdict,
                _ => self.codes.contains(&m.code),
            };
            if curr_in {
                in_count += 1;
            }
            prev = Some((m.code, curr_in));
        }
        in_count * 2 >= ws.minimizers.len()
    }

    /// Collect the source ids of every training sequence sharing at least
    /// one minimizer with `query` into `out`, sorted and deduplicated.
    ///
    /// `out` is cleared first; no match leaves it empty — that is an
    /// answer, not an error. On an index restored by
    /// [`RepeatKmerIndex::read_from`] the table is empty and this always
    /// yields no ids; rebuild from the training sequences to locate again.
    ///
    /// # Panics
    /// Panics if `query` is shorter than `w + k - 1`.
    pub fn find_repeats(&self, query: &[u8], ws: &mut MinimizerWorkspace, out: &mut Vec<u32>) {
        out.clear();
        extract_into(&self.codec, query, self.w, self.k, ws);
        for i in 0..ws.minimizers.len() {
            let code = ws.minimizers[i].code;
            if i > 0 && code == ws.minimizers[i - 1].code {
                continue;
            }
            let start = self.table.partition_point(|&(c, _)| c < code);
            for &(c, source) in &self.table[start..] {
                if c != code {
                    break;
                }
                out.push(source);
            }
        }
        // A code recurring non-adjacently collects its sources twice
        out.sort_unstable();
        out.dedup();
    }

    /// Write the index in the fixed-width binary layout:
    /// `[distinct code count][w][k][code_0]..[code_{n-1}]`, all u64 words
    /// in the given byte order, codes ascending. No magic bytes, no
    /// version field — the reader must be told the byte order.
    ///
    /// The (code, source) table is deliberately not persisted; see
    /// [`RepeatKmerIndex::read_from`].
    pub fn write_to<W: Write>(&self, writer: &mut W, order: Endianness) -> Result<()> {
        write_word(writer, self.codes.len() as u64, order)
            .map_err(|e| RepminError::io("writing distinct code count", e))?;
        write_word(writer, self.w as u64, order)
            .map_err(|e| RepminError::io("writing window size", e))?;
        write_word(writer, self.k as u64, order)
            .map_err(|e| RepminError::io("writing k-mer length", e))?;
        for (i, &code) in self.codes.iter().enumerate() {
            write_word(writer, code, order).map_err(|e| {
                RepminError::io(format!("writing k-mer code {} of {}", i, self.codes.len()), e)
            })?;
        }
        Ok(())
    }

    /// Read an index persisted by [`RepeatKmerIndex::write_to`], using the
    /// standard nucleotide table for subsequent queries.
    ///
    /// Only `w`, `k`, and the distinct-code set are stored, so the
    /// restored index supports [`RepeatKmerIndex::is_repeat`] but not
    /// [`RepeatKmerIndex::find_repeats`] — the (code, source) table comes
    /// back empty and locating requires a fresh
    /// [`RepeatKmerIndex::build`]. This asymmetry is intentional: the
    /// classification half is what aligners consult on every read, and it
    /// is all the on-disk format carries.
    ///
    /// # Errors
    /// [`RepminError::Corrupt`] when the stream is truncated or contains
    /// values no writer could have produced (k outside `1..=32`, zero or
    /// absurd window, implausible count, a code with bits above `2k`,
    /// codes out of order); [`RepminError::Io`] for other read failures.
    pub fn read_from<R: Read>(reader: &mut R, order: Endianness) -> Result<Self> {
        Self::read_from_with_codec(reader, order, KmerCodec::standard())
    }

    /// [`RepeatKmerIndex::read_from`] with a caller-supplied codec. The
    /// translation table is not persisted, so the caller must supply the
    /// same table the index was built with.
    pub fn read_from_with_codec<R: Read>(
        reader: &mut R,
        order: Endianness,
        codec: KmerCodec,
    ) -> Result<Self> {
        let count = read_field(reader, order, "distinct code count")?;
        let w = read_field(reader, order, "window size")?;
        let k = read_field(reader, order, "k-mer length")?;

        if count > MAX_DISTINCT_CODES as u64 {
            return Err(RepminError::corrupt(format!(
                "distinct code count {} exceeds limit {}",
                count, MAX_DISTINCT_CODES
            )));
        }
        if k == 0 || k > MAX_K as u64 {
            return Err(RepminError::corrupt(format!(
                "k-mer length {} outside 1..={}",
                k, MAX_K
            )));
        }
        if w == 0 || w > MAX_WINDOW as u64 {
            return Err(RepminError::corrupt(format!(
                "window size {} outside 1..={}",
                w, MAX_WINDOW
            )));
        }
        let k = k as usize;
        let w = w as usize;
        let code_limit = if k == MAX_K {
            u64::MAX
        } else {
            (1u64 << (2 * k)) - 1
        };

        let mut codes = BTreeSet::new();
        let mut prev: Option<u64> = None;
        for i in 0..count {
            let code = read_field(reader, order, &format!("k-mer code {} of {}", i, count))?;
            if code > code_limit {
                return Err(RepminError::corrupt(format!(
                    "k-mer code {:#x} does not fit {} bits (k={})",
                    code,
                    2 * k,
                    k
                )));
            }
            if prev.is_some_and(|p| code <= p) {
                return Err(RepminError::corrupt(
                    "k-mer codes not strictly ascending",
                ));
            }
            prev = Some(code);
            codes.insert(code);
        }

        Ok(RepeatKmerIndex {
            w,
            k,
            codec,
            table: Vec::new(),
            codes,
        })
    }

    /// Write the index to a file, buffered. See
    /// [`RepeatKmerIndex::write_to`] for the layout.
    pub fn save(&self, path: &Path, order: Endianness) -> Result<()> {
        let file = File::create(path)
            .map_err(|e| RepminError::io(format!("creating {}", path.display()), e))?;
        let mut writer = BufWriter::with_capacity(WRITE_BUF_SIZE, file);
        self.write_to(&mut writer, order)?;
        writer
            .flush()
            .map_err(|e| RepminError::io(format!("flushing {}", path.display()), e))?;
        Ok(())
    }

    /// Load an index from a file written by [`RepeatKmerIndex::save`].
    pub fn load(path: &Path, order: Endianness) -> Result<Self> {
        let file = File::open(path)
            .map_err(|e| RepminError::io(format!("opening {}", path.display()), e))?;
        let mut reader = BufReader::with_capacity(READ_BUF_SIZE, file);
        Self::read_from(&mut reader, order)
    }

    /// Write a human-readable summary: window, k length, table size, and
    /// distinct-set size.
    pub fn dump<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "window         : {}", self.w)?;
        writeln!(out, "k length       : {}", self.k)?;
        writeln!(out, "kmer table size: {}", self.table.len())?;
        writeln!(out, "kmer set size  : {}", self.codes.len())?;
        Ok(())
    }

    pub fn w(&self) -> usize {
        self.w
    }

    pub fn k(&self) -> usize {
        self.k
    }

    /// Entries in the (code, source) table. Zero on a restored index.
    pub fn table_len(&self) -> usize {
        self.table.len()
    }

    /// Distinct minimizer codes seen during training.
    pub fn code_count(&self) -> usize {
        self.codes.len()
    }

    /// Distinct codes in ascending order.
    pub fn codes(&self) -> impl Iterator<Item = u64> + '_ {
        self.codes.iter().copied()
    }
}

/// Read one header/body word, mapping truncation to a corrupt-index error
/// so a short file never looks like a plain I/O failure.
fn read_field<R: Read>(reader: &mut R, order: Endianness, what: &str) -> Result<u64> {
    read_word(reader, order).map_err(|e| {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            RepminError::corrupt(format!("truncated while reading {}", what))
        } else {
            RepminError::io(format!("reading {}", what), e)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::codec::reverse_complement;

    /// Training pair used across the lookup tests:
    /// minimizer streams with w=2, k=3 give
    ///   "ACGTACGT" -> codes 6, 27, 44, 6, 6   (source 0)
    ///   "TTTTACGT" -> codes 63, 60, 49, 6, 6  (source 1)
    fn two_source_index() -> RepeatKmerIndex {
        RepeatKmerIndex::build(&[&b"ACGTACGT"[..], &b"TTTTACGT"[..]], 2, 3)
    }

    #[test]
    fn test_build_sorts_and_dedups_pairs() {
        // The stream of "ACGTACGT" revisits code 6 non-adjacently, so the
        // pre-sort table holds (6,0) twice; the final table must not.
        let index = RepeatKmerIndex::build(&[&b"ACGTACGT"[..]], 2, 3);
        assert_eq!(index.table, vec![(6, 0), (27, 0), (44, 0)]);
    }

    #[test]
    fn test_build_two_sources() {
        let index = two_source_index();
        assert_eq!(
            index.table,
            vec![(6, 0), (6, 1), (27, 0), (44, 0), (49, 1), (60, 1), (63, 1)]
        );
        let codes: Vec<u64> = index.codes().collect();
        assert_eq!(codes, vec![6, 27, 44, 49, 60, 63]);
    }

    #[test]
    fn test_build_table_invariant_holds() {
        let seqs = [&b"ACGTACGTAACCGGTT"[..], b"TTGACCAGTAGACCAT", b"ACGTACGTAACCGGTT"];
        let index = RepeatKmerIndex::build(&seqs, 3, 4);
        for pair in index.table.windows(2) {
            assert!(pair[0] < pair[1], "table must be strictly ascending");
        }
    }

    #[test]
    fn test_find_repeats_returns_source_without_duplicates() {
        let index = two_source_index();
        let mut ws = MinimizerWorkspace::new();
        let mut ids = Vec::new();
        index.find_repeats(b"ACGTACGT", &mut ws, &mut ids);
        // Code 6 is shared by both sources; code 6 recurs in the query
        // stream non-adjacently, which must not duplicate ids.
        assert_eq!(ids, vec![0, 1]);
    }

    #[test]
    fn test_find_repeats_no_shared_minimizer_is_empty() {
        let index = two_source_index();
        let mut ws = MinimizerWorkspace::new();
        let mut ids = Vec::new();
        index.find_repeats(b"CCCCCCCC", &mut ws, &mut ids);
        assert!(ids.is_empty());
        assert!(!index.is_repeat(b"CCCCCCCC", None, &mut ws));
    }

    #[test]
    fn test_is_repeat_on_trained_sequence() {
        let index = two_source_index();
        let mut ws = MinimizerWorkspace::new();
        assert!(index.is_repeat(b"ACGTACGT", None, &mut ws));
        assert!(index.is_repeat(b"TTTTACGT", None, &mut ws));
    }

    #[test]
    fn test_is_repeat_first_window_is_looked_up() {
        // Every minimizer of a poly-A sequence has code 0; the first
        // window must consult the set rather than assume a prior verdict.
        let index = RepeatKmerIndex::build(&[&b"AAAAAAAA"[..]], 2, 3);
        let mut ws = MinimizerWorkspace::new();
        assert!(index.is_repeat(b"AAAAAAAA", None, &mut ws));
    }

    #[test]
    fn test_is_repeat_checks_reverse_orientation() {
        let index = RepeatKmerIndex::build(&[&b"TTTTACGT"[..]], 2, 3);
        let mut ws = MinimizerWorkspace::new();
        let query = b"ACGTAAAA";
        let rc = reverse_complement(query);
        assert!(!index.is_repeat(query, None, &mut ws));
        assert!(index.is_repeat(query, Some(&rc), &mut ws));
    }

    #[test]
    fn test_is_repeat_double_reverse_complement_is_identity() {
        let index = two_source_index();
        let mut ws = MinimizerWorkspace::new();
        for query in [&b"ACGTACGT"[..], b"CCCCCCCC", b"ACGTAAAA"] {
            let back = reverse_complement(&reverse_complement(query));
            assert_eq!(
                index.is_repeat(query, None, &mut ws),
                index.is_repeat(&back, None, &mut ws)
            );
        }
    }

    #[test]
    fn test_round_trip_preserves_params_and_codes() {
        let index = two_source_index();
        for order in [Endianness::Little, Endianness::Big] {
            let mut buf = Vec::new();
            index.write_to(&mut buf, order).unwrap();
            assert_eq!(buf.len(), 8 * (3 + index.code_count()));

            let restored = RepeatKmerIndex::read_from(&mut &buf[..], order).unwrap();
            assert_eq!(restored.w(), index.w());
            assert_eq!(restored.k(), index.k());
            assert_eq!(
                restored.codes().collect::<Vec<_>>(),
                index.codes().collect::<Vec<_>>()
            );
        }
    }

    #[test]
    fn test_save_load_file() -> crate::error::Result<()> {
        let file = tempfile::NamedTempFile::new().map_err(|e| RepminError::io("tempfile", e))?;
        let path = file.path().to_path_buf();

        let index = two_source_index();
        index.save(&path, Endianness::Big)?;
        let loaded = RepeatKmerIndex::load(&path, Endianness::Big)?;

        assert_eq!(loaded.w(), 2);
        assert_eq!(loaded.k(), 3);
        assert_eq!(loaded.code_count(), 6);
        Ok(())
    }

    #[test]
    fn test_restored_index_classifies_but_cannot_locate() {
        let index = two_source_index();
        let mut buf = Vec::new();
        index.write_to(&mut buf, Endianness::Little).unwrap();
        let restored = RepeatKmerIndex::read_from(&mut &buf[..], Endianness::Little).unwrap();

        let mut ws = MinimizerWorkspace::new();
        // Classification is preserved...
        assert!(restored.is_repeat(b"ACGTACGT", None, &mut ws));
        assert!(!restored.is_repeat(b"CCCCCCCC", None, &mut ws));

        // ...but the table is gone until a rebuild.
        assert_eq!(restored.table_len(), 0);
        let mut ids = Vec::new();
        restored.find_repeats(b"ACGTACGT", &mut ws, &mut ids);
        assert!(ids.is_empty());
    }

    #[test]
    fn test_big_endian_layout_golden() {
        let index = RepeatKmerIndex::build(&[&b"AAAAAAAA"[..]], 2, 3);
        // Single distinct code (0): count=1, w=2, k=3, code=0
        let mut buf = Vec::new();
        index.write_to(&mut buf, Endianness::Big).unwrap();
        assert_eq!(
            buf,
            [
                0, 0, 0, 0, 0, 0, 0, 1, // count
                0, 0, 0, 0, 0, 0, 0, 2, // w
                0, 0, 0, 0, 0, 0, 0, 3, // k
                0, 0, 0, 0, 0, 0, 0, 0, // code 0
            ]
        );
    }

    #[test]
    fn test_read_truncated_stream_is_corrupt() {
        let index = two_source_index();
        let mut buf = Vec::new();
        index.write_to(&mut buf, Endianness::Little).unwrap();

        for cut in [0, 8, 20, buf.len() - 1] {
            let err = RepeatKmerIndex::read_from(&mut &buf[..cut], Endianness::Little)
                .unwrap_err();
            match err {
                RepminError::Corrupt { detail } => {
                    assert!(detail.contains("truncated"), "unexpected detail: {}", detail)
                }
                other => panic!("expected Corrupt, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_read_rejects_bad_k() {
        let mut buf = Vec::new();
        for word in [0u64, 2, 40] {
            write_word(&mut buf, word, Endianness::Little).unwrap();
        }
        let err = RepeatKmerIndex::read_from(&mut &buf[..], Endianness::Little).unwrap_err();
        assert!(err.to_string().contains("k-mer length 40"));
    }

    #[test]
    fn test_read_rejects_zero_window() {
        let mut buf = Vec::new();
        for word in [0u64, 0, 16] {
            write_word(&mut buf, word, Endianness::Little).unwrap();
        }
        let err = RepeatKmerIndex::read_from(&mut &buf[..], Endianness::Little).unwrap_err();
        assert!(err.to_string().contains("window size 0"));
    }

    #[test]
    fn test_read_rejects_unordered_codes() {
        let mut buf = Vec::new();
        for word in [2u64, 2, 3, 50, 7] {
            write_word(&mut buf, word, Endianness::Little).unwrap();
        }
        let err = RepeatKmerIndex::read_from(&mut &buf[..], Endianness::Little).unwrap_err();
        assert!(err.to_string().contains("not strictly ascending"));
    }

    #[test]
    fn test_read_rejects_out_of_range_code() {
        // k=3 allows 6 significant bits; 1<<10 is out of range
        let mut buf = Vec::new();
        for word in [1u64, 2, 3, 1 << 10] {
            write_word(&mut buf, word, Endianness::Little).unwrap();
        }
        let err = RepeatKmerIndex::read_from(&mut &buf[..], Endianness::Little).unwrap_err();
        assert!(err.to_string().contains("does not fit 6 bits"));
    }

    #[test]
    fn test_mismatched_endianness_is_detected() {
        // Reading little-endian output as big-endian turns the count into
        // an astronomically large value, which the sanity bound rejects.
        let index = two_source_index();
        let mut buf = Vec::new();
        index.write_to(&mut buf, Endianness::Little).unwrap();
        let err = RepeatKmerIndex::read_from(&mut &buf[..], Endianness::Big).unwrap_err();
        assert!(matches!(err, RepminError::Corrupt { .. }));
    }

    #[test]
    fn test_concurrent_queries_on_shared_index() {
        let index = two_source_index();
        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    let mut ws = MinimizerWorkspace::new();
                    let mut ids = Vec::new();
                    for _ in 0..100 {
                        assert!(index.is_repeat(b"ACGTACGT", None, &mut ws));
                        index.find_repeats(b"TTTTACGT", &mut ws, &mut ids);
                        assert_eq!(ids, vec![0, 1]);
                    }
                });
            }
        });
    }

    #[test]
    fn test_dump_output() {
        let index = two_source_index();
        let mut buf = Vec::new();
        index.dump(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "window         : 2\n\
             k length       : 3\n\
             kmer table size: 7\n\
             kmer set size  : 6\n"
        );
    }

    #[test]
    #[should_panic(expected = "k must be in 1..=32")]
    fn test_build_rejects_oversized_k() {
        let seq = [b'A'; 80];
        RepeatKmerIndex::build(&[&seq[..]], 4, 33);
    }

    #[test]
    #[should_panic(expected = "shorter than one window")]
    fn test_build_rejects_short_training_sequence() {
        RepeatKmerIndex::build(&[&b"ACG"[..]], 4, 4);
    }
}
