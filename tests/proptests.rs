use proptest::prelude::*;
use repmin::*;

/// Per-window brute-force recomputation as the baseline extractor.
fn brute_force_stream(codec: &KmerCodec, seq: &[u8], w: usize, k: usize) -> Vec<Minimizer> {
    (0..=(seq.len() - (w + k - 1)))
        .map(|off| window_minimizer(codec, seq, off, w, k))
        .collect()
}

/// Strategy: window, k, and a nucleotide sequence long enough for at
/// least one window.
fn params_and_seq() -> impl Strategy<Value = (usize, usize, Vec<u8>)> {
    (1usize..=12, 1usize..=8).prop_flat_map(|(w, k)| {
        let min_len = w + k - 1;
        (
            Just(w),
            Just(k),
            prop::collection::vec(
                prop::sample::select(b"ACGT".to_vec()),
                min_len..min_len + 120,
            ),
        )
    })
}

/// Strategy: window, k, training sequences, and one query, all long
/// enough for at least one window.
fn index_inputs() -> impl Strategy<Value = (usize, usize, Vec<Vec<u8>>, Vec<u8>)> {
    (1usize..=8, 1usize..=6).prop_flat_map(|(w, k)| {
        let min_len = w + k - 1;
        let seq = prop::collection::vec(
            prop::sample::select(b"ACGT".to_vec()),
            min_len..min_len + 80,
        );
        (
            Just(w),
            Just(k),
            prop::collection::vec(seq.clone(), 1..4),
            seq,
        )
    })
}

proptest! {
    #[test]
    fn prop_streaming_matches_brute_force((w, k, seq) in params_and_seq()) {
        let codec = KmerCodec::standard();
        let mut ws = MinimizerWorkspace::new();
        extract_into(&codec, &seq, w, k, &mut ws);
        prop_assert_eq!(&ws.minimizers, &brute_force_stream(&codec, &seq, w, k));
    }

    #[test]
    fn prop_one_minimizer_per_window((w, k, seq) in params_and_seq()) {
        let codec = KmerCodec::standard();
        let mut ws = MinimizerWorkspace::new();
        extract_into(&codec, &seq, w, k, &mut ws);
        prop_assert_eq!(ws.minimizers.len(), seq.len() - (w + k - 1) + 1);
    }

    #[test]
    fn prop_codes_in_range_with_position_witness((w, k, seq) in params_and_seq()) {
        let codec = KmerCodec::standard();
        let mut ws = MinimizerWorkspace::new();
        extract_into(&codec, &seq, w, k, &mut ws);

        let limit = if k == 32 { u64::MAX } else { (1u64 << (2 * k)) - 1 };
        for (i, m) in ws.minimizers.iter().enumerate() {
            prop_assert!(m.code <= limit);
            prop_assert!(m.pos >= i && m.pos < i + w);
            // The reported position must actually hold the reported code
            prop_assert_eq!(m.code, codec.encode(&seq, m.pos, k));
        }
    }

    #[test]
    fn prop_uniform_sequence_ties_resolve_to_last(
        w in 1usize..=10,
        k in 1usize..=6,
        base in prop::sample::select(b"ACGT".to_vec()),
        extra in 0usize..40,
    ) {
        // Every k-mer of a uniform sequence has the same code, so each
        // window must report its last k-mer position.
        let seq = vec![base; w + k - 1 + extra];
        let codec = KmerCodec::standard();
        let mut ws = MinimizerWorkspace::new();
        extract_into(&codec, &seq, w, k, &mut ws);
        for (i, m) in ws.minimizers.iter().enumerate() {
            prop_assert_eq!(m.pos, i + w - 1);
        }
    }

    #[test]
    fn prop_training_sequence_is_repeat((w, k, seqs, _q) in index_inputs()) {
        let index = RepeatKmerIndex::build(&seqs, w, k);
        let mut ws = MinimizerWorkspace::new();
        for seq in &seqs {
            prop_assert!(index.is_repeat(seq, None, &mut ws));
        }
    }

    #[test]
    fn prop_find_repeats_sorted_unique_in_range((w, k, seqs, query) in index_inputs()) {
        let index = RepeatKmerIndex::build(&seqs, w, k);
        let mut ws = MinimizerWorkspace::new();
        let mut ids = Vec::new();
        index.find_repeats(&query, &mut ws, &mut ids);

        for pair in ids.windows(2) {
            prop_assert!(pair[0] < pair[1], "ids must be sorted and unique");
        }
        for &id in &ids {
            prop_assert!((id as usize) < seqs.len());
        }
    }

    #[test]
    fn prop_is_repeat_stable_under_double_rc((w, k, seqs, query) in index_inputs()) {
        let index = RepeatKmerIndex::build(&seqs, w, k);
        let mut ws = MinimizerWorkspace::new();
        let back = reverse_complement(&reverse_complement(&query));
        prop_assert_eq!(
            index.is_repeat(&query, None, &mut ws),
            index.is_repeat(&back, None, &mut ws)
        );
    }

    #[test]
    fn prop_roundtrip_either_endianness(
        (w, k, seqs, query) in index_inputs(),
        big in any::<bool>(),
    ) {
        let order = Endianness::from_big_endian_flag(big);
        let index = RepeatKmerIndex::build(&seqs, w, k);

        let mut buf = Vec::new();
        index.write_to(&mut buf, order).unwrap();
        let restored = RepeatKmerIndex::read_from(&mut &buf[..], order).unwrap();

        prop_assert_eq!(restored.w(), index.w());
        prop_assert_eq!(restored.k(), index.k());
        prop_assert_eq!(
            restored.codes().collect::<Vec<_>>(),
            index.codes().collect::<Vec<_>>()
        );

        // Classification carries over; the source table does not.
        let mut ws = MinimizerWorkspace::new();
        prop_assert_eq!(
            restored.is_repeat(&query, None, &mut ws),
            index.is_repeat(&query, None, &mut ws)
        );
        prop_assert_eq!(restored.table_len(), 0);
    }
}
