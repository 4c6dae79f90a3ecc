//! Index inspection command handlers.

use anyhow::{Context, Result};
use std::io::{self, Write};
use std::path::Path;

use repmin::{decode_kmer, Endianness, RepeatKmerIndex};

/// Print the index summary, optionally followed by the first `codes`
/// distinct codes with their nucleotide spelling.
pub fn run_stats(index_path: &Path, big_endian: bool, codes: Option<usize>) -> Result<()> {
    let order = Endianness::from_big_endian_flag(big_endian);
    let index = RepeatKmerIndex::load(index_path, order)
        .with_context(|| format!("Failed to load index from {}", index_path.display()))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    index.dump(&mut out)?;

    if let Some(n) = codes {
        writeln!(out)?;
        for code in index.codes().take(n) {
            writeln!(out, "{:#018x}  {}", code, decode_kmer(code, index.k()))?;
        }
    }
    Ok(())
}
