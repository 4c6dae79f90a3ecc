//! Build command handlers: reference ingestion and index persistence.

use anyhow::{anyhow, Context, Result};
use needletail::parse_fastx_file;
use std::path::{Path, PathBuf};

use repmin::config::{parse_config, resolve_path, validate_config};
use repmin::{min_sequence_len, Endianness, RepeatKmerIndex, MAX_K};

/// Validate CLI-supplied index parameters before handing them to the
/// library, which treats violations as caller bugs.
pub fn check_index_params(k: usize, w: usize) -> Result<()> {
    if k == 0 || k > MAX_K {
        return Err(anyhow!("k must be in 1..={} (got {})", MAX_K, k));
    }
    if w == 0 {
        return Err(anyhow!("window must be at least 1"));
    }
    Ok(())
}

/// Read every usable record from the reference files, in input order.
///
/// Records shorter than one window are skipped with a warning; the
/// surviving records are numbered 0.. as source ids, so build and locate
/// agree on the numbering as long as they see the same files.
pub fn read_training_sequences(
    references: &[PathBuf],
    w: usize,
    k: usize,
) -> Result<Vec<Vec<u8>>> {
    let need = min_sequence_len(w, k);
    let mut seqs: Vec<Vec<u8>> = Vec::new();
    let mut skipped = 0usize;

    for ref_path in references {
        log::info!("Reading reference: {}", ref_path.display());
        let mut reader = parse_fastx_file(ref_path)
            .with_context(|| format!("Failed to open reference file: {}", ref_path.display()))?;
        let mut kept = 0usize;

        while let Some(record) = reader.next() {
            let rec = record.context("Invalid record")?;
            let seq = rec.seq();
            if seq.len() < need {
                log::warn!(
                    "Skipping record '{}' in {}: {} bases, one window needs {}",
                    String::from_utf8_lossy(rec.id()),
                    ref_path.display(),
                    seq.len(),
                    need
                );
                skipped += 1;
                continue;
            }
            seqs.push(seq.into_owned());
            kept += 1;
        }

        log::info!("{}: kept {} records", ref_path.display(), kept);
    }

    if skipped > 0 {
        log::warn!("Skipped {} record(s) shorter than one window", skipped);
    }
    if seqs.is_empty() {
        return Err(anyhow!(
            "No usable records: every input sequence was shorter than one window ({} bases)",
            need
        ));
    }
    Ok(seqs)
}

pub fn run_build(
    output: &Path,
    references: &[PathBuf],
    k: usize,
    w: usize,
    big_endian: bool,
) -> Result<()> {
    check_index_params(k, w)?;

    let seqs = read_training_sequences(references, w, k)?;
    log::info!(
        "Building index from {} sequences (k={}, w={})",
        seqs.len(),
        k,
        w
    );
    let index = RepeatKmerIndex::build(&seqs, w, k);

    let order = Endianness::from_big_endian_flag(big_endian);
    index
        .save(output, order)
        .with_context(|| format!("Failed to write index to {}", output.display()))?;
    log::info!(
        "Wrote {} distinct codes to {}",
        index.code_count(),
        output.display()
    );
    Ok(())
}

pub fn run_from_config(config_path: &Path) -> Result<()> {
    let config = parse_config(config_path)?;
    let config_dir = config_path.parent().unwrap_or(Path::new("."));
    validate_config(&config, config_dir)?;

    let references: Vec<PathBuf> = config
        .sources
        .files
        .iter()
        .map(|p| resolve_path(config_dir, p))
        .collect();
    let output = resolve_path(config_dir, &config.index.output);

    run_build(
        &output,
        &references,
        config.index.k,
        config.index.window,
        config.index.big_endian,
    )
}
