//! Read classification and repeat-source lookup command handlers.

use anyhow::{anyhow, Context, Result};
use flate2::write::GzEncoder;
use flate2::Compression;
use needletail::{parse_fastx_file, FastxReader};
use rayon::prelude::*;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use repmin::{
    min_sequence_len, reverse_complement, Endianness, MinimizerWorkspace, RepeatKmerIndex,
};

use super::build::{check_index_params, read_training_sequences};

/// Batched FASTX reader paired with a TSV output sink.
pub struct IoHandler {
    reader: Box<dyn FastxReader>,
    writer: BufWriter<Box<dyn Write>>,
}

impl IoHandler {
    pub fn new(input: &Path, out_path: Option<&PathBuf>) -> Result<Self> {
        let reader = parse_fastx_file(input)
            .with_context(|| format!("Failed to open input: {}", input.display()))?;
        Ok(Self {
            reader,
            writer: BufWriter::new(open_output(out_path)?),
        })
    }

    pub fn write_header(&mut self, cols: &[&str]) -> Result<()> {
        writeln!(self.writer, "{}", cols.join("\t"))?;
        Ok(())
    }

    /// Pull up to `size` records; `None` at end of input.
    pub fn next_batch(&mut self, size: usize) -> Result<Option<(Vec<String>, Vec<Vec<u8>>)>> {
        let mut ids = Vec::with_capacity(size);
        let mut seqs = Vec::with_capacity(size);

        for _ in 0..size {
            match self.reader.next() {
                Some(Ok(rec)) => {
                    ids.push(String::from_utf8_lossy(rec.id()).to_string());
                    seqs.push(rec.seq().into_owned());
                }
                Some(Err(e)) => return Err(anyhow!(e)),
                None => break,
            }
        }

        if ids.is_empty() {
            return Ok(None);
        }
        Ok(Some((ids, seqs)))
    }

    pub fn write(&mut self, data: &str) -> Result<()> {
        self.writer.write_all(data.as_bytes())?;
        Ok(())
    }

    pub fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Open the output sink: a file, gzip-compressed when the path ends `.gz`,
/// stdout for `None` or `-`.
fn open_output(path: Option<&PathBuf>) -> Result<Box<dyn Write>> {
    match path {
        None => Ok(Box::new(io::stdout())),
        Some(p) if p.as_os_str() == "-" => Ok(Box::new(io::stdout())),
        Some(p) => {
            let file = File::create(p)
                .with_context(|| format!("Failed to create output file: {}", p.display()))?;
            match p.extension().and_then(|e| e.to_str()) {
                Some("gz") => Ok(Box::new(GzEncoder::new(file, Compression::default()))),
                _ => Ok(Box::new(file)),
            }
        }
    }
}

/// Classify each read against a persisted index: one `read_id\tis_repeat`
/// line per read, batched and evaluated in parallel.
pub fn run_classify(
    index_path: &Path,
    input: &Path,
    both_strands: bool,
    big_endian: bool,
    batch_size: usize,
    output: Option<&PathBuf>,
) -> Result<()> {
    let order = Endianness::from_big_endian_flag(big_endian);
    let index = RepeatKmerIndex::load(index_path, order)
        .with_context(|| format!("Failed to load index from {}", index_path.display()))?;
    log::info!(
        "Loaded index: k={}, w={}, {} distinct codes",
        index.k(),
        index.w(),
        index.code_count()
    );

    let min_len = min_sequence_len(index.w(), index.k());
    let mut io = IoHandler::new(input, output)?;
    io.write_header(&["read_id", "is_repeat"])?;

    let mut classified = 0usize;
    let mut skipped = 0usize;
    while let Some((ids, seqs)) = io.next_batch(batch_size)? {
        let results: Vec<String> = ids
            .par_iter()
            .enumerate()
            .map_init(MinimizerWorkspace::new, |ws, (i, id)| {
                let seq = &seqs[i];
                if seq.len() < min_len {
                    return String::new();
                }
                let rc;
                let rc_query = if both_strands {
                    rc = reverse_complement(seq);
                    Some(rc.as_slice())
                } else {
                    None
                };
                format!("{}\t{}\n", id, index.is_repeat(seq, rc_query, ws))
            })
            .collect();

        for line in &results {
            if line.is_empty() {
                skipped += 1;
            } else {
                classified += 1;
                io.write(line)?;
            }
        }
    }

    if skipped > 0 {
        log::warn!(
            "Skipped {} read(s) shorter than one window ({} bases)",
            skipped,
            min_len
        );
    }
    log::info!("Classified {} reads", classified);
    io.finish()
}

/// Report the source ids sharing a minimizer with each read. Rebuilds the
/// (code, source) table in memory from the reference files, then walks the
/// reads sequentially with one reused workspace and output buffer.
pub fn run_locate(
    references: &[PathBuf],
    input: &Path,
    k: usize,
    w: usize,
    output: Option<&PathBuf>,
) -> Result<()> {
    check_index_params(k, w)?;

    let seqs = read_training_sequences(references, w, k)?;
    log::info!("Building in-memory table from {} sequences", seqs.len());
    let index = RepeatKmerIndex::build(&seqs, w, k);
    drop(seqs);

    let min_len = min_sequence_len(w, k);
    let mut reader = parse_fastx_file(input)
        .with_context(|| format!("Failed to open input: {}", input.display()))?;
    let mut writer = BufWriter::new(open_output(output)?);
    writeln!(writer, "read_id\tsource_ids")?;

    let mut ws = MinimizerWorkspace::new();
    let mut sources: Vec<u32> = Vec::new();
    let mut skipped = 0usize;

    while let Some(record) = reader.next() {
        let rec = record.context("Invalid record")?;
        let seq = rec.seq();
        if seq.len() < min_len {
            skipped += 1;
            continue;
        }
        index.find_repeats(&seq, &mut ws, &mut sources);
        writeln!(
            writer,
            "{}\t{}",
            String::from_utf8_lossy(rec.id()),
            format_source_list(&sources)
        )?;
    }

    if skipped > 0 {
        log::warn!(
            "Skipped {} read(s) shorter than one window ({} bases)",
            skipped,
            min_len
        );
    }
    writer.flush()?;
    Ok(())
}

/// Comma-separated ids, `-` when nothing matched.
fn format_source_list(sources: &[u32]) -> String {
    if sources.is_empty() {
        return "-".to_string();
    }
    sources
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(",")
}
