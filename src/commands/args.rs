//! Command-line argument definitions for the repmin CLI.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "repmin")]
#[command(about = "Repeat detection via minimizer k-mer indexing (2-bit nucleotide space)")]
#[command(
    long_about = "Repmin: detects repetitive sequences by indexing the minimizers of known
repeat families and voting each query against the indexed k-mer codes.

WORKFLOW:
  1. Build an index:      repmin build -o repeats.rki -r alu.fa -r line1.fa
  2. Classify reads:      repmin classify -i repeats.rki -1 reads.fq

INPUT FORMATS:
  FASTA (.fa, .fasta, .fna) and FASTQ (.fq, .fastq) files are supported.
  Gzip-compressed files (.gz) are automatically detected and decompressed.

INDEX FILE:
  A headerless stream of fixed-width 64-bit words (count, window, k,
  then the distinct minimizer codes in ascending order). Little-endian
  by default; pass --big-endian to both build and the readers to use
  network byte order. The file stores only what classification needs:
  locating which repeat family matched requires the reference files
  again (see 'locate')."
)]
#[command(after_help = "EXAMPLES:
  # Build an index from repeat family references
  repmin build -o repeats.rki -r alu.fa -r line1.fa.gz -k 16 -w 10

  # Classify reads, checking both orientations
  repmin classify -i repeats.rki -1 reads.fq.gz --both-strands -o verdicts.tsv.gz

  # Name the matching repeat families (rebuilds the table in memory)
  repmin locate -r alu.fa -r line1.fa -1 reads.fq -k 16 -w 10

  # Inspect an index file
  repmin stats -i repeats.rki --codes 10")]
pub struct Cli {
    /// Enable verbose progress output with timestamps
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a repeat index from reference sequences and write it to disk
    #[command(after_help = "EXAMPLES:
  # Basic build
  repmin build -o repeats.rki -r alu.fa

  # Multiple families; each record gets the next source id in input order
  repmin build -o repeats.rki -r alu.fa -r line1.fa -r sva.fa.gz

  # Network byte order for cross-platform sharing
  repmin build -o repeats.rki -r alu.fa --big-endian

NOTE:
  Records shorter than one minimizer window (w + k - 1 bases) cannot
  contribute and are skipped with a warning.")]
    Build {
        /// Output index file path
        #[arg(short, long)]
        output: PathBuf,

        /// Reference sequence files (FASTA/FASTQ, optionally gzipped).
        /// Can specify multiple times: -r alu.fa -r line1.fa
        #[arg(short, long, required = true)]
        reference: Vec<PathBuf>,

        /// K-mer size, 1-32 (packed 2 bits per base into a 64-bit word).
        #[arg(short = 'k', long, default_value_t = 16)]
        kmer_size: usize,

        /// Minimizer window size (k-mers per window). Larger values keep
        /// fewer minimizers per sequence.
        #[arg(short, long, default_value_t = 10)]
        window: usize,

        /// Write the index in big-endian byte order (default little-endian).
        #[arg(long)]
        big_endian: bool,
    },

    /// Build an index from a TOML configuration file
    #[command(after_help = "CONFIG FORMAT:
  [index]
  k = 16                        # K-mer size (1-32, default 16)
  window = 10                   # Minimizer window size
  output = \"repeats.rki\"        # Output index path
  big_endian = false            # Optional byte order override

  [sources]
  files = [\"alu.fa\", \"line1.fa\"]  # One source id per record, in order

  Relative paths resolve against the config file's directory.")]
    FromConfig {
        /// Path to TOML config file
        #[arg(short, long)]
        config: PathBuf,
    },

    /// Classify reads against an index, one verdict line per read
    #[command(after_help = "OUTPUT FORMAT:
  Tab-separated values (TSV): read_id<TAB>is_repeat

  read_id   - First whitespace-delimited token from the FASTA/FASTQ header
  is_repeat - 'true' when at least half the read's minimizers are indexed
              codes, else 'false'

  Output path ending .gz is gzip-compressed; '-' or no path is stdout.

NOTE:
  Works on any index file, including ones built elsewhere - classification
  only needs the persisted code set. Reads shorter than one window
  (w + k - 1 bases) are skipped with a warning.")]
    Classify {
        /// Path to the index file
        #[arg(short, long)]
        index: PathBuf,

        /// Reads to classify (FASTA/FASTQ, optionally gzipped)
        #[arg(short = '1', long)]
        r1: PathBuf,

        /// Also test the reverse complement of each read; a read is a
        /// repeat if either orientation passes the vote.
        #[arg(long)]
        both_strands: bool,

        /// Index file was written big-endian
        #[arg(long)]
        big_endian: bool,

        /// Reads per parallel batch
        #[arg(short, long, default_value_t = 10_000)]
        batch_size: usize,

        /// Output file path (.gz for gzip, '-' or omitted for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Report which reference sequences share minimizers with each read
    #[command(after_help = "OUTPUT FORMAT:
  Tab-separated values (TSV): read_id<TAB>source_ids

  source_ids - Comma-separated ids of matching references (numbered in
               input order starting at 0), or '-' when nothing matches

NOTE:
  The index file does not carry the per-source table, so this command
  rebuilds it in memory from the reference files; supply the same
  references, k, and window the index was built with.")]
    Locate {
        /// Reference sequence files, same set and order as the build
        #[arg(short, long, required = true)]
        reference: Vec<PathBuf>,

        /// Reads to locate (FASTA/FASTQ, optionally gzipped)
        #[arg(short = '1', long)]
        r1: PathBuf,

        /// K-mer size, 1-32
        #[arg(short = 'k', long, default_value_t = 16)]
        kmer_size: usize,

        /// Minimizer window size
        #[arg(short, long, default_value_t = 10)]
        window: usize,

        /// Output file path (.gz for gzip, '-' or omitted for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show index statistics
    Stats {
        /// Path to the index file
        #[arg(short, long)]
        index: PathBuf,

        /// Index file was written big-endian
        #[arg(long)]
        big_endian: bool,

        /// Additionally print the first N distinct codes with their
        /// nucleotide spelling
        #[arg(long)]
        codes: Option<usize>,
    },
}
