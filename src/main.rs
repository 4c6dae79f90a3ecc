use anyhow::Result;
use clap::Parser;

mod commands;

use commands::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();
    repmin::logging::init_logging(cli.verbose);

    match cli.command {
        Commands::Build {
            output,
            reference,
            kmer_size,
            window,
            big_endian,
        } => commands::run_build(&output, &reference, kmer_size, window, big_endian),

        Commands::FromConfig { config } => commands::run_from_config(&config),

        Commands::Classify {
            index,
            r1,
            both_strands,
            big_endian,
            batch_size,
            output,
        } => commands::run_classify(
            &index,
            &r1,
            both_strands,
            big_endian,
            batch_size,
            output.as_ref(),
        ),

        Commands::Locate {
            reference,
            r1,
            kmer_size,
            window,
            output,
        } => commands::run_locate(&reference, &r1, kmer_size, window, output.as_ref()),

        Commands::Stats {
            index,
            big_endian,
            codes,
        } => commands::run_stats(&index, big_endian, codes),
    }
}
