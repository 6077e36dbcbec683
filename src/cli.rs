/// cli.rs — seqseek command-line interface
use clap::Parser;
use std::path::PathBuf;

/// seqseek — approximate DNA pattern search
#[derive(Parser, Debug)]
#[command(
    name = "seqseek",
    author,
    version,
    about = "Find all near-matches of a DNA pattern in a reference genome",
    long_about = None
)]
pub struct Cli {
    /// The query pattern, bases over A/C/G/T (1..=1000 bp)
    pub pattern: String,

    /// Maximum number of substitution mismatches tolerated per hit
    pub max_mismatches: usize,

    /// Path to the gzip-compressed reference FASTA file
    #[arg(
        short,
        long,
        value_name = "PATH",
        default_value = "Homo_sapiens.GRCh38.dna.primary_assembly.fa.gz"
    )]
    pub reference: PathBuf,

    /// Directory holding the per-chunk index artifacts.
    /// Built automatically on first run if missing or empty.
    #[arg(long, value_name = "PATH", default_value = "ref_index")]
    pub index_dir: PathBuf,

    /// Write hits to this file instead of alignments_<PATTERN>.txt
    #[arg(long = "out", value_name = "PATH")]
    pub out: Option<PathBuf>,

    /// Number of parallel search workers (default: min(8, available CPUs))
    #[arg(short, long, value_name = "N")]
    pub threads: Option<usize>,
}
