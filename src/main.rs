/// main.rs — seqseek entry point
///
/// One-shot orchestration: validate the query, build the reference index
/// if it is not there yet, then run the parallel search and report where
/// the alignments were written.
mod cli;
mod error;
mod fasta;
mod index;
mod search;

use std::path::PathBuf;

use clap::Parser;

use cli::Cli;
use error::Result;
use index::chunk::{check_pattern, ChunkGeometry};
use search::SearchParams;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let geometry = ChunkGeometry::default();

    let pattern = cli.pattern.clone().into_bytes();
    check_pattern(&pattern, &geometry)?;

    // ── Build the index, if needed ────────────────────────────────────
    if !index::index_is_populated(&cli.index_dir) {
        eprintln!(
            "Index directory {} is missing or empty — preprocessing {}...",
            cli.index_dir.display(),
            cli.reference.display()
        );
        index::build_reference_index(&cli.reference, &cli.index_dir, geometry)?;
    }

    // ── Search ────────────────────────────────────────────────────────
    let out = cli
        .out
        .unwrap_or_else(|| PathBuf::from(format!("alignments_{}.txt", cli.pattern)));
    let params = SearchParams {
        pattern,
        max_mismatches: cli.max_mismatches,
        geometry,
    };
    let workers = cli.threads.unwrap_or_else(search::pool::default_workers).max(1);

    search::run_search(&cli.index_dir, &out, &params, workers)?;

    println!("Results successfully written to file: {}", out.display());
    Ok(())
}
