/// search/mod.rs — Orchestration for the search phase
///
/// Discovers the chunks of a previously built index, fans them out to a
/// worker pool, and streams every hit into the output file. The index is
/// read-only here; search never modifies it.
pub mod chunk_search;
pub mod pool;
pub mod reverse;
pub mod sink;

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::error::Result;
use crate::index::chunk::ChunkGeometry;
use crate::index::layout;
use sink::HitSink;

/// One reported alignment.
///
/// `flag` is 0 for a forward-strand hit and 16 for a reverse-complement
/// hit. `pos` is 1-based and global within the contig. `query` is the
/// sequence as searched (the reverse complement of the pattern for
/// flag 16) and `matched` the reference bytes it aligned against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    pub flag: u8,
    pub contig: String,
    pub pos: u64,
    pub query: Vec<u8>,
    pub matched: Vec<u8>,
}

/// Immutable search configuration shared by every worker.
#[derive(Debug, Clone)]
pub struct SearchParams {
    pub pattern: Vec<u8>,
    pub max_mismatches: usize,
    pub geometry: ChunkGeometry,
}

/// Search the whole index and write hits to `out_path`.
pub fn run_search(
    index_dir: &Path,
    out_path: &Path,
    params: &SearchParams,
    workers: usize,
) -> Result<()> {
    let chunks = layout::discover_chunks(index_dir)?;
    eprintln!(
        "  Searching {} chunk(s) with {} worker(s)...",
        chunks.len(),
        workers
    );

    let mut sink = HitSink::new(BufWriter::new(File::create(out_path)?));
    pool::search_chunks(index_dir, chunks, params, workers, &mut sink)?;
    sink.finish()?;
    Ok(())
}
