use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SeqseekError {
    // ── input errors ──────────────────────────────────────────────────
    #[error("Pattern is empty: at least one base is required")]
    PatternEmpty,

    #[error("Pattern is {len} bp: patterns cannot be longer than {max} bp")]
    PatternTooLong { len: usize, max: usize },

    #[error("Reference file not found: {0} — download the reference genome first")]
    ReferenceMissing(PathBuf),

    #[error("Malformed FASTA input: {0}")]
    MalformedFasta(String),

    // ── index errors ──────────────────────────────────────────────────

    /// A file in the index directory does not follow the chunk naming scheme.
    #[error("Unrecognised chunk name '{0}': expected CONTIG_<name>_CHUNK_<k>")]
    BadChunkName(String),

    /// A sequence file is present but its index artifact is not.
    #[error("Index artifact missing for chunk {chunk} — rebuild the index")]
    IndexMissing { chunk: String },

    /// The index artifact failed magic/version checks, was truncated, or
    /// disagrees with the sequence it claims to describe.
    #[error("Index for chunk {chunk} is corrupt: {reason}")]
    IndexCorrupt { chunk: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // ── search errors ─────────────────────────────────────────────────

    /// Any failure inside a search worker, tagged with the chunk it was
    /// processing when it failed.
    #[error("Search failed on chunk {chunk}: {source}")]
    Worker {
        chunk: String,
        source: Box<SeqseekError>,
    },
}

pub type Result<T> = std::result::Result<T, SeqseekError>;
