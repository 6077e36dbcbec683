/// index/layout.rs — Index directory layout and chunk naming
///
/// Every chunk is identified by the string `CONTIG_<name>_CHUNK_<k>` and
/// owns two files in a single flat directory:
///
///   GRCh38_CONTIG_<name>_CHUNK_<k>.seq       raw chunk bytes
///   GRCh38_CONTIG_<name>_CHUNK_<k>.index.gz  compressed positional index
///
/// Contig names may themselves contain underscores, so parsing anchors on
/// the leading `CONTIG_` and the *last* `_CHUNK_` marker.
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Result, SeqseekError};

/// Assembly tag prefixed to every artifact file name.
pub const ASSEMBLY: &str = "GRCh38";

pub const SEQ_EXT: &str = ".seq";
pub const INDEX_EXT: &str = ".index.gz";

/// Build the chunk identifier for a contig chunk.
pub fn chunk_id(contig: &str, ordinal: usize) -> String {
    format!("CONTIG_{contig}_CHUNK_{ordinal}")
}

/// Recover `(contig_name, ordinal)` from a chunk identifier.
pub fn parse_chunk_id(id: &str) -> Result<(&str, usize)> {
    let bad = || SeqseekError::BadChunkName(id.to_string());
    let body = id.strip_prefix("CONTIG_").ok_or_else(bad)?;
    let marker = body.rfind("_CHUNK_").ok_or_else(bad)?;
    let contig = &body[..marker];
    if contig.is_empty() {
        return Err(bad());
    }
    let ordinal: usize = body[marker + "_CHUNK_".len()..].parse().map_err(|_| bad())?;
    Ok((contig, ordinal))
}

pub fn seq_path(dir: &Path, id: &str) -> PathBuf {
    dir.join(format!("{ASSEMBLY}_{id}{SEQ_EXT}"))
}

pub fn index_path(dir: &Path, id: &str) -> PathBuf {
    dir.join(format!("{ASSEMBLY}_{id}{INDEX_EXT}"))
}

/// Enumerate the chunk identifiers present in an index directory.
///
/// Chunks are keyed on their `.seq` files, but identifiers that only have
/// an index artifact are reported too: the missing half then surfaces as
/// an I/O or corruption error during search instead of silently dropping
/// the chunk's hits.
pub fn discover_chunks(dir: &Path) -> Result<Vec<String>> {
    let mut ids = BTreeSet::new();
    for entry in WalkDir::new(dir).max_depth(1).follow_links(false) {
        let entry = entry.map_err(|e| {
            SeqseekError::Io(e.into_io_error().unwrap_or_else(|| {
                std::io::Error::new(std::io::ErrorKind::Other, "index directory walk failed")
            }))
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = match entry.file_name().to_str() {
            Some(n) => n,
            None => continue,
        };
        let stem = name
            .strip_suffix(SEQ_EXT)
            .or_else(|| name.strip_suffix(INDEX_EXT));
        if let Some(stem) = stem {
            if let Some(id) = stem.strip_prefix(&format!("{ASSEMBLY}_")) {
                if parse_chunk_id(id).is_ok() {
                    ids.insert(id.to_string());
                }
            }
        }
    }
    Ok(ids.into_iter().collect())
}

/// True when the directory exists and contains at least one entry.
/// Mirrors the build trigger: a missing or empty directory means the
/// reference has not been preprocessed yet.
pub fn index_is_populated(dir: &Path) -> bool {
    match std::fs::read_dir(dir) {
        Ok(mut entries) => entries.next().is_some(),
        Err(_) => false,
    }
}
