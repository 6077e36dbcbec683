/// index/mod.rs — Reference preprocessing
///
/// Streams the contigs of a gzip FASTA reference, splits each one into
/// overlapping chunks, and writes two artifacts per chunk into a flat
/// index directory. The directory is immutable once built; search only
/// ever reads it.
pub mod builder;
pub mod chunk;
pub mod container;
pub mod layout;

use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::fasta::FastaReader;
use chunk::ChunkGeometry;

pub use layout::index_is_populated;

/// Build the full index for a reference file.
///
/// One pass over the reference; each contig is held in memory only while
/// its own chunks are written.
pub fn build_reference_index(
    reference: &Path,
    index_dir: &Path,
    geometry: ChunkGeometry,
) -> Result<()> {
    fs::create_dir_all(index_dir)?;

    let reader = FastaReader::open_gzip(reference)?;
    let mut contigs = 0usize;
    let mut chunks = 0usize;

    for contig in reader {
        let contig = contig?;
        eprintln!(
            "  Indexing contig {} ({} bp)...",
            contig.name,
            contig.sequence.len()
        );
        for plan in geometry.plan(contig.sequence.len()) {
            let id = layout::chunk_id(&contig.name, plan.ordinal);
            let seq = &contig.sequence[plan.start..plan.start + plan.len];
            builder::build_chunk(index_dir, &id, seq)?;
            chunks += 1;
        }
        contigs += 1;
    }

    eprintln!("  Indexed {contigs} contig(s) into {chunks} chunk(s)");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::layout::{discover_chunks, seq_path};
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_gz_fasta(path: &Path, content: &[u8]) {
        let mut enc = GzEncoder::new(fs::File::create(path).unwrap(), Compression::default());
        enc.write_all(content).unwrap();
        enc.finish().unwrap();
    }

    #[test]
    fn test_build_reference_index_small_geometry() {
        let dir = tempdir().unwrap();
        let reference = dir.path().join("ref.fa.gz");
        let index_dir = dir.path().join("ref_index");
        // 24 bp contig with stride 16 / overlap 8 → two chunks
        write_gz_fasta(&reference, b">X\nAAAATGGATGTGAAATGAGTCAAG\n");

        let geometry = ChunkGeometry { stride: 16, overlap: 8 };
        build_reference_index(&reference, &index_dir, geometry).unwrap();

        let ids = discover_chunks(&index_dir).unwrap();
        assert_eq!(ids, vec!["CONTIG_X_CHUNK_0", "CONTIG_X_CHUNK_1"]);

        // Chunk 0 is the full window, chunk 1 the remaining tail
        let chunk0 = fs::read(seq_path(&index_dir, "CONTIG_X_CHUNK_0")).unwrap();
        let chunk1 = fs::read(seq_path(&index_dir, "CONTIG_X_CHUNK_1")).unwrap();
        assert_eq!(chunk0, b"AAAATGGATGTGAAATGAGTCAAG");
        assert_eq!(chunk1, b"GAGTCAAG");
    }

    #[test]
    fn test_build_skips_empty_contigs() {
        let dir = tempdir().unwrap();
        let reference = dir.path().join("ref.fa.gz");
        let index_dir = dir.path().join("ref_index");
        write_gz_fasta(&reference, b">empty\n>Y\nACGT\n");

        let geometry = ChunkGeometry { stride: 16, overlap: 8 };
        build_reference_index(&reference, &index_dir, geometry).unwrap();

        let ids = discover_chunks(&index_dir).unwrap();
        assert_eq!(ids, vec!["CONTIG_Y_CHUNK_0"]);
    }

    #[test]
    fn test_missing_reference_reported() {
        let dir = tempdir().unwrap();
        let err = build_reference_index(
            &dir.path().join("absent.fa.gz"),
            &dir.path().join("ref_index"),
            ChunkGeometry { stride: 16, overlap: 8 },
        )
        .unwrap_err();
        assert!(matches!(err, crate::error::SeqseekError::ReferenceMissing(_)));
    }
}
