/// search/pool.rs — Parallel chunk dispatch and result streaming
///
/// Chunk identifiers go into an unbounded work queue; N scoped worker
/// threads drain it, search their chunk, and stream the resulting hit
/// batches back over a bounded channel. The main thread aggregates into
/// the sink as batches arrive, so no more than a few chunks' worth of
/// hits are ever in flight.
///
/// Failure of any chunk stops the search: the aggregator keeps the first
/// error, drops its receiver, and every worker's next send fails, which
/// ends the worker loop. In-flight chunks run to completion but their
/// results are discarded.
use std::io::Write;
use std::path::Path;
use std::thread;

use crossbeam_channel::{bounded, unbounded};

use crate::error::{Result, SeqseekError};
use crate::search::chunk_search::search_chunk;
use crate::search::sink::HitSink;
use crate::search::{Hit, SearchParams};

/// Parallelism degree: one thread per CPU, capped at 8.
pub fn default_workers() -> usize {
    let cpus = thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
    cpus.min(8)
}

/// Search every chunk in `chunks`, streaming hits into `sink`.
pub fn search_chunks<W: Write>(
    index_dir: &Path,
    chunks: Vec<String>,
    params: &SearchParams,
    workers: usize,
    sink: &mut HitSink<W>,
) -> Result<()> {
    let workers = workers.max(1);

    let (work_tx, work_rx) = unbounded::<String>();
    for chunk in chunks {
        // Receivers exist, the send cannot fail
        let _ = work_tx.send(chunk);
    }
    drop(work_tx);

    let (result_tx, result_rx) = bounded::<Result<Vec<Hit>>>(workers);

    thread::scope(|scope| {
        for _ in 0..workers {
            let work_rx = work_rx.clone();
            let result_tx = result_tx.clone();
            scope.spawn(move || {
                for chunk in work_rx.iter() {
                    let outcome = search_chunk(index_dir, &chunk, params).map_err(|e| {
                        SeqseekError::Worker {
                            chunk,
                            source: Box::new(e),
                        }
                    });
                    // A failed send means the aggregator is gone; stop.
                    if result_tx.send(outcome).is_err() {
                        break;
                    }
                }
            });
        }
        // The aggregator's iteration below must end once the last worker
        // finishes, so the scope's own sender handle goes first.
        drop(result_tx);

        let mut outcome = Ok(());
        for result in result_rx.iter() {
            let stop = match result {
                Ok(hits) => match sink.extend(hits) {
                    Ok(()) => None,
                    Err(e) => Some(e),
                },
                Err(e) => Some(e),
            };
            if let Some(e) = stop {
                outcome = Err(e);
                break;
            }
        }
        // Unblocks any worker waiting on the bounded channel before the
        // scope joins.
        drop(result_rx);
        outcome
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::chunk::ChunkGeometry;
    use crate::index::layout::{chunk_id, discover_chunks, index_path, seq_path};
    use crate::index::{build_reference_index, builder};
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::sync::{Arc, Mutex};
    use tempfile::tempdir;

    const G: ChunkGeometry = ChunkGeometry {
        stride: 16,
        overlap: 8,
    };

    #[derive(Clone)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn build_index(reference: &[u8]) -> tempfile::TempDir {
        let dir = tempdir().unwrap();
        let fa = dir.path().join("ref.fa.gz");
        let mut enc =
            GzEncoder::new(std::fs::File::create(&fa).unwrap(), Compression::default());
        enc.write_all(b">X\n").unwrap();
        enc.write_all(reference).unwrap();
        enc.write_all(b"\n").unwrap();
        enc.finish().unwrap();
        build_reference_index(&fa, &dir.path().join("idx"), G).unwrap();
        dir
    }

    fn run(
        dir: &tempfile::TempDir,
        pattern: &[u8],
        k: usize,
        workers: usize,
    ) -> Result<Vec<(u8, u64)>> {
        let index_dir = dir.path().join("idx");
        let chunks = discover_chunks(&index_dir).unwrap();
        let params = SearchParams {
            pattern: pattern.to_vec(),
            max_mismatches: k,
            geometry: G,
        };
        let shared = SharedBuf(Arc::new(Mutex::new(Vec::new())));
        let mut sink = HitSink::new(shared.clone());
        search_chunks(&index_dir, chunks, &params, workers, &mut sink)?;
        sink.finish()?;

        let bytes = shared.0.lock().unwrap().clone();
        let text = String::from_utf8(bytes).unwrap();
        Ok(text
            .lines()
            .map(|line| {
                let mut cols = line.split_whitespace();
                let flag: u8 = cols.next().unwrap().parse().unwrap();
                let _contig = cols.next().unwrap();
                let pos: u64 = cols.next().unwrap().parse().unwrap();
                (flag, pos)
            })
            .collect())
    }

    #[test]
    fn test_overlap_straddling_hit_emitted_once() {
        // 28 bp contig over stride 16 / overlap 8 → two chunks.
        // TTGA occurs at 0-based 14 (straddling the chunk 1 seed point),
        // at 18 (inside both windows, owned by chunk 0), and at 22
        // (owned by chunk 1).
        let reference = b"ACACACACACACACTTGATTGATTGACC";
        let dir = build_index(reference);
        let mut hits = run(&dir, b"TTGA", 0, 4).unwrap();
        hits.retain(|(flag, _)| *flag == 0);
        hits.sort_unstable();
        assert_eq!(hits, vec![(0, 15), (0, 19), (0, 23)]);
    }

    #[test]
    fn test_single_worker_matches_many_workers() {
        let reference = b"AAAATGGATGTGAAATGAGTCAAGAAAA";
        let dir = build_index(reference);
        let mut one = run(&dir, b"AAAT", 1, 1).unwrap();
        let mut many = run(&dir, b"AAAT", 1, 8).unwrap();
        one.sort_unstable();
        many.sort_unstable();
        assert_eq!(one, many);
        assert!(!one.is_empty());
    }

    #[test]
    fn test_missing_index_artifact_fails_search() {
        let dir = build_index(b"AAAATGGATGTGAAATGAGTCAAGAAAA");
        let index_dir = dir.path().join("idx");
        std::fs::remove_file(index_path(&index_dir, &chunk_id("X", 1))).unwrap();

        let err = run(&dir, b"ACGT", 0, 4).unwrap_err();
        match err {
            SeqseekError::Worker { chunk, source } => {
                assert_eq!(chunk, "CONTIG_X_CHUNK_1");
                assert!(matches!(*source, SeqseekError::IndexMissing { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_deleted_sequence_artifact_fails_search() {
        let dir = build_index(b"AAAATGGATGTGAAATGAGTCAAGAAAA");
        let index_dir = dir.path().join("idx");
        std::fs::remove_file(seq_path(&index_dir, &chunk_id("X", 0))).unwrap();

        let err = run(&dir, b"ACGT", 0, 2).unwrap_err();
        assert!(matches!(err, SeqseekError::Worker { .. }));
    }

    #[test]
    fn test_many_chunks_all_searched() {
        // 10 chunks, one guaranteed occurrence per stride
        let dir = tempdir().unwrap();
        let index_dir = dir.path().join("idx");
        std::fs::create_dir_all(&index_dir).unwrap();
        for ordinal in 0..10usize {
            let mut seq = vec![b'A'; if ordinal == 9 { 16 } else { 24 }];
            // Place CGCG just past the suppressed window of every chunk
            seq[10..14].copy_from_slice(b"CGCG");
            builder::build_chunk(&index_dir, &chunk_id("X", ordinal), &seq).unwrap();
        }

        let chunks = discover_chunks(&index_dir).unwrap();
        assert_eq!(chunks.len(), 10);
        let params = SearchParams {
            pattern: b"CGCG".to_vec(),
            max_mismatches: 0,
            geometry: G,
        };
        let shared = SharedBuf(Arc::new(Mutex::new(Vec::new())));
        let mut sink = HitSink::new(shared.clone());
        search_chunks(&index_dir, chunks, &params, 4, &mut sink).unwrap();
        sink.finish().unwrap();

        let bytes = shared.0.lock().unwrap().clone();
        let text = String::from_utf8(bytes).unwrap();
        // CGCG is its own reverse complement: two hits per chunk
        assert_eq!(text.lines().count(), 20);
    }
}
