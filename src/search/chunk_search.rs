/// search/chunk_search.rs — Vote-accumulation search of one chunk
///
/// The naive scan of a chunk is O(n·m). The positional index turns this
/// into scatter-adds: for query position j and every offset p where the
/// reference holds the queried base, the candidate start t = p − j gains
/// one vote. After all m passes, votes[t] is exactly the number of query
/// positions that agree with the reference at alignment t, so a start is
/// a hit when votes[t] ≥ m − K. Total work is one increment per
/// (reference position, matching query position) pair, independent of m
/// per pass.
///
/// The subtraction p − j can go negative near the chunk start, so it is
/// done in signed arithmetic and range-checked before indexing. Votes in
/// the last m − 1 slots count partial alignments hanging off the chunk
/// end; the threshold scan stops at n − m so they are never read.
use std::fs;
use std::io::BufReader;
use std::path::Path;

use flate2::read::GzDecoder;

use crate::error::{Result, SeqseekError};
use crate::index::container::PositionalIndex;
use crate::index::layout;
use crate::search::reverse::reverse_complement;
use crate::search::{Hit, SearchParams};

/// SAM-style strand flags.
pub const FLAG_FORWARD: u8 = 0;
pub const FLAG_REVERSE: u8 = 16;

/// Search one chunk for the pattern on both strands.
///
/// Hits are emitted in (strand, local position) order with 1-based
/// global coordinates. A chunk with ordinal k ≥ 1 suppresses starts
/// inside the window already owned by its predecessor.
pub fn search_chunk(index_dir: &Path, chunk: &str, params: &SearchParams) -> Result<Vec<Hit>> {
    let (contig, ordinal) = layout::parse_chunk_id(chunk)?;
    let positions_offset = params.geometry.positions_offset(ordinal);

    let seq = fs::read(layout::seq_path(index_dir, chunk))?;
    let n = seq.len();

    let pattern = params.pattern.as_slice();
    let m = pattern.len();
    let revpattern = reverse_complement(pattern);

    let index = load_index(index_dir, chunk)?;
    verify_index(&index, &seq, chunk, pattern, &revpattern)?;

    let mut hits = Vec::new();
    if n < m {
        return Ok(hits);
    }

    // K ≥ m leaves a threshold of zero: every alignment qualifies.
    let threshold = m.saturating_sub(params.max_mismatches);
    let min_start = params.geometry.min_start(ordinal, m);
    let last_start = n - m;

    // A palindromic pattern equals its own reverse complement; both
    // passes still run so the reverse-strand hits are reported.
    for (flag, query) in [(FLAG_FORWARD, pattern), (FLAG_REVERSE, revpattern.as_slice())] {
        let mut votes = vec![0i16; n];
        for (j, &c) in query.iter().enumerate() {
            let j = j as isize;
            for &p in index.offsets(c) {
                let t = p as isize - j;
                if t >= 0 && (t as usize) < n {
                    votes[t as usize] += 1;
                }
            }
        }

        for (t, &count) in votes[..=last_start].iter().enumerate().skip(min_start) {
            if count as usize >= threshold {
                hits.push(Hit {
                    flag,
                    contig: contig.to_string(),
                    pos: positions_offset + t as u64 + 1,
                    query: query.to_vec(),
                    matched: seq[t..t + m].to_vec(),
                });
            }
        }
    }

    Ok(hits)
}

fn load_index(index_dir: &Path, chunk: &str) -> Result<PositionalIndex> {
    let path = layout::index_path(index_dir, chunk);
    if !path.exists() {
        return Err(SeqseekError::IndexMissing {
            chunk: chunk.to_string(),
        });
    }
    let file = fs::File::open(&path)?;
    PositionalIndex::read_from(BufReader::new(GzDecoder::new(file))).map_err(|reason| {
        SeqseekError::IndexCorrupt {
            chunk: chunk.to_string(),
            reason,
        }
    })
}

/// Spot-check the loaded index against the sequence it describes.
///
/// Only the symbols the query needs are inspected: their offsets must
/// stay inside the sequence and point at the right byte, and a symbol
/// with no index entry must not occur in the sequence at all.
fn verify_index(
    index: &PositionalIndex,
    seq: &[u8],
    chunk: &str,
    pattern: &[u8],
    revpattern: &[u8],
) -> Result<()> {
    let corrupt = |reason: String| SeqseekError::IndexCorrupt {
        chunk: chunk.to_string(),
        reason,
    };

    let mut needed = [false; 256];
    for &c in pattern.iter().chain(revpattern.iter()) {
        needed[c as usize] = true;
    }

    for symbol in 0..=255u8 {
        if !needed[symbol as usize] {
            continue;
        }
        let offsets = index.offsets(symbol);
        match (offsets.first(), offsets.last()) {
            (Some(&first), Some(&last)) => {
                if last as usize >= seq.len() {
                    return Err(corrupt(format!(
                        "offset {last} for symbol '{}' exceeds sequence length {}",
                        symbol as char,
                        seq.len()
                    )));
                }
                if seq[first as usize] != symbol || seq[last as usize] != symbol {
                    return Err(corrupt(format!(
                        "index entries for symbol '{}' do not match the sequence",
                        symbol as char
                    )));
                }
            }
            _ => {
                if seq.contains(&symbol) {
                    return Err(corrupt(format!(
                        "symbol '{}' occurs in the sequence but has no index entry",
                        symbol as char
                    )));
                }
            }
        }
    }
    Ok(())
}
