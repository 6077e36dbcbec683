/// fasta.rs — Streaming reader for gzip-compressed FASTA references
///
/// Yields one contig at a time so that a multi-gigabase reference never
/// has to be resident in memory as a whole. Only the current contig's
/// sequence is buffered.
///
/// Parsing rules:
///   - A header line starts with '>'; the contig name is the first
///     whitespace-delimited token after it (Ensembl headers carry a long
///     description after the name).
///   - All following lines up to the next header are sequence, with line
///     endings stripped. Case is preserved as stored.
///   - Sequence bytes before the first header are an error.
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::MultiGzDecoder;

use crate::error::{Result, SeqseekError};

/// A named reference sequence.
pub struct Contig {
    pub name: String,
    pub sequence: Vec<u8>,
}

/// Iterator over the contigs of a FASTA stream.
pub struct FastaReader<R: BufRead> {
    inner: R,
    /// Header of the contig whose sequence lines are next in the stream.
    pending: Option<String>,
    /// Set once the underlying stream is exhausted.
    done: bool,
    line_no: usize,
}

impl FastaReader<BufReader<MultiGzDecoder<File>>> {
    /// Open a gzip-compressed FASTA file.
    pub fn open_gzip(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(SeqseekError::ReferenceMissing(path.to_path_buf()));
        }
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(MultiGzDecoder::new(file))))
    }
}

impl<R: BufRead> FastaReader<R> {
    pub fn new(inner: R) -> Self {
        FastaReader {
            inner,
            pending: None,
            done: false,
            line_no: 0,
        }
    }

    /// Read the next contig, or None at end of stream.
    fn read_contig(&mut self) -> Result<Option<Contig>> {
        if self.done {
            return Ok(None);
        }

        let mut line = String::new();

        // ── Find the header ──────────────────────────────────────────
        let header = loop {
            if let Some(h) = self.pending.take() {
                break h;
            }
            line.clear();
            if self.inner.read_line(&mut line)? == 0 {
                self.done = true;
                return Ok(None);
            }
            self.line_no += 1;
            let trimmed = line.trim_end();
            if trimmed.is_empty() {
                continue;
            }
            if let Some(rest) = trimmed.strip_prefix('>') {
                break rest.to_string();
            }
            return Err(SeqseekError::MalformedFasta(format!(
                "line {}: sequence data before the first '>' header",
                self.line_no
            )));
        };

        let name = header
            .split_whitespace()
            .next()
            .ok_or_else(|| {
                SeqseekError::MalformedFasta(format!(
                    "line {}: header has no contig name",
                    self.line_no
                ))
            })?
            .to_string();

        // ── Accumulate sequence lines until the next header ──────────
        let mut sequence = Vec::new();
        loop {
            line.clear();
            if self.inner.read_line(&mut line)? == 0 {
                self.done = true;
                break;
            }
            self.line_no += 1;
            let trimmed = line.trim_end();
            if let Some(rest) = trimmed.strip_prefix('>') {
                self.pending = Some(rest.to_string());
                break;
            }
            sequence.extend_from_slice(trimmed.as_bytes());
        }

        Ok(Some(Contig { name, sequence }))
    }
}

impl<R: BufRead> Iterator for FastaReader<R> {
    type Item = Result<Contig>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_contig().transpose()
    }
}
