/// search/sink.rs — Buffered hit output
///
/// Hits arrive from the workers in arbitrary chunk order and are written
/// as they come; downstream consumers sort if they need order. Lines are
/// buffered and flushed in batches so a search producing thousands of
/// hits does not pay one syscall each.
///
/// LINE FORMAT
/// ───────────────────────────────────────────────────────────────────
/// Five right-aligned columns, single-space separated, newline-ended:
///   flag(3)  contig(12)  position(12)  query(24)  matched(24)
/// Flag 0 is a forward-strand hit, flag 16 a reverse-complement hit;
/// the position is 1-based and global within the contig.
use std::io::Write;

use crate::error::Result;
use crate::search::Hit;

/// Number of buffered hits that triggers a flush.
pub const FLUSH_THRESHOLD: usize = 20;

pub struct HitSink<W: Write> {
    out: W,
    buffer: Vec<Hit>,
}

impl<W: Write> HitSink<W> {
    pub fn new(out: W) -> Self {
        HitSink {
            out,
            buffer: Vec::with_capacity(FLUSH_THRESHOLD),
        }
    }

    /// Buffer one hit, flushing if the batch threshold is reached.
    pub fn push(&mut self, hit: Hit) -> Result<()> {
        self.buffer.push(hit);
        if self.buffer.len() >= FLUSH_THRESHOLD {
            self.write_batch()?;
        }
        Ok(())
    }

    /// Buffer a whole chunk's worth of hits.
    pub fn extend(&mut self, hits: Vec<Hit>) -> Result<()> {
        for hit in hits {
            self.push(hit)?;
        }
        Ok(())
    }

    /// Write out any remaining hits and flush the underlying stream.
    pub fn finish(&mut self) -> Result<()> {
        self.write_batch()?;
        self.out.flush()?;
        Ok(())
    }

    fn write_batch(&mut self) -> Result<()> {
        for hit in self.buffer.drain(..) {
            writeln!(
                self.out,
                "{:>3} {:>12} {:>12} {:>24} {:>24}",
                hit.flag,
                hit.contig,
                hit.pos,
                String::from_utf8_lossy(&hit.query),
                String::from_utf8_lossy(&hit.matched),
            )?;
        }
        Ok(())
    }
}
