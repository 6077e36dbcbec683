/// index/container.rs — Positional index and its on-disk container
///
/// In memory the index is a 256-slot table: one ascending `Vec<i32>` of
/// local offsets per byte value. On disk it is a gzip stream over a small
/// binary container:
///
/// BINARY FORMAT (inside the gzip stream)
/// ─────────────────────────────────────────────────────────────────────
///  Offset  Len   Field
///  0       4     Magic: 0x53 0x51 0x49 0x58  ("SQIX")
///  4       1     Version: 0x01
///  5       2     Symbol count (u16 LE)
///  7       var   Per symbol, ascending byte order:
///                  [symbol: u8][count: u32 LE][offset: i32 LE × count]
/// ─────────────────────────────────────────────────────────────────────
///
/// Only bytes that occur in the sequence get an entry. Offsets are signed
/// 32-bit because the search subtracts query positions from them; a chunk
/// is always far below i32::MAX bytes.
use std::io::{Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

const MAGIC: [u8; 4] = *b"SQIX";
const VERSION: u8 = 0x01;

/// Per-symbol sorted offset arrays for one chunk sequence.
#[derive(Debug)]
pub struct PositionalIndex {
    arrays: Vec<Vec<i32>>,
}

impl PositionalIndex {
    fn empty() -> Self {
        PositionalIndex {
            arrays: (0..256).map(|_| Vec::new()).collect(),
        }
    }

    /// Build the index of a chunk sequence. Each position is recorded in
    /// the array of the byte found there, so the arrays partition
    /// `0..seq.len()` and are ascending by construction.
    pub fn from_sequence(seq: &[u8]) -> Self {
        debug_assert!(seq.len() <= i32::MAX as usize);
        let mut counts = [0usize; 256];
        for &b in seq {
            counts[b as usize] += 1;
        }
        let mut index = Self::empty();
        for (b, &count) in counts.iter().enumerate() {
            index.arrays[b].reserve_exact(count);
        }
        for (p, &b) in seq.iter().enumerate() {
            index.arrays[b as usize].push(p as i32);
        }
        index
    }

    /// The ascending offsets at which `symbol` occurs. Empty when the
    /// symbol does not occur.
    pub fn offsets(&self, symbol: u8) -> &[i32] {
        &self.arrays[symbol as usize]
    }

    /// Symbols that occur at least once, in ascending byte order.
    pub fn symbols(&self) -> impl Iterator<Item = u8> + '_ {
        self.arrays
            .iter()
            .enumerate()
            .filter(|(_, a)| !a.is_empty())
            .map(|(b, _)| b as u8)
    }

    // ── container encoding ────────────────────────────────────────────

    /// Serialise into the binary container format (uncompressed).
    pub fn write_to<W: Write>(&self, mut w: W) -> std::io::Result<()> {
        w.write_all(&MAGIC)?;
        w.write_u8(VERSION)?;
        let symbol_count = self.symbols().count() as u16;
        w.write_u16::<LittleEndian>(symbol_count)?;
        for symbol in self.symbols() {
            let offsets = self.offsets(symbol);
            w.write_u8(symbol)?;
            w.write_u32::<LittleEndian>(offsets.len() as u32)?;
            for &offset in offsets {
                w.write_i32::<LittleEndian>(offset)?;
            }
        }
        Ok(())
    }

    /// Parse the binary container format. `corrupt` reasons describe the
    /// first structural violation found; I/O errors (including truncation
    /// surfacing as UnexpectedEof) are reported the same way since the
    /// container is unusable either way.
    pub fn read_from<R: Read>(mut r: R) -> std::result::Result<Self, String> {
        let io = |e: std::io::Error| format!("unreadable container: {e}");

        let mut magic = [0u8; 4];
        r.read_exact(&mut magic).map_err(io)?;
        if magic != MAGIC {
            return Err("bad magic bytes".to_string());
        }
        let version = r.read_u8().map_err(io)?;
        if version != VERSION {
            return Err(format!("unsupported version {version}"));
        }
        let symbol_count = r.read_u16::<LittleEndian>().map_err(io)?;
        if symbol_count > 256 {
            return Err(format!("implausible symbol count {symbol_count}"));
        }

        let mut index = Self::empty();
        let mut last_symbol: Option<u8> = None;
        for _ in 0..symbol_count {
            let symbol = r.read_u8().map_err(io)?;
            if let Some(last) = last_symbol {
                if symbol <= last {
                    return Err(format!("symbol 0x{symbol:02x} out of order"));
                }
            }
            last_symbol = Some(symbol);

            let count = r.read_u32::<LittleEndian>().map_err(io)? as usize;
            let mut offsets = Vec::with_capacity(count.min(1 << 20));
            let mut prev = -1i32;
            for _ in 0..count {
                let offset = r.read_i32::<LittleEndian>().map_err(io)?;
                if offset <= prev {
                    return Err(format!(
                        "offsets for symbol 0x{symbol:02x} not strictly ascending"
                    ));
                }
                prev = offset;
                offsets.push(offset);
            }
            index.arrays[symbol as usize] = offsets;
        }

        Ok(index)
    }
}
