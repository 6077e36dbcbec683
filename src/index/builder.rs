/// index/builder.rs — Writing chunk artifacts
///
/// Each chunk produces two files: the raw sequence bytes and the
/// gzip-compressed positional index. Both are written to a `.tmp`
/// sibling first and renamed into place, so a crash mid-write cannot
/// leave a half-formed artifact that search would mis-read.
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use flate2::write::GzEncoder;
use flate2::Compression;

use crate::error::Result;
use crate::index::container::PositionalIndex;
use crate::index::layout;

/// Write the sequence and index artifacts for one chunk.
pub fn build_chunk(dir: &Path, id: &str, seq: &[u8]) -> Result<()> {
    write_atomic(&layout::seq_path(dir, id), |w| w.write_all(seq))?;

    let index = PositionalIndex::from_sequence(seq);
    write_atomic(&layout::index_path(dir, id), |w| {
        let mut gz = GzEncoder::new(w, Compression::default());
        index.write_to(&mut gz)?;
        gz.finish().map(|_| ())
    })?;

    Ok(())
}

/// Write a file through a temporary sibling and rename it into place.
fn write_atomic<F>(path: &Path, fill: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> std::io::Result<()>,
{
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = std::path::PathBuf::from(tmp);

    let mut writer = BufWriter::new(File::create(&tmp)?);
    fill(&mut writer)?;
    writer.flush()?;
    drop(writer);

    fs::rename(&tmp, path)?;
    Ok(())
}
